use crate::model::{Group, Person};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Email de connexion prêt à être envoyé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicLinkMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Permet de customiser le rendu du message.
pub trait MailRenderer {
    fn subject(&self, group: &Group) -> String;
    fn body(&self, person: &Person, group: &Group, link: &str, expires_minutes: i64) -> String;
}

/// Gabarit texte par défaut.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextMail;

impl MailRenderer for TextMail {
    fn subject(&self, group: &Group) -> String {
        format!("Your Secret Santa Login Link - {}", group.name)
    }

    fn body(&self, person: &Person, group: &Group, link: &str, expires_minutes: i64) -> String {
        format!(
            "Secret Santa Login - {group}\n\nHi {name}!\n\nClick this link to log in to your Secret Santa account:\n{link}\n\nThis link will expire in {expires_minutes} minutes for your security.\n\nIf you didn't request this login link, you can safely ignore this email.\n\nWhat happens next:\n- View and edit your wishlist\n- See who you're buying gifts for\n- Check other family members' wishlists\n",
            group = group.name,
            name = person.name,
        )
    }
}

/// Prépare le message pour une personne ayant un email.
pub fn prepare_magic_link_mail(
    from: &str,
    person: &Person,
    group: &Group,
    link: &str,
    expires_minutes: i64,
    renderer: &dyn MailRenderer,
) -> Result<MagicLinkMail> {
    let Some(to) = person.email.as_deref() else {
        bail!("person {} has no email address", person.id);
    };
    Ok(MagicLinkMail {
        from: from.to_string(),
        to: to.to_string(),
        subject: renderer.subject(group),
        body: renderer.body(person, group, link, expires_minutes),
    })
}

/// Livraison des emails (transport hors périmètre).
pub trait Mailer {
    fn send(&self, mail: &MagicLinkMail) -> Result<()>;
}

/// Dépose chaque message dans un fichier texte d'un répertoire « boîte d'envoi ».
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    dir: PathBuf,
}

impl OutboxMailer {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, mail: &MagicLinkMail) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating outbox {}", self.dir.display()))?;
        let path = self.dir.join(format!("{}.txt", Uuid::new_v4()));
        let content = format!(
            "From: {}\nTo: {}\nSubject: {}\n\n{}",
            mail.from, mail.to, mail.subject, mail.body
        );
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(to = %mail.to, path = %path.display(), "magic link mail queued");
        Ok(())
    }
}
