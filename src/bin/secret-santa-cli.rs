#![forbid(unsafe_code)]
use anyhow::{anyhow, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use secret_santa::{
    io,
    model::{GroupId, PersonId},
    notification::{OutboxMailer, TextMail},
    storage::{JsonStorage, Storage},
    wishlist::WishlistInput,
    Exchange, Settings,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

const MAGIC_LINK_NOTICE: &str = "If this email is registered, a login link has been sent.";

/// CLI Secret Santa : groupes, participants, listes de souhaits et tirage
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du registre
    #[arg(long, global = true, default_value = "santa.json")]
    store: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer un groupe (affiche le code d'invitation)
    CreateGroup {
        #[arg(long)]
        name: String,
        /// Mot de passe administrateur (6 caractères minimum)
        #[arg(long)]
        password: String,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Retrouver un groupe par code d'invitation
    Join {
        #[arg(long)]
        code: String,
    },

    /// Afficher un groupe et ses compteurs
    ShowGroup {
        #[arg(long)]
        group: String,
    },

    /// Définir le budget du groupe
    SetBudget {
        #[arg(long)]
        group: String,
        #[arg(long)]
        amount: Option<f64>,
        /// Code ISO (USD par défaut)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Vérifier le mot de passe administrateur
    AdminLogin {
        #[arg(long)]
        group: String,
        #[arg(long)]
        password: String,
    },

    /// Inscrire une personne (affiche son code de connexion)
    AddPerson {
        #[arg(long)]
        group: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
    },

    /// Importer des personnes depuis un CSV (`name[,email]`)
    ImportPeople {
        #[arg(long)]
        group: String,
        #[arg(long)]
        csv: String,
    },

    /// Lister les personnes d'un groupe
    ListPeople {
        #[arg(long)]
        group: String,
    },

    /// Supprimer une personne (et ses paires)
    RemovePerson {
        #[arg(long)]
        person: String,
    },

    /// Se connecter avec un code personnel
    Login {
        #[arg(long)]
        group: String,
        #[arg(long)]
        code: String,
    },

    /// Demander un lien de connexion par email
    MagicLink {
        #[arg(long)]
        group: String,
        #[arg(long)]
        email: String,
    },

    /// Vérifier un jeton de lien de connexion
    VerifyLink {
        #[arg(long)]
        token: String,
    },

    /// Remplacer la liste de souhaits (`--item "titre|https://lien"`, 1 à 5 fois)
    SetWishlist {
        #[arg(long)]
        person: String,
        #[arg(long = "item")]
        items: Vec<String>,
    },

    /// Tirer les paires pour l'année
    Draw {
        #[arg(long)]
        group: String,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Lister les paires et optionnellement exporter
    Assignments {
        #[arg(long)]
        group: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Supprimer les paires d'une année
    ClearAssignments {
        #[arg(long)]
        group: String,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Exporter le registre complet en JSON
    Export {
        #[arg(long)]
        out_json: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    let storage = JsonStorage::open(&cli.store)?;
    let mut exchange = Exchange::new(storage.load_or_default()?, settings);

    let dirty = match cli.cmd {
        Commands::CreateGroup { name, password, year } => {
            let group = exchange.create_group(&name, &password, year)?;
            println!("group {} | {} | invite code {}", group.id, group.year, group.invite_code);
            true
        }
        Commands::Join { code } => {
            let group = exchange.verify_invite(&code)?;
            println!("{} | {} | {}", group.id, group.name, group.year);
            false
        }
        Commands::ShowGroup { group } => {
            let summary = exchange.group_summary(&GroupId::new(group))?;
            let g = &summary.group;
            let budget = g
                .budget_amount
                .map(|a| format!("{a:.2} {}", g.budget_currency))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{} | {} | {} | invite {} | budget {} | {} people | {} assignments",
                g.id, g.name, g.year, g.invite_code, budget, summary.people_count, summary.assignment_count
            );
            false
        }
        Commands::SetBudget { group, amount, currency } => {
            let g = exchange.update_budget(&GroupId::new(group), amount, currency.as_deref())?;
            println!("budget: {:?} {}", g.budget_amount, g.budget_currency);
            true
        }
        Commands::AdminLogin { group, password } => {
            let session = exchange.admin_login(&GroupId::new(group), &password)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
            false
        }
        Commands::AddPerson { group, name, email } => {
            let person = exchange.add_person(&GroupId::new(group), &name, email.as_deref())?;
            println!("{} | {} | login code {}", person.id, person.name, person.login_code);
            true
        }
        Commands::ImportPeople { group, csv } => {
            let group = GroupId::new(group);
            for row in io::import_people_csv(csv)? {
                let person = exchange.add_person(&group, &row.name, row.email.as_deref())?;
                println!("{} | {} | login code {}", person.id, person.name, person.login_code);
            }
            true
        }
        Commands::ListPeople { group } => {
            for view in exchange.list_people(&GroupId::new(group))? {
                let p = &view.person;
                println!(
                    "{} | {} | {} | {} wish(es)",
                    p.id,
                    p.name,
                    p.email.as_deref().unwrap_or("-"),
                    view.wishlist.len()
                );
            }
            false
        }
        Commands::RemovePerson { person } => {
            let removed = exchange.delete_person(&PersonId::new(person))?;
            println!("removed {}", removed.name);
            true
        }
        Commands::Login { group, code } => {
            let view = exchange.login_with_code(&GroupId::new(group), &code)?;
            println!("Hi {} ({})", view.person.name, view.group.name);
            for item in &view.wishlist {
                println!("  wish: {} <{}>", item.title, item.link);
            }
            match &view.assignment {
                Some(a) => println!("You are buying for {}", a.receiver.name),
                None => println!("No assignment yet"),
            }
            false
        }
        Commands::MagicLink { group, email } => {
            let settings = exchange.settings().clone();
            let mailer = OutboxMailer::new(&settings.outbox_dir);
            exchange.request_magic_link(&GroupId::new(group), &email, Utc::now(), &mailer, &TextMail)?;
            println!("{MAGIC_LINK_NOTICE}");
            false
        }
        Commands::VerifyLink { token } => {
            let session = exchange.verify_magic_link(&token, Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&session)?);
            false
        }
        Commands::SetWishlist { person, items } => {
            let items = items
                .iter()
                .map(|raw| {
                    raw.split_once('|')
                        .map(|(title, link)| WishlistInput::new(title, link))
                        .ok_or_else(|| anyhow!("item must look like \"title|link\": {raw}"))
                })
                .collect::<Result<Vec<_>>>()?;
            let saved = exchange.set_wishlist(&PersonId::new(person), &items)?;
            println!("{} item(s) saved", saved.len());
            true
        }
        Commands::Draw { group, year } => {
            let created = exchange.generate_assignments(&GroupId::new(group), year)?;
            println!("{} assignment(s) created", created.len());
            true
        }
        Commands::Assignments { group, year, out_csv } => {
            let group = GroupId::new(group);
            let year = year.unwrap_or_else(|| Utc::now().year());
            let views = exchange.list_assignments(&group, Some(year))?;
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, exchange.registry(), &group, year)?;
            }
            // impression compacte
            for v in &views {
                println!("{} → {} ({} wish(es))", v.giver.name, v.receiver.name, v.receiver_wishlist.len());
            }
            false
        }
        Commands::ClearAssignments { group, year } => {
            let removed = exchange.clear_assignments(&GroupId::new(group), year)?;
            println!("{removed} assignment(s) removed");
            true
        }
        Commands::Export { out_json } => {
            io::export_registry_json(out_json, exchange.registry())?;
            false
        }
    };

    if dirty {
        storage.save(&exchange.into_registry())?;
    }
    Ok(())
}
