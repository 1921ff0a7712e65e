use super::{pairing, util, Exchange, ExchangeError, LoginView};
use crate::auth::{sign_magic_token, verify_magic_token, LoginMethod, MagicClaims, Session};
use crate::codes::{self, LOGIN_CODE_LEN};
use crate::model::GroupId;
use crate::notification::{prepare_magic_link_mail, MailRenderer, Mailer};
use anyhow::anyhow;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

pub(super) fn login_with_code(
    exchange: &Exchange,
    group_id: &GroupId,
    code: &str,
) -> Result<LoginView, ExchangeError> {
    if code.trim().is_empty() {
        return Err(ExchangeError::validation("Login code is required"));
    }
    let invalid = ExchangeError::Unauthorized("Invalid login code for this group");
    let Ok(code) = codes::normalize_code(code, LOGIN_CODE_LEN) else {
        return Err(invalid);
    };
    let Some(person) = exchange.registry.find_person_by_code(group_id, &code) else {
        return Err(invalid);
    };
    let group = util::group(&exchange.registry, group_id)?;

    let year = util::current_year();
    let assignment = pairing::view_for_giver(&exchange.registry, group_id, &person.id, year);

    Ok(LoginView {
        session: Session {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            person_id: Some(person.id.clone()),
            person_name: Some(person.name.clone()),
            method: LoginMethod::Code,
        },
        person: person.clone(),
        group: group.clone(),
        wishlist: util::owned_wishlist(&exchange.registry, &person.id),
        assignment,
    })
}

/// Envoie un lien de connexion si l'email est inscrit dans le groupe.
///
/// Retourne `false` sans erreur pour un email inconnu : l'appelant affiche le
/// même message dans les deux cas.
pub(super) fn request_magic_link(
    exchange: &Exchange,
    group_id: &GroupId,
    email: &str,
    now: DateTime<Utc>,
    mailer: &dyn Mailer,
    renderer: &dyn MailRenderer,
) -> Result<bool, ExchangeError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || group_id.as_str().is_empty() {
        return Err(ExchangeError::validation(
            "Email and group ID are required",
        ));
    }
    let Some(person) = exchange.registry.find_person_by_email(group_id, &email) else {
        debug!(group = %group_id, "magic link requested for unknown email");
        return Ok(false);
    };
    let group = util::group(&exchange.registry, group_id)?;

    let settings = &exchange.settings;
    let expires_at = TimeDelta::try_minutes(settings.magic_expires_minutes)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            anyhow!(
                "magic link expiry out of range: {} minutes",
                settings.magic_expires_minutes
            )
        })?;
    let claims = MagicClaims {
        person_id: person.id.clone(),
        email: email.clone(),
        group_id: group_id.clone(),
        expires_at,
    };
    let token = sign_magic_token(&claims, settings.magic_secret.as_bytes())?;
    let link = format!(
        "{}/auth/verify?token={token}",
        settings.base_url.trim_end_matches('/')
    );

    let mail = prepare_magic_link_mail(
        &settings.mail_from,
        person,
        group,
        &link,
        settings.magic_expires_minutes,
        renderer,
    )?;
    mailer
        .send(&mail)
        .map_err(|e| ExchangeError::Delivery(format!("{e:#}")))?;
    info!(group = %group_id, person = %person.id, "magic link sent");
    Ok(true)
}

pub(super) fn verify_magic_link(
    exchange: &Exchange,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Session, ExchangeError> {
    if token.trim().is_empty() {
        return Err(ExchangeError::validation("Invalid or missing token"));
    }
    let claims = verify_magic_token(
        token.trim(),
        exchange.settings.magic_secret.as_bytes(),
        now,
    )?;

    let invalid = ExchangeError::Unauthorized("Invalid token data");
    let Some(person) = exchange.registry.find_person(&claims.person_id) else {
        return Err(invalid);
    };
    if person.email.as_deref() != Some(claims.email.as_str()) || person.group_id != claims.group_id
    {
        return Err(invalid);
    }
    let group = util::group(&exchange.registry, &person.group_id)?;

    Ok(Session {
        group_id: group.id.clone(),
        group_name: group.name.clone(),
        person_id: Some(person.id.clone()),
        person_name: Some(person.name.clone()),
        method: LoginMethod::MagicLink,
    })
}
