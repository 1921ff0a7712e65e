use super::{util, Exchange, ExchangeError, GroupSummary};
use crate::auth::{LoginMethod, Session, MIN_ADMIN_PASSWORD_LEN};
use crate::codes::{self, INVITE_CODE_LEN};
use crate::model::{AdminConfig, Group, GroupId, CURRENCIES, DEFAULT_CURRENCY};
use chrono::Utc;
use tracing::info;

pub(super) fn create_group(
    exchange: &mut Exchange,
    name: &str,
    admin_password: &str,
    year: Option<i32>,
) -> Result<Group, ExchangeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ExchangeError::validation("Group name is required"));
    }
    if admin_password.chars().count() < MIN_ADMIN_PASSWORD_LEN {
        return Err(ExchangeError::validation(
            "Admin password must be at least 6 characters",
        ));
    }

    let registry = &exchange.registry;
    let invite_code = util::unique_code(codes::invite_code, |c| {
        registry.find_group_by_invite(c).is_some()
    });
    let hashed_password = exchange.hasher.hash(admin_password)?;

    let group = Group::new(name, invite_code, year.unwrap_or_else(util::current_year));
    exchange.registry.admin_configs.push(AdminConfig {
        group_id: group.id.clone(),
        hashed_password,
    });
    exchange.registry.groups.push(group.clone());
    info!(group = %group.id, year = group.year, "group created");
    Ok(group)
}

pub(super) fn verify_invite(exchange: &Exchange, code: &str) -> Result<Group, ExchangeError> {
    if code.trim().is_empty() {
        return Err(ExchangeError::validation("Invite code is required"));
    }
    codes::normalize_code(code, INVITE_CODE_LEN)
        .ok()
        .and_then(|c| exchange.registry.find_group_by_invite(&c))
        .cloned()
        .ok_or(ExchangeError::NotFound("Invalid invite code"))
}

pub(super) fn group_summary(
    exchange: &Exchange,
    group_id: &GroupId,
) -> Result<GroupSummary, ExchangeError> {
    let group = util::group(&exchange.registry, group_id)?;
    Ok(GroupSummary {
        group: group.clone(),
        people_count: exchange.registry.people_in(group_id).count(),
        assignment_count: exchange
            .registry
            .assignments
            .iter()
            .filter(|a| &a.group_id == group_id)
            .count(),
    })
}

pub(super) fn update_budget(
    exchange: &mut Exchange,
    group_id: &GroupId,
    amount: Option<f64>,
    currency: Option<&str>,
) -> Result<Group, ExchangeError> {
    if let Some(c) = currency {
        if !CURRENCIES.contains(&c) {
            return Err(ExchangeError::validation("Invalid currency code"));
        }
    }
    if let Some(a) = amount {
        if !a.is_finite() || a < 0.0 {
            return Err(ExchangeError::validation(
                "Budget amount must be a positive number",
            ));
        }
    }

    let group = exchange
        .registry
        .find_group_mut(group_id)
        .ok_or(ExchangeError::NotFound("Group not found"))?;
    // montant absent : on garde celui déjà enregistré
    if let Some(a) = amount {
        group.budget_amount = Some(a);
    }
    group.budget_currency = currency.unwrap_or(DEFAULT_CURRENCY).to_string();
    group.updated_at = Utc::now();
    Ok(group.clone())
}

pub(super) fn admin_login(
    exchange: &Exchange,
    group_id: &GroupId,
    password: &str,
) -> Result<Session, ExchangeError> {
    if password.is_empty() {
        return Err(ExchangeError::validation("Password is required"));
    }
    let config = exchange
        .registry
        .admin_config(group_id)
        .ok_or(ExchangeError::NotFound("Group not found"))?;
    let group = util::group(&exchange.registry, group_id)?;

    if !exchange.hasher.verify(password, &config.hashed_password)? {
        return Err(ExchangeError::Unauthorized("Invalid password"));
    }
    Ok(Session {
        group_id: group.id.clone(),
        group_name: group.name.clone(),
        person_id: None,
        person_name: None,
        method: LoginMethod::Admin,
    })
}
