use super::{util, AssignmentView, Exchange, ExchangeError};
use crate::draw::{self, DrawError, DrawOptions, Participant};
use crate::model::{Assignment, AssignmentId, GroupId, PersonId, Registry};
use anyhow::anyhow;
use chrono::Utc;
use rand::Rng;
use tracing::info;

/// Tire et enregistre les paires d'un (groupe, année), au plus une fois.
pub(super) fn generate_assignments<R: Rng + ?Sized>(
    exchange: &mut Exchange,
    rng: &mut R,
    group_id: &GroupId,
    year: Option<i32>,
    opts: DrawOptions,
) -> Result<Vec<Assignment>, ExchangeError> {
    util::group(&exchange.registry, group_id)?;
    let year = year.unwrap_or_else(util::current_year);

    if exchange.registry.assignments_for(group_id, year).next().is_some() {
        return Err(ExchangeError::AlreadyGenerated { year });
    }

    let participants: Vec<Participant> = exchange
        .registry
        .people_in(group_id)
        .map(|p| Participant::new(p.id.clone(), p.name.clone()))
        .collect();

    let outcome = draw::generate_with(rng, &participants, opts).map_err(|e| match e {
        DrawError::Infeasible { count } => ExchangeError::NotEnoughParticipants { count },
        other => ExchangeError::Other(anyhow!(other)),
    })?;

    let ids: Vec<PersonId> = participants.into_iter().map(|p| p.id).collect();
    if !draw::is_valid_set(&ids, &outcome.pairs) {
        return Err(anyhow!("draw produced an invalid assignment set").into());
    }

    let created_at = Utc::now();
    let batch: Vec<Assignment> = outcome
        .pairs
        .into_iter()
        .map(|pair| Assignment {
            id: AssignmentId::random(),
            group_id: group_id.clone(),
            giver_id: pair.giver,
            receiver_id: pair.receiver,
            year,
            created_at,
        })
        .collect();

    // lot complet ou rien
    exchange.registry.assignments.extend(batch.iter().cloned());
    info!(
        group = %group_id,
        year,
        count = batch.len(),
        attempts = outcome.attempts,
        fallback = outcome.fallback,
        "assignments generated"
    );
    Ok(batch)
}

/// Paires d'une année, triées par nom du donneur.
pub(super) fn list_assignments(
    exchange: &Exchange,
    group_id: &GroupId,
    year: Option<i32>,
) -> Result<Vec<AssignmentView>, ExchangeError> {
    util::group(&exchange.registry, group_id)?;
    let year = year.unwrap_or_else(util::current_year);
    let mut views: Vec<AssignmentView> = exchange
        .registry
        .assignments_for(group_id, year)
        .filter_map(|a| resolve(&exchange.registry, a))
        .collect();
    views.sort_by(|a, b| a.giver.name.cmp(&b.giver.name));
    Ok(views)
}

pub(super) fn clear_assignments(
    exchange: &mut Exchange,
    group_id: &GroupId,
    year: Option<i32>,
) -> Result<usize, ExchangeError> {
    util::group(&exchange.registry, group_id)?;
    let year = year.unwrap_or_else(util::current_year);
    let before = exchange.registry.assignments.len();
    exchange
        .registry
        .assignments
        .retain(|a| !(&a.group_id == group_id && a.year == year));
    let removed = before - exchange.registry.assignments.len();
    info!(group = %group_id, year, removed, "assignments cleared");
    Ok(removed)
}

pub(super) fn view_for_giver(
    registry: &Registry,
    group_id: &GroupId,
    giver: &PersonId,
    year: i32,
) -> Option<AssignmentView> {
    registry
        .assignments_for(group_id, year)
        .find(|a| &a.giver_id == giver)
        .and_then(|a| resolve(registry, a))
}

fn resolve(registry: &Registry, a: &Assignment) -> Option<AssignmentView> {
    let giver = registry.find_person(&a.giver_id)?;
    let receiver = registry.find_person(&a.receiver_id)?;
    Some(AssignmentView {
        year: a.year,
        giver: giver.clone(),
        receiver: receiver.clone(),
        receiver_wishlist: util::owned_wishlist(registry, &receiver.id),
    })
}
