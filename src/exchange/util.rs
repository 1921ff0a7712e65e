use super::ExchangeError;
use crate::model::{Group, GroupId, Person, PersonId, Registry, WishlistItem};
use chrono::{Datelike, Utc};

pub(super) fn current_year() -> i32 {
    Utc::now().year()
}

/// Tire des codes jusqu'à en trouver un libre.
pub(super) fn unique_code<G, T>(mut generate: G, taken: T) -> String
where
    G: FnMut() -> String,
    T: Fn(&str) -> bool,
{
    loop {
        let code = generate();
        if !taken(&code) {
            return code;
        }
    }
}

pub(super) fn group<'a>(registry: &'a Registry, id: &GroupId) -> Result<&'a Group, ExchangeError> {
    registry
        .find_group(id)
        .ok_or(ExchangeError::NotFound("Group not found"))
}

pub(super) fn person<'a>(
    registry: &'a Registry,
    id: &PersonId,
) -> Result<&'a Person, ExchangeError> {
    registry
        .find_person(id)
        .ok_or(ExchangeError::NotFound("Person not found"))
}

pub(super) fn owned_wishlist(registry: &Registry, id: &PersonId) -> Vec<WishlistItem> {
    registry.wishlist_of(id).into_iter().cloned().collect()
}
