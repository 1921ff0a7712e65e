use super::{util, Exchange, ExchangeError, PersonView};
use crate::codes;
use crate::model::{GroupId, Person, PersonId, WishlistItem, WishlistItemId};
use crate::wishlist::{validate_items, WishlistInput};
use tracing::info;

pub(super) fn add_person(
    exchange: &mut Exchange,
    group_id: &GroupId,
    name: &str,
    email: Option<&str>,
) -> Result<Person, ExchangeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ExchangeError::validation("Name is required"));
    }
    util::group(&exchange.registry, group_id)?;

    let email = email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    if let Some(e) = &email {
        if exchange.registry.find_person_by_email(group_id, e).is_some() {
            return Err(ExchangeError::validation(
                "Email is already used in this group",
            ));
        }
    }

    let registry = &exchange.registry;
    let login_code = util::unique_code(codes::login_code, |c| {
        registry.find_person_by_code(group_id, c).is_some()
    });

    let person = Person::new(group_id.clone(), name, email, login_code);
    exchange.registry.people.push(person.clone());
    info!(group = %group_id, person = %person.id, "person added");
    Ok(person)
}

/// Personnes du groupe, les plus récentes d'abord.
pub(super) fn list_people(
    exchange: &Exchange,
    group_id: &GroupId,
) -> Result<Vec<PersonView>, ExchangeError> {
    util::group(&exchange.registry, group_id)?;
    let mut people: Vec<&Person> = exchange.registry.people_in(group_id).collect();
    people.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(people
        .into_iter()
        .map(|p| PersonView {
            person: p.clone(),
            wishlist: util::owned_wishlist(&exchange.registry, &p.id),
        })
        .collect())
}

/// Supprime une personne, sa liste et toutes les paires qui la citent.
pub(super) fn delete_person(
    exchange: &mut Exchange,
    person_id: &PersonId,
) -> Result<Person, ExchangeError> {
    let person = util::person(&exchange.registry, person_id)?.clone();
    let registry = &mut exchange.registry;
    registry.people.retain(|p| &p.id != person_id);
    registry.wishlist_items.retain(|w| &w.person_id != person_id);
    let before = registry.assignments.len();
    registry
        .assignments
        .retain(|a| &a.giver_id != person_id && &a.receiver_id != person_id);
    info!(
        person = %person_id,
        dropped_assignments = before - registry.assignments.len(),
        "person deleted"
    );
    Ok(person)
}

/// Remplace toute la liste de souhaits d'une personne.
pub(super) fn set_wishlist(
    exchange: &mut Exchange,
    person_id: &PersonId,
    items: &[WishlistInput],
) -> Result<Vec<WishlistItem>, ExchangeError> {
    validate_items(items).map_err(|e| ExchangeError::validation(e.to_string()))?;
    util::person(&exchange.registry, person_id)?;

    let fresh: Vec<WishlistItem> = items
        .iter()
        .zip(0u32..)
        .map(|(item, order)| WishlistItem {
            id: WishlistItemId::random(),
            person_id: person_id.clone(),
            title: item.title.trim().to_string(),
            link: item.link.trim().to_string(),
            order,
        })
        .collect();

    let registry = &mut exchange.registry;
    registry.wishlist_items.retain(|w| &w.person_id != person_id);
    registry.wishlist_items.extend(fresh.iter().cloned());
    Ok(fresh)
}
