//! Tirage des paires donneur → receveur.
//!
//! Échantillonnage par rejet (mélange de Fisher–Yates puis vérification
//! qu'aucun participant ne s'offre un cadeau), borné par
//! [`DrawOptions::max_attempts`], avec repli déterministe par rotation.

mod shuffle;
mod types;

pub use shuffle::{fisher_yates, is_derangement, rotate_by_one};
pub use types::{DrawError, DrawOptions, DrawOutcome, Pairing, Participant, MIN_PARTICIPANTS};

use crate::model::PersonId;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Tirage avec le générateur cryptographique du thread et les options par défaut.
pub fn generate(people: &[Participant]) -> Result<Vec<Pairing>, DrawError> {
    generate_with(&mut rand::rng(), people, DrawOptions::default()).map(|out| out.pairs)
}

/// Tirage avec une source d'aléa injectée.
///
/// Échoue uniquement si moins de [`MIN_PARTICIPANTS`] participants sont fournis
/// (ou si un identifiant est dupliqué) ; tout autre cas aboutit, au pire via
/// [`rotate_by_one`].
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    people: &[Participant],
    opts: DrawOptions,
) -> Result<DrawOutcome, DrawError> {
    check_participants(people)?;

    let givers: Vec<&PersonId> = people.iter().map(|p| &p.id).collect();
    let mut receivers = givers.clone();

    for attempt in 1..=opts.max_attempts {
        fisher_yates(rng, &mut receivers);
        if is_derangement(&givers, &receivers) {
            debug!(participants = givers.len(), attempt, "draw accepted");
            return Ok(DrawOutcome {
                pairs: pair_up(&givers, &receivers),
                attempts: attempt,
                fallback: false,
            });
        }
    }

    warn!(
        participants = givers.len(),
        attempts = opts.max_attempts,
        "no derangement found by shuffling, using rotation"
    );
    let rotated = rotate_by_one(&givers);
    Ok(DrawOutcome {
        pairs: pair_up(&givers, &rotated),
        attempts: opts.max_attempts,
        fallback: true,
    })
}

/// Vérifie qu'un ensemble de paires est un dérangement complet de `ids`.
pub fn is_valid_set(ids: &[PersonId], pairs: &[Pairing]) -> bool {
    if pairs.len() != ids.len() {
        return false;
    }
    let expected: HashSet<&PersonId> = ids.iter().collect();
    let givers: HashSet<&PersonId> = pairs.iter().map(|p| &p.giver).collect();
    let receivers: HashSet<&PersonId> = pairs.iter().map(|p| &p.receiver).collect();
    expected.len() == ids.len()
        && givers == expected
        && receivers == expected
        && pairs.iter().all(|p| p.giver != p.receiver)
}

fn check_participants(people: &[Participant]) -> Result<(), DrawError> {
    if people.len() < MIN_PARTICIPANTS {
        return Err(DrawError::Infeasible { count: people.len() });
    }
    let mut seen = HashSet::with_capacity(people.len());
    for p in people {
        if !seen.insert(&p.id) {
            return Err(DrawError::DuplicateParticipant(p.id.as_str().to_string()));
        }
    }
    Ok(())
}

fn pair_up(givers: &[&PersonId], receivers: &[&PersonId]) -> Vec<Pairing> {
    givers
        .iter()
        .zip(receivers)
        .map(|(g, r)| Pairing {
            giver: (*g).clone(),
            receiver: (*r).clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn people(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant::new(PersonId::new(format!("p{i}")), format!("Person {i}")))
            .collect()
    }

    fn ids(people: &[Participant]) -> Vec<PersonId> {
        people.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn small_groups_are_infeasible() {
        for n in 0..3 {
            let err = generate(&people(n)).unwrap_err();
            assert_eq!(err, DrawError::Infeasible { count: n });
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut group = people(3);
        group.push(Participant::new(PersonId::new("p1"), "Homonyme"));
        assert!(matches!(
            generate(&group),
            Err(DrawError::DuplicateParticipant(id)) if id == "p1"
        ));
    }

    #[test]
    fn zero_attempts_forces_rotation() {
        let group = people(5);
        let mut rng = StdRng::seed_from_u64(1);
        let out = generate_with(&mut rng, &group, DrawOptions { max_attempts: 0 }).unwrap();
        assert!(out.fallback);
        assert_eq!(out.attempts, 0);
        assert_eq!(out.pairs[0].receiver.as_str(), "p1");
        assert_eq!(out.pairs[4].receiver.as_str(), "p0");
        assert!(is_valid_set(&ids(&group), &out.pairs));
    }

    #[test]
    fn seeded_draw_is_reproducible() {
        let group = people(8);
        let a = generate_with(&mut StdRng::seed_from_u64(42), &group, DrawOptions::default())
            .unwrap();
        let b = generate_with(&mut StdRng::seed_from_u64(42), &group, DrawOptions::default())
            .unwrap();
        assert_eq!(a.pairs, b.pairs);
        assert!(!a.fallback);
        assert!(a.attempts >= 1 && a.attempts <= 100);
    }

    #[test]
    fn input_is_left_untouched() {
        let group = people(6);
        let before = ids(&group);
        let _ = generate(&group).unwrap();
        assert_eq!(ids(&group), before);
    }

    #[test]
    fn valid_set_detects_broken_sets() {
        let group = ids(&people(3));
        let pair = |g: usize, r: usize| Pairing {
            giver: group[g].clone(),
            receiver: group[r].clone(),
        };
        assert!(is_valid_set(&group, &[pair(0, 1), pair(1, 2), pair(2, 0)]));
        assert!(!is_valid_set(&group, &[pair(0, 0), pair(1, 2), pair(2, 1)]));
        assert!(!is_valid_set(&group, &[pair(0, 1), pair(1, 0), pair(2, 0)]));
        assert!(!is_valid_set(&group, &[pair(0, 1), pair(1, 2)]));
    }
}
