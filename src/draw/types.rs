use crate::model::PersonId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Taille minimale d'un groupe pour un tirage.
pub const MIN_PARTICIPANTS: usize = 3;

/// Options de tirage
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    /// Nombre total de mélanges tentés avant le repli déterministe.
    pub max_attempts: u32,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self { max_attempts: 100 }
    }
}

/// Participant au tirage. L'égalité ne porte que sur l'identifiant.
#[derive(Debug, Clone, Eq)]
pub struct Participant {
    pub id: PersonId,
    pub name: String,
}

impl Participant {
    pub fn new<N: Into<String>>(id: PersonId, name: N) -> Self {
        Self { id, name: name.into() }
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Une paire donneur → receveur (`giver != receiver`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub giver: PersonId,
    pub receiver: PersonId,
}

/// Résultat d'un tirage, avec le chemin emprunté.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub pairs: Vec<Pairing>,
    /// Mélanges effectués (égal à `max_attempts` en cas de repli).
    pub attempts: u32,
    /// `true` si la rotation déterministe a été utilisée.
    pub fallback: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("infeasible draw: {count} participant(s), at least 3 required")]
    Infeasible { count: usize },
    #[error("duplicate participant id: {0}")]
    DuplicateParticipant(String),
}
