use crate::auth::{Session, TokenError};
use crate::model::{Group, Person, WishlistItem};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("Assignments already exist for {year}. Delete them first to regenerate.")]
    AlreadyGenerated { year: i32 },
    #[error("You need at least 3 people to generate Secret Santa assignments (found {count})")]
    NotEnoughParticipants { count: usize },
    #[error("Failed to send email: {0}")]
    Delivery(String),
    #[error("Invalid or expired token: {0}")]
    Token(#[from] TokenError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExchangeError {
    pub(super) fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
}

/// Groupe avec ses compteurs.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group: Group,
    pub people_count: usize,
    pub assignment_count: usize,
}

/// Personne et sa liste de souhaits ordonnée.
#[derive(Debug, Clone, Serialize)]
pub struct PersonView {
    pub person: Person,
    pub wishlist: Vec<WishlistItem>,
}

/// Paire résolue : donneur, receveur et la liste du receveur.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    pub year: i32,
    pub giver: Person,
    pub receiver: Person,
    pub receiver_wishlist: Vec<WishlistItem>,
}

/// Ce que voit un participant après connexion par code.
#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    pub session: Session,
    pub person: Person,
    pub group: Group,
    pub wishlist: Vec<WishlistItem>,
    pub assignment: Option<AssignmentView>,
}
