#![forbid(unsafe_code)]
//! Secret Santa — bibliothèque d'échange de cadeaux locale (sans BD).
//!
//! - Stockage fichier JSON, écriture atomique.
//! - Tirage sans auto-attribution (dérangement), repli déterministe borné.
//! - Codes de connexion / d'invitation, liens magiques signés.
//! - Tout en UTC.

pub mod auth;
pub mod codes;
pub mod config;
pub mod draw;
pub mod exchange;
pub mod io;
pub mod model;
pub mod notification;
pub mod storage;
pub mod wishlist;

pub use auth::{BcryptHasher, LoginMethod, MagicClaims, PasswordHasher, Session, TokenError};
pub use config::Settings;
pub use draw::{generate, generate_with, DrawError, DrawOptions, DrawOutcome, Pairing, Participant};
pub use exchange::{AssignmentView, Exchange, ExchangeError, GroupSummary, LoginView, PersonView};
pub use model::{
    AdminConfig, Assignment, Group, GroupId, Person, PersonId, Registry, WishlistItem,
};
pub use notification::{MagicLinkMail, MailRenderer, Mailer, OutboxMailer, TextMail};
pub use storage::{JsonStorage, Storage};
pub use wishlist::{validate_items, WishlistError, WishlistInput};
