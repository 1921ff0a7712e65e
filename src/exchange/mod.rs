mod groups;
mod login;
mod pairing;
mod people;
mod types;
mod util;

pub use types::{AssignmentView, ExchangeError, GroupSummary, LoginView, PersonView};

use crate::auth::{BcryptHasher, PasswordHasher, Session};
use crate::config::Settings;
use crate::draw::DrawOptions;
use crate::model::{Assignment, Group, GroupId, Person, PersonId, Registry, WishlistItem};
use crate::notification::{MailRenderer, Mailer};
use crate::wishlist::WishlistInput;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Exchange : encapsule le Registry et les collaborateurs d'authentification.
pub struct Exchange {
    registry: Registry,
    settings: Settings,
    hasher: Box<dyn PasswordHasher>,
}

impl Exchange {
    pub fn new(registry: Registry, settings: Settings) -> Self {
        let hasher = BcryptHasher { cost: settings.bcrypt_cost };
        Self::with_hasher(registry, settings, Box::new(hasher))
    }

    pub fn with_hasher(
        registry: Registry,
        settings: Settings,
        hasher: Box<dyn PasswordHasher>,
    ) -> Self {
        Self { registry, settings, hasher }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn into_registry(self) -> Registry {
        self.registry
    }

    pub fn create_group(
        &mut self,
        name: &str,
        admin_password: &str,
        year: Option<i32>,
    ) -> Result<Group, ExchangeError> {
        groups::create_group(self, name, admin_password, year)
    }

    /// Retrouve un groupe par son code d'invitation (casse indifférente).
    pub fn verify_invite(&self, code: &str) -> Result<Group, ExchangeError> {
        groups::verify_invite(self, code)
    }

    pub fn group_summary(&self, group_id: &GroupId) -> Result<GroupSummary, ExchangeError> {
        groups::group_summary(self, group_id)
    }

    pub fn update_budget(
        &mut self,
        group_id: &GroupId,
        amount: Option<f64>,
        currency: Option<&str>,
    ) -> Result<Group, ExchangeError> {
        groups::update_budget(self, group_id, amount, currency)
    }

    pub fn admin_login(&self, group_id: &GroupId, password: &str) -> Result<Session, ExchangeError> {
        groups::admin_login(self, group_id, password)
    }

    pub fn add_person(
        &mut self,
        group_id: &GroupId,
        name: &str,
        email: Option<&str>,
    ) -> Result<Person, ExchangeError> {
        people::add_person(self, group_id, name, email)
    }

    pub fn list_people(&self, group_id: &GroupId) -> Result<Vec<PersonView>, ExchangeError> {
        people::list_people(self, group_id)
    }

    pub fn delete_person(&mut self, person_id: &PersonId) -> Result<Person, ExchangeError> {
        people::delete_person(self, person_id)
    }

    pub fn set_wishlist(
        &mut self,
        person_id: &PersonId,
        items: &[WishlistInput],
    ) -> Result<Vec<WishlistItem>, ExchangeError> {
        people::set_wishlist(self, person_id, items)
    }

    pub fn login_with_code(&self, group_id: &GroupId, code: &str) -> Result<LoginView, ExchangeError> {
        login::login_with_code(self, group_id, code)
    }

    pub fn request_magic_link(
        &self,
        group_id: &GroupId,
        email: &str,
        now: DateTime<Utc>,
        mailer: &dyn Mailer,
        renderer: &dyn MailRenderer,
    ) -> Result<bool, ExchangeError> {
        login::request_magic_link(self, group_id, email, now, mailer, renderer)
    }

    pub fn verify_magic_link(&self, token: &str, now: DateTime<Utc>) -> Result<Session, ExchangeError> {
        login::verify_magic_link(self, token, now)
    }

    /// Tirage avec le générateur du thread ; `year` vaut l'année courante par défaut.
    pub fn generate_assignments(
        &mut self,
        group_id: &GroupId,
        year: Option<i32>,
    ) -> Result<Vec<Assignment>, ExchangeError> {
        pairing::generate_assignments(self, &mut rand::rng(), group_id, year, DrawOptions::default())
    }

    pub fn generate_assignments_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        group_id: &GroupId,
        year: Option<i32>,
        opts: DrawOptions,
    ) -> Result<Vec<Assignment>, ExchangeError> {
        pairing::generate_assignments(self, rng, group_id, year, opts)
    }

    pub fn list_assignments(
        &self,
        group_id: &GroupId,
        year: Option<i32>,
    ) -> Result<Vec<AssignmentView>, ExchangeError> {
        pairing::list_assignments(self, group_id, year)
    }

    pub fn clear_assignments(
        &mut self,
        group_id: &GroupId,
        year: Option<i32>,
    ) -> Result<usize, ExchangeError> {
        pairing::clear_assignments(self, group_id, year)
    }
}
