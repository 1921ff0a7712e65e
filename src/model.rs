use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifiant fort pour Group
    GroupId
);
string_id!(
    /// Identifiant fort pour Person
    PersonId
);
string_id!(WishlistItemId);
string_id!(AssignmentId);

/// Devises acceptées pour le budget d'un groupe.
pub const CURRENCIES: [&str; 18] = [
    "USD", "EUR", "GBP", "CAD", "AUD", "ZAR", "JPY", "CHF", "SEK", "NOK", "DKK", "NZD", "MXN",
    "BRL", "INR", "CNY", "KRW", "SGD",
];

pub const DEFAULT_CURRENCY: &str = "USD";

/// Groupe d'échange de cadeaux (une famille, une équipe...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub invite_code: String,
    pub year: i32,
    #[serde(default)]
    pub budget_amount: Option<f64>,
    #[serde(default = "default_currency")]
    pub budget_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Group {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, invite_code: C, year: i32) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::random(),
            name: name.into(),
            invite_code: invite_code.into(),
            year,
            budget_amount: None,
            budget_currency: default_currency(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Mot de passe administrateur (haché) d'un groupe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub group_id: GroupId,
    pub hashed_password: String,
}

/// Participant inscrit dans un groupe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub group_id: GroupId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub login_code: String,
    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn new<N: Into<String>, C: Into<String>>(
        group_id: GroupId,
        name: N,
        email: Option<String>,
        login_code: C,
    ) -> Self {
        Self {
            id: PersonId::random(),
            group_id,
            name: name.into(),
            email,
            login_code: login_code.into(),
            created_at: Utc::now(),
        }
    }
}

/// Élément de liste de souhaits ; `order` commence à 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub person_id: PersonId,
    pub title: String,
    pub link: String,
    pub order: u32,
}

/// Paire donneur → receveur persistée pour un (groupe, année).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub group_id: GroupId,
    pub giver_id: PersonId,
    pub receiver_id: PersonId,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

/// Document complet du magasin (toutes les entités).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Registry {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub admin_configs: Vec<AdminConfig>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub wishlist_items: Vec<WishlistItem>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl Registry {
    pub fn find_group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }
    pub fn find_group_mut(&mut self, id: &GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| &g.id == id)
    }
    pub fn find_group_by_invite(&self, code: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.invite_code == code)
    }
    pub fn admin_config(&self, group_id: &GroupId) -> Option<&AdminConfig> {
        self.admin_configs.iter().find(|a| &a.group_id == group_id)
    }
    pub fn find_person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }
    pub fn people_in(&self, group_id: &GroupId) -> impl Iterator<Item = &Person> + '_ {
        let group_id = group_id.clone();
        self.people.iter().filter(move |p| p.group_id == group_id)
    }
    pub fn find_person_by_email(&self, group_id: &GroupId, email: &str) -> Option<&Person> {
        self.people_in(group_id)
            .find(|p| p.email.as_deref() == Some(email))
    }
    pub fn find_person_by_code(&self, group_id: &GroupId, code: &str) -> Option<&Person> {
        self.people_in(group_id).find(|p| p.login_code == code)
    }
    /// Éléments de la liste d'une personne, triés par `order`.
    pub fn wishlist_of(&self, person_id: &PersonId) -> Vec<&WishlistItem> {
        let mut items: Vec<&WishlistItem> = self
            .wishlist_items
            .iter()
            .filter(|w| &w.person_id == person_id)
            .collect();
        items.sort_by_key(|w| w.order);
        items
    }
    pub fn assignments_for(
        &self,
        group_id: &GroupId,
        year: i32,
    ) -> impl Iterator<Item = &Assignment> + '_ {
        let group_id = group_id.clone();
        self.assignments
            .iter()
            .filter(move |a| a.group_id == group_id && a.year == year)
    }
}
