use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const MIN_ITEMS: usize = 1;
pub const MAX_ITEMS: usize = 5;

/// Saisie brute d'un souhait (avant validation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistInput {
    pub title: String,
    pub link: String,
}

impl WishlistInput {
    pub fn new<T: Into<String>, L: Into<String>>(title: T, link: L) -> Self {
        Self { title: title.into(), link: link.into() }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WishlistError {
    #[error("You must have at least 1 wishlist item")]
    TooFew,
    #[error("You can have a maximum of 5 wishlist items")]
    TooMany,
    #[error("All items must have a title")]
    MissingTitle,
    #[error("All items must have a link")]
    MissingLink,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Valide une liste complète : 1 à 5 éléments, titre et lien non vides, URL absolue.
pub fn validate_items(items: &[WishlistInput]) -> Result<(), WishlistError> {
    if items.len() < MIN_ITEMS {
        return Err(WishlistError::TooFew);
    }
    if items.len() > MAX_ITEMS {
        return Err(WishlistError::TooMany);
    }
    for item in items {
        if item.title.trim().is_empty() {
            return Err(WishlistError::MissingTitle);
        }
        if item.link.trim().is_empty() {
            return Err(WishlistError::MissingLink);
        }
        Url::parse(item.link.trim()).map_err(|_| WishlistError::InvalidUrl(item.link.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, link: &str) -> WishlistInput {
        WishlistInput::new(title, link)
    }

    #[test]
    fn accepts_between_one_and_five() {
        let one = vec![item("Livre", "https://example.com/livre")];
        assert!(validate_items(&one).is_ok());
        let five = vec![item("x", "https://example.com"); 5];
        assert!(validate_items(&five).is_ok());
    }

    #[test]
    fn rejects_counts_out_of_range() {
        assert_eq!(validate_items(&[]), Err(WishlistError::TooFew));
        let six = vec![item("x", "https://example.com"); 6];
        assert_eq!(validate_items(&six), Err(WishlistError::TooMany));
    }

    #[test]
    fn rejects_blank_fields_and_bad_urls() {
        assert_eq!(
            validate_items(&[item("  ", "https://example.com")]),
            Err(WishlistError::MissingTitle)
        );
        assert_eq!(validate_items(&[item("Lampe", "")]), Err(WishlistError::MissingLink));
        let err = validate_items(&[item("Lampe", "pas une url")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL: pas une url");
    }
}
