use anyhow::{anyhow, Result};
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::{info, warn};

const DEFAULT_SECRET: &str = "default-secret-change-in-production";
/// Durée de validité maximale d'un lien de connexion (un an).
pub const MAX_MAGIC_EXPIRES_MINUTES: i64 = 525_600;

/// Réglages lus depuis l'environnement.
#[derive(Debug, Clone)]
pub struct Settings {
    pub magic_secret: String,
    pub magic_expires_minutes: i64,
    pub base_url: String,
    pub mail_from: String,
    pub outbox_dir: PathBuf,
    pub bcrypt_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            magic_secret: DEFAULT_SECRET.to_string(),
            magic_expires_minutes: 15,
            base_url: "http://localhost:3001".to_string(),
            mail_from: "Secret Santa <noreply@localhost>".to_string(),
            outbox_dir: PathBuf::from("outbox"),
            bcrypt_cost: 10,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let settings = Self {
            magic_secret: try_load("SANTA_MAGIC_SECRET", defaults.magic_secret)?,
            magic_expires_minutes: try_load(
                "SANTA_MAGIC_EXPIRES_MINUTES",
                defaults.magic_expires_minutes,
            )?,
            base_url: try_load("SANTA_BASE_URL", defaults.base_url)?,
            mail_from: try_load("SANTA_MAIL_FROM", defaults.mail_from)?,
            outbox_dir: PathBuf::from(try_load(
                "SANTA_OUTBOX",
                defaults.outbox_dir.display().to_string(),
            )?),
            bcrypt_cost: try_load("SANTA_BCRYPT_COST", defaults.bcrypt_cost)?,
        };
        if settings.magic_secret == DEFAULT_SECRET {
            warn!("SANTA_MAGIC_SECRET not set, magic links are signed with the default secret");
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Refuse les durées de lien nulles, négatives ou au-delà d'un an.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_MAGIC_EXPIRES_MINUTES).contains(&self.magic_expires_minutes) {
            return Err(anyhow!(
                "SANTA_MAGIC_EXPIRES_MINUTES must be between 1 and {MAX_MAGIC_EXPIRES_MINUTES}, got {}",
                self.magic_expires_minutes
            ));
        }
        Ok(())
    }
}

fn try_load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key} value: {e}")),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_expiry(minutes: i64) -> Settings {
        Settings {
            magic_expires_minutes: minutes,
            ..Settings::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
        assert!(with_expiry(MAX_MAGIC_EXPIRES_MINUTES).validate().is_ok());
    }

    #[test]
    fn expiry_out_of_range_is_rejected() {
        for minutes in [0, -5, MAX_MAGIC_EXPIRES_MINUTES + 1, i64::MAX] {
            let err = with_expiry(minutes).validate().unwrap_err();
            assert!(err.to_string().contains("SANTA_MAGIC_EXPIRES_MINUTES"), "{minutes}");
        }
    }
}
