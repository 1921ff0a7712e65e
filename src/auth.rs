use crate::model::{GroupId, PersonId};
use anyhow::Context;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;
const TOKEN_VERSION_V1: &str = "v1";
const MAX_TOKEN_LEN: usize = 2048;

pub const MIN_ADMIN_PASSWORD_LEN: usize = 6;

/// Hachage des mots de passe administrateur.
pub trait PasswordHasher {
    fn hash(&self, password: &str) -> anyhow::Result<String>;
    fn verify(&self, password: &str, hashed: &str) -> anyhow::Result<bool>;
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    pub cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: 10 }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> anyhow::Result<String> {
        bcrypt::hash(password, self.cost).context("hashing admin password")
    }

    fn verify(&self, password: &str, hashed: &str) -> anyhow::Result<bool> {
        bcrypt::verify(password, hashed).context("verifying admin password")
    }
}

/// Contenu signé d'un lien de connexion par email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicClaims {
    pub person_id: PersonId,
    pub email: String,
    pub group_id: GroupId,
    pub expires_at: DateTime<Utc>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("unsupported token version: {0}")]
    UnsupportedVersion(String),
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Signe les claims : `v1.<payload base64url>.<hmac base64url>`.
pub fn sign_magic_token(claims: &MagicClaims, secret: &[u8]) -> anyhow::Result<String> {
    let payload = serde_json::to_vec(claims).context("encoding magic link claims")?;
    let payload_part = URL_SAFE_NO_PAD.encode(payload);
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| anyhow::anyhow!("initialising hmac: {e}"))?;
    mac.update(payload_part.as_bytes());
    let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{TOKEN_VERSION_V1}.{payload_part}.{sig_part}"))
}

/// Vérifie signature puis expiration.
pub fn verify_magic_token(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<MagicClaims, TokenError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(TokenError::Malformed);
    }
    let (payload_part, sig_part) = match token.split('.').collect::<Vec<_>>().as_slice() {
        [version, payload, sig] if *version == TOKEN_VERSION_V1 => (*payload, *sig),
        [version, _, _] => return Err(TokenError::UnsupportedVersion((*version).to_string())),
        _ => return Err(TokenError::Malformed),
    };

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::Malformed)?;
    mac.update(payload_part.as_bytes());
    let expected = URL_SAFE_NO_PAD
        .decode(sig_part)
        .map_err(|_| TokenError::Malformed)?;
    mac.verify_slice(&expected)
        .map_err(|_| TokenError::BadSignature)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|_| TokenError::Malformed)?;
    let claims: MagicClaims = serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

    if now > claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Mode d'authentification ayant ouvert la session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoginMethod {
    Code,
    MagicLink,
    Admin,
}

/// Session explicite renvoyée après une connexion réussie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub group_id: GroupId,
    pub group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
    pub method: LoginMethod,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &[u8] = b"test-secret";

    fn claims(expires_at: DateTime<Utc>) -> MagicClaims {
        MagicClaims {
            person_id: PersonId::new("p1"),
            email: "alice@example.com".into(),
            group_id: GroupId::new("g1"),
            expires_at,
        }
    }

    #[test]
    fn signed_token_verifies_before_expiry() {
        let now = Utc::now();
        let c = claims(now + Duration::minutes(15));
        let token = sign_magic_token(&c, SECRET).unwrap();
        assert!(token.starts_with("v1."));
        assert_eq!(verify_magic_token(&token, SECRET, now).unwrap(), c);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let token = sign_magic_token(&claims(now - Duration::seconds(1)), SECRET).unwrap();
        assert_eq!(verify_magic_token(&token, SECRET, now), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let now = Utc::now();
        let token = sign_magic_token(&claims(now + Duration::minutes(5)), SECRET).unwrap();
        assert_eq!(
            verify_magic_token(&token, b"other-secret", now),
            Err(TokenError::BadSignature)
        );

        let forged = claims(now + Duration::days(365));
        let forged_part = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let sig = token.rsplit('.').next().unwrap();
        let tampered = format!("v1.{forged_part}.{sig}");
        assert_eq!(
            verify_magic_token(&tampered, SECRET, now),
            Err(TokenError::BadSignature)
        );

        assert_eq!(verify_magic_token("garbage", SECRET, now), Err(TokenError::Malformed));
        assert_eq!(
            verify_magic_token("v2.a.b", SECRET, now),
            Err(TokenError::UnsupportedVersion("v2".into()))
        );
    }

    #[test]
    fn bcrypt_hasher_roundtrip() {
        let hasher = BcryptHasher { cost: 4 };
        let hashed = hasher.hash("sapin2025").unwrap();
        assert!(hasher.verify("sapin2025", &hashed).unwrap());
        assert!(!hasher.verify("mauvais", &hashed).unwrap());
    }
}
