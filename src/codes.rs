//! Codes de connexion et d'invitation.
//!
//! Alphabet de 32 symboles sans caractères ambigus (pas de I, O, 0, 1).
//! Les octets viennent d'un générateur cryptographique ; 256 étant un
//! multiple de 32, `octet % 32` reste uniforme.

use rand::RngCore;
use thiserror::Error;

pub const ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const LOGIN_CODE_LEN: usize = 8;
pub const INVITE_CODE_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("code must be {expected} characters long, got {got}")]
    Length { expected: usize, got: usize },
    #[error("invalid character in code: {0:?}")]
    Symbol(char),
}

/// Code personnel de connexion (8 caractères).
pub fn login_code() -> String {
    code_from(&mut rand::rng(), LOGIN_CODE_LEN)
}

/// Code d'invitation de groupe (6 caractères).
pub fn invite_code() -> String {
    code_from(&mut rand::rng(), INVITE_CODE_LEN)
}

/// Code de `len` symboles tirés de `rng`.
pub fn code_from<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| char::from(ALPHABET[usize::from(*b) % ALPHABET.len()]))
        .collect()
}

/// Normalise une saisie utilisateur (espaces, casse) et vérifie longueur et alphabet.
pub fn normalize_code(raw: &str, expected_len: usize) -> Result<String, CodeError> {
    let code = raw.trim().to_ascii_uppercase();
    let got = code.chars().count();
    if got != expected_len {
        return Err(CodeError::Length { expected: expected_len, got });
    }
    if let Some(bad) = code.chars().find(|c| !c.is_ascii() || !ALPHABET.contains(&(*c as u8))) {
        return Err(CodeError::Symbol(bad));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn codes_have_expected_shape() {
        for _ in 0..200 {
            let login = login_code();
            let invite = invite_code();
            assert_eq!(login.len(), LOGIN_CODE_LEN);
            assert_eq!(invite.len(), INVITE_CODE_LEN);
            assert!(login.bytes().chain(invite.bytes()).all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn alphabet_avoids_ambiguous_glyphs() {
        for c in [b'I', b'O', b'0', b'1'] {
            assert!(!ALPHABET.contains(&c));
        }
        let mut sorted = ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 32);
    }

    #[test]
    fn every_symbol_is_reachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let code = code_from(&mut rng, 4096);
        for b in ALPHABET.iter() {
            assert!(code.as_bytes().contains(b), "missing {}", char::from(*b));
        }
    }

    #[test]
    fn normalize_accepts_lowercase_and_spaces() {
        assert_eq!(normalize_code(" abc234 ", 6).unwrap(), "ABC234");
    }

    #[test]
    fn normalize_rejects_bad_input() {
        assert_eq!(
            normalize_code("ABC", 6),
            Err(CodeError::Length { expected: 6, got: 3 })
        );
        assert_eq!(normalize_code("ABCDE0", 6), Err(CodeError::Symbol('0')));
        assert_eq!(normalize_code("ABCDÉF", 6), Err(CodeError::Symbol('É')));
    }
}
