//! Password Hashing and Verification
//!
//! Argon2id over the NFKC-normalized password, optionally peppered.
//! Clear text is zeroized on drop and never printed.
//!
//! Policy (NIST SP 800-63B): 8 to 128 code points, not blank, no control
//! characters other than tab and newline. Policy applies only when a
//! password is chosen; sign-in input is compared as-is.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("Password must not be blank")]
    EmptyOrWhitespace,

    #[error("Password must not contain control characters")]
    InvalidCharacter,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Argon2 hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is not a PHC string")]
    InvalidHashFormat,
}

fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.trim().is_empty() {
        return Err(PasswordPolicyError::EmptyOrWhitespace);
    }

    // Code points, not bytes
    let actual = password.chars().count();
    if actual < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual,
        });
    }
    if actual > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual,
        });
    }

    if password
        .chars()
        .any(|ch| ch.is_control() && !matches!(ch, '\t' | '\n'))
    {
        return Err(PasswordPolicyError::InvalidCharacter);
    }

    Ok(())
}

/// Clear text password; not `Clone`, zeroized on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// A newly chosen password (sign-up): normalized, then policy-checked
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw);
        check_policy(&password.0)?;
        Ok(password)
    }

    /// A password that is only compared (sign-in)
    ///
    /// A later policy change never locks out an existing account.
    pub fn for_verification(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(pepper) = pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }

    /// Argon2id with a fresh random salt and the crate's default cost
    /// (m=19 MiB, t=2, p=1)
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            phc: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// Argon2id hash in PHC string format, safe to store
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let chosen = ClearTextPassword::new("chalk and board".to_string()).unwrap();
/// let stored = chosen.hash(None).unwrap();
/// let attempt = ClearTextPassword::for_verification("chalk and board".to_string());
/// assert!(stored.verify(&attempt, None));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    phc: String,
}

impl HashedPassword {
    /// Parse a stored hash; rejects anything that is not a PHC string
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { phc })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }

    /// Constant-time comparison inside argon2; any failure is a mismatch
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        PasswordHash::new(&self.phc).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(&password.peppered(pepper), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHOSEN: &str = "Chalkboard-42";

    #[test]
    fn test_policy_rejections() {
        let cases = [
            ("short", "too short"),
            ("          ", "blank"),
            ("abc\u{0007}defgh", "bell character"),
        ];
        for (raw, why) in cases {
            assert!(ClearTextPassword::new(raw.to_string()).is_err(), "{why}");
        }

        assert!(matches!(
            ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1)),
            Err(PasswordPolicyError::TooLong { actual: 129, .. })
        ));
        assert!(matches!(
            ClearTextPassword::new("seven77".to_string()),
            Err(PasswordPolicyError::TooShort { actual: 7, .. })
        ));
    }

    #[test]
    fn test_length_counts_code_points() {
        // 8 code points, 24 bytes
        assert!(ClearTextPassword::new("時間割と黒板消し".to_string()).is_ok());
        assert!(ClearTextPassword::new("tab\tand\nnewline".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let chosen = ClearTextPassword::new(CHOSEN.to_string()).unwrap();
        let stored = chosen.hash(None).unwrap();

        assert!(stored.verify(&ClearTextPassword::for_verification(CHOSEN.into()), None));
        assert!(!stored.verify(&ClearTextPassword::for_verification("chalkboard-42".into()), None));

        // Policy-violating input is just a mismatch
        assert!(!stored.verify(&ClearTextPassword::for_verification("x".into()), None));
    }

    #[test]
    fn test_nfkc_applies_on_both_sides() {
        // Fullwidth digits normalize to ASCII
        let stored = ClearTextPassword::new("Chalkboard-４２".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        assert!(stored.verify(&ClearTextPassword::for_verification(CHOSEN.into()), None));
    }

    #[test]
    fn test_pepper_must_match() {
        let chosen = ClearTextPassword::new(CHOSEN.to_string()).unwrap();
        let stored = chosen.hash(Some(b"pepper-a")).unwrap();

        assert!(stored.verify(&chosen, Some(b"pepper-a")));
        assert!(!stored.verify(&chosen, Some(b"pepper-b")));
        assert!(!stored.verify(&chosen, None));
    }

    #[test]
    fn test_phc_string_restore() {
        let chosen = ClearTextPassword::new(CHOSEN.to_string()).unwrap();
        let phc = chosen.hash(None).unwrap().as_phc_string().to_string();
        assert!(phc.starts_with("$argon2id$"));

        let restored = HashedPassword::from_phc_string(phc).unwrap();
        assert!(restored.verify(&chosen, None));

        assert!(matches!(
            HashedPassword::from_phc_string("plaintext-in-db"),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_debug_never_shows_secrets() {
        let chosen = ClearTextPassword::new(CHOSEN.to_string()).unwrap();
        let stored = chosen.hash(None).unwrap();

        assert_eq!(format!("{chosen:?}"), "ClearTextPassword([REDACTED])");
        assert!(!format!("{stored:?}").contains("argon2"));
    }
}
