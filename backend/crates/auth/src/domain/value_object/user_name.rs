//! User Name Value Object
//!
//! ユーザー名はアカウントの公開ハンドル。サインアップ時に一意性を検証する。
//!
//! ## 処理順
//! NFKC正規化 → trim → 検証 → 小文字化（canonical）
//!
//! ## 不変条件
//! - 長さ: 3〜30文字
//! - 使用可能: a-z, 0-9, `_`, `.`, `-`
//! - 先頭・末尾: 英数字または `_`
//! - 連続ドット禁止
//! - 予約語禁止

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Names that collide with routes or staff roles
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "support",
    "staff",
    "teacher",
    "api",
    "auth",
    "signin",
    "signout",
    "signup",
    "refresh",
    "me",
    "notifications",
    "ws",
    "null",
    "undefined",
    "anonymous",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name is required")]
    Empty,

    #[error("User name must be at least {min} characters")]
    TooShort { min: usize },

    #[error("User name must be at most {max} characters")]
    TooLong { max: usize },

    #[error("User name may only contain a-z, 0-9, '_', '.' and '-' (found '{0}')")]
    InvalidCharacter(char),

    #[error("User name must start and end with a letter, digit or '_'")]
    InvalidBoundary,

    #[error("User name cannot contain consecutive dots")]
    ConsecutiveDots,

    #[error("'{0}' is a reserved user name")]
    Reserved(String),
}

/// Validated user name
///
/// `original` keeps the user's casing for display; `canonical` is the
/// lower-case form used for uniqueness.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original: String = input.as_ref().nfkc().collect::<String>().trim().to_string();
        let canonical = original.to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Restore from storage (assumed already validated)
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_lowercase();
        Self {
            original,
            canonical,
        }
    }

    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    fn validate(canonical: &str) -> Result<(), UserNameError> {
        if canonical.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = canonical.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if let Some(ch) = canonical.chars().find(|&c| !Self::is_valid_char(c)) {
            return Err(UserNameError::InvalidCharacter(ch));
        }

        let boundary_ok = |c: Option<char>| {
            c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        };
        if !boundary_ok(canonical.chars().next()) || !boundary_ok(canonical.chars().next_back()) {
            return Err(UserNameError::InvalidBoundary);
        }

        if canonical.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        if RESERVED_WORDS.iter().any(|&w| w == canonical) {
            return Err(UserNameError::Reserved(canonical.to_string()));
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.original).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_names() {
        for name in ["abc", "Ms_Tanaka", "class-7b", "j.doe", "_x_", "a1b2c3"] {
            assert!(UserName::new(name).is_ok(), "rejected {name:?}");
        }
    }

    #[test]
    fn test_canonical_is_lowercase_original_keeps_case() {
        let name = UserName::new("  Ms_Tanaka ").unwrap();
        assert_eq!(name.original(), "Ms_Tanaka");
        assert_eq!(name.canonical(), "ms_tanaka");
    }

    #[test]
    fn test_nfkc_folds_fullwidth() {
        // Full-width latin letters normalize to ASCII
        let name = UserName::new("ｔａｎａｋａ").unwrap();
        assert_eq!(name.canonical(), "tanaka");
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(UserName::new(""), Err(UserNameError::Empty));
        assert!(matches!(
            UserName::new("ab"),
            Err(UserNameError::TooShort { .. })
        ));
        assert!(matches!(
            UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
            Err(UserNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_shapes() {
        assert_eq!(
            UserName::new("has space"),
            Err(UserNameError::InvalidCharacter(' '))
        );
        assert_eq!(
            UserName::new("名前です"),
            Err(UserNameError::InvalidCharacter('名'))
        );
        assert_eq!(UserName::new(".abc"), Err(UserNameError::InvalidBoundary));
        assert_eq!(UserName::new("abc-"), Err(UserNameError::InvalidBoundary));
        assert_eq!(UserName::new("a..b"), Err(UserNameError::ConsecutiveDots));
    }

    #[test]
    fn test_reserved_is_case_insensitive() {
        assert_eq!(
            UserName::new("Admin"),
            Err(UserNameError::Reserved("admin".to_string()))
        );
    }

    #[test]
    fn test_serde_roundtrip_revalidates() {
        let json = serde_json::to_string(&UserName::new("Ms_Tanaka").unwrap()).unwrap();
        assert_eq!(json, "\"Ms_Tanaka\"");
        assert!(serde_json::from_str::<UserName>("\"a\"").is_err());
    }
}
