//! Display Name Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

pub const DISPLAY_NAME_MAX_LENGTH: usize = 100;

/// Free-form name shown to other users (any script, trimmed, NFC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(input: impl AsRef<str>) -> AppResult<Self> {
        let value: String = input.as_ref().trim().nfc().collect();

        if value.is_empty() {
            return Err(AppError::bad_request("Display name is required"));
        }

        if value.chars().count() > DISPLAY_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Display name must be at most {} characters",
                DISPLAY_NAME_MAX_LENGTH
            )));
        }

        if value.chars().any(char::is_control) {
            return Err(AppError::bad_request(
                "Display name contains invalid characters",
            ));
        }

        Ok(Self(value))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
