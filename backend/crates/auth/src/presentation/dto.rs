//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::identity::Identity;

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
///
/// Every field defaults to empty so a missing field is reported as a field
/// error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpRequest {
    pub display_name: String,
    pub email: String,
    #[serde(alias = "username")]
    pub user_name: String,
    pub password: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
}

// ============================================================================
// Sign In
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of an Identity (no password hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub user_name: String,
    pub date_of_birth: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.identity_id.to_string(),
            display_name: identity.display_name.to_string(),
            email: identity.email.to_string(),
            user_name: identity.user_name.to_string(),
            date_of_birth: identity.date_of_birth.to_string(),
            created_at: identity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}
