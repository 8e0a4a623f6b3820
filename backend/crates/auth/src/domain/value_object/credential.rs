//! Token Payloads
//!
//! What the access and refresh tokens carry. The registered claims
//! (`aud`, `iat`, `exp`) are added by `platform::token`.

use kernel::id::{IdentityId, SessionId};
use serde::{Deserialize, Serialize};

/// Access token payload: `{"userId": .., "sessionId": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: IdentityId,
    pub session_id: SessionId,
}

/// Refresh token payload: `{"sessionId": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub session_id: SessionId,
}

/// Freshly minted tokens for one session
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
