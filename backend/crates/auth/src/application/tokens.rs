//! Token Issuance and Verification
//!
//! Binds the generic codec to the two token kinds: access tokens under the
//! access secret, refresh tokens under the refresh secret.

use kernel::id::{IdentityId, SessionId};

use crate::application::config::AuthConfig;
use crate::domain::value_object::credential::{AccessClaims, RefreshClaims, TokenPair};
use crate::error::AuthResult;

pub fn issue_access_token(
    config: &AuthConfig,
    identity_id: IdentityId,
    session_id: SessionId,
) -> AuthResult<String> {
    let claims = AccessClaims {
        user_id: identity_id,
        session_id,
    };
    Ok(config
        .codec()
        .sign(&claims, &config.access_token_secret, config.access_token_ttl)?)
}

pub fn issue_token_pair(
    config: &AuthConfig,
    identity_id: IdentityId,
    session_id: SessionId,
) -> AuthResult<TokenPair> {
    let access_token = issue_access_token(config, identity_id, session_id)?;
    let refresh_token = config.codec().sign(
        &RefreshClaims { session_id },
        &config.refresh_token_secret,
        config.refresh_token_ttl,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Stateless: signature, expiry and audience only
pub fn verify_access_token(config: &AuthConfig, token: &str) -> AuthResult<AccessClaims> {
    Ok(config
        .codec()
        .verify(token, &config.access_token_secret)?)
}

pub fn verify_refresh_token(config: &AuthConfig, token: &str) -> AuthResult<RefreshClaims> {
    Ok(config
        .codec()
        .verify(token, &config.refresh_token_secret)?)
}
