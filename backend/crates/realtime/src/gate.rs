//! Handshake Gate
//!
//! A realtime client proves who it is once, in its first frame:
//! `{"auth": {"token": "<access token>"}}`. The token goes through the
//! same [`AccessVerifier`] as HTTP requests, so rejection reasons match.

use auth::application::authenticate::{AccessVerifier, AuthContext, TokenSource};
use auth::domain::repository::SessionRepository;
use auth::error::AuthError;

use crate::event::Handshake;

/// Authenticate a handshake frame
///
/// `None` (no frame arrived) and frames that are not a handshake object
/// both count as a missing token.
pub async fn authenticate_handshake<S>(
    verifier: &AccessVerifier<S>,
    frame: Option<&str>,
) -> Result<AuthContext, AuthError>
where
    S: SessionRepository,
{
    let handshake = frame
        .and_then(|text| serde_json::from_str::<Handshake>(text).ok())
        .unwrap_or_default();

    verifier
        .authenticate(handshake.auth.token.as_deref(), TokenSource::Handshake)
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use auth::application::config::AuthConfig;
    use auth::application::tokens::issue_access_token;
    use auth::InMemoryAuthRepository;
    use kernel::id::{IdentityId, SessionId};

    use super::*;

    fn verifier() -> AccessVerifier<InMemoryAuthRepository> {
        AccessVerifier::new(
            Arc::new(InMemoryAuthRepository::new()),
            Arc::new(AuthConfig::development()),
        )
    }

    #[tokio::test]
    async fn test_missing_frame_or_token() {
        let verifier = verifier();
        for frame in [None, Some("not json"), Some("{}"), Some(r#"{"auth":{}}"#)] {
            let err = authenticate_handshake(&verifier, frame).await.unwrap_err();
            assert!(matches!(err, AuthError::MissingToken), "frame: {frame:?}");
            assert_eq!(err.to_string(), "No token provided");
        }
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let verifier = verifier();
        let err = authenticate_handshake(&verifier, Some(r#"{"auth":{"token":"garbage"}}"#))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[tokio::test]
    async fn test_valid_token() {
        let verifier = verifier();
        let identity_id = IdentityId::new();
        let session_id = SessionId::new();
        let token = issue_access_token(verifier.config(), identity_id, session_id).unwrap();

        let frame = serde_json::json!({"auth": {"token": token}}).to_string();
        let context = authenticate_handshake(&verifier, Some(&frame)).await.unwrap();
        assert_eq!(context.identity_id, identity_id);
        assert_eq!(context.session_id, session_id);
    }
}
