//! Signed Token Codec
//!
//! Compact HS256 JWTs carrying an arbitrary serde payload plus three
//! registered claims: `aud` (fixed per codec), `iat` and `exp`.
//!
//! Verification is a pure function of the token and the secret. The checks
//! run in a fixed order and the first failure is reported:
//! 1. structure (three base64url segments, JSON header and claims)
//! 2. signature
//! 3. expiry (no leeway)
//! 4. audience
//!
//! Different secrets produce non-interchangeable tokens, so access and
//! refresh credentials can be rotated independently.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Not a structurally valid token (segments, encoding, JSON, claims)
    #[error("Token is malformed")]
    Malformed,

    /// Signed with a different secret or tampered with
    #[error("Token signature mismatch")]
    SignatureMismatch,

    /// Correctly signed but past its `exp`
    #[error("Token has expired")]
    Expired,

    /// Correctly signed and unexpired, but minted for another audience
    #[error("Token audience mismatch")]
    AudienceMismatch,
}

/// Token construction errors (configuration problems, never retried)
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token secret must not be empty")]
    EmptySecret,

    #[error("Failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

// ============================================================================
// Secret
// ============================================================================

/// HMAC signing secret
///
/// Holds the pre-built encoding and decoding keys. Debug output is redacted.
#[derive(Clone)]
pub struct TokenSecret {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSecret {
    /// Build a secret from raw bytes. Empty secrets are a misconfiguration.
    pub fn new(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }

    /// Generate a random 32-byte secret (development and tests)
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self {
            encoding: EncodingKey::from_secret(&bytes),
            decoding: DecodingKey::from_secret(&bytes),
        }
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenSecret").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Codec
// ============================================================================

#[derive(Serialize, Deserialize)]
struct Claims<P> {
    #[serde(flatten)]
    payload: P,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tokens for a fixed audience
#[derive(Debug, Clone)]
pub struct TokenCodec {
    audience: String,
}

impl TokenCodec {
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
        }
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Sign `payload`, valid for `ttl` from now
    pub fn sign<P: Serialize>(
        &self,
        payload: &P,
        secret: &TokenSecret,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.sign_at(payload, secret, ttl, Utc::now())
    }

    /// Sign `payload` as if issued at `issued_at`
    ///
    /// Same inputs yield the same token.
    pub fn sign_at<P: Serialize>(
        &self,
        payload: &P,
        secret: &TokenSecret,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            payload,
            aud: self.audience.clone(),
            iat,
            exp: iat + ttl.as_secs() as i64,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &secret.encoding,
        )?)
    }

    /// Verify a token and return its payload
    pub fn verify<P: DeserializeOwned>(
        &self,
        token: &str,
        secret: &TokenSecret,
    ) -> Result<P, VerificationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "aud"]);
        validation.set_audience(&[self.audience.as_str()]);

        decode::<Claims<P>>(token, &secret.decoding, &validation)
            .map(|data| data.claims.payload)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature => VerificationError::SignatureMismatch,
                JwtErrorKind::ExpiredSignature => VerificationError::Expired,
                JwtErrorKind::InvalidAudience => VerificationError::AudienceMismatch,
                _ => VerificationError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        user_id: uuid::Uuid,
        session_id: uuid::Uuid,
    }

    fn payload() -> Payload {
        Payload {
            user_id: uuid::Uuid::new_v4(),
            session_id: uuid::Uuid::new_v4(),
        }
    }

    const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);

    #[test]
    fn test_sign_and_verify() {
        let codec = TokenCodec::new("classroom");
        let secret = TokenSecret::random();
        let p = payload();

        let token = codec.sign(&p, &secret, FIFTEEN_MINUTES).unwrap();
        let back: Payload = codec.verify(&token, &secret).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_sign_is_deterministic() {
        let codec = TokenCodec::new("classroom");
        let secret = TokenSecret::new(b"fixed-secret").unwrap();
        let p = payload();
        let at = Utc::now();

        let a = codec.sign_at(&p, &secret, FIFTEEN_MINUTES, at).unwrap();
        let b = codec.sign_at(&p, &secret, FIFTEEN_MINUTES, at).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(TokenSecret::new(b""), Err(TokenError::EmptySecret)));
    }

    #[test]
    fn test_expired_token_reports_expired() {
        let codec = TokenCodec::new("classroom");
        let secret = TokenSecret::random();
        let issued = Utc::now() - chrono::Duration::hours(1);

        let token = codec
            .sign_at(&payload(), &secret, FIFTEEN_MINUTES, issued)
            .unwrap();
        let result = codec.verify::<Payload>(&token, &secret);
        assert_eq!(result.unwrap_err(), VerificationError::Expired);
    }

    #[test]
    fn test_expired_and_wrong_secret_reports_signature_first() {
        let codec = TokenCodec::new("classroom");
        let issued = Utc::now() - chrono::Duration::hours(1);

        let token = codec
            .sign_at(&payload(), &TokenSecret::random(), FIFTEEN_MINUTES, issued)
            .unwrap();
        let result = codec.verify::<Payload>(&token, &TokenSecret::random());
        assert_eq!(result.unwrap_err(), VerificationError::SignatureMismatch);
    }

    #[test]
    fn test_secrets_not_interchangeable() {
        let codec = TokenCodec::new("classroom");
        let access = TokenSecret::new(b"access-secret").unwrap();
        let refresh = TokenSecret::new(b"refresh-secret").unwrap();

        let token = codec.sign(&payload(), &access, FIFTEEN_MINUTES).unwrap();
        let result = codec.verify::<Payload>(&token, &refresh);
        assert_eq!(result.unwrap_err(), VerificationError::SignatureMismatch);
    }

    #[test]
    fn test_audience_mismatch() {
        let secret = TokenSecret::random();
        let token = TokenCodec::new("other-app")
            .sign(&payload(), &secret, FIFTEEN_MINUTES)
            .unwrap();

        let result = TokenCodec::new("classroom").verify::<Payload>(&token, &secret);
        assert_eq!(result.unwrap_err(), VerificationError::AudienceMismatch);
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = TokenCodec::new("classroom");
        let secret = TokenSecret::random();

        for garbage in ["", "abc", "a.b", "a.b.c", "not a token at all"] {
            assert_eq!(
                codec.verify::<Payload>(garbage, &secret).unwrap_err(),
                VerificationError::Malformed,
                "input: {garbage:?}"
            );
        }
    }

    #[test]
    fn test_payload_shape_mismatch_is_malformed() {
        #[derive(Serialize)]
        struct Other {
            something: u32,
        }

        let codec = TokenCodec::new("classroom");
        let secret = TokenSecret::random();
        let token = codec
            .sign(&Other { something: 1 }, &secret, FIFTEEN_MINUTES)
            .unwrap();

        assert_eq!(
            codec.verify::<Payload>(&token, &secret).unwrap_err(),
            VerificationError::Malformed
        );
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = TokenSecret::new(b"super-secret-value").unwrap();
        let debug = format!("{:?}", secret);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("super-secret-value"));
    }
}
