//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::token::{TokenCodec, TokenSecret};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signs access tokens
    pub access_token_secret: TokenSecret,
    /// Signs refresh tokens (must differ from the access secret)
    pub refresh_token_secret: TokenSecret,
    /// `aud` claim written into and required of every token
    pub token_audience: String,
    /// Access token lifetime (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (30 days)
    pub refresh_token_ttl: Duration,
    /// Session lifetime, also the Max-Age of both cookies (30 days)
    pub session_ttl: Duration,
    /// Access token cookie name
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Path the refresh cookie is scoped to (the refresh route)
    pub refresh_cookie_path: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Gate also requires the session to still exist
    pub strict_session_check: bool,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: TokenSecret::random(),
            refresh_token_secret: TokenSecret::random(),
            token_audience: "classroom".to_string(),
            access_token_ttl: Duration::from_secs(15 * 60), // 15 minutes
            refresh_token_ttl: Duration::from_secs(30 * 24 * 3600), // 30 days
            session_ttl: Duration::from_secs(30 * 24 * 3600), // 30 days
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            refresh_cookie_path: "/auth/refresh".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            strict_session_check: false,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with the given signing secrets
    pub fn with_secrets(access: TokenSecret, refresh: TokenSecret) -> Self {
        Self {
            access_token_secret: access,
            refresh_token_secret: refresh,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, random secrets)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    pub fn codec(&self) -> TokenCodec {
        TokenCodec::new(self.token_audience.clone())
    }

    /// Session TTL as a chrono duration, for entity timestamps
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::days(30))
    }

    pub fn access_cookie(&self) -> CookieConfig {
        self.cookie(&self.access_cookie_name, "/")
    }

    pub fn refresh_cookie(&self) -> CookieConfig {
        self.cookie(&self.refresh_cookie_name, &self.refresh_cookie_path)
    }

    fn cookie(&self, name: &str, path: &str) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: path.to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
