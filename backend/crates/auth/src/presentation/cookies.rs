//! Token Cookies
//!
//! `accessToken` on Path=/ and `refreshToken` scoped to the refresh route.
//! Clearing reuses each cookie's own path.

use axum::http::{HeaderName, HeaderValue, header};
use chrono::{DateTime, Utc};
use axum::response::AppendHeaders;
use platform::cookie::{CookieConfig, delete_cookie_header, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::domain::value_object::credential::TokenPair;

type SetCookies<const N: usize> = AppendHeaders<[(HeaderName, HeaderValue); N]>;

/// Set both token cookies
pub fn attach(config: &AuthConfig, tokens: &TokenPair) -> SetCookies<2> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            set_cookie_header(&config.access_cookie(), &tokens.access_token),
        ),
        (
            header::SET_COOKIE,
            set_cookie_header(&config.refresh_cookie(), &tokens.refresh_token),
        ),
    ])
}

/// Replace only the access cookie (after a refresh)
///
/// `Max-Age` counts down to the session's own expiry, not a fresh TTL.
pub fn attach_access(
    config: &AuthConfig,
    access_token: &str,
    session_expires_at: DateTime<Utc>,
) -> SetCookies<1> {
    let cookie = CookieConfig {
        max_age_secs: Some(remaining_secs(session_expires_at, Utc::now())),
        ..config.access_cookie()
    };
    AppendHeaders([(header::SET_COOKIE, set_cookie_header(&cookie, access_token))])
}

fn remaining_secs(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at - now).num_seconds().max(0)
}

/// Expire both token cookies
pub fn clear(config: &AuthConfig) -> SetCookies<2> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            delete_cookie_header(&config.access_cookie()),
        ),
        (
            header::SET_COOKIE,
            delete_cookie_header(&config.refresh_cookie()),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn set_cookie(headers: SetCookies<1>) -> String {
        let AppendHeaders([(_, value)]) = headers;
        value.to_str().unwrap().to_string()
    }

    #[test]
    fn test_refreshed_access_cookie_ends_with_session() {
        let config = AuthConfig::development();
        let expires_at = Utc::now() + Duration::days(2);

        let cookie = set_cookie(attach_access(&config, "a.b.c", expires_at));
        let max_age: i64 = cookie
            .split("; ")
            .find_map(|attr| attr.strip_prefix("Max-Age="))
            .unwrap()
            .parse()
            .unwrap();

        assert!(max_age <= Duration::days(2).num_seconds());
        assert!(max_age > Duration::days(2).num_seconds() - 60);
        assert!(max_age < config.session_ttl.as_secs() as i64);
    }

    #[test]
    fn test_remaining_secs_never_negative() {
        let now = Utc::now();
        assert_eq!(remaining_secs(now - Duration::seconds(5), now), 0);
        assert_eq!(remaining_secs(now + Duration::seconds(90), now), 90);
    }
}
