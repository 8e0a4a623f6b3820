//! Cookie Transport
//!
//! Builds `Set-Cookie` values for the token cookies and reads them back
//! from `Cookie` headers.

use std::fmt::Write;

use axum::http::{HeaderMap, HeaderValue, header};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes of one named cookie
///
/// A cookie is identified by its name *and* path: clearing must use the
/// same path it was set with, or the browser keeps the original.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    pub fn build_set_cookie(&self, value: &str) -> String {
        self.render(value, self.max_age_secs, false)
    }

    /// Empty value, `Max-Age=0` and an epoch `Expires`
    pub fn build_delete_cookie(&self) -> String {
        self.render("", Some(0), true)
    }

    fn render(&self, value: &str, max_age: Option<i64>, expire: bool) -> String {
        let mut cookie = format!("{}={}", self.name, value);
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        // Writing into a String cannot fail
        let _ = write!(
            cookie,
            "; SameSite={}; Path={}",
            self.same_site.as_str(),
            self.path
        );
        if let Some(max_age) = max_age {
            let _ = write!(cookie, "; Max-Age={max_age}");
        }
        if expire {
            cookie.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        }
        cookie
    }
}

/// Value of cookie `name`, searched across every `Cookie` header
///
/// Empty values count as absent.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value; a value that cannot be a header renders empty
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> HeaderValue {
    to_header(config.build_set_cookie(value))
}

pub fn delete_cookie_header(config: &CookieConfig) -> HeaderValue {
    to_header(config.build_delete_cookie())
}

fn to_header(cookie: String) -> HeaderValue {
    HeaderValue::try_from(cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refresh_cookie() -> CookieConfig {
        CookieConfig {
            name: "refreshToken".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            path: "/auth/refresh".to_string(),
            max_age_secs: Some(2_592_000),
        }
    }

    #[test]
    fn test_set_cookie_attributes() {
        assert_eq!(
            refresh_cookie().build_set_cookie("r.t.k"),
            "refreshToken=r.t.k; HttpOnly; Secure; SameSite=Strict; Path=/auth/refresh; Max-Age=2592000"
        );
    }

    #[test]
    fn test_insecure_cookie_omits_secure() {
        let cookie = CookieConfig {
            secure: false,
            ..refresh_cookie()
        }
        .build_set_cookie("v");
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_delete_cookie_keeps_path() {
        assert_eq!(
            refresh_cookie().build_delete_cookie(),
            "refreshToken=; HttpOnly; Secure; SameSite=Strict; Path=/auth/refresh; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; accessToken=a.b.c; lang=ja"),
        );

        assert_eq!(extract_cookie(&headers, "accessToken").as_deref(), Some("a.b.c"));
        assert_eq!(extract_cookie(&headers, "lang").as_deref(), Some("ja"));
        assert_eq!(extract_cookie(&headers, "refreshToken"), None);
    }

    #[test]
    fn test_extract_cookie_across_headers_and_empty_value() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("accessToken="));
        headers.append(header::COOKIE, HeaderValue::from_static("refreshToken=r1"));

        assert_eq!(extract_cookie(&headers, "accessToken"), None);
        assert_eq!(extract_cookie(&headers, "refreshToken").as_deref(), Some("r1"));
    }
}
