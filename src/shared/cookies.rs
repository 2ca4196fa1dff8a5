//! Minimal cookie helpers for the session and flash cookies.

use axum::http::{header, HeaderMap};
use std::time::Duration;

/// Attributes applied when setting a cookie
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieOptions {
    pub max_age: Option<Duration>,
    pub http_only: bool,
    pub secure: bool,
}

/// Read a cookie value from the request `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Build a `Set-Cookie` value scoped to the whole site with `SameSite=Lax`
pub fn build_cookie(name: &str, value: &str, options: CookieOptions) -> String {
    let mut cookie = format!("{}={}; Path=/; SameSite=Lax", name, value);

    if let Some(max_age) = options.max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age.as_secs()));
    }
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if options.secure {
        cookie.push_str("; Secure");
    }

    cookie
}

/// Build a `Set-Cookie` value that removes the cookie
pub fn expired_cookie(name: &str) -> String {
    format!("{}=; Path=/; SameSite=Lax; Max-Age=0", name)
}
