//! Credential extraction from an inbound request
//!
//! Sources are tried in a fixed order: header, cookie, query parameter. A
//! source that is disabled in [`AuthConfig`] or absent from the request is
//! skipped. A present, non-empty header decides the outcome on its own.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use crate::config::AuthConfig;

/// Locate the raw token in a request's headers and query string
pub fn extract_token(
    config: &AuthConfig,
    headers: &HeaderMap,
    query: Option<&str>,
) -> Option<String> {
    if let Some(value) = config
        .header_name
        .as_ref()
        .and_then(|name| headers.get(name))
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
    {
        return scheme_token(config, value).map(str::to_string);
    }

    if let Some(token) = config
        .cookie_name
        .as_deref()
        .and_then(|name| cookie_token(headers, name))
    {
        return Some(token);
    }

    config
        .query_name
        .as_deref()
        .and_then(|name| query_token(query?, name))
}

/// Parse `<scheme> <data>` out of the configured header
///
/// Without strict mode a label that is not followed by matching data is
/// returned as the token itself.
fn scheme_token<'a>(config: &AuthConfig, value: &'a str) -> Option<&'a str> {
    let mut parts = value.trim().split(' ');
    let scheme = parts.next().filter(|s| !s.is_empty());
    let data = parts.next().filter(|s| !s.is_empty());

    match (scheme, data) {
        (Some(scheme), Some(data)) if scheme.eq_ignore_ascii_case(&config.scheme) => Some(data),
        (Some(scheme), _) if !config.strict_scheme => Some(scheme),
        _ => None,
    }
}

fn cookie_token(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| cookie_value(cookie, name))
        .map(str::to_string)
}

/// Find `name` in a `key=value; key=value` cookie string, splitting each pair at its first `=`
fn cookie_value<'a>(cookie: &'a str, name: &str) -> Option<&'a str> {
    cookie
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn query_token(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
