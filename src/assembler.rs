//! Request assembler - turns the editable request model into a concrete
//! request descriptor, or a validation error when no request should go out.

use std::time::Duration;

use base64::Engine;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::constants::REQUEST_TIMEOUT_MS;
use crate::models::{AuthKind, AuthState, HttpMethod, Request};

/// Validation failures surfaced inline before any request is issued.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("URL is required")]
    EmptyUrl,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Body payload of an assembled request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    /// Body text that parsed as JSON; sent as the parsed value.
    Json(Value),
    /// Anything else; sent verbatim with no implied content type.
    Text(String),
}

/// Fully resolved request, ready for transport.
///
/// Headers have last-write-wins already applied and keep insertion order.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout: Duration,
}

/// Build a [`RequestDescriptor`] from the current request model.
///
/// A URL without a scheme is retried with an `https://` prefix. Enabled
/// headers are folded first (duplicate keys overwrite in place), then auth
/// contributes its header only if the name is not already taken, then a
/// JSON body may inject `Content-Type` if none is set.
pub fn assemble(request: &Request) -> Result<RequestDescriptor, AssembleError> {
    let trimmed = request.url.trim();
    if trimmed.is_empty() {
        return Err(AssembleError::EmptyUrl);
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    let url = Url::parse(&with_scheme)?;

    let mut headers: Vec<(String, String)> = Vec::new();
    for header in &request.headers {
        let key = header.key.trim();
        if header.enabled && !key.is_empty() {
            set_header(&mut headers, key, &header.value);
        }
    }

    apply_auth(&mut headers, &request.auth);

    let body = assemble_body(request, &mut headers);

    Ok(RequestDescriptor {
        method: request.method,
        url,
        headers,
        body,
        timeout: Duration::from_millis(REQUEST_TIMEOUT_MS),
    })
}

/// Insert a header, overwriting an existing exact-match key in place.
fn set_header(headers: &mut Vec<(String, String)>, key: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k == key) {
        Some((_, existing)) => *existing = value.to_string(),
        None => headers.push((key.to_string(), value.to_string())),
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

/// Contribute the active kind's auth header, unless the user already set one
/// of the same name explicitly, or a required field is empty. Fields of
/// inactive kinds are ignored.
fn apply_auth(headers: &mut Vec<(String, String)>, auth: &AuthState) {
    match auth.kind {
        AuthKind::Bearer if !auth.token.is_empty() => {
            if !has_header(headers, "Authorization") {
                headers.push((
                    "Authorization".to_string(),
                    format!("Bearer {}", auth.token),
                ));
            }
        }
        AuthKind::Basic if !auth.username.is_empty() && !auth.password.is_empty() => {
            if !has_header(headers, "Authorization") {
                let credentials = format!("{}:{}", auth.username, auth.password);
                let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
                headers.push(("Authorization".to_string(), format!("Basic {}", encoded)));
            }
        }
        AuthKind::ApiKey if !auth.api_key_name.is_empty() && !auth.api_key_value.is_empty() => {
            if !has_header(headers, &auth.api_key_name) {
                headers.push((auth.api_key_name.clone(), auth.api_key_value.clone()));
            }
        }
        _ => {}
    }
}

/// Attach a body for methods that carry one. Valid JSON is sent as the
/// parsed value and implies `application/json` when no content type is set;
/// anything else goes out as the raw text, unchanged.
fn assemble_body(request: &Request, headers: &mut Vec<(String, String)>) -> Option<RequestBody> {
    if !request.method.has_body() || request.body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(&request.body) {
        Ok(value) => {
            if !has_header(headers, "Content-Type") {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
            }
            Some(RequestBody::Json(value))
        }
        Err(_) => Some(RequestBody::Text(request.body.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyValuePair;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(method: HttpMethod, url: &str) -> Request {
        Request {
            method,
            url: url.to_string(),
            params: Vec::new(),
            headers: Vec::new(),
            body: String::new(),
            auth: AuthState::default(),
        }
    }

    fn header_value<'a>(desc: &'a RequestDescriptor, name: &str) -> Option<&'a str> {
        desc.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn empty_url_is_rejected() {
        let req = request(HttpMethod::GET, "   ");
        assert!(matches!(assemble(&req), Err(AssembleError::EmptyUrl)));
    }

    #[test]
    fn unparseable_url_is_rejected() {
        let req = request(HttpMethod::GET, "http://");
        assert!(matches!(assemble(&req), Err(AssembleError::InvalidUrl(_))));
    }

    #[test]
    fn missing_scheme_defaults_to_https() {
        let desc = assemble(&request(HttpMethod::GET, "api.example.com/users")).unwrap();
        assert_eq!(desc.url.as_str(), "https://api.example.com/users");
    }

    #[test]
    fn explicit_http_scheme_is_kept() {
        let desc = assemble(&request(HttpMethod::GET, "http://localhost:8000/")).unwrap();
        assert_eq!(desc.url.scheme(), "http");
    }

    #[test]
    fn timeout_is_fixed_at_thirty_seconds() {
        let desc = assemble(&request(HttpMethod::GET, "https://x.com")).unwrap();
        assert_eq!(desc.timeout, Duration::from_secs(30));
    }

    #[test]
    fn headers_fold_last_write_wins_in_place() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        req.headers = vec![
            KeyValuePair::new("Accept", "text/html"),
            KeyValuePair::new("X-Trace", "1"),
            KeyValuePair::new("Accept", "application/json"),
        ];
        let desc = assemble(&req).unwrap();
        assert_eq!(
            desc.headers,
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("X-Trace".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn disabled_and_keyless_headers_are_skipped() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        let mut off = KeyValuePair::new("X-Off", "1");
        off.enabled = false;
        req.headers = vec![off, KeyValuePair::new("  ", "no key")];
        let desc = assemble(&req).unwrap();
        assert_eq!(desc.headers, vec![]);
    }

    #[test]
    fn bearer_auth_sets_authorization() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        req.auth.kind = AuthKind::Bearer;
        req.auth.token = "tok123".to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(header_value(&desc, "Authorization"), Some("Bearer tok123"));
    }

    #[test]
    fn empty_bearer_token_contributes_nothing() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        req.auth.kind = AuthKind::Bearer;
        let desc = assemble(&req).unwrap();
        assert_eq!(header_value(&desc, "Authorization"), None);
    }

    #[test]
    fn basic_auth_encodes_credentials() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        req.auth.kind = AuthKind::Basic;
        req.auth.username = "u".to_string();
        req.auth.password = "p".to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(header_value(&desc, "Authorization"), Some("Basic dTpw"));
    }

    #[test]
    fn basic_auth_requires_both_fields() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        req.auth.kind = AuthKind::Basic;
        req.auth.username = "u".to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(header_value(&desc, "Authorization"), None);
    }

    #[test]
    fn api_key_auth_sets_named_header() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        req.auth.kind = AuthKind::ApiKey;
        req.auth.api_key_name = "X-Api-Key".to_string();
        req.auth.api_key_value = "secret".to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(header_value(&desc, "X-Api-Key"), Some("secret"));
    }

    #[test]
    fn inactive_kind_fields_send_nothing() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        // Token typed while Bearer was active, then switched back to None
        req.auth.token = "tok123".to_string();
        req.auth.kind = AuthKind::None;
        let desc = assemble(&req).unwrap();
        assert_eq!(header_value(&desc, "Authorization"), None);
    }

    #[test]
    fn auth_does_not_overwrite_explicit_header() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        req.headers = vec![KeyValuePair::new("Authorization", "custom")];
        req.auth.kind = AuthKind::Bearer;
        req.auth.token = "tok".to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(desc.headers.len(), 1);
        assert_eq!(header_value(&desc, "Authorization"), Some("custom"));
    }

    #[test]
    fn json_body_is_parsed_and_content_type_injected() {
        let mut req = request(HttpMethod::POST, "https://x.com");
        req.body = r#"{"a":1}"#.to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(desc.body, Some(RequestBody::Json(json!({"a": 1}))));
        assert_eq!(header_value(&desc, "Content-Type"), Some("application/json"));
    }

    #[test]
    fn json_body_respects_existing_content_type() {
        let mut req = request(HttpMethod::POST, "https://x.com");
        req.headers = vec![KeyValuePair::new("content-type", "application/vnd.api+json")];
        req.body = r#"{"a":1}"#.to_string();
        let desc = assemble(&req).unwrap();
        // Case-insensitive check: no second Content-Type header appears.
        assert_eq!(desc.headers.len(), 1);
        assert_eq!(
            header_value(&desc, "Content-Type"),
            Some("application/vnd.api+json")
        );
    }

    #[test]
    fn non_json_body_is_sent_verbatim() {
        let mut req = request(HttpMethod::POST, "https://x.com");
        req.body = "not json".to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(desc.body, Some(RequestBody::Text("not json".to_string())));
        assert_eq!(header_value(&desc, "Content-Type"), None);
    }

    #[test]
    fn get_never_carries_a_body() {
        let mut req = request(HttpMethod::GET, "https://x.com");
        req.body = r#"{"a":1}"#.to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(desc.body, None);
    }

    #[test]
    fn whitespace_body_is_no_body() {
        let mut req = request(HttpMethod::POST, "https://x.com");
        req.body = "   \n".to_string();
        let desc = assemble(&req).unwrap();
        assert_eq!(desc.body, None);
    }
}
