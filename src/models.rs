use serde::{Deserialize, Serialize};

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    pub fn next(&self) -> HttpMethod {
        match self {
            HttpMethod::GET => HttpMethod::POST,
            HttpMethod::POST => HttpMethod::PUT,
            HttpMethod::PUT => HttpMethod::DELETE,
            HttpMethod::DELETE => HttpMethod::PATCH,
            HttpMethod::PATCH => HttpMethod::HEAD,
            HttpMethod::HEAD => HttpMethod::OPTIONS,
            HttpMethod::OPTIONS => HttpMethod::GET,
        }
    }

    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::POST | HttpMethod::PUT | HttpMethod::PATCH)
    }
}

/// A key/value row in the params or headers editor.
///
/// Query parameters and headers share this shape: an ordered list where order
/// is insertion order, duplicate keys are allowed, and a row can be kept in
/// the list but excluded from the outgoing request by disabling it. The
/// description is editor metadata only and is never serialized into a URL or
/// request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
    pub description: String,
    pub enabled: bool,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValuePair {
            key: key.into(),
            value: value.into(),
            description: String::new(),
            enabled: true,
        }
    }

    /// Empty enabled row, as appended by the "add" action in the editors.
    pub fn blank() -> Self {
        KeyValuePair::new("", "")
    }
}

/// Active authorization scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthKind {
    #[default]
    None,
    Bearer,
    Basic,
    ApiKey,
}

impl AuthKind {
    pub fn label(&self) -> &str {
        match self {
            AuthKind::None => "None",
            AuthKind::Bearer => "Bearer",
            AuthKind::Basic => "Basic",
            AuthKind::ApiKey => "API Key",
        }
    }

    pub fn next(&self) -> AuthKind {
        match self {
            AuthKind::None => AuthKind::Bearer,
            AuthKind::Bearer => AuthKind::Basic,
            AuthKind::Basic => AuthKind::ApiKey,
            AuthKind::ApiKey => AuthKind::None,
        }
    }
}

/// Authorization panel state.
///
/// All fields are retained regardless of the active kind, so switching
/// Bearer -> Basic -> Bearer brings the typed token back. Only the active
/// kind's fields contribute anything to an outgoing request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub kind: AuthKind,
    pub token: String,
    pub username: String,
    pub password: String,
    pub api_key_name: String,
    pub api_key_value: String,
}

/// The editable request model backing the UI.
///
/// Invariant: `url` and `params` are kept mutually consistent under every
/// edit to either side, except that disabled params stay in `params` while
/// being absent from the URL's query string (see the `query` module).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Request {
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<KeyValuePair>,
    pub headers: Vec<KeyValuePair>,
    pub body: String,
    pub auth: AuthState,
}

impl Default for Request {
    fn default() -> Self {
        use crate::constants::DEFAULT_URL;
        use crate::query::parse_params;

        let mut user_agent = KeyValuePair::new("User-Agent", "quiver-tui/0.1");
        user_agent.description = String::from("User agent string");

        Request {
            method: HttpMethod::GET,
            url: String::from(DEFAULT_URL),
            params: parse_params(DEFAULT_URL),
            headers: vec![user_agent],
            body: String::new(),
            auth: AuthState::default(),
        }
    }
}

/// Outcome of a completed send, as rendered in the response panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The server returned an HTTP response, whatever the status code.
    Success {
        status: u16,
        status_text: String,
        headers: Vec<(String, String)>,
        body: String,
        elapsed_ms: u64,
        size_bytes: usize,
    },
    /// The request failed before or while producing a usable response.
    Failure {
        message: String,
        status: Option<u16>,
        status_text: Option<String>,
        body: Option<String>,
        elapsed_ms: u64,
    },
}

impl ResponseOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            ResponseOutcome::Success { status, .. } => Some(*status),
            ResponseOutcome::Failure { status, .. } => *status,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self {
            ResponseOutcome::Success { elapsed_ms, .. } => *elapsed_ms,
            ResponseOutcome::Failure { elapsed_ms, .. } => *elapsed_ms,
        }
    }
}
