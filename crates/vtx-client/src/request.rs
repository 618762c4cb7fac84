//! Request descriptors and raw responses exchanged with the transport.
//!
//! Descriptors are immutable values: headers (including the session cookie)
//! are fixed when the descriptor is built, so nothing has to be set on a
//! shared client before sending.

use serde_json::{Value, json};
use std::fmt;
use vtx_core::Entity;

pub const LOGIN_PATH: &str = "/api/v1/optic/login";
pub const STORM_PATH: &str = "/api/v1/storm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
        }
    }
}

/// One HTTP call. `entity` is `None` only for the login request.
#[derive(Clone)]
pub struct RequestDescriptor {
    pub entity: Option<Entity>,
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// `POST {base}/api/v1/optic/login` with `{ user, passwd }`.
    #[must_use]
    pub fn login(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            entity: None,
            method: Method::Post,
            url: format!("{}{LOGIN_PATH}", base_url.trim_end_matches('/')),
            body: Some(json!({ "user": username, "passwd": password })),
            headers: json_headers(),
        }
    }

    /// `GET {base}/api/v1/storm` streaming the entity's query as jsonlines.
    #[must_use]
    pub fn storm(base_url: &str, entity: &Entity, cookie: &str, limit: u32) -> Self {
        let mut headers = json_headers();
        headers.push(("Cookie".to_string(), cookie.to_string()));
        Self {
            entity: Some(entity.clone()),
            method: Method::Get,
            url: format!("{}{STORM_PATH}", base_url.trim_end_matches('/')),
            body: Some(json!({
                "query": entity.to_query(),
                "stream": "jsonlines",
                "opts": { "limit": limit },
            })),
            headers,
        }
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Bodies and cookies stay out of debug output: the login body holds the password.
impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("RequestDescriptor")
            .field("entity", &self.entity)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .finish_non_exhaustive()
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ]
}

/// Status, headers, and full body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Header pairs in arrival order; names are lowercase.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    /// All values of a header, case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The backend answered 401: the session is no longer valid.
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        self.status == 401
    }
}
