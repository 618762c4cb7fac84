//! Status-code classification for storm API responses.
//!
//! [`classify`] is a total function from status code to [`StatusClass`];
//! [`check_status`] turns the failing classes into [`LookupError`]s so the
//! transport stays focused on moving bytes.
//!
//! 401 is deliberately *not* an error here: session expiry is a batch-level
//! concern, and the orchestrator inspects the returned response instead.

use vtx_core::LookupError;

use crate::request::RawResponse;

/// Retry-After fallback when the header is absent or unparseable.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    AuthExpired,
    BadRequest,
    Forbidden,
    NotFound,
    RateLimited,
    ServerUnavailable,
    Unexpected,
}

/// Classify a status code.
///
/// | Status | Class |
/// |---|---|
/// | 200, 201, 202 | `Success` |
/// | 400 | `BadRequest` |
/// | 401 | `AuthExpired` |
/// | 403 | `Forbidden` |
/// | 404 | `NotFound` |
/// | 429 | `RateLimited` |
/// | any 5xx | `ServerUnavailable` |
/// | anything else | `Unexpected` |
#[must_use]
pub const fn classify(status: u16) -> StatusClass {
    match status {
        200..=202 => StatusClass::Success,
        400 => StatusClass::BadRequest,
        401 => StatusClass::AuthExpired,
        403 => StatusClass::Forbidden,
        404 => StatusClass::NotFound,
        429 => StatusClass::RateLimited,
        500..=599 => StatusClass::ServerUnavailable,
        _ => StatusClass::Unexpected,
    }
}

/// Check a response for error conditions.
///
/// Returns the response unchanged for `Success` and `AuthExpired`.
///
/// # Errors
///
/// - 400, 404, 429 and unexpected statuses → [`LookupError::Request`]
/// - 403 → [`LookupError::Auth`]
/// - 5xx → [`LookupError::Network`]
pub fn check_status(resp: RawResponse, url: &str) -> Result<RawResponse, LookupError> {
    let status = resp.status;
    let request_error = |message: String, retry_after_secs: Option<u64>| LookupError::Request {
        message,
        url: Some(url.to_string()),
        status,
        retry_after_secs,
    };

    match classify(status) {
        StatusClass::Success | StatusClass::AuthExpired => Ok(resp),
        StatusClass::BadRequest => Err(request_error("Invalid Request (400)".into(), None)),
        StatusClass::NotFound => Err(request_error("Not Found (404)".into(), None)),
        StatusClass::RateLimited => Err(request_error(
            "API Limit Reached (429)".into(),
            Some(parse_retry_after(&resp)),
        )),
        StatusClass::Unexpected => Err(request_error(
            format!("Unexpected response status ({status})"),
            None,
        )),
        StatusClass::Forbidden => Err(LookupError::auth(
            "Check that your Vertex credentials are valid and have the required permissions (403)",
        )),
        StatusClass::ServerUnavailable => Err(LookupError::Network {
            message: format!("The server you are trying to connect to is unavailable ({status})"),
            url: Some(url.to_string()),
            status: Some(status),
        }),
    }
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &RawResponse) -> u64 {
    resp.header("retry-after")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const URL: &str = "https://vertex.local/api/v1/storm";

    #[test]
    fn classification_table() {
        let table = [
            (200, StatusClass::Success),
            (201, StatusClass::Success),
            (202, StatusClass::Success),
            (400, StatusClass::BadRequest),
            (401, StatusClass::AuthExpired),
            (403, StatusClass::Forbidden),
            (404, StatusClass::NotFound),
            (429, StatusClass::RateLimited),
            (500, StatusClass::ServerUnavailable),
            (502, StatusClass::ServerUnavailable),
            (503, StatusClass::ServerUnavailable),
            (504, StatusClass::ServerUnavailable),
            (204, StatusClass::Unexpected),
            (302, StatusClass::Unexpected),
            (418, StatusClass::Unexpected),
        ];
        for (status, class) in table {
            assert_eq!(classify(status), class, "status {status}");
        }
    }

    #[test]
    fn success_and_401_pass_through() {
        assert!(check_status(RawResponse::new(200, "ok"), URL).is_ok());
        let resp = check_status(RawResponse::new(401, "expired"), URL).unwrap();
        assert!(resp.is_auth_expired());
    }

    #[test]
    fn bad_request_is_request_error() {
        let err = check_status(RawResponse::new(400, ""), URL).unwrap_err();
        assert!(matches!(err, LookupError::Request { status: 400, .. }));
    }

    #[test]
    fn not_found_is_request_error() {
        let err = check_status(RawResponse::new(404, ""), URL).unwrap_err();
        assert!(matches!(err, LookupError::Request { status: 404, .. }));
    }

    #[test]
    fn forbidden_is_auth_error() {
        let err = check_status(RawResponse::new(403, ""), URL).unwrap_err();
        assert!(matches!(err, LookupError::Auth { .. }));
    }

    #[test]
    fn server_errors_are_network_errors() {
        for status in [500, 502, 504] {
            let err = check_status(RawResponse::new(status, ""), URL).unwrap_err();
            assert!(err.is_transient(), "status {status}");
        }
    }

    #[test]
    fn rate_limited_with_header() {
        let resp = RawResponse::new(429, "").with_header("Retry-After", "30");
        let err = check_status(resp, URL).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Request {
                status: 429,
                retry_after_secs: Some(30),
                ..
            }
        ));
    }

    #[test]
    fn rate_limited_default() {
        let resp = RawResponse::new(429, "").with_header("Retry-After", "not-a-number");
        let err = check_status(resp, URL).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Request {
                retry_after_secs: Some(60),
                ..
            }
        ));
    }
}
