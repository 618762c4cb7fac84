//! Auth controller behavior against scripted login responses.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use vtx_auth::{AuthController, AuthState, Credentials, RetryPolicy, SessionCache};
use vtx_client::{RawResponse, RequestDescriptor};
use vtx_core::LookupError;

fn creds() -> Credentials {
    Credentials::new("https://vertex.local", "analyst", "secret")
}

fn login_ok(n: usize) -> RawResponse {
    RawResponse::new(200, r#"{"status":"ok"}"#)
        .with_header("Set-Cookie", &format!("sess=token{n}; Path=/; HttpOnly"))
}

/// Transport that answers each login attempt from `script`, counting calls.
/// Attempts past the end of the script repeat its last entry.
fn scripted(
    script: Vec<u16>,
) -> (
    Arc<impl Fn(&RequestDescriptor) -> Result<RawResponse, LookupError> + Send + Sync + 'static>,
    Arc<AtomicUsize>,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let transport = move |req: &RequestDescriptor| -> Result<RawResponse, LookupError> {
        assert!(req.url.ends_with("/api/v1/optic/login"));
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let status = script[n.min(script.len() - 1)];
        match status {
            0 => Err(LookupError::network("connection refused", Some(&req.url))),
            200 => Ok(login_ok(n + 1)),
            other => Ok(RawResponse::new(other, "")),
        }
    };
    (Arc::new(transport), calls)
}

#[tokio::test]
async fn cached_session_needs_no_network() {
    let (transport, calls) = scripted(vec![200]);
    let cache = Arc::new(SessionCache::default());
    cache.insert(creds().cache_key(), "sess=cached");
    let auth = AuthController::new(transport, Arc::clone(&cache));

    let session = auth.ensure_session(&creds(), false).await.unwrap();

    assert_eq!(session.token, "sess=cached");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_populates_cache_once() {
    let (transport, calls) = scripted(vec![200]);
    let auth = AuthController::new(transport, Arc::new(SessionCache::default()));
    assert_eq!(auth.state(&creds()), AuthState::NoSession);

    let first = auth.ensure_session(&creds(), false).await.unwrap();
    let second = auth.ensure_session(&creds(), false).await.unwrap();

    assert_eq!(first.token, "sess=token1");
    assert_eq!(second.token, "sess=token1");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.state(&creds()), AuthState::Authenticated);
}

#[tokio::test]
async fn force_refresh_discards_cached_session() {
    let (transport, calls) = scripted(vec![200]);
    let cache = Arc::new(SessionCache::default());
    cache.insert(creds().cache_key(), "sess=stale");
    let auth = AuthController::new(transport, Arc::clone(&cache));

    let session = auth.ensure_session(&creds(), true).await.unwrap();

    assert_eq!(session.token, "sess=token1");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        cache.get(&creds().cache_key()).map(|s| s.token),
        Some("sess=token1".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn transient_failures_retry_three_times_one_second_apart() {
    let (transport, calls) = scripted(vec![0]);
    let auth = AuthController::new(transport, Arc::new(SessionCache::default()));

    let started = tokio::time::Instant::now();
    let err = auth.ensure_session(&creds(), false).await.unwrap_err();

    assert!(matches!(err, LookupError::Auth { .. }), "got {err:?}");
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    let elapsed = started.elapsed();
    assert!(
        elapsed >= Duration::from_secs(3) && elapsed < Duration::from_millis(3_100),
        "elapsed {elapsed:?}"
    );
    assert_eq!(auth.state(&creds()), AuthState::NoSession);
}

#[tokio::test]
async fn server_errors_count_as_transient() {
    let (transport, calls) = scripted(vec![502, 500, 200]);
    let auth = AuthController::new(transport, Arc::new(SessionCache::default()))
        .with_retry_policy(RetryPolicy::immediate(3));

    let session = auth.ensure_session(&creds(), false).await.unwrap();

    assert_eq!(session.token, "sess=token3");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn forbidden_login_is_not_retried() {
    let (transport, calls) = scripted(vec![403, 200]);
    let auth = AuthController::new(transport, Arc::new(SessionCache::default()))
        .with_retry_policy(RetryPolicy::immediate(3));

    let err = auth.ensure_session(&creds(), false).await.unwrap_err();

    assert!(matches!(err, LookupError::Auth { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bad_request_login_is_not_retried() {
    let (transport, calls) = scripted(vec![400, 200]);
    let auth = AuthController::new(transport, Arc::new(SessionCache::default()))
        .with_retry_policy(RetryPolicy::immediate(3));

    let err = auth.ensure_session(&creds(), false).await.unwrap_err();

    assert!(matches!(err, LookupError::Request { status: 400, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn login_401_is_an_auth_error() {
    let (transport, calls) = scripted(vec![401, 200]);
    let auth = AuthController::new(transport, Arc::new(SessionCache::default()))
        .with_retry_policy(RetryPolicy::immediate(3));

    let err = auth.ensure_session(&creds(), true).await.unwrap_err();

    assert!(matches!(err, LookupError::Auth { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalidate_returns_to_no_session() {
    let (transport, _calls) = scripted(vec![200]);
    let auth = AuthController::new(transport, Arc::new(SessionCache::default()));
    auth.ensure_session(&creds(), false).await.unwrap();

    auth.invalidate(&creds());

    assert_eq!(auth.state(&creds()), AuthState::NoSession);
}

#[tokio::test]
async fn sessions_are_per_credential() {
    let (transport, calls) = scripted(vec![200]);
    let auth = AuthController::new(transport, Arc::new(SessionCache::default()));
    let other = Credentials::new("https://vertex.local", "responder", "secret");

    auth.ensure_session(&creds(), false).await.unwrap();
    let session = auth.ensure_session(&other, false).await.unwrap();

    assert_eq!(session.token, "sess=token2");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
