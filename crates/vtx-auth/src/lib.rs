//! # vtx-auth
//!
//! Vertex session management.
//!
//! Logs in through `POST /api/v1/optic/login`, caches the returned session
//! cookie per credential fingerprint for 24 hours, retries transient login
//! failures with a fixed delay, and forces a fresh login when a batch reports
//! an expired session.

pub mod cache;
pub mod controller;

pub use cache::{DEFAULT_TTL, Session, SessionCache, SessionCacheKey};
pub use controller::{AuthController, AuthState, Credentials, RetryPolicy, session_token};
