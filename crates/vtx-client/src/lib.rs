//! # vtx-client
//!
//! Storm API plumbing for Vertex lookups:
//! - [`Transport`]: execute one request, classify its status ([`status`])
//! - [`dispatch()`]: run a batch with bounded concurrency, order preserved
//! - [`stream`]: turn `jsonlines` bodies into node records and outcomes
//!
//! Requests are described by immutable [`RequestDescriptor`] values; the
//! reqwest-backed [`HttpTransport`] is configured once from
//! `vtx_config::RequestConfig`.

pub mod dispatch;
pub mod request;
pub mod status;
pub mod stream;
pub mod transport;

pub use dispatch::{DEFAULT_CONCURRENCY, dispatch};
pub use request::{Method, RawResponse, RequestDescriptor};
pub use status::{StatusClass, check_status, classify};
pub use stream::{parse_body, parse_responses};
pub use transport::{HttpTransport, Transport};
