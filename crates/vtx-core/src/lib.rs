//! # vtx-core
//!
//! Core types, query derivation, and error types for Vertex storm lookups.
//!
//! This crate provides the foundational types shared across all `vtx` crates:
//! - [`Entity`] and [`EntityType`] as supplied by the host platform
//! - Storm query derivation (`inet:<form> = <value>`)
//! - Parsed node records and per-entity lookup outcomes
//! - Final host-facing lookup results
//! - The `NetworkError` / `RequestError` / `AuthError` taxonomy and its
//!   serializable report form

pub mod entity;
pub mod errors;
pub mod records;
pub mod results;

pub use entity::{Entity, EntityType};
pub use errors::{ErrorReport, LookupError};
pub use records::{LookupOutcome, NodeRecord};
pub use results::{LookupResult, NodeDetails, ResultData};
