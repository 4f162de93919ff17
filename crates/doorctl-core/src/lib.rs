//! Shared Plumbing for the Doorctl Client
//!
//! Controller-reference normalisation, address parsing, and the
//! configuration-level error type used before a request ever reaches a
//! transport. Kept free of any socket or codec dependency beyond
//! `doorctl-proto` so that `doorctl-transport` and `doorctl-client` can
//! both depend on it without a cycle.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod controller;
pub mod error;
pub mod net;

pub use controller::{ControllerRef, IntoControllerRef, Protocol};
pub use error::{ConfigError, Result};
pub use doorctl_proto::hex_dump;
