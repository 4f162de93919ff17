//! Async Client for the Access-Controller Wire Protocol
//!
//! [`Client`] dispatches one async method per protocol operation (§4 of the
//! wire format), normalising the controller reference, encoding the request
//! with `doorctl-proto`, selecting a transport from `doorctl-transport`, and
//! decoding/validating the reply. See `doorctl-transport::listener` for the
//! unsolicited event side, which this crate does not wrap - a listener is
//! long-lived and has no per-call request/reply shape to dispatch.
//!
//! ```no_run
//! use doorctl_client::{Client, ClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::default());
//! let info = client.get_controller(405_419_896u32).await?;
//! println!("{}", info.version.to_display_string());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod config;
mod error;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{DispatcherError, Result};

pub use doorctl_core::{ControllerRef, IntoControllerRef, Protocol};
