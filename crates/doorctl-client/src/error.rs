//! Dispatcher-level errors.
//!
//! Wraps the codec and transport error types plus the two kinds of error the
//! dispatcher itself introduces: protocol-mismatch (`InvalidResponse`) and
//! the domain sentinel errors raised only by the "record" operation variants
//! (§4.7).

use doorctl_core::ConfigError;
use doorctl_proto::ProtocolError;
use doorctl_transport::TransportError;
use thiserror::Error;

/// Result alias for dispatcher operations.
pub type Result<T> = std::result::Result<T, DispatcherError>;

/// Errors raised by a [`crate::Client`] operation.
#[derive(Error, Debug)]
pub enum DispatcherError {
    /// Malformed address or invalid controller reference.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Bind/connect/send/receive failure, or a timeout.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reply frame failed to decode (bad SOM, wrong function byte, or an
    /// out-of-range field on the request we were encoding).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The reply's controller serial (or, for record variants, card/profile
    /// id) did not match what the request named.
    #[error("invalid {field} ({value})")]
    InvalidResponse {
        /// Name of the mismatched field (e.g. `"controller"`).
        field: &'static str,
        /// The unexpected value the reply carried.
        value: i64,
    },

    /// `get_card_record`/`get_card_record_by_index`: the card table has no
    /// entry for the requested card (wire sentinel `card == 0`).
    #[error("card not found")]
    CardNotFound,

    /// `get_card_record`/`get_card_record_by_index`: the card was deleted
    /// (wire sentinel `card == 0xFFFFFFFF`).
    #[error("card deleted")]
    CardDeleted,

    /// `get_event_record`: no event exists at the requested index (wire
    /// sentinel `index == 0`).
    #[error("event not found")]
    EventNotFound,

    /// `get_event_record`: the requested index has been overwritten by the
    /// controller's ring buffer (wire sentinel `kind == 0xFF`).
    #[error("event overwritten")]
    EventOverwritten,

    /// `get_time_profile_record`: no profile exists with the requested id
    /// (wire sentinel `id == 0`).
    #[error("time profile not found")]
    TimeProfileNotFound,
}
