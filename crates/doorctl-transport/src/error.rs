//! Transport-level errors: everything that can go wrong getting a frame
//! on or off the wire, as opposed to interpreting its contents.

use std::io;

use thiserror::Error;

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors raised by the UDP/TCP transports and the event listener.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Underlying socket I/O failure (bind, send, recv, connect).
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),

    /// No reply arrived within the configured timeout.
    #[error("timed out waiting for reply after {0:?}")]
    Timeout(std::time::Duration),

    /// The bound source port equals the broadcast destination port, which
    /// would cause the sender to receive its own request (§4.3).
    #[error("refusing to broadcast: source port {0} matches destination port")]
    SelfBroadcastGuard(u16),

    /// A configuration error (malformed address, invalid controller)
    /// surfaced from `doorctl-core`.
    #[error(transparent)]
    Config(#[from] doorctl_core::ConfigError),

    /// A reply frame was the right length but failed to parse (bad SOM).
    /// Transports that can keep waiting for another datagram (UDP) drop
    /// these instead of surfacing them; TCP, which accumulates exactly one
    /// frame per call, has no datagram to discard and surfaces it here.
    #[error(transparent)]
    Protocol(#[from] doorctl_proto::ProtocolError),
}
