//! UDP/TCP Transports and Event Listener for the Doorctl Protocol
//!
//! Three request/reply transports - broadcast UDP fan-in ([`udp_broadcast`]),
//! addressed UDP single-shot ([`udp_send`]), addressed TCP single-shot
//! ([`tcp_send`]) - plus the unsolicited event [`listener`]. Every socket is
//! per-call and closed on every exit path; the listener owns one long-lived
//! socket for its task's lifetime. See `doorctl-client` for the dispatcher
//! that selects among these per operation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod listener;
pub mod tcp_send;
pub mod udp_broadcast;
pub mod udp_send;

pub use error::{Result, TransportError};
pub use listener::{ListenerState, QueuedConsumer, run_listener};
pub use tcp_send::tcp_send;
pub use udp_broadcast::broadcast_send;
pub use udp_send::udp_send;
