//! Typed constructor configuration for [`crate::Client`] (§6.3, §10.4).
//!
//! No file parsing, environment variable lookup, or CLI flag parsing lives
//! here - callers that want those build the resulting values externally and
//! pass them in.

use std::{net::SocketAddr, time::Duration};

/// Crate-wide default per-call timeout (§6.3).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2500);

/// Configuration for a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Local address the UDP sockets (broadcast and addressed) bind to.
    /// `0.0.0.0:0` lets the OS pick an ephemeral port on any interface.
    pub bind: SocketAddr,

    /// Destination for broadcast discovery and address-less operations.
    pub broadcast: SocketAddr,

    /// Address the event listener binds to. Unused by [`crate::Client`]
    /// itself; carried here so one config value configures the whole
    /// client-plus-listener deployment.
    pub listen: SocketAddr,

    /// When true, every sent and received frame is hex-dumped at trace
    /// level (§10.2).
    pub debug: bool,

    /// Default per-call timeout; individual calls may override it.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 0)),
            broadcast: SocketAddr::from(([255, 255, 255, 255], 60000)),
            listen: SocketAddr::from(([0, 0, 0, 0], 60001)),
            debug: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_endpoints() {
        let config = ClientConfig::default();
        assert_eq!(config.broadcast, SocketAddr::from(([255, 255, 255, 255], 60000)));
        assert_eq!(config.listen.port(), 60001);
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert!(!config.debug);
    }
}
