//! Address parsing and small normalisation helpers shared by every
//! transport.

use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Default port for addressed controller requests (UDP or TCP).
pub const DEFAULT_CONTROLLER_PORT: u16 = 60000;

/// Default port the broadcast discovery request is sent to.
pub const DEFAULT_BROADCAST_PORT: u16 = 60000;

/// Default port the event listener binds to.
pub const DEFAULT_LISTENER_PORT: u16 = 60001;

/// Resolves a `"host"` or `"host:port"` string into a `(host, port)` pair.
///
/// A bare host defaults to [`DEFAULT_CONTROLLER_PORT`]; callers that need a
/// different default (e.g. the listener) override the returned port
/// themselves when no explicit port was given.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidAddress`] if `addr` is empty, has more than
/// one `:`, or has a non-numeric/out-of-range port.
pub fn resolve(addr: &str) -> Result<(String, u16)> {
    if addr.is_empty() {
        return Err(ConfigError::InvalidAddress(addr.to_string()));
    }

    match addr.rsplit_once(':') {
        None => Ok((addr.to_string(), DEFAULT_CONTROLLER_PORT)),
        Some((host, port)) => {
            if host.is_empty() {
                return Err(ConfigError::InvalidAddress(addr.to_string()));
            }
            let port: u16 =
                port.parse().map_err(|_| ConfigError::InvalidAddress(addr.to_string()))?;
            Ok((host.to_string(), port))
        },
    }
}

/// True for the "unset" bind address: `None`, an empty string, or
/// `("0.0.0.0", 0)`.
#[must_use]
pub fn is_inaddr_any(addr: Option<(&str, u16)>) -> bool {
    match addr {
        None => true,
        Some(("", _)) => true,
        Some(("0.0.0.0", 0)) => true,
        Some(_) => false,
    }
}

/// Clamps a timeout to a non-negative `Duration`, used when a caller-facing
/// timeout is expressed as a float number of seconds.
#[must_use]
pub fn timeout_to_seconds(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds < 0.0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(seconds)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resolve_defaults_port_for_bare_host() {
        assert_eq!(resolve("192.168.1.100").unwrap(), ("192.168.1.100".to_string(), DEFAULT_CONTROLLER_PORT));
    }

    #[test]
    fn resolve_parses_explicit_port() {
        assert_eq!(resolve("192.168.1.100:60005").unwrap(), ("192.168.1.100".to_string(), 60005));
    }

    #[test]
    fn resolve_rejects_empty_and_malformed() {
        assert!(resolve("").is_err());
        assert!(resolve(":60000").is_err());
        assert!(resolve("192.168.1.100:notaport").is_err());
    }

    #[test]
    fn is_inaddr_any_matches_unset_forms() {
        assert!(is_inaddr_any(None));
        assert!(is_inaddr_any(Some(("", 0))));
        assert!(is_inaddr_any(Some(("0.0.0.0", 0))));
        assert!(!is_inaddr_any(Some(("0.0.0.0", 60000))));
        assert!(!is_inaddr_any(Some(("192.168.1.1", 0))));
    }

    #[test]
    fn timeout_to_seconds_clamps_negative_and_nan() {
        assert_eq!(timeout_to_seconds(-1.0), Duration::ZERO);
        assert_eq!(timeout_to_seconds(f64::NAN), Duration::ZERO);
        assert_eq!(timeout_to_seconds(2.5), Duration::from_millis(2500));
    }
}
