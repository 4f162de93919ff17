//! Configuration-level errors: malformed addresses and controller
//! references. Transport and protocol errors live closer to where they
//! originate (`doorctl-transport`, `doorctl-proto`) and are folded into the
//! dispatcher's error type in `doorctl-client`.

use thiserror::Error;

/// Result alias for net/addressing helpers.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while resolving addresses or normalising a controller
/// reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `resolve` was given a string that is neither `"host"` nor
    /// `"host:port"`.
    #[error("invalid address ({0})")]
    InvalidAddress(String),

    /// `disambiguate` was given a controller serial of 0, which never
    /// identifies a real controller.
    #[error("invalid controller (0)")]
    InvalidController,

    /// `Protocol::Tcp` was requested without an address; TCP has no
    /// broadcast-discovery fallback to fall back to (§3).
    #[error("tcp protocol requires an explicit address")]
    TcpRequiresAddress,
}
