//! Controller reference normalisation.
//!
//! Every dispatcher operation accepts a controller either as a bare serial
//! number (broadcast/UDP addressing left to the caller's transport choice)
//! or as an explicit `(id, addr, protocol?)` triple. [`disambiguate`]
//! normalises both forms to a single canonical [`ControllerRef`].

use crate::error::{ConfigError, Result};

/// Transport a dispatcher call should use to reach a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// Addressed UDP, optionally connected (§4.4). The default.
    #[default]
    Udp,
    /// Addressed TCP, one connection per call (§4.5).
    Tcp,
}

/// A fully-resolved controller reference: which controller, which address
/// (if any), and which transport to use when an address is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRef {
    /// Controller serial number.
    pub id: u32,
    /// Destination `host:port`, absent when the caller wants the request
    /// broadcast instead of addressed.
    pub addr: Option<String>,
    /// Transport to use, meaningful only when `addr` is present.
    pub protocol: Protocol,
}

/// Anything that can be normalised into a [`ControllerRef`]: a bare serial,
/// a `(id, addr)` pair, or a `(id, addr, protocol)` triple.
pub trait IntoControllerRef {
    /// Normalises `self` into a canonical [`ControllerRef`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidController`] if the serial is `0`.
    fn disambiguate(self) -> Result<ControllerRef>;
}

impl IntoControllerRef for u32 {
    fn disambiguate(self) -> Result<ControllerRef> {
        disambiguate_parts(self, None, Protocol::Udp)
    }
}

impl IntoControllerRef for (u32, &str) {
    fn disambiguate(self) -> Result<ControllerRef> {
        disambiguate_parts(self.0, Some(self.1), Protocol::Udp)
    }
}

impl IntoControllerRef for (u32, &str, Protocol) {
    fn disambiguate(self) -> Result<ControllerRef> {
        disambiguate_parts(self.0, Some(self.1), self.2)
    }
}

impl IntoControllerRef for (u32, Protocol) {
    fn disambiguate(self) -> Result<ControllerRef> {
        disambiguate_parts(self.0, None, self.1)
    }
}

fn disambiguate_parts(id: u32, addr: Option<&str>, protocol: Protocol) -> Result<ControllerRef> {
    if id == 0 {
        return Err(ConfigError::InvalidController);
    }
    if protocol == Protocol::Tcp && addr.is_none() {
        return Err(ConfigError::TcpRequiresAddress);
    }
    Ok(ControllerRef { id, addr: addr.map(str::to_string), protocol })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_serial_disambiguates_to_broadcast_udp() {
        let r = 405_419_896u32.disambiguate().unwrap();
        assert_eq!(r, ControllerRef { id: 405_419_896, addr: None, protocol: Protocol::Udp });
    }

    #[test]
    fn pair_disambiguates_to_addressed_udp() {
        let r = (405_419_896u32, "192.168.1.100:60000").disambiguate().unwrap();
        assert_eq!(r.addr.as_deref(), Some("192.168.1.100:60000"));
        assert_eq!(r.protocol, Protocol::Udp);
    }

    #[test]
    fn triple_carries_explicit_protocol() {
        let r = (405_419_896u32, "192.168.1.100:60000", Protocol::Tcp).disambiguate().unwrap();
        assert_eq!(r.protocol, Protocol::Tcp);
    }

    #[test]
    fn zero_serial_is_rejected() {
        assert_eq!(0u32.disambiguate().unwrap_err(), ConfigError::InvalidController);
    }

    #[test]
    fn tcp_without_address_is_rejected() {
        let err = (405_419_896u32, Protocol::Tcp).disambiguate().unwrap_err();
        assert_eq!(err, ConfigError::TcpRequiresAddress);
    }

    #[test]
    fn udp_without_address_broadcasts() {
        let r = (405_419_896u32, Protocol::Udp).disambiguate().unwrap();
        assert_eq!(r.addr, None);
        assert_eq!(r.protocol, Protocol::Udp);
    }
}
