//! Raw 64-byte frame: the only place the wire layout's outer envelope lives.
//!
//! A [`RawFrame`] is a fixed 64-byte buffer with typed accessors for the
//! common header fields (SOM, function, controller serial) plus little/big
//! endian and BCD helpers that the per-operation codec in [`crate::codec`]
//! uses to read and write the function-specific payload at its fixed
//! offsets.

use crate::errors::{ProtocolError, Result};

/// Every frame on the wire - request, reply, or unsolicited event - is
/// exactly this many bytes.
pub const FRAME_SIZE: usize = 64;

/// Standard start-of-message byte.
pub const SOM: u8 = 0x17;

/// Start-of-message byte used by the v6.62 event frame variant. Carries the
/// same field layout as [`SOM`]; it is a version marker only.
pub const SOM_EVENT_V662: u8 = 0x19;

/// Offset of the controller serial number (u32 LE).
const CONTROLLER_OFFSET: usize = 4;

/// A fixed 64-byte protocol frame.
///
/// Holds raw bytes. The per-operation `encode_*`/`decode_*` functions in
/// [`crate::codec`] are responsible for interpreting the payload region
/// (bytes 8..64); this type only knows about the common envelope (bytes
/// 0..8) and provides primitive get/set helpers for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_SIZE]);

impl RawFrame {
    /// Builds a new request frame: zeroed payload, the given SOM/function at
    /// bytes 0-1, and the controller serial (0 for broadcast discovery) at
    /// bytes 4-7.
    #[must_use]
    pub fn new_request(som: u8, function: u8, controller: u32) -> Self {
        let mut bytes = [0u8; FRAME_SIZE];
        bytes[0] = som;
        bytes[1] = function;
        bytes[CONTROLLER_OFFSET..CONTROLLER_OFFSET + 4].copy_from_slice(&controller.to_le_bytes());
        Self(bytes)
    }

    /// Wraps an exactly-64-byte buffer as a frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidLength`] if `bytes.len() != 64` and
    /// [`ProtocolError::InvalidSom`] if byte 0 is neither [`SOM`] nor
    /// [`SOM_EVENT_V662`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != FRAME_SIZE {
            return Err(ProtocolError::InvalidLength { expected: FRAME_SIZE, actual: bytes.len() });
        }

        let som = bytes[0];
        if som != SOM && som != SOM_EVENT_V662 {
            return Err(ProtocolError::InvalidSom(som));
        }

        let mut buf = [0u8; FRAME_SIZE];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Raw 64-byte buffer, ready to hand to a transport's send call.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }

    /// Start-of-message byte (byte 0).
    #[must_use]
    pub fn som(&self) -> u8 {
        self.0[0]
    }

    /// Function code (byte 1).
    #[must_use]
    pub fn function(&self) -> u8 {
        self.0[1]
    }

    /// Controller serial number (bytes 4-7, little-endian).
    #[must_use]
    pub fn controller(&self) -> u32 {
        self.read_u32(CONTROLLER_OFFSET)
    }

    /// Reads a little-endian `u8` at `offset`.
    #[must_use]
    pub fn read_u8(&self, offset: usize) -> u8 {
        self.0[offset]
    }

    /// Writes a `u8` at `offset`.
    pub fn write_u8(&mut self, offset: usize, value: u8) {
        self.0[offset] = value;
    }

    /// Reads a little-endian `u16` at `offset`.
    #[must_use]
    pub fn read_u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.0[offset], self.0[offset + 1]])
    }

    /// Writes a little-endian `u16` at `offset`.
    pub fn write_u16(&mut self, offset: usize, value: u16) {
        self.0[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    /// Reads a little-endian `u32` at `offset`.
    #[must_use]
    pub fn read_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.0[offset],
            self.0[offset + 1],
            self.0[offset + 2],
            self.0[offset + 3],
        ])
    }

    /// Writes a little-endian `u32` at `offset`.
    pub fn write_u32(&mut self, offset: usize, value: u32) {
        self.0[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Reads a little-endian 24-bit value (e.g. a PIN) at `offset`.
    #[must_use]
    pub fn read_u24(&self, offset: usize) -> u32 {
        u32::from_le_bytes([self.0[offset], self.0[offset + 1], self.0[offset + 2], 0])
    }

    /// Writes a 24-bit value (e.g. a PIN) at `offset`, little-endian.
    pub fn write_u24(&mut self, offset: usize, value: u32) {
        let bytes = value.to_le_bytes();
        self.0[offset..offset + 3].copy_from_slice(&bytes[..3]);
    }

    /// Reads a 4-byte IPv4 address at `offset`, big-endian dotted-quad order
    /// as it appears on the wire.
    #[must_use]
    pub fn read_ipv4(&self, offset: usize) -> [u8; 4] {
        [self.0[offset], self.0[offset + 1], self.0[offset + 2], self.0[offset + 3]]
    }

    /// Writes a 4-byte IPv4 address at `offset`.
    pub fn write_ipv4(&mut self, offset: usize, octets: [u8; 4]) {
        self.0[offset..offset + 4].copy_from_slice(&octets);
    }

    /// Reads a 6-byte MAC address at `offset`.
    #[must_use]
    pub fn read_mac(&self, offset: usize) -> [u8; 6] {
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&self.0[offset..offset + 6]);
        mac
    }

    /// Writes a 6-byte MAC address at `offset`.
    pub fn write_mac(&mut self, offset: usize, mac: [u8; 6]) {
        self.0[offset..offset + 6].copy_from_slice(&mac);
    }

    /// Reads a raw byte slice of `len` bytes at `offset`.
    #[must_use]
    pub fn read_bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.0[offset..offset + len]
    }

    /// Writes a raw byte slice at `offset`.
    pub fn write_bytes(&mut self, offset: usize, data: &[u8]) {
        self.0[offset..offset + data.len()].copy_from_slice(data);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = RawFrame::from_bytes(&[0u8; 10]).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidLength { expected: 64, actual: 10 });
    }

    #[test]
    fn rejects_bad_som() {
        let mut bytes = [0u8; FRAME_SIZE];
        bytes[0] = 0xFF;
        let err = RawFrame::from_bytes(&bytes).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidSom(0xFF));
    }

    #[test]
    fn accepts_both_event_soms() {
        let mut standard = [0u8; FRAME_SIZE];
        standard[0] = SOM;
        assert!(RawFrame::from_bytes(&standard).is_ok());

        let mut v662 = [0u8; FRAME_SIZE];
        v662[0] = SOM_EVENT_V662;
        assert!(RawFrame::from_bytes(&v662).is_ok());
    }

    #[test]
    fn new_request_sets_envelope() {
        let frame = RawFrame::new_request(SOM, 0x94, 405_419_896);
        assert_eq!(frame.som(), SOM);
        assert_eq!(frame.function(), 0x94);
        assert_eq!(frame.controller(), 405_419_896);
        assert_eq!(frame.as_bytes().len(), FRAME_SIZE);
    }

    proptest! {
        #[test]
        fn u32_round_trips(offset in 8usize..60, value: u32) {
            let mut frame = RawFrame::new_request(SOM, 0, 0);
            frame.write_u32(offset, value);
            prop_assert_eq!(frame.read_u32(offset), value);
        }

        #[test]
        fn u24_round_trips(offset in 8usize..60, value in 0u32..0x0100_0000) {
            let mut frame = RawFrame::new_request(SOM, 0, 0);
            frame.write_u24(offset, value);
            prop_assert_eq!(frame.read_u24(offset), value);
        }

        #[test]
        fn frame_bytes_round_trip(som in prop::sample::select(vec![SOM, SOM_EVENT_V662]), payload: [u8; 60]) {
            let mut bytes = [0u8; FRAME_SIZE];
            bytes[0] = som;
            bytes[4..].copy_from_slice(&payload);
            let frame = RawFrame::from_bytes(&bytes).unwrap();
            prop_assert_eq!(frame.as_bytes(), &bytes);
        }
    }
}
