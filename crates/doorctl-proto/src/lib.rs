//! Binary Codec for the Access-Controller Protocol
//!
//! Encodes and decodes the fixed 64-byte request/reply/event frames used to
//! talk to networked door-access controllers over UDP or TCP. This crate
//! owns the wire format only - no sockets, no retry policy, no controller
//! addressing. See `doorctl-transport` for the network side and
//! `doorctl-client` for the dispatcher that ties the two together.
//!
//! # Layout
//!
//! Every frame is 64 bytes: a start-of-message byte, a function code, two
//! reserved bytes, a little-endian controller serial number, and a
//! function-specific 56-byte payload. [`frame::RawFrame`] models the
//! envelope; [`codec`] interprets the payload per operation; [`bcd`]
//! handles the BCD-encoded date/time fields found throughout; [`types`]
//! holds the decoded domain records.
//!
//! ```
//! use doorctl_proto::codec::{decode_get_controller, encode_get_controller};
//!
//! let request = encode_get_controller(405_419_896);
//! assert_eq!(request.function(), 0x94);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bcd;
pub mod codec;
pub mod errors;
pub mod frame;
pub mod opcode;
pub mod types;

pub use errors::{ProtocolError, Result};
pub use frame::{FRAME_SIZE, RawFrame, SOM, SOM_EVENT_V662};
pub use opcode::Opcode;

/// Formats a frame as a 16-bytes-per-row offset/hex/ASCII dump, for
/// debug-level tracing and CLI diagnostics.
#[must_use]
pub fn hex_dump(frame: &RawFrame) -> String {
    let bytes = frame.as_bytes();
    let mut out = String::with_capacity(bytes.len() * 4);
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let hex = chunk.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ");
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        out.push_str(&format!("{:04x}  {hex:<47}  {ascii}\n", row * 16));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_dump_has_one_row_per_16_bytes() {
        let frame = RawFrame::new_request(SOM, 0x94, 1);
        let dump = hex_dump(&frame);
        assert_eq!(dump.lines().count(), 4);
        assert!(dump.lines().next().unwrap().starts_with("0000"));
    }
}
