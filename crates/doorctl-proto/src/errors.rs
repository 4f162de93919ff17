//! Codec-level errors.
//!
//! Covers malformed/undersized frames and out-of-range encode inputs. Never
//! stringly-typed across the crate boundary - every variant carries the data
//! needed to reconstruct its `Display` message.

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding a request or decoding a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is not exactly 64 bytes.
    #[error("invalid frame length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required frame length.
        expected: usize,
        /// Actual length observed.
        actual: usize,
    },

    /// Frame's start-of-message byte is neither `0x17` nor `0x19`.
    #[error("invalid start-of-message byte ({0:#04x})")]
    InvalidSom(u8),

    /// Reply's function byte did not match the expected opcode.
    #[error("invalid reply function code ({0:02x})")]
    InvalidFunctionCode(u8),

    /// An encode input fell outside its valid range.
    #[error("value out of range for {field}: {value} (valid: {valid_range})")]
    OutOfRange {
        /// Name of the field being encoded.
        field: &'static str,
        /// Value that was rejected.
        value: i64,
        /// Human readable description of the valid range.
        valid_range: &'static str,
    },
}
