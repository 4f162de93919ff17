//! Fuzz target for `RawFrame::from_bytes`.
//!
//! Exercises the envelope parser with arbitrary byte sequences. Must never
//! panic - every invalid input returns an error.

#![no_main]

use doorctl_proto::RawFrame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = RawFrame::from_bytes(data);
});
