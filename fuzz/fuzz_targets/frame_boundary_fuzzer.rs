//! Fuzz target for frame envelope boundary conditions.
//!
//! # Strategy
//!
//! - SOM: valid (`0x17`), valid event variant (`0x19`), off-by-one, random
//! - Length: exactly 64, one short, one long, zero, large
//! - Controller serial: `0`, `1`, `u32::MAX`
//!
//! # Invariants
//!
//! - Any length other than 64 MUST return `ProtocolError::InvalidLength`
//! - Any SOM other than `0x17`/`0x19` (at length 64) MUST return
//!   `ProtocolError::InvalidSom`
//! - Decode MUST never panic

#![no_main]

use arbitrary::Arbitrary;
use doorctl_proto::{ProtocolError, RawFrame, SOM, SOM_EVENT_V662};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct BoundaryInput {
    som: SomByte,
    length: LengthChoice,
    controller: ControllerSerial,
    payload: [u8; 56],
}

#[derive(Debug, Clone, Arbitrary)]
enum SomByte {
    Valid,
    EventVariant,
    OffByOne(u8),
    Random(u8),
}

#[derive(Debug, Clone, Arbitrary)]
enum LengthChoice {
    Exact,
    OneShort,
    OneLong,
    Zero,
    Large(u8),
}

#[derive(Debug, Clone, Arbitrary)]
enum ControllerSerial {
    Zero,
    One,
    MaxU32,
    Random(u32),
}

fuzz_target!(|input: BoundaryInput| {
    let som_value = match input.som {
        SomByte::Valid => SOM,
        SomByte::EventVariant => SOM_EVENT_V662,
        SomByte::OffByOne(_) => SOM.wrapping_add(1),
        SomByte::Random(b) => b,
    };

    let controller_value = match input.controller {
        ControllerSerial::Zero => 0u32,
        ControllerSerial::One => 1,
        ControllerSerial::MaxU32 => u32::MAX,
        ControllerSerial::Random(r) => r,
    };

    let length = match input.length {
        LengthChoice::Exact => 64,
        LengthChoice::OneShort => 63,
        LengthChoice::OneLong => 65,
        LengthChoice::Zero => 0,
        LengthChoice::Large(extra) => 64 + extra as usize,
    };

    let mut buffer = vec![0u8; length];
    if length > 0 {
        buffer[0] = som_value;
    }
    if length >= 8 {
        buffer[4..8].copy_from_slice(&controller_value.to_le_bytes());
    }
    if length >= 64 {
        let end = 8 + input.payload.len().min(length - 8);
        buffer[8..end].copy_from_slice(&input.payload[..end - 8]);
    }

    match RawFrame::from_bytes(&buffer) {
        Ok(frame) => {
            assert_eq!(length, 64, "only exactly-64-byte buffers may parse");
            assert!(som_value == SOM || som_value == SOM_EVENT_V662, "only known SOM bytes may parse");
            assert_eq!(frame.controller(), controller_value);
        },
        Err(ProtocolError::InvalidLength { expected, actual }) => {
            assert_eq!(expected, 64);
            assert_eq!(actual, length);
        },
        Err(ProtocolError::InvalidSom(byte)) => {
            assert_eq!(length, 64);
            assert_eq!(byte, som_value);
        },
        Err(other) => panic!("unexpected error from from_bytes: {other}"),
    }
});
