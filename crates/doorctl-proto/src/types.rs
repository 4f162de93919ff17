//! Domain records produced/consumed by the codec.
//!
//! These are the typed, decoded shapes the dispatcher hands back to callers.
//! Field lists are exhaustive with respect to the wire (§3 of the protocol
//! specification).

use crate::bcd::{Date, HourMinute, Time};

/// Firmware version, formatted on the wire as two BCD bytes and rendered as
/// `"vX.YZ"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    /// Major version digit.
    pub major: u8,
    /// Minor version (two digits, e.g. `92` in `v8.92`).
    pub minor: u8,
}

impl Version {
    /// Renders as `"vX.YZ"`.
    #[must_use]
    pub fn to_display_string(self) -> String {
        format!("v{}.{:02}", self.major, self.minor)
    }
}

/// Reply to `get_controller`: network/firmware identity of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerInfo {
    /// Controller serial number.
    pub serial: u32,
    /// Current IPv4 address.
    pub ip: [u8; 4],
    /// Subnet mask.
    pub mask: [u8; 4],
    /// Default gateway.
    pub gateway: [u8; 4],
    /// MAC address.
    pub mac: [u8; 6],
    /// Firmware version.
    pub version: Version,
    /// Firmware build date.
    pub date: Option<Date>,
}

/// A single unsolicited/status event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Monotonic index on the controller's event buffer. `0` means "no such
    /// event".
    pub index: u32,
    /// Event kind/category byte.
    pub kind: u8,
    /// Whether access was granted.
    pub access_granted: bool,
    /// Door the event pertains to.
    pub door: u8,
    /// Direction (in/out) byte.
    pub direction: u8,
    /// Card number involved, if any (`0` = none).
    pub card: u32,
    /// Event timestamp, absent for some event kinds.
    pub timestamp: Option<(Date, Time)>,
    /// Reason code.
    pub reason: u8,
}

/// Reply to `get_status`: door/input snapshot plus an optional trailing
/// event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// Controller serial number (echoed from the request).
    pub serial: u32,
    /// Controller's current system date.
    pub system_date: Option<Date>,
    /// Controller's current system time.
    pub system_time: Option<Time>,
    /// Door-open sensor state, one per door (1-4).
    pub door_open: [bool; 4],
    /// Door-button pressed state, one per door (1-4).
    pub door_button: [bool; 4],
    /// Relay output bitmask.
    pub relays: u8,
    /// Input bitmask.
    pub inputs: u8,
    /// System error code.
    pub system_error: u8,
    /// Special info byte.
    pub special_info: u8,
    /// Trailing event, absent when the sub-record's index is `0`.
    pub event: Option<Event>,
}

/// Per-door access permission stored on a [`Card`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPermission {
    /// No access through this door.
    None,
    /// Unrestricted (24/7) access.
    AlwaysOpen,
    /// Access gated by the named time profile id (2-254).
    TimeProfile(u8),
}

impl DoorPermission {
    /// Decodes the raw wire byte.
    #[must_use]
    pub fn decode(byte: u8) -> Self {
        match byte {
            0 => Self::None,
            1 => Self::AlwaysOpen,
            id => Self::TimeProfile(id),
        }
    }

    /// Encodes back to the raw wire byte.
    #[must_use]
    pub fn encode(self) -> u8 {
        match self {
            Self::None => 0,
            Self::AlwaysOpen => 1,
            Self::TimeProfile(id) => id,
        }
    }
}

/// A card record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    /// Card number. `0` = not found, `0xFFFF_FFFF` = deleted (sentinels
    /// reported to the dispatcher, not decode errors).
    pub number: u32,
    /// First valid date.
    pub start_date: Option<Date>,
    /// Last valid date.
    pub end_date: Option<Date>,
    /// Per-door permission, indexed 0..4 for doors 1..4.
    pub doors: [DoorPermission; 4],
    /// PIN code, 0..999999.
    pub pin: u32,
}

/// A weekly schedule: up to 3 start/end segments per enabled day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeProfile {
    /// Profile id, 2..254.
    pub id: u8,
    /// First valid date.
    pub start_date: Option<Date>,
    /// Last valid date.
    pub end_date: Option<Date>,
    /// Enabled weekdays, Monday first.
    pub weekdays: Weekdays,
    /// Up to 3 start/end segments, unused segments are `None`.
    pub segments: [Option<(HourMinute, HourMinute)>; 3],
    /// Linked profile id, `0` = none.
    pub linked_profile: u8,
}

/// Seven weekday enable flags, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Weekdays {
    /// Individual day flags, index 0 = Monday .. index 6 = Sunday.
    pub days: [bool; 7],
}

impl Weekdays {
    /// Decodes seven consecutive 0/1 bytes.
    #[must_use]
    pub fn decode(bytes: [u8; 7]) -> Self {
        let mut days = [false; 7];
        for (day, byte) in days.iter_mut().zip(bytes) {
            *day = byte != 0;
        }
        Self { days }
    }

    /// Encodes to seven consecutive 0/1 bytes.
    #[must_use]
    pub fn encode(self) -> [u8; 7] {
        let mut bytes = [0u8; 7];
        for (byte, day) in bytes.iter_mut().zip(self.days) {
            *byte = u8::from(day);
        }
        bytes
    }
}

/// A dated, weekday-gated scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    /// First valid date.
    pub start_date: Option<Date>,
    /// Last valid date.
    pub end_date: Option<Date>,
    /// Enabled weekdays, Monday first.
    pub weekdays: Weekdays,
    /// Time of day the task fires.
    pub start_time: HourMinute,
    /// Door the task applies to, 1-4.
    pub door: u8,
    /// Task type, 0-12.
    pub task_type: u8,
    /// Number of additional cards parameter (used by some task types).
    pub more_cards: u8,
}

/// Configured event listener address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    /// IPv4 address events are pushed to.
    pub address: [u8; 4],
    /// UDP port events are pushed to.
    pub port: u16,
    /// Auto-send heartbeat interval in seconds, `0` disables it.
    pub auto_send_interval: u8,
}
