//! Function codes (opcodes) used in byte 1 of every frame.

/// One function code per protocol operation.
///
/// Requests and their replies share the same opcode (byte 1 of the frame);
/// the direction is implied by who sent the frame, not by the opcode value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// `get_controller` - query controller network/firmware identity.
    GetController = 0x94,
    /// `set_ip` - push a new network configuration (no reply).
    SetIp = 0x96,
    /// `get_status` - poll door/input/event status.
    GetStatus = 0x20,
    /// `get_time` - read the controller's system clock.
    GetTime = 0x32,
    /// `set_time` - write the controller's system clock.
    SetTime = 0x30,
    /// `open_door` - remotely unlock a door.
    OpenDoor = 0x40,
    /// `get_listener` - read the configured event listener address.
    GetListener = 0x92,
    /// `set_listener` - configure the event listener address.
    SetListener = 0x90,
    /// `get_door_control` - read a door's control mode/delay.
    GetDoorControl = 0x82,
    /// `set_door_control` - write a door's control mode/delay.
    SetDoorControl = 0x80,
    /// `get_cards` - read the stored card count.
    GetCards = 0x58,
    /// `get_card` - fetch a card record by card number.
    GetCard = 0x5A,
    /// `get_card_by_index` - fetch a card record by storage index.
    GetCardByIndex = 0x5C,
    /// `put_card` - create or update a card record.
    PutCard = 0x50,
    /// `delete_card` - remove a single card record.
    DeleteCard = 0x52,
    /// `delete_all_cards` - wipe the card table.
    DeleteAllCards = 0x54,
    /// `get_event` - fetch an event record by index.
    GetEvent = 0xB0,
    /// `get_event_index` - read the controller's current event index.
    GetEventIndex = 0xB4,
    /// `set_event_index` - set the controller's current event index.
    SetEventIndex = 0xB2,
    /// `record_special_events` - enable/disable non-access event reporting.
    RecordSpecialEvents = 0x8E,
    /// `get_time_profile` - fetch a time profile by id.
    GetTimeProfile = 0x98,
    /// `set_time_profile` - create or update a time profile.
    SetTimeProfile = 0x88,
    /// `delete_all_time_profiles` - wipe all time profiles.
    DeleteAllTimeProfiles = 0x8A,
    /// `add_task` - append a scheduled task.
    AddTask = 0xA8,
    /// `refresh_tasklist` - commit the pending task list.
    RefreshTasklist = 0xAC,
    /// `clear_tasklist` - discard the pending task list.
    ClearTasklist = 0xA6,
    /// `set_pc_control` - enable/disable host override of door control.
    SetPcControl = 0xA0,
    /// `set_interlock` - configure door interlock grouping.
    SetInterlock = 0xA2,
    /// `activate_keypads` - enable/disable reader keypads.
    ActivateKeypads = 0xA4,
    /// `set_door_passcodes` - configure supervisor passcodes for a door.
    SetDoorPasscodes = 0x8C,
    /// `get_antipassback` - read the anti-passback mode.
    GetAntiPassback = 0x86,
    /// `set_antipassback` - write the anti-passback mode.
    SetAntiPassback = 0x84,
    /// `restore_default_parameters` - factory-reset the controller.
    RestoreDefaultParameters = 0xC8,
    /// Unsolicited event frame (also used as the reply opcode for `get_status`).
    Event = 0x20,
}

impl Opcode {
    /// Returns the function byte for this opcode.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Looks up the opcode matching a function byte, if any.
    ///
    /// Several operations share a numeric value with `Event`/`GetStatus`
    /// (`0x20`); callers that need to disambiguate do so by context (which
    /// request they sent), not by this lookup alone.
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x94 => Self::GetController,
            0x96 => Self::SetIp,
            0x20 => Self::GetStatus,
            0x32 => Self::GetTime,
            0x30 => Self::SetTime,
            0x40 => Self::OpenDoor,
            0x92 => Self::GetListener,
            0x90 => Self::SetListener,
            0x82 => Self::GetDoorControl,
            0x80 => Self::SetDoorControl,
            0x58 => Self::GetCards,
            0x5A => Self::GetCard,
            0x5C => Self::GetCardByIndex,
            0x50 => Self::PutCard,
            0x52 => Self::DeleteCard,
            0x54 => Self::DeleteAllCards,
            0xB0 => Self::GetEvent,
            0xB4 => Self::GetEventIndex,
            0xB2 => Self::SetEventIndex,
            0x8E => Self::RecordSpecialEvents,
            0x98 => Self::GetTimeProfile,
            0x88 => Self::SetTimeProfile,
            0x8A => Self::DeleteAllTimeProfiles,
            0xA8 => Self::AddTask,
            0xAC => Self::RefreshTasklist,
            0xA6 => Self::ClearTasklist,
            0xA0 => Self::SetPcControl,
            0xA2 => Self::SetInterlock,
            0xA4 => Self::ActivateKeypads,
            0x8C => Self::SetDoorPasscodes,
            0x86 => Self::GetAntiPassback,
            0x84 => Self::SetAntiPassback,
            0xC8 => Self::RestoreDefaultParameters,
            _ => return None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::Opcode;

    #[test]
    fn round_trips_every_distinct_byte() {
        let opcodes = [
            Opcode::GetController,
            Opcode::SetIp,
            Opcode::GetStatus,
            Opcode::GetTime,
            Opcode::SetTime,
            Opcode::OpenDoor,
            Opcode::GetListener,
            Opcode::SetListener,
            Opcode::GetDoorControl,
            Opcode::SetDoorControl,
            Opcode::GetCards,
            Opcode::GetCard,
            Opcode::GetCardByIndex,
            Opcode::PutCard,
            Opcode::DeleteCard,
            Opcode::DeleteAllCards,
            Opcode::GetEvent,
            Opcode::GetEventIndex,
            Opcode::SetEventIndex,
            Opcode::RecordSpecialEvents,
            Opcode::GetTimeProfile,
            Opcode::SetTimeProfile,
            Opcode::DeleteAllTimeProfiles,
            Opcode::AddTask,
            Opcode::RefreshTasklist,
            Opcode::ClearTasklist,
            Opcode::SetPcControl,
            Opcode::SetInterlock,
            Opcode::ActivateKeypads,
            Opcode::SetDoorPasscodes,
            Opcode::GetAntiPassback,
            Opcode::SetAntiPassback,
            Opcode::RestoreDefaultParameters,
        ];

        for opcode in opcodes {
            assert_eq!(Opcode::from_u8(opcode.to_u8()), Some(opcode));
        }
    }

    #[test]
    fn unknown_byte_is_none() {
        assert_eq!(Opcode::from_u8(0xFF), None);
    }
}
