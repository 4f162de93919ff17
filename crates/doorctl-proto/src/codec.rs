//! Encode/decode for every protocol operation.
//!
//! One `encode_*` and one `decode_*` function per operation (§4.1), plus
//! [`decode_event`] for the unsolicited UDP stream. Every decoder validates
//! the reply's function byte against the opcode it expects and returns
//! [`ProtocolError::InvalidFunctionCode`] on mismatch; callers that also need
//! to validate the controller serial (the dispatcher's "record" variants) do
//! so themselves, since the raw codec returns whatever serial the reply
//! carries.
//!
//! Payload offsets below are relative to the start of the frame (byte 8 is
//! the first payload byte, after SOM/function/reserved/controller).

use crate::{
    bcd::{Date, HourMinute, Time, bcd_to_decimal},
    errors::{ProtocolError, Result},
    frame::{RawFrame, SOM},
    opcode::Opcode,
    types::{Card, ControllerInfo, DoorPermission, Event, Listener, Status, Task, TimeProfile, Version, Weekdays},
};

fn expect_function(frame: &RawFrame, opcode: Opcode) -> Result<()> {
    if frame.function() != opcode.to_u8() {
        return Err(ProtocolError::InvalidFunctionCode(frame.function()));
    }
    Ok(())
}

/// Simple success/failure acknowledgement shared by most "set"/"delete"
/// style operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Whether the controller reported success.
    pub success: bool,
}

fn decode_ack(frame: &RawFrame, opcode: Opcode, success_offset: usize) -> Result<Ack> {
    expect_function(frame, opcode)?;
    Ok(Ack { success: frame.read_u8(success_offset) != 0 })
}

// ---------------------------------------------------------------------
// get_controller / set_ip
// ---------------------------------------------------------------------

/// Encodes a `get_controller` request.
#[must_use]
pub fn encode_get_controller(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::GetController.to_u8(), controller)
}

/// Decodes a `get_controller` reply.
pub fn decode_get_controller(frame: &RawFrame) -> Result<ControllerInfo> {
    expect_function(frame, Opcode::GetController)?;
    let date_bytes = frame.read_bytes(28, 3);
    Ok(ControllerInfo {
        serial: frame.controller(),
        ip: frame.read_ipv4(8),
        mask: frame.read_ipv4(12),
        gateway: frame.read_ipv4(16),
        mac: frame.read_mac(20),
        version: Version { major: frame.read_u8(26), minor: bcd_to_decimal(frame.read_u8(27)) },
        date: Date::decode([date_bytes[0], date_bytes[1], date_bytes[2]]),
    })
}

/// Encodes a `set_ip` request. Elicits no reply (§4.4) - there is no
/// matching `decode_set_ip`.
#[must_use]
pub fn encode_set_ip(controller: u32, address: [u8; 4], mask: [u8; 4], gateway: [u8; 4]) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::SetIp.to_u8(), controller);
    frame.write_ipv4(8, address);
    frame.write_ipv4(12, mask);
    frame.write_ipv4(16, gateway);
    frame
}

// ---------------------------------------------------------------------
// get_time / set_time
// ---------------------------------------------------------------------

/// Controller date/time pair, used by `get_time`/`set_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerTime {
    /// Controller serial (echoed from the request).
    pub serial: u32,
    /// Current date, if set.
    pub date: Option<Date>,
    /// Current time, if set.
    pub time: Option<Time>,
}

/// Encodes a `get_time` request.
#[must_use]
pub fn encode_get_time(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::GetTime.to_u8(), controller)
}

/// Decodes a `get_time` reply.
pub fn decode_get_time(frame: &RawFrame) -> Result<ControllerTime> {
    decode_time_reply(frame, Opcode::GetTime)
}

/// Encodes a `set_time` request.
#[must_use]
pub fn encode_set_time(controller: u32, date: Date, time: Time) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::SetTime.to_u8(), controller);
    frame.write_bytes(8, &Date::encode(Some(date)));
    frame.write_bytes(11, &Time::encode(Some(time)));
    frame
}

/// Decodes a `set_time` reply (the controller echoes the date/time it now
/// holds).
pub fn decode_set_time(frame: &RawFrame) -> Result<ControllerTime> {
    decode_time_reply(frame, Opcode::SetTime)
}

fn decode_time_reply(frame: &RawFrame, opcode: Opcode) -> Result<ControllerTime> {
    expect_function(frame, opcode)?;
    let date = frame.read_bytes(8, 3);
    let time = frame.read_bytes(11, 3);
    Ok(ControllerTime {
        serial: frame.controller(),
        date: Date::decode([date[0], date[1], date[2]]),
        time: Time::decode([time[0], time[1], time[2]]),
    })
}

// ---------------------------------------------------------------------
// get_status
// ---------------------------------------------------------------------

/// Encodes a `get_status` request.
#[must_use]
pub fn encode_get_status(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::GetStatus.to_u8(), controller)
}

/// Decodes a `get_status` reply (and, identically, an unsolicited event
/// frame - see [`crate::decode_event`]).
pub fn decode_get_status(frame: &RawFrame) -> Result<Status> {
    expect_function(frame, Opcode::GetStatus)?;
    decode_status_shaped(frame)
}

fn decode_status_shaped(frame: &RawFrame) -> Result<Status> {
    let system_date = frame.read_bytes(8, 3);
    let system_time = frame.read_bytes(11, 3);

    let mut door_open = [false; 4];
    let mut door_button = [false; 4];
    for i in 0..4 {
        door_open[i] = frame.read_u8(14 + i) != 0;
        door_button[i] = frame.read_u8(18 + i) != 0;
    }

    let event_index = frame.read_u32(26);
    let event = if event_index == 0 {
        None
    } else {
        let card = frame.read_u32(34);
        let date_bytes = frame.read_bytes(38, 3);
        let time_bytes = frame.read_bytes(41, 3);
        let date = Date::decode([date_bytes[0], date_bytes[1], date_bytes[2]]);
        let time = Time::decode([time_bytes[0], time_bytes[1], time_bytes[2]]);
        Some(Event {
            index: event_index,
            kind: frame.read_u8(30),
            access_granted: frame.read_u8(31) != 0,
            door: frame.read_u8(32),
            direction: frame.read_u8(33),
            card,
            timestamp: date.zip(time),
            reason: frame.read_u8(44),
        })
    };

    Ok(Status {
        serial: frame.controller(),
        system_date: Date::decode([system_date[0], system_date[1], system_date[2]]),
        system_time: Time::decode([system_time[0], system_time[1], system_time[2]]),
        door_open,
        door_button,
        relays: frame.read_u8(22),
        inputs: frame.read_u8(23),
        system_error: frame.read_u8(24),
        special_info: frame.read_u8(25),
        event,
    })
}

/// Decodes an unsolicited event datagram (SOM `0x17` or `0x19`, function
/// `0x20`). Shares the status frame's layout - on this protocol family,
/// asynchronous pushes and polled status replies are the same shape.
pub fn decode_event(frame: &RawFrame) -> Result<Status> {
    expect_function(frame, Opcode::Event)?;
    decode_status_shaped(frame)
}

// ---------------------------------------------------------------------
// open_door
// ---------------------------------------------------------------------

/// Encodes an `open_door` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `door` is not in `1..=4`.
pub fn encode_open_door(controller: u32, door: u8) -> Result<RawFrame> {
    validate_door(door)?;
    let mut frame = RawFrame::new_request(SOM, Opcode::OpenDoor.to_u8(), controller);
    frame.write_u8(8, door);
    Ok(frame)
}

/// Decodes an `open_door` reply.
pub fn decode_open_door(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::OpenDoor, 9)
}

fn validate_door(door: u8) -> Result<()> {
    if matches!(door, 1..=4) {
        Ok(())
    } else {
        Err(ProtocolError::OutOfRange { field: "door", value: i64::from(door), valid_range: "1..=4" })
    }
}

// ---------------------------------------------------------------------
// get_listener / set_listener
// ---------------------------------------------------------------------

/// Encodes a `get_listener` request.
#[must_use]
pub fn encode_get_listener(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::GetListener.to_u8(), controller)
}

/// Decodes a `get_listener` reply.
pub fn decode_get_listener(frame: &RawFrame) -> Result<Listener> {
    decode_listener_reply(frame, Opcode::GetListener)
}

/// Encodes a `set_listener` request.
#[must_use]
pub fn encode_set_listener(controller: u32, address: [u8; 4], port: u16, auto_send_interval: u8) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::SetListener.to_u8(), controller);
    frame.write_ipv4(8, address);
    frame.write_u16(12, port);
    frame.write_u8(14, auto_send_interval);
    frame
}

/// Decodes a `set_listener` reply (the controller echoes what it now holds).
pub fn decode_set_listener(frame: &RawFrame) -> Result<Listener> {
    decode_listener_reply(frame, Opcode::SetListener)
}

fn decode_listener_reply(frame: &RawFrame, opcode: Opcode) -> Result<Listener> {
    expect_function(frame, opcode)?;
    Ok(Listener {
        address: frame.read_ipv4(8),
        port: frame.read_u16(12),
        auto_send_interval: frame.read_u8(14),
    })
}

// ---------------------------------------------------------------------
// get_door_control / set_door_control
// ---------------------------------------------------------------------

/// A door's control mode and unlock delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorControl {
    /// Door number, 1-4.
    pub door: u8,
    /// Control mode, 1-3.
    pub mode: u8,
    /// Unlock delay in seconds.
    pub delay: u8,
}

/// Encodes a `get_door_control` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `door` is not in `1..=4`.
pub fn encode_get_door_control(controller: u32, door: u8) -> Result<RawFrame> {
    validate_door(door)?;
    let mut frame = RawFrame::new_request(SOM, Opcode::GetDoorControl.to_u8(), controller);
    frame.write_u8(8, door);
    Ok(frame)
}

/// Decodes a `get_door_control` reply.
pub fn decode_get_door_control(frame: &RawFrame) -> Result<DoorControl> {
    decode_door_control_reply(frame, Opcode::GetDoorControl)
}

/// Encodes a `set_door_control` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `door` is not in `1..=4` or
/// `mode` is not in `1..=3`.
pub fn encode_set_door_control(controller: u32, door: u8, mode: u8, delay: u8) -> Result<RawFrame> {
    validate_door(door)?;
    if !matches!(mode, 1..=3) {
        return Err(ProtocolError::OutOfRange { field: "mode", value: i64::from(mode), valid_range: "1..=3" });
    }
    let mut frame = RawFrame::new_request(SOM, Opcode::SetDoorControl.to_u8(), controller);
    frame.write_u8(8, door);
    frame.write_u8(9, mode);
    frame.write_u8(10, delay);
    Ok(frame)
}

/// Decodes a `set_door_control` reply.
pub fn decode_set_door_control(frame: &RawFrame) -> Result<DoorControl> {
    decode_door_control_reply(frame, Opcode::SetDoorControl)
}

fn decode_door_control_reply(frame: &RawFrame, opcode: Opcode) -> Result<DoorControl> {
    expect_function(frame, opcode)?;
    Ok(DoorControl { door: frame.read_u8(8), mode: frame.read_u8(9), delay: frame.read_u8(10) })
}

// ---------------------------------------------------------------------
// cards
// ---------------------------------------------------------------------

/// Encodes a `get_cards` request.
#[must_use]
pub fn encode_get_cards(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::GetCards.to_u8(), controller)
}

/// Decodes a `get_cards` reply into the stored card count.
pub fn decode_get_cards(frame: &RawFrame) -> Result<u32> {
    expect_function(frame, Opcode::GetCards)?;
    Ok(frame.read_u32(8))
}

/// Encodes a `get_card` request.
#[must_use]
pub fn encode_get_card(controller: u32, card_number: u32) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::GetCard.to_u8(), controller);
    frame.write_u32(8, card_number);
    frame
}

/// Decodes a `get_card` reply. `card.number == 0` means "not found",
/// `0xFFFF_FFFF` means "deleted" - both are returned as-is, not as errors
/// (§4.1).
pub fn decode_get_card(frame: &RawFrame) -> Result<Card> {
    decode_card_reply(frame, Opcode::GetCard)
}

/// Encodes a `get_card_by_index` request.
#[must_use]
pub fn encode_get_card_by_index(controller: u32, index: u32) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::GetCardByIndex.to_u8(), controller);
    frame.write_u32(8, index);
    frame
}

/// Decodes a `get_card_by_index` reply.
pub fn decode_get_card_by_index(frame: &RawFrame) -> Result<Card> {
    decode_card_reply(frame, Opcode::GetCardByIndex)
}

fn decode_card_reply(frame: &RawFrame, opcode: Opcode) -> Result<Card> {
    expect_function(frame, opcode)?;
    let start = frame.read_bytes(12, 3);
    let end = frame.read_bytes(15, 3);
    let mut doors = [DoorPermission::None; 4];
    for i in 0..4 {
        doors[i] = DoorPermission::decode(frame.read_u8(18 + i));
    }
    Ok(Card {
        number: frame.read_u32(8),
        start_date: Date::decode([start[0], start[1], start[2]]),
        end_date: Date::decode([end[0], end[1], end[2]]),
        doors,
        pin: frame.read_u24(22),
    })
}

/// Encodes a `put_card` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `pin` exceeds `999999`.
pub fn encode_put_card(controller: u32, card: Card) -> Result<RawFrame> {
    if card.pin > 999_999 {
        return Err(ProtocolError::OutOfRange {
            field: "pin",
            value: i64::from(card.pin),
            valid_range: "0..=999999",
        });
    }
    let mut frame = RawFrame::new_request(SOM, Opcode::PutCard.to_u8(), controller);
    frame.write_u32(8, card.number);
    frame.write_bytes(12, &Date::encode(card.start_date));
    frame.write_bytes(15, &Date::encode(card.end_date));
    for (i, door) in card.doors.into_iter().enumerate() {
        frame.write_u8(18 + i, door.encode());
    }
    frame.write_u24(22, card.pin);
    Ok(frame)
}

/// Decodes a `put_card` reply.
pub fn decode_put_card(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::PutCard, 12)
}

/// Encodes a `delete_card` request.
#[must_use]
pub fn encode_delete_card(controller: u32, card_number: u32) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::DeleteCard.to_u8(), controller);
    frame.write_u32(8, card_number);
    frame
}

/// Decodes a `delete_card` reply.
pub fn decode_delete_card(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::DeleteCard, 12)
}

/// Encodes a `delete_all_cards` request.
#[must_use]
pub fn encode_delete_all_cards(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::DeleteAllCards.to_u8(), controller)
}

/// Decodes a `delete_all_cards` reply.
pub fn decode_delete_all_cards(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::DeleteAllCards, 8)
}

// ---------------------------------------------------------------------
// events
// ---------------------------------------------------------------------

/// Encodes a `get_event` request.
#[must_use]
pub fn encode_get_event(controller: u32, index: u32) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::GetEvent.to_u8(), controller);
    frame.write_u32(8, index);
    frame
}

/// Decodes a `get_event` reply.
///
/// A decoded `index` of `0` means "no such event"; `kind == 0xFF` means the
/// requested index has been overwritten by the controller's ring buffer
/// (§4.1) - both are returned as sentinel field values, not decode errors.
pub fn decode_get_event(frame: &RawFrame) -> Result<Event> {
    expect_function(frame, Opcode::GetEvent)?;
    let card = frame.read_u32(16);
    let date = frame.read_bytes(20, 3);
    let time = frame.read_bytes(23, 3);
    let timestamp = Date::decode([date[0], date[1], date[2]]).zip(Time::decode([time[0], time[1], time[2]]));
    Ok(Event {
        index: frame.read_u32(8),
        kind: frame.read_u8(12),
        access_granted: frame.read_u8(13) != 0,
        door: frame.read_u8(14),
        direction: frame.read_u8(15),
        card,
        timestamp,
        reason: frame.read_u8(26),
    })
}

/// Encodes a `get_event_index` request.
#[must_use]
pub fn encode_get_event_index(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::GetEventIndex.to_u8(), controller)
}

/// Decodes a `get_event_index` reply.
pub fn decode_get_event_index(frame: &RawFrame) -> Result<u32> {
    expect_function(frame, Opcode::GetEventIndex)?;
    Ok(frame.read_u32(8))
}

/// Encodes a `set_event_index` request.
#[must_use]
pub fn encode_set_event_index(controller: u32, index: u32) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::SetEventIndex.to_u8(), controller);
    frame.write_u32(8, index);
    frame
}

/// Decodes a `set_event_index` reply.
pub fn decode_set_event_index(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::SetEventIndex, 12)
}

/// Encodes a `record_special_events` request.
#[must_use]
pub fn encode_record_special_events(controller: u32, enabled: bool) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::RecordSpecialEvents.to_u8(), controller);
    frame.write_u8(8, u8::from(enabled));
    frame
}

/// Decodes a `record_special_events` reply.
pub fn decode_record_special_events(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::RecordSpecialEvents, 8)
}

// ---------------------------------------------------------------------
// time profiles
// ---------------------------------------------------------------------

const SEGMENT_OFFSETS: [usize; 3] = [22, 26, 30];

/// Encodes a `get_time_profile` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `id` is not in `2..=254`.
pub fn encode_get_time_profile(controller: u32, id: u8) -> Result<RawFrame> {
    validate_profile_id(id)?;
    let mut frame = RawFrame::new_request(SOM, Opcode::GetTimeProfile.to_u8(), controller);
    frame.write_u8(8, id);
    Ok(frame)
}

/// Decodes a `get_time_profile` reply. A decoded `id` of `0` means "not
/// found" (§4.7, `TimeProfileNotFound`).
pub fn decode_get_time_profile(frame: &RawFrame) -> Result<TimeProfile> {
    decode_time_profile_reply(frame, Opcode::GetTimeProfile)
}

/// Encodes a `set_time_profile` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `profile.id` is not in
/// `2..=254`.
pub fn encode_set_time_profile(controller: u32, profile: TimeProfile) -> Result<RawFrame> {
    validate_profile_id(profile.id)?;
    let mut frame = RawFrame::new_request(SOM, Opcode::SetTimeProfile.to_u8(), controller);
    frame.write_u8(8, profile.id);
    frame.write_bytes(9, &Date::encode(profile.start_date));
    frame.write_bytes(12, &Date::encode(profile.end_date));
    frame.write_bytes(15, &profile.weekdays.encode());
    for (segment, offset) in profile.segments.into_iter().zip(SEGMENT_OFFSETS) {
        let (start, end) = segment.unzip();
        frame.write_bytes(offset, &HourMinute::encode(start));
        frame.write_bytes(offset + 2, &HourMinute::encode(end));
    }
    frame.write_u8(34, profile.linked_profile);
    Ok(frame)
}

/// Decodes a `set_time_profile` reply.
pub fn decode_set_time_profile(frame: &RawFrame) -> Result<TimeProfile> {
    decode_time_profile_reply(frame, Opcode::SetTimeProfile)
}

fn decode_time_profile_reply(frame: &RawFrame, opcode: Opcode) -> Result<TimeProfile> {
    expect_function(frame, opcode)?;
    let start = frame.read_bytes(9, 3);
    let end = frame.read_bytes(12, 3);
    let weekdays = frame.read_bytes(15, 7);
    let mut weekday_bytes = [0u8; 7];
    weekday_bytes.copy_from_slice(weekdays);

    let mut segments = [None; 3];
    for (segment, offset) in segments.iter_mut().zip(SEGMENT_OFFSETS) {
        let start_bytes = frame.read_bytes(offset, 2);
        let end_bytes = frame.read_bytes(offset + 2, 2);
        let start_hm = HourMinute::decode([start_bytes[0], start_bytes[1]]);
        let end_hm = HourMinute::decode([end_bytes[0], end_bytes[1]]);
        *segment = start_hm.zip(end_hm);
    }

    Ok(TimeProfile {
        id: frame.read_u8(8),
        start_date: Date::decode([start[0], start[1], start[2]]),
        end_date: Date::decode([end[0], end[1], end[2]]),
        weekdays: Weekdays::decode(weekday_bytes),
        segments,
        linked_profile: frame.read_u8(34),
    })
}

fn validate_profile_id(id: u8) -> Result<()> {
    if matches!(id, 2..=254) {
        Ok(())
    } else {
        Err(ProtocolError::OutOfRange { field: "profile id", value: i64::from(id), valid_range: "2..=254" })
    }
}

/// Encodes a `delete_all_time_profiles` request.
#[must_use]
pub fn encode_delete_all_time_profiles(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::DeleteAllTimeProfiles.to_u8(), controller)
}

/// Decodes a `delete_all_time_profiles` reply.
pub fn decode_delete_all_time_profiles(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::DeleteAllTimeProfiles, 8)
}

// ---------------------------------------------------------------------
// tasks
// ---------------------------------------------------------------------

/// Encodes an `add_task` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `task.door` is not in `1..=4`
/// or `task.task_type` is not in `0..=12`.
pub fn encode_add_task(controller: u32, task: Task) -> Result<RawFrame> {
    validate_door(task.door)?;
    if task.task_type > 12 {
        return Err(ProtocolError::OutOfRange {
            field: "task_type",
            value: i64::from(task.task_type),
            valid_range: "0..=12",
        });
    }
    let mut frame = RawFrame::new_request(SOM, Opcode::AddTask.to_u8(), controller);
    frame.write_bytes(8, &Date::encode(task.start_date));
    frame.write_bytes(11, &Date::encode(task.end_date));
    frame.write_bytes(14, &task.weekdays.encode());
    frame.write_bytes(21, &HourMinute::encode(Some(task.start_time)));
    frame.write_u8(23, task.door);
    frame.write_u8(24, task.task_type);
    frame.write_u8(25, task.more_cards);
    Ok(frame)
}

/// Decodes an `add_task` reply.
pub fn decode_add_task(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::AddTask, 8)
}

/// Encodes a `refresh_tasklist` request.
#[must_use]
pub fn encode_refresh_tasklist(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::RefreshTasklist.to_u8(), controller)
}

/// Decodes a `refresh_tasklist` reply.
pub fn decode_refresh_tasklist(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::RefreshTasklist, 8)
}

/// Encodes a `clear_tasklist` request.
#[must_use]
pub fn encode_clear_tasklist(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::ClearTasklist.to_u8(), controller)
}

/// Decodes a `clear_tasklist` reply.
pub fn decode_clear_tasklist(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::ClearTasklist, 8)
}

// ---------------------------------------------------------------------
// remaining control operations
// ---------------------------------------------------------------------

/// Encodes a `set_pc_control` request.
#[must_use]
pub fn encode_set_pc_control(controller: u32, enabled: bool) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::SetPcControl.to_u8(), controller);
    frame.write_u8(8, u8::from(enabled));
    frame
}

/// Decodes a `set_pc_control` reply.
pub fn decode_set_pc_control(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::SetPcControl, 8)
}

/// Encodes a `set_interlock` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `interlock` is not one of `{0,
/// 1, 2, 3, 4, 8}`.
pub fn encode_set_interlock(controller: u32, interlock: u8) -> Result<RawFrame> {
    if !matches!(interlock, 0 | 1 | 2 | 3 | 4 | 8) {
        return Err(ProtocolError::OutOfRange {
            field: "interlock",
            value: i64::from(interlock),
            valid_range: "{0,1,2,3,4,8}",
        });
    }
    let mut frame = RawFrame::new_request(SOM, Opcode::SetInterlock.to_u8(), controller);
    frame.write_u8(8, interlock);
    Ok(frame)
}

/// Decodes a `set_interlock` reply.
pub fn decode_set_interlock(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::SetInterlock, 8)
}

/// Encodes an `activate_keypads` request: one enable flag per door (1-4).
#[must_use]
pub fn encode_activate_keypads(controller: u32, enabled: [bool; 4]) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::ActivateKeypads.to_u8(), controller);
    for (i, flag) in enabled.into_iter().enumerate() {
        frame.write_u8(8 + i, u8::from(flag));
    }
    frame
}

/// Decodes an `activate_keypads` reply.
pub fn decode_activate_keypads(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::ActivateKeypads, 12)
}

/// Encodes a `set_door_passcodes` request: up to four 0..999999 supervisor
/// passcodes for one door (`0` disables a slot).
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `door` is not in `1..=4` or any
/// passcode exceeds `999999`.
pub fn encode_set_door_passcodes(controller: u32, door: u8, passcodes: [u32; 4]) -> Result<RawFrame> {
    validate_door(door)?;
    for code in passcodes {
        if code > 999_999 {
            return Err(ProtocolError::OutOfRange {
                field: "passcode",
                value: i64::from(code),
                valid_range: "0..=999999",
            });
        }
    }
    let mut frame = RawFrame::new_request(SOM, Opcode::SetDoorPasscodes.to_u8(), controller);
    frame.write_u8(8, door);
    for (i, code) in passcodes.into_iter().enumerate() {
        frame.write_u24(9 + i * 3, code);
    }
    Ok(frame)
}

/// Decodes a `set_door_passcodes` reply.
pub fn decode_set_door_passcodes(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::SetDoorPasscodes, 8)
}

/// Encodes a `get_antipassback` request.
#[must_use]
pub fn encode_get_antipassback(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::GetAntiPassback.to_u8(), controller)
}

/// Decodes a `get_antipassback` reply into the raw mode byte (0..4).
pub fn decode_get_antipassback(frame: &RawFrame) -> Result<u8> {
    expect_function(frame, Opcode::GetAntiPassback)?;
    Ok(frame.read_u8(8))
}

/// Encodes a `set_antipassback` request.
///
/// # Errors
///
/// Returns [`ProtocolError::OutOfRange`] if `mode` is not in `0..=4`.
pub fn encode_set_antipassback(controller: u32, mode: u8) -> Result<RawFrame> {
    if mode > 4 {
        return Err(ProtocolError::OutOfRange { field: "antipassback mode", value: i64::from(mode), valid_range: "0..=4" });
    }
    let mut frame = RawFrame::new_request(SOM, Opcode::SetAntiPassback.to_u8(), controller);
    frame.write_u8(8, mode);
    Ok(frame)
}

/// Decodes a `set_antipassback` reply.
pub fn decode_set_antipassback(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::SetAntiPassback, 8)
}

/// Encodes a `restore_default_parameters` request.
#[must_use]
pub fn encode_restore_default_parameters(controller: u32) -> RawFrame {
    RawFrame::new_request(SOM, Opcode::RestoreDefaultParameters.to_u8(), controller)
}

/// Decodes a `restore_default_parameters` reply.
pub fn decode_restore_default_parameters(frame: &RawFrame) -> Result<Ack> {
    decode_ack(frame, Opcode::RestoreDefaultParameters, 8)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bcd::Date;

    fn sample_controller_info_frame() -> RawFrame {
        let mut frame = RawFrame::new_request(SOM, Opcode::GetController.to_u8(), 405_419_896);
        frame.write_ipv4(8, [192, 168, 1, 100]);
        frame.write_ipv4(12, [255, 255, 255, 0]);
        frame.write_ipv4(16, [192, 168, 1, 1]);
        frame.write_mac(20, [0x00, 0x12, 0x23, 0x34, 0x45, 0x56]);
        frame.write_u8(26, 0x08);
        frame.write_u8(27, 0x92);
        frame.write_bytes(28, &Date::encode(Some(Date { year: 2018, month: 11, day: 5 })));
        frame
    }

    #[test]
    fn s1_get_controller_scenario() {
        let frame = sample_controller_info_frame();
        let info = decode_get_controller(&frame).unwrap();
        assert_eq!(info.serial, 405_419_896);
        assert_eq!(info.ip, [192, 168, 1, 100]);
        assert_eq!(info.mask, [255, 255, 255, 0]);
        assert_eq!(info.gateway, [192, 168, 1, 1]);
        assert_eq!(info.mac, [0x00, 0x12, 0x23, 0x34, 0x45, 0x56]);
        assert_eq!(info.version.to_display_string(), "v8.92");
        assert_eq!(info.date, Some(Date { year: 2018, month: 11, day: 5 }));
    }

    #[test]
    fn encode_get_controller_matches_request_envelope() {
        let frame = encode_get_controller(405_419_896);
        assert_eq!(frame.som(), SOM);
        assert_eq!(frame.function(), 0x94);
        assert_eq!(frame.controller(), 405_419_896);
    }

    #[test]
    fn decode_rejects_wrong_function_code() {
        let mut frame = sample_controller_info_frame();
        frame.write_u8(1, 0xFF);
        let err = decode_get_controller(&frame).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidFunctionCode(0xFF));
    }

    #[test]
    fn open_door_rejects_invalid_door() {
        let err = encode_open_door(1, 5).unwrap_err();
        assert_eq!(err, ProtocolError::OutOfRange { field: "door", value: 5, valid_range: "1..=4" });
    }

    #[test]
    fn open_door_round_trips() {
        let request = encode_open_door(1, 3).unwrap();
        assert_eq!(request.read_u8(8), 3);

        let mut reply = RawFrame::new_request(SOM, Opcode::OpenDoor.to_u8(), 1);
        reply.write_u8(8, 3);
        reply.write_u8(9, 1);
        let ack = decode_open_door(&reply).unwrap();
        assert!(ack.success);
    }

    #[test]
    fn get_status_no_event_decodes_to_none() {
        let mut frame = RawFrame::new_request(SOM, Opcode::GetStatus.to_u8(), 405_419_896);
        frame.write_bytes(8, &Date::encode(Some(Date { year: 2024, month: 1, day: 1 })));
        // event_index left as 0 -> no trailing event.
        let status = decode_get_status(&frame).unwrap();
        assert!(status.event.is_none());
    }

    #[test]
    fn get_status_with_event_decodes_event() {
        let mut frame = RawFrame::new_request(SOM, Opcode::GetStatus.to_u8(), 405_419_896);
        frame.write_u32(26, 42);
        frame.write_u8(30, 1);
        frame.write_u8(31, 1);
        frame.write_u8(32, 2);
        frame.write_u32(34, 8_165_538);
        let status = decode_get_status(&frame).unwrap();
        let event = status.event.expect("event expected");
        assert_eq!(event.index, 42);
        assert_eq!(event.card, 8_165_538);
        assert!(event.access_granted);
    }

    #[test]
    fn decode_event_accepts_v662_som() {
        let mut bytes = [0u8; 64];
        bytes[0] = crate::frame::SOM_EVENT_V662;
        bytes[1] = Opcode::Event.to_u8();
        let frame = RawFrame::from_bytes(&bytes).unwrap();
        assert!(decode_event(&frame).is_ok());
    }

    #[test]
    fn decode_event_rejects_unexpected_function() {
        let mut bytes = [0u8; 64];
        bytes[0] = SOM;
        bytes[1] = 0xFF;
        let frame = RawFrame::from_bytes(&bytes).unwrap();
        let err = decode_event(&frame).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidFunctionCode(0xFF));
        assert_eq!(err.to_string(), "invalid reply function code (ff)");
    }

    #[test]
    fn get_card_sentinels_are_not_errors() {
        let mut not_found = RawFrame::new_request(SOM, Opcode::GetCard.to_u8(), 1);
        not_found.write_u32(8, 0);
        assert_eq!(decode_get_card(&not_found).unwrap().number, 0);

        let mut deleted = RawFrame::new_request(SOM, Opcode::GetCard.to_u8(), 1);
        deleted.write_u32(8, 0xFFFF_FFFF);
        assert_eq!(decode_get_card(&deleted).unwrap().number, 0xFFFF_FFFF);
    }

    #[test]
    fn put_card_round_trips_all_fields() {
        let card = Card {
            number: 8_165_538,
            start_date: Some(Date { year: 2024, month: 1, day: 1 }),
            end_date: Some(Date { year: 2025, month: 1, day: 1 }),
            doors: [
                DoorPermission::AlwaysOpen,
                DoorPermission::None,
                DoorPermission::TimeProfile(3),
                DoorPermission::None,
            ],
            pin: 123_456,
        };
        let request = encode_put_card(1, card).unwrap();
        let decoded = decode_card_reply(&request, Opcode::PutCard).unwrap();
        assert_eq!(decoded, card);
    }

    #[test]
    fn put_card_rejects_pin_out_of_range() {
        let card = Card {
            number: 1,
            start_date: None,
            end_date: None,
            doors: [DoorPermission::None; 4],
            pin: 1_000_000,
        };
        assert!(encode_put_card(1, card).is_err());
    }

    #[test]
    fn get_event_sentinels() {
        let mut not_found = RawFrame::new_request(SOM, Opcode::GetEvent.to_u8(), 1);
        not_found.write_u32(8, 0);
        assert_eq!(decode_get_event(&not_found).unwrap().index, 0);

        let mut overwritten = RawFrame::new_request(SOM, Opcode::GetEvent.to_u8(), 1);
        overwritten.write_u32(8, 5);
        overwritten.write_u8(12, 0xFF);
        assert_eq!(decode_get_event(&overwritten).unwrap().kind, 0xFF);
    }

    #[test]
    fn time_profile_round_trips() {
        let profile = TimeProfile {
            id: 7,
            start_date: Some(Date { year: 2024, month: 1, day: 1 }),
            end_date: None,
            weekdays: Weekdays::decode([1, 0, 1, 0, 1, 0, 0]),
            segments: [
                Some((HourMinute { hour: 8, minute: 0 }, HourMinute { hour: 12, minute: 0 })),
                None,
                Some((HourMinute { hour: 13, minute: 30 }, HourMinute { hour: 17, minute: 45 })),
            ],
            linked_profile: 9,
        };
        let request = encode_set_time_profile(1, profile).unwrap();
        let decoded = decode_time_profile_reply(&request, Opcode::SetTimeProfile).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn time_profile_rejects_bad_id() {
        assert!(encode_get_time_profile(1, 1).is_err());
        assert!(encode_get_time_profile(1, 255).is_err());
    }

    #[test]
    fn task_round_trips() {
        let task = Task {
            start_date: Some(Date { year: 2024, month: 6, day: 1 }),
            end_date: Some(Date { year: 2024, month: 12, day: 31 }),
            weekdays: Weekdays::decode([1, 1, 1, 1, 1, 0, 0]),
            start_time: HourMinute { hour: 7, minute: 30 },
            door: 2,
            task_type: 1,
            more_cards: 0,
        };
        let request = encode_add_task(1, task).unwrap();
        assert_eq!(request.read_u8(23), 2);
        assert_eq!(request.read_u8(24), 1);
    }

    #[test]
    fn interlock_rejects_invalid_value() {
        assert!(encode_set_interlock(1, 5).is_err());
        assert!(encode_set_interlock(1, 8).is_ok());
    }

    #[test]
    fn set_ip_has_no_decoder_and_single_payload() {
        let frame = encode_set_ip(1, [10, 0, 0, 5], [255, 255, 255, 0], [10, 0, 0, 1]);
        assert_eq!(frame.read_ipv4(8), [10, 0, 0, 5]);
        assert_eq!(frame.read_ipv4(12), [255, 255, 255, 0]);
        assert_eq!(frame.read_ipv4(16), [10, 0, 0, 1]);
    }
}
