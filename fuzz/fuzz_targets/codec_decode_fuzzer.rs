//! Fuzz target for the per-operation `decode_*` functions in
//! `doorctl_proto::codec`.
//!
//! Builds a frame from arbitrary bytes, forces its function byte to each
//! known opcode in turn, and calls that opcode's decoder. Must never panic -
//! a malformed payload inside an otherwise well-formed 64-byte envelope
//! should only ever produce sentinel field values or a structured
//! `ProtocolError`.

#![no_main]

use doorctl_proto::{RawFrame, SOM, codec, opcode::Opcode};
use libfuzzer_sys::fuzz_target;

const OPCODES: &[Opcode] = &[
    Opcode::GetController,
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
    Opcode::Event,
];

fn decode_for(opcode: Opcode, frame: &RawFrame) {
    let _: Result<(), doorctl_proto::ProtocolError> = match opcode {
        Opcode::GetController => codec::decode_get_controller(frame).map(|_| ()),
        Opcode::GetStatus => codec::decode_get_status(frame).map(|_| ()),
        Opcode::GetTime => codec::decode_get_time(frame).map(|_| ()),
        Opcode::SetTime => codec::decode_set_time(frame).map(|_| ()),
        Opcode::OpenDoor => codec::decode_open_door(frame).map(|_| ()),
        Opcode::GetListener => codec::decode_get_listener(frame).map(|_| ()),
        Opcode::SetListener => codec::decode_set_listener(frame).map(|_| ()),
        Opcode::GetDoorControl => codec::decode_get_door_control(frame).map(|_| ()),
        Opcode::SetDoorControl => codec::decode_set_door_control(frame).map(|_| ()),
        Opcode::GetCards => codec::decode_get_cards(frame).map(|_| ()),
        Opcode::GetCard => codec::decode_get_card(frame).map(|_| ()),
        Opcode::GetCardByIndex => codec::decode_get_card_by_index(frame).map(|_| ()),
        Opcode::PutCard => codec::decode_put_card(frame).map(|_| ()),
        Opcode::DeleteCard => codec::decode_delete_card(frame).map(|_| ()),
        Opcode::DeleteAllCards => codec::decode_delete_all_cards(frame).map(|_| ()),
        Opcode::GetEvent => codec::decode_get_event(frame).map(|_| ()),
        Opcode::GetEventIndex => codec::decode_get_event_index(frame).map(|_| ()),
        Opcode::SetEventIndex => codec::decode_set_event_index(frame).map(|_| ()),
        Opcode::RecordSpecialEvents => codec::decode_record_special_events(frame).map(|_| ()),
        Opcode::GetTimeProfile => codec::decode_get_time_profile(frame).map(|_| ()),
        Opcode::SetTimeProfile => codec::decode_set_time_profile(frame).map(|_| ()),
        Opcode::DeleteAllTimeProfiles => codec::decode_delete_all_time_profiles(frame).map(|_| ()),
        Opcode::AddTask => codec::decode_add_task(frame).map(|_| ()),
        Opcode::RefreshTasklist => codec::decode_refresh_tasklist(frame).map(|_| ()),
        Opcode::ClearTasklist => codec::decode_clear_tasklist(frame).map(|_| ()),
        Opcode::SetPcControl => codec::decode_set_pc_control(frame).map(|_| ()),
        Opcode::SetInterlock => codec::decode_set_interlock(frame).map(|_| ()),
        Opcode::ActivateKeypads => codec::decode_activate_keypads(frame).map(|_| ()),
        Opcode::SetDoorPasscodes => codec::decode_set_door_passcodes(frame).map(|_| ()),
        Opcode::GetAntiPassback => codec::decode_get_antipassback(frame).map(|_| ()),
        Opcode::SetAntiPassback => codec::decode_set_antipassback(frame).map(|_| ()),
        Opcode::RestoreDefaultParameters => codec::decode_restore_default_parameters(frame).map(|_| ()),
        Opcode::Event => codec::decode_event(frame).map(|_| ()),
        // `SetIp` has no decoder - it elicits no reply.
        Opcode::SetIp => Ok(()),
    };
}

fuzz_target!(|data: [u8; 64]| {
    let mut bytes = data;
    bytes[0] = SOM;
    let Ok(base) = RawFrame::from_bytes(&bytes) else { return };

    for &opcode in OPCODES {
        let mut frame = base;
        frame.write_u8(1, opcode.to_u8());
        decode_for(opcode, &frame);
    }
});
