//! The request dispatcher (§4.7): one async function per protocol
//! operation, each performing disambiguate -> encode -> transport select ->
//! decode -> validate.

use std::{net::SocketAddr, time::Duration};

use doorctl_core::{ControllerRef, IntoControllerRef, Protocol, net};
use doorctl_proto::{
    RawFrame,
    bcd::{Date, Time},
    codec::{self, Ack, ControllerTime, DoorControl},
    hex_dump,
    types::{Card, ControllerInfo, Event, Listener, Status, Task, TimeProfile},
};
use doorctl_transport::{TransportError, broadcast_send, tcp_send, udp_send};
use tracing::{instrument, trace};

use crate::{
    config::ClientConfig,
    error::{DispatcherError, Result},
};

/// Client for the 64-byte access-controller wire protocol.
///
/// Holds only configuration (§5: transport objects hold no per-call state
/// between operations). Every method opens its own socket(s) for the
/// duration of the call.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    /// Builds a client from the given configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// This client's configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn resolve_dest(&self, addr: &str) -> Result<SocketAddr> {
        let (host, port) = net::resolve(addr)?;
        let ip = host
            .parse()
            .map_err(|_| doorctl_core::ConfigError::InvalidAddress(addr.to_string()))?;
        Ok(SocketAddr::new(ip, port))
    }

    fn log_outgoing(&self, request: &RawFrame) {
        if self.config.debug {
            trace!(target: "doorctl_client", frame = %hex_dump(request), "outgoing frame");
        }
    }

    fn log_incoming(&self, reply: &RawFrame) {
        if self.config.debug {
            trace!(target: "doorctl_client", frame = %hex_dump(reply), "incoming frame");
        }
    }

    /// Sends `request` and returns exactly one validated reply frame,
    /// selecting transport per §4.7 step 3: TCP when the ref names TCP and
    /// an address, addressed UDP when it names an address, broadcast-select
    /// (filtering replies for the matching serial) otherwise.
    async fn round_trip(&self, ctrl: &ControllerRef, request: &RawFrame) -> Result<RawFrame> {
        self.log_outgoing(request);

        let reply = match (&ctrl.addr, ctrl.protocol) {
            (Some(addr), Protocol::Tcp) => {
                let dest = self.resolve_dest(addr)?;
                tcp_send(dest, request, self.config.timeout)
                    .await?
                    .ok_or(TransportError::Timeout(self.config.timeout))?
            },
            (Some(addr), Protocol::Udp) => {
                let dest = self.resolve_dest(addr)?;
                udp_send(self.config.bind, dest, request, self.config.timeout)
                    .await?
                    .ok_or(TransportError::Timeout(self.config.timeout))?
            },
            (None, _) => {
                let replies =
                    broadcast_send(self.config.bind, self.config.broadcast, request, self.config.timeout).await?;
                replies
                    .into_iter()
                    .find(|f| f.controller() == ctrl.id)
                    .ok_or(TransportError::Timeout(self.config.timeout))?
            },
        };

        self.log_incoming(&reply);

        if reply.controller() != ctrl.id {
            return Err(DispatcherError::InvalidResponse {
                field: "controller",
                value: i64::from(reply.controller()),
            });
        }
        Ok(reply)
    }

    /// Sends `request` expecting no reply (only `set_ip` behaves this way -
    /// §4.4, §4.5). Address-less calls broadcast the request and return
    /// immediately rather than waiting out the full collection deadline.
    async fn send_no_reply(&self, ctrl: &ControllerRef, request: &RawFrame) -> Result<()> {
        self.log_outgoing(request);
        match (&ctrl.addr, ctrl.protocol) {
            (Some(addr), Protocol::Tcp) => {
                let dest = self.resolve_dest(addr)?;
                tcp_send(dest, request, self.config.timeout).await?;
            },
            (Some(addr), Protocol::Udp) => {
                let dest = self.resolve_dest(addr)?;
                udp_send(self.config.bind, dest, request, self.config.timeout).await?;
            },
            (None, _) => {
                broadcast_send(self.config.bind, self.config.broadcast, request, Duration::ZERO).await?;
            },
        }
        Ok(())
    }

    /// `get_controller` (§6.1 opcode `0x94`): network/firmware identity.
    #[instrument(skip(self, controller), level = "debug")]
    pub async fn get_controller(&self, controller: impl IntoControllerRef) -> Result<ControllerInfo> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_controller(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_controller(&reply)?)
    }

    /// `set_ip` (`0x96`): pushes a new network configuration. Elicits no
    /// reply by design; returns once the datagram is sent.
    pub async fn set_ip(
        &self,
        controller: impl IntoControllerRef,
        address: [u8; 4],
        mask: [u8; 4],
        gateway: [u8; 4],
    ) -> Result<()> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_ip(ctrl.id, address, mask, gateway);
        self.send_no_reply(&ctrl, &request).await
    }

    /// `get_time` (`0x32`): reads the controller's system clock.
    pub async fn get_time(&self, controller: impl IntoControllerRef) -> Result<ControllerTime> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_time(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_time(&reply)?)
    }

    /// `set_time` (`0x30`): writes the controller's system clock.
    pub async fn set_time(&self, controller: impl IntoControllerRef, date: Date, time: Time) -> Result<ControllerTime> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_time(ctrl.id, date, time);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_time(&reply)?)
    }

    /// `get_status` (`0x20`): polls door/input/event status.
    pub async fn get_status(&self, controller: impl IntoControllerRef) -> Result<Status> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_status(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_status(&reply)?)
    }

    /// `get_status`'s nominal error-raising twin. Behaves identically to
    /// [`Self::get_status`]: unlike the card/event/time-profile records,
    /// this operation's wire reply carries no distinct not-found sentinel
    /// beyond the controller-serial mismatch [`Self::round_trip`] already
    /// raises as [`DispatcherError::InvalidResponse`] (see `DESIGN.md`).
    pub async fn get_status_record(&self, controller: impl IntoControllerRef) -> Result<Status> {
        self.get_status(controller).await
    }

    /// `get_listener` (`0x92`): reads the configured event listener address.
    pub async fn get_listener(&self, controller: impl IntoControllerRef) -> Result<Listener> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_listener(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_listener(&reply)?)
    }

    /// `set_listener` (`0x90`): configures the event listener address.
    pub async fn set_listener(
        &self,
        controller: impl IntoControllerRef,
        address: [u8; 4],
        port: u16,
        auto_send_interval: u8,
    ) -> Result<Listener> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_listener(ctrl.id, address, port, auto_send_interval);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_listener(&reply)?)
    }

    /// `get_door_control` (`0x82`): reads a door's control mode/delay.
    pub async fn get_door_control(&self, controller: impl IntoControllerRef, door: u8) -> Result<DoorControl> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_door_control(ctrl.id, door)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_door_control(&reply)?)
    }

    /// `set_door_control` (`0x80`): writes a door's control mode/delay.
    pub async fn set_door_control(
        &self,
        controller: impl IntoControllerRef,
        door: u8,
        mode: u8,
        delay: u8,
    ) -> Result<DoorControl> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_door_control(ctrl.id, door, mode, delay)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_door_control(&reply)?)
    }

    /// `open_door` (`0x40`): remotely unlocks a door.
    pub async fn open_door(&self, controller: impl IntoControllerRef, door: u8) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_open_door(ctrl.id, door)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_open_door(&reply)?)
    }

    /// `get_cards` (`0x58`): reads the stored card count.
    pub async fn get_cards(&self, controller: impl IntoControllerRef) -> Result<u32> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_cards(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_cards(&reply)?)
    }

    /// `get_card` (`0x5A`): fetches a card by card number. Returns sentinel
    /// fields (`number == 0` not-found, `0xFFFFFFFF` deleted) rather than an
    /// error - see [`Self::get_card_record`] for the error-raising twin.
    pub async fn get_card(&self, controller: impl IntoControllerRef, card_number: u32) -> Result<Card> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_card(ctrl.id, card_number);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_card(&reply)?)
    }

    /// `get_card`'s error-raising twin: promotes the `number == 0` and
    /// `number == 0xFFFFFFFF` wire sentinels to
    /// [`DispatcherError::CardNotFound`]/[`DispatcherError::CardDeleted`].
    pub async fn get_card_record(&self, controller: impl IntoControllerRef, card_number: u32) -> Result<Card> {
        promote_card_sentinels(self.get_card(controller, card_number).await?)
    }

    /// `get_card_by_index` (`0x5C`): fetches a card by storage index.
    pub async fn get_card_by_index(&self, controller: impl IntoControllerRef, index: u32) -> Result<Card> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_card_by_index(ctrl.id, index);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_card_by_index(&reply)?)
    }

    /// `get_card_by_index`'s error-raising twin, see
    /// [`Self::get_card_record`].
    pub async fn get_card_record_by_index(&self, controller: impl IntoControllerRef, index: u32) -> Result<Card> {
        promote_card_sentinels(self.get_card_by_index(controller, index).await?)
    }

    /// `put_card` (`0x50`): creates or updates a card record.
    pub async fn put_card(&self, controller: impl IntoControllerRef, card: Card) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_put_card(ctrl.id, card)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_put_card(&reply)?)
    }

    /// `delete_card` (`0x52`): removes a single card record.
    pub async fn delete_card(&self, controller: impl IntoControllerRef, card_number: u32) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_delete_card(ctrl.id, card_number);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_delete_card(&reply)?)
    }

    /// `delete_all_cards` (`0x54`): wipes the card table.
    pub async fn delete_all_cards(&self, controller: impl IntoControllerRef) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_delete_all_cards(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_delete_all_cards(&reply)?)
    }

    /// `get_event` (`0xB0`): fetches an event record by index. Returns
    /// sentinel fields (`index == 0` not-found, `kind == 0xFF` overwritten)
    /// rather than an error - see [`Self::get_event_record`].
    pub async fn get_event(&self, controller: impl IntoControllerRef, index: u32) -> Result<Event> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_event(ctrl.id, index);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_event(&reply)?)
    }

    /// `get_event`'s error-raising twin: promotes the `index == 0` and
    /// `kind == 0xFF` wire sentinels to
    /// [`DispatcherError::EventNotFound`]/[`DispatcherError::EventOverwritten`].
    pub async fn get_event_record(&self, controller: impl IntoControllerRef, index: u32) -> Result<Event> {
        let event = self.get_event(controller, index).await?;
        if event.index == 0 {
            return Err(DispatcherError::EventNotFound);
        }
        if event.kind == 0xFF {
            return Err(DispatcherError::EventOverwritten);
        }
        Ok(event)
    }

    /// `get_event_index` (`0xB4`): reads the controller's current event
    /// index.
    pub async fn get_event_index(&self, controller: impl IntoControllerRef) -> Result<u32> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_event_index(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_event_index(&reply)?)
    }

    /// `set_event_index` (`0xB2`): sets the controller's current event
    /// index.
    pub async fn set_event_index(&self, controller: impl IntoControllerRef, index: u32) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_event_index(ctrl.id, index);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_event_index(&reply)?)
    }

    /// `record_special_events` (`0x8E`): enables/disables non-access event
    /// reporting.
    pub async fn record_special_events(&self, controller: impl IntoControllerRef, enabled: bool) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_record_special_events(ctrl.id, enabled);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_record_special_events(&reply)?)
    }

    /// `get_time_profile` (`0x98`): fetches a time profile by id. A decoded
    /// `id == 0` means "not found" - see [`Self::get_time_profile_record`]
    /// for the error-raising twin.
    pub async fn get_time_profile(&self, controller: impl IntoControllerRef, id: u8) -> Result<TimeProfile> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_time_profile(ctrl.id, id)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_time_profile(&reply)?)
    }

    /// `get_time_profile`'s error-raising twin: promotes the `id == 0` wire
    /// sentinel to [`DispatcherError::TimeProfileNotFound`].
    pub async fn get_time_profile_record(&self, controller: impl IntoControllerRef, id: u8) -> Result<TimeProfile> {
        let profile = self.get_time_profile(controller, id).await?;
        if profile.id == 0 {
            return Err(DispatcherError::TimeProfileNotFound);
        }
        Ok(profile)
    }

    /// `set_time_profile` (`0x88`): creates or updates a time profile.
    pub async fn set_time_profile(
        &self,
        controller: impl IntoControllerRef,
        profile: TimeProfile,
    ) -> Result<TimeProfile> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_time_profile(ctrl.id, profile)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_time_profile(&reply)?)
    }

    /// `delete_all_time_profiles` (`0x8A`): wipes all time profiles.
    pub async fn delete_all_time_profiles(&self, controller: impl IntoControllerRef) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_delete_all_time_profiles(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_delete_all_time_profiles(&reply)?)
    }

    /// `add_task` (`0xA8`): appends a scheduled task.
    pub async fn add_task(&self, controller: impl IntoControllerRef, task: Task) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_add_task(ctrl.id, task)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_add_task(&reply)?)
    }

    /// `refresh_tasklist` (`0xAC`): commits the pending task list.
    pub async fn refresh_tasklist(&self, controller: impl IntoControllerRef) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_refresh_tasklist(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_refresh_tasklist(&reply)?)
    }

    /// `clear_tasklist` (`0xA6`): discards the pending task list.
    pub async fn clear_tasklist(&self, controller: impl IntoControllerRef) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_clear_tasklist(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_clear_tasklist(&reply)?)
    }

    /// `set_pc_control` (`0xA0`): enables/disables host override of door
    /// control.
    pub async fn set_pc_control(&self, controller: impl IntoControllerRef, enabled: bool) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_pc_control(ctrl.id, enabled);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_pc_control(&reply)?)
    }

    /// `set_interlock` (`0xA2`): configures door interlock grouping.
    pub async fn set_interlock(&self, controller: impl IntoControllerRef, interlock: u8) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_interlock(ctrl.id, interlock)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_interlock(&reply)?)
    }

    /// `activate_keypads` (`0xA4`): enables/disables reader keypads, one
    /// flag per door (1-4).
    pub async fn activate_keypads(&self, controller: impl IntoControllerRef, enabled: [bool; 4]) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_activate_keypads(ctrl.id, enabled);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_activate_keypads(&reply)?)
    }

    /// `set_door_passcodes` (`0x8C`): configures up to four supervisor
    /// passcodes for one door.
    pub async fn set_door_passcodes(
        &self,
        controller: impl IntoControllerRef,
        door: u8,
        passcodes: [u32; 4],
    ) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_door_passcodes(ctrl.id, door, passcodes)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_door_passcodes(&reply)?)
    }

    /// `get_antipassback` (`0x86`): reads the anti-passback mode (0-4).
    pub async fn get_antipassback(&self, controller: impl IntoControllerRef) -> Result<u8> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_get_antipassback(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_get_antipassback(&reply)?)
    }

    /// `set_antipassback` (`0x84`): writes the anti-passback mode.
    pub async fn set_antipassback(&self, controller: impl IntoControllerRef, mode: u8) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_set_antipassback(ctrl.id, mode)?;
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_set_antipassback(&reply)?)
    }

    /// `restore_default_parameters` (`0xC8`): factory-resets the
    /// controller.
    pub async fn restore_default_parameters(&self, controller: impl IntoControllerRef) -> Result<Ack> {
        let ctrl = controller.disambiguate()?;
        let request = codec::encode_restore_default_parameters(ctrl.id);
        let reply = self.round_trip(&ctrl, &request).await?;
        Ok(codec::decode_restore_default_parameters(&reply)?)
    }

    /// The broadcast-discovery form (§4.3, §4.7): sends `get_controller`
    /// with serial `0` and returns every reply decoded, in first-received
    /// order, without the single-controller serial filter
    /// [`Self::round_trip`] applies to every other operation.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_all_controllers(&self, timeout: Option<Duration>) -> Result<Vec<ControllerInfo>> {
        let request = codec::encode_get_controller(0);
        self.log_outgoing(&request);
        let replies =
            broadcast_send(self.config.bind, self.config.broadcast, &request, timeout.unwrap_or(self.config.timeout))
                .await?;
        replies
            .iter()
            .inspect(|reply| self.log_incoming(reply))
            .map(|reply| codec::decode_get_controller(reply).map_err(DispatcherError::from))
            .collect()
    }
}

fn promote_card_sentinels(card: Card) -> Result<Card> {
    match card.number {
        0 => Err(DispatcherError::CardNotFound),
        0xFFFF_FFFF => Err(DispatcherError::CardDeleted),
        _ => Ok(card),
    }
}
