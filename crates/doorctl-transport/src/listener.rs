//! Unsolicited UDP event listener (§4.6).
//!
//! [`run_listener`] is the core listener: bind, deliver every well-formed
//! 64-byte datagram to a handler, observe a shutdown signal, exit cleanly.
//! [`QueuedConsumer`] is the reference bounded-queue consumer built on top
//! of it - explicitly called out in the design notes as an example, not
//! part of the core listener contract.

use std::net::SocketAddr;

use doorctl_proto::{ProtocolError, codec, types::Status};
use tokio::{net::UdpSocket, sync::{mpsc, oneshot}};
use tracing::{info, trace, warn};

use crate::error::{Result, TransportError};

/// Lifecycle states the listener passes through. `Closed` is the only
/// terminal state; there is no internal restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// Not yet bound.
    Unbound,
    /// Socket bound, not yet polling.
    Bound,
    /// Waiting for the next datagram or the shutdown signal.
    Running,
    /// Decoding and delivering a received datagram.
    Handling,
    /// Shutdown observed, socket being dropped.
    Closing,
    /// Terminal state.
    Closed,
}

/// Runs the event listener until `shutdown` fires.
///
/// For every 64-byte datagram received, decodes it with
/// [`codec::decode_event`] and calls `on_event`; other lengths are dropped.
/// Decode errors (wrong SOM, wrong function byte) are reported to
/// `on_error` rather than terminating the loop. Neither callback is
/// awaited beyond the single call that delivers the datagram - callers that
/// need to do slow work should hand it off instead of blocking inside the
/// callback.
///
/// # Errors
///
/// Returns [`TransportError::Io`] if the socket fails to bind.
pub async fn run_listener<OnEvent, OnError>(
    bind_addr: SocketAddr,
    mut shutdown: oneshot::Receiver<()>,
    mut on_event: OnEvent,
    mut on_error: OnError,
) -> Result<()>
where
    OnEvent: FnMut(Status) + Send,
    OnError: FnMut(ProtocolError) + Send,
{
    let mut state = ListenerState::Unbound;
    trace!(target: "doorctl_transport::listener", ?state, "listener starting");

    let socket = UdpSocket::bind(bind_addr).await?;
    state = ListenerState::Bound;
    info!(target: "doorctl_transport::listener", %bind_addr, ?state, "listener bound");

    let mut buf = [0u8; 2048];
    state = ListenerState::Running;
    trace!(target: "doorctl_transport::listener", ?state, "listener polling");

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                state = ListenerState::Closing;
                trace!(target: "doorctl_transport::listener", ?state, "shutdown observed");
                break;
            }
            recv = socket.recv_from(&mut buf) => {
                let (len, peer) = recv?;
                if len != doorctl_proto::FRAME_SIZE {
                    continue;
                }
                state = ListenerState::Handling;
                match doorctl_proto::RawFrame::from_bytes(&buf[..len]).and_then(|f| codec::decode_event(&f)) {
                    Ok(status) => on_event(status),
                    Err(err) => {
                        warn!(target: "doorctl_transport::listener", %peer, %err, "failed to decode event datagram");
                        on_error(err);
                    },
                }
                state = ListenerState::Running;
            }
        }
    }

    drop(socket);
    state = ListenerState::Closed;
    info!(target: "doorctl_transport::listener", ?state, "listener closed");
    Ok(())
}

/// Reference bounded-queue consumer for [`run_listener`].
///
/// Not part of the core listener contract (§4.6) - a convenience for
/// callers who want events delivered through a channel instead of a
/// callback. When the queue is full, new events are dropped and a warning
/// is logged identifying the dropped event's index.
pub struct QueuedConsumer {
    receiver: mpsc::Receiver<Status>,
}

impl QueuedConsumer {
    /// Default bounded queue depth.
    pub const DEFAULT_DEPTH: usize = 8;

    /// Spawns a listener task that pushes decoded events into a bounded
    /// channel of depth [`Self::DEFAULT_DEPTH`], returning the consumer and
    /// the shutdown sender that stops it.
    #[must_use]
    pub fn spawn(bind_addr: SocketAddr) -> (Self, oneshot::Sender<()>) {
        Self::spawn_with_depth(bind_addr, Self::DEFAULT_DEPTH)
    }

    /// Like [`Self::spawn`] with an explicit queue depth.
    #[must_use]
    pub fn spawn_with_depth(bind_addr: SocketAddr, depth: usize) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = mpsc::channel(depth);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let on_event = {
                let tx = tx.clone();
                move |status: Status| {
                    let index = status.event.map(|e| e.index);
                    if let Err(mpsc::error::TrySendError::Full(_)) = tx.try_send(status) {
                        warn!(target: "doorctl_transport::listener", ?index, "queue full, dropping event");
                    }
                }
            };
            let on_error = |err: ProtocolError| {
                warn!(target: "doorctl_transport::listener", %err, "listener decode error");
            };
            if let Err(err) = run_listener(bind_addr, shutdown_rx, on_event, on_error).await {
                warn!(target: "doorctl_transport::listener", %err, "listener exited with error");
            }
        });

        (Self { receiver: rx }, shutdown_tx)
    }

    /// Awaits the next decoded event, or `None` once the listener has
    /// closed and drained.
    pub async fn recv(&mut self) -> Option<Status> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use doorctl_proto::{Opcode, SOM};
    use tokio::net::UdpSocket as ClientSocket;

    use super::*;

    #[tokio::test]
    async fn delivers_decoded_events_and_shuts_down_cleanly() {
        let bind_addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let probe = UdpSocket::bind(bind_addr).await.unwrap();
        let listen_addr = probe.local_addr().unwrap();
        drop(probe);

        let (tx, rx) = oneshot::channel();
        let (event_tx, mut event_rx) = mpsc::channel(4);

        let handle = tokio::spawn(run_listener(
            listen_addr,
            rx,
            move |status: Status| {
                let _ = event_tx.try_send(status);
            },
            |_err: ProtocolError| {},
        ));

        tokio::time::sleep(Duration::from_millis(20)).await;

        let client = ClientSocket::bind("127.0.0.1:0").await.unwrap();
        let mut frame = doorctl_proto::RawFrame::new_request(SOM, Opcode::Event.to_u8(), 1);
        frame.write_bytes(8, &[0; 56]);
        client.send_to(frame.as_bytes(), listen_addr).await.unwrap();

        let status = event_rx.recv().await.expect("event delivered");
        assert_eq!(status.serial, 1);

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn drops_non_64_byte_datagrams() {
        let bind_addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let probe = UdpSocket::bind(bind_addr).await.unwrap();
        let listen_addr = probe.local_addr().unwrap();
        drop(probe);

        let (tx, rx) = oneshot::channel();
        let (event_tx, mut event_rx) = mpsc::channel::<Status>(4);

        let handle = tokio::spawn(run_listener(listen_addr, rx, move |status| {
            let _ = event_tx.try_send(status);
        }, |_err| {}));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let client = ClientSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&[0u8; 10], listen_addr).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(event_rx.try_recv().is_err());

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
