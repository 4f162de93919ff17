//! UDP broadcast discovery transport (§4.3).

use std::{net::SocketAddr, time::Duration};

use doorctl_proto::RawFrame;
use tokio::{net::UdpSocket, time};
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};

/// Sends `request` to `broadcast_addr` from `bind_addr`, then collects every
/// well-formed 64-byte reply datagram until `timeout` elapses.
///
/// Non-64-byte datagrams are dropped silently (§4.3). Returns an empty
/// vector, not an error, if nothing replies in time.
///
/// # Errors
///
/// Returns [`TransportError::SelfBroadcastGuard`] if `bind_addr`'s port
/// equals `broadcast_addr`'s port, and [`TransportError::Io`] for bind or
/// socket option failures.
pub async fn broadcast_send(
    bind_addr: SocketAddr,
    broadcast_addr: SocketAddr,
    request: &RawFrame,
    timeout: Duration,
) -> Result<Vec<RawFrame>> {
    if bind_addr.port() != 0 && bind_addr.port() == broadcast_addr.port() {
        return Err(TransportError::SelfBroadcastGuard(bind_addr.port()));
    }

    let socket = UdpSocket::bind(bind_addr).await?;
    socket.set_broadcast(true)?;
    socket.send_to(request.as_bytes(), broadcast_addr).await?;
    debug!(target: "doorctl_transport::udp_broadcast", bytes = doorctl_proto::FRAME_SIZE, %broadcast_addr, "sent broadcast request");

    let mut replies = Vec::new();
    let mut buf = [0u8; 2048];
    let deadline = time::Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match time::timeout(remaining, socket.recv_from(&mut buf)).await {
            Ok(Ok((len, peer))) => match RawFrame::from_bytes(&buf[..len]) {
                Ok(frame) => {
                    debug!(target: "doorctl_transport::udp_broadcast", %peer, "accepted reply");
                    replies.push(frame);
                },
                Err(err) => {
                    warn!(target: "doorctl_transport::udp_broadcast", %peer, %err, "dropped malformed datagram");
                },
            },
            Ok(Err(err)) => return Err(TransportError::Io(err)),
            Err(_elapsed) => break,
        }
    }

    info!(target: "doorctl_transport::udp_broadcast", count = replies.len(), "broadcast discovery complete");
    Ok(replies)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use doorctl_proto::{Opcode, SOM};

    use super::*;

    #[tokio::test]
    async fn self_broadcast_guard_rejects_matching_ports() {
        let bind: SocketAddr = "127.0.0.1:60000".parse().unwrap();
        let broadcast: SocketAddr = "255.255.255.255:60000".parse().unwrap();
        let request = RawFrame::new_request(SOM, Opcode::GetController.to_u8(), 0);
        let err = broadcast_send(bind, broadcast, &request, Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, TransportError::SelfBroadcastGuard(60000)));
    }

    #[tokio::test]
    async fn collects_replies_from_a_peer_until_deadline() {
        let bind: SocketAddr = "127.0.0.1:0".parse().unwrap();

        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let responder_addr = responder.local_addr().unwrap();

        let request = RawFrame::new_request(SOM, Opcode::GetController.to_u8(), 42);
        let send_task = broadcast_send(bind, responder_addr, &request, Duration::from_millis(200));

        let respond_task = async {
            let mut buf = [0u8; 64];
            let (len, peer) = responder.recv_from(&mut buf).await.unwrap();
            let reply = RawFrame::from_bytes(&buf[..len]).unwrap();
            assert_eq!(reply.controller(), 42);
            let mut reply_bytes = *reply.as_bytes();
            reply_bytes[1] = Opcode::GetController.to_u8();
            responder.send_to(&reply_bytes, peer).await.unwrap();
        };

        let (replies, ()) = tokio::join!(send_task, respond_task);
        let replies = replies.unwrap();
        assert_eq!(replies.len(), 1);
    }
}
