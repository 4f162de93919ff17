//! Addressed UDP send transport (§4.4).

use std::{net::SocketAddr, time::Duration};

use doorctl_proto::{RawFrame, opcode::Opcode};
use tokio::{net::UdpSocket, time};
use tracing::{debug, warn};

use crate::error::{Result, TransportError};

/// Sends `request` to `dest` from `bind_addr`, connecting the socket first
/// so replies from any other peer are rejected by the kernel, and waits up
/// to `timeout` for exactly one 64-byte reply.
///
/// Returns `None` for a `set_ip` request (function byte `0x96`), which by
/// design elicits no reply; the request is still sent.
///
/// # Errors
///
/// Returns [`TransportError::Timeout`] if no reply arrives in time, and
/// [`TransportError::Io`] for socket failures. Extra datagrams that arrive
/// after the first reply are ignored - the socket is dropped on return.
pub async fn udp_send(
    bind_addr: SocketAddr,
    dest: SocketAddr,
    request: &RawFrame,
    timeout: Duration,
) -> Result<Option<RawFrame>> {
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(dest).await?;
    socket.send(request.as_bytes()).await?;
    debug!(target: "doorctl_transport::udp_send", %dest, function = request.function(), "sent request");

    if request.function() == Opcode::SetIp.to_u8() {
        return Ok(None);
    }

    let mut buf = [0u8; 2048];
    let deadline = time::Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(time::Instant::now());
        if remaining.is_zero() {
            return Err(TransportError::Timeout(timeout));
        }
        match time::timeout(remaining, socket.recv(&mut buf)).await {
            Ok(Ok(len)) => match RawFrame::from_bytes(&buf[..len]) {
                Ok(frame) => return Ok(Some(frame)),
                Err(err) => {
                    warn!(target: "doorctl_transport::udp_send", %dest, %err, "dropped malformed datagram");
                },
            },
            Ok(Err(err)) => return Err(TransportError::Io(err)),
            Err(_elapsed) => return Err(TransportError::Timeout(timeout)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use doorctl_proto::SOM;

    use super::*;

    #[tokio::test]
    async fn set_ip_returns_none_without_waiting() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer_addr = peer.local_addr().unwrap();

        let request = RawFrame::new_request(SOM, Opcode::SetIp.to_u8(), 1);
        let result =
            udp_send("127.0.0.1:0".parse().unwrap(), peer_addr, &request, Duration::from_millis(50))
                .await
                .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn times_out_when_nothing_replies() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer_addr = peer.local_addr().unwrap();

        let request = RawFrame::new_request(SOM, Opcode::GetStatus.to_u8(), 1);
        let err = udp_send("127.0.0.1:0".parse().unwrap(), peer_addr, &request, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)));
    }

    #[tokio::test]
    async fn receives_a_connected_reply() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer_addr = peer.local_addr().unwrap();

        let request = RawFrame::new_request(SOM, Opcode::GetStatus.to_u8(), 7);
        let send_fut = udp_send("127.0.0.1:0".parse().unwrap(), peer_addr, &request, Duration::from_secs(1));

        let respond_fut = async {
            let mut buf = [0u8; 64];
            let (len, from) = peer.recv_from(&mut buf).await.unwrap();
            peer.send_to(&buf[..len], from).await.unwrap();
        };

        let (result, ()) = tokio::join!(send_fut, respond_fut);
        assert!(result.unwrap().is_some());
    }
}
