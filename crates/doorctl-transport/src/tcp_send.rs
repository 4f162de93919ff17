//! Addressed TCP send transport (§4.5).

use std::{net::SocketAddr, time::Duration};

use doorctl_proto::{FRAME_SIZE, RawFrame, opcode::Opcode};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpSocket,
    time,
};
use tracing::debug;

use crate::error::{Result, TransportError};

/// Opens a fresh TCP connection to `dest` (no pooling), sends `request`,
/// and reads until a full 64-byte frame has been accumulated or `timeout`
/// expires. The connection is closed on every exit path.
///
/// Before connecting, enables `SO_REUSEADDR` (and `SO_REUSEPORT` on unix)
/// so that rapid repeated calls to the same destination don't pile up in
/// `TIME_WAIT`.
///
/// Returns `None` for a `set_ip` request, which elicits no reply.
///
/// # Errors
///
/// Returns [`TransportError::Timeout`] if the deadline passes before 64
/// bytes accumulate, and [`TransportError::Io`] for connection reset or an
/// EOF short of 64 bytes - both distinct from a timeout.
pub async fn tcp_send(dest: SocketAddr, request: &RawFrame, timeout: Duration) -> Result<Option<RawFrame>> {
    let socket = if dest.is_ipv4() { TcpSocket::new_v4()? } else { TcpSocket::new_v6()? };
    socket.set_reuseaddr(true)?;
    #[cfg(unix)]
    socket.set_reuseport(true)?;

    let connect = socket.connect(dest);
    let mut stream = time::timeout(timeout, connect)
        .await
        .map_err(|_elapsed| TransportError::Timeout(timeout))??;

    stream.write_all(request.as_bytes()).await?;
    debug!(target: "doorctl_transport::tcp_send", %dest, function = request.function(), "sent request");

    if request.function() == Opcode::SetIp.to_u8() {
        return Ok(None);
    }

    let mut buf = [0u8; FRAME_SIZE];
    let mut filled = 0usize;
    let deadline = time::Instant::now() + timeout;

    while filled < FRAME_SIZE {
        let remaining = deadline.saturating_duration_since(time::Instant::now());
        if remaining.is_zero() {
            return Err(TransportError::Timeout(timeout));
        }
        let read = time::timeout(remaining, stream.read(&mut buf[filled..]))
            .await
            .map_err(|_elapsed| TransportError::Timeout(timeout))??;
        if read == 0 {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("connection closed after {filled} of {FRAME_SIZE} bytes"),
            )));
        }
        filled += read;
    }

    Ok(Some(RawFrame::from_bytes(&buf)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use doorctl_proto::SOM;
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn receives_a_reply_accumulated_across_reads() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let request = RawFrame::new_request(SOM, Opcode::GetStatus.to_u8(), 9);
        let send_fut = tcp_send(addr, &request, Duration::from_secs(1));

        let accept_fut = async {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut req = [0u8; FRAME_SIZE];
            stream.read_exact(&mut req).await.unwrap();
            let reply = [0x17u8; FRAME_SIZE];
            // Dribble the reply out in two writes to exercise accumulation.
            stream.write_all(&reply[..32]).await.unwrap();
            stream.write_all(&reply[32..]).await.unwrap();
        };

        let (result, ()) = tokio::join!(send_fut, accept_fut);
        assert!(result.unwrap().is_some());
    }

    #[tokio::test]
    async fn eof_before_64_bytes_is_an_io_error_not_a_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let request = RawFrame::new_request(SOM, Opcode::GetStatus.to_u8(), 9);
        let send_fut = tcp_send(addr, &request, Duration::from_secs(1));

        let accept_fut = async {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut req = [0u8; FRAME_SIZE];
            stream.read_exact(&mut req).await.unwrap();
            stream.write_all(&[0x17u8; 10]).await.unwrap();
            drop(stream);
        };

        let (result, ()) = tokio::join!(send_fut, accept_fut);
        let err = result.unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
    }
}
