//! Integration tests for the dispatcher against in-process stub controllers.
//!
//! Each stub is a real UDP/TCP socket on `127.0.0.1` driven by a small
//! per-test reply script; there is no mock transport layer - these exercise
//! the actual `doorctl-transport` sockets end to end (scenarios S1, S2, S4,
//! S5, S6).

use std::{net::SocketAddr, time::Duration};

use doorctl_client::{Client, ClientConfig, Protocol};
use doorctl_proto::{Opcode, RawFrame, SOM};
use tokio::net::{TcpListener, UdpSocket};

const SERIAL: u32 = 405_419_896;

fn controller_info_reply(serial: u32) -> RawFrame {
    let mut frame = RawFrame::new_request(SOM, Opcode::GetController.to_u8(), serial);
    frame.write_ipv4(8, [192, 168, 1, 100]);
    frame.write_ipv4(12, [255, 255, 255, 0]);
    frame.write_ipv4(16, [192, 168, 1, 1]);
    frame.write_mac(20, [0x00, 0x12, 0x23, 0x34, 0x45, 0x56]);
    frame.write_u8(26, 0x08);
    frame.write_u8(27, 0x92);
    frame
}

/// Binds a UDP stub that answers exactly one request with `reply`, then
/// exits.
async fn spawn_udp_stub_once(reply: RawFrame) -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind stub socket");
    let addr = socket.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        let mut buf = [0u8; 64];
        let Ok((len, peer)) = socket.recv_from(&mut buf).await else { return };
        let _ = RawFrame::from_bytes(&buf[..len]);
        let _ = socket.send_to(reply.as_bytes(), peer).await;
    });
    addr
}

/// Binds a UDP stub that, on a single request, fires back `replies` in
/// order - used to simulate several controllers answering one broadcast.
async fn spawn_udp_stub_fanout(replies: Vec<RawFrame>) -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind stub socket");
    let addr = socket.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        let mut buf = [0u8; 64];
        let Ok((_len, peer)) = socket.recv_from(&mut buf).await else { return };
        for reply in &replies {
            let _ = socket.send_to(reply.as_bytes(), peer).await;
        }
    });
    addr
}

/// Binds a TCP stub that accepts one connection, reads exactly one 64-byte
/// request, and (if `reply` is `Some`) writes it back before closing.
async fn spawn_tcp_stub_once(reply: Option<RawFrame>) -> SocketAddr {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else { return };
        let mut buf = [0u8; 64];
        if stream.read_exact(&mut buf).await.is_err() {
            return;
        }
        if let Some(reply) = reply {
            let _ = stream.write_all(reply.as_bytes()).await;
        }
    });
    addr
}

fn config_for(timeout: Duration) -> ClientConfig {
    ClientConfig { timeout, ..ClientConfig::default() }
}

/// S1: `get_controller` over addressed UDP returns the stub's identity.
#[tokio::test]
async fn s1_get_controller_over_addressed_udp() {
    let addr = spawn_udp_stub_once(controller_info_reply(SERIAL)).await;
    let client = Client::new(config_for(Duration::from_secs(2)));

    let info = client.get_controller((SERIAL, addr.to_string().as_str())).await.expect("get_controller succeeds");
    assert_eq!(info.serial, SERIAL);
    assert_eq!(info.ip, [192, 168, 1, 100]);
}

/// S2: `get_all_controllers` collects every reply from the broadcast
/// destination, unfiltered by serial.
#[tokio::test]
async fn s2_get_all_controllers_collects_every_reply() {
    let serials = [SERIAL, SERIAL + 1, SERIAL + 2];
    let replies = serials.iter().map(|&s| controller_info_reply(s)).collect();
    let addr = spawn_udp_stub_fanout(replies).await;

    let mut config = config_for(Duration::from_millis(300));
    config.broadcast = addr;
    let client = Client::new(config);

    let mut infos = client.get_all_controllers(None).await.expect("broadcast discovery succeeds");
    infos.sort_by_key(|info| info.serial);
    let mut expected = serials;
    expected.sort_unstable();
    assert_eq!(infos.iter().map(|i| i.serial).collect::<Vec<_>>(), expected);
}

/// S4: `set_ip` elicits no reply; the call completes without waiting out
/// the timeout.
#[tokio::test]
async fn s4_set_ip_completes_without_a_reply() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind throwaway peer");
    let addr = socket.local_addr().expect("peer addr");
    drop(socket);

    let client = Client::new(config_for(Duration::from_secs(5)));
    let started = tokio::time::Instant::now();
    client
        .set_ip((SERIAL, addr.to_string().as_str()), [10, 0, 0, 5], [255, 255, 255, 0], [10, 0, 0, 1])
        .await
        .expect("set_ip succeeds");
    assert!(started.elapsed() < Duration::from_secs(1), "set_ip must not wait for a reply");
}

/// S5: addressed TCP succeeds when the stub answers, and times out distinct
/// from an I/O error when it doesn't.
#[tokio::test]
async fn s5_tcp_send_succeeds_when_stub_answers() {
    let addr = spawn_tcp_stub_once(Some(controller_info_reply(SERIAL))).await;
    let client = Client::new(config_for(Duration::from_secs(2)));

    let info = client
        .get_controller((SERIAL, addr.to_string().as_str(), Protocol::Tcp))
        .await
        .expect("tcp get_controller succeeds");
    assert_eq!(info.serial, SERIAL);
}

#[tokio::test]
async fn s5_tcp_send_times_out_when_stub_is_silent() {
    let addr = spawn_tcp_stub_once(None).await;
    let client = Client::new(config_for(Duration::from_millis(100)));

    let err = client
        .get_controller((SERIAL, addr.to_string().as_str(), Protocol::Tcp))
        .await
        .expect_err("must time out, not hang");
    assert!(matches!(err, doorctl_client::DispatcherError::Transport(_)));
}

/// S6: a reply carrying the wrong controller serial is rejected as
/// `InvalidResponse`, not silently accepted.
#[tokio::test]
async fn s6_mismatched_controller_serial_is_invalid_response() {
    let addr = spawn_udp_stub_once(controller_info_reply(SERIAL + 1)).await;
    let client = Client::new(config_for(Duration::from_secs(2)));

    let err = client
        .get_controller((SERIAL, addr.to_string().as_str()))
        .await
        .expect_err("must reject a serial mismatch");
    assert!(matches!(err, doorctl_client::DispatcherError::InvalidResponse { field: "controller", .. }));
}
