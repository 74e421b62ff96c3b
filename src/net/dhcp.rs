//! DHCP Server Task
//!
//! Serves [`DhcpServer`] leases over a UDP socket on port 67 so clients
//! joining the access point get an address on the panel's subnet.

use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Stack};
use embassy_time::Instant;

use crate::config::network::{
    AP_ADDRESS, AP_PREFIX_LEN, DHCP_LEASE_SECS, DHCP_POOL_SIZE, DHCP_POOL_START,
};
use crate::protocol::dhcp::{DhcpRequest, DhcpServer, CLIENT_PORT, MAX_MESSAGE_LEN, SERVER_PORT};
use crate::types::Timestamp;

/// Queued datagrams per direction
const PACKET_SLOTS: usize = 4;

/// Answer DHCP requests forever
#[embassy_executor::task]
pub async fn dhcp_task(stack: Stack<'static>) {
    let mut rx_meta = [PacketMetadata::EMPTY; PACKET_SLOTS];
    let mut rx_buffer = [0u8; 2 * MAX_MESSAGE_LEN];
    let mut tx_meta = [PacketMetadata::EMPTY; PACKET_SLOTS];
    let mut tx_buffer = [0u8; 2 * MAX_MESSAGE_LEN];
    let mut socket = UdpSocket::new(stack, &mut rx_meta, &mut rx_buffer, &mut tx_meta, &mut tx_buffer);

    if socket.bind(SERVER_PORT).is_err() {
        log_warn!("dhcp: failed to bind port {}", SERVER_PORT);
        return;
    }
    log_info!("dhcp: leasing {} addresses", DHCP_POOL_SIZE);

    let mut server: DhcpServer<DHCP_POOL_SIZE> =
        DhcpServer::new(AP_ADDRESS, AP_PREFIX_LEN, DHCP_POOL_START, DHCP_LEASE_SECS);
    let broadcast = IpEndpoint::new(IpAddress::v4(255, 255, 255, 255), CLIENT_PORT);
    let mut packet = [0u8; MAX_MESSAGE_LEN];
    let mut reply = [0u8; MAX_MESSAGE_LEN];

    loop {
        let Ok((len, _meta)) = socket.recv_from(&mut packet).await else {
            log_debug!("dhcp: oversized datagram dropped");
            continue;
        };
        let request = match DhcpRequest::parse(&packet[..len]) {
            Ok(request) => request,
            Err(e) => {
                log_debug!("dhcp: ignored datagram: {}", e);
                continue;
            }
        };

        let now = Timestamp::from_uptime_ms(Instant::now().as_millis());
        let Some(answer) = server.handle(&request, now) else {
            continue;
        };
        log_info!(
            "dhcp: {} -> {}.{}.{}.{}",
            answer.kind.code(),
            answer.yiaddr[0],
            answer.yiaddr[1],
            answer.yiaddr[2],
            answer.yiaddr[3]
        );

        let n = server.encode(&request, &answer, &mut reply);
        if socket.send_to(&reply[..n], broadcast).await.is_err() {
            log_warn!("dhcp: reply not sent");
        }
    }
}
