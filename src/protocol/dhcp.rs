//! DHCP Server
//!
//! Minimal DHCPv4 server for the access point subnet. Clients joining the
//! panel's network get an address from a small pool, with the panel itself
//! as server and router.
//!
//! Only the exchanges a phone or laptop performs on join are handled:
//!
//! ```text
//! DISCOVER -> OFFER     pool address (existing lease, requested or first free)
//! REQUEST  -> ACK/NAK   confirm the address if it belongs to this client
//! RELEASE  -> (none)    return the address to the pool
//! DECLINE  -> (none)    same as release
//! ```
//!
//! Replies are always broadcast; clients have no address yet.

use core::fmt;

use heapless::Vec;

use crate::types::Timestamp;

/// UDP port the server listens on
pub const SERVER_PORT: u16 = 67;

/// UDP port clients listen on
pub const CLIENT_PORT: u16 = 68;

/// Largest message a client must accept (RFC 2131)
pub const MAX_MESSAGE_LEN: usize = 576;

/// BOOTP minimum message length; shorter replies are zero padded
pub const MIN_MESSAGE_LEN: usize = 300;

const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
const OPTIONS_OFFSET: usize = 240;
const CHADDR_OFFSET: usize = 28;

const OPT_PAD: u8 = 0;
const OPT_SUBNET_MASK: u8 = 1;
const OPT_ROUTER: u8 = 3;
const OPT_REQUESTED_IP: u8 = 50;
const OPT_LEASE_TIME: u8 = 51;
const OPT_MESSAGE_TYPE: u8 = 53;
const OPT_SERVER_ID: u8 = 54;
const OPT_END: u8 = 255;

/// IPv4 address as four octets
pub type Ipv4 = [u8; 4];

/// Ethernet hardware address
pub type Mac = [u8; 6];

/// DHCP message type (option 53)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    /// Client looking for servers
    Discover,
    /// Server offering an address
    Offer,
    /// Client asking for an address
    Request,
    /// Client found the address in use
    Decline,
    /// Server confirming an address
    Ack,
    /// Server refusing an address
    Nak,
    /// Client giving up its address
    Release,
    /// Client asking for configuration only
    Inform,
}

impl MessageType {
    /// Decode an option 53 value
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::Discover,
            2 => Self::Offer,
            3 => Self::Request,
            4 => Self::Decline,
            5 => Self::Ack,
            6 => Self::Nak,
            7 => Self::Release,
            8 => Self::Inform,
            _ => return None,
        })
    }

    /// Option 53 value
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Discover => 1,
            Self::Offer => 2,
            Self::Request => 3,
            Self::Decline => 4,
            Self::Ack => 5,
            Self::Nak => 6,
            Self::Release => 7,
            Self::Inform => 8,
        }
    }
}

/// Why a datagram was not handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DhcpError {
    /// Shorter than the fixed header or an option runs past the end
    Truncated,
    /// Not a BOOTREQUEST
    NotRequest,
    /// Hardware type other than Ethernet
    UnsupportedHardware,
    /// Magic cookie missing
    BadCookie,
    /// Option 53 absent or unknown
    MissingMessageType,
}

impl fmt::Display for DhcpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Truncated => "truncated message",
            Self::NotRequest => "not a request",
            Self::UnsupportedHardware => "unsupported hardware type",
            Self::BadCookie => "bad magic cookie",
            Self::MissingMessageType => "missing message type",
        })
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DhcpError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Truncated => defmt::write!(f, "Truncated"),
            Self::NotRequest => defmt::write!(f, "NotRequest"),
            Self::UnsupportedHardware => defmt::write!(f, "UnsupportedHardware"),
            Self::BadCookie => defmt::write!(f, "BadCookie"),
            Self::MissingMessageType => defmt::write!(f, "MissingMessageType"),
        }
    }
}

/// Client message fields the server acts on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DhcpRequest {
    /// Message type
    pub kind: MessageType,
    /// Transaction id, echoed in the reply
    pub xid: [u8; 4],
    /// BOOTP flags, echoed in the reply
    pub flags: [u8; 2],
    /// Client's current address (renewals)
    pub ciaddr: Ipv4,
    /// Client hardware address
    pub mac: Mac,
    /// Option 50
    pub requested_ip: Option<Ipv4>,
    /// Option 54
    pub server_id: Option<Ipv4>,
}

impl DhcpRequest {
    /// Parse a BOOTREQUEST datagram
    ///
    /// # Errors
    ///
    /// Any [`DhcpError`]; such datagrams are dropped without a reply.
    pub fn parse(buf: &[u8]) -> Result<Self, DhcpError> {
        if buf.len() < OPTIONS_OFFSET {
            return Err(DhcpError::Truncated);
        }
        if buf[0] != 1 {
            return Err(DhcpError::NotRequest);
        }
        if buf[1] != 1 || buf[2] != 6 {
            return Err(DhcpError::UnsupportedHardware);
        }
        if buf[236..240] != MAGIC_COOKIE {
            return Err(DhcpError::BadCookie);
        }

        let mut kind = None;
        let mut requested_ip = None;
        let mut server_id = None;

        let mut i = OPTIONS_OFFSET;
        while i < buf.len() {
            let code = buf[i];
            if code == OPT_PAD {
                i += 1;
                continue;
            }
            if code == OPT_END {
                break;
            }
            let len = usize::from(*buf.get(i + 1).ok_or(DhcpError::Truncated)?);
            let value = buf.get(i + 2..i + 2 + len).ok_or(DhcpError::Truncated)?;
            match code {
                OPT_MESSAGE_TYPE => kind = value.first().copied().and_then(MessageType::from_code),
                OPT_REQUESTED_IP => requested_ip = ipv4(value),
                OPT_SERVER_ID => server_id = ipv4(value),
                _ => {}
            }
            i += 2 + len;
        }

        Ok(Self {
            kind: kind.ok_or(DhcpError::MissingMessageType)?,
            xid: [buf[4], buf[5], buf[6], buf[7]],
            flags: [buf[10], buf[11]],
            ciaddr: [buf[12], buf[13], buf[14], buf[15]],
            mac: [
                buf[CHADDR_OFFSET],
                buf[CHADDR_OFFSET + 1],
                buf[CHADDR_OFFSET + 2],
                buf[CHADDR_OFFSET + 3],
                buf[CHADDR_OFFSET + 4],
                buf[CHADDR_OFFSET + 5],
            ],
            requested_ip,
            server_id,
        })
    }
}

fn ipv4(value: &[u8]) -> Option<Ipv4> {
    match value {
        [a, b, c, d] => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

/// Address lease held by one client
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lease {
    /// Client hardware address
    pub mac: Mac,
    /// Last octet of the leased address
    pub host: u8,
    /// Time the lease lapses
    pub expires: Timestamp,
}

/// Server answer to one request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DhcpReply {
    /// Offer, Ack or Nak
    pub kind: MessageType,
    /// Address given to the client (zero for Nak)
    pub yiaddr: Ipv4,
}

/// Lease pool and reply logic for one /24 subnet
pub struct DhcpServer<const N: usize> {
    server: Ipv4,
    prefix_len: u8,
    first_host: u8,
    lease_secs: u32,
    leases: Vec<Lease, N>,
}

impl<const N: usize> DhcpServer<N> {
    /// Create a server at `server` leasing `N` addresses from `.first_host`
    #[must_use]
    pub const fn new(server: Ipv4, prefix_len: u8, first_host: u8, lease_secs: u32) -> Self {
        Self {
            server,
            prefix_len,
            first_host,
            lease_secs,
            leases: Vec::new(),
        }
    }

    /// Server address
    #[must_use]
    pub const fn server(&self) -> Ipv4 {
        self.server
    }

    /// Active and lapsed leases
    #[must_use]
    pub fn leases(&self) -> &[Lease] {
        &self.leases
    }

    /// Decide the reply to `request`, updating leases
    pub fn handle(&mut self, request: &DhcpRequest, now: Timestamp) -> Option<DhcpReply> {
        match request.kind {
            MessageType::Discover => {
                let host = self.allocate(request.mac, request.requested_ip, now)?;
                Some(self.grant(MessageType::Offer, host))
            }
            MessageType::Request => {
                if request.server_id.is_some_and(|id| id != self.server) {
                    // Client picked another server
                    self.release(request.mac);
                    return None;
                }
                let wanted = request
                    .requested_ip
                    .or_else(|| (request.ciaddr != [0; 4]).then_some(request.ciaddr))?;
                match self.confirm(request.mac, wanted, now) {
                    Some(host) => Some(self.grant(MessageType::Ack, host)),
                    None => Some(DhcpReply {
                        kind: MessageType::Nak,
                        yiaddr: [0; 4],
                    }),
                }
            }
            MessageType::Release | MessageType::Decline => {
                self.release(request.mac);
                None
            }
            _ => None,
        }
    }

    fn grant(&self, kind: MessageType, host: u8) -> DhcpReply {
        let [a, b, c, _] = self.server;
        DhcpReply {
            kind,
            yiaddr: [a, b, c, host],
        }
    }

    fn expiry(&self, now: Timestamp) -> Timestamp {
        now.offset_by(self.lease_secs.saturating_mul(1000))
    }

    fn in_pool(&self, host: u8) -> bool {
        let offset = usize::from(host.wrapping_sub(self.first_host));
        host >= self.first_host && offset < N && host != self.server[3]
    }

    /// Host octet of `ip` if it lies in the pool
    fn pool_host(&self, ip: Ipv4) -> Option<u8> {
        let [a, b, c, host] = ip;
        let [sa, sb, sc, _] = self.server;
        ([a, b, c] == [sa, sb, sc] && self.in_pool(host)).then_some(host)
    }

    fn holder(&self, host: u8, now: Timestamp) -> Option<&Lease> {
        self.leases
            .iter()
            .find(|l| l.host == host && !now.has_reached(l.expires))
    }

    fn allocate(&mut self, mac: Mac, requested: Option<Ipv4>, now: Timestamp) -> Option<u8> {
        let existing = self.leases.iter().find(|l| l.mac == mac).map(|l| l.host);
        if let Some(host) = existing.and_then(|host| self.claim(mac, host, now)) {
            return Some(host);
        }
        let requested = requested
            .and_then(|ip| self.pool_host(ip))
            .filter(|&host| self.holder(host, now).is_none());
        let host = requested.or_else(|| self.first_free(now))?;
        self.claim(mac, host, now)
    }

    fn first_free(&self, now: Timestamp) -> Option<u8> {
        (0..N)
            .filter_map(|i| u8::try_from(i).ok())
            .map(|i| self.first_host.wrapping_add(i))
            .find(|&host| self.in_pool(host) && self.holder(host, now).is_none())
    }

    /// Confirm `ip` for `mac` if it is in the pool and not held by another client
    fn confirm(&mut self, mac: Mac, ip: Ipv4, now: Timestamp) -> Option<u8> {
        let host = self.pool_host(ip)?;
        self.claim(mac, host, now)
    }

    /// Lease `host` to `mac` unless another client holds it
    fn claim(&mut self, mac: Mac, host: u8, now: Timestamp) -> Option<u8> {
        match self.holder(host, now) {
            Some(lease) if lease.mac != mac => None,
            _ => self.assign(mac, host, now).then_some(host),
        }
    }

    fn assign(&mut self, mac: Mac, host: u8, now: Timestamp) -> bool {
        let expires = self.expiry(now);
        self.leases.retain(|l| l.mac != mac && l.host != host);
        if self.leases.is_full() {
            // Reuse the slot of a lapsed lease
            match self.leases.iter().position(|l| now.has_reached(l.expires)) {
                Some(i) => {
                    self.leases.swap_remove(i);
                }
                None => return false,
            }
        }
        self.leases.push(Lease { mac, host, expires }).is_ok()
    }

    fn release(&mut self, mac: Mac) {
        self.leases.retain(|l| l.mac != mac);
    }

    /// Subnet mask for the configured prefix
    #[must_use]
    pub fn subnet_mask(&self) -> Ipv4 {
        let bits = u32::MAX
            .checked_shl(32 - u32::from(self.prefix_len.min(32)))
            .unwrap_or(0);
        bits.to_be_bytes()
    }

    /// Encode `reply` to `request` into `out`, returning the message length
    ///
    /// `out` must hold at least [`MIN_MESSAGE_LEN`] bytes; shorter buffers
    /// yield 0.
    pub fn encode(&self, request: &DhcpRequest, reply: &DhcpReply, out: &mut [u8]) -> usize {
        if out.len() < MIN_MESSAGE_LEN {
            return 0;
        }
        out[..MIN_MESSAGE_LEN].fill(0);

        out[0] = 2;
        out[1] = 1;
        out[2] = 6;
        out[4..8].copy_from_slice(&request.xid);
        out[10..12].copy_from_slice(&request.flags);
        out[16..20].copy_from_slice(&reply.yiaddr);
        if reply.kind != MessageType::Nak {
            out[20..24].copy_from_slice(&self.server);
        }
        out[CHADDR_OFFSET..CHADDR_OFFSET + 6].copy_from_slice(&request.mac);
        out[236..240].copy_from_slice(&MAGIC_COOKIE);

        let mut i = OPTIONS_OFFSET;
        let mut put = |code: u8, value: &[u8]| {
            out[i] = code;
            // Option values here are at most four bytes
            #[allow(clippy::cast_possible_truncation)]
            let len = value.len() as u8;
            out[i + 1] = len;
            out[i + 2..i + 2 + value.len()].copy_from_slice(value);
            i += 2 + value.len();
        };
        put(OPT_MESSAGE_TYPE, &[reply.kind.code()]);
        put(OPT_SERVER_ID, &self.server);
        if reply.kind != MessageType::Nak {
            put(OPT_LEASE_TIME, &self.lease_secs.to_be_bytes());
            put(OPT_SUBNET_MASK, &self.subnet_mask());
            put(OPT_ROUTER, &self.server);
        }
        out[i] = OPT_END;

        MIN_MESSAGE_LEN
    }
}
