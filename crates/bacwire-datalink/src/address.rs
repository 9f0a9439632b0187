use bacwire_core::types::{LinkType, NetworkAddress};
use core::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};

/// Length of a B/IP MAC: four address octets then the UDP port.
pub const BIP_MAC_LEN: usize = 6;

/// Packs an IPv4 socket address into its 6-byte B/IP MAC.
pub fn bip_mac(addr: SocketAddrV4) -> [u8; BIP_MAC_LEN] {
    let [a, b, c, d] = addr.ip().octets();
    let [hi, lo] = addr.port().to_be_bytes();
    [a, b, c, d, hi, lo]
}

/// Reads a B/IP MAC back into a socket address; `None` unless exactly 6 bytes.
pub fn from_bip_mac(mac: &[u8]) -> Option<SocketAddrV4> {
    match *mac {
        [a, b, c, d, hi, lo] => Some(SocketAddrV4::new(
            Ipv4Addr::new(a, b, c, d),
            u16::from_be_bytes([hi, lo]),
        )),
        _ => None,
    }
}

/// A station address on one of the supported data links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataLinkAddress {
    Ip(SocketAddr),
    /// MS/TP station MAC; 255 is the broadcast address.
    Mstp(u8),
}

impl DataLinkAddress {
    pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;
    pub const MSTP_BROADCAST: u8 = 0xFF;

    pub fn local_broadcast(port: u16) -> Self {
        Self::Ip(SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), port))
    }

    pub fn bacnet_default(addr: IpAddr) -> Self {
        Self::Ip(SocketAddr::new(addr, Self::BACNET_IP_DEFAULT_PORT))
    }

    pub fn is_broadcast(&self) -> bool {
        match self {
            Self::Ip(addr) => matches!(addr.ip(), IpAddr::V4(v4) if v4.is_broadcast()),
            Self::Mstp(mac) => *mac == Self::MSTP_BROADCAST,
        }
    }

    /// Recovers an address from MAC bytes: 1 byte is MS/TP, 6 bytes is B/IP.
    pub fn from_mac(mac: &[u8]) -> Option<Self> {
        match mac {
            [station] => Some(Self::Mstp(*station)),
            _ => from_bip_mac(mac).map(|v4| Self::Ip(SocketAddr::V4(v4))),
        }
    }

    /// MAC bytes as they appear in an NPDU address. IPv6 sockets have no
    /// B/IP MAC and yield `None`.
    pub fn mac(&self) -> Option<Vec<u8>> {
        match self {
            Self::Ip(SocketAddr::V4(v4)) => Some(bip_mac(*v4).to_vec()),
            Self::Ip(SocketAddr::V6(_)) => None,
            Self::Mstp(station) => Some(vec![*station]),
        }
    }

    pub fn link_type(&self) -> LinkType {
        match self {
            Self::Ip(_) => LinkType::Ip,
            Self::Mstp(_) => LinkType::Mstp,
        }
    }

    /// This station as seen from `network_number` (0 for the local network).
    pub fn to_network_address(&self, network_number: u16) -> NetworkAddress {
        NetworkAddress::new(
            network_number,
            self.mac().unwrap_or_default(),
            self.link_type(),
        )
    }
}

impl From<DataLinkAddress> for NetworkAddress {
    fn from(value: DataLinkAddress) -> Self {
        value.to_network_address(0)
    }
}

impl From<SocketAddrV4> for DataLinkAddress {
    fn from(value: SocketAddrV4) -> Self {
        Self::Ip(SocketAddr::V4(value))
    }
}

impl fmt::Display for DataLinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
            Self::Mstp(mac) => write!(f, "mstp:{mac}"),
        }
    }
}
