use alloc::vec::Vec;
use core::fmt;

/// Data-link technology a MAC address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkType {
    #[default]
    Unknown,
    Ip,
    Mstp,
    Ethernet,
    ArcNet,
    LonTalk,
}

impl LinkType {
    /// Best guess from a MAC length: 1 byte is MS/TP, 6 bytes is B/IP.
    pub const fn from_mac_len(len: usize) -> Self {
        match len {
            1 => Self::Mstp,
            6 => Self::Ip,
            _ => Self::Unknown,
        }
    }
}

/// A BACnet network address: network number plus a data-link MAC.
///
/// Network `0` is the local network; an empty MAC is a broadcast on the
/// given network and network `0xFFFF` with an empty MAC is a global broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkAddress {
    pub network_number: u16,
    pub mac: Vec<u8>,
    pub link_type: LinkType,
}

impl NetworkAddress {
    pub const GLOBAL_NETWORK: u16 = 0xFFFF;

    pub fn new(network_number: u16, mac: impl Into<Vec<u8>>, link_type: LinkType) -> Self {
        Self {
            network_number,
            mac: mac.into(),
            link_type,
        }
    }

    pub fn local(mac: impl Into<Vec<u8>>, link_type: LinkType) -> Self {
        Self::new(0, mac, link_type)
    }

    pub fn global_broadcast() -> Self {
        Self::new(Self::GLOBAL_NETWORK, Vec::new(), LinkType::Unknown)
    }

    pub fn is_local(&self) -> bool {
        self.network_number == 0
    }

    pub fn is_broadcast(&self) -> bool {
        self.mac.is_empty()
    }

    pub fn is_global_broadcast(&self) -> bool {
        self.network_number == Self::GLOBAL_NETWORK && self.mac.is_empty()
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.network_number != 0 {
            write!(f, "{}:", self.network_number)?;
        }
        match (self.link_type, self.mac.as_slice()) {
            (_, []) => f.write_str("*"),
            (LinkType::Ip, [a, b, c, d, p0, p1]) => {
                let port = u16::from_be_bytes([*p0, *p1]);
                write!(f, "{a}.{b}.{c}.{d}:{port}")
            }
            (LinkType::Mstp, [mac]) => write!(f, "{mac}"),
            (_, mac) => {
                for (i, b) in mac.iter().enumerate() {
                    if i > 0 {
                        f.write_str("-")?;
                    }
                    write!(f, "{b:02X}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LinkType, NetworkAddress};
    use alloc::string::ToString;

    #[test]
    fn display_forms() {
        let ip = NetworkAddress::local([192, 168, 1, 10, 0xBA, 0xC0], LinkType::Ip);
        assert_eq!(ip.to_string(), "192.168.1.10:47808");
        let mstp = NetworkAddress::new(5, [12], LinkType::Mstp);
        assert_eq!(mstp.to_string(), "5:12");
        assert_eq!(NetworkAddress::global_broadcast().to_string(), "65535:*");
    }

    #[test]
    fn broadcast_flags() {
        let g = NetworkAddress::global_broadcast();
        assert!(g.is_broadcast());
        assert!(g.is_global_broadcast());
        assert!(!g.is_local());
    }
}
