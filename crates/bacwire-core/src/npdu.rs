use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{LinkType, NetworkAddress};
use crate::{DecodeError, EncodeError};

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;

/// Control bit: the NPDU carries a network-layer message instead of an APDU.
pub const NPDU_NETWORK_MESSAGE: u8 = 0x80;
/// Control bit: DNET/DLEN/DADR and hop count are present.
pub const NPDU_DESTINATION_SPECIFIED: u8 = 0x20;
/// Control bit: SNET/SLEN/SADR are present.
pub const NPDU_SOURCE_SPECIFIED: u8 = 0x08;
/// Control bit: the sender expects a reply.
pub const NPDU_EXPECTING_REPLY: u8 = 0x04;
const PRIORITY_MASK: u8 = 0x03;

/// Default hop count for routed messages.
pub const DEFAULT_HOP_COUNT: u8 = 255;

/// Network priority carried in the low two control bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NetworkPriority {
    #[default]
    Normal = 0,
    Urgent = 1,
    CriticalEquipment = 2,
    LifeSafety = 3,
}

impl NetworkPriority {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & PRIORITY_MASK {
            0 => Self::Normal,
            1 => Self::Urgent,
            2 => Self::CriticalEquipment,
            _ => Self::LifeSafety,
        }
    }
}

/// Network-layer message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetworkMessageType {
    WhoIsRouterToNetwork,
    IAmRouterToNetwork,
    ICouldBeRouterToNetwork,
    RejectMessageToNetwork,
    RouterBusyToNetwork,
    RouterAvailableToNetwork,
    InitializeRoutingTable,
    InitializeRoutingTableAck,
    EstablishConnectionToNetwork,
    DisconnectConnectionToNetwork,
    /// Unassigned ASHRAE values `0x0A..=0x7F`.
    Reserved(u8),
    /// Vendor messages `0x80..=0xFF`, followed by a vendor id on the wire.
    Proprietary(u8),
}

impl NetworkMessageType {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::WhoIsRouterToNetwork => 0,
            Self::IAmRouterToNetwork => 1,
            Self::ICouldBeRouterToNetwork => 2,
            Self::RejectMessageToNetwork => 3,
            Self::RouterBusyToNetwork => 4,
            Self::RouterAvailableToNetwork => 5,
            Self::InitializeRoutingTable => 6,
            Self::InitializeRoutingTableAck => 7,
            Self::EstablishConnectionToNetwork => 8,
            Self::DisconnectConnectionToNetwork => 9,
            Self::Reserved(v) | Self::Proprietary(v) => v,
        }
    }

    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::WhoIsRouterToNetwork,
            1 => Self::IAmRouterToNetwork,
            2 => Self::ICouldBeRouterToNetwork,
            3 => Self::RejectMessageToNetwork,
            4 => Self::RouterBusyToNetwork,
            5 => Self::RouterAvailableToNetwork,
            6 => Self::InitializeRoutingTable,
            7 => Self::InitializeRoutingTableAck,
            8 => Self::EstablishConnectionToNetwork,
            9 => Self::DisconnectConnectionToNetwork,
            0x80..=0xFF => Self::Proprietary(value),
            _ => Self::Reserved(value),
        }
    }

    pub const fn is_proprietary(self) -> bool {
        self.to_u8() >= 0x80
    }
}

/// BACnet Network Protocol Data Unit (NPDU) header.
///
/// `control` holds the caller's flags (priority, expecting-reply, network
/// message). The destination/source bits are derived on encode from whether
/// the addresses name a remote network, so only addresses with a non-zero
/// network number are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npdu {
    pub control: u8,
    pub destination: Option<NetworkAddress>,
    pub source: Option<NetworkAddress>,
    pub hop_count: Option<u8>,
    pub message_type: Option<NetworkMessageType>,
    pub vendor_id: Option<u16>,
}

impl Npdu {
    pub const fn new(control: u8) -> Self {
        Self {
            control,
            destination: None,
            source: None,
            hop_count: None,
            message_type: None,
            vendor_id: None,
        }
    }

    /// Header for an APDU, optionally flagged as expecting a reply.
    pub const fn application(expecting_reply: bool) -> Self {
        Self::new(if expecting_reply {
            NPDU_EXPECTING_REPLY
        } else {
            0
        })
    }

    /// Header for a network-layer message.
    pub fn network_message(message_type: NetworkMessageType, vendor_id: Option<u16>) -> Self {
        Self {
            message_type: Some(message_type),
            vendor_id,
            ..Self::new(NPDU_NETWORK_MESSAGE)
        }
    }

    pub fn with_priority(mut self, priority: NetworkPriority) -> Self {
        self.control = (self.control & !PRIORITY_MASK) | priority as u8;
        self
    }

    pub fn with_destination(mut self, destination: NetworkAddress) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_source(mut self, source: NetworkAddress) -> Self {
        self.source = Some(source);
        self
    }

    pub fn priority(&self) -> NetworkPriority {
        NetworkPriority::from_bits(self.control)
    }

    pub fn expecting_reply(&self) -> bool {
        self.control & NPDU_EXPECTING_REPLY != 0
    }

    pub fn is_network_message(&self) -> bool {
        self.control & NPDU_NETWORK_MESSAGE != 0 || self.message_type.is_some()
    }

    fn routed(addr: &Option<NetworkAddress>) -> Option<&NetworkAddress> {
        addr.as_ref().filter(|a| a.network_number > 0)
    }

    /// Control byte as it will be written.
    pub fn encoded_control(&self) -> u8 {
        let mut control = self.control & !(NPDU_DESTINATION_SPECIFIED | NPDU_SOURCE_SPECIFIED);
        if Self::routed(&self.destination).is_some() {
            control |= NPDU_DESTINATION_SPECIFIED;
        }
        if Self::routed(&self.source).is_some() {
            control |= NPDU_SOURCE_SPECIFIED;
        }
        if self.message_type.is_some() {
            control |= NPDU_NETWORK_MESSAGE;
        }
        control
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let control = self.encoded_control();
        w.write_u8(NPDU_VERSION)?;
        w.write_u8(control)?;

        let destination = Self::routed(&self.destination);
        if let Some(dest) = destination {
            encode_addr(w, dest)?;
        }
        if let Some(src) = Self::routed(&self.source) {
            encode_addr(w, src)?;
        }
        if destination.is_some() {
            w.write_u8(self.hop_count.unwrap_or(DEFAULT_HOP_COUNT))?;
        }
        if control & NPDU_NETWORK_MESSAGE != 0 {
            let message_type = self
                .message_type
                .unwrap_or(NetworkMessageType::WhoIsRouterToNetwork);
            w.write_u8(message_type.to_u8())?;
            if message_type.is_proprietary() {
                w.write_be_u16(self.vendor_id.unwrap_or(0))?;
            }
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let version = r.read_u8()?;
        if version != NPDU_VERSION {
            return Err(DecodeError::InvalidVersion);
        }

        let control = r.read_u8()?;
        let has_dest = (control & NPDU_DESTINATION_SPECIFIED) != 0;
        let has_src = (control & NPDU_SOURCE_SPECIFIED) != 0;

        let destination = if has_dest {
            Some(decode_addr(r)?)
        } else {
            None
        };
        let source = if has_src { Some(decode_addr(r)?) } else { None };
        let hop_count = if has_dest { Some(r.read_u8()?) } else { None };

        let (message_type, vendor_id) = if control & NPDU_NETWORK_MESSAGE != 0 {
            let mt = NetworkMessageType::from_u8(r.read_u8()?);
            let vid = if mt.is_proprietary() {
                Some(r.read_be_u16()?)
            } else {
                None
            };
            (Some(mt), vid)
        } else {
            (None, None)
        };

        Ok(Self {
            control,
            destination,
            source,
            hop_count,
            message_type,
            vendor_id,
        })
    }
}

fn encode_addr(w: &mut Writer<'_>, addr: &NetworkAddress) -> Result<(), EncodeError> {
    let mac_len = u8::try_from(addr.mac.len()).map_err(|_| EncodeError::ValueOutOfRange)?;
    w.write_be_u16(addr.network_number)?;
    w.write_u8(mac_len)?;
    w.write_all(&addr.mac)
}

fn decode_addr(r: &mut Reader<'_>) -> Result<NetworkAddress, DecodeError> {
    let network_number = r.read_be_u16()?;
    let mac_len = r.read_u8()?;
    let mac = r.read_exact(mac_len as usize)?;
    Ok(NetworkAddress::new(
        network_number,
        mac,
        LinkType::from_mac_len(mac.len()),
    ))
}
