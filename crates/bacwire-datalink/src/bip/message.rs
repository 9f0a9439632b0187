use std::net::{Ipv4Addr, SocketAddrV4};

use bacwire_core::encoding::{reader::Reader, writer::Writer};

use crate::address::{bip_mac, from_bip_mac, BIP_MAC_LEN};
use crate::bip::bvlc::{
    BvlcFunction, BvlcHeader, BvlcResultCode, BIP_MAX_NPDU, BVLC_HEADER_LEN, BVLC_TYPE_BIP,
};
use crate::BvlcError;

const BDT_ENTRY_LEN: usize = 10;
const FDT_ENTRY_LEN: usize = 10;

/// One broadcast distribution table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BroadcastDistributionEntry {
    pub address: SocketAddrV4,
    pub mask: Ipv4Addr,
}

/// One foreign device table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignDeviceTableEntry {
    pub address: SocketAddrV4,
    pub ttl_seconds: u16,
    pub remaining_seconds: u16,
}

/// A complete BACnet/IP message, header excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BvlcMessage {
    Result(BvlcResultCode),
    WriteBroadcastDistributionTable(Vec<BroadcastDistributionEntry>),
    ReadBroadcastDistributionTable,
    ReadBroadcastDistributionTableAck(Vec<BroadcastDistributionEntry>),
    ForwardedNpdu { origin: SocketAddrV4, npdu: Vec<u8> },
    RegisterForeignDevice { ttl_seconds: u16 },
    ReadForeignDeviceTable,
    ReadForeignDeviceTableAck(Vec<ForeignDeviceTableEntry>),
    DeleteForeignDeviceTableEntry(SocketAddrV4),
    DistributeBroadcastToNetwork(Vec<u8>),
    OriginalUnicastNpdu(Vec<u8>),
    OriginalBroadcastNpdu(Vec<u8>),
}

impl BvlcMessage {
    pub fn function(&self) -> BvlcFunction {
        match self {
            Self::Result(_) => BvlcFunction::Result,
            Self::WriteBroadcastDistributionTable(_) => {
                BvlcFunction::WriteBroadcastDistributionTable
            }
            Self::ReadBroadcastDistributionTable => BvlcFunction::ReadBroadcastDistributionTable,
            Self::ReadBroadcastDistributionTableAck(_) => {
                BvlcFunction::ReadBroadcastDistributionTableAck
            }
            Self::ForwardedNpdu { .. } => BvlcFunction::ForwardedNpdu,
            Self::RegisterForeignDevice { .. } => BvlcFunction::RegisterForeignDevice,
            Self::ReadForeignDeviceTable => BvlcFunction::ReadForeignDeviceTable,
            Self::ReadForeignDeviceTableAck(_) => BvlcFunction::ReadForeignDeviceTableAck,
            Self::DeleteForeignDeviceTableEntry(_) => BvlcFunction::DeleteForeignDeviceTableEntry,
            Self::DistributeBroadcastToNetwork(_) => BvlcFunction::DistributeBroadcastToNetwork,
            Self::OriginalUnicastNpdu(_) => BvlcFunction::OriginalUnicastNpdu,
            Self::OriginalBroadcastNpdu(_) => BvlcFunction::OriginalBroadcastNpdu,
        }
    }

    /// The NPDU carried by this message, if its function carries one.
    pub fn npdu(&self) -> Option<&[u8]> {
        match self {
            Self::ForwardedNpdu { npdu, .. }
            | Self::DistributeBroadcastToNetwork(npdu)
            | Self::OriginalUnicastNpdu(npdu)
            | Self::OriginalBroadcastNpdu(npdu) => Some(npdu),
            _ => None,
        }
    }

    fn payload_len(&self) -> usize {
        match self {
            Self::Result(_) | Self::RegisterForeignDevice { .. } => 2,
            Self::ReadBroadcastDistributionTable | Self::ReadForeignDeviceTable => 0,
            Self::WriteBroadcastDistributionTable(entries)
            | Self::ReadBroadcastDistributionTableAck(entries) => entries.len() * BDT_ENTRY_LEN,
            Self::ReadForeignDeviceTableAck(entries) => entries.len() * FDT_ENTRY_LEN,
            Self::DeleteForeignDeviceTableEntry(_) => BIP_MAC_LEN,
            Self::ForwardedNpdu { npdu, .. } => BIP_MAC_LEN + npdu.len(),
            Self::DistributeBroadcastToNetwork(npdu)
            | Self::OriginalUnicastNpdu(npdu)
            | Self::OriginalBroadcastNpdu(npdu) => npdu.len(),
        }
    }

    /// Total frame length, header included.
    pub fn encoded_len(&self) -> usize {
        BVLC_HEADER_LEN + self.payload_len()
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), BvlcError> {
        if self.npdu().is_some_and(|npdu| npdu.len() > BIP_MAX_NPDU) {
            return Err(BvlcError::FrameTooLarge);
        }
        let length = u16::try_from(self.encoded_len()).map_err(|_| BvlcError::FrameTooLarge)?;
        BvlcHeader {
            function: self.function(),
            length,
        }
        .encode(w)?;

        match self {
            Self::Result(code) => w.write_be_u16(code.to_u16())?,
            Self::WriteBroadcastDistributionTable(entries)
            | Self::ReadBroadcastDistributionTableAck(entries) => {
                for entry in entries {
                    w.write_all(&bip_mac(entry.address))?;
                    w.write_all(&entry.mask.octets())?;
                }
            }
            Self::ReadBroadcastDistributionTable | Self::ReadForeignDeviceTable => {}
            Self::ForwardedNpdu { origin, npdu } => {
                w.write_all(&bip_mac(*origin))?;
                w.write_all(npdu)?;
            }
            Self::RegisterForeignDevice { ttl_seconds } => w.write_be_u16(*ttl_seconds)?,
            Self::ReadForeignDeviceTableAck(entries) => {
                for entry in entries {
                    w.write_all(&bip_mac(entry.address))?;
                    w.write_be_u16(entry.ttl_seconds)?;
                    w.write_be_u16(entry.remaining_seconds)?;
                }
            }
            Self::DeleteForeignDeviceTableEntry(address) => w.write_all(&bip_mac(*address))?,
            Self::DistributeBroadcastToNetwork(npdu)
            | Self::OriginalUnicastNpdu(npdu)
            | Self::OriginalBroadcastNpdu(npdu) => w.write_all(npdu)?,
        }
        Ok(())
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, BvlcError> {
        let mut frame = vec![0u8; self.encoded_len()];
        let mut w = Writer::new(&mut frame);
        self.encode(&mut w)?;
        Ok(frame)
    }

    /// Parses one whole UDP payload. The header length must equal `frame.len()`.
    pub fn decode(frame: &[u8]) -> Result<Self, BvlcError> {
        let mut r = Reader::new(frame);
        let kind = r.peek_u8()?;
        if kind != BVLC_TYPE_BIP {
            log::debug!("dropping non-BVLC frame (type 0x{kind:02x})");
            return Err(BvlcError::BadType(kind));
        }
        let header = BvlcHeader::decode(&mut r)?;
        if header.length as usize != frame.len() {
            log::warn!(
                "BVLC length {} does not match datagram length {}",
                header.length,
                frame.len()
            );
            return Err(BvlcError::LengthMismatch {
                header: header.length as usize,
                actual: frame.len(),
            });
        }
        let payload = r.read_exact(header.payload_len())?;

        let message = match header.function {
            BvlcFunction::Result => Self::Result(BvlcResultCode::from_u16(read_u16(payload)?)),
            BvlcFunction::WriteBroadcastDistributionTable => {
                Self::WriteBroadcastDistributionTable(decode_bdt(payload)?)
            }
            BvlcFunction::ReadBroadcastDistributionTable => {
                expect_empty(payload)?;
                Self::ReadBroadcastDistributionTable
            }
            BvlcFunction::ReadBroadcastDistributionTableAck => {
                Self::ReadBroadcastDistributionTableAck(decode_bdt(payload)?)
            }
            BvlcFunction::ForwardedNpdu => {
                if payload.len() < BIP_MAC_LEN {
                    return Err(BvlcError::MalformedPayload(payload.len()));
                }
                let (origin, npdu) = payload.split_at(BIP_MAC_LEN);
                Self::ForwardedNpdu {
                    origin: read_bip_address(origin)?,
                    npdu: npdu.to_vec(),
                }
            }
            BvlcFunction::RegisterForeignDevice => Self::RegisterForeignDevice {
                ttl_seconds: read_u16(payload)?,
            },
            BvlcFunction::ReadForeignDeviceTable => {
                expect_empty(payload)?;
                Self::ReadForeignDeviceTable
            }
            BvlcFunction::ReadForeignDeviceTableAck => {
                Self::ReadForeignDeviceTableAck(decode_fdt(payload)?)
            }
            BvlcFunction::DeleteForeignDeviceTableEntry => {
                Self::DeleteForeignDeviceTableEntry(read_bip_address(payload)?)
            }
            BvlcFunction::DistributeBroadcastToNetwork => {
                Self::DistributeBroadcastToNetwork(payload.to_vec())
            }
            BvlcFunction::OriginalUnicastNpdu => Self::OriginalUnicastNpdu(payload.to_vec()),
            BvlcFunction::OriginalBroadcastNpdu => Self::OriginalBroadcastNpdu(payload.to_vec()),
            BvlcFunction::Unknown(v) => {
                log::debug!("unsupported BVLC function 0x{v:02x}");
                return Err(BvlcError::UnsupportedFunction(v));
            }
        };
        log::trace!("decoded {:?} ({} bytes)", header.function, frame.len());
        Ok(message)
    }
}

fn read_u16(payload: &[u8]) -> Result<u16, BvlcError> {
    match *payload {
        [hi, lo] => Ok(u16::from_be_bytes([hi, lo])),
        _ => Err(BvlcError::MalformedPayload(payload.len())),
    }
}

fn read_bip_address(payload: &[u8]) -> Result<SocketAddrV4, BvlcError> {
    from_bip_mac(payload).ok_or(BvlcError::MalformedPayload(payload.len()))
}

fn expect_empty(payload: &[u8]) -> Result<(), BvlcError> {
    if payload.is_empty() {
        Ok(())
    } else {
        Err(BvlcError::MalformedPayload(payload.len()))
    }
}

fn decode_bdt(payload: &[u8]) -> Result<Vec<BroadcastDistributionEntry>, BvlcError> {
    if payload.len() % BDT_ENTRY_LEN != 0 {
        return Err(BvlcError::MalformedPayload(payload.len()));
    }
    payload
        .chunks_exact(BDT_ENTRY_LEN)
        .map(|chunk| {
            let (address, mask) = chunk.split_at(BIP_MAC_LEN);
            Ok(BroadcastDistributionEntry {
                address: read_bip_address(address)?,
                mask: Ipv4Addr::new(mask[0], mask[1], mask[2], mask[3]),
            })
        })
        .collect()
}

fn decode_fdt(payload: &[u8]) -> Result<Vec<ForeignDeviceTableEntry>, BvlcError> {
    if payload.len() % FDT_ENTRY_LEN != 0 {
        return Err(BvlcError::MalformedPayload(payload.len()));
    }
    payload
        .chunks_exact(FDT_ENTRY_LEN)
        .map(|chunk| {
            let (address, times) = chunk.split_at(BIP_MAC_LEN);
            Ok(ForeignDeviceTableEntry {
                address: read_bip_address(address)?,
                ttl_seconds: u16::from_be_bytes([times[0], times[1]]),
                remaining_seconds: u16::from_be_bytes([times[2], times[3]]),
            })
        })
        .collect()
}
