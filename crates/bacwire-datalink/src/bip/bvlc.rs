use bacwire_core::encoding::{reader::Reader, writer::Writer};
use bacwire_core::{DecodeError, EncodeError};

/// Type byte of every BACnet/IP (Annex J) frame.
pub const BVLC_TYPE_BIP: u8 = 0x81;
/// Type, function and the two length bytes.
pub const BVLC_HEADER_LEN: usize = 4;
/// Largest NPDU a BACnet/IP frame may carry.
pub const BIP_MAX_NPDU: usize = 1497;
/// Largest complete BVLC frame, a Forwarded-NPDU with the maximum NPDU.
pub const BIP_MAX_FRAME_LEN: usize = BVLC_HEADER_LEN + 6 + BIP_MAX_NPDU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BvlcFunction {
    Result,
    WriteBroadcastDistributionTable,
    ReadBroadcastDistributionTable,
    ReadBroadcastDistributionTableAck,
    ForwardedNpdu,
    RegisterForeignDevice,
    ReadForeignDeviceTable,
    ReadForeignDeviceTableAck,
    DeleteForeignDeviceTableEntry,
    DistributeBroadcastToNetwork,
    OriginalUnicastNpdu,
    OriginalBroadcastNpdu,
    Unknown(u8),
}

impl BvlcFunction {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::Result,
            0x01 => Self::WriteBroadcastDistributionTable,
            0x02 => Self::ReadBroadcastDistributionTable,
            0x03 => Self::ReadBroadcastDistributionTableAck,
            0x04 => Self::ForwardedNpdu,
            0x05 => Self::RegisterForeignDevice,
            0x06 => Self::ReadForeignDeviceTable,
            0x07 => Self::ReadForeignDeviceTableAck,
            0x08 => Self::DeleteForeignDeviceTableEntry,
            0x09 => Self::DistributeBroadcastToNetwork,
            0x0A => Self::OriginalUnicastNpdu,
            0x0B => Self::OriginalBroadcastNpdu,
            v => Self::Unknown(v),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Result => 0x00,
            Self::WriteBroadcastDistributionTable => 0x01,
            Self::ReadBroadcastDistributionTable => 0x02,
            Self::ReadBroadcastDistributionTableAck => 0x03,
            Self::ForwardedNpdu => 0x04,
            Self::RegisterForeignDevice => 0x05,
            Self::ReadForeignDeviceTable => 0x06,
            Self::ReadForeignDeviceTableAck => 0x07,
            Self::DeleteForeignDeviceTableEntry => 0x08,
            Self::DistributeBroadcastToNetwork => 0x09,
            Self::OriginalUnicastNpdu => 0x0A,
            Self::OriginalBroadcastNpdu => 0x0B,
            Self::Unknown(v) => v,
        }
    }

    /// True for the functions whose payload ends in an NPDU.
    pub const fn carries_npdu(self) -> bool {
        matches!(
            self,
            Self::ForwardedNpdu
                | Self::DistributeBroadcastToNetwork
                | Self::OriginalUnicastNpdu
                | Self::OriginalBroadcastNpdu
        )
    }
}

/// Result codes carried by a BVLC-Result message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BvlcResultCode {
    Success,
    WriteBroadcastDistributionTableNak,
    ReadBroadcastDistributionTableNak,
    RegisterForeignDeviceNak,
    ReadForeignDeviceTableNak,
    DeleteForeignDeviceTableEntryNak,
    DistributeBroadcastToNetworkNak,
    Other(u16),
}

impl BvlcResultCode {
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0x0000 => Self::Success,
            0x0010 => Self::WriteBroadcastDistributionTableNak,
            0x0020 => Self::ReadBroadcastDistributionTableNak,
            0x0030 => Self::RegisterForeignDeviceNak,
            0x0040 => Self::ReadForeignDeviceTableNak,
            0x0050 => Self::DeleteForeignDeviceTableEntryNak,
            0x0060 => Self::DistributeBroadcastToNetworkNak,
            v => Self::Other(v),
        }
    }

    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Success => 0x0000,
            Self::WriteBroadcastDistributionTableNak => 0x0010,
            Self::ReadBroadcastDistributionTableNak => 0x0020,
            Self::RegisterForeignDeviceNak => 0x0030,
            Self::ReadForeignDeviceTableNak => 0x0040,
            Self::DeleteForeignDeviceTableEntryNak => 0x0050,
            Self::DistributeBroadcastToNetworkNak => 0x0060,
            Self::Other(v) => v,
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BvlcHeader {
    pub function: BvlcFunction,
    /// Total frame length, header included.
    pub length: u16,
}

impl BvlcHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(BVLC_TYPE_BIP)?;
        w.write_u8(self.function.to_u8())?;
        w.write_be_u16(self.length)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != BVLC_TYPE_BIP {
            return Err(DecodeError::InvalidValue);
        }
        let function = BvlcFunction::from_u8(r.read_u8()?);
        let length = r.read_be_u16()?;
        if (length as usize) < BVLC_HEADER_LEN {
            return Err(DecodeError::InvalidLength);
        }
        Ok(Self { function, length })
    }

    pub fn payload_len(&self) -> usize {
        self.length as usize - BVLC_HEADER_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::{BvlcFunction, BvlcHeader, BvlcResultCode, BVLC_TYPE_BIP};
    use bacwire_core::encoding::{reader::Reader, writer::Writer};
    use bacwire_core::DecodeError;

    #[test]
    fn header_bytes() {
        let h = BvlcHeader {
            function: BvlcFunction::OriginalBroadcastNpdu,
            length: 12,
        };
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        h.encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0x81, 0x0B, 0x00, 0x0C]);

        let mut r = Reader::new(w.as_written());
        assert_eq!(BvlcHeader::decode(&mut r).unwrap(), h);
        assert_eq!(h.payload_len(), 8);
    }

    #[test]
    fn wrong_type_byte_is_rejected() {
        let mut r = Reader::new(&[0x82, 0x0A, 0x00, 0x04]);
        assert_eq!(BvlcHeader::decode(&mut r), Err(DecodeError::InvalidValue));
    }

    #[test]
    fn length_below_header_is_rejected() {
        let mut r = Reader::new(&[BVLC_TYPE_BIP, 0x0A, 0x00, 0x03]);
        assert_eq!(BvlcHeader::decode(&mut r), Err(DecodeError::InvalidLength));
    }

    #[test]
    fn unknown_function_decodes() {
        let mut r = Reader::new(&[BVLC_TYPE_BIP, 0x99, 0, 4]);
        let decoded = BvlcHeader::decode(&mut r).unwrap();
        assert_eq!(decoded.function, BvlcFunction::Unknown(0x99));
        assert!(!decoded.function.carries_npdu());
    }

    #[test]
    fn function_and_result_codes_map_both_ways() {
        for v in 0u8..=0x0B {
            assert_eq!(BvlcFunction::from_u8(v).to_u8(), v);
        }
        for v in [0x0000u16, 0x0010, 0x0030, 0x0060, 0x1234] {
            assert_eq!(BvlcResultCode::from_u16(v).to_u16(), v);
        }
        assert!(BvlcResultCode::from_u16(0).is_success());
    }
}
