use bacwire_core::encoding::writer::Writer;
use bacwire_datalink::DataLinkAddress;

use crate::crc::{data_crc, header_crc};
use crate::MstpError;

pub const MSTP_PREAMBLE: [u8; 2] = [0x55, 0xFF];
/// Preamble, type, destination, source, two length bytes and the header CRC.
pub const MSTP_HEADER_LEN: usize = 8;
/// Data CRC that follows a non-empty data field.
pub const MSTP_DATA_CRC_LEN: usize = 2;
/// Largest NPDU an MS/TP data frame may carry.
pub const MSTP_MAX_NPDU: usize = 501;
pub const MSTP_BROADCAST: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Token,
    PollForMaster,
    ReplyToPollForMaster,
    TestRequest,
    TestResponse,
    BacnetDataExpectingReply,
    BacnetDataNotExpectingReply,
    ReplyPostponed,
    /// Types 8..=127, reserved by ASHRAE.
    Reserved(u8),
    /// Types 128..=255; the data starts with a vendor id.
    Proprietary(u8),
}

impl FrameType {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Token,
            1 => Self::PollForMaster,
            2 => Self::ReplyToPollForMaster,
            3 => Self::TestRequest,
            4 => Self::TestResponse,
            5 => Self::BacnetDataExpectingReply,
            6 => Self::BacnetDataNotExpectingReply,
            7 => Self::ReplyPostponed,
            128..=255 => Self::Proprietary(value),
            _ => Self::Reserved(value),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Token => 0,
            Self::PollForMaster => 1,
            Self::ReplyToPollForMaster => 2,
            Self::TestRequest => 3,
            Self::TestResponse => 4,
            Self::BacnetDataExpectingReply => 5,
            Self::BacnetDataNotExpectingReply => 6,
            Self::ReplyPostponed => 7,
            Self::Reserved(v) | Self::Proprietary(v) => v,
        }
    }

    pub const fn is_data(self) -> bool {
        matches!(
            self,
            Self::BacnetDataExpectingReply | Self::BacnetDataNotExpectingReply
        )
    }
}

/// One MS/TP frame with its data field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MstpFrame {
    pub frame_type: FrameType,
    pub destination: u8,
    pub source: u8,
    pub data: Vec<u8>,
}

impl MstpFrame {
    pub fn token(destination: u8, source: u8) -> Self {
        Self {
            frame_type: FrameType::Token,
            destination,
            source,
            data: Vec::new(),
        }
    }

    /// A BACnet data frame carrying `npdu`.
    pub fn data(
        destination: u8,
        source: u8,
        npdu: impl Into<Vec<u8>>,
        expecting_reply: bool,
    ) -> Self {
        Self {
            frame_type: if expecting_reply {
                FrameType::BacnetDataExpectingReply
            } else {
                FrameType::BacnetDataNotExpectingReply
            },
            destination,
            source,
            data: npdu.into(),
        }
    }

    /// The NPDU of a BACnet data frame.
    pub fn npdu(&self) -> Option<&[u8]> {
        self.frame_type.is_data().then_some(self.data.as_slice())
    }

    pub fn source_address(&self) -> DataLinkAddress {
        DataLinkAddress::Mstp(self.source)
    }

    pub fn destination_address(&self) -> DataLinkAddress {
        DataLinkAddress::Mstp(self.destination)
    }

    pub fn encoded_len(&self) -> usize {
        MSTP_HEADER_LEN
            + if self.data.is_empty() {
                0
            } else {
                self.data.len() + MSTP_DATA_CRC_LEN
            }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), MstpError> {
        let len = u16::try_from(self.data.len())
            .map_err(|_| MstpError::FrameTooLarge(self.data.len()))?;
        let [len_hi, len_lo] = len.to_be_bytes();
        let header = [
            self.frame_type.to_u8(),
            self.destination,
            self.source,
            len_hi,
            len_lo,
        ];
        w.write_all(&MSTP_PREAMBLE)?;
        w.write_all(&header)?;
        w.write_u8(header_crc(&header))?;
        if !self.data.is_empty() {
            w.write_all(&self.data)?;
            w.write_le_u16(data_crc(&self.data))?;
        }
        Ok(())
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, MstpError> {
        let mut out = vec![0u8; self.encoded_len()];
        let mut w = Writer::new(&mut out);
        self.encode(&mut w)?;
        Ok(out)
    }

    /// Decodes one frame starting at `buf[0]` and returns it with the number
    /// of bytes it occupied.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), MstpError> {
        let header = parse_header(buf)?;
        let total = header.frame_len();
        if buf.len() < total {
            return Err(MstpError::Truncated {
                needed: total,
                available: buf.len(),
            });
        }
        let data = &buf[MSTP_HEADER_LEN..MSTP_HEADER_LEN + header.data_len];
        if !data.is_empty() {
            let received = u16::from_le_bytes([buf[total - 2], buf[total - 1]]);
            let computed = data_crc(data);
            if received != computed {
                return Err(MstpError::DataCrc { received, computed });
            }
        }
        Ok((
            Self {
                frame_type: header.frame_type,
                destination: header.destination,
                source: header.source,
                data: data.to_vec(),
            },
            total,
        ))
    }
}

/// A validated frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameHeader {
    pub frame_type: FrameType,
    pub destination: u8,
    pub source: u8,
    pub data_len: usize,
}

impl FrameHeader {
    pub fn frame_len(&self) -> usize {
        MSTP_HEADER_LEN
            + if self.data_len == 0 {
                0
            } else {
                self.data_len + MSTP_DATA_CRC_LEN
            }
    }
}

/// Checks preamble and header CRC of the first eight bytes of `buf`.
pub(crate) fn parse_header(buf: &[u8]) -> Result<FrameHeader, MstpError> {
    let Some(bytes) = buf.get(..MSTP_HEADER_LEN) else {
        return Err(MstpError::Truncated {
            needed: MSTP_HEADER_LEN,
            available: buf.len(),
        });
    };
    if bytes[..2] != MSTP_PREAMBLE {
        return Err(MstpError::BadPreamble);
    }
    let computed = header_crc(&bytes[2..7]);
    if computed != bytes[7] {
        return Err(MstpError::HeaderCrc {
            received: bytes[7],
            computed,
        });
    }
    Ok(FrameHeader {
        frame_type: FrameType::from_u8(bytes[2]),
        destination: bytes[3],
        source: bytes[4],
        data_len: u16::from_be_bytes([bytes[5], bytes[6]]) as usize,
    })
}
