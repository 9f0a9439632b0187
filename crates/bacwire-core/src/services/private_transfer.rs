use alloc::vec::Vec;

use crate::apdu::{ApduType, ComplexAckHeader, ConfirmedRequestHeader, UnconfirmedRequestHeader};
use crate::encoding::{
    primitives::{decode_ctx_unsigned, encode_ctx_unsigned},
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_opening, is_opening_tag_number},
    writer::Writer,
};
use crate::services::value_codec::decode_value_list;
use crate::services::{
    decode_complex_ack_header, decode_confirmed_header, decode_unconfirmed_header,
};
use crate::types::{ConfirmedService, PropertyId, UnconfirmedService};
use crate::{DecodeError, EncodeError};

pub const SERVICE_CONFIRMED_PRIVATE_TRANSFER: u8 =
    ConfirmedService::ConfirmedPrivateTransfer.to_u8();
pub const SERVICE_UNCONFIRMED_PRIVATE_TRANSFER: u8 =
    UnconfirmedService::UnconfirmedPrivateTransfer.to_u8();

/// Writes `data` verbatim inside opening/closing tag 2.
fn encode_block(w: &mut Writer<'_>, data: &Option<Vec<u8>>) -> Result<(), EncodeError> {
    if let Some(data) = data {
        encode_opening_tag(w, 2)?;
        w.write_all(data)?;
        encode_closing_tag(w, 2)?;
    }
    Ok(())
}

/// Reads an optional tag-2 block and returns the bytes between its
/// opening and closing tags. The content must be well-formed tagged data.
fn decode_block(r: &mut Reader<'_>) -> Result<Option<Vec<u8>>, DecodeError> {
    if r.is_empty() || !is_opening_tag_number(r, 2) {
        return Ok(None);
    }
    expect_opening(r, 2)?;
    let start = r.rest();
    decode_value_list(r, PropertyId::Proprietary(0), Some(2))?;
    // the closing tag 2 is a single byte
    let consumed = start.len() - r.remaining();
    Ok(Some(start[..consumed - 1].to_vec()))
}

/// A vendor-defined service call; `invoke_id` is set for the confirmed form.
/// Parameters are kept as the raw tagged bytes the vendor defines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrivateTransferRequest {
    pub vendor_id: u32,
    pub service_number: u32,
    pub service_parameters: Option<Vec<u8>>,
    pub invoke_id: Option<u8>,
}

impl PrivateTransferRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self.invoke_id {
            Some(invoke_id) => {
                ConfirmedRequestHeader::new(ConfirmedService::ConfirmedPrivateTransfer, invoke_id)
                    .encode(w)?
            }
            None => UnconfirmedRequestHeader::new(UnconfirmedService::UnconfirmedPrivateTransfer)
                .encode(w)?,
        }
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_unsigned(w, 0, self.vendor_id)?;
        encode_ctx_unsigned(w, 1, self.service_number)?;
        encode_block(w, &self.service_parameters)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = match ApduType::of(r.peek_u8()?) {
            Some(ApduType::ConfirmedRequest) => Some(decode_confirmed_header(
                r,
                ConfirmedService::ConfirmedPrivateTransfer,
            )?),
            Some(ApduType::UnconfirmedRequest) => {
                decode_unconfirmed_header(r, UnconfirmedService::UnconfirmedPrivateTransfer)?;
                None
            }
            _ => return Err(DecodeError::InvalidValue),
        };
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(
        r: &mut Reader<'_>,
        invoke_id: Option<u8>,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            vendor_id: decode_ctx_unsigned(r, 0)?,
            service_number: decode_ctx_unsigned(r, 1)?,
            service_parameters: decode_block(r)?,
            invoke_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrivateTransferAck {
    pub vendor_id: u32,
    pub service_number: u32,
    pub result_block: Option<Vec<u8>>,
}

impl PrivateTransferAck {
    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::ConfirmedPrivateTransfer, invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_unsigned(w, 0, self.vendor_id)?;
        encode_ctx_unsigned(w, 1, self.service_number)?;
        encode_block(w, &self.result_block)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_complex_ack_header(r, ConfirmedService::ConfirmedPrivateTransfer)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            vendor_id: decode_ctx_unsigned(r, 0)?,
            service_number: decode_ctx_unsigned(r, 1)?,
            result_block: decode_block(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn confirmed_with_nested_parameters() {
        let req = PrivateTransferRequest {
            vendor_id: 260,
            service_number: 1,
            // app unsigned 5, then a nested constructed block
            service_parameters: Some(vec![0x21, 0x05, 0x0E, 0x44, 0x3F, 0x80, 0x00, 0x00, 0x0F]),
            invoke_id: Some(2),
        };
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        assert_eq!(PrivateTransferRequest::decode(&mut r).unwrap(), req);
        assert!(r.is_empty());
    }

    #[test]
    fn unconfirmed_without_parameters() {
        let req = PrivateTransferRequest {
            vendor_id: 7,
            service_number: 3,
            service_parameters: None,
            invoke_id: None,
        };
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0x10, 0x04, 0x09, 0x07, 0x19, 0x03]);

        let mut r = Reader::new(w.as_written());
        assert_eq!(PrivateTransferRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn ack_roundtrip_and_unterminated_block() {
        let ack = PrivateTransferAck {
            vendor_id: 260,
            service_number: 1,
            result_block: Some(vec![0x91, 0x00]),
        };
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        ack.encode(&mut w, 2).unwrap();
        let n = w.position();

        let mut r = Reader::new(&buf[..n]);
        assert_eq!(PrivateTransferAck::decode(&mut r).unwrap(), ack);

        let mut r = Reader::new(&buf[3..n - 1]);
        assert_eq!(
            PrivateTransferAck::decode_after_header(&mut r),
            Err(DecodeError::UnexpectedEof)
        );
    }
}
