use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_app_date, decode_app_signed, decode_app_time, decode_app_unsigned,
        decode_ctx_bit_string, decode_ctx_object_id, decode_ctx_unsigned, decode_optional_ctx,
        encode_app_date, encode_app_signed, encode_app_time, encode_app_unsigned,
        encode_ctx_bit_string, encode_ctx_object_id, encode_ctx_unsigned,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_closing, expect_opening, Tag},
    writer::Writer,
};
use crate::services::value_codec::{decode_value_list, encode_values};
use crate::services::{
    decode_complex_ack_header, decode_confirmed_header, decode_property_reference,
    encode_property_reference,
};
use crate::types::{
    ApplicationValue, BitString, ConfirmedService, DateTime, ObjectId, PropertyReference,
};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_RANGE: u8 = ConfirmedService::ReadRange.to_u8();

/// Which slice of a list property to return. A negative count reads
/// backwards from the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadRangeSpecifier {
    ByPosition { reference_index: u32, count: i32 },
    BySequenceNumber { reference_sequence: u32, count: i32 },
    ByTime { reference_time: DateTime, count: i32 },
    ReadAll,
}

impl ReadRangeSpecifier {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match *self {
            Self::ByPosition {
                reference_index,
                count,
            } => {
                encode_opening_tag(w, 3)?;
                encode_app_unsigned(w, reference_index)?;
                encode_app_signed(w, count)?;
                encode_closing_tag(w, 3)
            }
            Self::BySequenceNumber {
                reference_sequence,
                count,
            } => {
                encode_opening_tag(w, 6)?;
                encode_app_unsigned(w, reference_sequence)?;
                encode_app_signed(w, count)?;
                encode_closing_tag(w, 6)
            }
            Self::ByTime {
                reference_time,
                count,
            } => {
                encode_opening_tag(w, 7)?;
                encode_app_date(w, reference_time.date)?;
                encode_app_time(w, reference_time.time)?;
                encode_app_signed(w, count)?;
                encode_closing_tag(w, 7)
            }
            Self::ReadAll => Ok(()),
        }
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.is_empty() {
            return Ok(Self::ReadAll);
        }
        let range = match Tag::decode(r)? {
            Tag::Opening { tag_num: 3 } => Self::ByPosition {
                reference_index: decode_app_unsigned(r)?,
                count: decode_app_signed(r)?,
            },
            Tag::Opening { tag_num: 6 } => Self::BySequenceNumber {
                reference_sequence: decode_app_unsigned(r)?,
                count: decode_app_signed(r)?,
            },
            Tag::Opening { tag_num: 7 } => {
                let date = decode_app_date(r)?;
                let time = decode_app_time(r)?;
                Self::ByTime {
                    reference_time: DateTime { date, time },
                    count: decode_app_signed(r)?,
                }
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        let closing = match range {
            Self::ByPosition { .. } => 3,
            Self::BySequenceNumber { .. } => 6,
            _ => 7,
        };
        expect_closing(r, closing)?;
        Ok(range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadRangeRequest {
    pub object_id: ObjectId,
    pub property: PropertyReference,
    pub range: ReadRangeSpecifier,
    pub invoke_id: u8,
}

impl ReadRangeRequest {
    pub fn new(
        object_id: ObjectId,
        property: impl Into<PropertyReference>,
        range: ReadRangeSpecifier,
        invoke_id: u8,
    ) -> Self {
        Self {
            object_id,
            property: property.into(),
            range,
            invoke_id,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut header = ConfirmedRequestHeader::new(ConfirmedService::ReadRange, self.invoke_id);
        header.segmented_response_accepted = true;
        header.encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_property_reference(w, 1, &self.property)?;
        self.range.encode(w)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::ReadRange)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        Ok(Self {
            object_id: decode_ctx_object_id(r, 0)?,
            property: decode_property_reference(r, 1)?,
            range: ReadRangeSpecifier::decode(r)?,
            invoke_id,
        })
    }
}

/// Bits of the ack's result flags.
pub const RESULT_FIRST_ITEM: u8 = 0;
pub const RESULT_LAST_ITEM: u8 = 1;
pub const RESULT_MORE_ITEMS: u8 = 2;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadRangeAck {
    pub object_id: ObjectId,
    pub property: PropertyReference,
    pub result_flags: BitString,
    pub item_count: u32,
    pub item_data: Vec<ApplicationValue>,
    pub first_sequence_number: Option<u32>,
}

impl ReadRangeAck {
    pub fn first_item(&self) -> bool {
        self.result_flags.get_bit(RESULT_FIRST_ITEM)
    }

    pub fn last_item(&self) -> bool {
        self.result_flags.get_bit(RESULT_LAST_ITEM)
    }

    pub fn more_items(&self) -> bool {
        self.result_flags.get_bit(RESULT_MORE_ITEMS)
    }

    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::ReadRange, invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_property_reference(w, 1, &self.property)?;
        encode_ctx_bit_string(w, 3, &self.result_flags)?;
        encode_ctx_unsigned(w, 4, self.item_count)?;
        encode_opening_tag(w, 5)?;
        encode_values(w, &self.item_data)?;
        encode_closing_tag(w, 5)?;
        if let Some(sequence) = self.first_sequence_number {
            encode_ctx_unsigned(w, 6, sequence)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_complex_ack_header(r, ConfirmedService::ReadRange)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let property = decode_property_reference(r, 1)?;
        let result_flags = decode_ctx_bit_string(r, 3)?;
        let item_count = decode_ctx_unsigned(r, 4)?;
        expect_opening(r, 5)?;
        let item_data = decode_value_list(r, property.property_id, Some(5))?;
        Ok(Self {
            object_id,
            property,
            result_flags,
            item_count,
            item_data,
            first_sequence_number: decode_optional_ctx(r, 6, decode_ctx_unsigned)?,
        })
    }
}
