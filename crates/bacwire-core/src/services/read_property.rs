use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{decode_ctx_object_id, encode_ctx_object_id},
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_opening},
    writer::Writer,
};
use crate::services::value_codec::{decode_value_list, encode_values};
use crate::services::{
    decode_complex_ack_header, decode_confirmed_header, decode_property_reference,
    encode_property_reference,
};
use crate::types::{ApplicationValue, ConfirmedService, ObjectId, PropertyReference};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_PROPERTY: u8 = ConfirmedService::ReadProperty.to_u8();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property: PropertyReference,
    pub invoke_id: u8,
}

impl ReadPropertyRequest {
    pub fn new(object_id: ObjectId, property: impl Into<PropertyReference>, invoke_id: u8) -> Self {
        Self {
            object_id,
            property: property.into(),
            invoke_id,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::ReadProperty, self.invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_property_reference(w, 1, &self.property)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::ReadProperty)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        Ok(Self {
            object_id: decode_ctx_object_id(r, 0)?,
            property: decode_property_reference(r, 1)?,
            invoke_id,
        })
    }
}

/// ReadProperty result; `values` holds everything between opening and closing tag 3.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyAck {
    pub object_id: ObjectId,
    pub property: PropertyReference,
    pub values: Vec<ApplicationValue>,
}

impl ReadPropertyAck {
    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::ReadProperty, invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_property_reference(w, 1, &self.property)?;
        encode_opening_tag(w, 3)?;
        encode_values(w, &self.values)?;
        encode_closing_tag(w, 3)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_complex_ack_header(r, ConfirmedService::ReadProperty)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let property = decode_property_reference(r, 1)?;
        expect_opening(r, 3)?;
        let values = decode_value_list(r, property.property_id, Some(3))?;
        Ok(Self {
            object_id,
            property,
            values,
        })
    }

    /// The first value, which is the whole result for scalar properties.
    pub fn value(&self) -> Option<&ApplicationValue> {
        self.values.first()
    }
}
