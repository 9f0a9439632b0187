use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_app_object_id, decode_ctx_enumerated, decode_ctx_object_id, encode_app_object_id,
        encode_ctx_enumerated, encode_ctx_object_id,
    },
    reader::Reader,
    tag::{
        encode_closing_tag, encode_opening_tag, expect_closing, expect_opening,
        is_opening_tag_number, Tag,
    },
    writer::Writer,
};
use crate::services::{
    decode_complex_ack_header, decode_confirmed_header, decode_property_values,
    encode_property_value,
};
use crate::types::{ConfirmedService, ObjectId, ObjectType, PropertyValue};
use crate::{DecodeError, EncodeError};

pub const SERVICE_CREATE_OBJECT: u8 = ConfirmedService::CreateObject.to_u8();
pub const SERVICE_DELETE_OBJECT: u8 = ConfirmedService::DeleteObject.to_u8();

/// Either just a type (the device picks the instance) or a full identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreateObjectSpecifier {
    ObjectType(ObjectType),
    ObjectId(ObjectId),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateObjectRequest {
    pub specifier: CreateObjectSpecifier,
    pub initial_values: Vec<PropertyValue>,
    pub invoke_id: u8,
}

impl CreateObjectRequest {
    pub fn by_type(object_type: ObjectType, invoke_id: u8) -> Self {
        Self {
            specifier: CreateObjectSpecifier::ObjectType(object_type),
            initial_values: Vec::new(),
            invoke_id,
        }
    }

    pub fn by_id(object_id: ObjectId, invoke_id: u8) -> Self {
        Self {
            specifier: CreateObjectSpecifier::ObjectId(object_id),
            initial_values: Vec::new(),
            invoke_id,
        }
    }

    pub fn with_initial_values(mut self, values: Vec<PropertyValue>) -> Self {
        self.initial_values = values;
        self
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::CreateObject, self.invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_opening_tag(w, 0)?;
        match self.specifier {
            CreateObjectSpecifier::ObjectType(object_type) => {
                encode_ctx_enumerated(w, 0, object_type.to_u16() as u32)?
            }
            CreateObjectSpecifier::ObjectId(object_id) => encode_ctx_object_id(w, 1, object_id)?,
        }
        encode_closing_tag(w, 0)?;

        if !self.initial_values.is_empty() {
            encode_opening_tag(w, 1)?;
            for value in &self.initial_values {
                encode_property_value(w, value)?;
            }
            encode_closing_tag(w, 1)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::CreateObject)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        expect_opening(r, 0)?;
        let specifier = match r.peek_tag()? {
            Tag::Context { tag_num: 0, .. } => {
                let raw = decode_ctx_enumerated(r, 0)?;
                let raw = u16::try_from(raw).map_err(|_| DecodeError::InvalidValue)?;
                CreateObjectSpecifier::ObjectType(ObjectType::from_u16(raw))
            }
            Tag::Context { tag_num: 1, .. } => {
                CreateObjectSpecifier::ObjectId(decode_ctx_object_id(r, 1)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        expect_closing(r, 0)?;

        let initial_values = if !r.is_empty() && is_opening_tag_number(r, 1) {
            expect_opening(r, 1)?;
            decode_property_values(r, 1)?
        } else {
            Vec::new()
        };

        Ok(Self {
            specifier,
            initial_values,
            invoke_id,
        })
    }
}

/// The identifier of the object the device created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateObjectAck {
    pub object_id: ObjectId,
}

impl CreateObjectAck {
    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::CreateObject, invoke_id).encode(w)?;
        encode_app_object_id(w, self.object_id)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_complex_ack_header(r, ConfirmedService::CreateObject)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            object_id: decode_app_object_id(r)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeleteObjectRequest {
    pub object_id: ObjectId,
    pub invoke_id: u8,
}

impl DeleteObjectRequest {
    pub fn new(object_id: ObjectId, invoke_id: u8) -> Self {
        Self {
            object_id,
            invoke_id,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::DeleteObject, self.invoke_id).encode(w)?;
        encode_app_object_id(w, self.object_id)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::DeleteObject)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        Ok(Self {
            object_id: decode_app_object_id(r)?,
            invoke_id,
        })
    }
}
