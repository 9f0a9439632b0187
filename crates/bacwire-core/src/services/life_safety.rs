use alloc::string::String;

use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_ctx_character_string, decode_ctx_enumerated, decode_ctx_object_id,
        decode_ctx_unsigned, decode_optional_ctx, encode_ctx_character_string,
        encode_ctx_enumerated, encode_ctx_object_id, encode_ctx_unsigned,
    },
    reader::Reader,
    writer::Writer,
};
use crate::services::decode_confirmed_header;
use crate::types::{ConfirmedService, ObjectId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_LIFE_SAFETY_OPERATION: u8 = ConfirmedService::LifeSafetyOperation.to_u8();

/// `BACnetLifeSafetyOperation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LifeSafetyOperation {
    None = 0,
    Silence = 1,
    SilenceAudible = 2,
    SilenceVisual = 3,
    Reset = 4,
    ResetAlarm = 5,
    ResetFault = 6,
    Unsilence = 7,
    UnsilenceAudible = 8,
    UnsilenceVisual = 9,
}

impl LifeSafetyOperation {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Silence),
            2 => Some(Self::SilenceAudible),
            3 => Some(Self::SilenceVisual),
            4 => Some(Self::Reset),
            5 => Some(Self::ResetAlarm),
            6 => Some(Self::ResetFault),
            7 => Some(Self::Unsilence),
            8 => Some(Self::UnsilenceAudible),
            9 => Some(Self::UnsilenceVisual),
            _ => None,
        }
    }
}

/// LifeSafetyOperation. `operation` is kept raw so vendor operations
/// (64 and up) pass through; without `object_id` the request targets every
/// life-safety object in the device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifeSafetyOperationRequest {
    pub requesting_process_id: u32,
    pub requesting_source: String,
    pub operation: u32,
    pub object_id: Option<ObjectId>,
    pub invoke_id: u8,
}

impl LifeSafetyOperationRequest {
    pub fn new(
        requesting_process_id: u32,
        requesting_source: impl Into<String>,
        operation: LifeSafetyOperation,
        invoke_id: u8,
    ) -> Self {
        Self {
            requesting_process_id,
            requesting_source: requesting_source.into(),
            operation: operation.to_u32(),
            object_id: None,
            invoke_id,
        }
    }

    pub fn operation(&self) -> Option<LifeSafetyOperation> {
        LifeSafetyOperation::from_u32(self.operation)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::LifeSafetyOperation, self.invoke_id)
            .encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_unsigned(w, 0, self.requesting_process_id)?;
        encode_ctx_character_string(w, 1, &self.requesting_source)?;
        encode_ctx_enumerated(w, 2, self.operation)?;
        if let Some(object_id) = self.object_id {
            encode_ctx_object_id(w, 3, object_id)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::LifeSafetyOperation)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        Ok(Self {
            requesting_process_id: decode_ctx_unsigned(r, 0)?,
            requesting_source: decode_ctx_character_string(r, 1)?,
            operation: decode_ctx_enumerated(r, 2)?,
            object_id: decode_optional_ctx(r, 3, decode_ctx_object_id)?,
            invoke_id,
        })
    }
}
