use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_app_object_id, decode_app_octet_string, decode_app_signed, decode_app_unsigned,
        decode_ctx_signed, encode_app_object_id, encode_app_octet_string, encode_app_signed,
        encode_app_unsigned, encode_ctx_signed,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_closing, Tag},
    writer::Writer,
};
use crate::services::{decode_complex_ack_header, decode_confirmed_header};
use crate::types::{ConfirmedService, ObjectId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_ATOMIC_WRITE_FILE: u8 = ConfirmedService::AtomicWriteFile.to_u8();

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomicWriteFileAccess {
    Stream {
        file_start_position: i32,
        file_data: Vec<u8>,
    },
    /// A start of -1 appends the records to the end of the file.
    Record {
        file_start_record: i32,
        file_record_data: Vec<Vec<u8>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomicWriteFileRequest {
    pub file_object_id: ObjectId,
    pub access_method: AtomicWriteFileAccess,
    pub invoke_id: u8,
}

impl AtomicWriteFileRequest {
    pub fn stream(
        file_object_id: ObjectId,
        file_start_position: i32,
        file_data: impl Into<Vec<u8>>,
        invoke_id: u8,
    ) -> Self {
        Self {
            file_object_id,
            access_method: AtomicWriteFileAccess::Stream {
                file_start_position,
                file_data: file_data.into(),
            },
            invoke_id,
        }
    }

    pub fn record(
        file_object_id: ObjectId,
        file_start_record: i32,
        file_record_data: Vec<Vec<u8>>,
        invoke_id: u8,
    ) -> Self {
        Self {
            file_object_id,
            access_method: AtomicWriteFileAccess::Record {
                file_start_record,
                file_record_data,
            },
            invoke_id,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::AtomicWriteFile, self.invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_app_object_id(w, self.file_object_id)?;
        match &self.access_method {
            AtomicWriteFileAccess::Stream {
                file_start_position,
                file_data,
            } => {
                encode_opening_tag(w, 0)?;
                encode_app_signed(w, *file_start_position)?;
                encode_app_octet_string(w, file_data)?;
                encode_closing_tag(w, 0)
            }
            AtomicWriteFileAccess::Record {
                file_start_record,
                file_record_data,
            } => {
                let count = u32::try_from(file_record_data.len())
                    .map_err(|_| EncodeError::ValueOutOfRange)?;
                encode_opening_tag(w, 1)?;
                encode_app_signed(w, *file_start_record)?;
                encode_app_unsigned(w, count)?;
                for record in file_record_data {
                    encode_app_octet_string(w, record)?;
                }
                encode_closing_tag(w, 1)
            }
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::AtomicWriteFile)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let file_object_id = decode_app_object_id(r)?;
        let access_method = match Tag::decode(r)? {
            Tag::Opening { tag_num: 0 } => {
                let file_start_position = decode_app_signed(r)?;
                let file_data = decode_app_octet_string(r)?;
                expect_closing(r, 0)?;
                AtomicWriteFileAccess::Stream {
                    file_start_position,
                    file_data,
                }
            }
            Tag::Opening { tag_num: 1 } => {
                let file_start_record = decode_app_signed(r)?;
                let count = decode_app_unsigned(r)?;
                if count as usize > r.remaining() {
                    return Err(DecodeError::InvalidLength);
                }
                let mut file_record_data = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    file_record_data.push(decode_app_octet_string(r)?);
                }
                expect_closing(r, 1)?;
                AtomicWriteFileAccess::Record {
                    file_start_record,
                    file_record_data,
                }
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        Ok(Self {
            file_object_id,
            access_method,
            invoke_id,
        })
    }
}

/// Where the written data landed: a byte position for stream access, a
/// record number for record access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomicWriteFileAck {
    Stream { file_start_position: i32 },
    Record { file_start_record: i32 },
}

impl AtomicWriteFileAck {
    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::AtomicWriteFile, invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match *self {
            Self::Stream { file_start_position } => encode_ctx_signed(w, 0, file_start_position),
            Self::Record { file_start_record } => encode_ctx_signed(w, 1, file_start_record),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_complex_ack_header(r, ConfirmedService::AtomicWriteFile)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match r.peek_tag()? {
            Tag::Context { tag_num: 0, .. } => Ok(Self::Stream {
                file_start_position: decode_ctx_signed(r, 0)?,
            }),
            Tag::Context { tag_num: 1, .. } => Ok(Self::Record {
                file_start_record: decode_ctx_signed(r, 1)?,
            }),
            _ => Err(DecodeError::InvalidTag),
        }
    }
}
