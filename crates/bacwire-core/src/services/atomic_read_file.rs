use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_app_boolean, decode_app_object_id, decode_app_octet_string, decode_app_signed,
        decode_app_unsigned, encode_app_boolean, encode_app_object_id, encode_app_octet_string,
        encode_app_signed, encode_app_unsigned,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_closing, Tag},
    writer::Writer,
};
use crate::services::{decode_complex_ack_header, decode_confirmed_header};
use crate::types::{ConfirmedService, ObjectId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_ATOMIC_READ_FILE: u8 = ConfirmedService::AtomicReadFile.to_u8();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomicReadFileAccessMethod {
    Stream {
        file_start_position: i32,
        requested_octet_count: u32,
    },
    Record {
        file_start_record: i32,
        requested_record_count: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomicReadFileRequest {
    pub file_object_id: ObjectId,
    pub access_method: AtomicReadFileAccessMethod,
    pub invoke_id: u8,
}

impl AtomicReadFileRequest {
    pub fn stream(
        file_object_id: ObjectId,
        file_start_position: i32,
        requested_octet_count: u32,
        invoke_id: u8,
    ) -> Self {
        Self {
            file_object_id,
            access_method: AtomicReadFileAccessMethod::Stream {
                file_start_position,
                requested_octet_count,
            },
            invoke_id,
        }
    }

    pub fn record(
        file_object_id: ObjectId,
        file_start_record: i32,
        requested_record_count: u32,
        invoke_id: u8,
    ) -> Self {
        Self {
            file_object_id,
            access_method: AtomicReadFileAccessMethod::Record {
                file_start_record,
                requested_record_count,
            },
            invoke_id,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut header =
            ConfirmedRequestHeader::new(ConfirmedService::AtomicReadFile, self.invoke_id);
        header.segmented_response_accepted = true;
        header.encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_app_object_id(w, self.file_object_id)?;
        let (tag_num, start, count) = match self.access_method {
            AtomicReadFileAccessMethod::Stream {
                file_start_position,
                requested_octet_count,
            } => (0, file_start_position, requested_octet_count),
            AtomicReadFileAccessMethod::Record {
                file_start_record,
                requested_record_count,
            } => (1, file_start_record, requested_record_count),
        };
        encode_opening_tag(w, tag_num)?;
        encode_app_signed(w, start)?;
        encode_app_unsigned(w, count)?;
        encode_closing_tag(w, tag_num)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::AtomicReadFile)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let file_object_id = decode_app_object_id(r)?;
        let access_method = match Tag::decode(r)? {
            Tag::Opening { tag_num: 0 } => {
                let file_start_position = decode_app_signed(r)?;
                let requested_octet_count = decode_app_unsigned(r)?;
                expect_closing(r, 0)?;
                AtomicReadFileAccessMethod::Stream {
                    file_start_position,
                    requested_octet_count,
                }
            }
            Tag::Opening { tag_num: 1 } => {
                let file_start_record = decode_app_signed(r)?;
                let requested_record_count = decode_app_unsigned(r)?;
                expect_closing(r, 1)?;
                AtomicReadFileAccessMethod::Record {
                    file_start_record,
                    requested_record_count,
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

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomicReadFileAckAccess {
    Stream {
        file_start_position: i32,
        file_data: Vec<u8>,
    },
    Record {
        file_start_record: i32,
        file_record_data: Vec<Vec<u8>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomicReadFileAck {
    pub end_of_file: bool,
    pub access_method: AtomicReadFileAckAccess,
}

impl AtomicReadFileAck {
    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::AtomicReadFile, invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_app_boolean(w, self.end_of_file)?;
        match &self.access_method {
            AtomicReadFileAckAccess::Stream {
                file_start_position,
                file_data,
            } => {
                encode_opening_tag(w, 0)?;
                encode_app_signed(w, *file_start_position)?;
                encode_app_octet_string(w, file_data)?;
                encode_closing_tag(w, 0)
            }
            AtomicReadFileAckAccess::Record {
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
        decode_complex_ack_header(r, ConfirmedService::AtomicReadFile)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let end_of_file = decode_app_boolean(r)?;
        let access_method = match Tag::decode(r)? {
            Tag::Opening { tag_num: 0 } => {
                let file_start_position = decode_app_signed(r)?;
                let file_data = decode_app_octet_string(r)?;
                expect_closing(r, 0)?;
                AtomicReadFileAckAccess::Stream {
                    file_start_position,
                    file_data,
                }
            }
            Tag::Opening { tag_num: 1 } => {
                let file_start_record = decode_app_signed(r)?;
                let count = decode_app_unsigned(r)?;
                // each record needs at least a tag byte
                if count as usize > r.remaining() {
                    return Err(DecodeError::InvalidLength);
                }
                let mut file_record_data = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    file_record_data.push(decode_app_octet_string(r)?);
                }
                expect_closing(r, 1)?;
                AtomicReadFileAckAccess::Record {
                    file_start_record,
                    file_record_data,
                }
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        Ok(Self {
            end_of_file,
            access_method,
        })
    }
}
