use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_app_enumerated, decode_ctx_object_id, encode_app_enumerated, encode_ctx_object_id,
    },
    reader::Reader,
    tag::{
        encode_closing_tag, encode_opening_tag, expect_closing, expect_opening,
        is_closing_tag_number, Tag,
    },
    writer::Writer,
};
use crate::services::value_codec::{decode_value_list, encode_values};
use crate::services::{
    decode_complex_ack_header, decode_confirmed_header, decode_property_reference,
    encode_property_reference,
};
use crate::types::{
    ApplicationValue, ConfirmedService, ErrorClass, ErrorCode, ObjectId, PropertyReference,
};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_PROPERTY_MULTIPLE: u8 = ConfirmedService::ReadPropertyMultiple.to_u8();

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadAccessSpecification {
    pub object_id: ObjectId,
    pub properties: Vec<PropertyReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyMultipleRequest {
    pub specs: Vec<ReadAccessSpecification>,
    pub invoke_id: u8,
}

impl ReadPropertyMultipleRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut header =
            ConfirmedRequestHeader::new(ConfirmedService::ReadPropertyMultiple, self.invoke_id);
        header.segmented_response_accepted = true;
        header.encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        for spec in &self.specs {
            encode_ctx_object_id(w, 0, spec.object_id)?;
            encode_opening_tag(w, 1)?;
            for prop in &spec.properties {
                encode_property_reference(w, 0, prop)?;
            }
            encode_closing_tag(w, 1)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::ReadPropertyMultiple)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let mut specs = Vec::new();
        while !r.is_empty() {
            let object_id = decode_ctx_object_id(r, 0)?;
            expect_opening(r, 1)?;
            let mut properties = Vec::new();
            while !is_closing_tag_number(r, 1) {
                properties.push(decode_property_reference(r, 0)?);
            }
            expect_closing(r, 1)?;
            specs.push(ReadAccessSpecification {
                object_id,
                properties,
            });
        }
        if specs.is_empty() {
            return Err(DecodeError::UnexpectedEof);
        }
        Ok(Self { specs, invoke_id })
    }
}

/// Outcome of reading one property: its values or the error the server reported.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadResultValue {
    Values(Vec<ApplicationValue>),
    Error { error_class: u32, error_code: u32 },
}

impl ReadResultValue {
    pub fn error(class: ErrorClass, code: ErrorCode) -> Self {
        Self::Error {
            error_class: class.to_u32(),
            error_code: code.to_u32(),
        }
    }

    pub fn values(&self) -> Option<&[ApplicationValue]> {
        match self {
            Self::Values(v) => Some(v),
            Self::Error { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadResultElement {
    pub property: PropertyReference,
    pub result: ReadResultValue,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadAccessResult {
    pub object_id: ObjectId,
    pub results: Vec<ReadResultElement>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyMultipleAck {
    pub results: Vec<ReadAccessResult>,
}

impl ReadPropertyMultipleAck {
    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::ReadPropertyMultiple, invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        for object in &self.results {
            encode_ctx_object_id(w, 0, object.object_id)?;
            encode_opening_tag(w, 1)?;
            for element in &object.results {
                encode_property_reference(w, 2, &element.property)?;
                match &element.result {
                    ReadResultValue::Values(values) => {
                        encode_opening_tag(w, 4)?;
                        encode_values(w, values)?;
                        encode_closing_tag(w, 4)?;
                    }
                    ReadResultValue::Error {
                        error_class,
                        error_code,
                    } => {
                        encode_opening_tag(w, 5)?;
                        encode_app_enumerated(w, *error_class)?;
                        encode_app_enumerated(w, *error_code)?;
                        encode_closing_tag(w, 5)?;
                    }
                }
            }
            encode_closing_tag(w, 1)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_complex_ack_header(r, ConfirmedService::ReadPropertyMultiple)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let mut results = Vec::new();

        while !r.is_empty() {
            let object_id = decode_ctx_object_id(r, 0)?;
            expect_opening(r, 1)?;

            let mut elements = Vec::new();
            while !is_closing_tag_number(r, 1) {
                let property = decode_property_reference(r, 2)?;
                let result = match Tag::decode(r)? {
                    Tag::Opening { tag_num: 4 } => ReadResultValue::Values(decode_value_list(
                        r,
                        property.property_id,
                        Some(4),
                    )?),
                    Tag::Opening { tag_num: 5 } => {
                        let error_class = decode_app_enumerated(r)?;
                        let error_code = decode_app_enumerated(r)?;
                        expect_closing(r, 5)?;
                        ReadResultValue::Error {
                            error_class,
                            error_code,
                        }
                    }
                    _ => return Err(DecodeError::InvalidTag),
                };
                elements.push(ReadResultElement { property, result });
            }
            expect_closing(r, 1)?;

            results.push(ReadAccessResult {
                object_id,
                results: elements,
            });
        }

        Ok(Self { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectType, PropertyId};
    use alloc::vec;

    #[test]
    fn request_roundtrip() {
        let req = ReadPropertyMultipleRequest {
            specs: vec![ReadAccessSpecification {
                object_id: ObjectId::new(ObjectType::Device, 123),
                properties: vec![
                    PropertyReference::new(PropertyId::ObjectName),
                    PropertyReference::with_index(PropertyId::PresentValue, 1),
                ],
            }],
            invoke_id: 7,
        };

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(&w.as_written()[..4], &[0x02, 0x05, 0x07, 0x0E]);

        let mut r = Reader::new(w.as_written());
        assert_eq!(ReadPropertyMultipleRequest::decode(&mut r).unwrap(), req);
        assert!(r.is_empty());
    }

    #[test]
    fn ack_with_value_and_error() {
        let ack = ReadPropertyMultipleAck {
            results: vec![ReadAccessResult {
                object_id: ObjectId::new(ObjectType::AnalogInput, 1),
                results: vec![
                    ReadResultElement {
                        property: PropertyId::PresentValue.into(),
                        result: ReadResultValue::Values(vec![ApplicationValue::Real(42.0)]),
                    },
                    ReadResultElement {
                        property: PropertyId::Description.into(),
                        result: ReadResultValue::error(
                            ErrorClass::Property,
                            ErrorCode::UnknownProperty,
                        ),
                    },
                ],
            }],
        };

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        ack.encode(&mut w, 9).unwrap();

        let mut r = Reader::new(w.as_written());
        let decoded = ReadPropertyMultipleAck::decode(&mut r).unwrap();
        assert_eq!(decoded, ack);
        assert_eq!(decoded.results[0].results[1].result.values(), None);
    }

    #[test]
    fn nested_ack_consumes_everything() {
        let element = |id, value: f32| ReadResultElement {
            property: PropertyId::from_u32(id).into(),
            result: ReadResultValue::Values(vec![ApplicationValue::Real(value)]),
        };
        let ack = ReadPropertyMultipleAck {
            results: vec![
                ReadAccessResult {
                    object_id: ObjectId::new(ObjectType::AnalogValue, 1),
                    results: vec![element(85, 1.0), element(69, 2.0)],
                },
                ReadAccessResult {
                    object_id: ObjectId::new(ObjectType::AnalogValue, 2),
                    results: vec![element(85, 3.0), element(65, 4.0)],
                },
            ],
        };
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        ack.encode_service_data(&mut w).unwrap();
        let len = w.position();

        let mut r = Reader::new(w.as_written());
        let decoded = ReadPropertyMultipleAck::decode_after_header(&mut r).unwrap();
        assert_eq!(r.position(), len);
        assert_eq!(decoded, ack);
    }

    #[test]
    fn result_must_be_value_or_error() {
        // object [0], opening 1, property [2], then a context tag 6
        let data = [0x0C, 0x00, 0x00, 0x00, 0x01, 0x1E, 0x29, 0x55, 0x69, 0x01, 0x1F];
        let mut r = Reader::new(&data);
        assert_eq!(
            ReadPropertyMultipleAck::decode_after_header(&mut r),
            Err(DecodeError::InvalidTag)
        );
    }
}
