use alloc::vec::Vec;

use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{decode_ctx_object_id, encode_ctx_object_id},
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_opening},
    writer::Writer,
};
use crate::services::{
    decode_confirmed_header, decode_property_values, encode_property_value,
};
use crate::types::{ConfirmedService, ObjectId, PropertyValue};
use crate::{DecodeError, EncodeError};

pub const SERVICE_WRITE_PROPERTY_MULTIPLE: u8 = ConfirmedService::WritePropertyMultiple.to_u8();

/// One object and the property values to write to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteAccessSpecification {
    pub object_id: ObjectId,
    pub values: Vec<PropertyValue>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WritePropertyMultipleRequest {
    pub specs: Vec<WriteAccessSpecification>,
    pub invoke_id: u8,
}

impl WritePropertyMultipleRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::WritePropertyMultiple, self.invoke_id)
            .encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        for spec in &self.specs {
            encode_ctx_object_id(w, 0, spec.object_id)?;
            encode_opening_tag(w, 1)?;
            for value in &spec.values {
                encode_property_value(w, value)?;
            }
            encode_closing_tag(w, 1)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::WritePropertyMultiple)?;
        Self::decode_after_header(r, invoke_id)
    }

    /// Reads object groups until the input ends.
    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let mut specs = Vec::new();
        while !r.is_empty() {
            let object_id = decode_ctx_object_id(r, 0)?;
            expect_opening(r, 1)?;
            let values = decode_property_values(r, 1)?;
            specs.push(WriteAccessSpecification { object_id, values });
        }
        if specs.is_empty() {
            return Err(DecodeError::UnexpectedEof);
        }
        Ok(Self { specs, invoke_id })
    }
}

#[cfg(test)]
mod tests {
    use super::{WriteAccessSpecification, WritePropertyMultipleRequest};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{
        ApplicationValue, ObjectId, ObjectType, PropertyId, PropertyReference, PropertyValue,
    };
    use crate::DecodeError;
    use alloc::vec;

    fn sample() -> WritePropertyMultipleRequest {
        let mut pv =
            PropertyValue::new(PropertyId::PresentValue, vec![ApplicationValue::Real(20.0)]);
        pv.priority = Some(10);
        WritePropertyMultipleRequest {
            specs: vec![
                WriteAccessSpecification {
                    object_id: ObjectId::new(ObjectType::AnalogValue, 1),
                    values: vec![
                        pv,
                        PropertyValue::new(
                            PropertyId::Description,
                            vec![ApplicationValue::from("zone 1")],
                        ),
                    ],
                },
                WriteAccessSpecification {
                    object_id: ObjectId::new(ObjectType::BinaryValue, 7),
                    values: vec![PropertyValue::new(
                        PropertyReference::with_index(PropertyId::PriorityArray, 16),
                        vec![ApplicationValue::Null],
                    )],
                },
            ],
            invoke_id: 12,
        }
    }

    #[test]
    fn roundtrip_two_objects() {
        let req = sample();
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        assert_eq!(WritePropertyMultipleRequest::decode(&mut r).unwrap(), req);
        assert!(r.is_empty());
    }

    #[test]
    fn priority_followed_by_next_property() {
        // The priority [3] of one value sits right before the property [0] of
        // the next; the decoder must not swallow the latter.
        let req = sample();
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        req.encode_service_data(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let decoded = WritePropertyMultipleRequest::decode_after_header(&mut r, 12).unwrap();
        assert_eq!(decoded.specs[0].values[0].priority, Some(10));
        assert_eq!(decoded.specs[0].values[1].priority, None);
        assert_eq!(
            decoded.specs[0].values[1].property.property_id,
            PropertyId::Description
        );
    }

    #[test]
    fn unterminated_group() {
        let req = sample();
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        req.encode_service_data(&mut w).unwrap();
        let n = w.position();

        let mut r = Reader::new(&buf[..n - 1]);
        assert_eq!(
            WritePropertyMultipleRequest::decode_after_header(&mut r, 12),
            Err(DecodeError::UnexpectedEof)
        );
    }
}
