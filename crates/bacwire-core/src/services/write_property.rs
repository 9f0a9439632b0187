use alloc::vec::Vec;

use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{decode_ctx_object_id, encode_ctx_object_id},
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_opening},
    writer::Writer,
};
use crate::services::value_codec::{decode_value_list, encode_values};
use crate::services::{
    decode_confirmed_header, decode_priority, decode_property_reference, encode_priority,
    encode_property_reference,
};
use crate::types::{ApplicationValue, ConfirmedService, ObjectId, PropertyReference};
use crate::{DecodeError, EncodeError};

pub const SERVICE_WRITE_PROPERTY: u8 = ConfirmedService::WriteProperty.to_u8();

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WritePropertyRequest {
    pub object_id: ObjectId,
    pub property: PropertyReference,
    pub values: Vec<ApplicationValue>,
    /// Command priority 1..=16; `None` or `BACNET_NO_PRIORITY` leaves the tag off the wire.
    pub priority: Option<u8>,
    pub invoke_id: u8,
}

impl WritePropertyRequest {
    pub fn new(
        object_id: ObjectId,
        property: impl Into<PropertyReference>,
        value: ApplicationValue,
        invoke_id: u8,
    ) -> Self {
        Self {
            object_id,
            property: property.into(),
            values: alloc::vec![value],
            priority: None,
            invoke_id,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::WriteProperty, self.invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_property_reference(w, 1, &self.property)?;

        encode_opening_tag(w, 3)?;
        encode_values(w, &self.values)?;
        encode_closing_tag(w, 3)?;

        encode_priority(w, 4, self.priority)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::WriteProperty)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let property = decode_property_reference(r, 1)?;
        expect_opening(r, 3)?;
        let values = decode_value_list(r, property.property_id, Some(3))?;
        let priority = decode_priority(r, 4)?;
        Ok(Self {
            object_id,
            property,
            values,
            priority,
            invoke_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::WritePropertyRequest;
    use crate::encoding::{reader::Reader, tag::ApplicationTag, writer::Writer};
    use crate::types::{ApplicationValue, ObjectId, ObjectType, PropertyId};
    use crate::{DecodeError, EncodeError, BACNET_NO_PRIORITY};

    #[test]
    fn present_value_at_priority_8() {
        let req = WritePropertyRequest::new(
            ObjectId::new(ObjectType::AnalogValue, 1),
            PropertyId::PresentValue,
            ApplicationValue::Real(72.5),
            4,
        )
        .with_priority(8);

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(
            w.as_written(),
            &[
                0x00, 0x05, 0x04, 0x0F, 0x0C, 0x00, 0x80, 0x00, 0x01, 0x19, 0x55, 0x3E, 0x44,
                0x42, 0x91, 0x00, 0x00, 0x3F, 0x49, 0x08
            ]
        );

        let mut r = Reader::new(w.as_written());
        let decoded = WritePropertyRequest::decode(&mut r).unwrap();
        assert_eq!(decoded.priority, Some(8));
        assert_eq!(decoded.values.len(), 1);
        assert_eq!(decoded.values[0].tag(), ApplicationTag::Real);
        assert!((decoded.values[0].as_f64().unwrap() - 72.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_priority_omits_tag() {
        let req = WritePropertyRequest::new(
            ObjectId::new(ObjectType::BinaryValue, 2),
            PropertyId::PresentValue,
            ApplicationValue::Enumerated(1),
            1,
        );
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode_service_data(&mut w).unwrap();
        assert_eq!(*w.as_written().last().unwrap(), 0x3F);

        let mut r = Reader::new(w.as_written());
        let decoded = WritePropertyRequest::decode_after_header(&mut r, 1).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn priority_bounds() {
        let req = WritePropertyRequest::new(
            ObjectId::new(ObjectType::AnalogOutput, 1),
            PropertyId::PresentValue,
            ApplicationValue::Null,
            1,
        );
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.clone()
            .with_priority(BACNET_NO_PRIORITY)
            .encode_service_data(&mut w)
            .unwrap();
        assert_eq!(*w.as_written().last().unwrap(), 0x3F);
        let mut r = Reader::new(w.as_written());
        assert_eq!(
            WritePropertyRequest::decode_after_header(&mut r, 1)
                .unwrap()
                .priority,
            None
        );

        let mut w = Writer::sizing();
        assert_eq!(
            req.with_priority(17).encode(&mut w),
            Err(EncodeError::ValueOutOfRange)
        );

        let data = [0x0C, 0x00, 0x40, 0x00, 0x01, 0x19, 0x55, 0x3E, 0x00, 0x3F, 0x49, 0x11];
        let mut r = Reader::new(&data);
        assert_eq!(
            WritePropertyRequest::decode_after_header(&mut r, 1),
            Err(DecodeError::InvalidValue)
        );
    }
}
