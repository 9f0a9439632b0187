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
    decode_confirmed_header, decode_property_reference, encode_property_reference,
};
use crate::types::{ApplicationValue, ConfirmedService, ObjectId, PropertyReference};
use crate::{DecodeError, EncodeError};

pub const SERVICE_ADD_LIST_ELEMENT: u8 = ConfirmedService::AddListElement.to_u8();
pub const SERVICE_REMOVE_LIST_ELEMENT: u8 = ConfirmedService::RemoveListElement.to_u8();

/// AddListElement and RemoveListElement share one body; `service` picks
/// which of the two it is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListElementRequest {
    pub service: ListElementService,
    pub object_id: ObjectId,
    pub property: PropertyReference,
    pub elements: Vec<ApplicationValue>,
    pub invoke_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListElementService {
    Add,
    Remove,
}

impl ListElementService {
    const fn confirmed_service(self) -> ConfirmedService {
        match self {
            Self::Add => ConfirmedService::AddListElement,
            Self::Remove => ConfirmedService::RemoveListElement,
        }
    }
}

impl ListElementRequest {
    pub fn add(
        object_id: ObjectId,
        property: impl Into<PropertyReference>,
        elements: Vec<ApplicationValue>,
        invoke_id: u8,
    ) -> Self {
        Self {
            service: ListElementService::Add,
            object_id,
            property: property.into(),
            elements,
            invoke_id,
        }
    }

    pub fn remove(
        object_id: ObjectId,
        property: impl Into<PropertyReference>,
        elements: Vec<ApplicationValue>,
        invoke_id: u8,
    ) -> Self {
        Self {
            service: ListElementService::Remove,
            ..Self::add(object_id, property, elements, invoke_id)
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(self.service.confirmed_service(), self.invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_property_reference(w, 1, &self.property)?;
        encode_opening_tag(w, 3)?;
        encode_values(w, &self.elements)?;
        encode_closing_tag(w, 3)
    }

    /// Decodes an Add- or RemoveListElement request, header included.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let mut probe = *r;
        let service = match ConfirmedRequestHeader::decode(&mut probe)?.service() {
            Some(ConfirmedService::AddListElement) => ListElementService::Add,
            Some(ConfirmedService::RemoveListElement) => ListElementService::Remove,
            _ => return Err(DecodeError::InvalidValue),
        };
        let invoke_id = decode_confirmed_header(r, service.confirmed_service())?;
        Self::decode_after_header(r, service, invoke_id)
    }

    pub fn decode_after_header(
        r: &mut Reader<'_>,
        service: ListElementService,
        invoke_id: u8,
    ) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let property = decode_property_reference(r, 1)?;
        expect_opening(r, 3)?;
        let elements = decode_value_list(r, property.property_id, Some(3))?;
        Ok(Self {
            service,
            object_id,
            property,
            elements,
            invoke_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectType, PropertyId};
    use alloc::vec;

    #[test]
    fn add_then_remove() {
        let members = vec![
            ApplicationValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 1)),
            ApplicationValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 2)),
        ];
        for req in [
            ListElementRequest::add(
                ObjectId::new(ObjectType::from_u16(30), 1),
                PropertyId::ObjectList,
                members.clone(),
                1,
            ),
            ListElementRequest::remove(
                ObjectId::new(ObjectType::from_u16(30), 1),
                PropertyId::ObjectList,
                members.clone(),
                2,
            ),
        ] {
            let mut buf = [0u8; 64];
            let mut w = Writer::new(&mut buf);
            req.encode(&mut w).unwrap();
            let mut r = Reader::new(w.as_written());
            assert_eq!(ListElementRequest::decode(&mut r).unwrap(), req);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn remove_service_choice() {
        let req = ListElementRequest::remove(
            ObjectId::new(ObjectType::Device, 1),
            PropertyId::ObjectList,
            vec![],
            9,
        );
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(w.as_written()[3], 0x09);
        assert_eq!(&w.as_written()[w.position() - 2..], &[0x3E, 0x3F]);
    }
}
