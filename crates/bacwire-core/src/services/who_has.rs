use alloc::string::String;

use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_app_character_string, decode_app_object_id, decode_ctx_character_string,
        decode_ctx_object_id, decode_ctx_unsigned, encode_app_character_string,
        encode_app_object_id, encode_ctx_character_string, encode_ctx_object_id,
        encode_ctx_unsigned,
    },
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::services::decode_unconfirmed_header;
use crate::types::{ObjectId, ObjectType, UnconfirmedService};
use crate::{DecodeError, EncodeError, BACNET_MAX_INSTANCE};

pub const SERVICE_WHO_HAS: u8 = UnconfirmedService::WhoHas.to_u8();
pub const SERVICE_I_HAVE: u8 = UnconfirmedService::IHave.to_u8();

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WhoHasObject {
    Id(ObjectId),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhoHasRequest {
    pub limits: Option<(u32, u32)>,
    pub object: WhoHasObject,
}

impl WhoHasRequest {
    pub fn by_id(object_id: ObjectId) -> Self {
        Self {
            limits: None,
            object: WhoHasObject::Id(object_id),
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            limits: None,
            object: WhoHasObject::Name(name.into()),
        }
    }

    pub fn with_limits(mut self, low: u32, high: u32) -> Self {
        self.limits = Some((low, high));
        self
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader::new(UnconfirmedService::WhoHas).encode(w)?;

        if let Some((low, high)) = self.limits {
            if low > BACNET_MAX_INSTANCE || high > BACNET_MAX_INSTANCE {
                return Err(EncodeError::ValueOutOfRange);
            }
            encode_ctx_unsigned(w, 0, low)?;
            encode_ctx_unsigned(w, 1, high)?;
        }
        match &self.object {
            WhoHasObject::Id(id) => encode_ctx_object_id(w, 2, *id),
            WhoHasObject::Name(name) => encode_ctx_character_string(w, 3, name),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_unconfirmed_header(r, UnconfirmedService::WhoHas)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let limits = match r.peek_tag()? {
            Tag::Context { tag_num: 0, .. } => {
                let low = decode_ctx_unsigned(r, 0)?;
                let high = decode_ctx_unsigned(r, 1)?;
                if low > BACNET_MAX_INSTANCE || high > BACNET_MAX_INSTANCE {
                    return Err(DecodeError::InvalidValue);
                }
                Some((low, high))
            }
            _ => None,
        };
        let object = match r.peek_tag()? {
            Tag::Context { tag_num: 2, .. } => WhoHasObject::Id(decode_ctx_object_id(r, 2)?),
            Tag::Context { tag_num: 3, .. } => {
                WhoHasObject::Name(decode_ctx_character_string(r, 3)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        Ok(Self { limits, object })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IHaveRequest {
    pub device_id: ObjectId,
    pub object_id: ObjectId,
    pub object_name: String,
}

impl IHaveRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader::new(UnconfirmedService::IHave).encode(w)?;
        encode_app_object_id(w, self.device_id)?;
        encode_app_object_id(w, self.object_id)?;
        encode_app_character_string(w, &self.object_name)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_unconfirmed_header(r, UnconfirmedService::IHave)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let device_id = decode_app_object_id(r)?;
        if device_id.object_type() != ObjectType::Device {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            device_id,
            object_id: decode_app_object_id(r)?,
            object_name: decode_app_character_string(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{IHaveRequest, WhoHasObject, WhoHasRequest};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{ObjectId, ObjectType};
    use crate::DecodeError;

    #[test]
    fn who_has_by_name_with_limits() {
        let req = WhoHasRequest::by_name("AHU-1").with_limits(1, 100);
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(
            w.as_written(),
            &[0x10, 0x07, 0x09, 0x01, 0x19, 0x64, 0x3D, 0x06, 0x00, b'A', b'H', b'U', b'-', b'1']
        );

        let mut r = Reader::new(w.as_written());
        assert_eq!(WhoHasRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn who_has_by_id() {
        let id = ObjectId::new(ObjectType::BinaryValue, 4);
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        WhoHasRequest::by_id(id).encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let decoded = WhoHasRequest::decode(&mut r).unwrap();
        assert_eq!(decoded.limits, None);
        assert_eq!(decoded.object, WhoHasObject::Id(id));
    }

    #[test]
    fn who_has_needs_an_object() {
        let mut r = Reader::new(&[0x09, 0x01, 0x19, 0x02]);
        assert_eq!(
            WhoHasRequest::decode_after_header(&mut r),
            Err(DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn i_have_roundtrip() {
        let msg = IHaveRequest {
            device_id: ObjectId::new(ObjectType::Device, 9),
            object_id: ObjectId::new(ObjectType::AnalogInput, 2),
            object_name: "OAT".into(),
        };
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        msg.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        assert_eq!(IHaveRequest::decode(&mut r).unwrap(), msg);
        assert!(r.is_empty());
    }
}
