use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_app_enumerated, decode_app_object_id, decode_app_unsigned, encode_app_enumerated,
        encode_app_object_id, encode_app_unsigned,
    },
    reader::Reader,
    writer::Writer,
};
use crate::services::decode_unconfirmed_header;
use crate::types::{ObjectId, ObjectType, Segmentation, UnconfirmedService};
use crate::{DecodeError, EncodeError, BACNET_MAX_INSTANCE};

pub const SERVICE_I_AM: u8 = UnconfirmedService::IAm.to_u8();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IAmRequest {
    pub device_id: ObjectId,
    pub max_apdu: u32,
    pub segmentation: Segmentation,
    pub vendor_id: u16,
}

impl IAmRequest {
    pub const fn new(
        device_instance: u32,
        max_apdu: u32,
        segmentation: Segmentation,
        vendor_id: u16,
    ) -> Self {
        Self {
            device_id: ObjectId::new(ObjectType::Device, device_instance),
            max_apdu,
            segmentation,
            vendor_id,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader::new(UnconfirmedService::IAm).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.device_id.object_type() != ObjectType::Device {
            return Err(EncodeError::ValueOutOfRange);
        }
        encode_app_object_id(w, self.device_id)?;
        encode_app_unsigned(w, self.max_apdu)?;
        encode_app_enumerated(w, self.segmentation.to_u32())?;
        encode_app_unsigned(w, self.vendor_id as u32)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_unconfirmed_header(r, UnconfirmedService::IAm)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let device_id = decode_app_object_id(r)?;
        if device_id.object_type() != ObjectType::Device
            || device_id.instance() > BACNET_MAX_INSTANCE
        {
            return Err(DecodeError::InvalidValue);
        }
        let max_apdu = decode_app_unsigned(r)?;
        let segmentation =
            Segmentation::from_u32(decode_app_enumerated(r)?).ok_or(DecodeError::InvalidValue)?;
        let vendor_id =
            u16::try_from(decode_app_unsigned(r)?).map_err(|_| DecodeError::InvalidValue)?;

        Ok(Self {
            device_id,
            max_apdu,
            segmentation,
            vendor_id,
        })
    }
}
