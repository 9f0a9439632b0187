use crate::apdu::ApduType;
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::UnconfirmedService;
use crate::{DecodeError, EncodeError};

/// Header for a BACnet Unconfirmed-Request APDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnconfirmedRequestHeader {
    pub service_choice: u8,
}

impl UnconfirmedRequestHeader {
    pub const fn new(service: UnconfirmedService) -> Self {
        Self {
            service_choice: service.to_u8(),
        }
    }

    pub fn service(&self) -> Option<UnconfirmedService> {
        UnconfirmedService::from_u8(self.service_choice)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::UnconfirmedRequest as u8) << 4)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        ApduType::UnconfirmedRequest.expect(r.read_u8()?)?;
        Ok(Self {
            service_choice: r.read_u8()?,
        })
    }
}
