use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::{decode_ctx_unsigned, encode_ctx_unsigned},
    reader::Reader,
    writer::Writer,
};
use crate::services::decode_unconfirmed_header;
use crate::types::UnconfirmedService;
use crate::{DecodeError, EncodeError, BACNET_MAX_INSTANCE};

pub const SERVICE_WHO_IS: u8 = UnconfirmedService::WhoIs.to_u8();

/// Who-Is with an optional device instance range; both limits travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhoIsRequest {
    pub limits: Option<(u32, u32)>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self { limits: None }
    }

    pub const fn range(low: u32, high: u32) -> Self {
        Self {
            limits: Some((low, high)),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader::new(UnconfirmedService::WhoIs).encode(w)?;
        self.encode_service_data(w)
    }

    /// Service arguments only; a global Who-Is writes nothing.
    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if let Some((low, high)) = self.limits {
            if low > BACNET_MAX_INSTANCE || high > BACNET_MAX_INSTANCE {
                return Err(EncodeError::ValueOutOfRange);
            }
            encode_ctx_unsigned(w, 0, low)?;
            encode_ctx_unsigned(w, 1, high)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_unconfirmed_header(r, UnconfirmedService::WhoIs)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.is_empty() {
            return Ok(Self::global());
        }
        let low = decode_ctx_unsigned(r, 0)?;
        let high = decode_ctx_unsigned(r, 1)?;
        if low > BACNET_MAX_INSTANCE || high > BACNET_MAX_INSTANCE {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self::range(low, high))
    }

    /// True when `instance` falls inside the limits (always true for a global Who-Is).
    pub fn matches(&self, instance: u32) -> bool {
        match self.limits {
            Some((low, high)) => (low..=high).contains(&instance),
            None => true,
        }
    }
}
