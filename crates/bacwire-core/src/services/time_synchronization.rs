use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::{decode_app_date, decode_app_time, encode_app_date, encode_app_time},
    reader::Reader,
    writer::Writer,
};
use crate::types::{Date, DateTime, Time, UnconfirmedService};
use crate::{DecodeError, EncodeError};

pub const SERVICE_TIME_SYNCHRONIZATION: u8 = UnconfirmedService::TimeSynchronization.to_u8();
pub const SERVICE_UTC_TIME_SYNCHRONIZATION: u8 = UnconfirmedService::UtcTimeSynchronization.to_u8();

/// TimeSynchronization or, with `utc` set, UTCTimeSynchronization. Both
/// carry the same application-tagged date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSynchronizationRequest {
    pub date: Date,
    pub time: Time,
    pub utc: bool,
}

impl TimeSynchronizationRequest {
    pub const fn local(date: Date, time: Time) -> Self {
        Self {
            date,
            time,
            utc: false,
        }
    }

    pub const fn utc(date: Date, time: Time) -> Self {
        Self {
            date,
            time,
            utc: true,
        }
    }

    pub const fn date_time(&self) -> DateTime {
        DateTime {
            date: self.date,
            time: self.time,
        }
    }

    fn service(&self) -> UnconfirmedService {
        if self.utc {
            UnconfirmedService::UtcTimeSynchronization
        } else {
            UnconfirmedService::TimeSynchronization
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader::new(self.service()).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_app_date(w, self.date)?;
        encode_app_time(w, self.time)
    }

    /// Accepts either service; `utc` reports which one arrived.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let header = UnconfirmedRequestHeader::decode(r)?;
        let utc = match header.service() {
            Some(UnconfirmedService::TimeSynchronization) => false,
            Some(UnconfirmedService::UtcTimeSynchronization) => true,
            _ => return Err(DecodeError::InvalidValue),
        };
        Self::decode_after_header(r, utc)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, utc: bool) -> Result<Self, DecodeError> {
        Ok(Self {
            date: decode_app_date(r)?,
            time: decode_app_time(r)?,
            utc,
        })
    }
}
