use crate::encoding::{
    primitives::{
        decode_app_date, decode_app_time, decode_ctx_time, decode_ctx_unsigned, encode_app_date,
        encode_app_time, encode_ctx_time, encode_ctx_unsigned,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_closing, expect_opening, Tag},
    writer::Writer,
};
use crate::types::{DateTime, Time};
use crate::{DecodeError, EncodeError};

/// `BACnetTimeStamp`: a CHOICE of time, sequence number or date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeStamp {
    Time(Time),
    SequenceNumber(u32),
    DateTime(DateTime),
}

impl TimeStamp {
    /// Writes the bare CHOICE: time [0], sequence number [1] or date-time [2].
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Time(t) => encode_ctx_time(w, 0, *t),
            Self::SequenceNumber(n) => encode_ctx_unsigned(w, 1, *n),
            Self::DateTime(dt) => {
                encode_opening_tag(w, 2)?;
                encode_app_date(w, dt.date)?;
                encode_app_time(w, dt.time)?;
                encode_closing_tag(w, 2)
            }
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match r.peek_tag()? {
            Tag::Context { tag_num: 0, .. } => decode_ctx_time(r, 0).map(Self::Time),
            Tag::Context { tag_num: 1, .. } => decode_ctx_unsigned(r, 1).map(Self::SequenceNumber),
            Tag::Opening { tag_num: 2 } => {
                expect_opening(r, 2)?;
                let date = decode_app_date(r)?;
                let time = decode_app_time(r)?;
                expect_closing(r, 2)?;
                Ok(Self::DateTime(DateTime { date, time }))
            }
            _ => Err(DecodeError::InvalidTag),
        }
    }

    /// Writes the CHOICE bracketed by opening/closing tag `tag_num`.
    pub fn encode_context(&self, w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
        encode_opening_tag(w, tag_num)?;
        self.encode(w)?;
        encode_closing_tag(w, tag_num)
    }

    pub fn decode_context(r: &mut Reader<'_>, tag_num: u8) -> Result<Self, DecodeError> {
        expect_opening(r, tag_num)?;
        let stamp = Self::decode(r)?;
        expect_closing(r, tag_num)?;
        Ok(stamp)
    }
}
