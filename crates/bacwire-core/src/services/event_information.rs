use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_app_unsigned, decode_ctx_bit_string, decode_ctx_boolean, decode_ctx_enumerated,
        decode_ctx_object_id, decode_optional_ctx, encode_app_unsigned, encode_ctx_bit_string,
        encode_ctx_boolean, encode_ctx_enumerated, encode_ctx_object_id,
    },
    reader::Reader,
    tag::{
        encode_closing_tag, encode_opening_tag, expect_closing, expect_opening,
        is_closing_tag_number,
    },
    writer::Writer,
};
use crate::services::{decode_complex_ack_header, decode_confirmed_header};
use crate::types::{BitString, ConfirmedService, EventState, NotifyType, ObjectId, TimeStamp};
use crate::{DecodeError, EncodeError};

pub const SERVICE_GET_EVENT_INFORMATION: u8 = ConfirmedService::GetEventInformation.to_u8();

/// GetEventInformation; `last_received_object_id` continues a previous
/// response that had `more_events` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetEventInformationRequest {
    pub last_received_object_id: Option<ObjectId>,
    pub invoke_id: u8,
}

impl GetEventInformationRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut header =
            ConfirmedRequestHeader::new(ConfirmedService::GetEventInformation, self.invoke_id);
        header.segmented_response_accepted = true;
        header.encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if let Some(object_id) = self.last_received_object_id {
            encode_ctx_object_id(w, 0, object_id)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::GetEventInformation)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        Ok(Self {
            last_received_object_id: decode_optional_ctx(r, 0, decode_ctx_object_id)?,
            invoke_id,
        })
    }
}

/// One object's entry in a GetEventInformation ack.
///
/// The three-element arrays are indexed by transition: to-offnormal,
/// to-fault, to-normal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventSummary {
    pub object_id: ObjectId,
    pub event_state: EventState,
    pub acknowledged_transitions: BitString,
    pub event_time_stamps: [TimeStamp; 3],
    pub notify_type: NotifyType,
    pub event_enable: BitString,
    pub event_priorities: [u32; 3],
}

impl EventSummary {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_ctx_enumerated(w, 1, self.event_state.to_u32())?;
        encode_ctx_bit_string(w, 2, &self.acknowledged_transitions)?;
        encode_opening_tag(w, 3)?;
        for stamp in &self.event_time_stamps {
            stamp.encode(w)?;
        }
        encode_closing_tag(w, 3)?;
        encode_ctx_enumerated(w, 4, self.notify_type.to_u32())?;
        encode_ctx_bit_string(w, 5, &self.event_enable)?;
        encode_opening_tag(w, 6)?;
        for priority in self.event_priorities {
            encode_app_unsigned(w, priority)?;
        }
        encode_closing_tag(w, 6)
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let event_state =
            EventState::from_u32(decode_ctx_enumerated(r, 1)?).ok_or(DecodeError::InvalidValue)?;
        let acknowledged_transitions = decode_ctx_bit_string(r, 2)?;

        expect_opening(r, 3)?;
        let event_time_stamps = [
            TimeStamp::decode(r)?,
            TimeStamp::decode(r)?,
            TimeStamp::decode(r)?,
        ];
        expect_closing(r, 3)?;

        let notify_type =
            NotifyType::from_u32(decode_ctx_enumerated(r, 4)?).ok_or(DecodeError::InvalidValue)?;
        let event_enable = decode_ctx_bit_string(r, 5)?;

        expect_opening(r, 6)?;
        let event_priorities = [
            decode_app_unsigned(r)?,
            decode_app_unsigned(r)?,
            decode_app_unsigned(r)?,
        ];
        expect_closing(r, 6)?;

        Ok(Self {
            object_id,
            event_state,
            acknowledged_transitions,
            event_time_stamps,
            notify_type,
            event_enable,
            event_priorities,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetEventInformationAck {
    pub summaries: Vec<EventSummary>,
    pub more_events: bool,
}

impl GetEventInformationAck {
    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::GetEventInformation, invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_opening_tag(w, 0)?;
        for summary in &self.summaries {
            summary.encode(w)?;
        }
        encode_closing_tag(w, 0)?;
        encode_ctx_boolean(w, 1, self.more_events)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_complex_ack_header(r, ConfirmedService::GetEventInformation)?;
        Self::decode_after_header(r)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_opening(r, 0)?;
        let mut summaries = Vec::new();
        loop {
            if r.is_empty() {
                return Err(DecodeError::UnexpectedEof);
            }
            if is_closing_tag_number(r, 0) {
                break;
            }
            summaries.push(EventSummary::decode(r)?);
        }
        expect_closing(r, 0)?;
        Ok(Self {
            summaries,
            more_events: decode_ctx_boolean(r, 1)?,
        })
    }
}
