use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_app_bit_string, decode_app_enumerated, decode_app_object_id, encode_app_bit_string,
        encode_app_enumerated, encode_app_object_id,
    },
    reader::Reader,
    writer::Writer,
};
use crate::services::{decode_complex_ack_header, decode_confirmed_header};
use crate::types::{BitString, ConfirmedService, EventState, ObjectId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_GET_ALARM_SUMMARY: u8 = ConfirmedService::GetAlarmSummary.to_u8();

/// GetAlarmSummary carries no service data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetAlarmSummaryRequest {
    pub invoke_id: u8,
}

impl GetAlarmSummaryRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut header =
            ConfirmedRequestHeader::new(ConfirmedService::GetAlarmSummary, self.invoke_id);
        header.segmented_response_accepted = true;
        header.encode(w)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::GetAlarmSummary)?;
        Ok(Self { invoke_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlarmSummary {
    pub object_id: ObjectId,
    pub alarm_state: EventState,
    pub acknowledged_transitions: BitString,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetAlarmSummaryAck {
    pub summaries: Vec<AlarmSummary>,
}

impl GetAlarmSummaryAck {
    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::new(ConfirmedService::GetAlarmSummary, invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        for summary in &self.summaries {
            encode_app_object_id(w, summary.object_id)?;
            encode_app_enumerated(w, summary.alarm_state.to_u32())?;
            encode_app_bit_string(w, &summary.acknowledged_transitions)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_complex_ack_header(r, ConfirmedService::GetAlarmSummary)?;
        Self::decode_after_header(r)
    }

    /// Reads summaries until the input ends; an empty list is valid.
    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let mut summaries = Vec::new();
        while !r.is_empty() {
            let object_id = decode_app_object_id(r)?;
            let alarm_state = EventState::from_u32(decode_app_enumerated(r)?)
                .ok_or(DecodeError::InvalidValue)?;
            let acknowledged_transitions = decode_app_bit_string(r)?;
            summaries.push(AlarmSummary {
                object_id,
                alarm_state,
                acknowledged_transitions,
            });
        }
        Ok(Self { summaries })
    }
}
