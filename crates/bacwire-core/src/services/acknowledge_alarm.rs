use alloc::string::String;

use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_ctx_character_string, decode_ctx_enumerated, decode_ctx_object_id,
        decode_ctx_unsigned, encode_ctx_character_string, encode_ctx_enumerated,
        encode_ctx_object_id, encode_ctx_unsigned,
    },
    reader::Reader,
    writer::Writer,
};
use crate::services::decode_confirmed_header;
use crate::types::{ConfirmedService, EventState, ObjectId, TimeStamp};
use crate::{DecodeError, EncodeError};

pub const SERVICE_ACKNOWLEDGE_ALARM: u8 = ConfirmedService::AcknowledgeAlarm.to_u8();

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcknowledgeAlarmRequest {
    pub acknowledging_process_id: u32,
    pub event_object_id: ObjectId,
    pub event_state_acknowledged: EventState,
    pub event_time_stamp: TimeStamp,
    pub acknowledgment_source: String,
    pub time_of_acknowledgment: TimeStamp,
    pub invoke_id: u8,
}

impl AcknowledgeAlarmRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::AcknowledgeAlarm, self.invoke_id)
            .encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_unsigned(w, 0, self.acknowledging_process_id)?;
        encode_ctx_object_id(w, 1, self.event_object_id)?;
        encode_ctx_enumerated(w, 2, self.event_state_acknowledged.to_u32())?;
        self.event_time_stamp.encode_context(w, 3)?;
        encode_ctx_character_string(w, 4, &self.acknowledgment_source)?;
        self.time_of_acknowledgment.encode_context(w, 5)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::AcknowledgeAlarm)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let acknowledging_process_id = decode_ctx_unsigned(r, 0)?;
        let event_object_id = decode_ctx_object_id(r, 1)?;
        let event_state_acknowledged = EventState::from_u32(decode_ctx_enumerated(r, 2)?)
            .ok_or(DecodeError::InvalidValue)?;
        Ok(Self {
            acknowledging_process_id,
            event_object_id,
            event_state_acknowledged,
            event_time_stamp: TimeStamp::decode_context(r, 3)?,
            acknowledgment_source: decode_ctx_character_string(r, 4)?,
            time_of_acknowledgment: TimeStamp::decode_context(r, 5)?,
            invoke_id,
        })
    }
}
