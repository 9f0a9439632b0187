use alloc::string::String;
use alloc::vec::Vec;

use crate::apdu::{ApduType, ConfirmedRequestHeader, UnconfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_ctx_boolean, decode_ctx_character_string, decode_ctx_enumerated,
        decode_ctx_object_id, decode_ctx_unsigned, decode_optional_ctx, encode_ctx_boolean,
        encode_ctx_character_string, encode_ctx_enumerated, encode_ctx_object_id,
        encode_ctx_unsigned,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_opening, is_opening_tag_number},
    writer::Writer,
};
use crate::services::value_codec::{decode_value_list, encode_values};
use crate::services::{decode_confirmed_header, decode_unconfirmed_header};
use crate::types::{
    ApplicationValue, ConfirmedService, EventState, EventType, NotifyType, ObjectId, PropertyId,
    TimeStamp, UnconfirmedService,
};
use crate::{DecodeError, EncodeError};

pub const SERVICE_CONFIRMED_EVENT_NOTIFICATION: u8 =
    ConfirmedService::ConfirmedEventNotification.to_u8();
pub const SERVICE_UNCONFIRMED_EVENT_NOTIFICATION: u8 =
    UnconfirmedService::UnconfirmedEventNotification.to_u8();

/// An event or alarm notification.
///
/// `ack_required`, `from_state` and `event_values` only travel with alarm
/// and event notifications; an ack notification carries none of them.
/// The event values are kept as the raw constructed content of tag 12.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventNotificationRequest {
    pub process_id: u32,
    pub initiating_device_id: ObjectId,
    pub event_object_id: ObjectId,
    pub timestamp: TimeStamp,
    pub notification_class: u32,
    pub priority: u8,
    pub event_type: u32,
    pub message_text: Option<String>,
    pub notify_type: NotifyType,
    pub ack_required: Option<bool>,
    pub from_state: Option<EventState>,
    pub to_state: EventState,
    pub event_values: Option<Vec<ApplicationValue>>,
    pub invoke_id: Option<u8>,
}

impl EventNotificationRequest {
    pub fn event_type(&self) -> Option<EventType> {
        EventType::from_u32(self.event_type)
    }

    pub fn is_confirmed(&self) -> bool {
        self.invoke_id.is_some()
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self.invoke_id {
            Some(invoke_id) => {
                ConfirmedRequestHeader::new(ConfirmedService::ConfirmedEventNotification, invoke_id)
                    .encode(w)?
            }
            None => UnconfirmedRequestHeader::new(UnconfirmedService::UnconfirmedEventNotification)
                .encode(w)?,
        }
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_unsigned(w, 0, self.process_id)?;
        encode_ctx_object_id(w, 1, self.initiating_device_id)?;
        encode_ctx_object_id(w, 2, self.event_object_id)?;
        self.timestamp.encode_context(w, 3)?;
        encode_ctx_unsigned(w, 4, self.notification_class)?;
        encode_ctx_unsigned(w, 5, self.priority as u32)?;
        encode_ctx_enumerated(w, 6, self.event_type)?;
        if let Some(text) = &self.message_text {
            encode_ctx_character_string(w, 7, text)?;
        }
        encode_ctx_enumerated(w, 8, self.notify_type.to_u32())?;

        let carries_event_data = self.notify_type != NotifyType::AckNotification;
        if carries_event_data {
            if let Some(ack_required) = self.ack_required {
                encode_ctx_boolean(w, 9, ack_required)?;
            }
            if let Some(from_state) = self.from_state {
                encode_ctx_enumerated(w, 10, from_state.to_u32())?;
            }
        }
        encode_ctx_enumerated(w, 11, self.to_state.to_u32())?;
        if carries_event_data {
            if let Some(values) = &self.event_values {
                encode_opening_tag(w, 12)?;
                encode_values(w, values)?;
                encode_closing_tag(w, 12)?;
            }
        }
        Ok(())
    }

    /// Decodes either the confirmed or the unconfirmed form, header included.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = match ApduType::of(r.peek_u8()?) {
            Some(ApduType::ConfirmedRequest) => Some(decode_confirmed_header(
                r,
                ConfirmedService::ConfirmedEventNotification,
            )?),
            Some(ApduType::UnconfirmedRequest) => {
                decode_unconfirmed_header(r, UnconfirmedService::UnconfirmedEventNotification)?;
                None
            }
            _ => return Err(DecodeError::InvalidValue),
        };
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(
        r: &mut Reader<'_>,
        invoke_id: Option<u8>,
    ) -> Result<Self, DecodeError> {
        let process_id = decode_ctx_unsigned(r, 0)?;
        let initiating_device_id = decode_ctx_object_id(r, 1)?;
        let event_object_id = decode_ctx_object_id(r, 2)?;
        let timestamp = TimeStamp::decode_context(r, 3)?;
        let notification_class = decode_ctx_unsigned(r, 4)?;
        let priority =
            u8::try_from(decode_ctx_unsigned(r, 5)?).map_err(|_| DecodeError::InvalidValue)?;
        let event_type = decode_ctx_enumerated(r, 6)?;
        let message_text = decode_optional_ctx(r, 7, decode_ctx_character_string)?;
        let notify_type = NotifyType::from_u32(decode_ctx_enumerated(r, 8)?)
            .ok_or(DecodeError::InvalidValue)?;
        let ack_required = decode_optional_ctx(r, 9, decode_ctx_boolean)?;
        let from_state = decode_optional_ctx(r, 10, decode_ctx_enumerated)?
            .map(|v| EventState::from_u32(v).ok_or(DecodeError::InvalidValue))
            .transpose()?;
        let to_state = EventState::from_u32(decode_ctx_enumerated(r, 11)?)
            .ok_or(DecodeError::InvalidValue)?;

        let event_values = if !r.is_empty() && is_opening_tag_number(r, 12) {
            expect_opening(r, 12)?;
            Some(decode_value_list(r, PropertyId::EventParameters, Some(12))?)
        } else {
            None
        };

        Ok(Self {
            process_id,
            initiating_device_id,
            event_object_id,
            timestamp,
            notification_class,
            priority,
            event_type,
            message_text,
            notify_type,
            ack_required,
            from_state,
            to_state,
            event_values,
            invoke_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectType;
    use alloc::vec;

    fn alarm() -> EventNotificationRequest {
        EventNotificationRequest {
            process_id: 19,
            initiating_device_id: ObjectId::new(ObjectType::Device, 1),
            event_object_id: ObjectId::new(ObjectType::AnalogInput, 3),
            timestamp: TimeStamp::SequenceNumber(42),
            notification_class: 7,
            priority: 100,
            event_type: EventType::OutOfRange.to_u32(),
            message_text: Some("alarm message".into()),
            notify_type: NotifyType::Alarm,
            ack_required: Some(true),
            from_state: Some(EventState::Normal),
            to_state: EventState::HighLimit,
            event_values: Some(vec![ApplicationValue::Constructed {
                tag_num: 5,
                values: vec![ApplicationValue::ContextSpecific {
                    tag_num: 0,
                    data: vec![0x42, 0xC8, 0x00, 0x00],
                }],
            }]),
            invoke_id: None,
        }
    }

    #[test]
    fn alarm_roundtrip() {
        let msg = alarm();
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        msg.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let decoded = EventNotificationRequest::decode(&mut r).unwrap();
        assert!(r.is_empty());
        assert_eq!(decoded, msg);
        assert_eq!(decoded.event_type(), Some(EventType::OutOfRange));
    }

    #[test]
    fn ack_notification_drops_event_fields() {
        let mut msg = alarm();
        msg.notify_type = NotifyType::AckNotification;
        msg.message_text = None;
        msg.invoke_id = Some(4);
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        msg.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let decoded = EventNotificationRequest::decode(&mut r).unwrap();
        assert!(r.is_empty());
        assert_eq!(decoded.invoke_id, Some(4));
        assert_eq!(decoded.ack_required, None);
        assert_eq!(decoded.from_state, None);
        assert_eq!(decoded.event_values, None);
        assert_eq!(decoded.to_state, EventState::HighLimit);
    }

    #[test]
    fn unknown_notify_type_is_rejected() {
        let mut msg = alarm();
        msg.event_values = None;
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        msg.encode_service_data(&mut w).unwrap();
        let mut bytes = w.as_written().to_vec();

        // [8] notify type sits right after the message text
        let pos = bytes.iter().position(|b| *b == 0x89).unwrap();
        bytes[pos + 1] = 9;
        let mut r = Reader::new(&bytes);
        assert_eq!(
            EventNotificationRequest::decode_after_header(&mut r, None),
            Err(DecodeError::InvalidValue)
        );
    }
}
