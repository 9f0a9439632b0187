use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_ctx_boolean, decode_ctx_object_id, decode_ctx_unsigned, decode_optional_ctx,
        encode_ctx_boolean, encode_ctx_object_id, encode_ctx_unsigned,
    },
    reader::Reader,
    writer::Writer,
};
use crate::services::decode_confirmed_header;
use crate::types::{ConfirmedService, ObjectId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_SUBSCRIBE_COV: u8 = ConfirmedService::SubscribeCov.to_u8();

/// SubscribeCOV. Leaving out both `issue_confirmed_notifications` and
/// `lifetime_seconds` makes the request a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscribeCovRequest {
    pub subscriber_process_id: u32,
    pub monitored_object_id: ObjectId,
    pub issue_confirmed_notifications: Option<bool>,
    pub lifetime_seconds: Option<u32>,
    pub invoke_id: u8,
}

impl SubscribeCovRequest {
    pub fn new(
        subscriber_process_id: u32,
        monitored_object_id: ObjectId,
        issue_confirmed_notifications: bool,
        lifetime_seconds: u32,
        invoke_id: u8,
    ) -> Self {
        Self {
            subscriber_process_id,
            monitored_object_id,
            issue_confirmed_notifications: Some(issue_confirmed_notifications),
            lifetime_seconds: Some(lifetime_seconds),
            invoke_id,
        }
    }

    pub fn cancel(
        subscriber_process_id: u32,
        monitored_object_id: ObjectId,
        invoke_id: u8,
    ) -> Self {
        Self {
            subscriber_process_id,
            monitored_object_id,
            issue_confirmed_notifications: None,
            lifetime_seconds: None,
            invoke_id,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        self.issue_confirmed_notifications.is_none() && self.lifetime_seconds.is_none()
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::SubscribeCov, self.invoke_id).encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_unsigned(w, 0, self.subscriber_process_id)?;
        encode_ctx_object_id(w, 1, self.monitored_object_id)?;
        if let Some(issue_confirmed) = self.issue_confirmed_notifications {
            encode_ctx_boolean(w, 2, issue_confirmed)?;
        }
        if let Some(lifetime) = self.lifetime_seconds {
            encode_ctx_unsigned(w, 3, lifetime)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::SubscribeCov)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        Ok(Self {
            subscriber_process_id: decode_ctx_unsigned(r, 0)?,
            monitored_object_id: decode_ctx_object_id(r, 1)?,
            issue_confirmed_notifications: decode_optional_ctx(r, 2, decode_ctx_boolean)?,
            lifetime_seconds: decode_optional_ctx(r, 3, decode_ctx_unsigned)?,
            invoke_id,
        })
    }
}
