use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_ctx_boolean, decode_ctx_object_id, decode_ctx_real, decode_ctx_unsigned,
        decode_optional_ctx, encode_ctx_boolean, encode_ctx_object_id, encode_ctx_real,
        encode_ctx_unsigned,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_closing, expect_opening},
    writer::Writer,
};
use crate::services::{
    decode_confirmed_header, decode_property_reference, encode_property_reference,
};
use crate::types::{ConfirmedService, ObjectId, PropertyReference};
use crate::{DecodeError, EncodeError};

pub const SERVICE_SUBSCRIBE_COV_PROPERTY: u8 = ConfirmedService::SubscribeCovProperty.to_u8();

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscribeCovPropertyRequest {
    pub subscriber_process_id: u32,
    pub monitored_object_id: ObjectId,
    pub issue_confirmed_notifications: Option<bool>,
    pub lifetime_seconds: Option<u32>,
    pub monitored_property: PropertyReference,
    pub cov_increment: Option<f32>,
    pub invoke_id: u8,
}

impl SubscribeCovPropertyRequest {
    pub fn cancel(
        subscriber_process_id: u32,
        monitored_object_id: ObjectId,
        monitored_property: impl Into<PropertyReference>,
        invoke_id: u8,
    ) -> Self {
        Self {
            subscriber_process_id,
            monitored_object_id,
            issue_confirmed_notifications: None,
            lifetime_seconds: None,
            monitored_property: monitored_property.into(),
            cov_increment: None,
            invoke_id,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        self.issue_confirmed_notifications.is_none() && self.lifetime_seconds.is_none()
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::SubscribeCovProperty, self.invoke_id)
            .encode(w)?;
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

        encode_opening_tag(w, 4)?;
        encode_property_reference(w, 0, &self.monitored_property)?;
        encode_closing_tag(w, 4)?;

        if let Some(increment) = self.cov_increment {
            encode_ctx_real(w, 5, increment)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::SubscribeCovProperty)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let subscriber_process_id = decode_ctx_unsigned(r, 0)?;
        let monitored_object_id = decode_ctx_object_id(r, 1)?;
        let issue_confirmed_notifications = decode_optional_ctx(r, 2, decode_ctx_boolean)?;
        let lifetime_seconds = decode_optional_ctx(r, 3, decode_ctx_unsigned)?;

        expect_opening(r, 4)?;
        let monitored_property = decode_property_reference(r, 0)?;
        expect_closing(r, 4)?;

        Ok(Self {
            subscriber_process_id,
            monitored_object_id,
            issue_confirmed_notifications,
            lifetime_seconds,
            monitored_property,
            cov_increment: decode_optional_ctx(r, 5, decode_ctx_real)?,
            invoke_id,
        })
    }
}
