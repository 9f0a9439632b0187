use alloc::vec::Vec;

use crate::apdu::{ApduType, ConfirmedRequestHeader, UnconfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_app_octet_string, decode_app_unsigned, decode_ctx_boolean, decode_ctx_object_id,
        decode_ctx_real, decode_ctx_unsigned, decode_optional_ctx, encode_app_octet_string,
        encode_app_unsigned, encode_ctx_boolean, encode_ctx_object_id, encode_ctx_real,
        encode_ctx_unsigned,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, expect_closing, expect_opening, Tag},
    writer::Writer,
};
use crate::services::{
    decode_confirmed_header, decode_property_reference, decode_property_values,
    decode_unconfirmed_header, encode_property_reference, encode_property_value,
};
use crate::types::{
    ConfirmedService, LinkType, NetworkAddress, ObjectId, PropertyReference, PropertyValue,
    UnconfirmedService,
};
use crate::{DecodeError, EncodeError};

pub const SERVICE_CONFIRMED_COV_NOTIFICATION: u8 =
    ConfirmedService::ConfirmedCovNotification.to_u8();
pub const SERVICE_UNCONFIRMED_COV_NOTIFICATION: u8 =
    UnconfirmedService::UnconfirmedCovNotification.to_u8();

/// A COV notification; `invoke_id` is set for the confirmed form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovNotificationRequest {
    pub subscriber_process_id: u32,
    pub initiating_device_id: ObjectId,
    pub monitored_object_id: ObjectId,
    pub time_remaining_seconds: u32,
    pub values: Vec<PropertyValue>,
    pub invoke_id: Option<u8>,
}

impl CovNotificationRequest {
    pub fn is_confirmed(&self) -> bool {
        self.invoke_id.is_some()
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self.invoke_id {
            Some(invoke_id) => {
                ConfirmedRequestHeader::new(ConfirmedService::ConfirmedCovNotification, invoke_id)
                    .encode(w)?
            }
            None => UnconfirmedRequestHeader::new(UnconfirmedService::UnconfirmedCovNotification)
                .encode(w)?,
        }
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_unsigned(w, 0, self.subscriber_process_id)?;
        encode_ctx_object_id(w, 1, self.initiating_device_id)?;
        encode_ctx_object_id(w, 2, self.monitored_object_id)?;
        encode_ctx_unsigned(w, 3, self.time_remaining_seconds)?;
        encode_opening_tag(w, 4)?;
        for value in &self.values {
            encode_property_value(w, value)?;
        }
        encode_closing_tag(w, 4)
    }

    /// Decodes either the confirmed or the unconfirmed form, header included.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = match ApduType::of(r.peek_u8()?) {
            Some(ApduType::ConfirmedRequest) => Some(decode_confirmed_header(
                r,
                ConfirmedService::ConfirmedCovNotification,
            )?),
            Some(ApduType::UnconfirmedRequest) => {
                decode_unconfirmed_header(r, UnconfirmedService::UnconfirmedCovNotification)?;
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
        let subscriber_process_id = decode_ctx_unsigned(r, 0)?;
        let initiating_device_id = decode_ctx_object_id(r, 1)?;
        let monitored_object_id = decode_ctx_object_id(r, 2)?;
        let time_remaining_seconds = decode_ctx_unsigned(r, 3)?;
        expect_opening(r, 4)?;
        let values = decode_property_values(r, 4)?;
        Ok(Self {
            subscriber_process_id,
            initiating_device_id,
            monitored_object_id,
            time_remaining_seconds,
            values,
            invoke_id,
        })
    }
}

/// Where notifications go: a device or a raw network address.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recipient {
    Device(ObjectId),
    Address(NetworkAddress),
}

impl Recipient {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Device(id) => encode_ctx_object_id(w, 0, *id),
            Self::Address(addr) => {
                encode_opening_tag(w, 1)?;
                encode_app_unsigned(w, addr.network_number as u32)?;
                encode_app_octet_string(w, &addr.mac)?;
                encode_closing_tag(w, 1)
            }
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match r.peek_tag()? {
            Tag::Context { tag_num: 0, .. } => decode_ctx_object_id(r, 0).map(Self::Device),
            Tag::Opening { tag_num: 1 } => {
                expect_opening(r, 1)?;
                let network_number = u16::try_from(decode_app_unsigned(r)?)
                    .map_err(|_| DecodeError::InvalidValue)?;
                let mac = decode_app_octet_string(r)?;
                expect_closing(r, 1)?;
                let link_type = LinkType::from_mac_len(mac.len());
                Ok(Self::Address(NetworkAddress::new(network_number, mac, link_type)))
            }
            _ => Err(DecodeError::InvalidTag),
        }
    }
}

/// One entry of a device's `Active_COV_Subscriptions` list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovSubscription {
    pub recipient: Recipient,
    pub process_id: u32,
    pub monitored_object_id: ObjectId,
    pub monitored_property: PropertyReference,
    pub issue_confirmed_notifications: bool,
    pub time_remaining_seconds: u32,
    pub cov_increment: Option<f32>,
}

impl CovSubscription {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_opening_tag(w, 0)?;
        encode_opening_tag(w, 0)?;
        self.recipient.encode(w)?;
        encode_closing_tag(w, 0)?;
        encode_ctx_unsigned(w, 1, self.process_id)?;
        encode_closing_tag(w, 0)?;

        encode_opening_tag(w, 1)?;
        encode_ctx_object_id(w, 0, self.monitored_object_id)?;
        encode_property_reference(w, 1, &self.monitored_property)?;
        encode_closing_tag(w, 1)?;

        encode_ctx_boolean(w, 2, self.issue_confirmed_notifications)?;
        encode_ctx_unsigned(w, 3, self.time_remaining_seconds)?;
        if let Some(increment) = self.cov_increment {
            encode_ctx_real(w, 4, increment)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_opening(r, 0)?;
        expect_opening(r, 0)?;
        let recipient = Recipient::decode(r)?;
        expect_closing(r, 0)?;
        let process_id = decode_ctx_unsigned(r, 1)?;
        expect_closing(r, 0)?;

        expect_opening(r, 1)?;
        let monitored_object_id = decode_ctx_object_id(r, 0)?;
        let monitored_property = decode_property_reference(r, 1)?;
        expect_closing(r, 1)?;

        Ok(Self {
            recipient,
            process_id,
            monitored_object_id,
            monitored_property,
            issue_confirmed_notifications: decode_ctx_boolean(r, 2)?,
            time_remaining_seconds: decode_ctx_unsigned(r, 3)?,
            cov_increment: decode_optional_ctx(r, 4, decode_ctx_real)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApplicationValue, BitString, ObjectType, PropertyId};
    use alloc::vec;

    fn notification(invoke_id: Option<u8>) -> CovNotificationRequest {
        CovNotificationRequest {
            subscriber_process_id: 18,
            initiating_device_id: ObjectId::new(ObjectType::Device, 4),
            monitored_object_id: ObjectId::new(ObjectType::AnalogInput, 10),
            time_remaining_seconds: 0,
            values: vec![
                PropertyValue::new(PropertyId::PresentValue, vec![ApplicationValue::Real(65.0)]),
                PropertyValue::new(
                    PropertyId::StatusFlags,
                    vec![ApplicationValue::BitString(
                        BitString::from_bits(&[false, false, false, false]).unwrap(),
                    )],
                ),
            ],
            invoke_id,
        }
    }

    #[test]
    fn unconfirmed_roundtrip() {
        let msg = notification(None);
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        msg.encode(&mut w).unwrap();
        assert_eq!(&w.as_written()[..2], &[0x10, 0x02]);

        let mut r = Reader::new(w.as_written());
        assert_eq!(CovNotificationRequest::decode(&mut r).unwrap(), msg);
        assert!(r.is_empty());
    }

    #[test]
    fn confirmed_keeps_invoke_id() {
        let msg = notification(Some(33));
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        msg.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let decoded = CovNotificationRequest::decode(&mut r).unwrap();
        assert!(decoded.is_confirmed());
        assert_eq!(decoded.invoke_id, Some(33));
    }

    #[test]
    fn subscription_record() {
        let record = CovSubscription {
            recipient: Recipient::Address(NetworkAddress::new(
                0,
                [192, 168, 1, 5, 0xBA, 0xC0],
                LinkType::Ip,
            )),
            process_id: 7,
            monitored_object_id: ObjectId::new(ObjectType::AnalogInput, 1),
            monitored_property: PropertyId::PresentValue.into(),
            issue_confirmed_notifications: true,
            time_remaining_seconds: 120,
            cov_increment: Some(0.1),
        };
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        record.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        assert_eq!(CovSubscription::decode(&mut r).unwrap(), record);
        assert!(r.is_empty());
    }

    #[test]
    fn device_recipient() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        Recipient::Device(ObjectId::new(ObjectType::Device, 1))
            .encode(&mut w)
            .unwrap();
        assert_eq!(w.as_written(), &[0x0C, 0x02, 0x00, 0x00, 0x01]);
    }
}
