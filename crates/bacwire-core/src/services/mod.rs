pub mod acknowledge_alarm;
pub mod alarm_summary;
pub mod atomic_read_file;
pub mod atomic_write_file;
pub mod cov_notification;
pub mod device_management;
pub mod event_information;
pub mod event_notification;
pub mod i_am;
pub mod life_safety;
pub mod list_element;
pub mod object_management;
pub mod private_transfer;
pub mod read_property;
pub mod read_property_multiple;
pub mod read_range;
pub mod subscribe_cov;
pub mod subscribe_cov_property;
pub mod time_synchronization;
pub mod value_codec;
pub mod who_has;
pub mod who_is;
pub mod write_property;
pub mod write_property_multiple;

use alloc::vec::Vec;

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader, UnconfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_ctx_enumerated, decode_ctx_unsigned, decode_optional_ctx, encode_ctx_enumerated,
        encode_ctx_unsigned,
    },
    reader::Reader,
    tag::{
        decode_is_context_tag, encode_closing_tag, encode_opening_tag, expect_closing,
        expect_opening, is_closing_tag_number,
    },
    writer::Writer,
};
use crate::services::value_codec::{decode_value_list, encode_values};
use crate::types::{
    ConfirmedService, PropertyId, PropertyReference, PropertyValue, UnconfirmedService,
};
use crate::{
    DecodeError, EncodeError, BACNET_MAX_PRIORITY, BACNET_MIN_PRIORITY, BACNET_NO_PRIORITY,
};

/// Reads a confirmed-request header for `service` and returns its invoke id.
pub(crate) fn decode_confirmed_header(
    r: &mut Reader<'_>,
    service: ConfirmedService,
) -> Result<u8, DecodeError> {
    let header = ConfirmedRequestHeader::decode(r)?;
    if header.service_choice != service.to_u8() {
        return Err(DecodeError::InvalidValue);
    }
    Ok(header.invoke_id)
}

/// Reads a complex-ack header for `service` and returns its invoke id.
pub(crate) fn decode_complex_ack_header(
    r: &mut Reader<'_>,
    service: ConfirmedService,
) -> Result<u8, DecodeError> {
    let header = ComplexAckHeader::decode(r)?;
    header.expect_service(service)?;
    Ok(header.invoke_id)
}

pub(crate) fn decode_unconfirmed_header(
    r: &mut Reader<'_>,
    service: UnconfirmedService,
) -> Result<(), DecodeError> {
    let header = UnconfirmedRequestHeader::decode(r)?;
    if header.service_choice != service.to_u8() {
        return Err(DecodeError::InvalidValue);
    }
    Ok(())
}

pub(crate) fn encode_ctx_property_id(
    w: &mut Writer<'_>,
    tag_num: u8,
    property: PropertyId,
) -> Result<(), EncodeError> {
    encode_ctx_enumerated(w, tag_num, property.to_u32())
}

pub(crate) fn decode_ctx_property_id(
    r: &mut Reader<'_>,
    tag_num: u8,
) -> Result<PropertyId, DecodeError> {
    decode_ctx_enumerated(r, tag_num).map(PropertyId::from_u32)
}

/// Writes a property identifier at `tag_num` and, when set, its array index at `tag_num + 1`.
pub(crate) fn encode_property_reference(
    w: &mut Writer<'_>,
    tag_num: u8,
    property: &PropertyReference,
) -> Result<(), EncodeError> {
    encode_ctx_property_id(w, tag_num, property.property_id)?;
    if let Some(idx) = property.wire_index() {
        encode_ctx_unsigned(w, tag_num + 1, idx)?;
    }
    Ok(())
}

pub(crate) fn decode_property_reference(
    r: &mut Reader<'_>,
    tag_num: u8,
) -> Result<PropertyReference, DecodeError> {
    let property_id = decode_ctx_property_id(r, tag_num)?;
    let array_index = decode_optional_ctx(r, tag_num + 1, decode_ctx_unsigned)?;
    Ok(PropertyReference {
        property_id,
        array_index,
    })
}

/// Writes an optional priority under `tag_num`. `BACNET_NO_PRIORITY` is the
/// same as `None`: the tag is left off.
pub(crate) fn encode_priority(
    w: &mut Writer<'_>,
    tag_num: u8,
    priority: Option<u8>,
) -> Result<(), EncodeError> {
    match priority {
        None | Some(BACNET_NO_PRIORITY) => Ok(()),
        Some(p) if (BACNET_MIN_PRIORITY..=BACNET_MAX_PRIORITY).contains(&p) => {
            encode_ctx_unsigned(w, tag_num, p as u32)
        }
        Some(_) => Err(EncodeError::ValueOutOfRange),
    }
}

pub(crate) fn decode_priority(r: &mut Reader<'_>, tag_num: u8) -> Result<Option<u8>, DecodeError> {
    match decode_optional_ctx(r, tag_num, decode_ctx_unsigned)? {
        None => Ok(None),
        Some(p) if (BACNET_MIN_PRIORITY as u32..=BACNET_MAX_PRIORITY as u32).contains(&p) => {
            Ok(Some(p as u8))
        }
        Some(_) => Err(DecodeError::InvalidValue),
    }
}

/// `BACnetPropertyValue`: property [0], index [1], value [2], priority [3].
pub(crate) fn encode_property_value(
    w: &mut Writer<'_>,
    value: &PropertyValue,
) -> Result<(), EncodeError> {
    encode_property_reference(w, 0, &value.property)?;
    encode_opening_tag(w, 2)?;
    encode_values(w, &value.values)?;
    encode_closing_tag(w, 2)?;
    encode_priority(w, 3, value.priority)
}

pub(crate) fn decode_property_value(r: &mut Reader<'_>) -> Result<PropertyValue, DecodeError> {
    let property = decode_property_reference(r, 0)?;
    expect_opening(r, 2)?;
    let values = decode_value_list(r, property.property_id, Some(2))?;
    let priority = decode_priority(r, 3)?;
    Ok(PropertyValue {
        property,
        values,
        priority,
    })
}

/// Decodes property values until the closing tag `closing` (consumed).
pub(crate) fn decode_property_values(
    r: &mut Reader<'_>,
    closing: u8,
) -> Result<Vec<PropertyValue>, DecodeError> {
    let mut values = Vec::new();
    loop {
        if is_closing_tag_number(r, closing) {
            expect_closing(r, closing)?;
            return Ok(values);
        }
        if !decode_is_context_tag(r, 0) {
            return Err(if r.is_empty() {
                DecodeError::UnexpectedEof
            } else {
                DecodeError::InvalidTag
            });
        }
        values.push(decode_property_value(r)?);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::tag::Tag;
    use crate::types::ApplicationValue;
    use alloc::vec;

    #[test]
    fn property_value_with_priority() {
        let mut value = PropertyValue::new(
            PropertyReference::with_index(PropertyId::PriorityArray, 3),
            vec![ApplicationValue::Real(1.5)],
        );
        value.priority = Some(9);

        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        encode_property_value(&mut w, &value).unwrap();
        assert_eq!(
            w.as_written(),
            &[0x09, 0x57, 0x19, 0x03, 0x2E, 0x44, 0x3F, 0xC0, 0, 0, 0x2F, 0x39, 0x09]
        );

        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_property_value(&mut r).unwrap(), value);
        assert!(r.is_empty());
    }

    #[test]
    fn priority_out_of_range() {
        let mut value = PropertyValue::new(PropertyId::PresentValue, vec![]);
        value.priority = Some(17);
        let mut w = Writer::sizing();
        assert_eq!(
            encode_property_value(&mut w, &value),
            Err(EncodeError::ValueOutOfRange)
        );

        let mut r = Reader::new(&[0x39, 0x00]);
        assert_eq!(decode_priority(&mut r, 3), Err(DecodeError::InvalidValue));
    }

    #[test]
    fn no_priority_leaves_tag_off() {
        let mut value = PropertyValue::new(PropertyId::PresentValue, vec![ApplicationValue::Null]);
        value.priority = Some(BACNET_NO_PRIORITY);
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        encode_property_value(&mut w, &value).unwrap();
        assert_eq!(w.as_written(), &[0x09, 0x55, 0x2E, 0x00, 0x2F]);
    }

    #[test]
    fn property_values_with_extended_closing_tag() {
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        encode_property_value(
            &mut w,
            &PropertyValue::new(PropertyId::OutOfService, vec![ApplicationValue::Boolean(false)]),
        )
        .unwrap();
        Tag::Closing { tag_num: 20 }.encode(&mut w).unwrap();
        w.write_u8(0x21).unwrap();

        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_property_values(&mut r, 20).unwrap().len(), 1);
        assert_eq!(r.rest(), &[0x21]);
    }

    #[test]
    fn property_values_need_closing_tag() {
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        encode_property_value(
            &mut w,
            &PropertyValue::new(PropertyId::OutOfService, vec![ApplicationValue::Boolean(true)]),
        )
        .unwrap();
        let open = w.position();
        Tag::Closing { tag_num: 4 }.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_property_values(&mut r, 4).unwrap().len(), 1);
        assert!(r.is_empty());

        let mut r = Reader::new(&buf[..open]);
        assert_eq!(
            decode_property_values(&mut r, 4),
            Err(DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn header_service_mismatch() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        ConfirmedRequestHeader::new(ConfirmedService::ReadProperty, 1)
            .encode(&mut w)
            .unwrap();
        let mut r = Reader::new(w.as_written());
        assert_eq!(
            decode_confirmed_header(&mut r, ConfirmedService::WriteProperty),
            Err(DecodeError::InvalidValue)
        );
    }
}
