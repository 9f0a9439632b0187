use alloc::vec::Vec;

use crate::encoding::{
    primitives::{
        bit_string_len, character_string_len, decode_bit_string, decode_character_string,
        decode_date_lenient, decode_double_lenient, decode_object_id_lenient,
        decode_octet_string, decode_real_lenient, decode_signed, decode_time_lenient,
        decode_unsigned, encode_app_bit_string, encode_app_boolean, encode_app_character_string,
        encode_app_date, encode_app_double, encode_app_enumerated, encode_app_null,
        encode_app_object_id, encode_app_octet_string, encode_app_real, encode_app_signed,
        encode_app_time, encode_app_unsigned, encode_ctx_bit_string, encode_ctx_boolean,
        encode_ctx_character_string, encode_ctx_date, encode_ctx_double, encode_ctx_object_id,
        encode_ctx_octet_string, encode_ctx_real, encode_ctx_signed, encode_ctx_time,
        encode_ctx_unsigned, signed_len, tagged_len, unsigned_len,
    },
    reader::Reader,
    tag::{encode_closing_tag, encode_opening_tag, encoded_tag_len, ApplicationTag, Tag},
    writer::Writer,
};
use crate::types::{ApplicationValue, PropertyId};
use crate::{DecodeError, EncodeError};

/// Deepest opening-tag nesting accepted while decoding property values.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Primitive type carried by context tag `tag_num` inside `property`'s value,
/// for the properties whose structures use implicitly typed context tags.
pub fn context_tag_type(property: PropertyId, tag_num: u8) -> Option<ApplicationTag> {
    use ApplicationTag::*;
    use PropertyId as P;

    match (property, tag_num) {
        (P::ActualShedLevel | P::RequestedShedLevel | P::ExpectedShedLevel, 0 | 1) => {
            Some(UnsignedInt)
        }
        (P::ActualShedLevel | P::RequestedShedLevel | P::ExpectedShedLevel, 2) => Some(Real),
        (P::Action, 0 | 1) => Some(ObjectId),
        (P::Action, 2) => Some(Enumerated),
        (P::Action, 3 | 5 | 6) => Some(UnsignedInt),
        (P::Action, 7 | 8) => Some(Boolean),
        (P::ListOfGroupMembers, 0) => Some(ObjectId),
        (P::ExceptionSchedule, 1) => Some(ObjectId),
        (P::ExceptionSchedule, 3) => Some(UnsignedInt),
        (P::LogDeviceObjectProperty, 0 | 3) => Some(ObjectId),
        (P::LogDeviceObjectProperty, 1) => Some(Enumerated),
        (P::LogDeviceObjectProperty, 2) => Some(UnsignedInt),
        (P::SubordinateList, 0 | 1) => Some(ObjectId),
        (P::RecipientList, 0) => Some(ObjectId),
        (P::ActiveCovSubscriptions, 2) => Some(Boolean),
        (P::ActiveCovSubscriptions, 3) => Some(UnsignedInt),
        (P::ActiveCovSubscriptions, 4) => Some(Real),
        _ => None,
    }
}

/// Content length of a primitive value written under a context tag.
fn context_content_len(value: &ApplicationValue) -> Result<usize, EncodeError> {
    Ok(match value {
        ApplicationValue::Null => 0,
        ApplicationValue::Boolean(_) => 1,
        ApplicationValue::Unsigned(v) | ApplicationValue::Enumerated(v) => unsigned_len(*v),
        ApplicationValue::Signed(v) => signed_len(*v),
        ApplicationValue::Real(_)
        | ApplicationValue::Date(_)
        | ApplicationValue::Time(_)
        | ApplicationValue::ObjectId(_) => 4,
        ApplicationValue::Double(_) => 8,
        ApplicationValue::OctetString(v) => v.len(),
        ApplicationValue::CharacterString(v) => character_string_len(v),
        ApplicationValue::BitString(v) => bit_string_len(v),
        _ => return Err(EncodeError::Unsupported),
    })
}

/// Bytes [`encode_application_data`] would write for `value`.
pub fn encoded_size(value: &ApplicationValue) -> Result<usize, EncodeError> {
    match value {
        ApplicationValue::Null | ApplicationValue::Boolean(_) => Ok(1),
        ApplicationValue::EmptyList => Ok(0),
        ApplicationValue::Context { tag_num, value } => {
            tagged_len(*tag_num, context_content_len(value)?)
        }
        ApplicationValue::ContextSpecific { tag_num, data } => tagged_len(*tag_num, data.len()),
        ApplicationValue::Constructed { tag_num, values } => {
            let brackets = 2 * encoded_tag_len(*tag_num, 0);
            values
                .iter()
                .try_fold(brackets, |acc, v| Ok(acc + encoded_size(v)?))
        }
        ApplicationValue::Encoded(data) => Ok(data.len()),
        primitive => tagged_len(primitive.tag() as u8, context_content_len(primitive)?),
    }
}

/// Encodes `value` into `buf`, returning the number of bytes written.
pub fn encode_into(buf: &mut [u8], value: &ApplicationValue) -> Result<usize, EncodeError> {
    let mut w = Writer::new(buf);
    encode_application_data(&mut w, value)?;
    Ok(w.position())
}

/// Writes `value` with an application tag; in-memory variants use their own layout.
pub fn encode_application_data(
    w: &mut Writer<'_>,
    value: &ApplicationValue,
) -> Result<(), EncodeError> {
    match value {
        ApplicationValue::Null => encode_app_null(w),
        ApplicationValue::Boolean(v) => encode_app_boolean(w, *v),
        ApplicationValue::Unsigned(v) => encode_app_unsigned(w, *v),
        ApplicationValue::Signed(v) => encode_app_signed(w, *v),
        ApplicationValue::Real(v) => encode_app_real(w, *v),
        ApplicationValue::Double(v) => encode_app_double(w, *v),
        ApplicationValue::OctetString(v) => encode_app_octet_string(w, v),
        ApplicationValue::CharacterString(v) => encode_app_character_string(w, v),
        ApplicationValue::BitString(v) => encode_app_bit_string(w, v),
        ApplicationValue::Enumerated(v) => encode_app_enumerated(w, *v),
        ApplicationValue::Date(v) => encode_app_date(w, *v),
        ApplicationValue::Time(v) => encode_app_time(w, *v),
        ApplicationValue::ObjectId(v) => encode_app_object_id(w, *v),
        ApplicationValue::EmptyList => Ok(()),
        ApplicationValue::Context { tag_num, value } => encode_context_data(w, *tag_num, value),
        ApplicationValue::ContextSpecific { tag_num, data } => {
            encode_ctx_octet_string(w, *tag_num, data)
        }
        ApplicationValue::Constructed { tag_num, values } => {
            encode_opening_tag(w, *tag_num)?;
            encode_values(w, values)?;
            encode_closing_tag(w, *tag_num)
        }
        ApplicationValue::Encoded(data) => w.write_all(data),
    }
}

pub fn encode_values(w: &mut Writer<'_>, values: &[ApplicationValue]) -> Result<(), EncodeError> {
    for value in values {
        encode_application_data(w, value)?;
    }
    Ok(())
}

/// Writes a primitive value under context tag `tag_num`.
pub fn encode_context_data(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: &ApplicationValue,
) -> Result<(), EncodeError> {
    match value {
        ApplicationValue::Null => Tag::Context { tag_num, len: 0 }.encode(w),
        ApplicationValue::Boolean(v) => encode_ctx_boolean(w, tag_num, *v),
        ApplicationValue::Unsigned(v) | ApplicationValue::Enumerated(v) => {
            encode_ctx_unsigned(w, tag_num, *v)
        }
        ApplicationValue::Signed(v) => encode_ctx_signed(w, tag_num, *v),
        ApplicationValue::Real(v) => encode_ctx_real(w, tag_num, *v),
        ApplicationValue::Double(v) => encode_ctx_double(w, tag_num, *v),
        ApplicationValue::OctetString(v) => encode_ctx_octet_string(w, tag_num, v),
        ApplicationValue::CharacterString(v) => encode_ctx_character_string(w, tag_num, v),
        ApplicationValue::BitString(v) => encode_ctx_bit_string(w, tag_num, v),
        ApplicationValue::Date(v) => encode_ctx_date(w, tag_num, *v),
        ApplicationValue::Time(v) => encode_ctx_time(w, tag_num, *v),
        ApplicationValue::ObjectId(v) => encode_ctx_object_id(w, tag_num, *v),
        _ => Err(EncodeError::Unsupported),
    }
}

/// Decodes the content of an application-tagged value whose header is already read.
///
/// Fixed-width types with a wrong declared length decode to a zero or
/// unspecified value and still consume `len` bytes.
pub fn decode_application_data(
    r: &mut Reader<'_>,
    tag: ApplicationTag,
    len: u32,
) -> Result<ApplicationValue, DecodeError> {
    let n = len as usize;
    Ok(match tag {
        ApplicationTag::Null => ApplicationValue::Null,
        ApplicationTag::Boolean => ApplicationValue::Boolean(len != 0),
        ApplicationTag::UnsignedInt => ApplicationValue::Unsigned(decode_unsigned(r, n)?),
        ApplicationTag::SignedInt => ApplicationValue::Signed(decode_signed(r, n)?),
        ApplicationTag::Real => ApplicationValue::Real(decode_real_lenient(r, n)?),
        ApplicationTag::Double => ApplicationValue::Double(decode_double_lenient(r, n)?),
        ApplicationTag::OctetString => ApplicationValue::OctetString(decode_octet_string(r, n)?),
        ApplicationTag::CharacterString => {
            ApplicationValue::CharacterString(decode_character_string(r, n)?)
        }
        ApplicationTag::BitString => ApplicationValue::BitString(decode_bit_string(r, n)?),
        ApplicationTag::Enumerated => ApplicationValue::Enumerated(decode_unsigned(r, n)?),
        ApplicationTag::Date => ApplicationValue::Date(decode_date_lenient(r, n)?),
        ApplicationTag::Time => ApplicationValue::Time(decode_time_lenient(r, n)?),
        ApplicationTag::ObjectId => ApplicationValue::ObjectId(decode_object_id_lenient(r, n)?),
        _ => return Err(DecodeError::Unsupported),
    })
}

/// Decodes `len` bytes of context-tagged content inside `property`'s value.
///
/// Tags listed by [`context_tag_type`] decode to a typed
/// [`ApplicationValue::Context`]; anything else, or content that does not
/// decode cleanly to that type, is kept as an opaque
/// [`ApplicationValue::ContextSpecific`] blob.
pub fn decode_context_application_data(
    r: &mut Reader<'_>,
    property: PropertyId,
    tag_num: u8,
    len: u32,
) -> Result<ApplicationValue, DecodeError> {
    let data = r.read_exact(len as usize)?;
    let typed = context_tag_type(property, tag_num).and_then(|tag| {
        let mut sub = Reader::new(data);
        let value = match tag {
            ApplicationTag::Boolean => match data {
                [b] => ApplicationValue::Boolean(*b != 0),
                _ => return None,
            },
            _ => decode_application_data(&mut sub, tag, len).ok()?,
        };
        (tag == ApplicationTag::Boolean || sub.is_empty()).then_some(value)
    });
    Ok(match typed {
        Some(value) => value.in_context(tag_num),
        None => ApplicationValue::ContextSpecific {
            tag_num,
            data: data.to_vec(),
        },
    })
}

/// Decodes one value (application, context or constructed) of `property`.
pub fn decode_value(
    r: &mut Reader<'_>,
    property: PropertyId,
) -> Result<ApplicationValue, DecodeError> {
    let tag = Tag::decode(r)?;
    decode_element(r, property, tag, 0)
}

/// Decodes values until the closing tag `closing` (consumed) or, with
/// `None`, until the input ends.
///
/// Running out of input before the closing tag is an error, as is a closing
/// tag with a different number.
pub fn decode_value_list(
    r: &mut Reader<'_>,
    property: PropertyId,
    closing: Option<u8>,
) -> Result<Vec<ApplicationValue>, DecodeError> {
    decode_list_at(r, property, closing, 0)
}

fn decode_list_at(
    r: &mut Reader<'_>,
    property: PropertyId,
    closing: Option<u8>,
    depth: usize,
) -> Result<Vec<ApplicationValue>, DecodeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(DecodeError::NestingTooDeep);
    }
    let mut values = Vec::new();
    loop {
        if r.is_empty() {
            return match closing {
                None => Ok(values),
                Some(_) => Err(DecodeError::UnexpectedEof),
            };
        }
        match Tag::decode(r)? {
            Tag::Closing { tag_num } if Some(tag_num) == closing => return Ok(values),
            Tag::Closing { .. } => return Err(DecodeError::InvalidTag),
            tag => values.push(decode_element(r, property, tag, depth)?),
        }
    }
}

fn decode_element(
    r: &mut Reader<'_>,
    property: PropertyId,
    tag: Tag,
    depth: usize,
) -> Result<ApplicationValue, DecodeError> {
    match tag {
        Tag::Application { tag, len } => decode_application_data(r, tag, len),
        Tag::Context { tag_num, len } => decode_context_application_data(r, property, tag_num, len),
        Tag::Opening { tag_num } => Ok(ApplicationValue::Constructed {
            tag_num,
            values: decode_list_at(r, property, Some(tag_num), depth + 1)?,
        }),
        Tag::Closing { .. } => Err(DecodeError::InvalidTag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BitString, Date, ObjectId, ObjectType, Time};
    use alloc::vec;
    use proptest::prelude::*;

    fn roundtrip(value: &ApplicationValue, property: PropertyId) -> ApplicationValue {
        let mut buf = [0u8; 256];
        let n = encode_into(&mut buf, value).unwrap();
        assert_eq!(encoded_size(value).unwrap(), n, "{value:?}");
        let mut r = Reader::new(&buf[..n]);
        let got = decode_value(&mut r, property).unwrap();
        assert!(r.is_empty());
        got
    }

    #[test]
    fn application_values_roundtrip() {
        let values = [
            ApplicationValue::Null,
            ApplicationValue::Boolean(true),
            ApplicationValue::Boolean(false),
            ApplicationValue::Unsigned(123),
            ApplicationValue::Signed(-123),
            ApplicationValue::Real(12.5),
            ApplicationValue::Double(42.25),
            ApplicationValue::OctetString(vec![1, 2, 3]),
            ApplicationValue::CharacterString("hello".into()),
            ApplicationValue::BitString("10110".parse::<BitString>().unwrap()),
            ApplicationValue::Enumerated(9),
            ApplicationValue::Date(Date::from_year(2024, 2, 3, 6).unwrap()),
            ApplicationValue::Time(Time::new(1, 2, 3, 40)),
            ApplicationValue::ObjectId(ObjectId::new(ObjectType::Device, 1)),
        ];
        for v in values {
            assert_eq!(roundtrip(&v, PropertyId::PresentValue), v);
        }
    }

    #[test]
    fn null_is_a_single_byte() {
        let mut buf = [0u8; 4];
        assert_eq!(encode_into(&mut buf, &ApplicationValue::Null).unwrap(), 1);
        assert_eq!(buf[0], 0x00);
        assert_eq!(encode_into(&mut buf, &ApplicationValue::EmptyList).unwrap(), 0);
    }

    #[test]
    fn constructed_values_nest() {
        let value = ApplicationValue::Constructed {
            tag_num: 2,
            values: vec![
                ApplicationValue::Unsigned(42),
                ApplicationValue::CharacterString("test".into()),
                ApplicationValue::Constructed {
                    tag_num: 0,
                    values: vec![ApplicationValue::Boolean(true), ApplicationValue::Real(3.5)],
                },
            ],
        };
        assert_eq!(roundtrip(&value, PropertyId::PresentValue), value);
    }

    #[test]
    fn shed_level_context_tags_are_typed() {
        let level = ApplicationValue::Real(40.0).in_context(2);
        assert_eq!(roundtrip(&level, PropertyId::RequestedShedLevel), level);
        let percent = ApplicationValue::Unsigned(25).in_context(0);
        assert_eq!(roundtrip(&percent, PropertyId::ActualShedLevel), percent);
    }

    #[test]
    fn action_command_fields() {
        let device = ObjectId::new(ObjectType::Device, 7);
        let action = ApplicationValue::Constructed {
            tag_num: 0,
            values: vec![
                ApplicationValue::ObjectId(device).in_context(0),
                ApplicationValue::Enumerated(85).in_context(2),
                ApplicationValue::Constructed {
                    tag_num: 4,
                    values: vec![ApplicationValue::Real(1.0)],
                },
                ApplicationValue::Unsigned(8).in_context(5),
                ApplicationValue::Boolean(true).in_context(7),
            ],
        };
        let decoded = roundtrip(&action, PropertyId::Action);
        // Unsigned and enumerated share the unsigned wire form under a context tag.
        let ApplicationValue::Constructed { values, .. } = decoded else {
            panic!("expected constructed value");
        };
        assert_eq!(values[0].as_object_id(), Some(device));
        assert_eq!(values[1], ApplicationValue::Enumerated(85).in_context(2));
        assert_eq!(values[3].as_u32(), Some(8));
        assert_eq!(values[4].as_bool(), Some(true));
    }

    #[test]
    fn unknown_context_tag_is_kept_opaque() {
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        encode_ctx_unsigned(&mut w, 4, 0x1234).unwrap();
        encode_app_unsigned(&mut w, 5).unwrap();
        let mut r = Reader::new(w.as_written());
        let values = decode_value_list(&mut r, PropertyId::PresentValue, None).unwrap();
        assert_eq!(
            values,
            vec![
                ApplicationValue::ContextSpecific {
                    tag_num: 4,
                    data: vec![0x12, 0x34]
                },
                ApplicationValue::Unsigned(5),
            ]
        );
        let opaque = &values[0];
        assert_eq!(roundtrip(opaque, PropertyId::PresentValue), *opaque);
    }

    #[test]
    fn override_with_bad_length() {
        // ObjectId override with two content bytes decodes leniently.
        let data = [0x0A, 0x00, 0x01];
        let mut r = Reader::new(&data);
        let v = decode_value(&mut r, PropertyId::RecipientList).unwrap();
        assert_eq!(v.as_object_id(), Some(ObjectId::from_raw(0)));

        let data = [0x79, 0x02];
        let mut r = Reader::new(&data);
        let v = decode_value(&mut r, PropertyId::Action).unwrap();
        assert_eq!(v.as_bool(), Some(true));

        // Unsigned override with five content bytes cannot decode: kept opaque.
        let data = [0x0D, 0x05, 1, 2, 3, 4, 5];
        let mut r = Reader::new(&data);
        let v = decode_value(&mut r, PropertyId::ActualShedLevel).unwrap();
        assert_eq!(
            v,
            ApplicationValue::ContextSpecific {
                tag_num: 0,
                data: vec![1, 2, 3, 4, 5]
            }
        );
        assert!(r.is_empty());
    }

    #[test]
    fn list_stops_at_matching_closing_tag() {
        let data = [0x21, 0x05, 0x3F, 0x21, 0x06];
        let mut r = Reader::new(&data);
        let values = decode_value_list(&mut r, PropertyId::PresentValue, Some(3)).unwrap();
        assert_eq!(values, vec![ApplicationValue::Unsigned(5)]);
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn missing_closing_tag_fails() {
        let data = [0x21, 0x05];
        let mut r = Reader::new(&data);
        assert_eq!(
            decode_value_list(&mut r, PropertyId::PresentValue, Some(3)).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }

    #[test]
    fn mismatched_closing_tag_fails() {
        let data = [0x1E, 0x21, 0x05, 0x2F];
        let mut r = Reader::new(&data);
        assert_eq!(
            decode_value(&mut r, PropertyId::PresentValue).unwrap_err(),
            DecodeError::InvalidTag
        );
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let mut data = vec![0x0E; MAX_NESTING_DEPTH + 2];
        data.extend(vec![0x0F; MAX_NESTING_DEPTH + 2]);
        let mut r = Reader::new(&data);
        assert_eq!(
            decode_value(&mut r, PropertyId::PresentValue).unwrap_err(),
            DecodeError::NestingTooDeep
        );
    }

    #[test]
    fn lenient_real_keeps_list_position() {
        // Real declared with two bytes, followed by an unsigned.
        let data = [0x42, 0x00, 0x00, 0x21, 0x09];
        let mut r = Reader::new(&data);
        let values = decode_value_list(&mut r, PropertyId::PresentValue, None).unwrap();
        assert_eq!(
            values,
            vec![ApplicationValue::Real(0.0), ApplicationValue::Unsigned(9)]
        );
    }

    #[test]
    fn encoded_bytes_pass_through() {
        let raw = ApplicationValue::Encoded(vec![0x91, 0x03]);
        let mut buf = [0u8; 4];
        assert_eq!(encode_into(&mut buf, &raw).unwrap(), 2);
        assert_eq!(&buf[..2], &[0x91, 0x03]);
    }

    #[test]
    fn constructed_cannot_sit_under_a_context_tag() {
        let bad = ApplicationValue::Constructed {
            tag_num: 0,
            values: vec![],
        }
        .in_context(1);
        let mut buf = [0u8; 8];
        assert_eq!(encode_into(&mut buf, &bad).unwrap_err(), EncodeError::Unsupported);
        assert_eq!(encoded_size(&bad).unwrap_err(), EncodeError::Unsupported);
    }

    proptest! {
        #[test]
        fn unsigned_values_roundtrip(v in any::<u32>()) {
            let value = ApplicationValue::Unsigned(v);
            prop_assert_eq!(roundtrip(&value, PropertyId::PresentValue), value);
        }

        #[test]
        fn signed_values_roundtrip(v in any::<i32>()) {
            let value = ApplicationValue::Signed(v);
            prop_assert_eq!(roundtrip(&value, PropertyId::PresentValue), value);
        }
    }
}
