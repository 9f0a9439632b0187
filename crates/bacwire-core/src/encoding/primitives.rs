use alloc::string::String;
use alloc::vec::Vec;

use crate::encoding::{
    reader::Reader,
    tag::{encoded_tag_len, ApplicationTag, Tag},
    writer::Writer,
};
use crate::types::{BitString, CharacterSet, Date, ObjectId, Time};
use crate::{DecodeError, EncodeError};

/// Minimal number of bytes needed for `value` as an unsigned integer.
pub const fn unsigned_len(value: u32) -> usize {
    if value < 0x100 {
        1
    } else if value < 0x1_0000 {
        2
    } else if value < 0x100_0000 {
        3
    } else {
        4
    }
}

/// Minimal two's-complement width for `value`.
pub const fn signed_len(value: i32) -> usize {
    if value >= -128 && value < 128 {
        1
    } else if value >= -32_768 && value < 32_768 {
        2
    } else if value > -8_388_608 && value < 8_388_608 {
        3
    } else {
        4
    }
}

pub fn encode_unsigned(w: &mut Writer<'_>, value: u32) -> Result<usize, EncodeError> {
    let len = unsigned_len(value);
    w.write_all(&value.to_be_bytes()[4 - len..])?;
    Ok(len)
}

pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    if len == 0 || len > 4 {
        return Err(DecodeError::InvalidLength);
    }
    let mut value = 0u32;
    for b in r.read_exact(len)? {
        value = (value << 8) | *b as u32;
    }
    Ok(value)
}

pub fn encode_signed(w: &mut Writer<'_>, value: i32) -> Result<usize, EncodeError> {
    let len = signed_len(value);
    w.write_all(&value.to_be_bytes()[4 - len..])?;
    Ok(len)
}

pub fn decode_signed(r: &mut Reader<'_>, len: usize) -> Result<i32, DecodeError> {
    if len == 0 || len > 4 {
        return Err(DecodeError::InvalidLength);
    }
    let bytes = r.read_exact(len)?;
    let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut out = [fill; 4];
    out[4 - len..].copy_from_slice(bytes);
    Ok(i32::from_be_bytes(out))
}

pub fn encode_real(w: &mut Writer<'_>, value: f32) -> Result<usize, EncodeError> {
    w.write_all(&value.to_be_bytes())?;
    Ok(4)
}

pub fn decode_real(r: &mut Reader<'_>, len: usize) -> Result<f32, DecodeError> {
    Ok(f32::from_be_bytes(read_fixed::<4>(r, len)?))
}

pub fn encode_double(w: &mut Writer<'_>, value: f64) -> Result<usize, EncodeError> {
    w.write_all(&value.to_be_bytes())?;
    Ok(8)
}

pub fn decode_double(r: &mut Reader<'_>, len: usize) -> Result<f64, DecodeError> {
    Ok(f64::from_be_bytes(read_fixed::<8>(r, len)?))
}

pub fn encode_date(w: &mut Writer<'_>, value: Date) -> Result<usize, EncodeError> {
    w.write_all(&value.to_bytes())?;
    Ok(4)
}

pub fn decode_date(r: &mut Reader<'_>, len: usize) -> Result<Date, DecodeError> {
    Ok(Date::from_bytes(read_fixed::<4>(r, len)?))
}

pub fn encode_time(w: &mut Writer<'_>, value: Time) -> Result<usize, EncodeError> {
    w.write_all(&value.to_bytes())?;
    Ok(4)
}

pub fn decode_time(r: &mut Reader<'_>, len: usize) -> Result<Time, DecodeError> {
    Ok(Time::from_bytes(read_fixed::<4>(r, len)?))
}

pub fn encode_object_id(w: &mut Writer<'_>, value: ObjectId) -> Result<usize, EncodeError> {
    w.write_be_u32(value.raw())?;
    Ok(4)
}

pub fn decode_object_id(r: &mut Reader<'_>, len: usize) -> Result<ObjectId, DecodeError> {
    Ok(ObjectId::from_raw(u32::from_be_bytes(read_fixed::<4>(
        r, len,
    )?)))
}

fn read_fixed<const N: usize>(r: &mut Reader<'_>, len: usize) -> Result<[u8; N], DecodeError> {
    if len != N {
        return Err(DecodeError::InvalidLength);
    }
    let mut out = [0u8; N];
    out.copy_from_slice(r.read_exact(N)?);
    Ok(out)
}

/// Fixed-width decode that tolerates a wrong declared length.
///
/// A mismatched length skips the declared bytes and yields `fallback`, so the
/// surrounding list keeps its position.
fn lenient<T>(
    r: &mut Reader<'_>,
    len: usize,
    width: usize,
    fallback: T,
    decode: fn(&mut Reader<'_>, usize) -> Result<T, DecodeError>,
) -> Result<T, DecodeError> {
    if len == width {
        decode(r, len)
    } else {
        r.skip(len)?;
        Ok(fallback)
    }
}

pub fn decode_real_lenient(r: &mut Reader<'_>, len: usize) -> Result<f32, DecodeError> {
    lenient(r, len, 4, 0.0, decode_real)
}

pub fn decode_double_lenient(r: &mut Reader<'_>, len: usize) -> Result<f64, DecodeError> {
    lenient(r, len, 8, 0.0, decode_double)
}

pub fn decode_date_lenient(r: &mut Reader<'_>, len: usize) -> Result<Date, DecodeError> {
    lenient(r, len, 4, Date::UNSPECIFIED, decode_date)
}

pub fn decode_time_lenient(r: &mut Reader<'_>, len: usize) -> Result<Time, DecodeError> {
    lenient(r, len, 4, Time::UNSPECIFIED, decode_time)
}

pub fn decode_object_id_lenient(r: &mut Reader<'_>, len: usize) -> Result<ObjectId, DecodeError> {
    lenient(r, len, 4, ObjectId::from_raw(0), decode_object_id)
}

/// Content length of a character string: the charset byte plus UTF-8 bytes.
pub fn character_string_len(value: &str) -> usize {
    value.len() + 1
}

/// Writes a UTF-8 character string (charset marker `0`).
pub fn encode_character_string(w: &mut Writer<'_>, value: &str) -> Result<usize, EncodeError> {
    w.write_u8(CharacterSet::Utf8.to_u32() as u8)?;
    w.write_all(value.as_bytes())?;
    Ok(character_string_len(value))
}

/// Reads a character string in UTF-8, UCS-2 (big endian) or ISO-8859-1.
pub fn decode_character_string(r: &mut Reader<'_>, len: usize) -> Result<String, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len)?;
    let (charset, data) = (raw[0], &raw[1..]);
    match CharacterSet::from_u32(charset as u32) {
        Some(CharacterSet::Utf8) => {
            String::from_utf8(data.to_vec()).map_err(|_| DecodeError::InvalidValue)
        }
        Some(CharacterSet::Ucs2) => {
            if data.len() % 2 != 0 {
                return Err(DecodeError::InvalidLength);
            }
            let units = data
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .map_err(|_| DecodeError::InvalidValue)
        }
        Some(CharacterSet::Iso8859) => Ok(data.iter().map(|b| char::from(*b)).collect()),
        _ => Err(DecodeError::Unsupported),
    }
}

pub fn encode_octet_string(w: &mut Writer<'_>, value: &[u8]) -> Result<usize, EncodeError> {
    w.write_all(value)?;
    Ok(value.len())
}

pub fn decode_octet_string(r: &mut Reader<'_>, len: usize) -> Result<Vec<u8>, DecodeError> {
    Ok(r.read_exact(len)?.to_vec())
}

/// Content length of a bit string: the unused-bits byte plus data bytes.
pub const fn bit_string_len(value: &BitString) -> usize {
    1 + value.byte_len()
}

pub fn encode_bit_string(w: &mut Writer<'_>, value: &BitString) -> Result<usize, EncodeError> {
    if value.is_empty() {
        w.write_u8(0)?;
        return Ok(1);
    }
    w.write_u8(value.unused_bits())?;
    for i in 0..value.byte_len() {
        w.write_u8(value.wire_byte(i))?;
    }
    Ok(bit_string_len(value))
}

pub fn decode_bit_string(r: &mut Reader<'_>, len: usize) -> Result<BitString, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len)?;
    BitString::from_wire(raw[0], &raw[1..])
}

fn encode_app_scalar(
    w: &mut Writer<'_>,
    tag: ApplicationTag,
    len: usize,
    body: impl FnOnce(&mut Writer<'_>) -> Result<usize, EncodeError>,
) -> Result<(), EncodeError> {
    Tag::Application {
        tag,
        len: content_len(len)?,
    }
    .encode(w)?;
    body(w).map(|_| ())
}

fn encode_ctx_scalar(
    w: &mut Writer<'_>,
    tag_num: u8,
    len: usize,
    body: impl FnOnce(&mut Writer<'_>) -> Result<usize, EncodeError>,
) -> Result<(), EncodeError> {
    Tag::Context {
        tag_num,
        len: content_len(len)?,
    }
    .encode(w)?;
    body(w).map(|_| ())
}

fn content_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::ValueOutOfRange)
}

/// Size of an application- or context-tagged value with `len` content bytes.
pub fn tagged_len(tag_num: u8, len: usize) -> Result<usize, EncodeError> {
    Ok(encoded_tag_len(tag_num, content_len(len)?) + len)
}

pub fn encode_app_null(w: &mut Writer<'_>) -> Result<(), EncodeError> {
    Tag::Application {
        tag: ApplicationTag::Null,
        len: 0,
    }
    .encode(w)
}

/// Application booleans carry their value in the length field.
pub fn encode_app_boolean(w: &mut Writer<'_>, value: bool) -> Result<(), EncodeError> {
    Tag::Application {
        tag: ApplicationTag::Boolean,
        len: value as u32,
    }
    .encode(w)
}

pub fn encode_app_unsigned(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::UnsignedInt, unsigned_len(value), |w| {
        encode_unsigned(w, value)
    })
}

pub fn encode_app_signed(w: &mut Writer<'_>, value: i32) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::SignedInt, signed_len(value), |w| {
        encode_signed(w, value)
    })
}

pub fn encode_app_real(w: &mut Writer<'_>, value: f32) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::Real, 4, |w| encode_real(w, value))
}

pub fn encode_app_double(w: &mut Writer<'_>, value: f64) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::Double, 8, |w| encode_double(w, value))
}

pub fn encode_app_octet_string(w: &mut Writer<'_>, value: &[u8]) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::OctetString, value.len(), |w| {
        encode_octet_string(w, value)
    })
}

pub fn encode_app_character_string(w: &mut Writer<'_>, value: &str) -> Result<(), EncodeError> {
    encode_app_scalar(
        w,
        ApplicationTag::CharacterString,
        character_string_len(value),
        |w| encode_character_string(w, value),
    )
}

pub fn encode_app_bit_string(w: &mut Writer<'_>, value: &BitString) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::BitString, bit_string_len(value), |w| {
        encode_bit_string(w, value)
    })
}

pub fn encode_app_enumerated(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::Enumerated, unsigned_len(value), |w| {
        encode_unsigned(w, value)
    })
}

pub fn encode_app_date(w: &mut Writer<'_>, value: Date) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::Date, 4, |w| encode_date(w, value))
}

pub fn encode_app_time(w: &mut Writer<'_>, value: Time) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::Time, 4, |w| encode_time(w, value))
}

pub fn encode_app_object_id(w: &mut Writer<'_>, value: ObjectId) -> Result<(), EncodeError> {
    encode_app_scalar(w, ApplicationTag::ObjectId, 4, |w| {
        encode_object_id(w, value)
    })
}

/// Context booleans carry one content byte.
pub fn encode_ctx_boolean(w: &mut Writer<'_>, tag_num: u8, value: bool) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, 1, |w| w.write_u8(value as u8).map(|_| 1))
}

pub fn encode_ctx_unsigned(w: &mut Writer<'_>, tag_num: u8, value: u32) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, unsigned_len(value), |w| {
        encode_unsigned(w, value)
    })
}

pub fn encode_ctx_enumerated(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: u32,
) -> Result<(), EncodeError> {
    encode_ctx_unsigned(w, tag_num, value)
}

pub fn encode_ctx_signed(w: &mut Writer<'_>, tag_num: u8, value: i32) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, signed_len(value), |w| encode_signed(w, value))
}

pub fn encode_ctx_real(w: &mut Writer<'_>, tag_num: u8, value: f32) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, 4, |w| encode_real(w, value))
}

pub fn encode_ctx_double(w: &mut Writer<'_>, tag_num: u8, value: f64) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, 8, |w| encode_double(w, value))
}

pub fn encode_ctx_object_id(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: ObjectId,
) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, 4, |w| encode_object_id(w, value))
}

pub fn encode_ctx_character_string(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: &str,
) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, character_string_len(value), |w| {
        encode_character_string(w, value)
    })
}

pub fn encode_ctx_octet_string(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: &[u8],
) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, value.len(), |w| encode_octet_string(w, value))
}

pub fn encode_ctx_bit_string(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: &BitString,
) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, bit_string_len(value), |w| {
        encode_bit_string(w, value)
    })
}

pub fn encode_ctx_date(w: &mut Writer<'_>, tag_num: u8, value: Date) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, 4, |w| encode_date(w, value))
}

pub fn encode_ctx_time(w: &mut Writer<'_>, tag_num: u8, value: Time) -> Result<(), EncodeError> {
    encode_ctx_scalar(w, tag_num, 4, |w| encode_time(w, value))
}

fn expect_app(r: &mut Reader<'_>, expected: ApplicationTag) -> Result<usize, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application { tag, len } if tag == expected => Ok(len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

fn expect_ctx(r: &mut Reader<'_>, tag_num: u8) -> Result<usize, DecodeError> {
    match Tag::decode(r)? {
        Tag::Context { tag_num: n, len } if n == tag_num => Ok(len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_null(r: &mut Reader<'_>) -> Result<(), DecodeError> {
    match expect_app(r, ApplicationTag::Null)? {
        0 => Ok(()),
        _ => Err(DecodeError::InvalidLength),
    }
}

pub fn decode_app_boolean(r: &mut Reader<'_>) -> Result<bool, DecodeError> {
    match expect_app(r, ApplicationTag::Boolean)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DecodeError::InvalidValue),
    }
}

pub fn decode_app_unsigned(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    let len = expect_app(r, ApplicationTag::UnsignedInt)?;
    decode_unsigned(r, len)
}

pub fn decode_app_signed(r: &mut Reader<'_>) -> Result<i32, DecodeError> {
    let len = expect_app(r, ApplicationTag::SignedInt)?;
    decode_signed(r, len)
}

pub fn decode_app_real(r: &mut Reader<'_>) -> Result<f32, DecodeError> {
    let len = expect_app(r, ApplicationTag::Real)?;
    decode_real(r, len)
}

pub fn decode_app_double(r: &mut Reader<'_>) -> Result<f64, DecodeError> {
    let len = expect_app(r, ApplicationTag::Double)?;
    decode_double(r, len)
}

pub fn decode_app_octet_string(r: &mut Reader<'_>) -> Result<Vec<u8>, DecodeError> {
    let len = expect_app(r, ApplicationTag::OctetString)?;
    decode_octet_string(r, len)
}

pub fn decode_app_character_string(r: &mut Reader<'_>) -> Result<String, DecodeError> {
    let len = expect_app(r, ApplicationTag::CharacterString)?;
    decode_character_string(r, len)
}

pub fn decode_app_bit_string(r: &mut Reader<'_>) -> Result<BitString, DecodeError> {
    let len = expect_app(r, ApplicationTag::BitString)?;
    decode_bit_string(r, len)
}

pub fn decode_app_enumerated(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    let len = expect_app(r, ApplicationTag::Enumerated)?;
    decode_unsigned(r, len)
}

pub fn decode_app_date(r: &mut Reader<'_>) -> Result<Date, DecodeError> {
    let len = expect_app(r, ApplicationTag::Date)?;
    decode_date(r, len)
}

pub fn decode_app_time(r: &mut Reader<'_>) -> Result<Time, DecodeError> {
    let len = expect_app(r, ApplicationTag::Time)?;
    decode_time(r, len)
}

pub fn decode_app_object_id(r: &mut Reader<'_>) -> Result<ObjectId, DecodeError> {
    let len = expect_app(r, ApplicationTag::ObjectId)?;
    decode_object_id(r, len)
}

pub fn decode_ctx_boolean(r: &mut Reader<'_>, tag_num: u8) -> Result<bool, DecodeError> {
    match expect_ctx(r, tag_num)? {
        1 => Ok(r.read_u8()? != 0),
        _ => Err(DecodeError::InvalidLength),
    }
}

pub fn decode_ctx_unsigned(r: &mut Reader<'_>, tag_num: u8) -> Result<u32, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_unsigned(r, len)
}

pub fn decode_ctx_enumerated(r: &mut Reader<'_>, tag_num: u8) -> Result<u32, DecodeError> {
    decode_ctx_unsigned(r, tag_num)
}

pub fn decode_ctx_signed(r: &mut Reader<'_>, tag_num: u8) -> Result<i32, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_signed(r, len)
}

pub fn decode_ctx_real(r: &mut Reader<'_>, tag_num: u8) -> Result<f32, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_real(r, len)
}

pub fn decode_ctx_object_id(r: &mut Reader<'_>, tag_num: u8) -> Result<ObjectId, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_object_id(r, len)
}

pub fn decode_ctx_character_string(r: &mut Reader<'_>, tag_num: u8) -> Result<String, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_character_string(r, len)
}

pub fn decode_ctx_octet_string(r: &mut Reader<'_>, tag_num: u8) -> Result<Vec<u8>, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_octet_string(r, len)
}

pub fn decode_ctx_bit_string(r: &mut Reader<'_>, tag_num: u8) -> Result<BitString, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_bit_string(r, len)
}

pub fn decode_ctx_date(r: &mut Reader<'_>, tag_num: u8) -> Result<Date, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_date(r, len)
}

pub fn decode_ctx_time(r: &mut Reader<'_>, tag_num: u8) -> Result<Time, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_time(r, len)
}

/// Decodes an optional context-tagged field: absent (or a different tag) is `None`.
pub fn decode_optional_ctx<T>(
    r: &mut Reader<'_>,
    tag_num: u8,
    decode: fn(&mut Reader<'_>, u8) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    if r.is_empty() || !crate::encoding::tag::decode_is_context_tag(r, tag_num) {
        return Ok(None);
    }
    decode(r, tag_num).map(Some)
}
