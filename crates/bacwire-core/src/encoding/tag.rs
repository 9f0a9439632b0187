use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Semantic type of an application value.
///
/// Tags `0..=12` are the ASHRAE application tags and appear on the wire.
/// The remaining variants only describe in-memory values and are rejected by
/// the tag encoder.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplicationTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
    EmptyList = 16,
    ContextSpecificDecoded = 17,
    ContextSpecificEncoded = 18,
    Constructed = 19,
}

impl ApplicationTag {
    /// Maps a wire tag number to its application tag. Reserved tags 13–15 fail.
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Null),
            1 => Ok(Self::Boolean),
            2 => Ok(Self::UnsignedInt),
            3 => Ok(Self::SignedInt),
            4 => Ok(Self::Real),
            5 => Ok(Self::Double),
            6 => Ok(Self::OctetString),
            7 => Ok(Self::CharacterString),
            8 => Ok(Self::BitString),
            9 => Ok(Self::Enumerated),
            10 => Ok(Self::Date),
            11 => Ok(Self::Time),
            12 => Ok(Self::ObjectId),
            _ => Err(DecodeError::InvalidTag),
        }
    }

    pub const fn is_wire_tag(self) -> bool {
        (self as u8) <= 12
    }
}

/// A decoded tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Application { tag: ApplicationTag, len: u32 },
    Context { tag_num: u8, len: u32 },
    Opening { tag_num: u8 },
    Closing { tag_num: u8 },
}

impl Tag {
    pub fn encode(self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Tag::Application { tag, len } => {
                if !tag.is_wire_tag() {
                    return Err(EncodeError::Unsupported);
                }
                encode_tag(w, tag as u8, false, len)
            }
            Tag::Context { tag_num, len } => encode_tag(w, tag_num, true, len),
            Tag::Opening { tag_num } => encode_open_close(w, tag_num, LEN_OPENING),
            Tag::Closing { tag_num } => encode_open_close(w, tag_num, LEN_CLOSING),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let header = decode_tag_number_and_value(r)?;
        if header.is_opening {
            return Ok(Tag::Opening {
                tag_num: header.tag_num,
            });
        }
        if header.is_closing {
            return Ok(Tag::Closing {
                tag_num: header.tag_num,
            });
        }
        if header.is_context_specific {
            Ok(Tag::Context {
                tag_num: header.tag_num,
                len: header.len_value,
            })
        } else {
            Ok(Tag::Application {
                tag: ApplicationTag::from_u8(header.tag_num)?,
                len: header.len_value,
            })
        }
    }

    /// Bytes this header occupies on the wire.
    pub fn encoded_len(self) -> usize {
        match self {
            Tag::Application { tag, len } => encoded_tag_len(tag as u8, len),
            Tag::Context { tag_num, len } => encoded_tag_len(tag_num, len),
            Tag::Opening { tag_num } | Tag::Closing { tag_num } => tag_number_len(tag_num),
        }
    }

    pub fn tag_num(self) -> u8 {
        match self {
            Tag::Application { tag, .. } => tag as u8,
            Tag::Context { tag_num, .. }
            | Tag::Opening { tag_num }
            | Tag::Closing { tag_num } => tag_num,
        }
    }

    pub fn is_context_specific(self) -> bool {
        !matches!(self, Tag::Application { .. })
    }
}

const CLASS_CONTEXT: u8 = 0b0000_1000;
const LEN_EXTENDED: u8 = 5;
const LEN_OPENING: u8 = 6;
const LEN_CLOSING: u8 = 7;

/// Raw tag header with the class bit and length field kept apart.
///
/// Opening and closing tags report `len_value == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub tag_num: u8,
    pub is_context_specific: bool,
    pub len_value: u32,
    pub is_opening: bool,
    pub is_closing: bool,
}

/// Writes a tag header for a primitive value.
pub fn encode_tag(
    w: &mut Writer<'_>,
    tag_num: u8,
    is_context_specific: bool,
    len_value: u32,
) -> Result<(), EncodeError> {
    let mut first = if tag_num <= 14 { tag_num << 4 } else { 0xF0 };
    if is_context_specific {
        first |= CLASS_CONTEXT;
    }
    first |= if len_value <= 4 {
        len_value as u8
    } else {
        LEN_EXTENDED
    };
    w.write_u8(first)?;

    if tag_num > 14 {
        w.write_u8(tag_num)?;
    }

    if len_value > 4 {
        if len_value <= 253 {
            w.write_u8(len_value as u8)?;
        } else if len_value <= 0xFFFF {
            w.write_u8(254)?;
            w.write_be_u16(len_value as u16)?;
        } else {
            w.write_u8(255)?;
            w.write_be_u32(len_value)?;
        }
    }
    Ok(())
}

/// Size of the header [`encode_tag`] would write, computed without a buffer.
pub const fn encoded_tag_len(tag_num: u8, len_value: u32) -> usize {
    let ext = if len_value <= 4 {
        0
    } else if len_value <= 253 {
        1
    } else if len_value <= 0xFFFF {
        3
    } else {
        5
    };
    tag_number_len(tag_num) + ext
}

const fn tag_number_len(tag_num: u8) -> usize {
    if tag_num <= 14 {
        1
    } else {
        2
    }
}

pub fn encode_opening_tag(w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
    encode_open_close(w, tag_num, LEN_OPENING)
}

pub fn encode_closing_tag(w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
    encode_open_close(w, tag_num, LEN_CLOSING)
}

fn encode_open_close(w: &mut Writer<'_>, tag_num: u8, code: u8) -> Result<(), EncodeError> {
    let high = if tag_num <= 14 { tag_num << 4 } else { 0xF0 };
    w.write_u8(high | CLASS_CONTEXT | code)?;
    if tag_num > 14 {
        w.write_u8(tag_num)?;
    }
    Ok(())
}

/// Reads a tag header, including extended tag numbers and lengths.
pub fn decode_tag_number_and_value(r: &mut Reader<'_>) -> Result<TagHeader, DecodeError> {
    let first = r.read_u8()?;
    let is_context_specific = (first & CLASS_CONTEXT) != 0;

    let mut tag_num = first >> 4;
    if tag_num == 0x0F {
        tag_num = r.read_u8()?;
        if tag_num == 0xFF {
            return Err(DecodeError::InvalidTag);
        }
    }

    let mut header = TagHeader {
        tag_num,
        is_context_specific,
        len_value: 0,
        is_opening: false,
        is_closing: false,
    };

    match first & 0x07 {
        code @ 0..=4 => header.len_value = code as u32,
        LEN_EXTENDED => {
            header.len_value = match r.read_u8()? {
                254 => r.read_be_u16()? as u32,
                255 => r.read_be_u32()?,
                v => v as u32,
            };
        }
        LEN_OPENING if is_context_specific => header.is_opening = true,
        LEN_CLOSING if is_context_specific => header.is_closing = true,
        _ => return Err(DecodeError::InvalidLength),
    }
    Ok(header)
}

/// True when the next tag is a context tag with the given number (any form).
pub fn decode_is_context_tag(r: &Reader<'_>, tag_num: u8) -> bool {
    matches!(r.peek_tag(), Ok(Tag::Context { tag_num: n, .. }) if n == tag_num)
}

pub fn is_opening_tag_number(r: &Reader<'_>, tag_num: u8) -> bool {
    matches!(r.peek_tag(), Ok(Tag::Opening { tag_num: n }) if n == tag_num)
}

pub fn is_closing_tag_number(r: &Reader<'_>, tag_num: u8) -> bool {
    matches!(r.peek_tag(), Ok(Tag::Closing { tag_num: n }) if n == tag_num)
}

/// Consumes an opening tag with the expected number.
pub fn expect_opening(r: &mut Reader<'_>, tag_num: u8) -> Result<(), DecodeError> {
    match Tag::decode(r)? {
        Tag::Opening { tag_num: n } if n == tag_num => Ok(()),
        _ => Err(DecodeError::InvalidTag),
    }
}

/// Consumes a closing tag with the expected number.
pub fn expect_closing(r: &mut Reader<'_>, tag_num: u8) -> Result<(), DecodeError> {
    match Tag::decode(r)? {
        Tag::Closing { tag_num: n } if n == tag_num => Ok(()),
        _ => Err(DecodeError::InvalidTag),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        decode_tag_number_and_value, encode_tag, encoded_tag_len, ApplicationTag, Tag, TagHeader,
    };
    use crate::encoding::{
        reader::Reader,
        writer::{encoded_size, Writer},
    };
    use crate::{DecodeError, EncodeError};

    #[test]
    fn roundtrip_application_tag() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        Tag::Application {
            tag: ApplicationTag::UnsignedInt,
            len: 3,
        }
        .encode(&mut w)
        .unwrap();
        assert_eq!(w.as_written(), &[0x23]);

        let mut r = Reader::new(w.as_written());
        let t = Tag::decode(&mut r).unwrap();
        assert_eq!(
            t,
            Tag::Application {
                tag: ApplicationTag::UnsignedInt,
                len: 3
            }
        );
    }

    #[test]
    fn roundtrip_extended() {
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        Tag::Context {
            tag_num: 30,
            len: 300,
        }
        .encode(&mut w)
        .unwrap();
        assert_eq!(w.as_written(), &[0xFD, 30, 254, 0x01, 0x2C]);

        let mut r = Reader::new(w.as_written());
        let t = Tag::decode(&mut r).unwrap();
        assert_eq!(
            t,
            Tag::Context {
                tag_num: 30,
                len: 300
            }
        );
    }

    #[test]
    fn header_grid_roundtrips_and_sizes_match() {
        for tag_num in [0u8, 14, 15, 254] {
            for context in [true, false] {
                for len in [0u32, 4, 5, 253, 254, 65535, 65536] {
                    let mut buf = [0u8; 8];
                    let mut w = Writer::new(&mut buf);
                    encode_tag(&mut w, tag_num, context, len).unwrap();
                    let written = w.position();
                    assert_eq!(encoded_tag_len(tag_num, len), written);
                    let sized = encoded_size(|w| encode_tag(w, tag_num, context, len)).unwrap();
                    assert_eq!(sized, written);
                    let again = encoded_size(|w| encode_tag(w, tag_num, context, len)).unwrap();
                    assert_eq!(again, sized);

                    let mut r = Reader::new(w.as_written());
                    let header = decode_tag_number_and_value(&mut r).unwrap();
                    assert_eq!(
                        header,
                        TagHeader {
                            tag_num,
                            is_context_specific: context,
                            len_value: len,
                            is_opening: false,
                            is_closing: false,
                        }
                    );
                    assert!(r.is_empty());
                }
            }
        }
    }

    #[test]
    fn opening_and_closing_tags() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        Tag::Opening { tag_num: 3 }.encode(&mut w).unwrap();
        Tag::Closing { tag_num: 20 }.encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0x3E, 0xFF, 20]);

        let mut r = Reader::new(w.as_written());
        assert_eq!(Tag::decode(&mut r).unwrap(), Tag::Opening { tag_num: 3 });
        assert_eq!(Tag::decode(&mut r).unwrap(), Tag::Closing { tag_num: 20 });
        assert_eq!(Tag::Closing { tag_num: 20 }.encoded_len(), 2);
    }

    #[test]
    fn application_class_cannot_open() {
        let mut r = Reader::new(&[0x26]);
        assert_eq!(Tag::decode(&mut r).unwrap_err(), DecodeError::InvalidLength);
    }

    #[test]
    fn reserved_application_tag_rejected() {
        let mut r = Reader::new(&[0xD0]);
        assert_eq!(Tag::decode(&mut r).unwrap_err(), DecodeError::InvalidTag);
    }

    #[test]
    fn synthetic_tags_never_reach_the_wire() {
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        let err = Tag::Application {
            tag: ApplicationTag::Constructed,
            len: 0,
        }
        .encode(&mut w)
        .unwrap_err();
        assert_eq!(err, EncodeError::Unsupported);
    }

    #[test]
    fn truncated_extended_length_fails() {
        let mut r = Reader::new(&[0x65, 254, 0x01]);
        assert_eq!(Tag::decode(&mut r).unwrap_err(), DecodeError::UnexpectedEof);
    }
}
