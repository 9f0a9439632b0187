use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::encoding::tag::ApplicationTag;
use crate::types::{BitString, Date, ObjectId, Time};

/// A decoded BACnet value: one variant per application tag plus the
/// in-memory forms produced while walking constructed property data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplicationValue {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(Vec<u8>),
    CharacterString(String),
    BitString(BitString),
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectId(ObjectId),
    /// An empty list; writes nothing.
    EmptyList,
    /// A primitive value under a context tag whose type is known from the property.
    Context {
        tag_num: u8,
        value: Box<ApplicationValue>,
    },
    /// Context-tagged content of unknown type, kept as raw bytes.
    ContextSpecific { tag_num: u8, data: Vec<u8> },
    /// Values bracketed by an opening and closing tag.
    Constructed {
        tag_num: u8,
        values: Vec<ApplicationValue>,
    },
    /// Pre-encoded bytes written verbatim.
    Encoded(Vec<u8>),
}

impl ApplicationValue {
    pub fn tag(&self) -> ApplicationTag {
        match self {
            Self::Null => ApplicationTag::Null,
            Self::Boolean(_) => ApplicationTag::Boolean,
            Self::Unsigned(_) => ApplicationTag::UnsignedInt,
            Self::Signed(_) => ApplicationTag::SignedInt,
            Self::Real(_) => ApplicationTag::Real,
            Self::Double(_) => ApplicationTag::Double,
            Self::OctetString(_) => ApplicationTag::OctetString,
            Self::CharacterString(_) => ApplicationTag::CharacterString,
            Self::BitString(_) => ApplicationTag::BitString,
            Self::Enumerated(_) => ApplicationTag::Enumerated,
            Self::Date(_) => ApplicationTag::Date,
            Self::Time(_) => ApplicationTag::Time,
            Self::ObjectId(_) => ApplicationTag::ObjectId,
            Self::EmptyList => ApplicationTag::EmptyList,
            Self::Context { value, .. } => value.tag(),
            Self::ContextSpecific { .. } => ApplicationTag::ContextSpecificDecoded,
            Self::Constructed { .. } => ApplicationTag::Constructed,
            Self::Encoded(_) => ApplicationTag::ContextSpecificEncoded,
        }
    }

    /// Wraps `self` under a context tag.
    pub fn in_context(self, tag_num: u8) -> Self {
        Self::Context {
            tag_num,
            value: Box::new(self),
        }
    }

    /// Unwraps a [`Context`](Self::Context) value; other variants are returned as is.
    pub fn inner(&self) -> &Self {
        match self {
            Self::Context { value, .. } => value.inner(),
            other => other,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.inner() {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Unsigned and enumerated values.
    pub fn as_u32(&self) -> Option<u32> {
        match self.inner() {
            Self::Unsigned(v) | Self::Enumerated(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self.inner() {
            Self::Signed(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self.inner() {
            Self::Real(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            Self::Unsigned(v) | Self::Enumerated(v) => Some(*v as f64),
            Self::Signed(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.inner() {
            Self::CharacterString(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self.inner() {
            Self::ObjectId(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for ApplicationValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<u32> for ApplicationValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(value)
    }
}

impl From<i32> for ApplicationValue {
    fn from(value: i32) -> Self {
        Self::Signed(value)
    }
}

impl From<f32> for ApplicationValue {
    fn from(value: f32) -> Self {
        Self::Real(value)
    }
}

impl From<f64> for ApplicationValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for ApplicationValue {
    fn from(value: &str) -> Self {
        Self::CharacterString(value.into())
    }
}

impl From<String> for ApplicationValue {
    fn from(value: String) -> Self {
        Self::CharacterString(value)
    }
}

impl From<ObjectId> for ApplicationValue {
    fn from(value: ObjectId) -> Self {
        Self::ObjectId(value)
    }
}

impl From<BitString> for ApplicationValue {
    fn from(value: BitString) -> Self {
        Self::BitString(value)
    }
}
