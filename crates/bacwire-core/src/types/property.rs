use alloc::vec::Vec;

use crate::types::{ApplicationValue, PropertyId};
use crate::BACNET_ARRAY_ALL;

/// A property identifier with an optional array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyReference {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

impl PropertyReference {
    pub const fn new(property_id: PropertyId) -> Self {
        Self {
            property_id,
            array_index: None,
        }
    }

    pub const fn with_index(property_id: PropertyId, array_index: u32) -> Self {
        Self {
            property_id,
            array_index: Some(array_index),
        }
    }

    /// Array index with [`BACNET_ARRAY_ALL`] standing in for "none".
    pub fn array_index_or_all(&self) -> u32 {
        self.array_index.unwrap_or(BACNET_ARRAY_ALL)
    }

    /// The index to put on the wire; the "all" sentinel is never sent.
    pub(crate) fn wire_index(&self) -> Option<u32> {
        self.array_index.filter(|idx| *idx != BACNET_ARRAY_ALL)
    }
}

impl From<PropertyId> for PropertyReference {
    fn from(value: PropertyId) -> Self {
        Self::new(value)
    }
}

/// A property reference together with its values and an optional write priority.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyValue {
    pub property: PropertyReference,
    pub values: Vec<ApplicationValue>,
    pub priority: Option<u8>,
}

impl PropertyValue {
    pub fn new(property: impl Into<PropertyReference>, values: Vec<ApplicationValue>) -> Self {
        Self {
            property: property.into(),
            values,
            priority: None,
        }
    }
}
