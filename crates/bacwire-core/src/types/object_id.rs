use core::fmt;

use crate::types::ObjectType;
use crate::{BACNET_MAX_INSTANCE, BACNET_MAX_OBJECT};

/// A packed BACnet object identifier combining an [`ObjectType`] and a 22-bit
/// instance number into a single `u32`.
///
/// The upper 10 bits encode the object type and the lower 22 bits encode the
/// instance number, matching the BACnet wire format. Out-of-range inputs are
/// masked, so equality always compares the `(type, instance)` pair as sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates an `ObjectId` from a type and instance number.
    pub const fn new(object_type: ObjectType, instance: u32) -> Self {
        Self::from_parts(object_type.to_u16(), instance)
    }

    /// Creates an `ObjectId` from a numeric type and instance, masking both.
    pub const fn from_parts(object_type: u16, instance: u32) -> Self {
        Self(
            (((object_type & BACNET_MAX_OBJECT) as u32) << 22) | (instance & BACNET_MAX_INSTANCE),
        )
    }

    /// Returns the raw packed `u32` representation.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Constructs an `ObjectId` from a pre-packed `u32`.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Extracts the [`ObjectType`] from the upper 10 bits.
    pub const fn object_type(self) -> ObjectType {
        ObjectType::from_u16(self.type_number())
    }

    /// The numeric object type (0..=1023).
    pub const fn type_number(self) -> u16 {
        ((self.0 >> 22) as u16) & BACNET_MAX_OBJECT
    }

    /// Extracts the 22-bit instance number.
    pub const fn instance(self) -> u32 {
        self.0 & BACNET_MAX_INSTANCE
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_number(), self.instance())
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectId;
    use crate::types::ObjectType;

    #[test]
    fn encodes_object_id() {
        let id = ObjectId::new(ObjectType::AnalogInput, 1);
        assert_eq!(id.object_type(), ObjectType::AnalogInput);
        assert_eq!(id.instance(), 1);
    }

    #[test]
    fn packs_extremes() {
        let id = ObjectId::from_parts(512, 4_194_303);
        assert_eq!(id.type_number(), 512);
        assert_eq!(id.instance(), 4_194_303);
        assert_eq!(id.raw(), (512 << 22) | 0x3F_FFFF);

        let clamped = ObjectId::from_parts(1024 + 8, 0x40_0001);
        assert_eq!(clamped, ObjectId::from_parts(8, 1));
    }
}
