/// BACnet object type identifiers.
///
/// Standard types up to Lighting Output are named variants; reserved and
/// vendor-specific numbers use [`Proprietary`](Self::Proprietary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectType {
    AnalogInput,
    AnalogOutput,
    AnalogValue,
    BinaryInput,
    BinaryOutput,
    BinaryValue,
    Calendar,
    Command,
    Device,
    EventEnrollment,
    File,
    Group,
    Loop,
    MultiStateInput,
    MultiStateOutput,
    NotificationClass,
    Program,
    Schedule,
    Averaging,
    MultiStateValue,
    TrendLog,
    LifeSafetyPoint,
    LifeSafetyZone,
    Accumulator,
    PulseConverter,
    EventLog,
    GlobalGroup,
    TrendLogMultiple,
    LoadControl,
    StructuredView,
    AccessDoor,
    AccessCredential,
    AccessPoint,
    AccessRights,
    AccessUser,
    AccessZone,
    CredentialDataInput,
    NetworkSecurity,
    BitStringValue,
    CharacterStringValue,
    DatePatternValue,
    DateValue,
    DateTimePatternValue,
    DateTimeValue,
    IntegerValue,
    LargeAnalogValue,
    OctetStringValue,
    PositiveIntegerValue,
    TimePatternValue,
    TimeValue,
    NotificationForwarder,
    AlertEnrollment,
    Channel,
    LightingOutput,
    Proprietary(u16),
}

impl ObjectType {
    /// Converts this object type to its numeric BACnet identifier.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::AnalogInput => 0,
            Self::AnalogOutput => 1,
            Self::AnalogValue => 2,
            Self::BinaryInput => 3,
            Self::BinaryOutput => 4,
            Self::BinaryValue => 5,
            Self::Calendar => 6,
            Self::Command => 7,
            Self::Device => 8,
            Self::EventEnrollment => 9,
            Self::File => 10,
            Self::Group => 11,
            Self::Loop => 12,
            Self::MultiStateInput => 13,
            Self::MultiStateOutput => 14,
            Self::NotificationClass => 15,
            Self::Program => 16,
            Self::Schedule => 17,
            Self::Averaging => 18,
            Self::MultiStateValue => 19,
            Self::TrendLog => 20,
            Self::LifeSafetyPoint => 21,
            Self::LifeSafetyZone => 22,
            Self::Accumulator => 23,
            Self::PulseConverter => 24,
            Self::EventLog => 25,
            Self::GlobalGroup => 26,
            Self::TrendLogMultiple => 27,
            Self::LoadControl => 28,
            Self::StructuredView => 29,
            Self::AccessDoor => 30,
            Self::AccessCredential => 32,
            Self::AccessPoint => 33,
            Self::AccessRights => 34,
            Self::AccessUser => 35,
            Self::AccessZone => 36,
            Self::CredentialDataInput => 37,
            Self::NetworkSecurity => 38,
            Self::BitStringValue => 39,
            Self::CharacterStringValue => 40,
            Self::DatePatternValue => 41,
            Self::DateValue => 42,
            Self::DateTimePatternValue => 43,
            Self::DateTimeValue => 44,
            Self::IntegerValue => 45,
            Self::LargeAnalogValue => 46,
            Self::OctetStringValue => 47,
            Self::PositiveIntegerValue => 48,
            Self::TimePatternValue => 49,
            Self::TimeValue => 50,
            Self::NotificationForwarder => 51,
            Self::AlertEnrollment => 52,
            Self::Channel => 53,
            Self::LightingOutput => 54,
            Self::Proprietary(v) => v,
        }
    }

    /// Creates an `ObjectType` from its numeric BACnet identifier.
    ///
    /// Values without a known standard mapping become [`Proprietary`](Self::Proprietary).
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::AnalogInput,
            1 => Self::AnalogOutput,
            2 => Self::AnalogValue,
            3 => Self::BinaryInput,
            4 => Self::BinaryOutput,
            5 => Self::BinaryValue,
            6 => Self::Calendar,
            7 => Self::Command,
            8 => Self::Device,
            9 => Self::EventEnrollment,
            10 => Self::File,
            11 => Self::Group,
            12 => Self::Loop,
            13 => Self::MultiStateInput,
            14 => Self::MultiStateOutput,
            15 => Self::NotificationClass,
            16 => Self::Program,
            17 => Self::Schedule,
            18 => Self::Averaging,
            19 => Self::MultiStateValue,
            20 => Self::TrendLog,
            21 => Self::LifeSafetyPoint,
            22 => Self::LifeSafetyZone,
            23 => Self::Accumulator,
            24 => Self::PulseConverter,
            25 => Self::EventLog,
            26 => Self::GlobalGroup,
            27 => Self::TrendLogMultiple,
            28 => Self::LoadControl,
            29 => Self::StructuredView,
            30 => Self::AccessDoor,
            32 => Self::AccessCredential,
            33 => Self::AccessPoint,
            34 => Self::AccessRights,
            35 => Self::AccessUser,
            36 => Self::AccessZone,
            37 => Self::CredentialDataInput,
            38 => Self::NetworkSecurity,
            39 => Self::BitStringValue,
            40 => Self::CharacterStringValue,
            41 => Self::DatePatternValue,
            42 => Self::DateValue,
            43 => Self::DateTimePatternValue,
            44 => Self::DateTimeValue,
            45 => Self::IntegerValue,
            46 => Self::LargeAnalogValue,
            47 => Self::OctetStringValue,
            48 => Self::PositiveIntegerValue,
            49 => Self::TimePatternValue,
            50 => Self::TimeValue,
            51 => Self::NotificationForwarder,
            52 => Self::AlertEnrollment,
            53 => Self::Channel,
            54 => Self::LightingOutput,
            v => Self::Proprietary(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectType;

    #[test]
    fn numeric_mapping_roundtrips() {
        for v in 0..=1023u16 {
            assert_eq!(ObjectType::from_u16(v).to_u16(), v);
        }
        assert_eq!(ObjectType::from_u16(8), ObjectType::Device);
        assert_eq!(ObjectType::from_u16(31), ObjectType::Proprietary(31));
    }
}
