/// BACnet property identifiers.
///
/// Common standard properties are named variants; vendor-specific or
/// unrecognised identifiers use [`Proprietary`](Self::Proprietary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyId {
    AckedTransitions,
    AckRequired,
    Action,
    ActionText,
    ActiveText,
    All,
    ApduSegmentTimeout,
    ApduTimeout,
    ApplicationSoftwareVersion,
    NotificationClass,
    CovIncrement,
    DateList,
    Deadband,
    Description,
    DeviceAddressBinding,
    EffectivePeriod,
    EventEnable,
    EventState,
    EventParameters,
    EventType,
    ExceptionSchedule,
    FileAccessMethod,
    FileSize,
    FileType,
    FirmwareRevision,
    HighLimit,
    InactiveText,
    ListOfGroupMembers,
    ListOfObjectPropertyReferences,
    LocalDate,
    LocalTime,
    Location,
    LowLimit,
    MaxApduLengthAccepted,
    MaxInfoFrames,
    MaxMaster,
    ModelName,
    NumberOfApduRetries,
    NumberOfStates,
    ObjectIdentifier,
    ObjectList,
    ObjectName,
    ObjectPropertyReference,
    ObjectType,
    Optional,
    OutOfService,
    Polarity,
    PresentValue,
    Priority,
    PriorityArray,
    PriorityForWriting,
    ProtocolObjectTypesSupported,
    ProtocolServicesSupported,
    ProtocolVersion,
    RecipientList,
    Reliability,
    RelinquishDefault,
    Required,
    SegmentationSupported,
    StateText,
    StatusFlags,
    SystemStatus,
    TimeDelay,
    Units,
    UtcOffset,
    VendorIdentifier,
    VendorName,
    WeeklySchedule,
    BufferSize,
    EventTimeStamps,
    LogBuffer,
    LogDeviceObjectProperty,
    Enable,
    LogInterval,
    ProtocolRevision,
    RecordCount,
    StartTime,
    StopTime,
    TotalRecordCount,
    ActiveCovSubscriptions,
    DatabaseRevision,
    MaxSegmentsAccepted,
    ScheduleDefault,
    SubordinateList,
    ActualShedLevel,
    ExpectedShedLevel,
    RequestedShedLevel,
    PropertyList,
    Proprietary(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::AckedTransitions => 0,
            Self::AckRequired => 1,
            Self::Action => 2,
            Self::ActionText => 3,
            Self::ActiveText => 4,
            Self::All => 8,
            Self::ApduSegmentTimeout => 10,
            Self::ApduTimeout => 11,
            Self::ApplicationSoftwareVersion => 12,
            Self::NotificationClass => 17,
            Self::CovIncrement => 22,
            Self::DateList => 23,
            Self::Deadband => 25,
            Self::Description => 28,
            Self::DeviceAddressBinding => 30,
            Self::EffectivePeriod => 32,
            Self::EventEnable => 35,
            Self::EventState => 36,
            Self::EventParameters => 83,
            Self::EventType => 37,
            Self::ExceptionSchedule => 38,
            Self::FileAccessMethod => 41,
            Self::FileSize => 42,
            Self::FileType => 43,
            Self::FirmwareRevision => 44,
            Self::HighLimit => 45,
            Self::InactiveText => 46,
            Self::ListOfGroupMembers => 53,
            Self::ListOfObjectPropertyReferences => 54,
            Self::LocalDate => 56,
            Self::LocalTime => 57,
            Self::Location => 58,
            Self::LowLimit => 59,
            Self::MaxApduLengthAccepted => 62,
            Self::MaxInfoFrames => 63,
            Self::MaxMaster => 64,
            Self::ModelName => 70,
            Self::NumberOfApduRetries => 73,
            Self::NumberOfStates => 74,
            Self::ObjectIdentifier => 75,
            Self::ObjectList => 76,
            Self::ObjectName => 77,
            Self::ObjectPropertyReference => 78,
            Self::ObjectType => 79,
            Self::Optional => 80,
            Self::OutOfService => 81,
            Self::Polarity => 84,
            Self::PresentValue => 85,
            Self::Priority => 86,
            Self::PriorityArray => 87,
            Self::PriorityForWriting => 88,
            Self::ProtocolObjectTypesSupported => 96,
            Self::ProtocolServicesSupported => 97,
            Self::ProtocolVersion => 98,
            Self::RecipientList => 102,
            Self::Reliability => 103,
            Self::RelinquishDefault => 104,
            Self::Required => 105,
            Self::SegmentationSupported => 107,
            Self::StateText => 110,
            Self::StatusFlags => 111,
            Self::SystemStatus => 112,
            Self::TimeDelay => 113,
            Self::Units => 117,
            Self::UtcOffset => 119,
            Self::VendorIdentifier => 120,
            Self::VendorName => 121,
            Self::WeeklySchedule => 123,
            Self::BufferSize => 126,
            Self::EventTimeStamps => 130,
            Self::LogBuffer => 131,
            Self::LogDeviceObjectProperty => 132,
            Self::Enable => 133,
            Self::LogInterval => 134,
            Self::ProtocolRevision => 139,
            Self::RecordCount => 141,
            Self::StartTime => 142,
            Self::StopTime => 143,
            Self::TotalRecordCount => 145,
            Self::ActiveCovSubscriptions => 152,
            Self::DatabaseRevision => 155,
            Self::MaxSegmentsAccepted => 167,
            Self::ScheduleDefault => 174,
            Self::SubordinateList => 211,
            Self::ActualShedLevel => 212,
            Self::ExpectedShedLevel => 214,
            Self::RequestedShedLevel => 218,
            Self::PropertyList => 371,
            Self::Proprietary(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::AckedTransitions,
            1 => Self::AckRequired,
            2 => Self::Action,
            3 => Self::ActionText,
            4 => Self::ActiveText,
            8 => Self::All,
            10 => Self::ApduSegmentTimeout,
            11 => Self::ApduTimeout,
            12 => Self::ApplicationSoftwareVersion,
            17 => Self::NotificationClass,
            22 => Self::CovIncrement,
            23 => Self::DateList,
            25 => Self::Deadband,
            28 => Self::Description,
            30 => Self::DeviceAddressBinding,
            32 => Self::EffectivePeriod,
            35 => Self::EventEnable,
            36 => Self::EventState,
            83 => Self::EventParameters,
            37 => Self::EventType,
            38 => Self::ExceptionSchedule,
            41 => Self::FileAccessMethod,
            42 => Self::FileSize,
            43 => Self::FileType,
            44 => Self::FirmwareRevision,
            45 => Self::HighLimit,
            46 => Self::InactiveText,
            53 => Self::ListOfGroupMembers,
            54 => Self::ListOfObjectPropertyReferences,
            56 => Self::LocalDate,
            57 => Self::LocalTime,
            58 => Self::Location,
            59 => Self::LowLimit,
            62 => Self::MaxApduLengthAccepted,
            63 => Self::MaxInfoFrames,
            64 => Self::MaxMaster,
            70 => Self::ModelName,
            73 => Self::NumberOfApduRetries,
            74 => Self::NumberOfStates,
            75 => Self::ObjectIdentifier,
            76 => Self::ObjectList,
            77 => Self::ObjectName,
            78 => Self::ObjectPropertyReference,
            79 => Self::ObjectType,
            80 => Self::Optional,
            81 => Self::OutOfService,
            84 => Self::Polarity,
            85 => Self::PresentValue,
            86 => Self::Priority,
            87 => Self::PriorityArray,
            88 => Self::PriorityForWriting,
            96 => Self::ProtocolObjectTypesSupported,
            97 => Self::ProtocolServicesSupported,
            98 => Self::ProtocolVersion,
            102 => Self::RecipientList,
            103 => Self::Reliability,
            104 => Self::RelinquishDefault,
            105 => Self::Required,
            107 => Self::SegmentationSupported,
            110 => Self::StateText,
            111 => Self::StatusFlags,
            112 => Self::SystemStatus,
            113 => Self::TimeDelay,
            117 => Self::Units,
            119 => Self::UtcOffset,
            120 => Self::VendorIdentifier,
            121 => Self::VendorName,
            123 => Self::WeeklySchedule,
            126 => Self::BufferSize,
            130 => Self::EventTimeStamps,
            131 => Self::LogBuffer,
            132 => Self::LogDeviceObjectProperty,
            133 => Self::Enable,
            134 => Self::LogInterval,
            139 => Self::ProtocolRevision,
            141 => Self::RecordCount,
            142 => Self::StartTime,
            143 => Self::StopTime,
            145 => Self::TotalRecordCount,
            152 => Self::ActiveCovSubscriptions,
            155 => Self::DatabaseRevision,
            167 => Self::MaxSegmentsAccepted,
            174 => Self::ScheduleDefault,
            211 => Self::SubordinateList,
            212 => Self::ActualShedLevel,
            214 => Self::ExpectedShedLevel,
            218 => Self::RequestedShedLevel,
            371 => Self::PropertyList,
            v => Self::Proprietary(v),
        }
    }
}

impl From<u32> for PropertyId {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl From<PropertyId> for u32 {
    fn from(value: PropertyId) -> Self {
        value.to_u32()
    }
}
