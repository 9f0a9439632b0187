/// Segmentation capability advertised during device discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Segmentation {
    SegmentedBoth = 0,
    SegmentedTransmit = 1,
    SegmentedReceive = 2,
    NoSegmentation = 3,
}

/// Maximum APDU length accepted by a device, as carried in the confirmed request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MaxApdu {
    UpTo50 = 0,
    UpTo128 = 1,
    UpTo206 = 2,
    UpTo480 = 3,
    UpTo1024 = 4,
    UpTo1476 = 5,
}

/// Maximum number of segments a client accepts in a segmented response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MaxSegments {
    Unspecified = 0,
    Two = 1,
    Four = 2,
    Eight = 3,
    Sixteen = 4,
    ThirtyTwo = 5,
    SixtyFour = 6,
    MoreThanSixtyFour = 7,
}

/// BACnet error class reported in Error PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ErrorClass {
    Device = 0,
    Object = 1,
    Property = 2,
    Resources = 3,
    Security = 4,
    Services = 5,
    Vt = 6,
    Communication = 7,
}

/// BACnet error code reported in Error PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum ErrorCode {
    Other = 0,
    AuthenticationFailed = 1,
    ConfigurationInProgress = 2,
    DeviceBusy = 3,
    DynamicCreationNotSupported = 4,
    FileAccessDenied = 5,
    IncompatibleSecurityLevels = 6,
    InconsistentParameters = 7,
    InconsistentSelectionCriterion = 8,
    InvalidDataType = 9,
    InvalidFileAccessMethod = 10,
    InvalidFileStartPosition = 11,
    InvalidOperatorName = 12,
    InvalidParameterDataType = 13,
    InvalidTimeStamp = 14,
    KeyGenerationError = 15,
    MissingRequiredParameter = 16,
    NoObjectsOfSpecifiedType = 17,
    NoSpaceForObject = 18,
    NoSpaceToAddListElement = 19,
    NoSpaceToWriteProperty = 20,
    NoVtSessionsAvailable = 21,
    PropertyIsNotAList = 22,
    ObjectDeletionNotPermitted = 23,
    ObjectIdentifierAlreadyExists = 24,
    OperationalProblem = 25,
    PasswordFailure = 26,
    ReadAccessDenied = 27,
    SecurityNotSupported = 28,
    ServiceRequestDenied = 29,
    Timeout = 30,
    UnknownObject = 31,
    UnknownProperty = 32,
    UnknownVtClass = 34,
    UnknownVtSession = 35,
    UnsupportedObjectType = 36,
    ValueOutOfRange = 37,
    VtSessionAlreadyClosed = 38,
    VtSessionTerminationFailure = 39,
    WriteAccessDenied = 40,
    CharacterSetNotSupported = 41,
    InvalidArrayIndex = 42,
    CovSubscriptionFailed = 43,
    NotCovProperty = 44,
    OptionalFunctionalityNotSupported = 45,
    InvalidConfigurationData = 46,
    DatatypeNotSupported = 47,
    DuplicateName = 48,
    DuplicateObjectId = 49,
    PropertyIsNotAnArray = 50,
    AbortBufferOverflow = 51,
}

/// Reason carried in a Reject PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RejectReason {
    Other = 0,
    BufferOverflow = 1,
    InconsistentParameters = 2,
    InvalidParameterDataType = 3,
    InvalidTag = 4,
    MissingRequiredParameter = 5,
    ParameterOutOfRange = 6,
    TooManyArguments = 7,
    UndefinedEnumeration = 8,
    UnrecognizedService = 9,
}

/// Reason carried in an Abort PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AbortReason {
    Other = 0,
    BufferOverflow = 1,
    InvalidApduInThisState = 2,
    PreemptedByHigherPriorityTask = 3,
    SegmentationNotSupported = 4,
}

/// Event state of an object (`BACnetEventState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EventState {
    Normal = 0,
    Fault = 1,
    Offnormal = 2,
    HighLimit = 3,
    LowLimit = 4,
    LifeSafetyAlarm = 5,
}

/// Event algorithm type (`BACnetEventType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EventType {
    ChangeOfBitstring = 0,
    ChangeOfState = 1,
    ChangeOfValue = 2,
    CommandFailure = 3,
    FloatingLimit = 4,
    OutOfRange = 5,
    ChangeOfLifeSafety = 8,
    Extended = 9,
    BufferReady = 10,
    UnsignedRange = 11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NotifyType {
    Alarm = 0,
    Event = 1,
    AckNotification = 2,
}

/// Character set marker byte that leads every character string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CharacterSet {
    Utf8 = 0,
    MsDbcs = 1,
    JisC6226 = 2,
    Ucs4 = 3,
    Ucs2 = 4,
    Iso8859 = 5,
}

impl Segmentation {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::SegmentedBoth),
            1 => Some(Self::SegmentedTransmit),
            2 => Some(Self::SegmentedReceive),
            3 => Some(Self::NoSegmentation),
            _ => None,
        }
    }
}

impl MaxApdu {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::UpTo50),
            1 => Some(Self::UpTo128),
            2 => Some(Self::UpTo206),
            3 => Some(Self::UpTo480),
            4 => Some(Self::UpTo1024),
            5 => Some(Self::UpTo1476),
            _ => None,
        }
    }

    /// Largest APDU size in octets this code stands for.
    pub const fn octets(self) -> u16 {
        match self {
            Self::UpTo50 => 50,
            Self::UpTo128 => 128,
            Self::UpTo206 => 206,
            Self::UpTo480 => 480,
            Self::UpTo1024 => 1024,
            Self::UpTo1476 => 1476,
        }
    }

    /// Smallest code whose size covers `octets`.
    pub const fn for_octets(octets: u16) -> Self {
        if octets <= 50 {
            Self::UpTo50
        } else if octets <= 128 {
            Self::UpTo128
        } else if octets <= 206 {
            Self::UpTo206
        } else if octets <= 480 {
            Self::UpTo480
        } else if octets <= 1024 {
            Self::UpTo1024
        } else {
            Self::UpTo1476
        }
    }
}

impl MaxSegments {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Two),
            2 => Some(Self::Four),
            3 => Some(Self::Eight),
            4 => Some(Self::Sixteen),
            5 => Some(Self::ThirtyTwo),
            6 => Some(Self::SixtyFour),
            7 => Some(Self::MoreThanSixtyFour),
            _ => None,
        }
    }
}

impl ErrorClass {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Device),
            1 => Some(Self::Object),
            2 => Some(Self::Property),
            3 => Some(Self::Resources),
            4 => Some(Self::Security),
            5 => Some(Self::Services),
            6 => Some(Self::Vt),
            7 => Some(Self::Communication),
            _ => None,
        }
    }
}

impl ErrorCode {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Other),
            1 => Some(Self::AuthenticationFailed),
            2 => Some(Self::ConfigurationInProgress),
            3 => Some(Self::DeviceBusy),
            4 => Some(Self::DynamicCreationNotSupported),
            5 => Some(Self::FileAccessDenied),
            6 => Some(Self::IncompatibleSecurityLevels),
            7 => Some(Self::InconsistentParameters),
            8 => Some(Self::InconsistentSelectionCriterion),
            9 => Some(Self::InvalidDataType),
            10 => Some(Self::InvalidFileAccessMethod),
            11 => Some(Self::InvalidFileStartPosition),
            12 => Some(Self::InvalidOperatorName),
            13 => Some(Self::InvalidParameterDataType),
            14 => Some(Self::InvalidTimeStamp),
            15 => Some(Self::KeyGenerationError),
            16 => Some(Self::MissingRequiredParameter),
            17 => Some(Self::NoObjectsOfSpecifiedType),
            18 => Some(Self::NoSpaceForObject),
            19 => Some(Self::NoSpaceToAddListElement),
            20 => Some(Self::NoSpaceToWriteProperty),
            21 => Some(Self::NoVtSessionsAvailable),
            22 => Some(Self::PropertyIsNotAList),
            23 => Some(Self::ObjectDeletionNotPermitted),
            24 => Some(Self::ObjectIdentifierAlreadyExists),
            25 => Some(Self::OperationalProblem),
            26 => Some(Self::PasswordFailure),
            27 => Some(Self::ReadAccessDenied),
            28 => Some(Self::SecurityNotSupported),
            29 => Some(Self::ServiceRequestDenied),
            30 => Some(Self::Timeout),
            31 => Some(Self::UnknownObject),
            32 => Some(Self::UnknownProperty),
            34 => Some(Self::UnknownVtClass),
            35 => Some(Self::UnknownVtSession),
            36 => Some(Self::UnsupportedObjectType),
            37 => Some(Self::ValueOutOfRange),
            38 => Some(Self::VtSessionAlreadyClosed),
            39 => Some(Self::VtSessionTerminationFailure),
            40 => Some(Self::WriteAccessDenied),
            41 => Some(Self::CharacterSetNotSupported),
            42 => Some(Self::InvalidArrayIndex),
            43 => Some(Self::CovSubscriptionFailed),
            44 => Some(Self::NotCovProperty),
            45 => Some(Self::OptionalFunctionalityNotSupported),
            46 => Some(Self::InvalidConfigurationData),
            47 => Some(Self::DatatypeNotSupported),
            48 => Some(Self::DuplicateName),
            49 => Some(Self::DuplicateObjectId),
            50 => Some(Self::PropertyIsNotAnArray),
            51 => Some(Self::AbortBufferOverflow),
            _ => None,
        }
    }
}

impl RejectReason {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Other),
            1 => Some(Self::BufferOverflow),
            2 => Some(Self::InconsistentParameters),
            3 => Some(Self::InvalidParameterDataType),
            4 => Some(Self::InvalidTag),
            5 => Some(Self::MissingRequiredParameter),
            6 => Some(Self::ParameterOutOfRange),
            7 => Some(Self::TooManyArguments),
            8 => Some(Self::UndefinedEnumeration),
            9 => Some(Self::UnrecognizedService),
            _ => None,
        }
    }
}

impl AbortReason {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Other),
            1 => Some(Self::BufferOverflow),
            2 => Some(Self::InvalidApduInThisState),
            3 => Some(Self::PreemptedByHigherPriorityTask),
            4 => Some(Self::SegmentationNotSupported),
            _ => None,
        }
    }
}

impl EventState {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Fault),
            2 => Some(Self::Offnormal),
            3 => Some(Self::HighLimit),
            4 => Some(Self::LowLimit),
            5 => Some(Self::LifeSafetyAlarm),
            _ => None,
        }
    }
}

impl EventType {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::ChangeOfBitstring),
            1 => Some(Self::ChangeOfState),
            2 => Some(Self::ChangeOfValue),
            3 => Some(Self::CommandFailure),
            4 => Some(Self::FloatingLimit),
            5 => Some(Self::OutOfRange),
            8 => Some(Self::ChangeOfLifeSafety),
            9 => Some(Self::Extended),
            10 => Some(Self::BufferReady),
            11 => Some(Self::UnsignedRange),
            _ => None,
        }
    }
}

impl NotifyType {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Alarm),
            1 => Some(Self::Event),
            2 => Some(Self::AckNotification),
            _ => None,
        }
    }
}

impl CharacterSet {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Utf8),
            1 => Some(Self::MsDbcs),
            2 => Some(Self::JisC6226),
            3 => Some(Self::Ucs4),
            4 => Some(Self::Ucs2),
            5 => Some(Self::Iso8859),
            _ => None,
        }
    }
}

/// Service choice of a confirmed request, complex ack, simple ack or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ConfirmedService {
    AcknowledgeAlarm = 0,
    ConfirmedCovNotification = 1,
    ConfirmedEventNotification = 2,
    GetAlarmSummary = 3,
    GetEnrollmentSummary = 4,
    SubscribeCov = 5,
    AtomicReadFile = 6,
    AtomicWriteFile = 7,
    AddListElement = 8,
    RemoveListElement = 9,
    CreateObject = 10,
    DeleteObject = 11,
    ReadProperty = 12,
    ReadPropertyConditional = 13,
    ReadPropertyMultiple = 14,
    WriteProperty = 15,
    WritePropertyMultiple = 16,
    DeviceCommunicationControl = 17,
    ConfirmedPrivateTransfer = 18,
    ConfirmedTextMessage = 19,
    ReinitializeDevice = 20,
    VtOpen = 21,
    VtClose = 22,
    VtData = 23,
    Authenticate = 24,
    RequestKey = 25,
    ReadRange = 26,
    LifeSafetyOperation = 27,
    SubscribeCovProperty = 28,
    GetEventInformation = 29,
}

impl ConfirmedService {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::AcknowledgeAlarm),
            1 => Some(Self::ConfirmedCovNotification),
            2 => Some(Self::ConfirmedEventNotification),
            3 => Some(Self::GetAlarmSummary),
            4 => Some(Self::GetEnrollmentSummary),
            5 => Some(Self::SubscribeCov),
            6 => Some(Self::AtomicReadFile),
            7 => Some(Self::AtomicWriteFile),
            8 => Some(Self::AddListElement),
            9 => Some(Self::RemoveListElement),
            10 => Some(Self::CreateObject),
            11 => Some(Self::DeleteObject),
            12 => Some(Self::ReadProperty),
            13 => Some(Self::ReadPropertyConditional),
            14 => Some(Self::ReadPropertyMultiple),
            15 => Some(Self::WriteProperty),
            16 => Some(Self::WritePropertyMultiple),
            17 => Some(Self::DeviceCommunicationControl),
            18 => Some(Self::ConfirmedPrivateTransfer),
            19 => Some(Self::ConfirmedTextMessage),
            20 => Some(Self::ReinitializeDevice),
            21 => Some(Self::VtOpen),
            22 => Some(Self::VtClose),
            23 => Some(Self::VtData),
            24 => Some(Self::Authenticate),
            25 => Some(Self::RequestKey),
            26 => Some(Self::ReadRange),
            27 => Some(Self::LifeSafetyOperation),
            28 => Some(Self::SubscribeCovProperty),
            29 => Some(Self::GetEventInformation),
            _ => None,
        }
    }
}

/// Service choice of an unconfirmed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum UnconfirmedService {
    IAm = 0,
    IHave = 1,
    UnconfirmedCovNotification = 2,
    UnconfirmedEventNotification = 3,
    UnconfirmedPrivateTransfer = 4,
    UnconfirmedTextMessage = 5,
    TimeSynchronization = 6,
    WhoHas = 7,
    WhoIs = 8,
    UtcTimeSynchronization = 9,
    WriteGroup = 10,
}

impl UnconfirmedService {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::IAm),
            1 => Some(Self::IHave),
            2 => Some(Self::UnconfirmedCovNotification),
            3 => Some(Self::UnconfirmedEventNotification),
            4 => Some(Self::UnconfirmedPrivateTransfer),
            5 => Some(Self::UnconfirmedTextMessage),
            6 => Some(Self::TimeSynchronization),
            7 => Some(Self::WhoHas),
            8 => Some(Self::WhoIs),
            9 => Some(Self::UtcTimeSynchronization),
            10 => Some(Self::WriteGroup),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, MaxApdu, RejectReason, Segmentation};

    #[test]
    fn error_codes_map_both_ways() {
        assert_eq!(ErrorCode::from_u32(32), Some(ErrorCode::UnknownProperty));
        assert_eq!(ErrorCode::UnknownObject.to_u32(), 31);
        assert_eq!(ErrorCode::from_u32(33), None);
    }

    #[test]
    fn max_apdu_sizes() {
        assert_eq!(MaxApdu::UpTo1476.octets(), 1476);
        assert_eq!(MaxApdu::for_octets(480), MaxApdu::UpTo480);
        assert_eq!(MaxApdu::for_octets(481), MaxApdu::UpTo1024);
    }

    #[test]
    fn small_enums() {
        assert_eq!(Segmentation::from_u32(3), Some(Segmentation::NoSegmentation));
        assert_eq!(RejectReason::from_u32(9), Some(RejectReason::UnrecognizedService));
        assert_eq!(RejectReason::from_u32(10), None);
    }
}
