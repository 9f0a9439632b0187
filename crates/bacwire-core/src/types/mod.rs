pub mod address;
pub mod application_value;
pub mod bit_string;
pub mod date_time;
pub mod enums;
pub mod object_id;
pub mod object_type;
pub mod property;
pub mod property_id;
pub mod time_stamp;

pub use address::{LinkType, NetworkAddress};
pub use application_value::ApplicationValue;
pub use bit_string::{BitString, MAX_BITSTRING_BITS, MAX_BITSTRING_BYTES};
pub use date_time::{Date, DateTime, Time};
pub use enums::{
    AbortReason, CharacterSet, ConfirmedService, ErrorClass, ErrorCode, EventState, EventType,
    MaxApdu, MaxSegments, NotifyType, RejectReason, Segmentation, UnconfirmedService,
};
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property::{PropertyReference, PropertyValue};
pub use property_id::PropertyId;
pub use time_stamp::TimeStamp;
