/// Confirmed-service request/response headers and error PDUs.
pub mod confirmed;
/// APDU type discriminant, flags and the header dispatcher.
pub mod pdu;
/// Unconfirmed-service request header.
pub mod unconfirmed;

pub use confirmed::{
    AbortPdu, ComplexAckHeader, ConfirmedRequestHeader, ErrorPdu, RejectPdu, SegmentAck,
    SimpleAck,
};
pub use pdu::{decoded_invoke_id, Apdu, ApduType};
pub use unconfirmed::UnconfirmedRequestHeader;
