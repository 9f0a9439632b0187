use bacwire_core::{DecodeError, EncodeError};
use thiserror::Error;

/// Errors raised while framing or parsing BVLC messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BvlcError {
    #[error("not a BACnet/IP frame (type byte 0x{0:02x})")]
    BadType(u8),
    #[error("BVLC length {header} does not match frame length {actual}")]
    LengthMismatch { header: usize, actual: usize },
    #[error("unsupported BVLC function 0x{0:02x}")]
    UnsupportedFunction(u8),
    #[error("BVLC payload of {0} bytes is malformed")]
    MalformedPayload(usize),
    #[error("frame too large")]
    FrameTooLarge,
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}
