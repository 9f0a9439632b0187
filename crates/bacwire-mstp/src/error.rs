use bacwire_core::EncodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MstpError {
    #[error("missing 0x55 0xFF preamble")]
    BadPreamble,
    #[error("frame truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },
    #[error("header CRC mismatch (frame 0x{received:02x}, computed 0x{computed:02x})")]
    HeaderCrc { received: u8, computed: u8 },
    #[error("data CRC mismatch (frame 0x{received:04x}, computed 0x{computed:04x})")]
    DataCrc { received: u16, computed: u16 },
    #[error("data length {0} exceeds the frame limit")]
    FrameTooLarge(usize),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),
}
