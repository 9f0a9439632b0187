//! BACnet MS/TP (clause 9) framing: the header and data CRCs, frame
//! encode/decode, and an async reader that recovers frames from a noisy
//! RS-485 byte stream. The master-node token state machine is not here.

pub mod crc;
pub mod error;
pub mod frame;
pub mod reader;
pub mod serial;

pub use crc::{data_crc, header_crc};
pub use error::MstpError;
pub use frame::{
    FrameType, MstpFrame, MSTP_BROADCAST, MSTP_DATA_CRC_LEN, MSTP_HEADER_LEN, MSTP_MAX_NPDU,
    MSTP_PREAMBLE,
};
pub use reader::{write_frame, MstpFrameReader};
pub use serial::{open_port, open_reader, MSTP_BAUD_RATES};
