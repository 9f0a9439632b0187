use log::debug;
use tokio_serial::{DataBits, FlowControl, Parity, SerialStream, StopBits};

use crate::reader::MstpFrameReader;
use crate::MstpError;

/// Baud rates MS/TP devices are required or permitted to support.
pub const MSTP_BAUD_RATES: [u32; 6] = [9600, 19200, 38400, 57600, 76800, 115200];

/// Opens `path` as an MS/TP line: 8 data bits, no parity, one stop bit.
pub fn open_port(path: &str, baud_rate: u32) -> Result<SerialStream, MstpError> {
    let builder = tokio_serial::new(path, baud_rate)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None);
    let stream = SerialStream::open(&builder)?;
    debug!("opened mstp port {path} at {baud_rate} baud");
    Ok(stream)
}

/// Opens `path` and wraps it in a frame reader.
pub fn open_reader(
    path: &str,
    baud_rate: u32,
) -> Result<MstpFrameReader<SerialStream>, MstpError> {
    Ok(MstpFrameReader::new(open_port(path, baud_rate)?))
}
