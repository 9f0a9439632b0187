use log::{debug, trace, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::frame::{parse_header, MstpFrame, MSTP_HEADER_LEN, MSTP_MAX_NPDU, MSTP_PREAMBLE};
use crate::MstpError;

const READ_CHUNK: usize = 512;

/// Pulls MS/TP frames out of a byte stream, typically an RS-485 serial port.
///
/// Line noise before a preamble is skipped. Frames with a bad header CRC,
/// an oversized data length or a bad data CRC are dropped and the reader
/// resynchronises on the next preamble.
pub struct MstpFrameReader<R> {
    inner: R,
    buf: Vec<u8>,
    max_data_len: usize,
}

impl<R: AsyncRead + Unpin> MstpFrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(READ_CHUNK * 2),
            max_data_len: MSTP_MAX_NPDU,
        }
    }

    /// Largest data field accepted; longer frames are discarded.
    pub fn max_data_len(mut self, max: usize) -> Self {
        self.max_data_len = max;
        self
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Next valid frame, or `None` once the stream ends.
    pub async fn next_frame(&mut self) -> Result<Option<MstpFrame>, MstpError> {
        loop {
            if let Some(frame) = self.take_buffered() {
                return Ok(Some(frame));
            }
            let mut chunk = [0u8; READ_CHUNK];
            let n = self.inner.read(&mut chunk).await?;
            if n == 0 {
                if !self.buf.is_empty() {
                    trace!("mstp stream ended with {} unparsed bytes", self.buf.len());
                }
                return Ok(None);
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    fn take_buffered(&mut self) -> Option<MstpFrame> {
        loop {
            self.sync_to_preamble();
            if self.buf.len() < MSTP_HEADER_LEN {
                return None;
            }
            let header = match parse_header(&self.buf) {
                Ok(header) => header,
                Err(err) => {
                    debug!("dropping mstp header: {err}");
                    self.buf.drain(..1);
                    continue;
                }
            };
            if header.data_len > self.max_data_len {
                warn!(
                    "dropping mstp frame from {}: data length {} exceeds {}",
                    header.source, header.data_len, self.max_data_len
                );
                self.buf.drain(..MSTP_HEADER_LEN);
                continue;
            }
            let total = header.frame_len();
            if self.buf.len() < total {
                return None;
            }
            match MstpFrame::decode(&self.buf[..total]) {
                Ok((frame, used)) => {
                    self.buf.drain(..used);
                    trace!(
                        "mstp {:?} {} -> {} ({} data bytes)",
                        frame.frame_type,
                        frame.source,
                        frame.destination,
                        frame.data.len()
                    );
                    return Some(frame);
                }
                Err(err) => {
                    debug!("dropping mstp frame from {}: {err}", header.source);
                    self.buf.drain(..MSTP_HEADER_LEN);
                }
            }
        }
    }

    /// Discards bytes up to the next preamble, keeping a trailing 0x55 that
    /// may start one.
    fn sync_to_preamble(&mut self) {
        let start = self
            .buf
            .windows(2)
            .position(|w| w == MSTP_PREAMBLE)
            .unwrap_or_else(|| match self.buf.last() {
                Some(&b) if b == MSTP_PREAMBLE[0] => self.buf.len() - 1,
                _ => self.buf.len(),
            });
        if start > 0 {
            trace!("skipping {start} bytes before mstp preamble");
            self.buf.drain(..start);
        }
    }
}

/// Encodes `frame` and writes it out in one call.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    out: &mut W,
    frame: &MstpFrame,
) -> Result<(), MstpError> {
    let bytes = frame.to_vec()?;
    out.write_all(&bytes).await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameType, MSTP_BROADCAST};

    fn who_is_frame() -> MstpFrame {
        MstpFrame::data(MSTP_BROADCAST, 7, vec![0x01, 0x00, 0x10, 0x08], false)
    }

    #[tokio::test]
    async fn reads_back_to_back_frames() {
        let mut stream = MstpFrame::token(3, 2).to_vec().unwrap();
        stream.extend(who_is_frame().to_vec().unwrap());

        let mut reader = MstpFrameReader::new(stream.as_slice());
        let first = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(first.frame_type, FrameType::Token);
        assert_eq!(reader.next_frame().await.unwrap(), Some(who_is_frame()));
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn skips_noise_and_corrupt_frames() {
        let mut stream = vec![0x00, 0x55, 0x13, 0xFF];
        let mut corrupt = who_is_frame().to_vec().unwrap();
        corrupt[9] ^= 0x01;
        stream.extend(&corrupt);
        let mut bad_header = MstpFrame::token(1, 2).to_vec().unwrap();
        bad_header[7] ^= 0xFF;
        stream.extend(&bad_header);
        stream.extend(who_is_frame().to_vec().unwrap());

        let mut reader = MstpFrameReader::new(stream.as_slice());
        assert_eq!(reader.next_frame().await.unwrap(), Some(who_is_frame()));
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn oversized_frames_are_dropped() {
        let big = MstpFrame::data(1, 2, vec![0xAA; 40], true);
        let mut stream = big.to_vec().unwrap();
        stream.extend(who_is_frame().to_vec().unwrap());

        let mut reader = MstpFrameReader::new(stream.as_slice()).max_data_len(16);
        assert_eq!(reader.next_frame().await.unwrap(), Some(who_is_frame()));
    }

    #[tokio::test]
    async fn frame_split_across_writes() {
        let (mut tx, rx) = tokio::io::duplex(64);
        let bytes = who_is_frame().to_vec().unwrap();
        let (head, tail) = bytes.split_at(5);
        let (head, tail) = (head.to_vec(), tail.to_vec());

        let writer = tokio::spawn(async move {
            tx.write_all(&head).await.unwrap();
            tokio::task::yield_now().await;
            tx.write_all(&tail).await.unwrap();
            write_frame(&mut tx, &MstpFrame::token(9, 8)).await.unwrap();
        });

        let mut reader = MstpFrameReader::new(rx);
        assert_eq!(reader.next_frame().await.unwrap(), Some(who_is_frame()));
        let token = reader.next_frame().await.unwrap().unwrap();
        assert_eq!((token.destination, token.source), (9, 8));
        writer.await.unwrap();
        assert!(reader.next_frame().await.unwrap().is_none());
    }
}
