use crate::EncodeError;

/// Forward-only cursor over a caller-owned output buffer.
///
/// A writer created with [`Writer::sizing`] has no buffer: it only counts the
/// bytes every encoder would produce, so the same encode path answers "how big
/// will this be".
#[derive(Debug)]
pub struct Writer<'a> {
    buf: Option<&'a mut [u8]>,
    pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf: Some(buf),
            pos: 0,
        }
    }

    pub fn sizing() -> Writer<'static> {
        Writer { buf: None, pos: 0 }
    }

    pub fn is_sizing(&self) -> bool {
        self.buf.is_none()
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        match &self.buf {
            Some(buf) => buf.len().saturating_sub(self.pos),
            None => usize::MAX,
        }
    }

    pub fn as_written(&self) -> &[u8] {
        match &self.buf {
            Some(buf) => &buf[..self.pos],
            None => &[],
        }
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.write_all(&[value])
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        let end = self
            .pos
            .checked_add(data.len())
            .ok_or(EncodeError::BufferTooSmall)?;
        if let Some(buf) = self.buf.as_deref_mut() {
            let dst = buf
                .get_mut(self.pos..end)
                .ok_or(EncodeError::BufferTooSmall)?;
            dst.copy_from_slice(data);
        }
        self.pos = end;
        Ok(())
    }

    pub fn write_be_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_all(&value.to_be_bytes())
    }

    pub fn write_le_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_all(&value.to_le_bytes())
    }

    pub fn write_be_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.write_all(&value.to_be_bytes())
    }

    /// Overwrites two already-written bytes at `at` with `value` big-endian.
    pub fn patch_be_u16(&mut self, at: usize, value: u16) -> Result<(), EncodeError> {
        if at.checked_add(2).map_or(true, |end| end > self.pos) {
            return Err(EncodeError::InvalidLength);
        }
        if let Some(buf) = self.buf.as_deref_mut() {
            buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
        }
        Ok(())
    }
}

/// Runs `encode` against a sizing writer and returns the byte count.
pub fn encoded_size<F>(encode: F) -> Result<usize, EncodeError>
where
    F: FnOnce(&mut Writer<'_>) -> Result<(), EncodeError>,
{
    let mut w = Writer::sizing();
    encode(&mut w)?;
    Ok(w.position())
}
