use core::fmt;
use core::str::FromStr;

use crate::DecodeError;

/// Maximum number of data bytes a [`BitString`] holds.
pub const MAX_BITSTRING_BYTES: usize = 15;
/// Maximum number of bits a [`BitString`] holds.
pub const MAX_BITSTRING_BITS: u8 = (MAX_BITSTRING_BYTES * 8) as u8;

/// A BACnet bit string of up to 120 bits.
///
/// Logical bit `i` lives at `bytes[i / 8] & (1 << (i % 8))`. The wire form
/// stores each byte bit-reversed so that bit 0 is the most significant bit of
/// the first data byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString {
    bits_used: u8,
    bytes: [u8; MAX_BITSTRING_BYTES],
}

impl BitString {
    pub const fn new() -> Self {
        Self {
            bits_used: 0,
            bytes: [0; MAX_BITSTRING_BYTES],
        }
    }

    /// Builds a bit string from booleans, bit 0 first. Returns `None` past 120 bits.
    pub fn from_bits(bits: &[bool]) -> Option<Self> {
        let mut out = Self::new();
        for (i, bit) in bits.iter().enumerate() {
            if !out.set_bit(u8::try_from(i).ok()?, *bit) {
                return None;
            }
        }
        Some(out)
    }

    pub const fn len(&self) -> u8 {
        self.bits_used
    }

    pub const fn is_empty(&self) -> bool {
        self.bits_used == 0
    }

    /// Number of data bytes on the wire.
    pub const fn byte_len(&self) -> usize {
        (self.bits_used as usize + 7) / 8
    }

    /// Unused trailing bits in the last data byte.
    pub const fn unused_bits(&self) -> u8 {
        (self.byte_len() * 8 - self.bits_used as usize) as u8
    }

    pub fn get_bit(&self, bit: u8) -> bool {
        if bit >= self.bits_used {
            return false;
        }
        self.bytes[bit as usize / 8] & (1 << (bit % 8)) != 0
    }

    /// Sets `bit`, growing the string when needed. Returns `false` past 120 bits.
    pub fn set_bit(&mut self, bit: u8, value: bool) -> bool {
        if bit >= MAX_BITSTRING_BITS {
            return false;
        }
        let mask = 1 << (bit % 8);
        if value {
            self.bytes[bit as usize / 8] |= mask;
        } else {
            self.bytes[bit as usize / 8] &= !mask;
        }
        if bit >= self.bits_used {
            self.bits_used = bit + 1;
        }
        true
    }

    /// Data byte `index` in wire order.
    pub(crate) fn wire_byte(&self, index: usize) -> u8 {
        self.bytes[index].reverse_bits()
    }

    /// Rebuilds a bit string from its wire form: an unused-bits count and data bytes.
    pub fn from_wire(unused_bits: u8, data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() > MAX_BITSTRING_BYTES {
            return Err(DecodeError::InvalidLength);
        }
        if unused_bits > 7 || (data.is_empty() && unused_bits != 0) {
            return Err(DecodeError::InvalidValue);
        }
        let mut out = Self::new();
        for (i, b) in data.iter().enumerate() {
            out.bytes[i] = b.reverse_bits();
        }
        out.bits_used = (data.len() * 8) as u8 - unused_bits;
        // Padding bits carry no meaning; keep equality on logical bits only.
        if let Some(last) = data.len().checked_sub(1) {
            let keep = 8 - unused_bits;
            if keep < 8 {
                out.bytes[last] &= (1u8 << keep) - 1;
            }
        }
        Ok(out)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.bits_used {
            f.write_str(if self.get_bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({self})")
    }
}

impl FromStr for BitString {
    type Err = DecodeError;

    /// Parses `"1011"`-style text, first character is bit 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = Self::new();
        for (i, c) in s.chars().enumerate() {
            let bit = u8::try_from(i).map_err(|_| DecodeError::InvalidLength)?;
            let value = match c {
                '1' => true,
                '0' => false,
                _ => return Err(DecodeError::InvalidValue),
            };
            if !out.set_bit(bit, value) {
                return Err(DecodeError::InvalidLength);
            }
        }
        Ok(out)
    }
}
