//! The two MS/TP checksums, computed bit-serially as ANSI/ASHRAE 135
//! Annex G describes them.

/// Folds one byte into the running header CRC-8 register.
pub fn header_crc_byte(data: u8, crc: u8) -> u8 {
    let mut crc = u16::from(crc ^ data);
    crc ^= (crc << 1) ^ (crc << 2) ^ (crc << 3) ^ (crc << 4) ^ (crc << 5) ^ (crc << 6) ^ (crc << 7);
    ((crc & 0xFE) ^ ((crc >> 8) & 1)) as u8
}

/// Header CRC over frame type, destination, source and the two length bytes,
/// already ones-complemented for transmission.
pub fn header_crc(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0xFF, |crc, &b| header_crc_byte(b, crc))
}

/// Folds one byte into the running data CRC-16 register.
pub fn data_crc_byte(data: u8, crc: u16) -> u16 {
    let low = (crc & 0xFF) ^ u16::from(data);
    (crc >> 8)
        ^ (low << 8)
        ^ (low << 3)
        ^ (low << 12)
        ^ (low >> 4)
        ^ (low & 0x0F)
        ^ ((low & 0x0F) << 7)
}

/// Data CRC, ones-complemented; it goes on the wire least significant byte first.
pub fn data_crc(bytes: &[u8]) -> u16 {
    !bytes.iter().fold(0xFFFF, |crc, &b| data_crc_byte(b, crc))
}

#[cfg(test)]
mod tests {
    use super::{data_crc, header_crc};

    #[test]
    fn annex_g_header_example() {
        // Token from station 5 to station 16
        assert_eq!(header_crc(&[0x00, 0x10, 0x05, 0x00, 0x00]), 0x8C);
    }

    #[test]
    fn annex_g_data_example() {
        assert_eq!(data_crc(&[0x01, 0x22, 0x30]), 0xBD10);
    }

    #[test]
    fn crc_covers_every_byte() {
        let base = header_crc(&[0x06, 0xFF, 0x01, 0x00, 0x04]);
        assert_ne!(base, header_crc(&[0x06, 0xFF, 0x02, 0x00, 0x04]));

        let data = [0x01, 0x00, 0x10, 0x08];
        let crc = data_crc(&data);
        for i in 0..data.len() {
            for bit in 0..8 {
                let mut flipped = data;
                flipped[i] ^= 1 << bit;
                assert_ne!(data_crc(&flipped), crc);
            }
        }
    }
}
