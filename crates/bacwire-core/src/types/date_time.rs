use core::fmt;

/// A BACnet date as it appears on the wire.
///
/// Any field may be `0xFF` ("unspecified"); [`Date::UNSPECIFIED`] has all
/// four fields unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    pub year_since_1900: u8,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

impl Date {
    pub const UNSPECIFIED: Self = Self {
        year_since_1900: 0xFF,
        month: 0xFF,
        day: 0xFF,
        weekday: 0xFF,
    };

    /// Builds a date from a calendar year. Years below 256 are taken as the
    /// raw wire byte; years 1900..=2154 are offset from 1900.
    pub const fn from_year(year: u16, month: u8, day: u8, weekday: u8) -> Option<Self> {
        let year_since_1900 = if year < 0x100 {
            year as u8
        } else if year >= 1900 && year <= 1900 + 254 {
            (year - 1900) as u8
        } else {
            return None;
        };
        Some(Self {
            year_since_1900,
            month,
            day,
            weekday,
        })
    }

    /// Calendar year, or `None` when unspecified.
    pub const fn year(&self) -> Option<u16> {
        if self.year_since_1900 == 0xFF {
            None
        } else {
            Some(1900 + self.year_since_1900 as u16)
        }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Self::UNSPECIFIED
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.year_since_1900, self.month, self.day, self.weekday]
    }

    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self {
            year_since_1900: b[0],
            month: b[1],
            day: b[2],
            weekday: b[3],
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year() {
            Some(y) => write!(f, "{y:04}")?,
            None => f.write_str("*")?,
        }
        for part in [self.month, self.day] {
            if part == 0xFF {
                f.write_str("-*")?;
            } else {
                write!(f, "-{part:02}")?;
            }
        }
        Ok(())
    }
}

/// A BACnet time of day with hundredths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
}

impl Time {
    pub const UNSPECIFIED: Self = Self {
        hour: 0xFF,
        minute: 0xFF,
        second: 0xFF,
        hundredths: 0xFF,
    };

    pub const fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> Self {
        Self {
            hour,
            minute,
            second,
            hundredths: (millisecond / 10) as u8,
        }
    }

    pub const fn millisecond(&self) -> u16 {
        self.hundredths as u16 * 10
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Self::UNSPECIFIED
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.hour, self.minute, self.second, self.hundredths]
    }

    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self {
            hour: b[0],
            minute: b[1],
            second: b[2],
            hundredths: b[3],
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unspecified() {
            return f.write_str("*:*:*");
        }
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hour, self.minute, self.second, self.hundredths
        )
    }
}

/// A date and time pair (`BACnetDateTime`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

#[cfg(test)]
mod tests {
    use super::{Date, Time};
    use alloc::string::ToString;

    #[test]
    fn year_offsets() {
        let d = Date::from_year(2024, 3, 15, 5).unwrap();
        assert_eq!(d.year_since_1900, 124);
        assert_eq!(d.year(), Some(2024));
        assert_eq!(Date::from_year(99, 1, 1, 1).unwrap().year_since_1900, 99);
        assert!(Date::from_year(1800, 1, 1, 1).is_none());
        assert_eq!(d.to_string(), "2024-03-15");
    }

    #[test]
    fn unspecified_sentinels() {
        assert!(Date::from_bytes([0xFF; 4]).is_unspecified());
        assert_eq!(Date::UNSPECIFIED.year(), None);
        assert!(Time::from_bytes([0xFF; 4]).is_unspecified());
        assert_eq!(Time::UNSPECIFIED.to_string(), "*:*:*");
    }

    #[test]
    fn hundredths_from_millis() {
        let t = Time::new(13, 45, 2, 370);
        assert_eq!(t.hundredths, 37);
        assert_eq!(t.millisecond(), 370);
    }
}
