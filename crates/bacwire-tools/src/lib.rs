use bacwire_core::types::ObjectType;
use clap::ValueEnum;
use thiserror::Error;

pub mod build;
pub mod dissect;

pub use build::{build_frame, LinkSpec, RequestSpec};
pub use dissect::{dissect, Dissection, Link, ServiceData};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("empty input")]
    Empty,
    #[error("unrecognised framing, first byte 0x{0:02x}")]
    UnknownFraming(u8),
    #[error("bvlc: {0}")]
    Bvlc(#[from] bacwire_datalink::BvlcError),
    #[error("mstp: {0}")]
    Mstp(#[from] bacwire_mstp::MstpError),
    #[error("decode: {0}")]
    Decode(#[from] bacwire_core::DecodeError),
    #[error("encode: {0}")]
    Encode(#[from] bacwire_core::EncodeError),
}

/// Outermost layer of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Framing {
    /// Guess from the leading bytes.
    Auto,
    Bvlc,
    Mstp,
    /// Bare NPDU with no data-link header.
    Npdu,
}

impl Framing {
    /// Resolves `Auto` by looking at the first bytes of `frame`.
    pub fn detect(self, frame: &[u8]) -> Result<Self, ToolError> {
        if self != Self::Auto {
            return Ok(self);
        }
        match frame {
            [] => Err(ToolError::Empty),
            [bacwire_datalink::BVLC_TYPE_BIP, ..] => Ok(Self::Bvlc),
            [0x55, 0xFF, ..] => Ok(Self::Mstp),
            [0x01, ..] => Ok(Self::Npdu),
            [b, ..] => Err(ToolError::UnknownFraming(*b)),
        }
    }
}

/// Parses hex such as `81 0b 00 0c`, `81:0B:00:0C` or `0x810b000c`.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, ToolError> {
    let text = text.trim();
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let digits: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ':' | '-' | ','))
        .collect();
    if digits.is_empty() {
        return Err(ToolError::Empty);
    }
    Ok(hex::decode(digits)?)
}

/// CLI-friendly names for the object types a request usually targets.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ObjectTypeArg {
    AnalogInput,
    AnalogOutput,
    AnalogValue,
    BinaryInput,
    BinaryOutput,
    BinaryValue,
    Calendar,
    Device,
    EventEnrollment,
    File,
    NotificationClass,
    Schedule,
    TrendLog,
    MultiStateInput,
    MultiStateOutput,
    MultiStateValue,
}

impl ObjectTypeArg {
    pub const fn into_object_type(self) -> ObjectType {
        match self {
            Self::AnalogInput => ObjectType::AnalogInput,
            Self::AnalogOutput => ObjectType::AnalogOutput,
            Self::AnalogValue => ObjectType::AnalogValue,
            Self::BinaryInput => ObjectType::BinaryInput,
            Self::BinaryOutput => ObjectType::BinaryOutput,
            Self::BinaryValue => ObjectType::BinaryValue,
            Self::Calendar => ObjectType::Calendar,
            Self::Device => ObjectType::Device,
            Self::EventEnrollment => ObjectType::EventEnrollment,
            Self::File => ObjectType::File,
            Self::NotificationClass => ObjectType::NotificationClass,
            Self::Schedule => ObjectType::Schedule,
            Self::TrendLog => ObjectType::TrendLog,
            Self::MultiStateInput => ObjectType::MultiStateInput,
            Self::MultiStateOutput => ObjectType::MultiStateOutput,
            Self::MultiStateValue => ObjectType::MultiStateValue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_separators_and_prefix() {
        assert_eq!(parse_hex("81 0b 00 0c").unwrap(), [0x81, 0x0B, 0x00, 0x0C]);
        assert_eq!(parse_hex("0x810B").unwrap(), [0x81, 0x0B]);
        assert_eq!(parse_hex("55:ff-00,10\n").unwrap(), [0x55, 0xFF, 0x00, 0x10]);
        assert!(matches!(parse_hex("  "), Err(ToolError::Empty)));
        assert!(matches!(parse_hex("abc"), Err(ToolError::Hex(_))));
    }

    #[test]
    fn framing_detection() {
        assert_eq!(Framing::Auto.detect(&[0x81, 0x0A]).unwrap(), Framing::Bvlc);
        assert_eq!(Framing::Auto.detect(&[0x55, 0xFF]).unwrap(), Framing::Mstp);
        assert_eq!(Framing::Auto.detect(&[0x01, 0x00]).unwrap(), Framing::Npdu);
        assert_eq!(Framing::Npdu.detect(&[0x81]).unwrap(), Framing::Npdu);
        assert!(matches!(
            Framing::Auto.detect(&[0x02]),
            Err(ToolError::UnknownFraming(0x02))
        ));
    }
}
