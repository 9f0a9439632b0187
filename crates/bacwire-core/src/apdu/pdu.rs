use crate::apdu::{
    AbortPdu, ComplexAckHeader, ConfirmedRequestHeader, ErrorPdu, RejectPdu, SegmentAck,
    SimpleAck, UnconfirmedRequestHeader,
};
use crate::encoding::reader::Reader;
use crate::DecodeError;

/// Segmented-message flag (confirmed request, complex ack).
pub const PDU_SEGMENTED: u8 = 0b0000_1000;
/// More-follows flag (confirmed request, complex ack).
pub const PDU_MORE_FOLLOWS: u8 = 0b0000_0100;
/// Segmented-response-accepted flag (confirmed request).
pub const PDU_SEGMENTED_RESPONSE_ACCEPTED: u8 = 0b0000_0010;
/// Negative-ack flag (segment ack).
pub const PDU_NEGATIVE_ACK: u8 = 0b0000_0010;
/// Sent-by-server flag (segment ack, abort).
pub const PDU_SERVER: u8 = 0b0000_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ApduType {
    ConfirmedRequest = 0,
    UnconfirmedRequest = 1,
    SimpleAck = 2,
    ComplexAck = 3,
    SegmentAck = 4,
    Error = 5,
    Reject = 6,
    Abort = 7,
}

impl ApduType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::ConfirmedRequest),
            1 => Some(Self::UnconfirmedRequest),
            2 => Some(Self::SimpleAck),
            3 => Some(Self::ComplexAck),
            4 => Some(Self::SegmentAck),
            5 => Some(Self::Error),
            6 => Some(Self::Reject),
            7 => Some(Self::Abort),
            _ => None,
        }
    }

    /// PDU type held in the high nibble of the first APDU byte.
    pub fn of(first_byte: u8) -> Option<Self> {
        Self::from_u8(first_byte >> 4)
    }

    pub(crate) fn expect(self, first_byte: u8) -> Result<(), DecodeError> {
        if first_byte >> 4 == self as u8 {
            Ok(())
        } else {
            Err(DecodeError::InvalidValue)
        }
    }
}

/// Reads the invoke id of an APDU without decoding it.
///
/// Returns `None` for kinds without an invoke id at a fixed offset
/// (unconfirmed requests and segment acks) and for truncated input.
pub fn decoded_invoke_id(apdu: &[u8]) -> Option<u8> {
    let offset = match ApduType::of(*apdu.first()?)? {
        ApduType::SimpleAck
        | ApduType::ComplexAck
        | ApduType::Error
        | ApduType::Reject
        | ApduType::Abort => 1,
        ApduType::ConfirmedRequest => 2,
        ApduType::UnconfirmedRequest | ApduType::SegmentAck => return None,
    };
    apdu.get(offset).copied()
}

/// A decoded APDU header. The reader is left at the start of the service data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Apdu {
    ConfirmedRequest(ConfirmedRequestHeader),
    UnconfirmedRequest(UnconfirmedRequestHeader),
    SimpleAck(SimpleAck),
    ComplexAck(ComplexAckHeader),
    SegmentAck(SegmentAck),
    Error(ErrorPdu),
    Reject(RejectPdu),
    Abort(AbortPdu),
}

impl Apdu {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let kind = ApduType::of(r.peek_u8()?).ok_or(DecodeError::InvalidValue)?;
        Ok(match kind {
            ApduType::ConfirmedRequest => {
                Self::ConfirmedRequest(ConfirmedRequestHeader::decode(r)?)
            }
            ApduType::UnconfirmedRequest => {
                Self::UnconfirmedRequest(UnconfirmedRequestHeader::decode(r)?)
            }
            ApduType::SimpleAck => Self::SimpleAck(SimpleAck::decode(r)?),
            ApduType::ComplexAck => Self::ComplexAck(ComplexAckHeader::decode(r)?),
            ApduType::SegmentAck => Self::SegmentAck(SegmentAck::decode(r)?),
            ApduType::Error => Self::Error(ErrorPdu::decode(r)?),
            ApduType::Reject => Self::Reject(RejectPdu::decode(r)?),
            ApduType::Abort => Self::Abort(AbortPdu::decode(r)?),
        })
    }

    pub fn apdu_type(&self) -> ApduType {
        match self {
            Self::ConfirmedRequest(_) => ApduType::ConfirmedRequest,
            Self::UnconfirmedRequest(_) => ApduType::UnconfirmedRequest,
            Self::SimpleAck(_) => ApduType::SimpleAck,
            Self::ComplexAck(_) => ApduType::ComplexAck,
            Self::SegmentAck(_) => ApduType::SegmentAck,
            Self::Error(_) => ApduType::Error,
            Self::Reject(_) => ApduType::Reject,
            Self::Abort(_) => ApduType::Abort,
        }
    }

    pub fn invoke_id(&self) -> Option<u8> {
        match self {
            Self::ConfirmedRequest(h) => Some(h.invoke_id),
            Self::UnconfirmedRequest(_) => None,
            Self::SimpleAck(h) => Some(h.invoke_id),
            Self::ComplexAck(h) => Some(h.invoke_id),
            Self::SegmentAck(h) => Some(h.invoke_id),
            Self::Error(h) => Some(h.invoke_id),
            Self::Reject(h) => Some(h.invoke_id),
            Self::Abort(h) => Some(h.invoke_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decoded_invoke_id, Apdu, ApduType};
    use crate::encoding::reader::Reader;
    use crate::DecodeError;

    #[test]
    fn invoke_id_offsets() {
        assert_eq!(decoded_invoke_id(&[0x00, 0x05, 0x2A, 0x0C]), Some(0x2A));
        assert_eq!(decoded_invoke_id(&[0x20, 0x11, 0x0F]), Some(0x11));
        assert_eq!(decoded_invoke_id(&[0x30, 0x12, 0x0C]), Some(0x12));
        assert_eq!(decoded_invoke_id(&[0x50, 0x13, 0x0C]), Some(0x13));
        assert_eq!(decoded_invoke_id(&[0x60, 0x14, 0x02]), Some(0x14));
        assert_eq!(decoded_invoke_id(&[0x71, 0x15, 0x04]), Some(0x15));
        assert_eq!(decoded_invoke_id(&[0x10, 0x08]), None);
        assert_eq!(decoded_invoke_id(&[0x40, 0x01, 0x02, 0x03]), None);
        assert_eq!(decoded_invoke_id(&[0x00, 0x05]), None);
        assert_eq!(decoded_invoke_id(&[]), None);
        assert_eq!(decoded_invoke_id(&[0x80, 0x01]), None);
    }

    #[test]
    fn dispatch_by_type_nibble() {
        let data = [0x30, 0x07, 0x0C, 0xAA];
        let mut r = Reader::new(&data);
        let apdu = Apdu::decode(&mut r).unwrap();
        assert_eq!(apdu.apdu_type(), ApduType::ComplexAck);
        assert_eq!(apdu.invoke_id(), Some(7));
        assert_eq!(r.rest(), &[0xAA]);

        let mut r = Reader::new(&[0xF0]);
        assert_eq!(Apdu::decode(&mut r).unwrap_err(), DecodeError::InvalidValue);
    }
}
