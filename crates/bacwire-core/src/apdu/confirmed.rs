use crate::apdu::pdu::{
    ApduType, PDU_MORE_FOLLOWS, PDU_NEGATIVE_ACK, PDU_SEGMENTED,
    PDU_SEGMENTED_RESPONSE_ACCEPTED, PDU_SERVER,
};
use crate::encoding::{
    primitives::{decode_unsigned, encode_app_enumerated},
    reader::Reader,
    tag::{ApplicationTag, Tag},
    writer::Writer,
};
use crate::types::{AbortReason, ConfirmedService, ErrorClass, ErrorCode, MaxApdu, RejectReason};
use crate::{DecodeError, EncodeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedRequestHeader {
    pub segmented: bool,
    pub more_follows: bool,
    pub segmented_response_accepted: bool,
    /// Max-segments code (0..=7).
    pub max_segments: u8,
    /// Max-APDU code (0..=15).
    pub max_apdu: u8,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service_choice: u8,
}

impl ConfirmedRequestHeader {
    /// An unsegmented request accepting 1476-octet responses.
    pub const fn new(service: ConfirmedService, invoke_id: u8) -> Self {
        Self {
            segmented: false,
            more_follows: false,
            segmented_response_accepted: false,
            max_segments: 0,
            max_apdu: MaxApdu::UpTo1476.to_u32() as u8,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice: service.to_u8(),
        }
    }

    pub fn service(&self) -> Option<ConfirmedService> {
        ConfirmedService::from_u8(self.service_choice)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::ConfirmedRequest as u8) << 4;
        if self.segmented {
            b0 |= PDU_SEGMENTED;
        }
        if self.more_follows {
            b0 |= PDU_MORE_FOLLOWS;
        }
        if self.segmented_response_accepted {
            b0 |= PDU_SEGMENTED_RESPONSE_ACCEPTED;
        }

        w.write_u8(b0)?;
        w.write_u8(((self.max_segments & 0x07) << 4) | (self.max_apdu & 0x0f))?;
        w.write_u8(self.invoke_id)?;
        if self.segmented {
            w.write_u8(self.sequence_number.unwrap_or(0))?;
            w.write_u8(self.proposed_window_size.unwrap_or(1))?;
        }
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        ApduType::ConfirmedRequest.expect(b0)?;
        let segmented = (b0 & PDU_SEGMENTED) != 0;
        let seg_apdu = r.read_u8()?;
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = if segmented {
            (Some(r.read_u8()?), Some(r.read_u8()?))
        } else {
            (None, None)
        };
        Ok(Self {
            segmented,
            more_follows: (b0 & PDU_MORE_FOLLOWS) != 0,
            segmented_response_accepted: (b0 & PDU_SEGMENTED_RESPONSE_ACCEPTED) != 0,
            max_segments: (seg_apdu >> 4) & 0x07,
            max_apdu: seg_apdu & 0x0f,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service_choice: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexAckHeader {
    pub segmented: bool,
    pub more_follows: bool,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service_choice: u8,
}

impl ComplexAckHeader {
    pub const fn new(service: ConfirmedService, invoke_id: u8) -> Self {
        Self {
            segmented: false,
            more_follows: false,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice: service.to_u8(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::ComplexAck as u8) << 4;
        if self.segmented {
            b0 |= PDU_SEGMENTED;
        }
        if self.more_follows {
            b0 |= PDU_MORE_FOLLOWS;
        }
        w.write_u8(b0)?;
        w.write_u8(self.invoke_id)?;
        if self.segmented {
            w.write_u8(self.sequence_number.unwrap_or(0))?;
            w.write_u8(self.proposed_window_size.unwrap_or(1))?;
        }
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        ApduType::ComplexAck.expect(b0)?;

        let segmented = (b0 & PDU_SEGMENTED) != 0;
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = if segmented {
            (Some(r.read_u8()?), Some(r.read_u8()?))
        } else {
            (None, None)
        };

        Ok(Self {
            segmented,
            more_follows: (b0 & PDU_MORE_FOLLOWS) != 0,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service_choice: r.read_u8()?,
        })
    }

    /// Checks that this ack answers `service`.
    pub fn expect_service(&self, service: ConfirmedService) -> Result<(), DecodeError> {
        if self.service_choice == service.to_u8() {
            Ok(())
        } else {
            Err(DecodeError::InvalidValue)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleAck {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl SimpleAck {
    pub const fn new(service: ConfirmedService, invoke_id: u8) -> Self {
        Self {
            invoke_id,
            service_choice: service.to_u8(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::SimpleAck as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        ApduType::SimpleAck.expect(r.read_u8()?)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

/// Error PDU: the failed service plus error class and code.
///
/// Class and code are absent only when a peer sends a bare header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorPdu {
    pub invoke_id: u8,
    pub service_choice: u8,
    pub error_class: Option<u32>,
    pub error_code: Option<u32>,
}

impl ErrorPdu {
    pub const fn new(
        service: ConfirmedService,
        invoke_id: u8,
        class: ErrorClass,
        code: ErrorCode,
    ) -> Self {
        Self {
            invoke_id,
            service_choice: service.to_u8(),
            error_class: Some(class.to_u32()),
            error_code: Some(code.to_u32()),
        }
    }

    pub fn class(&self) -> Option<ErrorClass> {
        self.error_class.and_then(ErrorClass::from_u32)
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.error_code.and_then(ErrorCode::from_u32)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::Error as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)?;
        if let (Some(class), Some(code)) = (self.error_class, self.error_code) {
            encode_app_enumerated(w, class)?;
            encode_app_enumerated(w, code)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        ApduType::Error.expect(r.read_u8()?)?;
        let invoke_id = r.read_u8()?;
        let service_choice = r.read_u8()?;
        let mut error_class = None;
        let mut error_code = None;
        if !r.is_empty() {
            match Tag::decode(r)? {
                Tag::Opening { tag_num: 0 } => {
                    let class_tag = Tag::decode(r)?;
                    error_class = Some(decode_error_value(r, class_tag, 0)?);
                    let code_tag = Tag::decode(r)?;
                    error_code = Some(decode_error_value(r, code_tag, 1)?);
                    match Tag::decode(r)? {
                        Tag::Closing { tag_num: 0 } => {}
                        _ => return Err(DecodeError::InvalidTag),
                    }
                }
                first_tag => {
                    error_class = Some(decode_error_value(r, first_tag, 0)?);
                    let second_tag = Tag::decode(r)?;
                    error_code = Some(decode_error_value(r, second_tag, 1)?);
                }
            }
        }
        Ok(Self {
            invoke_id,
            service_choice,
            error_class,
            error_code,
        })
    }
}

/// Error class/code arrive as application enumerated values, or as context
/// tags from some routers.
fn decode_error_value(
    r: &mut Reader<'_>,
    tag: Tag,
    expected_ctx_tag: u8,
) -> Result<u32, DecodeError> {
    match tag {
        Tag::Context { tag_num, len } if tag_num == expected_ctx_tag => {
            decode_unsigned(r, len as usize)
        }
        Tag::Application {
            tag: ApplicationTag::Enumerated,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectPdu {
    pub invoke_id: u8,
    pub reason: u8,
}

impl RejectPdu {
    pub const fn new(invoke_id: u8, reason: RejectReason) -> Self {
        Self {
            invoke_id,
            reason: reason.to_u32() as u8,
        }
    }

    pub fn reason(&self) -> Option<RejectReason> {
        RejectReason::from_u32(self.reason as u32)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::Reject as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        ApduType::Reject.expect(r.read_u8()?)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbortPdu {
    pub server: bool,
    pub invoke_id: u8,
    pub reason: u8,
}

impl AbortPdu {
    pub const fn new(server: bool, invoke_id: u8, reason: AbortReason) -> Self {
        Self {
            server,
            invoke_id,
            reason: reason.to_u32() as u8,
        }
    }

    pub fn reason(&self) -> Option<AbortReason> {
        AbortReason::from_u32(self.reason as u32)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::Abort as u8) << 4;
        if self.server {
            b0 |= PDU_SERVER;
        }
        w.write_u8(b0)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        ApduType::Abort.expect(b0)?;
        Ok(Self {
            server: (b0 & PDU_SERVER) != 0,
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentAck {
    pub negative_ack: bool,
    pub sent_by_server: bool,
    pub invoke_id: u8,
    pub sequence_number: u8,
    pub actual_window_size: u8,
}

impl SegmentAck {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::SegmentAck as u8) << 4;
        if self.negative_ack {
            b0 |= PDU_NEGATIVE_ACK;
        }
        if self.sent_by_server {
            b0 |= PDU_SERVER;
        }
        w.write_u8(b0)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.sequence_number)?;
        w.write_u8(self.actual_window_size)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        ApduType::SegmentAck.expect(b0)?;
        Ok(Self {
            negative_ack: (b0 & PDU_NEGATIVE_ACK) != 0,
            sent_by_server: (b0 & PDU_SERVER) != 0,
            invoke_id: r.read_u8()?,
            sequence_number: r.read_u8()?,
            actual_window_size: r.read_u8()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AbortReason, ConfirmedService, ErrorClass, ErrorCode, RejectReason};

    fn written<F>(encode: F) -> alloc::vec::Vec<u8>
    where
        F: FnOnce(&mut Writer<'_>) -> Result<(), EncodeError>,
    {
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        encode(&mut w).unwrap();
        w.as_written().to_vec()
    }

    #[test]
    fn confirmed_header_layout() {
        let h = ConfirmedRequestHeader::new(ConfirmedService::ReadProperty, 1);
        assert_eq!(written(|w| h.encode(w)), [0x00, 0x05, 0x01, 0x0C]);

        let seg = ConfirmedRequestHeader {
            segmented: true,
            more_follows: true,
            segmented_response_accepted: true,
            max_segments: 7,
            sequence_number: Some(3),
            proposed_window_size: Some(4),
            ..h
        };
        let bytes = written(|w| seg.encode(w));
        assert_eq!(bytes, [0x0E, 0x75, 0x01, 0x03, 0x04, 0x0C]);
        let mut r = Reader::new(&bytes);
        assert_eq!(ConfirmedRequestHeader::decode(&mut r).unwrap(), seg);
    }

    #[test]
    fn complex_ack_segment_fields() {
        let h = ComplexAckHeader {
            segmented: true,
            sequence_number: Some(2),
            proposed_window_size: Some(8),
            ..ComplexAckHeader::new(ConfirmedService::ReadRange, 9)
        };
        let bytes = written(|w| h.encode(w));
        assert_eq!(bytes, [0x38, 0x09, 0x02, 0x08, 0x1A]);
        let mut r = Reader::new(&bytes);
        let got = ComplexAckHeader::decode(&mut r).unwrap();
        assert_eq!(got, h);
        assert!(got.expect_service(ConfirmedService::ReadRange).is_ok());
        assert!(got.expect_service(ConfirmedService::ReadProperty).is_err());
    }

    #[test]
    fn error_pdu_decodes_without_details() {
        let mut r = Reader::new(&[0x50, 1, 15]);
        let e = ErrorPdu::decode(&mut r).unwrap();
        assert_eq!(e.invoke_id, 1);
        assert_eq!(e.service_choice, 15);
        assert_eq!(e.error_class, None);
        assert_eq!(e.error_code, None);
    }

    #[test]
    fn error_pdu_decodes_context_details() {
        let mut r = Reader::new(&[0x50, 1, 15, 0x09, 0x02, 0x19, 0x20]);
        let e = ErrorPdu::decode(&mut r).unwrap();
        assert_eq!(e.class(), Some(ErrorClass::Property));
        assert_eq!(e.code(), Some(ErrorCode::UnknownProperty));
    }

    #[test]
    fn error_pdu_decodes_opening_wrapped_details() {
        let mut r = Reader::new(&[0x50, 1, 15, 0x0E, 0x91, 0x02, 0x91, 0x20, 0x0F]);
        let e = ErrorPdu::decode(&mut r).unwrap();
        assert_eq!(e.error_class, Some(2));
        assert_eq!(e.error_code, Some(32));
    }

    #[test]
    fn error_pdu_roundtrip() {
        let e = ErrorPdu::new(
            ConfirmedService::WriteProperty,
            4,
            ErrorClass::Property,
            ErrorCode::WriteAccessDenied,
        );
        let bytes = written(|w| e.encode(w));
        assert_eq!(bytes, [0x50, 0x04, 0x0F, 0x91, 0x02, 0x91, 0x28]);
        let mut r = Reader::new(&bytes);
        assert_eq!(ErrorPdu::decode(&mut r).unwrap(), e);
    }

    #[test]
    fn reject_and_abort_roundtrip() {
        let reject = RejectPdu::new(3, RejectReason::UnrecognizedService);
        let bytes = written(|w| reject.encode(w));
        assert_eq!(bytes, [0x60, 0x03, 0x09]);
        let mut r = Reader::new(&bytes);
        assert_eq!(
            RejectPdu::decode(&mut r).unwrap().reason(),
            Some(RejectReason::UnrecognizedService)
        );

        let abort = AbortPdu::new(true, 5, AbortReason::SegmentationNotSupported);
        let bytes = written(|w| abort.encode(w));
        assert_eq!(bytes, [0x71, 0x05, 0x04]);
        let mut r = Reader::new(&bytes);
        assert_eq!(AbortPdu::decode(&mut r).unwrap(), abort);
    }

    #[test]
    fn segment_ack_roundtrip() {
        let ack = SegmentAck {
            negative_ack: true,
            sent_by_server: false,
            invoke_id: 6,
            sequence_number: 10,
            actual_window_size: 4,
        };
        let bytes = written(|w| ack.encode(w));
        assert_eq!(bytes, [0x42, 0x06, 0x0A, 0x04]);
        let mut r = Reader::new(&bytes);
        assert_eq!(SegmentAck::decode(&mut r).unwrap(), ack);
    }

    #[test]
    fn simple_ack_rejects_other_types() {
        let mut r = Reader::new(&[0x30, 0x01, 0x0F]);
        assert_eq!(SimpleAck::decode(&mut r).unwrap_err(), DecodeError::InvalidValue);
    }
}
