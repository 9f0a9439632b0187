use std::net::SocketAddrV4;

use bacwire_core::encoding::writer::{encoded_size, Writer};
use bacwire_core::npdu::Npdu;
use bacwire_core::services::{
    read_property::ReadPropertyRequest, who_is::WhoIsRequest, write_property::WritePropertyRequest,
};
use bacwire_core::types::{ApplicationValue, NetworkAddress, ObjectId, PropertyReference};
use bacwire_core::EncodeError;
use bacwire_datalink::BvlcMessage;
use bacwire_mstp::MstpFrame;
use log::debug;

use crate::ToolError;

/// A request `bacencode` knows how to build.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestSpec {
    WhoIs(WhoIsRequest),
    ReadProperty(ReadPropertyRequest),
    WriteProperty(WritePropertyRequest),
}

impl RequestSpec {
    pub fn read_property(object_id: ObjectId, property: PropertyReference, invoke_id: u8) -> Self {
        Self::ReadProperty(ReadPropertyRequest::new(object_id, property, invoke_id))
    }

    pub fn write_property(
        object_id: ObjectId,
        property: PropertyReference,
        value: ApplicationValue,
        priority: Option<u8>,
        invoke_id: u8,
    ) -> Self {
        let mut request = WritePropertyRequest::new(object_id, property, value, invoke_id);
        request.priority = priority;
        Self::WriteProperty(request)
    }

    pub fn expecting_reply(&self) -> bool {
        !matches!(self, Self::WhoIs(_))
    }

    fn encode_apdu(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::WhoIs(req) => req.encode(w),
            Self::ReadProperty(req) => req.encode(w),
            Self::WriteProperty(req) => req.encode(w),
        }
    }

    fn encode_with(&self, npdu: &Npdu, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        npdu.encode(w)?;
        self.encode_apdu(w)
    }

    /// NPDU header plus APDU, optionally routed to a remote network.
    pub fn to_npdu(&self, destination: Option<NetworkAddress>) -> Result<Vec<u8>, ToolError> {
        let mut npdu = Npdu::application(self.expecting_reply());
        if let Some(dest) = destination {
            npdu = npdu.with_destination(dest);
        }
        let mut out = vec![0u8; encoded_size(|w| self.encode_with(&npdu, w))?];
        let mut w = Writer::new(&mut out);
        self.encode_with(&npdu, &mut w)?;
        Ok(out)
    }
}

/// Data-link wrapping for an encoded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSpec {
    /// Original-Unicast-NPDU, or Original-Broadcast-NPDU for `broadcast`.
    Bvlc { broadcast: bool },
    /// Forwarded-NPDU as a BBMD relays it.
    BvlcForwarded { origin: SocketAddrV4 },
    Mstp { destination: u8, source: u8 },
    /// No data-link header at all.
    Npdu,
}

/// Encodes `request` and wraps it for the chosen data link.
pub fn build_frame(
    request: &RequestSpec,
    destination: Option<NetworkAddress>,
    link: LinkSpec,
) -> Result<Vec<u8>, ToolError> {
    let npdu = request.to_npdu(destination)?;
    debug!("encoded {} byte npdu for {request:?}", npdu.len());
    let frame = match link {
        LinkSpec::Bvlc { broadcast: true } => BvlcMessage::OriginalBroadcastNpdu(npdu).to_vec()?,
        LinkSpec::Bvlc { broadcast: false } => BvlcMessage::OriginalUnicastNpdu(npdu).to_vec()?,
        LinkSpec::BvlcForwarded { origin } => {
            BvlcMessage::ForwardedNpdu { origin, npdu }.to_vec()?
        }
        LinkSpec::Mstp {
            destination,
            source,
        } => MstpFrame::data(destination, source, npdu, request.expecting_reply()).to_vec()?,
        LinkSpec::Npdu => npdu,
    };
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacwire_core::types::{ObjectType, PropertyId};

    #[test]
    fn who_is_broadcast_over_bip() {
        let frame = build_frame(
            &RequestSpec::WhoIs(WhoIsRequest::global()),
            None,
            LinkSpec::Bvlc { broadcast: true },
        )
        .unwrap();
        assert_eq!(frame, [0x81, 0x0B, 0x00, 0x08, 0x01, 0x00, 0x10, 0x08]);
    }

    #[test]
    fn read_property_over_mstp() {
        let request = RequestSpec::read_property(
            ObjectId::new(ObjectType::Device, 123),
            PropertyId::ObjectName.into(),
            1,
        );
        let link = LinkSpec::Mstp {
            destination: 5,
            source: 1,
        };
        let frame = build_frame(&request, None, link).unwrap();
        let (mstp, _) = MstpFrame::decode(&frame).unwrap();
        assert!(mstp.frame_type.is_data());
        assert_eq!(
            mstp.npdu().unwrap(),
            &[0x01, 0x04, 0x00, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D]
        );
    }

    #[test]
    fn bad_priority_is_an_encode_error() {
        let request = RequestSpec::write_property(
            ObjectId::new(ObjectType::AnalogValue, 1),
            PropertyId::PresentValue.into(),
            ApplicationValue::Real(1.0),
            Some(17),
            2,
        );
        assert!(matches!(
            build_frame(&request, None, LinkSpec::Npdu),
            Err(ToolError::Encode(EncodeError::ValueOutOfRange))
        ));
    }
}
