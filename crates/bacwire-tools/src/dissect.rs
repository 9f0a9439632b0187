use std::net::SocketAddrV4;

use bacwire_core::apdu::Apdu;
use bacwire_core::encoding::reader::Reader;
use bacwire_core::npdu::Npdu;
use bacwire_core::services::{
    acknowledge_alarm::AcknowledgeAlarmRequest,
    alarm_summary::{GetAlarmSummaryAck, GetAlarmSummaryRequest},
    atomic_read_file::{AtomicReadFileAck, AtomicReadFileRequest},
    atomic_write_file::{AtomicWriteFileAck, AtomicWriteFileRequest},
    cov_notification::CovNotificationRequest,
    device_management::{DeviceCommunicationControlRequest, ReinitializeDeviceRequest},
    event_information::{GetEventInformationAck, GetEventInformationRequest},
    event_notification::EventNotificationRequest,
    i_am::IAmRequest,
    life_safety::LifeSafetyOperationRequest,
    list_element::{ListElementRequest, ListElementService},
    object_management::{CreateObjectAck, CreateObjectRequest, DeleteObjectRequest},
    private_transfer::{PrivateTransferAck, PrivateTransferRequest},
    read_property::{ReadPropertyAck, ReadPropertyRequest},
    read_property_multiple::{ReadPropertyMultipleAck, ReadPropertyMultipleRequest},
    read_range::{ReadRangeAck, ReadRangeRequest},
    subscribe_cov::SubscribeCovRequest,
    subscribe_cov_property::SubscribeCovPropertyRequest,
    time_synchronization::TimeSynchronizationRequest,
    who_has::{IHaveRequest, WhoHasRequest},
    who_is::WhoIsRequest,
    write_property::WritePropertyRequest,
    write_property_multiple::WritePropertyMultipleRequest,
};
use bacwire_core::types::{ConfirmedService, UnconfirmedService};
use bacwire_core::DecodeError;
use bacwire_datalink::{BvlcFunction, BvlcMessage};
use bacwire_mstp::MstpFrame;
use log::{debug, warn};
use serde::Serialize;

use crate::{Framing, ToolError};

/// Everything recovered from one frame, outermost layer first.
#[derive(Debug, Serialize)]
pub struct Dissection {
    pub link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npdu: Option<Npdu>,
    /// Bytes after a network-layer message header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_payload: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apdu: Option<Apdu>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceData>,
    /// Why the service data could not be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_error: Option<String>,
    /// Service bytes left over: unsupported services, segments or trailing data.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub undecoded: Vec<u8>,
}

impl Dissection {
    fn link_only(link: Link) -> Self {
        Self {
            link,
            npdu: None,
            network_payload: None,
            apdu: None,
            service: None,
            service_error: None,
            undecoded: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum Link {
    Bvlc {
        function: BvlcFunction,
        #[serde(skip_serializing_if = "Option::is_none")]
        origin: Option<SocketAddrV4>,
        /// Present for the BVLL management messages that carry no NPDU.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<BvlcMessage>,
    },
    Mstp {
        frame_type: String,
        destination: u8,
        source: u8,
    },
    Npdu,
}

#[derive(Debug, Serialize)]
#[serde(tag = "service", content = "data", rename_all = "snake_case")]
pub enum ServiceData {
    AcknowledgeAlarm(AcknowledgeAlarmRequest),
    CovNotification(CovNotificationRequest),
    EventNotification(EventNotificationRequest),
    GetAlarmSummary(GetAlarmSummaryRequest),
    GetAlarmSummaryAck(GetAlarmSummaryAck),
    SubscribeCov(SubscribeCovRequest),
    SubscribeCovProperty(SubscribeCovPropertyRequest),
    AtomicReadFile(AtomicReadFileRequest),
    AtomicReadFileAck(AtomicReadFileAck),
    AtomicWriteFile(AtomicWriteFileRequest),
    AtomicWriteFileAck(AtomicWriteFileAck),
    ListElement(ListElementRequest),
    CreateObject(CreateObjectRequest),
    CreateObjectAck(CreateObjectAck),
    DeleteObject(DeleteObjectRequest),
    ReadProperty(ReadPropertyRequest),
    ReadPropertyAck(ReadPropertyAck),
    ReadPropertyMultiple(ReadPropertyMultipleRequest),
    ReadPropertyMultipleAck(ReadPropertyMultipleAck),
    WriteProperty(WritePropertyRequest),
    WritePropertyMultiple(WritePropertyMultipleRequest),
    DeviceCommunicationControl(DeviceCommunicationControlRequest),
    PrivateTransfer(PrivateTransferRequest),
    PrivateTransferAck(PrivateTransferAck),
    ReinitializeDevice(ReinitializeDeviceRequest),
    ReadRange(ReadRangeRequest),
    ReadRangeAck(ReadRangeAck),
    LifeSafetyOperation(LifeSafetyOperationRequest),
    GetEventInformation(GetEventInformationRequest),
    GetEventInformationAck(GetEventInformationAck),
    IAm(IAmRequest),
    IHave(IHaveRequest),
    TimeSynchronization(TimeSynchronizationRequest),
    WhoHas(WhoHasRequest),
    WhoIs(WhoIsRequest),
}

/// Decodes `frame` as far down as the service arguments.
///
/// Link and network layer failures are errors. A service body that does not
/// decode is reported in [`Dissection::service_error`] with its raw bytes.
pub fn dissect(frame: &[u8], framing: Framing) -> Result<Dissection, ToolError> {
    match framing.detect(frame)? {
        Framing::Bvlc => {
            let message = BvlcMessage::decode(frame)?;
            let function = message.function();
            let origin = match &message {
                BvlcMessage::ForwardedNpdu { origin, .. } => Some(*origin),
                _ => None,
            };
            match message.npdu().map(<[u8]>::to_vec) {
                Some(npdu) => dissect_npdu(
                    &npdu,
                    Link::Bvlc {
                        function,
                        origin,
                        message: None,
                    },
                ),
                None => Ok(Dissection::link_only(Link::Bvlc {
                    function,
                    origin,
                    message: Some(message),
                })),
            }
        }
        Framing::Mstp => {
            let (mstp, used) = MstpFrame::decode(frame)?;
            if used < frame.len() {
                debug!("ignoring {} bytes after the mstp frame", frame.len() - used);
            }
            let link = Link::Mstp {
                frame_type: format!("{:?}", mstp.frame_type),
                destination: mstp.destination,
                source: mstp.source,
            };
            match mstp.npdu() {
                Some(npdu) => dissect_npdu(npdu, link),
                None => Ok(Dissection::link_only(link)),
            }
        }
        // `detect` never yields `Auto`.
        Framing::Npdu | Framing::Auto => dissect_npdu(frame, Link::Npdu),
    }
}

fn dissect_npdu(bytes: &[u8], link: Link) -> Result<Dissection, ToolError> {
    let mut r = Reader::new(bytes);
    let npdu = Npdu::decode(&mut r)?;
    let mut out = Dissection::link_only(link);
    if npdu.is_network_message() {
        out.network_payload = Some(r.rest().to_vec());
        out.npdu = Some(npdu);
        return Ok(out);
    }
    out.npdu = Some(npdu);

    let apdu = Apdu::decode(&mut r)?;
    let mut body = r;
    match decode_service(&apdu, &mut body) {
        Ok(service) => {
            if service.is_some() && !body.is_empty() {
                warn!("{} bytes follow the service data", body.remaining());
            }
            out.service = service;
            out.undecoded = body.rest().to_vec();
        }
        Err(err) => {
            debug!("service data failed to decode: {err}");
            out.service_error = Some(err.to_string());
            out.undecoded = r.rest().to_vec();
        }
    }
    out.apdu = Some(apdu);
    Ok(out)
}

/// Decodes the service arguments following an APDU header. `Ok(None)` means
/// the PDU kind or service has no decoder here, or the APDU is one segment
/// of a larger message.
fn decode_service(apdu: &Apdu, r: &mut Reader<'_>) -> Result<Option<ServiceData>, DecodeError> {
    use ServiceData as S;

    let data = match apdu {
        Apdu::ConfirmedRequest(h) if !h.segmented => {
            let id = h.invoke_id;
            match h.service() {
                Some(ConfirmedService::AcknowledgeAlarm) => {
                    S::AcknowledgeAlarm(AcknowledgeAlarmRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::ConfirmedCovNotification) => {
                    S::CovNotification(CovNotificationRequest::decode_after_header(r, Some(id))?)
                }
                Some(ConfirmedService::ConfirmedEventNotification) => S::EventNotification(
                    EventNotificationRequest::decode_after_header(r, Some(id))?,
                ),
                Some(ConfirmedService::GetAlarmSummary) => {
                    S::GetAlarmSummary(GetAlarmSummaryRequest { invoke_id: id })
                }
                Some(ConfirmedService::SubscribeCov) => {
                    S::SubscribeCov(SubscribeCovRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::AtomicReadFile) => {
                    S::AtomicReadFile(AtomicReadFileRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::AtomicWriteFile) => {
                    S::AtomicWriteFile(AtomicWriteFileRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::AddListElement) => S::ListElement(
                    ListElementRequest::decode_after_header(r, ListElementService::Add, id)?,
                ),
                Some(ConfirmedService::RemoveListElement) => S::ListElement(
                    ListElementRequest::decode_after_header(r, ListElementService::Remove, id)?,
                ),
                Some(ConfirmedService::CreateObject) => {
                    S::CreateObject(CreateObjectRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::DeleteObject) => {
                    S::DeleteObject(DeleteObjectRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::ReadProperty) => {
                    S::ReadProperty(ReadPropertyRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::ReadPropertyMultiple) => S::ReadPropertyMultiple(
                    ReadPropertyMultipleRequest::decode_after_header(r, id)?,
                ),
                Some(ConfirmedService::WriteProperty) => {
                    S::WriteProperty(WritePropertyRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::WritePropertyMultiple) => S::WritePropertyMultiple(
                    WritePropertyMultipleRequest::decode_after_header(r, id)?,
                ),
                Some(ConfirmedService::DeviceCommunicationControl) => S::DeviceCommunicationControl(
                    DeviceCommunicationControlRequest::decode_after_header(r, id)?,
                ),
                Some(ConfirmedService::ConfirmedPrivateTransfer) => {
                    S::PrivateTransfer(PrivateTransferRequest::decode_after_header(r, Some(id))?)
                }
                Some(ConfirmedService::ReinitializeDevice) => {
                    S::ReinitializeDevice(ReinitializeDeviceRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::ReadRange) => {
                    S::ReadRange(ReadRangeRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::LifeSafetyOperation) => {
                    S::LifeSafetyOperation(LifeSafetyOperationRequest::decode_after_header(r, id)?)
                }
                Some(ConfirmedService::SubscribeCovProperty) => S::SubscribeCovProperty(
                    SubscribeCovPropertyRequest::decode_after_header(r, id)?,
                ),
                Some(ConfirmedService::GetEventInformation) => S::GetEventInformation(
                    GetEventInformationRequest::decode_after_header(r, id)?,
                ),
                _ => return Ok(None),
            }
        }
        Apdu::ComplexAck(h) if !h.segmented => match ConfirmedService::from_u8(h.service_choice) {
            Some(ConfirmedService::GetAlarmSummary) => {
                S::GetAlarmSummaryAck(GetAlarmSummaryAck::decode_after_header(r)?)
            }
            Some(ConfirmedService::AtomicReadFile) => {
                S::AtomicReadFileAck(AtomicReadFileAck::decode_after_header(r)?)
            }
            Some(ConfirmedService::AtomicWriteFile) => {
                S::AtomicWriteFileAck(AtomicWriteFileAck::decode_after_header(r)?)
            }
            Some(ConfirmedService::CreateObject) => {
                S::CreateObjectAck(CreateObjectAck::decode_after_header(r)?)
            }
            Some(ConfirmedService::ReadProperty) => {
                S::ReadPropertyAck(ReadPropertyAck::decode_after_header(r)?)
            }
            Some(ConfirmedService::ReadPropertyMultiple) => {
                S::ReadPropertyMultipleAck(ReadPropertyMultipleAck::decode_after_header(r)?)
            }
            Some(ConfirmedService::ConfirmedPrivateTransfer) => {
                S::PrivateTransferAck(PrivateTransferAck::decode_after_header(r)?)
            }
            Some(ConfirmedService::ReadRange) => {
                S::ReadRangeAck(ReadRangeAck::decode_after_header(r)?)
            }
            Some(ConfirmedService::GetEventInformation) => {
                S::GetEventInformationAck(GetEventInformationAck::decode_after_header(r)?)
            }
            _ => return Ok(None),
        },
        Apdu::UnconfirmedRequest(h) => match UnconfirmedService::from_u8(h.service_choice) {
            Some(UnconfirmedService::IAm) => S::IAm(IAmRequest::decode_after_header(r)?),
            Some(UnconfirmedService::IHave) => S::IHave(IHaveRequest::decode_after_header(r)?),
            Some(UnconfirmedService::UnconfirmedCovNotification) => {
                S::CovNotification(CovNotificationRequest::decode_after_header(r, None)?)
            }
            Some(UnconfirmedService::UnconfirmedEventNotification) => {
                S::EventNotification(EventNotificationRequest::decode_after_header(r, None)?)
            }
            Some(UnconfirmedService::UnconfirmedPrivateTransfer) => {
                S::PrivateTransfer(PrivateTransferRequest::decode_after_header(r, None)?)
            }
            Some(UnconfirmedService::TimeSynchronization) => S::TimeSynchronization(
                TimeSynchronizationRequest::decode_after_header(r, false)?,
            ),
            Some(UnconfirmedService::UtcTimeSynchronization) => S::TimeSynchronization(
                TimeSynchronizationRequest::decode_after_header(r, true)?,
            ),
            Some(UnconfirmedService::WhoHas) => S::WhoHas(WhoHasRequest::decode_after_header(r)?),
            Some(UnconfirmedService::WhoIs) => S::WhoIs(WhoIsRequest::decode_after_header(r)?),
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };
    Ok(Some(data))
}
