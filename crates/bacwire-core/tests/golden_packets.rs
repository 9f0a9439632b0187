use bacwire_core::apdu::{Apdu, ErrorPdu, SimpleAck, UnconfirmedRequestHeader};
use bacwire_core::encoding::{reader::Reader, writer::Writer};
use bacwire_core::npdu::{NetworkMessageType, Npdu};
use bacwire_core::services::cov_notification::{
    CovNotificationRequest, SERVICE_UNCONFIRMED_COV_NOTIFICATION,
};
use bacwire_core::services::i_am::IAmRequest;
use bacwire_core::services::list_element::ListElementRequest;
use bacwire_core::services::object_management::{CreateObjectRequest, DeleteObjectRequest};
use bacwire_core::services::read_property::ReadPropertyRequest;
use bacwire_core::services::subscribe_cov::SubscribeCovRequest;
use bacwire_core::services::who_is::WhoIsRequest;
use bacwire_core::services::write_property::WritePropertyRequest;
use bacwire_core::types::{
    ApplicationValue, ConfirmedService, ErrorClass, ErrorCode, LinkType, NetworkAddress,
    ObjectId, ObjectType, PropertyId, Segmentation,
};

fn framed(encode: impl FnOnce(&mut Writer<'_>)) -> Vec<u8> {
    let mut buf = [0u8; 128];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w).unwrap();
    encode(&mut w);
    w.as_written().to_vec()
}

#[test]
fn who_is_global_frame_matches_fixture() {
    let frame = framed(|w| WhoIsRequest::global().encode(w).unwrap());
    assert_eq!(frame, [0x01, 0x00, 0x10, 0x08]);
}

#[test]
fn who_is_range_frame_matches_fixture() {
    let frame = framed(|w| WhoIsRequest::range(10, 300).encode(w).unwrap());
    assert_eq!(
        frame,
        [0x01, 0x00, 0x10, 0x08, 0x09, 0x0A, 0x1A, 0x01, 0x2C]
    );
}

#[test]
fn i_am_frame_matches_fixture() {
    let frame = framed(|w| {
        IAmRequest::new(1234, 1476, Segmentation::NoSegmentation, 260)
            .encode(w)
            .unwrap()
    });
    assert_eq!(
        frame,
        [
            0x01, 0x00, 0x10, 0x00, 0xC4, 0x02, 0x00, 0x04, 0xD2, 0x22, 0x05, 0xC4, 0x91, 0x03,
            0x22, 0x01, 0x04,
        ]
    );

    let mut r = Reader::new(&frame);
    Npdu::decode(&mut r).unwrap();
    let iam = IAmRequest::decode(&mut r).unwrap();
    assert_eq!(iam.device_id.instance(), 1234);
    assert_eq!(iam.vendor_id, 260);
    assert!(r.is_empty());
}

#[test]
fn read_property_frame_matches_fixture() {
    let frame = framed(|w| {
        ReadPropertyRequest::new(
            ObjectId::new(ObjectType::Device, 123),
            PropertyId::ObjectName,
            1,
        )
        .encode(w)
        .unwrap()
    });
    assert_eq!(
        frame,
        [0x01, 0x00, 0x00, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D]
    );
}

#[test]
fn write_property_frame_matches_fixture() {
    let frame = framed(|w| {
        WritePropertyRequest::new(
            ObjectId::new(ObjectType::AnalogValue, 1),
            PropertyId::PresentValue,
            ApplicationValue::Real(72.5),
            3,
        )
        .with_priority(8)
        .encode(w)
        .unwrap()
    });
    assert_eq!(
        frame,
        [
            0x01, 0x00, 0x00, 0x05, 0x03, 0x0F, 0x0C, 0x00, 0x80, 0x00, 0x01, 0x19, 0x55, 0x3E,
            0x44, 0x42, 0x91, 0x00, 0x00, 0x3F, 0x49, 0x08,
        ]
    );
}

#[test]
fn subscribe_cov_frame_matches_fixture() {
    let frame = framed(|w| {
        SubscribeCovRequest::new(7, ObjectId::new(ObjectType::AnalogValue, 2), false, 600, 17)
            .encode(w)
            .unwrap()
    });
    assert_eq!(
        frame,
        [
            0x01, 0x00, 0x00, 0x05, 0x11, 0x05, 0x09, 0x07, 0x1C, 0x00, 0x80, 0x00, 0x02, 0x29,
            0x00, 0x3A, 0x02, 0x58,
        ]
    );
}

#[test]
fn subscribe_cov_cancellation_omits_both_tags() {
    let frame = framed(|w| {
        SubscribeCovRequest::cancel(7, ObjectId::new(ObjectType::AnalogValue, 2), 17)
            .encode(w)
            .unwrap()
    });
    assert_eq!(
        frame,
        [0x01, 0x00, 0x00, 0x05, 0x11, 0x05, 0x09, 0x07, 0x1C, 0x00, 0x80, 0x00, 0x02]
    );

    let mut r = Reader::new(&frame[2..]);
    assert!(SubscribeCovRequest::decode(&mut r).unwrap().is_cancellation());
}

#[test]
fn create_object_frame_matches_fixture() {
    let frame = framed(|w| {
        CreateObjectRequest::by_type(ObjectType::AnalogValue, 6)
            .encode(w)
            .unwrap()
    });
    assert_eq!(
        frame,
        [0x01, 0x00, 0x00, 0x05, 0x06, 0x0A, 0x0E, 0x09, 0x02, 0x0F]
    );
}

#[test]
fn delete_object_frame_matches_fixture() {
    let frame = framed(|w| {
        DeleteObjectRequest::new(ObjectId::new(ObjectType::AnalogValue, 42), 7)
            .encode(w)
            .unwrap()
    });
    assert_eq!(
        frame,
        [0x01, 0x00, 0x00, 0x05, 0x07, 0x0B, 0xC4, 0x00, 0x80, 0x00, 0x2A]
    );
}

#[test]
fn add_list_element_frame_matches_fixture() {
    let frame = framed(|w| {
        ListElementRequest::add(
            ObjectId::new(ObjectType::AnalogValue, 1),
            PropertyId::Proprietary(512),
            vec![ApplicationValue::Unsigned(1), ApplicationValue::Unsigned(2)],
            8,
        )
        .encode(w)
        .unwrap()
    });
    assert_eq!(
        frame,
        [
            0x01, 0x00, 0x00, 0x05, 0x08, 0x08, 0x0C, 0x00, 0x80, 0x00, 0x01, 0x1A, 0x02, 0x00,
            0x3E, 0x21, 0x01, 0x21, 0x02, 0x3F,
        ]
    );
}

#[test]
fn remove_list_element_frame_matches_fixture() {
    let frame = framed(|w| {
        ListElementRequest::remove(
            ObjectId::new(ObjectType::AnalogValue, 1),
            PropertyId::Proprietary(513),
            vec![ApplicationValue::Unsigned(1)],
            9,
        )
        .encode(w)
        .unwrap()
    });
    assert_eq!(
        frame,
        [
            0x01, 0x00, 0x00, 0x05, 0x09, 0x09, 0x0C, 0x00, 0x80, 0x00, 0x01, 0x1A, 0x02, 0x01,
            0x3E, 0x21, 0x01, 0x3F,
        ]
    );
}

#[test]
fn cov_notification_fixture_decodes_expected() {
    let fixture = [
        0x10, 0x02, // unconfirmed COV
        0x09, 0x11, // [0] process id 17
        0x1C, 0x02, 0x00, 0x00, 0x01, // [1] initiating device: device,1
        0x2C, 0x00, 0x00, 0x00, 0x01, // [2] monitored object: analog-input,1
        0x39, 0x3C, // [3] time remaining 60
        0x4E, // [4] opening listOfValues
        0x09, 0x55, // [0] present-value
        0x2E, // [2] opening value
        0x44, 0x42, 0x20, 0x00, 0x00, // real 40.0
        0x2F, // [2] closing value
        0x4F, // [4] closing listOfValues
    ];

    let mut probe = Reader::new(&fixture);
    let header = UnconfirmedRequestHeader::decode(&mut probe).unwrap();
    assert_eq!(header.service_choice, SERVICE_UNCONFIRMED_COV_NOTIFICATION);

    let mut r = Reader::new(&fixture);
    let cov = CovNotificationRequest::decode(&mut r).unwrap();
    assert!(!cov.is_confirmed());
    assert_eq!(cov.subscriber_process_id, 17);
    assert_eq!(cov.time_remaining_seconds, 60);
    assert_eq!(
        cov.monitored_object_id,
        ObjectId::new(ObjectType::AnalogInput, 1)
    );
    assert_eq!(cov.values.len(), 1);
    assert_eq!(cov.values[0].property.property_id, PropertyId::PresentValue);
    assert_eq!(cov.values[0].values, vec![ApplicationValue::Real(40.0)]);
    assert!(r.is_empty());
}

#[test]
fn routed_npdu_frame_matches_fixture() {
    let npdu = Npdu::application(true)
        .with_destination(NetworkAddress::new(5, vec![0x0A], LinkType::Mstp))
        .with_source(NetworkAddress::new(
            1,
            vec![192, 168, 1, 10, 0xBA, 0xC0],
            LinkType::Ip,
        ));
    let mut buf = [0u8; 32];
    let mut w = Writer::new(&mut buf);
    npdu.encode(&mut w).unwrap();
    assert_eq!(
        w.as_written(),
        &[
            0x01, 0x2C, 0x00, 0x05, 0x01, 0x0A, 0x00, 0x01, 0x06, 0xC0, 0xA8, 0x01, 0x0A, 0xBA,
            0xC0, 0xFF,
        ]
    );

    let mut r = Reader::new(w.as_written());
    let decoded = Npdu::decode(&mut r).unwrap();
    assert!(decoded.expecting_reply());
    assert_eq!(decoded.hop_count, Some(255));
    let dest = decoded.destination.unwrap();
    assert_eq!(dest.network_number, 5);
    assert_eq!(dest.mac, vec![0x0A]);
    assert_eq!(decoded.source.unwrap().mac, vec![192, 168, 1, 10, 0xBA, 0xC0]);
    assert!(r.is_empty());
}

#[test]
fn network_message_frame_matches_fixture() {
    let mut buf = [0u8; 8];
    let mut w = Writer::new(&mut buf);
    Npdu::network_message(NetworkMessageType::WhoIsRouterToNetwork, None)
        .encode(&mut w)
        .unwrap();
    assert_eq!(w.as_written(), &[0x01, 0x80, 0x00]);

    let mut buf = [0u8; 8];
    let mut w = Writer::new(&mut buf);
    Npdu::network_message(NetworkMessageType::Proprietary(0x90), Some(260))
        .encode(&mut w)
        .unwrap();
    assert_eq!(w.as_written(), &[0x01, 0x80, 0x90, 0x01, 0x04]);
}

#[test]
fn simple_ack_and_error_frames_dispatch() {
    let frame = framed(|w| {
        SimpleAck {
            invoke_id: 3,
            service_choice: ConfirmedService::WriteProperty.to_u8(),
        }
        .encode(w)
        .unwrap()
    });
    assert_eq!(frame, [0x01, 0x00, 0x20, 0x03, 0x0F]);

    let mut r = Reader::new(&frame);
    Npdu::decode(&mut r).unwrap();
    match Apdu::decode(&mut r).unwrap() {
        Apdu::SimpleAck(ack) => assert_eq!(ack.invoke_id, 3),
        other => panic!("unexpected {other:?}"),
    }

    let frame = framed(|w| {
        ErrorPdu::new(
            ConfirmedService::ReadProperty,
            4,
            ErrorClass::Property,
            ErrorCode::UnknownProperty,
        )
        .encode(w)
        .unwrap()
    });
    assert_eq!(
        frame,
        [0x01, 0x00, 0x50, 0x04, 0x0C, 0x91, 0x02, 0x91, 0x20]
    );
    let mut r = Reader::new(&frame[2..]);
    let error = ErrorPdu::decode(&mut r).unwrap();
    assert_eq!(error.class(), Some(ErrorClass::Property));
    assert_eq!(error.code(), Some(ErrorCode::UnknownProperty));
}

#[test]
fn truncated_frames_are_rejected() {
    let frame = framed(|w| {
        ReadPropertyRequest::new(
            ObjectId::new(ObjectType::Device, 123),
            PropertyId::ObjectName,
            1,
        )
        .encode(w)
        .unwrap()
    });
    for cut in 3..frame.len() {
        let mut r = Reader::new(&frame[2..cut]);
        assert!(ReadPropertyRequest::decode(&mut r).is_err(), "cut at {cut}");
    }
}
