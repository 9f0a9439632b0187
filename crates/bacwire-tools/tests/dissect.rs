use bacwire_core::apdu::Apdu;
use bacwire_core::services::who_is::WhoIsRequest;
use bacwire_core::types::{ApplicationValue, ObjectId, ObjectType, PropertyId};
use bacwire_datalink::BvlcFunction;
use bacwire_tools::{
    build_frame, dissect, parse_hex, Framing, Link, LinkSpec, RequestSpec, ServiceData, ToolError,
};

#[test]
fn who_is_over_bip() {
    let frame = parse_hex("81 0b 00 0d 01 00 10 08 09 0a 1a 01 2c").unwrap();
    let d = dissect(&frame, Framing::Auto).unwrap();
    assert!(matches!(
        d.link,
        Link::Bvlc {
            function: BvlcFunction::OriginalBroadcastNpdu,
            ..
        }
    ));
    match d.service {
        Some(ServiceData::WhoIs(req)) => assert_eq!(req, WhoIsRequest::range(10, 300)),
        other => panic!("unexpected service {other:?}"),
    }
    assert!(d.undecoded.is_empty());
}

#[test]
fn write_property_over_mstp_round_trips() {
    let request = RequestSpec::write_property(
        ObjectId::new(ObjectType::AnalogValue, 1),
        PropertyId::PresentValue.into(),
        ApplicationValue::Real(72.5),
        Some(8),
        3,
    );
    let frame = build_frame(&request, None, LinkSpec::Mstp { destination: 4, source: 1 }).unwrap();
    let d = dissect(&frame, Framing::Auto).unwrap();
    assert!(matches!(d.link, Link::Mstp { destination: 4, source: 1, .. }));
    assert!(d.npdu.as_ref().unwrap().expecting_reply());
    match (d.apdu, d.service) {
        (Some(Apdu::ConfirmedRequest(h)), Some(ServiceData::WriteProperty(req))) => {
            assert_eq!(h.invoke_id, 3);
            assert_eq!(RequestSpec::WriteProperty(req), request);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn read_property_ack_as_raw_npdu() {
    let frame = parse_hex("01 00 30 01 0c 0c 02 00 00 7b 19 4d 3e 75 04 00 44 45 56 3f").unwrap();
    let d = dissect(&frame, Framing::Npdu).unwrap();
    match d.service {
        Some(ServiceData::ReadPropertyAck(ack)) => {
            assert_eq!(ack.object_id, ObjectId::new(ObjectType::Device, 123));
            assert_eq!(
                ack.values,
                vec![ApplicationValue::CharacterString("DEV".into())]
            );
        }
        other => panic!("unexpected service {other:?}"),
    }
}

#[test]
fn network_message_stops_at_network_layer() {
    let d = dissect(&[0x01, 0x80, 0x00, 0x00, 0x05], Framing::Auto).unwrap();
    assert!(d.npdu.unwrap().is_network_message());
    assert!(d.apdu.is_none());
    assert_eq!(d.network_payload, Some(vec![0x00, 0x05]));
}

#[test]
fn bvlc_management_message_has_no_npdu() {
    let d = dissect(&[0x81, 0x05, 0x00, 0x06, 0x00, 0x3C], Framing::Bvlc).unwrap();
    match d.link {
        Link::Bvlc { message: Some(_), origin: None, .. } => {}
        other => panic!("unexpected link {other:?}"),
    }
    assert!(d.npdu.is_none());
}

#[test]
fn broken_service_keeps_the_headers() {
    // ReadProperty whose object id is cut short
    let frame = [0x01, 0x04, 0x00, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00];
    let d = dissect(&frame, Framing::Npdu).unwrap();
    assert!(d.apdu.is_some());
    assert!(d.service.is_none());
    assert!(d.service_error.is_some());
    assert_eq!(d.undecoded, [0x0C, 0x02, 0x00]);
}

#[test]
fn json_output_names_the_service() {
    let frame = build_frame(
        &RequestSpec::WhoIs(WhoIsRequest::global()),
        None,
        LinkSpec::Bvlc { broadcast: true },
    )
    .unwrap();
    let d = dissect(&frame, Framing::Auto).unwrap();
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["link"]["layer"], "bvlc");
    assert_eq!(json["service"]["service"], "who_is");
}

#[test]
fn corrupt_link_layers_are_errors() {
    assert!(matches!(
        dissect(&[0x81, 0x0A, 0x00, 0x09, 0x01], Framing::Auto),
        Err(ToolError::Bvlc(_))
    ));
    let mut mstp = build_frame(
        &RequestSpec::WhoIs(WhoIsRequest::global()),
        None,
        LinkSpec::Mstp { destination: 255, source: 2 },
    )
    .unwrap();
    mstp[9] ^= 0x01;
    assert!(matches!(dissect(&mstp, Framing::Auto), Err(ToolError::Mstp(_))));
}
