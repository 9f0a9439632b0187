use bacwire_core::encoding::{
    primitives::{
        decode_app_bit_string, decode_app_object_id, encode_app_bit_string, encode_app_object_id,
    },
    reader::Reader,
    tag::{decode_tag_number_and_value, encode_tag, encoded_tag_len},
    writer::{encoded_size, Writer},
};
use bacwire_core::services::read_property::ReadPropertyRequest;
use bacwire_core::services::read_property_multiple::{
    ReadAccessResult, ReadPropertyMultipleAck, ReadResultElement, ReadResultValue,
};
use bacwire_core::services::who_is::WhoIsRequest;
use bacwire_core::services::write_property::WritePropertyRequest;
use bacwire_core::types::{
    ApplicationValue, BitString, ErrorClass, ErrorCode, ObjectId, ObjectType, PropertyId,
    PropertyReference,
};
use bacwire_core::BACNET_ARRAY_ALL;
use proptest::prelude::*;

#[test]
fn tag_headers_survive_the_boundary_grid() {
    for tag_num in [0u8, 14, 15, 254] {
        for context in [true, false] {
            for len in [0u32, 4, 5, 253, 254, 65535, 65536] {
                let mut buf = [0u8; 8];
                let mut w = Writer::new(&mut buf);
                encode_tag(&mut w, tag_num, context, len).unwrap();
                let written = w.position();
                assert_eq!(encoded_tag_len(tag_num, len), written);

                let mut r = Reader::new(w.as_written());
                let header = decode_tag_number_and_value(&mut r).unwrap();
                assert_eq!(header.tag_num, tag_num);
                assert_eq!(header.is_context_specific, context);
                assert_eq!(header.len_value, len);
                assert!(r.is_empty());
            }
        }
    }
}

proptest! {
    #[test]
    fn sizing_a_tag_twice_matches_the_written_length(
        tag_num in 0u8..=254,
        context in any::<bool>(),
        len in any::<u32>(),
    ) {
        let size = || encoded_size(|w| encode_tag(w, tag_num, context, len)).unwrap();
        let first = size();
        prop_assert_eq!(first, size());
        prop_assert_eq!(first, encoded_tag_len(tag_num, len));

        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        encode_tag(&mut w, tag_num, context, len).unwrap();
        prop_assert_eq!(first, w.position());
    }
}

#[test]
fn bit_string_keeps_bit_order() {
    let bits: BitString = "101".parse().unwrap();
    let mut buf = [0u8; 8];
    let mut w = Writer::new(&mut buf);
    encode_app_bit_string(&mut w, &bits).unwrap();
    // one unused-bits byte plus one data byte with the bits at the top
    assert_eq!(w.as_written(), &[0x82, 0x05, 0xA0]);

    let mut r = Reader::new(w.as_written());
    let decoded = decode_app_bit_string(&mut r).unwrap();
    assert_eq!(decoded.to_string(), "101");
}

#[test]
fn object_id_packs_type_and_instance_limits() {
    let id = ObjectId::from_parts(512, 4_194_303);
    let mut buf = [0u8; 8];
    let mut w = Writer::new(&mut buf);
    encode_app_object_id(&mut w, id).unwrap();

    let mut r = Reader::new(w.as_written());
    let decoded = decode_app_object_id(&mut r).unwrap();
    assert_eq!(decoded.type_number(), 512 & 0x3FF);
    assert_eq!(decoded.instance(), 4_194_303 & 0x3F_FFFF);

    let clamped = ObjectId::from_parts(0x7FF, 0xFF_FFFF);
    assert_eq!(clamped.type_number(), 0x3FF);
    assert_eq!(clamped.instance(), 0x3F_FFFF);
}

#[test]
fn who_is_limits_round_trip() {
    let mut buf = [0u8; 16];
    let mut w = Writer::new(&mut buf);
    WhoIsRequest::global().encode_service_data(&mut w).unwrap();
    assert_eq!(w.position(), 0);

    let mut buf = [0u8; 16];
    let mut w = Writer::new(&mut buf);
    WhoIsRequest::range(10, 20)
        .encode_service_data(&mut w)
        .unwrap();
    assert_eq!(w.as_written(), &[0x09, 0x0A, 0x19, 0x14]);

    let mut r = Reader::new(w.as_written());
    let decoded = WhoIsRequest::decode_after_header(&mut r).unwrap();
    assert_eq!(decoded.limits, Some((10, 20)));
}

#[test]
fn read_property_round_trip_reports_whole_array() {
    let req = ReadPropertyRequest::new(
        ObjectId::new(ObjectType::Device, 1234),
        PropertyId::ObjectName,
        1,
    );
    let mut buf = [0u8; 32];
    let mut w = Writer::new(&mut buf);
    req.encode(&mut w).unwrap();

    let mut r = Reader::new(w.as_written());
    let decoded = ReadPropertyRequest::decode(&mut r).unwrap();
    assert_eq!(decoded.object_id.object_type(), ObjectType::Device);
    assert_eq!(decoded.object_id.instance(), 1234);
    assert_eq!(u32::from(decoded.property.property_id), 77);
    assert_eq!(decoded.property.array_index_or_all(), BACNET_ARRAY_ALL);
}

#[test]
fn write_property_keeps_priority_and_real() {
    let req = WritePropertyRequest::new(
        ObjectId::new(ObjectType::AnalogValue, 3),
        PropertyId::PresentValue,
        ApplicationValue::Real(72.5),
        9,
    )
    .with_priority(8);
    let mut buf = [0u8; 32];
    let mut w = Writer::new(&mut buf);
    req.encode(&mut w).unwrap();

    let mut r = Reader::new(w.as_written());
    let decoded = WritePropertyRequest::decode(&mut r).unwrap();
    assert_eq!(decoded.priority, Some(8));
    assert_eq!(decoded.values.len(), 1);
    match decoded.values[0] {
        ApplicationValue::Real(v) => assert!((v - 72.5).abs() < f32::EPSILON),
        ref other => panic!("expected a real, got {other:?}"),
    }
}

#[test]
fn nested_rpm_ack_consumes_every_byte() {
    let object = |instance| ReadAccessResult {
        object_id: ObjectId::new(ObjectType::AnalogInput, instance),
        results: vec![
            ReadResultElement {
                property: PropertyReference::new(PropertyId::PresentValue),
                result: ReadResultValue::Values(vec![ApplicationValue::Real(instance as f32)]),
            },
            ReadResultElement {
                property: PropertyReference::new(PropertyId::StatusFlags),
                result: ReadResultValue::Values(vec![ApplicationValue::BitString(
                    "0100".parse().unwrap(),
                )]),
            },
            ReadResultElement {
                property: PropertyReference::with_index(PropertyId::PriorityArray, 3),
                result: ReadResultValue::error(ErrorClass::Property, ErrorCode::UnknownProperty),
            },
        ],
    };
    let ack = ReadPropertyMultipleAck {
        results: vec![object(1), object(2)],
    };

    let mut buf = [0u8; 256];
    let mut w = Writer::new(&mut buf);
    ack.encode(&mut w, 4).unwrap();

    let mut r = Reader::new(w.as_written());
    assert_eq!(ReadPropertyMultipleAck::decode(&mut r).unwrap(), ack);
    assert!(r.is_empty());
}

#[test]
fn truncated_read_property_is_an_error() {
    let frame = [0x00, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D];
    let mut r = Reader::new(&frame);
    let full = ReadPropertyRequest::decode(&mut r).unwrap();
    assert_eq!(full.object_id, ObjectId::new(ObjectType::Device, 123));
    assert!(r.is_empty());

    for len in 0..frame.len() {
        let mut r = Reader::new(&frame[..len]);
        assert!(ReadPropertyRequest::decode(&mut r).is_err(), "{len} bytes decoded");
    }
}

#[cfg(feature = "serde")]
#[test]
fn decoded_values_serialize_to_json() {
    let req = WritePropertyRequest::new(
        ObjectId::new(ObjectType::AnalogValue, 3),
        PropertyId::PresentValue,
        ApplicationValue::Unsigned(5),
        9,
    );
    let json = serde_json::to_string(&req).unwrap();
    let back: WritePropertyRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, req);
}
