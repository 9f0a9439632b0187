use bacwire_core::encoding::writer::Writer;
use bacwire_core::npdu::Npdu;
use bacwire_mstp::{FrameType, MstpError, MstpFrame, MstpFrameReader, MSTP_HEADER_LEN};
use proptest::prelude::*;

proptest! {
    #[test]
    fn frames_survive_the_wire(
        ty in any::<u8>(),
        dst in any::<u8>(),
        src in any::<u8>(),
        data in proptest::collection::vec(any::<u8>(), 0..300),
    ) {
        let frame = MstpFrame {
            frame_type: FrameType::from_u8(ty),
            destination: dst,
            source: src,
            data,
        };
        let bytes = frame.to_vec().unwrap();
        prop_assert_eq!(bytes.len(), frame.encoded_len());
        let (decoded, used) = MstpFrame::decode(&bytes).unwrap();
        prop_assert_eq!(used, bytes.len());
        prop_assert_eq!(decoded, frame);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = MstpFrame::decode(&bytes);
    }
}

#[test]
fn data_frame_carries_an_npdu() {
    let mut buf = [0u8; 16];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w).unwrap();
    w.write_all(&[0x10, 0x08]).unwrap();
    let npdu = w.as_written().to_vec();
    let frame = MstpFrame::data(0xFF, 4, npdu.clone(), false);
    let bytes = frame.to_vec().unwrap();
    assert_eq!(bytes[2], 6);
    let (decoded, _) = MstpFrame::decode(&bytes).unwrap();
    assert_eq!(decoded.npdu(), Some(npdu.as_slice()));
}

#[test]
fn header_only_frame_has_no_data_crc() {
    let bytes = MstpFrame::token(1, 0).to_vec().unwrap();
    assert_eq!(bytes.len(), MSTP_HEADER_LEN);
    let mut longer = bytes.clone();
    longer.extend([0xAA, 0xBB]);
    let (_, used) = MstpFrame::decode(&longer).unwrap();
    assert_eq!(used, MSTP_HEADER_LEN);
}

#[test]
fn reports_both_crcs() {
    let mut bytes = MstpFrame::data(2, 1, vec![1, 2, 3], true).to_vec().unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    match MstpFrame::decode(&bytes) {
        Err(MstpError::DataCrc { received, computed }) => assert_ne!(received, computed),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn reader_yields_frames_in_order() {
    let frames: Vec<MstpFrame> = (0..5u8)
        .map(|i| MstpFrame::data(0xFF, i, vec![0x01, 0x00, i], false))
        .collect();
    let mut stream = Vec::new();
    for f in &frames {
        stream.extend([0x00, 0xFF]);
        stream.extend(f.to_vec().unwrap());
    }
    let mut reader = MstpFrameReader::new(stream.as_slice());
    for f in &frames {
        assert_eq!(reader.next_frame().await.unwrap().as_ref(), Some(f));
    }
    assert!(reader.next_frame().await.unwrap().is_none());
}
