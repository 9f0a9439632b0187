#![no_main]

use bacwire_core::encoding::reader::Reader;
use bacwire_core::npdu::Npdu;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    if let Ok(npdu) = Npdu::decode(&mut r) {
        assert!(r.position() <= data.len());
        let _ = npdu.expecting_reply();
    }
});
