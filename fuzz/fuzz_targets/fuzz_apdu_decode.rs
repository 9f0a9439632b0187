#![no_main]

use bacwire_core::apdu::{decoded_invoke_id, Apdu};
use bacwire_core::encoding::reader::Reader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    if let Ok(apdu) = Apdu::decode(&mut r) {
        if let (Some(a), Some(b)) = (apdu.invoke_id(), decoded_invoke_id(data)) {
            assert_eq!(a, b);
        }
    }
});
