#![no_main]

use bacwire_core::encoding::reader::Reader;
use bacwire_core::services::value_codec::decode_value_list;
use bacwire_core::types::PropertyId;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the property so context tags resolve against varied types.
    let Some((&property, body)) = data.split_first() else {
        return;
    };
    let mut r = Reader::new(body);
    let _ = decode_value_list(&mut r, PropertyId::from_u32(u32::from(property)), None);
});
