#![no_main]

use bacwire_datalink::BvlcMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = BvlcMessage::decode(data) {
        let encoded = message.to_vec().expect("decoded message re-encodes");
        assert_eq!(BvlcMessage::decode(&encoded), Ok(message));
    }
});
