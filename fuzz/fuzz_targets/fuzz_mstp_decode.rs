#![no_main]

use bacwire_mstp::MstpFrame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok((frame, used)) = MstpFrame::decode(data) {
        assert!(used <= data.len());
        assert_eq!(frame.to_vec().expect("decoded frame re-encodes"), &data[..used]);
    }
});
