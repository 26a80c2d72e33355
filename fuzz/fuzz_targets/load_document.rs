#![no_main]
use libfuzzer_sys::fuzz_target;

use shamir_recover::ShareSet;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = core::str::from_utf8(data) {
        if let Ok(set) = ShareSet::from_json_str(text) {
            let _ = set.recover();
        }
    }
});
