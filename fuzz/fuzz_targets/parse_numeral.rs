#![no_main]
use libfuzzer_sys::fuzz_target;

use shamir_recover::{parse_numeral, Point, Share};

fuzz_target!(|input: (String, u8)| {
    let (value, base) = input;
    let base = u32::from(base);
    if let Ok(y) = parse_numeral("1", &value, base) {
        let share = Share::encode(&Point::new(1u32, y.clone()), base).unwrap();
        assert_eq!(parse_numeral("1", &share.value, base).unwrap(), y);
    }
});
