#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use num_bigint::BigInt;
use shamir_recover::{Point, SecretSharing};

#[derive(Arbitrary, Debug)]
struct Input {
    k: u8,
    points: Vec<(i64, i128)>,
}

fuzz_target!(|input: Input| {
    let points: Vec<Point> = input
        .points
        .iter()
        .take(64)
        .map(|&(x, y)| Point::new(BigInt::from(x), BigInt::from(y)))
        .collect();
    let _ = SecretSharing(usize::from(input.k)).recover(&points);
});
