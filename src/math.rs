// A module which contains the exact arithmetic used to recover secrets and deal integer shares

use alloc::{format, vec::Vec};

use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::{Error, Result};
use crate::share::Point;

/// Evaluates, at `x`, the unique polynomial of degree `< points.len()` passing
/// through `points`, keeping every intermediate value as a reduced fraction.
///
/// Fails with `DuplicateAbscissa` when two points share an `x`, and with
/// `InsufficientShares` when `points` is empty.
pub fn lagrange_at(points: &[Point], x: &BigInt) -> Result<BigRational> {
    if points.is_empty() {
        return Err(Error::InsufficientShares { needed: 1, got: 0 });
    }

    let mut result = BigRational::zero();

    for (i, p_i) in points.iter().enumerate() {
        let mut term = BigRational::from_integer(p_i.y.clone());

        for (j, p_j) in points.iter().enumerate() {
            if i == j {
                continue;
            }

            let denom = &p_i.x - &p_j.x;
            if denom.is_zero() {
                return Err(Error::DuplicateAbscissa {
                    x: p_i.x.to_str_radix(10),
                    first: format!("point #{i}"),
                    second: format!("point #{j}"),
                });
            }
            // Ratio::new reduces and moves the sign onto the numerator.
            term *= BigRational::new(x - &p_j.x, denom);
        }

        result += term;
    }

    Ok(result)
}

/// Rounds an exact fraction to the nearest integer, halves away from zero.
///
/// With `r = |num| mod den`, the magnitude is bumped by one whenever
/// `2r >= den`, otherwise the quotient is truncated toward zero. For
/// non-negative values this is plain round-half-up; negative values mirror it,
/// so `-5/2` becomes `-3`.
pub fn round_half_away(value: &BigRational) -> BigInt {
    // Denominators of a reduced Ratio are always positive.
    let den = value.denom();
    let (quot, rem) = value.numer().abs().div_rem(den);

    let magnitude = if (rem << 1u32) >= *den {
        quot + BigInt::one()
    } else {
        quot
    };

    if value.numer().is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Evaluates the interpolating polynomial at `x` and rounds the exact result.
pub fn interpolate_at(points: &[Point], x: &BigInt) -> Result<BigInt> {
    lagrange_at(points, x).map(|value| round_half_away(&value))
}

/// Finds the [root of the Lagrange polynomial](https://en.wikipedia.org/wiki/Shamir%27s_Secret_Sharing#Computationally_efficient_approach),
/// i.e. its value at `x = 0`, which is the shared secret.
pub fn interpolate(points: &[Point]) -> Result<BigInt> {
    interpolate_at(points, &BigInt::zero())
}

// Generates `k` polynomial coefficients, being the last one `s` and the others drawn uniformly
// from `[1, 2^bits)`. Coefficient degrees go from higher to lower in the returned vector order.
pub fn random_polynomial<R: rand::Rng + ?Sized>(
    s: BigInt,
    k: usize,
    bits: u64,
    rng: &mut R,
) -> Vec<BigInt> {
    let mut poly = Vec::with_capacity(k);
    let low = BigInt::one();
    let high = BigInt::one() << bits.max(1);

    for _ in 1..k {
        poly.push(rng.gen_bigint_range(&low, &high));
    }
    poly.push(s);

    poly
}

/// Evaluates a polynomial, coefficients ordered from highest degree to lowest, at `x`.
pub fn evaluate(poly: &[BigInt], x: &BigInt) -> BigInt {
    poly.iter().fold(BigInt::zero(), |acc, c| acc * x + c)
}

// Returns an iterator over the points of `poly`, starting at `x = 1`.
pub fn get_evaluator(poly: Vec<BigInt>) -> impl Iterator<Item = Point> {
    (1u64..).map(move |x| {
        let x = BigInt::from(x);
        let y = evaluate(&poly, &x);
        Point { x, y }
    })
}

#[cfg(test)]
mod tests {
    use super::{
        evaluate, get_evaluator, interpolate, interpolate_at, lagrange_at, random_polynomial,
        round_half_away,
    };
    use crate::error::Error;
    use crate::share::Point;
    use alloc::{vec, vec::Vec};
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;
    use rand_chacha::rand_core::SeedableRng;
    use rstest::rstest;

    fn points(raw: &[(i64, i64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn random_polynomial_works() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let poly = random_polynomial(BigInt::from(1), 3, 64, &mut rng);
        assert_eq!(poly.len(), 3);
        assert_eq!(poly[2], BigInt::from(1));
        assert!(poly[..2].iter().all(|c| *c >= BigInt::from(1)));
    }

    #[test]
    fn evaluator_works() {
        let iter = get_evaluator(vec![BigInt::from(3), BigInt::from(2), BigInt::from(5)]);
        let values: Vec<_> = iter.take(2).collect();
        assert_eq!(values, points(&[(1, 10), (2, 21)]));
    }

    #[test]
    fn interpolate_works() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let secret: BigInt = "123456789012345678901234567890123456789".parse().unwrap();
        let poly = random_polynomial(secret.clone(), 10, 256, &mut rng);
        let shares: Vec<Point> = get_evaluator(poly).take(10).collect();
        assert_eq!(interpolate(&shares).unwrap(), secret);
    }

    #[test]
    fn identity_line_recovers_zero() {
        assert_eq!(
            interpolate(&points(&[(1, 1), (2, 2), (3, 3)])).unwrap(),
            BigInt::from(0)
        );
    }

    #[test]
    fn interpolate_at_other_abscissas() {
        // y = x^2 + 3
        let samples = points(&[(1, 4), (2, 7), (3, 12)]);
        assert_eq!(
            interpolate_at(&samples, &BigInt::from(6)).unwrap(),
            BigInt::from(39)
        );
        assert_eq!(
            interpolate_at(&samples, &BigInt::from(-2)).unwrap(),
            BigInt::from(7)
        );
    }

    #[test]
    fn non_integral_results_stay_exact() {
        // The line through (1, 1) and (3, 2) crosses x = 0 at 1/2.
        let samples = points(&[(1, 1), (3, 2)]);
        let exact = lagrange_at(&samples, &BigInt::from(0)).unwrap();
        assert_eq!(exact, BigRational::new(BigInt::from(1), BigInt::from(2)));
        assert_eq!(interpolate(&samples).unwrap(), BigInt::from(1));
    }

    #[test]
    fn negative_results_round_away_from_zero() {
        // The line through (1, -1) and (3, -2) crosses x = 0 at -1/2.
        let samples = points(&[(1, -1), (3, -2)]);
        assert_eq!(interpolate(&samples).unwrap(), BigInt::from(-1));
    }

    #[rstest]
    #[case(5, 2, 3)]
    #[case(7, 3, 2)]
    #[case(8, 3, 3)]
    #[case(6, 3, 2)]
    #[case(1, 3, 0)]
    #[case(0, 1, 0)]
    #[case(-5, 2, -3)]
    #[case(-7, 3, -2)]
    #[case(-8, 3, -3)]
    #[case(-1, 3, 0)]
    #[case(5, -2, -3)]
    fn rounding_policy(#[case] numer: i64, #[case] denom: i64, #[case] expected: i64) {
        let value = BigRational::new(BigInt::from(numer), BigInt::from(denom));
        assert_eq!(round_half_away(&value), BigInt::from(expected));
    }

    #[test]
    fn duplicate_abscissa_is_rejected() {
        let err = interpolate(&points(&[(1, 5), (2, 7), (1, 9)])).unwrap_err();
        assert!(matches!(err, Error::DuplicateAbscissa { ref x, .. } if x == "1"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            interpolate(&[]).unwrap_err(),
            Error::InsufficientShares { needed: 1, got: 0 }
        );
    }

    #[test]
    fn single_point_is_constant() {
        assert_eq!(
            interpolate(&points(&[(4, 42)])).unwrap(),
            BigInt::from(42)
        );
    }

    // Small integer polynomials sampled at distinct positive abscissas.
    fn sample(coeffs: &[i16], xs: &[u8]) -> Option<Vec<Point>> {
        let poly: Vec<BigInt> = coeffs.iter().map(|&c| BigInt::from(c)).collect();
        let mut seen = Vec::new();
        for &x in xs {
            let x = u32::from(x) + 1;
            if !seen.contains(&x) {
                seen.push(x);
            }
        }
        if poly.is_empty() || seen.len() < poly.len() {
            return None;
        }
        Some(
            seen.into_iter()
                .map(|x| {
                    let x = BigInt::from(x);
                    let y = evaluate(&poly, &x);
                    Point { x, y }
                })
                .collect(),
        )
    }

    #[quickcheck]
    fn round_trip_recovers_constant_term(coeffs: Vec<i16>, xs: Vec<u8>) -> TestResult {
        let coeffs: Vec<i16> = coeffs.into_iter().take(6).collect();
        let Some(samples) = sample(&coeffs, &xs) else {
            return TestResult::discard();
        };
        let k = coeffs.len();
        let secret = BigInt::from(*coeffs.last().unwrap());
        TestResult::from_bool(interpolate(&samples[..k]).unwrap() == secret)
    }

    #[quickcheck]
    fn order_does_not_matter(coeffs: Vec<i16>, xs: Vec<u8>) -> TestResult {
        let coeffs: Vec<i16> = coeffs.into_iter().take(6).collect();
        let Some(samples) = sample(&coeffs, &xs) else {
            return TestResult::discard();
        };
        let k = coeffs.len();
        let forward = lagrange_at(&samples[..k], &BigInt::from(0)).unwrap();
        let mut reversed = samples[..k].to_vec();
        reversed.reverse();
        reversed.rotate_left(k / 2);
        TestResult::from_bool(lagrange_at(&reversed, &BigInt::from(0)).unwrap() == forward)
    }

    #[quickcheck]
    fn any_k_subset_agrees(coeffs: Vec<i16>, xs: Vec<u8>) -> TestResult {
        let coeffs: Vec<i16> = coeffs.into_iter().take(5).collect();
        let Some(samples) = sample(&coeffs, &xs) else {
            return TestResult::discard();
        };
        let k = coeffs.len();
        if samples.len() == k {
            return TestResult::discard();
        }
        let secret = BigInt::from(*coeffs.last().unwrap());
        let lowest = interpolate(&samples[..k]).unwrap();
        let highest = interpolate(&samples[samples.len() - k..]).unwrap();
        let spread: Vec<Point> = samples.iter().step_by(2).take(k).cloned().collect();
        let spread_ok = spread.len() < k || interpolate(&spread).unwrap() == secret;
        TestResult::from_bool(lowest == secret && highest == secret && spread_ok)
    }
}
