//! Exact [Shamir's Secret Sharing](https://en.wikipedia.org/wiki/Shamir%27s_Secret_Sharing) recovery over the integers
//!
//! Shares are points of an integer polynomial whose constant term is the secret. Each share is
//! written as a numeral in its own base (2 to 36), so values of any width can be carried. The
//! secret is recovered with Lagrange interpolation at `x = 0`, done in exact rational arithmetic
//! and rounded only once at the end.
//!
//! # Usage
//! ## Recovering from a share document
//!
//! ```
//! use shamir_recover::ShareSet;
//! use num_bigint::BigInt;
//!
//! let document = serde_json::json!({
//!     "keys": { "n": 4, "k": 3 },
//!     "1": { "base": "10", "value": "1" },
//!     "2": { "base": "10", "value": "2" },
//!     "3": { "base": "10", "value": "3" },
//!     "4": { "base": "10", "value": "4" }
//! });
//! // Points are sorted by x and the k lowest are interpolated
//! let set = ShareSet::from_document(&document).unwrap();
//! assert_eq!(set.recover().unwrap(), BigInt::from(0));
//! ```
//!
//! ## Dealing and recovering (no std)
//!
//! ```
//! use shamir_recover::{ SecretSharing, Point };
//! use num_bigint::BigInt;
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//!
//! // Set a minimum threshold of 5 shares
//! let sss = SecretSharing(5);
//! let secret = BigInt::from(0xdead_beef_u64);
//! // Obtain an iterator over shares of a polynomial with 128-bit coefficients
//! let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
//! let dealer = sss.dealer_rng(&secret, 128, &mut rng);
//! // Get 8 shares
//! let shares = dealer.take(8).collect::<Vec<Point>>();
//! // Recover the original secret!
//! assert_eq!(sss.recover(&shares).unwrap(), secret);
//! ```
//!
//! # Share documents
//!
//! A document is a JSON object. The reserved `keys` field holds `n` (shares issued) and `k`
//! (the threshold). Every other field name is the decimal `x` of a share and maps to
//! `{ "base": "<decimal radix>", "value": "<numeral in that radix>" }`. `n` and `k` may be
//! written as whole-valued floats (`2.0`). Two share fields with the same `x`, whether spelled
//! differently (`"1"`, `"01"`) or repeated verbatim in the JSON text, are rejected.
//!
//! # Selection policy
//!
//! When more than `k` shares are present, the `k` shares with the smallest `x` are used. The
//! remaining shares are not checked against the recovered polynomial.
//!
//! # Rounding
//!
//! Shares that do not come from an integer polynomial can interpolate to a fraction. The result
//! is rounded to the nearest integer with halves going away from zero, see
//! [`math::round_half_away`].
//!
//! # Feature flags
//!
//! - `std`: enables `dealer` (uses `rand::thread_rng`) and [`ShareSet::from_reader`]. Without
//!   `std` the crate is `no_std` and needs `alloc`.
//! - `cli`: builds the `shamir-recover` binary.
#![cfg_attr(not(feature = "std"), no_std)]

mod error;
mod loader;
pub mod math;
mod share;

extern crate alloc;

use num_bigint::BigInt;
use serde_json::Value;

pub use error::{Error, Result};
pub use loader::{ShareSet, KEYS_FIELD};
pub use share::{parse_numeral, Point, Share, MAX_BASE, MIN_BASE};

/// Tuple struct which implements methods to deal integer shares and recover secrets.
/// Its only parameter is the minimum shares threshold `k`.
///
/// Usage example:
/// ```
/// # use shamir_recover::{ SecretSharing, Point };
/// # use num_bigint::BigInt;
/// let sss = SecretSharing(3);
/// // Samples of y = 2x^2 + 3x + 7
/// let shares = [Point::new(3, 34), Point::new(1, 12), Point::new(2, 21)];
/// assert_eq!(sss.recover(&shares).unwrap(), BigInt::from(7));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecretSharing(pub usize);

impl SecretSharing {
    /// This method is useful when `std` is not available. For typical usage
    /// see the `dealer` method.
    ///
    /// Given a `secret`, returns an `Iterator` along new shares at `x = 1, 2, ...`.
    /// The non-constant coefficients are drawn from `[1, 2^bits)`.
    /// A random number generator has to be provided.
    pub fn dealer_rng<R: rand::Rng + ?Sized>(
        &self,
        secret: &BigInt,
        bits: u64,
        rng: &mut R,
    ) -> impl Iterator<Item = Point> {
        let poly = math::random_polynomial(secret.clone(), self.0.max(1), bits, rng);
        math::get_evaluator(poly)
    }

    /// Given a `secret`, returns an `Iterator` along new shares at `x = 1, 2, ...`.
    ///
    /// Example:
    /// ```
    /// # use shamir_recover::{ SecretSharing, Point };
    /// # use num_bigint::BigInt;
    /// let sss = SecretSharing(3);
    /// let shares = sss.dealer(&BigInt::from(42), 64).take(3).collect::<Vec<Point>>();
    /// assert_eq!(sss.recover(&shares).unwrap(), BigInt::from(42));
    /// ```
    #[cfg(feature = "std")]
    pub fn dealer(&self, secret: &BigInt, bits: u64) -> impl Iterator<Item = Point> {
        let mut rng = rand::thread_rng();
        self.dealer_rng(secret, bits, &mut rng)
    }

    /// Deals `n` shares of `secret` and collects them into a [`ShareSet`].
    pub fn split_rng<R: rand::Rng + ?Sized>(
        &self,
        secret: &BigInt,
        n: usize,
        bits: u64,
        rng: &mut R,
    ) -> Result<ShareSet> {
        let points = self.dealer_rng(secret, bits, rng).take(n).collect();
        ShareSet::new(n, self.0, points)
    }

    /// Given a collection of points, recovers the original secret.
    ///
    /// The points are sorted by `x` and the `k` lowest are interpolated. Fewer than `k`
    /// points fail with `InsufficientShares`; points sharing an `x` fail with
    /// `DuplicateAbscissa`.
    pub fn recover(&self, points: &[Point]) -> Result<BigInt> {
        self.share_set(points)?.recover()
    }

    /// Given a collection of points, computes a fresh share at abscissa `x` from the `k`
    /// lowest points, so a lost share can be re-issued without revealing the secret.
    ///
    /// Example:
    /// ```
    /// # use shamir_recover::{ SecretSharing, Point };
    /// # use num_bigint::BigInt;
    /// let sss = SecretSharing(2);
    /// // Samples of y = 5x + 1
    /// let shares = [Point::new(1, 6), Point::new(4, 21)];
    /// assert_eq!(sss.reshare(&shares, &BigInt::from(2)).unwrap(), Point::new(2, 11));
    /// ```
    pub fn reshare(&self, points: &[Point], x: &BigInt) -> Result<Point> {
        let set = self.share_set(points)?;
        let y = math::interpolate_at(set.selected(), x)?;
        Ok(Point { x: x.clone(), y })
    }

    fn share_set(&self, points: &[Point]) -> Result<ShareSet> {
        if points.len() < self.0 {
            return Err(Error::InsufficientShares {
                needed: self.0,
                got: points.len(),
            });
        }
        ShareSet::new(points.len(), self.0, points.to_vec())
    }
}

/// Loads a share document and recovers its secret in one step.
pub fn recover_document(document: &Value) -> Result<BigInt> {
    ShareSet::from_document(document)?.recover()
}
