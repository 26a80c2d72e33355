use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};

/// Smallest radix a share value may be encoded in.
pub const MIN_BASE: u32 = 2;
/// Largest radix a share value may be encoded in (digits `0-9` and `a-z`).
pub const MAX_BASE: u32 = 36;

/// A resolved sample `(x, y)` of the secret-bearing polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    /// The abscissa, derived from the share's field name.
    pub x: BigInt,
    /// The ordinate, decoded from the share's value.
    pub y: BigInt,
}

impl Point {
    pub fn new(x: impl Into<BigInt>, y: impl Into<BigInt>) -> Self {
        Point {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl<X: Into<BigInt>, Y: Into<BigInt>> From<(X, Y)> for Point {
    fn from((x, y): (X, Y)) -> Self {
        Point::new(x, y)
    }
}

/// The `{ "base": .., "value": .. }` object stored under each share field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
struct Descriptor {
    base: String,
    value: String,
}

/// One encoded entry of a share document.
///
/// Usage example:
/// ```
/// use shamir_recover::{Point, Share};
/// use serde_json::json;
///
/// let share = Share::parse("2", &json!({ "base": "16", "value": "1a" })).unwrap();
/// assert_eq!(share.to_point(), Point::new(2, 26));
///
/// // Shares can be rendered back into any base
/// let encoded = Share::encode(&Point::new(2, 26), 2).unwrap();
/// assert_eq!(encoded.value, "11010");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    /// The abscissa, always positive.
    pub x: BigUint,
    /// The radix of `value`, within `MIN_BASE..=MAX_BASE`.
    pub base: u32,
    /// The numeral, as written in the document.
    pub value: String,
    /// `value` decoded in `base`.
    pub y: BigUint,
}

impl Share {
    /// Parses the share stored under `field` in a document.
    ///
    /// The field name is the decimal abscissa, the descriptor holds the radix
    /// as a decimal string and the numeral itself. The numeral is validated
    /// against the radix here, so a parsed `Share` always converts to a point.
    pub fn parse(field: &str, descriptor: &Value) -> Result<Share> {
        let x = parse_abscissa(field)?;
        let raw = Descriptor::deserialize(descriptor)
            .map_err(|e| Error::malformed(field, e.to_string()))?;
        let base = parse_base(field, &raw.base)?;
        let y = parse_numeral(field, &raw.value, base)?;

        Ok(Share {
            x,
            base,
            value: raw.value,
            y,
        })
    }

    /// The share's `(x, y)` point.
    pub fn to_point(&self) -> Point {
        Point {
            x: BigInt::from(self.x.clone()),
            y: BigInt::from(self.y.clone()),
        }
    }

    /// Encodes `point` as a share whose value is written in `base`.
    ///
    /// Only points with a positive `x` and a non-negative `y` can be written
    /// in the document format.
    pub fn encode(point: &Point, base: u32) -> Result<Share> {
        let field = point.x.to_string();
        if !(MIN_BASE..=MAX_BASE).contains(&base) {
            return Err(Error::malformed(
                field,
                format!("base {base} is outside {MIN_BASE}..={MAX_BASE}"),
            ));
        }
        let x = match point.x.sign() {
            Sign::Plus => point.x.magnitude().clone(),
            _ => return Err(Error::malformed(field, "x must be a positive integer")),
        };
        if point.y.sign() == Sign::Minus {
            return Err(Error::malformed(field, "negative values cannot be encoded"));
        }

        let y = point.y.magnitude().clone();
        Ok(Share {
            x,
            base,
            value: y.to_str_radix(base),
            y,
        })
    }

    /// The document field name of this share.
    pub fn field(&self) -> String {
        self.x.to_string()
    }

    /// The descriptor object stored under [`Share::field`].
    pub fn descriptor(&self) -> Value {
        json!({
            "base": self.base.to_string(),
            "value": self.value,
        })
    }
}

// Field names are plain decimal numerals: no sign, no whitespace.
fn parse_abscissa(field: &str) -> Result<BigUint> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed(
            field,
            "field name is not a base-10 integer",
        ));
    }
    let x = BigUint::parse_bytes(field.as_bytes(), 10)
        .ok_or_else(|| Error::malformed(field, "field name is not a base-10 integer"))?;
    if x.is_zero() {
        return Err(Error::malformed(field, "x must be a positive integer"));
    }
    Ok(x)
}

fn parse_base(field: &str, base: &str) -> Result<u32> {
    if base.is_empty() || !base.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed(
            field,
            format!("base `{base}` is not a base-10 integer"),
        ));
    }
    let radix = base.parse::<u32>().map_err(|_| {
        Error::malformed(field, format!("base `{base}` is outside {MIN_BASE}..={MAX_BASE}"))
    })?;
    if !(MIN_BASE..=MAX_BASE).contains(&radix) {
        return Err(Error::malformed(
            field,
            format!("base `{base}` is outside {MIN_BASE}..={MAX_BASE}"),
        ));
    }
    Ok(radix)
}

/// Decodes `value` as an unsigned numeral in `base`.
///
/// Digits are `0-9` followed by `a-z`, case-insensitive. Signs, separators
/// and whitespace are rejected.
pub fn parse_numeral(field: &str, value: &str, base: u32) -> Result<BigUint> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(Error::malformed(
            field,
            format!("base {base} is outside {MIN_BASE}..={MAX_BASE}"),
        ));
    }
    if value.is_empty() {
        return Err(Error::malformed(field, "value is empty"));
    }

    let digits = value
        .chars()
        .map(|c| {
            c.to_digit(base).map(|d| d as u8).ok_or_else(|| {
                Error::malformed(field, format!("digit `{c}` is not valid in base {base}"))
            })
        })
        .collect::<Result<Vec<u8>>>()?;

    BigUint::from_radix_be(&digits, base)
        .ok_or_else(|| Error::malformed(field, format!("`{value}` is not a base {base} numeral")))
}
