use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use hashbrown::HashMap;
use num_bigint::BigInt;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::math;
use crate::share::{Point, Share};

/// Name of the reserved document field holding `n` and `k`.
pub const KEYS_FIELD: &str = "keys";

const DOCUMENT: &str = "<document>";

/// Top-level document fields in text order, repeated names included.
struct Fields(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a share document object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> core::result::Result<Fields, A::Error> {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    fields.push(entry);
                }
                Ok(Fields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// The points of one test case together with its `n`/`k` metadata.
///
/// Points are sorted by ascending `x` and their abscissas are distinct.
///
/// Usage example:
/// ```
/// use shamir_recover::ShareSet;
/// use num_bigint::BigInt;
///
/// let document = r#"{
///     "keys": { "n": 4, "k": 3 },
///     "1": { "base": "10", "value": "4" },
///     "2": { "base": "2", "value": "111" },
///     "3": { "base": "10", "value": "12" },
///     "6": { "base": "4", "value": "213" }
/// }"#;
/// let set = ShareSet::from_json_str(document).unwrap();
/// assert_eq!(set.recover().unwrap(), BigInt::from(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareSet {
    n: usize,
    k: usize,
    points: Vec<Point>,
}

impl ShareSet {
    /// Builds a set from already resolved points.
    ///
    /// Fails when `k` is zero, when `n < k`, when two points share an `x`, or
    /// when fewer than `k` points are given.
    pub fn new(n: usize, k: usize, mut points: Vec<Point>) -> Result<ShareSet> {
        validate_keys(n, k)?;

        points.sort_by(|a, b| a.x.cmp(&b.x));
        if let Some(pair) = points.windows(2).find(|pair| pair[0].x == pair[1].x) {
            let x = pair[0].x.to_string();
            return Err(Error::DuplicateAbscissa {
                first: x.clone(),
                second: x.clone(),
                x,
            });
        }

        if points.len() < k {
            return Err(Error::InsufficientShares {
                needed: k,
                got: points.len(),
            });
        }

        Ok(ShareSet { n, k, points })
    }

    /// Loads a set from a parsed share document.
    ///
    /// Every field except `keys` names a share: its name is the decimal `x`,
    /// its value a `{ "base": .., "value": .. }` descriptor.
    pub fn from_document(document: &Value) -> Result<ShareSet> {
        let fields = document
            .as_object()
            .ok_or_else(|| Error::metadata(DOCUMENT, "document is not an object"))?;
        Self::from_fields(fields)
    }

    /// Loads a set from the fields of a share document.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<ShareSet> {
        Self::from_entries(fields.iter().map(|(field, value)| (field.as_str(), value)))
    }

    /// Parses a JSON share document and loads it.
    ///
    /// A field name repeated in the text is not collapsed: a repeated share
    /// fails with `DuplicateAbscissa`, a repeated `keys` with `MissingMetadata`.
    pub fn from_json_str(document: &str) -> Result<ShareSet> {
        let Fields(fields) = serde_json::from_str(document)
            .map_err(|e| Error::metadata(DOCUMENT, e.to_string()))?;
        Self::from_entries(fields.iter().map(|(field, value)| (field.as_str(), value)))
    }

    /// Reads a JSON share document and loads it.
    #[cfg(feature = "std")]
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<ShareSet> {
        let Fields(fields) = serde_json::from_reader(reader)
            .map_err(|e| Error::metadata(DOCUMENT, e.to_string()))?;
        Self::from_entries(fields.iter().map(|(field, value)| (field.as_str(), value)))
    }

    fn from_entries<'a, I>(entries: I) -> Result<ShareSet>
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let entries: Vec<(&str, &Value)> = entries.into_iter().collect();

        let mut keys = entries.iter().filter(|(field, _)| *field == KEYS_FIELD);
        let (_, metadata) = keys
            .next()
            .ok_or_else(|| Error::metadata(KEYS_FIELD, "field is absent"))?;
        if keys.next().is_some() {
            return Err(Error::metadata(KEYS_FIELD, "field appears more than once"));
        }
        let n = read_count(metadata, "n")?;
        let k = read_count(metadata, "k")?;
        validate_keys(n, k)?;

        // Distinct names such as "1" and "01" can resolve to the same x.
        let mut seen: HashMap<BigInt, &str> = HashMap::with_capacity(entries.len());
        let mut points = Vec::with_capacity(entries.len());

        for &(field, descriptor) in &entries {
            if field == KEYS_FIELD {
                continue;
            }
            let point = Share::parse(field, descriptor)?.to_point();
            if let Some(first) = seen.insert(point.x.clone(), field) {
                return Err(Error::DuplicateAbscissa {
                    x: point.x.to_string(),
                    first: first.to_string(),
                    second: field.to_string(),
                });
            }
            points.push(point);
        }

        Self::new(n, k, points)
    }

    /// The declared total number of shares.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The threshold.
    pub fn k(&self) -> usize {
        self.k
    }

    /// All points, sorted by ascending `x`.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The `k` points with the smallest `x`, which are the ones used for recovery.
    pub fn selected(&self) -> &[Point] {
        &self.points[..self.k]
    }

    /// Recovers the secret from the `k` lowest-`x` points.
    pub fn recover(&self) -> Result<BigInt> {
        math::interpolate(self.selected())
    }

    /// Renders the set back into a share document with every value in `base`.
    pub fn to_document(&self, base: u32) -> Result<Value> {
        let mut fields = BTreeMap::new();
        for point in &self.points {
            let share = Share::encode(point, base)?;
            fields.insert(share.field(), share.descriptor());
        }

        let mut document = Map::new();
        document.insert(
            KEYS_FIELD.to_string(),
            serde_json::json!({ "n": self.n, "k": self.k }),
        );
        document.extend(fields);
        Ok(Value::Object(document))
    }
}

// Counts are JSON integers; whole-valued floats such as `2.0` are accepted too.
fn read_count(keys: &Value, name: &str) -> Result<usize> {
    let fields = keys
        .as_object()
        .ok_or_else(|| Error::metadata(KEYS_FIELD, "expected an object with `n` and `k`"))?;
    let value = fields
        .get(name)
        .ok_or_else(|| Error::metadata(name, "field is absent"))?;

    let count = match (value.as_u64(), value.as_f64()) {
        (Some(count), _) => Some(count),
        (None, Some(float)) if float >= 0.0 && float <= u64::MAX as f64 => {
            let whole = float as u64;
            (whole as f64 == float).then_some(whole)
        }
        _ => None,
    };

    count
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| Error::metadata(name, format!("`{value}` is not a non-negative integer")))
}

fn validate_keys(n: usize, k: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::metadata("k", "threshold must be at least 1"));
    }
    if n < k {
        return Err(Error::metadata(
            "n",
            format!("{n} shares cannot meet a threshold of {k}"),
        ));
    }
    Ok(())
}
