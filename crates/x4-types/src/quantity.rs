//! Deserializers for [`Quantity`] fields.
//!
//! The extension's scripting runtime has a single number type, so a whole
//! quantity may arrive as `500` or as `500.0`. Both decode to the same
//! `u64`. Fractional, negative, and out-of-range values are rejected.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::de::{self, Deserializer, Unexpected, Visitor};

use crate::structs::Quantity;

/// 2^64, the first float above every `u64`.
const QUANTITY_LIMIT: f64 = 18_446_744_073_709_551_616.0;

struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        match u64::try_from(v) {
            Ok(q) => Ok(q),
            Err(_) => Err(E::invalid_value(Unexpected::Signed(v), &self)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < QUANTITY_LIMIT {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let whole = v as Quantity;
            Ok(whole)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

/// Decode one quantity.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Quantity, D::Error> {
    deserializer.deserialize_any(QuantityVisitor)
}

#[derive(Deserialize)]
struct Lenient(#[serde(deserialize_with = "deserialize")] Quantity);

/// Decode an optional quantity. Pair with `#[serde(default)]`.
pub fn option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Quantity>, D::Error> {
    Ok(Option::<Lenient>::deserialize(deserializer)?.map(|Lenient(q)| q))
}

/// Decode a map of quantities.
pub fn map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Quantity>, D::Error> {
    Ok(BTreeMap::<String, Lenient>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, Lenient(q))| (key, q))
        .collect())
}
