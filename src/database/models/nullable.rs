//! Serde helpers for `Option<Option<T>>` update fields.
//!
//! An absent field stays `None` (via `#[serde(default)]`), an explicit `null`
//! becomes `Some(None)` and serializes back to `null`, so it reaches the
//! update builder as a NULL assignment.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Same, for decimals carried as JSON numbers.
pub mod float {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<Option<Decimal>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => rust_decimal::serde::float_option::serialize(inner, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error> {
        rust_decimal::serde::float_option::deserialize(deserializer).map(Some)
    }
}
