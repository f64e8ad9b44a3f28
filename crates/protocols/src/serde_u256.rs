//! Serialises `U256` ledger integers as decimal strings.

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serializer, de};

fn parse<E: de::Error>(s: &str) -> Result<U256, E> {
    U256::from_dec_str(s).map_err(|e| E::custom(format!("invalid integer {s:?}: {e:?}")))
}

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse(&s)
}

/// Same encoding for a list of values.
pub mod vec {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(values: &[U256], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<U256>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter().map(|s| parse(s)).collect()
    }
}
