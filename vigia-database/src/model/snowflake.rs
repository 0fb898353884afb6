//! Serde helpers for platform identifiers.
//!
//! Identifiers are written as strings (the platform's JSON convention) and
//! accepted back as either strings or plain numbers. `null` and `""` read as
//! "not set".

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_id<E: de::Error>(self) -> Result<u64, E> {
        match self {
            RawId::Number(id) => Ok(id),
            RawId::Text(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| E::custom(format!("invalid snowflake `{raw}`"))),
        }
    }
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(id) => serializer.serialize_some(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        match Option::<RawId>::deserialize(deserializer)? {
            Some(RawId::Text(raw)) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw.into_id().map(Some),
            None => Ok(None),
        }
    }
}

pub mod set {
    use std::collections::BTreeSet;

    use serde::ser::SerializeSeq;

    use super::*;

    pub fn serialize<S: Serializer>(value: &BTreeSet<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(value.len()))?;
        for id in value {
            seq.serialize_element(&id.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<u64>, D::Error> {
        Option::<Vec<RawId>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter()
            .map(|raw| raw.into_id::<D::Error>())
            .collect()
    }
}
