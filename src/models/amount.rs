//! Decimal (de)serialization for `U256` amounts.
//!
//! Indexers and config files write token amounts as decimal strings, sometimes
//! as plain JSON numbers when they are small enough.

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serializer};

pub fn parse_amount(s: &str) -> Result<U256, String> {
    U256::from_dec_str(s.trim()).map_err(|e| format!("invalid amount '{}': {:?}", s, e))
}

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Q {
        Str(String),
        Num(u64),
    }
    match Q::deserialize(deserializer)? {
        Q::Str(s) => parse_amount(&s).map_err(serde::de::Error::custom),
        Q::Num(n) => Ok(U256::from(n)),
    }
}
