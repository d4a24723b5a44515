//! Serialization and Deserialization implementation

use std::{collections::HashMap, result::Result};

use ::serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

use super::*;

/// Prefixes are written as `a.b.c.d/len`.
impl Serialize for BitPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BitPrefix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<BitPrefix>().map_err(D::Error::custom)
    }
}

impl<T: Serialize> Serialize for ForwardingTrie<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ForwardingTrie<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map: HashMap<BitPrefix, T> = HashMap::deserialize(deserializer)?;
        Ok(Self::from_iter(map))
    }
}
