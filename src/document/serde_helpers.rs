//! Serde helpers for best-effort JSON:API decoding.
//!
//! Documents are normalized, not validated: a member of the wrong shape
//! decodes as "absent" instead of failing the whole document.

/// Decode `Option<T>`, mapping any value that does not fit `T` to `None`.
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }
}

/// Decode `Option<Vec<T>>` element by element, dropping elements that do not
/// fit `T`. A non-array value decodes as `None`.
pub mod lenient_seq {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(Some(super::collect_lenient(items))),
            _ => Ok(None),
        }
    }
}

/// Decode `Option<IndexMap<String, T>>` entry by entry, dropping entries whose
/// value does not fit `T`. A non-object value decodes as `None`.
pub mod lenient_map {
    use indexmap::IndexMap;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<IndexMap<String, T>>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(entries) => Ok(Some(
                entries
                    .into_iter()
                    .filter_map(|(name, value)| {
                        serde_json::from_value(value).ok().map(|decoded| (name, decoded))
                    })
                    .collect(),
            )),
            _ => Ok(None),
        }
    }
}

/// Decode a resource `id`. Only strings are identifiers; anything else is
/// treated as a missing id.
pub mod lenient_id {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(id) => Ok(Some(id)),
            _ => Ok(None),
        }
    }
}

/// Decode `Option<T>` so that an explicit `null` reaches `T` instead of
/// collapsing into `None`. Pair with `#[serde(default)]`: `None` then means
/// the member was absent.
pub mod present {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Some)
    }
}

pub(crate) fn collect_lenient<T>(items: Vec<serde_json::Value>) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}
