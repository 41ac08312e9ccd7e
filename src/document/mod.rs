//! Document - typed JSON:API wire shapes.
//!
//! These types mirror the top-level document and resource objects consumed by
//! [`Store::sync`](crate::Store::sync) and produced by
//! [`ModelRef::serialize`](crate::ModelRef::serialize).
//!
//! Decoding is best-effort: a member of the wrong shape decodes as absent,
//! array elements that are not resource objects (or linkages) are dropped one
//! by one. Only text that is not JSON, or a top level that is not an object,
//! is rejected.
//!
//! ## Example
//!
//! ```
//! use jsonapi_store::Document;
//!
//! let doc = Document::from_str(r#"{"data": {"type": "article", "id": "1"}}"#).unwrap();
//! let primary = doc.data.unwrap();
//! assert_eq!(primary.iter().next().unwrap().resource_type, "article");
//! ```

pub mod serde_helpers;

use std::fmt;

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::StoreError;
use serde_helpers::{lenient, lenient_id, lenient_map, lenient_seq, present};

/// Free-form JSON object used for `links` and `meta` members.
pub type Object = serde_json::Map<String, Value>;

/// A top-level JSON:API document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<Value>,
}

/// Member decoding for [`Document`]. Only reached with an object, since the
/// derived visitor would also fill the fields from a positional array.
#[derive(Deserialize)]
#[serde(remote = "Document")]
struct DocumentMembers {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    data: Option<PrimaryData>,
    #[serde(default, deserialize_with = "lenient_seq::deserialize")]
    included: Option<Vec<ResourceObject>>,
    #[serde(default, deserialize_with = "lenient_seq::deserialize")]
    errors: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    meta: Option<Object>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    links: Option<Object>,
    #[serde(default)]
    jsonapi: Option<Value>,
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => {
                DocumentMembers::deserialize(value).map_err(D::Error::custom)
            }
            other => Err(D::Error::custom(format!(
                "a document must be a JSON object, got {}",
                other
            ))),
        }
    }
}

impl Document {
    /// A document whose primary data is a single resource.
    pub fn resource(resource: ResourceObject) -> Self {
        Document {
            data: Some(PrimaryData::One(resource)),
            ..Document::default()
        }
    }

    /// A document whose primary data is a collection of resources.
    pub fn collection(resources: Vec<ResourceObject>) -> Self {
        Document {
            data: Some(PrimaryData::Many(resources)),
            ..Document::default()
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_slice(json: &[u8]) -> Result<Self, StoreError> {
        Ok(serde_json::from_slice(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The `data` member of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(ResourceObject),
    Many(Vec<ResourceObject>),
}

impl PrimaryData {
    pub fn iter(&self) -> std::slice::Iter<'_, ResourceObject> {
        match self {
            PrimaryData::One(resource) => std::slice::from_ref(resource).iter(),
            PrimaryData::Many(resources) => resources.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PrimaryData::One(_) => 1,
            PrimaryData::Many(resources) => resources.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'de> Deserialize<'de> for PrimaryData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(PrimaryData::Many(serde_helpers::collect_lenient(items))),
            value @ Value::Object(_) => serde_json::from_value(value)
                .map(PrimaryData::One)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "primary data must be an object or an array, got {}",
                other
            ))),
        }
    }
}

/// One resource object: `type`, `id` and its fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_id::deserialize"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub attributes: Option<Object>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_map::deserialize"
    )]
    pub relationships: Option<IndexMap<String, RelationshipObject>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub links: Option<Object>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub meta: Option<Object>,
}

impl ResourceObject {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        ResourceObject {
            resource_type: resource_type.into(),
            id: Some(id.into()),
            ..ResourceObject::default()
        }
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey {
            resource_type: self.resource_type.clone(),
            id: self.id.clone(),
        }
    }
}

/// One entry of a resource's `relationships` member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipObject {
    /// `None` when the member is absent; `Some(RelationshipData::Null)` for an
    /// explicit `null`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present::deserialize"
    )]
    pub data: Option<RelationshipData>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub links: Option<Object>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub meta: Option<Object>,
}

/// Resource linkage held by a relationship.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipData {
    Null,
    One(Linkage),
    Many(Vec<Linkage>),
    /// Neither null, a linkage object nor an array. Kept verbatim and ignored
    /// by sync.
    Malformed(Value),
}

impl Serialize for RelationshipData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RelationshipData::Null => serializer.serialize_none(),
            RelationshipData::One(linkage) => linkage.serialize(serializer),
            RelationshipData::Many(linkages) => linkages.serialize(serializer),
            RelationshipData::Malformed(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RelationshipData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = match Value::deserialize(deserializer)? {
            Value::Null => RelationshipData::Null,
            Value::Array(items) => RelationshipData::Many(serde_helpers::collect_lenient(items)),
            value @ Value::Object(_) => match serde_json::from_value(value.clone()) {
                Ok(linkage) => RelationshipData::One(linkage),
                Err(_) => RelationshipData::Malformed(value),
            },
            other => RelationshipData::Malformed(other),
        };
        Ok(data)
    }
}

/// A resource identifier object: `{ type, id, meta? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linkage {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub meta: Option<Object>,
}

impl Linkage {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Linkage {
            resource_type: resource_type.into(),
            id: id.into(),
            meta: None,
        }
    }
}

/// Identity of a model: its type and, once persisted, its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub resource_type: String,
    pub id: Option<String>,
}

impl ResourceKey {
    pub fn new(resource_type: impl Into<String>, id: Option<String>) -> Self {
        ResourceKey {
            resource_type: resource_type.into(),
            id,
        }
    }

    pub fn matches(&self, resource_type: &str, id: &str) -> bool {
        self.resource_type == resource_type && self.id.as_deref() == Some(id)
    }

    /// Linkage for this key, if it has an id.
    pub fn linkage(&self) -> Option<Linkage> {
        self.id
            .as_ref()
            .map(|id| Linkage::new(self.resource_type.clone(), id.clone()))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{}", self.resource_type, id),
            None => write!(f, "{}:<new>", self.resource_type),
        }
    }
}
