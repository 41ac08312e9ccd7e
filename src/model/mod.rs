//! Models - one mutable entity per JSON:API resource.
//!
//! A [`Model`] owns its attributes, relationships, links and meta, plus the
//! reverse-dependency triples needed to unlink it from others. Models are
//! shared through [`ModelRef`] handles: later syncs mutate the same model, so
//! every holder of a handle observes updates.
//!
//! ## Example
//!
//! ```
//! use jsonapi_store::{Model, ModelRef, SerializeOptions};
//! use serde_json::json;
//!
//! let mut model = Model::new("article");
//! model.set_attribute("title", json!("Draft"));
//! let article = ModelRef::new(model);
//!
//! let doc = article.serialize(&SerializeOptions::default()).unwrap();
//! assert_eq!(doc.to_value().unwrap()["data"]["attributes"]["title"], "Draft");
//! ```

mod factory;
mod handle;
mod serialize;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;

use crate::document::{Object, ResourceKey, ResourceObject};

pub use factory::{DetachedFactory, ModelFactory};
pub use handle::ModelRef;
pub use serialize::SerializeOptions;

/// Value of a named relationship.
#[derive(Debug, Clone, PartialEq)]
pub enum Relationship {
    Null,
    One(ModelRef),
    Many(Vec<ModelRef>),
}

impl Relationship {
    pub fn as_one(&self) -> Option<&ModelRef> {
        match self {
            Relationship::One(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[ModelRef]> {
        match self {
            Relationship::Many(models) => Some(models),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Relationship::Null)
    }

    /// Every model referenced, in order.
    pub fn models(&self) -> &[ModelRef] {
        match self {
            Relationship::Null => &[],
            Relationship::One(model) => std::slice::from_ref(model),
            Relationship::Many(models) => models,
        }
    }

    pub fn keys(&self) -> Vec<ResourceKey> {
        self.models().iter().map(|model| model.key().clone()).collect()
    }
}

/// Reverse edge: the resource `(resource_type, id)` holds a reference to the
/// owning model under `relation`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependent {
    pub resource_type: String,
    pub id: String,
    pub relation: String,
}

/// One resource held in memory.
#[derive(Debug, Clone)]
pub struct Model {
    key: ResourceKey,
    attributes: IndexMap<String, Value>,
    relationships: IndexMap<String, Relationship>,
    links: Option<Object>,
    meta: Option<Object>,
    relationship_links: IndexMap<String, Object>,
    relationship_meta: IndexMap<String, Object>,
    dependents: Vec<Dependent>,
    placeholder: bool,
}

impl Model {
    /// A transient model: it has no id until the server assigns one.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self::build(ResourceKey::new(resource_type, None), false)
    }

    pub fn with_id(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::build(ResourceKey::new(resource_type, Some(id.into())), false)
    }

    /// A model known only because something referenced it. The flag clears
    /// on the first sync of its own record.
    pub fn placeholder(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::build(ResourceKey::new(resource_type, Some(id.into())), true)
    }

    fn build(key: ResourceKey, placeholder: bool) -> Self {
        Model {
            key,
            attributes: IndexMap::new(),
            relationships: IndexMap::new(),
            links: None,
            meta: None,
            relationship_links: IndexMap::new(),
            relationship_meta: IndexMap::new(),
            dependents: Vec::new(),
            placeholder,
        }
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn resource_type(&self) -> &str {
        &self.key.resource_type
    }

    pub fn id(&self) -> Option<&str> {
        self.key.id.as_deref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    /// Known attribute names, in the order they were first set.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Overwrites the attribute, registering the name the first time it is seen.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    pub fn relationships(&self) -> &IndexMap<String, Relationship> {
        &self.relationships
    }

    pub fn relationship_names(&self) -> impl Iterator<Item = &str> {
        self.relationships.keys().map(String::as_str)
    }

    /// Sets a relationship. A single model set on a slot that already holds a
    /// sequence is appended to it; any other value replaces the slot.
    pub fn set_relationship(&mut self, name: impl Into<String>, value: Relationship) {
        match self.relationships.entry(name.into()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                (Relationship::Many(models), Relationship::One(model)) => models.push(model),
                (slot, value) => *slot = value,
            },
        }
    }

    pub fn links(&self) -> Option<&Object> {
        self.links.as_ref()
    }

    pub fn meta(&self) -> Option<&Object> {
        self.meta.as_ref()
    }

    pub fn relationship_links(&self, name: &str) -> Option<&Object> {
        self.relationship_links.get(name)
    }

    pub fn relationship_meta(&self, name: &str) -> Option<&Object> {
        self.relationship_meta.get(name)
    }

    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }

    /// Records that `(resource_type, id)` references this model under
    /// `relation`. Adding the same triple twice is a no-op.
    pub fn add_dependence(&mut self, resource_type: &str, id: &str, relation: &str) {
        let exists = self.dependents.iter().any(|dependent| {
            dependent.resource_type == resource_type
                && dependent.id == id
                && dependent.relation == relation
        });
        if !exists {
            self.dependents.push(Dependent {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
                relation: relation.to_string(),
            });
        }
    }

    /// Drops every reverse edge from `(resource_type, id)`, whatever the relation.
    pub fn remove_dependence(&mut self, resource_type: &str, id: &str) {
        self.dependents
            .retain(|dependent| !(dependent.resource_type == resource_type && dependent.id == id));
    }

    /// Severs `relation` from the model `(resource_type, id)`: matching entries
    /// leave a to-many relationship, a matching to-one relationship becomes
    /// null. Reverse edges from that model are dropped as well.
    pub fn remove_relationship(&mut self, resource_type: &str, id: &str, relation: &str) {
        self.remove_dependence(resource_type, id);

        let Some(slot) = self.relationships.get_mut(relation) else {
            return;
        };
        let clear = match slot {
            Relationship::Many(models) => {
                models.retain(|model| !model.key().matches(resource_type, id));
                false
            }
            Relationship::One(model) => model.key().matches(resource_type, id),
            Relationship::Null => false,
        };
        if clear {
            *slot = Relationship::Null;
        }
    }

    /// Applies a record whose relationships are already resolved to models.
    fn apply(&mut self, record: &ResourceObject, resolved: &[(String, Relationship)]) {
        if let Some(attributes) = &record.attributes {
            for (name, value) in attributes {
                self.set_attribute(name.clone(), value.clone());
            }
        }
        if let Some(links) = &record.links {
            self.links = Some(links.clone());
        }
        if let Some(meta) = &record.meta {
            self.meta = Some(meta.clone());
        }
        for (name, relationship) in resolved {
            self.set_relationship(name.clone(), relationship.clone());
        }
        if let Some(relationships) = &record.relationships {
            for (name, relationship) in relationships {
                if let Some(links) = &relationship.links {
                    self.relationship_links.insert(name.clone(), links.clone());
                }
                if let Some(meta) = &relationship.meta {
                    self.relationship_meta.insert(name.clone(), meta.clone());
                }
            }
        }
        self.placeholder = false;
    }
}
