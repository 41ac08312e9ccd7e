use indexmap::IndexMap;

use crate::document::{Document, Object, RelationshipData, RelationshipObject, ResourceObject};

use super::{Model, Relationship};

/// Restricts which fields [`Model::serialize`] emits.
///
/// Every category left unset emits all of its known names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    pub attributes: Option<Vec<String>>,
    pub relationships: Option<Vec<String>>,
    pub links: Option<Vec<String>>,
    pub meta: Option<Vec<String>>,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn relationships<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn links<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn meta<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta = Some(keys.into_iter().map(Into::into).collect());
        self
    }
}

impl Model {
    /// Serializes this model as a single-resource document.
    ///
    /// Related models are emitted as `{type, id}` linkages only, never
    /// recursively, so cyclic graphs serialize fine. Related models without an
    /// id are left out.
    pub fn serialize(&self, options: &SerializeOptions) -> Document {
        let mut resource = ResourceObject {
            resource_type: self.key.resource_type.clone(),
            id: self.key.id.clone(),
            ..ResourceObject::default()
        };

        let attribute_names: Vec<&str> = match &options.attributes {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => self.attribute_names().collect(),
        };
        let attributes: Object = attribute_names
            .into_iter()
            .filter_map(|name| {
                self.attributes
                    .get(name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect();
        if !attributes.is_empty() {
            resource.attributes = Some(attributes);
        }

        let relationship_names: Vec<&str> = match &options.relationships {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => self.known_relationship_names(),
        };
        let relationships: IndexMap<String, RelationshipObject> = relationship_names
            .into_iter()
            .filter_map(|name| {
                self.relationship_object(name)
                    .map(|object| (name.to_string(), object))
            })
            .collect();
        if !relationships.is_empty() {
            resource.relationships = Some(relationships);
        }

        resource.links = select(self.links.as_ref(), options.links.as_deref());
        resource.meta = select(self.meta.as_ref(), options.meta.as_deref());

        Document::resource(resource)
    }

    /// Relationship names with data first, then names known only through
    /// their links or meta.
    fn known_relationship_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.relationship_names().collect();
        for name in self
            .relationship_links
            .keys()
            .chain(self.relationship_meta.keys())
        {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    fn relationship_object(&self, name: &str) -> Option<RelationshipObject> {
        let data = self.relationships.get(name).map(|relationship| match relationship {
            Relationship::Null => RelationshipData::Null,
            Relationship::One(model) => model
                .key()
                .linkage()
                .map(RelationshipData::One)
                .unwrap_or(RelationshipData::Null),
            Relationship::Many(models) => RelationshipData::Many(
                models
                    .iter()
                    .filter_map(|model| model.key().linkage())
                    .collect(),
            ),
        });
        let links = self.relationship_links.get(name).cloned();
        let meta = self.relationship_meta.get(name).cloned();

        if data.is_none() && links.is_none() && meta.is_none() {
            return None;
        }
        Some(RelationshipObject { data, links, meta })
    }
}

/// Whole object when no keys (or an empty key list) are requested, otherwise
/// only the requested keys. `None` when nothing is left.
fn select(source: Option<&Object>, keys: Option<&[String]>) -> Option<Object> {
    let source = source?;
    let selected: Object = match keys {
        Some(keys) if !keys.is_empty() => keys
            .iter()
            .filter_map(|key| source.get(key).map(|value| (key.clone(), value.clone())))
            .collect(),
        _ => source.clone(),
    };
    (!selected.is_empty()).then_some(selected)
}
