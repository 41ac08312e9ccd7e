//! ModelRef - shared handle to a model.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::trace;

use crate::document::{Document, RelationshipData, ResourceKey, ResourceObject};
use crate::error::StoreError;

use super::{DetachedFactory, Model, ModelFactory, Relationship, SerializeOptions};

/// Shared, mutable handle to a [`Model`].
///
/// Cloning the handle shares the model. The resource key is immutable and is
/// cached beside the lock, so identity checks never lock.
#[derive(Clone)]
pub struct ModelRef {
    key: Arc<ResourceKey>,
    cell: Arc<RwLock<Model>>,
}

impl ModelRef {
    pub fn new(model: Model) -> Self {
        ModelRef {
            key: Arc::new(model.key().clone()),
            cell: Arc::new(RwLock::new(model)),
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

    /// True when both handles point at the same model.
    pub fn ptr_eq(&self, other: &ModelRef) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, Model>, StoreError> {
        self.cell
            .read()
            .map_err(|_| StoreError::LockPoisoned("model read"))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Model>, StoreError> {
        self.cell
            .write()
            .map_err(|_| StoreError::LockPoisoned("model write"))
    }

    pub fn is_placeholder(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_placeholder())
    }

    /// Copy of the named attribute.
    pub fn attribute(&self, name: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read()?.attribute(name).cloned())
    }

    /// Copy of the named relationship. The copy shares the related models.
    pub fn relationship(&self, name: &str) -> Result<Option<Relationship>, StoreError> {
        Ok(self.read()?.relationship(name).cloned())
    }

    /// Syncs a record into this model, resolving related resources to fresh
    /// disconnected placeholders.
    pub fn sync(&self, record: &ResourceObject) -> Result<(), StoreError> {
        self.sync_with(record, &mut DetachedFactory)
    }

    /// Syncs a record into this model.
    ///
    /// Attributes are set one by one; links and meta are replaced when the
    /// record carries them. Each relationship with `data` is resolved through
    /// `factory`, and every resolved model records this one as a dependent
    /// (only when this model has an id).
    pub fn sync_with<F>(&self, record: &ResourceObject, factory: &mut F) -> Result<(), StoreError>
    where
        F: ModelFactory + ?Sized,
    {
        // Resolve before locking: the factory may hand back this very model.
        let mut resolved = Vec::new();
        if let Some(relationships) = &record.relationships {
            for (name, relationship) in relationships {
                let value = match &relationship.data {
                    Some(RelationshipData::Null) => Relationship::Null,
                    Some(RelationshipData::One(linkage)) => {
                        Relationship::One(factory.find_or_init(&linkage.resource_type, &linkage.id)?)
                    }
                    Some(RelationshipData::Many(linkages)) => Relationship::Many(
                        linkages
                            .iter()
                            .map(|linkage| factory.find_or_init(&linkage.resource_type, &linkage.id))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                    Some(RelationshipData::Malformed(_)) | None => continue,
                };
                resolved.push((name.clone(), value));
            }
        }

        self.write()?.apply(record, &resolved);

        let Some(id) = self.id() else {
            return Ok(());
        };
        for (name, relationship) in &resolved {
            for target in relationship.models() {
                target.write()?.add_dependence(self.resource_type(), id, name);
                trace!(related = %target.key(), dependent = %self.key, relation = %name, "registered dependent");
            }
        }
        Ok(())
    }

    /// Asks every dependent to drop its reference to this model.
    ///
    /// `resolve` looks a dependent up by `(type, id)`; dependents it cannot
    /// find are skipped.
    pub fn unlink_dependence<R>(&self, mut resolve: R) -> Result<(), StoreError>
    where
        R: FnMut(&str, &str) -> Result<Option<ModelRef>, StoreError>,
    {
        let Some(id) = self.id() else {
            return Ok(());
        };
        let dependents = self.read()?.dependents().to_vec();
        for dependent in dependents {
            if let Some(model) = resolve(&dependent.resource_type, &dependent.id)? {
                model
                    .write()?
                    .remove_relationship(self.resource_type(), id, &dependent.relation);
            }
        }
        Ok(())
    }

    pub fn serialize(&self, options: &SerializeOptions) -> Result<Document, StoreError> {
        Ok(self.read()?.serialize(options))
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ModelRef {}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelRef")
            .field(&format_args!("{}", self.key))
            .finish()
    }
}
