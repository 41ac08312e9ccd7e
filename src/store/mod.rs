//! Store - the graph of every model, keyed by `(type, id)`.
//!
//! Syncing a document walks `included`, then `data`, and syncs each resource
//! into the model registered under its `(type, id)`. Related resources are
//! found or created on demand, so a relationship to a resource that has not
//! been seen yet yields a placeholder that is filled in place once its own
//! record arrives.
//!
//! ## Example
//!
//! ```
//! use jsonapi_store::Store;
//! use serde_json::json;
//!
//! let store = Store::new();
//! store.sync_value(json!({
//!     "data": {
//!         "type": "article",
//!         "id": "1337",
//!         "attributes": { "title": "Cool" },
//!         "relationships": { "author": { "data": { "type": "user", "id": "1" } } }
//!     }
//! })).unwrap();
//!
//! let article = store.find("article", "1337").unwrap().unwrap();
//! let author = article.relationship("author").unwrap().unwrap();
//! assert_eq!(author.as_one().unwrap().id(), Some("1"));
//! assert!(store.find("user", "1").unwrap().unwrap().is_placeholder().unwrap());
//! ```

mod snapshot;

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::document::{Document, Object, ResourceObject};
use crate::error::StoreError;
use crate::model::{Model, ModelRef};

pub use snapshot::DocumentSnapshot;

#[cfg(feature = "emitter")]
use crate::emitter::{StoreEmitter, DESTROYED, RESET, SYNCED};

/// type -> id -> model. Each inner map is ordered least- to most-recently
/// synced, which is the `find_all` order.
type Graph = IndexMap<String, IndexMap<String, ModelRef>>;

/// In-memory JSON:API store.
///
/// Clone-friendly via Arc: clones share the same graph.
#[derive(Clone, Default)]
pub struct Store {
    graph: Arc<RwLock<Graph>>,
    snapshot: Arc<RwLock<DocumentSnapshot>>,
    #[cfg(feature = "emitter")]
    emitter: StoreEmitter,
}

impl Store {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the model at `(resource_type, id)`, creating a placeholder if
    /// none exists, and moves `id` to the end of its type's order.
    pub fn init_model(&self, resource_type: &str, id: &str) -> Result<ModelRef, StoreError> {
        let mut graph = self
            .graph
            .write()
            .map_err(|_| StoreError::LockPoisoned("graph write"))?;
        let models = graph.entry(resource_type.to_string()).or_default();

        let model = match models.shift_remove(id) {
            Some(existing) => existing,
            None => {
                trace!(resource_type, id, "created placeholder");
                ModelRef::new(Model::placeholder(resource_type, id))
            }
        };
        models.insert(id.to_string(), model.clone());
        Ok(model)
    }

    /// Syncs one resource object into the graph.
    ///
    /// Returns `None` when the record has no type or no id and was skipped.
    pub fn sync_record(&self, record: &ResourceObject) -> Result<Option<ModelRef>, StoreError> {
        let Some(id) = record.id.as_deref() else {
            warn!(resource_type = %record.resource_type, "skipping resource without id");
            return Ok(None);
        };
        if record.resource_type.is_empty() {
            warn!(id, "skipping resource without type");
            return Ok(None);
        }

        let model = self.init_model(&record.resource_type, id)?;
        let mut find_or_init = |resource_type: &str, id: &str| self.init_model(resource_type, id);
        model.sync_with(record, &mut find_or_init)?;

        #[cfg(feature = "emitter")]
        self.emitter.emit(SYNCED, model.key().to_string())?;

        Ok(Some(model))
    }

    /// Ingests a document.
    ///
    /// The top-level `meta`, `links`, `jsonapi` and `errors` replace the
    /// previous snapshot. A document carrying `errors` stops there; otherwise
    /// `included` is synced before `data`. Read the results back with
    /// [`find`](Self::find) or [`find_all`](Self::find_all).
    pub fn sync(&self, document: &Document) -> Result<(), StoreError> {
        {
            let mut snapshot = self
                .snapshot
                .write()
                .map_err(|_| StoreError::LockPoisoned("snapshot write"))?;
            *snapshot = DocumentSnapshot::of(document);
        }

        if let Some(errors) = &document.errors {
            debug!(errors = errors.len(), "document carries errors, data not synced");
            return Ok(());
        }

        let mut synced = 0usize;
        let records = document
            .included
            .iter()
            .flatten()
            .chain(document.data.iter().flat_map(|data| data.iter()));
        for record in records {
            if self.sync_record(record)?.is_some() {
                synced += 1;
            }
        }

        debug!(synced, "synced document");
        Ok(())
    }

    /// Parses a JSON value as a document and syncs it.
    pub fn sync_value(&self, value: Value) -> Result<(), StoreError> {
        self.sync(&Document::from_value(value)?)
    }

    /// Parses JSON text as a document and syncs it.
    pub fn sync_str(&self, json: &str) -> Result<(), StoreError> {
        self.sync(&Document::from_str(json)?)
    }

    pub fn find(&self, resource_type: &str, id: &str) -> Result<Option<ModelRef>, StoreError> {
        let graph = self
            .graph
            .read()
            .map_err(|_| StoreError::LockPoisoned("graph read"))?;
        Ok(graph
            .get(resource_type)
            .and_then(|models| models.get(id))
            .cloned())
    }

    /// Every model of `resource_type`, least- to most-recently synced.
    pub fn find_all(&self, resource_type: &str) -> Result<Vec<ModelRef>, StoreError> {
        let graph = self
            .graph
            .read()
            .map_err(|_| StoreError::LockPoisoned("graph read"))?;
        Ok(graph
            .get(resource_type)
            .map(|models| models.values().cloned().collect())
            .unwrap_or_default())
    }

    pub fn contains(&self, resource_type: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self.find(resource_type, id)?.is_some())
    }

    /// Types holding at least one model, in first-seen order.
    pub fn types(&self) -> Result<Vec<String>, StoreError> {
        let graph = self
            .graph
            .read()
            .map_err(|_| StoreError::LockPoisoned("graph read"))?;
        Ok(graph
            .iter()
            .filter(|(_, models)| !models.is_empty())
            .map(|(resource_type, _)| resource_type.clone())
            .collect())
    }

    /// Number of models across all types.
    pub fn len(&self) -> Result<usize, StoreError> {
        let graph = self
            .graph
            .read()
            .map_err(|_| StoreError::LockPoisoned("graph read"))?;
        Ok(graph.values().map(IndexMap::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Removes a model and severs every relationship pointing at it.
    ///
    /// Dependents keep existing; only their reference is cleared. A model
    /// without an id is left alone. Returns whether the model was indexed.
    pub fn destroy(&self, model: &ModelRef) -> Result<bool, StoreError> {
        let Some(id) = model.id() else {
            return Ok(false);
        };

        model.unlink_dependence(|resource_type, id| self.find(resource_type, id))?;

        let removed = {
            let mut graph = self
                .graph
                .write()
                .map_err(|_| StoreError::LockPoisoned("graph write"))?;
            graph
                .get_mut(model.resource_type())
                .and_then(|models| models.shift_remove(id))
                .is_some()
        };
        debug!(key = %model.key(), removed, "destroyed model");

        #[cfg(feature = "emitter")]
        if removed {
            self.emitter.emit(DESTROYED, model.key().to_string())?;
        }

        Ok(removed)
    }

    /// Clears every index and the document snapshot.
    ///
    /// Models already handed out are left untouched.
    pub fn reset(&self) -> Result<(), StoreError> {
        let cleared = {
            let mut graph = self
                .graph
                .write()
                .map_err(|_| StoreError::LockPoisoned("graph write"))?;
            let cleared = graph.values().map(IndexMap::len).sum::<usize>();
            graph.clear();
            cleared
        };
        {
            let mut snapshot = self
                .snapshot
                .write()
                .map_err(|_| StoreError::LockPoisoned("snapshot write"))?;
            *snapshot = DocumentSnapshot::default();
        }
        debug!(cleared, "reset store");

        #[cfg(feature = "emitter")]
        self.emitter.emit(RESET, "")?;

        Ok(())
    }

    /// Copy of the last document's top-level members.
    pub fn snapshot(&self) -> Result<DocumentSnapshot, StoreError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| StoreError::LockPoisoned("snapshot read"))?;
        Ok(snapshot.clone())
    }

    pub fn errors(&self) -> Result<Option<Vec<Value>>, StoreError> {
        Ok(self.snapshot()?.errors)
    }

    pub fn meta(&self) -> Result<Option<Object>, StoreError> {
        Ok(self.snapshot()?.meta)
    }

    /// Register a listener for [`SYNCED`], [`DESTROYED`] or [`RESET`].
    #[cfg(feature = "emitter")]
    pub fn on<F>(&self, event: &str, listener: F) -> Result<String, StoreError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(event, listener)
    }
}
