//! In-memory JSON:API graph store.
//!
//! [`Store::sync`] normalizes the resources of a JSON:API document into
//! [`Model`]s keyed by `(type, id)` and links their relationships in place.
//! Re-syncing a resource updates the same model, so handles obtained earlier
//! observe the change. Any model serializes back to a JSON:API document.

pub mod document;
#[cfg(feature = "emitter")]
pub mod emitter;
mod error;
mod model;
mod store;

pub use document::{
    Document, Linkage, Object, PrimaryData, RelationshipData, RelationshipObject, ResourceKey,
    ResourceObject,
};
pub use error::StoreError;
pub use model::{
    Dependent, DetachedFactory, Model, ModelFactory, ModelRef, Relationship, SerializeOptions,
};
pub use store::{DocumentSnapshot, Store};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
