use crate::error::StoreError;

use super::{Model, ModelRef};

/// Resolves a relationship linkage to the model it points at.
///
/// The store supplies a factory that finds or creates the model inside its
/// own graph. Closures of the shape `FnMut(&str, &str) -> Result<ModelRef, _>`
/// are factories too.
pub trait ModelFactory {
    fn find_or_init(&mut self, resource_type: &str, id: &str) -> Result<ModelRef, StoreError>;
}

impl<F> ModelFactory for F
where
    F: FnMut(&str, &str) -> Result<ModelRef, StoreError>,
{
    fn find_or_init(&mut self, resource_type: &str, id: &str) -> Result<ModelRef, StoreError> {
        self(resource_type, id)
    }
}

/// Builds a fresh, disconnected placeholder for every linkage.
///
/// Used when a model is synced outside of any store.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedFactory;

impl ModelFactory for DetachedFactory {
    fn find_or_init(&mut self, resource_type: &str, id: &str) -> Result<ModelRef, StoreError> {
        Ok(ModelRef::new(Model::placeholder(resource_type, id)))
    }
}
