//! Store change notifications.
//!
//! Listeners receive a `String` payload: `type:id` for [`SYNCED`] and
//! [`DESTROYED`], empty for [`RESET`]. The underlying `EventEmitter` runs each
//! listener on its own thread, so delivery is asynchronous and never affects
//! store state.

use std::sync::{Arc, Mutex};

use event_emitter_rs::EventEmitter;

use crate::error::StoreError;

/// A record was synced directly (from `data` or `included`).
pub const SYNCED: &str = "synced";
/// A model was removed by `destroy`.
pub const DESTROYED: &str = "destroyed";
/// The store was cleared.
pub const RESET: &str = "reset";

/// Clone-friendly emitter shared by every clone of a store.
#[derive(Clone)]
pub struct StoreEmitter {
    inner: Arc<Mutex<EventEmitter>>,
}

impl Default for StoreEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreEmitter {
    pub fn new() -> Self {
        StoreEmitter {
            inner: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Register a listener. Returns the listener id assigned by the emitter.
    pub fn on<F>(&self, event: &str, listener: F) -> Result<String, StoreError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let mut emitter = self
            .inner
            .lock()
            .map_err(|_| StoreError::LockPoisoned("emitter lock"))?;
        Ok(emitter.on(event, listener))
    }

    pub fn emit(&self, event: &str, data: impl Into<String>) -> Result<(), StoreError> {
        let mut emitter = self
            .inner
            .lock()
            .map_err(|_| StoreError::LockPoisoned("emitter lock"))?;
        emitter.emit(event, data.into());
        Ok(())
    }
}
