use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{Document, Object};

/// Top-level members of the most recently synced document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Object>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Object>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Value>>,
}

impl DocumentSnapshot {
    pub fn of(document: &Document) -> Self {
        DocumentSnapshot {
            meta: document.meta.clone(),
            links: document.links.clone(),
            jsonapi: document.jsonapi.clone(),
            errors: document.errors.clone(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }
}
