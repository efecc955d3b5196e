//! Continuation cursors
//!
//! A cursor is the last evaluated key of a page. Callers only ever see it as
//! URL-safe base64 of its JSON form and must echo it back unchanged.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::todo::Todo;

/// Last evaluated key of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub id: String,
    /// Sort key, present on secondary lookup paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Cursor {
    /// Key for a primary-key scan
    pub fn for_scan(todo: &Todo) -> Self {
        Self {
            id: todo.id.clone(),
            created_at: None,
        }
    }

    /// Key for a query on a secondary path ordered by `createdAt`
    pub fn for_index(todo: &Todo) -> Self {
        Self {
            id: todo.id.clone(),
            created_at: Some(todo.created_at),
        }
    }

    /// Opaque token handed to callers
    pub fn encode(&self) -> String {
        // strings and timestamps cannot fail to serialize
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Parse a token previously produced by `encode`
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(token.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}
