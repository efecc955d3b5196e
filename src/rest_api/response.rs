//! # Response Formatting
//!
//! Response bodies for list, bulk and health endpoints.

use axum::http::StatusCode;
use serde::Serialize;

use crate::todo::Todo;

/// A page of todos
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub items: Vec<Todo>,
    pub count: usize,
    /// Opaque continuation token, present only when more data remains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<String>,
}

impl ListResponse {
    pub fn new(items: Vec<Todo>, last_evaluated_key: Option<String>) -> Self {
        let count = items.len();
        Self {
            items,
            count,
            last_evaluated_key,
        }
    }
}

/// Failure of one bulk-create item, keyed by its array index
#[derive(Debug, Clone, Serialize)]
pub struct BulkCreateError {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkCreateSummary {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkCreateResponse {
    pub created: Vec<Todo>,
    pub errors: Vec<BulkCreateError>,
    pub summary: BulkCreateSummary,
}

impl BulkCreateResponse {
    pub fn new(created: Vec<Todo>, errors: Vec<BulkCreateError>) -> Self {
        let summary = BulkCreateSummary {
            total: created.len() + errors.len(),
            created: created.len(),
            failed: errors.len(),
        };
        Self {
            created,
            errors,
            summary,
        }
    }

    /// 201 when every item succeeded, 207 otherwise
    pub fn status_code(&self) -> StatusCode {
        if self.errors.is_empty() {
            StatusCode::CREATED
        } else {
            StatusCode::MULTI_STATUS
        }
    }
}

/// Failure of one bulk-delete item, keyed by its identifier
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteError {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkDeleteSummary {
    pub total: usize,
    pub deleted: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: Vec<Todo>,
    pub errors: Vec<BulkDeleteError>,
    pub summary: BulkDeleteSummary,
}

impl BulkDeleteResponse {
    pub fn new(deleted: Vec<Todo>, errors: Vec<BulkDeleteError>) -> Self {
        let summary = BulkDeleteSummary {
            total: deleted.len() + errors.len(),
            deleted: deleted.len(),
            failed: errors.len(),
        };
        Self {
            deleted,
            errors,
            summary,
        }
    }

    /// 200 when every item succeeded, 207 otherwise
    pub fn status_code(&self) -> StatusCode {
        if self.errors.is_empty() {
            StatusCode::OK
        } else {
            StatusCode::MULTI_STATUS
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub table: String,
    pub timestamp: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
