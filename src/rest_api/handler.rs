//! # Todo Handlers
//!
//! Each operation validates its input, performs one logical store operation
//! (list and bulk operations may perform several) and returns a typed
//! result. Validation failures never reach the store.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::store::{Page, StoreError, TodoStore};
use crate::todo::model::timestamp;
use crate::todo::{validate_create, validate_update, Todo, TodoBuilder};

use super::errors::{RestError, RestResult};
use super::parser::{batch_items, Limits, ListParams};
use super::response::{
    BulkCreateError, BulkCreateResponse, BulkDeleteError, BulkDeleteResponse, HealthResponse,
    HealthStatus, ListResponse,
};

/// Todo request handlers over a shared store
pub struct TodoHandler<S: TodoStore> {
    store: Arc<S>,
    builder: TodoBuilder,
    limits: Limits,
}

impl<S: TodoStore> TodoHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            builder: TodoBuilder::system(),
            limits: Limits::default(),
        }
    }

    /// Replace the id/clock source
    pub fn with_builder(mut self, builder: TodoBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Create a todo from a request body.
    pub async fn create(&self, body: Option<&Value>) -> RestResult<Todo> {
        let input = validate_create(body).map_err(|e| {
            warn!(error = %e, "Rejected create request");
            RestError::from(e)
        })?;

        let todo = self.builder.build(input);
        let created = self
            .store
            .put_if_absent(todo)
            .await
            .map_err(|e| self.store_failure("create", e))?;

        info!(id = %created.id, "Todo created");
        Ok(created)
    }

    /// Fetch a single todo.
    pub async fn get(&self, id: &str) -> RestResult<Todo> {
        self.store
            .get_by_key(id)
            .await
            .map_err(|e| self.store_failure("get", e))
    }

    /// List todos from raw query parameters.
    pub async fn list(&self, query: &HashMap<String, String>) -> RestResult<ListResponse> {
        let params = ListParams::parse(query, &self.limits)?;
        self.list_page(params).await
    }

    /// List todos. A status filter takes precedence over a priority filter.
    ///
    /// Unfiltered scans come back in backend order, so each page is sorted
    /// by `createdAt` descending on its own; ordering is not global across
    /// pages.
    pub async fn list_page(&self, params: ListParams) -> RestResult<ListResponse> {
        let ListParams {
            status,
            priority,
            limit,
            cursor,
        } = params;

        let result = if let Some(status) = status {
            self.store.query_by_status(status, limit, cursor).await
        } else if let Some(priority) = priority {
            self.store.query_by_priority(priority, limit, cursor).await
        } else {
            self.store.scan_all(limit, cursor).await.map(|mut page| {
                page.items
                    .sort_by(|a, b| b.created_at.cmp(&a.created_at));
                page
            })
        };

        let Page { items, next } = result.map_err(|e| self.store_failure("list", e))?;
        Ok(ListResponse::new(items, next.map(|c| c.encode())))
    }

    /// Apply a partial update.
    pub async fn update(&self, id: Option<&str>, body: Option<&Value>) -> RestResult<Todo> {
        let id = require_id(id)?;
        let input = validate_update(body).map_err(|e| {
            warn!(id, error = %e, "Rejected update request");
            RestError::from(e)
        })?;

        let changes = self.builder.changes(input);
        let updated = self
            .store
            .update_if_exists(id, changes)
            .await
            .map_err(|e| self.store_failure("update", e))?;

        info!(id, "Todo updated");
        Ok(updated)
    }

    /// Delete a todo, confirming it exists first.
    pub async fn delete(&self, id: Option<&str>) -> RestResult<Todo> {
        let id = require_id(id)?;

        self.store
            .get_by_key(id)
            .await
            .map_err(|e| self.store_failure("delete", e))?;

        let deleted = self
            .store
            .delete_if_exists(id)
            .await
            .map_err(|e| self.store_failure("delete", e))?;

        info!(id, "Todo deleted");
        Ok(deleted)
    }

    /// Create each item of `{todos: [...]}` independently.
    pub async fn bulk_create(&self, body: Option<&Value>) -> RestResult<BulkCreateResponse> {
        let items = batch_items(body, "todos", self.limits.max_batch_size).map_err(|e| {
            warn!(error = %e, "Rejected bulk create request");
            e
        })?;

        let mut created = Vec::new();
        let mut errors = Vec::new();

        for (index, item) in items.iter().enumerate() {
            match self.create_one(item).await {
                Ok(todo) => created.push(todo),
                Err(e) => errors.push(BulkCreateError {
                    index,
                    error: item_message(&e),
                }),
            }
        }

        info!(
            created = created.len(),
            failed = errors.len(),
            "Bulk create finished"
        );
        Ok(BulkCreateResponse::new(created, errors))
    }

    async fn create_one(&self, item: &Value) -> RestResult<Todo> {
        let input = validate_create(Some(item))?;
        let todo = self.builder.build(input);
        self.store
            .put_if_absent(todo)
            .await
            .map_err(|e| self.store_failure("bulk create", e))
    }

    /// Delete each id of `{ids: [...]}` independently.
    pub async fn bulk_delete(&self, body: Option<&Value>) -> RestResult<BulkDeleteResponse> {
        let items = batch_items(body, "ids", self.limits.max_batch_size).map_err(|e| {
            warn!(error = %e, "Rejected bulk delete request");
            e
        })?;

        let mut deleted = Vec::new();
        let mut errors = Vec::new();

        for item in items {
            let id = match item.as_str().map(str::trim) {
                Some(id) if !id.is_empty() => id,
                _ => {
                    errors.push(BulkDeleteError {
                        id: item.to_string(),
                        error: "Invalid id".to_string(),
                    });
                    continue;
                }
            };

            match self.store.delete_if_exists(id).await {
                Ok(todo) => deleted.push(todo),
                Err(e) => {
                    let e = self.store_failure("bulk delete", e);
                    errors.push(BulkDeleteError {
                        id: id.to_string(),
                        error: item_message(&e),
                    });
                }
            }
        }

        info!(
            deleted = deleted.len(),
            failed = errors.len(),
            "Bulk delete finished"
        );
        Ok(BulkDeleteResponse::new(deleted, errors))
    }

    /// Probe the store. Never fails; an outage is reported as unhealthy.
    pub async fn health(&self) -> HealthResponse {
        let probe = self.store.probe().await;
        let (status, error) = match probe {
            Ok(()) => (HealthStatus::Healthy, None),
            Err(e) => {
                error!(error = %e, "Health check failed");
                (HealthStatus::Unhealthy, Some(e.to_string()))
            }
        };

        HealthResponse {
            status,
            table: self.store.table_name().to_string(),
            timestamp: timestamp::format(&self.builder.now()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            error,
        }
    }

    /// Classify a store error, logging backend faults.
    fn store_failure(&self, op: &str, err: StoreError) -> RestError {
        if let StoreError::Unavailable(detail) = &err {
            error!(
                operation = op,
                table = self.store.table_name(),
                error = %detail,
                "Store operation failed"
            );
        }
        RestError::from(err)
    }
}

fn require_id(id: Option<&str>) -> RestResult<&str> {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(RestError::MissingId),
    }
}

/// Per-item message for bulk results
fn item_message(err: &RestError) -> String {
    match err {
        RestError::Internal(detail) => format!("{}: {}", err, detail),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTodoStore;
    use crate::todo::{SequentialIds, SteppingClock, Status, ValidationError};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn create_test_handler() -> TodoHandler<InMemoryTodoStore> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let builder = TodoBuilder::new(
            Arc::new(SteppingClock::new(start, Duration::seconds(1))),
            Arc::new(SequentialIds::new("todo")),
        );
        TodoHandler::new(Arc::new(InMemoryTodoStore::new("test-todos"))).with_builder(builder)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let handler = create_test_handler();
        let created = handler
            .create(Some(&json!({"title": "  Buy milk "})))
            .await
            .unwrap();
        assert_eq!(created.title, "Buy milk");
        assert_eq!(created.status, Status::Pending);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = handler.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_rejected_create_writes_nothing() {
        let handler = create_test_handler();
        let err = handler.create(Some(&json!({"title": "   "}))).await.unwrap_err();
        assert!(matches!(
            err,
            RestError::Validation(ValidationError::MissingTitle)
        ));
        assert!(handler.store().is_empty());
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = Arc::new(InMemoryTodoStore::default());
        // two handlers with independent sequences collide on "dup-1"
        let first = TodoHandler::new(store.clone()).with_builder(TodoBuilder::new(
            Arc::new(SteppingClock::new(start, Duration::seconds(1))),
            Arc::new(SequentialIds::new("dup")),
        ));
        let second = TodoHandler::new(store).with_builder(TodoBuilder::new(
            Arc::new(SteppingClock::new(start, Duration::seconds(1))),
            Arc::new(SequentialIds::new("dup")),
        ));

        first.create(Some(&json!({"title": "a"}))).await.unwrap();
        let err = second.create(Some(&json!({"title": "b"}))).await.unwrap_err();
        assert!(matches!(err, RestError::Conflict(id) if id == "dup-1"));
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp() {
        let handler = create_test_handler();
        let created = handler.create(Some(&json!({"title": "a"}))).await.unwrap();

        let updated = handler
            .update(Some(created.id.as_str()), Some(&json!({"status": "archived"})))
            .await
            .unwrap();
        assert_eq!(updated.status, Status::Archived);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_requires_id_before_body() {
        let handler = create_test_handler();
        assert!(matches!(
            handler.update(None, None).await,
            Err(RestError::MissingId)
        ));
        assert!(matches!(
            handler.update(Some("x"), None).await,
            Err(RestError::Validation(ValidationError::MissingBody))
        ));
        assert!(matches!(
            handler.update(Some("x"), Some(&json!({"title": "y"}))).await,
            Err(RestError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let handler = create_test_handler();
        let created = handler.create(Some(&json!({"title": "a"}))).await.unwrap();

        let deleted = handler.delete(Some(created.id.as_str())).await.unwrap();
        assert_eq!(deleted, created);
        assert!(matches!(
            handler.delete(Some(created.id.as_str())).await,
            Err(RestError::NotFound(_))
        ));
        assert!(matches!(handler.delete(Some("")).await, Err(RestError::MissingId)));
    }

    #[tokio::test]
    async fn test_unfiltered_list_sorted_newest_first() {
        let handler = create_test_handler();
        for title in ["first", "second", "third"] {
            handler.create(Some(&json!({ "title": title }))).await.unwrap();
        }

        let list = handler.list(&HashMap::new()).await.unwrap();
        let titles: Vec<&str> = list.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
        assert_eq!(list.count, 3);
        assert!(list.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_list_prefers_status_filter() {
        let handler = create_test_handler();
        let a = handler
            .create(Some(&json!({"title": "a", "priority": "high"})))
            .await
            .unwrap();
        handler
            .create(Some(&json!({"title": "b", "priority": "high"})))
            .await
            .unwrap();
        handler
            .update(Some(a.id.as_str()), Some(&json!({"status": "completed"})))
            .await
            .unwrap();

        let query: HashMap<String, String> = [
            ("status".to_string(), "completed".to_string()),
            ("priority".to_string(), "high".to_string()),
        ]
        .into_iter()
        .collect();
        let list = handler.list(&query).await.unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.items[0].id, a.id);
    }

    #[tokio::test]
    async fn test_bulk_create_partial_failure() {
        let handler = create_test_handler();
        let body = json!({"todos": [
            {"title": "one"},
            {"title": ""},
            {"title": "three", "priority": "low"},
        ]});

        let response = handler.bulk_create(Some(&body)).await.unwrap();
        assert_eq!(response.summary.total, 3);
        assert_eq!(response.summary.created, 2);
        assert_eq!(response.errors[0].index, 1);
        assert_eq!(response.errors[0].error, "Missing required field: title");
        assert_eq!(handler.store().len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_delete_mixed() {
        let handler = create_test_handler();
        let a = handler.create(Some(&json!({"title": "a"}))).await.unwrap();

        let response = handler
            .bulk_delete(Some(&json!({"ids": [a.id.clone(), "missing", 42]})))
            .await
            .unwrap();
        assert_eq!(response.deleted.len(), 1);
        assert_eq!(response.errors.len(), 2);
        assert_eq!(response.errors[0].id, "missing");
        assert_eq!(response.errors[0].error, "Todo not found");
        assert_eq!(response.errors[1].id, "42");
    }

    #[tokio::test]
    async fn test_empty_update_only_refreshes_timestamp() {
        let handler = create_test_handler();
        let created = handler.create(Some(&json!({"title": "a"}))).await.unwrap();

        let updated = handler
            .update(Some(created.id.as_str()), Some(&json!({})))
            .await
            .unwrap();
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.status, created.status);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        assert!(matches!(
            handler.update(Some("missing"), Some(&json!({}))).await,
            Err(RestError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_store_outage() {
        let handler = create_test_handler();
        handler.store().set_available(false);

        let err = handler.create(Some(&json!({"title": "a"}))).await.unwrap_err();
        assert!(matches!(err, RestError::Internal(_)));

        let health = handler.health().await;
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.table, "test-todos");

        handler.store().set_available(true);
        assert_eq!(handler.health().await.status, HealthStatus::Healthy);
    }
}
