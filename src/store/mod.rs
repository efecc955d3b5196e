//! # Store Client Adapter
//!
//! A single logical table keyed by `id`, with secondary lookup paths by
//! `status` and by `priority`, each ordered by `createdAt` descending.
//!
//! Writes are conditional on key existence:
//! - `put_if_absent` fails with `AlreadyExists` when the key is taken
//! - `update_if_exists` and `delete_if_exists` fail with `NotFound`
//!
//! Any backend fault surfaces as `StoreError::Unavailable` and is never
//! retried at this layer.

pub mod cursor;
pub mod errors;
pub mod in_memory;

pub use cursor::Cursor;
pub use errors::{StoreError, StoreResult};
pub use in_memory::InMemoryTodoStore;

use std::future::Future;

use crate::todo::{Priority, Status, Todo, TodoChanges};

/// One page of a scan or query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Todo>,
    /// Present only when more items remain
    pub next: Option<Cursor>,
}

impl Page {
    pub fn new(items: Vec<Todo>, next: Option<Cursor>) -> Self {
        Self { items, next }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Operations against the todo table.
///
/// Implementations are constructed once per process and shared across
/// requests; every method is safe to call concurrently.
pub trait TodoStore: Send + Sync {
    /// Name of the backing table
    fn table_name(&self) -> &str;

    /// Insert a record unless its key already exists.
    fn put_if_absent(&self, todo: Todo) -> impl Future<Output = StoreResult<Todo>> + Send;

    /// Fetch a record by primary key.
    fn get_by_key(&self, id: &str) -> impl Future<Output = StoreResult<Todo>> + Send;

    /// Page through the whole table in backend order.
    fn scan_all(
        &self,
        limit: usize,
        cursor: Option<Cursor>,
    ) -> impl Future<Output = StoreResult<Page>> + Send;

    /// Page through records with the given status, newest first.
    fn query_by_status(
        &self,
        status: Status,
        limit: usize,
        cursor: Option<Cursor>,
    ) -> impl Future<Output = StoreResult<Page>> + Send;

    /// Page through records with the given priority, newest first.
    fn query_by_priority(
        &self,
        priority: Priority,
        limit: usize,
        cursor: Option<Cursor>,
    ) -> impl Future<Output = StoreResult<Page>> + Send;

    /// Apply a change set to an existing record and return the result.
    fn update_if_exists(
        &self,
        id: &str,
        changes: TodoChanges,
    ) -> impl Future<Output = StoreResult<Todo>> + Send;

    /// Remove an existing record and return what was removed.
    fn delete_if_exists(&self, id: &str) -> impl Future<Output = StoreResult<Todo>> + Send;

    /// Minimal bounded read used to confirm connectivity.
    fn probe(&self) -> impl Future<Output = StoreResult<()>> + Send;
}
