//! In-process todo table
//!
//! Holds records in a `BTreeMap` keyed by `id`. Each conditional operation
//! takes the write lock once, so its existence check and write are atomic.
//! Secondary lookups sort matching records by `(createdAt, id)` descending.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::todo::{Priority, Status, Todo, TodoChanges};

use super::cursor::Cursor;
use super::errors::{StoreError, StoreResult};
use super::{Page, TodoStore};

pub struct InMemoryTodoStore {
    table: String,
    items: RwLock<BTreeMap<String, Todo>>,
    /// Cleared to simulate a backend outage
    available: AtomicBool,
}

impl InMemoryTodoStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            items: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle simulated availability; while unavailable every operation
    /// fails with `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable(format!(
                "table '{}' is not reachable",
                self.table
            )))
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, Todo>>> {
        self.check_available()?;
        self.items
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, Todo>>> {
        self.check_available()?;
        self.items
            .write()
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }

    /// Newest-first page over the records matching `pred`.
    fn query_index(
        &self,
        limit: usize,
        cursor: Option<Cursor>,
        pred: impl Fn(&Todo) -> bool,
    ) -> StoreResult<Page> {
        let items = self.read()?;
        let mut matching: Vec<&Todo> = items.values().filter(|t| pred(t)).collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let start = match cursor {
            None => 0,
            Some(Cursor {
                id,
                created_at: Some(after),
            }) => matching
                .iter()
                .position(|t| (t.created_at, t.id.as_str()) < (after, id.as_str()))
                .unwrap_or(matching.len()),
            // a scan cursor: resume after the record it names
            Some(Cursor {
                id,
                created_at: None,
            }) => matching
                .iter()
                .position(|t| t.id == id)
                .map(|i| i + 1)
                .unwrap_or(matching.len()),
        };

        let rest = &matching[start..];
        let page: Vec<Todo> = rest.iter().take(limit).map(|t| (*t).clone()).collect();
        let next = if rest.len() > page.len() {
            page.last().map(Cursor::for_index)
        } else {
            None
        };
        Ok(Page::new(page, next))
    }
}

impl Default for InMemoryTodoStore {
    fn default() -> Self {
        Self::new("todos")
    }
}

impl TodoStore for InMemoryTodoStore {
    fn table_name(&self) -> &str {
        &self.table
    }

    async fn put_if_absent(&self, todo: Todo) -> StoreResult<Todo> {
        let mut items = self.write()?;
        if items.contains_key(&todo.id) {
            return Err(StoreError::AlreadyExists(todo.id));
        }
        items.insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    async fn get_by_key(&self, id: &str) -> StoreResult<Todo> {
        let items = self.read()?;
        items
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn scan_all(&self, limit: usize, cursor: Option<Cursor>) -> StoreResult<Page> {
        let items = self.read()?;
        let lower = match &cursor {
            Some(c) => Bound::Excluded(c.id.clone()),
            None => Bound::Unbounded,
        };

        let mut remaining = items.range((lower, Bound::Unbounded)).map(|(_, t)| t);
        let page: Vec<Todo> = remaining.by_ref().take(limit).cloned().collect();
        let next = if remaining.next().is_some() {
            page.last().map(Cursor::for_scan)
        } else {
            None
        };
        Ok(Page::new(page, next))
    }

    async fn query_by_status(
        &self,
        status: Status,
        limit: usize,
        cursor: Option<Cursor>,
    ) -> StoreResult<Page> {
        self.query_index(limit, cursor, |t| t.status == status)
    }

    async fn query_by_priority(
        &self,
        priority: Priority,
        limit: usize,
        cursor: Option<Cursor>,
    ) -> StoreResult<Page> {
        self.query_index(limit, cursor, |t| t.priority == priority)
    }

    async fn update_if_exists(&self, id: &str, changes: TodoChanges) -> StoreResult<Todo> {
        let mut items = self.write()?;
        let todo = items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        todo.apply(&changes);
        Ok(todo.clone())
    }

    async fn delete_if_exists(&self, id: &str) -> StoreResult<Todo> {
        let mut items = self.write()?;
        items
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn probe(&self) -> StoreResult<()> {
        self.scan_all(1, None).await.map(|_| ())
    }
}
