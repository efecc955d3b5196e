//! Record construction from validated input
//!
//! Identifier and timestamp generation sit behind `IdGenerator` and `Clock`
//! so handlers can be driven deterministically in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::model::{Status, Todo, TodoChanges};
use super::validator::{ValidatedCreate, ValidatedUpdate};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that advances by a fixed step on every read
#[derive(Debug)]
pub struct SteppingClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = *current;
        *current = now + self.step;
        now
    }
}

/// Source of fresh record identifiers
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

/// Builds canonical records and change sets
#[derive(Clone)]
pub struct TodoBuilder {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl TodoBuilder {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Wall clock and UUID identifiers
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// A brand new record: fresh id, `pending`, `createdAt == updatedAt`.
    pub fn build(&self, input: ValidatedCreate) -> Todo {
        let now = self.clock.now();
        Todo {
            id: self.ids.next_id(),
            title: input.title,
            description: input.description,
            status: Status::Pending,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change set for the supplied fields with a refreshed `updatedAt`.
    pub fn changes(&self, input: ValidatedUpdate) -> TodoChanges {
        TodoChanges::new(input.changes, self.clock.now())
    }
}

impl Default for TodoBuilder {
    fn default() -> Self {
        Self::system()
    }
}
