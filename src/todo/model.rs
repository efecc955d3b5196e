//! Todo record types
//!
//! `Status`, `Priority` and `DueDate` can only hold values that passed
//! validation, so a `Todo` never carries an out-of-range field.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a todo
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
    Archived,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::Completed, Status::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
            Status::Archived => "archived",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

/// Priority of a todo
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

fn due_date_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").ok())
        .as_ref()
}

/// Calendar date in `YYYY-MM-DD` form.
///
/// Only the shape is checked; `2024-13-99` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DueDate(String);

impl DueDate {
    /// Parse a due date, returning `None` if it does not match the pattern
    pub fn parse(value: &str) -> Option<Self> {
        if due_date_pattern().is_some_and(|p| p.is_match(value)) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DueDate::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid due date: {}", raw)))
    }
}

/// The todo record as stored and returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: Option<DueDate>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Apply a change set in place.
    ///
    /// `id` and `created_at` are never touched, and `updated_at` never
    /// drops below `created_at`.
    pub fn apply(&mut self, changes: &TodoChanges) {
        for change in changes.iter() {
            match change {
                FieldChange::Title(title) => self.title = title.clone(),
                FieldChange::Description(description) => self.description = description.clone(),
                FieldChange::Status(status) => self.status = *status,
                FieldChange::Priority(priority) => self.priority = *priority,
                FieldChange::DueDate(due_date) => self.due_date = due_date.clone(),
            }
        }
        self.updated_at = changes.updated_at().max(self.created_at);
    }
}

/// Fields a caller may change on an existing todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TodoField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl TodoField {
    pub const ALL: [TodoField; 5] = [
        TodoField::Title,
        TodoField::Description,
        TodoField::Status,
        TodoField::Priority,
        TodoField::DueDate,
    ];

    /// Wire name of the field
    pub fn name(&self) -> &'static str {
        match self {
            TodoField::Title => "title",
            TodoField::Description => "description",
            TodoField::Status => "status",
            TodoField::Priority => "priority",
            TodoField::DueDate => "dueDate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TodoField::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// A single typed field assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Title(String),
    Description(String),
    Status(Status),
    Priority(Priority),
    /// `None` clears the due date
    DueDate(Option<DueDate>),
}

impl FieldChange {
    pub fn field(&self) -> TodoField {
        match self {
            FieldChange::Title(_) => TodoField::Title,
            FieldChange::Description(_) => TodoField::Description,
            FieldChange::Status(_) => TodoField::Status,
            FieldChange::Priority(_) => TodoField::Priority,
            FieldChange::DueDate(_) => TodoField::DueDate,
        }
    }
}

/// Partial update: the supplied field changes plus the refreshed timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    changes: Vec<FieldChange>,
    updated_at: DateTime<Utc>,
}

impl TodoChanges {
    /// Build a change set. A later change to the same field replaces an
    /// earlier one, and changes are kept in `TodoField` order.
    pub fn new(changes: impl IntoIterator<Item = FieldChange>, updated_at: DateTime<Utc>) -> Self {
        let mut merged: Vec<FieldChange> = Vec::new();
        for change in changes {
            match merged.iter_mut().find(|c| c.field() == change.field()) {
                Some(existing) => *existing = change,
                None => merged.push(change),
            }
        }
        merged.sort_by_key(|c| c.field());
        Self {
            changes: merged,
            updated_at,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldChange> {
        self.changes.iter()
    }

    pub fn get(&self, field: TodoField) -> Option<&FieldChange> {
        self.changes.iter().find(|c| c.field() == field)
    }

    pub fn fields(&self) -> Vec<TodoField> {
        self.changes.iter().map(FieldChange::field).collect()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Millisecond RFC 3339 timestamps with a `Z` suffix, which sort
/// lexicographically in time order.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
