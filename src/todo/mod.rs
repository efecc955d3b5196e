//! # Todo Domain
//!
//! The record type, its validation rules and the builder that turns
//! validated input into stored records.

pub mod builder;
pub mod errors;
pub mod model;
pub mod validator;

pub use builder::{Clock, IdGenerator, SequentialIds, SteppingClock, SystemClock, TodoBuilder, UuidGenerator};
pub use errors::{ValidationError, ValidationResult};
pub use model::{DueDate, FieldChange, Priority, Status, Todo, TodoChanges, TodoField};
pub use validator::{validate_create, validate_update, ValidatedCreate, ValidatedUpdate};
