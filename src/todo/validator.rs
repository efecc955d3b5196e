//! Input validation for todo payloads
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. body presence
//! 2. title
//! 3. field allow-list (update only)
//! 4. priority
//! 5. status (update only)
//! 6. due date
//!
//! Validation is pure: it never touches the store and never mutates input.

use serde_json::{Map, Value};

use super::errors::{ValidationError, ValidationResult};
use super::model::{DueDate, FieldChange, Priority, Status, TodoField};

/// Normalized create input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreate {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DueDate>,
}

/// Normalized update input: only the fields the caller supplied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatedUpdate {
    pub changes: Vec<FieldChange>,
}

/// Validates a create payload.
pub fn validate_create(body: Option<&Value>) -> ValidationResult<ValidatedCreate> {
    let obj = require_object(body)?;

    let title = match optional_str(obj, TodoField::Title)? {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => return Err(ValidationError::MissingTitle),
    };

    let priority = parse_priority(obj)?.unwrap_or_default();
    let due_date = parse_due_date(obj)?;
    let description = optional_str(obj, TodoField::Description)?
        .map(|d| d.trim().to_string())
        .unwrap_or_default();

    Ok(ValidatedCreate {
        title,
        description,
        priority,
        due_date,
    })
}

/// Validates an update payload.
pub fn validate_update(body: Option<&Value>) -> ValidationResult<ValidatedUpdate> {
    let obj = require_object(body)?;
    let mut changes = Vec::new();

    if obj.contains_key(TodoField::Title.name()) {
        let title = required_str(obj, TodoField::Title)?;
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        changes.push(FieldChange::Title(title.trim().to_string()));
    }

    let invalid: Vec<String> = obj
        .keys()
        .filter(|k| TodoField::from_name(k).is_none())
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidFields(invalid));
    }

    if obj.contains_key(TodoField::Priority.name()) {
        let priority = parse_priority(obj)?.ok_or(ValidationError::InvalidFieldType("priority"))?;
        changes.push(FieldChange::Priority(priority));
    }

    if obj.contains_key(TodoField::Status.name()) {
        let raw = required_str(obj, TodoField::Status)?;
        let status = raw.parse::<Status>().map_err(|_| ValidationError::InvalidStatus)?;
        changes.push(FieldChange::Status(status));
    }

    if obj.contains_key(TodoField::DueDate.name()) {
        // explicit null clears the due date
        changes.push(FieldChange::DueDate(parse_due_date(obj)?));
    }

    if obj.contains_key(TodoField::Description.name()) {
        let description = required_str(obj, TodoField::Description)?;
        changes.push(FieldChange::Description(description.trim().to_string()));
    }

    Ok(ValidatedUpdate { changes })
}

fn require_object(body: Option<&Value>) -> ValidationResult<&Map<String, Value>> {
    match body {
        None | Some(Value::Null) => Err(ValidationError::MissingBody),
        Some(Value::Object(obj)) => Ok(obj),
        Some(_) => Err(ValidationError::InvalidBody(
            "expected a JSON object".to_string(),
        )),
    }
}

/// A string field that may be absent or null
fn optional_str(obj: &Map<String, Value>, field: TodoField) -> ValidationResult<Option<&str>> {
    match obj.get(field.name()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ValidationError::InvalidFieldType(field.name())),
    }
}

/// A string field that, when present, must be a string
fn required_str(obj: &Map<String, Value>, field: TodoField) -> ValidationResult<&str> {
    match obj.get(field.name()) {
        Some(Value::String(s)) => Ok(s.as_str()),
        _ => Err(ValidationError::InvalidFieldType(field.name())),
    }
}

fn parse_priority(obj: &Map<String, Value>) -> ValidationResult<Option<Priority>> {
    optional_str(obj, TodoField::Priority)?
        .map(|raw| raw.parse::<Priority>().map_err(|_| ValidationError::InvalidPriority))
        .transpose()
}

fn parse_due_date(obj: &Map<String, Value>) -> ValidationResult<Option<DueDate>> {
    match obj.get(TodoField::DueDate.name()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => DueDate::parse(raw)
            .map(Some)
            .ok_or(ValidationError::InvalidDueDateFormat),
        Some(_) => Err(ValidationError::InvalidFieldType(TodoField::DueDate.name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_string_due_date_is_a_type_error() {
        let body = json!({"title": "x", "dueDate": 5});
        assert_eq!(
            validate_create(Some(&body)),
            Err(ValidationError::InvalidFieldType("dueDate"))
        );
        let body = json!({"dueDate": ["2024-01-01"]});
        assert_eq!(
            validate_update(Some(&body)),
            Err(ValidationError::InvalidFieldType("dueDate"))
        );
    }

    #[test]
    fn test_create_applies_defaults_and_trims() {
        let body = json!({"title": "  Buy milk  ", "description": " 2 liters "});
        let input = validate_create(Some(&body)).unwrap();
        assert_eq!(input.title, "Buy milk");
        assert_eq!(input.description, "2 liters");
        assert_eq!(input.priority, Priority::Medium);
        assert_eq!(input.due_date, None);
    }

    #[test]
    fn test_create_requires_body() {
        assert_eq!(validate_create(None), Err(ValidationError::MissingBody));
        assert_eq!(
            validate_create(Some(&Value::Null)),
            Err(ValidationError::MissingBody)
        );
        assert!(matches!(
            validate_create(Some(&json!([1, 2]))),
            Err(ValidationError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_create_rejects_missing_or_blank_title() {
        for body in [json!({}), json!({"title": ""}), json!({"title": "   \t"}), json!({"title": null})] {
            assert_eq!(
                validate_create(Some(&body)),
                Err(ValidationError::MissingTitle),
                "body: {}",
                body
            );
        }
        assert_eq!(
            validate_create(Some(&json!({"title": 7}))),
            Err(ValidationError::InvalidFieldType("title"))
        );
    }

    #[test]
    fn test_create_title_checked_before_priority() {
        let body = json!({"priority": "urgent"});
        assert_eq!(validate_create(Some(&body)), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn test_create_rejects_bad_priority_and_due_date() {
        let body = json!({"title": "x", "priority": "urgent", "dueDate": "tomorrow"});
        assert_eq!(validate_create(Some(&body)), Err(ValidationError::InvalidPriority));

        let body = json!({"title": "x", "dueDate": "2024-1-1"});
        assert_eq!(
            validate_create(Some(&body)),
            Err(ValidationError::InvalidDueDateFormat)
        );
    }

    #[test]
    fn test_create_accepts_syntactically_valid_date() {
        let body = json!({"title": "x", "dueDate": "2024-13-99", "priority": "high"});
        let input = validate_create(Some(&body)).unwrap();
        assert_eq!(input.due_date.unwrap().as_str(), "2024-13-99");
        assert_eq!(input.priority, Priority::High);
    }

    #[test]
    fn test_update_lists_all_invalid_fields() {
        let body = json!({"id": "x", "status": "completed", "createdAt": "now"});
        match validate_update(Some(&body)) {
            Err(ValidationError::InvalidFields(fields)) => {
                assert_eq!(fields.len(), 2);
                assert!(fields.contains(&"id".to_string()));
                assert!(fields.contains(&"createdAt".to_string()));
            }
            other => panic!("expected InvalidFields, got {:?}", other),
        }
    }

    #[test]
    fn test_update_empty_title_checked_before_allow_list() {
        let body = json!({"title": "  ", "bogus": 1});
        assert_eq!(validate_update(Some(&body)), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_update_priority_checked_before_status() {
        let body = json!({"priority": "urgent", "status": "gone"});
        assert_eq!(validate_update(Some(&body)), Err(ValidationError::InvalidPriority));

        let body = json!({"status": "gone"});
        assert_eq!(validate_update(Some(&body)), Err(ValidationError::InvalidStatus));
    }

    #[test]
    fn test_update_collects_supplied_fields_only() {
        let body = json!({"status": "archived", "dueDate": null});
        let update = validate_update(Some(&body)).unwrap();
        assert_eq!(
            update.changes,
            vec![
                FieldChange::Status(Status::Archived),
                FieldChange::DueDate(None),
            ]
        );
    }

    #[test]
    fn test_update_rejects_null_priority() {
        let body = json!({"priority": null});
        assert_eq!(
            validate_update(Some(&body)),
            Err(ValidationError::InvalidFieldType("priority"))
        );
    }

    #[test]
    fn test_update_requires_body() {
        assert_eq!(validate_update(None), Err(ValidationError::MissingBody));
    }
}
