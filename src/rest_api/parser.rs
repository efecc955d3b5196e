//! # Request Parsing
//!
//! Turns raw request bodies and query strings into typed inputs.

use std::collections::HashMap;

use serde_json::Value;

use crate::store::Cursor;
use crate::todo::{Priority, Status, ValidationError};

use super::errors::{RestError, RestResult};

/// Maximum number of records that can be returned
pub const MAX_LIMIT: usize = 1000;

/// Default limit if not specified
pub const DEFAULT_LIMIT: usize = 50;

/// Maximum number of items in a bulk request
pub const MAX_BATCH_SIZE: usize = 25;

/// Paging and batch limits applied by the handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_batch_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_LIMIT,
            max_page_size: MAX_LIMIT,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}

/// Parsed list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub limit: usize,
    pub cursor: Option<Cursor>,
}

impl ListParams {
    /// Parse `status`, `priority`, `limit` and `lastEvaluatedKey`.
    /// Unknown parameters are ignored.
    pub fn parse(query: &HashMap<String, String>, limits: &Limits) -> RestResult<Self> {
        let status = match non_empty(query, "status") {
            Some(raw) => Some(
                raw.parse::<Status>()
                    .map_err(|_| ValidationError::InvalidStatus)?,
            ),
            None => None,
        };

        let priority = match non_empty(query, "priority") {
            Some(raw) => Some(
                raw.parse::<Priority>()
                    .map_err(|_| ValidationError::InvalidPriority)?,
            ),
            None => None,
        };

        let limit = match non_empty(query, "limit") {
            Some(raw) => parse_limit(raw, limits.max_page_size)?,
            None => limits.default_page_size,
        };

        let cursor = match non_empty(query, "lastEvaluatedKey") {
            Some(token) => Some(Cursor::decode(token).ok_or_else(|| {
                RestError::InvalidQueryParam("lastEvaluatedKey".to_string())
            })?),
            None => None,
        };

        Ok(Self {
            status,
            priority,
            limit,
            cursor,
        })
    }
}

fn non_empty<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Parse limit parameter
fn parse_limit(value: &str, max: usize) -> RestResult<usize> {
    let limit: usize = value
        .parse()
        .map_err(|_| RestError::InvalidQueryParam(format!("Invalid limit: {}", value)))?;
    if limit == 0 {
        return Err(RestError::InvalidQueryParam(
            "limit must be at least 1".to_string(),
        ));
    }
    if limit > max {
        return Err(RestError::LimitExceeded(limit, max));
    }
    Ok(limit)
}

/// Parse a raw request body. An empty body is `None`.
pub fn parse_body(bytes: &[u8]) -> RestResult<Option<Value>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|e| ValidationError::InvalidBody(format!("malformed JSON: {}", e)).into())
}

/// Extract the item array of a bulk request, enforcing the batch limit.
pub fn batch_items<'a>(body: Option<&'a Value>, key: &'static str, max: usize) -> RestResult<&'a [Value]> {
    let obj = match body {
        None | Some(Value::Null) => return Err(ValidationError::MissingBody.into()),
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            return Err(
                ValidationError::InvalidBody("expected a JSON object".to_string()).into(),
            )
        }
    };

    let items = match obj.get(key) {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(ValidationError::MissingItems(key).into()),
    };

    if items.len() > max {
        return Err(ValidationError::BatchTooLarge {
            max,
            actual: items.len(),
        }
        .into());
    }

    Ok(items)
}
