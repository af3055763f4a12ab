use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConsignError, Result};

/// How many `data` envelopes are peeled before giving up.
const MAX_ENVELOPE_DEPTH: usize = 2;

/// Canonical page of a collection, whatever shape the endpoint answered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// Rows in server order.
    pub items: Vec<T>,
    pub total_count: u64,
    /// Taken from the server when present, otherwise derived from
    /// `total_count` and the requested page size.
    pub total_pages: u32,
}

impl<T> PageResult<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
        }
    }
}

/// `ceil(total_count / page_size)`, saturating at `u32::MAX`.
pub fn total_pages_for(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Map a raw collection response into a [`PageResult`].
///
/// Accepted shapes:
///
/// ```text
/// {"items": [...], "totalCount": n, "totalPages": m?}
/// {"data": {"items": [...], "totalCount": n, ...}}
/// {"data": {"data": {"items": [...], "totalCount": n, ...}}}
/// ```
///
/// Anything else is a [`ConsignError::Mapping`].
pub fn normalize_page<T: DeserializeOwned>(raw: Value, page_size: u32) -> Result<PageResult<T>> {
    let mut body = match raw {
        Value::Object(map) => map,
        other => {
            return Err(ConsignError::Mapping(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            )))
        }
    };

    for depth in 0..=MAX_ENVELOPE_DEPTH {
        if body.contains_key("items") {
            return flat_page(body, page_size);
        }
        if depth == MAX_ENVELOPE_DEPTH {
            break;
        }
        match body.remove("data") {
            Some(Value::Object(inner)) => body = inner,
            Some(other) => {
                return Err(ConsignError::Mapping(format!(
                    "`data` envelope is {}, expected an object",
                    kind_of(&other)
                )))
            }
            None => break,
        }
    }

    Err(ConsignError::Mapping(
        "no `items` found at top level or inside `data` envelopes".into(),
    ))
}

fn flat_page<T: DeserializeOwned>(mut body: Map<String, Value>, page_size: u32) -> Result<PageResult<T>> {
    let items = match body.remove("items") {
        Some(Value::Array(items)) => items,
        Some(Value::Null) => Vec::new(),
        Some(other) => {
            return Err(ConsignError::Mapping(format!(
                "`items` is {}, expected an array",
                kind_of(&other)
            )))
        }
        None => Vec::new(),
    };

    let total_count = body
        .get("totalCount")
        .and_then(Value::as_u64)
        .ok_or_else(|| ConsignError::Mapping("missing or invalid `totalCount`".into()))?;

    let total_pages = match body.get("totalPages") {
        None | Some(Value::Null) => total_pages_for(total_count, page_size),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ConsignError::Mapping(format!("invalid `totalPages`: {v}")))?,
    };

    let items = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| ConsignError::Mapping(format!("item {i}: {e}")))
        })
        .collect::<Result<Vec<T>>>()?;

    Ok(PageResult {
        items,
        total_count,
        total_pages,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
