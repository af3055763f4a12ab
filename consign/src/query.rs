//! Query state for a paginated table.
//!
//! [`QueryState`] exclusively owns the current [`PageQuery`]. Views never
//! touch the query directly; they call the mutators below, each of which
//! reports whether the query actually changed (and therefore whether a
//! re-fetch is due).
//!
//! Page positions come in two conventions: [`PageIndex`] (0-based, used
//! internally) and [`PageNumber`] (1-based, shown to users and sent to the
//! server). The only conversions between them are
//! [`PageIndex::to_number`] and [`PageNumber::to_index`].

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{ConsignError, Result};

// ---------------------------------------------------------------------------
// Page positions
// ---------------------------------------------------------------------------

/// Zero-based page position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageIndex(pub u32);

/// One-based page position, as displayed and as expected by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU32);

impl PageIndex {
    pub const FIRST: PageIndex = PageIndex(0);

    pub fn to_number(self) -> PageNumber {
        PageNumber(NonZeroU32::MIN.saturating_add(self.0))
    }

    /// Clamp into `[0, total_pages)`; everything clamps to the first page
    /// when there are no pages.
    pub fn clamp_to(self, total_pages: u32) -> PageIndex {
        PageIndex(self.0.min(total_pages.saturating_sub(1)))
    }
}

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(NonZeroU32::MIN);

    /// `None` for 0.
    pub fn new(number: u32) -> Option<PageNumber> {
        NonZeroU32::new(number).map(PageNumber)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn to_index(self) -> PageIndex {
        PageIndex(self.0.get() - 1)
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PageQuery
// ---------------------------------------------------------------------------

/// A filter value: free text, a multi-select list, or explicitly unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    List(Vec<String>),
    Null,
}

impl FilterValue {
    /// Blank values are dropped from the query instead of being stored.
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.trim().is_empty(),
            FilterValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
            FilterValue::Null => true,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(items: Vec<String>) -> Self {
        FilterValue::List(items)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Null, Into::into)
    }
}

/// Everything that determines which page of a collection is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub page_index: PageIndex,
    pub page_size: u32,
    pub sort_key: Option<String>,
    pub sort_descending: bool,
    /// Only non-blank values are stored.
    pub filters: BTreeMap<String, FilterValue>,
}

impl PageQuery {
    pub fn new(page_size: u32) -> Result<Self> {
        validate_page_size(page_size)?;
        Ok(Self {
            page_index: PageIndex::FIRST,
            page_size,
            sort_key: None,
            sort_descending: false,
            filters: BTreeMap::new(),
        })
    }

    pub fn filter(&self, name: &str) -> Option<&FilterValue> {
        self.filters.get(name)
    }
}

fn validate_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 {
        return Err(ConsignError::Validation("page size must be positive".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// QueryState
// ---------------------------------------------------------------------------

/// Owner of the current [`PageQuery`].
///
/// Every mutator returns `true` when the query changed. Sort, filter and
/// page-size changes send the table back to the first page so a narrowed
/// result set is never asked for an out-of-range page.
#[derive(Debug, Clone)]
pub struct QueryState {
    query: PageQuery,
}

impl QueryState {
    pub fn new(page_size: u32) -> Result<Self> {
        Ok(Self {
            query: PageQuery::new(page_size)?,
        })
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    pub fn set_page(&mut self, index: PageIndex) -> bool {
        if self.query.page_index == index {
            return false;
        }
        self.query.page_index = index;
        true
    }

    /// User-facing page navigation with a 1-based page number.
    ///
    /// `0` clamps to page 1; numbers past `total_pages` clamp to the last
    /// page.
    pub fn go_to_page(&mut self, number: u32, total_pages: u32) -> bool {
        let number = PageNumber::new(number).unwrap_or(PageNumber::FIRST);
        self.set_page(number.to_index().clamp_to(total_pages))
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<bool> {
        validate_page_size(page_size)?;
        if self.query.page_size == page_size {
            return Ok(false);
        }
        self.query.page_size = page_size;
        self.reset_page();
        Ok(true)
    }

    pub fn set_sort(&mut self, key: impl Into<String>, descending: bool) -> bool {
        let key = key.into();
        if self.query.sort_key.as_deref() == Some(key.as_str())
            && self.query.sort_descending == descending
        {
            return false;
        }
        self.query.sort_key = Some(key);
        self.query.sort_descending = descending;
        self.reset_page();
        true
    }

    pub fn clear_sort(&mut self) -> bool {
        if self.query.sort_key.is_none() && !self.query.sort_descending {
            return false;
        }
        self.query.sort_key = None;
        self.query.sort_descending = false;
        self.reset_page();
        true
    }

    /// Set or clear (blank value) a named filter.
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> bool {
        let name = name.into();
        let value = value.into();

        let changed = if value.is_blank() {
            self.query.filters.remove(&name).is_some()
        } else if self.query.filters.get(&name) == Some(&value) {
            false
        } else {
            self.query.filters.insert(name, value);
            true
        };

        if changed {
            self.reset_page();
        }
        changed
    }

    pub fn clear_filters(&mut self) -> bool {
        if self.query.filters.is_empty() {
            return false;
        }
        self.query.filters.clear();
        self.reset_page();
        true
    }

    fn reset_page(&mut self) {
        self.query.page_index = PageIndex::FIRST;
    }
}

// ---------------------------------------------------------------------------
// PageRequest
// ---------------------------------------------------------------------------

/// A [`PageQuery`] translated into what a collection endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: PageNumber,
    pub page_size: u32,
    pub sort_key: Option<String>,
    pub sort_descending: bool,
    /// Flattened filters; list values repeat their key.
    pub filters: Vec<(String, String)>,
}

impl PageRequest {
    /// The network boundary: this is where the 0-based index becomes the
    /// server's 1-based `pageNumber`.
    pub fn from_query(query: &PageQuery) -> Self {
        let mut filters = Vec::with_capacity(query.filters.len());
        for (name, value) in &query.filters {
            match value {
                FilterValue::Text(text) => filters.push((name.clone(), text.trim().to_string())),
                FilterValue::List(items) => {
                    for item in items.iter().filter(|s| !s.trim().is_empty()) {
                        filters.push((name.clone(), item.trim().to_string()));
                    }
                }
                FilterValue::Null => {}
            }
        }

        Self {
            page_number: query.page_index.to_number(),
            page_size: query.page_size,
            sort_key: query.sort_key.clone(),
            sort_descending: query.sort_descending,
            filters,
        }
    }

    /// Query-string pairs in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("pageNumber".to_string(), self.page_number.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(key) = &self.sort_key {
            pairs.push(("sortKey".to_string(), key.clone()));
            pairs.push(("sortDescending".to_string(), self.sort_descending.to_string()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}
