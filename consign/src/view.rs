//! Render contract for paginated tables.
//!
//! Nothing here draws; it computes what a renderer needs (rows, sort
//! indicators, pagination controls, the loading/error state) from a
//! [`FetchState`] and the current [`PageQuery`], and turns user gestures
//! into [`TableIntent`]s for the query holder.
//!
//! ```text
//!   Empty ──► Loading ──► Loaded ──► Loading ──► ...
//!                 │                     ▲
//!                 └──► Errored ─────────┘  (on query change)
//! ```

use crate::fetch::FetchState;
use crate::query::{FilterValue, PageNumber, PageQuery};

/// Pages shown at each edge of the numbered pager.
const EDGE_PAGES: u32 = 1;

/// Pages shown on each side of the current page.
const AROUND_CURRENT: u32 = 2;

// ---------------------------------------------------------------------------
// Columns & intents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Server-side sort key.
    pub key: &'static str,
    pub title: &'static str,
    /// Preferred width in characters.
    pub width: u16,
    pub sortable: bool,
}

impl Column {
    pub const fn new(key: &'static str, title: &'static str, width: u16) -> Self {
        Self {
            key,
            title,
            width,
            sortable: false,
        }
    }

    pub const fn sortable(self) -> Self {
        Self {
            sortable: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

/// A change the view asks the query holder to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableIntent {
    /// 1-based page number, as shown to the user.
    PageChange(u32),
    PageSize(u32),
    SortBy { key: String, descending: bool },
    ClearSort,
    Filter { name: String, value: FilterValue },
    ClearFilters,
}

/// Intent for a click on `column`'s header.
///
/// Clicking the current sort column flips its direction; clicking another
/// column sorts it descending first. Non-sortable columns ignore clicks.
pub fn header_click(column: &Column, query: &PageQuery) -> Option<TableIntent> {
    if !column.sortable {
        return None;
    }
    let current_desc_if_same_key =
        query.sort_key.as_deref() == Some(column.key) && query.sort_descending;
    Some(TableIntent::SortBy {
        key: column.key.to_string(),
        descending: !current_desc_if_same_key,
    })
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing fetched yet.
    Empty,
    /// A request is in flight; `stale` rows from the last load stay visible.
    Loading { stale: bool },
    Loaded,
    Errored(String),
}

impl ViewState {
    pub fn from_fetch<T>(state: &FetchState<T>, has_stale_rows: bool) -> Self {
        match state {
            FetchState::Idle => ViewState::Empty,
            FetchState::Loading => ViewState::Loading {
                stale: has_stale_rows,
            },
            FetchState::Loaded(_) => ViewState::Loaded,
            FetchState::Errored(reason) => ViewState::Errored(reason.clone()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    /// Whether the renderer should show a skeleton instead of rows.
    pub fn shows_skeleton(&self) -> bool {
        matches!(self, ViewState::Empty | ViewState::Loading { stale: false })
    }
}

// ---------------------------------------------------------------------------
// TableProps
// ---------------------------------------------------------------------------

/// Everything a table renderer consumes.
#[derive(Debug)]
pub struct TableProps<'a, T> {
    pub columns: &'a [Column],
    /// Rows to draw: the current page, or the last loaded page while a
    /// refresh is in flight or after it failed.
    pub data: &'a [T],
    /// 0-based collection position of `data[0]`. Follows the page the rows
    /// were loaded for, which lags `current_page` while a request is in
    /// flight or after it failed.
    pub data_offset: u64,
    pub total_count: u64,
    /// Requested page; drives the pagination controls.
    pub current_page: PageNumber,
    pub page_size: u32,
    pub total_pages: u32,
    pub loading: bool,
    pub state: ViewState,
    pub sort_key: Option<&'a str>,
    pub sort_descending: bool,
}

impl<'a, T> TableProps<'a, T> {
    pub fn indicator(&self, column: &Column) -> SortIndicator {
        match self.sort_key {
            Some(key) if key == column.key && self.sort_descending => SortIndicator::Descending,
            Some(key) if key == column.key => SortIndicator::Ascending,
            _ => SortIndicator::Unsorted,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Errored(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.current_page, self.total_pages, self.loading)
    }

    /// 1-based positions of the first and last row shown, if any.
    pub fn row_range(&self) -> Option<(u64, u64)> {
        if self.data.is_empty() {
            return None;
        }
        let first = self.data_offset + 1;
        Some((first, self.data_offset + self.data.len() as u64))
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Pagination controls for the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
    /// Numbered buttons; `None` marks an ellipsis.
    pub pages: Vec<Option<u32>>,
}

impl Pagination {
    pub fn new(current: PageNumber, total_pages: u32, loading: bool) -> Self {
        let current = current.get();
        let can_go_back = !loading && current > 1;
        let can_go_forward = !loading && current < total_pages;
        Self {
            current,
            total_pages,
            first_enabled: can_go_back,
            prev_enabled: can_go_back,
            next_enabled: can_go_forward,
            last_enabled: can_go_forward,
            pages: page_window(current, total_pages),
        }
    }

    /// Target of the "previous" control.
    pub fn prev(&self) -> Option<u32> {
        self.prev_enabled.then(|| self.current - 1)
    }

    /// Target of the "next" control.
    pub fn next(&self) -> Option<u32> {
        self.next_enabled.then(|| self.current + 1)
    }

    pub fn first(&self) -> Option<u32> {
        self.first_enabled.then_some(1)
    }

    pub fn last(&self) -> Option<u32> {
        self.last_enabled.then_some(self.total_pages)
    }
}

/// Numbered page window: both edges, a neighbourhood around `current`, and
/// ellipses for the gaps.
fn page_window(current: u32, total_pages: u32) -> Vec<Option<u32>> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let left_end = EDGE_PAGES.min(total_pages);
    let mid_start = current.saturating_sub(AROUND_CURRENT).max(left_end + 1);
    let mid_end = (current + AROUND_CURRENT).min(total_pages);
    let right_start = total_pages
        .saturating_sub(EDGE_PAGES)
        .saturating_add(1)
        .max(mid_end + 1);

    let mut pages: Vec<Option<u32>> = (1..=left_end).map(Some).collect();
    if mid_start > left_end + 1 {
        pages.push(None);
    }
    pages.extend((mid_start..=mid_end).map(Some));
    if right_start > mid_end + 1 {
        pages.push(None);
    }
    pages.extend((right_start..=total_pages).map(Some));
    pages
}
