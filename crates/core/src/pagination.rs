//! Page arithmetic and the paged list returned by every list endpoint.
//!
//! Repositories produce a [`Page`] (one slice of rows plus the total number
//! of rows matching the same filters). [`PagedList::from_page`] turns that
//! into the client-facing shape with `totalPages` derived from the count.

use serde::Serialize;

use crate::link::Link;

/// Page number used when the client does not supply one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a client can ask for.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Sort direction
// ---------------------------------------------------------------------------

/// Ordering applied to `created_at` in list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact string `"desc"` selects descending order.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn as_query(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A normalised page request. `page` is at least 1 and `page_size` lies in
/// `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
    pub sort: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortDirection::Asc,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>, sort_dir: Option<&str>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort: SortDirection::from_query(sort_dir),
        }
    }

    /// Number of matching rows to skip before the first row of this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// `ceil(total_count / page_size)`, zero when nothing matches.
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 {
        return 0;
    }
    let size = page_size.max(1);
    (total_count - 1) / size + 1
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One slice of a filtered query plus the size of the whole filtered set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl<T> PagedList<T> {
    pub fn from_page(page: Page<T>, request: &PageRequest) -> Self {
        Self {
            total_pages: total_pages(page.total_count, request.page_size),
            items: page.items,
            page: request.page,
            page_size: request.page_size,
            total_count: page.total_count,
            links: Vec::new(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
