use serde::{Deserialize, Serialize};

/// One page of records plus the totals it was cut from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page_number: u64,
    pub page_size: u64,
    pub total_page: u64,
    pub total_row: u64,
    pub records: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, page_number: u64, page_size: u64, total_row: u64) -> Self {
        Page {
            page_number,
            page_size,
            total_page: total_pages(total_row, page_size),
            total_row,
            records,
        }
    }

    pub fn empty(page_number: u64, page_size: u64, total_row: u64) -> Self {
        Page::new(Vec::new(), page_number, page_size, total_row)
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_page
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page_number: self.page_number,
            page_size: self.page_size,
            total_page: self.total_page,
            total_row: self.total_row,
            records: self.records.into_iter().map(f).collect(),
        }
    }
}

pub fn total_pages(total_row: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_row.div_ceil(page_size)
}

/// Caller-side description of the page to fetch.
///
/// A negative `total_row` means the total is unknown and has to be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_number: u64,
    pub page_size: u64,
    #[serde(default = "unknown_total")]
    pub total_row: i64,
    #[serde(default = "default_optimize")]
    pub optimize_count_query: bool,
}

fn unknown_total() -> i64 {
    -1
}

fn default_optimize() -> bool {
    true
}

impl PageRequest {
    pub fn new(page_number: u64, page_size: u64) -> Self {
        PageRequest {
            page_number,
            page_size,
            total_row: unknown_total(),
            optimize_count_query: default_optimize(),
        }
    }

    pub fn with_total_row(mut self, total_row: u64) -> Self {
        self.total_row = i64::try_from(total_row).unwrap_or(i64::MAX);
        self
    }

    pub fn with_optimize_count_query(mut self, optimize: bool) -> Self {
        self.optimize_count_query = optimize;
        self
    }

    pub fn known_total(&self) -> Option<u64> {
        u64::try_from(self.total_row).ok()
    }

    /// Rows to skip before this page: `(page_number - 1) * page_size`.
    pub fn offset(&self) -> u64 {
        self.page_number.saturating_sub(1).saturating_mul(self.page_size)
    }
}
