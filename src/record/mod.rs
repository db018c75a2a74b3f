mod error;
mod page;
mod row;
mod schema;

pub use error::{RecordError, RecordResult};
pub use page::{Page, live_pages, peak_pages, reset_peak_pages};
pub use row::Row;
pub use schema::Header;

/// Number of rows that fit in one page
pub const ROWS_PER_PAGE: usize = 10;

/// Maximum number of pages resident in memory at once
pub const MAX_RESIDENT_PAGES: usize = 4;

/// Rows held by the run-generation buffer (the whole memory budget, flattened)
pub const SORT_BUFFER_ROWS: usize = MAX_RESIDENT_PAGES * ROWS_PER_PAGE;
