use std::cell::Cell;

use super::ROWS_PER_PAGE;
use super::error::{RecordError, RecordResult};
use super::row::Row;

thread_local! {
    static LIVE_PAGES: Cell<usize> = const { Cell::new(0) };
    static PEAK_PAGES: Cell<usize> = const { Cell::new(0) };
}

/// Number of `Page` instances currently alive on this thread
pub fn live_pages() -> usize {
    LIVE_PAGES.with(Cell::get)
}

/// Highest number of simultaneously live pages since the last reset
pub fn peak_pages() -> usize {
    PEAK_PAGES.with(Cell::get)
}

/// Reset the high-water mark to the current live count
pub fn reset_peak_pages() {
    PEAK_PAGES.with(|peak| peak.set(live_pages()));
}

fn track_alloc() {
    let live = LIVE_PAGES.with(|live| {
        let n = live.get() + 1;
        live.set(n);
        n
    });
    PEAK_PAGES.with(|peak| peak.set(peak.get().max(live)));
}

/// Fixed-capacity in-memory page of rows, the unit of every I/O transfer
#[derive(Debug, PartialEq, Eq)]
pub struct Page {
    rows: Vec<Row>,
}

impl Page {
    /// Create a new empty page
    pub fn new() -> Self {
        track_alloc();
        Self {
            rows: Vec::with_capacity(ROWS_PER_PAGE),
        }
    }

    /// Check whether the page holds `ROWS_PER_PAGE` rows
    pub fn is_full(&self) -> bool {
        self.rows.len() == ROWS_PER_PAGE
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Append a row, preserving insertion order
    pub fn push(&mut self, row: Row) -> RecordResult<()> {
        if self.is_full() {
            return Err(RecordError::CapacityExceeded {
                capacity: ROWS_PER_PAGE,
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Overwrite this page with a copy of `other` without allocating another page
    pub fn copy_from(&mut self, other: &Page) {
        self.rows.clear();
        self.rows.extend(other.rows.iter().cloned());
    }

    pub fn get(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Move all rows out, leaving the page empty
    pub fn drain(&mut self) -> std::vec::Drain<'_, Row> {
        self.rows.drain(..)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Page {
    fn clone(&self) -> Self {
        let mut page = Page::new();
        page.copy_from(self);
        page
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        LIVE_PAGES.with(|live| live.set(live.get().saturating_sub(1)));
    }
}
