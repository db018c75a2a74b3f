use std::path::Path;

use crate::file::{FileResult, IoAccountant, PageSource, RunFile, RunReader, RunWriter, StreamMark};
use crate::record::{Header, Page, Row};

/// One resident page of a stream plus the position of the current row in it
pub(crate) struct PageCursor<S> {
    source: S,
    page: Page,
    index: usize,
}

impl<S: PageSource> PageCursor<S> {
    /// Wrap a source and load its first page
    pub fn open(mut source: S, io: &mut IoAccountant) -> FileResult<Self> {
        let mut page = Page::new();
        source.read_page(&mut page, io)?;
        Ok(Self {
            source,
            page,
            index: 0,
        })
    }

    /// Current row, `None` once the stream is exhausted
    pub fn current(&self) -> Option<&Row> {
        self.page.get(self.index)
    }

    /// Move to the next row, pulling the next page when this one is used up
    pub fn advance(&mut self, io: &mut IoAccountant) -> FileResult<()> {
        if self.page.is_empty() {
            return Ok(());
        }
        self.index += 1;
        if self.index >= self.page.len() {
            self.source.read_page(&mut self.page, io)?;
            self.index = 0;
        }
        Ok(())
    }
}

/// Snapshot of a run cursor: stream position after the resident page and the
/// row index within it. The resident page itself is copied aside by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupMark {
    stream: StreamMark,
    index: usize,
}

impl PageCursor<RunReader> {
    /// Capture the current position, copying the resident page into `mark_page`
    pub fn mark(&self, mark_page: &mut Page) -> GroupMark {
        mark_page.copy_from(&self.page);
        GroupMark {
            stream: self.source.mark(),
            index: self.index,
        }
    }

    /// Return to a captured position. Costs no I/O; pages after the marked one
    /// are read again as the cursor advances.
    pub fn restore(&mut self, mark: &GroupMark, mark_page: &Page) -> FileResult<()> {
        self.source.seek(&mark.stream)?;
        self.page.copy_from(mark_page);
        self.index = mark.index;
        Ok(())
    }
}

/// A run being written through a single output page
pub(crate) struct PageSink {
    writer: RunWriter,
    page: Page,
}

impl PageSink {
    /// Create the file and write its header
    pub fn create<P: AsRef<Path>>(
        path: P,
        header: &Header,
        io: &mut IoAccountant,
    ) -> FileResult<Self> {
        Ok(Self {
            writer: RunWriter::create(path, header, io)?,
            page: Page::new(),
        })
    }

    /// Buffer a row, writing the output page out first if it is full
    pub fn push(&mut self, row: Row, io: &mut IoAccountant) -> FileResult<()> {
        if self.page.is_full() {
            self.writer.write_page(&self.page, io)?;
            self.page.clear();
        }
        self.page.push(row)?;
        Ok(())
    }

    /// Rows pushed so far, written or still buffered
    pub fn rows(&self) -> usize {
        self.writer.rows_written() + self.page.len()
    }

    /// Flush a non-empty output page and close the run
    pub fn finish(mut self, io: &mut IoAccountant) -> FileResult<RunFile> {
        if !self.page.is_empty() {
            self.writer.write_page(&self.page, io)?;
        }
        self.writer.finish()
    }
}
