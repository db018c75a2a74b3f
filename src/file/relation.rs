use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Position, Reader, StringRecord};

use super::accountant::IoAccountant;
use super::codec;
use super::error::FileResult;
use crate::record::{Header, Page};

/// A forward-only producer of pages
pub trait PageSource {
    /// Fill `page` in place with the next page of rows; `false` at end of stream
    fn read_page(&mut self, page: &mut Page, io: &mut IoAccountant) -> FileResult<bool>;

    /// Read the next page into a freshly allocated `Page`
    fn next_page(&mut self, io: &mut IoAccountant) -> FileResult<Option<Page>> {
        let mut page = Page::new();
        Ok(self.read_page(&mut page, io)?.then_some(page))
    }
}

/// A relation stored as a CSV file. Only the header is held in memory.
#[derive(Debug, Clone)]
pub struct Relation {
    path: PathBuf,
    header: Header,
}

impl Relation {
    /// Open a relation and load its header
    pub fn open<P: AsRef<Path>>(path: P) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = codec::open_reader(&path)?;
        let header = codec::read_header(&mut reader, &mut StringRecord::new(), &path)?;
        Ok(Self { path, header })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Short display name used in errors and logs
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Open a sequential page cursor positioned after the header
    pub fn cursor(&self, io: &mut IoAccountant) -> FileResult<RelationCursor> {
        let mut reader = codec::open_reader(&self.path)?;
        let mut record = StringRecord::new();
        codec::read_header(&mut reader, &mut record, &self.path)?;
        io.record_read();

        Ok(RelationCursor {
            reader,
            record,
            path: self.path.clone(),
            column_count: self.header.column_count(),
        })
    }
}

/// Sequential page cursor over a `Relation`
pub struct RelationCursor {
    reader: Reader<File>,
    record: StringRecord,
    path: PathBuf,
    column_count: usize,
}

impl RelationCursor {
    /// Rewind to just after the header; re-reading the header counts one read
    pub fn rewind(&mut self, io: &mut IoAccountant) -> FileResult<()> {
        self.reader.seek(Position::new())?;
        codec::read_header(&mut self.reader, &mut self.record, &self.path)?;
        io.record_read();
        Ok(())
    }
}

impl PageSource for RelationCursor {
    fn read_page(&mut self, page: &mut Page, io: &mut IoAccountant) -> FileResult<bool> {
        codec::fill_page(
            &mut self.reader,
            &mut self.record,
            self.column_count,
            page,
            io,
        )
    }
}
