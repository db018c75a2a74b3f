use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use csv::{Position, Reader, StringRecord, Writer};
use tracing::{debug, warn};

use super::accountant::IoAccountant;
use super::codec;
use super::error::FileResult;
use super::relation::PageSource;
use crate::record::{Header, Page};

/// Deterministic run file name for `{tag, pass, index}`
pub fn run_file_name(prefix: &str, tag: &str, pass: usize, index: usize) -> String {
    format!("{prefix}_{tag}_p{pass}_r{index}.csv")
}

/// Owned handle to a temporary run file. The file is deleted when the handle
/// is dropped unless it was kept or persisted first.
#[derive(Debug)]
pub struct RunFile {
    path: PathBuf,
    header: Header,
    armed: bool,
}

impl RunFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Open the run for reading; skipping the header counts one read
    pub fn open(&self, io: &mut IoAccountant) -> FileResult<RunReader> {
        let mut reader = codec::open_reader(&self.path)?;
        let mut record = StringRecord::new();
        codec::read_header(&mut reader, &mut record, &self.path)?;
        io.record_read();

        Ok(RunReader {
            reader,
            record,
            column_count: self.header.column_count(),
        })
    }

    /// Stop managing the file and leave it on disk
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        self.path.clone()
    }

    /// Move the run to `dest`, keeping it on disk
    pub fn persist<P: AsRef<Path>>(mut self, dest: P) -> FileResult<PathBuf> {
        let dest = dest.as_ref().to_path_buf();
        if fs::rename(&self.path, &dest).is_err() {
            // Rename fails across filesystems
            fs::copy(&self.path, &dest)?;
            fs::remove_file(&self.path)?;
        }
        self.armed = false;
        Ok(dest)
    }
}

impl Drop for RunFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed run file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove run file"),
        }
    }
}

/// Page-wise writer for a new run. Dropping it without `finish` deletes the file.
pub struct RunWriter {
    // Declared before `file` so the writer is closed before the file is removed
    writer: Writer<File>,
    file: RunFile,
    rows: usize,
}

impl RunWriter {
    /// Create the file and write its header (one write)
    pub fn create<P: AsRef<Path>>(
        path: P,
        header: &Header,
        io: &mut IoAccountant,
    ) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = codec::create_writer(&path)?;
        let file = RunFile {
            path,
            header: header.clone(),
            armed: true,
        };
        codec::write_header(&mut writer, header, io)?;
        Ok(Self {
            writer,
            file,
            rows: 0,
        })
    }

    /// Write a page (one write)
    pub fn write_page(&mut self, page: &Page, io: &mut IoAccountant) -> FileResult<()> {
        codec::write_page(&mut self.writer, page, io)?;
        self.rows += page.len();
        Ok(())
    }

    /// Rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and hand back ownership of the completed run
    pub fn finish(mut self) -> FileResult<RunFile> {
        self.writer.flush()?;
        Ok(self.file)
    }
}

/// A saved read position in a run, captured by value and restored with `RunReader::seek`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMark {
    position: Position,
}

impl StreamMark {
    pub fn byte_offset(&self) -> u64 {
        self.position.byte()
    }
}

/// Page-wise reader over a run file
pub struct RunReader {
    reader: Reader<File>,
    record: StringRecord,
    column_count: usize,
}

impl RunReader {
    /// Position of the next unread page
    pub fn mark(&self) -> StreamMark {
        StreamMark {
            position: self.reader.position().clone(),
        }
    }

    /// Return to a previously captured position
    pub fn seek(&mut self, mark: &StreamMark) -> FileResult<()> {
        self.reader.seek(mark.position.clone())?;
        Ok(())
    }
}

impl PageSource for RunReader {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ROWS_PER_PAGE, Row};
    use tempfile::TempDir;

    fn header() -> Header {
        Header::from(&["id", "val"][..])
    }

    fn page_of(ids: std::ops::Range<usize>) -> Page {
        let mut page = Page::new();
        for i in ids {
            page.push(Row::new(vec![format!("{:03}", i), format!("v{}", i)]))
                .unwrap();
        }
        page
    }

    fn write_run(dir: &TempDir, pages: &[Page], io: &mut IoAccountant) -> RunFile {
        let mut writer = RunWriter::create(dir.path().join("run.csv"), &header(), io).unwrap();
        for page in pages {
            writer.write_page(page, io).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_run_file_name() {
        assert_eq!(run_file_name("tmp", "A", 2, 7), "tmp_A_p2_r7.csv");
    }

    #[test]
    fn test_write_and_read_pages() {
        let dir = TempDir::new().unwrap();
        let mut io = IoAccountant::new();
        let run = write_run(&dir, &[page_of(0..10), page_of(10..13)], &mut io);
        assert_eq!(io.writes(), 3); // header + 2 pages

        let content = fs::read_to_string(run.path()).unwrap();
        assert!(content.starts_with("id,val\n000,v0\n"));

        let mut reader = run.open(&mut io).unwrap();
        let mut page = Page::new();
        assert!(reader.read_page(&mut page, &mut io).unwrap());
        assert_eq!(page.len(), ROWS_PER_PAGE);
        assert!(reader.read_page(&mut page, &mut io).unwrap());
        assert_eq!(page.len(), 3);
        assert!(!reader.read_page(&mut page, &mut io).unwrap());
        assert!(page.is_empty());

        assert_eq!(io.reads(), 3); // header + 2 pages
    }

    #[test]
    fn test_mark_and_seek() {
        let dir = TempDir::new().unwrap();
        let mut io = IoAccountant::new();
        let run = write_run(
            &dir,
            &[page_of(0..10), page_of(10..20), page_of(20..25)],
            &mut io,
        );

        let mut reader = run.open(&mut io).unwrap();
        let mut page = Page::new();
        reader.read_page(&mut page, &mut io).unwrap();
        let mark = reader.mark();
        assert!(mark.byte_offset() > 0);

        reader.read_page(&mut page, &mut io).unwrap();
        let second = page.clone();
        reader.read_page(&mut page, &mut io).unwrap();
        assert_eq!(page.get(0).unwrap().get(0), Some("020"));

        reader.seek(&mark).unwrap();
        reader.read_page(&mut page, &mut io).unwrap();
        assert_eq!(page, second);
    }

    #[test]
    fn test_run_file_deleted_on_drop() {
        let dir = TempDir::new().unwrap();
        let mut io = IoAccountant::new();
        let run = write_run(&dir, &[page_of(0..3)], &mut io);
        let path = run.path().to_path_buf();
        assert!(path.exists());

        drop(run);
        assert!(!path.exists());
    }

    #[test]
    fn test_unfinished_writer_deletes_file() {
        let dir = TempDir::new().unwrap();
        let mut io = IoAccountant::new();
        let path = dir.path().join("partial.csv");
        {
            let mut writer = RunWriter::create(&path, &header(), &mut io).unwrap();
            writer.write_page(&page_of(0..2), &mut io).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_keep_and_persist() {
        let dir = TempDir::new().unwrap();
        let mut io = IoAccountant::new();

        let run = write_run(&dir, &[page_of(0..3)], &mut io);
        let kept = run.keep();
        assert!(kept.exists());

        let run = RunWriter::create(dir.path().join("other.csv"), &header(), &mut io)
            .unwrap()
            .finish()
            .unwrap();
        let dest = dir.path().join("sorted.csv");
        let persisted = run.persist(&dest).unwrap();
        assert_eq!(persisted, dest);
        assert!(dest.exists());
        assert!(!dir.path().join("other.csv").exists());
    }
}
