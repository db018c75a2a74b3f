use std::fs::File;
use std::io;
use std::path::Path;

use csv::{QuoteStyle, Reader, ReaderBuilder, StringRecord, Writer, WriterBuilder};

use super::accountant::IoAccountant;
use super::error::{FileError, FileResult};
use crate::record::{Header, Page, Row};

/// Open a CSV file for page-wise reading; the header is read like any other record
pub(crate) fn open_reader(path: &Path) -> FileResult<Reader<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FileError::FileNotFound(path.display().to_string()),
        _ => FileError::Io(e),
    })?;

    Ok(ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Short rows are padded, never rejected
        .quoting(false) // One row per line; quote characters are field data
        .from_reader(file))
}

/// Read the header line; a file without one is an empty relation
pub(crate) fn read_header(
    reader: &mut Reader<File>,
    record: &mut StringRecord,
    path: &Path,
) -> FileResult<Header> {
    if !reader.read_record(record)? {
        return Err(FileError::EmptyRelation(path.display().to_string()));
    }
    Ok(Header::new(record.iter().map(str::to_string).collect()))
}

/// Fill `page` with up to `ROWS_PER_PAGE` rows. Counts one read if anything was read.
pub(crate) fn fill_page(
    reader: &mut Reader<File>,
    record: &mut StringRecord,
    column_count: usize,
    page: &mut Page,
    io: &mut IoAccountant,
) -> FileResult<bool> {
    page.clear();
    while !page.is_full() {
        if !reader.read_record(record)? {
            break;
        }
        page.push(Row::padded(record.iter(), column_count))?;
    }

    if page.is_empty() {
        return Ok(false);
    }
    io.record_read();
    Ok(true)
}

/// Create (or truncate) a CSV file for writing
pub(crate) fn create_writer(path: &Path) -> FileResult<Writer<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .from_writer(file))
}

/// Write the header line, counted as one page write
pub(crate) fn write_header(
    writer: &mut Writer<File>,
    header: &Header,
    io: &mut IoAccountant,
) -> FileResult<()> {
    writer.write_record(header.columns())?;
    io.record_write();
    Ok(())
}

/// Write every row of `page`, counted as one page write
pub(crate) fn write_page(
    writer: &mut Writer<File>,
    page: &Page,
    io: &mut IoAccountant,
) -> FileResult<()> {
    for row in page.rows() {
        writer.write_record(row.fields())?;
    }
    io.record_write();
    Ok(())
}
