use crate::record::RecordError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Relation has no header line: {0}")]
    EmptyRelation(String),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}

pub type FileResult<T> = Result<T, FileError>;
