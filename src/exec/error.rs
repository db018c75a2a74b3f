use crate::file::FileError;
use crate::record::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Unknown column '{column}' in relation {relation}")]
    UnknownColumn { column: String, relation: String },
}

pub type ExecResult<T> = Result<T, ExecError>;
