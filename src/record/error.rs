use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Page capacity exceeded: a page holds at most {capacity} rows")]
    CapacityExceeded { capacity: usize },
}

pub type RecordResult<T> = Result<T, RecordError>;
