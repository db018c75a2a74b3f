mod accountant;
mod codec;
mod error;
mod relation;
mod run_file;

pub use accountant::IoAccountant;
pub use error::{FileError, FileResult};
pub use relation::{PageSource, Relation, RelationCursor};
pub use run_file::{RunFile, RunReader, RunWriter, StreamMark, run_file_name};
