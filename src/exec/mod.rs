mod cursor;
mod error;
mod join;
mod sort;


pub use error::{ExecError, ExecResult};
pub use join::{JoinStats, SortMergeJoin};
pub use sort::{ExternalSorter, SortedRun};

use crate::file::Relation;

/// Resolve `column` in the relation's header
fn key_index(relation: &Relation, column: &str) -> ExecResult<usize> {
    relation
        .header()
        .find_column(column)
        .ok_or_else(|| ExecError::UnknownColumn {
            column: column.to_string(),
            relation: relation.name(),
        })
}
