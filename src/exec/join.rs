use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::cursor::{PageCursor, PageSink};
use super::error::ExecResult;
use super::key_index;
use super::sort::ExternalSorter;
use crate::config::ExecConfig;
use crate::file::{IoAccountant, Relation, RunReader};
use crate::record::{Header, Page};

/// Cost and size of a completed join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    /// Page reads plus page writes, sorting included
    pub io_ops: usize,
    /// Pages written, sorting included
    pub pages_out: usize,
    /// Rows in the join result
    pub tuples_out: usize,
}

/// Sort-merge equi-join of two relations on one column each.
///
/// Both inputs are externally sorted first, then merged with one page per
/// input, one output page and one copy of the page where a matching group of
/// the right input starts. When a key repeats on both sides, the right group
/// is re-read from that mark once per matching left row.
pub struct SortMergeJoin<'a> {
    config: &'a ExecConfig,
}

impl<'a> SortMergeJoin<'a> {
    pub fn new(config: &'a ExecConfig) -> Self {
        Self { config }
    }

    /// Join `left.col_left = right.col_right` into a CSV at `output`.
    ///
    /// Resets `io` before starting. On failure no output file is left behind.
    pub fn execute(
        &self,
        left: &Relation,
        right: &Relation,
        col_left: &str,
        col_right: &str,
        output: &Path,
        io: &mut IoAccountant,
    ) -> ExecResult<JoinStats> {
        let key_left = key_index(left, col_left)?;
        let key_right = key_index(right, col_right)?;

        io.reset();

        let sorter = ExternalSorter::new(self.config);
        let sorted_left = sorter.sort(left, col_left, "A", io)?;
        let sorted_right = sorter.sort(right, col_right, "B", io)?;

        let mut left_cursor = PageCursor::open(sorted_left.run().open(io)?, io)?;
        let mut right_cursor = PageCursor::open(sorted_right.run().open(io)?, io)?;

        let header = Header::joined(left.header(), right.header());
        let mut sink = PageSink::create(output, &header, io)?;

        let tuples_out = merge_sorted(
            &mut left_cursor,
            &mut right_cursor,
            key_left,
            key_right,
            &mut sink,
            io,
        )?;
        sink.finish(io)?.keep();

        let stats = JoinStats {
            io_ops: io.total_ops(),
            pages_out: io.pages_written(),
            tuples_out,
        };
        info!(
            left = %left.name(),
            right = %right.name(),
            output = %output.display(),
            io_ops = stats.io_ops,
            pages_out = stats.pages_out,
            tuples_out = stats.tuples_out,
            "sort-merge join complete"
        );
        Ok(stats)
    }
}

/// Merge two key-sorted streams, emitting every matching pair. Returns the
/// number of rows emitted.
fn merge_sorted(
    left: &mut PageCursor<RunReader>,
    right: &mut PageCursor<RunReader>,
    key_left: usize,
    key_right: usize,
    sink: &mut PageSink,
    io: &mut IoAccountant,
) -> ExecResult<usize> {
    let mut mark_page = Page::new();
    let mut emitted = 0;

    loop {
        let (Some(l), Some(r)) = (left.current(), right.current()) else {
            break;
        };
        match l.key(key_left).cmp(r.key(key_right)) {
            std::cmp::Ordering::Less => {
                left.advance(io)?;
                continue;
            }
            std::cmp::Ordering::Greater => {
                right.advance(io)?;
                continue;
            }
            std::cmp::Ordering::Equal => {}
        }

        let key = l.key(key_left).to_string();
        let mark = right.mark(&mut mark_page);
        let mut group_rows = 0;

        // Rescan the right group once for every left row that shares the key
        while let Some(l) = left.current().filter(|row| row.key(key_left) == key) {
            right.restore(&mark, &mark_page)?;
            while let Some(r) = right.current().filter(|row| row.key(key_right) == key) {
                sink.push(l.concat(r), io)?;
                emitted += 1;
                group_rows += 1;
                right.advance(io)?;
            }
            left.advance(io)?;
        }

        // Skip the right side past the group
        right.restore(&mark, &mark_page)?;
        while right
            .current()
            .is_some_and(|row| row.key(key_right) == key)
        {
            right.advance(io)?;
        }

        debug!(key = %key, rows = group_rows, "joined key group");
    }

    Ok(emitted)
}
