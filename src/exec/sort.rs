use std::collections::VecDeque;

use tracing::{debug, info};

use super::cursor::{PageCursor, PageSink};
use super::error::ExecResult;
use super::key_index;
use crate::config::ExecConfig;
use crate::file::{IoAccountant, PageSource, Relation, RunFile};
use crate::record::{Header, Page, Row, SORT_BUFFER_ROWS};

/// The single fully sorted run produced by `ExternalSorter::sort`
#[derive(Debug)]
pub struct SortedRun {
    run: RunFile,
    key_index: usize,
    rows: usize,
    runs_generated: usize,
    merge_passes: usize,
}

impl SortedRun {
    pub fn run(&self) -> &RunFile {
        &self.run
    }

    pub fn into_run(self) -> RunFile {
        self.run
    }

    /// Index of the sort key within the run's header
    pub fn key_index(&self) -> usize {
        self.key_index
    }

    /// Number of rows in the sorted output
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Runs produced by run generation (pass 0)
    pub fn runs_generated(&self) -> usize {
        self.runs_generated
    }

    /// Merge passes needed to reduce them to one
    pub fn merge_passes(&self) -> usize {
        self.merge_passes
    }
}

/// Bounded-memory multi-pass merge sort over a relation.
///
/// Pass 0 sorts `SORT_BUFFER_ROWS` rows at a time into runs. Every later pass
/// merges runs pairwise with two input pages and one output page resident,
/// until a single run remains.
pub struct ExternalSorter<'a> {
    config: &'a ExecConfig,
}

impl<'a> ExternalSorter<'a> {
    pub fn new(config: &'a ExecConfig) -> Self {
        Self { config }
    }

    /// Sort `relation` on `key_column`. Run files are named after `tag`.
    pub fn sort(
        &self,
        relation: &Relation,
        key_column: &str,
        tag: &str,
        io: &mut IoAccountant,
    ) -> ExecResult<SortedRun> {
        let key_index = key_index(relation, key_column)?;
        let header = relation.header();

        let (mut runs, rows) = self.generate_runs(relation, key_index, tag, io)?;
        let runs_generated = runs.len();

        let mut pass = 1;
        while runs.len() > 1 {
            runs = self.merge_pass(runs, key_index, tag, pass, io)?;
            pass += 1;
        }
        let merge_passes = pass - 1;

        let run = match runs.pop_front() {
            Some(run) => run,
            // No data rows: the result is a header-only run
            None => {
                PageSink::create(self.config.run_path(tag, 0, 0), header, io)?.finish(io)?
            }
        };

        info!(
            relation = %relation.name(),
            key = key_column,
            rows,
            runs_generated,
            merge_passes,
            reads = io.reads(),
            writes = io.writes(),
            "external sort complete"
        );

        Ok(SortedRun {
            run,
            key_index,
            rows,
            runs_generated,
            merge_passes,
        })
    }

    /// Pass 0: cut the relation into sorted runs of at most `SORT_BUFFER_ROWS` rows
    fn generate_runs(
        &self,
        relation: &Relation,
        key_index: usize,
        tag: &str,
        io: &mut IoAccountant,
    ) -> ExecResult<(VecDeque<RunFile>, usize)> {
        let header = relation.header();
        let mut cursor = relation.cursor(io)?;
        let mut buffer: Vec<Row> = Vec::with_capacity(SORT_BUFFER_ROWS);
        let mut runs = VecDeque::new();
        let mut rows = 0;

        let mut page = Page::new();
        while cursor.read_page(&mut page, io)? {
            for row in page.drain() {
                rows += 1;
                buffer.push(row);
                if buffer.len() == SORT_BUFFER_ROWS {
                    let index = runs.len();
                    let run =
                        self.write_sorted_run(&mut buffer, header, key_index, tag, index, io)?;
                    runs.push_back(run);
                }
            }
        }

        if !buffer.is_empty() {
            let index = runs.len();
            let run = self.write_sorted_run(&mut buffer, header, key_index, tag, index, io)?;
            runs.push_back(run);
        }

        Ok((runs, rows))
    }

    /// Sort the buffer by key and write it out as run `index` of pass 0, leaving it empty
    fn write_sorted_run(
        &self,
        buffer: &mut Vec<Row>,
        header: &Header,
        key_index: usize,
        tag: &str,
        index: usize,
        io: &mut IoAccountant,
    ) -> ExecResult<RunFile> {
        // Stable, byte-wise on the raw field
        buffer.sort_by(|a, b| a.key(key_index).cmp(b.key(key_index)));

        let mut sink = PageSink::create(self.config.run_path(tag, 0, index), header, io)?;
        for row in buffer.drain(..) {
            sink.push(row, io)?;
        }
        debug!(tag, index, rows = sink.rows(), "wrote initial run");
        Ok(sink.finish(io)?)
    }

    /// Merge runs two at a time; an odd run out passes through to the next pass
    fn merge_pass(
        &self,
        mut runs: VecDeque<RunFile>,
        key_index: usize,
        tag: &str,
        pass: usize,
        io: &mut IoAccountant,
    ) -> ExecResult<VecDeque<RunFile>> {
        let mut merged = VecDeque::with_capacity(runs.len().div_ceil(2));
        while let Some(left) = runs.pop_front() {
            let Some(right) = runs.pop_front() else {
                merged.push_back(left);
                break;
            };
            let index = merged.len();
            merged.push_back(self.merge_two(left, right, key_index, tag, pass, index, io)?);
        }
        debug!(tag, pass, runs = merged.len(), "merge pass complete");
        Ok(merged)
    }

    /// Merge two sorted runs into run `index` of `pass`. Both inputs are consumed
    /// and their files removed.
    #[allow(clippy::too_many_arguments)]
    fn merge_two(
        &self,
        left: RunFile,
        right: RunFile,
        key_index: usize,
        tag: &str,
        pass: usize,
        index: usize,
        io: &mut IoAccountant,
    ) -> ExecResult<RunFile> {
        let mut left_cursor = PageCursor::open(left.open(io)?, io)?;
        let mut right_cursor = PageCursor::open(right.open(io)?, io)?;
        let mut sink =
            PageSink::create(self.config.run_path(tag, pass, index), left.header(), io)?;

        loop {
            let take_left = match (left_cursor.current(), right_cursor.current()) {
                // Ties go to the left run
                (Some(l), Some(r)) => l.key(key_index) <= r.key(key_index),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            let cursor = if take_left {
                &mut left_cursor
            } else {
                &mut right_cursor
            };
            if let Some(row) = cursor.current() {
                sink.push(row.clone(), io)?;
            }
            cursor.advance(io)?;
        }

        debug!(tag, pass, index, rows = sink.rows(), "merged runs");
        let run = sink.finish(io)?;

        drop(left_cursor);
        drop(right_cursor);
        drop(left);
        drop(right);
        Ok(run)
    }
}
