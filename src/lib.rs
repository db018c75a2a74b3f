pub mod config;
pub mod exec;
pub mod file;
pub mod record;

pub use config::{ConfigError, ExecConfig};
pub use exec::{ExecError, ExecResult, ExternalSorter, JoinStats, SortMergeJoin, SortedRun};
pub use file::{FileError, FileResult, IoAccountant, PageSource, Relation, RunFile};
pub use record::{Header, MAX_RESIDENT_PAGES, Page, ROWS_PER_PAGE, RecordError, Row};
