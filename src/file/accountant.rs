use serde::Serialize;

/// Counts page-granularity transfers between disk and memory.
///
/// One read or write is one page (up to `ROWS_PER_PAGE` rows) or one header
/// line. Operators take it as `&mut IoAccountant` so independent runs can be
/// measured in isolation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IoAccountant {
    reads: usize,
    writes: usize,
}

impl IoAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero both counters
    pub fn reset(&mut self) {
        self.reads = 0;
        self.writes = 0;
    }

    pub fn record_read(&mut self) {
        self.reads += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Reads plus writes
    pub fn total_ops(&self) -> usize {
        self.reads + self.writes
    }

    pub fn pages_written(&self) -> usize {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut io = IoAccountant::new();
        io.record_read();
        io.record_read();
        io.record_write();

        assert_eq!(io.reads(), 2);
        assert_eq!(io.writes(), 1);
        assert_eq!(io.total_ops(), 3);
        assert_eq!(io.pages_written(), 1);
    }

    #[test]
    fn test_reset() {
        let mut io = IoAccountant::new();
        io.record_read();
        io.record_write();
        io.reset();

        assert_eq!(io, IoAccountant::default());
        assert_eq!(io.total_ops(), 0);
    }
}
