/// Ordered column names of a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Create a new header
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Get all column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get column count
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Find column index by name
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy of this header with every column name prefixed, e.g. `A.` + `id`
    pub fn prefixed(&self, prefix: &str) -> Header {
        Header {
            columns: self
                .columns
                .iter()
                .map(|c| format!("{prefix}{c}"))
                .collect(),
        }
    }

    /// Header of a join result: `A.`-prefixed left columns then `B.`-prefixed right columns
    pub fn joined(left: &Header, right: &Header) -> Header {
        let mut columns = left.prefixed("A.").columns;
        columns.extend(right.prefixed("B.").columns);
        Header { columns }
    }
}

impl From<&[&str]> for Header {
    fn from(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect())
    }
}
