/// A single row of opaque text fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Build a row from parsed fields, padding with empty strings up to `column_count`
    pub fn padded<I, S>(fields: I, column_count: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.len() < column_count {
            fields.resize(column_count, String::new());
        }
        Self { fields }
    }

    /// Get the number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field by index
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    /// Get the field used as a sort/join key; a missing field compares as empty
    pub fn key(&self, idx: usize) -> &str {
        self.get(idx).unwrap_or("")
    }

    /// Get all fields
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Concatenate two rows into a joined row (`self` fields first)
    pub fn concat(&self, other: &Row) -> Row {
        let mut fields = Vec::with_capacity(self.len() + other.len());
        fields.extend_from_slice(&self.fields);
        fields.extend_from_slice(&other.fields);
        Row { fields }
    }
}

impl From<Vec<String>> for Row {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl From<&[&str]> for Row {
    fn from(fields: &[&str]) -> Self {
        Self::new(fields.iter().map(|f| f.to_string()).collect())
    }
}
