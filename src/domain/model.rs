use serde::Serialize;

/// Column names of the import schema, in output order.
pub const OUTPUT_HEADER: [&str; 8] = [
    "phone",
    "name",
    "last_name",
    "email",
    "points",
    "birthday",
    "vip",
    "notes",
];

/// One row of the source export, keyed by header name.
///
/// Columns absent from the header and empty cells are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub points: Option<String>,
    pub birthday: Option<String>,
    pub notes: Option<String>,
    /// 1-based line in the source text where the row starts.
    pub line: u64,
}

/// A row of the import schema. `last_name` and `vip` are never populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub phone: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub points: String,
    pub birthday: String,
    pub vip: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub processed_records: Vec<OutputRecord>,
    pub csv_output: String,
    pub accepted: usize,
    pub total: usize,
    /// Rows dropped for an unreadable birthday; included in `rejected()`.
    pub skipped_dates: usize,
}

impl TransformResult {
    pub fn rejected(&self) -> usize {
        self.total - self.accepted
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedDatePolicy {
    /// Fail the whole run on the first unreadable birthday.
    #[default]
    Abort,
    /// Drop only the offending row and keep going.
    SkipRow,
}
