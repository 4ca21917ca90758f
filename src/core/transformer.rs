use crate::core::{InputRecord, MalformedDatePolicy, OutputRecord, TransformResult, OUTPUT_HEADER};
use crate::utils::error::{EtlError, Result};
use csv::StringRecord;

/// Required length of an exportable phone value, counted in characters.
pub const PHONE_LENGTH: usize = 10;

/// Reduces a customer export to the import schema.
///
/// The transform is a pure function of its input: no I/O, no state shared
/// between rows. Reading the source and writing the result belong to
/// [`crate::core::pipeline::ExportPipeline`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordTransformer {
    date_policy: MalformedDatePolicy,
}

impl RecordTransformer {
    pub fn new(date_policy: MalformedDatePolicy) -> Self {
        Self { date_policy }
    }

    /// Parses `raw` and reshapes every accepted row.
    pub fn transform(&self, raw: &str) -> Result<TransformResult> {
        let records = self.parse(raw)?;
        self.apply(records)
    }

    /// Reads `raw` as CSV with a header row.
    ///
    /// Quoting is checked strictly before the reader sees the text, and rows
    /// whose field count differs from the header are rejected, so a malformed
    /// file fails as a whole instead of yielding partial records.
    pub fn parse(&self, raw: &str) -> Result<Vec<InputRecord>> {
        let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        check_quoting(text)?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers = rdr.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers);
        if !headers.is_empty() && columns.phone.is_none() {
            tracing::warn!("⚠️ Input has no 'phone' column; every row will be rejected");
        }

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            records.push(columns.read(&row));
        }

        tracing::debug!("Parsed {} rows with columns {:?}", records.len(), headers);
        Ok(records)
    }

    /// Folds parsed rows into the output schema, preserving input order.
    pub fn apply(&self, records: Vec<InputRecord>) -> Result<TransformResult> {
        let total = records.len();
        let mut processed_records = Vec::new();
        let mut skipped_dates = 0;

        for record in &records {
            if !is_exportable_phone(record.phone.as_deref()) {
                tracing::debug!(
                    "Rejected line {}: phone {:?} is not {} characters",
                    record.line,
                    record.phone,
                    PHONE_LENGTH
                );
                continue;
            }

            match reshape(record) {
                Ok(output) => processed_records.push(output),
                Err(e @ EtlError::MalformedDate { .. })
                    if self.date_policy == MalformedDatePolicy::SkipRow =>
                {
                    tracing::warn!("⚠️ Skipping row: {}", e);
                    skipped_dates += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let csv_output = serialize(&processed_records)?;

        Ok(TransformResult {
            accepted: processed_records.len(),
            processed_records,
            csv_output,
            total,
            skipped_dates,
        })
    }
}

/// Positions of the columns the transform reads. A repeated header name
/// resolves to its first occurrence.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnIndex {
    phone: Option<usize>,
    name: Option<usize>,
    email: Option<usize>,
    points: Option<usize>,
    birthday: Option<usize>,
    notes: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |column: &str| headers.iter().position(|h| h == column);
        Self {
            phone: find("phone"),
            name: find("name"),
            email: find("email"),
            points: find("points"),
            birthday: find("birthday"),
            notes: find("notes"),
        }
    }

    fn read(&self, row: &StringRecord) -> InputRecord {
        InputRecord {
            phone: field(row, self.phone),
            name: field(row, self.name),
            email: field(row, self.email),
            points: field(row, self.points),
            birthday: field(row, self.birthday),
            notes: field(row, self.notes),
            line: row.position().map(|p| p.line()).unwrap_or(0),
        }
    }
}

/// Empty cells read as absent, whether or not they were quoted.
fn field(row: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| row.get(i))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// A phone is exportable when present and exactly [`PHONE_LENGTH`] characters
/// long. Punctuation and spaces count toward the length.
pub fn is_exportable_phone(phone: Option<&str>) -> bool {
    phone.is_some_and(|p| p.chars().count() == PHONE_LENGTH)
}

/// Re-encodes `YYYY-MM-DD` as `MM/DD`. Segments are taken verbatim; anything
/// past the third dash-separated segment is ignored.
pub fn format_birthday(value: &str) -> Option<String> {
    let mut segments = value.split('-');
    let _year = segments.next()?;
    let month = segments.next()?;
    let day = segments.next()?;
    Some(format!("{}/{}", month, day))
}

/// Maps an accepted row onto the output schema.
pub fn reshape(record: &InputRecord) -> Result<OutputRecord> {
    let birthday = match record.birthday.as_deref() {
        Some(value) => format_birthday(value).ok_or_else(|| EtlError::MalformedDate {
            line: record.line,
            value: value.to_string(),
        })?,
        None => String::new(),
    };

    Ok(OutputRecord {
        phone: record.phone.clone().unwrap_or_default(),
        name: record.name.clone().unwrap_or_default(),
        last_name: String::new(),
        email: record.email.clone().unwrap_or_default(),
        points: record.points.clone().unwrap_or_default(),
        birthday,
        vip: String::new(),
        notes: record.notes.clone().unwrap_or_default(),
    })
}

/// Writes the header followed by one line per record.
pub fn serialize(records: &[OutputRecord]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(OUTPUT_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV writer produced invalid UTF-8: {}", e),
    })
}

#[derive(Clone, Copy, PartialEq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Rejects text the `csv` reader would otherwise accept leniently: stray
/// quotes inside unquoted fields, text after a closing quote, and quotes
/// left open at end of input.
pub fn check_quoting(text: &str) -> Result<()> {
    let mut state = QuoteState::FieldStart;
    let mut line: u64 = 1;
    let mut opened_on: u64 = 1;
    let mut after_cr = false;

    for c in text.chars() {
        state = match (state, c) {
            (QuoteState::FieldStart, '"') => {
                opened_on = line;
                QuoteState::Quoted
            }
            (QuoteState::FieldStart | QuoteState::Unquoted, ',' | '\r' | '\n') => {
                QuoteState::FieldStart
            }
            (QuoteState::FieldStart, _) => QuoteState::Unquoted,
            (QuoteState::Unquoted, '"') => {
                return Err(EtlError::ParseError {
                    line,
                    message: "illegal quote in unquoted field".to_string(),
                });
            }
            (QuoteState::Unquoted, _) => QuoteState::Unquoted,
            (QuoteState::Quoted, '"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, '"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, ',' | '\n' | '\r') => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, other) => {
                return Err(EtlError::ParseError {
                    line,
                    message: format!("unexpected {:?} after closing quote", other),
                });
            }
        };

        // `\r`, `\n` and `\r\n` each end one line.
        match c {
            '\r' => line += 1,
            '\n' if !after_cr => line += 1,
            _ => {}
        }
        after_cr = c == '\r';
    }

    if state == QuoteState::Quoted {
        return Err(EtlError::ParseError {
            line: opened_on,
            message: "unclosed quoted field".to_string(),
        });
    }

    Ok(())
}
