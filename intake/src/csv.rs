//! Minimal CSV reader for intake exports.
//!
//! Handles comma separators, double-quoted fields with `""` escapes and
//! embedded newlines, CRLF line endings, and a leading UTF-8 byte order mark.
//! Blank lines are skipped.

use crate::error::{IntakeError, Result};

/// A parsed CSV document: a header row and data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column names, as written.
    pub headers: Vec<String>,
    /// Data rows. A row may be shorter or longer than the header.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parses CSV text whose first record is the header.
    ///
    /// # Errors
    ///
    /// Returns an error on an unterminated quoted field or a missing header.
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = parse_records(text.strip_prefix('\u{feff}').unwrap_or(text))?;
        if records.is_empty() {
            return Err(IntakeError::Csv {
                line: 1,
                reason: "no header row".to_string(),
            });
        }
        let headers = records.remove(0);
        Ok(Self {
            headers,
            rows: records,
        })
    }

    /// Pairs every cell of row `index` with its column name.
    ///
    /// Cells beyond the header are dropped; missing trailing cells are absent.
    pub fn record(&self, index: usize) -> Option<Vec<(&str, &str)>> {
        let row = self.rows.get(index)?;
        Some(
            self.headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.as_str(), v.as_str()))
                .collect(),
        )
    }

    /// Position of column `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                line += 1;
                finish_record(&mut records, &mut record, &mut field);
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(IntakeError::Csv {
            line: quote_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    finish_record(&mut records, &mut record, &mut field);
    Ok(records)
}

fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));
    let done = std::mem::take(record);
    if done.len() == 1 && done[0].is_empty() {
        return;
    }
    records.push(done);
}
