//! Lenient CSV codec for job output and input lists.
//!
//! Quoting is deliberately simplified: a `"` toggles quoted mode and is
//! dropped, so commas inside quotes survive but doubled quotes are not
//! un-escaped. The encoder mirrors this: values containing a comma are
//! wrapped in quotes, nothing else is escaped. Files written by the job
//! round-trip through this pair unchanged.

use log::warn;

use crate::model::{Record, Table};

/// Parse delimited text into a table.
///
/// Blank lines are skipped. Text with no non-blank line yields an empty
/// table. Ragged rows are tolerated: extra fields are dropped and missing
/// trailing fields read as empty.
pub fn decode(text: &str) -> Table {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Table::default();
    };
    let headers = split_line(header_line);

    let mut table = Table::new(headers);
    let mut ragged = 0usize;

    for line in lines {
        let fields = split_line(line);
        if fields.len() > table.headers.len() {
            ragged += 1;
        }
        table.rows.push(record_from_fields(&table.headers, fields));
    }

    if ragged > 0 {
        warn!("{ragged} row(s) had more fields than headers; extra fields dropped");
    }

    table
}

/// Serialize `rows` under `headers`. Lines are joined with `\n`, no trailing newline.
pub fn encode(headers: &[String], rows: &[Record]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));

    for row in rows {
        let fields: Vec<String> = headers.iter().map(|h| encode_field(row.get(h))).collect();
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// Convenience for encoding a whole table.
pub fn encode_table(table: &Table) -> String {
    encode(&table.headers, &table.rows)
}

fn encode_field(value: &str) -> String {
    if value.contains(',') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Tokenize one line into cleaned fields.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(clean_field(&std::mem::take(&mut current))),
            _ => current.push(ch),
        }
    }
    fields.push(clean_field(&current));

    fields
}

/// Trim, then strip one enclosing pair of double quotes if present at both ends.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

fn record_from_fields(headers: &[String], fields: Vec<String>) -> Record {
    let mut record = Record::new();
    let mut fields = fields.into_iter();

    for header in headers {
        let value = fields.next().unwrap_or_default();
        // Repeated header names: the first column wins.
        if !record.contains(header) {
            record.insert(header.clone(), value);
        }
    }

    record
}
