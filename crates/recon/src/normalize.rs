use crate::columns::InputColumns;
use crate::model::Record;

/// Characters deleted outright before comparison.
const STRIPPED: [char; 4] = ['.', ',', '#', '-'];

/// Canonical comparison key for a free-text address.
///
/// Uppercases, deletes `. , # -`, collapses whitespace runs to a single
/// space and trims. The result is a fixed point: normalizing a key again
/// returns it unchanged.
pub fn normalize_address(address: &str) -> String {
    let mut key = String::with_capacity(address.len());
    let mut pending_space = false;

    for ch in address.chars().flat_map(char::to_uppercase) {
        if STRIPPED.contains(&ch) {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !key.is_empty() {
            key.push(' ');
        }
        pending_space = false;
        key.push(ch);
    }

    key
}

/// Address, suite, city, state and zip of an input row joined with single
/// spaces. City and state are always appended; suite and zip only when the
/// column exists and the value is non-empty.
pub fn full_address(record: &Record, columns: &InputColumns) -> String {
    let mut full = record.get(&columns.address).to_string();

    if let Some(suite) = non_empty(record, columns.suite.as_deref()) {
        full.push(' ');
        full.push_str(suite);
    }

    full.push(' ');
    full.push_str(record.get(&columns.city));
    full.push(' ');
    full.push_str(record.get(&columns.state));

    if let Some(zip) = non_empty(record, columns.zip.as_deref()) {
        full.push(' ');
        full.push_str(zip);
    }

    full
}

fn non_empty<'a>(record: &'a Record, column: Option<&str>) -> Option<&'a str> {
    column.map(|c| record.get(c)).filter(|v| !v.is_empty())
}
