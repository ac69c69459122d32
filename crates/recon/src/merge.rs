use log::debug;

use crate::config::HeaderPolicy;
use crate::model::Table;

/// Concatenate decoded output tables in order under `policy`.
///
/// Every merged row is projected onto the merged header, so it carries
/// exactly those columns: missing fields are empty and foreign fields are
/// dropped. An empty slice merges to an empty table.
pub fn merge_tables(tables: &[Table], policy: HeaderPolicy) -> Table {
    let headers = merged_headers(tables, policy);
    let mut merged = Table::new(headers);

    for (idx, table) in tables.iter().enumerate() {
        let dropped: Vec<&String> = table
            .headers
            .iter()
            .filter(|h| !merged.headers.contains(*h))
            .collect();
        if !dropped.is_empty() {
            debug!("output file #{}: columns not in merged header dropped: {dropped:?}", idx + 1);
        }

        merged
            .rows
            .extend(table.rows.iter().map(|row| row.project(&merged.headers)));
    }

    merged
}

fn merged_headers(tables: &[Table], policy: HeaderPolicy) -> Vec<String> {
    let Some(first) = tables.first() else {
        return Vec::new();
    };

    let mut headers = first.headers.clone();
    if policy == HeaderPolicy::Union {
        for table in &tables[1..] {
            for h in &table.headers {
                if !headers.contains(h) {
                    headers.push(h.clone());
                }
            }
        }
    }

    headers
}
