// Property-based tests for the codec, normalizer and engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use rerun_recon::merge::merge_tables;
use rerun_recon::model::{ReconInput, Record, SourceText};
use rerun_recon::normalize::{full_address, normalize_address};
use rerun_recon::table::{decode, encode};
use rerun_recon::{columns::InputColumns, run, HeaderPolicy, ReconConfig};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

const HEADER_POOL: [&str; 6] = ["Location", "Remarks", "Latitude", "Longitude", "Run", "Notes"];

/// Field value without comma, quote or newline; never padded with whitespace.
fn arb_plain_value() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => r"[A-Za-z0-9#.\-]([A-Za-z0-9#. \-]{0,14}[A-Za-z0-9#.\-])?",
        1 => Just(String::new()),
    ]
}

/// 2..=6 distinct headers in pool order.
fn arb_headers() -> impl Strategy<Value = Vec<String>> {
    (2usize..=HEADER_POOL.len())
        .prop_map(|n| HEADER_POOL[..n].iter().map(|s| s.to_string()).collect())
}

fn arb_rows(headers: Vec<String>, max: usize) -> impl Strategy<Value = (Vec<String>, Vec<Record>)> {
    let width = headers.len();
    prop::collection::vec(prop::collection::vec(arb_plain_value(), width), 0..max).prop_map(
        move |rows| {
            let records = rows
                .into_iter()
                .map(|values| headers.iter().cloned().zip(values).collect::<Record>())
                .collect();
            (headers.clone(), records)
        },
    )
}

fn arb_table() -> impl Strategy<Value = (Vec<String>, Vec<Record>)> {
    arb_headers().prop_flat_map(|h| arb_rows(h, 12))
}

/// Values that may carry commas and padding but never quotes or newlines.
fn arb_comma_value() -> impl Strategy<Value = String> {
    r"[A-Za-z0-9 ,#.]{0,14}"
}

fn arb_address() -> impl Strategy<Value = String> {
    r"[ A-Za-z0-9.,#\-\t]{0,30}"
}

fn arb_remark() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Success".to_string()),
        Just("Failed - timeout".to_string()),
        Just("FAILED".to_string()),
        Just("ok".to_string()),
        Just(String::new()),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn normalize_is_idempotent(s in any::<String>()) {
        let once = normalize_address(&s);
        prop_assert_eq!(normalize_address(&once), once);
    }

    #[test]
    fn normalize_address_like_is_idempotent(s in arb_address()) {
        let once = normalize_address(&s);
        prop_assert_eq!(normalize_address(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn decode_encode_round_trip((headers, rows) in arb_table()) {
        let table = decode(&encode(&headers, &rows));
        prop_assert_eq!(&table.headers, &headers);
        prop_assert_eq!(table.rows, rows);
    }

    #[test]
    fn encode_is_readable_as_standard_csv(
        rows in prop::collection::vec(prop::collection::vec(arb_comma_value(), 3), 0..10),
    ) {
        let headers = vec!["Location".to_string(), "Remarks".to_string(), "Notes".to_string()];
        let records: Vec<Record> = rows
            .iter()
            .map(|values| headers.iter().cloned().zip(values.iter().cloned()).collect())
            .collect();
        let text = encode(&headers, &records);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let read_headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        prop_assert_eq!(&read_headers, &headers);

        let read_rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        prop_assert_eq!(read_rows, rows);
    }

    #[test]
    fn merge_conserves_row_count(
        files in prop::collection::vec(arb_table(), 1..5),
        union in any::<bool>(),
    ) {
        let tables: Vec<_> = files
            .iter()
            .map(|(h, rows)| decode(&encode(h, rows)))
            .collect();
        let expected: usize = tables.iter().map(|t| t.len()).sum();
        let policy = if union { HeaderPolicy::Union } else { HeaderPolicy::FirstFile };
        let merged = merge_tables(&tables, policy);

        prop_assert_eq!(merged.len(), expected);
        for row in &merged.rows {
            prop_assert_eq!(row.len(), merged.headers.len());
        }
    }

    #[test]
    fn engine_partitions_and_filters(
        outputs in prop::collection::vec(
            prop::collection::vec((arb_address(), arb_remark()), 0..8),
            1..4,
        ),
        inputs in prop::collection::vec((arb_address(), arb_address(), arb_address()), 0..10),
    ) {
        let output_texts: Vec<String> = outputs
            .iter()
            .map(|rows| {
                let headers = vec!["Location".to_string(), "Remarks".to_string()];
                let records: Vec<Record> = rows
                    .iter()
                    .map(|(loc, rem)| Record::from_iter([("Location", loc.as_str()), ("Remarks", rem.as_str())]))
                    .collect();
                encode(&headers, &records)
            })
            .collect();
        let input_headers = vec!["Address".to_string(), "City".to_string(), "State".to_string()];
        let input_records: Vec<Record> = inputs
            .iter()
            .map(|(a, c, s)| {
                Record::from_iter([("Address", a.as_str()), ("City", c.as_str()), ("State", s.as_str())])
            })
            .collect();
        let input_text = encode(&input_headers, &input_records);

        let recon_input = ReconInput {
            outputs: output_texts.iter().map(|t| SourceText::new("out.csv", t.clone())).collect(),
            input: Some(SourceText::new("in.csv", input_text)),
        };
        let config = ReconConfig::default();
        let result = run(&config, &recon_input).unwrap();

        // Conservation + failure filter
        let decoded_total: usize = output_texts.iter().map(|t| decode(t).len()).sum();
        prop_assert_eq!(result.valid.len() + result.failed.len(), decoded_total);
        for row in &result.valid.rows {
            prop_assert!(!row.get("Remarks").to_lowercase().contains("failed"));
        }
        for row in &result.failed.rows {
            prop_assert!(row.get("Remarks").to_lowercase().contains("failed"));
        }

        // Partition: each input row is missed iff its key is absent from valid locations
        let processed: std::collections::HashSet<String> = result
            .valid
            .rows
            .iter()
            .map(|r| r.get("Location"))
            .filter(|l| !l.is_empty())
            .map(normalize_address)
            .collect();
        let cols = InputColumns::resolve(&result.input.headers).unwrap();
        let expected_missed: Vec<&Record> = result
            .input
            .rows
            .iter()
            .filter(|r| !processed.contains(&normalize_address(&full_address(r, &cols))))
            .collect();
        prop_assert!(result.missed.len() <= result.input.len());
        prop_assert_eq!(result.missed.rows.iter().collect::<Vec<_>>(), expected_missed);
    }
}
