use std::fs;
use std::path::PathBuf;

use polars::df;
use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::{LoadOptions, RawTable, SentinelTokens};
use crate::{
    load_table, load_with_readers, missing_counts, normalize_sentinels, TableReader,
};

fn fixture(path: &str) -> Vec<u8> {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn loads_entsoe_csv_with_sentinels_nulled() {
    let bytes = fixture("entsoe_total_load.csv");
    let raw = load_table(&bytes, "entsoe_total_load.csv", &LoadOptions::default())
        .expect("csv load failed");

    assert_eq!(raw.height(), 6);
    assert_eq!(
        raw.column_names(),
        vec![
            "Time (CET/CEST)",
            "Day-ahead Total Load Forecast [MW] - BZN|DE-LU",
            "Actual Total Load [MW] - BZN|DE-LU",
        ]
    );

    let actual = "Actual Total Load [MW] - BZN|DE-LU";
    assert_eq!(raw.cell(actual, 0), Some("40021"));
    assert_eq!(raw.cell(actual, 1), None, "n/e should load as missing");
    assert_eq!(raw.cell(actual, 3), None, "empty cell should load as missing");
    assert_eq!(raw.cell(actual, 4), Some("-"), "dash is not an NA token");
    assert_eq!(
        raw.cell("Time (CET/CEST)", 0),
        Some("01.01.2023 00:00 - 01.01.2023 00:15")
    );
}

#[test]
fn csv_delimiter_is_configurable() {
    let bytes = fixture("semicolon_generation.csv");
    let options = LoadOptions {
        delimiter: b';',
        ..LoadOptions::default()
    };
    let raw = load_table(&bytes, "semicolon_generation.csv", &options).expect("load");

    assert_eq!(raw.column_names(), vec!["MTU", "Solar [MW]", "Wind Onshore [MW]"]);
    assert_eq!(raw.cell("Wind Onshore [MW]", 0), None);
    assert_eq!(raw.cell("Solar [MW]", 2), None);
    assert_eq!(raw.cell("Wind Onshore [MW]", 1), Some("5123"));
}

#[test]
fn extension_match_is_case_insensitive() {
    let bytes = fixture("semicolon_generation.csv");
    let options = LoadOptions {
        delimiter: b';',
        ..LoadOptions::default()
    };
    assert!(load_table(&bytes, "EXPORT.CSV", &options).is_ok());
}

#[test]
fn rejects_unsupported_extensions() {
    let err = load_table(b"a,b\n1,2\n", "export.json", &LoadOptions::default())
        .expect_err("json should be rejected");
    match err {
        ParserError::UnsupportedFormat { file_name } => assert_eq!(file_name, "export.json"),
        other => panic!("unexpected error: {other}"),
    }

    let err = load_table(b"a,b\n1,2\n", "no_extension", &LoadOptions::default())
        .expect_err("missing extension should be rejected");
    assert!(matches!(err, ParserError::UnsupportedFormat { .. }));
}

#[test]
fn loads_first_worksheet_of_xlsx() {
    let bytes = fixture("entsoe_total_load.xlsx");
    let raw = load_table(&bytes, "entsoe_total_load.xlsx", &LoadOptions::default())
        .expect("xlsx load failed");

    assert_eq!(raw.height(), 2);
    assert_eq!(raw.column_names(), vec!["MTU", "Load", "Start"]);
    assert!(raw
        .df()
        .get_columns()
        .iter()
        .all(|column| column.dtype() == &DataType::String));
    assert_eq!(raw.cell("Load", 0), Some("10"), "whole floats render without a fraction");
    assert_eq!(raw.cell("Load", 1), None, "n/e should load as missing");
    assert_eq!(
        raw.cell("MTU", 1),
        Some("01.01.2023 00:15 - 01.01.2023 00:30")
    );
    assert_eq!(raw.cell("Start", 0), Some("01.01.2023 06:00"));
    assert_eq!(raw.cell("Start", 1), Some("01.01.2023 12:00"));
}

#[test]
fn spreadsheet_dates_follow_the_configured_format() {
    let bytes = fixture("entsoe_total_load.xlsx");
    let options = LoadOptions {
        datetime_format: "%Y-%m-%d %H:%M".to_string(),
        ..LoadOptions::default()
    };
    let raw = load_table(&bytes, "export.XLSX", &options).expect("xlsx load failed");
    assert_eq!(raw.cell("Start", 0), Some("2023-01-01 06:00"));
}

#[test]
fn header_only_workbook_is_empty_data() {
    let bytes = fixture("header_only.xlsx");
    let err = load_table(&bytes, "header_only.xlsx", &LoadOptions::default())
        .expect_err("no rows");
    assert!(matches!(err, ParserError::EmptyData { reader: "SPREADSHEET" }));
}

#[test]
fn corrupt_workbook_is_a_workbook_error() {
    let err = load_table(b"definitely not a zip", "broken.xlsx", &LoadOptions::default())
        .expect_err("corrupt workbook");
    assert!(matches!(err, ParserError::Workbook { reader: "SPREADSHEET", .. }));
}

#[test]
fn header_only_csv_is_empty_data() {
    let err = load_table(b"time,load\n", "empty.csv", &LoadOptions::default())
        .expect_err("no rows");
    assert!(matches!(err, ParserError::EmptyData { reader: "CSV" }));
}

#[test]
fn ragged_rows_are_rejected() {
    let err = load_table(
        b"time,load\n01.01.2023 00:00,1,9\n",
        "ragged.csv",
        &LoadOptions::default(),
    )
    .expect_err("ragged row");
    assert!(matches!(err, ParserError::Csv { reader: "CSV", .. }));
}

#[test]
fn blank_and_duplicate_headers_become_unique() {
    let bytes = fixture("messy_headers.csv");
    let raw = load_table(&bytes, "messy_headers.csv", &LoadOptions::default()).expect("load");
    assert_eq!(raw.column_names(), vec!["time", "load", "column_2", "load_1"]);
    assert_eq!(raw.cell("load_1", 0), Some("3"));
}

#[test]
fn byte_order_mark_is_stripped_from_first_header() {
    let bytes = fixture("bom_prices.csv");
    let raw = load_table(&bytes, "bom_prices.csv", &LoadOptions::default()).expect("load");
    assert_eq!(raw.column_names(), vec!["MTU", "Price"]);
    // Tokens are case-sensitive: "NaN" is left for numeric coercion to handle.
    assert_eq!(raw.cell("Price", 0), Some("NaN"));
}

#[test]
fn normalization_is_idempotent_and_clears_every_token() -> PolarsResult<()> {
    let df = df![
        "time" => [Some("na"), Some("01.01.2023 00:15"), Some("01.01.2023 00:30")],
        "load" => [Some("nan"), Some("n/e"), Some("12")],
        "flag" => [Some("no"), Some("NO"), None],
    ]?;
    let raw = RawTable::from_frame(df).expect("raw table");
    let tokens = SentinelTokens::default();

    let once = normalize_sentinels(&raw, &tokens).expect("normalize");
    let twice = normalize_sentinels(&once, &tokens).expect("normalize again");

    for column in once.df().get_columns() {
        for value in column.str()?.into_iter().flatten() {
            assert!(!tokens.contains(value), "token '{value}' survived");
        }
    }
    assert!(once.df().equals_missing(twice.df()));

    // The time column is normalized like any other column.
    assert_eq!(once.cell("time", 0), None);
    assert_eq!(once.cell("flag", 1), Some("NO"));
    assert_eq!(once.cell("load", 2), Some("12"));
    Ok(())
}

#[test]
fn custom_tokens_replace_defaults() -> PolarsResult<()> {
    let df = df!["load" => ["N.A.", "nan", "7"]]?;
    let raw = RawTable::from_frame(df).expect("raw table");
    let tokens = SentinelTokens::new(["N.A."]);

    let normalized = normalize_sentinels(&raw, &tokens).expect("normalize");
    assert_eq!(normalized.cell("load", 0), None);
    assert_eq!(normalized.cell("load", 1), Some("nan"));
    Ok(())
}

#[test]
fn raw_table_casts_numeric_columns_to_strings() -> PolarsResult<()> {
    let df = df![
        "time" => ["01.01.2023 00:00", "01.01.2023 00:15"],
        "load" => [10i64, 12],
    ]?;
    let raw = RawTable::from_frame(df).expect("raw table");
    assert_eq!(raw.df().column("load")?.dtype(), &DataType::String);
    assert_eq!(raw.cell("load", 1), Some("12"));
    Ok(())
}

#[test]
fn missing_counts_follow_column_order() {
    let bytes = fixture("entsoe_total_load.csv");
    let raw = load_table(&bytes, "entsoe_total_load.csv", &LoadOptions::default()).expect("load");
    let counts = missing_counts(raw.df());

    assert_eq!(counts.len(), 3);
    assert_eq!(counts[0], ("Time (CET/CEST)".to_string(), 0));
    assert_eq!(counts[1].1, 0);
    assert_eq!(counts[2], ("Actual Total Load [MW] - BZN|DE-LU".to_string(), 2));
}

struct FixedReader;

impl TableReader for FixedReader {
    fn name(&self) -> &'static str {
        "FIXED"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["tsv"]
    }

    fn read(&self, _bytes: &[u8], _options: &LoadOptions) -> Result<RawTable, ParserError> {
        let df = df!["MTU" => ["01.01.2023 00:00"], "Load" => ["n/e"]].map_err(|err| {
            ParserError::Validation {
                reader: self.name(),
                message: err.to_string(),
            }
        })?;
        RawTable::from_frame(df)
    }
}

#[test]
fn custom_readers_are_selected_by_extension_and_normalized() {
    let readers: [&dyn TableReader; 1] = [&FixedReader];
    let raw = load_with_readers(b"", "export.TSV", &LoadOptions::default(), &readers)
        .expect("custom reader");
    assert_eq!(raw.cell("Load", 0), None);

    let err = load_with_readers(b"", "export.csv", &LoadOptions::default(), &readers)
        .expect_err("csv reader not registered");
    assert!(matches!(err, ParserError::UnsupportedFormat { .. }));
}
