//! Integration tests for the analyst pipeline.
//!
//! These tests verify end-to-end behavior of the load → clean → filter →
//! chart/ask → export flow over small in-memory datasets.

use analyst_core::{
    AnalystSession, ChartRequest, ChartType, Channel, CleaningConfig, Encoding, LlmTransport,
    Mark, PromptGrounder, TableCleaner, TableExporter, TransportError, load_table,
};
use polars::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

const SALES_CSV: &[u8] = b"region,sales,margin\n\
West,10,0.1\n\
East,20,0.2\n\
West,10,0.1\n\
North,,0.3\n\
South,40,0.4\n";

fn sales_session() -> AnalystSession {
    AnalystSession::from_bytes(SALES_CSV).expect("sample CSV should load")
}

/// Transport stub returning a canned result.
struct StubTransport(Result<String, TransportError>);

impl LlmTransport for StubTransport {
    fn generate(&self, _prompt: &str) -> Result<String, TransportError> {
        self.0.clone()
    }

    fn name(&self) -> &str {
        "Stub"
    }
}

// ============================================================================
// Full Pipeline Flow
// ============================================================================

#[test]
fn test_load_clean_filter_chart_flow() {
    let mut session = sales_session();
    assert_eq!(session.table().height(), 5);

    // Clean: drop the missing-sales row and the duplicate West row
    session.clean(&CleaningConfig::default()).unwrap();
    assert_eq!(session.table().height(), 3);

    // Filter down to one region
    session.filter("region", "West").unwrap();
    assert_eq!(session.table().height(), 1);

    // Chart over the filtered table
    let spec = session
        .chart(&ChartRequest::with_y(ChartType::Bar, "region", "sales"))
        .unwrap();
    assert_eq!(spec.mark, Mark::Bar);
}

#[test]
fn test_cleaned_export_round_trips() {
    let mut session = sales_session();
    session.clean(&CleaningConfig::default()).unwrap();

    let exported = session.export().unwrap();
    assert_eq!(exported.file_name, "cleaned_data.csv");
    assert_eq!(exported.mime, "text/csv");

    let reloaded = load_table(&exported.bytes).unwrap();
    assert!(reloaded.equals(session.table()));
}

#[test]
fn test_malformed_upload_halts_before_cleaning() {
    let result = AnalystSession::from_bytes(b"\x00\x01\x02 not a table");
    if let Err(e) = result {
        assert_eq!(e.error_code(), "LOAD_ERROR");
        assert!(e.halts_run());
    }
}

// ============================================================================
// Stage Independence
// ============================================================================

#[test]
fn test_chart_and_ask_share_the_same_cleaned_table() {
    let mut session = sales_session();
    session.clean(&CleaningConfig::default()).unwrap();

    let spec = session
        .chart(&ChartRequest::with_y(ChartType::Waterfall, "region", "sales"))
        .unwrap();
    assert_eq!(
        spec.derived_columns.get("cumulative"),
        Some(&vec![10.0, 30.0, 70.0])
    );

    let transport = StubTransport(Ok("70".to_string()));
    let answer = session.ask("What is the total?", &transport);
    assert_eq!(answer, "70");

    // Neither path consumed or altered the table
    assert_eq!(session.table().height(), 3);
}

#[test]
fn test_cleaning_is_optional() {
    let session = sales_session();

    // Visualization on the raw table still works; the null row is the
    // renderer's concern, not a validation failure
    let spec = session
        .chart(&ChartRequest::new(ChartType::Histogram, "margin"))
        .unwrap();
    assert_eq!(
        spec.encodings.get(&Channel::X),
        Some(&Encoding::Binned("margin".to_string()))
    );
}

// ============================================================================
// Cleaning Properties
// ============================================================================

#[test]
fn test_clean_is_idempotent_over_csv_data() {
    let df = load_table(SALES_CSV).unwrap();
    let config = CleaningConfig::builder()
        .drop_missing(true)
        .drop_duplicate_rows(true)
        .fill_value("0")
        .build();

    let once = TableCleaner.clean(&df, &config).unwrap();
    let twice = TableCleaner.clean(&once, &config).unwrap();
    assert!(twice.equals_missing(&once));
}

#[test]
fn test_fill_without_drop_keeps_all_rows() {
    let df = load_table(SALES_CSV).unwrap();
    let config = CleaningConfig::builder()
        .drop_missing(false)
        .drop_duplicate_rows(false)
        .fill_value("0")
        .build();

    let cleaned = TableCleaner.clean(&df, &config).unwrap();
    assert_eq!(cleaned.height(), 5);
    assert_eq!(cleaned.column("sales").unwrap().null_count(), 0);
}

// ============================================================================
// Grounding Properties
// ============================================================================

#[test]
fn test_prompt_embeds_first_ten_rows_of_twenty() {
    let ids: Vec<i64> = (1..=20).collect();
    let names: Vec<String> = (1..=20).map(|i| format!("item{}", i)).collect();
    let df = df!["id" => ids, "name" => names].unwrap();

    let prompt = PromptGrounder::new().ground(&df, "What is the total?").unwrap();

    assert!(prompt.contains("item1"));
    assert!(prompt.contains("item10"));
    assert!(!prompt.contains("item11"));
    assert!(!prompt.contains("item20"));
}

#[test]
fn test_transport_failure_never_escapes_ask() {
    let session = sales_session();
    let transport = StubTransport(Err(TransportError::Status {
        code: 500,
        body: "internal error".to_string(),
    }));

    let answer = session.ask("What is the total?", &transport);
    assert!(answer.contains("500"));
    assert!(answer.contains("internal error"));

    // The session is still usable afterwards
    let exported = TableExporter.export(session.table()).unwrap();
    assert!(!exported.is_empty());
}
