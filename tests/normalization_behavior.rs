//! Behavior-driven tests for series normalization and pivoting
//!
//! These tests verify HOW provider batches become chronological series and
//! how several series line up by period for tabular display.

use vecstat_core::{
    normalize, normalize_with_report, parse_response, pivot, NormalizedSeries, SeriesPoint,
    VectorId,
};

// =============================================================================
// Normalization: Ordering and Coercion
// =============================================================================

#[test]
fn when_provider_returns_newest_first_series_is_reversed_and_coerced() {
    // Given: A successful WDS entry with a numeric string and a null value
    let body = r#"[{"status": "SUCCESS", "object": {"vectorId": 1, "vectorDataPoint": [
        {"refPer": "2020", "value": "5"},
        {"refPer": "2021", "value": null}
    ]}}]"#;
    let results = parse_response(body).expect("body should parse");

    // When: The batch is normalized
    let series = normalize(&results);

    // Then: Order is reversed, null preserved and the string coerced
    assert_eq!(
        series,
        vec![NormalizedSeries::new(
            "v1",
            vec![SeriesPoint::new("2021", None), SeriesPoint::new("2020", Some(5.0))]
        )]
    );
}

#[test]
fn when_one_vector_fails_only_successful_series_are_returned() {
    // Given: A batch where the middle vector failed
    let body = r#"[
        {"status": "SUCCESS", "object": {"vectorId": 10, "vectorDataPoint": []}},
        {"status": "FAILED", "object": {"vectorId": 11}},
        {"status": "SUCCESS", "object": {"vectorId": 12, "vectorDataPoint": []}}
    ]"#;
    let results = parse_response(body).expect("body should parse");

    // When: The batch is normalized
    let series = normalize(&results);

    // Then: Output length equals the SUCCESS count and order is kept
    let labels: Vec<_> = series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["v10", "v12"]);

    // And: The report names the dropped vector
    let report = normalize_with_report(&results);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, Some(VectorId::new(11)));
    assert_eq!(report.failures[0].status, "FAILED");
}

#[test]
fn when_ref_per_raw_is_present_it_wins_over_ref_per() {
    // Given: Points carrying both period fields
    let body = r#"[{"status": "SUCCESS", "object": {"vectorId": 2, "productId": "36100434",
        "vectorDataPoint": [
            {"refPer": "2024-04-01", "refPerRaw": "2024-03-31", "value": 1},
            {"refPer": "2024-01-01", "value": 2},
            {"value": 3}
        ]}}]"#;

    // When: The batch is normalized
    let series = normalize(&parse_response(body).expect("body should parse"));

    // Then: refPerRaw is preferred, refPer is the fallback, empty is the last resort
    let periods: Vec<_> = series[0].table.iter().map(|p| p.ref_per.as_str()).collect();
    assert_eq!(periods, vec!["", "2024-01-01", "2024-03-31"]);
    assert_eq!(series[0].product_id.as_deref(), Some("36100434"));
}

#[test]
fn when_vector_id_is_missing_label_is_bare_marker() {
    // Given: A successful entry without a vectorId
    let body = r#"[{"status": "SUCCESS", "object": {"vectorDataPoint": []}}]"#;

    // When: The batch is normalized
    let series = normalize(&parse_response(body).expect("body should parse"));

    // Then: The label is just the marker, not an error
    assert_eq!(series[0].label, "v");
}

#[test]
fn when_point_list_is_null_series_keeps_label_and_product() {
    // Given: A successful entry whose vectorDataPoint is an explicit null
    let body = r#"[{"status": "SUCCESS", "object": {"vectorId": 123, "productId": "14100287",
        "vectorDataPoint": null}}]"#;

    // When: The batch is normalized
    let series = normalize(&parse_response(body).expect("body should parse"));

    // Then: The series is empty but still identified
    assert_eq!(
        series,
        vec![NormalizedSeries::new("v123", Vec::new()).with_product_id("14100287")]
    );
}

#[test]
fn when_one_point_is_malformed_the_good_points_survive() {
    // Given: A point list with a null element after a valid point
    let body = r#"[{"status": "SUCCESS", "object": {"vectorId": 5,
        "vectorDataPoint": [{"refPer": "2020", "value": 1}, null]}}]"#;

    // When: The batch is normalized
    let series = normalize(&parse_response(body).expect("body should parse"));

    // Then: The valid point and the label are kept
    assert_eq!(
        series,
        vec![NormalizedSeries::new("v5", vec![SeriesPoint::new("2020", Some(1.0))])]
    );
}

#[test]
fn when_an_entry_is_not_an_object_it_is_dropped_like_a_failure() {
    // Given: A batch with a stray string entry
    let body = r#"[
        {"status": "SUCCESS", "object": {"vectorId": 1, "vectorDataPoint": []}},
        "oops"
    ]"#;

    // When: The batch is parsed and normalized
    let results = parse_response(body).expect("a bad entry must not fail the batch");
    let report = normalize_with_report(&results);

    // Then: Only the good series remains and the stray entry is reported
    let labels: Vec<_> = report.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["v1"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, None);
}

#[test]
fn when_echoed_id_is_not_numeric_label_keeps_its_text() {
    // Given: The provider echoes a string identifier
    let body = r#"[{"status": "SUCCESS", "object": {"vectorId": "ABC", "vectorDataPoint": []}}]"#;

    // When: The batch is normalized
    let series = normalize(&parse_response(body).expect("body should parse"));

    // Then: The label is marker plus the echoed text
    assert_eq!(series[0].label, "vABC");
}

#[test]
fn normalized_series_serialize_to_the_endpoint_shape() {
    // Given: A normalized series
    let body = r#"[{"status": "SUCCESS", "object": {"vectorId": 7, "productId": 18100004,
        "vectorDataPoint": [{"refPer": "2024-02-01", "value": 160.6}]}}]"#;
    let series = normalize(&parse_response(body).expect("body should parse"));

    // When: It is serialized
    let json = serde_json::to_value(&series).expect("serialize");

    // Then: Field names match the JSON contract
    assert_eq!(
        json,
        serde_json::json!([{
            "label": "v7",
            "productId": "18100004",
            "table": [{"refPer": "2024-02-01", "value": 160.6}]
        }])
    );
}

// =============================================================================
// Pivot: Alignment by Period
// =============================================================================

fn series(label: &str, points: &[(&str, Option<f64>)]) -> NormalizedSeries {
    NormalizedSeries::new(
        label,
        points
            .iter()
            .map(|(ref_per, value)| SeriesPoint::new(*ref_per, *value))
            .collect(),
    )
}

#[test]
fn when_two_series_share_a_period_they_share_a_row() {
    // Given: Two series overlapping on 2021
    let input = vec![
        series("v1", &[("2020", Some(1.0)), ("2021", Some(2.0))]),
        series("v2", &[("2021", Some(3.0))]),
    ];

    // When: The series are pivoted
    let table = pivot(&input);

    // Then: 2021 holds both labels and 2020 lacks v2
    assert_eq!(table.headers(), ["refPer", "v1", "v2"]);
    assert_eq!(table.rows().len(), 2);
    let shared = table.row("2021").expect("shared row");
    assert_eq!(shared.cell("v1"), Some(Some(2.0)));
    assert_eq!(shared.cell("v2"), Some(Some(3.0)));
    assert!(!table.row("2020").expect("row").contains("v2"));
}

#[test]
fn rows_follow_first_encounter_order_across_series() {
    // Given: A second series introducing an earlier period
    let input = vec![
        series("v1", &[("2021", Some(1.0))]),
        series("v2", &[("2019", Some(2.0)), ("2021", Some(3.0))]),
    ];

    // When: The series are pivoted
    let table = pivot(&input);

    // Then: Rows keep the order they were first seen, not sorted order
    let periods: Vec<_> = table.rows().iter().map(|row| row.ref_per()).collect();
    assert_eq!(periods, vec!["2021", "2019"]);
}
