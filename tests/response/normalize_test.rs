use ga4_reports::field::FieldKind;
use ga4_reports::response::{normalize, RunReportResponse, Scalar};
use ga4_reports::ReportError;

const BODY: &str = r#"{
  "dimensionHeaders": [{"name": "country"}, {"name": "postalCode"}],
  "metricHeaders": [
    {"name": "sessions", "type": "TYPE_INTEGER"},
    {"name": "engagementRate", "type": "TYPE_FLOAT"}
  ],
  "rows": [
    {
      "dimensionValues": [{"value": "Japan"}, {"value": "01234"}],
      "metricValues": [{"value": "120"}, {"value": "0.61"}]
    },
    {
      "dimensionValues": [{"value": "Brazil"}, {"value": "98000"}],
      "metricValues": [{"value": "7"}, {"value": "1"}]
    }
  ],
  "rowCount": 42,
  "metadata": {"currencyCode": "USD", "timeZone": "Asia/Tokyo"},
  "kind": "analyticsData#runReport"
}"#;

#[test]
fn test_normalize_service_body() {
    let response: RunReportResponse = serde_json::from_str(BODY).unwrap();
    let table = normalize(&response).unwrap();

    assert_eq!(
        table.column_names(),
        ["country", "postalCode", "sessions", "engagementRate"]
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.total_rows(), Some(42));

    assert_eq!(table.get(0, "country"), Some(&Scalar::Text("Japan".into())));
    assert_eq!(table.get(0, "sessions"), Some(&Scalar::Integer(120)));
    assert_eq!(table.get(1, "engagementRate"), Some(&Scalar::Float(1.0)));
}

#[test]
fn test_dimension_values_stay_text() {
    let response: RunReportResponse = serde_json::from_str(BODY).unwrap();
    let table = normalize(&response).unwrap();

    assert_eq!(table.get(0, "postalCode"), Some(&Scalar::Text("01234".into())));
    assert_eq!(table.column("postalCode").unwrap().kind, FieldKind::Dimension);
    assert_eq!(table.column("sessions").unwrap().kind, FieldKind::Metric);
}

#[test]
fn test_non_numeric_metric_fails() {
    let response = RunReportResponse::from_parts(
        &["date"],
        &["sessions"],
        [
            (vec!["20250201"], vec!["10"]),
            (vec!["20250202"], vec!["11"]),
            (vec!["20250203"], vec!["N/A"]),
        ],
    );

    assert_eq!(
        normalize(&response).unwrap_err(),
        ReportError::NumericCoercion {
            column: "sessions".into(),
            row: 2,
            value: "N/A".into(),
        }
    );
}

#[test]
fn test_short_row_is_malformed() {
    let response = RunReportResponse::from_parts(
        &["country", "city"],
        &["sessions"],
        [(vec!["Japan"], vec!["3"])],
    );
    assert!(matches!(
        normalize(&response),
        Err(ReportError::MalformedResponse(_))
    ));
}

#[test]
fn test_extra_metric_value_is_malformed() {
    let response = RunReportResponse::from_parts(
        &["country"],
        &["sessions"],
        [(vec!["Japan"], vec!["3", "4"])],
    );
    assert!(matches!(
        normalize(&response),
        Err(ReportError::MalformedResponse(_))
    ));
}

#[test]
fn test_empty_report_keeps_columns() {
    let response: RunReportResponse = serde_json::from_str(
        r#"{"dimensionHeaders":[{"name":"date"}],"metricHeaders":[{"name":"sessions","type":"TYPE_INTEGER"}]}"#,
    )
    .unwrap();
    let table = normalize(&response).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.column_names(), ["date", "sessions"]);
    assert_eq!(table.column_values("sessions"), Some(vec![]));
}

#[test]
fn test_service_column_order_is_kept() {
    let response = RunReportResponse::from_parts(
        &["pagePath", "eventName"],
        &["totalUsers", "eventCount"],
        [(vec!["/", "page_view"], vec!["5", "9"])],
    );
    let table = normalize(&response).unwrap();

    assert_eq!(
        table.column_names(),
        ["pagePath", "eventName", "totalUsers", "eventCount"]
    );
    let cells: Vec<String> = table
        .ordered_row(0)
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(cells, ["/", "page_view", "5", "9"]);
}

#[test]
fn test_negative_and_exponent_values() {
    let response = RunReportResponse::from_parts(
        &["date"],
        &["delta", "ratio"],
        [
            (vec!["20250201"], vec!["-3", "1e-3"]),
            (vec!["20250202"], vec!["4", "2.5"]),
        ],
    );
    let table = normalize(&response).unwrap();

    assert_eq!(table.get(0, "delta"), Some(&Scalar::Integer(-3)));
    assert_eq!(table.get(0, "ratio"), Some(&Scalar::Float(0.001)));
}

#[test]
fn test_non_finite_metric_values_render_as_text() {
    let response = RunReportResponse::from_parts(
        &["date"],
        &["ratio"],
        [
            (vec!["20250201"], vec!["NaN"]),
            (vec!["20250202"], vec!["inf"]),
            (vec!["20250203"], vec!["0.5"]),
        ],
    );
    let table = normalize(&response).unwrap();
    assert!(table.get(0, "ratio").unwrap().as_f64().unwrap().is_nan());

    let records: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();
    assert_eq!(records[0]["ratio"], "NaN");
    assert_eq!(records[1]["ratio"], "inf");
    assert_eq!(records[2]["ratio"], 0.5);

    let csv = table.to_csv();
    assert!(csv.contains("20250201,NaN\n"));
    assert!(csv.contains("20250202,inf\n"));
}
