use chrono::NaiveDate;
use ga4_reports::filter::{make_predicate, Operator};
use ga4_reports::registry::ReportConfigRegistry;
use ga4_reports::request::{
    build_request, predefined_request, DateRange, DateSpec, OrderSpec, ReportQuery,
    TemplateQuery, DEFAULT_LIMIT,
};
use ga4_reports::ReportError;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_device_category_sessions_request_json() {
    let request = build_request(
        vec![DateRange::new("2025-02-25", "2025-02-28").unwrap()],
        strings(&["deviceCategory"]),
        strings(&["sessions"]),
        None,
        None,
        DEFAULT_LIMIT,
        0,
        vec![],
    )
    .unwrap();

    assert_eq!(
        serde_json::to_string(&request).unwrap(),
        r#"{"dateRanges":[{"startDate":"2025-02-25","endDate":"2025-02-28"}],"dimensions":[{"name":"deviceCategory"}],"metrics":[{"name":"sessions"}],"limit":10000,"offset":0}"#
    );
}

#[test]
fn test_no_fields_is_empty_query() {
    let err = build_request(
        vec![DateRange::new("2025-02-01", "2025-02-28").unwrap()],
        vec![],
        vec![],
        None,
        None,
        DEFAULT_LIMIT,
        0,
        vec![],
    )
    .unwrap_err();
    assert_eq!(err, ReportError::EmptyQuery);
}

#[test]
fn test_reversed_range_is_invalid() {
    let query = ReportQuery::between("2025-03-01", "2025-02-01")
        .unwrap()
        .with_metrics(["sessions"]);
    assert!(matches!(
        query.build_as_of(today()),
        Err(ReportError::InvalidDateRange(_))
    ));
}

#[test]
fn test_date_range_checked_before_fields() {
    let query = ReportQuery::between("2025-03-01", "2025-02-01").unwrap();
    assert!(matches!(
        query.build_as_of(today()),
        Err(ReportError::InvalidDateRange(_))
    ));
}

#[test]
fn test_same_day_range_is_valid() {
    let query = ReportQuery::between("2025-02-01", "2025-02-01")
        .unwrap()
        .with_metrics(["sessions"]);
    assert!(query.build_as_of(today()).is_ok());
}

#[test]
fn test_relative_dates_are_sent_verbatim() {
    let request = ReportQuery::between("7daysAgo", "yesterday")
        .unwrap()
        .with_metrics(["sessions"])
        .build_as_of(today())
        .unwrap();

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["dateRanges"][0]["startDate"], "7daysAgo");
    assert_eq!(value["dateRanges"][0]["endDate"], "yesterday");
}

#[test]
fn test_relative_range_ordering_uses_today() {
    let query = ReportQuery::between("yesterday", "30daysAgo")
        .unwrap()
        .with_metrics(["sessions"]);
    assert!(matches!(
        query.build_as_of(today()),
        Err(ReportError::InvalidDateRange(_))
    ));

    let start: DateSpec = "3daysAgo".parse().unwrap();
    assert_eq!(
        start.resolve(today()),
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    );
}

#[test]
fn test_bad_date_text() {
    assert!(matches!(
        DateRange::new("2025-13-01", "2025-12-31"),
        Err(ReportError::InvalidDateRange(_))
    ));
    assert!(matches!(
        DateRange::new("lastweek", "today"),
        Err(ReportError::InvalidDateRange(_))
    ));
}

#[test]
fn test_zero_limit() {
    let query = ReportQuery::between("2025-02-01", "2025-02-28")
        .unwrap()
        .with_dimensions(["country"])
        .with_limit(0);
    assert_eq!(query.build_as_of(today()).unwrap_err(), ReportError::InvalidLimit(0));
}

#[test]
fn test_paging_and_ordering_on_the_wire() {
    let request = ReportQuery::between("2025-02-01", "2025-02-28")
        .unwrap()
        .with_dimensions(["country"])
        .with_metrics(["sessions"])
        .with_limit(25)
        .with_offset(50)
        .with_order_by(OrderSpec::metric("sessions").descending())
        .keep_empty_rows(true)
        .with_currency_code("EUR")
        .build_as_of(today())
        .unwrap();

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["limit"], 25);
    assert_eq!(value["offset"], 50);
    assert_eq!(value["orderBys"][0]["metric"]["metricName"], "sessions");
    assert_eq!(value["orderBys"][0]["desc"], true);
    assert_eq!(value["keepEmptyRows"], true);
    assert_eq!(value["currencyCode"], "EUR");
}

#[test]
fn test_multiple_named_date_ranges() {
    let january = DateRange::new("2025-01-01", "2025-01-31").unwrap().with_name("jan");
    let february = DateRange::new("2025-02-01", "2025-02-28").unwrap().with_name("feb");
    let request = ReportQuery::new(january)
        .with_date_range(february)
        .with_metrics(["sessions"])
        .build_as_of(today())
        .unwrap();

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["dateRanges"][0]["name"], "jan");
    assert_eq!(value["dateRanges"][1]["name"], "feb");
}

#[test]
fn test_predefined_request_merges_template() {
    let registry = ReportConfigRegistry::with_builtin_templates("sessionDefaultChannelGroup");
    let query = TemplateQuery::between("daily_kpis", "2025-02-01", "2025-02-28")
        .unwrap()
        .with_extra_dimensions(["country", "date"])
        .with_extra_metrics(["sessions"])
        .with_dimension_filter(
            make_predicate("country", Operator::EXACT, "Japan", true, false).unwrap(),
        )
        .with_limit(100);

    let request = predefined_request(&registry, query).unwrap();

    assert_eq!(
        request.dimensions,
        strings(&["date", "sessionDefaultChannelGroup", "country"])
    );
    assert_eq!(request.metrics, strings(&["totalUsers", "sessions"]));
    assert_eq!(request.limit, 100);
    assert_eq!(request.date_ranges.len(), 1);
    assert!(request.dimension_filter.is_some());
    assert!(request.metric_filter.is_none());
}

#[test]
fn test_predefined_request_unknown_template() {
    let registry = ReportConfigRegistry::new();
    let query = TemplateQuery::between("missing", "2025-02-01", "2025-02-28").unwrap();
    assert_eq!(
        predefined_request(&registry, query).unwrap_err(),
        ReportError::UnknownTemplate("missing".into())
    );
}
