use chrono::NaiveDate;
use ga4_reports::filter::{all_of, make_predicate, Operator};
use ga4_reports::registry::ReportConfigRegistry;
use ga4_reports::request::{OrderSpec, TemplateQuery};
use insta::assert_snapshot;

#[test]
fn test_page_performance_request() {
    let registry = ReportConfigRegistry::with_builtin_templates("sessionDefaultChannelGroup");

    let dimension_filter = all_of(vec![
        make_predicate("pagePath", Operator::CONTAINS, "/payment-method", true, true).unwrap(),
        make_predicate("country", Operator::EXACT, "Japan", true, false).unwrap(),
    ])
    .unwrap();
    let metric_filter =
        make_predicate("screenPageViews", Operator::GREATER_THAN, 100.0, false, false).unwrap();

    let request = TemplateQuery::between("page_performance", "2025-02-01", "2025-02-28")
        .unwrap()
        .with_dimension_filter(dimension_filter)
        .with_metric_filter(metric_filter)
        .with_limit(500)
        .resolve(&registry)
        .unwrap()
        .with_order_by(OrderSpec::metric("screenPageViews").descending())
        .build_as_of(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
        .unwrap();

    assert_snapshot!(
        "page_performance_request",
        serde_json::to_string_pretty(&request).unwrap()
    );
}
