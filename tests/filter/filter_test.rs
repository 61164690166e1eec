use ga4_reports::filter::{
    all_of, any_of, combine, dimension, make_predicate, metric, parse_predicate, Condition,
    FilterNode, LogicalOperator, NumericOperation, Operator, StringMatch,
};
use ga4_reports::ReportError;
use serde_json::json;

fn page_view() -> FilterNode {
    make_predicate("eventName", Operator::EXACT, "page_view", true, false).unwrap()
}

#[test]
fn test_single_node_combine_is_identity() {
    let node = page_view();
    for op in [LogicalOperator::And, LogicalOperator::Or] {
        assert_eq!(combine(vec![node.clone()], op).unwrap(), node);
    }
}

#[test]
fn test_combine_empty_fails() {
    assert_eq!(all_of(vec![]).unwrap_err(), ReportError::EmptyInput);
    assert_eq!(any_of(vec![]).unwrap_err(), ReportError::EmptyInput);
}

#[test]
fn test_exact_rejected_for_metrics() {
    let err = make_predicate("sessions", Operator::EXACT, 5_i64, false, false).unwrap_err();
    assert!(matches!(
        err,
        ReportError::UnsupportedOperator { ref operator, .. } if operator == "EXACT"
    ));
}

#[test]
fn test_numeric_operator_rejected_for_dimensions() {
    let operator: Operator = "GREATER_THAN".parse().unwrap();
    let err = make_predicate("country", operator, "Japan", true, false).unwrap_err();
    assert!(matches!(err, ReportError::UnsupportedOperator { .. }));
}

#[test]
fn test_metric_value_must_be_numeric() {
    let err =
        make_predicate("sessions", Operator::GREATER_THAN, "lots", false, false).unwrap_err();
    assert_eq!(
        err,
        ReportError::InvalidFilterValue {
            field: "sessions".into(),
            value: "lots".into(),
        }
    );
}

#[test]
fn test_non_finite_metric_value_rejected() {
    for text in ["NaN", "inf", "-infinity"] {
        let err =
            make_predicate("sessions", Operator::GREATER_THAN, text, false, false).unwrap_err();
        assert_eq!(
            err,
            ReportError::InvalidFilterValue {
                field: "sessions".into(),
                value: text.into(),
            }
        );
    }

    assert!(make_predicate("sessions", Operator::EQUAL, f64::NAN, false, false).is_err());
    assert!(matches!(
        metric("bounceRate", NumericOperation::LessThan, f64::INFINITY),
        Err(ReportError::InvalidFilterValue { .. })
    ));
}

#[test]
fn test_metric_value_from_numeric_string() {
    let node = make_predicate("sessions", Operator::LESS_THAN, "12.5", false, false).unwrap();
    let predicate = node.as_predicate().unwrap();
    assert_eq!(
        predicate.condition,
        Condition::Numeric {
            operation: NumericOperation::LessThan,
            value: 12.5,
        }
    );
}

#[test]
fn test_dimension_value_coerced_to_text() {
    let node = make_predicate("year", Operator::EXACT, 2025_i64, true, false).unwrap();
    assert_eq!(
        serde_json::to_value(&node).unwrap(),
        json!({"filter": {
            "fieldName": "year",
            "stringFilter": {"matchType": "EXACT", "value": "2025", "caseSensitive": false}
        }})
    );
}

#[test]
fn test_negated_predicate_wire_shape() {
    let node =
        make_predicate("pagePath", Operator::CONTAINS, "/payment-method", true, true).unwrap();
    assert_eq!(
        serde_json::to_value(&node).unwrap(),
        json!({"notExpression": {"filter": {
            "fieldName": "pagePath",
            "stringFilter": {
                "matchType": "CONTAINS",
                "value": "/payment-method",
                "caseSensitive": false
            }
        }}})
    );
}

#[test]
fn test_nested_groups_are_preserved() {
    let inner = any_of(vec![
        dimension("country", StringMatch::Exact, "Japan").into(),
        dimension("country", StringMatch::Exact, "Brazil").into(),
    ])
    .unwrap();
    let outer = any_of(vec![inner, page_view()]).unwrap();

    assert_eq!(outer.children().len(), 2);
    assert_eq!(outer.predicate_count(), 3);
    assert_eq!(outer.depth(), 3);

    let value = serde_json::to_value(&outer).unwrap();
    let expressions = &value["orGroup"]["expressions"];
    assert!(expressions[0]["orGroup"]["expressions"].is_array());
    assert_eq!(expressions[1]["filter"]["fieldName"], "eventName");
}

#[test]
fn test_and_group_of_metric_filters() {
    let filter = all_of(vec![
        metric("sessions", NumericOperation::GreaterThan, 10.0).unwrap().into(),
        metric("bounceRate", NumericOperation::LessThan, 0.5).unwrap().into(),
    ])
    .unwrap();

    assert_eq!(
        serde_json::to_value(&filter).unwrap(),
        json!({"andGroup": {"expressions": [
            {"filter": {
                "fieldName": "sessions",
                "numericFilter": {"operation": "GREATER_THAN", "value": {"doubleValue": 10.0}}
            }},
            {"filter": {
                "fieldName": "bounceRate",
                "numericFilter": {"operation": "LESS_THAN", "value": {"doubleValue": 0.5}}
            }}
        ]}})
    );
}

#[test]
fn test_operator_names_are_case_insensitive() {
    let operator: Operator = "begins_with".parse().unwrap();
    let node = make_predicate("pageTitle", operator, "Shop", true, false).unwrap();
    assert_eq!(node.as_predicate().unwrap().operator(), Operator::BEGINS_WITH);
}

#[test]
fn test_parse_predicate_from_text() {
    let node = parse_predicate("!customEvent:event_label CONTAINS spring sale", true).unwrap();
    let predicate = node.as_predicate().unwrap();

    assert_eq!(predicate.field, "customEvent:event_label");
    assert!(predicate.negated);
    assert_eq!(
        predicate.condition,
        Condition::String {
            match_type: StringMatch::Contains,
            value: "spring sale".into(),
            case_sensitive: false,
        }
    );
}

#[test]
fn test_unknown_operator_name() {
    let err = "SOUNDS_LIKE".parse::<Operator>().unwrap_err();
    assert!(matches!(err, ReportError::UnsupportedOperator { .. }));
}

#[test]
fn test_parse_predicate_rejects_missing_value() {
    assert!(parse_predicate("country EXACT", true).is_err());
    assert!(parse_predicate("sessions EQUAL many", false).is_err());
}
