use ga4_reports::registry::{
    builtin_templates, ReportConfigRegistry, ReportTemplate, DAILY_KPIS, ECOMMERCE,
    PAGE_PERFORMANCE,
};
use ga4_reports::ReportError;
use std::sync::Arc;
use std::thread;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_merge_keeps_base_order_then_new_extras() {
    let registry = ReportConfigRegistry::new();
    registry.add("traffic", ["date", "country"], ["sessions"]);

    let (dimensions, metrics) = registry
        .resolve(
            "traffic",
            ["deviceCategory", "date", "city", "deviceCategory"],
            ["sessions", "totalUsers"],
        )
        .unwrap();

    assert_eq!(dimensions, strings(&["date", "country", "deviceCategory", "city"]));
    assert_eq!(metrics, strings(&["sessions", "totalUsers"]));
}

#[test]
fn test_resolve_does_not_mutate_template() {
    let registry = ReportConfigRegistry::new();
    registry.add("traffic", ["date"], ["sessions"]);

    registry.resolve("traffic", ["country"], ["totalUsers"]).unwrap();

    let template = registry.get("traffic").unwrap();
    assert_eq!(template.dimensions, strings(&["date"]));
    assert_eq!(template.metrics, strings(&["sessions"]));
}

#[test]
fn test_unknown_template() {
    let registry = ReportConfigRegistry::with_builtin_templates("sessionDefaultChannelGroup");
    let err = registry
        .resolve("weekly_revenue", Vec::<String>::new(), Vec::<String>::new())
        .unwrap_err();
    assert_eq!(err, ReportError::UnknownTemplate("weekly_revenue".into()));
}

#[test]
fn test_builtin_templates_use_channel_dimension() {
    let templates = builtin_templates("sessionPrimaryChannelGroup");
    let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, [DAILY_KPIS, PAGE_PERFORMANCE, ECOMMERCE]);

    let daily = &templates[0];
    assert_eq!(daily.dimensions, strings(&["date", "sessionPrimaryChannelGroup"]));
    assert_eq!(daily.metrics, strings(&["totalUsers"]));

    let ecommerce = &templates[2];
    assert!(ecommerce
        .dimensions
        .contains(&"customEvent:event_category".to_string()));
}

#[test]
fn test_add_replaces_without_error() {
    let registry = ReportConfigRegistry::with_builtin_templates("sessionDefaultChannelGroup");
    let before = registry.len();

    registry.add(PAGE_PERFORMANCE, ["pagePath"], ["screenPageViews"]);

    assert_eq!(registry.len(), before);
    assert_eq!(
        registry.get(PAGE_PERFORMANCE),
        Some(ReportTemplate::new(
            PAGE_PERFORMANCE,
            ["pagePath"],
            ["screenPageViews"]
        ))
    );
}

#[test]
fn test_names_are_sorted() {
    let registry = ReportConfigRegistry::with_templates([
        ReportTemplate::new("zeta", ["date"], ["sessions"]),
        ReportTemplate::new("alpha", ["date"], ["sessions"]),
    ]);
    assert_eq!(registry.names(), strings(&["alpha", "zeta"]));
    assert!(!registry.is_empty());
    assert!(registry.contains("zeta"));
}

#[test]
fn test_concurrent_add_and_resolve() {
    let registry = Arc::new(ReportConfigRegistry::new());
    registry.add("shared", ["date"], ["sessions"]);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..100 {
                    if i % 2 == 0 {
                        registry.add("shared", ["date"], ["sessions"]);
                    } else {
                        let (dimensions, metrics) = registry
                            .resolve("shared", ["country"], Vec::<String>::new())
                            .unwrap();
                        assert_eq!(dimensions, strings(&["date", "country"]));
                        assert_eq!(metrics, strings(&["sessions"]));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
