//! Templates every registry starts with.

use super::ReportTemplate;

/// Channel grouping dimension used when the deployment does not name one.
pub const DEFAULT_CHANNEL_DIMENSION: &str = "sessionDefaultChannelGroup";

/// Daily users by marketing channel.
pub const DAILY_KPIS: &str = "daily_kpis";

/// Page views and engagement per page.
pub const PAGE_PERFORMANCE: &str = "page_performance";

/// Users per event and custom event labels, by channel.
pub const ECOMMERCE: &str = "ecommerce";

/// Build the built-in templates around the deployment's channel dimension.
pub fn builtin_templates(channel_dimension: &str) -> Vec<ReportTemplate> {
    vec![
        ReportTemplate::new(DAILY_KPIS, ["date", channel_dimension], ["totalUsers"]),
        ReportTemplate::new(
            PAGE_PERFORMANCE,
            ["pageTitle", "pagePath", "fullPageUrl"],
            [
                "screenPageViews",
                "averageSessionDuration",
                "bounceRate",
                "conversions",
            ],
        ),
        ReportTemplate::new(
            ECOMMERCE,
            [
                "date",
                channel_dimension,
                "eventName",
                "customEvent:event_category",
                "customEvent:event_action",
                "customEvent:event_label",
            ],
            ["totalUsers"],
        ),
    ]
}
