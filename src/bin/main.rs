//! ga4-reports CLI - Run analytics reports from the command line
//!
//! Usage:
//!   ga4-reports templates
//!   ga4-reports request --metric sessions --dimension deviceCategory
//!   ga4-reports run --start 2025-02-01 --end 2025-02-28 -d country -m sessions
//!   ga4-reports template page_performance --filter '!pagePath CONTAINS /payment'
//!
//! Filters are written `[!]<field> <OPERATOR> <value>`; repeated filters are
//! AND-combined. Order specs are `<field> [asc|desc]`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use ga4_reports::config::Settings;
use ga4_reports::filter::{all_of, parse_predicate, FilterNode};
use ga4_reports::logging::{init_logging, LoggingConfig};
use ga4_reports::request::{DateRange, OrderSpec, ReportQuery, TemplateQuery};
use ga4_reports::{ReportResult, ReportTable, Reports};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "ga4-reports")]
#[command(about = "Run Google Analytics 4 reports and print them as tables")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $GA4_REPORTS_CONFIG, ./ga4.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered report templates
    Templates,

    /// Print the assembled request without sending it
    Request {
        /// Start from a registered template
        #[arg(short, long)]
        template: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Run an ad-hoc report
    Run {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Run a registered template, optionally with extra fields
    Template {
        /// Template name
        name: String,

        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Start date (YYYY-MM-DD, today, yesterday, NdaysAgo)
    #[arg(long, default_value = "7daysAgo")]
    start: String,

    /// End date
    #[arg(long, default_value = "yesterday")]
    end: String,

    /// Dimension to include (repeatable)
    #[arg(short, long = "dimension")]
    dimensions: Vec<String>,

    /// Metric to include (repeatable)
    #[arg(short, long = "metric")]
    metrics: Vec<String>,

    /// Dimension filter, e.g. "country EXACT Japan" (repeatable)
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Metric filter, e.g. "sessions GREATER_THAN 10" (repeatable)
    #[arg(long = "metric-filter")]
    metric_filters: Vec<String>,

    /// Ordering, e.g. "sessions desc" (repeatable)
    #[arg(long = "order-by")]
    order_by: Vec<String>,

    /// Maximum rows (defaults to reports.default_limit)
    #[arg(long)]
    limit: Option<u64>,

    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    offset: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON array of row objects
    Json,
    /// Comma-separated values
    Csv,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let logging = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    };
    if let Err(e) = init_logging(logging.with_json_format(cli.json_logs)) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Templates => cmd_templates(&settings, cli.output),
        Commands::Request { template, query } => cmd_request(&settings, template, query),
        Commands::Run { query } => cmd_run(&settings, None, query, cli.output).await,
        Commands::Template { name, query } => {
            cmd_run(&settings, Some(name), query, cli.output).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_templates(settings: &Settings, output: OutputFormat) -> CliResult {
    let templates = settings.registry().templates();

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&templates)?);
        }
        OutputFormat::Csv => {
            println!("name,kind,field");
            for template in &templates {
                for dimension in &template.dimensions {
                    println!("{},dimension,{}", template.name, dimension);
                }
                for metric in &template.metrics {
                    println!("{},metric,{}", template.name, metric);
                }
            }
        }
        OutputFormat::Table => {
            for template in &templates {
                println!("{}", template.name);
                println!("  dimensions: {}", template.dimensions.join(", "));
                println!("  metrics:    {}", template.metrics.join(", "));
            }
        }
    }
    Ok(())
}

fn cmd_request(settings: &Settings, template: Option<String>, args: QueryArgs) -> CliResult {
    let registry = settings.registry();
    let query = match template {
        Some(name) => template_query(settings, name, &args)?.resolve(&registry)?,
        None => ad_hoc_query(settings, &args)?,
    };
    let request = with_paging(query, &args)?.build()?;

    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

async fn cmd_run(
    settings: &Settings,
    template: Option<String>,
    args: QueryArgs,
    output: OutputFormat,
) -> CliResult {
    let reports = Reports::connect(settings)?;

    let query = match template {
        Some(name) => template_query(settings, name, &args)?.resolve(reports.registry())?,
        None => ad_hoc_query(settings, &args)?,
    };
    let table = reports.run_report(with_paging(query, &args)?).await?;

    print_table(&table, output)
}

fn print_table(table: &ReportTable, output: OutputFormat) -> CliResult {
    match output {
        OutputFormat::Table => {
            print!("{}", table.to_text());
            match table.total_rows() {
                Some(total) => println!("({} of {} rows)", table.len(), total),
                None => println!("({} rows)", table.len()),
            }
        }
        OutputFormat::Json => println!("{}", table.to_json()?),
        OutputFormat::Csv => print!("{}", table.to_csv()),
    }
    Ok(())
}

// ============================================================================
// Argument conversion
// ============================================================================

fn ad_hoc_query(settings: &Settings, args: &QueryArgs) -> ReportResult<ReportQuery> {
    let mut query = ReportQuery::new(DateRange::new(&args.start, &args.end)?)
        .with_dimensions(&args.dimensions)
        .with_metrics(&args.metrics)
        .with_limit(args.limit.unwrap_or(settings.reports.default_limit));

    if let Some(filter) = parse_filters(&args.filters, true)? {
        query = query.with_dimension_filter(filter);
    }
    if let Some(filter) = parse_filters(&args.metric_filters, false)? {
        query = query.with_metric_filter(filter);
    }
    Ok(query)
}

fn template_query(
    settings: &Settings,
    name: String,
    args: &QueryArgs,
) -> ReportResult<TemplateQuery> {
    let mut query = TemplateQuery::new(name, DateRange::new(&args.start, &args.end)?)
        .with_extra_dimensions(&args.dimensions)
        .with_extra_metrics(&args.metrics)
        .with_limit(args.limit.unwrap_or(settings.reports.default_limit));

    if let Some(filter) = parse_filters(&args.filters, true)? {
        query = query.with_dimension_filter(filter);
    }
    if let Some(filter) = parse_filters(&args.metric_filters, false)? {
        query = query.with_metric_filter(filter);
    }
    Ok(query)
}

/// Offset and ordering apply to both ad-hoc and template queries.
fn with_paging(query: ReportQuery, args: &QueryArgs) -> ReportResult<ReportQuery> {
    let metrics = query.metrics.clone();
    let mut query = query.with_offset(args.offset);
    for text in &args.order_by {
        query = query.with_order_by(OrderSpec::parse(text, &metrics)?);
    }
    Ok(query)
}

fn parse_filters(specs: &[String], is_dimension: bool) -> ReportResult<Option<FilterNode>> {
    if specs.is_empty() {
        return Ok(None);
    }
    let nodes = specs
        .iter()
        .map(|spec| parse_predicate(spec, is_dimension))
        .collect::<ReportResult<Vec<_>>>()?;
    all_of(nodes).map(Some)
}

