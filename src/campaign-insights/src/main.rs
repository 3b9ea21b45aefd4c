//! Campaign Insights: terminal dashboards for marketing campaign
//! performance.
//!
//! Loads configuration, fetches the marketing dataset once and renders the
//! requested view as text or JSON.

mod render;

use clap::{Parser, Subcommand};
use insights_core::config::AppConfig;
use insights_core::types::RegionMetric;
use insights_reporting::{
    DashboardView, DemographicAggregator, DeviceAggregator, LoadState, RegionalAggregator,
    WeeklyAggregator, DEMOGRAPHIC_TITLE, DEVICE_TITLE, REGIONAL_TITLE, WEEKLY_TITLE,
};
use render::Report;
use serde_json::json;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-insights")]
#[command(about = "Demographic, device, regional and weekly campaign performance")]
#[command(version)]
struct Cli {
    /// Dataset file path or http(s) URL (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHTS__SOURCE__LOCATION")]
    source: Option<String>,

    /// Fetch timeout in milliseconds (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHTS__SOURCE__TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Emit aggregates as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log as JSON lines on stderr
    #[arg(long, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    view: View,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum View {
    /// Gender totals and age-group breakdowns
    Demographic,
    /// Mobile, Desktop and Tablet performance
    Device,
    /// Per-region performance and bubble map
    Regional {
        /// Metric plotted on the bubble map (defaults to config)
        #[arg(long)]
        metric: Option<RegionMetric>,
    },
    /// Revenue and spend by week
    Weekly,
    /// Every view in turn
    All {
        #[arg(long)]
        metric: Option<RegionMetric>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load();
    let log_json = cli.log_json || loaded.as_ref().is_ok_and(|c| c.log.json);
    init_tracing(log_json);

    let mut config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(source) = cli.source {
        config.source.location = source;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.source.timeout_ms = timeout_ms;
    }

    info!(
        source = %config.source.location,
        timeout_ms = config.source.timeout_ms,
        view = ?cli.view,
        "Configuration loaded"
    );

    let state = match insights_source::from_config(&config.source) {
        Ok(source) => match insights_source::load_dataset(source.as_ref()).await {
            Ok(dataset) => LoadState::Loaded(dataset),
            Err(e) => LoadState::Failed(e.user_message()),
        },
        Err(e) => LoadState::Failed(e.user_message()),
    };

    let default_metric = config.reporting.default_region_metric;
    let output = match cli.view {
        View::Demographic => demographic(&state, cli.json),
        View::Device => device(&state, cli.json),
        View::Regional { metric } => regional(&state, metric.unwrap_or(default_metric), cli.json),
        View::Weekly => weekly(&state, cli.json),
        View::All { metric } => all(&state, metric.unwrap_or(default_metric), cli.json),
    }?;

    match output {
        Rendered::Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Rendered::Failed(banner) => {
            eprintln!("{banner}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "campaign_insights=info,insights_source=info,insights_reporting=info".into()
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

enum Rendered {
    Ok(String),
    Failed(String),
}

/// Render one view: `Failed` carries the error banner, otherwise text or
/// pretty JSON of the aggregate.
fn present<A, F>(
    view: &DashboardView<A>,
    params: &A::Params,
    as_json: bool,
    text: F,
) -> anyhow::Result<Rendered>
where
    A: insights_reporting::Aggregator,
    A::Output: serde::Serialize,
    F: FnOnce(&mut Report, &A::Output),
{
    let Some(metrics) = view.metrics(params) else {
        return Ok(Rendered::Failed(view.headline()));
    };
    if as_json {
        return Ok(Rendered::Ok(serde_json::to_string_pretty(&metrics)?));
    }
    let mut report = Report::new();
    report.banner(&view.headline());
    text(&mut report, &metrics);
    Ok(Rendered::Ok(report.finish()))
}

fn loaded_view<A: insights_reporting::Aggregator>(title: &'static str, state: &LoadState) -> DashboardView<A> {
    let mut view = DashboardView::new(title);
    view.set_state(state.clone());
    view
}

fn demographic(state: &LoadState, as_json: bool) -> anyhow::Result<Rendered> {
    let view = loaded_view::<DemographicAggregator>(DEMOGRAPHIC_TITLE, state);
    present(&view, &(), as_json, render::demographic)
}

fn device(state: &LoadState, as_json: bool) -> anyhow::Result<Rendered> {
    let view = loaded_view::<DeviceAggregator>(DEVICE_TITLE, state);
    present(&view, &(), as_json, render::device)
}

fn regional(state: &LoadState, metric: RegionMetric, as_json: bool) -> anyhow::Result<Rendered> {
    let view = loaded_view::<RegionalAggregator>(REGIONAL_TITLE, state);
    if as_json {
        let Some(metrics) = view.metrics(&metric) else {
            return Ok(Rendered::Failed(view.headline()));
        };
        let body = json!({ "metrics": metrics, "bubble_map": metrics.bubble_map() });
        return Ok(Rendered::Ok(serde_json::to_string_pretty(&body)?));
    }
    present(&view, &metric, false, render::regional)
}

fn weekly(state: &LoadState, as_json: bool) -> anyhow::Result<Rendered> {
    let view = loaded_view::<WeeklyAggregator>(WEEKLY_TITLE, state);
    present(&view, &(), as_json, render::weekly)
}

fn all(state: &LoadState, metric: RegionMetric, as_json: bool) -> anyhow::Result<Rendered> {
    if as_json {
        let demographic = loaded_view::<DemographicAggregator>(DEMOGRAPHIC_TITLE, state);
        let device = loaded_view::<DeviceAggregator>(DEVICE_TITLE, state);
        let regional = loaded_view::<RegionalAggregator>(REGIONAL_TITLE, state);
        let weekly = loaded_view::<WeeklyAggregator>(WEEKLY_TITLE, state);
        let (Some(d), Some(v), Some(r), Some(w)) = (
            demographic.metrics(&()),
            device.metrics(&()),
            regional.metrics(&metric),
            weekly.metrics(&()),
        ) else {
            return Ok(Rendered::Failed(demographic.headline()));
        };
        let body = json!({ "demographic": d, "device": v, "regional": r, "weekly": w });
        return Ok(Rendered::Ok(serde_json::to_string_pretty(&body)?));
    }

    let mut sections = Vec::new();
    for rendered in [
        demographic(state, false)?,
        device(state, false)?,
        regional(state, metric, false)?,
        weekly(state, false)?,
    ] {
        match rendered {
            Rendered::Ok(text) => sections.push(text),
            failed @ Rendered::Failed(_) => return Ok(failed),
        }
    }
    Ok(Rendered::Ok(sections.join("\n\n")))
}
