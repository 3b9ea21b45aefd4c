//! Weekly performance series ordered by calendar date.

use crate::aggregate::Aggregator;
use crate::format::{format_count, format_currency, format_roas, ValueFormat};
use crate::group::OrderedGroups;
use crate::ratios;
use crate::widgets::{peak, ChartPoint, ChartSpec, Icon, MetricCard, SectionHeading};
use chrono::{DateTime, NaiveDate};
use insights_core::Campaign;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekRow {
    /// Raw `week_start` key as reported.
    pub week_start: String,
    pub date: Option<NaiveDate>,
    /// Short axis label, e.g. `Jan 8`.
    pub label: String,
    pub spend: f64,
    pub revenue: f64,
    pub impressions: u64,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyMetrics {
    pub weeks: Vec<WeekRow>,
    pub revenue_by_week: Vec<ChartPoint>,
    pub spend_by_week: Vec<ChartPoint>,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub average_roas: f64,
    pub week_count: usize,
}

#[derive(Default)]
struct WeekAccumulator {
    spend: f64,
    revenue: f64,
    impressions: u64,
    clicks: u64,
}

/// Parse a week key as `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_week_start(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

pub fn week_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

impl WeeklyMetrics {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        let mut groups: OrderedGroups<String, WeekAccumulator> = OrderedGroups::new();
        for campaign in campaigns {
            for slice in &campaign.weekly_performance {
                let acc = groups.entry(&slice.week_start);
                acc.spend += slice.spend;
                acc.revenue += slice.revenue;
                acc.impressions += slice.impressions;
                acc.clicks += slice.clicks;
            }
        }

        let mut weeks: Vec<WeekRow> = groups
            .into_entries()
            .into_iter()
            .map(|(week_start, acc)| {
                let date = parse_week_start(&week_start);
                if date.is_none() {
                    debug!(week_start = %week_start, "unparseable week key, ordering last");
                }
                let label = date.map(week_label).unwrap_or_else(|| week_start.clone());
                WeekRow {
                    week_start,
                    date,
                    label,
                    spend: acc.spend,
                    revenue: acc.revenue,
                    impressions: acc.impressions,
                    clicks: acc.clicks,
                }
            })
            .collect();

        // Dated weeks ascending, then undated ones in encounter order.
        weeks.sort_by_key(|w| (w.date.is_none(), w.date));

        let total_spend: f64 = weeks.iter().map(|w| w.spend).sum();
        let total_revenue: f64 = weeks.iter().map(|w| w.revenue).sum();

        Self {
            revenue_by_week: weeks
                .iter()
                .map(|w| ChartPoint::new(w.label.clone(), w.revenue))
                .collect(),
            spend_by_week: weeks
                .iter()
                .map(|w| ChartPoint::new(w.label.clone(), w.spend))
                .collect(),
            total_spend,
            total_revenue,
            total_impressions: weeks.iter().map(|w| w.impressions).sum(),
            total_clicks: weeks.iter().map(|w| w.clicks).sum(),
            average_roas: ratios::roas(total_revenue, total_spend),
            week_count: weeks.len(),
            weeks,
        }
    }

    pub fn highest_revenue_week(&self) -> Option<&ChartPoint> {
        peak(&self.revenue_by_week)
    }

    pub fn highest_spend_week(&self) -> Option<&ChartPoint> {
        peak(&self.spend_by_week)
    }

    // ─── Presentation ───────────────────────────────────────────────────

    pub fn overview_title(&self) -> String {
        format!("Weekly Overview ({} weeks)", self.week_count)
    }

    pub fn overview_heading(&self) -> SectionHeading {
        SectionHeading::new(self.overview_title(), Icon::Calendar)
    }

    pub fn overview_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("Total Spend", format_currency(self.total_spend), Icon::DollarSign),
            MetricCard::new("Total Revenue", format_currency(self.total_revenue), Icon::TrendingUp),
            MetricCard::new("Average ROAS", format_roas(self.average_roas), Icon::Activity),
            MetricCard::new("Total Impressions", format_count(self.total_impressions), Icon::TrendingUp),
        ]
    }

    pub fn revenue_chart(&self) -> ChartSpec {
        let points = self
            .revenue_by_week
            .iter()
            .cloned()
            .map(|p| p.with_color("#10B981"))
            .collect();
        ChartSpec::line("Revenue by Week", points, ValueFormat::Currency).with_height(350)
    }

    pub fn spend_chart(&self) -> ChartSpec {
        let points = self
            .spend_by_week
            .iter()
            .cloned()
            .map(|p| p.with_color("#EF4444"))
            .collect();
        ChartSpec::line("Spend by Week", points, ValueFormat::Currency).with_height(350)
    }

    /// "Weekly Performance Insights" lines; empty when there are no weeks.
    pub fn insights(&self) -> Vec<(&'static str, String)> {
        let mut lines = Vec::new();
        if let Some(week) = self.highest_revenue_week() {
            lines.push(("Highest Revenue Week", week.label.clone()));
            lines.push(("Peak Revenue", format_currency(week.value)));
        }
        if let Some(week) = self.highest_spend_week() {
            lines.push(("Highest Spend Week", week.label.clone()));
            lines.push(("Peak Spend", format_currency(week.value)));
        }
        lines
    }
}

pub struct WeeklyAggregator;

impl Aggregator for WeeklyAggregator {
    type Params = ();
    type Output = WeeklyMetrics;

    const NAME: &'static str = "weekly";

    fn aggregate(campaigns: &[Campaign], _params: &()) -> WeeklyMetrics {
        WeeklyMetrics::from_campaigns(campaigns)
    }
}
