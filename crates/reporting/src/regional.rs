//! Regional performance, grouped by region label across every campaign.
//!
//! Region labels are treated as globally unique. When the same label shows
//! up under two countries the rows still merge (first-seen country wins),
//! but each clash is logged and reported in [`RegionalMetrics::conflicts`].

use crate::aggregate::Aggregator;
use crate::format::{format_count, format_currency, ValueFormat};
use crate::group::OrderedGroups;
use crate::ratios;
use crate::widgets::{
    CellValue, ChartPoint, ChartSpec, Column, Icon, MetricCard, SectionHeading, SortSpec, TableRow,
    TableSpec,
};
use insights_core::types::RegionMetric;
use insights_core::Campaign;
use serde::Serialize;
use tracing::warn;

/// Regions shown in the revenue bar chart.
pub const TOP_REGION_LIMIT: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRow {
    pub region: String,
    pub country: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
    /// The selected metric's figure, plotted on the bubble map.
    pub value: f64,
    pub ctr: f64,
    pub conversion_rate: f64,
    pub roas: f64,
    pub cpc: f64,
}

impl RegionRow {
    pub fn metric(&self, metric: RegionMetric) -> f64 {
        match metric {
            RegionMetric::Revenue => self.revenue,
            RegionMetric::Spend => self.spend,
            RegionMetric::Impressions => self.impressions as f64,
            RegionMetric::Clicks => self.clicks as f64,
            RegionMetric::Conversions => self.conversions as f64,
        }
    }
}

/// A region label reported under a second country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionConflict {
    pub region: String,
    pub kept_country: String,
    pub conflicting_country: String,
    pub campaign: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RegionalTotals {
    pub spend: f64,
    pub revenue: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalMetrics {
    pub metric: RegionMetric,
    /// Every region in first-encounter order.
    pub regions: Vec<RegionRow>,
    pub top_regions: Vec<RegionRow>,
    pub totals: RegionalTotals,
    pub region_count: usize,
    pub conflicts: Vec<RegionConflict>,
}

#[derive(Default)]
struct RegionAccumulator {
    country: String,
    impressions: u64,
    clicks: u64,
    conversions: u64,
    spend: f64,
    revenue: f64,
}

impl RegionalMetrics {
    pub fn from_campaigns(campaigns: &[Campaign], metric: RegionMetric) -> Self {
        let mut groups: OrderedGroups<String, RegionAccumulator> = OrderedGroups::new();
        let mut conflicts = Vec::new();

        for campaign in campaigns {
            for slice in &campaign.regional_performance {
                let acc = groups.entry_with(&slice.region, || RegionAccumulator {
                    country: slice.country.clone(),
                    ..Default::default()
                });

                if acc.country != slice.country {
                    warn!(
                        region = %slice.region,
                        kept = %acc.country,
                        conflicting = %slice.country,
                        campaign = %campaign.name,
                        "region label reported under more than one country, merging"
                    );
                    conflicts.push(RegionConflict {
                        region: slice.region.clone(),
                        kept_country: acc.country.clone(),
                        conflicting_country: slice.country.clone(),
                        campaign: campaign.name.clone(),
                    });
                }

                acc.impressions += slice.impressions;
                acc.clicks += slice.clicks;
                acc.conversions += slice.conversions;
                acc.spend += slice.spend;
                acc.revenue += slice.revenue;
            }
        }

        let regions: Vec<RegionRow> = groups
            .into_entries()
            .into_iter()
            .map(|(region, acc)| {
                let mut row = RegionRow {
                    region,
                    country: acc.country,
                    impressions: acc.impressions,
                    clicks: acc.clicks,
                    conversions: acc.conversions,
                    spend: acc.spend,
                    revenue: acc.revenue,
                    value: 0.0,
                    ctr: ratios::ctr(acc.clicks, acc.impressions),
                    conversion_rate: ratios::conversion_rate(acc.conversions, acc.clicks),
                    roas: ratios::roas(acc.revenue, acc.spend),
                    cpc: ratios::cpc(acc.spend, acc.clicks),
                };
                row.value = row.metric(metric);
                row
            })
            .collect();

        let totals = RegionalTotals {
            spend: regions.iter().map(|r| r.spend).sum(),
            revenue: regions.iter().map(|r| r.revenue).sum(),
            impressions: regions.iter().map(|r| r.impressions).sum(),
            clicks: regions.iter().map(|r| r.clicks).sum(),
            conversions: regions.iter().map(|r| r.conversions).sum(),
        };

        let top_regions = top_by_revenue(&regions);

        Self {
            metric,
            region_count: regions.len(),
            regions,
            top_regions,
            totals,
            conflicts,
        }
    }

    /// Re-project `value` onto another metric without re-grouping.
    pub fn with_metric(&self, metric: RegionMetric) -> Self {
        let mut projected = self.clone();
        projected.metric = metric;
        for row in projected.regions.iter_mut().chain(projected.top_regions.iter_mut()) {
            row.value = row.metric(metric);
        }
        projected
    }

    pub fn region(&self, name: &str) -> Option<&RegionRow> {
        self.regions.iter().find(|r| r.region == name)
    }

    /// Formatter for the selected metric: currency for dollars, grouped
    /// counts otherwise.
    pub fn format_value(&self, value: f64) -> String {
        metric_format(self.metric).apply(value)
    }

    // ─── Presentation ───────────────────────────────────────────────────

    pub fn overview_title(&self) -> String {
        format!("Regional Overview ({} regions)", self.region_count)
    }

    pub fn overview_heading(&self) -> SectionHeading {
        SectionHeading::new(self.overview_title(), Icon::MapPin)
    }

    pub fn overview_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("Total Revenue", format_currency(self.totals.revenue), Icon::TrendingUp),
            MetricCard::new("Total Spend", format_currency(self.totals.spend), Icon::DollarSign),
            MetricCard::new("Total Impressions", format_count(self.totals.impressions), Icon::Users),
            MetricCard::new("Total Conversions", format_count(self.totals.conversions), Icon::Target),
        ]
    }

    pub fn map_title(&self) -> String {
        format!("Regional {} Distribution", self.metric.label())
    }

    pub fn top_regions_chart(&self) -> ChartSpec {
        let points = self
            .top_regions
            .iter()
            .map(|r| ChartPoint::new(r.region.clone(), r.revenue).with_color("#10B981"))
            .collect();
        ChartSpec::bar("Top Regions by Revenue", points, ValueFormat::Currency).with_height(350)
    }

    pub fn table() -> TableSpec {
        TableSpec {
            title: "Detailed Regional Performance".to_string(),
            columns: vec![
                Column::text("region", "Region", "15%"),
                Column::numeric("impressions", "Impressions", "12%", ValueFormat::Whole),
                Column::numeric("clicks", "Clicks", "10%", ValueFormat::Whole),
                Column::numeric("conversions", "Conversions", "10%", ValueFormat::Whole),
                Column::numeric("spend", "Spend", "12%", ValueFormat::Currency),
                Column::numeric("revenue", "Revenue", "12%", ValueFormat::Currency),
                Column::numeric("ctr", "CTR", "10%", ValueFormat::Percent),
                Column::numeric("conversion_rate", "Conv. Rate", "10%", ValueFormat::Percent),
                Column::numeric("roas", "ROAS", "9%", ValueFormat::Roas),
            ],
            default_sort: SortSpec::desc("revenue"),
            empty_message: "No regional data available",
        }
    }
}

pub(crate) fn metric_format(metric: RegionMetric) -> ValueFormat {
    if metric.is_currency() {
        ValueFormat::Currency
    } else {
        ValueFormat::Number
    }
}

// Vec::sort_by is stable, so equal revenue keeps encounter order.
fn top_by_revenue(regions: &[RegionRow]) -> Vec<RegionRow> {
    let mut sorted = regions.to_vec();
    sorted.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    sorted.truncate(TOP_REGION_LIMIT);
    sorted
}

impl TableRow for RegionRow {
    fn cell(&self, key: &str) -> Option<CellValue> {
        let value = match key {
            "region" => return Some(CellValue::Text(self.region.clone())),
            "country" => return Some(CellValue::Text(self.country.clone())),
            "impressions" => self.impressions as f64,
            "clicks" => self.clicks as f64,
            "conversions" => self.conversions as f64,
            "spend" => self.spend,
            "revenue" => self.revenue,
            "value" => self.value,
            "ctr" => self.ctr,
            "conversion_rate" => self.conversion_rate,
            "roas" => self.roas,
            "cpc" => self.cpc,
            _ => return None,
        };
        Some(CellValue::Number(value))
    }
}

pub struct RegionalAggregator;

impl Aggregator for RegionalAggregator {
    type Params = RegionMetric;
    type Output = RegionalMetrics;

    const NAME: &'static str = "regional";

    fn aggregate(campaigns: &[Campaign], metric: &RegionMetric) -> RegionalMetrics {
        RegionalMetrics::from_campaigns(campaigns, *metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::types::RegionSlice;

    fn slice(region: &str, country: &str, impressions: u64, clicks: u64, spend: f64, revenue: f64) -> RegionSlice {
        RegionSlice {
            region: region.into(),
            country: country.into(),
            impressions,
            clicks,
            conversions: clicks / 10,
            spend,
            revenue,
        }
    }

    fn campaign(name: &str, slices: Vec<RegionSlice>) -> Campaign {
        Campaign {
            name: name.into(),
            regional_performance: slices,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_region_sums_across_campaigns() {
        let campaigns = vec![
            campaign("A", vec![slice("Dubai", "UAE", 1000, 20, 50.0, 100.0)]),
            campaign("B", vec![slice("Dubai", "UAE", 3000, 40, 50.0, 150.0)]),
        ];
        let metrics = RegionalMetrics::from_campaigns(&campaigns, RegionMetric::Revenue);
        assert_eq!(metrics.region_count, 1);
        let dubai = metrics.region("Dubai").unwrap();
        assert!((dubai.revenue - 250.0).abs() < 1e-9);
        assert!((dubai.value - 250.0).abs() < 1e-9);
        assert!((dubai.roas - 2.5).abs() < 1e-9);
        assert!((dubai.cpc - 100.0 / 60.0).abs() < 1e-9);
        assert!((dubai.ctr - 1.5).abs() < 1e-9);

        let by_impressions = RegionalMetrics::from_campaigns(&campaigns, RegionMetric::Impressions);
        assert_eq!(by_impressions.region("Dubai").unwrap().value, 4000.0);
        assert_eq!(metrics.with_metric(RegionMetric::Impressions), by_impressions);
    }

    #[test]
    fn test_top_regions_stable_and_limited() {
        let slices = (0..9)
            .map(|i| slice(&format!("R{i}"), "X", 0, 0, 0.0, if i == 4 { 500.0 } else { 100.0 }))
            .collect();
        let metrics = RegionalMetrics::from_campaigns(&[campaign("A", slices)], RegionMetric::Revenue);
        let names: Vec<&str> = metrics.top_regions.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, vec!["R4", "R0", "R1", "R2", "R3", "R5", "R6"]);
        assert_eq!(metrics.regions[0].region, "R0");
    }

    #[test]
    fn test_country_conflict_is_flagged() {
        let campaigns = vec![
            campaign("A", vec![slice("Central", "UAE", 10, 1, 1.0, 2.0)]),
            campaign("B", vec![slice("Central", "Qatar", 10, 1, 1.0, 2.0)]),
        ];
        let metrics = RegionalMetrics::from_campaigns(&campaigns, RegionMetric::Revenue);
        assert_eq!(metrics.region("Central").unwrap().country, "UAE");
        assert_eq!(
            metrics.conflicts,
            vec![RegionConflict {
                region: "Central".into(),
                kept_country: "UAE".into(),
                conflicting_country: "Qatar".into(),
                campaign: "B".into(),
            }]
        );
    }

    #[test]
    fn test_empty_campaigns() {
        let metrics = RegionalMetrics::from_campaigns(&[Campaign::default()], RegionMetric::Spend);
        assert!(metrics.regions.is_empty());
        assert!(metrics.top_regions.is_empty());
        assert_eq!(metrics.totals, RegionalTotals::default());
        assert_eq!(metrics.overview_title(), "Regional Overview (0 regions)");
        assert_eq!(metrics.overview_heading().icon, Icon::MapPin);
    }

    #[test]
    fn test_zero_denominators() {
        let metrics = RegionalMetrics::from_campaigns(
            &[campaign("A", vec![slice("Doha", "Qatar", 0, 0, 0.0, 10.0)])],
            RegionMetric::Clicks,
        );
        let doha = metrics.region("Doha").unwrap();
        assert_eq!((doha.ctr, doha.conversion_rate, doha.roas, doha.cpc), (0.0, 0.0, 0.0, 0.0));
        assert_eq!(doha.value, 0.0);
    }

    #[test]
    fn test_value_format_follows_metric() {
        let metrics = RegionalMetrics::from_campaigns(&[], RegionMetric::Spend);
        assert_eq!(metrics.format_value(1234.4), "$1,234");
        assert_eq!(metrics.map_title(), "Regional Spend Distribution");
        assert_eq!(metrics.with_metric(RegionMetric::Clicks).format_value(1234.0), "1,234");
    }
}
