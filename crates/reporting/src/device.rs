//! Device performance: fixed Mobile, Desktop and Tablet buckets plus a
//! per-campaign device breakdown. Device slices carry their own dollars,
//! which are summed directly.

use crate::aggregate::Aggregator;
use crate::format::{format_count, format_currency, format_percent, format_roas, ValueFormat};
use crate::ratios;
use crate::widgets::{
    CellValue, ChartPoint, ChartSpec, Column, Icon, MetricCard, SectionHeading, SortSpec, SummaryTile,
    TableRow, TableSpec,
};
use insights_core::types::{CampaignId, DeviceType};
use insights_core::Campaign;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevicePerformance {
    pub device: DeviceType,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
    /// Matching slices folded into this bucket.
    pub campaigns: u64,
    pub ctr: f64,
    pub conversion_rate: f64,
    pub roas: f64,
    pub avg_revenue_per_campaign: f64,
    /// Percent of revenue across all three devices.
    pub revenue_share: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DeviceBreakdown {
    pub revenue: f64,
    pub spend: f64,
    pub conversions: u64,
    pub roas: f64,
}

/// One campaign's figures per known device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignDeviceRecord {
    pub campaign_name: String,
    pub campaign_id: CampaignId,
    pub medium: String,
    #[serde(rename = "Mobile")]
    pub mobile: DeviceBreakdown,
    #[serde(rename = "Desktop")]
    pub desktop: DeviceBreakdown,
    #[serde(rename = "Tablet")]
    pub tablet: DeviceBreakdown,
}

impl CampaignDeviceRecord {
    pub fn get(&self, device: &DeviceType) -> Option<&DeviceBreakdown> {
        match device {
            DeviceType::Mobile => Some(&self.mobile),
            DeviceType::Desktop => Some(&self.desktop),
            DeviceType::Tablet => Some(&self.tablet),
            DeviceType::Unrecognized(_) => None,
        }
    }

    fn slot(&mut self, index: usize) -> &mut DeviceBreakdown {
        match index {
            0 => &mut self.mobile,
            1 => &mut self.desktop,
            _ => &mut self.tablet,
        }
    }

    fn has_revenue(&self) -> bool {
        self.mobile.revenue > 0.0 || self.desktop.revenue > 0.0 || self.tablet.revenue > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DeviceTotals {
    pub revenue: f64,
    pub spend: f64,
    pub conversions: u64,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceMetrics {
    /// Always three rows: Mobile, Desktop, Tablet.
    pub devices: Vec<DevicePerformance>,
    /// Campaigns with nonzero revenue on at least one device.
    pub campaign_performance: Vec<CampaignDeviceRecord>,
    pub totals: DeviceTotals,
}

#[derive(Default, Clone, Copy)]
struct DeviceAccumulator {
    impressions: u64,
    clicks: u64,
    conversions: u64,
    spend: f64,
    revenue: f64,
    campaigns: u64,
}

impl DeviceMetrics {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        let mut buckets = [DeviceAccumulator::default(); 3];
        let mut campaign_performance = Vec::new();

        for campaign in campaigns {
            let mut record = CampaignDeviceRecord {
                campaign_name: campaign.name.clone(),
                campaign_id: campaign.id.clone(),
                medium: campaign.medium.clone(),
                mobile: DeviceBreakdown::default(),
                desktop: DeviceBreakdown::default(),
                tablet: DeviceBreakdown::default(),
            };

            for slice in &campaign.device_performance {
                let Some(index) = slice.device.index() else {
                    continue;
                };
                let bucket = &mut buckets[index];
                bucket.impressions += slice.impressions;
                bucket.clicks += slice.clicks;
                bucket.conversions += slice.conversions;
                bucket.spend += slice.spend;
                bucket.revenue += slice.revenue;
                bucket.campaigns += 1;

                // A repeated device within one campaign replaces the earlier slice.
                *record.slot(index) = DeviceBreakdown {
                    revenue: slice.revenue,
                    spend: slice.spend,
                    conversions: slice.conversions,
                    roas: ratios::roas(slice.revenue, slice.spend),
                };
            }

            if record.has_revenue() {
                campaign_performance.push(record);
            }
        }

        let totals = DeviceTotals {
            revenue: buckets.iter().map(|b| b.revenue).sum(),
            spend: buckets.iter().map(|b| b.spend).sum(),
            conversions: buckets.iter().map(|b| b.conversions).sum(),
            clicks: buckets.iter().map(|b| b.clicks).sum(),
        };

        let devices = DeviceType::KNOWN
            .into_iter()
            .zip(buckets)
            .map(|(device, b)| DevicePerformance {
                device,
                impressions: b.impressions,
                clicks: b.clicks,
                conversions: b.conversions,
                spend: b.spend,
                revenue: b.revenue,
                campaigns: b.campaigns,
                ctr: ratios::ctr(b.clicks, b.impressions),
                conversion_rate: ratios::conversion_rate(b.conversions, b.clicks),
                roas: ratios::roas(b.revenue, b.spend),
                avg_revenue_per_campaign: ratios::per_item(b.revenue, b.campaigns),
                revenue_share: ratios::share(b.revenue, totals.revenue),
            })
            .collect();

        Self {
            devices,
            campaign_performance,
            totals,
        }
    }

    pub fn device(&self, device: &DeviceType) -> Option<&DevicePerformance> {
        self.devices.iter().find(|d| &d.device == device)
    }

    pub fn mobile_share(&self) -> f64 {
        self.device(&DeviceType::Mobile).map_or(0.0, |d| d.revenue_share)
    }

    pub fn desktop_share(&self) -> f64 {
        self.device(&DeviceType::Desktop).map_or(0.0, |d| d.revenue_share)
    }

    // ─── Presentation ───────────────────────────────────────────────────

    pub fn overview_heading() -> SectionHeading {
        SectionHeading::new("Overall Performance Metrics", Icon::Target)
    }

    pub fn tiles_heading() -> SectionHeading {
        SectionHeading::new("Performance by Device Type", Icon::Smartphone)
    }

    /// One tile per device, in Mobile, Desktop, Tablet order.
    pub fn tiles(&self) -> Vec<SummaryTile> {
        self.devices
            .iter()
            .map(|d| SummaryTile {
                title: d.device.label().to_string(),
                icon: device_icon(&d.device),
                figures: d.summary(),
            })
            .collect()
    }

    pub fn overview_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("Total Revenue", format_currency(self.totals.revenue), Icon::TrendingUp),
            MetricCard::new("Total Spend", format_currency(self.totals.spend), Icon::DollarSign),
            MetricCard::new("Total Conversions", format_count(self.totals.conversions), Icon::Target),
            MetricCard::new("Total Clicks", format_count(self.totals.clicks), Icon::Users),
        ]
    }

    pub fn revenue_chart(&self) -> ChartSpec {
        let points = self
            .devices
            .iter()
            .map(|d| ChartPoint::new(d.device.label(), d.revenue).with_color(device_color(&d.device)))
            .collect();
        ChartSpec::bar("Revenue by Device", points, ValueFormat::Currency).with_height(350)
    }

    pub fn conversions_chart(&self) -> ChartSpec {
        let points = self
            .devices
            .iter()
            .map(|d| {
                ChartPoint::new(d.device.label(), d.conversions as f64)
                    .with_color(device_color(&d.device))
            })
            .collect();
        ChartSpec::bar("Conversions by Device", points, ValueFormat::Number).with_height(350)
    }

    pub fn ctr_chart(&self) -> ChartSpec {
        let points = self
            .devices
            .iter()
            .map(|d| ChartPoint::new(d.device.label(), d.ctr).with_color("#F59E0B"))
            .collect();
        ChartSpec::bar("Click-Through Rate (CTR) by Device", points, ValueFormat::Percent)
            .with_height(350)
    }

    pub fn roas_chart(&self) -> ChartSpec {
        let points = self
            .devices
            .iter()
            .map(|d| ChartPoint::new(d.device.label(), d.roas).with_color("#EF4444"))
            .collect();
        ChartSpec::bar("Return on Ad Spend (ROAS) by Device", points, ValueFormat::Roas)
            .with_height(350)
    }

    /// Revenue distribution lines, e.g. `Mobile: 62.5% ($12,500)`.
    pub fn revenue_distribution(&self) -> Vec<(String, String)> {
        self.devices
            .iter()
            .map(|d| {
                (
                    d.device.label().to_string(),
                    format!("{:.1}% ({})", d.revenue_share, format_currency(d.revenue)),
                )
            })
            .collect()
    }

    pub fn table() -> TableSpec {
        TableSpec {
            title: "Detailed Device Performance Metrics".to_string(),
            columns: vec![
                Column::text("device", "Device", "12%"),
                Column::numeric("impressions", "Impressions", "13%", ValueFormat::Whole),
                Column::numeric("clicks", "Clicks", "11%", ValueFormat::Whole),
                Column::numeric("conversions", "Conversions", "12%", ValueFormat::Whole),
                Column::numeric("spend", "Spend", "13%", ValueFormat::Currency),
                Column::numeric("revenue", "Revenue", "13%", ValueFormat::Currency),
                Column::numeric("ctr", "CTR", "10%", ValueFormat::Percent),
                Column::numeric("conversion_rate", "Conv. Rate", "10%", ValueFormat::Percent),
                Column::numeric("roas", "ROAS", "8%", ValueFormat::Roas),
            ],
            default_sort: SortSpec::desc("revenue"),
            empty_message: "No device data available",
        }
    }
}

fn device_icon(device: &DeviceType) -> Icon {
    match device {
        DeviceType::Mobile => Icon::Smartphone,
        DeviceType::Desktop => Icon::Monitor,
        _ => Icon::Tablet,
    }
}

fn device_color(device: &DeviceType) -> &'static str {
    match device {
        DeviceType::Mobile => "#3B82F6",
        DeviceType::Desktop => "#8B5CF6",
        _ => "#10B981",
    }
}

impl TableRow for DevicePerformance {
    fn cell(&self, key: &str) -> Option<CellValue> {
        let value = match key {
            "device" => return Some(CellValue::Text(self.device.label().to_string())),
            "impressions" => self.impressions as f64,
            "clicks" => self.clicks as f64,
            "conversions" => self.conversions as f64,
            "spend" => self.spend,
            "revenue" => self.revenue,
            "campaigns" => self.campaigns as f64,
            "ctr" => self.ctr,
            "conversion_rate" => self.conversion_rate,
            "roas" => self.roas,
            "avg_revenue_per_campaign" => self.avg_revenue_per_campaign,
            "revenue_share" => self.revenue_share,
            _ => return None,
        };
        Some(CellValue::Number(value))
    }
}

impl DevicePerformance {
    /// Headline figures for the per-device summary tile.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Revenue", format_currency(self.revenue)),
            ("Conversions", format_count(self.conversions)),
            ("ROAS", format_roas(self.roas)),
            ("Conv. Rate", format_percent(self.conversion_rate)),
        ]
    }
}

pub struct DeviceAggregator;

impl Aggregator for DeviceAggregator {
    type Params = ();
    type Output = DeviceMetrics;

    const NAME: &'static str = "device";

    fn aggregate(campaigns: &[Campaign], _params: &()) -> DeviceMetrics {
        DeviceMetrics::from_campaigns(campaigns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::types::DeviceSlice;

    fn slice(device: &str, impressions: u64, clicks: u64, conversions: u64, spend: f64, revenue: f64) -> DeviceSlice {
        DeviceSlice {
            device: DeviceType::from(device.to_string()),
            impressions,
            clicks,
            conversions,
            spend,
            revenue,
        }
    }

    fn campaign(id: i64, slices: Vec<DeviceSlice>) -> Campaign {
        Campaign {
            id: CampaignId::Number(id),
            name: format!("Campaign {id}"),
            medium: "Display".into(),
            device_performance: slices,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_mobile_slice_ratios() {
        let metrics = DeviceMetrics::from_campaigns(&[campaign(
            1,
            vec![slice("Mobile", 1000, 50, 5, 100.0, 200.0)],
        )]);
        let mobile = metrics.device(&DeviceType::Mobile).unwrap();
        assert!((mobile.ctr - 5.0).abs() < 1e-9);
        assert!((mobile.conversion_rate - 10.0).abs() < 1e-9);
        assert!((mobile.roas - 2.0).abs() < 1e-9);
        assert!((mobile.avg_revenue_per_campaign - 200.0).abs() < 1e-9);
        assert!((metrics.mobile_share() - 100.0).abs() < 1e-9);
        assert_eq!(metrics.desktop_share(), 0.0);
    }

    #[test]
    fn test_fixed_buckets_in_order() {
        let metrics = DeviceMetrics::from_campaigns(&[]);
        let labels: Vec<&str> = metrics.devices.iter().map(|d| d.device.label()).collect();
        assert_eq!(labels, vec!["Mobile", "Desktop", "Tablet"]);
        assert!(metrics.devices.iter().all(|d| d.revenue == 0.0 && d.roas == 0.0));
        assert!(metrics.campaign_performance.is_empty());
        assert_eq!(metrics.totals, DeviceTotals::default());
    }

    #[test]
    fn test_unknown_device_ignored() {
        let metrics = DeviceMetrics::from_campaigns(&[campaign(
            1,
            vec![
                slice("Desktop", 100, 10, 1, 20.0, 60.0),
                slice("Smart TV", 9999, 999, 99, 999.0, 9999.0),
            ],
        )]);
        assert_eq!(metrics.devices.len(), 3);
        assert_eq!(metrics.totals.clicks, 10);
        assert!((metrics.totals.revenue - 60.0).abs() < 1e-9);
        assert!((metrics.desktop_share() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_campaign_records_filtered_by_revenue() {
        let metrics = DeviceMetrics::from_campaigns(&[
            campaign(1, vec![slice("Tablet", 100, 10, 1, 20.0, 50.0)]),
            campaign(2, vec![slice("Mobile", 100, 10, 0, 20.0, 0.0)]),
            campaign(3, vec![]),
        ]);
        assert_eq!(metrics.campaign_performance.len(), 1);
        let record = &metrics.campaign_performance[0];
        assert_eq!(record.campaign_id, CampaignId::Number(1));
        assert_eq!(record.medium, "Display");
        assert!((record.tablet.roas - 2.5).abs() < 1e-9);
        assert_eq!(record.mobile, DeviceBreakdown::default());
        assert_eq!(record.get(&DeviceType::Tablet).map(|b| b.conversions), Some(1));
    }

    #[test]
    fn test_campaign_counter_and_shares() {
        let metrics = DeviceMetrics::from_campaigns(&[
            campaign(1, vec![slice("Mobile", 0, 0, 0, 10.0, 300.0), slice("Desktop", 0, 0, 0, 10.0, 100.0)]),
            campaign(2, vec![slice("Mobile", 0, 0, 0, 10.0, 100.0)]),
        ]);
        let mobile = metrics.device(&DeviceType::Mobile).unwrap();
        assert_eq!(mobile.campaigns, 2);
        assert!((mobile.avg_revenue_per_campaign - 200.0).abs() < 1e-9);
        assert!((metrics.mobile_share() - 80.0).abs() < 1e-9);
        assert!((metrics.desktop_share() - 20.0).abs() < 1e-9);
        let tablet = metrics.device(&DeviceType::Tablet).unwrap();
        assert_eq!(tablet.avg_revenue_per_campaign, 0.0);
        assert_eq!(tablet.ctr, 0.0);

        let distribution = metrics.revenue_distribution();
        assert_eq!(distribution[0], ("Mobile".to_string(), "80.0% ($400)".to_string()));
    }

    #[test]
    fn test_table_default_sort_by_revenue() {
        let metrics = DeviceMetrics::from_campaigns(&[campaign(
            1,
            vec![slice("Mobile", 10, 1, 0, 5.0, 10.0), slice("Tablet", 10, 1, 0, 5.0, 90.0)],
        )]);
        let rendered = DeviceMetrics::table().render(&metrics.devices, None);
        let order: Vec<&str> = rendered.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(order, vec!["Tablet", "Mobile", "Desktop"]);
        assert_eq!(rendered.rows[0][8], "18.00x");
    }

    #[test]
    fn test_repeat_aggregation_is_identical() {
        let campaigns = vec![
            campaign(1, vec![slice("Mobile", 1000, 50, 5, 100.0, 200.0), slice("Desktop", 500, 20, 4, 50.0, 300.0)]),
            campaign(2, vec![slice("Tablet", 100, 10, 1, 20.0, 50.0)]),
        ];
        let first = DeviceAggregator::aggregate(&campaigns, &());
        let second = DeviceAggregator::aggregate(&campaigns, &());
        assert_eq!(first, second);
    }

    #[test]
    fn test_device_tiles() {
        let metrics = DeviceMetrics::from_campaigns(&[campaign(
            1,
            vec![slice("Mobile", 1000, 50, 5, 100.0, 200.0)],
        )]);
        let tiles = metrics.tiles();
        let icons: Vec<Icon> = tiles.iter().map(|t| t.icon).collect();
        assert_eq!(icons, vec![Icon::Smartphone, Icon::Monitor, Icon::Tablet]);
        assert_eq!(tiles[0].title, "Mobile");
        assert_eq!(
            tiles[0].figures,
            vec![
                ("Revenue", "$200".to_string()),
                ("Conversions", "5".to_string()),
                ("ROAS", "2.00x".to_string()),
                ("Conv. Rate", "10.00%".to_string()),
            ]
        );
        assert_eq!(tiles[2].figures[0], ("Revenue", "$0".to_string()));
        assert_eq!(DeviceMetrics::tiles_heading().title, "Performance by Device Type");
        assert_eq!(DeviceMetrics::overview_heading().icon, Icon::Target);
    }
}
