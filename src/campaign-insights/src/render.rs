//! Plain-text rendering of the dashboard views for the terminal.

use insights_reporting::widgets::{
    peak, Align, ChartSpec, MetricCard, RenderedTable, SectionHeading, SummaryTile,
};
use insights_reporting::{DemographicMetrics, DeviceMetrics, RegionalMetrics, WeeklyMetrics};

const BAR_WIDTH: usize = 32;

#[derive(Default)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn banner(&mut self, headline: &str) {
        self.line("=".repeat(headline.chars().count()));
        self.line(headline);
        self.line("=".repeat(headline.chars().count()));
        self.blank();
    }

    fn heading(&mut self, title: &str) {
        self.line(title);
        self.line("-".repeat(title.chars().count()));
    }

    fn cards(&mut self, heading: &SectionHeading, cards: &[MetricCard]) {
        self.heading(&heading.title);
        let width = cards.iter().map(|c| c.title.len()).max().unwrap_or(0);
        for card in cards {
            self.line(format!("  {:<width$}  {}", card.title, card.value));
        }
        self.blank();
    }

    fn tiles(&mut self, heading: &SectionHeading, tiles: &[SummaryTile]) {
        self.heading(&heading.title);
        for tile in tiles {
            let figures: Vec<String> = tile
                .figures
                .iter()
                .map(|(label, value)| format!("{label} {value}"))
                .collect();
            self.line(format!("  {}: {}", tile.title, figures.join(", ")));
        }
        self.blank();
    }

    fn chart(&mut self, chart: &ChartSpec) {
        self.heading(&chart.title);
        if chart.points.is_empty() {
            self.line("  No data available");
            self.blank();
            return;
        }
        let label_width = chart.points.iter().map(|p| p.label.len()).max().unwrap_or(0);
        let max = peak(&chart.points).map_or(0.0, |p| p.value);
        let bar_width = BAR_WIDTH;
        for point in &chart.points {
            let filled = if max > 0.0 {
                ((point.value / max) * bar_width as f64).round().max(0.0) as usize
            } else {
                0
            };
            self.line(format!(
                "  {:<label_width$}  {:<bar_width$}  {}",
                point.label,
                "#".repeat(filled),
                chart.value_format.apply(point.value)
            ));
        }
        self.blank();
    }

    fn table(&mut self, table: &RenderedTable) {
        self.heading(&table.title);
        if table.rows.is_empty() {
            self.line(format!("  {}", table.empty_message));
            self.blank();
            return;
        }

        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.len()).collect();
        for row in &table.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<&str> = table.headers.clone();
        self.line(Self::format_row(&header, &widths, &table.aligns));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.line(format!("  {}", rule.join("  ")));
        for row in &table.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            self.line(Self::format_row(&cells, &widths, &table.aligns));
        }
        self.blank();
    }

    fn format_row(cells: &[&str], widths: &[usize], aligns: &[Align]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .zip(aligns)
            .map(|((cell, &width), align)| match align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            })
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    }

    fn pairs(&mut self, title: &str, pairs: &[(impl AsRef<str>, String)]) {
        self.heading(title);
        for (label, value) in pairs {
            self.line(format!("  {}: {}", label.as_ref(), value));
        }
        self.blank();
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

pub fn demographic(report: &mut Report, metrics: &DemographicMetrics) {
    report.cards(&DemographicMetrics::male_heading(), &metrics.male_cards());
    report.cards(&DemographicMetrics::female_heading(), &metrics.female_cards());
    report.chart(&metrics.spend_by_age_chart());
    report.chart(&metrics.revenue_by_age_chart());
    report.table(&DemographicMetrics::male_table().render(&metrics.male_age_groups, None));
    report.table(&DemographicMetrics::female_table().render(&metrics.female_age_groups, None));
}

pub fn device(report: &mut Report, metrics: &DeviceMetrics) {
    report.cards(&DeviceMetrics::overview_heading(), &metrics.overview_cards());
    report.tiles(&DeviceMetrics::tiles_heading(), &metrics.tiles());
    report.chart(&metrics.revenue_chart());
    report.chart(&metrics.conversions_chart());
    report.chart(&metrics.ctr_chart());
    report.chart(&metrics.roas_chart());
    report.pairs("Revenue Distribution", &metrics.revenue_distribution());
    report.table(&DeviceMetrics::table().render(&metrics.devices, None));
}

pub fn regional(report: &mut Report, metrics: &RegionalMetrics) {
    report.cards(&metrics.overview_heading(), &metrics.overview_cards());

    let map = metrics.bubble_map();
    report.heading(&map.title);
    if map.is_empty() {
        report.line("  No data available");
    }
    for bubble in &map.bubbles {
        report.line(format!(
            "  {} ({}) at {:.4},{:.4}: {} [{}, r={:.1}]",
            bubble.region,
            bubble.country,
            bubble.position.lat,
            bubble.position.lng,
            bubble.display_value,
            bubble.color,
            bubble.radius
        ));
    }
    if !map.dropped.is_empty() {
        report.line(format!("  Not on map: {}", map.dropped.join(", ")));
    }
    report.blank();

    report.chart(&metrics.top_regions_chart());
    report.table(&RegionalMetrics::table().render(&metrics.regions, None));

    if !metrics.conflicts.is_empty() {
        report.heading("Region Label Conflicts");
        for conflict in &metrics.conflicts {
            report.line(format!(
                "  {}: kept {}, campaign \"{}\" reported {}",
                conflict.region, conflict.kept_country, conflict.campaign, conflict.conflicting_country
            ));
        }
        report.blank();
    }
}

pub fn weekly(report: &mut Report, metrics: &WeeklyMetrics) {
    report.cards(&metrics.overview_heading(), &metrics.overview_cards());
    report.chart(&metrics.revenue_chart());
    report.chart(&metrics.spend_chart());
    report.pairs("Weekly Performance Insights", &metrics.insights());
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::types::{DeviceSlice, DeviceType, WeekSlice};
    use insights_core::Campaign;

    #[test]
    fn test_device_report_lists_every_device() {
        let metrics = DeviceMetrics::from_campaigns(&[Campaign {
            device_performance: vec![DeviceSlice {
                device: DeviceType::Mobile,
                impressions: 1000,
                clicks: 50,
                conversions: 5,
                spend: 100.0,
                revenue: 200.0,
            }],
            ..Default::default()
        }]);
        let mut report = Report::new();
        device(&mut report, &metrics);
        let text = report.finish();
        assert!(text.contains("Detailed Device Performance Metrics"));
        assert!(text.contains("Performance by Device Type"));
        assert!(text.contains("  Mobile: Revenue $200, Conversions 5, ROAS 2.00x, Conv. Rate 10.00%"));
        assert!(text.contains("Mobile: 100.0% ($200)"));
        assert!(text.contains("2.00x"));
        assert!(text.contains("Tablet"));
    }

    #[test]
    fn test_empty_weekly_report() {
        let metrics = WeeklyMetrics::from_campaigns(&[]);
        let mut report = Report::new();
        report.banner("Weekly Performance");
        weekly(&mut report, &metrics);
        let text = report.finish();
        assert!(text.starts_with("=================="));
        assert!(text.contains("Weekly Overview (0 weeks)"));
        assert!(text.contains("No data available"));
    }

    #[test]
    fn test_weekly_chart_bars_scale_to_peak() {
        let metrics = WeeklyMetrics::from_campaigns(&[Campaign {
            weekly_performance: vec![
                WeekSlice {
                    week_start: "2024-01-01".into(),
                    spend: 50.0,
                    revenue: 100.0,
                    impressions: 0,
                    clicks: 0,
                },
                WeekSlice {
                    week_start: "2024-01-08".into(),
                    spend: 50.0,
                    revenue: 50.0,
                    impressions: 0,
                    clicks: 0,
                },
            ],
            ..Default::default()
        }]);
        let mut report = Report::new();
        report.chart(&metrics.revenue_chart());
        let text = report.finish();
        assert!(text.contains(&"#".repeat(BAR_WIDTH)));
        assert!(text.contains(&format!("{}{}", "#".repeat(BAR_WIDTH / 2), " ".repeat(BAR_WIDTH / 2))));
    }
}
