//! Demographic performance: gender totals and age-group breakdowns.
//!
//! Slices carry only audience share and raw counts. Dollar figures are the
//! owning campaign's spend and revenue apportioned by
//! `percentage_of_audience`.

use crate::aggregate::Aggregator;
use crate::format::{format_count, format_currency, ValueFormat};
use crate::group::OrderedGroups;
use crate::ratios;
use crate::widgets::{
    CellValue, ChartPoint, ChartSpec, Column, Icon, MetricCard, SectionHeading, SortSpec, TableRow,
    TableSpec,
};
use insights_core::types::{AgeGroup, Gender};
use insights_core::Campaign;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GenderTotals {
    pub clicks: u64,
    pub spend: f64,
    pub revenue: f64,
}

/// Counts for one age group within one gender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupPerformance {
    pub age_group: AgeGroup,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    /// Number of slices folded into this row.
    pub campaigns: u64,
    pub ctr: f64,
    pub conversion_rate: f64,
}

/// Apportioned dollars for one age group across all genders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupDollars {
    pub age_group: AgeGroup,
    pub spend: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicMetrics {
    pub male: GenderTotals,
    pub female: GenderTotals,
    /// Gender-agnostic, in canonical age order.
    pub age_groups: Vec<AgeGroupDollars>,
    pub male_age_groups: Vec<AgeGroupPerformance>,
    pub female_age_groups: Vec<AgeGroupPerformance>,
}

#[derive(Default)]
struct AgeCounts {
    impressions: u64,
    clicks: u64,
    conversions: u64,
    campaigns: u64,
}

#[derive(Default)]
struct Dollars {
    spend: f64,
    revenue: f64,
}

impl DemographicMetrics {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        let mut male = GenderTotals::default();
        let mut female = GenderTotals::default();
        let mut male_ages: OrderedGroups<AgeGroup, AgeCounts> = OrderedGroups::new();
        let mut female_ages: OrderedGroups<AgeGroup, AgeCounts> = OrderedGroups::new();
        let mut age_dollars: OrderedGroups<AgeGroup, Dollars> = OrderedGroups::new();

        for campaign in campaigns {
            for slice in &campaign.demographic_breakdown {
                let fraction = slice.percentage_of_audience / 100.0;
                let spend = campaign.spend * fraction;
                let revenue = campaign.revenue * fraction;
                let perf = slice.performance;

                let bucket = match slice.gender {
                    Gender::Male => Some((&mut male, &mut male_ages)),
                    Gender::Female => Some((&mut female, &mut female_ages)),
                    Gender::Other(_) => None,
                };
                if let Some((totals, ages)) = bucket {
                    totals.clicks += perf.clicks;
                    totals.spend += spend;
                    totals.revenue += revenue;

                    let row = ages.entry(&slice.age_group);
                    row.impressions += perf.impressions;
                    row.clicks += perf.clicks;
                    row.conversions += perf.conversions;
                    row.campaigns += 1;
                }

                // Unrecognised genders still count toward the age-group dollars.
                let dollars = age_dollars.entry(&slice.age_group);
                dollars.spend += spend;
                dollars.revenue += revenue;
            }
        }

        let mut age_groups: Vec<AgeGroupDollars> = age_dollars
            .into_entries()
            .into_iter()
            .map(|(age_group, d)| AgeGroupDollars {
                age_group,
                spend: d.spend,
                revenue: d.revenue,
            })
            .collect();
        age_groups.sort_by_key(|row| row.age_group.rank());

        Self {
            male,
            female,
            age_groups,
            male_age_groups: finish_age_rows(male_ages),
            female_age_groups: finish_age_rows(female_ages),
        }
    }

    // ─── Presentation ───────────────────────────────────────────────────

    pub fn male_heading() -> SectionHeading {
        SectionHeading::new("Male Performance Metrics", Icon::Users)
    }

    pub fn female_heading() -> SectionHeading {
        SectionHeading::new("Female Performance Metrics", Icon::UserCheck)
    }

    pub fn male_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("Total Clicks by Males", format_count(self.male.clicks), Icon::MousePointer),
            MetricCard::new("Total Spend by Males", format_currency(self.male.spend), Icon::DollarSign),
            MetricCard::new("Total Revenue by Males", format_currency(self.male.revenue), Icon::TrendingUp),
        ]
    }

    pub fn female_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("Total Clicks by Females", format_count(self.female.clicks), Icon::MousePointer),
            MetricCard::new("Total Spend by Females", format_currency(self.female.spend), Icon::DollarSign),
            MetricCard::new("Total Revenue by Females", format_currency(self.female.revenue), Icon::Banknote),
        ]
    }

    pub fn spend_by_age_chart(&self) -> ChartSpec {
        let points = self
            .age_groups
            .iter()
            .map(|row| ChartPoint::new(row.age_group.label(), row.spend).with_color("#3B82F6"))
            .collect();
        ChartSpec::bar("Total Spend by Age Group", points, ValueFormat::Whole)
    }

    pub fn revenue_by_age_chart(&self) -> ChartSpec {
        let points = self
            .age_groups
            .iter()
            .map(|row| ChartPoint::new(row.age_group.label(), row.revenue).with_color("#10B981"))
            .collect();
        ChartSpec::bar("Total Revenue by Age Group", points, ValueFormat::Whole)
    }

    pub fn male_table() -> TableSpec {
        age_group_table(
            "Campaign Performance by Male Age Groups",
            "No male demographic data available",
        )
    }

    pub fn female_table() -> TableSpec {
        age_group_table(
            "Campaign Performance by Female Age Groups",
            "No female demographic data available",
        )
    }
}

fn finish_age_rows(groups: OrderedGroups<AgeGroup, AgeCounts>) -> Vec<AgeGroupPerformance> {
    let mut rows: Vec<AgeGroupPerformance> = groups
        .into_entries()
        .into_iter()
        .map(|(age_group, c)| AgeGroupPerformance {
            age_group,
            impressions: c.impressions,
            clicks: c.clicks,
            conversions: c.conversions,
            campaigns: c.campaigns,
            ctr: ratios::ctr(c.clicks, c.impressions),
            conversion_rate: ratios::conversion_rate(c.conversions, c.clicks),
        })
        .collect();
    rows.sort_by_key(|row| row.age_group.rank());
    rows
}

fn age_group_table(title: &str, empty_message: &'static str) -> TableSpec {
    TableSpec {
        title: title.to_string(),
        columns: vec![
            Column::text("age_group", "Age Group", "15%"),
            Column::numeric("impressions", "Impressions", "17%", ValueFormat::Whole),
            Column::numeric("clicks", "Clicks", "17%", ValueFormat::Whole),
            Column::numeric("conversions", "Conversions", "17%", ValueFormat::Whole),
            Column::numeric("ctr", "CTR", "17%", ValueFormat::Percent),
            Column::numeric("conversion_rate", "Conversion Rate", "17%", ValueFormat::Percent),
        ],
        default_sort: SortSpec::desc("clicks"),
        empty_message,
    }
}

impl TableRow for AgeGroupPerformance {
    fn cell(&self, key: &str) -> Option<CellValue> {
        let value = match key {
            "age_group" => return Some(CellValue::Text(self.age_group.label().to_string())),
            "impressions" => self.impressions as f64,
            "clicks" => self.clicks as f64,
            "conversions" => self.conversions as f64,
            "campaigns" => self.campaigns as f64,
            "ctr" => self.ctr,
            "conversion_rate" => self.conversion_rate,
            _ => return None,
        };
        Some(CellValue::Number(value))
    }
}

pub struct DemographicAggregator;

impl Aggregator for DemographicAggregator {
    type Params = ();
    type Output = DemographicMetrics;

    const NAME: &'static str = "demographic";

    fn aggregate(campaigns: &[Campaign], _params: &()) -> DemographicMetrics {
        DemographicMetrics::from_campaigns(campaigns)
    }
}
