use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

// ─── Dataset ────────────────────────────────────────────────────────────────

/// Pre-aggregated marketing dataset as served by the data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketingData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub campaigns: Vec<Campaign>,
    /// Top-level fields the dashboards do not read.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One fetched snapshot of [`MarketingData`].
///
/// The id is the snapshot's identity: two loads of identical content are
/// still distinct datasets, and aggregates memoized for one are never
/// served for the other.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: Uuid,
    pub data: Arc<MarketingData>,
}

impl Dataset {
    pub fn new(data: MarketingData) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: Arc::new(data),
        }
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.data.campaigns
    }
}

/// Campaign identifiers arrive either as numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CampaignId {
    Number(i64),
    Text(String),
}

impl Default for CampaignId {
    fn default() -> Self {
        CampaignId::Text(String::new())
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignId::Number(n) => write!(f, "{n}"),
            CampaignId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: CampaignId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medium: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spend: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demographic_breakdown: Vec<DemographicSlice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_performance: Vec<DeviceSlice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regional_performance: Vec<RegionSlice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weekly_performance: Vec<WeekSlice>,
}

// ─── Slices ─────────────────────────────────────────────────────────────────

/// One demographic cell's share of a campaign's audience.
///
/// Carries no dollar figures of its own: spend and revenue are apportioned
/// from the owning campaign by `percentage_of_audience`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicSlice {
    pub gender: Gender,
    pub age_group: AgeGroup,
    /// Share of the campaign audience, 0–100.
    #[serde(default, deserialize_with = "null_as_default")]
    pub percentage_of_audience: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub performance: SlicePerformance,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SlicePerformance {
    #[serde(default, deserialize_with = "count")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "count")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "count")]
    pub conversions: u64,
}

/// Device-native performance; dollar metrics are the device's own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSlice {
    pub device: DeviceType,
    #[serde(default, deserialize_with = "count")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "count")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "count")]
    pub conversions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spend: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSlice {
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "count")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "count")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "count")]
    pub conversions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spend: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekSlice {
    /// ISO date of the first day of the week.
    pub week_start: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spend: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "count")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "count")]
    pub clicks: u64,
}

// ─── Lenient field decoding ─────────────────────────────────────────────────

/// `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Whole(u64),
    Float(f64),
}

/// Counts arrive as JSON numbers that may carry a fraction (`1000.0`).
/// Floats are rounded to the nearest whole count; `null` is zero.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawCount>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawCount::Whole(n)) => Ok(n),
        Some(RawCount::Float(f)) if f.is_finite() && f >= 0.0 => Ok(f.round() as u64),
        Some(RawCount::Float(f)) => Err(serde::de::Error::custom(format!(
            "invalid count {f}, expected a non-negative number"
        ))),
    }
}

// ─── Enumerated dimensions ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl From<String> for Gender {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Male" => Gender::Male,
            "Female" => Gender::Female,
            _ => Gender::Other(label),
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => "Male".to_string(),
            Gender::Female => "Female".to_string(),
            Gender::Other(label) => label,
        }
    }
}

/// Device categories tracked by the device view. Any other label is kept
/// as `Unrecognized` and contributes to no device bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Tablet,
    Unrecognized(String),
}

impl DeviceType {
    /// Known devices in display order.
    pub const KNOWN: [DeviceType; 3] = [DeviceType::Mobile, DeviceType::Desktop, DeviceType::Tablet];

    /// Position in [`DeviceType::KNOWN`], `None` for unrecognized labels.
    pub fn index(&self) -> Option<usize> {
        match self {
            DeviceType::Mobile => Some(0),
            DeviceType::Desktop => Some(1),
            DeviceType::Tablet => Some(2),
            DeviceType::Unrecognized(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DeviceType::Mobile => "Mobile",
            DeviceType::Desktop => "Desktop",
            DeviceType::Tablet => "Tablet",
            DeviceType::Unrecognized(label) => label,
        }
    }
}

impl From<String> for DeviceType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Mobile" => DeviceType::Mobile,
            "Desktop" => DeviceType::Desktop,
            "Tablet" => DeviceType::Tablet,
            _ => DeviceType::Unrecognized(label),
        }
    }
}

impl From<DeviceType> for String {
    fn from(device: DeviceType) -> Self {
        match device {
            DeviceType::Unrecognized(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Audience age bucket. Labels outside the canonical five are preserved
/// and ordered after them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgeGroup {
    Age18To24,
    Age25To34,
    Age35To44,
    Age45To54,
    Age55Plus,
    Other(String),
}

impl AgeGroup {
    /// Rank given to labels outside the canonical buckets.
    pub const UNRANKED: u8 = 99;

    /// Canonical display rank, 1-based.
    pub fn rank(&self) -> u8 {
        match self {
            AgeGroup::Age18To24 => 1,
            AgeGroup::Age25To34 => 2,
            AgeGroup::Age35To44 => 3,
            AgeGroup::Age45To54 => 4,
            AgeGroup::Age55Plus => 5,
            AgeGroup::Other(_) => Self::UNRANKED,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AgeGroup::Age18To24 => "18-24",
            AgeGroup::Age25To34 => "25-34",
            AgeGroup::Age35To44 => "35-44",
            AgeGroup::Age45To54 => "45-54",
            AgeGroup::Age55Plus => "55+",
            AgeGroup::Other(label) => label,
        }
    }
}

impl From<String> for AgeGroup {
    fn from(label: String) -> Self {
        match label.as_str() {
            "18-24" => AgeGroup::Age18To24,
            "25-34" => AgeGroup::Age25To34,
            "35-44" => AgeGroup::Age35To44,
            "45-54" => AgeGroup::Age45To54,
            "55+" => AgeGroup::Age55Plus,
            _ => AgeGroup::Other(label),
        }
    }
}

impl From<&str> for AgeGroup {
    fn from(label: &str) -> Self {
        AgeGroup::from(label.to_string())
    }
}

impl From<AgeGroup> for String {
    fn from(age: AgeGroup) -> Self {
        match age {
            AgeGroup::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metric plotted on the regional bubble map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionMetric {
    #[default]
    Revenue,
    Spend,
    Impressions,
    Clicks,
    Conversions,
}

impl RegionMetric {
    pub const ALL: [RegionMetric; 5] = [
        RegionMetric::Revenue,
        RegionMetric::Spend,
        RegionMetric::Impressions,
        RegionMetric::Clicks,
        RegionMetric::Conversions,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RegionMetric::Revenue => "revenue",
            RegionMetric::Spend => "spend",
            RegionMetric::Impressions => "impressions",
            RegionMetric::Clicks => "clicks",
            RegionMetric::Conversions => "conversions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RegionMetric::Revenue => "Revenue",
            RegionMetric::Spend => "Spend",
            RegionMetric::Impressions => "Impressions",
            RegionMetric::Clicks => "Clicks",
            RegionMetric::Conversions => "Conversions",
        }
    }

    /// Dollar-denominated metrics are shown as currency.
    pub fn is_currency(&self) -> bool {
        matches!(self, RegionMetric::Revenue | RegionMetric::Spend)
    }
}

impl fmt::Display for RegionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RegionMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegionMetric::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown metric '{s}', expected one of revenue, spend, impressions, clicks, conversions")
            })
    }
}
