//! Geographic bubble map join: region rows matched to a fixed city lookup,
//! sized and colored by the selected metric.

use crate::regional::{metric_format, RegionRow, RegionalMetrics};
use insights_core::types::RegionMetric;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

const CITY_COORDINATES: [(&str, Coordinates); 7] = [
    ("Abu Dhabi", Coordinates { lat: 24.4539, lng: 54.3773 }),
    ("Dubai", Coordinates { lat: 25.2048, lng: 55.2708 }),
    ("Sharjah", Coordinates { lat: 25.3463, lng: 55.4209 }),
    ("Riyadh", Coordinates { lat: 24.7136, lng: 46.6753 }),
    ("Doha", Coordinates { lat: 25.2854, lng: 51.531 }),
    ("Kuwait City", Coordinates { lat: 29.3759, lng: 47.9774 }),
    ("Manama", Coordinates { lat: 26.2285, lng: 50.586 }),
];

pub const MAP_CENTER: Coordinates = Coordinates { lat: 25.0, lng: 50.0 };
pub const MAP_ZOOM: u8 = 4;
pub const MAP_HEIGHT: u32 = 500;

const MIN_RADIUS: f64 = 6.0;
const RADIUS_RANGE: f64 = 25.0;
const UNIFORM_RADIUS: f64 = 10.0;

const HIGH_COLOR: &str = "#ef4444";
const MID_COLOR: &str = "#f59e0b";
const LOW_COLOR: &str = "#10b981";

pub fn lookup_city(region: &str) -> Option<Coordinates> {
    CITY_COORDINATES
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, coords)| *coords)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    pub region: String,
    pub country: String,
    pub position: Coordinates,
    pub value: f64,
    /// Tooltip text for the value, formatted for the metric.
    pub display_value: String,
    pub roas: f64,
    pub radius: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleMap {
    pub title: String,
    pub metric: RegionMetric,
    pub center: Coordinates,
    pub zoom: u8,
    pub height: u32,
    pub bubbles: Vec<Bubble>,
    /// Regions with data but no known coordinates.
    pub dropped: Vec<String>,
}

impl BubbleMap {
    pub fn from_rows(title: impl Into<String>, rows: &[RegionRow], metric: RegionMetric) -> Self {
        let mut located = Vec::new();
        let mut dropped = Vec::new();
        for row in rows {
            match lookup_city(&row.region) {
                Some(position) => located.push((row, position)),
                None => dropped.push(row.region.clone()),
            }
        }

        let values: Vec<f64> = located.iter().map(|(row, _)| row.metric(metric)).collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let format = metric_format(metric);

        let bubbles = located
            .into_iter()
            .zip(values)
            .map(|((row, position), value)| {
                let normalized = normalize(value, min, max);
                Bubble {
                    region: row.region.clone(),
                    country: row.country.clone(),
                    position,
                    value,
                    display_value: format.apply(value),
                    roas: row.roas,
                    radius: normalized.map_or(UNIFORM_RADIUS, |n| MIN_RADIUS + n * RADIUS_RANGE),
                    color: normalized.map_or(LOW_COLOR, color_for),
                }
            })
            .collect();

        Self {
            title: title.into(),
            metric,
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            height: MAP_HEIGHT,
            bubbles,
            dropped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}

impl RegionalMetrics {
    pub fn bubble_map(&self) -> BubbleMap {
        BubbleMap::from_rows(self.map_title(), &self.regions, self.metric)
    }
}

/// Position of `value` within `[min, max]`; `None` when the range is flat.
fn normalize(value: f64, min: f64, max: f64) -> Option<f64> {
    let span = max - min;
    (span > 0.0).then(|| (value - min) / span)
}

fn color_for(normalized: f64) -> &'static str {
    if normalized > 0.7 {
        HIGH_COLOR
    } else if normalized > 0.4 {
        MID_COLOR
    } else {
        LOW_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(region: &str, revenue: f64) -> RegionRow {
        RegionRow {
            region: region.into(),
            country: "GCC".into(),
            impressions: 10,
            clicks: 1,
            conversions: 0,
            spend: 10.0,
            revenue,
            value: revenue,
            ctr: 10.0,
            conversion_rate: 0.0,
            roas: revenue / 10.0,
            cpc: 10.0,
        }
    }

    #[test]
    fn test_unknown_regions_are_dropped() {
        let map = BubbleMap::from_rows(
            "Regional Revenue Distribution",
            &[row("Dubai", 100.0), row("Atlantis", 900.0)],
            RegionMetric::Revenue,
        );
        assert_eq!(map.bubbles.len(), 1);
        assert_eq!(map.bubbles[0].region, "Dubai");
        assert_eq!(map.dropped, vec!["Atlantis".to_string()]);
    }

    #[test]
    fn test_radius_and_color_scale() {
        let map = BubbleMap::from_rows(
            "map",
            &[row("Dubai", 0.0), row("Doha", 50.0), row("Riyadh", 100.0)],
            RegionMetric::Revenue,
        );
        let radii: Vec<f64> = map.bubbles.iter().map(|b| b.radius).collect();
        assert_eq!(radii, vec![6.0, 18.5, 31.0]);
        let colors: Vec<&str> = map.bubbles.iter().map(|b| b.color).collect();
        assert_eq!(colors, vec![LOW_COLOR, MID_COLOR, HIGH_COLOR]);
        assert_eq!(map.bubbles[2].display_value, "$100");
    }

    #[test]
    fn test_uniform_values() {
        let map = BubbleMap::from_rows(
            "map",
            &[row("Dubai", 10.0), row("Manama", 10.0)],
            RegionMetric::Impressions,
        );
        assert!(map.bubbles.iter().all(|b| b.radius == UNIFORM_RADIUS));
        assert!(map.bubbles.iter().all(|b| b.color == LOW_COLOR));
        assert_eq!(map.bubbles[0].value, 10.0);
        assert_eq!(map.bubbles[0].display_value, "10");
    }

    #[test]
    fn test_map_defaults() {
        let map = BubbleMap::from_rows("map", &[], RegionMetric::Revenue);
        assert!(map.is_empty());
        assert_eq!(map.center, MAP_CENTER);
        assert_eq!(map.zoom, 4);
        assert_eq!(map.height, 500);
        assert_eq!(lookup_city("Kuwait City").map(|c| c.lat), Some(29.3759));
    }
}
