//! Campaign dashboard reporting: demographic, device, regional and weekly
//! aggregates over one loaded dataset, plus the cards, charts, tables and
//! bubble map each view hands to its front end.

pub mod aggregate;
pub mod bubble_map;
pub mod demographic;
pub mod device;
pub mod format;
mod group;
pub mod memo;
pub mod ratios;
pub mod regional;
pub mod view;
pub mod weekly;
pub mod widgets;

pub use aggregate::Aggregator;
pub use bubble_map::BubbleMap;
pub use demographic::{DemographicAggregator, DemographicMetrics};
pub use device::{DeviceAggregator, DeviceMetrics};
pub use regional::{RegionalAggregator, RegionalMetrics};
pub use view::{DashboardView, LoadState};
pub use weekly::{WeeklyAggregator, WeeklyMetrics};

pub const DEMOGRAPHIC_TITLE: &str = "Demographic Performance";
pub const DEVICE_TITLE: &str = "Device Performance Analysis";
pub const REGIONAL_TITLE: &str = "Regional Performance";
pub const WEEKLY_TITLE: &str = "Weekly Performance";
