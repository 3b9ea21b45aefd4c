use insights_core::types::{DeviceType, RegionMetric};
use insights_core::{Dataset, MarketingData};
use insights_reporting::{
    DashboardView, DemographicAggregator, DeviceAggregator, LoadState, RegionalAggregator,
    WeeklyAggregator, DEMOGRAPHIC_TITLE, DEVICE_TITLE, REGIONAL_TITLE, WEEKLY_TITLE,
};

const FIXTURE: &str = r#"{
    "generated_at": "2024-02-01",
    "campaigns": [
        {
            "id": 1,
            "name": "Ramadan Push",
            "medium": "Social",
            "spend": 1000,
            "revenue": 3000,
            "demographic_breakdown": [
                { "gender": "Male", "age_group": "25-34", "percentage_of_audience": 40,
                  "performance": { "impressions": 4000, "clicks": 200, "conversions": 20 } },
                { "gender": "Female", "age_group": "18-24", "percentage_of_audience": 60,
                  "performance": { "impressions": 6000, "clicks": 300, "conversions": 15 } }
            ],
            "device_performance": [
                { "device": "Mobile", "impressions": 1000, "clicks": 50, "conversions": 5, "spend": 100, "revenue": 200 },
                { "device": "Desktop", "impressions": 500, "clicks": 20, "conversions": 4, "spend": 50, "revenue": 300 }
            ],
            "regional_performance": [
                { "region": "Dubai", "country": "UAE", "impressions": 700, "clicks": 35, "conversions": 3, "spend": 60, "revenue": 100 },
                { "region": "Doha", "country": "Qatar", "impressions": 300, "clicks": 15, "conversions": 1, "spend": 40, "revenue": 80 }
            ],
            "weekly_performance": [
                { "week_start": "2024-01-08", "spend": 300, "revenue": 900, "impressions": 5000, "clicks": 250 },
                { "week_start": "2024-01-01", "spend": 700, "revenue": 2100, "impressions": 5000, "clicks": 250 }
            ]
        },
        {
            "id": "search-7",
            "name": "Always-on Search",
            "medium": "Search",
            "spend": 500,
            "revenue": 500,
            "regional_performance": [
                { "region": "Dubai", "country": "UAE", "impressions": 900, "clicks": 45, "conversions": 6, "spend": 80, "revenue": 150 },
                { "region": "Atlantis", "country": "Nowhere", "impressions": 10, "clicks": 1, "conversions": 0, "spend": 1, "revenue": 0 }
            ]
        },
        {
            "id": 3,
            "name": "Legacy Export",
            "medium": "Email",
            "spend": 0,
            "revenue": 0,
            "demographic_breakdown": null,
            "device_performance": [
                { "device": "Tablet", "impressions": 200.0, "clicks": 10.0, "conversions": 1.0, "spend": 20, "revenue": 0 }
            ],
            "regional_performance": null,
            "weekly_performance": null
        }
    ]
}"#;

fn loaded() -> LoadState {
    let data: MarketingData = serde_json::from_str(FIXTURE).unwrap();
    LoadState::Loaded(Dataset::new(data))
}

#[test]
fn test_demographic_view() {
    let mut view: DashboardView<DemographicAggregator> = DashboardView::new(DEMOGRAPHIC_TITLE);
    view.set_state(loaded());
    let metrics = view.metrics(&()).unwrap();

    assert!((metrics.male.spend - 400.0).abs() < 1e-9);
    assert!((metrics.female.spend - 600.0).abs() < 1e-9);
    assert!((metrics.female.revenue - 1800.0).abs() < 1e-9);
    let ages: Vec<&str> = metrics.age_groups.iter().map(|a| a.age_group.label()).collect();
    assert_eq!(ages, vec!["18-24", "25-34"]);
    assert_eq!(view.headline(), "Demographic Performance");
}

#[test]
fn test_device_view() {
    let mut view: DashboardView<DeviceAggregator> = DashboardView::new(DEVICE_TITLE);
    view.set_state(loaded());
    let metrics = view.metrics(&()).unwrap();

    let mobile = metrics.device(&DeviceType::Mobile).unwrap();
    assert!((mobile.ctr - 5.0).abs() < 1e-9);
    assert!((mobile.conversion_rate - 10.0).abs() < 1e-9);
    assert!((mobile.roas - 2.0).abs() < 1e-9);
    assert!((metrics.mobile_share() - 40.0).abs() < 1e-9);
    assert_eq!(metrics.campaign_performance.len(), 1);

    let tablet = metrics.device(&DeviceType::Tablet).unwrap();
    assert_eq!(tablet.impressions, 200);
    assert!((tablet.ctr - 5.0).abs() < 1e-9);

    let table = insights_reporting::DeviceMetrics::table().render(&metrics.devices, None);
    assert_eq!(table.rows[0][0], "Desktop");
}

#[test]
fn test_regional_view_switches_metric() {
    let mut view: DashboardView<RegionalAggregator> = DashboardView::new(REGIONAL_TITLE);
    view.set_state(loaded());

    let revenue = view.metrics(&RegionMetric::Revenue).unwrap();
    let dubai = revenue.region("Dubai").unwrap();
    assert!((dubai.revenue - 250.0).abs() < 1e-9);
    assert!((dubai.value - 250.0).abs() < 1e-9);
    assert_eq!(revenue.region_count, 3);
    assert!(revenue.conflicts.is_empty());

    let impressions = view.metrics(&RegionMetric::Impressions).unwrap();
    assert_eq!(impressions.region("Dubai").unwrap().value, 1600.0);

    let map = impressions.bubble_map();
    assert_eq!(map.title, "Regional Impressions Distribution");
    assert_eq!(map.bubbles.len(), 2);
    assert_eq!(map.dropped, vec!["Atlantis".to_string()]);
}

#[test]
fn test_weekly_view() {
    let mut view: DashboardView<WeeklyAggregator> = DashboardView::new(WEEKLY_TITLE);
    view.set_state(loaded());
    let metrics = view.metrics(&()).unwrap();

    let labels: Vec<&str> = metrics.revenue_by_week.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Jan 1", "Jan 8"]);
    assert!((metrics.average_roas - 3.0).abs() < 1e-9);
    assert_eq!(metrics.highest_revenue_week().unwrap().label, "Jan 1");
}

#[test]
fn test_empty_dataset_is_all_zero() {
    let mut view: DashboardView<DeviceAggregator> = DashboardView::new(DEVICE_TITLE);
    view.set_state(LoadState::Loaded(Dataset::new(MarketingData::default())));
    let metrics = view.metrics(&()).unwrap();
    assert!(metrics.devices.iter().all(|d| d.revenue == 0.0 && d.revenue_share == 0.0));

    let mut weekly: DashboardView<WeeklyAggregator> = DashboardView::new(WEEKLY_TITLE);
    weekly.set_state(LoadState::Loaded(Dataset::new(MarketingData::default())));
    assert_eq!(weekly.metrics(&()).unwrap().week_count, 0);
}
