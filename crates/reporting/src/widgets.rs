//! Presentation contracts: flat, already-aggregated data handed to metric
//! cards, bar/line charts and sortable tables. Rendering itself belongs to
//! the front end; this module only shapes and orders what it shows.

use crate::format::ValueFormat;
use serde::Serialize;
use std::cmp::Ordering;

// ─── Metric cards ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Users,
    UserCheck,
    TrendingUp,
    DollarSign,
    MousePointer,
    Banknote,
    Target,
    Smartphone,
    Monitor,
    Tablet,
    MapPin,
    Calendar,
    Activity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub icon: Icon,
}

impl MetricCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, icon: Icon) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            icon,
        }
    }
}

/// Title and icon above a group of cards or tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionHeading {
    pub title: String,
    pub icon: Icon,
}

impl SectionHeading {
    pub fn new(title: impl Into<String>, icon: Icon) -> Self {
        Self {
            title: title.into(),
            icon,
        }
    }
}

/// A labelled tile carrying several formatted figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTile {
    pub title: String,
    pub icon: Icon,
    pub figures: Vec<(&'static str, String)>,
}

// ─── Charts ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color: None,
        }
    }

    pub fn with_color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
    pub value_format: ValueFormat,
    pub height: u32,
}

impl ChartSpec {
    pub fn bar(title: impl Into<String>, points: Vec<ChartPoint>, value_format: ValueFormat) -> Self {
        Self {
            title: title.into(),
            kind: ChartKind::Bar,
            points,
            value_format,
            height: 300,
        }
    }

    pub fn line(title: impl Into<String>, points: Vec<ChartPoint>, value_format: ValueFormat) -> Self {
        Self {
            title: title.into(),
            kind: ChartKind::Line,
            points,
            value_format,
            height: 300,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }
}

/// First point holding the series maximum. Later points replace the
/// current best only when strictly greater, so ties keep the earliest.
pub fn peak(points: &[ChartPoint]) -> Option<&ChartPoint> {
    points
        .iter()
        .reduce(|best, point| if point.value > best.value { point } else { best })
}

// ─── Tables ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    String,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }
}

/// How a cell value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    Text,
    Value(ValueFormat),
}

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
    pub width: &'static str,
    pub align: Align,
    pub sortable: bool,
    pub sort_type: SortType,
    pub format: CellFormat,
}

impl Column {
    /// Sortable left-aligned text column.
    pub fn text(key: &'static str, header: &'static str, width: &'static str) -> Self {
        Self {
            key,
            header,
            width,
            align: Align::Left,
            sortable: true,
            sort_type: SortType::String,
            format: CellFormat::Text,
        }
    }

    /// Sortable right-aligned numeric column.
    pub fn numeric(
        key: &'static str,
        header: &'static str,
        width: &'static str,
        format: ValueFormat,
    ) -> Self {
        Self {
            key,
            header,
            width,
            align: Align::Right,
            sortable: true,
            sort_type: SortType::Number,
            format: CellFormat::Value(format),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    fn as_number(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.parse().unwrap_or(0.0),
        }
    }

    fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }
}

/// A row that can be looked up by column key.
pub trait TableRow {
    fn cell(&self, key: &str) -> Option<CellValue>;
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSpec {
    pub title: String,
    pub columns: Vec<Column>,
    pub default_sort: SortSpec,
    pub empty_message: &'static str,
}

/// Table ready for display: headers and formatted cells in sorted order.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTable {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub aligns: Vec<Align>,
    pub rows: Vec<Vec<String>>,
    pub empty_message: &'static str,
}

impl TableSpec {
    /// Sort `rows` in place. Unknown or non-sortable keys leave the order
    /// untouched; ties keep their relative order.
    pub fn sort_rows<R: TableRow>(&self, rows: &mut [R], sort: &SortSpec) {
        let Some(column) = self.columns.iter().find(|c| c.key == sort.key) else {
            return;
        };
        if !column.sortable {
            return;
        }

        let key = column.key;
        let sort_type = column.sort_type;
        rows.sort_by(|a, b| {
            let ordering = compare_cells(a.cell(key), b.cell(key), sort_type);
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    /// Format every cell of `rows` after applying `sort` (or the default).
    pub fn render<R: TableRow + Clone>(&self, rows: &[R], sort: Option<&SortSpec>) -> RenderedTable {
        let mut sorted = rows.to_vec();
        self.sort_rows(&mut sorted, sort.unwrap_or(&self.default_sort));

        let rows = sorted
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| format_cell(row.cell(column.key), column.format))
                    .collect()
            })
            .collect();

        RenderedTable {
            title: self.title.clone(),
            headers: self.columns.iter().map(|c| c.header).collect(),
            aligns: self.columns.iter().map(|c| c.align).collect(),
            rows,
            empty_message: self.empty_message,
        }
    }
}

fn compare_cells(a: Option<CellValue>, b: Option<CellValue>, sort_type: SortType) -> Ordering {
    match sort_type {
        SortType::Number => {
            let a = a.map(|v| v.as_number()).unwrap_or(0.0);
            let b = b.map(|v| v.as_number()).unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        SortType::String => {
            let a = a.map(|v| v.as_text()).unwrap_or_default();
            let b = b.map(|v| v.as_text()).unwrap_or_default();
            a.cmp(&b)
        }
    }
}

fn format_cell(value: Option<CellValue>, format: CellFormat) -> String {
    match (value, format) {
        (None, _) => String::new(),
        (Some(value), CellFormat::Text) => value.as_text(),
        (Some(value), CellFormat::Value(f)) => f.apply(value.as_number()),
    }
}
