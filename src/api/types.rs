// Analytics API response types.
// Defines the response envelope and the closed set of per-endpoint payloads.

use serde::{Deserialize, Serialize};

/// Envelope status discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

/// Uniform wrapper around every backend response.
///
/// `status != "success"` is a logical failure even when the HTTP status
/// was 200, so callers must check it before touching `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub status: EnvelopeStatus,
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Aggregate counts and revenue for the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewData {
    pub user_count: u64,
    pub event_count: u64,
    pub device_count: u64,
    pub total_revenue: f64,
}

/// List payload with a total row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// One day of the metrics timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub date: String,
    pub user_count: u64,
    pub event_count: u64,
    pub revenue: f64,
    #[serde(default)]
    pub device_count: u64,
}

/// Per-country breakdown row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryItem {
    pub country: String,
    pub users: u64,
    pub revenue: f64,
}

/// Per-device-category breakdown row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceItem {
    pub device: String,
    pub users: u64,
    pub revenue: f64,
}

/// User count for one country within a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryUsers {
    pub country: String,
    pub users: u64,
}

/// User count for one device category within a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUsers {
    pub device: String,
    pub users: u64,
}

/// Single-day breakdown by country and device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsData {
    pub date: String,
    pub total_revenue: f64,
    #[serde(default)]
    pub countries: Vec<CountryUsers>,
    #[serde(default)]
    pub devices: Vec<DeviceUsers>,
}

/// Cumulative revenue per user over the fixed LTV windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LtvWindows {
    pub ltv_1d: f64,
    pub ltv_7d: f64,
    pub ltv_14d: f64,
    pub ltv_30d: f64,
    pub ltv_60d: f64,
    pub ltv_90d: f64,
    pub ltv_total: f64,
}

impl LtvWindows {
    /// Value for one window, used when a single window is in focus.
    pub fn value(&self, window: LtvWindow) -> f64 {
        match window {
            LtvWindow::D1 => self.ltv_1d,
            LtvWindow::D7 => self.ltv_7d,
            LtvWindow::D14 => self.ltv_14d,
            LtvWindow::D30 => self.ltv_30d,
            LtvWindow::D60 => self.ltv_60d,
            LtvWindow::D90 => self.ltv_90d,
            LtvWindow::Total => self.ltv_total,
        }
    }
}

/// LTV summary statistics across all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtvOverviewData {
    pub user_count: u64,
    pub paying_user_count: u64,
    pub avg: LtvWindows,
}

/// One grouped LTV row (by country, device, date, or the aggregate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtvRow {
    pub group: String,
    pub users: u64,
    #[serde(flatten)]
    pub windows: LtvWindows,
}

/// Grouping dimension for LTV rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Country,
    Device,
    Date,
}

impl GroupBy {
    /// Query parameter value.
    pub fn as_param(&self) -> &'static str {
        match self {
            GroupBy::Country => "country",
            GroupBy::Device => "device",
            GroupBy::Date => "date",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroupBy::Country => "Country",
            GroupBy::Device => "Device",
            GroupBy::Date => "Date",
        }
    }
}

/// Elapsed-time window since first purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LtvWindow {
    D1,
    D7,
    D14,
    #[default]
    D30,
    D60,
    D90,
    Total,
}

impl LtvWindow {
    pub const ALL: [LtvWindow; 7] = [
        LtvWindow::D1,
        LtvWindow::D7,
        LtvWindow::D14,
        LtvWindow::D30,
        LtvWindow::D60,
        LtvWindow::D90,
        LtvWindow::Total,
    ];

    /// Query parameter value.
    pub fn as_param(&self) -> &'static str {
        match self {
            LtvWindow::D1 => "1d",
            LtvWindow::D7 => "7d",
            LtvWindow::D14 => "14d",
            LtvWindow::D30 => "30d",
            LtvWindow::D60 => "60d",
            LtvWindow::D90 => "90d",
            LtvWindow::Total => "total",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LtvWindow::D1 => "1 day",
            LtvWindow::D7 => "7 days",
            LtvWindow::D14 => "14 days",
            LtvWindow::D30 => "30 days",
            LtvWindow::D60 => "60 days",
            LtvWindow::D90 => "90 days",
            LtvWindow::Total => "Total",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            LtvWindow::D1 => LtvWindow::D7,
            LtvWindow::D7 => LtvWindow::D14,
            LtvWindow::D14 => LtvWindow::D30,
            LtvWindow::D30 => LtvWindow::D60,
            LtvWindow::D60 => LtvWindow::D90,
            LtvWindow::D90 => LtvWindow::Total,
            LtvWindow::Total => LtvWindow::D1,
        }
    }
}

/// Timeline range selector: a trailing day count or an explicit range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineQuery {
    Days(u32),
    DateRange { start: String, end: String },
}

impl TimelineQuery {
    /// Query parameters for the timeline endpoint. The two forms produce
    /// different parameter names and therefore distinct cache keys.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            TimelineQuery::Days(days) => vec![("days", days.to_string())],
            TimelineQuery::DateRange { start, end } => {
                vec![("dateRange", format!("{}|{}", start, end))]
            }
        }
    }
}

/// Closed set of cacheable payloads, tagged by endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
    Overview(OverviewData),
    Timeline(ListResponse<TimelineItem>),
    Country(ListResponse<CountryItem>),
    Device(ListResponse<DeviceItem>),
    Details(DetailsData),
    LtvOverview(LtvOverviewData),
    Ltv(ListResponse<LtvRow>),
}
