use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const UNKNOWN: &str = "Unknown";

// ───── Beacons ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrackPageViewRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Visitor ID required"))]
    pub visitor_id: String,

    #[serde(default)]
    pub page_path: Option<String>,

    #[serde(default)]
    pub page_title: Option<String>,

    #[serde(default)]
    pub device_type: Option<String>,

    #[serde(default)]
    pub browser: Option<String>,

    #[serde(default)]
    pub os: Option<String>,

    #[serde(default)]
    pub referrer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrackDurationRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub visitor_id: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub page_path: String,

    #[serde(default)]
    pub duration: Option<i32>,
}

/// Where the request came from, as reported by the edge in front of the service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub country: String,
    pub city: String,
}

impl Default for GeoLocation {
    fn default() -> Self {
        GeoLocation {
            country: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
        }
    }
}

// ───── Writes ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct VisitorInsert {
    pub visitor_id: String,
    pub country: String,
    pub city: String,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub referrer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageViewInsert {
    pub visitor_id: String,
    pub page_path: Option<String>,
    pub page_title: Option<String>,
}

impl TrackPageViewRequest {
    pub fn into_records(self, geo: GeoLocation) -> (VisitorInsert, PageViewInsert) {
        let visitor = VisitorInsert {
            visitor_id: self.visitor_id.clone(),
            country: geo.country,
            city: geo.city,
            device_type: self.device_type,
            browser: self.browser,
            os: self.os,
            referrer: self.referrer,
        };
        let page_view = PageViewInsert {
            visitor_id: self.visitor_id,
            page_path: self.page_path,
            page_title: self.page_title,
        };
        (visitor, page_view)
    }
}

// ───── Reads ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct VisitorDimensions {
    pub country: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PageViewRecord {
    pub page_path: Option<String>,
    pub page_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCount {
    pub device: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserCount {
    pub browser: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageViews {
    pub path: String,
    pub title: Option<String>,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyViews {
    pub date: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_visitors: u64,
    pub total_page_views: u64,
    pub country_stats: Vec<CountryCount>,
    pub device_stats: Vec<DeviceCount>,
    pub browser_stats: Vec<BrowserCount>,
    pub popular_pages: Vec<PageViews>,
    pub time_series: Vec<DailyViews>,
}
