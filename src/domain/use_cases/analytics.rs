use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::{
    entities::analytics::{
        AnalyticsStats, BrowserCount, CountryCount, DailyViews, DeviceCount, GeoLocation,
        PageViewRecord, PageViews, TrackDurationRequest, TrackPageViewRequest, VisitorDimensions,
        UNKNOWN,
    },
    errors::AppError,
    repositories::analytics::AnalyticsRepository,
};

const POPULAR_PAGES_LIMIT: usize = 10;
const TIME_SERIES_DAYS: i64 = 30;

pub struct AnalyticsHandler {
    pub analytics_repo: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsHandler {
    pub fn new(analytics_repo: Arc<dyn AnalyticsRepository>) -> Self {
        AnalyticsHandler { analytics_repo }
    }

    /// Records a page view. The visitor upsert and the page-view insert are
    /// independent writes.
    pub async fn track_page_view(
        &self,
        request: TrackPageViewRequest,
        geo: GeoLocation,
    ) -> Result<(), AppError> {
        request
            .validate()
            .map_err(|_| AppError::InvalidRequest("Visitor ID required".into()))?;

        let (visitor, page_view) = request.into_records(geo);
        self.analytics_repo.upsert_visitor(&visitor).await?;
        self.analytics_repo.insert_page_view(&page_view).await?;

        tracing::debug!(visitor_id = %visitor.visitor_id, "Page view tracked");
        Ok(())
    }

    /// Sets the time spent on the newest matching page view. Last write wins.
    pub async fn record_duration(&self, request: TrackDurationRequest) -> Result<(), AppError> {
        request
            .validate()
            .map_err(|_| AppError::InvalidRequest("Missing required fields".into()))?;

        let matched = self
            .analytics_repo
            .update_latest_duration(&request.visitor_id, &request.page_path, request.duration)
            .await?;

        if !matched {
            tracing::debug!(page_path = %request.page_path, "No page view to attach duration to");
        }
        Ok(())
    }

    /// Recomputes every aggregate from the full history.
    pub async fn stats(&self) -> Result<AnalyticsStats, AppError> {
        let visitors = self.analytics_repo.list_visitor_dimensions().await?;
        let page_views = self.analytics_repo.list_page_views().await?;

        Ok(aggregate_stats(&visitors, &page_views, Utc::now()))
    }
}

pub fn aggregate_stats(
    visitors: &[VisitorDimensions],
    page_views: &[PageViewRecord],
    now: DateTime<Utc>,
) -> AnalyticsStats {
    let country_stats = count_by(visitors.iter().map(|v| v.country.as_deref()))
        .into_iter()
        .map(|(country, count)| CountryCount { country, count })
        .collect();
    let device_stats = count_by(visitors.iter().map(|v| v.device_type.as_deref()))
        .into_iter()
        .map(|(device, count)| DeviceCount { device, count })
        .collect();
    let browser_stats = count_by(visitors.iter().map(|v| v.browser.as_deref()))
        .into_iter()
        .map(|(browser, count)| BrowserCount { browser, count })
        .collect();

    AnalyticsStats {
        total_visitors: visitors.len() as u64,
        total_page_views: page_views.len() as u64,
        country_stats,
        device_stats,
        browser_stats,
        popular_pages: popular_pages(page_views),
        time_series: time_series(page_views, now),
    }
}

/// Counts per value, most frequent first, ties in name order.
fn count_by<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value.unwrap_or(UNKNOWN)).or_default() += 1;
    }

    let mut counts: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn popular_pages(page_views: &[PageViewRecord]) -> Vec<PageViews> {
    let mut pages: BTreeMap<&str, PageViews> = BTreeMap::new();
    for view in page_views {
        let path = view.page_path.as_deref().unwrap_or(UNKNOWN);
        pages
            .entry(path)
            .or_insert_with(|| PageViews {
                path: path.to_string(),
                title: view.page_title.clone(),
                views: 0,
            })
            .views += 1;
    }

    let mut pages: Vec<PageViews> = pages.into_values().collect();
    pages.sort_by(|a, b| b.views.cmp(&a.views));
    pages.truncate(POPULAR_PAGES_LIMIT);
    pages
}

/// Page views per UTC day over the trailing window, oldest first.
fn time_series(page_views: &[PageViewRecord], now: DateTime<Utc>) -> Vec<DailyViews> {
    let since = now - Duration::days(TIME_SERIES_DAYS);

    let mut days: BTreeMap<String, u64> = BTreeMap::new();
    for view in page_views.iter().filter(|v| v.created_at >= since) {
        *days.entry(view.created_at.format("%Y-%m-%d").to_string()).or_default() += 1;
    }

    days.into_iter()
        .map(|(date, views)| DailyViews { date, views })
        .collect()
}

/// Derives the pseudo-identifier a browser reports as `visitorId`.
///
/// An id the browser already stored always wins. Otherwise the characteristics
/// are joined with `|` and folded with the 32-bit `hash * 31 + unit` rolling
/// hash over UTF-16 code units, giving `visitor_<abs hash>_<millis>`.
pub fn derive_visitor_id(stored: Option<&str>, characteristics: &[&str], now_millis: i64) -> String {
    if let Some(id) = stored.filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let joined = characteristics.join("|");
    let hash = joined
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));

    format!("visitor_{}_{}", hash.unsigned_abs(), now_millis)
}
