// Typed accessors for the analytics endpoints.
// Each accessor derives a cache key, serves live cached data without a
// network call, and otherwise fetches with retry. Terminal failures are
// reported as notices and surface to the caller only as `None`.

use chrono::NaiveDate;

use super::cache::{
    BREAKDOWN_TTL, DETAILS_TTL, LTV_OVERVIEW_TTL, LTV_TTL, OVERVIEW_TTL, TIMELINE_TTL, cache_key,
};
use super::client::ApiClient;
use super::notify::{LoadingFlag, LoadingGuard};
use super::types::{
    CachedPayload, CountryItem, DetailsData, DeviceItem, GroupBy, ListResponse, LtvOverviewData,
    LtvRow, LtvWindow, OverviewData, TimelineItem, TimelineQuery,
};

const OVERVIEW_PATH: &str = "/api/overview";
const TIMELINE_PATH: &str = "/api/timeline";
const COUNTRY_PATH: &str = "/api/country";
const DEVICE_PATH: &str = "/api/device";
const DETAILS_PATH: &str = "/api/details";
const LTV_OVERVIEW_PATH: &str = "/api/ltv/overview";
const LTV_PATH: &str = "/api/ltv";

fn date_params(date: Option<NaiveDate>) -> Vec<(&'static str, String)> {
    match date {
        Some(date) => vec![("date", date.format("%Y-%m-%d").to_string())],
        None => Vec::new(),
    }
}

fn ltv_params(group_by: Option<GroupBy>, window: LtvWindow) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(group_by) = group_by {
        params.push(("groupBy", group_by.as_param().to_string()));
    }
    params.push(("window", window.as_param().to_string()));
    params
}

/// Cache key for the overview accessor.
pub fn overview_key() -> String {
    cache_key(OVERVIEW_PATH, &[])
}

/// Cache key for the timeline accessor.
pub fn timeline_key(query: &TimelineQuery) -> String {
    cache_key(TIMELINE_PATH, &query.params())
}

/// Cache key for the country accessor.
pub fn country_key(date: Option<NaiveDate>) -> String {
    cache_key(COUNTRY_PATH, &date_params(date))
}

/// Cache key for the device accessor.
pub fn device_key(date: Option<NaiveDate>) -> String {
    cache_key(DEVICE_PATH, &date_params(date))
}

/// Cache key for the details accessor.
pub fn details_key(date: NaiveDate) -> String {
    cache_key(DETAILS_PATH, &date_params(Some(date)))
}

/// Cache key for the LTV overview accessor.
pub fn ltv_overview_key() -> String {
    cache_key(LTV_OVERVIEW_PATH, &[])
}

/// Cache key for the grouped LTV accessor.
pub fn ltv_key(group_by: Option<GroupBy>, window: LtvWindow) -> String {
    cache_key(LTV_PATH, &ltv_params(group_by, window))
}

impl ApiClient {
    /// Aggregate counts and revenue.
    pub async fn overview(&self, loading: Option<LoadingFlag>) -> Option<OverviewData> {
        let _guard = LoadingGuard::start(loading);
        let key = overview_key();
        if let Some(CachedPayload::Overview(data)) = self.cache.get(&key) {
            return Some(data);
        }
        match self.get_data::<OverviewData>(OVERVIEW_PATH, &[]).await {
            Ok(data) => {
                self.cache
                    .set(&key, CachedPayload::Overview(data.clone()), OVERVIEW_TTL);
                Some(data)
            }
            Err(err) => {
                self.report_failure(OVERVIEW_PATH, &err);
                None
            }
        }
    }

    /// Ordered per-day metrics for a trailing day count or explicit range.
    pub async fn timeline(
        &self,
        query: &TimelineQuery,
        loading: Option<LoadingFlag>,
    ) -> Option<ListResponse<TimelineItem>> {
        let _guard = LoadingGuard::start(loading);
        let params = query.params();
        let key = cache_key(TIMELINE_PATH, &params);
        if let Some(CachedPayload::Timeline(data)) = self.cache.get(&key) {
            return Some(data);
        }
        match self
            .get_data::<ListResponse<TimelineItem>>(TIMELINE_PATH, &params)
            .await
        {
            Ok(data) => {
                self.cache
                    .set(&key, CachedPayload::Timeline(data.clone()), TIMELINE_TTL);
                Some(data)
            }
            Err(err) => {
                self.report_failure(TIMELINE_PATH, &err);
                None
            }
        }
    }

    /// Per-country breakdown, optionally restricted to one day.
    pub async fn country(
        &self,
        date: Option<NaiveDate>,
        loading: Option<LoadingFlag>,
    ) -> Option<ListResponse<CountryItem>> {
        let _guard = LoadingGuard::start(loading);
        let params = date_params(date);
        let key = cache_key(COUNTRY_PATH, &params);
        if let Some(CachedPayload::Country(data)) = self.cache.get(&key) {
            return Some(data);
        }
        match self
            .get_data::<ListResponse<CountryItem>>(COUNTRY_PATH, &params)
            .await
        {
            Ok(data) => {
                self.cache
                    .set(&key, CachedPayload::Country(data.clone()), BREAKDOWN_TTL);
                Some(data)
            }
            Err(err) => {
                self.report_failure(COUNTRY_PATH, &err);
                None
            }
        }
    }

    /// Per-device-category breakdown, optionally restricted to one day.
    pub async fn device(
        &self,
        date: Option<NaiveDate>,
        loading: Option<LoadingFlag>,
    ) -> Option<ListResponse<DeviceItem>> {
        let _guard = LoadingGuard::start(loading);
        let params = date_params(date);
        let key = cache_key(DEVICE_PATH, &params);
        if let Some(CachedPayload::Device(data)) = self.cache.get(&key) {
            return Some(data);
        }
        match self
            .get_data::<ListResponse<DeviceItem>>(DEVICE_PATH, &params)
            .await
        {
            Ok(data) => {
                self.cache
                    .set(&key, CachedPayload::Device(data.clone()), BREAKDOWN_TTL);
                Some(data)
            }
            Err(err) => {
                self.report_failure(DEVICE_PATH, &err);
                None
            }
        }
    }

    /// Single-day breakdown by country and device.
    pub async fn details(
        &self,
        date: NaiveDate,
        loading: Option<LoadingFlag>,
    ) -> Option<DetailsData> {
        let _guard = LoadingGuard::start(loading);
        let params = date_params(Some(date));
        let key = cache_key(DETAILS_PATH, &params);
        if let Some(CachedPayload::Details(data)) = self.cache.get(&key) {
            return Some(data);
        }
        match self.get_data::<DetailsData>(DETAILS_PATH, &params).await {
            Ok(data) => {
                self.cache
                    .set(&key, CachedPayload::Details(data.clone()), DETAILS_TTL);
                Some(data)
            }
            Err(err) => {
                self.report_failure(DETAILS_PATH, &err);
                None
            }
        }
    }

    /// Lifetime-value summary statistics across the fixed windows.
    pub async fn ltv_overview(&self, loading: Option<LoadingFlag>) -> Option<LtvOverviewData> {
        let _guard = LoadingGuard::start(loading);
        let key = ltv_overview_key();
        if let Some(CachedPayload::LtvOverview(data)) = self.cache.get(&key) {
            return Some(data);
        }
        match self
            .get_data::<LtvOverviewData>(LTV_OVERVIEW_PATH, &[])
            .await
        {
            Ok(data) => {
                self.cache.set(
                    &key,
                    CachedPayload::LtvOverview(data.clone()),
                    LTV_OVERVIEW_TTL,
                );
                Some(data)
            }
            Err(err) => {
                self.report_failure(LTV_OVERVIEW_PATH, &err);
                None
            }
        }
    }

    /// LTV rows grouped by the requested dimension. With no grouping the
    /// backend returns a single aggregate row.
    pub async fn ltv(
        &self,
        group_by: Option<GroupBy>,
        window: LtvWindow,
        loading: Option<LoadingFlag>,
    ) -> Option<ListResponse<LtvRow>> {
        let _guard = LoadingGuard::start(loading);
        let params = ltv_params(group_by, window);
        let key = cache_key(LTV_PATH, &params);
        if let Some(CachedPayload::Ltv(data)) = self.cache.get(&key) {
            return Some(data);
        }
        match self
            .get_data::<ListResponse<LtvRow>>(LTV_PATH, &params)
            .await
        {
            Ok(data) => {
                self.cache
                    .set(&key, CachedPayload::Ltv(data.clone()), LTV_TTL);
                Some(data)
            }
            Err(err) => {
                self.report_failure(LTV_PATH, &err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::notify::{Notice, NoticeLevel};
    use crate::api::retry::MAX_RETRIES;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    /// Client pointed at a loopback port nothing listens on, so any
    /// network attempt fails instead of silently succeeding.
    fn unreachable_client() -> (ApiClient, UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new("http://127.0.0.1:9", tx).unwrap();
        (client, rx)
    }

    fn sample_overview() -> OverviewData {
        OverviewData {
            user_count: 100,
            event_count: 2000,
            device_count: 80,
            total_revenue: 512.25,
        }
    }

    fn drain(rx: &mut UnboundedReceiver<Notice>) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = rx.try_recv() {
            notices.push(notice);
        }
        notices
    }

    /// Minimal one-response-per-connection HTTP server returning `body` for
    /// every request, counting accepted connections. `Connection: close`
    /// keeps the connection count equal to the request count.
    async fn spawn_canned_server(body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 1024];
                let mut request = Vec::new();
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        (format!("http://{}", addr), hits)
    }

    #[tokio::test]
    async fn test_success_is_stored_and_second_call_skips_network() {
        let body = r#"{
            "status": "success",
            "code": 200,
            "message": "ok",
            "data": {
                "user_count": 100,
                "event_count": 2000,
                "device_count": 80,
                "total_revenue": 512.25
            }
        }"#;
        let (base_url, hits) = spawn_canned_server(body).await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(base_url, tx).unwrap();

        let first = client.overview(None).await;
        assert_eq!(first, Some(sample_overview()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Within the TTL the stored payload is served as-is.
        let second = client.overview(None).await;
        assert_eq!(second, first);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_serves_without_network() {
        let (client, mut rx) = unreachable_client();
        let data = sample_overview();
        client.cache.set(
            &overview_key(),
            CachedPayload::Overview(data.clone()),
            OVERVIEW_TTL,
        );

        // The backend is unreachable, so Some(..) proves no call was made.
        let result = client.overview(None).await;
        assert_eq!(result, Some(data));
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_loading_flag_lowered_on_cache_hit() {
        let (client, _rx) = unreachable_client();
        client.cache.set(
            &overview_key(),
            CachedPayload::Overview(sample_overview()),
            OVERVIEW_TTL,
        );

        let flag = LoadingFlag::new();
        client.overview(Some(flag.clone())).await;
        assert!(!flag.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_returns_none_and_reports() {
        let (client, mut rx) = unreachable_client();

        let flag = LoadingFlag::new();
        let result = client.overview(Some(flag.clone())).await;
        assert!(result.is_none());
        assert!(!flag.is_loading());

        let notices = drain(&mut rx);
        // Two retry notices for the transient failures, then one error.
        let infos = notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Info)
            .count();
        let errors = notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .count();
        assert_eq!(infos as u32, MAX_RETRIES);
        assert_eq!(errors, 1);
        assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_refetch_attempt() {
        let (client, _rx) = unreachable_client();
        let key = overview_key();
        client.cache.set(
            &key,
            CachedPayload::Overview(sample_overview()),
            OVERVIEW_TTL,
        );
        assert!(client.overview(None).await.is_some());

        client.invalidate(Some(&key));
        // Entry gone, so the accessor now hits the (dead) network and
        // resolves to an absent result.
        assert!(client.overview(None).await.is_none());
    }

    #[test]
    fn test_key_helpers_match_derivation() {
        assert_eq!(overview_key(), "/api/overview");
        assert_eq!(
            timeline_key(&TimelineQuery::Days(30)),
            "/api/timeline?days=30"
        );
        assert_eq!(
            timeline_key(&TimelineQuery::DateRange {
                start: "2024-01-01".into(),
                end: "2024-01-31".into(),
            }),
            "/api/timeline?dateRange=2024-01-01|2024-01-31"
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(details_key(date), "/api/details?date=2024-03-05");
        assert_eq!(country_key(None), "/api/country");
        assert_eq!(
            ltv_key(Some(GroupBy::Country), LtvWindow::D30),
            "/api/ltv?groupBy=country&window=30d"
        );
        assert_eq!(ltv_key(None, LtvWindow::Total), "/api/ltv?window=total");
    }
}
