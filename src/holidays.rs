//! Public holiday data: provider client, cached source and the holiday set
//!
//! The provider answers `GET <base>/<year>` with a JSON array of
//! `{"date": "YYYY-MM-DD", "nom_jour_ferie": "..."}` records.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::HolidayCache;
use crate::config::Config;
use crate::error::HolidayError;

/// One public holiday as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: String,
    #[serde(rename = "nom_jour_ferie", alias = "name", default)]
    pub name: String,
}

/// Dates of the public holidays of one year, as `YYYY-MM-DD` strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    year: Option<i32>,
    dates: HashSet<String>,
}

impl HolidaySet {
    /// Set used before any fetch has resolved
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_holidays(year: i32, holidays: &[Holiday]) -> Self {
        HolidaySet {
            year: Some(year),
            dates: holidays.iter().map(|h| h.date.clone()).collect(),
        }
    }

    /// Year the set belongs to, `None` while unresolved
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.contains_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn contains_str(&self, date: &str) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        HolidaySet {
            year: None,
            dates: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Anything able to produce the holidays of a year
#[async_trait]
pub trait HolidaySource: Send + Sync {
    async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayError>;
}

/// Parse a provider response body, rejecting entries whose date is not a
/// valid `YYYY-MM-DD` calendar date
pub fn parse_holidays(year: i32, body: &str) -> Result<Vec<Holiday>, HolidayError> {
    let holidays: Vec<Holiday> =
        serde_json::from_str(body).map_err(|e| HolidayError::InvalidResponse {
            year,
            reason: e.to_string(),
        })?;

    for holiday in &holidays {
        if NaiveDate::parse_from_str(&holiday.date, "%Y-%m-%d").is_err() {
            return Err(HolidayError::InvalidResponse {
                year,
                reason: format!("invalid date '{}'", holiday.date),
            });
        }
    }

    Ok(holidays)
}

/// HTTP client for the public holiday provider
pub struct HolidayClient {
    client: Client,
    base_url: String,
}

impl HolidayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HolidayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HolidayClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, HolidayError> {
        Self::new(
            config.holiday_api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn url_for(&self, year: i32) -> String {
        format!("{}/{:04}", self.base_url, year)
    }
}

#[async_trait]
impl HolidaySource for HolidayClient {
    async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        let url = self.url_for(year);
        tracing::debug!(%url, "Fetching public holidays");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| HolidayError::ConnectionFailed {
                year,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(HolidayError::BadStatus {
                year,
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| HolidayError::ConnectionFailed {
                year,
                reason: e.to_string(),
            })?;

        let holidays = parse_holidays(year, &body)?;
        tracing::info!(year, count = holidays.len(), "Fetched public holidays");
        Ok(holidays)
    }
}

/// Read-through wrapper storing successful fetches in the on-disk cache
pub struct CachedHolidaySource<S> {
    inner: S,
    cache: Arc<Mutex<HolidayCache>>,
    max_age_hours: i64,
}

impl<S: HolidaySource> CachedHolidaySource<S> {
    pub fn new(inner: S, cache: HolidayCache) -> Self {
        CachedHolidaySource {
            inner,
            cache: Arc::new(Mutex::new(cache)),
            max_age_hours: crate::cache::DEFAULT_MAX_AGE_HOURS,
        }
    }

    pub fn with_max_age_hours(mut self, hours: i64) -> Self {
        self.max_age_hours = hours;
        self
    }

    /// Ignore cached years, still storing what is fetched
    pub fn refreshing(self) -> Self {
        self.with_max_age_hours(-1)
    }

    fn cached(&self, year: i32) -> Option<Vec<Holiday>> {
        let cache = self.cache.lock().ok()?;
        if cache.is_stale(year, self.max_age_hours) {
            return None;
        }
        cache.get(year).map(|entry| entry.holidays.clone())
    }

    fn store(&self, year: i32, holidays: &[Holiday]) {
        let Ok(mut cache) = self.cache.lock() else {
            return;
        };
        cache.insert(year, holidays.to_vec());
        if let Err(e) = cache.save() {
            tracing::warn!(year, error = %e, "Failed to save holiday cache");
        }
    }
}

#[async_trait]
impl<S: HolidaySource> HolidaySource for CachedHolidaySource<S> {
    async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        if let Some(holidays) = self.cached(year) {
            tracing::debug!(year, "Holiday cache hit");
            return Ok(holidays);
        }

        let holidays = self.inner.fetch_holidays(year).await?;
        self.store(year, &holidays);
        Ok(holidays)
    }
}

/// Serves only what the on-disk cache already holds, whatever its age
pub struct OfflineHolidaySource {
    cache: HolidayCache,
}

impl OfflineHolidaySource {
    pub fn new(cache: HolidayCache) -> Self {
        OfflineHolidaySource { cache }
    }
}

#[async_trait]
impl HolidaySource for OfflineHolidaySource {
    async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        self.cache
            .get(year)
            .map(|entry| entry.holidays.clone())
            .ok_or(HolidayError::NotCached(year))
    }
}
