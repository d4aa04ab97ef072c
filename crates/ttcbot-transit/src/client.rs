//! HTTP client for the municipal transit gateway.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use ttcbot_core::{BotError, Result};

use crate::model::{Arrival, PassengerStats, Route, Stop, StopDetail};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Feed id prefix the gateway expects in front of stop codes.
const FEED_PREFIX: &str = "1";

/// Pattern suffix selecting the primary direction of a route.
const DEFAULT_PATTERN_SUFFIX: &str = "1:01";

/// Typed client for the transit gateway endpoints the bot consumes.
#[derive(Clone)]
pub struct TransitClient {
    client: Client,
    base_url: String,
    stats_url: String,
    api_key: String,
    locale: String,
}

impl TransitClient {
    pub fn new(
        base_url: impl Into<String>,
        stats_url: impl Into<String>,
        api_key: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            stats_url: stats_url.into(),
            api_key: api_key.into(),
            locale: locale.into(),
        }
    }

    /// All bus routes.
    pub async fn routes(&self) -> Result<Vec<Route>> {
        let url = format!(
            "{}/v3/routes?modes=BUS&locale={}",
            self.base_url, self.locale
        );
        self.get_json(&url).await
    }

    /// All stops, including rows the gateway publishes without a code.
    pub async fn stops(&self) -> Result<Vec<Stop>> {
        let url = format!("{}/v2/stops?locale={}", self.base_url, self.locale);
        self.get_json(&url).await
    }

    /// Detail record for one stop code.
    pub async fn stop_info(&self, code: &str) -> Result<StopDetail> {
        let url = format!(
            "{}/v2/stops/{FEED_PREFIX}:{code}?locale={}",
            self.base_url, self.locale
        );
        self.get_json(&url).await
    }

    /// Upcoming arrivals at one stop, soonest first, unknown ETAs last.
    pub async fn arrivals(&self, code: &str) -> Result<Vec<Arrival>> {
        let url = format!(
            "{}/v2/stops/{FEED_PREFIX}:{code}/arrival-times?locale={}",
            self.base_url, self.locale
        );
        let mut arrivals: Vec<Arrival> = self.get_json(&url).await?;
        arrivals.sort_by_key(Arrival::sort_key);
        Ok(arrivals)
    }

    /// The stop sequence of one route's primary pattern.
    pub async fn route_stops(&self, route_id: &str) -> Result<Vec<Stop>> {
        let url = format!(
            "{}/v3/routes/{route_id}/stops?patternSuffix={DEFAULT_PATTERN_SUFFIX}&locale={}",
            self.base_url, self.locale
        );
        self.get_json(&url).await
    }

    /// City-wide passenger statistics.
    pub async fn passenger_stats(&self) -> Result<PassengerStats> {
        self.get_json(&self.stats_url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "transit request");
        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(BotError::api_status(status.as_u16(), body));
        }

        let parsed = response.json::<T>().await.map_err(|err| {
            BotError::Serialization {
                format: "JSON".to_string(),
                message: format!("transit gateway response: {err}"),
            }
        })?;
        Ok(parsed)
    }
}
