//! OSRM HTTP adapter for route legs.

use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::polyline::DEFAULT_PRECISION;
use crate::traits::{Leg, LegProvider};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Additional attempts after a transport failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubled on every further attempt.
    pub retry_base_delay_ms: u64,
    /// Upper bound on a single retry delay.
    pub max_retry_delay_ms: u64,
    /// Precision of the returned geometry (5 = `polyline`, 6 = `polyline6`).
    pub geometry_precision: u32,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
            max_retries: 3,
            retry_base_delay_ms: 500,
            max_retry_delay_ms: 30_000,
            geometry_precision: DEFAULT_PRECISION,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingError> {
        if !matches!(config.geometry_precision, 5 | 6) {
            return Err(RoutingError::UnsupportedPrecision(config.geometry_precision));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RoutingError::Client)?;

        Ok(Self { config, client })
    }

    /// Delay before retry number `attempt` (1-based), doubling from the base
    /// delay and saturating at `max_retry_delay_ms`.
    fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let delay = self
            .config
            .retry_base_delay_ms
            .saturating_mul(factor)
            .min(self.config.max_retry_delay_ms);
        Duration::from_millis(delay)
    }

    fn route_url(&self, from: (f64, f64), to: (f64, f64)) -> String {
        let mut url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.1,
            from.0,
            to.1,
            to.0
        );
        if self.config.geometry_precision == 6 {
            url.push_str("&geometries=polyline6");
        }
        url
    }

    fn request_leg(&self, url: &str) -> Result<Leg, RoutingError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| RoutingError::Unavailable(err.to_string()))?;

        let status = response.status();
        let body = match response.json::<OsrmRouteResponse>() {
            Ok(body) => body,
            Err(err) if status.is_server_error() || status.as_u16() == 429 => {
                return Err(RoutingError::Unavailable(format!("HTTP {}: {}", status, err)));
            }
            Err(err) => {
                return Err(RoutingError::MalformedResponse(format!(
                    "HTTP {}: {}",
                    status, err
                )));
            }
        };

        if body.code != "Ok" {
            return Err(RoutingError::Service {
                code: body.code,
                message: body.message.unwrap_or_default(),
            });
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::MalformedResponse("response has no routes".into()))?;
        let leg = route
            .legs
            .first()
            .ok_or_else(|| RoutingError::MalformedResponse("route has no legs".into()))?;

        Ok(Leg {
            distance: leg.distance,
            geometry: route.geometry,
        })
    }
}

impl LegProvider for OsrmClient {
    fn fetch_leg(&self, from: (f64, f64), to: (f64, f64)) -> Result<Leg, RoutingError> {
        let url = self.route_url(from, to);
        let mut attempt = 0;

        loop {
            debug!(%url, attempt, "requesting OSRM route");
            match self.request_leg(&url) {
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.retry_delay(attempt);
                    warn!(
                        %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying OSRM route"
                    );
                    thread::sleep(delay);
                }
                result => return result,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
}
