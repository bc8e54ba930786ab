use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::NasaPowerConfig;
use crate::errors::{Result, SizingError};
use crate::models::irradiance::{
    MonthlyPointQuery, MonthlyPointResponse, MonthlySeries, Parameter, YearRange,
};

const MONTHLY_POINT_PATH: &str = "/api/temporal/monthly/point";

/// Anything that can answer a monthly-point query with a decoded JSON document
#[async_trait]
pub trait PowerDataSource: Send + Sync {
    async fn fetch_document(&self, query: &MonthlyPointQuery) -> Result<Value>;
}

/// NASA POWER REST client
#[derive(Debug, Clone)]
pub struct NasaPowerClient {
    client: Client,
    base_url: String,
}

impl NasaPowerClient {
    /// Returns a new client
    ///
    /// # Arguments
    ///
    /// * 'base_url' - scheme and host of the service, e.g. https://power.larc.nasa.gov
    /// * 'timeout' - upper bound for a whole request
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SizingError::RemoteService(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &NasaPowerConfig) -> Result<Self> {
        info!(
            "[POWER] Using {} (timeout {}s)",
            config.base_url, config.timeout_secs
        );
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl PowerDataSource for NasaPowerClient {
    async fn fetch_document(&self, query: &MonthlyPointQuery) -> Result<Value> {
        let url = format!("{}{}", self.base_url, MONTHLY_POINT_PATH);
        debug!(
            "[POWER] GET {} parameter={} lat={} lon={} years={}..{}",
            url, query.parameter, query.latitude, query.longitude, query.years.start, query.years.end
        );

        let response = self
            .client
            .get(&url)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("[POWER] Status {}: {}", status, body);
            return Err(SizingError::RemoteService(format!("status {}: {}", status, body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SizingError::MalformedResponse(format!("body is not JSON: {}", e)))
    }
}

/// Pulls the `properties.parameter.<code>` map out of a document and cleans it
pub fn series_from_document(document: Value, parameter: Parameter) -> Result<MonthlySeries> {
    let mut decoded: MonthlyPointResponse = serde_json::from_value(document)
        .map_err(|e| SizingError::MalformedResponse(format!("unexpected document shape: {}", e)))?;

    let raw = decoded
        .properties
        .parameter
        .remove(parameter.code())
        .ok_or_else(|| {
            SizingError::MalformedResponse(format!("parameter {} missing from response", parameter))
        })?;

    MonthlySeries::from_raw(&raw)
}

/// One round trip to the source, returning the cleaned monthly series
pub async fn fetch_series(source: &dyn PowerDataSource, query: &MonthlyPointQuery) -> Result<MonthlySeries> {
    let document = source.fetch_document(query).await?;
    series_from_document(document, query.parameter)
}

/// Mean of the valid monthly readings for one parameter at one location
///
/// Fails with `MalformedResponse` when no month survives cleaning.
pub async fn fetch_mean_monthly(
    source: &dyn PowerDataSource,
    parameter: Parameter,
    longitude: f64,
    latitude: f64,
    years: YearRange,
) -> Result<f64> {
    let query = MonthlyPointQuery { parameter, longitude, latitude, years };
    let series = fetch_series(source, &query).await?;

    let mean = series.mean().ok_or_else(|| {
        SizingError::MalformedResponse(format!(
            "no valid monthly values for {} in {}..{}",
            parameter, years.start, years.end
        ))
    })?;

    info!(
        "[POWER] {} at ({:.4}, {:.4}): {} of {} months valid, mean {:.4}",
        parameter,
        latitude,
        longitude,
        series.valid().count(),
        series.readings.len(),
        mean
    );
    Ok(mean)
}
