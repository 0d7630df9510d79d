use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    error::{Endpoint, ForecastError},
    model::CityQuery,
};

use super::Transport;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherTransport {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherTransport {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the transport at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the HTTP client with one that enforces a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for OpenWeatherTransport {
    async fn get(&self, endpoint: Endpoint, city: &CityQuery) -> Result<String, ForecastError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        debug!(%endpoint, city = %city, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                // reqwest errors embed the request URL, which carries `appid`.
                let e = e.without_url();
                warn!(%endpoint, error = %e, "OpenWeather request failed");
                ForecastError::transport(endpoint, e)
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ForecastError::transport(endpoint, e.without_url()))?;

        if !status.is_success() {
            warn!(%endpoint, status = status.as_u16(), "OpenWeather returned an error status");
            return Err(ForecastError::status(endpoint, status.as_u16(), &body));
        }

        debug!(%endpoint, bytes = body.len(), "OpenWeather response received");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let t = OpenWeatherTransport::new("KEY".into()).with_base_url("http://localhost:1234/");
        assert_eq!(t.base_url(), "http://localhost:1234");
    }

    #[test]
    fn default_base_url_is_openweather() {
        let t = OpenWeatherTransport::new("KEY".into());
        assert_eq!(t.base_url(), DEFAULT_BASE_URL);
    }
}
