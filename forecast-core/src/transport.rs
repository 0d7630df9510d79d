use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::Endpoint, error::ForecastError, model::CityQuery};

pub mod openweather;

pub use openweather::OpenWeatherTransport;

/// Fetches the raw body of one upstream endpoint for a city.
///
/// Implementations map transport failures and non-success statuses to
/// [`ForecastError::UpstreamUnavailable`] for the given endpoint, and return
/// the body untouched otherwise. Parsing is left to the caller.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, endpoint: Endpoint, city: &CityQuery) -> Result<String, ForecastError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn get(&self, endpoint: Endpoint, city: &CityQuery) -> Result<String, ForecastError> {
        (**self).get(endpoint, city).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, endpoint: Endpoint, city: &CityQuery) -> Result<String, ForecastError> {
        (**self).get(endpoint, city).await
    }
}
