//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The upstream transport seam and its OpenWeather implementation
//! - The aggregator that turns current conditions plus a 3-hourly forecast
//!   into one record per day
//! - An injectable preference store for front-ends
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod model;
pub mod raw;
pub mod store;
pub mod transport;

pub use aggregator::{DAILY_STRIDE, ForecastAggregator, normalize};
pub use config::Config;
pub use error::{Endpoint, ForecastError, UpstreamFailure};
pub use model::{
    CityQuery, Condition, CurrentConditions, DailyForecast, ForecastResult, Location,
};
pub use store::{FileStore, MemoryStore, PreferenceStore, Theme};
pub use transport::{OpenWeatherTransport, Transport};
