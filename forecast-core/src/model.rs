use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// A non-empty city name, passed verbatim to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    pub fn new(city: &str) -> Result<Self, ForecastError> {
        if city.trim().is_empty() {
            return Err(ForecastError::InvalidQuery);
        }
        Ok(Self(city.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CityQuery {
    type Error = ForecastError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        CityQuery::new(value)
    }
}

/// Location as resolved by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
}

/// Primary weather descriptor of a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub category: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

/// One downsampled day.
///
/// `sunrise` and `sunset` come from the current-conditions call and are the
/// same for every record of a [`ForecastResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub timestamp: i64,
    pub location: Location,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub condition: Condition,
    pub wind_speed: f64,
    pub sunrise: i64,
    pub sunset: i64,
}

impl DailyForecast {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.timestamp)
    }

    pub fn sunrise_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunrise)
    }

    pub fn sunset_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunset)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub city: String,
    pub daily: Vec<DailyForecast>,
}

impl ForecastResult {
    /// First sample; always present on a successfully built result.
    pub fn today(&self) -> Option<&DailyForecast> {
        self.daily.first()
    }

    pub fn day(&self, index: usize) -> Option<&DailyForecast> {
        self.daily.get(index)
    }
}

/// Current conditions as shown before drilling into the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub city: String,
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub condition: Condition,
    pub wind_speed: f64,
    pub sunrise: i64,
    pub sunset: i64,
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}
