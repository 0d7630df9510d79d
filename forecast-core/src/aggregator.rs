//! Merges the current-conditions and 3-hourly forecast payloads into one
//! daily forecast sequence.

use tracing::{debug, info};

use crate::{
    error::{Endpoint, ForecastError},
    model::{CityQuery, Condition, CurrentConditions, DailyForecast, ForecastResult, Location},
    raw::{self, RawForecastResponse, RawSunTimes},
    transport::Transport,
};

/// Number of 3-hour steps between two daily samples.
pub const DAILY_STRIDE: usize = 8;

#[derive(Debug, Clone)]
pub struct ForecastAggregator<T> {
    transport: T,
}

impl<T: Transport> ForecastAggregator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch both endpoints for `city` and build its daily forecast.
    ///
    /// The forecast endpoint is only queried once the current-conditions
    /// request has succeeded. Dropping the returned future abandons the call
    /// without producing anything.
    pub async fn fetch_forecast(&self, city: &str) -> Result<ForecastResult, ForecastError> {
        let query = CityQuery::new(city)?;

        let current_body = self
            .transport
            .get(Endpoint::CurrentConditions, &query)
            .await?;
        let forecast_body = self.transport.get(Endpoint::Forecast, &query).await?;

        let sun = raw::parse_sun_times(&current_body)?;
        let forecast = raw::parse_forecast(&forecast_body)?;
        debug!(
            city = %query,
            steps = forecast.step_count(),
            "parsed upstream payloads"
        );

        let result = normalize(&sun, &forecast)?;
        info!(city = %result.city, days = result.daily.len(), "forecast ready");
        Ok(result)
    }

    /// Current conditions only; one request.
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, ForecastError> {
        let query = CityQuery::new(city)?;
        let body = self
            .transport
            .get(Endpoint::CurrentConditions, &query)
            .await?;
        let parsed = raw::parse_current(&body)?;

        let primary = parsed.weather.first().ok_or_else(|| {
            ForecastError::malformed(Endpoint::CurrentConditions, "weather list is empty")
        })?;

        Ok(CurrentConditions {
            city: parsed.name.clone(),
            timestamp: parsed.dt,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            condition: Condition::from(primary),
            wind_speed: parsed.wind.speed,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
        })
    }
}

/// Downsample `forecast` to one step in every [`DAILY_STRIDE`], starting at
/// index 0, and attach the location and the single sunrise/sunset pair.
pub fn normalize(
    sun: &RawSunTimes,
    forecast: &RawForecastResponse,
) -> Result<ForecastResult, ForecastError> {
    if forecast.list.is_empty() {
        return Err(ForecastError::malformed(
            Endpoint::Forecast,
            "forecast step list is empty",
        ));
    }

    let location = Location {
        city: forecast.city.name.clone(),
        country: forecast.city.country.clone(),
    };
    let (sunrise, sunset) = (sun.sunrise(), sun.sunset());

    let daily = forecast
        .list
        .iter()
        .enumerate()
        .step_by(DAILY_STRIDE)
        .map(|(index, step)| {
            let primary = step.weather.first().ok_or_else(|| {
                ForecastError::malformed(
                    Endpoint::Forecast,
                    format!("step {index} has an empty weather list"),
                )
            })?;

            Ok(DailyForecast {
                timestamp: step.dt,
                location: location.clone(),
                temperature: step.main.temp,
                feels_like: step.main.feels_like,
                humidity: step.main.humidity,
                pressure: step.main.pressure,
                condition: Condition::from(primary),
                wind_speed: step.wind.speed,
                sunrise,
                sunset,
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(ForecastResult {
        city: location.city,
        daily,
    })
}
