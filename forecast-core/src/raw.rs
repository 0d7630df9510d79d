//! Wire shapes of the OpenWeather `weather` and `forecast` payloads.
//!
//! Only the fields the aggregator reads are declared; everything else in the
//! payload is ignored by serde.

use serde::Deserialize;

use crate::{
    error::{Endpoint, ForecastError},
    model::Condition,
};

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwWeather {
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl From<&OwWeather> for Condition {
    fn from(w: &OwWeather) -> Self {
        Condition {
            category: w.main.clone(),
            description: w.description.clone(),
            icon: w.icon.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwSys {
    pub sunrise: i64,
    pub sunset: i64,
}

/// The part of `GET /weather` the forecast merge needs: `sys.sunrise` and
/// `sys.sunset`. Every other field may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSunTimes {
    pub(crate) sys: OwSys,
}

impl RawSunTimes {
    pub fn sunrise(&self) -> i64 {
        self.sys.sunrise
    }

    pub fn sunset(&self) -> i64 {
        self.sys.sunset
    }
}

/// `GET /weather`, as shown by the current-conditions view.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrentConditions {
    pub(crate) name: String,
    pub(crate) dt: i64,
    pub(crate) main: OwMain,
    pub(crate) weather: Vec<OwWeather>,
    pub(crate) wind: OwWind,
    pub(crate) sys: OwSys,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwCity {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawForecastStep {
    pub dt: i64,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
}

/// `GET /forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastResponse {
    pub(crate) city: OwCity,
    pub(crate) list: Vec<RawForecastStep>,
}

impl RawForecastResponse {
    pub fn step_count(&self) -> usize {
        self.list.len()
    }
}

pub fn parse_sun_times(body: &str) -> Result<RawSunTimes, ForecastError> {
    serde_json::from_str(body)
        .map_err(|e| ForecastError::malformed(Endpoint::CurrentConditions, e.to_string()))
}

pub fn parse_current(body: &str) -> Result<RawCurrentConditions, ForecastError> {
    serde_json::from_str(body)
        .map_err(|e| ForecastError::malformed(Endpoint::CurrentConditions, e.to_string()))
}

/// Parses the forecast payload; an empty step list is rejected here.
pub fn parse_forecast(body: &str) -> Result<RawForecastResponse, ForecastError> {
    let parsed: RawForecastResponse = serde_json::from_str(body)
        .map_err(|e| ForecastError::malformed(Endpoint::Forecast, e.to_string()))?;

    if parsed.list.is_empty() {
        return Err(ForecastError::malformed(
            Endpoint::Forecast,
            "forecast step list is empty",
        ));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_payload_ignores_unknown_fields() {
        let body = r#"{
            "coord": {"lon": 2.35, "lat": 48.85},
            "name": "Paris",
            "dt": 1700000000,
            "main": {"temp": 9.1, "feels_like": 7.0, "humidity": 81, "pressure": 1009, "temp_min": 8.0},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "wind": {"speed": 4.1, "deg": 220},
            "sys": {"country": "FR", "sunrise": 1699943000, "sunset": 1699977000}
        }"#;

        let parsed = parse_current(body).expect("valid payload");
        assert_eq!(parsed.sys.sunrise, 1699943000);
        assert_eq!(parsed.sys.sunset, 1699977000);
        assert_eq!(parsed.main.pressure, 1009.0);
    }

    #[test]
    fn sun_times_need_only_sys() {
        let parsed = parse_sun_times(r#"{"sys": {"sunrise": 900, "sunset": 66600}}"#)
            .expect("sys alone is enough");
        assert_eq!(parsed.sunrise(), 900);
        assert_eq!(parsed.sunset(), 66600);
    }

    #[test]
    fn sun_times_without_sunset_are_malformed() {
        let err = parse_sun_times(r#"{"sys": {"sunrise": 900}}"#).unwrap_err();
        assert_eq!(err.endpoint(), Some(Endpoint::CurrentConditions));
    }

    #[test]
    fn fractional_humidity_and_pressure_are_accepted() {
        let body = r#"{"city": {"name": "Paris", "country": "FR"}, "list": [{
            "dt": 1, "main": {"temp": 1.0, "feels_like": 1.0, "humidity": 64.5, "pressure": 1012.5},
            "weather": [], "wind": {"speed": 1.0}}]}"#;

        let parsed = parse_forecast(body).expect("fractional values are numeric");
        assert_eq!(parsed.list[0].main.humidity, 64.5);
        assert_eq!(parsed.list[0].main.pressure, 1012.5);
    }

    #[test]
    fn current_payload_without_sys_is_malformed() {
        let body = r#"{"name": "Paris", "dt": 1, "main": {"temp": 1.0, "feels_like": 1.0, "humidity": 1, "pressure": 1},
                       "weather": [], "wind": {"speed": 1.0}}"#;

        let err = parse_current(body).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::MalformedUpstreamResponse {
                endpoint: Endpoint::CurrentConditions,
                ..
            }
        ));
    }

    #[test]
    fn empty_forecast_list_is_malformed() {
        let body = r#"{"city": {"name": "Paris", "country": "FR"}, "list": []}"#;

        let err = parse_forecast(body).unwrap_err();
        match err {
            ForecastError::MalformedUpstreamResponse { endpoint, reason } => {
                assert_eq!(endpoint, Endpoint::Forecast);
                assert!(reason.contains("empty"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_type_in_forecast_is_malformed() {
        let body = r#"{"city": {"name": "Paris", "country": "FR"}, "list": "nope"}"#;

        assert!(matches!(
            parse_forecast(body),
            Err(ForecastError::MalformedUpstreamResponse { .. })
        ));
    }
}
