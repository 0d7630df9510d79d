use chrono::{DateTime, Local, Utc};
use forecast_core::{CurrentConditions, DailyForecast, ForecastResult};

pub fn summary(result: &ForecastResult) -> String {
    let mut out = format!("{}-day forecast for {}\n", result.daily.len(), result.city);

    for (index, day) in result.daily.iter().enumerate() {
        out.push_str(&format!(
            "  [{index}] {:<12} {:>6.1}°C  {}\n",
            day_label(index, day),
            day.temperature,
            day.condition.description
        ));
    }

    out
}

pub fn day_detail(index: usize, day: &DailyForecast) -> String {
    [
        format!(
            "{} in {}, {}",
            day_label(index, day),
            day.location.city,
            day.location.country
        ),
        format!("  {} ({})", day.condition.description, day.condition.category),
        format!("  Temperature: {:.1}°C", day.temperature),
        format!("  Feels like:  {:.1}°C", day.feels_like),
        format!("  Humidity:    {}%", day.humidity),
        format!("  Pressure:    {} hPa", day.pressure),
        format!("  Wind:        {} m/s", day.wind_speed),
        format!("  Sunrise:     {}", clock(day.sunrise_at())),
        format!("  Sunset:      {}", clock(day.sunset_at())),
        format!("  Icon:        {}", day.condition.icon_url()),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

pub fn current(c: &CurrentConditions) -> String {
    [
        format!("Now in {}", c.city),
        format!("  {:.1}°C, {}", c.temperature, c.condition.description),
        format!("  Feels like {:.1}°C, humidity {}%", c.feels_like, c.humidity),
        format!("  Wind {} m/s, pressure {} hPa", c.wind_speed, c.pressure),
        format!(
            "  Sunrise {}, sunset {}",
            clock(DateTime::<Utc>::from_timestamp(c.sunrise, 0)),
            clock(DateTime::<Utc>::from_timestamp(c.sunset, 0))
        ),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

fn day_label(index: usize, day: &DailyForecast) -> String {
    match index {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => day
            .observed_at()
            .map(|t| t.with_timezone(&Local).format("%a %d %b").to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    }
}

fn clock(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
