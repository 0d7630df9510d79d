use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, ForecastAggregator, ForecastError, OpenWeatherTransport, PreferenceStore, Theme,
    store::FileStore,
};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Multi-day weather forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show the daily forecast for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris, FR". Defaults to the last searched city.
        city: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one day of the forecast in detail (0 = today).
    Day {
        index: usize,

        /// Defaults to the last searched city.
        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show current conditions for a city.
    Current {
        city: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print the stored theme, or store a new one ("light" or "dark").
    Theme { theme: Option<String> },
}

impl Cli {
    /// `configure` never opens the preference store, so a broken
    /// preferences file cannot block setting the API key.
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            command => command.run_with(&mut FileStore::open_default()?).await,
        }
    }
}

impl Command {
    pub async fn run_with(self, prefs: &mut impl PreferenceStore) -> anyhow::Result<()> {
        match self {
            Command::Configure => configure()?,
            Command::Show { city, json } => {
                let city = resolve_city(city, &*prefs)?;
                let result = aggregator()?
                    .fetch_forecast(&city)
                    .await
                    .map_err(|e| user_error(&city, e))?;
                prefs.set_last_city(&city)?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print!("{}", render::summary(&result));
                }
            }
            Command::Day { index, city, json } => {
                let city = resolve_city(city, &*prefs)?;
                let result = aggregator()?
                    .fetch_forecast(&city)
                    .await
                    .map_err(|e| user_error(&city, e))?;
                prefs.set_last_city(&city)?;

                let day = result.day(index).ok_or_else(|| {
                    anyhow!(
                        "Day {index} is not available; the forecast for {} has {} days (0..{}).",
                        result.city,
                        result.daily.len(),
                        result.daily.len().saturating_sub(1)
                    )
                })?;

                if json {
                    println!("{}", serde_json::to_string_pretty(day)?);
                } else {
                    print!("{}", render::day_detail(index, day));
                }
            }
            Command::Current { city, json } => {
                let city = resolve_city(city, &*prefs)?;
                let current = aggregator()?
                    .fetch_current(&city)
                    .await
                    .map_err(|e| user_error(&city, e))?;
                prefs.set_last_city(&city)?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&current)?);
                } else {
                    print!("{}", render::current(&current));
                }
            }
            Command::Theme { theme } => match theme {
                Some(value) => {
                    let theme = Theme::try_from(value.as_str())?;
                    prefs.set_theme(theme)?;
                    println!("Theme set to {theme}");
                }
                None => println!("{}", prefs.theme()),
            },
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn aggregator() -> anyhow::Result<ForecastAggregator<OpenWeatherTransport>> {
    let config = Config::load()?;
    Ok(ForecastAggregator::new(config.transport()?))
}

fn resolve_city(city: Option<String>, prefs: &impl PreferenceStore) -> anyhow::Result<String> {
    match city {
        Some(city) => Ok(city),
        None => {
            let last = prefs.last_city().ok_or_else(|| {
                anyhow!("No city specified.\nHint: run `forecast show <city>` first.")
            })?;
            debug!(city = %last, "using last searched city");
            Ok(last)
        }
    }
}

fn user_error(city: &str, err: ForecastError) -> anyhow::Error {
    match err.upstream_status() {
        Some(404) => anyhow!("City not found: {city}"),
        _ => anyhow::Error::new(err).context(format!("Could not fetch weather for {city}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::MemoryStore;

    #[test]
    fn explicit_city_wins_over_last_city() {
        let mut prefs = MemoryStore::new();
        prefs.set_last_city("Oslo").unwrap();

        let city = resolve_city(Some("Rome".into()), &prefs).unwrap();
        assert_eq!(city, "Rome");
    }

    #[test]
    fn falls_back_to_last_city() {
        let mut prefs = MemoryStore::new();
        prefs.set_last_city("Oslo").unwrap();

        assert_eq!(resolve_city(None, &prefs).unwrap(), "Oslo");
    }

    #[test]
    fn no_city_and_no_history_is_an_error() {
        let err = resolve_city(None, &MemoryStore::new()).unwrap_err();
        assert!(err.to_string().contains("No city specified"));
    }

    #[test]
    fn parses_day_subcommand() {
        let cli = Cli::try_parse_from(["forecast", "day", "2", "--city", "Paris", "--json"])
            .expect("valid args");

        match cli.command {
            Command::Day { index, city, json } => {
                assert_eq!(index, 2);
                assert_eq!(city.as_deref(), Some("Paris"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn theme_is_written_to_the_injected_store() {
        let mut prefs = MemoryStore::new();

        Command::Theme {
            theme: Some("dark".into()),
        }
        .run_with(&mut prefs)
        .await
        .expect("theme stored");

        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn show_without_city_or_history_fails_before_any_request() {
        let mut prefs = MemoryStore::new();

        let err = Command::Show {
            city: None,
            json: false,
        }
        .run_with(&mut prefs)
        .await
        .unwrap_err();

        assert!(err.to_string().contains("No city specified"));
        assert_eq!(prefs.last_city(), None);
    }

    #[test]
    fn show_city_is_optional() {
        let cli = Cli::try_parse_from(["forecast", "show"]).expect("valid args");
        assert!(matches!(cli.command, Command::Show { city: None, json: false }));
    }
}
