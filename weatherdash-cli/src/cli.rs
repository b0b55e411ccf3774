use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use weatherdash_core::{
    Config, DashboardController, DashboardState, FileStore, KeyValueStore, Language, Location,
    UnitSystem, UnitsUpdate, gateway_from_config,
    i18n::translate,
    position::FixedPosition,
    search::{SearchOutcome, run_search},
    store::MemoryStore,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard in your terminal")]
pub struct Cli {
    /// Keep history and preferences in memory for this run only.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Look up locations matching a name.
    Search {
        /// At least three characters of a city name.
        query: String,
    },

    /// Show the dashboard for a city, a coordinate, or the most recent location.
    Show {
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Choose among several matches instead of taking the first.
        #[arg(long, requires = "city")]
        pick: bool,
    },

    /// List recently viewed locations.
    History {
        #[arg(long)]
        clear: bool,
    },

    /// Set the unit system used for requests and display.
    Units {
        #[arg(required_unless_present = "toggle")]
        system: Option<String>,

        /// Switch between metric and imperial.
        #[arg(long, conflicts_with = "system")]
        toggle: bool,
    },

    /// Set the display language.
    Lang {
        #[arg(required_unless_present = "toggle")]
        lang: Option<String>,

        /// Switch between English and Russian.
        #[arg(long, conflicts_with = "lang")]
        toggle: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let store: Arc<dyn KeyValueStore> = if self.ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FileStore::open_default()?)
        };

        match self.command {
            Command::Configure => configure(),
            Command::Search { query } => search(query).await,
            Command::Show { city, lat, lon, pick } => show(store, city, lat.zip(lon), pick).await,
            Command::History { clear } => {
                let mut controller = controller(&Config::load()?, store, None);
                if clear {
                    controller.history_mut().clear();
                }
                println!("{}", render::history(controller.history().entries(), controller.language()));
                Ok(())
            }
            Command::Units { system, toggle } => {
                let mut controller = controller(&Config::load()?, store, None);
                let system = match system {
                    Some(name) if !toggle => UnitSystem::try_from(name.as_str())?,
                    _ => controller.units().temperature.toggled(),
                };
                controller
                    .set_units(UnitsUpdate { temperature: Some(system), ..Default::default() })
                    .await;
                println!("Units set to {system}");
                Ok(())
            }
            Command::Lang { lang, toggle } => {
                let mut controller = controller(&Config::load()?, store, None);
                let lang = match lang {
                    Some(code) if !toggle => Language::try_from(code.as_str())?,
                    _ => controller.language().toggled(),
                };
                controller.set_language(lang).await;
                println!("Language set to {lang}");
                Ok(())
            }
        }
    }
}

fn controller(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    position: Option<(f64, f64)>,
) -> DashboardController {
    let positions = match position {
        Some((lat, lon)) => FixedPosition::at(lat, lon),
        None => FixedPosition::unavailable(),
    };

    DashboardController::new(gateway_from_config(config), Arc::new(positions), store)
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()?;

    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(key.to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn search(query: String) -> Result<()> {
    let config = Config::load()?;
    let gateway = gateway_from_config(&config);

    let (query_tx, query_rx) = mpsc::channel(1);
    let (result_tx, mut result_rx) = mpsc::channel(1);
    tokio::spawn(run_search(gateway, query_rx, result_tx));

    query_tx.send(query).await?;
    let outcome = result_rx.recv().await.ok_or_else(|| anyhow!("search stopped unexpectedly"))?;

    match outcome {
        SearchOutcome::Suggestions { locations, .. } if locations.is_empty() => {
            println!("No matching locations");
        }
        SearchOutcome::Suggestions { locations, .. } => {
            for loc in locations {
                println!("{}  ({:.4}, {:.4})", loc.display_name(), loc.lat, loc.lon);
            }
        }
        SearchOutcome::Cleared => bail!("Type at least three characters to search"),
        SearchOutcome::Failed { message, .. } => bail!("{message}"),
    }

    Ok(())
}

async fn show(
    store: Arc<dyn KeyValueStore>,
    city: Option<String>,
    coords: Option<(f64, f64)>,
    pick: bool,
) -> Result<()> {
    let config = Config::load()?;
    let mut controller = controller(&config, store, coords);

    if let Some(name) = city {
        let location = resolve_city(&config, &name, pick).await?;
        controller.select_location(location).await;
    } else if coords.is_some() {
        controller.use_current_location().await;
    } else {
        let Some(last) = controller.history().entries().first().cloned() else {
            bail!(
                "{}. Pass --city or --lat/--lon.",
                translate(controller.language(), "app.noLocation")
            );
        };
        debug!(location = %last.name, "showing most recent location");
        controller.select_location(last).await;
    }

    match controller.state() {
        DashboardState::Ready(dashboard) => {
            print!("{}", render::dashboard(dashboard, controller.units(), &Local, Utc::now()));
            Ok(())
        }
        DashboardState::Error(message) => bail!("{message}"),
        DashboardState::Offline => bail!("{}", translate(controller.language(), "app.offline")),
        other => bail!("Dashboard did not load (state: {other:?})"),
    }
}

async fn resolve_city(config: &Config, name: &str, pick: bool) -> Result<Location> {
    let gateway = gateway_from_config(config);
    let mut found = gateway
        .geocode(name.trim())
        .await
        .map_err(|e| anyhow!(e.user_message()))
        .with_context(|| format!("looking up '{name}'"))?;

    if found.is_empty() {
        bail!("No location named '{name}'");
    }

    if pick && found.len() > 1 {
        let labels: Vec<String> = found.iter().map(Location::display_name).collect();
        let choice = Select::new("Which one?", labels).raw_prompt()?;
        return Ok(found.swap_remove(choice.index));
    }

    Ok(found.swap_remove(0))
}
