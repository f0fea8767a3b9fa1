use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use skycast_core::{
    AmbientEffects, Config, FileStore, HttpWeatherApi, RecentSearchCache, SearchOrchestrator,
    SearchState,
};
use tokio::sync::mpsc;

use crate::render::{TerminalEffects, TerminalRenderer, format_history};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather lookup with recent-search history")]
pub struct Cli {
    /// Backend origin; overrides the configured one for this run.
    #[arg(long, global = true, env = "SKYCAST_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the backend URL and history location.
    Configure {
        /// Backend origin, e.g. "http://localhost:5000". Prompted for if absent.
        #[arg(long)]
        url: Option<String>,

        /// Directory for the recent-search history.
        #[arg(long)]
        history_dir: Option<PathBuf>,
    },

    /// Show current weather, forecast and summary for a city.
    Search {
        /// City name. Offers a list of suggestions if absent.
        city: Option<String>,
    },

    /// List recent searches.
    Recent {
        /// Search again for the n-th entry (1 = newest).
        #[arg(long, value_name = "N")]
        open: Option<usize>,
    },

    /// Forget all recent searches.
    Clear,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure { url, history_dir } => {
                configure(url, history_dir)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Search { city } => {
                let city = match city {
                    Some(city) => city,
                    None => pick_suggestion()?,
                };
                let app = App::new(self.base_url.as_deref())?;
                app.search(&city).await
            }
            Command::Recent { open } => {
                let app = App::new(self.base_url.as_deref())?;
                let history = app.orchestrator.history();

                let Some(n) = open else {
                    println!("{}", format_history(&history, Utc::now()));
                    return Ok(ExitCode::SUCCESS);
                };

                let record = n
                    .checked_sub(1)
                    .and_then(|i| history.get(i))
                    .ok_or_else(|| {
                        anyhow!("No recent search #{n}. There are {} entries.", history.len())
                    })?;
                app.search(&record.city).await
            }
            Command::Clear => {
                let app = App::new(self.base_url.as_deref())?;
                app.orchestrator.clear_history();
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Quick picks offered when `search` is given no city.
pub const SUGGESTED_CITIES: [&str; 6] =
    ["London", "New York", "Tokyo", "Paris", "Sydney", "Cape Town"];

fn pick_suggestion() -> anyhow::Result<String> {
    let city = inquire::Select::new("City:", SUGGESTED_CITIES.to_vec())
        .prompt()
        .context("Failed to read city")?;
    Ok(city.to_string())
}

fn configure(url: Option<String>, history_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let url = match url {
        Some(url) => url,
        None => inquire::Text::new("Backend URL:")
            .with_default(cfg.base_url())
            .prompt()
            .context("Failed to read backend URL")?,
    };
    cfg.set_base_url(&url)?;

    if let Some(dir) = history_dir {
        cfg.history_dir = Some(dir);
    }

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

struct App {
    orchestrator: SearchOrchestrator,
    summary_done: mpsc::UnboundedReceiver<()>,
}

impl App {
    fn new(base_url: Option<&str>) -> anyhow::Result<Self> {
        let cfg = Config::load()?;
        let base_url = base_url.unwrap_or(cfg.base_url());
        tracing::debug!(base_url, "using backend");

        let store = FileStore::new(cfg.history_dir()?);
        let history = RecentSearchCache::new(Arc::new(store));
        let orchestrator = SearchOrchestrator::new(Arc::new(HttpWeatherApi::new(base_url)), history);

        let (tx, summary_done) = mpsc::unbounded_channel();
        orchestrator.subscribe(Arc::new(TerminalRenderer::new(tx)));
        orchestrator.subscribe(Arc::new(AmbientEffects::new(TerminalEffects)));

        Ok(Self { orchestrator, summary_done })
    }

    /// The renderer has already reported any error; only the exit code is left.
    async fn search(mut self, city: &str) -> anyhow::Result<ExitCode> {
        self.orchestrator.search(city).await;

        match self.orchestrator.search_state() {
            SearchState::Success { .. } => {
                // The summary arrives from its own task.
                self.summary_done.recv().await;
                Ok(ExitCode::SUCCESS)
            }
            SearchState::Error(_) => Ok(ExitCode::FAILURE),
            other => Err(anyhow!("Search ended in unexpected state: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_city_is_optional() {
        let cli = Cli::try_parse_from(["skycast", "search"]).unwrap();
        assert!(matches!(cli.command, Command::Search { city: None }));

        let cli = Cli::try_parse_from(["skycast", "search", "New York"]).unwrap();
        match cli.command {
            Command::Search { city } => assert_eq!(city.as_deref(), Some("New York")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn suggestions_are_distinct_and_nonempty() {
        let mut cities = SUGGESTED_CITIES.to_vec();
        cities.sort_unstable();
        cities.dedup();
        assert_eq!(cities.len(), SUGGESTED_CITIES.len());
        assert!(cities.iter().all(|c| !c.trim().is_empty()));
    }
}
