//! Core library for the `skycast` weather client.
//!
//! This crate defines:
//! - The backend contract and its HTTP client
//! - The search orchestrator and its loading/error/success state machine
//! - The recent-search history over a pluggable key-value store
//! - Weather categories for ambient effects
//! - Configuration handling
//!
//! It is used by `skycast-cli`, but any front end can drive it by
//! subscribing a [`SearchObserver`].

pub mod api;
pub mod category;
pub mod config;
pub mod history;
pub mod model;
pub mod observer;
pub mod orchestrator;
pub mod state;
pub mod store;

pub use api::{Endpoint, FetchError, HttpWeatherApi, WeatherApi};
pub use category::{AmbientEffectsSink, AmbientScene, Category, Particles, classify};
pub use config::Config;
pub use history::RecentSearchCache;
pub use model::{CurrentWeather, ForecastEntry, RecentSearchRecord, icon_url, icon_url_large};
pub use observer::{AmbientEffects, SearchObserver};
pub use orchestrator::SearchOrchestrator;
pub use state::{SearchError, SearchState, SummaryState};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
