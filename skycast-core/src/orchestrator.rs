//! Drives a city lookup from input to rendered state.
//!
//! A lookup fetches current conditions and the forecast concurrently, then
//! on success records the result in the history, publishes the weather
//! category and starts the summary as a separate task. Rapid repeated
//! lookups supersede each other: each call takes a sequence token and only
//! the latest token may commit.

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tracing::{debug, info};

use crate::{
    api::{FetchError, WeatherApi},
    category::classify,
    history::RecentSearchCache,
    model::{CurrentWeather, ForecastEntry, RecentSearchRecord},
    observer::SearchObserver,
    state::{SearchError, SearchState, SummaryState},
};

/// Owns the search and summary state and fans transitions out to observers.
///
/// Safe to share across threads. Observers are called outside the state
/// locks, so on a multi-thread runtime two lookups racing each other may
/// deliver their notifications interleaved; `search_state()` is always the
/// authoritative value. A lookup stops committing as soon as it is
/// superseded.
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn WeatherApi>,
    history: RecentSearchCache,
    observers: RwLock<Vec<Arc<dyn SearchObserver>>>,
    search_seq: AtomicU64,
    summary_seq: AtomicU64,
    search_state: Mutex<SearchState>,
    summary_state: Mutex<SummaryState>,
}

impl SearchOrchestrator {
    pub fn new(api: Arc<dyn WeatherApi>, history: RecentSearchCache) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                history,
                observers: RwLock::new(Vec::new()),
                search_seq: AtomicU64::new(0),
                summary_seq: AtomicU64::new(0),
                search_state: Mutex::new(SearchState::Idle),
                summary_state: Mutex::new(SummaryState::Idle),
            }),
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn SearchObserver>) {
        self.inner.observers.write().push(observer);
    }

    pub fn search_state(&self) -> SearchState {
        self.inner.search_state.lock().clone()
    }

    pub fn summary_state(&self) -> SummaryState {
        self.inner.summary_state.lock().clone()
    }

    pub fn history(&self) -> Vec<RecentSearchRecord> {
        self.inner.history.list()
    }

    /// Start a lookup for `city_name`.
    ///
    /// State moves to `Loading` (or to the validation error) before this
    /// returns; the returned future performs the requests. It can be awaited
    /// or handed to `tokio::spawn`. Any earlier lookup still in flight is
    /// superseded and its results are dropped.
    pub fn search(&self, city_name: &str) -> impl Future<Output = ()> + Send + use<> {
        let token = self.inner.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let city = city_name.trim().to_string();
        let this = self.clone();

        let pending = if city.is_empty() {
            debug!(token, "rejected empty city");
            this.set_search_state(token, SearchState::Error(SearchError::Validation));
            None
        } else {
            debug!(token, %city, "search started");
            this.set_search_state(token, SearchState::Loading);
            this.reset_summary();
            Some(city)
        };

        async move {
            if let Some(city) = pending {
                this.run_search(token, city).await;
            }
        }
    }

    /// Fetch the natural-language summary for `city_name`.
    ///
    /// Never touches the search state. A later summary request supersedes
    /// this one.
    pub fn fetch_summary(&self, city_name: &str) -> impl Future<Output = ()> + Send + use<> {
        let token = self.inner.summary_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let city = city_name.trim().to_string();
        let this = self.clone();

        this.set_summary_state(token, SummaryState::Loading);

        async move {
            let next = match this.inner.api.summary(&city).await {
                Ok(text) => SummaryState::Success { text },
                Err(e) => {
                    debug!(error = %e, %city, "summary failed");
                    SummaryState::Error(e.into())
                }
            };
            this.set_summary_state(token, next);
        }
    }

    pub fn clear_history(&self) {
        self.inner.history.clear();
        self.publish_history();
    }

    /// Push the stored history to observers.
    pub fn publish_history(&self) {
        let history = self.inner.history.list();
        self.notify(|o| o.on_history_change(&history));
    }

    async fn run_search(&self, token: u64, city: String) {
        // Both requests are in flight before either is awaited.
        let (current, forecast) =
            tokio::join!(self.inner.api.current(&city), self.inner.api.forecast(&city));

        if !self.is_latest_search(token) {
            debug!(token, %city, "discarding superseded search results");
            return;
        }

        match joint(current, forecast) {
            Ok((current, forecast)) => self.commit_success(token, city, current, forecast),
            Err(e) => {
                debug!(token, %city, error = %e, "search failed");
                self.set_search_state(token, SearchState::Error(e));
            }
        }
    }

    fn commit_success(
        &self,
        token: u64,
        city: String,
        current: CurrentWeather,
        forecast: Vec<ForecastEntry>,
    ) {
        let record = RecentSearchRecord::from_current(&current, Utc::now());
        let category = classify(&current.description, &current.icon);

        info!(
            city = %current.city,
            country = %current.country,
            %category,
            days = forecast.len(),
            "weather loaded"
        );

        let state = SearchState::Success { current, forecast };
        if !self.set_search_state(token, state) {
            return;
        }

        // Observers run between the steps below and may start a newer lookup.
        if !self.is_latest_search(token) {
            return;
        }
        self.inner.history.record(record);
        self.publish_history();

        if !self.is_latest_search(token) {
            return;
        }
        self.notify(|o| o.on_category_change(category));

        if !self.is_latest_search(token) {
            return;
        }
        tokio::spawn(self.fetch_summary(&city));
    }

    fn is_latest_search(&self, token: u64) -> bool {
        self.inner.search_seq.load(Ordering::SeqCst) == token
    }

    /// Returns false when `token` has been superseded and nothing changed.
    fn set_search_state(&self, token: u64, state: SearchState) -> bool {
        {
            let mut current = self.inner.search_state.lock();
            if !self.is_latest_search(token) {
                return false;
            }
            *current = state.clone();
        }
        self.notify(|o| o.on_state_change(&state));
        true
    }

    fn set_summary_state(&self, token: u64, state: SummaryState) {
        {
            let mut current = self.inner.summary_state.lock();
            if self.inner.summary_seq.load(Ordering::SeqCst) != token {
                debug!(token, "discarding superseded summary");
                return;
            }
            *current = state.clone();
        }
        self.notify(|o| o.on_summary_state_change(&state));
    }

    /// Back to `Idle`, invalidating any summary still in flight.
    fn reset_summary(&self) {
        let token = self.inner.summary_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_summary_state(token, SummaryState::Idle);
    }

    fn notify(&self, f: impl Fn(&dyn SearchObserver)) {
        // Snapshot so observers may call back into the orchestrator.
        let observers = self.inner.observers.read().clone();
        for observer in &observers {
            f(observer.as_ref());
        }
    }
}

/// Current-weather failure is reported ahead of forecast failure.
fn joint(
    current: Result<CurrentWeather, FetchError>,
    forecast: Result<Vec<ForecastEntry>, FetchError>,
) -> Result<(CurrentWeather, Vec<ForecastEntry>), SearchError> {
    let current = current?;
    let forecast = forecast?;
    Ok((current, forecast))
}
