//! Terminal presentation of orchestrator transitions.

use chrono::{DateTime, Utc};
use skycast_core::{
    AmbientEffectsSink, AmbientScene, Category, CurrentWeather, ForecastEntry, Particles,
    RecentSearchRecord, SearchObserver, SearchState, SummaryState, icon_url_large,
};
use tokio::sync::mpsc;

/// Prints each transition as it happens and signals once the summary
/// stage has settled.
pub struct TerminalRenderer {
    summary_done: mpsc::UnboundedSender<()>,
}

impl TerminalRenderer {
    pub fn new(summary_done: mpsc::UnboundedSender<()>) -> Self {
        Self { summary_done }
    }
}

impl SearchObserver for TerminalRenderer {
    fn on_state_change(&self, state: &SearchState) {
        match state {
            SearchState::Idle => {}
            SearchState::Loading => eprintln!("Searching..."),
            SearchState::Success { current, forecast } => {
                println!("{}", format_current(current));
                println!();
                println!("{}", format_forecast(forecast));
            }
            SearchState::Error(e) => eprintln!("Error: {e}"),
        }
    }

    fn on_summary_state_change(&self, state: &SummaryState) {
        match state {
            SummaryState::Idle => {}
            SummaryState::Loading => eprintln!("Generating summary..."),
            SummaryState::Success { text } => {
                println!();
                println!("Summary: {text}");
            }
            SummaryState::Error(e) => {
                println!();
                println!("Summary unavailable: {e}");
            }
        }

        if state.is_settled() {
            // The receiver is gone once the command stopped waiting.
            let _ = self.summary_done.send(());
        }
    }

    fn on_history_change(&self, history: &[RecentSearchRecord]) {
        println!();
        println!("{}", format_history(history, Utc::now()));
    }
}

/// Describes the ambient scene in one line.
pub struct TerminalEffects;

impl AmbientEffectsSink for TerminalEffects {
    fn apply(&self, category: Category, scene: AmbientScene) {
        println!();
        println!("{}", format_scene(category, &scene));
    }
}

pub fn format_current(current: &CurrentWeather) -> String {
    format!(
        "{}\n  {}\n  Temperature: {}°C\n  Humidity:    {}%\n  Wind:        {} m/s\n  Icon:        {}",
        current.location_label(),
        current.description,
        current.temperature,
        current.humidity,
        current.wind_speed,
        icon_url_large(&current.icon),
    )
}

pub fn format_forecast(forecast: &[ForecastEntry]) -> String {
    let mut out = String::from("Forecast");
    for (i, day) in forecast.iter().enumerate() {
        let label = if i == 0 {
            "Today".to_string()
        } else {
            day.date.format("%a").to_string()
        };

        out.push_str(&format!(
            "\n  {:<5} {:<6}  {:>4}°C  {:<20} {:>3}%  {} m/s",
            label,
            day.date.format("%b %-d").to_string(),
            day.temperature,
            day.description,
            day.humidity,
            day.wind_speed,
        ));
    }
    out
}

pub fn format_history(history: &[RecentSearchRecord], now: DateTime<Utc>) -> String {
    if history.is_empty() {
        return "No recent searches.".to_string();
    }

    let mut out = String::from("Recent searches");
    for (i, record) in history.iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {}, {}  {}°C  {}  ({})",
            i + 1,
            record.city,
            record.country,
            record.temperature,
            record.description,
            record.time_ago(now),
        ));
    }
    out
}

pub fn format_scene(category: Category, scene: &AmbientScene) -> String {
    let mut parts = Vec::new();
    match scene.particles {
        Some(Particles::RainDrops(n)) => parts.push(format!("{n} rain drops")),
        Some(Particles::SnowFlakes(n)) => parts.push(format!("{n} snow flakes")),
        None => {}
    }
    if scene.sun_rays {
        parts.push("sun rays".to_string());
    }
    parts.push(format!("clouds at {:.0}%", scene.cloud_opacity * 100.0));

    format!("Sky: {category} ({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn day(date: (i32, u32, u32), description: &str) -> ForecastEntry {
        ForecastEntry {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: description.into(),
            temperature: 12.0,
            humidity: 75,
            wind_speed: 4.0,
            icon: "04d".into(),
        }
    }

    #[test]
    fn forecast_labels_first_day_as_today() {
        let text = format_forecast(&[
            day((2026, 10, 17), "Overcast Clouds"),
            day((2026, 10, 18), "Light Rain"),
        ]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim_start().starts_with("Today Oct 17"));
        assert!(lines[2].trim_start().starts_with("Sun   Oct 18"));
    }

    #[test]
    fn current_includes_location_and_icon() {
        let text = format_current(&CurrentWeather {
            city: "Lima".into(),
            country: "PE".into(),
            description: "Overcast Clouds".into(),
            temperature: 19.0,
            humidity: 77,
            wind_speed: 4.6,
            icon: "04d".into(),
        });

        assert!(text.starts_with("Lima, PE\n"));
        assert!(text.contains("Humidity:    77%"));
        assert!(text.ends_with("https://openweathermap.org/img/wn/04d@2x.png"));
    }

    #[test]
    fn history_lists_relative_ages() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let record = RecentSearchRecord {
            city: "Paris".into(),
            country: "FR".into(),
            temperature: 18.0,
            description: "Clear Sky".into(),
            icon: "01d".into(),
            wind_speed: 3.0,
            timestamp: now - Duration::minutes(90),
        };

        let text = format_history(&[record], now);
        assert!(text.contains("1. Paris, FR"));
        assert!(text.ends_with("(1h ago)"));
        assert_eq!(format_history(&[], now), "No recent searches.");
    }

    #[test]
    fn scene_description() {
        assert_eq!(
            format_scene(Category::Rain, &Category::Rain.scene()),
            "Sky: rain (50 rain drops, clouds at 100%)"
        );
        assert_eq!(
            format_scene(Category::Sunny, &Category::Sunny.scene()),
            "Sky: sunny (sun rays, clouds at 30%)"
        );
    }
}
