use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Current conditions for a city, as returned by `/api/weather/current`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub description: String,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    /// Opaque OpenWeather icon code, e.g. `"10d"`.
    pub icon: String,
}

impl CurrentWeather {
    /// `"Paris, FR"`.
    pub fn location_label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// One day of the forecast. Index 0 of a forecast is today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub description: String,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub icon: String,
}

/// A past lookup kept in the recent-search history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearchRecord {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    pub timestamp: DateTime<Utc>,
}

impl RecentSearchRecord {
    pub fn from_current(current: &CurrentWeather, at: DateTime<Utc>) -> Self {
        Self {
            city: current.city.clone(),
            country: current.country.clone(),
            temperature: current.temperature,
            description: current.description.clone(),
            icon: current.icon.clone(),
            wind_speed: current.wind_speed,
            timestamp: at,
        }
    }

    /// Identity used for deduplication. Case-sensitive.
    pub fn key(&self) -> (&str, &str) {
        (&self.city, &self.country)
    }

    pub fn same_location(&self, other: &RecentSearchRecord) -> bool {
        self.key() == other.key()
    }

    /// Relative age of the record, e.g. `"5m ago"`.
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let minutes = (now - self.timestamp).num_minutes();
        if minutes < 1 {
            return "Just now".to_string();
        }
        if minutes < 60 {
            return format!("{minutes}m ago");
        }

        let hours = minutes / 60;
        if hours < 24 {
            return format!("{hours}h ago");
        }

        format!("{}d ago", hours / 24)
    }
}

/// Small icon image for a weather icon code.
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}.png")
}

/// Double-resolution icon image, used for forecast cards.
pub fn icon_url_large(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record_at(ts: DateTime<Utc>) -> RecentSearchRecord {
        RecentSearchRecord {
            city: "Paris".into(),
            country: "FR".into(),
            temperature: 18.0,
            description: "Clear Sky".into(),
            icon: "01d".into(),
            wind_speed: 3.2,
            timestamp: ts,
        }
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();

        assert_eq!(record_at(now - Duration::seconds(30)).time_ago(now), "Just now");
        assert_eq!(record_at(now - Duration::minutes(5)).time_ago(now), "5m ago");
        assert_eq!(record_at(now - Duration::minutes(59)).time_ago(now), "59m ago");
        assert_eq!(record_at(now - Duration::minutes(61)).time_ago(now), "1h ago");
        assert_eq!(record_at(now - Duration::hours(23)).time_ago(now), "23h ago");
        assert_eq!(record_at(now - Duration::hours(50)).time_ago(now), "2d ago");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        assert_eq!(record_at(now + Duration::minutes(3)).time_ago(now), "Just now");
    }

    #[test]
    fn identity_is_case_sensitive() {
        let now = Utc::now();
        let a = record_at(now);
        let mut b = record_at(now);
        b.city = "paris".into();

        assert!(!a.same_location(&b));
        assert!(a.same_location(&record_at(now - Duration::days(1))));
    }

    #[test]
    fn current_weather_parses_backend_payload() {
        let body = r#"{"city":"Paris","country":"FR","temperature":18,"humidity":60,
            "description":"Clear Sky","icon":"01d","wind_speed":3.2}"#;
        let parsed: CurrentWeather = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.location_label(), "Paris, FR");
        assert_eq!(parsed.temperature, 18.0);
        assert_eq!(parsed.humidity, 60);
    }

    #[test]
    fn icon_urls() {
        assert_eq!(icon_url("10d"), "https://openweathermap.org/img/wn/10d.png");
        assert_eq!(icon_url_large("10d"), "https://openweathermap.org/img/wn/10d@2x.png");
    }
}
