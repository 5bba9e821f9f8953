//! Spoken weather reports.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Duration, OffsetDateTime, UtcOffset};

/// Forecast rain total (mm) above which the grass counts as wet.
pub const WET_GRASS_THRESHOLD_MM: f64 = 30.0;

/// Produces a spoken weather report for a city.
pub trait WeatherService: Send + Sync {
    fn report(&self, city: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
        }
    }

    fn temperature(self) -> &'static str {
        match self {
            Units::Imperial => "°F",
            Units::Metric => "°C",
        }
    }

    fn speed(self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric => "m/s",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub description: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub sunrise: OffsetDateTime,
    pub sunset: OffsetDateTime,
    /// Local offset of the city, used to read out clock times.
    pub utc_offset: UtcOffset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastEntry {
    pub at: OffsetDateTime,
    /// Rain over the three hours of the entry, in mm
    pub rain_mm: f64,
}

pub fn format_conditions(current: &CurrentConditions, units: Units) -> String {
    let t = units.temperature();
    format!(
        "is {}{t} and {}. It feels like {}{t} with a humidity of {}% and a wind speed of {} {}.",
        current.temperature.round(),
        current.description,
        current.feels_like.round(),
        current.humidity.round(),
        current.wind_speed.round(),
        units.speed(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunEventKind {
    Sunrise,
    Sunset,
}

impl fmt::Display for SunEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SunEventKind::Sunrise => "sunrise",
            SunEventKind::Sunset => "sunset",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunEvent {
    pub kind: SunEventKind,
    pub at: OffsetDateTime,
    pub hours: i64,
    pub minutes: i64,
}

/// Rolls a past event forward by whole days until it is not in the past.
fn upcoming(event: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    let mut event = event;
    while event < now {
        event += Duration::days(1);
    }
    event
}

/// Whichever of sunrise and sunset comes next, with the wait until it.
pub fn next_sun_event(
    sunrise: OffsetDateTime,
    sunset: OffsetDateTime,
    now: OffsetDateTime,
) -> SunEvent {
    let sunrise = upcoming(sunrise, now);
    let sunset = upcoming(sunset, now);
    let (kind, at) = if sunrise <= sunset {
        (SunEventKind::Sunrise, sunrise)
    } else {
        (SunEventKind::Sunset, sunset)
    };
    let wait = ((at - now).as_seconds_f64() / 60.0).round() as i64;
    SunEvent {
        kind,
        at,
        hours: wait / 60,
        minutes: wait % 60,
    }
}

fn clock_time(at: OffsetDateTime, offset: UtcOffset) -> String {
    let local = at.to_offset(offset);
    let hour = local.hour();
    let period = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{:02}:{:02} {}", hour12, local.minute(), period)
}

pub fn describe_sun_event(event: &SunEvent, offset: UtcOffset) -> String {
    let clock = clock_time(event.at, offset);
    if event.hours == 0 {
        format!(
            "You can catch the next {} at {} in {} minutes.",
            event.kind, clock, event.minutes
        )
    } else {
        format!(
            "You can catch the next {} at {} in {} hours and {} minutes.",
            event.kind, clock, event.hours, event.minutes
        )
    }
}

/// Wet when the forecast rain total exceeds [`WET_GRASS_THRESHOLD_MM`] and
/// some of it falls within a day of `now`.
pub fn grass_is_wet(forecast: &[ForecastEntry], now: OffsetDateTime) -> bool {
    let total: f64 = forecast.iter().map(|e| e.rain_mm).sum();
    let recent: f64 = forecast
        .iter()
        .filter(|e| (e.at - now).abs() <= Duration::days(1))
        .map(|e| e.rain_mm)
        .sum();
    total > WET_GRASS_THRESHOLD_MM && recent > 0.0
}

/// Full spoken report.
pub fn compose_report(
    city: &str,
    current: &CurrentConditions,
    forecast: &[ForecastEntry],
    units: Units,
    now: OffsetDateTime,
) -> String {
    let event = next_sun_event(current.sunrise, current.sunset, now);
    let grass = if grass_is_wet(forecast, now) { "wet" } else { "dry" };
    format!(
        "The current weather in {}:\n{}\n{}\nThe grass is likely {}.",
        city,
        format_conditions(current, units),
        describe_sun_event(&event, current.utc_offset),
        grass
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(unix: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(unix).unwrap()
    }

    fn conditions() -> CurrentConditions {
        CurrentConditions {
            description: "clear sky".into(),
            temperature: 71.6,
            feels_like: 70.2,
            humidity: 40.0,
            wind_speed: 5.4,
            // 06:00 and 18:00 UTC on 2024-01-01
            sunrise: at(1_704_088_800),
            sunset: at(1_704_132_000),
            utc_offset: UtcOffset::UTC,
        }
    }

    #[test]
    fn test_format_conditions() {
        assert_eq!(
            format_conditions(&conditions(), Units::Imperial),
            "is 72°F and clear sky. It feels like 70°F with a humidity of 40% and a wind speed of 5 mph."
        );
    }

    #[test]
    fn test_next_event_is_sunset_in_the_afternoon() {
        let c = conditions();
        // 16:30 UTC
        let event = next_sun_event(c.sunrise, c.sunset, at(1_704_126_600));
        assert_eq!(event.kind, SunEventKind::Sunset);
        assert_eq!((event.hours, event.minutes), (1, 30));
        assert_eq!(
            describe_sun_event(&event, UtcOffset::UTC),
            "You can catch the next sunset at 06:00 PM in 1 hours and 30 minutes."
        );
    }

    #[test]
    fn test_past_events_roll_to_next_day() {
        let c = conditions();
        // 23:45 UTC: both events already happened today
        let event = next_sun_event(c.sunrise, c.sunset, at(1_704_152_700));
        assert_eq!(event.kind, SunEventKind::Sunrise);
        assert_eq!((event.hours, event.minutes), (6, 15));
    }

    #[test]
    fn test_minutes_only_phrase() {
        let c = conditions();
        // 17:20 UTC
        let event = next_sun_event(c.sunrise, c.sunset, at(1_704_129_600));
        assert_eq!(
            describe_sun_event(&event, UtcOffset::UTC),
            "You can catch the next sunset at 06:00 PM in 40 minutes."
        );
    }

    #[test]
    fn test_grass_estimate() {
        let now = at(1_704_088_800);
        let soaked: Vec<ForecastEntry> = (0..4)
            .map(|i| ForecastEntry {
                at: now + Duration::hours(3 * i),
                rain_mm: 10.0,
            })
            .collect();
        assert!(grass_is_wet(&soaked, now));

        let light = &soaked[..2];
        assert!(!grass_is_wet(light, now));

        let later: Vec<ForecastEntry> = soaked
            .iter()
            .map(|e| ForecastEntry {
                at: e.at + Duration::days(3),
                rain_mm: e.rain_mm,
            })
            .collect();
        assert!(!grass_is_wet(&later, now));
    }

    #[test]
    fn test_compose_report() {
        let report = compose_report(
            "High Point",
            &conditions(),
            &[],
            Units::Imperial,
            at(1_704_126_600),
        );
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "The current weather in High Point:");
        assert!(lines[1].starts_with("is 72°F"));
        assert!(lines[2].contains("sunset"));
        assert_eq!(lines[3], "The grass is likely dry.");
    }
}
