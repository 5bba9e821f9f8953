//! OpenWeatherMap geocoding, current conditions and forecast.

use crate::error::{check_status, Result, ServiceError};
use crate::weather::{compose_report, CurrentConditions, ForecastEntry, Units, WeatherService};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    units: Units,
    client: Client,
}

#[derive(Deserialize)]
struct GeoHit {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct CurrentResponse {
    weather: Vec<WeatherDescription>,
    main: MainReadings,
    wind: Wind,
    sys: SunTimes,
    #[serde(default)]
    timezone: i32,
}

#[derive(Deserialize)]
struct WeatherDescription {
    description: String,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Deserialize)]
struct SunTimes {
    sunrise: i64,
    sunset: i64,
}

#[derive(Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastItem>,
}

#[derive(Deserialize)]
struct ForecastItem {
    dt: i64,
    #[serde(default)]
    rain: Option<Rain>,
}

#[derive(Deserialize)]
struct Rain {
    #[serde(rename = "3h", default)]
    three_hours: f64,
}

fn timestamp(unix: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(unix)
        .map_err(|e| ServiceError::Decode(format!("timestamp {unix}: {e}")))
}

impl CurrentResponse {
    fn into_conditions(self) -> Result<CurrentConditions> {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| ServiceError::Decode("no weather description".into()))?;
        Ok(CurrentConditions {
            description,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            sunrise: timestamp(self.sys.sunrise)?,
            sunset: timestamp(self.sys.sunset)?,
            utc_offset: UtcOffset::from_whole_seconds(self.timezone).unwrap_or(UtcOffset::UTC),
        })
    }
}

impl ForecastResponse {
    fn into_entries(self) -> Result<Vec<ForecastEntry>> {
        self.list
            .into_iter()
            .map(|item| {
                Ok(ForecastEntry {
                    at: timestamp(item.dt)?,
                    rain_mm: item.rain.map(|r| r.three_hours).unwrap_or_default(),
                })
            })
            .collect()
    }
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, units: Units) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ServiceError::NotConfigured("weather API key".into()));
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            units,
            client: Client::builder().build()?,
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .query(&[("appid", &self.api_key)])
            .send()?;
        Ok(check_status(resp)?.json()?)
    }

    fn coordinates(&self, city: &str) -> Result<(f64, f64)> {
        let hits: Vec<GeoHit> = self.get(
            "/geo/1.0/direct",
            &[("q", city.to_string()), ("limit", "1".to_string())],
        )?;
        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(format!("city {city}")))?;
        debug!("{} is at {}, {}", city, hit.lat, hit.lon);
        Ok((hit.lat, hit.lon))
    }

    fn located_query(&self, lat: f64, lon: f64) -> Vec<(&'static str, String)> {
        vec![
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("units", self.units.as_str().to_string()),
        ]
    }

    pub fn current(&self, lat: f64, lon: f64) -> Result<CurrentConditions> {
        let resp: CurrentResponse = self.get("/data/2.5/weather", &self.located_query(lat, lon))?;
        resp.into_conditions()
    }

    pub fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastEntry>> {
        let resp: ForecastResponse = self.get("/data/2.5/forecast", &self.located_query(lat, lon))?;
        resp.into_entries()
    }
}

impl WeatherService for OpenWeatherClient {
    fn report(&self, city: &str) -> Result<String> {
        let (lat, lon) = self.coordinates(city)?;
        let current = self.current(lat, lon)?;
        let forecast = self.forecast(lat, lon)?;
        Ok(compose_report(
            city,
            &current,
            &forecast,
            self.units,
            OffsetDateTime::now_utc(),
        ))
    }
}
