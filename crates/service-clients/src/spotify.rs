//! Spotify Web API playback client.

use crate::error::{check_status, Result, ServiceError};
use crate::music::{MusicPlayer, Track};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";

pub struct SpotifyClient {
    base_url: String,
    access_token: String,
    client: Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Deserialize)]
struct TrackPage {
    items: Vec<Track>,
}

#[derive(Deserialize)]
struct DevicesResponse {
    #[serde(default)]
    devices: Vec<PlaybackDevice>,
}

#[derive(Deserialize)]
struct PlaybackDevice {
    name: String,
    is_active: bool,
    volume_percent: Option<u8>,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(ServiceError::NotConfigured("spotify access token".into()));
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
            client: Client::builder().build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, req: RequestBuilder) -> Result<reqwest::blocking::Response> {
        check_status(req.bearer_auth(&self.access_token).send()?)
    }
}

impl MusicPlayer for SpotifyClient {
    fn search_track(&self, query: &str) -> Result<Option<Track>> {
        let req = self
            .client
            .get(self.url("/search"))
            .query(&[("q", query), ("type", "track"), ("limit", "1")]);
        let page: SearchResponse = self.send(req)?.json()?;
        Ok(page.tracks.items.into_iter().next())
    }

    fn start_playback(&self, track: &Track) -> Result<()> {
        let req = self
            .client
            .put(self.url("/me/player/play"))
            .json(&json!({ "uris": [track.uri] }));
        self.send(req)?;
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.send(self.client.put(self.url("/me/player/pause")))?;
        Ok(())
    }

    fn next_track(&self) -> Result<()> {
        self.send(self.client.post(self.url("/me/player/next")))?;
        Ok(())
    }

    fn previous_track(&self) -> Result<()> {
        self.send(self.client.post(self.url("/me/player/previous")))?;
        Ok(())
    }

    fn set_volume(&self, level: u8) -> Result<()> {
        let req = self
            .client
            .put(self.url("/me/player/volume"))
            .query(&[("volume_percent", level.min(100))]);
        self.send(req)?;
        Ok(())
    }

    fn current_volume(&self) -> Result<Option<u8>> {
        let devices: DevicesResponse =
            self.send(self.client.get(self.url("/me/player/devices")))?.json()?;
        let active = devices.devices.into_iter().find(|d| d.is_active);
        if let Some(device) = &active {
            debug!(
                "Current active device: {}, volume {:?}",
                device.name, device.volume_percent
            );
        }
        Ok(active.and_then(|d| d.volume_percent))
    }
}
