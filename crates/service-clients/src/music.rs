use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,
}

/// Remote-controlled music playback.
pub trait MusicPlayer: Send + Sync {
    /// Best match for a search query.
    fn search_track(&self, query: &str) -> Result<Option<Track>>;
    fn start_playback(&self, track: &Track) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn next_track(&self) -> Result<()>;
    fn previous_track(&self) -> Result<()>;
    fn set_volume(&self, level: u8) -> Result<()>;
    /// Volume of the active playback device, if there is one.
    fn current_volume(&self) -> Result<Option<u8>>;
}

/// Search for `query` and play the first hit. Returns the track played, or
/// `None` when the search came back empty.
pub fn search_and_play<P: MusicPlayer + ?Sized>(player: &P, query: &str) -> Result<Option<Track>> {
    info!("Attempting to play: search_query={}", query);
    let Some(track) = player.search_track(query)? else {
        warn!("No tracks found for query '{}'", query);
        return Ok(None);
    };
    player.start_playback(&track)?;
    info!("Playing track: {}", track.name);
    Ok(Some(track))
}
