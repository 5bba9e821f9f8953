//! service-clients: the assistant's outside collaborators (music playback,
//! weather, language model) behind traits, with HTTP and in-memory backends

mod error;
pub use error::{Result, ServiceError};

pub mod music;
pub use music::{search_and_play, MusicPlayer, Track};

pub mod weather;
pub use weather::{Units, WeatherService};

mod llm;
pub use llm::LanguageModel;

#[cfg(feature = "http")]
pub mod spotify;
#[cfg(feature = "http")]
pub use spotify::SpotifyClient;

#[cfg(feature = "http")]
pub mod openweather;
#[cfg(feature = "http")]
pub use openweather::OpenWeatherClient;

#[cfg(feature = "http")]
pub mod ollama;
#[cfg(feature = "http")]
pub use ollama::OllamaClient;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockLanguageModel, MockMusicPlayer, MockWeather, PlayerCall};
