//! voice-local: turn-taking speech I/O with text and scripted backends

mod error;
pub use error::{Result, VoiceError};

mod types;
pub use types::{Utterance, VoiceConfig};

mod traits;
pub use traits::{Listener, Speaker};

mod wake;
pub use wake::WakeWordGate;

mod console;
pub use console::{ConsoleListener, ConsoleSpeaker};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{RecordingSpeaker, ScriptedListener};

pub mod plugin;
