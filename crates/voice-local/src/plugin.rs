use crate::console::{ConsoleListener, ConsoleSpeaker};
use crate::error::{Result, VoiceError};
use crate::traits::{Listener, Speaker};
use crate::VoiceConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceBackendKind {
    /// stdin transcripts, stdout speech
    Console,
    /// Transcripts read line by line from a file, speech on stdout
    Script(PathBuf),
}

impl FromStr for VoiceBackendKind {
    type Err = VoiceError;

    /// `console` or `script:<path>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            None if s == "console" => Ok(VoiceBackendKind::Console),
            Some(("script", path)) if !path.is_empty() => {
                Ok(VoiceBackendKind::Script(PathBuf::from(path)))
            }
            _ => Err(VoiceError::Unsupported(s.to_string())),
        }
    }
}

pub type VoiceIo = (Box<dyn Listener>, Box<dyn Speaker>);

pub fn new_voice_backend(kind: &VoiceBackendKind, cfg: &VoiceConfig) -> Result<VoiceIo> {
    let speaker: Box<dyn Speaker> = Box::new(ConsoleSpeaker::new(io::stdout(), cfg));
    match kind {
        VoiceBackendKind::Console => {
            let listener = ConsoleListener::new(BufReader::new(io::stdin()), cfg);
            Ok((Box::new(listener), speaker))
        }
        VoiceBackendKind::Script(path) => {
            let file = File::open(path)
                .map_err(|e| VoiceError::Io(format!("{}: {e}", path.display())))?;
            let listener = ConsoleListener::new(BufReader::new(file), cfg);
            Ok((Box::new(listener), speaker))
        }
    }
}
