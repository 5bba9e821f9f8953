//! Line-oriented text backend: stdin/stdout, files, or any reader/writer.

use crate::error::{Result, VoiceError};
use crate::traits::{Listener, Speaker};
use crate::wake::WakeWordGate;
use crate::{Utterance, VoiceConfig};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Reads one utterance per line. End of input closes the listener.
pub struct ConsoleListener<R> {
    reader: R,
    gate: WakeWordGate,
    pending: Option<Utterance>,
}

impl<R: BufRead + Send> ConsoleListener<R> {
    pub fn new(reader: R, config: &VoiceConfig) -> Self {
        Self {
            reader,
            gate: WakeWordGate::new(&config.wake_words),
            pending: None,
        }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(VoiceError::Closed);
        }
        Ok(line)
    }
}

impl<R: BufRead + Send> Listener for ConsoleListener<R> {
    fn wait_for_wake(&mut self) -> Result<()> {
        if self.gate.always_awake() {
            return Ok(());
        }
        loop {
            let line = self.read_line()?;
            if self.gate.detect(&line) {
                info!("Wake word detected");
                self.pending = self.gate.strip(&line).and_then(Utterance::from_transcript);
                return Ok(());
            }
            debug!("Ignoring input while in standby: {}", line.trim());
        }
    }

    fn listen(&mut self) -> Result<Option<Utterance>> {
        if let Some(utterance) = self.pending.take() {
            return Ok(Some(utterance));
        }
        let line = self.read_line()?;
        Ok(Utterance::from_transcript(&line))
    }
}

/// Writes each spoken line as `Name: text`.
pub struct ConsoleSpeaker<W> {
    writer: W,
    name: String,
}

impl<W: Write + Send> ConsoleSpeaker<W> {
    pub fn new(writer: W, config: &VoiceConfig) -> Self {
        Self {
            writer,
            name: config.voice_name.clone(),
        }
    }
}

impl<W: Write + Send> Speaker for ConsoleSpeaker<W> {
    fn speak(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}: {}", self.name, text)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn listener(input: &str) -> ConsoleListener<Cursor<Vec<u8>>> {
        ConsoleListener::new(Cursor::new(input.as_bytes().to_vec()), &VoiceConfig::default())
    }

    #[test]
    fn test_standby_until_wake_word() {
        let mut l = listener("play music\natom\nturn on mirror\n\n");
        l.wait_for_wake().unwrap();
        assert_eq!(l.listen().unwrap().unwrap().text, "turn on mirror");
        assert!(l.listen().unwrap().is_none());
        assert!(matches!(l.listen(), Err(VoiceError::Closed)));
    }

    #[test]
    fn test_command_in_wake_line_is_kept() {
        let mut l = listener("hey atom, what's the weather\n");
        l.wait_for_wake().unwrap();
        assert_eq!(l.listen().unwrap().unwrap().text, "what's the weather");
    }

    #[test]
    fn test_wait_fails_when_input_ends() {
        let mut l = listener("no wake word here\n");
        assert!(matches!(l.wait_for_wake(), Err(VoiceError::Closed)));
    }

    #[test]
    fn test_speaker_prefixes_name() {
        let mut out = Vec::new();
        ConsoleSpeaker::new(&mut out, &VoiceConfig::default())
            .speak("Happily.")
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Atom: Happily.\n");
    }
}
