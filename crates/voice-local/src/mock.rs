use crate::error::{Result, VoiceError};
use crate::traits::{Listener, Speaker};
use crate::Utterance;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Plays back a fixed list of turns. `None` entries are silence. The wake
/// word is always "heard" while turns remain.
#[derive(Debug, Default)]
pub struct ScriptedListener {
    turns: VecDeque<Option<String>>,
    wakes: usize,
}

impl ScriptedListener {
    pub fn new<I, S>(turns: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            turns: turns.into_iter().map(|t| t.map(Into::into)).collect(),
            wakes: 0,
        }
    }

    /// Every entry spoken, no silences.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(Some))
    }

    pub fn wakes(&self) -> usize {
        self.wakes
    }

    pub fn remaining(&self) -> usize {
        self.turns.len()
    }
}

impl Listener for ScriptedListener {
    fn wait_for_wake(&mut self) -> Result<()> {
        if self.turns.is_empty() {
            return Err(VoiceError::Closed);
        }
        self.wakes += 1;
        Ok(())
    }

    fn listen(&mut self) -> Result<Option<Utterance>> {
        match self.turns.pop_front() {
            Some(Some(text)) => Ok(Utterance::from_transcript(&text)),
            Some(None) => Ok(None),
            None => Err(VoiceError::Closed),
        }
    }
}

/// Keeps everything spoken. Clones share the transcript.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }

    pub fn said(&self, text: &str) -> bool {
        self.spoken.lock().iter().any(|s| s == text)
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.lock().push(text.to_string());
        Ok(())
    }
}
