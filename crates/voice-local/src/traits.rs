use crate::error::Result;
use crate::Utterance;

/// Source of user speech.
pub trait Listener: Send {
    /// Block until the wake word is heard. `Err(VoiceError::Closed)` once the
    /// input is exhausted.
    fn wait_for_wake(&mut self) -> Result<()>;

    /// Next utterance; `Ok(None)` is silence.
    fn listen(&mut self) -> Result<Option<Utterance>>;
}

/// Sink for assistant speech.
pub trait Speaker: Send {
    fn speak(&mut self, text: &str) -> Result<()>;
}

impl<L: Listener + ?Sized> Listener for Box<L> {
    fn wait_for_wake(&mut self) -> Result<()> {
        (**self).wait_for_wake()
    }

    fn listen(&mut self) -> Result<Option<Utterance>> {
        (**self).listen()
    }
}

impl<S: Speaker + ?Sized> Speaker for Box<S> {
    fn speak(&mut self, text: &str) -> Result<()> {
        (**self).speak(text)
    }
}
