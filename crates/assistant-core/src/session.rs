//! The turn loop: wait for the wake word, hold a conversation, go back to
//! standby.

use crate::assistant::Assistant;
use crate::error::TurnError;
use crate::phrases;
use crate::router::{Intent, RouteOutcome};
use intent_parser::{TurnClassification, FAREWELL};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use voice_local::VoiceError;

/// What a single turn asks of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Listen for another utterance.
    Continue,
    /// Nothing actionable was said; go back to waiting for the wake word.
    Standby,
    /// The user asked the assistant to stop listening.
    Exit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub conversations: u64,
    pub turns: u64,
    pub exits: u64,
}

impl Assistant {
    /// Classify and dispatch one utterance. Never fails: every error is
    /// logged and apologised for.
    pub fn process_turn(&mut self, utterance: &str) -> TurnOutcome {
        info!("User interaction: {}", utterance);
        self.metrics.atom.turns.inc();

        let classification = match self.pipeline.cascade.classify_turn(utterance) {
            Ok(c) => c,
            Err(e) => {
                self.recover(&TurnError::from(e), utterance, phrases::CLASSIFY_FAILED);
                return TurnOutcome::Continue;
            }
        };

        match classification {
            TurnClassification::Exit => {
                self.metrics.record_intent(Intent::Exit.label());
                self.say(FAREWELL);
                TurnOutcome::Exit
            }
            TurnClassification::Blank => {
                debug!("Non-general salutation, back to standby");
                TurnOutcome::Standby
            }
            TurnClassification::Continue(intent) => {
                self.metrics.record_intent(&intent);
                if intent == Intent::Blank.label() {
                    return TurnOutcome::Standby;
                }
                match self.route(&intent, utterance) {
                    RouteOutcome::Continue => TurnOutcome::Continue,
                    RouteOutcome::Exit => TurnOutcome::Exit,
                }
            }
        }
    }

    /// Turns after one wake word, until silence, a non-actionable
    /// utterance, an exit or a stop request. Only a closed input is an error.
    pub fn converse(&mut self, summary: &mut SessionSummary) -> Result<(), VoiceError> {
        while !self.stopped() {
            let utterance = match self.listener.listen() {
                Ok(Some(u)) => u,
                Ok(None) => {
                    debug!("No utterance recognised, back to standby");
                    return Ok(());
                }
                Err(VoiceError::Closed) => return Err(VoiceError::Closed),
                Err(e) => {
                    warn!("Listening failed: {}", e);
                    return Ok(());
                }
            };
            summary.turns += 1;
            match self.process_turn(&utterance.text) {
                TurnOutcome::Continue => {}
                TurnOutcome::Standby => return Ok(()),
                TurnOutcome::Exit => {
                    summary.exits += 1;
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Serve conversations until the input closes or the stop flag is set.
    pub fn run(&mut self) -> SessionSummary {
        let mut summary = SessionSummary::default();
        while !self.stopped() {
            match self.listener.wait_for_wake() {
                Ok(()) => {}
                Err(VoiceError::Closed) => break,
                Err(e) => {
                    error!("Wake word detection failed: {}", e);
                    break;
                }
            }
            if self.stopped() {
                break;
            }
            summary.conversations += 1;
            debug!("Wake word heard, conversation {}", summary.conversations);
            if let Err(e) = self.converse(&mut summary) {
                debug!("Voice input ended: {}", e);
                break;
            }
        }
        info!(
            "Session ended after {} conversations, {} turns",
            summary.conversations, summary.turns
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assistant_scripted, assistant_with, Rig};
    use device_registry::{DeviceCommand, PowerState};
    use std::sync::atomic::Ordering;
    use voice_local::ScriptedListener;

    #[test]
    fn test_exit_salutation_says_farewell() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        assert_eq!(assistant.process_turn("goodbye atom"), TurnOutcome::Exit);
        assert_eq!(rig.speaker.spoken(), vec![FAREWELL]);
        assert_eq!(assistant.metrics().intent_count("Exit"), 1);
    }

    #[test]
    fn test_small_talk_goes_to_standby() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        assert_eq!(assistant.process_turn("hello there"), TurnOutcome::Standby);
        assert_eq!(assistant.process_turn("hmm"), TurnOutcome::Standby);
        assert!(rig.speaker.spoken().is_empty());
    }

    #[test]
    fn test_exit_intent_ends_silently() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        assert_eq!(assistant.process_turn("please stand by"), TurnOutcome::Exit);
        assert!(rig.speaker.spoken().is_empty());
    }

    #[test]
    fn test_conversation_runs_until_silence() {
        let rig = Rig::new();
        let listener = ScriptedListener::new([
            Some("turn off right side lamp"),
            Some("pause the music"),
            None,
            Some("turn on mirror"),
        ]);
        let mut assistant = assistant_scripted(&rig, listener);
        let summary = assistant.run();
        assert_eq!(
            summary,
            SessionSummary {
                conversations: 2,
                turns: 3,
                exits: 0
            }
        );
        assert_eq!(
            rig.lights.sent(),
            vec![
                ("Right Side Lamp".to_string(), DeviceCommand::Turn(PowerState::Off)),
                ("Mirror".to_string(), DeviceCommand::Turn(PowerState::On)),
            ]
        );
        assert!(rig.speaker.said("Turned Mirror on."));
        assert_eq!(assistant.metrics().atom.turns.get(), 3);
        assert_eq!(assistant.metrics().intent_count("IoT"), 2);
    }

    #[test]
    fn test_exit_returns_to_standby_not_shutdown() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, ["goodbye", "play the song back in black"]);
        let summary = assistant.run();
        assert_eq!(summary.conversations, 2);
        assert_eq!(summary.exits, 1);
        assert_eq!(rig.player.calls().len(), 2);
    }

    #[test]
    fn test_errors_do_not_end_the_conversation() {
        let rig = Rig::new();
        rig.lights.set_failing(true);
        let mut assistant = assistant_with(&rig, ["turn on mirror", "what's the weather"]);
        let summary = assistant.run();
        assert_eq!(summary.conversations, 1);
        assert_eq!(summary.turns, 2);
        assert!(rig.speaker.said(phrases::LIGHTS_FAILED));
        assert!(rig.speaker.said("Sunny and 72."));
    }

    #[test]
    fn test_stop_flag_ends_session() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, ["turn on mirror"]);
        assistant.stop_handle().store(true, Ordering::SeqCst);
        assert_eq!(assistant.run(), SessionSummary::default());
        assert!(rig.lights.sent().is_empty());
    }
}
