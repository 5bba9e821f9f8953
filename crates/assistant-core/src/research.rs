//! News and research questions: a bounded conversation with the language
//! model.

use crate::assistant::Assistant;
use crate::error::TurnError;
use crate::phrases;
use crate::router::{Intent, RouteOutcome};
use intent_parser::{TurnClassification, FAREWELL};
use tracing::{info, warn};

impl Assistant {
    /// Answer `utterance`, then keep answering follow-ups for as long as
    /// they classify as actionable, up to `research_max_turns` answers.
    /// A follow-up for another domain is routed there and ends the research.
    /// Silence, a non-actionable follow-up or any failure ends the
    /// conversation; an exit follow-up ends the whole exchange.
    pub(crate) fn research(&mut self, utterance: &str) -> RouteOutcome {
        let max_turns = self.settings.research_max_turns.max(1);
        let mut prompt = utterance.to_string();
        self.say(phrases::RESEARCH_HOLD);

        for turn in 1..=max_turns {
            match self.services.llm.generate(&prompt) {
                Ok(answer) => {
                    info!("Utterance: {} Response: {}", prompt, answer);
                    self.say(&answer);
                }
                Err(e) => {
                    self.recover(&TurnError::from(e), &prompt, phrases::RESEARCH_FAILED);
                    break;
                }
            }
            if turn == max_turns {
                info!("Research conversation reached {} answers", max_turns);
                break;
            }

            let follow_up = match self.listener.listen() {
                Ok(Some(u)) => u.text,
                Ok(None) => break,
                Err(e) => {
                    warn!("Listening for a follow-up failed: {}", e);
                    break;
                }
            };
            match self.pipeline.cascade.classify_turn(&follow_up) {
                Ok(TurnClassification::Continue(label)) => match label.parse::<Intent>() {
                    Ok(Intent::News | Intent::ScientificResearch | Intent::Blank) | Err(_) => {
                        info!("Follow-up '{}' continues research ({})", follow_up, label);
                        prompt = follow_up;
                    }
                    Ok(intent) => {
                        info!("Follow-up '{}' leaves research for {}", follow_up, intent);
                        self.metrics.record_intent(&label);
                        return self.route(&label, &follow_up);
                    }
                },
                Ok(TurnClassification::Exit) => {
                    self.say(FAREWELL);
                    return RouteOutcome::Exit;
                }
                Ok(TurnClassification::Blank) => break,
                Err(e) => {
                    self.recover(&TurnError::from(e), &follow_up, phrases::CLASSIFY_FAILED);
                    break;
                }
            }
        }
        RouteOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assistant_scripted, assistant_with, Rig};
    use device_registry::{DeviceCommand, PowerState};
    use service_clients::MockLanguageModel;
    use voice_local::ScriptedListener;

    #[test]
    fn test_single_answer_then_silence() {
        let rig = Rig::new().with_llm(MockLanguageModel::new().answer("Because of Rayleigh scattering."));
        let listener = ScriptedListener::new([None::<&str>]);
        let mut assistant = assistant_scripted(&rig, listener);
        assert_eq!(
            assistant.research("why is the sky blue"),
            RouteOutcome::Continue
        );
        assert_eq!(
            rig.speaker.spoken(),
            vec![
                phrases::RESEARCH_HOLD.to_string(),
                "Because of Rayleigh scattering.".to_string()
            ]
        );
        assert_eq!(rig.llm.prompts(), vec!["why is the sky blue"]);
    }

    #[test]
    fn test_follow_ups_are_bounded() {
        let rig = Rig::new();
        let mut assistant = assistant_with(
            &rig,
            ["tell me more", "and then what", "keep going", "one more"],
        );
        assistant.research("explain black holes");
        // research_max_turns is 3 in the fixture
        assert_eq!(
            rig.llm.prompts(),
            vec!["explain black holes", "tell me more", "and then what"]
        );
        assert_eq!(
            rig.speaker.spoken().iter().filter(|s| *s == phrases::RESEARCH_HOLD).count(),
            1
        );
    }

    #[test]
    fn test_non_actionable_follow_up_stops() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, ["thank you", "tell me more"]);
        assert_eq!(assistant.research("what is the news"), RouteOutcome::Continue);
        assert_eq!(rig.llm.prompts().len(), 1);
    }

    #[test]
    fn test_other_domain_follow_up_is_routed() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, ["turn on mirror", "tell me more"]);
        assert_eq!(assistant.research("what is the news"), RouteOutcome::Continue);
        assert_eq!(rig.llm.prompts(), vec!["what is the news"]);
        assert_eq!(
            rig.lights.sent(),
            vec![("Mirror".to_string(), DeviceCommand::Turn(PowerState::On))]
        );
        assert!(rig.speaker.said("Turned Mirror on."));
        assert_eq!(assistant.metrics().intent_count("IoT"), 1);
    }

    #[test]
    fn test_research_follow_up_continues() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, ["why does that happen"]);
        assistant.research("explain black holes");
        assert_eq!(
            rig.llm.prompts(),
            vec!["explain black holes", "why does that happen"]
        );
    }

    #[test]
    fn test_exit_follow_up_ends_exchange() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, ["goodbye"]);
        assert_eq!(assistant.research("what is the news"), RouteOutcome::Exit);
        assert_eq!(rig.speaker.spoken().last().map(String::as_str), Some(FAREWELL));
    }

    #[test]
    fn test_model_failure_apologises() {
        let rig = Rig::new().with_llm(MockLanguageModel::new().fail("connection refused"));
        let mut assistant = assistant_with(&rig, ["tell me more"]);
        assert_eq!(assistant.research("what is the news"), RouteOutcome::Continue);
        assert!(rig.speaker.said(phrases::RESEARCH_FAILED));
        assert_eq!(assistant.metrics().failure_count("service"), 1);
    }
}
