//! Domain handlers. Each returns what went wrong; the router turns failures
//! into an apology.

use crate::assistant::Assistant;
use crate::error::Result;
use intent_parser::{
    parse_device_command, plan_device_commands, plan_music_command, AttributeValue, LightingPlan,
    MusicDirective,
};
use service_clients::search_and_play;
use tracing::{info, warn};

/// Spoken confirmation for an executed lighting plan.
fn lighting_confirmation(plan: &LightingPlan) -> String {
    let device = &plan.device.name;
    match (&plan.command.action[..], &plan.command.attribute) {
        ("turn", Some(value)) => format!("Turned {device} {value}."),
        (_, Some(AttributeValue::Number(level))) => {
            format!("Set {device} brightness to {level}.")
        }
        (_, Some(AttributeValue::Text(color))) => format!("Changed {device} to color {color}."),
        (_, None) => format!("Updated {device}."),
    }
}

impl Assistant {
    /// Parse a lighting phrase and send the resulting commands.
    pub(crate) fn handle_lighting(&mut self, utterance: &str) -> Result<String> {
        let request =
            parse_device_command(utterance, &self.pipeline.devices, &self.pipeline.palette)?;
        let lights = &self.services.lights;
        let plan = plan_device_commands(&request, lights.backend(), &self.pipeline.palette)?;
        info!(
            "Lighting command: {} {} -> {:?}",
            plan.command.action, plan.device.name, plan.command.attribute
        );
        let sent = lights.execute_all(&plan.device, &plan.steps)?;
        self.metrics.atom.device_commands.inc_by(sent as u64);
        Ok(lighting_confirmation(&plan))
    }

    /// Classify a music request and drive the player.
    pub(crate) fn handle_music(&mut self, utterance: &str) -> Result<()> {
        let command = self.pipeline.music.classify_command(utterance)?;
        info!("Interpreting: {} as {:?}", utterance, command);
        let player = &self.services.player;
        match plan_music_command(&command) {
            MusicDirective::Play { query } => {
                search_and_play(&**player, &query)?;
            }
            MusicDirective::Pause => {
                player.pause()?;
                info!("Playback stopped");
            }
            MusicDirective::Next => {
                player.next_track()?;
                info!("Skipped to next track");
            }
            MusicDirective::Previous => {
                player.previous_track()?;
                info!("Rewound to previous track");
            }
            MusicDirective::Volume { change } => {
                let current = if change.is_relative() {
                    player.current_volume()?
                } else {
                    None
                };
                if change.is_relative() && current.is_none() {
                    warn!("No active playback device, volume left unchanged");
                }
                if let Some(level) = change.resolve(current) {
                    player.set_volume(level)?;
                    info!("Volume level set to: {}%", level);
                }
            }
            MusicDirective::Ignore { reason } => warn!("Music command ignored: {}", reason),
        }
        Ok(())
    }

    pub(crate) fn handle_weather(&mut self) -> Result<String> {
        Ok(self.services.weather.report(&self.settings.city)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assistant_with, Rig};
    use device_registry::{DeviceCommand, PowerState};
    use intent_parser::ParseError;
    use service_clients::{MusicPlayer, PlayerCall};

    #[test]
    fn test_lighting_turn_off() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        let said = assistant.handle_lighting("turn off right side lamp").unwrap();
        assert_eq!(said, "Turned Right Side Lamp off.");
        assert_eq!(
            rig.lights.sent(),
            vec![("Right Side Lamp".to_string(), DeviceCommand::Turn(PowerState::Off))]
        );
        assert_eq!(assistant.metrics().atom.device_commands.get(), 1);
    }

    #[test]
    fn test_lighting_colour_confirms() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        let said = assistant.handle_lighting("set the backlight to sky blue").unwrap();
        assert_eq!(said, "Changed Backlight to color sky blue.");
    }

    #[test]
    fn test_lighting_parse_error_sends_nothing() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        let err = assistant.handle_lighting("set the garage to red").unwrap_err();
        assert!(matches!(
            err,
            crate::TurnError::Parse(ParseError::DeviceNotFound(_))
        ));
        assert!(rig.lights.sent().is_empty());
    }

    #[test]
    fn test_music_volume_up() {
        let rig = Rig::new();
        rig.player.set_volume(45).unwrap();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        assistant.handle_music("turn the volume up").unwrap();
        assert_eq!(rig.player.volume(), Some(55));
    }

    #[test]
    fn test_music_volume_out_of_range_is_rejected() {
        let rig = Rig::new();
        rig.player.set_volume(40).unwrap();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        assistant.handle_music("set the volume to 120").unwrap();
        assert_eq!(rig.player.volume(), Some(40));
        assert_eq!(rig.player.calls(), vec![PlayerCall::SetVolume(40)]);
    }

    #[test]
    fn test_music_play_song() {
        let rig = Rig::new();
        let mut assistant = assistant_with(&rig, Vec::<&str>::new());
        assistant.handle_music("play the song back in black").unwrap();
        assert_eq!(
            rig.player.calls(),
            vec![
                PlayerCall::Search("back in black".into()),
                PlayerCall::Play("spotify:track:back-in-black".into())
            ]
        );
    }
}
