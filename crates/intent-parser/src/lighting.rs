//! Rule-based parsing of smart-light phrases ("turn on mirror",
//! "increase brightness of the backlight by twenty").

use crate::command::{AttributeValue, Domain, ParsedCommand};
use crate::error::ParseError;
use crate::lexicon::{self, is_action_word, is_integer_literal, is_number_word, is_stop_word};
use device_registry::{ColorPalette, Device, DeviceCommand, DeviceRegistry, LightBackend, PowerState};
use serde::Serialize;
use std::fmt;
use tracing::debug;

type Result<T> = core::result::Result<T, ParseError>;

const BRIGHTNESS: &str = "brightness";

/// The attribute word found in a lighting phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeToken {
    Power(PowerState),
    Number(u32),
    /// Lowercase palette name, possibly two words
    Color(String),
}

impl fmt::Display for AttributeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeToken::Power(state) => write!(f, "{state}"),
            AttributeToken::Number(n) => write!(f, "{n}"),
            AttributeToken::Color(name) => f.write_str(name),
        }
    }
}

/// Result of [`parse_device_command`]: what to do, to which device, with what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCommandRequest {
    pub action: String,
    pub device: Device,
    pub attribute: AttributeToken,
    /// The word "brightness" appeared before the attribute.
    pub brightness_keyword: bool,
}

/// Device commands derived from a request, ready for a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightingPlan {
    pub command: ParsedCommand,
    pub device: Device,
    pub steps: Vec<DeviceCommand>,
}

/// Extract `{action, device, attribute}` from a lighting phrase.
///
/// Stop words are dropped except `on`/`off`. "turn on"/"turn off" fix the
/// action and attribute and every remaining word names the device. Otherwise
/// a leading action verb is consumed (default `set`) and the first colour,
/// number or on/off word becomes the attribute; the words before it name the
/// device, which resolves to the first registry entry containing them.
pub fn parse_device_command(
    phrase: &str,
    registry: &DeviceRegistry,
    palette: &ColorPalette,
) -> Result<DeviceCommandRequest> {
    let tokens = lexicon::tokenize(phrase);
    let filtered: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|w| !is_stop_word(w))
        .collect();
    debug!("Filtered words: {:?}", filtered);

    if let Some(power) = turn_phrase(&tokens) {
        let parts: Vec<&str> = filtered
            .iter()
            .copied()
            .filter(|w| *w != "turn" && *w != power.as_str())
            .filter(|w| !is_action_word(w) && *w != BRIGHTNESS)
            .collect();
        let device = resolve_device(phrase, &parts, registry)?;
        return Ok(DeviceCommandRequest {
            action: "turn".to_string(),
            device,
            attribute: AttributeToken::Power(power),
            brightness_keyword: false,
        });
    }

    let (action, rest) = match filtered.split_first() {
        Some((first, rest)) if is_action_word(first) => (first.to_string(), rest),
        _ => ("set".to_string(), filtered.as_slice()),
    };

    let mut attribute = None;
    let mut device_parts = Vec::new();
    let mut brightness_keyword = false;
    let mut i = 0;
    while i < rest.len() {
        let word = rest[i];
        if let Some(next) = rest.get(i + 1) {
            let pair = format!("{word} {next}");
            if palette.contains(&pair) {
                attribute = Some(AttributeToken::Color(pair));
                break;
            }
        }
        if let Some(token) = attribute_token(word, palette)? {
            attribute = Some(token);
            break;
        }
        if word == BRIGHTNESS {
            brightness_keyword = true;
        } else if !is_action_word(word) {
            device_parts.push(word);
        }
        i += 1;
    }

    let Some(attribute) = attribute else {
        return Err(ParseError::Unparseable(phrase.to_string()));
    };
    let device = resolve_device(phrase, &device_parts, registry)?;
    Ok(DeviceCommandRequest {
        action,
        device,
        attribute,
        brightness_keyword,
    })
}

/// `Some(state)` when `turn` is immediately followed by `on` or `off`.
fn turn_phrase(tokens: &[String]) -> Option<PowerState> {
    tokens
        .windows(2)
        .find(|w| w[0] == "turn" && PowerState::parse(&w[1]).is_some())
        .and_then(|w| PowerState::parse(&w[1]))
}

fn attribute_token(word: &str, palette: &ColorPalette) -> Result<Option<AttributeToken>> {
    if palette.contains(word) {
        return Ok(Some(AttributeToken::Color(word.to_string())));
    }
    if is_integer_literal(word) || is_number_word(word) {
        return lexicon::words_to_number(word)
            .map(|n| Some(AttributeToken::Number(n)))
            .ok_or_else(|| ParseError::InvalidAttribute(word.to_string()));
    }
    Ok(PowerState::parse(word).map(AttributeToken::Power))
}

fn resolve_device(phrase: &str, parts: &[&str], registry: &DeviceRegistry) -> Result<Device> {
    if parts.is_empty() {
        return Err(ParseError::Unparseable(phrase.to_string()));
    }
    let name = parts.join(" ");
    registry
        .find_by_partial_name(&name)
        .cloned()
        .ok_or(ParseError::DeviceNotFound(name))
}

/// Resolve the attribute into concrete device commands.
///
/// `increase`/`decrease` with a number apply a delta to the current
/// brightness reported by `lights`; every brightness value is clamped to
/// 0..=100. A colour turns the device on before setting the colour.
pub fn plan_device_commands<L>(
    request: &DeviceCommandRequest,
    lights: &L,
    palette: &ColorPalette,
) -> Result<LightingPlan>
where
    L: LightBackend + ?Sized,
{
    let device = &request.device;
    let mut action = request.action.clone();
    let mut attribute = request.attribute.clone();

    if let AttributeToken::Number(amount) = attribute {
        let relative = matches!(action.as_str(), "increase" | "decrease");
        if relative || request.brightness_keyword {
            let level = if relative {
                let current = lights
                    .brightness(device)
                    .map_err(|e| ParseError::Backend(e.to_string()))?
                    .ok_or_else(|| ParseError::BrightnessUnavailable(device.name.clone()))?;
                let current = i64::from(current);
                let delta = i64::from(amount);
                if action == "increase" {
                    current + delta
                } else {
                    current - delta
                }
            } else {
                i64::from(amount)
            };
            attribute = AttributeToken::Number(level.clamp(0, 100) as u32);
            action = BRIGHTNESS.to_string();
        }
    }

    let (steps, value) = match &attribute {
        AttributeToken::Power(state) => (
            vec![DeviceCommand::Turn(*state)],
            AttributeValue::Text(state.to_string()),
        ),
        AttributeToken::Number(n) => {
            let level = (*n).min(100) as u8;
            (
                vec![DeviceCommand::Brightness(level)],
                AttributeValue::Number(i64::from(level)),
            )
        }
        AttributeToken::Color(name) => {
            let rgb = palette
                .get(name)
                .ok_or_else(|| ParseError::InvalidAttribute(name.clone()))?;
            (
                vec![DeviceCommand::Turn(PowerState::On), DeviceCommand::Color(rgb)],
                AttributeValue::Text(name.clone()),
            )
        }
    };

    let command = ParsedCommand::new(Domain::Lighting, action)
        .with_target(device.name.clone())
        .with_parameter(value.to_string())
        .with_attribute(value);
    Ok(LightingPlan {
        command,
        device: device.clone(),
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use device_registry::{DeviceController, MockLightBackend, Rgb};

    fn parse(phrase: &str) -> Result<DeviceCommandRequest> {
        parse_device_command(
            phrase,
            &DeviceRegistry::default_installation(),
            &ColorPalette::default(),
        )
    }

    #[test]
    fn test_turn_on_mirror() {
        let req = parse("turn on mirror").unwrap();
        assert_eq!(req.action, "turn");
        assert_eq!(req.attribute, AttributeToken::Power(PowerState::On));
        assert_eq!(req.device.name, "Mirror");
    }

    #[test]
    fn test_turn_off_right_side_lamp_sends_single_command() {
        let req = parse("Turn off the right side lamp.").unwrap();
        assert_eq!(req.device.name, "Right Side Lamp");

        let backend = MockLightBackend::new().with_device(&req.device, PowerState::On, 70);
        let plan = plan_device_commands(&req, &backend, &ColorPalette::default()).unwrap();
        assert_eq!(plan.command.action, "turn");
        assert_eq!(plan.command.target.as_deref(), Some("Right Side Lamp"));
        assert_eq!(plan.command.attribute, Some(AttributeValue::Text("off".into())));

        let controller = DeviceController::new(backend.clone());
        controller.execute_all(&plan.device, &plan.steps).unwrap();
        assert_eq!(
            backend.sent(),
            vec![("Right Side Lamp".to_string(), DeviceCommand::Turn(PowerState::Off))]
        );
    }

    #[test]
    fn test_leading_verb_and_trailing_power_word() {
        let req = parse("turn the backlight on").unwrap();
        assert_eq!(req.action, "turn");
        assert_eq!(req.device.name, "Backlight");
        assert_eq!(req.attribute, AttributeToken::Power(PowerState::On));
    }

    #[test]
    fn test_default_action_is_set() {
        let req = parse("mirror blue").unwrap();
        assert_eq!(req.action, "set");
        assert_eq!(req.attribute, AttributeToken::Color("blue".into()));
    }

    #[test]
    fn test_two_word_colour() {
        let req = parse("change the underglow to warm white").unwrap();
        assert_eq!(req.action, "change");
        assert_eq!(req.device.name, "Underglow");
        assert_eq!(req.attribute, AttributeToken::Color("warm white".into()));

        let backend = MockLightBackend::new();
        let plan = plan_device_commands(&req, &backend, &ColorPalette::default()).unwrap();
        assert_eq!(
            plan.steps,
            vec![
                DeviceCommand::Turn(PowerState::On),
                DeviceCommand::Color(Rgb::new(255, 245, 230))
            ]
        );
    }

    #[test]
    fn test_increase_brightness_clamps_at_hundred() {
        let palette = ColorPalette::default();
        let req = parse("increase brightness of mirror by fifty").unwrap();
        assert!(req.brightness_keyword);
        let backend = MockLightBackend::new().with_device(&req.device, PowerState::On, 90);
        let controller = DeviceController::new(backend.clone());

        for _ in 0..3 {
            let plan = plan_device_commands(&req, &backend, &palette).unwrap();
            assert_eq!(plan.command.action, "brightness");
            assert_eq!(plan.steps, vec![DeviceCommand::Brightness(100)]);
            controller.execute_all(&plan.device, &plan.steps).unwrap();
            assert_eq!(backend.state("Mirror").unwrap().brightness, 100);
        }
    }

    #[test]
    fn test_decrease_clamps_at_zero() {
        let req = parse("decrease the backlight by 30").unwrap();
        let backend = MockLightBackend::new().with_device(&req.device, PowerState::On, 20);
        let plan = plan_device_commands(&req, &backend, &ColorPalette::default()).unwrap();
        assert_eq!(plan.steps, vec![DeviceCommand::Brightness(0)]);
        assert_eq!(plan.command.attribute, Some(AttributeValue::Number(0)));
    }

    #[test]
    fn test_absolute_brightness() {
        let req = parse("set mirror brightness to 40").unwrap();
        let backend = MockLightBackend::new();
        let plan = plan_device_commands(&req, &backend, &ColorPalette::default()).unwrap();
        assert_eq!(plan.command.action, "brightness");
        assert_eq!(plan.steps, vec![DeviceCommand::Brightness(40)]);
    }

    #[test]
    fn test_relative_change_needs_current_brightness() {
        let req = parse("increase mirror by ten").unwrap();
        let backend = MockLightBackend::new();
        assert_eq!(
            plan_device_commands(&req, &backend, &ColorPalette::default()),
            Err(ParseError::BrightnessUnavailable("Mirror".into()))
        );

        backend.set_failing(true);
        assert!(matches!(
            plan_device_commands(&req, &backend, &ColorPalette::default()),
            Err(ParseError::Backend(_))
        ));
    }

    #[test]
    fn test_first_inserted_device_wins() {
        let req = parse("set restroom to red").unwrap();
        assert_eq!(req.device.name, "Second Left Restroom");
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(
            parse("mirror please"),
            Err(ParseError::Unparseable("mirror please".into()))
        );
        assert_eq!(parse("set to red"), Err(ParseError::Unparseable("set to red".into())));
        assert_eq!(parse("turn on"), Err(ParseError::Unparseable("turn on".into())));
        assert_eq!(parse(""), Err(ParseError::Unparseable(String::new())));
        assert_eq!(
            parse("set garage to red"),
            Err(ParseError::DeviceNotFound("garage".into()))
        );
        assert_eq!(
            parse("set mirror to 99999999999"),
            Err(ParseError::InvalidAttribute("99999999999".into()))
        );
    }
}
