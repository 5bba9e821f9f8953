//! YAML configuration. Every field has a default, so an empty file is valid.

use anyhow::Context;
use intent_parser::{BundleKind, BundleSpec, IntentConfig};
use serde::{Deserialize, Serialize};
use service_clients::Units;
use std::fs;
use std::path::{Path, PathBuf};
use voice_local::VoiceConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub assistant: AssistantSection,
    pub models: ModelsSection,
    pub devices: DevicesSection,
    pub music: MusicSection,
    pub weather: WeatherSection,
    pub llm: LlmSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSection {
    pub name: String,
    pub wake_words: Vec<String>,
    /// Upper bound on LLM exchanges in one research conversation.
    pub research_max_turns: usize,
    pub city: String,
    pub units: Units,
}

impl Default for AssistantSection {
    fn default() -> Self {
        let voice = VoiceConfig::default();
        Self {
            name: voice.voice_name,
            wake_words: voice.wake_words,
            research_max_turns: 5,
            city: "High Point".to_string(),
            units: Units::Imperial,
        }
    }
}

impl AssistantSection {
    pub fn voice(&self) -> VoiceConfig {
        VoiceConfig {
            wake_words: self.wake_words.clone(),
            voice_name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsSection {
    /// Base directory for relative bundle paths
    pub dir: PathBuf,
    pub bundles: Vec<BundleSpec>,
    /// Bundles loaded before the assistant reports ready
    pub preload: Vec<String>,
    pub stages: IntentConfig,
}

impl Default for ModelsSection {
    fn default() -> Self {
        let stages = IntentConfig::default();
        let keyword = |name: &str| {
            BundleSpec::new(
                name,
                BundleKind::Keyword,
                Some(PathBuf::from(format!("{name}.json"))),
            )
        };
        Self {
            dir: PathBuf::from("models"),
            bundles: vec![
                keyword(&stages.salutation_model),
                keyword(&stages.intent_model),
                keyword(&stages.music_action_model),
                keyword(&stages.music_target_model),
                BundleSpec::new(&stages.music_entity_model, BundleKind::TrailingPhrase, None),
            ],
            preload: stages.model_names(),
            stages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicesSection {
    /// YAML device list; the built-in installation when unset
    pub registry: Option<PathBuf>,
    pub api_base_url: String,
}

impl Default for DevicesSection {
    fn default() -> Self {
        Self {
            registry: None,
            api_base_url: "https://developer-api.govee.com/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicSection {
    pub api_base_url: String,
}

impl Default for MusicSection {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.spotify.com/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSection {
    pub api_base_url: String,
}

impl Default for WeatherSection {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openweathermap.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub endpoint: String,
    pub model: String,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "llama3".to_string(),
        }
    }
}

/// Credentials, read from the environment only.
#[derive(Clone, Default)]
pub struct Secrets {
    pub govee_api_key: Option<String>,
    pub spotify_access_token: Option<String>,
    pub weather_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            govee_api_key: var("GOVEE_API_KEY"),
            spotify_access_token: var("SPOTIFY_ACCESS_TOKEN"),
            weather_api_key: var("WEATHER_API_KEY"),
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("govee_api_key", &set(&self.govee_api_key))
            .field("spotify_access_token", &set(&self.spotify_access_token))
            .field("weather_api_key", &set(&self.weather_api_key))
            .finish()
    }
}

impl AssistantConfig {
    /// Relative model and device paths are resolved against the directory
    /// holding the config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw =
            fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
        let mut cfg: AssistantConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing yaml: {}", path.display()))?;
        if let Some(base) = path.parent() {
            cfg.resolve_paths(base);
        }
        Ok(cfg)
    }

    fn resolve_paths(&mut self, base: &Path) {
        if self.models.dir.is_relative() {
            self.models.dir = base.join(&self.models.dir);
        }
        if let Some(reg) = self.devices.registry.as_mut() {
            if reg.is_relative() {
                *reg = base.join(&*reg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = AssistantConfig::default();
        assert_eq!(cfg.assistant.research_max_turns, 5);
        assert_eq!(cfg.assistant.city, "High Point");
        assert_eq!(cfg.models.bundles.len(), 5);
        assert_eq!(cfg.models.preload, cfg.models.stages.model_names());
    }

    #[test]
    fn test_partial_file_and_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atom.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "assistant:\n  city: Greensboro\n  research_max_turns: 2\ndevices:\n  registry: devices.yaml\n"
        )
        .unwrap();

        let cfg = AssistantConfig::load(&path).unwrap();
        assert_eq!(cfg.assistant.city, "Greensboro");
        assert_eq!(cfg.assistant.research_max_turns, 2);
        assert_eq!(cfg.assistant.name, "Atom");
        assert_eq!(cfg.models.dir, dir.path().join("models"));
        assert_eq!(cfg.devices.registry, Some(dir.path().join("devices.yaml")));
    }

    #[test]
    fn test_bad_yaml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "assistant: [unclosed").unwrap();
        let err = AssistantConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.yaml"));
    }

    #[test]
    fn test_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/atom.yaml");
        let cfg = AssistantConfig::load(&path).unwrap();
        assert_eq!(cfg.models.bundles.len(), 5);
        assert_eq!(cfg.models.preload, cfg.models.stages.model_names());
        assert!(cfg.models.dir.join("intent.json").exists());
        let devices = device_registry::load_registry_file(cfg.devices.registry.unwrap()).unwrap();
        assert_eq!(devices.len(), 9);
    }
}
