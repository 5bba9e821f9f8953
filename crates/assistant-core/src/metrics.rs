use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct AssistantMetrics {
    pub turns: IntCounter,
    pub intents: IntCounterVec,
    pub device_commands: IntCounter,
    pub backend_failures: IntCounterVec,
    pub models_loaded: IntGauge,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub atom: AssistantMetrics,
}

impl MetricsHub {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();
        let turns = IntCounter::new("atom_turns", "Utterances processed")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let intents = IntCounterVec::new(
            Opts::new("atom_intents", "Classified turns by intent label"),
            &["intent"],
        )
        .map_err(|e| format!("metrics init error: {e}"))?;
        let device_commands = IntCounter::new("atom_device_commands", "Light commands sent")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let backend_failures = IntCounterVec::new(
            Opts::new("atom_backend_failures", "Recovered collaborator failures"),
            &["service"],
        )
        .map_err(|e| format!("metrics init error: {e}"))?;
        let models_loaded = IntGauge::new("atom_models_loaded", "Classifier bundles in the cache")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let atom = AssistantMetrics {
            turns,
            intents,
            device_commands,
            backend_failures,
            models_loaded,
        };
        let _ = registry.register(Box::new(atom.turns.clone()));
        let _ = registry.register(Box::new(atom.intents.clone()));
        let _ = registry.register(Box::new(atom.device_commands.clone()));
        let _ = registry.register(Box::new(atom.backend_failures.clone()));
        let _ = registry.register(Box::new(atom.models_loaded.clone()));
        Ok(Self { registry, atom })
    }

    pub fn record_intent(&self, label: &str) {
        self.atom.intents.with_label_values(&[label]).inc();
    }

    pub fn record_failure(&self, service: &str) {
        self.atom.backend_failures.with_label_values(&[service]).inc();
    }

    pub fn intent_count(&self, label: &str) -> u64 {
        self.atom.intents.with_label_values(&[label]).get()
    }

    pub fn failure_count(&self, service: &str) -> u64 {
        self.atom.backend_failures.with_label_values(&[service]).get()
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_show_up_in_text() {
        let hub = MetricsHub::new().unwrap();
        hub.atom.turns.inc();
        hub.record_intent("IoT");
        hub.record_failure("lights");
        let text = hub.encode_text();
        assert!(text.contains("atom_turns 1"));
        assert!(text.contains(r#"atom_intents{intent="IoT"} 1"#));
        assert_eq!(hub.failure_count("lights"), 1);
        assert_eq!(hub.intent_count("Music"), 0);
    }
}
