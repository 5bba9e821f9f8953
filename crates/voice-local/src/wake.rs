//! Text wake-word detection over transcripts.

/// Case-insensitive wake phrase matcher.
#[derive(Debug, Clone, Default)]
pub struct WakeWordGate {
    wake_words: Vec<String>,
}

impl WakeWordGate {
    pub fn new(wake_words: &[String]) -> Self {
        let mut wake_words: Vec<String> = wake_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        // Longer phrases first so "hey atom" is stripped whole.
        wake_words.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { wake_words }
    }

    /// No wake words configured: every transcript passes.
    pub fn always_awake(&self) -> bool {
        self.wake_words.is_empty()
    }

    pub fn detect(&self, text: &str) -> bool {
        if self.always_awake() {
            return true;
        }
        let text = text.to_lowercase();
        self.wake_words.iter().any(|w| contains_phrase(&text, w))
    }

    /// Text following the wake word, if any was spoken in the same breath
    /// ("atom, turn on mirror" -> "turn on mirror").
    pub fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        let lower = text.to_lowercase();
        self.wake_words.iter().find_map(|w| {
            let start = find_phrase(&lower, w)?;
            let rest = text.get(start + w.len()..)?;
            let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation());
            (!rest.trim().is_empty()).then_some(rest.trim_end())
        })
    }
}

fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    text.match_indices(phrase).map(|(i, _)| i).find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn contains_phrase(text: &str, phrase: &str) -> bool {
    find_phrase(text, phrase).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> WakeWordGate {
        WakeWordGate::new(&["Atom".to_string(), "hey atom".to_string()])
    }

    #[test]
    fn test_detects_whole_words_only() {
        let gate = gate();
        assert!(gate.detect("Hey Atom"));
        assert!(gate.detect("atom, are you there?"));
        assert!(!gate.detect("the atomic clock"));
        assert!(!gate.detect("good morning"));
    }

    #[test]
    fn test_strip_returns_trailing_command() {
        let gate = gate();
        assert_eq!(gate.strip("Hey Atom, turn on mirror"), Some("turn on mirror"));
        assert_eq!(gate.strip("atom"), None);
        assert_eq!(gate.strip("turn on mirror"), None);
    }

    #[test]
    fn test_empty_gate_is_always_awake() {
        let gate = WakeWordGate::new(&[]);
        assert!(gate.always_awake());
        assert!(gate.detect("anything"));
    }
}
