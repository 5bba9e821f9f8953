//! Named entity extraction for free-text command parameters

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A recognised span of the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Text as it appears in the utterance
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Optional entity label (artist, song, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Finds entity spans in an utterance.
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<EntitySpan>>;
}

/// Join the text of every span with single spaces.
pub fn join_spans(spans: &[EntitySpan]) -> String {
    spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
struct WordToken {
    lower: String,
    start: usize,
    end: usize,
}

fn word_tokens(text: &str) -> Vec<WordToken> {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = WORD_REGEX.get_or_init(|| {
        Regex::new(r"[\w]+(?:'[\w]+)?").expect("Invalid regex pattern - this is a bug")
    });
    re.find_iter(text)
        .map(|m| WordToken {
            lower: m.as_str().to_lowercase(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// One known phrase in a gazetteer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub phrase: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Dictionary lookup of known phrases.
///
/// Matching is case-insensitive on whole words; at each position the longest
/// phrase wins and spans never overlap.
#[derive(Debug, Clone, Default)]
pub struct GazetteerExtractor {
    entries: Vec<(Vec<String>, Option<String>)>,
}

impl GazetteerExtractor {
    pub fn new(entries: impl IntoIterator<Item = GazetteerEntry>) -> Self {
        let mut entries: Vec<(Vec<String>, Option<String>)> = entries
            .into_iter()
            .map(|e| {
                let words: Vec<String> =
                    word_tokens(&e.phrase).into_iter().map(|t| t.lower).collect();
                (words, e.label)
            })
            .filter(|(words, _)| !words.is_empty())
            .collect();
        // Longest phrases first so the first hit at a position is the longest.
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntityExtractor for GazetteerExtractor {
    fn extract(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let tokens = word_tokens(text);
        let mut spans = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let hit = self.entries.iter().find(|(words, _)| {
                i + words.len() <= tokens.len()
                    && words
                        .iter()
                        .zip(&tokens[i..])
                        .all(|(w, t)| *w == t.lower)
            });
            match hit {
                Some((words, label)) => {
                    let start = tokens[i].start;
                    let end = tokens[i + words.len() - 1].end;
                    spans.push(EntitySpan {
                        text: text[start..end].to_string(),
                        start,
                        end,
                        label: label.clone(),
                    });
                    i += words.len();
                }
                None => i += 1,
            }
        }
        Ok(spans)
    }
}

/// Settings for [`TrailingPhraseExtractor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailingPhraseConfig {
    /// Words that introduce the payload ("play", ...)
    pub triggers: Vec<String>,
    /// Words stripped from either edge of the payload
    pub fillers: Vec<String>,
}

impl Default for TrailingPhraseConfig {
    fn default() -> Self {
        let triggers = ["play", "queue", "put"];
        let fillers = [
            "on", "me", "some", "a", "an", "the", "song", "track", "artist", "album",
            "playlist", "genre", "music", "by", "called", "named", "please", "now",
        ];
        Self {
            triggers: triggers.iter().map(|s| s.to_string()).collect(),
            fillers: fillers.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Takes everything after the first trigger word as a single span, trimming
/// filler words from both edges.
#[derive(Debug, Clone, Default)]
pub struct TrailingPhraseExtractor {
    config: TrailingPhraseConfig,
}

impl TrailingPhraseExtractor {
    pub fn new(config: TrailingPhraseConfig) -> Self {
        Self { config }
    }

    fn is_filler(&self, word: &str) -> bool {
        self.config.fillers.iter().any(|f| f == word)
    }
}

impl EntityExtractor for TrailingPhraseExtractor {
    fn extract(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let tokens = word_tokens(text);
        let Some(trigger) = tokens
            .iter()
            .position(|t| self.config.triggers.iter().any(|w| *w == t.lower))
        else {
            return Ok(Vec::new());
        };

        let mut rest = &tokens[trigger + 1..];
        while let Some((first, tail)) = rest.split_first() {
            if !self.is_filler(&first.lower) {
                break;
            }
            rest = tail;
        }
        while let Some((last, head)) = rest.split_last() {
            if !self.is_filler(&last.lower) {
                break;
            }
            rest = head;
        }

        match (rest.first(), rest.last()) {
            (Some(first), Some(last)) => Ok(vec![EntitySpan {
                text: text[first.start..last.end].to_string(),
                start: first.start,
                end: last.end,
                label: None,
            }]),
            _ => Ok(Vec::new()),
        }
    }
}
