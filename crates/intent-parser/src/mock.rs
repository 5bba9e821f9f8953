//! In-process classifiers for development and tests.

use crate::bundle::{ClassificationResult, TextClassifier};
use crate::entities::{EntityExtractor, EntitySpan};
use crate::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Always predicts the same label and counts how often it was asked.
pub struct StaticClassifier {
    label: String,
    calls: AtomicUsize,
}

impl StaticClassifier {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextClassifier for StaticClassifier {
    fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ClassificationResult::new(self.label.clone(), Some(1.0)))
    }

    fn labels(&self) -> Vec<String> {
        vec![self.label.clone()]
    }
}

/// Picks the label of the first rule whose needle occurs in the lowercased
/// text, else the default.
pub struct RuleClassifier {
    rules: Vec<(String, String)>,
    default: String,
}

impl RuleClassifier {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            default: default.into(),
        }
    }

    pub fn rule(mut self, needle: impl Into<String>, label: impl Into<String>) -> Self {
        self.rules.push((needle.into().to_lowercase(), label.into()));
        self
    }
}

impl TextClassifier for RuleClassifier {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let lower = text.to_lowercase();
        let label = self
            .rules
            .iter()
            .find(|(needle, _)| lower.contains(needle.as_str()))
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| self.default.clone());
        Ok(ClassificationResult::new(label, None))
    }

    fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.rules.iter().map(|(_, l)| l.clone()).collect();
        labels.push(self.default.clone());
        labels.dedup();
        labels
    }
}

/// Returns the configured phrases wherever they occur in the text.
#[derive(Default)]
pub struct StaticExtractor {
    phrases: Vec<String>,
}

impl StaticExtractor {
    pub fn new(phrases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

impl EntityExtractor for StaticExtractor {
    fn extract(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let mut spans: Vec<EntitySpan> = self
            .phrases
            .iter()
            .filter_map(|p| {
                text.find(p.as_str()).map(|start| EntitySpan {
                    text: p.clone(),
                    start,
                    end: start + p.len(),
                    label: None,
                })
            })
            .collect();
        spans.sort_by_key(|s| s.start);
        Ok(spans)
    }
}
