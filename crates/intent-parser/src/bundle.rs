//! Classifier bundles: vectorizer, transformer, model and label decoder applied
//! to raw text as one pipeline.
//!
//! A bundle is a pure function of its input once loaded. Two classifier
//! flavours exist:
//!
//! - [`TfidfLinearBundle`]: bag-of-words counts, TF-IDF weighting with L2
//!   normalisation, and a linear model whose argmax is decoded to a label.
//! - [`KeywordClassifier`]: keyword and phrase hit counting, used when no
//!   trained artifact is available.

use crate::error::{ClassifierError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Label produced by one classifier stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A loaded text classifier. Implementations are stateless after load.
pub trait TextClassifier: Send + Sync {
    /// Predict a single label for `text`.
    fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Every label this classifier can emit.
    fn labels(&self) -> Vec<String>;
}

/// Token pattern of a default count vectorizer: words of two or more characters.
fn word_tokens(text: &str, lowercase: bool) -> Vec<String> {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"(?u)\b\w\w+\b").expect("Invalid regex pattern - this is a bug")
    });
    let text = if lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };
    re.find_iter(&text).map(|m| m.as_str().to_string()).collect()
}

fn default_true() -> bool {
    true
}

/// Maps tokens to column counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizer {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
}

impl CountVectorizer {
    pub fn dimension(&self) -> usize {
        self.vocabulary.values().max().map_or(0, |m| m + 1)
    }

    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut counts = vec![0.0; self.dimension()];
        for token in word_tokens(text, self.lowercase) {
            if let Some(&col) = self.vocabulary.get(&token) {
                counts[col] += 1.0;
            }
        }
        counts
    }
}

/// Re-weights raw counts by inverse document frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfTransformer {
    pub idf: Vec<f32>,
    #[serde(default = "default_true")]
    pub normalize: bool,
}

impl TfidfTransformer {
    pub fn transform(&self, counts: &[f32]) -> Result<Vec<f32>> {
        if counts.len() != self.idf.len() {
            return Err(ClassifierError::Shape(format!(
                "{} counts for {} idf weights",
                counts.len(),
                self.idf.len()
            )));
        }
        let mut weighted: Vec<f32> = counts
            .iter()
            .zip(&self.idf)
            .map(|(c, idf)| c * idf)
            .collect();
        if self.normalize {
            let norm = weighted.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in &mut weighted {
                    *v /= norm;
                }
            }
        }
        Ok(weighted)
    }
}

/// One-vs-rest linear decision function.
///
/// A single coefficient row is treated as a binary model: a positive score
/// selects class 1, otherwise class 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<Vec<f32>>,
    pub intercepts: Vec<f32>,
}

impl LinearModel {
    fn scores(&self, x: &[f32]) -> Result<Vec<f32>> {
        if self.coefficients.len() != self.intercepts.len() {
            return Err(ClassifierError::Shape(format!(
                "{} coefficient rows for {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| {
                if row.len() != x.len() {
                    return Err(ClassifierError::Shape(format!(
                        "coefficient row of {} for input of {}",
                        row.len(),
                        x.len()
                    )));
                }
                Ok(row.iter().zip(x).map(|(w, v)| w * v).sum::<f32>() + b)
            })
            .collect()
    }

    /// Returns the winning class index and a softmax confidence.
    pub fn predict(&self, x: &[f32]) -> Result<(usize, f32)> {
        let scores = self.scores(x)?;
        match scores.as_slice() {
            [] => Err(ClassifierError::EmptyModel),
            [score] => {
                let p = 1.0 / (1.0 + (-score).exp());
                if *score > 0.0 {
                    Ok((1, p))
                } else {
                    Ok((0, 1.0 - p))
                }
            }
            _ => {
                let mut best = 0usize;
                let mut best_v = f32::NEG_INFINITY;
                for (i, v) in scores.iter().copied().enumerate() {
                    if v > best_v {
                        best_v = v;
                        best = i;
                    }
                }
                let denom: f32 = scores.iter().map(|s| (s - best_v).exp()).sum();
                Ok((best, 1.0 / denom))
            }
        }
    }
}

/// Maps class indices back to label strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDecoder {
    pub classes: Vec<String>,
}

impl LabelDecoder {
    pub fn decode(&self, index: usize) -> Result<&str> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                ClassifierError::Shape(format!(
                    "class index {index} outside {} labels",
                    self.classes.len()
                ))
            })
    }
}

/// Count vectorizer + TF-IDF transformer + linear model + label decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfLinearBundle {
    pub vectorizer: CountVectorizer,
    pub transformer: TfidfTransformer,
    pub model: LinearModel,
    pub decoder: LabelDecoder,
}

impl TfidfLinearBundle {
    /// Check that every stage agrees on dimensions.
    pub fn validate(&self) -> Result<()> {
        let dim = self.vectorizer.dimension();
        if self.transformer.idf.len() != dim {
            return Err(ClassifierError::Shape(format!(
                "vocabulary of {dim} but {} idf weights",
                self.transformer.idf.len()
            )));
        }
        if self.decoder.classes.is_empty() {
            return Err(ClassifierError::EmptyModel);
        }
        let rows = self.model.coefficients.len();
        let classes = self.decoder.classes.len();
        let binary = rows == 1 && classes == 2;
        if !binary && rows != classes {
            return Err(ClassifierError::Shape(format!(
                "{rows} coefficient rows for {classes} classes"
            )));
        }
        Ok(())
    }
}

impl TextClassifier for TfidfLinearBundle {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let counts = self.vectorizer.transform(text);
        let features = self.transformer.transform(&counts)?;
        let (index, confidence) = self.model.predict(&features)?;
        let label = self.decoder.decode(index)?;
        Ok(ClassificationResult::new(label, Some(confidence)))
    }

    fn labels(&self) -> Vec<String> {
        self.decoder.classes.clone()
    }
}

/// Keyword table classifier.
///
/// Single words match whole tokens, multi-word keywords match as phrases. The
/// label with the most hits wins; ties go to the label listed first. No hits
/// at all yields `default`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordClassifier {
    pub labels: Vec<(String, Vec<String>)>,
    pub default: String,
}

impl KeywordClassifier {
    fn hits(tokens: &[String], padded: &str, keywords: &[String]) -> usize {
        keywords
            .iter()
            .map(|kw| kw.to_lowercase())
            .filter(|kw| {
                if kw.contains(' ') {
                    padded.contains(&format!(" {kw} "))
                } else {
                    tokens.iter().any(|t| t == kw)
                }
            })
            .count()
    }
}

impl TextClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let tokens = crate::lexicon::tokenize(text);
        let padded = format!(" {} ", tokens.join(" "));

        let mut best: Option<(&str, usize)> = None;
        let mut total = 0usize;
        for (label, keywords) in &self.labels {
            let hits = Self::hits(&tokens, &padded, keywords);
            total += hits;
            if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
                best = Some((label, hits));
            }
        }

        Ok(match best {
            Some((label, hits)) => {
                ClassificationResult::new(label, Some(hits as f32 / total as f32))
            }
            None => ClassificationResult::new(self.default.clone(), None),
        })
    }

    fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.labels.iter().map(|(l, _)| l.clone()).collect();
        if !labels.contains(&self.default) {
            labels.push(self.default.clone());
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting_bundle() -> TfidfLinearBundle {
        let vocabulary = [("hello", 0), ("goodbye", 1), ("lights", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        TfidfLinearBundle {
            vectorizer: CountVectorizer {
                vocabulary,
                lowercase: true,
            },
            transformer: TfidfTransformer {
                idf: vec![1.0, 1.0, 1.5],
                normalize: true,
            },
            model: LinearModel {
                coefficients: vec![
                    vec![2.0, -1.0, 0.0],
                    vec![-1.0, 2.0, 0.0],
                    vec![0.0, 0.0, 2.0],
                ],
                intercepts: vec![0.0, 0.0, 0.0],
            },
            decoder: LabelDecoder {
                classes: vec!["Greeting".into(), "Exit".into(), "General".into()],
            },
        }
    }

    #[test]
    fn test_vectorizer_ignores_single_characters_and_case() {
        let bundle = greeting_bundle();
        let counts = bundle.vectorizer.transform("Hello a HELLO lights");
        assert_eq!(counts, vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_tfidf_is_l2_normalised() {
        let t = TfidfTransformer {
            idf: vec![1.0, 1.0],
            normalize: true,
        };
        let out = t.transform(&[3.0, 4.0]).unwrap();
        assert!((out[0] - 0.6).abs() < 1e-6);
        assert!((out[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_bundle_predicts_decoded_label() {
        let bundle = greeting_bundle();
        bundle.validate().unwrap();
        let result = bundle.classify("goodbye then").unwrap();
        assert_eq!(result.label, "Exit");
        assert!(result.confidence.unwrap() > 0.5);

        assert_eq!(bundle.classify("turn the lights on").unwrap().label, "General");
    }

    #[test]
    fn test_binary_model_uses_sign_of_score() {
        let model = LinearModel {
            coefficients: vec![vec![1.0]],
            intercepts: vec![-0.5],
        };
        assert_eq!(model.predict(&[1.0]).unwrap().0, 1);
        assert_eq!(model.predict(&[0.0]).unwrap().0, 0);
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let mut bundle = greeting_bundle();
        bundle.transformer.idf.pop();
        assert!(matches!(bundle.validate(), Err(ClassifierError::Shape(_))));
        assert!(bundle.classify("hello").is_err());
    }

    #[test]
    fn test_keyword_classifier_counts_hits() {
        let classifier = KeywordClassifier {
            labels: vec![
                ("Music".into(), vec!["play".into(), "song".into()]),
                ("Weather".into(), vec!["weather".into(), "rain".into()]),
            ],
            default: "Blank".into(),
        };
        assert_eq!(classifier.classify("Play that song").unwrap().label, "Music");
        assert_eq!(
            classifier.classify("will it rain? what's the weather").unwrap().label,
            "Weather"
        );
        let none = classifier.classify("hmm").unwrap();
        assert_eq!(none.label, "Blank");
        assert_eq!(none.confidence, None);
    }

    #[test]
    fn test_keyword_ties_go_to_first_label() {
        let classifier = KeywordClassifier {
            labels: vec![
                ("First".into(), vec!["alpha".into()]),
                ("Second".into(), vec!["beta".into()]),
            ],
            default: "None".into(),
        };
        assert_eq!(classifier.classify("beta alpha").unwrap().label, "First");
    }

    #[test]
    fn test_keyword_phrases_match_whole_words() {
        let classifier = KeywordClassifier {
            labels: vec![("Exit".into(), vec!["that's all".into(), "bye".into()])],
            default: "General".into(),
        };
        assert_eq!(classifier.classify("ok, that's all").unwrap().label, "Exit");
        assert_eq!(classifier.classify("maybe").unwrap().label, "General");
    }
}
