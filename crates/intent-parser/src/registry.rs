//! Model registry: named classifier bundles loaded once and shared.
//!
//! The registry replaces a process-wide mutable cache. It is built once at
//! startup from [`BundleSpec`]s and handed to every pipeline stage that needs
//! a model. Lookups lazy-load on miss; the cache lock is held across the load
//! so each bundle is read from disk at most once.

use crate::bundle::{KeywordClassifier, TextClassifier, TfidfLinearBundle};
use crate::entities::{
    EntityExtractor, GazetteerEntry, GazetteerExtractor, TrailingPhraseConfig,
    TrailingPhraseExtractor,
};
use crate::error::{ClassifierError, Result};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Kinds of persisted bundles, each with its own factory.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleKind {
    TfidfLinear,
    Keyword,
    Gazetteer,
    TrailingPhrase,
}

impl BundleKind {
    fn role(self) -> &'static str {
        match self {
            BundleKind::TfidfLinear | BundleKind::Keyword => "classifier",
            BundleKind::Gazetteer | BundleKind::TrailingPhrase => "entity extractor",
        }
    }
}

/// Where and how to load one named bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSpec {
    pub name: String,
    pub kind: BundleKind,
    /// Relative paths resolve against the registry directory. Optional only
    /// for kinds that have built-in defaults.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl BundleSpec {
    pub fn new(name: impl Into<String>, kind: BundleKind, path: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            path,
        }
    }
}

/// A loaded bundle.
#[derive(Clone)]
pub enum LoadedBundle {
    Classifier(Arc<dyn TextClassifier>),
    Extractor(Arc<dyn EntityExtractor>),
}

impl LoadedBundle {
    fn role(&self) -> &'static str {
        match self {
            LoadedBundle::Classifier(_) => "classifier",
            LoadedBundle::Extractor(_) => "entity extractor",
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ClassifierError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| ClassifierError::Format(format!("{}: {e}", path.display())))
}

pub fn load_tfidf_linear(path: &Path) -> Result<TfidfLinearBundle> {
    let bundle: TfidfLinearBundle = read_json(path)?;
    bundle.validate()?;
    Ok(bundle)
}

pub fn load_keyword(path: &Path) -> Result<KeywordClassifier> {
    let classifier: KeywordClassifier = read_json(path)?;
    if classifier.labels.is_empty() {
        return Err(ClassifierError::EmptyModel);
    }
    Ok(classifier)
}

pub fn load_gazetteer(path: &Path) -> Result<GazetteerExtractor> {
    let entries: Vec<GazetteerEntry> = read_json(path)?;
    Ok(GazetteerExtractor::new(entries))
}

pub fn load_trailing_phrase(path: Option<&Path>) -> Result<TrailingPhraseExtractor> {
    let config = match path {
        Some(p) => read_json::<TrailingPhraseConfig>(p)?,
        None => TrailingPhraseConfig::default(),
    };
    Ok(TrailingPhraseExtractor::new(config))
}

/// Dispatch to the factory for `spec.kind`.
pub fn load_bundle(spec: &BundleSpec, base_dir: &Path) -> Result<LoadedBundle> {
    let path = spec.path.as_ref().map(|p| {
        if p.is_absolute() {
            p.clone()
        } else {
            base_dir.join(p)
        }
    });
    let require_path = || {
        path.clone().ok_or_else(|| {
            ClassifierError::Format(format!("bundle '{}' has no path", spec.name))
        })
    };

    Ok(match spec.kind {
        BundleKind::TfidfLinear => {
            LoadedBundle::Classifier(Arc::new(load_tfidf_linear(&require_path()?)?))
        }
        BundleKind::Keyword => LoadedBundle::Classifier(Arc::new(load_keyword(&require_path()?)?)),
        BundleKind::Gazetteer => {
            LoadedBundle::Extractor(Arc::new(load_gazetteer(&require_path()?)?))
        }
        BundleKind::TrailingPhrase => {
            LoadedBundle::Extractor(Arc::new(load_trailing_phrase(path.as_deref())?))
        }
    })
}

/// Named, load-once cache of bundles.
pub struct ModelRegistry {
    base_dir: PathBuf,
    specs: HashMap<String, BundleSpec>,
    cache: Mutex<HashMap<String, LoadedBundle>>,
}

impl ModelRegistry {
    pub fn new(base_dir: impl Into<PathBuf>, specs: impl IntoIterator<Item = BundleSpec>) -> Self {
        Self {
            base_dir: base_dir.into(),
            specs: specs.into_iter().map(|s| (s.name.clone(), s)).collect(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Register an already-built classifier under `name`.
    pub fn insert_classifier(&self, name: impl Into<String>, classifier: Arc<dyn TextClassifier>) {
        self.cache
            .lock()
            .insert(name.into(), LoadedBundle::Classifier(classifier));
    }

    /// Register an already-built entity extractor under `name`.
    pub fn insert_extractor(&self, name: impl Into<String>, extractor: Arc<dyn EntityExtractor>) {
        self.cache
            .lock()
            .insert(name.into(), LoadedBundle::Extractor(extractor));
    }

    /// Load every named bundle now. Any failure is reported as
    /// [`ClassifierError::ModelUnavailable`].
    pub fn preload<S: AsRef<str>>(&self, names: &[S]) -> Result<usize> {
        let mut count = 0;
        for name in names {
            self.get_or_load(name.as_ref())?;
            count += 1;
        }
        info!("Loaded and cached {} models", count);
        Ok(count)
    }

    pub fn classifier(&self, name: &str) -> Result<Arc<dyn TextClassifier>> {
        match self.get_or_load(name)? {
            LoadedBundle::Classifier(c) => Ok(c),
            other => Err(ClassifierError::WrongKind {
                name: name.to_string(),
                expected: "classifier",
                actual: other.role(),
            }),
        }
    }

    pub fn extractor(&self, name: &str) -> Result<Arc<dyn EntityExtractor>> {
        match self.get_or_load(name)? {
            LoadedBundle::Extractor(e) => Ok(e),
            other => Err(ClassifierError::WrongKind {
                name: name.to_string(),
                expected: "entity extractor",
                actual: other.role(),
            }),
        }
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.cache.lock().contains_key(name)
    }

    pub fn loaded_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cache.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn get_or_load(&self, name: &str) -> Result<LoadedBundle> {
        let mut cache = self.cache.lock();
        if let Some(bundle) = cache.get(name) {
            return Ok(bundle.clone());
        }

        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| ClassifierError::UnknownBundle(name.to_string()))?;
        debug!("Loading {} '{}' ({:?})", spec.kind.role(), name, spec.kind);
        let bundle =
            load_bundle(spec, &self.base_dir).map_err(|e| ClassifierError::ModelUnavailable {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        cache.insert(name.to_string(), bundle.clone());
        Ok(bundle)
    }
}
