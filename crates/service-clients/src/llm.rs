use crate::error::Result;

/// Free-form text generation.
pub trait LanguageModel: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}
