//! Language model trait and implementations
//!
//! Agents depend on this trait only; the Gemini-backed implementation lives
//! in `gemini`, and `ScriptedModel` keeps the pipeline runnable offline.

use crate::error::PipelineError;
use crate::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub mod gemini;
pub use gemini::GeminiModel;

/// Trait for text generation (LLM controlled)
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a system + user prompt pair
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Model that replays a fixed queue of responses.
///
/// Used by tests and by the demo binary when no API key is configured.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    pub fn single(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| PipelineError::LlmError("scripted model lock poisoned".to_string()))?;

        responses
            .pop_front()
            .ok_or_else(|| PipelineError::LlmError("scripted model exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_model_replays_in_order() {
        let model = ScriptedModel::new(vec!["first".to_string(), "second".to_string()]);

        assert_eq!(model.generate("s", "u").await.unwrap(), "first");
        assert_eq!(model.generate("s", "u").await.unwrap(), "second");
        assert!(model.generate("s", "u").await.is_err());
    }
}
