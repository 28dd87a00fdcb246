#![allow(dead_code)]

use almanac_core::GenerationRequest;
use almanac_error::{GenerationError, GenerationErrorKind};
use almanac_interface::GenerationService;
use async_trait::async_trait;
use std::sync::Mutex;

type Script = Box<dyn Fn(usize, &str) -> Result<String, GenerationErrorKind> + Send + Sync>;

/// Answers each call from a script given the 1-based call number and prompt,
/// and remembers every prompt it was sent.
pub struct ScriptedService {
    prompts: Mutex<Vec<String>>,
    script: Script,
}

impl ScriptedService {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(usize, &str) -> Result<String, GenerationErrorKind> + Send + Sync + 'static,
    {
        Self {
            prompts: Mutex::new(Vec::new()),
            script: Box::new(script),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.prompt().clone());
            prompts.len()
        };
        (self.script)(call, request.prompt()).map_err(GenerationError::new)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}
