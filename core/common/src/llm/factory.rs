//! 解決済みプロファイルからプロバイダを作る

use crate::error::Error;
use crate::llm::config::ProviderKind;
use crate::llm::echo::EchoProvider;
use crate::llm::openai_compat::OpenAiCompatProvider;
use crate::llm::provider::{LlmProvider, Prompt};
use crate::llm::resolver::ResolvedProvider;
use serde_json::Value;

/// 具体的なプロバイダのどれか（LlmDriver に渡すための enum）
pub enum AnyProvider {
    OpenAiCompat(OpenAiCompatProvider),
    Echo(EchoProvider),
}

impl AnyProvider {
    fn inner(&self) -> &dyn LlmProvider {
        match self {
            Self::OpenAiCompat(p) => p,
            Self::Echo(p) => p,
        }
    }
}

impl LlmProvider for AnyProvider {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn build_payload(&self, prompt: &Prompt<'_>) -> Result<Value, Error> {
        self.inner().build_payload(prompt)
    }

    fn send(&self, body: &str) -> Result<String, Error> {
        self.inner().send(body)
    }

    fn extract_text(&self, body: &str) -> Result<Option<String>, Error> {
        self.inner().extract_text(body)
    }
}

/// `model_override`（-m）はプロファイルの model より優先する
pub fn create_provider(resolved: &ResolvedProvider, model_override: Option<String>) -> AnyProvider {
    let mut options = resolved.options.clone();
    if model_override.is_some() {
        options.model = model_override;
    }
    match resolved.kind {
        ProviderKind::Sonar => AnyProvider::OpenAiCompat(OpenAiCompatProvider::sonar(options)),
        ProviderKind::OpenaiCompat => {
            AnyProvider::OpenAiCompat(OpenAiCompatProvider::openai_compat(options))
        }
        ProviderKind::Echo => AnyProvider::Echo(EchoProvider),
    }
}
