//! LlmDriver: プロバイダに依存しない問い合わせの流れ

use crate::error::Error;
use crate::llm::provider::{LlmProvider, Prompt};

pub struct LlmDriver<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> LlmDriver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// 1 回問い合わせる。応答にテキストが無ければ Ok(None)（代替文言は呼び出し側で決める）。
    pub fn complete(&self, prompt: Prompt<'_>) -> Result<Option<String>, Error> {
        let payload = self.provider.build_payload(&prompt)?;
        let body = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;
        let response = self.provider.send(&body)?;
        self.provider.extract_text(&response)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
