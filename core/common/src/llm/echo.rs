//! Echo プロバイダ: 通信せず、ユーザー発話をそのまま応答にする（オフライン確認用）

use crate::error::Error;
use crate::llm::provider::{LlmProvider, Prompt};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProvider;

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn build_payload(&self, prompt: &Prompt<'_>) -> Result<Value, Error> {
        Ok(json!({ "system": prompt.system(), "user": prompt.user }))
    }

    fn send(&self, body: &str) -> Result<String, Error> {
        Ok(body.to_string())
    }

    fn extract_text(&self, body: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(body)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;
        Ok(v["user"].as_str().map(str::to_string))
    }
}
