//! `/chat/completions` 形式のプロバイダ（Sonar / OpenAI 互換）
//!
//! Sonar（Perplexity）はこの形式の既定値違いとして扱う。

use crate::error::Error;
use crate::llm::provider::{LlmProvider, Prompt};
use serde_json::{json, Value};

pub const SONAR_BASE_URL: &str = "https://api.perplexity.ai";
pub const SONAR_MODEL: &str = "sonar";
pub const SONAR_API_KEY_ENV: &str = "SONAR_API_TOKEN";

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// プロファイルの値（未指定は None）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointOptions {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
}

pub struct OpenAiCompatProvider {
    name: &'static str,
    model: String,
    completions_url: String,
    api_key_env: Option<String>,
    temperature: f64,
}

impl OpenAiCompatProvider {
    /// 汎用の OpenAI 互換エンドポイント。api_key_env が無ければ Authorization を付けない。
    pub fn openai_compat(options: EndpointOptions) -> Self {
        Self::build("openai_compat", options, OPENAI_MODEL, OPENAI_BASE_URL)
    }

    /// Sonar。api_key_env の既定は SONAR_API_TOKEN。
    pub fn sonar(mut options: EndpointOptions) -> Self {
        if options.api_key_env.is_none() {
            options.api_key_env = Some(SONAR_API_KEY_ENV.to_string());
        }
        Self::build("sonar", options, SONAR_MODEL, SONAR_BASE_URL)
    }

    fn build(
        name: &'static str,
        options: EndpointOptions,
        default_model: &str,
        default_base_url: &str,
    ) -> Self {
        let base_url = options.base_url.as_deref().unwrap_or(default_base_url);
        Self {
            name,
            model: options.model.unwrap_or_else(|| default_model.to_string()),
            completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key_env: options.api_key_env,
            temperature: options
                .temperature
                .map(f64::from)
                .unwrap_or(DEFAULT_TEMPERATURE),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    fn bearer_token(&self) -> Option<String> {
        let name = self.api_key_env.as_deref()?;
        std::env::var(name).ok().filter(|k| !k.trim().is_empty())
    }
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn build_payload(&self, prompt: &Prompt<'_>) -> Result<Value, Error> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system() {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt.user }));
        Ok(json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "stream": false,
        }))
    }

    fn send(&self, body: &str) -> Result<String, Error> {
        let mut request = reqwest::blocking::Client::new()
            .post(&self.completions_url)
            .header("Content-Type", "application/json")
            .body(body.to_string());
        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(Error::http(api_error_message(status.as_u16(), &text)));
        }
        Ok(text)
    }

    fn extract_text(&self, body: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(body)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;
        if let Some(message) = v.pointer("/error/message").and_then(Value::as_str) {
            return Err(Error::http(format!("API error: {}", message)));
        }
        Ok(v.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }
}

/// 失敗レスポンスの表示用メッセージ（`error.message` が無ければ `HTTP <status>: <body>`）
fn api_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body.trim()))
}
