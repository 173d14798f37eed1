//! profiles.json の型
//!
//! ```json
//! { "default_provider": "pplx",
//!   "providers": { "pplx": { "type": "sonar", "model": "sonar-pro" } } }
//! ```

use crate::llm::openai_compat::EndpointOptions;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default, alias = "default")]
    pub default_provider: Option<String>,
    #[serde(default)]
    pub providers: HashMap<String, ProviderProfile>,
}

impl ProfilesConfig {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderProfile {
    #[serde(rename = "type", alias = "provider")]
    pub kind: ProviderKind,
    pub base_url: Option<String>,
    #[serde(alias = "default_model")]
    pub model: Option<String>,
    /// API キーを読む環境変数名
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
}

impl ProviderProfile {
    pub fn endpoint_options(&self) -> EndpointOptions {
        EndpointOptions {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            temperature: self.temperature,
        }
    }
}

/// プロバイダ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[serde(alias = "perplexity")]
    Sonar,
    #[serde(alias = "openai", alias = "gpt", alias = "ollama")]
    OpenaiCompat,
    Echo,
}

impl ProviderKind {
    /// profiles.json に無い名前をビルトインとして解釈する（大文字小文字は無視）
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sonar" | "perplexity" => Some(Self::Sonar),
            "openai_compat" | "openai" => Some(Self::OpenaiCompat),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sonar => "sonar",
            Self::OpenaiCompat => "openai_compat",
            Self::Echo => "echo",
        }
    }
}
