//! LLM プロバイダ
//!
//! profiles.json でプロファイルを解決し、Sonar / OpenAI 互換 / Echo のいずれかに 1 回問い合わせる。

pub mod config;
pub mod driver;
pub mod echo;
pub mod factory;
pub mod openai_compat;
pub mod provider;
pub mod resolver;

pub use config::{ProfilesConfig, ProviderKind};
pub use driver::LlmDriver;
pub use factory::{create_provider, AnyProvider};
pub use provider::{LlmProvider, Prompt};
pub use resolver::{list_profiles, load_profiles_config, resolve_provider, ResolvedProvider};
