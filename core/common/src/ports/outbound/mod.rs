//! Outbound ポート: アプリが外界（FS・時刻・環境変数・ログ・ストア・LLM）を使うための trait

pub mod clock;
pub mod env_resolver;
pub mod fs;
pub mod kv_store;
pub mod llm_provider;
pub mod log;

pub use clock::Clock;
pub use env_resolver::EnvResolver;
pub use fs::FileSystem;
pub use kv_store::{is_safe_key, KeyValueStore};
pub use llm_provider::{LlmProvider, Prompt};
pub use log::{Log, LogLevel, LogRecord};
