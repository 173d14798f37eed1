//! LLM プロバイダ Outbound ポート（定義は llm::provider にある）

pub use crate::llm::provider::{LlmProvider, Prompt};
