//! 単発 LLM 完了の Outbound ポート
//!
//! 履歴は送らず、system + user の 1 往復で応答全文を得る。

use common::domain::{ModelName, ProviderName};
use common::error::Error;

#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub profile: Option<&'a ProviderName>,
    pub model: Option<&'a ModelName>,
    pub system: &'a str,
    pub user: &'a str,
}

pub trait LlmCompletion: Send + Sync {
    /// 応答テキストを返す。プロバイダが本文を返さなかった場合は None。
    fn complete(&self, request: CompletionRequest<'_>) -> Result<Option<String>, Error>;
}
