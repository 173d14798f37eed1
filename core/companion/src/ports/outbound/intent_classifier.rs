//! 意図分類の Outbound ポート

use crate::domain::IntentResult;
use common::error::Error;

/// ユーザー発話から意図と推奨ツールを得る
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, prompt: &str) -> Result<IntentResult, Error>;
}
