//! LLM プロバイダのトレイト
//!
//! companion の問い合わせは常に 1 往復（システム指示 + ユーザー発話）なので、
//! 会話履歴は持たない。

use crate::error::Error;
use serde_json::Value;

/// 1 回分の問い合わせ内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt<'a> {
    pub system: Option<&'a str>,
    pub user: &'a str,
}

impl<'a> Prompt<'a> {
    pub fn new(system: Option<&'a str>, user: &'a str) -> Self {
        Self { system, user }
    }

    /// 空白だけのシステム指示は付けない
    pub fn system(&self) -> Option<&'a str> {
        self.system.filter(|s| !s.trim().is_empty())
    }
}

/// プロバイダ（Sonar / OpenAI 互換 / Echo）の共通インターフェース
///
/// LlmDriver が build_payload → send → extract_text の順に呼ぶ。
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// リクエスト本文（JSON）を組み立てる
    fn build_payload(&self, prompt: &Prompt<'_>) -> Result<Value, Error>;

    /// 本文を送ってレスポンス本文を返す。2xx 以外は Http エラー。
    fn send(&self, body: &str) -> Result<String, Error>;

    /// レスポンス本文から応答テキストを取り出す（無ければ None）
    fn extract_text(&self, body: &str) -> Result<Option<String>, Error>;
}
