//! キー・バリューストア Outbound ポート
//!
//! チャット履歴・現在のチャット ID・キャラクター等を文字列値で永続化する。
//! 値の形式（JSON 等）は呼び出し側が決める。

use crate::error::Error;

/// キー・バリューストア抽象（Outbound ポート）
///
/// 実装は `common::adapter::FileKeyValueStore`（1 キー 1 ファイル）や `MemoryKeyValueStore`。
pub trait KeyValueStore: Send + Sync {
    /// 値を返す。未登録なら Ok(None)
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    /// 削除する。未登録でもエラーにしない
    fn remove(&self, key: &str) -> Result<(), Error>;
    /// 登録済みキー一覧（昇順）
    fn keys(&self) -> Result<Vec<String>, Error>;
}

/// キーとして許可するか。
/// 英数字と `_` `-` `.` のみ、先頭 `.` 禁止、最大 128 文字（ファイル名に直接使うため）。
pub fn is_safe_key(key: &str) -> bool {
    if key.is_empty() || key.len() > 128 || key.starts_with('.') {
        return false;
    }
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}
