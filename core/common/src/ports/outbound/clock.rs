//! 時刻 Outbound ポート
//!
//! チャット ID・メッセージ ID はこのミリ秒値から作る。

pub trait Clock: Send + Sync {
    /// Unix epoch からのミリ秒
    fn now_ms(&self) -> u64;
}
