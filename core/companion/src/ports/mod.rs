//! ポート: inbound（CLI → アプリ）と outbound（アプリ → 外部サービス・ストア）

pub mod inbound;
pub mod outbound;
