//! companion 共通ライブラリ
//!
//! エラー型・ドメイン型・Outbound ポートと標準アダプタ・LLM プロバイダを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Outbound ポート（trait）
pub mod ports;

/// 標準アダプタ（std / ファイル実装）
pub mod adapter;

/// LLMドライバーとプロバイダ
pub mod llm;
