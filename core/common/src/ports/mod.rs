//! common が提供する Outbound ポート（入口は各バイナリ側に置く）

pub mod outbound;
