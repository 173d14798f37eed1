//! アダプター（ポートの標準実装）
//!
//! usecase は ports::outbound の trait 経由でのみファイル・時刻・環境変数に触れる。
//! ここには標準実装（Std*）とテスト用のメモリ実装を置く。

pub mod file_json_log;
pub mod file_kv_store;
pub mod std_clock;
pub mod std_env_resolver;
pub mod std_fs;

pub use file_json_log::{FileJsonLog, NoopLog, StderrLog, TeeLog};
pub use file_kv_store::{FileKeyValueStore, MemoryKeyValueStore};
pub use std_clock::StdClock;
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;

pub use crate::ports::outbound::{Clock, EnvResolver, FileSystem, KeyValueStore, Log};
