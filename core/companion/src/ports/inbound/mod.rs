//! Inbound ポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use crate::cli::Config;
use common::error::Error;

/// companion を 1 回実行する Inbound ポート
///
/// main は Config をこの trait の実装（Runner）に渡し、終了コードを受け取る。
pub trait RunCompanion {
    fn run(&self, config: Config) -> Result<i32, Error>;
}
