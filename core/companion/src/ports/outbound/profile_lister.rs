//! プロファイル一覧の Outbound ポート

use common::error::Error;

pub trait ProfileLister: Send + Sync {
    /// (プロファイル名の一覧, 既定のプロファイル名)
    fn list_profiles(&self) -> Result<(Vec<String>, String), Error>;
}
