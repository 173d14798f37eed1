//! 環境変数 Outbound ポート

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

pub trait EnvResolver: Send + Sync {
    /// COMPANION_HOME → $XDG_CONFIG_HOME/companion → $HOME/.config/companion
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    fn resolve_profiles_config_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.profiles_file())
    }

    fn resolve_settings_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.settings_file())
    }

    /// 空文字は未設定として None
    fn var(&self, name: &str) -> Option<String>;
}
