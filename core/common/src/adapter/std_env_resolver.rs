//! プロセス環境変数による EnvResolver

use crate::domain::HomeDir;
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::path::PathBuf;

pub const HOME_ENV: &str = "COMPANION_HOME";

#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvResolver;

impl EnvResolver for StdEnvResolver {
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        if let Some(home) = self.var(HOME_ENV) {
            return Ok(HomeDir::new(home));
        }
        let config_root = match self.var("XDG_CONFIG_HOME") {
            Some(xdg) => PathBuf::from(xdg),
            None => self
                .var("HOME")
                .map(|h| PathBuf::from(h).join(".config"))
                .ok_or_else(|| Error::env("Neither COMPANION_HOME nor HOME is set"))?,
        };
        Ok(HomeDir::new(config_root.join("companion")))
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}
