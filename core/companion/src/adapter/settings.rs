//! アプリ設定（config/settings.json）
//!
//! 全フィールド省略可。URL は環境変数で上書きできる。

use common::error::Error;
use common::ports::outbound::{EnvResolver, FileSystem};
use serde::Deserialize;

use crate::domain::intent::DEFAULT_INTENT_THRESHOLD;

pub const DEFAULT_SERVICE_URL: &str =
    "https://intent-api-ageucxh0c3bvewa5.canadacentral-01.azurewebsites.net";

const INTENT_URL_ENV: &str = "COMPANION_INTENT_URL";
const SPEECH_URL_ENV: &str = "COMPANION_SPEECH_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub intent_api_url: String,
    /// 読み上げは意図分類と同じホストで提供されている
    pub speech_api_url: String,
    pub intent_threshold: f64,
    pub intent_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            intent_api_url: DEFAULT_SERVICE_URL.to_string(),
            speech_api_url: DEFAULT_SERVICE_URL.to_string(),
            intent_threshold: DEFAULT_INTENT_THRESHOLD,
            intent_enabled: true,
        }
    }
}

impl Settings {
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    fn apply_env(mut self, env: &dyn EnvResolver) -> Self {
        if let Some(url) = env.var(INTENT_URL_ENV) {
            self.intent_api_url = url;
        }
        if let Some(url) = env.var(SPEECH_URL_ENV) {
            self.speech_api_url = url;
        }
        self
    }
}

/// settings.json を読む（無ければ既定値）。その後に環境変数を適用する。
pub fn load_settings(fs: &dyn FileSystem, env: &dyn EnvResolver) -> Result<Settings, Error> {
    let path = env.resolve_settings_path()?;
    let settings = if fs.exists(&path) {
        let contents = fs
            .read_to_string(&path)
            .map_err(|e| Error::io_msg(format!("{}: {}", path.display(), e)))?;
        Settings::parse(&contents).map_err(|e| Error::json(format!("{}: {}", path.display(), e)))?
    } else {
        Settings::default()
    };
    Ok(settings.apply_env(env))
}
