//! ドメイン型（Newtype）

use std::path::{Path, PathBuf};

/// companion のホームディレクトリ
///
/// ```text
/// <home>/config/profiles.json
/// <home>/config/settings.json
/// <home>/storage/<key>.json
/// <home>/logs/companion.jsonl
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDir(PathBuf);

impl HomeDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn config_dir(&self) -> PathBuf {
        self.0.join("config")
    }

    pub fn profiles_file(&self) -> PathBuf {
        self.config_dir().join("profiles.json")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir().join("settings.json")
    }

    /// キー値ストア（チャット・キャラクター・フォルダ指定）
    pub fn storage_dir(&self) -> PathBuf {
        self.0.join("storage")
    }

    pub fn log_file(&self) -> PathBuf {
        self.0.join("logs").join("companion.jsonl")
    }
}

impl AsRef<Path> for HomeDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// 文字列の Newtype。Deref<Target = str> なので &str として読める。
macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(
    /// -p で選ぶプロファイル名（sonar, echo, profiles.json のキー）
    ProviderName
);
string_newtype!(
    /// -m で上書きするモデル名（sonar, sonar-pro 等）
    ModelName
);
