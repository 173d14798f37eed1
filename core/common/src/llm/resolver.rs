//! プロファイルの読み込みと解決
//!
//! 解決順: profiles.json の providers → ビルトイン（sonar / openai_compat / echo）。
//! 名前の指定が無ければ default_provider、それも無ければ sonar。

use crate::domain::ProviderName;
use crate::error::Error;
use crate::llm::config::{ProfilesConfig, ProviderKind};
use crate::llm::openai_compat::EndpointOptions;
use crate::ports::outbound::{EnvResolver, FileSystem};
use std::collections::BTreeSet;

pub const DEFAULT_PROVIDER: &str = "sonar";

const BUILTIN_PROFILES: [&str; 3] = ["echo", "openai_compat", "sonar"];

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    /// 解決に使ったプロファイル名（ログ用）
    pub profile_name: String,
    pub kind: ProviderKind,
    pub options: EndpointOptions,
}

/// profiles.json を読む。無ければ Ok(None)。壊れていればパス付きの Json エラー。
pub fn load_profiles_config(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
) -> Result<Option<ProfilesConfig>, Error> {
    let path = env.resolve_profiles_config_path()?;
    if !fs.exists(&path) {
        return Ok(None);
    }
    let contents = fs.read_to_string(&path)?;
    let cfg = ProfilesConfig::parse(&contents)
        .map_err(|e| Error::json(format!("{}: {}", path.display(), e)))?;
    Ok(Some(cfg))
}

/// 使えるプロファイル名（ソート済み）と既定のプロファイル名
pub fn list_profiles(cfg: Option<&ProfilesConfig>) -> (Vec<String>, String) {
    let mut names: BTreeSet<String> = BUILTIN_PROFILES.iter().map(|s| s.to_string()).collect();
    if let Some(cfg) = cfg {
        names.extend(cfg.providers.keys().cloned());
    }
    (names.into_iter().collect(), default_profile(cfg).to_string())
}

fn default_profile(cfg: Option<&ProfilesConfig>) -> &str {
    cfg.and_then(|c| c.default_provider.as_deref())
        .unwrap_or(DEFAULT_PROVIDER)
}

/// プロファイルを解決する。未知の名前は usage エラー（使える名前を列挙する）。
pub fn resolve_provider(
    requested: Option<&ProviderName>,
    cfg: Option<&ProfilesConfig>,
) -> Result<ResolvedProvider, Error> {
    let name = requested.map(|r| r.as_ref()).unwrap_or_else(|| default_profile(cfg));

    if let Some(profile) = cfg.and_then(|c| c.providers.get(name)) {
        return Ok(ResolvedProvider {
            profile_name: name.to_string(),
            kind: profile.kind,
            options: profile.endpoint_options(),
        });
    }
    if let Some(kind) = ProviderKind::builtin(name) {
        return Ok(ResolvedProvider {
            profile_name: name.to_string(),
            kind,
            options: EndpointOptions::default(),
        });
    }

    let (available, _) = list_profiles(cfg);
    Err(Error::invalid_argument(format!(
        "Unknown provider: '{}'. Available: {}",
        name,
        available.join(", ")
    )))
}
