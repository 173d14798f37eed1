//! profiles.json で選んだプロバイダによる単発完了

use std::sync::Arc;

use common::error::Error;
use common::llm::{
    create_provider, list_profiles, load_profiles_config, resolve_provider, LlmDriver, Prompt,
};
use common::ports::outbound::{EnvResolver, FileSystem};

use crate::ports::outbound::{CompletionRequest, LlmCompletion, ProfileLister};

/// プロファイル解決 → プロバイダ生成 → LlmDriver で 1 回問い合わせる
pub struct ProfileLlmCompletion {
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
}

impl ProfileLlmCompletion {
    pub fn new(fs: Arc<dyn FileSystem>, env_resolver: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env_resolver }
    }
}

impl LlmCompletion for ProfileLlmCompletion {
    fn complete(&self, request: CompletionRequest<'_>) -> Result<Option<String>, Error> {
        let cfg = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        let resolved = resolve_provider(request.profile, cfg.as_ref())?;
        let provider = create_provider(&resolved, request.model.map(|m| m.to_string()));
        LlmDriver::new(provider).complete(Prompt::new(Some(request.system), request.user))
    }
}

impl ProfileLister for ProfileLlmCompletion {
    fn list_profiles(&self) -> Result<(Vec<String>, String), Error> {
        let cfg = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        Ok(list_profiles(cfg.as_ref()))
    }
}
