//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{
    FileJsonLog, FileKeyValueStore, StderrLog, StdClock, StdEnvResolver, StdFileSystem, TeeLog,
};
use common::error::Error;
use common::ports::outbound::{Clock, EnvResolver, FileSystem, KeyValueStore, Log};

use crate::adapter::{
    load_settings, HttpIntentClassifier, HttpSpeechSynthesizer, KvChatStore, NoIntentClassifier,
    ProfileLlmCompletion,
};
use crate::ports::outbound::IntentClassifier;
use crate::usecase::{ChatDeps, ChatUseCase, SpeechDeps, SpeechUseCase};

pub struct App {
    pub chat: ChatUseCase,
    pub speech: SpeechUseCase,
    pub fs: Arc<dyn FileSystem>,
    pub logger: Arc<dyn Log>,
}

/// 配線: ホームディレクトリ配下のファイルと HTTP アダプタで App を組み立てる
///
/// verbose のときはログを stderr にも出す。
pub fn wire_companion(verbose: bool) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let home = env_resolver.resolve_home_dir()?;

    let file_log: Arc<dyn Log> = Arc::new(FileJsonLog::new(Arc::clone(&fs), home.log_file()));
    let logger: Arc<dyn Log> = if verbose {
        let stderr_log: Arc<dyn Log> = Arc::new(StderrLog);
        Arc::new(TeeLog::new(vec![file_log, stderr_log]))
    } else {
        file_log
    };

    let settings = load_settings(fs.as_ref(), env_resolver.as_ref())?;
    let kv: Arc<dyn KeyValueStore> =
        Arc::new(FileKeyValueStore::new(Arc::clone(&fs), home.storage_dir()));
    let store = Arc::new(KvChatStore::new(kv));
    let intent: Arc<dyn IntentClassifier> = if settings.intent_enabled {
        Arc::new(HttpIntentClassifier::new(settings.intent_api_url.clone()))
    } else {
        Arc::new(NoIntentClassifier)
    };
    let llm = Arc::new(ProfileLlmCompletion::new(
        Arc::clone(&fs),
        Arc::clone(&env_resolver),
    ));
    let clock: Arc<dyn Clock> = Arc::new(StdClock);

    let chat = ChatUseCase::new(ChatDeps {
        store: store.clone(),
        characters: store.clone(),
        intent,
        llm: llm.clone(),
        profiles: llm,
        clock,
        log: Arc::clone(&logger),
        intent_threshold: settings.intent_threshold,
    });
    let speech = SpeechUseCase::new(SpeechDeps {
        store: store.clone(),
        characters: store,
        synthesizer: Arc::new(HttpSpeechSynthesizer::new(settings.speech_api_url)),
        fs: Arc::clone(&fs),
        log: Arc::clone(&logger),
    });

    Ok(App {
        chat,
        speech,
        fs,
        logger,
    })
}
