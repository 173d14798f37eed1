//! ユースケース・CLI のテスト（ポートはメモリ上の fake に差し替える）

mod chat_usecase_tests;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use common::adapter::{MemoryKeyValueStore, NoopLog, StdFileSystem};
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};

use crate::adapter::KvChatStore;
use crate::domain::{IntentResult, SpeechRequest};
use crate::ports::outbound::{
    CompletionRequest, IntentClassifier, LlmCompletion, ProfileLister, SpeechSynthesizer,
};
use crate::usecase::{ChatDeps, ChatUseCase, SpeechDeps, SpeechUseCase};
use crate::wiring::App;

pub(crate) const START_MS: u64 = 1_717_000_000_000;

/// set した時刻を返す時計
pub(crate) struct FixedClock(AtomicU64);

impl FixedClock {
    pub(crate) fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) struct FakeIntent(Mutex<Result<IntentResult, Error>>);

impl FakeIntent {
    pub(crate) fn set(&self, result: Result<IntentResult, Error>) {
        *self.0.lock().unwrap() = result;
    }
}

impl IntentClassifier for FakeIntent {
    fn classify(&self, _prompt: &str) -> Result<IntentResult, Error> {
        self.0.lock().unwrap().clone()
    }
}

/// 受け取った (system, user) を記録して、設定された応答を返す
pub(crate) struct FakeLlm {
    reply: Mutex<Result<Option<String>, Error>>,
    pub(crate) requests: Mutex<Vec<(String, String)>>,
}

impl FakeLlm {
    pub(crate) fn reply(&self, reply: Result<Option<String>, Error>) {
        *self.reply.lock().unwrap() = reply;
    }

    pub(crate) fn last_system(&self) -> String {
        self.requests.lock().unwrap().last().unwrap().0.clone()
    }
}

impl LlmCompletion for FakeLlm {
    fn complete(&self, request: CompletionRequest<'_>) -> Result<Option<String>, Error> {
        self.requests
            .lock()
            .unwrap()
            .push((request.system.to_string(), request.user.to_string()));
        self.reply.lock().unwrap().clone()
    }
}

impl ProfileLister for FakeLlm {
    fn list_profiles(&self) -> Result<(Vec<String>, String), Error> {
        Ok((vec!["echo".to_string(), "sonar".to_string()], "sonar".to_string()))
    }
}

pub(crate) struct FakeSpeech {
    pub(crate) requests: Mutex<Vec<SpeechRequest>>,
    result: Mutex<Result<Vec<u8>, Error>>,
}

impl FakeSpeech {
    pub(crate) fn fail(&self, e: Error) {
        *self.result.lock().unwrap() = Err(e);
    }
}

impl SpeechSynthesizer for FakeSpeech {
    fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, Error> {
        self.requests.lock().unwrap().push(request.clone());
        self.result.lock().unwrap().clone()
    }
}

/// level と message を記録する Log
#[derive(Default)]
pub(crate) struct RecordingLog(Mutex<Vec<(LogLevel, String)>>);

impl RecordingLog {
    pub(crate) fn has(&self, level: LogLevel, needle: &str) -> bool {
        self.0
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Log for RecordingLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.0
            .lock()
            .unwrap()
            .push((record.level, record.message.clone()));
        Ok(())
    }
}

/// fake 一式と、それを使う use case
pub(crate) struct Fixture {
    pub(crate) kv: Arc<MemoryKeyValueStore>,
    pub(crate) store: Arc<KvChatStore>,
    pub(crate) clock: Arc<FixedClock>,
    pub(crate) intent: Arc<FakeIntent>,
    pub(crate) llm: Arc<FakeLlm>,
    pub(crate) speech: Arc<FakeSpeech>,
    pub(crate) log: Arc<RecordingLog>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let kv = Arc::new(MemoryKeyValueStore::new());
        Self {
            store: Arc::new(KvChatStore::new(kv.clone())),
            kv,
            clock: Arc::new(FixedClock(AtomicU64::new(START_MS))),
            intent: Arc::new(FakeIntent(Mutex::new(Ok(IntentResult::fallback())))),
            llm: Arc::new(FakeLlm {
                reply: Mutex::new(Ok(Some("Hi there!".to_string()))),
                requests: Mutex::new(Vec::new()),
            }),
            speech: Arc::new(FakeSpeech {
                requests: Mutex::new(Vec::new()),
                result: Mutex::new(Ok(b"ID3audio".to_vec())),
            }),
            log: Arc::new(RecordingLog::default()),
        }
    }

    pub(crate) fn chat(&self) -> ChatUseCase {
        ChatUseCase::new(ChatDeps {
            store: self.store.clone(),
            characters: self.store.clone(),
            intent: self.intent.clone(),
            llm: self.llm.clone(),
            profiles: self.llm.clone(),
            clock: self.clock.clone(),
            log: self.log.clone(),
            intent_threshold: 0.3,
        })
    }

    pub(crate) fn speech(&self) -> SpeechUseCase {
        SpeechUseCase::new(SpeechDeps {
            store: self.store.clone(),
            characters: self.store.clone(),
            synthesizer: self.speech.clone(),
            fs: Arc::new(StdFileSystem),
            log: self.log.clone(),
        })
    }

    pub(crate) fn app(&self) -> App {
        App {
            chat: self.chat(),
            speech: self.speech(),
            fs: Arc::new(StdFileSystem),
            logger: Arc::new(NoopLog),
        }
    }
}

pub(crate) fn temp_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}
