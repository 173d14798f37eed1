//! アダプター（companion のポート実装）

pub mod http_intent_classifier;
pub mod http_speech_synthesizer;
pub mod kv_chat_store;
pub mod profile_llm_completion;
pub mod settings;

pub use http_intent_classifier::{HttpIntentClassifier, NoIntentClassifier};
pub use http_speech_synthesizer::HttpSpeechSynthesizer;
pub use kv_chat_store::KvChatStore;
pub use profile_llm_completion::ProfileLlmCompletion;
pub use settings::{load_settings, Settings};
