//! Outbound ポート: 外部サービス（LLM・意図分類・読み上げ）とストア

pub mod character_store;
pub mod chat_store;
pub mod intent_classifier;
pub mod llm_completion;
pub mod profile_lister;
pub mod speech_synthesizer;

pub use character_store::CharacterStore;
pub use chat_store::ChatStore;
pub use intent_classifier::IntentClassifier;
pub use llm_completion::{CompletionRequest, LlmCompletion};
pub use profile_lister::ProfileLister;
pub use speech_synthesizer::SpeechSynthesizer;
