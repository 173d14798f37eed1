//! ユースケース（ports 経由でのみ I/O を行う）

pub mod chat;
pub mod speech;

pub use chat::{ChatDeps, ChatUseCase, SearchHit, SendOutcome};
pub use speech::{SpeechDeps, SpeechUseCase};
