//! companion のドメイン
//!
//! 応答パーサ・チャット・意図・キャラクター・プロンプト。I/O を持たない。

pub mod character;
pub mod chat;
pub mod command;
pub mod intent;
pub mod parsed_content;
pub mod prompt;
pub mod response_parser;

pub use character::{CharacterData, SpeechRequest};
pub use chat::{ChatHistory, ChatId, ChatMessage, ChatRecord, Sender, DEFAULT_FOLDER};
pub use command::{CompanionCommand, SendOptions};
pub use intent::IntentResult;
pub use parsed_content::{ParseOutcome, ParsedContent, RENDER_MARKER};
pub use prompt::PromptStyle;
pub use response_parser::parse_response;
