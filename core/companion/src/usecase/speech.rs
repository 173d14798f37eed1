//! 読み上げのユースケース
//!
//! メッセージ本文（解析済みなら explanation のみ）をキャラクターの声で音声化してファイルに書く。

use std::path::Path;
use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};

use crate::domain::{parse_response, CharacterData, ChatRecord, SpeechRequest};
use crate::ports::outbound::{CharacterStore, ChatStore, SpeechSynthesizer};

pub struct SpeechDeps {
    pub store: Arc<dyn ChatStore>,
    pub characters: Arc<dyn CharacterStore>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub fs: Arc<dyn FileSystem>,
    pub log: Arc<dyn Log>,
}

pub struct SpeechUseCase {
    deps: SpeechDeps,
}

impl SpeechUseCase {
    pub fn new(deps: SpeechDeps) -> Self {
        Self { deps }
    }

    fn engaged_character(&self) -> Option<CharacterData> {
        self.deps.characters.engaged().unwrap_or_else(|e| {
            let _ = self.deps.log.log(
                &LogRecord::new(LogLevel::Warn, format!("Ignoring stored character: {}", e))
                    .layer("usecase")
                    .kind("character"),
            );
            None
        })
    }

    /// 現在のチャットのメッセージを音声化して output に書き、書いたバイト数を返す
    pub fn speak(&self, message_id: &str, output: &Path) -> Result<usize, Error> {
        let character = self
            .engaged_character()
            .ok_or_else(|| Error::env("Character data not loaded for text-to-speech."))?;

        let chat_id = self
            .deps
            .store
            .current_chat_id()?
            .ok_or_else(|| Error::invalid_argument(format!("Message not found: {}", message_id)))?;
        let record = self
            .deps
            .store
            .load_chat(&chat_id)?
            .unwrap_or_else(|| ChatRecord::new(Vec::new(), None));
        let message = record
            .find_message(message_id)
            .ok_or_else(|| Error::invalid_argument(format!("Message not found: {}", message_id)))?;

        let parsed = parse_response(&message.content);
        let text = parsed.explanation_or(&message.content);
        let request = SpeechRequest::for_character(text, &character);

        let _ = self.deps.log.log(
            &LogRecord::new(LogLevel::Info, "speech requested")
                .layer("usecase")
                .kind("speech")
                .field("message_id", message_id)
                .field("role", request.character.role.as_str()),
        );

        let audio = match self.deps.synthesizer.synthesize(&request) {
            Ok(audio) => audio,
            Err(e) => {
                let _ = self.deps.log.log(
                    &LogRecord::new(LogLevel::Error, format!("Failed to generate speech: {}", e))
                        .layer("usecase")
                        .kind("error"),
                );
                return Err(e);
            }
        };
        self.deps.fs.write_bytes(output, &audio)?;
        Ok(audio.len())
    }
}
