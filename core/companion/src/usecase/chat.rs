//! チャットのユースケース
//!
//! 送信 1 回の流れ: ユーザー発話を保存 → 意図分類 → システムプロンプト選択 → LLM →
//! 応答を解析して保存。LLM が失敗した場合もエラー文を AI メッセージとして残す。

use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};

use crate::domain::prompt::{casual_prompt, custom_prompt, optimized_prompt, validate_prompt};
use crate::domain::{
    parse_response, CharacterData, ChatHistory, ChatId, ChatMessage, ChatRecord, IntentResult,
    ParseOutcome, SendOptions, DEFAULT_FOLDER,
};
use crate::ports::outbound::{
    CharacterStore, ChatStore, CompletionRequest, IntentClassifier, LlmCompletion, ProfileLister,
};

/// プロバイダが本文を返さなかったときの応答
pub const NO_RESPONSE_TEXT: &str = "No response from Sonar AI.";

pub struct ChatDeps {
    pub store: Arc<dyn ChatStore>,
    pub characters: Arc<dyn CharacterStore>,
    pub intent: Arc<dyn IntentClassifier>,
    pub llm: Arc<dyn LlmCompletion>,
    pub profiles: Arc<dyn ProfileLister>,
    pub clock: Arc<dyn Clock>,
    pub log: Arc<dyn Log>,
    /// これ以上の信頼度で意図が取れたら最適化プロンプトを使う
    pub intent_threshold: f64,
}

/// 送信結果（表示は CLI の責務）
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub chat_id: ChatId,
    pub message_id: String,
    pub raw: String,
    pub parsed: ParseOutcome,
    /// 例: `Detected: learn (85% confidence)`
    pub detected: Option<String>,
}

/// 検索結果の 1 件
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub chat_id: ChatId,
    pub message: ChatMessage,
}

pub struct ChatUseCase {
    deps: ChatDeps,
}

impl ChatUseCase {
    pub fn new(deps: ChatDeps) -> Self {
        Self { deps }
    }

    fn log(&self, record: LogRecord) {
        let _ = self.deps.log.log(&record.layer("usecase"));
    }

    pub fn list_profiles(&self) -> Result<(Vec<String>, String), Error> {
        self.deps.profiles.list_profiles()
    }

    /// メッセージを送り、AI の応答を保存して返す
    pub fn send_message(&self, content: &str, options: &SendOptions) -> Result<SendOutcome, Error> {
        if content.trim().is_empty() {
            return Err(Error::invalid_argument("Please enter a message"));
        }
        if let Some(system) = &options.system {
            validate_prompt(system)?;
        }

        let (chat_id, mut record) = self.current_chat()?;
        record
            .messages
            .push(ChatMessage::user(&chat_id, self.deps.clock.now_ms(), content));
        self.persist(&chat_id, &mut record)?;

        let intent = self.classify(content);
        let (system, detected) = self.select_prompt(&intent, options);

        let mut query = LogRecord::new(LogLevel::Info, "llm query")
            .kind("query")
            .field("optimized", detected.is_some());
        if let Some(profile) = &options.profile {
            query = query.field("profile", profile.as_ref());
        }
        self.log(query);

        let completion = self.deps.llm.complete(CompletionRequest {
            profile: options.profile.as_ref(),
            model: options.model.as_ref(),
            system: &system,
            user: content,
        });
        let raw = match completion {
            Ok(text) => text
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string()),
            Err(e) => {
                self.log(
                    LogRecord::new(LogLevel::Error, format!("LLM request failed: {}", e))
                        .kind("error"),
                );
                let reply = ChatMessage::ai(&chat_id, self.deps.clock.now_ms(), e.to_string());
                record.messages.push(reply);
                self.persist(&chat_id, &mut record)?;
                return Err(e);
            }
        };

        let parsed = parse_response(&raw);
        self.log(
            LogRecord::new(LogLevel::Debug, "response parsed")
                .kind("parse")
                .field("recognized", parsed.is_recognized())
                .field(
                    "has_snippet",
                    parsed.content().is_some_and(|c| c.snippet().is_some()),
                ),
        );

        let reply = ChatMessage::ai(&chat_id, self.deps.clock.now_ms(), parsed.storage_text(&raw));
        let message_id = reply.id.clone();
        record.messages.push(reply);
        self.persist(&chat_id, &mut record)?;

        Ok(SendOutcome {
            chat_id,
            message_id,
            raw,
            parsed,
            detected,
        })
    }

    /// 意図分類。失敗はフォールバック結果として扱う。
    fn classify(&self, content: &str) -> IntentResult {
        match self.deps.intent.classify(content) {
            Ok(intent) => {
                let mut record = LogRecord::new(LogLevel::Info, "intent classified")
                    .kind("intent")
                    .field("confidence", intent.confidence);
                if let Some(i) = &intent.matched_intention {
                    record = record.field("intention", i.as_str());
                }
                self.log(record);
                intent
            }
            Err(e) => {
                self.log(
                    LogRecord::new(LogLevel::Warn, format!("Intent classification failed: {}", e))
                        .kind("intent"),
                );
                IntentResult::fallback()
            }
        }
    }

    /// 意図が取れていれば最適化プロンプト、そうでなければ -S / --style / キャラクター
    fn select_prompt(&self, intent: &IntentResult, options: &SendOptions) -> (String, Option<String>) {
        if intent.is_confident(self.deps.intent_threshold) {
            return (optimized_prompt(intent), intent.detection_summary());
        }
        let system = match (&options.system, options.style) {
            (Some(system), _) => system.clone(),
            (None, Some(style)) => custom_prompt(style, None),
            (None, None) => casual_prompt(self.engaged_character().as_ref()),
        };
        (system, None)
    }

    /// 保存済みキャラクター。壊れていれば警告を残して None。
    pub fn engaged_character(&self) -> Option<CharacterData> {
        match self.deps.characters.engaged() {
            Ok(c) => c,
            Err(e) => {
                self.log(
                    LogRecord::new(LogLevel::Warn, format!("Ignoring stored character: {}", e))
                        .kind("character"),
                );
                None
            }
        }
    }

    /// キャラクターを設定する（JSON。配列なら先頭）
    pub fn engage_character(&self, json: &str) -> Result<CharacterData, Error> {
        let character = CharacterData::from_json(json)?;
        self.deps.characters.engage(&character)?;
        Ok(character)
    }

    /// キャラクターの設定を外す。以降は汎用の会話プロンプトになる。
    pub fn disengage_character(&self) -> Result<(), Error> {
        self.deps.characters.disengage()?;
        self.log(LogRecord::new(LogLevel::Info, "character disengaged").kind("character"));
        Ok(())
    }

    /// 現在のチャット。未設定なら現在時刻で新しいチャットを作る。
    fn current_chat(&self) -> Result<(ChatId, ChatRecord), Error> {
        let id = match self.deps.store.current_chat_id()? {
            Some(id) => id,
            None => {
                let id = ChatId::from_millis(self.deps.clock.now_ms());
                self.deps.store.set_current_chat_id(&id)?;
                id
            }
        };
        let record = self
            .deps
            .store
            .load_chat(&id)?
            .unwrap_or_else(|| ChatRecord::new(Vec::new(), None));
        Ok((id, record))
    }

    /// フォルダを決めて保存する。空のチャットは保存しない。
    ///
    /// newChatFolderId の指定があればそれを使って指定を消す。無ければ既存のフォルダ、
    /// それも無ければアクティブフォルダ。
    fn persist(&self, id: &ChatId, record: &mut ChatRecord) -> Result<(), Error> {
        if record.messages.is_empty() {
            return Ok(());
        }
        if let Some(folder) = self.deps.store.new_chat_folder()? {
            record.folder_id = Some(folder);
            self.deps.store.set_new_chat_folder(None)?;
        } else if record.folder_id.is_none() {
            let active = self
                .deps
                .store
                .active_folder()?
                .unwrap_or_else(|| DEFAULT_FOLDER.to_string());
            record.folder_id = Some(active);
        }
        self.deps.store.save_chat(id, record)
    }

    /// 新しいチャットを現在のチャットにする（現在のチャットは送信のたびに保存済み）
    pub fn new_chat(&self) -> Result<ChatId, Error> {
        let id = ChatId::from_millis(self.deps.clock.now_ms());
        self.deps.store.set_current_chat_id(&id)?;
        Ok(id)
    }

    /// 指定チャットに切り替えてメッセージを返す
    pub fn load_chat(&self, id: &ChatId) -> Result<Vec<ChatMessage>, Error> {
        let record = self.deps.store.load_chat(id)?;
        self.deps.store.set_current_chat_id(id)?;
        Ok(record.map(|r| r.messages).unwrap_or_default())
    }

    pub fn current_messages(&self) -> Result<(ChatId, Vec<ChatMessage>), Error> {
        let (id, record) = self.current_chat()?;
        Ok((id, record.messages))
    }

    /// メッセージのある全チャット。読めないチャットは警告を残して飛ばす。
    pub fn chat_histories(&self) -> Result<Vec<ChatHistory>, Error> {
        let mut histories = Vec::new();
        for id in self.deps.store.chat_ids()? {
            let record = match self.deps.store.load_chat(&id) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    self.log(
                        LogRecord::new(LogLevel::Warn, format!("Skipping unreadable chat: {}", e))
                            .kind("history"),
                    );
                    continue;
                }
            };
            if record.messages.is_empty() {
                continue;
            }
            let folder_id = record.folder_or_default().to_string();
            histories.push(ChatHistory {
                id,
                messages: record.messages,
                folder_id,
            });
        }
        Ok(histories)
    }

    /// 現在のチャットのメッセージのスターを切り替え、新しい状態を返す
    pub fn toggle_star(&self, message_id: &str) -> Result<bool, Error> {
        let (id, mut record) = self.current_chat()?;
        let message = record
            .find_message_mut(message_id)
            .ok_or_else(|| Error::invalid_argument(format!("Message not found: {}", message_id)))?;
        message.toggle_star();
        let starred = message.starred;
        self.persist(&id, &mut record)?;
        Ok(starred)
    }

    pub fn starred_messages(&self) -> Result<Vec<ChatMessage>, Error> {
        let (_, record) = self.current_chat()?;
        Ok(record.messages.into_iter().filter(|m| m.starred).collect())
    }

    /// 全チャットから大文字小文字を区別せずに部分一致検索する
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>, Error> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let hits = self
            .chat_histories()?
            .into_iter()
            .flat_map(|h| {
                let chat_id = h.id;
                h.messages
                    .into_iter()
                    .filter(|m| m.content.to_lowercase().contains(&needle))
                    .map(move |message| SearchHit {
                        chat_id: chat_id.clone(),
                        message,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Ok(hits)
    }

    pub fn set_active_folder(&self, folder_id: &str) -> Result<(), Error> {
        self.deps.store.set_active_folder(non_blank(folder_id)?)
    }

    /// 次に保存されるチャットのフォルダを指定する（1 回限り）
    pub fn set_new_chat_folder(&self, folder_id: &str) -> Result<(), Error> {
        self.deps.store.set_new_chat_folder(Some(non_blank(folder_id)?))
    }

    /// 現在のチャットの AI メッセージを再解析して snippet を返す
    pub fn export_snippet(&self, message_id: &str) -> Result<Option<String>, Error> {
        let (_, record) = self.current_chat()?;
        let message = record
            .find_message(message_id)
            .ok_or_else(|| Error::invalid_argument(format!("Message not found: {}", message_id)))?;
        Ok(parse_response(&message.content)
            .content()
            .and_then(|c| c.snippet())
            .map(str::to_string))
    }
}

fn non_blank(folder_id: &str) -> Result<&str, Error> {
    let folder_id = folder_id.trim();
    if folder_id.is_empty() {
        return Err(Error::invalid_argument("Folder id must not be empty"));
    }
    Ok(folder_id)
}
