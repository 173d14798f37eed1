//! チャットのメッセージと保存形式

use chrono::{DateTime, TimeZone, Utc};
use common::error::Error;
use common::ports::outbound::is_safe_key;
use serde::{Deserialize, Serialize};

/// ストアのキー接頭辞（`chat_<id>`）
pub const CHAT_KEY_PREFIX: &str = "chat_";

/// フォルダ未指定時のフォルダ ID
pub const DEFAULT_FOLDER: &str = "default";

/// チャット ID（ストアのキーとして安全な文字だけを許す）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();
        if id.is_empty() || !is_safe_key(&format!("{}{}", CHAT_KEY_PREFIX, id)) {
            return Err(Error::invalid_argument(format!("Invalid chat id: {}", id)));
        }
        Ok(Self(id))
    }

    /// 時刻（ミリ秒）から新しい ID を作る
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.to_string())
    }

    /// `chat_<id>` キーから ID を取り出す
    pub fn from_storage_key(key: &str) -> Option<Self> {
        key.strip_prefix(CHAT_KEY_PREFIX)
            .and_then(|id| Self::new(id).ok())
    }

    pub fn storage_key(&self) -> String {
        format!("{}{}", CHAT_KEY_PREFIX, self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

/// 1 件のメッセージ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `<chat_id>-<unix_ms>`
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub starred: bool,
}

impl ChatMessage {
    pub fn new(chat: &ChatId, at_ms: u64, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", chat, at_ms),
            content: content.into(),
            sender,
            timestamp: timestamp_from_millis(at_ms),
            starred: false,
        }
    }

    pub fn user(chat: &ChatId, at_ms: u64, content: impl Into<String>) -> Self {
        Self::new(chat, at_ms, Sender::User, content)
    }

    /// AI の返信。ID の衝突を避けるため時刻を 1ms ずらす。
    pub fn ai(chat: &ChatId, at_ms: u64, content: impl Into<String>) -> Self {
        Self::new(chat, at_ms + 1, Sender::Ai, content)
    }

    pub fn toggle_star(&mut self) {
        self.starred = !self.starred;
    }
}

fn timestamp_from_millis(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_default()
}

/// ストアに保存する 1 チャット分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub messages: Vec<ChatMessage>,
    pub folder_id: Option<String>,
}

/// 保存形式。旧形式はメッセージ配列だけ。
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredChat {
    Record(ChatRecord),
    Legacy(Vec<ChatMessage>),
}

impl ChatRecord {
    pub fn new(messages: Vec<ChatMessage>, folder_id: Option<String>) -> Self {
        Self { messages, folder_id }
    }

    /// 保存された JSON を読む。旧形式は folder `default` とみなす。
    pub fn from_json(json: &str) -> Result<Self, Error> {
        match serde_json::from_str::<StoredChat>(json)? {
            StoredChat::Record(record) => Ok(record),
            StoredChat::Legacy(messages) => {
                Ok(Self::new(messages, Some(DEFAULT_FOLDER.to_string())))
            }
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn folder_or_default(&self) -> &str {
        self.folder_id.as_deref().unwrap_or(DEFAULT_FOLDER)
    }

    pub fn find_message(&self, message_id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    pub fn find_message_mut(&mut self, message_id: &str) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }
}

/// 履歴一覧の 1 件（メッセージのあるチャットのみ）
#[derive(Debug, Clone, PartialEq)]
pub struct ChatHistory {
    pub id: ChatId,
    pub messages: Vec<ChatMessage>,
    pub folder_id: String,
}

impl ChatHistory {
    /// 一覧表示用の見出し（最初のユーザー発話の先頭）
    pub fn title(&self) -> String {
        let first = self
            .messages
            .iter()
            .find(|m| m.sender == Sender::User)
            .or_else(|| self.messages.first())
            .map(|m| m.content.as_str())
            .unwrap_or("");
        let line = first.lines().next().unwrap_or("");
        let mut title: String = line.chars().take(40).collect();
        if line.chars().count() > 40 {
            title.push_str("...");
        }
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat() -> ChatId {
        ChatId::new("1717000000000").unwrap()
    }

    #[test]
    fn test_chat_id_validation() {
        assert!(ChatId::new("1717000000000").is_ok());
        assert!(ChatId::new("work-notes_1").is_ok());
        assert!(ChatId::new("../etc").unwrap_err().is_usage());
        assert!(ChatId::new("").is_err());
        assert_eq!(chat().storage_key(), "chat_1717000000000");
        assert_eq!(ChatId::from_storage_key("chat_42"), Some(ChatId::from_millis(42)));
        assert_eq!(ChatId::from_storage_key("currentChatId"), None);
    }

    #[test]
    fn test_message_ids_follow_chat_and_time() {
        let c = chat();
        let user = ChatMessage::user(&c, 1_717_000_000_500, "hi");
        let ai = ChatMessage::ai(&c, 1_717_000_000_500, "hello");
        assert_eq!(user.id, "1717000000000-1717000000500");
        assert_eq!(ai.id, "1717000000000-1717000000501");
        assert_eq!(ai.sender, Sender::Ai);
        assert!(!user.starred);
        assert_eq!(user.timestamp.timestamp_millis(), 1_717_000_000_500);
    }

    #[test]
    fn test_toggle_star_is_involution() {
        let mut m = ChatMessage::user(&chat(), 1, "x");
        m.toggle_star();
        assert!(m.starred);
        m.toggle_star();
        assert!(!m.starred);
    }

    #[test]
    fn test_record_round_trip_uses_camel_case() {
        let record = ChatRecord::new(
            vec![ChatMessage::user(&chat(), 10, "hi")],
            Some("work".to_string()),
        );
        let json = record.to_json().unwrap();
        assert!(json.contains("\"folderId\":\"work\""));
        assert!(json.contains("\"sender\":\"user\""));
        assert_eq!(ChatRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_legacy_array_loads_into_default_folder() {
        let json = r#"[{"id":"1-2","content":"old","sender":"ai","timestamp":"2024-05-29T12:00:00Z"}]"#;
        let record = ChatRecord::from_json(json).unwrap();
        assert_eq!(record.folder_id.as_deref(), Some("default"));
        assert_eq!(record.messages.len(), 1);
        assert!(!record.messages[0].starred);
    }

    #[test]
    fn test_record_without_folder() {
        let record = ChatRecord::from_json(r#"{"messages":[],"folderId":null}"#).unwrap();
        assert_eq!(record.folder_id, None);
        assert_eq!(record.folder_or_default(), "default");
    }

    #[test]
    fn test_find_message() {
        let c = chat();
        let mut record = ChatRecord::new(vec![ChatMessage::user(&c, 5, "hi")], None);
        assert!(record.find_message("1717000000000-5").is_some());
        assert!(record.find_message("1717000000000-6").is_none());
        record.find_message_mut("1717000000000-5").unwrap().toggle_star();
        assert!(record.messages[0].starred);
    }

    #[test]
    fn test_corrupt_record_is_json_error() {
        assert!(matches!(ChatRecord::from_json("{nope"), Err(Error::Json(_))));
    }

    #[test]
    fn test_history_title_truncates() {
        let c = chat();
        let h = ChatHistory {
            id: c.clone(),
            messages: vec![
                ChatMessage::user(&c, 1, "a".repeat(50)),
                ChatMessage::ai(&c, 1, "reply"),
            ],
            folder_id: "default".to_string(),
        };
        assert_eq!(h.title(), format!("{}...", "a".repeat(40)));
    }
}
