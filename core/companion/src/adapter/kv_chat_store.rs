//! KeyValueStore 上のチャット・キャラクターストア
//!
//! キーはブラウザ版の localStorage と同じ（`chat_<id>`, `currentChatId`, `activeFolderId`,
//! `newChatFolderId`, `engagedCharacter`）。

use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::KeyValueStore;

use crate::domain::chat::CHAT_KEY_PREFIX;
use crate::domain::{CharacterData, ChatId, ChatRecord};
use crate::ports::outbound::{CharacterStore, ChatStore};

const CURRENT_CHAT_KEY: &str = "currentChatId";
const ACTIVE_FOLDER_KEY: &str = "activeFolderId";
const NEW_CHAT_FOLDER_KEY: &str = "newChatFolderId";
const ENGAGED_CHARACTER_KEY: &str = "engagedCharacter";

pub struct KvChatStore {
    kv: Arc<dyn KeyValueStore>,
}

impl KvChatStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// 文字列値は JSON 文字列として保存する
    fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
        match self.kv.get(key)? {
            Some(raw) => Ok(Some(
                serde_json::from_str::<String>(&raw).unwrap_or(raw),
            )),
            None => Ok(None),
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), Error> {
        self.kv.set(key, &serde_json::to_string(value)?)
    }
}

impl ChatStore for KvChatStore {
    fn load_chat(&self, id: &ChatId) -> Result<Option<ChatRecord>, Error> {
        let key = id.storage_key();
        match self.kv.get(&key)? {
            Some(json) => ChatRecord::from_json(&json)
                .map(Some)
                .map_err(|e| Error::json(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    fn save_chat(&self, id: &ChatId, record: &ChatRecord) -> Result<(), Error> {
        self.kv.set(&id.storage_key(), &record.to_json()?)
    }

    fn chat_ids(&self) -> Result<Vec<ChatId>, Error> {
        let mut ids: Vec<ChatId> = self
            .kv
            .keys()?
            .iter()
            .filter(|k| k.starts_with(CHAT_KEY_PREFIX))
            .filter_map(|k| ChatId::from_storage_key(k))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn current_chat_id(&self) -> Result<Option<ChatId>, Error> {
        Ok(self
            .get_string(CURRENT_CHAT_KEY)?
            .and_then(|id| ChatId::new(id).ok()))
    }

    fn set_current_chat_id(&self, id: &ChatId) -> Result<(), Error> {
        self.set_string(CURRENT_CHAT_KEY, id.as_str())
    }

    fn active_folder(&self) -> Result<Option<String>, Error> {
        self.get_string(ACTIVE_FOLDER_KEY)
    }

    fn set_active_folder(&self, folder_id: &str) -> Result<(), Error> {
        self.set_string(ACTIVE_FOLDER_KEY, folder_id)
    }

    fn new_chat_folder(&self) -> Result<Option<String>, Error> {
        self.get_string(NEW_CHAT_FOLDER_KEY)
    }

    fn set_new_chat_folder(&self, folder_id: Option<&str>) -> Result<(), Error> {
        match folder_id {
            Some(folder_id) => self.set_string(NEW_CHAT_FOLDER_KEY, folder_id),
            None => self.kv.remove(NEW_CHAT_FOLDER_KEY),
        }
    }
}

impl CharacterStore for KvChatStore {
    fn engaged(&self) -> Result<Option<CharacterData>, Error> {
        match self.kv.get(ENGAGED_CHARACTER_KEY)? {
            Some(json) => CharacterData::from_stored_json(&json),
            None => Ok(None),
        }
    }

    fn engage(&self, character: &CharacterData) -> Result<(), Error> {
        self.kv.set(ENGAGED_CHARACTER_KEY, &character.to_json()?)
    }

    fn disengage(&self) -> Result<(), Error> {
        self.kv.remove(ENGAGED_CHARACTER_KEY)
    }
}
