//! チャット履歴ストアの Outbound ポート
//!
//! ブラウザの localStorage 相当。チャット本体のほか、現在のチャット・アクティブフォルダ・
//! 次の新規チャットのフォルダを保持する。

use crate::domain::{ChatId, ChatRecord};
use common::error::Error;

pub trait ChatStore: Send + Sync {
    fn load_chat(&self, id: &ChatId) -> Result<Option<ChatRecord>, Error>;
    fn save_chat(&self, id: &ChatId, record: &ChatRecord) -> Result<(), Error>;
    /// 保存されているチャット ID（昇順）
    fn chat_ids(&self) -> Result<Vec<ChatId>, Error>;

    fn current_chat_id(&self) -> Result<Option<ChatId>, Error>;
    fn set_current_chat_id(&self, id: &ChatId) -> Result<(), Error>;

    fn active_folder(&self) -> Result<Option<String>, Error>;
    fn set_active_folder(&self, folder_id: &str) -> Result<(), Error>;

    fn new_chat_folder(&self) -> Result<Option<String>, Error>;
    /// None で指定を消す
    fn set_new_chat_folder(&self, folder_id: Option<&str>) -> Result<(), Error>;
}
