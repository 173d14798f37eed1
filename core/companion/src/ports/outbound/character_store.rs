//! キャラクターストアの Outbound ポート

use crate::domain::CharacterData;
use common::error::Error;

pub trait CharacterStore: Send + Sync {
    /// 保存データが壊れている場合は Err(Json)
    fn engaged(&self) -> Result<Option<CharacterData>, Error>;
    fn engage(&self, character: &CharacterData) -> Result<(), Error>;
    /// 未設定でも Ok
    fn disengage(&self) -> Result<(), Error>;
}
