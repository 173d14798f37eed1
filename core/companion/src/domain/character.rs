//! 会話相手のキャラクター

use common::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ライフステージ未設定時に読み上げで使う役割
pub const DEFAULT_SPEECH_ROLE: &str = "adult";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeStage {
    pub stage: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    #[serde(default)]
    pub character_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub voice_id: String,
    #[serde(default)]
    pub life_stage: Option<LifeStage>,
}

impl CharacterData {
    /// JSON から読む。配列の場合は先頭要素を使う。
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Self::from_stored_json(json)?.ok_or_else(|| Error::json("Character list is empty"))
    }

    /// 保存値から読む。空配列は「キャラクターなし」として None。
    pub fn from_stored_json(json: &str) -> Result<Option<Self>, Error> {
        let value: Value = serde_json::from_str(json)?;
        let value = match value {
            Value::Array(items) => match items.into_iter().next() {
                Some(first) => first,
                None => return Ok(None),
            },
            other => other,
        };
        Ok(Some(serde_json::from_value(value)?))
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// ペルソナとして使えるだけの情報があるか
    pub fn has_persona(&self) -> bool {
        !self.name.is_empty() && !self.role.is_empty() && !self.system_prompt.is_empty()
    }

    /// 読み上げの役割（ライフステージ名）
    pub fn speech_role(&self) -> &str {
        self.life_stage
            .as_ref()
            .map(|s| s.stage.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SPEECH_ROLE)
    }

    /// 読み上げの声。未設定ならライフステージの既定の声。
    pub fn speech_voice(&self) -> Option<&str> {
        if self.voice_id.is_empty() {
            default_voice_for_stage(self.speech_role())
        } else {
            Some(&self.voice_id)
        }
    }
}

/// 読み上げ API に送る声の指定
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechVoice {
    pub role: String,
    pub voice_id: String,
}

/// 読み上げ API のリクエスト本文
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRequest {
    pub text: String,
    pub character: SpeechVoice,
}

impl SpeechRequest {
    pub fn for_character(text: impl Into<String>, character: &CharacterData) -> Self {
        Self {
            text: text.into(),
            character: SpeechVoice {
                role: character.speech_role().to_string(),
                voice_id: character.speech_voice().unwrap_or_default().to_string(),
            },
        }
    }
}

/// ライフステージごとの既定の声
pub fn default_voice_for_stage(stage: &str) -> Option<&'static str> {
    match stage.to_lowercase().as_str() {
        "child" => Some("21m00Tcm4TlvDq8ikWAM"),
        "teen" => Some("AZnzlk1XvdvUeBnXmlld"),
        "adult" => Some("EXAVITQu4vr4xnSDxMaL"),
        "senior" => Some("MF3mGyEYCl7XYWbV9V6O"),
        _ => None,
    }
}
