//! 意図分類の結果

use serde::{Deserialize, Serialize};

/// 推奨ツールを採用する信頼度の下限（既定値）
pub const DEFAULT_INTENT_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeIntention {
    pub intention: String,
    #[serde(default)]
    pub score: f64,
}

/// 意図分類 API の応答。欠けたフィールドは既定値で埋める。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    #[serde(default)]
    pub matched_intention: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub recommended_tools: Vec<RecommendedTool>,
    #[serde(default)]
    pub is_fallback: bool,
    #[serde(default)]
    pub alternative_intentions: Vec<AlternativeIntention>,
}

impl IntentResult {
    /// 分類に失敗したときの結果（意図なし・信頼度 0）
    pub fn fallback() -> Self {
        Self::default()
    }

    /// 意図があり、信頼度が threshold 以上か
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.matched_intention
            .as_deref()
            .is_some_and(|i| !i.is_empty())
            && self.confidence >= threshold
    }

    /// 信頼度が最大の推奨ツール（同値なら先頭）
    pub fn top_tool(&self) -> Option<&RecommendedTool> {
        self.recommended_tools
            .iter()
            .fold(None, |best: Option<&RecommendedTool>, tool| match best {
                Some(b) if tool.confidence <= b.confidence => Some(b),
                _ => Some(tool),
            })
    }

    /// 例: `Detected: learn_language (85% confidence)`
    pub fn detection_summary(&self) -> Option<String> {
        let intention = self.matched_intention.as_deref()?;
        Some(format!(
            "Detected: {} ({}% confidence)",
            intention,
            (self.confidence * 100.0).round()
        ))
    }
}
