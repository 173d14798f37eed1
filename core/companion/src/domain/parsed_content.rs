//! モデル応答の解析結果
//!
//! explanation（本文）と snippet（隔離して描画するマークアップ）の組。

/// 本文とマークアップの区切りとして保存形式・モデル出力の両方で使う行
pub const RENDER_MARKER: &str = "### Render Code Below ###";

/// 解析済みの応答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    explanation: String,
    /// 空文字は None に正規化する
    snippet: Option<String>,
}

impl ParsedContent {
    pub fn new(explanation: impl Into<String>, snippet: Option<String>) -> Self {
        Self {
            explanation: explanation.into(),
            snippet: snippet.filter(|s| !s.trim().is_empty()),
        }
    }

    /// snippet なしの本文だけ
    pub fn explanation_only(explanation: impl Into<String>) -> Self {
        Self::new(explanation, None)
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    /// チャット履歴に保存する平文。snippet があれば区切り行の後ろに付ける。
    pub fn render_for_storage(&self) -> String {
        match &self.snippet {
            Some(snippet) => format!("{}\n\n{}\n{}", self.explanation, RENDER_MARKER, snippet),
            None => self.explanation.clone(),
        }
    }
}

/// 応答解析の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Recognized(ParsedContent),
    /// 既知の形式に当てはまらない（呼び出し側は生テキストを表示する）
    Unrecognized,
}

impl ParseOutcome {
    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized(_))
    }

    pub fn content(&self) -> Option<&ParsedContent> {
        match self {
            Self::Recognized(c) => Some(c),
            Self::Unrecognized => None,
        }
    }

    /// 保存用テキスト。Unrecognized のときは raw をそのまま使う。
    pub fn storage_text(&self, raw: &str) -> String {
        match self {
            Self::Recognized(c) => c.render_for_storage(),
            Self::Unrecognized => raw.to_string(),
        }
    }

    /// 表示・読み上げ用の本文。Unrecognized のときは raw。
    pub fn explanation_or<'a>(&'a self, raw: &'a str) -> &'a str {
        match self {
            Self::Recognized(c) => c.explanation(),
            Self::Unrecognized => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_snippet_is_none() {
        let c = ParsedContent::new("hi", Some("  \n".to_string()));
        assert_eq!(c.snippet(), None);
        assert_eq!(c.render_for_storage(), "hi");
    }

    #[test]
    fn test_render_for_storage_with_snippet() {
        let c = ParsedContent::new("Here you go", Some("<div>hi</div>".to_string()));
        assert_eq!(
            c.render_for_storage(),
            "Here you go\n\n### Render Code Below ###\n<div>hi</div>"
        );
    }

    #[test]
    fn test_outcome_storage_text_falls_back_to_raw() {
        assert_eq!(ParseOutcome::Unrecognized.storage_text("{ raw"), "{ raw");
        assert_eq!(ParseOutcome::Unrecognized.explanation_or("{ raw"), "{ raw");
        let ok = ParseOutcome::Recognized(ParsedContent::explanation_only("text"));
        assert!(ok.is_recognized());
        assert_eq!(ok.storage_text("ignored"), "text");
    }
}
