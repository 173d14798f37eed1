//! 意図分類 API（POST {base_url}/classify-intent）

use common::error::Error;
use serde_json::json;

use crate::domain::IntentResult;
use crate::ports::outbound::IntentClassifier;

pub struct HttpIntentClassifier {
    base_url: String,
}

impl HttpIntentClassifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/classify-intent", self.base_url)
    }
}

impl IntentClassifier for HttpIntentClassifier {
    fn classify(&self, prompt: &str) -> Result<IntentResult, Error> {
        let body = json!({ "prompt": prompt }).to_string();
        let response = reqwest::blocking::Client::new()
            .post(self.url())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .map_err(|e| Error::http(format!("Intent request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read intent response: {}", e)))?;
        if !status.is_success() {
            return Err(Error::http(format!(
                "Intent API error (HTTP {})",
                status.as_u16()
            )));
        }
        intent_from_body(&text)
    }
}

fn intent_from_body(body: &str) -> Result<IntentResult, Error> {
    serde_json::from_str(body)
        .map_err(|e| Error::json(format!("Failed to parse intent response: {}", e)))
}

/// 意図分類を使わない設定のときの実装（常にフォールバック結果）
pub struct NoIntentClassifier;

impl IntentClassifier for NoIntentClassifier {
    fn classify(&self, _prompt: &str) -> Result<IntentResult, Error> {
        Ok(IntentResult::fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let c = HttpIntentClassifier::new("https://intent.example/");
        assert_eq!(c.url(), "https://intent.example/classify-intent");
    }

    #[test]
    fn test_intent_from_body() {
        let r = intent_from_body(
            r#"{"matched_intention":"learn","confidence":0.72,"recommended_tools":[]}"#,
        )
        .unwrap();
        assert_eq!(r.matched_intention.as_deref(), Some("learn"));
        assert!(matches!(intent_from_body("<html>"), Err(Error::Json(_))));
    }

    #[test]
    fn test_no_intent_classifier() {
        assert_eq!(
            NoIntentClassifier.classify("hi").unwrap(),
            IntentResult::fallback()
        );
    }
}
