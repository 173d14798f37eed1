//! 読み上げ API（POST {base_url}/speak → 音声バイト列）

use common::error::Error;
use serde_json::Value;

use crate::domain::SpeechRequest;
use crate::ports::outbound::SpeechSynthesizer;

const DEFAULT_SPEECH_ERROR: &str = "Speech conversion failed";

pub struct HttpSpeechSynthesizer {
    base_url: String,
}

impl HttpSpeechSynthesizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/speak", self.base_url)
    }
}

impl SpeechSynthesizer for HttpSpeechSynthesizer {
    fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, Error> {
        let body = serde_json::to_string(request)
            .map_err(|e| Error::json(format!("Failed to serialize speech request: {}", e)))?;
        let response = reqwest::blocking::Client::new()
            .post(self.url())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .map_err(|e| Error::http(format!("Speech request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(Error::http(speech_error_message(&text)));
        }
        let bytes = response
            .bytes()
            .map_err(|e| Error::http(format!("Failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// エラー応答の `details` を取り出す。無ければ既定の文言。
fn speech_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("details").and_then(|d| d.as_str()).map(str::to_string))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SPEECH_ERROR.to_string())
}
