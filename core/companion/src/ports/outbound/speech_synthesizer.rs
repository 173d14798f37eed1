//! 読み上げの Outbound ポート

use crate::domain::SpeechRequest;
use common::error::Error;

/// テキストを音声データ（バイト列）に変換する
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, Error>;
}
