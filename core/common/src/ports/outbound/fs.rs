//! ファイルシステム Outbound ポート
//!
//! キー値ストア・ログ・設定読み込み・音声／snippet の書き出しが使う操作だけを持つ。

use crate::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String, Error>;
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error>;
    /// 音声などのバイナリ
    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<(), Error>;
    fn rename(&self, from: &Path, to: &Path) -> Result<(), Error>;
    fn remove_file(&self, path: &Path) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    /// 直下のエントリ（フルパス）
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Error>;
    /// 追記用に開く。無ければ作る。
    fn open_append(&self, path: &Path) -> Result<Box<dyn Write + Send>, Error>;
}
