//! Log の実装
//!
//! - FileJsonLog: JSONL 追記（常用）
//! - StderrLog: -v 指定時に人間向け 1 行を stderr へ
//! - TeeLog: 複数へ同時に
//! - NoopLog: 捨てる

use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogRecord};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// stderr に出す fields の上限（文字数）
const HUMAN_FIELDS_LIMIT: usize = 300;

pub struct FileJsonLog {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileJsonLog {
    /// 親ディレクトリは最初の書き込みで作る
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl Log for FileJsonLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        if let Some(dir) = self.path.parent() {
            self.fs.create_dir_all(dir)?;
        }
        let mut out = self.fs.open_append(&self.path)?;
        out.write_all(line.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StderrLog;

/// `[level] layer/kind: message {fields}`
pub fn format_human(record: &LogRecord) -> String {
    let mut line = format!("[{}] ", record.level.as_str());
    match (record.layer, record.kind) {
        (Some(layer), Some(kind)) => line.push_str(&format!("{}/{}: ", layer, kind)),
        (Some(tag), None) | (None, Some(tag)) => line.push_str(&format!("{}: ", tag)),
        (None, None) => {}
    }
    line.push_str(&record.message);
    if !record.fields.is_empty() {
        let fields = serde_json::Value::Object(record.fields.clone()).to_string();
        line.push(' ');
        if fields.chars().count() > HUMAN_FIELDS_LIMIT {
            line.extend(fields.chars().take(HUMAN_FIELDS_LIMIT));
            line.push_str("...");
        } else {
            line.push_str(&fields);
        }
    }
    line
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        eprintln!("{}", format_human(record));
        Ok(())
    }
}

/// すべての出力先へ書く。失敗があっても残りには書き、最初のエラーを返す。
pub struct TeeLog {
    sinks: Vec<Arc<dyn Log>>,
}

impl TeeLog {
    pub fn new(sinks: Vec<Arc<dyn Log>>) -> Self {
        Self { sinks }
    }
}

impl Log for TeeLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.sinks
            .iter()
            .map(|sink| sink.log(record))
            .fold(Ok(()), |acc, r| acc.and(r))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _record: &LogRecord) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StdFileSystem;
    use crate::ports::outbound::LogLevel;

    #[test]
    fn test_file_log_creates_dir_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("companion.jsonl");
        let log = FileJsonLog::new(Arc::new(StdFileSystem), path.clone());
        log.log(&LogRecord::new(LogLevel::Info, "command started").layer("cli"))
            .unwrap();
        log.log(&LogRecord::new(LogLevel::Error, "HTTP 401").kind("error"))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["layer"], "cli");
        assert_eq!(lines[1]["level"], "error");
        assert_eq!(lines[1]["kind"], "error");
    }

    #[test]
    fn test_format_human() {
        let rec = LogRecord::new(LogLevel::Warn, "Intent classification failed")
            .layer("usecase")
            .kind("intent")
            .field("confidence", 0.1);
        assert_eq!(
            format_human(&rec),
            "[warn] usecase/intent: Intent classification failed {\"confidence\":0.1}"
        );
        assert_eq!(format_human(&LogRecord::new(LogLevel::Info, "ok")), "[info] ok");
    }

    #[test]
    fn test_format_human_truncates_large_fields() {
        let rec = LogRecord::new(LogLevel::Debug, "raw").field("body", "x".repeat(1000));
        let line = format_human(&rec);
        assert!(line.ends_with("..."));
        assert!(line.chars().count() < 400);
    }

    /// 常に失敗する出力先
    struct Broken;

    impl Log for Broken {
        fn log(&self, _record: &LogRecord) -> Result<(), Error> {
            Err(Error::io_msg("disk full"))
        }
    }

    #[test]
    fn test_tee_keeps_writing_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jsonl");
        let broken: Arc<dyn Log> = Arc::new(Broken);
        let file: Arc<dyn Log> = Arc::new(FileJsonLog::new(Arc::new(StdFileSystem), path.clone()));
        let tee = TeeLog::new(vec![broken, file]);
        let err = tee.log(&LogRecord::new(LogLevel::Info, "x")).unwrap_err();
        assert_eq!(err, Error::io_msg("disk full"));
        assert!(path.exists());
        assert!(NoopLog.log(&LogRecord::new(LogLevel::Info, "x")).is_ok());
    }
}
