//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。終了コードは sysexits に合わせる。

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 引数不正（usage を表示する）
    #[error("{0}")]
    InvalidArgs(String),
    #[error("{0}")]
    Io(String),
    /// HTTP 通信・API エラー
    #[error("{0}")]
    Http(String),
    /// JSON のパース・シリアライズ失敗
    #[error("{0}")]
    Json(String),
    /// 環境変数・設定の不備
    #[error("{0}")]
    Env(String),
    #[error("{0}")]
    System(String),
}

impl Error {
    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// I/O エラー（メッセージのみ）
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// システムエラー
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }

    /// プロセスの終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgs(_) => 64,
            Self::Json(_) => 65,
            Self::Http(_) => 69,
            Self::System(_) => 70,
            Self::Io(_) => 74,
            Self::Env(_) => 78,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::invalid_argument("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 64);
        assert!(err.is_usage());

        let err = Error::system("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 70);
        assert!(!err.is_usage());
    }

    #[test]
    fn test_exit_codes_per_kind() {
        assert_eq!(Error::io_msg("x").exit_code(), 74);
        assert_eq!(Error::http("x").exit_code(), 69);
        assert_eq!(Error::json("x").exit_code(), 65);
        assert_eq!(Error::env("x").exit_code(), 78);
    }

    #[test]
    fn test_from_serde_json_error() {
        let e = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = e.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
