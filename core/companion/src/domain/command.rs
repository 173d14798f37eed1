//! companion コマンドの enum（Command Pattern）
//!
//! CLI のフラグの組み合わせを 1 つの実行モードに解決してから usecase を呼ぶ。

use crate::domain::chat::ChatId;
use crate::domain::prompt::PromptStyle;
use common::domain::{ModelName, ProviderName};
use std::path::PathBuf;

/// メッセージ送信時の指定
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    /// -S で明示されたシステムプロンプト
    pub system: Option<String>,
    pub style: Option<PromptStyle>,
}

/// companion の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum CompanionCommand {
    Help,
    ListProfiles,
    /// モデル応答を解析して表示（None は stdin）
    Parse { input: Option<PathBuf> },
    NewChat,
    LoadChat(ChatId),
    Show,
    ListChats,
    ToggleStar(String),
    Starred,
    Search(String),
    SetFolder(String),
    SetNewChatFolder(String),
    Engage(PathBuf),
    Disengage,
    Speak { message_id: String, output: PathBuf },
    ExportSnippet { message_id: String, output: Option<PathBuf> },
    Send { message: String, options: SendOptions },
}

impl CompanionCommand {
    /// ログ用の名前
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::ListProfiles => "list-profiles",
            Self::Parse { .. } => "parse",
            Self::NewChat => "new-chat",
            Self::LoadChat(_) => "load",
            Self::Show => "show",
            Self::ListChats => "list-chats",
            Self::ToggleStar(_) => "star",
            Self::Starred => "starred",
            Self::Search(_) => "search",
            Self::SetFolder(_) => "folder",
            Self::SetNewChatFolder(_) => "new-chat-folder",
            Self::Engage(_) => "character",
            Self::Disengage => "disengage",
            Self::Speak { .. } => "speak",
            Self::ExportSnippet { .. } => "export-snippet",
            Self::Send { .. } => "send",
        }
    }
}
