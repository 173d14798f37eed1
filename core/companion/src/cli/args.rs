use crate::domain::{ChatId, CompanionCommand, PromptStyle, SendOptions};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{ModelName, ProviderName};
use common::error::Error;
use std::path::PathBuf;

/// `--parse` の値が無いとき（stdin から読む）
const STDIN_MARKER: &str = "-";

const DEFAULT_SPEECH_OUTPUT: &str = "speech.mp3";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -L / --list-profiles: 現在有効なプロファイル一覧を表示
    pub list_profiles: bool,
    /// -v / --verbose: ログを stderr にも出す
    pub verbose: bool,
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    pub system: Option<String>,
    pub style: Option<String>,
    /// --parse [file]: "-" は stdin
    pub parse: Option<String>,
    pub new_chat: bool,
    pub load: Option<String>,
    pub show: bool,
    pub list_chats: bool,
    pub star: Option<String>,
    pub starred: bool,
    pub search: Option<String>,
    pub folder: Option<String>,
    pub new_chat_folder: Option<String>,
    pub character: Option<PathBuf>,
    pub disengage: bool,
    pub speak: Option<String>,
    pub export_snippet: Option<String>,
    /// -o / --output: --speak / --export-snippet の出力先
    pub output: Option<PathBuf>,
    pub message_args: Vec<String>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum CliOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn flag(name: &'static str, long: &'static str, help: &'static str) -> clap::Arg {
    clap::Arg::new(name)
        .long(long)
        .help(help)
        .action(ArgAction::SetTrue)
}

fn value(name: &'static str, long: &'static str, value_name: &'static str, help: &'static str) -> clap::Arg {
    clap::Arg::new(name)
        .long(long)
        .value_name(value_name)
        .help(help)
        .num_args(1)
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("companion")
        .about("Chat with an AI companion and render what it builds")
        .disable_help_flag(true)
        .arg(flag("help", "help", "Show this help message").short('h'))
        .arg(flag("list-profiles", "list-profiles", "List currently available provider profiles").short('L'))
        .arg(flag("verbose", "verbose", "Mirror logs to stderr").short('v'))
        .arg(value("profile", "profile", "profile", "Specify LLM profile (sonar, openai_compat, echo, etc.)").short('p'))
        .arg(value("model", "model", "model", "Specify model name (e.g. sonar, sonar-pro)").short('m'))
        .arg(value("system", "system", "prompt", "Use this system prompt when no intent is detected").short('S'))
        .arg(
            value("style", "style", "style", "Prompt style when no intent is detected")
                .value_parser(["creative", "analytical", "educational"]),
        )
        .arg(
            clap::Arg::new("parse")
                .long("parse")
                .value_name("file")
                .help("Parse a raw model reply from a file (or stdin) and print the result")
                .num_args(0..=1)
                .default_missing_value(STDIN_MARKER),
        )
        .arg(flag("new-chat", "new-chat", "Start a new chat"))
        .arg(value("load", "load", "chat_id", "Switch to a saved chat"))
        .arg(flag("show", "show", "Print the current chat"))
        .arg(flag("list-chats", "list-chats", "List chat histories with their folders"))
        .arg(value("star", "star", "message_id", "Toggle the star on a message"))
        .arg(flag("starred", "starred", "List starred messages of the current chat"))
        .arg(value("search", "search", "query", "Search all chats (case-insensitive)"))
        .arg(value("folder", "folder", "folder_id", "Set the active folder"))
        .arg(value("new-chat-folder", "new-chat-folder", "folder_id", "Save the next chat into this folder"))
        .arg(
            value("character", "character", "file", "Engage a character (JSON object or array)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(flag("disengage", "disengage", "Clear the engaged character"))
        .arg(value("speak", "speak", "message_id", "Synthesize speech for a message"))
        .arg(value("export-snippet", "export-snippet", "message_id", "Write the markup snippet of a message"))
        .arg(
            value("output", "output", "path", "Output path for --speak / --export-snippet")
                .short('o')
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("positional")
                .index(1)
                .help("Message words")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let string = |name: &str| matches.get_one::<String>(name).cloned();
    let path = |name: &str| matches.get_one::<PathBuf>(name).cloned();
    Config {
        help: matches.get_flag("help"),
        list_profiles: matches.get_flag("list-profiles"),
        verbose: matches.get_flag("verbose"),
        profile: string("profile").map(ProviderName::new),
        model: string("model").map(ModelName::new),
        system: string("system"),
        style: string("style"),
        parse: string("parse"),
        new_chat: matches.get_flag("new-chat"),
        load: string("load"),
        show: matches.get_flag("show"),
        list_chats: matches.get_flag("list-chats"),
        star: string("star"),
        starred: matches.get_flag("starred"),
        search: string("search"),
        folder: string("folder"),
        new_chat_folder: string("new-chat-folder"),
        character: path("character"),
        disengage: matches.get_flag("disengage"),
        speak: string("speak"),
        export_snippet: string("export-snippet"),
        output: path("output"),
        message_args: matches
            .get_many::<String>("positional")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は CliOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<CliOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(CliOutcome::GenerateCompletion(shell));
    }
    Ok(CliOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[cfg(test)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "companion", &mut std::io::stdout());
}

/// Config を実行モードに変換する（1 回の実行で 1 モード）
pub fn config_to_command(config: Config) -> Result<CompanionCommand, Error> {
    if config.help {
        return Ok(CompanionCommand::Help);
    }
    if config.list_profiles {
        return Ok(CompanionCommand::ListProfiles);
    }
    if let Some(input) = config.parse {
        let input = (input != STDIN_MARKER).then(|| PathBuf::from(input));
        return Ok(CompanionCommand::Parse { input });
    }
    if let Some(path) = config.character {
        return Ok(CompanionCommand::Engage(path));
    }
    if config.disengage {
        return Ok(CompanionCommand::Disengage);
    }
    if let Some(folder) = config.new_chat_folder {
        return Ok(CompanionCommand::SetNewChatFolder(folder));
    }
    if let Some(folder) = config.folder {
        return Ok(CompanionCommand::SetFolder(folder));
    }
    if config.new_chat {
        return Ok(CompanionCommand::NewChat);
    }
    if let Some(id) = config.load {
        return Ok(CompanionCommand::LoadChat(ChatId::new(id)?));
    }
    if let Some(message_id) = config.star {
        return Ok(CompanionCommand::ToggleStar(message_id));
    }
    if config.starred {
        return Ok(CompanionCommand::Starred);
    }
    if let Some(query) = config.search {
        return Ok(CompanionCommand::Search(query));
    }
    if let Some(message_id) = config.speak {
        let output = config
            .output
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SPEECH_OUTPUT));
        return Ok(CompanionCommand::Speak { message_id, output });
    }
    if let Some(message_id) = config.export_snippet {
        return Ok(CompanionCommand::ExportSnippet {
            message_id,
            output: config.output,
        });
    }
    if config.list_chats {
        return Ok(CompanionCommand::ListChats);
    }
    if config.show {
        return Ok(CompanionCommand::Show);
    }

    let message = config.message_args.join(" ");
    if message.trim().is_empty() {
        return Err(Error::invalid_argument(
            "No message provided. Use --show to print the current chat.",
        ));
    }
    let style = config
        .style
        .as_deref()
        .map(str::parse::<PromptStyle>)
        .transpose()?;
    Ok(CompanionCommand::Send {
        message,
        options: SendOptions {
            profile: config.profile,
            model: config.model,
            system: config.system,
            style,
        },
    })
}
