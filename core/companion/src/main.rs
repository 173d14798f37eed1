mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;

use cli::{config_to_command, parse_args, print_completion, CliOutcome, Config};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::{parse_response, ChatMessage, CompanionCommand, ParseOutcome, RENDER_MARKER};
use ports::inbound::RunCompanion;
use wiring::{wire_companion, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl RunCompanion for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config)?;
        let command_name = cmd.name();
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = self.dispatch(cmd);

        let code = result.as_ref().copied().unwrap_or(0);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = self.app.logger.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("cli")
                    .kind("error"),
            );
        }
        result
    }
}

impl Runner {
    fn dispatch(&self, cmd: CompanionCommand) -> Result<i32, Error> {
        let chat = &self.app.chat;
        match cmd {
            CompanionCommand::Help => print_help(),
            CompanionCommand::ListProfiles => {
                let (names, default) = chat.list_profiles()?;
                for name in &names {
                    if *name == default {
                        println!("{} (default)", name);
                    } else {
                        println!("{}", name);
                    }
                }
            }
            CompanionCommand::Parse { input } => {
                let raw = match input {
                    Some(path) => self.app.fs.read_to_string(&path)?,
                    None => std::io::read_to_string(std::io::stdin())?,
                };
                let outcome = parse_response(&raw);
                let content = outcome.content();
                let report = serde_json::json!({
                    "recognized": outcome.is_recognized(),
                    "explanation": content.map(|c| c.explanation()),
                    "snippet": content.and_then(|c| c.snippet()),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            CompanionCommand::NewChat => println!("{}", chat.new_chat()?),
            CompanionCommand::LoadChat(id) => {
                let messages = chat.load_chat(&id)?;
                println!("chat {}", id);
                messages.iter().for_each(print_message);
            }
            CompanionCommand::Show => {
                let (id, messages) = chat.current_messages()?;
                println!("chat {}", id);
                messages.iter().for_each(print_message);
            }
            CompanionCommand::ListChats => {
                for h in chat.chat_histories()? {
                    println!(
                        "{}\t[{}]\t{} messages\t{}",
                        h.id,
                        h.folder_id,
                        h.messages.len(),
                        h.title()
                    );
                }
            }
            CompanionCommand::ToggleStar(message_id) => {
                if chat.toggle_star(&message_id)? {
                    println!("Message starred and saved to your collection");
                } else {
                    println!("Message removed from starred collection");
                }
            }
            CompanionCommand::Starred => chat.starred_messages()?.iter().for_each(print_message),
            CompanionCommand::Search(query) => {
                for hit in chat.search(&query)? {
                    let line = hit.message.content.lines().next().unwrap_or("");
                    println!("{}\t{}\t{}", hit.chat_id, hit.message.id, line);
                }
            }
            CompanionCommand::SetFolder(folder) => chat.set_active_folder(&folder)?,
            CompanionCommand::SetNewChatFolder(folder) => chat.set_new_chat_folder(&folder)?,
            CompanionCommand::Engage(path) => {
                let json = self.app.fs.read_to_string(&path)?;
                let character = chat.engage_character(&json)?;
                println!("Engaged {} ({})", character.name, character.speech_role());
            }
            CompanionCommand::Disengage => {
                chat.disengage_character()?;
                println!("Character disengaged");
            }
            CompanionCommand::Speak { message_id, output } => {
                let written = self.app.speech.speak(&message_id, &output)?;
                eprintln!("Wrote {} bytes to {}", written, output.display());
            }
            CompanionCommand::ExportSnippet { message_id, output } => {
                let snippet = chat
                    .export_snippet(&message_id)?
                    .ok_or_else(|| Error::json(format!("Message {} has no snippet", message_id)))?;
                match output {
                    Some(path) => self.app.fs.write(&path, &snippet)?,
                    None => println!("{}", snippet),
                }
            }
            CompanionCommand::Send { message, options } => {
                let outcome = chat.send_message(&message, &options)?;
                if let Some(detected) = &outcome.detected {
                    eprintln!("{}", detected);
                }
                print_reply(&outcome.parsed, &outcome.raw);
            }
        }
        Ok(0)
    }
}

fn print_message(m: &ChatMessage) {
    let star = if m.starred { " *" } else { "" };
    println!(
        "[{}] {} {}{}",
        m.id,
        m.timestamp.format("%Y-%m-%d %H:%M"),
        m.sender.as_str(),
        star
    );
    println!("{}", m.content);
    println!();
}

fn print_reply(parsed: &ParseOutcome, raw: &str) {
    match parsed {
        ParseOutcome::Recognized(c) => {
            println!("{}", c.explanation());
            if let Some(snippet) = c.snippet() {
                println!();
                println!("{}", RENDER_MARKER);
                println!("{}", snippet);
            }
        }
        ParseOutcome::Unrecognized => println!("{}", raw),
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("companion: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        CliOutcome::Config(c) => c,
        CliOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_companion(config.verbose)?;
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: companion [options] [message...]");
}

fn print_help() {
    println!("Usage: companion [options] [message...]");
    println!("Options:");
    println!("  -h, --help                     Show this help message");
    println!("  -L, --list-profiles            List currently available provider profiles (from profiles.json + built-ins)");
    println!("  -p, --profile <profile>        Specify LLM profile (sonar, openai_compat, echo, etc.). Default: profiles.json default, or sonar");
    println!("  -m, --model <model>            Specify model name (e.g. sonar, sonar-pro)");
    println!("  -S, --system <prompt>          System prompt to use when no intent is detected");
    println!("      --style <style>            creative | analytical | educational (when no intent is detected)");
    println!("  -v, --verbose                  Mirror logs to stderr");
    println!("      --parse [file]             Parse a raw model reply (file or stdin) and print explanation/snippet as JSON");
    println!("      --new-chat                 Start a new chat");
    println!("      --load <chat_id>           Switch to a saved chat");
    println!("      --show                     Print the current chat");
    println!("      --list-chats               List chat histories with their folders");
    println!("      --star <message_id>        Toggle the star on a message of the current chat");
    println!("      --starred                  List starred messages of the current chat");
    println!("      --search <query>           Search all chats (case-insensitive)");
    println!("      --folder <folder_id>       Set the active folder");
    println!("      --new-chat-folder <id>     Save the next chat into this folder");
    println!("      --character <file>         Engage a character (JSON object or array)");
    println!("      --disengage                Clear the engaged character");
    println!("      --speak <message_id>       Synthesize speech for a message (-o path, default speech.mp3)");
    println!("      --export-snippet <id>      Write the markup snippet of a message (-o path, or stdout)");
    println!("      --generate <shell>         Generate shell completion script (bash, zsh, fish, ...)");
    println!();
    println!("Environment:");
    println!("  COMPANION_HOME        Home directory. Profiles: $COMPANION_HOME/config/profiles.json");
    println!("                        If unset, $XDG_CONFIG_HOME/companion (e.g. ~/.config/companion) is used.");
    println!("  SONAR_API_TOKEN       API key for the default sonar profile");
    println!("  COMPANION_INTENT_URL  Intent classification service (overrides settings.json)");
    println!("  COMPANION_SPEECH_URL  Speech service (overrides settings.json)");
    println!();
    println!("Examples:");
    println!("  companion Help me learn Spanish vocabulary");
    println!("  companion -p echo --style creative Tell me a story");
    println!("  companion --list-chats");
    println!("  companion --export-snippet 1717000000000-1717000000501 -o page.html");
}
