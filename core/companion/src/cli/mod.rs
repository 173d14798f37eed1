//! CLI（引数解析とコマンドへの変換）

mod args;

pub use args::{config_to_command, parse_args, print_completion, CliOutcome, Config};

#[cfg(test)]
pub use args::parse_args_from;
