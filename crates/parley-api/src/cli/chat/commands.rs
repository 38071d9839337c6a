//! Slash command parsing for the chat loop.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    /// Reload and reprint the conversation from the server.
    History,
    Exit,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/history" => Some(ChatCommand::History),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

pub fn print_help() {
    println!();
    println!("  {}", style("Commands").bold());
    println!("  {}  show this help", style("/help   ").cyan());
    println!("  {}  clear the screen", style("/clear  ").cyan());
    println!("  {}  reload the conversation", style("/history").cyan());
    println!("  {}  leave the chat", style("/quit   ").cyan());
    println!();
    println!(
        "  {}",
        style("End a line with \\ to continue the message on the next line.").dim()
    );
    println!();
}
