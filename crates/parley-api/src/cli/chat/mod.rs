//! `parley chat` - interactive terminal client for a running server.
//!
//! Loads the history once, then loops: read a message, show it right away,
//! POST it, and redraw from the server's answer. A failed send removes the
//! optimistic message and prints the error banner.

pub mod commands;
pub mod input;

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::history::print_message;
use crate::client::ApiClient;
use crate::client::view::ConversationView;

use self::commands::ChatCommand;
use self::input::{ChatInput, InputEvent};

pub async fn run_chat(api_url: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let mut view = ConversationView::new();

    print_banner(client.base_url());
    reload(&client, &mut view).await;

    let prompt = format!("  {} ", style("You >").green().bold());
    let continuation = format!("  {} ", style("    .").green().dim());
    let (mut chat_input, _writer) = ChatInput::new(prompt, continuation)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_message().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("  {}", style("Press Ctrl+D or type /quit to exit.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::History => reload(&client, &mut view).await,
                ChatCommand::Exit => break,
                ChatCommand::Unknown(name) => println!(
                    "  {} Unknown command: {}. Type /help for available commands.",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let Some(text) = view.begin_send(&text) else {
            continue;
        };

        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        let result = client.send(&text).await;
        spinner.finish_and_clear();

        match result {
            Ok(exchange) => {
                view.complete_send(exchange.messages);
                println!();
                print_message(&exchange.reply);
            }
            Err(err) => {
                tracing::debug!(error = %err, "Send failed");
                view.fail_send();
                print_error(&view);
            }
        }
    }

    chat_input.flush();
    println!("\n  {}", style("Bye.").dim());
    Ok(())
}

/// Fetch the history from the server and print it.
async fn reload(client: &ApiClient, view: &mut ConversationView) {
    match client.history().await {
        Ok(messages) => {
            view.load(messages);
            println!();
            if view.messages().is_empty() {
                println!("  {}", style("Start a conversation by typing below.").dim());
                println!();
            }
            for message in view.messages() {
                print_message(message);
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, "History load failed");
            view.load_failed();
            print_error(&view);
        }
    }
}

fn print_error(view: &ConversationView) {
    if let Some(banner) = view.error() {
        println!("\n  {} {}\n", style("!").red().bold(), style(banner).red());
    }
}

fn print_banner(base_url: &str) {
    println!();
    println!(
        "  {} {}",
        style("parley").cyan().bold(),
        style(format!("connected to {base_url}")).dim()
    );
    println!(
        "  {}",
        style("Type /help for commands, /quit to leave.").dim()
    );
}
