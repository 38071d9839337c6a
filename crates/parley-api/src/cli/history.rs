//! `parley history` - print the stored conversation straight from the store.

use console::style;

use parley_core::repository::message::MessageStore;
use parley_infra::filesystem::resolve_data_dir;
use parley_types::message::{Message, Sender};

use crate::state::{StoreOptions, open_store};

pub async fn show_history(options: &StoreOptions, json: bool) -> anyhow::Result<()> {
    let store = open_store(options, &resolve_data_dir()).await?;
    let messages = store.load_all().await?;

    if json {
        let body = serde_json::json!({ "messages": messages });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  {}", style("No messages yet.").dim());
        println!();
        return Ok(());
    }

    println!();
    for message in &messages {
        print_message(message);
    }
    println!(
        "  {}",
        style(format!("{} messages ({})", messages.len(), store.backend())).dim()
    );
    println!();
    Ok(())
}

/// Print one message with a sender label and local time.
pub fn print_message(message: &Message) {
    let label = match message.sender {
        Sender::User => style("You").green().bold(),
        Sender::Ai => style("AI ").cyan().bold(),
    };
    let time = message
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M");

    let mut lines = message.text.lines();
    let first = lines.next().unwrap_or_default();
    println!("  {label} {} {first}", style(time).dim());
    for line in lines {
        println!("            {line}");
    }
    println!();
}
