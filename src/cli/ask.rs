//! Assistant command
//!
//! Sends a question (and optionally an image or audio file) to the model.
//! A reply that asks to record a transaction is only applied with `--apply`.

use std::path::PathBuf;

use clap::Args;

use super::today;
use crate::assistant::{AssistantCommand, Attachment, GeminiClient};
use crate::config::settings::Settings;
use crate::error::FintrackResult;
use crate::services::AssistantService;
use crate::storage::Storage;

#[derive(Args)]
pub struct AskArgs {
    /// Question or instruction, e.g. "I spent 12.50 on lunch"
    #[arg(required_unless_present = "attach")]
    pub message: Vec<String>,
    /// Receipt photo or voice note
    #[arg(short, long)]
    pub attach: Option<PathBuf>,
    /// Record the transaction the assistant proposes
    #[arg(long)]
    pub apply: bool,
}

fn describe(command: &AssistantCommand) -> String {
    let AssistantCommand::AddTransaction {
        amount,
        kind,
        description,
        category,
        date,
        account,
    } = command;
    let mut line = format!("add {} {} \"{}\"", kind, amount, description);
    if let Some(category) = category {
        line.push_str(&format!(" in {}", category));
    }
    if let Some(account) = account {
        line.push_str(&format!(" to {}", account));
    }
    if let Some(date) = date {
        line.push_str(&format!(" on {}", date));
    }
    line
}

pub fn handle_ask_command(
    storage: &Storage,
    settings: &Settings,
    args: AskArgs,
) -> FintrackResult<()> {
    let attachment = args.attach.as_deref().map(Attachment::from_file).transpose()?;
    let client = GeminiClient::from_settings(&settings.assistant)?;
    let service = AssistantService::new(storage);

    let reply = service.ask(
        &client,
        &args.message.join(" "),
        attachment,
        today(),
        settings.assistant.context_transactions,
    )?;

    println!("{}", reply.reply);

    if let Some(command) = &reply.command {
        println!();
        println!("Proposed: {}", describe(command));
        if args.apply {
            let txn = service.apply(command, today())?;
            println!("Recorded transaction {} ({})", txn.id, txn.amount);
        } else {
            println!("Run again with --apply to record it.");
        }
    }
    Ok(())
}
