//! Assistant service
//!
//! Runs one question through a [`LanguageModel`] with the user's financial
//! context, and applies the transaction command a reply may carry.

use chrono::NaiveDate;

use crate::assistant::{
    build_context, parse_reply, AssistantCommand, AssistantReply, Attachment, LanguageModel,
    Prompt, SYSTEM_INSTRUCTION,
};
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Transaction, TransactionSource};
use crate::services::{AccountService, CategoryService, CreateTransactionInput, TransactionService};
use crate::storage::Storage;

pub struct AssistantService<'a> {
    storage: &'a Storage,
}

impl<'a> AssistantService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Build the prompt for a message
    pub fn prompt(
        &self,
        message: &str,
        attachment: Option<Attachment>,
        today: NaiveDate,
        recent_transactions: usize,
    ) -> FintrackResult<Prompt> {
        let context = build_context(self.storage, today, recent_transactions)?;
        Ok(Prompt {
            system: SYSTEM_INSTRUCTION.to_string(),
            text: format!(
                "Financial summary:\n{}\nUser message:\n{}",
                context,
                message.trim()
            ),
            attachment,
        })
    }

    /// Ask the model and parse its reply; nothing is written
    pub fn ask(
        &self,
        model: &dyn LanguageModel,
        message: &str,
        attachment: Option<Attachment>,
        today: NaiveDate,
        recent_transactions: usize,
    ) -> FintrackResult<AssistantReply> {
        if message.trim().is_empty() && attachment.is_none() {
            return Err(FintrackError::Validation(
                "Ask something or attach a file".to_string(),
            ));
        }

        let prompt = self.prompt(message, attachment, today, recent_transactions)?;
        let text = model.generate(&prompt)?;
        let reply = parse_reply(&text)?;

        tracing::info!(command = reply.command.is_some(), "assistant replied");
        Ok(reply)
    }

    /// Insert the transaction a command describes
    ///
    /// The account is matched by name, falling back to the default account.
    /// An unknown category name leaves the transaction uncategorized.
    pub fn apply(&self, command: &AssistantCommand, today: NaiveDate) -> FintrackResult<Transaction> {
        let AssistantCommand::AddTransaction {
            amount,
            kind,
            description,
            category,
            date,
            account,
        } = command;

        let accounts = AccountService::new(self.storage);
        let account = match account {
            Some(name) => accounts.resolve(name)?,
            None => accounts.default_account()?.ok_or_else(|| {
                FintrackError::Assistant(
                    "No account to record the transaction in; create one first".to_string(),
                )
            })?,
        };

        let category_id = match category {
            Some(name) => {
                let found = CategoryService::new(self.storage).find(name)?;
                if found.is_none() {
                    tracing::warn!(category = %name, "assistant named an unknown category");
                }
                found.map(|c| c.id)
            }
            None => None,
        };

        let mut input =
            CreateTransactionInput::new(account.id, date.unwrap_or(today), kind.signed(*amount));
        input.description = description.clone();
        input.category_id = category_id;
        input.source = TransactionSource::Assistant;

        TransactionService::new(self.storage).create(input)
    }
}
