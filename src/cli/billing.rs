//! Premium plan commands

use std::io::Read;
use std::path::PathBuf;

use clap::Subcommand;

use crate::billing::StripeClient;
use crate::config::settings::Settings;
use crate::error::{FintrackError, FintrackResult};
use crate::services::{BillingService, WebhookOutcome};
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum BillingCommands {
    /// Show the current plan
    Status,
    /// Start a hosted checkout for the premium plan
    Checkout,
    /// Verify and apply a webhook payload
    Webhook {
        /// File holding the raw payload; stdin when omitted
        #[arg(short, long)]
        payload: Option<PathBuf>,
        /// Value of the signature header
        #[arg(short, long)]
        signature: String,
    },
}

fn read_payload(path: Option<PathBuf>) -> FintrackResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path).map_err(|e| {
            FintrackError::Io(format!("Failed to read {}: {}", path.display(), e))
        }),
        None => {
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .map_err(|e| FintrackError::Io(format!("Failed to read stdin: {}", e)))?;
            Ok(payload)
        }
    }
}

pub fn handle_billing_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillingCommands,
) -> FintrackResult<()> {
    let service = BillingService::new(storage);

    match cmd {
        BillingCommands::Status => {
            let plan = service.status()?;
            println!("Plan:     {}", plan.status);
            println!(
                "Premium:  {}",
                if plan.status.is_premium() { "yes" } else { "no" }
            );
            if let Some(customer) = &plan.customer_id {
                println!("Customer: {}", customer);
            }
            if let Some(updated) = plan.updated_at {
                println!("Updated:  {}", updated.format("%Y-%m-%d %H:%M UTC"));
            }
        }

        BillingCommands::Checkout => {
            if settings.billing.price_id.is_empty() {
                return Err(FintrackError::Config(
                    "No price configured; run 'fintrack config set billing.price_id <id>'"
                        .to_string(),
                ));
            }
            let client = StripeClient::from_settings(&settings.billing)?;
            let session = service.checkout(&client, &settings.billing)?;
            println!("Open this page to subscribe:");
            println!("  {}", session.url);
        }

        BillingCommands::Webhook { payload, signature } => {
            let payload = read_payload(payload)?;
            let secret = settings.billing.webhook_secret()?;
            let outcome = service.handle_webhook(
                &payload,
                &signature,
                &secret,
                settings.billing.signature_tolerance_secs,
                chrono::Utc::now().timestamp(),
            )?;
            match outcome {
                WebhookOutcome::Applied { event_type, status } => {
                    println!("Applied {}: plan is now {}", event_type, status)
                }
                WebhookOutcome::Ignored { event_type } => println!("Ignored {}", event_type),
                WebhookOutcome::AlreadyProcessed { event_id } => {
                    println!("Event {} was already processed", event_id)
                }
                WebhookOutcome::Superseded { event_id } => {
                    println!("Event {} is older than the current plan state; ignored", event_id)
                }
            }
        }
    }
    Ok(())
}
