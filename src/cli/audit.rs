//! Audit log viewer

use clap::Args;

use crate::audit::EntityType;
use crate::error::{FintrackError, FintrackResult};
use crate::storage::Storage;

#[derive(Args)]
pub struct AuditArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    /// Only show one table (account, transaction, subscription, billing, ...)
    #[arg(short, long)]
    pub entity: Option<String>,
}

pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> FintrackResult<()> {
    let entity = args
        .entity
        .as_deref()
        .map(|e| {
            EntityType::parse(e)
                .ok_or_else(|| FintrackError::Validation(format!("Unknown entity type '{}'", e)))
        })
        .transpose()?;

    let entries = storage.audit().read_filtered(entity, args.limit)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
