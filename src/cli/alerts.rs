//! Alerts command

use super::today;
use crate::config::settings::Settings;
use crate::error::FintrackResult;
use crate::reports::{collect_alerts, format_alerts, AlertSettings};
use crate::storage::Storage;

/// Print budget, renewal, goal and debt alerts for today
pub fn handle_alerts_command(storage: &Storage, settings: &Settings) -> FintrackResult<()> {
    let alerts = collect_alerts(storage, today(), AlertSettings::from(settings))?;
    print!("{}", format_alerts(&alerts));
    Ok(())
}
