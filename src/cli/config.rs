//! Configuration commands

use clap::Subcommand;

use crate::config::paths::FintrackPaths;
use crate::config::settings::Settings;
use crate::error::FintrackResult;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and settings
    Show,
    /// Change one setting, e.g. `budget_warning_percent 90` or `billing.price_id price_123`
    Set { key: String, value: String },
    /// Print the data directory
    Path,
}

pub fn handle_config_command(
    paths: &FintrackPaths,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> FintrackResult<()> {
    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            println!("fintrack configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Diagnostic log:   {}", paths.diagnostic_log().display());
            println!();
            println!("Settings:");
            println!("  currency_symbol:        {}", settings.currency_symbol);
            println!("  date_format:            {}", settings.date_format);
            println!("  log_level:              {}", settings.log_level);
            println!("  upcoming_days:          {}", settings.upcoming_days);
            println!("  budget_warning_percent: {}", settings.budget_warning_percent);
            println!();
            println!("Assistant:");
            println!("  model:        {}", settings.assistant.model);
            println!("  api_key_env:  {}", settings.assistant.api_key_env);
            println!("  timeout_secs: {}", settings.assistant.timeout_secs);
            println!();
            println!("Billing:");
            let price = if settings.billing.price_id.is_empty() {
                "(not set)"
            } else {
                settings.billing.price_id.as_str()
            };
            println!("  price_id:           {}", price);
            println!("  secret_key_env:     {}", settings.billing.secret_key_env);
            println!("  webhook_secret_env: {}", settings.billing.webhook_secret_env);
        }
        ConfigCommands::Set { key, value } => {
            settings.set_value(&key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, value);
        }
        ConfigCommands::Path => println!("{}", paths.data_dir().display()),
    }
    Ok(())
}
