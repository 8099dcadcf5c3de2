//! User settings for fintrack
//!
//! Display preferences, alert thresholds, and the endpoints used by the
//! assistant and billing relays. API keys are never written here; each
//! section names the environment variable the key is read from.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::paths::FintrackPaths;
use crate::error::FintrackError;

/// Generative-language relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Model name, e.g. "gemini-1.5-flash"
    #[serde(default = "default_assistant_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_assistant_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of recent transactions included in the prompt context
    #[serde(default = "default_context_transactions")]
    pub context_transactions: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: default_assistant_model(),
            base_url: default_assistant_base_url(),
            api_key_env: default_assistant_key_env(),
            timeout_secs: default_timeout_secs(),
            context_transactions: default_context_transactions(),
        }
    }
}

impl AssistantSettings {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<SecretString, FintrackError> {
        read_secret(&self.api_key_env)
    }
}

/// Hosted-checkout relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    /// API base URL
    #[serde(default = "default_billing_base_url")]
    pub base_url: String,

    /// Price identifier of the premium plan
    #[serde(default)]
    pub price_id: String,

    /// Redirect after a successful checkout
    #[serde(default = "default_success_url")]
    pub success_url: String,

    /// Redirect after an abandoned checkout
    #[serde(default = "default_cancel_url")]
    pub cancel_url: String,

    /// Environment variable holding the secret API key
    #[serde(default = "default_billing_key_env")]
    pub secret_key_env: String,

    /// Environment variable holding the webhook signing secret
    #[serde(default = "default_webhook_secret_env")]
    pub webhook_secret_env: String,

    /// Maximum accepted age of a webhook signature timestamp
    #[serde(default = "default_signature_tolerance")]
    pub signature_tolerance_secs: i64,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            base_url: default_billing_base_url(),
            price_id: String::new(),
            success_url: default_success_url(),
            cancel_url: default_cancel_url(),
            secret_key_env: default_billing_key_env(),
            webhook_secret_env: default_webhook_secret_env(),
            signature_tolerance_secs: default_signature_tolerance(),
        }
    }
}

impl BillingSettings {
    pub fn secret_key(&self) -> Result<SecretString, FintrackError> {
        read_secret(&self.secret_key_env)
    }

    pub fn webhook_secret(&self) -> Result<SecretString, FintrackError> {
        read_secret(&self.webhook_secret_env)
    }
}

/// User settings for fintrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Diagnostic log filter used when `FINTRACK_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Horizon in days for upcoming renewals and due dates
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: i64,

    /// Budget usage (percent) at which a warning alert is raised
    #[serde(default = "default_budget_warning_percent")]
    pub budget_warning_percent: u32,

    #[serde(default)]
    pub assistant: AssistantSettings,

    #[serde(default)]
    pub billing: BillingSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_upcoming_days() -> i64 {
    7
}

fn default_budget_warning_percent() -> u32 {
    80
}

fn default_assistant_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_assistant_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_assistant_key_env() -> String {
    "FINTRACK_GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_context_transactions() -> usize {
    15
}

fn default_billing_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_success_url() -> String {
    "https://example.com/billing/success".to_string()
}

fn default_cancel_url() -> String {
    "https://example.com/billing/cancel".to_string()
}

fn default_billing_key_env() -> String {
    "FINTRACK_STRIPE_SECRET_KEY".to_string()
}

fn default_webhook_secret_env() -> String {
    "FINTRACK_STRIPE_WEBHOOK_SECRET".to_string()
}

fn default_signature_tolerance() -> i64 {
    300
}

fn read_secret(var: &str) -> Result<SecretString, FintrackError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::new(value)),
        _ => Err(FintrackError::Config(format!(
            "Environment variable {} is not set",
            var
        ))),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_level: default_log_level(),
            upcoming_days: default_upcoming_days(),
            budget_warning_percent: default_budget_warning_percent(),
            assistant: AssistantSettings::default(),
            billing: BillingSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &FintrackPaths) -> Result<Self, FintrackError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller decides to
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FintrackError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FintrackError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> Result<(), FintrackError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FintrackError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FintrackError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Set one field by its dotted key, as `fintrack config set` does
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), FintrackError> {
        fn number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, FintrackError> {
            value
                .trim()
                .parse()
                .map_err(|_| FintrackError::Config(format!("{} expects a number, got '{}'", key, value)))
        }

        let value_owned = value.to_string();
        match key {
            "currency_symbol" => self.currency_symbol = value_owned,
            "date_format" => self.date_format = value_owned,
            "log_level" => self.log_level = value_owned,
            "upcoming_days" => self.upcoming_days = number(key, value)?,
            "budget_warning_percent" => self.budget_warning_percent = number(key, value)?,
            "assistant.model" => self.assistant.model = value_owned,
            "assistant.base_url" => self.assistant.base_url = value_owned,
            "assistant.api_key_env" => self.assistant.api_key_env = value_owned,
            "assistant.timeout_secs" => self.assistant.timeout_secs = number(key, value)?,
            "assistant.context_transactions" => {
                self.assistant.context_transactions = number(key, value)?
            }
            "billing.base_url" => self.billing.base_url = value_owned,
            "billing.price_id" => self.billing.price_id = value_owned,
            "billing.success_url" => self.billing.success_url = value_owned,
            "billing.cancel_url" => self.billing.cancel_url = value_owned,
            "billing.secret_key_env" => self.billing.secret_key_env = value_owned,
            "billing.webhook_secret_env" => self.billing.webhook_secret_env = value_owned,
            "billing.signature_tolerance_secs" => {
                self.billing.signature_tolerance_secs = number(key, value)?
            }
            _ => {
                return Err(FintrackError::Config(format!(
                    "Unknown setting '{}'",
                    key
                )))
            }
        }
        Ok(())
    }
}
