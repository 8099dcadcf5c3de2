//! Model reply parsing

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FintrackError, FintrackResult};
use crate::models::{Money, TransactionKind};

/// A write the model asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantCommand {
    AddTransaction {
        /// Always positive; `kind` carries the sign
        amount: Money,
        kind: TransactionKind,
        description: String,
        category: Option<String>,
        date: Option<NaiveDate>,
        account: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub reply: String,
    pub command: Option<AssistantCommand>,
}

#[derive(Deserialize)]
struct RawAddTransaction {
    amount: f64,
    #[serde(rename = "type")]
    kind: String,
    description: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    account: Option<String>,
}

/// Strip a ```json fence wrapping the whole text, if any
fn unfence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the model's text
///
/// Text that is not a JSON object becomes the reply as-is with no command.
/// A command with an unknown action or bad fields is an error.
pub fn parse_reply(text: &str) -> FintrackResult<AssistantReply> {
    let value: Value = match serde_json::from_str(unfence(text)) {
        Ok(value @ Value::Object(_)) => value,
        _ => {
            tracing::debug!("model reply is not a JSON object; showing raw text");
            return Ok(AssistantReply {
                reply: text.trim().to_string(),
                command: None,
            });
        }
    };

    let reply = value
        .get("reply")
        .and_then(|r| r.as_str())
        .unwrap_or_default()
        .to_string();

    let command = match value.get("command") {
        None | Some(Value::Null) => None,
        Some(command) => Some(parse_command(command)?),
    };

    Ok(AssistantReply { reply, command })
}

fn parse_command(command: &Value) -> FintrackResult<AssistantCommand> {
    let action = command
        .get("action")
        .and_then(|a| a.as_str())
        .ok_or_else(|| FintrackError::Assistant("Command has no action".to_string()))?;

    if action != "add_transaction" {
        return Err(FintrackError::Assistant(format!(
            "Unknown assistant action '{}'",
            action
        )));
    }

    let raw: RawAddTransaction = serde_json::from_value(command.clone())
        .map_err(|e| FintrackError::Assistant(format!("Invalid add_transaction command: {}", e)))?;

    let amount = Money::from_f64(raw.amount)
        .map(|m| m.abs())
        .filter(|m| !m.is_zero())
        .ok_or_else(|| {
            FintrackError::Assistant(format!("Invalid transaction amount {}", raw.amount))
        })?;

    let kind = TransactionKind::parse(&raw.kind).ok_or_else(|| {
        FintrackError::Assistant(format!("Invalid transaction type '{}'", raw.kind))
    })?;

    let description = raw.description.trim().to_string();
    if description.is_empty() {
        return Err(FintrackError::Assistant(
            "Transaction description is empty".to_string(),
        ));
    }

    let date = match non_empty(raw.date) {
        Some(d) => Some(NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| {
            FintrackError::Assistant(format!("Invalid transaction date '{}'", d))
        })?),
        None => None,
    };

    Ok(AssistantCommand::AddTransaction {
        amount,
        kind,
        description,
        category: non_empty(raw.category),
        date,
        account: non_empty(raw.account),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reply() {
        let parsed = parse_reply(r#"{"reply": "You spent $40 on coffee.", "command": null}"#).unwrap();
        assert_eq!(parsed.reply, "You spent $40 on coffee.");
        assert_eq!(parsed.command, None);
    }

    #[test]
    fn test_fenced_command() {
        let text = "```json\n{\"reply\": \"Added.\", \"command\": {\"action\": \"add_transaction\", \"amount\": 12.5, \"type\": \"expense\", \"description\": \"Lunch\", \"category\": \"Dining Out\", \"date\": \"2025-03-04\", \"account\": null}}\n```";
        let parsed = parse_reply(text).unwrap();
        assert_eq!(parsed.reply, "Added.");
        assert_eq!(
            parsed.command,
            Some(AssistantCommand::AddTransaction {
                amount: Money::from_cents(1_250),
                kind: TransactionKind::Expense,
                description: "Lunch".into(),
                category: Some("Dining Out".into()),
                date: NaiveDate::from_ymd_opt(2025, 3, 4),
                account: None,
            })
        );
    }

    #[test]
    fn test_fence_inside_reply_text_is_kept() {
        let text = r#"{"reply": "Run ```fintrack report summary``` for totals.", "command": null}"#;
        let parsed = parse_reply(text).unwrap();
        assert_eq!(parsed.reply, "Run ```fintrack report summary``` for totals.");
        assert!(parsed.command.is_none());
    }

    #[test]
    fn test_malformed_json_is_raw_reply() {
        let parsed = parse_reply("Sorry, I can't help with that {").unwrap();
        assert_eq!(parsed.reply, "Sorry, I can't help with that {");
        assert!(parsed.command.is_none());
    }

    #[test]
    fn test_unknown_action_is_error() {
        let err = parse_reply(r#"{"reply": "ok", "command": {"action": "delete_everything"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("delete_everything"));
    }

    #[test]
    fn test_bad_fields_are_errors() {
        assert!(parse_reply(
            r#"{"reply": "", "command": {"action": "add_transaction", "amount": 0, "type": "expense", "description": "x"}}"#
        )
        .is_err());
        assert!(parse_reply(
            r#"{"reply": "", "command": {"action": "add_transaction", "amount": 5, "type": "gift", "description": "x"}}"#
        )
        .is_err());
        assert!(parse_reply(
            r#"{"reply": "", "command": {"action": "add_transaction", "amount": 5, "type": "income", "description": "x", "date": "03/04/2025"}}"#
        )
        .is_err());
    }

    #[test]
    fn test_negative_amount_is_normalized() {
        let parsed = parse_reply(
            r#"{"reply": "", "command": {"action": "add_transaction", "amount": -7, "type": "expense", "description": "Taxi"}}"#,
        )
        .unwrap();
        match parsed.command {
            Some(AssistantCommand::AddTransaction { amount, .. }) => {
                assert_eq!(amount.cents(), 700)
            }
            None => panic!("expected a command"),
        }
    }
}
