//! Assistant relay
//!
//! Sends a financial summary and the user's message to a hosted
//! generative-language model, and reads back a JSON reply that may carry a
//! command to insert one transaction.

pub mod context;
pub mod gemini;
pub mod reply;

use std::path::Path;

use base64::Engine;

use crate::error::{FintrackError, FintrackResult};

pub use context::build_context;
pub use gemini::GeminiClient;
pub use reply::{parse_reply, AssistantCommand, AssistantReply};

/// Instruction sent with every request
pub const SYSTEM_INSTRUCTION: &str = r#"You are a personal finance assistant. You are given a summary of the user's finances followed by their message.
Always answer with a single JSON object and nothing else:
{"reply": "<your answer to the user>", "command": null}
If, and only if, the user asks you to record a transaction, set "command" to:
{"action": "add_transaction", "amount": <positive number>, "type": "income" | "expense", "description": "<text>", "category": "<category name or null>", "date": "<YYYY-MM-DD or null>", "account": "<account name or null>"}
Use only category and account names that appear in the summary."#;

/// Binary content sent inline with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

impl Attachment {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Read an image or audio file, picking the MIME type from its extension
    pub fn from_file(path: &Path) -> FintrackResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let mime_type = mime_for_extension(&extension).ok_or_else(|| {
            FintrackError::Assistant(format!(
                "Unsupported attachment type '{}' (expected an image or audio file)",
                path.display()
            ))
        })?;

        let bytes = std::fs::read(path).map_err(|e| {
            FintrackError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::from_bytes(mime_type, &bytes))
    }
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" => Some("audio/ogg"),
        "m4a" => Some("audio/mp4"),
        "webm" => Some("audio/webm"),
        "flac" => Some("audio/flac"),
        _ => None,
    }
}

/// One request to the model
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    /// Financial summary followed by the user's message
    pub text: String,
    pub attachment: Option<Attachment>,
}

/// A hosted text generation backend
pub trait LanguageModel {
    /// Return the raw text of the model's first candidate
    fn generate(&self, prompt: &Prompt) -> FintrackResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_attachment_encoding() {
        let attachment = Attachment::from_bytes("image/png", b"hello");
        assert_eq!(attachment.data, "aGVsbG8=");
    }

    #[test]
    fn test_attachment_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("receipt.JPG");
        std::fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();

        let attachment = Attachment::from_file(&path).unwrap();
        assert_eq!(attachment.mime_type, "image/jpeg");
        assert_eq!(attachment.data, "/9j/");
    }

    #[test]
    fn test_unsupported_attachment() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(matches!(
            Attachment::from_file(&path),
            Err(FintrackError::Assistant(_))
        ));
    }
}
