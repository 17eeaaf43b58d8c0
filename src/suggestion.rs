//! Parsing and validation of the model's structured reply.
//!
//! This is the last line of defense before a model-generated string reaches
//! a real shell: a suggestion is only acted upon when the model marked the
//! command as known, declared the local platform, and filled in both text
//! fields.

use crate::platform::Platform;
use serde::Deserialize;

/// A validated command suggestion from the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSuggestion {
    pub command: String,
    pub explanation: String,
}

/// Why a raw reply was discarded. Rejections are normal outcomes, not
/// errors; each maps to a distinct user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The reply was not valid JSON or did not match the schema.
    InvalidFormat,
    /// The model reported it does not know a command for the request.
    NotRecognized,
    /// The model answered for a different platform family.
    PlatformMismatch { declared: String },
    /// `command` or `explanation` was empty after trimming.
    EmptyFields,
}

/// Raw wire shape of the model's JSON reply.
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    command: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    known_command: bool,
    #[serde(default)]
    platform: String,
}

/// Parse and validate a raw JSON reply against the local platform.
pub fn parse(raw: &str, local: Platform) -> Result<CommandSuggestion, Rejection> {
    let raw: RawSuggestion =
        serde_json::from_str(raw).map_err(|_| Rejection::InvalidFormat)?;

    if !raw.known_command {
        return Err(Rejection::NotRecognized);
    }

    if !local.matches_label(&raw.platform) {
        return Err(Rejection::PlatformMismatch {
            declared: raw.platform.trim().to_string(),
        });
    }

    let command = raw.command.trim();
    let explanation = raw.explanation.trim();
    if command.is_empty() || explanation.is_empty() {
        return Err(Rejection::EmptyFields);
    }

    Ok(CommandSuggestion {
        command: command.to_string(),
        explanation: explanation.to_string(),
    })
}
