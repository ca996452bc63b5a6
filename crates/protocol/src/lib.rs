//! # CodeHeist Protocol
//!
//! JSON envelope exchanged between the browser terminal and the server over a
//! WebSocket. Every frame is one [`Envelope`]; the `type` field selects how the
//! remaining fields are interpreted.
//!
//! ```text
//! client ── command / command_input ──> server
//! server ── session_created / output / level_up / prompt ──> client
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Prompt rendered after every command.
pub const PROMPT: &str = "$ ";

/// Envelope `type` values.
pub mod kind {
    pub const SESSION_CREATED: &str = "session_created";
    pub const PROMPT: &str = "prompt";
    pub const OUTPUT: &str = "output";
    pub const LEVEL_UP: &str = "level_up";
    pub const COMMAND: &str = "command";
    pub const COMMAND_INPUT: &str = "command_input";
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    /// Rendered text (server → client).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// Raw keystrokes in character-at-a-time mode (client → server).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    /// Full command line (client → server).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
}

impl Envelope {
    fn of_kind(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }

    pub fn session_created(content: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            session_id: session_id.into(),
            ..Self::of_kind(kind::SESSION_CREATED)
        }
    }

    pub fn prompt() -> Self {
        Self {
            content: PROMPT.to_string(),
            ..Self::of_kind(kind::PROMPT)
        }
    }

    pub fn output(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::of_kind(kind::OUTPUT)
        }
    }

    pub fn level_up(level: usize) -> Self {
        Self {
            level: Some(level),
            ..Self::of_kind(kind::LEVEL_UP)
        }
    }

    pub fn command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::of_kind(kind::COMMAND)
        }
    }

    pub fn command_input(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::of_kind(kind::COMMAND_INPUT)
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub sessions: usize,
}

impl HealthReport {
    pub fn ok(service: &str, sessions: usize) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            sessions,
        }
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn parse_envelope(raw: &str) -> Result<Envelope> {
    serde_json::from_str(raw).context("malformed envelope")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prompt_serializes_without_empty_fields() {
        let raw = serialize_json(&Envelope::prompt()).unwrap();
        assert_eq!(raw, r#"{"type":"prompt","content":"$ "}"#);
    }

    #[test]
    fn level_up_carries_level_zero_when_set() {
        let raw = serialize_json(&Envelope::level_up(0)).unwrap();
        assert_eq!(raw, r#"{"type":"level_up","level":0}"#);
    }

    #[test]
    fn parses_client_command_and_ignores_unknown_fields() {
        let env = parse_envelope(r#"{"type":"command","command":"ls -a","extra":true}"#).unwrap();
        assert_eq!(env, Envelope::command("ls -a"));
    }

    #[test]
    fn parses_keystroke_envelope() {
        let env = parse_envelope(r#"{"type":"command_input","data":"\r"}"#).unwrap();
        assert_eq!(env.kind, kind::COMMAND_INPUT);
        assert_eq!(env.data, "\r");
        assert!(env.command.is_empty());
    }

    #[test]
    fn rejects_frames_without_type() {
        let err = parse_envelope(r#"{"command":"ls"}"#).unwrap_err();
        assert!(format!("{err:#}").contains("malformed envelope"));
    }
}
