//! Per-connection message handling, independent of the socket itself.

use codeheist_engine::{InputOutcome, SessionId, SessionStore, SESSION_NOT_FOUND};
use codeheist_protocol::{kind, Envelope};
use std::sync::Arc;

const BANNER: &str = "\r\n\x1b[32m● WELCOME TO CODEHEIST\x1b[0m\r\n";
const FALLBACK_WELCOME: &str = "Welcome to CodeHeist! Your mission awaits...";

pub struct Connection {
    store: Arc<SessionStore>,
    session_id: SessionId,
}

impl Connection {
    /// Creates the backing session and returns the greeting frames to send.
    pub fn open(store: Arc<SessionStore>, origin: &str) -> (Self, Vec<Envelope>) {
        let session = store.create(origin);
        log::info!("New WebSocket connection from {origin}, session: {}", session.id);

        let welcome = format!("{BANNER}{}\r\n", welcome_for(&store, session.current_level));
        let greeting = vec![
            Envelope::session_created(welcome, session.id.clone()),
            Envelope::prompt(),
        ];
        let connection = Self {
            store,
            session_id: session.id,
        };
        (connection, greeting)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Frames to send back for one client envelope.
    pub fn handle(&self, envelope: Envelope) -> Vec<Envelope> {
        log::debug!("Received message type: {}", envelope.kind);
        match envelope.kind.as_str() {
            kind::COMMAND => self.run_command(&envelope.command),
            kind::COMMAND_INPUT => self.handle_keystrokes(&envelope.data),
            other => {
                log::warn!("Unknown message type: {other}");
                Vec::new()
            }
        }
    }

    fn run_command(&self, command: &str) -> Vec<Envelope> {
        let response = self.store.execute(&self.session_id, command);
        let mut frames = Vec::new();

        if !response.output.is_empty() {
            frames.push(Envelope::output(format!("{}\r\n", response.output)));
        }
        if response.level_completed {
            frames.push(Envelope::level_up(response.new_level));
            frames.push(Envelope::output(format!(
                "\r\n\x1b[36m{}\x1b[0m\r\n",
                welcome_for(&self.store, response.new_level)
            )));
        }
        frames.push(Envelope::prompt());
        frames
    }

    fn handle_keystrokes(&self, data: &str) -> Vec<Envelope> {
        match self.store.apply_input(&self.session_id, data) {
            InputOutcome::Pending => Vec::new(),
            InputOutcome::Submit(line) => self.run_command(&line),
            InputOutcome::Empty => vec![Envelope::prompt()],
            InputOutcome::SessionNotFound => vec![
                Envelope::output(format!("{SESSION_NOT_FOUND}\r\n")),
                Envelope::prompt(),
            ],
        }
    }
}

fn welcome_for(store: &SessionStore, level: usize) -> &str {
    store.welcome_message(level).unwrap_or(FALLBACK_WELCOME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeheist_engine::{Catalog, EngineConfig};
    use pretty_assertions::assert_eq;

    fn open() -> (Arc<SessionStore>, Connection, Vec<Envelope>) {
        let store = Arc::new(SessionStore::new(Catalog::builtin(), EngineConfig::default()));
        let (connection, greeting) = Connection::open(Arc::clone(&store), "127.0.0.1");
        (store, connection, greeting)
    }

    #[test]
    fn greeting_announces_session_then_prompts() {
        let (_, connection, greeting) = open();
        assert_eq!(greeting.len(), 2);
        assert_eq!(greeting[0].kind, kind::SESSION_CREATED);
        assert_eq!(greeting[0].session_id, connection.session_id());
        assert!(greeting[0].content.contains("WELCOME TO CODEHEIST"));
        assert!(greeting[0].content.contains("find the password in the readme file"));
        assert_eq!(greeting[1], Envelope::prompt());
    }

    #[test]
    fn silent_command_only_prompts() {
        let (_, connection, _) = open();
        assert_eq!(connection.handle(Envelope::command("cd")), vec![Envelope::prompt()]);
    }

    #[test]
    fn unknown_message_type_is_ignored() {
        let (_, connection, _) = open();
        let frames = connection.handle(Envelope {
            kind: "resize".to_string(),
            ..Envelope::default()
        });
        assert!(frames.is_empty());
    }

    #[test]
    fn welcome_falls_back_past_last_level() {
        let (store, _, _) = open();
        assert_eq!(welcome_for(&store, 99), FALLBACK_WELCOME);
    }
}
