use crate::catalog::{Catalog, Level};
use crate::error::Result;
use crate::vfs::VirtualFs;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Instant, SystemTime};

/// Opaque session identifier (UUID v4 text).
pub type SessionId = String;

const USER_PREFIX: &str = "bandit";

pub fn user_label(level: usize) -> String {
    format!("{USER_PREFIX}{level}")
}

/// One player's game state.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    /// Client address the session was opened from.
    pub origin: String,
    pub created_at: SystemTime,
    pub last_activity: Instant,
    /// `0..count` while playing; `count` once every level is solved.
    pub current_level: usize,
    pub user: String,
    pub fs: VirtualFs,
}

impl Session {
    /// Level 0 with an empty filesystem; callers seed it.
    pub(crate) fn blank(id: SessionId, origin: &str) -> Self {
        Self {
            id,
            origin: origin.to_string(),
            created_at: SystemTime::now(),
            last_activity: Instant::now(),
            current_level: 0,
            user: user_label(0),
            fs: VirtualFs::new(),
        }
    }

    pub(crate) fn new(id: SessionId, origin: &str, level: &Level) -> Self {
        Self {
            current_level: level.index,
            user: user_label(level.index),
            fs: VirtualFs::from_snapshot(&level.files),
            ..Self::blank(id, origin)
        }
    }

    /// Replaces the filesystem and user label with those of level `index`.
    /// An unknown level leaves the session untouched.
    pub(crate) fn seed(&mut self, catalog: &Catalog, index: usize) -> Result<()> {
        let level = catalog.get(index)?;
        self.fs = VirtualFs::from_snapshot(&level.files);
        self.user = user_label(level.index);
        Ok(())
    }

    pub fn is_finished(&self, catalog: &Catalog) -> bool {
        self.current_level >= catalog.count()
    }
}

/// Result of feeding keystrokes into a session's pending-input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Keystroke absorbed; nothing to run yet.
    Pending,
    /// Enter pressed with a non-empty buffer; the line to execute.
    Submit(String),
    /// Enter pressed on an empty buffer.
    Empty,
    SessionNotFound,
}

const ENTER: [&str; 3] = ["\r", "\n", "\r\n"];
const BACKSPACE: [&str; 2] = ["\x7f", "\x08"];

/// Registry entry: session state plus the line being typed, each behind its own lock
/// so keystrokes never wait on a running command.
#[derive(Debug)]
pub struct SessionHandle {
    state: Mutex<Session>,
    input: Mutex<String>,
}

impl SessionHandle {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            state: Mutex::new(session),
            input: Mutex::new(String::new()),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn pending_input(&self) -> String {
        self.input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn apply_input(&self, data: &str) -> InputOutcome {
        let mut buffer = self.input.lock().unwrap_or_else(PoisonError::into_inner);
        if ENTER.contains(&data) {
            if buffer.is_empty() {
                return InputOutcome::Empty;
            }
            return InputOutcome::Submit(std::mem::take(&mut *buffer));
        }
        if BACKSPACE.contains(&data) {
            buffer.pop();
        } else {
            buffer.push_str(data);
        }
        InputOutcome::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use pretty_assertions::assert_eq;

    fn fresh() -> (std::sync::Arc<Catalog>, Session) {
        let catalog = Catalog::builtin();
        let session = Session::new("id".to_string(), "127.0.0.1", catalog.get(0).unwrap());
        (catalog, session)
    }

    #[test]
    fn new_session_starts_on_given_level_snapshot() {
        let (catalog, session) = fresh();
        assert_eq!(session.current_level, 0);
        assert_eq!(session.user, "bandit0");
        assert_eq!(session.fs.snapshot(), &catalog.get(0).unwrap().files);
    }

    #[test]
    fn seeding_replaces_rather_than_merges() {
        let (catalog, mut session) = fresh();
        session.fs.write("leftover", "x");
        session.seed(&catalog, 3).unwrap();
        assert_eq!(session.fs.read("leftover"), None);
        assert_eq!(session.fs.snapshot(), &catalog.get(3).unwrap().files);
        assert_eq!(session.user, "bandit3");
    }

    #[test]
    fn seeding_unknown_level_keeps_state_intact() {
        let (catalog, mut session) = fresh();
        let before = session.fs.clone();
        let err = session.seed(&catalog, 99).unwrap_err();
        assert_eq!(err, EngineError::LevelNotFound(99));
        assert_eq!(session.fs, before);
        assert_eq!(session.user, "bandit0");
    }

    #[test]
    fn input_buffer_handles_typing_backspace_and_enter() {
        let (_, session) = fresh();
        let handle = SessionHandle::new(session);
        assert_eq!(handle.apply_input("\r"), InputOutcome::Empty);
        for key in ["l", "s", "x", "\x7f"] {
            assert_eq!(handle.apply_input(key), InputOutcome::Pending);
        }
        assert_eq!(handle.pending_input(), "ls");
        assert_eq!(handle.apply_input("\n"), InputOutcome::Submit("ls".to_string()));
        assert_eq!(handle.pending_input(), "");
    }

    #[test]
    fn backspace_on_empty_buffer_is_harmless() {
        let (_, session) = fresh();
        let handle = SessionHandle::new(session);
        assert_eq!(handle.apply_input("\x7f"), InputOutcome::Pending);
        assert_eq!(handle.pending_input(), "");
    }
}
