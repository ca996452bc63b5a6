use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::interpreter::{self, ALL_LEVELS_COMPLETE};
use crate::session::{InputOutcome, Session, SessionHandle, SessionId};
use crate::tokenize::tokenize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

pub const SESSION_NOT_FOUND: &str = "Session not found";

/// Result of one command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub output: String,
    pub level_completed: bool,
    /// Level the session is on after the command.
    pub new_level: usize,
}

impl CommandResponse {
    fn text(output: impl Into<String>, level: usize) -> Self {
        Self {
            output: output.into(),
            level_completed: false,
            new_level: level,
        }
    }
}

/// Registry of live sessions.
///
/// `execute` holds the registry read lock for the whole command, and eviction needs
/// the write lock, so a session is never removed while one of its commands runs.
pub struct SessionStore {
    catalog: Arc<Catalog>,
    config: EngineConfig,
    sessions: RwLock<HashMap<SessionId, Arc<SessionHandle>>>,
}

impl SessionStore {
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        Self {
            catalog,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn registry(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Arc<SessionHandle>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Arc<SessionHandle>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a session on level 0.
    pub fn create(&self, origin: &str) -> Session {
        let id = uuid::Uuid::new_v4().to_string();
        let session = match self.catalog.get(0) {
            Ok(first) => Session::new(id.clone(), origin, first),
            Err(err) => {
                log::warn!("Cannot seed new session {id}: {err}");
                Session::blank(id.clone(), origin)
            }
        };
        self.registry_mut()
            .insert(id.clone(), Arc::new(SessionHandle::new(session.clone())));
        log::info!("New session created: {id} for {origin}");
        session
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.registry().get(id).map(|handle| handle.snapshot())
    }

    pub fn handle(&self, id: &str) -> Option<Arc<SessionHandle>> {
        self.registry().get(id).cloned()
    }

    pub fn delete(&self, id: &str) -> bool {
        let removed = self.registry_mut().remove(id).is_some();
        if removed {
            log::debug!("Session {id} deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// Welcome text for `level`, if it exists.
    pub fn welcome_message(&self, level: usize) -> Option<&str> {
        self.catalog.get(level).ok().map(|l| l.welcome.as_str())
    }

    pub fn execute(&self, id: &str, raw: &str) -> CommandResponse {
        let sessions = self.registry();
        let Some(handle) = sessions.get(id) else {
            return CommandResponse::text(SESSION_NOT_FOUND, 0);
        };
        let mut session = handle.lock();
        session.last_activity = Instant::now();
        log::debug!("Executing '{raw}' for session {id}");

        let tokens = tokenize(raw);
        if let Some(output) = interpreter::always_available(&tokens, &session, &self.catalog) {
            return CommandResponse::text(output, session.current_level);
        }
        if session.is_finished(&self.catalog) {
            return CommandResponse::text(ALL_LEVELS_COMPLETE, session.current_level);
        }

        let level = match self.catalog.get(session.current_level) {
            Ok(level) => level,
            Err(err) => {
                log::warn!("Session {id} points at a missing level: {err}");
                return CommandResponse::text(ALL_LEVELS_COMPLETE, session.current_level);
            }
        };

        let outcome = interpreter::process(&tokens, &session, level, self.catalog.count());
        if !outcome.completed {
            return CommandResponse::text(outcome.output, session.current_level);
        }

        let solved = session.current_level;
        self.advance(&mut session);
        log::info!("Session {id} completed level {solved}");

        CommandResponse {
            output: outcome.output,
            level_completed: true,
            new_level: session.current_level,
        }
    }

    fn advance(&self, session: &mut Session) {
        session.current_level = (session.current_level + 1).min(self.catalog.count());
        if session.is_finished(&self.catalog) {
            log::info!("Session {} finished every level", session.id);
            return;
        }
        let next = session.current_level;
        if let Err(err) = session.seed(&self.catalog, next) {
            log::warn!("Skipping filesystem reseed for session {}: {err}", session.id);
        }
    }

    pub fn apply_input(&self, id: &str, data: &str) -> InputOutcome {
        match self.handle(id) {
            Some(handle) => handle.apply_input(data),
            None => InputOutcome::SessionNotFound,
        }
    }

    /// Removes sessions idle for longer than the configured ttl as of `now`.
    /// Returns the evicted ids.
    pub fn sweep_idle(&self, now: Instant) -> Vec<SessionId> {
        let ttl = self.config.session_ttl;
        let mut sessions = self.registry_mut();
        let mut evicted = Vec::new();
        sessions.retain(|id, handle| {
            let idle = now.saturating_duration_since(handle.lock().last_activity);
            if idle > ttl {
                evicted.push(id.clone());
                false
            } else {
                true
            }
        });
        for id in &evicted {
            log::info!("Cleaned up expired session: {id}");
        }
        evicted
    }
}
