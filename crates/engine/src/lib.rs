//! # CodeHeist Engine
//!
//! Game core for a shell-emulating puzzle: each player gets a private, flat
//! filesystem per level and has to find the level's password with ordinary shell
//! commands.
//!
//! ## Flow
//!
//! ```text
//! raw command line
//!     │
//!     ├──> SessionStore::execute
//!     │      ├─ clear / help / levels / whoami / pwd (always available)
//!     │      └─ terminal state short-circuit
//!     │
//!     ├──> Interpreter (tokenize → command table → completion rules)
//!     │      └─ VirtualFs (ls, cat, find, grep, strings, base64)
//!     │
//!     └──> CommandResponse { output, level_completed, new_level }
//! ```
//!
//! Idle sessions are evicted by the background sweeper ([`spawn_sweeper`]).
//!
//! ## Example
//!
//! ```
//! use codeheist_engine::{Catalog, EngineConfig, SessionStore};
//!
//! let store = SessionStore::new(Catalog::builtin(), EngineConfig::default());
//! let session = store.create("127.0.0.1");
//! let response = store.execute(&session.id, "cat readme");
//! assert!(response.level_completed);
//! assert_eq!(response.new_level, 1);
//! ```

mod catalog;
mod config;
mod error;
mod interpreter;
mod levels;
mod session;
mod store;
mod sweeper;
mod tokenize;
mod vfs;

pub use catalog::{Catalog, Level};
pub use config::{
    EngineConfig, DEFAULT_SESSION_TTL, DEFAULT_SWEEP_INTERVAL, SESSION_TTL_ENV,
    SWEEP_INTERVAL_ENV,
};
pub use error::{EngineError, Result};
pub use interpreter::{
    always_available, flavor_message, process, Outcome, ALL_LEVELS_COMPLETE, CLEAR_SCREEN,
};
pub use levels::SECRET_KEY_VALUE;
pub use session::{user_label, InputOutcome, Session, SessionHandle, SessionId};
pub use store::{CommandResponse, SessionStore, SESSION_NOT_FOUND};
pub use sweeper::spawn_sweeper;
pub use tokenize::tokenize;
pub use vfs::VirtualFs;
