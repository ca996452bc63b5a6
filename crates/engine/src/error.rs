use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Level not found: {0}")]
    LevelNotFound(usize),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
