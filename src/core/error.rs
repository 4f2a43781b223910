use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not enough player slots: {required} roles for {available} players")]
    RoleOverflow { required: usize, available: usize },

    #[error("No players to run")]
    NoPlayers,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Process exit code the CLI maps this error to.
    ///
    /// Configuration problems exit with 1; anything that escapes a running
    /// match exits with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::Config(_) | SimError::RoleOverflow { .. } | SimError::NoPlayers => 1,
            SimError::Io(_) => 2,
        }
    }
}
