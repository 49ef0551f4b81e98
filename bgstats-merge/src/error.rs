use thiserror::Error;

use crate::decision::DecisionError;

/// Errors that abort a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// No input files were given
    #[error("No input files")]
    NoInput,

    /// A play references a game missing from its own file
    #[error("{file}: play {play} references game {game_ref_id}, which is not in the file")]
    MissingGame {
        file: String,
        play: String,
        game_ref_id: u32,
    },

    /// A decider answered with something that does not exist
    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    /// Prompting failed or was aborted
    #[error(transparent)]
    Decision(#[from] DecisionError),
}

impl MergeError {
    pub fn invalid_choice(msg: impl Into<String>) -> Self {
        Self::InvalidChoice(msg.into())
    }
}
