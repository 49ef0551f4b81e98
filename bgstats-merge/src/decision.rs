//! Human decisions requested by the merge.
//!
//! The merge never prompts by itself. Every point where a person has to
//! choose goes through a [`Decider`], so the engine runs the same way behind
//! a terminal, a GUI, or a scripted test.

use std::fmt;

use bgstats_catalog::Player;
use thiserror::Error;

use crate::duplicate::ScoreRow;
use crate::entity::{Entity, EntityKind};

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("Input closed before a choice was made")]
    Closed,
    #[error("I/O error while prompting: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid choice: {0}")]
    Invalid(String),
    #[error("Merge aborted")]
    Aborted,
}

/// Position of the current play within the file being merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayPosition {
    pub current: usize,
    pub total: usize,
}

impl fmt::Display for PlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}/{})", self.current, self.total)
    }
}

/// An entry in a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: u32,
    pub label: String,
}

impl Candidate {
    pub fn from_entity<E: Entity>(entity: &E) -> Self {
        Self {
            id: entity.id(),
            label: entity.label(),
        }
    }
}

/// A foreign entity that has no stable-key match in the merged set.
#[derive(Debug, Clone)]
pub struct MatchRequest<'a> {
    pub kind: EntityKind,
    /// Name of the entity in the incoming file.
    pub foreign_name: &'a str,
    /// Merged entities of the same kind, ordered by id.
    pub candidates: Vec<Candidate>,
    pub position: PlayPosition,
}

/// Answer to a [`MatchRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityMatch {
    Existing(u32),
    CreateNew,
}

/// An incoming play that resembles a merged one without matching it exactly.
#[derive(Debug, Clone)]
pub struct DuplicateConflict<'a> {
    pub position: PlayPosition,
    pub file_name: &'a str,
    pub game_name: &'a str,
    pub location_name: Option<&'a str>,
    pub play_date: &'a str,
    /// Per-player old and new scores.
    pub rows: &'a [ScoreRow],
    /// Other merged plays that also passed the structural filters.
    pub other_candidates: usize,
}

/// What to do with a possible duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateAction {
    /// Keep the merged play, drop the incoming one.
    Ignore,
    /// Keep both.
    Add,
    /// Overwrite the merged play with the incoming one.
    Replace,
}

impl DuplicateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Add => "add",
            Self::Replace => "replace",
        }
    }
}

/// Answers the interaction points of a merge run.
pub trait Decider {
    /// Pick the base file by index into `labels`.
    fn choose_base_file(&mut self, labels: &[String]) -> Result<usize, DecisionError>;

    /// Pick the player whose plays are merged, by player id.
    fn choose_target_player(&mut self, players: &[Player]) -> Result<u32, DecisionError>;

    /// Pick the target player's counterpart in another file.
    ///
    /// `None` skips the whole file.
    fn choose_file_player(
        &mut self,
        file_label: &str,
        target: &Player,
        players: &[Player],
    ) -> Result<Option<u32>, DecisionError>;

    /// Match a location or player that has no stable-key counterpart.
    fn match_entity(&mut self, request: &MatchRequest<'_>) -> Result<EntityMatch, DecisionError>;

    /// Adjudicate a possible duplicate play.
    fn resolve_duplicate(
        &mut self,
        conflict: &DuplicateConflict<'_>,
    ) -> Result<DuplicateAction, DecisionError>;
}
