//! Merge several BG Stats exports into one.
//!
//! This crate owns the reconciliation logic: mapping file-local ids onto a
//! single merged id space, detecting plays that were already imported, and
//! routing every ambiguous case to a [`Decider`].

pub mod decision;
pub mod duplicate;
pub mod entity;
pub mod error;
pub mod expr;
pub mod merge;
pub mod progress;
pub mod resolver;
pub mod score;
pub mod seed;
pub mod store;

pub use decision::{
    Candidate, Decider, DecisionError, DuplicateAction, DuplicateConflict, EntityMatch,
    MatchRequest, PlayPosition,
};
pub use duplicate::{DuplicateMatch, ScoreRow, Verdict, check, same_day};
pub use entity::{Entity, EntityKind};
pub use error::MergeError;
pub use merge::{MergeOutcome, MergeStats, merge_exports};
pub use progress::{LogProgress, MergeProgress, SilentProgress};
pub use resolver::{OnMiss, ReconcileCache, Resolution, ResolutionSource, resolve};
pub use score::scores_equal;
pub use seed::{References, Seed, plays_with_player, seed_export};
pub use store::{Collection, EntityStore, Stored};
