//! Merge progress reporting.

use crate::decision::PlayPosition;
use crate::merge::MergeStats;

/// Trait for receiving merge progress updates.
pub trait MergeProgress {
    /// Called when a file other than the base file starts.
    fn on_file(&self, current: usize, total: usize, label: &str);

    /// Called before each play of the current file is reconciled.
    fn on_play(&self, position: PlayPosition, uuid: &str);

    /// Called when every file has been processed.
    fn on_complete(&self, stats: &MergeStats);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl MergeProgress for SilentProgress {
    fn on_file(&self, _current: usize, _total: usize, _label: &str) {}
    fn on_play(&self, _position: PlayPosition, _uuid: &str) {}
    fn on_complete(&self, _stats: &MergeStats) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl MergeProgress for LogProgress {
    fn on_file(&self, current: usize, total: usize, label: &str) {
        log::info!("[{}/{}] Processing {}", current, total, label);
    }

    fn on_play(&self, position: PlayPosition, uuid: &str) {
        if position.current.is_multiple_of(100) || position.current == position.total {
            log::info!("  {} plays checked", position);
        } else {
            log::debug!("  {} {}", position, uuid);
        }
    }

    fn on_complete(&self, stats: &MergeStats) {
        log::info!(
            "Merge complete: {} plays added, {} replaced, {} already present",
            stats.plays_added + stats.plays_added_on_conflict,
            stats.plays_replaced,
            stats.plays_skipped_uuid + stats.plays_already_present,
        );
    }
}
