//! Duplicate play detection.
//!
//! An incoming play whose references are already resolved to merged ids is
//! compared against the merged plays of the same game. Three cheap filters
//! (location, calendar day, player count) pick structural candidates; the
//! per-player scores then decide between an exact re-import and a possible
//! duplicate that needs a human decision.

use bgstats_catalog::{Play, Player, score_text};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::score::scores_equal;
use crate::store::Collection;

/// Old and new score of one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub player: String,
    /// `None` when the player is not in the merged play.
    pub old_score: Option<String>,
    /// `None` when the player is not in the incoming play.
    pub new_score: Option<String>,
}

/// The merged play offered for adjudication.
#[derive(Debug, Clone)]
pub struct DuplicateMatch {
    /// Slot of the merged play in the flat play list.
    pub slot: usize,
    pub existing_uuid: String,
    /// Every incoming player is also in the merged play.
    pub same_players: bool,
    pub rows: Vec<ScoreRow>,
    /// Other merged plays that passed the structural filters.
    pub other_candidates: usize,
}

/// Outcome of a duplicate check.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// Same players with the same scores already merged.
    AlreadyPresent { slot: usize },
    /// Nothing similar in the merged set.
    New,
    /// Structurally similar to a merged play, but the scores disagree.
    PossibleDuplicate(DuplicateMatch),
}

/// Result of comparing the scores of two plays.
#[derive(Debug)]
struct Comparison {
    same_players: bool,
    equal_scores: usize,
    rows: Vec<ScoreRow>,
}

impl Comparison {
    fn is_exact(&self, incoming_players: usize) -> bool {
        self.same_players && self.equal_scores == incoming_players
    }

    /// Ordering key for picking the closest candidate.
    fn closeness(&self) -> (bool, usize) {
        (self.same_players, self.equal_scores)
    }
}

/// Classify an incoming play against the merged plays of its game.
///
/// Candidates are `(slot, play)` pairs from the store. When several
/// candidates are similar but none matches exactly, the closest one (same
/// players first, then most equal scores) is offered; ties go to the one
/// inspected last.
pub fn check<'a, I>(incoming: &Play, candidates: I, players: &Collection<Player>) -> Verdict
where
    I: IntoIterator<Item = (usize, &'a Play)>,
{
    let mut best: Option<(usize, &Play, Comparison)> = None;
    let mut similar = 0usize;

    for (slot, existing) in candidates {
        if !passes_filters(incoming, existing) {
            continue;
        }

        let comparison = compare_scores(existing, incoming, players);
        if comparison.is_exact(incoming.player_scores.len()) {
            return Verdict::AlreadyPresent { slot };
        }

        similar += 1;
        let closer = best
            .as_ref()
            .is_none_or(|(_, _, current)| comparison.closeness() >= current.closeness());
        if closer {
            best = Some((slot, existing, comparison));
        }
    }

    match best {
        Some((slot, existing, comparison)) => Verdict::PossibleDuplicate(DuplicateMatch {
            slot,
            existing_uuid: existing.uuid.clone(),
            same_players: comparison.same_players,
            rows: comparison.rows,
            other_candidates: similar - 1,
        }),
        None => Verdict::New,
    }
}

/// Same location, same calendar day, same number of players.
pub fn passes_filters(incoming: &Play, existing: &Play) -> bool {
    incoming.location_id() == existing.location_id()
        && same_day(&incoming.play_date, &existing.play_date)
        && incoming.player_scores.len() == existing.player_scores.len()
}

fn compare_scores(existing: &Play, incoming: &Play, players: &Collection<Player>) -> Comparison {
    let mut same_players = true;
    let mut equal_scores = 0usize;
    let mut rows = Vec::with_capacity(incoming.player_scores.len());

    for new in &incoming.player_scores {
        let old = existing
            .player_scores
            .iter()
            .find(|s| s.player_ref_id == new.player_ref_id);
        match old {
            Some(old) => {
                if scores_equal(&old.score, &new.score) {
                    equal_scores += 1;
                }
                rows.push(ScoreRow {
                    player: player_name(players, new.player_ref_id),
                    old_score: Some(score_text(&old.score)),
                    new_score: Some(score_text(&new.score)),
                });
            }
            None => {
                same_players = false;
                rows.push(ScoreRow {
                    player: player_name(players, new.player_ref_id),
                    old_score: None,
                    new_score: Some(score_text(&new.score)),
                });
            }
        }
    }

    for old in &existing.player_scores {
        if !incoming.has_player(old.player_ref_id) {
            rows.push(ScoreRow {
                player: player_name(players, old.player_ref_id),
                old_score: Some(score_text(&old.score)),
                new_score: None,
            });
        }
    }

    Comparison {
        same_players,
        equal_scores,
        rows,
    }
}

fn player_name(players: &Collection<Player>, id: u32) -> String {
    players
        .by_id(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

// ── Calendar days ───────────────────────────────────────────────────────────

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Calendar day of a play date. Time of day and offsets are ignored; the
/// day is the one written in the timestamp.
pub fn play_day(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, format) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.naive_local().date());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Whether two play dates fall on the same calendar day.
///
/// Dates that do not parse are compared by their leading `YYYY-MM-DD` text.
pub fn same_day(a: &str, b: &str) -> bool {
    match (play_day(a), play_day(b)) {
        (Some(x), Some(y)) => x == y,
        _ => {
            let (a, b) = (date_prefix(a), date_prefix(b));
            !a.is_empty() && a == b
        }
    }
}

fn date_prefix(date: &str) -> &str {
    let date = date.trim();
    date.get(..10).unwrap_or(date)
}
