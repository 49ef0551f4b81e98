//! Merge orchestration.
//!
//! The base file seeds the merged export, restricted to one target player.
//! Every other file is then walked play by play: references are resolved to
//! merged ids, the play is checked for duplicates, and the verdict (or the
//! decider's answer to a possible duplicate) is applied to the store.

use std::collections::HashMap;

use bgstats_catalog::{Export, Game, Location, Play, Player, SourceFile};

use crate::decision::{Decider, DuplicateAction, DuplicateConflict, PlayPosition};
use crate::duplicate::{self, Verdict};
use crate::entity::EntityKind;
use crate::error::MergeError;
use crate::progress::MergeProgress;
use crate::resolver::{OnMiss, ReconcileCache, ResolutionSource, resolve};
use crate::seed::{plays_with_player, seed_export};
use crate::store::EntityStore;

/// Statistics from a merge run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub seed_plays: usize,
    pub files_merged: usize,
    pub files_skipped: usize,
    pub plays_considered: usize,
    pub plays_skipped_uuid: usize,
    pub plays_already_present: usize,
    pub plays_added: usize,
    pub plays_added_on_conflict: usize,
    pub plays_replaced: usize,
    pub plays_ignored: usize,
    pub games_created: usize,
    pub locations_created: usize,
    pub players_created: usize,
    pub locations_matched_by_hand: usize,
    pub players_matched_by_hand: usize,
    /// Location or player references dropped because the file lacks them.
    pub dangling_references: usize,
}

impl MergeStats {
    fn record(&mut self, kind: EntityKind, source: ResolutionSource) {
        match (kind, source) {
            (EntityKind::Game, ResolutionSource::Created) => self.games_created += 1,
            (EntityKind::Location, ResolutionSource::Created) => self.locations_created += 1,
            (EntityKind::Player, ResolutionSource::Created) => self.players_created += 1,
            (EntityKind::Location, ResolutionSource::ChosenExisting) => {
                self.locations_matched_by_hand += 1
            }
            (EntityKind::Player, ResolutionSource::ChosenExisting) => {
                self.players_matched_by_hand += 1
            }
            _ => {}
        }
    }
}

/// The merged export and what it took to build it.
#[derive(Debug)]
pub struct MergeOutcome {
    pub export: Export,
    pub stats: MergeStats,
}

/// Merge all loaded files into one export.
///
/// The decider picks the base file and target player first, then answers
/// every question raised while the other files are merged, in input order.
pub fn merge_exports(
    files: &[SourceFile],
    decider: &mut dyn Decider,
    progress: Option<&dyn MergeProgress>,
) -> Result<MergeOutcome, MergeError> {
    if files.is_empty() {
        return Err(MergeError::NoInput);
    }

    let labels: Vec<String> = files.iter().map(SourceFile::label).collect();
    let base_index = decider.choose_base_file(&labels)?;
    let base = files
        .get(base_index)
        .ok_or_else(|| MergeError::invalid_choice(format!("no input file #{base_index}")))?;

    let target_id = decider.choose_target_player(&sorted_players(&base.export))?;
    let target = base.export.player(target_id).ok_or_else(|| {
        MergeError::invalid_choice(format!("no player {} in {}", target_id, base.name))
    })?;
    log::info!(
        "Base file {} for player {}",
        base.name,
        target.display_name()
    );

    let seed = seed_export(base, target)?;
    let mut stats = MergeStats {
        seed_plays: seed.export.plays.len(),
        dangling_references: seed.dangling_references,
        ..Default::default()
    };
    let mut store = EntityStore::new(seed.export);

    let total = files.len() - 1;
    let others = files
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != base_index)
        .map(|(_, file)| file);
    for (n, file) in others.enumerate() {
        if let Some(p) = progress {
            p.on_file(n + 1, total, &file.label());
        }
        merge_file(&mut store, file, target, decider, progress, &mut stats)?;
    }

    if let Some(p) = progress {
        p.on_complete(&stats);
    }

    Ok(MergeOutcome {
        export: store.into_export(),
        stats,
    })
}

/// Lookup tables for one source file, keyed by file-local id.
struct FileIndex<'a> {
    games: HashMap<u32, &'a Game>,
    locations: HashMap<u32, &'a Location>,
    players: HashMap<u32, &'a Player>,
}

impl<'a> FileIndex<'a> {
    fn new(export: &'a Export) -> Self {
        Self {
            games: export.games.iter().map(|g| (g.id, g)).collect(),
            locations: export.locations.iter().map(|l| (l.id, l)).collect(),
            players: export.players.iter().map(|p| (p.id, p)).collect(),
        }
    }
}

fn merge_file(
    store: &mut EntityStore,
    file: &SourceFile,
    target: &Player,
    decider: &mut dyn Decider,
    progress: Option<&dyn MergeProgress>,
    stats: &mut MergeStats,
) -> Result<(), MergeError> {
    let players = sorted_players(&file.export);
    let Some(player_id) = decider.choose_file_player(&file.label(), target, &players)? else {
        log::info!("Skipping {}: no matching player", file.name);
        stats.files_skipped += 1;
        return Ok(());
    };
    if file.export.player(player_id).is_none() {
        return Err(MergeError::invalid_choice(format!(
            "no player {} in {}",
            player_id, file.name
        )));
    }

    let plays = plays_with_player(&file.export.plays, player_id);
    let index = FileIndex::new(&file.export);
    let mut cache = ReconcileCache::new();
    let total = plays.len();

    for (i, play) in plays.into_iter().enumerate() {
        let position = PlayPosition {
            current: i + 1,
            total,
        };
        if let Some(p) = progress {
            p.on_play(position, &play.uuid);
        }
        stats.plays_considered += 1;

        if store.contains_play(&play.uuid) {
            stats.plays_skipped_uuid += 1;
            continue;
        }

        merge_play(
            store, &index, &mut cache, file, play, position, decider, stats,
        )?;
    }

    stats.files_merged += 1;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn merge_play(
    store: &mut EntityStore,
    index: &FileIndex<'_>,
    cache: &mut ReconcileCache,
    file: &SourceFile,
    play: &Play,
    position: PlayPosition,
    decider: &mut dyn Decider,
    stats: &mut MergeStats,
) -> Result<(), MergeError> {
    let mut incoming = play.clone();

    // Game: catalog games match by bggId, everything else is created.
    let game = index
        .games
        .get(&play.game_ref_id)
        .copied()
        .ok_or_else(|| MergeError::MissingGame {
            file: file.name.clone(),
            play: play.uuid.clone(),
            game_ref_id: play.game_ref_id,
        })?;
    let resolved = resolve(store, cache, game, OnMiss::Create)?;
    stats.record(EntityKind::Game, resolved.source);
    incoming.game_ref_id = resolved.merged_id;

    // Location
    let location = play
        .location_id()
        .and_then(|id| index.locations.get(&id).copied());
    match (play.location_id(), location) {
        (_, Some(location)) => {
            let resolved = resolve(
                store,
                cache,
                location,
                OnMiss::Ask {
                    decider: &mut *decider,
                    position,
                },
            )?;
            stats.record(EntityKind::Location, resolved.source);
            incoming.location_ref_id = Some(resolved.merged_id);
        }
        (Some(id), None) => {
            log::warn!(
                "{}: play {} references missing location {}; merging without location",
                file.name,
                play.uuid,
                id
            );
            stats.dangling_references += 1;
            incoming.location_ref_id = None;
        }
        (None, None) => {}
    }

    // Players
    let mut scores = Vec::with_capacity(play.player_scores.len());
    for score in &play.player_scores {
        let Some(player) = index.players.get(&score.player_ref_id).copied() else {
            log::warn!(
                "{}: play {} references missing player {}; dropping that score",
                file.name,
                play.uuid,
                score.player_ref_id
            );
            stats.dangling_references += 1;
            continue;
        };
        let resolved = resolve(
            store,
            cache,
            player,
            OnMiss::Ask {
                decider: &mut *decider,
                position,
            },
        )?;
        stats.record(EntityKind::Player, resolved.source);
        let mut score = score.clone();
        score.player_ref_id = resolved.merged_id;
        scores.push(score);
    }
    incoming.player_scores = scores;

    let verdict = duplicate::check(
        &incoming,
        store.plays_for_game(incoming.game_ref_id),
        store.players(),
    );

    match verdict {
        Verdict::AlreadyPresent { slot } => {
            log::debug!("{} {} already merged (slot {})", position, play.uuid, slot);
            stats.plays_already_present += 1;
        }
        Verdict::New => {
            store.push_play(incoming);
            stats.plays_added += 1;
        }
        Verdict::PossibleDuplicate(found) => {
            let action = {
                let conflict = DuplicateConflict {
                    position,
                    file_name: &file.name,
                    game_name: &game.name,
                    location_name: location.map(|l| l.name.as_str()),
                    play_date: &incoming.play_date,
                    rows: &found.rows,
                    other_candidates: found.other_candidates,
                };
                decider.resolve_duplicate(&conflict)?
            };
            log::debug!(
                "{} {} vs {}: {}",
                position,
                play.uuid,
                found.existing_uuid,
                action.as_str()
            );
            match action {
                DuplicateAction::Ignore => stats.plays_ignored += 1,
                DuplicateAction::Add => {
                    store.push_play(incoming);
                    stats.plays_added_on_conflict += 1;
                }
                DuplicateAction::Replace => {
                    store.replace_play(found.slot, incoming);
                    stats.plays_replaced += 1;
                }
            }
        }
    }

    Ok(())
}

fn sorted_players(export: &Export) -> Vec<Player> {
    let mut players = export.players.clone();
    players.sort_by_key(|p| p.id);
    players
}
