//! Build the initial merged export from the base file.

use std::collections::HashSet;

use bgstats_catalog::{Export, Play, Player, SourceFile, UserInfo};

use crate::entity::Entity;
use crate::error::MergeError;

/// Ids referenced by a set of plays.
#[derive(Debug, Default)]
pub struct References {
    pub games: HashSet<u32>,
    pub locations: HashSet<u32>,
    pub players: HashSet<u32>,
}

impl References {
    pub fn collect<'a>(plays: impl IntoIterator<Item = &'a Play>) -> Self {
        let mut refs = Self::default();
        for play in plays {
            refs.games.insert(play.game_ref_id);
            if let Some(location) = play.location_id() {
                refs.locations.insert(location);
            }
            refs.players
                .extend(play.player_scores.iter().map(|s| s.player_ref_id));
        }
        refs
    }
}

/// Plays the given player took part in, in file order.
pub fn plays_with_player(plays: &[Play], player_id: u32) -> Vec<&Play> {
    plays.iter().filter(|p| p.has_player(player_id)).collect()
}

/// The seeded export and how many dangling references were dropped.
#[derive(Debug)]
pub struct Seed {
    pub export: Export,
    pub dangling_references: usize,
}

/// Restrict the base file to the target player's plays and the entities
/// those plays reference.
///
/// A play whose game is missing from the file is an error. A missing
/// location becomes "no location" and a missing player's score is dropped,
/// both with a warning. Copies are dropped from every game, challenges are
/// cleared, and `userInfo` is rewritten to point at the target player.
pub fn seed_export(base: &SourceFile, target: &Player) -> Result<Seed, MergeError> {
    let source = &base.export;
    let mut dangling_references = 0;
    let mut plays = Vec::new();

    for play in plays_with_player(&source.plays, target.id) {
        if source.game(play.game_ref_id).is_none() {
            return Err(MergeError::MissingGame {
                file: base.name.clone(),
                play: play.uuid.clone(),
                game_ref_id: play.game_ref_id,
            });
        }

        let mut play = play.clone();
        if let Some(id) = play.location_id() {
            if source.location(id).is_none() {
                log::warn!(
                    "{}: play {} references missing location {}; keeping it without location",
                    base.name,
                    play.uuid,
                    id
                );
                dangling_references += 1;
                play.location_ref_id = None;
            }
        }
        play.player_scores.retain(|score| {
            let known = source.player(score.player_ref_id).is_some();
            if !known {
                log::warn!(
                    "{}: play {} references missing player {}; dropping that score",
                    base.name,
                    play.uuid,
                    score.player_ref_id
                );
                dangling_references += 1;
            }
            known
        });
        plays.push(play);
    }

    let refs = References::collect(&plays);

    let games = source
        .games
        .iter()
        .filter(|g| refs.games.contains(&g.id))
        .cloned()
        .map(|mut g| {
            g.prepare_for_merge();
            g
        })
        .collect();
    let locations = source
        .locations
        .iter()
        .filter(|l| refs.locations.contains(&l.id))
        .cloned()
        .collect();
    let players = source
        .players
        .iter()
        .filter(|p| refs.players.contains(&p.id))
        .cloned()
        .collect();

    let export = Export {
        games,
        locations,
        players,
        plays,
        challenges: Vec::new(),
        user_info: UserInfo {
            me_ref_id: Some(target.id),
            bgg_username: target.bgg_username.clone(),
            extra: Default::default(),
        },
        extra: source.extra.clone(),
    };
    Ok(Seed {
        export,
        dangling_references,
    })
}
