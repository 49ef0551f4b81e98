#![allow(dead_code)]

use std::collections::VecDeque;

use bgstats_catalog::{Export, Game, Location, Play, Player, PlayerScore, SourceFile, UserInfo};
use bgstats_merge::{
    Decider, DecisionError, DuplicateAction, DuplicateConflict, EntityKind, EntityMatch,
    MatchRequest, ScoreRow,
};
use serde_json::json;

pub fn game(id: u32, bgg_id: Option<u64>, name: &str) -> Game {
    Game {
        id,
        bgg_id,
        name: name.to_string(),
        is_base_game: true,
        is_expansion: false,
        copies: vec![json!({ "uuid": format!("copy-{id}") })],
        extra: Default::default(),
    }
}

pub fn location(id: u32, uuid: &str, name: &str) -> Location {
    Location {
        id,
        uuid: uuid.to_string(),
        name: name.to_string(),
        extra: Default::default(),
    }
}

pub fn player(id: u32, uuid: &str, name: &str) -> Player {
    Player {
        id,
        uuid: uuid.to_string(),
        name: name.to_string(),
        bgg_username: None,
        extra: Default::default(),
    }
}

pub fn play(
    uuid: &str,
    game_ref_id: u32,
    location_ref_id: Option<u32>,
    play_date: &str,
    scores: &[(u32, &str)],
) -> Play {
    Play {
        uuid: uuid.to_string(),
        game_ref_id,
        location_ref_id,
        play_date: play_date.to_string(),
        player_scores: scores
            .iter()
            .map(|&(player_ref_id, score)| PlayerScore {
                player_ref_id,
                score: json!(score),
                extra: Default::default(),
            })
            .collect(),
        extra: Default::default(),
    }
}

pub fn export(
    games: Vec<Game>,
    locations: Vec<Location>,
    players: Vec<Player>,
    plays: Vec<Play>,
    me: u32,
) -> Export {
    Export {
        games,
        locations,
        players,
        plays,
        challenges: vec![json!({ "id": 1 })],
        user_info: UserInfo {
            me_ref_id: Some(me),
            bgg_username: None,
            extra: Default::default(),
        },
        extra: Default::default(),
    }
}

pub fn file(name: &str, export: Export) -> SourceFile {
    SourceFile::new(name, export)
}

/// Alice's export: Catan at Home on 2023-01-01, Alice 10 / Bob 8.
pub fn alice_file() -> SourceFile {
    file(
        "alice.json",
        export(
            vec![game(1, Some(13), "Catan"), game(2, Some(822), "Carcassonne")],
            vec![
                location(1, "loc-home", "Home"),
                location(2, "loc-club", "Club"),
            ],
            vec![
                player(1, "pl-alice", "Alice"),
                player(2, "pl-bob", "Bob"),
                player(3, "pl-carol", "Carol"),
            ],
            vec![
                play(
                    "play-1",
                    1,
                    Some(1),
                    "2023-01-01 20:00:00",
                    &[(1, "10"), (2, "8")],
                ),
                // Alice is not in this one.
                play(
                    "play-2",
                    2,
                    Some(2),
                    "2023-01-05 20:00:00",
                    &[(2, "30"), (3, "25")],
                ),
            ],
            1,
        ),
    )
}

/// Scripted answers; an unexpected question fails with `Closed`.
#[derive(Default)]
pub struct ScriptedDecider {
    pub base_file: usize,
    pub target_player: u32,
    pub file_players: VecDeque<Option<u32>>,
    pub entity_matches: VecDeque<EntityMatch>,
    pub duplicate_actions: VecDeque<DuplicateAction>,

    pub file_prompts: usize,
    pub match_requests: Vec<(EntityKind, String)>,
    pub conflicts: Vec<Vec<ScoreRow>>,
}

impl ScriptedDecider {
    pub fn new(base_file: usize, target_player: u32) -> Self {
        Self {
            base_file,
            target_player,
            ..Default::default()
        }
    }

    pub fn file_player(mut self, answer: Option<u32>) -> Self {
        self.file_players.push_back(answer);
        self
    }

    pub fn entity_match(mut self, answer: EntityMatch) -> Self {
        self.entity_matches.push_back(answer);
        self
    }

    pub fn duplicate_action(mut self, answer: DuplicateAction) -> Self {
        self.duplicate_actions.push_back(answer);
        self
    }
}

impl Decider for ScriptedDecider {
    fn choose_base_file(&mut self, _labels: &[String]) -> Result<usize, DecisionError> {
        Ok(self.base_file)
    }

    fn choose_target_player(&mut self, _players: &[Player]) -> Result<u32, DecisionError> {
        Ok(self.target_player)
    }

    fn choose_file_player(
        &mut self,
        _file_label: &str,
        _target: &Player,
        _players: &[Player],
    ) -> Result<Option<u32>, DecisionError> {
        self.file_prompts += 1;
        self.file_players.pop_front().ok_or(DecisionError::Closed)
    }

    fn match_entity(&mut self, request: &MatchRequest<'_>) -> Result<EntityMatch, DecisionError> {
        self.match_requests
            .push((request.kind, request.foreign_name.to_string()));
        self.entity_matches.pop_front().ok_or(DecisionError::Closed)
    }

    fn resolve_duplicate(
        &mut self,
        conflict: &DuplicateConflict<'_>,
    ) -> Result<DuplicateAction, DecisionError> {
        self.conflicts.push(conflict.rows.to_vec());
        self.duplicate_actions.pop_front().ok_or(DecisionError::Closed)
    }
}
