mod common;

use std::cell::RefCell;
use std::collections::HashSet;

use bgstats_catalog::SourceFile;
use bgstats_merge::{
    DuplicateAction, EntityKind, EntityMatch, MergeError, MergeProgress, MergeStats,
    PlayPosition, SilentProgress, merge_exports,
};
use common::*;

/// Bob's export of the same Catan night plus a homebrew game.
fn bob_file() -> SourceFile {
    file(
        "bob.json",
        export(
            vec![game(10, Some(13), "Catan"), game(11, None, "Homebrew")],
            vec![location(20, "loc-home-bob", "Home (Bob)")],
            vec![player(30, "pl-bob", "Bob"), player(31, "pl-alice", "Alice")],
            vec![
                play(
                    "b-1",
                    10,
                    Some(20),
                    "2023-01-01 19:00:00",
                    &[(31, "10"), (30, "8")],
                ),
                play("b-2", 11, None, "2023-02-01", &[(31, "5"), (30, "6")]),
            ],
            30,
        ),
    )
}

fn bob_file_with_bob_score(score: &str) -> SourceFile {
    let mut bob = bob_file();
    bob.export.plays[0].player_scores[1].score = serde_json::json!(score);
    bob
}

fn run(files: &[SourceFile], decider: &mut ScriptedDecider) -> (bgstats_catalog::Export, MergeStats) {
    let outcome = merge_exports(files, decider, Some(&SilentProgress)).unwrap();
    (outcome.export, outcome.stats)
}

#[test]
fn same_night_from_two_exports_is_merged_once() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1));

    let (merged, stats) = run(&[alice_file(), bob_file()], &mut decider);

    assert_eq!(
        decider.match_requests,
        vec![(EntityKind::Location, "Home (Bob)".to_string())]
    );
    assert!(decider.conflicts.is_empty());
    assert_eq!(stats.seed_plays, 1);
    assert_eq!(stats.plays_already_present, 1);
    assert_eq!(stats.plays_added, 1);
    assert_eq!(stats.games_created, 1);
    assert_eq!(stats.locations_matched_by_hand, 1);

    let uuids: Vec<&str> = merged.plays.iter().map(|p| p.uuid.as_str()).collect();
    assert_eq!(uuids, vec!["play-1", "b-2"]);
    let homebrew = &merged.plays[1];
    assert_eq!(homebrew.game_ref_id, 2);
    assert_eq!(merged.game(2).unwrap().name, "Homebrew");
    let scorers: Vec<u32> = homebrew.player_scores.iter().map(|s| s.player_ref_id).collect();
    assert_eq!(scorers, vec![1, 2]);
}

#[test]
fn new_location_makes_the_same_night_a_new_play() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::CreateNew);

    let (merged, stats) = run(&[alice_file(), bob_file()], &mut decider);

    assert_eq!(stats.locations_created, 1);
    assert_eq!(merged.plays.len(), 3);
    assert_eq!(merged.location(2).unwrap().name, "Home (Bob)");
    assert_eq!(merged.plays[1].location_ref_id, Some(2));
}

#[test]
fn repeated_file_asks_nothing_new() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1));

    let (merged, stats) = run(&[alice_file(), bob_file(), bob_file()], &mut decider);

    assert_eq!(decider.file_prompts, 2);
    assert_eq!(decider.match_requests.len(), 1);
    assert!(decider.conflicts.is_empty());
    assert_eq!(merged.plays.len(), 2);
    assert_eq!(merged.games.len(), 2);
    assert_eq!(stats.plays_skipped_uuid, 1);
    assert_eq!(stats.plays_already_present, 2);
}

#[test]
fn base_file_merged_again_is_skipped_by_uuid() {
    let mut decider = ScriptedDecider::new(0, 1).file_player(Some(1));

    let (merged, stats) = run(&[alice_file(), alice_file()], &mut decider);

    assert!(decider.match_requests.is_empty());
    assert_eq!(merged.plays.len(), 1);
    assert_eq!(stats.plays_skipped_uuid, 1);
}

#[test]
fn replace_overwrites_the_merged_play() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1))
        .duplicate_action(DuplicateAction::Replace);

    let (merged, stats) = run(&[alice_file(), bob_file_with_bob_score("9")], &mut decider);

    assert_eq!(decider.conflicts.len(), 1);
    let bob_row = decider.conflicts[0]
        .iter()
        .find(|r| r.player == "Bob")
        .unwrap();
    assert_eq!(bob_row.old_score.as_deref(), Some("8"));
    assert_eq!(bob_row.new_score.as_deref(), Some("9"));

    assert_eq!(stats.plays_replaced, 1);
    assert_eq!(merged.plays.len(), 2);
    let replaced = &merged.plays[0];
    assert_eq!(replaced.uuid, "b-1");
    assert_eq!(replaced.game_ref_id, 1);
    assert_eq!(replaced.location_ref_id, Some(1));
    let bob = replaced
        .player_scores
        .iter()
        .find(|s| s.player_ref_id == 2)
        .unwrap();
    assert_eq!(bob.score, serde_json::json!("9"));
}

#[test]
fn ignore_keeps_the_merged_play() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1))
        .duplicate_action(DuplicateAction::Ignore);

    let (merged, stats) = run(&[alice_file(), bob_file_with_bob_score("9")], &mut decider);

    assert_eq!(stats.plays_ignored, 1);
    assert_eq!(merged.plays.len(), 2);
    assert_eq!(merged.plays[0].uuid, "play-1");
}

#[test]
fn add_keeps_both_plays() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1))
        .duplicate_action(DuplicateAction::Add);

    let (merged, stats) = run(&[alice_file(), bob_file_with_bob_score("9")], &mut decider);

    assert_eq!(stats.plays_added_on_conflict, 1);
    assert_eq!(merged.plays.len(), 3);
    assert_eq!(merged.plays[1].uuid, "b-1");
}

#[test]
fn replaced_play_is_found_by_uuid_later() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1))
        .duplicate_action(DuplicateAction::Replace);

    let changed = bob_file_with_bob_score("9");
    let (merged, stats) = run(&[alice_file(), changed.clone(), changed], &mut decider);

    assert_eq!(decider.conflicts.len(), 1);
    assert_eq!(stats.plays_skipped_uuid, 2);
    assert_eq!(merged.plays.len(), 2);
}

#[test]
fn base_play_replaced_later_is_still_skipped_by_uuid() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .file_player(Some(1))
        .entity_match(EntityMatch::Existing(1))
        .duplicate_action(DuplicateAction::Replace);

    let (merged, stats) = run(
        &[alice_file(), bob_file_with_bob_score("9"), alice_file()],
        &mut decider,
    );

    assert_eq!(decider.conflicts.len(), 1);
    assert_eq!(stats.plays_replaced, 1);
    assert_eq!(stats.plays_skipped_uuid, 1);
    assert_eq!(merged.plays.len(), 2);
    assert_eq!(merged.plays[0].uuid, "b-1");
}

#[test]
fn base_file_with_missing_game_aborts() {
    let mut alice = alice_file();
    alice.export.plays[0].game_ref_id = 99;
    let mut decider = ScriptedDecider::new(0, 1);

    let err = merge_exports(&[alice, bob_file()], &mut decider, None).unwrap_err();

    assert!(matches!(
        err,
        MergeError::MissingGame {
            game_ref_id: 99,
            ..
        }
    ));
    assert_eq!(decider.file_prompts, 0);
}

#[test]
fn base_file_dangling_location_is_counted() {
    let mut alice = alice_file();
    alice.export.plays[0].location_ref_id = Some(55);
    let mut decider = ScriptedDecider::new(0, 1).file_player(None);

    let (merged, stats) = run(&[alice, bob_file()], &mut decider);

    assert_eq!(stats.dangling_references, 1);
    assert_eq!(merged.plays[0].location_ref_id, None);
    assert!(merged.locations.is_empty());
}

#[test]
fn skipped_file_contributes_nothing() {
    let mut decider = ScriptedDecider::new(0, 1).file_player(None);

    let (merged, stats) = run(&[alice_file(), bob_file()], &mut decider);

    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.files_merged, 0);
    assert!(decider.match_requests.is_empty());
    assert_eq!(merged.plays.len(), 1);
    assert_eq!(merged.games.len(), 1);
}

#[test]
fn base_file_can_be_any_input() {
    let mut decider = ScriptedDecider::new(1, 30)
        .file_player(Some(2))
        .entity_match(EntityMatch::Existing(20))
        .entity_match(EntityMatch::CreateNew)
        .entity_match(EntityMatch::CreateNew);

    let (merged, stats) = run(&[alice_file(), bob_file()], &mut decider);

    assert_eq!(merged.user_info.me_ref_id, Some(30));
    assert_eq!(stats.seed_plays, 2);
    // Alice's Catan night is already there; Carcassonne with Carol is new.
    assert_eq!(stats.plays_already_present, 1);
    assert_eq!(stats.plays_added, 1);
    assert_eq!(
        decider.match_requests,
        vec![
            (EntityKind::Location, "Home".to_string()),
            (EntityKind::Location, "Club".to_string()),
            (EntityKind::Player, "Carol".to_string()),
        ]
    );
    assert_eq!(merged.game(12).unwrap().name, "Carcassonne");
}

#[test]
fn unknown_player_can_be_created() {
    let mut bob = bob_file();
    bob.export.players.push(player(32, "pl-dave", "Dave"));
    bob.export.plays[1].player_scores.push(bgstats_catalog::PlayerScore {
        player_ref_id: 32,
        score: serde_json::json!("7"),
        extra: Default::default(),
    });
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1))
        .entity_match(EntityMatch::CreateNew);

    let (merged, stats) = run(&[alice_file(), bob], &mut decider);

    assert_eq!(
        decider.match_requests[1],
        (EntityKind::Player, "Dave".to_string())
    );
    assert_eq!(stats.players_created, 1);
    let dave = merged.players.iter().find(|p| p.name == "Dave").unwrap();
    assert_eq!(dave.id, 3);
    assert!(merged.plays[1].has_player(3));
}

#[test]
fn dangling_references_are_dropped() {
    let mut bob = bob_file();
    bob.export.plays[1].location_ref_id = Some(55);
    bob.export.plays[1].player_scores.push(bgstats_catalog::PlayerScore {
        player_ref_id: 77,
        score: serde_json::json!("1"),
        extra: Default::default(),
    });
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1));

    let (merged, stats) = run(&[alice_file(), bob], &mut decider);

    assert_eq!(stats.dangling_references, 2);
    let homebrew = &merged.plays[1];
    assert_eq!(homebrew.location_ref_id, None);
    assert_eq!(homebrew.player_scores.len(), 2);
}

#[test]
fn missing_game_aborts() {
    let mut bob = bob_file();
    bob.export.plays[1].game_ref_id = 99;
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1));

    let err = merge_exports(&[alice_file(), bob], &mut decider, None).unwrap_err();

    assert!(matches!(
        err,
        MergeError::MissingGame {
            game_ref_id: 99,
            ..
        }
    ));
}

#[test]
fn invalid_answers_are_errors() {
    let err = merge_exports(&[alice_file()], &mut ScriptedDecider::new(3, 1), None).unwrap_err();
    assert!(matches!(err, MergeError::InvalidChoice(_)));

    let err = merge_exports(&[alice_file()], &mut ScriptedDecider::new(0, 42), None).unwrap_err();
    assert!(matches!(err, MergeError::InvalidChoice(_)));

    let mut decider = ScriptedDecider::new(0, 1).file_player(Some(999));
    let err = merge_exports(&[alice_file(), bob_file()], &mut decider, None).unwrap_err();
    assert!(matches!(err, MergeError::InvalidChoice(_)));
}

#[test]
fn no_files_is_an_error() {
    let err = merge_exports(&[], &mut ScriptedDecider::new(0, 1), None).unwrap_err();
    assert!(matches!(err, MergeError::NoInput));
}

#[test]
fn merged_ids_are_unique_and_references_resolve() {
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::CreateNew);

    let (merged, _) = run(&[alice_file(), bob_file()], &mut decider);

    let game_ids: HashSet<u32> = merged.games.iter().map(|g| g.id).collect();
    let location_ids: HashSet<u32> = merged.locations.iter().map(|l| l.id).collect();
    let player_ids: HashSet<u32> = merged.players.iter().map(|p| p.id).collect();
    assert_eq!(game_ids.len(), merged.games.len());
    assert_eq!(location_ids.len(), merged.locations.len());
    assert_eq!(player_ids.len(), merged.players.len());

    for play in &merged.plays {
        assert!(game_ids.contains(&play.game_ref_id));
        if let Some(id) = play.location_id() {
            assert!(location_ids.contains(&id));
        }
        for score in &play.player_scores {
            assert!(player_ids.contains(&score.player_ref_id));
        }
    }
    assert!(merged.challenges.is_empty());
    assert!(merged.games.iter().all(|g| g.copies.is_empty()));
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<String>>,
}

impl MergeProgress for Recorder {
    fn on_file(&self, current: usize, total: usize, label: &str) {
        self.events
            .borrow_mut()
            .push(format!("file {current}/{total} {label}"));
    }

    fn on_play(&self, position: PlayPosition, uuid: &str) {
        self.events.borrow_mut().push(format!("play {position} {uuid}"));
    }

    fn on_complete(&self, stats: &MergeStats) {
        self.events
            .borrow_mut()
            .push(format!("done {}", stats.files_merged));
    }
}

#[test]
fn progress_sees_every_file_and_play() {
    let recorder = Recorder::default();
    let mut decider = ScriptedDecider::new(0, 1)
        .file_player(Some(31))
        .entity_match(EntityMatch::Existing(1));

    merge_exports(&[alice_file(), bob_file()], &mut decider, Some(&recorder)).unwrap();

    assert_eq!(
        recorder.events.into_inner(),
        vec![
            "file 1/1 bob.json (Bob - 2 plays)".to_string(),
            "play (1/2) b-1".to_string(),
            "play (2/2) b-2".to_string(),
            "done 1".to_string(),
        ]
    );
}
