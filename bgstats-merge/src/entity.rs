//! Reconcilable entity kinds and their stable keys.

use std::fmt;
use std::hash::Hash;

use bgstats_catalog::{Game, Location, Player};

/// The collections whose members are matched across files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Game,
    Location,
    Player,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Location => "location",
            Self::Player => "player",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity that carries a file-local id and, usually, a stable key.
///
/// The file-local id is only meaningful inside one export. The stable key is
/// the same for the same real-world entity in every export that has one.
pub trait Entity: Clone {
    type Key: Eq + Hash + Clone + fmt::Debug;

    const KIND: EntityKind;

    fn id(&self) -> u32;

    fn set_id(&mut self, id: u32);

    /// The cross-file key, or `None` when the entity cannot be auto-matched.
    fn stable_key(&self) -> Option<Self::Key>;

    fn name(&self) -> &str;

    /// Label shown in selection lists.
    fn label(&self) -> String {
        format!("{} - {}", self.id(), self.name())
    }

    /// Drop data that is not comparable across files before the entity joins
    /// the merged set.
    fn prepare_for_merge(&mut self) {}
}

impl Entity for Game {
    type Key = u64;

    const KIND: EntityKind = EntityKind::Game;

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn stable_key(&self) -> Option<u64> {
        self.catalog_id()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare_for_merge(&mut self) {
        self.copies.clear();
    }
}

impl Entity for Location {
    type Key = String;

    const KIND: EntityKind = EntityKind::Location;

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn stable_key(&self) -> Option<String> {
        non_empty(&self.uuid)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Player {
    type Key = String;

    const KIND: EntityKind = EntityKind::Player;

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn stable_key(&self) -> Option<String> {
        non_empty(&self.uuid)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
