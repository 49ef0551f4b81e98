//! The merged dataset and its lookup indexes.
//!
//! Entities are indexed by stable key (`bggId` for games, `uuid` for
//! locations and players). Plays are indexed by `uuid` and grouped by the
//! merged game id so duplicate candidates can be found without a scan.

use std::collections::HashMap;

use bgstats_catalog::{Export, Game, Location, Play, Player};

use crate::entity::Entity;

/// One merged collection with its stable-key and id indexes.
#[derive(Debug, Clone)]
pub struct Collection<E: Entity> {
    items: Vec<E>,
    by_key: HashMap<E::Key, u32>,
    by_id: HashMap<u32, usize>,
}

impl<E: Entity> Collection<E> {
    fn new(items: Vec<E>) -> Self {
        let mut by_key = HashMap::new();
        let mut by_id = HashMap::new();
        for (pos, item) in items.iter().enumerate() {
            if let Some(key) = item.stable_key() {
                by_key.entry(key).or_insert(item.id());
            }
            by_id.entry(item.id()).or_insert(pos);
        }
        Self {
            items,
            by_key,
            by_id,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an entity by stable key.
    pub fn get(&self, key: &E::Key) -> Option<&E> {
        self.find_id(key).and_then(|id| self.by_id(id))
    }

    /// Merged id registered for a stable key.
    pub fn find_id(&self, key: &E::Key) -> Option<u32> {
        self.by_key.get(key).copied()
    }

    pub fn by_id(&self, id: u32) -> Option<&E> {
        self.by_id.get(&id).map(|&pos| &self.items[pos])
    }

    /// `max(id) + 1`, or 1 for an empty collection.
    pub fn next_id(&self) -> u32 {
        self.items.iter().map(|e| e.id()).max().map_or(1, |max| max + 1)
    }

    /// Add an entity under `assigned_id` and index its stable key.
    pub fn append(&mut self, mut entity: E, assigned_id: u32) -> u32 {
        debug_assert!(
            !self.by_id.contains_key(&assigned_id),
            "{} id {} already in use",
            E::KIND,
            assigned_id
        );
        entity.set_id(assigned_id);
        if let Some(key) = entity.stable_key() {
            self.by_key.entry(key).or_insert(assigned_id);
        }
        self.by_id.insert(assigned_id, self.items.len());
        self.items.push(entity);
        assigned_id
    }

    /// Register another stable key for an existing entity.
    pub fn alias(&mut self, key: E::Key, merged_id: u32) {
        self.by_key.entry(key).or_insert(merged_id);
    }

    fn into_items(self) -> Vec<E> {
        self.items
    }
}

/// Access to the collection holding a given entity type.
pub trait Stored: Entity + Sized {
    fn collection(store: &EntityStore) -> &Collection<Self>;
    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self>;
}

impl Stored for Game {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.games
    }
    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.games
    }
}

impl Stored for Location {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.locations
    }
    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.locations
    }
}

impl Stored for Player {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.players
    }
    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.players
    }
}

/// In-memory merged export.
#[derive(Debug, Clone)]
pub struct EntityStore {
    games: Collection<Game>,
    locations: Collection<Location>,
    players: Collection<Player>,
    plays: Vec<Play>,
    plays_by_uuid: HashMap<String, usize>,
    plays_by_game: HashMap<u32, Vec<usize>>,
    /// Root fields other than the four collections.
    shell: Export,
}

impl EntityStore {
    /// Take ownership of a seeded export and build the indexes.
    pub fn new(mut export: Export) -> Self {
        let games = Collection::new(std::mem::take(&mut export.games));
        let locations = Collection::new(std::mem::take(&mut export.locations));
        let players = Collection::new(std::mem::take(&mut export.players));
        let plays = std::mem::take(&mut export.plays);

        let mut store = Self {
            games,
            locations,
            players,
            plays: Vec::with_capacity(plays.len()),
            plays_by_uuid: HashMap::new(),
            plays_by_game: HashMap::new(),
            shell: export,
        };
        for play in plays {
            store.push_play(play);
        }
        store
    }

    pub fn get<E: Stored>(&self, key: &E::Key) -> Option<&E> {
        E::collection(self).get(key)
    }

    pub fn find_id<E: Stored>(&self, key: &E::Key) -> Option<u32> {
        E::collection(self).find_id(key)
    }

    pub fn by_id<E: Stored>(&self, id: u32) -> Option<&E> {
        E::collection(self).by_id(id)
    }

    pub fn items<E: Stored>(&self) -> &[E] {
        E::collection(self).items()
    }

    pub fn next_id<E: Stored>(&self) -> u32 {
        E::collection(self).next_id()
    }

    pub fn append<E: Stored>(&mut self, entity: E, assigned_id: u32) -> u32 {
        E::collection_mut(self).append(entity, assigned_id)
    }

    pub fn alias<E: Stored>(&mut self, key: E::Key, merged_id: u32) {
        E::collection_mut(self).alias(key, merged_id);
    }

    pub fn players(&self) -> &Collection<Player> {
        &self.players
    }

    // ── Plays ───────────────────────────────────────────────────────────────

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn play(&self, slot: usize) -> Option<&Play> {
        self.plays.get(slot)
    }

    pub fn contains_play(&self, uuid: &str) -> bool {
        !uuid.is_empty() && self.plays_by_uuid.contains_key(uuid)
    }

    /// Plays of one merged game, with their slot in the flat list.
    pub fn plays_for_game(&self, game_id: u32) -> impl Iterator<Item = (usize, &Play)> {
        self.plays_by_game
            .get(&game_id)
            .into_iter()
            .flatten()
            .map(|&slot| (slot, &self.plays[slot]))
    }

    /// Append a play and index it. Returns its slot.
    pub fn push_play(&mut self, play: Play) -> usize {
        let slot = self.plays.len();
        if !play.uuid.is_empty() {
            self.plays_by_uuid.entry(play.uuid.clone()).or_insert(slot);
        }
        self.plays_by_game
            .entry(play.game_ref_id)
            .or_default()
            .push(slot);
        self.plays.push(play);
        slot
    }

    /// Overwrite the play in `slot`, keeping both indexes consistent.
    ///
    /// The replaced play's uuid stays mapped to `slot`, so a later file
    /// carrying that play is still skipped by uuid. Returns the replaced play.
    pub fn replace_play(&mut self, slot: usize, play: Play) -> Play {
        let old = std::mem::replace(&mut self.plays[slot], play);

        let new = &self.plays[slot];
        if !new.uuid.is_empty() {
            self.plays_by_uuid.insert(new.uuid.clone(), slot);
        }

        if old.game_ref_id != new.game_ref_id {
            if let Some(slots) = self.plays_by_game.get_mut(&old.game_ref_id) {
                slots.retain(|&s| s != slot);
            }
            self.plays_by_game
                .entry(new.game_ref_id)
                .or_default()
                .push(slot);
        }

        old
    }

    /// Reassemble the export document.
    pub fn into_export(self) -> Export {
        let mut export = self.shell;
        export.games = self.games.into_items();
        export.locations = self.locations.into_items();
        export.players = self.players.into_items();
        export.plays = self.plays;
        export
    }
}
