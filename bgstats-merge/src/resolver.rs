//! Map foreign entity references onto merged ids.
//!
//! Resolution is a two-step contract: look the stable key up in the merged
//! indexes, and only on a miss ask for a decision (or create outright, for
//! games). Results are cached per source file so the same foreign id never
//! costs a second prompt.

use std::collections::HashMap;

use crate::decision::{Candidate, Decider, DecisionError, EntityMatch, MatchRequest, PlayPosition};
use crate::entity::EntityKind;
use crate::store::{EntityStore, Stored};

/// Per-file map from foreign id to merged id, one per entity kind.
#[derive(Debug, Default)]
pub struct ReconcileCache {
    games: HashMap<u32, u32>,
    locations: HashMap<u32, u32>,
    players: HashMap<u32, u32>,
}

impl ReconcileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: EntityKind, foreign_id: u32) -> Option<u32> {
        self.ids(kind).get(&foreign_id).copied()
    }

    fn ids(&self, kind: EntityKind) -> &HashMap<u32, u32> {
        match kind {
            EntityKind::Game => &self.games,
            EntityKind::Location => &self.locations,
            EntityKind::Player => &self.players,
        }
    }

    fn ids_mut(&mut self, kind: EntityKind) -> &mut HashMap<u32, u32> {
        match kind {
            EntityKind::Game => &mut self.games,
            EntityKind::Location => &mut self.locations,
            EntityKind::Player => &mut self.players,
        }
    }
}

/// What to do when the stable key has no merged counterpart.
pub enum OnMiss<'a> {
    /// Create a new merged entity without asking.
    Create,
    /// Let the decider pick an existing entity or create a new one.
    Ask {
        decider: &'a mut dyn Decider,
        position: PlayPosition,
    },
}

/// How a merged id was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Resolved earlier in the same file.
    Cached,
    /// Stable key found in the merged indexes.
    MatchedByKey,
    /// Picked from the merged list by the decider.
    ChosenExisting,
    /// A new merged entity was appended.
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub merged_id: u32,
    pub source: ResolutionSource,
}

/// Resolve one foreign entity to its merged id.
pub fn resolve<E: Stored>(
    store: &mut EntityStore,
    cache: &mut ReconcileCache,
    foreign: &E,
    on_miss: OnMiss<'_>,
) -> Result<Resolution, DecisionError> {
    if let Some(merged_id) = cache.get(E::KIND, foreign.id()) {
        return Ok(Resolution {
            merged_id,
            source: ResolutionSource::Cached,
        });
    }

    let key = foreign.stable_key();
    let found = key.as_ref().and_then(|k| store.find_id::<E>(k));

    let resolution = match (found, on_miss) {
        (Some(merged_id), _) => Resolution {
            merged_id,
            source: ResolutionSource::MatchedByKey,
        },
        (None, OnMiss::Create) => create(store, foreign),
        (None, OnMiss::Ask { decider, position }) => {
            let request = MatchRequest {
                kind: E::KIND,
                foreign_name: foreign.name(),
                candidates: store
                    .items::<E>()
                    .iter()
                    .map(Candidate::from_entity)
                    .collect(),
                position,
            };
            match decider.match_entity(&request)? {
                EntityMatch::Existing(merged_id) => {
                    if store.by_id::<E>(merged_id).is_none() {
                        return Err(DecisionError::Invalid(format!(
                            "no merged {} with id {}",
                            E::KIND,
                            merged_id
                        )));
                    }
                    if let Some(key) = key {
                        store.alias::<E>(key, merged_id);
                    }
                    log::debug!(
                        "Matched {} '{}' to merged id {}",
                        E::KIND,
                        foreign.name(),
                        merged_id
                    );
                    Resolution {
                        merged_id,
                        source: ResolutionSource::ChosenExisting,
                    }
                }
                EntityMatch::CreateNew => create(store, foreign),
            }
        }
    };

    cache
        .ids_mut(E::KIND)
        .insert(foreign.id(), resolution.merged_id);
    Ok(resolution)
}

/// Copy a foreign entity into the merged set under the next free id.
fn create<E: Stored>(store: &mut EntityStore, foreign: &E) -> Resolution {
    let mut entity = foreign.clone();
    entity.prepare_for_merge();
    let merged_id = store.next_id::<E>();
    store.append(entity, merged_id);
    log::debug!(
        "Created {} '{}' with merged id {}",
        E::KIND,
        foreign.name(),
        merged_id
    );
    Resolution {
        merged_id,
        source: ResolutionSource::Created,
    }
}
