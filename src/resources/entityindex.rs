//! String id -> entity index.
//!
//! The [`EntityIndex`] resource is the registry's lookup table. It is
//! updated on every create and destroy, so per-id operations never scan the
//! world. It also hands out ids: generated ids look like `car_12`, and no id
//! is ever issued twice within a session, even after the entity that held
//! it is gone. The one exception is [`EntityIndex::reclaim`], which world
//! loading uses to give restored entities their saved ids back.

use bevy_ecs::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Resource, Debug, Default)]
pub struct EntityIndex {
    live: FxHashMap<String, Entity>,
    issued: FxHashSet<String>,
    next_serial: u64,
    next_seq: u64,
}

impl EntityIndex {
    /// Issue an id for a new entity.
    ///
    /// `preferred` is honoured when it was never issued before; otherwise a
    /// fresh `{tag}_{serial}` id is generated.
    pub fn allocate(&mut self, tag: &str, preferred: Option<&str>) -> String {
        if let Some(preferred) = preferred.filter(|p| !p.is_empty()) {
            if self.issued.insert(preferred.to_string()) {
                return preferred.to_string();
            }
            log::debug!("id '{}' already used this session, generating a new one", preferred);
        }
        loop {
            self.next_serial += 1;
            let id = format!("{}_{}", tag, self.next_serial);
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Make a dead id available again as a preferred id. Returns `false`
    /// when the id is still held by a live entity.
    pub fn reclaim(&mut self, id: &str) -> bool {
        if self.live.contains_key(id) {
            return false;
        }
        self.issued.remove(id);
        true
    }

    /// Next creation sequence number.
    pub fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn insert(&mut self, id: String, entity: Entity) {
        self.live.insert(id, entity);
    }

    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        self.live.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Entity> {
        self.live.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.live.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.live.keys().map(String::as_str)
    }
}
