use bevy::log::{debug, warn};
use std::collections::HashMap;

use super::lifecycle::{Activatable, EntityId, short_kind};

/// Ordered collection of one family of entities, indexed by id.
///
/// Registration order is preserved and drives start-up choice and listings;
/// the id index keeps lookups constant time.
pub struct Registry<T: ?Sized + Activatable> {
    entries: Vec<Box<T>>,
    index: HashMap<EntityId, usize>,
}

impl<T: ?Sized + Activatable> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: ?Sized + Activatable> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, assigning or de-duplicating its id.
    ///
    /// A blank id is replaced by a generated `<kind>-<n>`; an id already in use
    /// is renamed to the next free `<id>-<n>`. Returns the final id.
    pub fn register(&mut self, mut entity: Box<T>) -> EntityId {
        let requested = entity.lifecycle().id().trim().to_string();

        let id = if requested.is_empty() {
            self.generate_id(entity.kind())
        } else if self.index.contains_key(&requested) {
            let renamed = self.next_free(&requested);
            warn!(
                "Duplicate id '{}' for {}, registered as '{}'",
                requested,
                entity.kind(),
                renamed
            );
            renamed
        } else {
            requested
        };

        entity.lifecycle_mut().set_id(id.clone());
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push(entity);
        debug!("Registered '{}'", id);
        id
    }

    /// Remove an entity; the caller is responsible for deactivating it first.
    pub fn unregister(&mut self, id: &str) -> Option<Box<T>> {
        let position = self.index.remove(id)?;
        let entity = self.entries.remove(position);
        self.rebuild_index();
        Some(entity)
    }

    /// Unused id derived from a kind name.
    pub fn generate_id(&self, kind: &str) -> EntityId {
        self.next_free(&short_kind(kind))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| self.entries[i].as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        let position = *self.index.get(id)?;
        Some(self.entries[position].as_mut())
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| e.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|e| e.as_mut())
    }

    pub fn at(&self, position: usize) -> Option<&T> {
        self.entries.get(position).map(|e| e.as_ref())
    }

    pub fn at_mut(&mut self, position: usize) -> Option<&mut T> {
        self.entries.get_mut(position).map(|e| e.as_mut())
    }

    /// All instances of one concrete type, in registration order.
    pub fn instances_of<C: Activatable>(&self) -> impl Iterator<Item = &C> {
        self.entries
            .iter()
            .filter_map(|e| e.as_any().downcast_ref::<C>())
    }

    /// Typed access to a single entity.
    pub fn get_as_mut<C: Activatable>(&mut self, id: &str) -> Option<&mut C> {
        self.get_mut(id)?.as_any_mut().downcast_mut::<C>()
    }

    /// First entity whose kind matches exactly.
    pub fn find_by_kind(&self, kind: &str) -> Option<&T> {
        self.iter().find(|e| e.kind() == kind)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entries
            .iter()
            .map(|e| e.lifecycle().id().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_free(&self, base: &str) -> EntityId {
        if base.is_empty() {
            return self.next_free("entity");
        }
        if !self.index.contains_key(base) {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            n += 1;
            let candidate = format!("{base}-{n}");
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.lifecycle().id().to_string(), i))
            .collect();
    }
}
