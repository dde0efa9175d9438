use bevy::log::{info, warn};

use crate::engine::entity::lifecycle::{
    Activatable, EntityFamily, EntityId, LifecycleEvent, LifecyclePhase,
};
use crate::engine::entity::registry::Registry;

/// Something a coordinator operation did, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    Lifecycle(LifecycleEvent),
    /// The active slot now refers to a different entity.
    Changed { family: EntityFamily, id: EntityId },
}

/// Keeps at most one entity of a family active.
///
/// Every operation runs to completion and returns the ordered events it
/// produced; the caller reacts to them afterwards, so no entity is ever
/// mutated from inside another entity's transition.
pub struct Coordinator<T: ?Sized + Activatable> {
    family: EntityFamily,
    registry: Registry<T>,
    active: Option<EntityId>,
}

impl<T: ?Sized + Activatable> Coordinator<T> {
    pub fn new(family: EntityFamily) -> Self {
        Self {
            family,
            registry: Registry::new(),
            active: None,
        }
    }

    pub fn family(&self) -> EntityFamily {
        self.family
    }

    pub fn register(&mut self, entity: Box<T>) -> EntityId {
        self.registry.register(entity)
    }

    /// Remove an inactive entity. Active entities must be deactivated first
    /// so their events reach the caller.
    pub fn unregister(&mut self, id: &str) -> Option<Box<T>> {
        if self.registry.get(id).is_some_and(|e| e.is_active()) {
            warn!("Refusing to unregister active {:?} '{}'", self.family, id);
            return None;
        }
        self.registry.unregister(id)
    }

    /// Normalise, then activate exactly one entity.
    ///
    /// The choice is the first listed entity matching `preference` by id or
    /// kind, else the first marked default, else the first listed.
    pub fn start(&mut self, preference: Option<&str>) -> Vec<CoordinatorEvent> {
        let mut events = self.deactivate_all();

        let candidates: Vec<usize> = (0..self.registry.len())
            .filter(|&i| {
                self.registry
                    .at(i)
                    .is_some_and(|e| e.lifecycle().is_enabled() && !e.lifecycle().is_hidden())
            })
            .collect();

        let preferred = preference.and_then(|wanted| {
            candidates.iter().copied().find(|&i| {
                self.registry
                    .at(i)
                    .is_some_and(|e| e.id() == wanted || e.kind() == wanted)
            })
        });
        let default = || {
            candidates
                .iter()
                .copied()
                .find(|&i| self.registry.at(i).is_some_and(|e| e.lifecycle().is_default()))
        };

        match preferred.or_else(default).or(candidates.first().copied()) {
            Some(position) => events.extend(self.activate_at(position).unwrap_or_default()),
            None => warn!("No {:?} available to start", self.family),
        }
        events
    }

    /// Activate by id. `None` when no such entity is registered or it is
    /// disabled; an empty list when it was already active.
    pub fn activate_by_id(&mut self, id: &str) -> Option<Vec<CoordinatorEvent>> {
        let Some(position) = self.registry.position(id) else {
            warn!("Unknown {:?} '{}'", self.family, id);
            return None;
        };
        self.activate_at(position)
    }

    /// Deactivate one entity. `None` when no such entity is registered.
    pub fn deactivate_by_id(&mut self, id: &str) -> Option<Vec<CoordinatorEvent>> {
        let position = self.registry.position(id)?;
        let mut events = Vec::new();
        self.deactivate_at(position, &mut events);
        Some(events)
    }

    pub fn deactivate_all(&mut self) -> Vec<CoordinatorEvent> {
        let mut events = Vec::new();
        for position in 0..self.registry.len() {
            self.deactivate_at(position, &mut events);
        }
        events
    }

    /// Enable or disable an entity, deactivating it when disabled.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Option<Vec<CoordinatorEvent>> {
        let position = self.registry.position(id)?;
        let mut events = Vec::new();
        if !enabled {
            self.deactivate_at(position, &mut events);
        }
        if let Some(entity) = self.registry.at_mut(position) {
            entity.lifecycle_mut().set_enabled(enabled);
        }
        Some(events)
    }

    /// Listed ids in registration order; hidden entities are left out.
    pub fn available(&self) -> Vec<EntityId> {
        self.registry
            .iter()
            .filter(|e| !e.lifecycle().is_hidden())
            .map(|e| e.id().to_string())
            .collect()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&T> {
        self.registry.get(self.active.as_deref()?)
    }

    pub fn active_mut(&mut self) -> Option<&mut T> {
        let id = self.active.as_deref()?;
        self.registry.get_mut(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.registry.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.registry.get_mut(id)
    }

    pub fn registry(&self) -> &Registry<T> {
        &self.registry
    }

    pub fn get_as_mut<C: Activatable>(&mut self, id: &str) -> Option<&mut C> {
        self.registry.get_as_mut::<C>(id)
    }

    fn activate_at(&mut self, position: usize) -> Option<Vec<CoordinatorEvent>> {
        let mut events = Vec::new();
        let entity = self.registry.at_mut(position)?;
        let id = entity.id().to_string();

        if !entity.lifecycle().is_enabled() {
            warn!("{:?} '{}' is disabled and cannot be activated", self.family, id);
            return None;
        }
        if entity.is_active() {
            return Some(events);
        }

        entity.on_pre_activate();
        events.push(self.lifecycle_event(&id, LifecyclePhase::PreActivate, false));

        // At most one active: siblings go before the new entity comes up.
        for sibling in 0..self.registry.len() {
            if sibling != position {
                self.deactivate_at(sibling, &mut events);
            }
        }

        if let Some(entity) = self.registry.at_mut(position) {
            entity.lifecycle_mut().set_active(true);
            entity.on_activated();
        }
        events.push(self.lifecycle_event(&id, LifecyclePhase::Activated, false));

        if self.active.as_deref() != Some(id.as_str()) {
            info!("{:?} changed to '{}'", self.family, id);
            self.active = Some(id.clone());
            events.push(CoordinatorEvent::Changed {
                family: self.family,
                id,
            });
        }
        Some(events)
    }

    fn deactivate_at(&mut self, position: usize, events: &mut Vec<CoordinatorEvent>) {
        let Some(entity) = self.registry.at_mut(position) else {
            return;
        };
        if !entity.is_active() {
            return;
        }
        entity.lifecycle_mut().set_active(false);
        entity.on_deactivated();
        let id = entity.id().to_string();

        let was_active_slot = self.active.as_deref() == Some(id.as_str());
        if was_active_slot {
            self.active = None;
        }
        events.push(self.lifecycle_event(&id, LifecyclePhase::Deactivated, was_active_slot));
    }

    fn lifecycle_event(&self, id: &str, phase: LifecyclePhase, was_active_slot: bool) -> CoordinatorEvent {
        CoordinatorEvent::Lifecycle(LifecycleEvent {
            family: self.family,
            id: id.to_string(),
            phase,
            was_active_slot,
        })
    }
}
