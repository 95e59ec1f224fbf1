//! Per-entity foot contact counters.
//!
//! Each counter is the number of non-sensor fixtures currently overlapping
//! the entity's foot sensor. It never goes below zero: an end without a
//! matching begin leaves it at zero. An entity may jump while its counter is
//! positive.
use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

#[derive(Resource, Debug, Default, Clone)]
pub struct GroundContacts {
    counters: FxHashMap<Entity, u32>,
}

impl GroundContacts {
    pub fn begin(&mut self, entity: Entity) {
        *self.counters.entry(entity).or_insert(0) += 1;
    }

    pub fn end(&mut self, entity: Entity) {
        if let Some(count) = self.counters.get_mut(&entity) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn count(&self, entity: Entity) -> u32 {
        self.counters.get(&entity).copied().unwrap_or(0)
    }

    pub fn can_jump(&self, entity: Entity) -> bool {
        self.count(entity) > 0
    }

    /// Zero the counter after a jump; it rebuilds from the next begin contacts.
    pub fn reset(&mut self, entity: Entity) {
        if let Some(count) = self.counters.get_mut(&entity) {
            *count = 0;
        }
    }

    /// Drop the counter of an entity whose body was destroyed.
    pub fn forget(&mut self, entity: Entity) {
        self.counters.remove(&entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_end_balance() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut ground = GroundContacts::default();
        ground.begin(e);
        ground.begin(e);
        ground.end(e);
        assert_eq!(ground.count(e), 1);
        assert!(ground.can_jump(e));
        ground.end(e);
        assert_eq!(ground.count(e), 0);
        assert!(!ground.can_jump(e));
    }

    #[test]
    fn test_end_never_goes_negative() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut ground = GroundContacts::default();
        ground.end(e);
        assert_eq!(ground.count(e), 0);
        ground.begin(e);
        ground.end(e);
        ground.end(e);
        ground.end(e);
        assert_eq!(ground.count(e), 0);
    }

    #[test]
    fn test_counters_are_per_entity() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut ground = GroundContacts::default();
        ground.begin(a);
        assert!(ground.can_jump(a));
        assert!(!ground.can_jump(b));
    }

    #[test]
    fn test_reset_and_forget() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut ground = GroundContacts::default();
        ground.begin(e);
        ground.begin(e);
        ground.reset(e);
        assert_eq!(ground.count(e), 0);
        ground.begin(e);
        ground.forget(e);
        assert_eq!(ground.count(e), 0);
    }
}
