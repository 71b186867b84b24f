//! Per-tick execution context provided to systems.

use engine_component::Entity;

use crate::world::World;

/// Context provided to [`System::update`](crate::System::update) on each tick.
///
/// Carries the tick metadata, the snapshot of entities that matched the
/// system when it was called, and mutable access to the [`World`]. Component
/// edits made through `world` take effect immediately: a later system in the
/// same tick sees the updated membership. The `entities` snapshot itself
/// does not change while the system runs.
#[derive(Debug)]
pub struct SystemContext<'a> {
    /// The current tick ID (1-based).
    pub tick_id: u64,
    /// Delta time since the last tick, in seconds.
    pub dt: f64,
    /// The world, for component reads/writes and entity lifecycle requests.
    pub world: &'a mut World,
    entities: &'a [Entity],
}

impl<'a> SystemContext<'a> {
    /// Create a context for one system call.
    #[must_use]
    pub fn new(tick_id: u64, dt: f64, entities: &'a [Entity], world: &'a mut World) -> Self {
        Self {
            tick_id,
            dt,
            world,
            entities,
        }
    }

    /// The entities matching this system at the start of its update, in
    /// ascending ID order.
    ///
    /// The returned slice does not borrow the context, so it can be iterated
    /// while `world` is mutated.
    #[must_use]
    pub fn entities(&self) -> &'a [Entity] {
        self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let mut world = World::new();
        let e = world.create_entity();
        let entities = [e];
        let ctx = SystemContext::new(3, 0.016, &entities, &mut world);
        assert_eq!(ctx.tick_id, 3);
        assert!((ctx.dt - 0.016).abs() < f64::EPSILON);
        assert_eq!(ctx.entities(), &[e]);
    }

    #[test]
    fn test_entities_outlive_world_borrow() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let entities = [a, b];
        let mut ctx = SystemContext::new(1, 0.0, &entities, &mut world);
        for &entity in ctx.entities() {
            ctx.world.queue_destruction(entity);
        }
        assert_eq!(world.pending_destruction(), &[a, b]);
    }
}
