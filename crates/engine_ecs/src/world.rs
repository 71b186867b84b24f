//! World state: entity containers, the membership index, and the
//! pending-destruction queue.
//!
//! The [`World`] is the single owner and mutator of component data. Every
//! component add/remove resynchronises the touched entity against every
//! registered system query immediately, so each system's membership set is
//! always exactly `{ e : query.matches(container(e)) }`. Nothing is rescanned
//! per tick.
//!
//! Entity destruction comes in two flavours: [`World::queue_destruction`]
//! (deferred until the end of the current tick) and
//! [`World::destroy_immediately`] (for cleanup outside of a tick).

use std::collections::{BTreeSet, HashMap};

use engine_component::{
    Component, ComponentContainer, ComponentTypeId, Entity, EntityAllocator, SystemQuery,
};
use tracing::{debug, trace};

use crate::registry::SystemId;

/// One system's query and its current set of matching entities.
#[derive(Debug)]
struct Membership {
    system: SystemId,
    query: SystemQuery,
    entities: BTreeSet<Entity>,
}

impl Membership {
    /// Re-evaluate one entity against this query.
    fn resync(&mut self, entity: Entity, container: &ComponentContainer) {
        if self.query.matches(container) {
            if self.entities.insert(entity) {
                trace!(system = %self.system, %entity, "entity joined system");
            }
        } else if self.entities.remove(&entity) {
            trace!(system = %self.system, %entity, "entity left system");
        }
    }
}

/// Entity and component storage plus the per-system membership index.
#[derive(Debug, Default)]
pub struct World {
    /// Entity ID allocator. Never recycles.
    allocator: EntityAllocator,
    /// One container per live entity.
    containers: HashMap<Entity, ComponentContainer>,
    /// Membership sets in system registration order.
    memberships: Vec<Membership>,
    /// Entities to destroy at the end of the current tick, in request order.
    pending_destruction: Vec<Entity>,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Allocate a new entity with an empty component container.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.containers.insert(entity, ComponentContainer::new());
        trace!(%entity, "created entity");
        entity
    }

    /// Returns `true` if `entity` is alive.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.containers.contains_key(&entity)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.containers.len()
    }

    /// Returns the number of entity IDs ever issued, destroyed ones included.
    #[must_use]
    pub fn allocated_count(&self) -> u64 {
        self.allocator.count()
    }

    /// Request destruction of `entity` at the end of the current tick.
    ///
    /// Has no immediate effect. Queuing an entity twice, or one that does not
    /// exist, is harmless.
    pub fn queue_destruction(&mut self, entity: Entity) {
        trace!(%entity, "queued entity for destruction");
        self.pending_destruction.push(entity);
    }

    /// Entities waiting for the end-of-tick drain, in request order.
    #[must_use]
    pub fn pending_destruction(&self) -> &[Entity] {
        &self.pending_destruction
    }

    /// Destroy `entity` now: drop its container and remove it from every
    /// system's membership set.
    ///
    /// Meant for cleanup outside of a tick. A system calling this during
    /// `update` still holds the entity in the list it was handed this tick,
    /// and lookups for it will return `None` from then on.
    ///
    /// Returns `true` if the entity existed.
    pub fn destroy_immediately(&mut self, entity: Entity) -> bool {
        if self.containers.remove(&entity).is_none() {
            return false;
        }
        for membership in &mut self.memberships {
            membership.entities.remove(&entity);
        }
        trace!(%entity, "destroyed entity");
        true
    }

    /// Destroy every queued entity in request order and clear the queue.
    ///
    /// Returns how many entities were actually destroyed; duplicates and
    /// unknown entities are skipped.
    pub(crate) fn flush_destruction(&mut self) -> usize {
        if self.pending_destruction.is_empty() {
            return 0;
        }
        let queued = std::mem::take(&mut self.pending_destruction);
        let requested = queued.len();
        let destroyed = queued
            .into_iter()
            .filter(|&entity| self.destroy_immediately(entity))
            .count();
        debug!(requested, destroyed, "drained destruction queue");
        destroyed
    }

    // -- Component operations --

    /// Attach `component` to `entity`, replacing any existing component of
    /// the same type, then resync the entity's membership in every system.
    ///
    /// Returns `false` (and does nothing) if the entity does not exist.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        let Some(container) = self.containers.get_mut(&entity) else {
            trace!(%entity, component = T::type_name(), "add_component on missing entity");
            return false;
        };
        container.add(component);
        resync_entity(&mut self.memberships, entity, container);
        true
    }

    /// Detach and return the component of type `T`, then resync membership.
    ///
    /// Returns `None` if the entity or component is missing.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let container = self.containers.get_mut(&entity)?;
        let removed = container.remove::<T>()?;
        resync_entity(&mut self.memberships, entity, container);
        Some(removed)
    }

    /// Detach a component by type identifier, then resync membership.
    ///
    /// Returns `true` if something was removed.
    pub fn remove_component_by_id(&mut self, entity: Entity, type_id: ComponentTypeId) -> bool {
        let Some(container) = self.containers.get_mut(&entity) else {
            return false;
        };
        if !container.remove_by_id(type_id) {
            return false;
        }
        resync_entity(&mut self.memberships, entity, container);
        true
    }

    /// Read access to all components of an entity.
    #[must_use]
    pub fn components(&self, entity: Entity) -> Option<&ComponentContainer> {
        self.containers.get(&entity)
    }

    /// Typed read access to one component.
    #[must_use]
    pub fn component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.containers.get(&entity)?.get::<T>()
    }

    /// Typed mutable access to one component.
    ///
    /// Editing a component's payload does not change which types the entity
    /// holds, so no membership resync happens here.
    #[must_use]
    pub fn component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.containers.get_mut(&entity)?.get_mut::<T>()
    }

    /// Returns `true` if `entity` is alive and holds a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.containers
            .get(&entity)
            .is_some_and(ComponentContainer::has::<T>)
    }

    // -- Membership index --

    /// The entities currently matching a registered system.
    ///
    /// Returns `None` for a system that is not registered.
    #[must_use]
    pub fn matching_entities(&self, system: SystemId) -> Option<&BTreeSet<Entity>> {
        self.membership(system).map(|m| &m.entities)
    }

    /// Returns `true` if `entity` currently matches `system`.
    #[must_use]
    pub fn is_member(&self, system: SystemId, entity: Entity) -> bool {
        self.membership(system)
            .is_some_and(|m| m.entities.contains(&entity))
    }

    fn membership(&self, system: SystemId) -> Option<&Membership> {
        self.memberships.iter().find(|m| m.system == system)
    }

    /// Start tracking `system`, backfilling its set from every live entity.
    ///
    /// Returns the size of the initial membership set.
    pub(crate) fn add_membership(&mut self, system: SystemId, query: SystemQuery) -> usize {
        let entities: BTreeSet<Entity> = self
            .containers
            .iter()
            .filter(|(_, container)| query.matches(container))
            .map(|(&entity, _)| entity)
            .collect();
        let count = entities.len();
        self.memberships.push(Membership {
            system,
            query,
            entities,
        });
        count
    }

    /// Stop tracking `system`. Entities and containers are untouched.
    pub(crate) fn remove_membership(&mut self, system: SystemId) -> bool {
        let before = self.memberships.len();
        self.memberships.retain(|m| m.system != system);
        self.memberships.len() != before
    }
}

/// Re-evaluate one entity against every system query.
///
/// Free function so the caller can hold a container borrowed from
/// `World::containers` while the membership list is borrowed mutably.
fn resync_entity(memberships: &mut [Membership], entity: Entity, container: &ComponentContainer) {
    for membership in memberships {
        membership.resync(entity, container);
    }
}

#[cfg(test)]
mod tests {
    use engine_component::MatchPolicy;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct A(u32);
    impl Component for A {
        fn type_name() -> &'static str {
            "A"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct B;
    impl Component for B {
        fn type_name() -> &'static str {
            "B"
        }
    }

    /// Checks the membership invariant for every tracked system and entity.
    fn assert_membership_consistent(world: &World) {
        for membership in &world.memberships {
            for (&entity, container) in &world.containers {
                assert_eq!(
                    membership.entities.contains(&entity),
                    membership.query.matches(container),
                    "{entity} out of sync with {}",
                    membership.system
                );
            }
            for entity in &membership.entities {
                assert!(world.contains(*entity), "{entity} is dead but still a member");
            }
        }
    }

    #[test]
    fn test_create_entity_has_empty_container() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(e.is_valid());
        assert!(world.contains(e));
        assert_eq!(world.entity_count(), 1);
        assert!(world.components(e).is_some_and(ComponentContainer::is_empty));
    }

    #[test]
    fn test_ids_never_reused_after_destruction() {
        let mut world = World::new();
        let e1 = world.create_entity();
        assert!(world.destroy_immediately(e1));
        let e2 = world.create_entity();
        assert_ne!(e1, e2);
        assert!(e2 > e1);
        assert_eq!(world.allocated_count(), 2);
    }

    #[test]
    fn test_add_component_to_missing_entity_is_noop() {
        let mut world = World::new();
        assert!(!world.add_component(Entity::from_raw(42), A(1)));
        assert_eq!(world.entity_count(), 0);
        assert!(world.components(Entity::from_raw(42)).is_none());
    }

    #[test]
    fn test_remove_component_from_missing_entity_is_noop() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, A(1));
        let ghost = Entity::from_raw(42);
        assert_eq!(world.remove_component::<A>(ghost), None);
        assert!(!world.remove_component_by_id(ghost, A::component_type_id()));
        assert_eq!(world.component::<A>(e), Some(&A(1)));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_add_component_overwrites() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, A(1));
        world.add_component(e, A(2));
        assert_eq!(world.component::<A>(e), Some(&A(2)));
        assert_eq!(world.components(e).map(ComponentContainer::len), Some(1));
    }

    #[test]
    fn test_membership_follows_add_and_remove() {
        let mut world = World::new();
        let sys = SystemId(1);
        world.add_membership(sys, SystemQuery::all().with::<A>().with::<B>());

        let e = world.create_entity();
        world.add_component(e, A(0));
        assert!(!world.is_member(sys, e));

        world.add_component(e, B);
        assert!(world.is_member(sys, e));

        assert_eq!(world.remove_component::<A>(e), Some(A(0)));
        assert!(!world.is_member(sys, e));
        assert_membership_consistent(&world);
    }

    #[test]
    fn test_remove_component_by_id() {
        let mut world = World::new();
        let sys = SystemId(1);
        world.add_membership(sys, SystemQuery::any().with::<B>());
        let e = world.create_entity();
        world.add_component(e, B);
        assert!(world.is_member(sys, e));
        assert!(world.remove_component_by_id(e, B::component_type_id()));
        assert!(!world.remove_component_by_id(e, B::component_type_id()));
        assert!(!world.is_member(sys, e));
    }

    #[test]
    fn test_component_mut_does_not_touch_membership() {
        let mut world = World::new();
        let sys = SystemId(1);
        world.add_membership(sys, SystemQuery::any().with::<A>());
        let e = world.create_entity();
        world.add_component(e, A(1));
        if let Some(a) = world.component_mut::<A>(e) {
            a.0 = 10;
        }
        assert_eq!(world.component::<A>(e), Some(&A(10)));
        assert!(world.is_member(sys, e));
    }

    #[test]
    fn test_add_membership_backfills() {
        let mut world = World::new();
        let e1 = world.create_entity();
        let e2 = world.create_entity();
        let _e3 = world.create_entity();
        world.add_component(e1, A(1));
        world.add_component(e2, A(2));

        let sys = SystemId(7);
        let count = world.add_membership(sys, SystemQuery::any().with::<A>());
        assert_eq!(count, 2);
        let expected: BTreeSet<Entity> = [e1, e2].into_iter().collect();
        assert_eq!(world.matching_entities(sys), Some(&expected));
    }

    #[test]
    fn test_queue_destruction_is_deferred_and_idempotent() {
        let mut world = World::new();
        let sys = SystemId(1);
        world.add_membership(sys, SystemQuery::any().with::<A>());
        let e = world.create_entity();
        world.add_component(e, A(5));

        world.queue_destruction(e);
        world.queue_destruction(e);
        world.queue_destruction(Entity::from_raw(999));
        assert!(world.contains(e));
        assert!(world.is_member(sys, e));
        assert_eq!(world.pending_destruction().len(), 3);

        assert_eq!(world.flush_destruction(), 1);
        assert!(!world.contains(e));
        assert!(!world.is_member(sys, e));
        assert!(world.pending_destruction().is_empty());
        assert_eq!(world.flush_destruction(), 0);
        assert_membership_consistent(&world);
    }

    #[test]
    fn test_destroy_immediately_purges_all_memberships() {
        let mut world = World::new();
        let any = SystemId(1);
        let all = SystemId(2);
        world.add_membership(any, SystemQuery::any().with::<A>().with::<B>());
        world.add_membership(
            all,
            SystemQuery::any()
                .with::<A>()
                .with::<B>()
                .policy(MatchPolicy::All),
        );
        let e = world.create_entity();
        world.add_component(e, A(1));
        world.add_component(e, B);
        assert!(world.is_member(any, e) && world.is_member(all, e));

        assert!(world.destroy_immediately(e));
        assert!(!world.destroy_immediately(e));
        assert!(!world.is_member(any, e));
        assert!(!world.is_member(all, e));
    }

    #[test]
    fn test_remove_membership_keeps_entities() {
        let mut world = World::new();
        let sys = SystemId(3);
        world.add_membership(sys, SystemQuery::any().with::<A>());
        let e = world.create_entity();
        world.add_component(e, A(1));

        assert!(world.remove_membership(sys));
        assert!(!world.remove_membership(sys));
        assert!(world.matching_entities(sys).is_none());
        assert!(world.has_component::<A>(e));
    }
}
