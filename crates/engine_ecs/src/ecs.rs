//! The [`Ecs`] facade: world storage plus registered systems.
//!
//! ## Tick Lifecycle
//!
//! [`Ecs::update`] performs one tick:
//!
//! 1. Advance the tick counter.
//! 2. For each system, in registration order: snapshot its membership set
//!    and call [`System::update`] with that snapshot and the world.
//! 3. Drain the pending-destruction queue in request order.
//!
//! If a system returns an error, the remaining systems are skipped for this
//! tick, step 3 still runs, and the error is then returned.

use std::collections::BTreeSet;

use engine_component::Entity;
use tracing::{debug, info, warn};

use crate::context::SystemContext;
use crate::error::EcsError;
use crate::registry::{SystemId, SystemRegistry};
use crate::system::System;
use crate::world::World;

/// World state and the ordered set of systems that run over it.
#[derive(Debug, Default)]
pub struct Ecs {
    /// Number of completed or in-progress ticks.
    tick_id: u64,
    /// Entities, components, membership index, destruction queue.
    world: World,
    /// Registered systems, in run order.
    systems: SystemRegistry,
}

impl Ecs {
    /// Create an ECS with an empty world and no systems.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current tick counter (0 before the first update).
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns a mutable reference to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns a reference to the system registry.
    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Register a system and backfill its membership from every live entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EmptyTargetTypes`] if the system's query has no
    /// target types. The system is dropped and nothing is registered.
    pub fn register_system<S: System + 'static>(
        &mut self,
        system: S,
    ) -> Result<SystemId, EcsError> {
        self.register_boxed(Box::new(system))
    }

    /// Register an already boxed system. See [`Ecs::register_system`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EmptyTargetTypes`] for a query with no targets.
    pub fn register_boxed(&mut self, system: Box<dyn System>) -> Result<SystemId, EcsError> {
        let name = system.name().to_string();
        let query = system.query();
        if query.is_empty() {
            warn!(system = %name, "rejected system without target types");
            return Err(EcsError::EmptyTargetTypes { system: name });
        }

        let policy = query.match_policy();
        let targets = query.targets().len();
        let id = self.systems.register(system);
        let members = self.world.add_membership(id, query);

        info!(
            system_id = %id,
            name = %name,
            ?policy,
            targets,
            members,
            "registered system"
        );
        Ok(id)
    }

    /// Unregister a system and drop its membership set.
    ///
    /// Entities and their components are unaffected. Returns the system if
    /// it was registered.
    pub fn unregister_system(&mut self, id: SystemId) -> Option<Box<dyn System>> {
        self.world.remove_membership(id);
        let system = self.systems.unregister(id)?;
        info!(system_id = %id, name = system.name(), "unregistered system");
        Some(system)
    }

    /// The cached set of entities matching a registered system.
    ///
    /// Returns `None` for an unregistered system. This is a read-only query
    /// and is the intended way for renderers and other collaborators to
    /// inspect a system's entities between ticks.
    #[must_use]
    pub fn matching_entities(&self, id: SystemId) -> Option<&BTreeSet<Entity>> {
        self.world.matching_entities(id)
    }

    /// Run one tick: every system in registration order, then the
    /// destruction drain.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemFailed`] for the first system whose update
    /// fails. Later systems are skipped for this tick; queued destruction
    /// still happens before the error is returned.
    pub fn update(&mut self, dt: f64) -> Result<(), EcsError> {
        self.tick_id += 1;
        let tick_id = self.tick_id;

        debug!(tick_id, dt, systems = self.systems.system_count(), "tick start");

        let mut failure = None;
        for registered in self.systems.iter_mut() {
            let entities: Vec<Entity> = self
                .world
                .matching_entities(registered.id)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default();

            let mut ctx = SystemContext::new(tick_id, dt, &entities, &mut self.world);
            if let Err(source) = registered.system.update(&mut ctx) {
                warn!(
                    tick_id,
                    system = %registered.name,
                    error = %source,
                    "system failed; skipping remaining systems this tick"
                );
                failure = Some(EcsError::SystemFailed {
                    system: registered.name.clone(),
                    tick_id,
                    source,
                });
                break;
            }
        }

        let destroyed = self.world.flush_destruction();
        debug!(tick_id, destroyed, "tick end");

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
