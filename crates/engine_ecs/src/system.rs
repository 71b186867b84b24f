//! The [`System`] capability contract and the closure-backed [`FnSystem`].

use engine_component::SystemQuery;

use crate::config::SystemConfig;
use crate::context::SystemContext;

/// A unit of per-tick logic that runs over the entities matching its query.
///
/// Systems are registered once with [`Ecs::register_system`](crate::Ecs::register_system)
/// and are then called on every tick, in registration order. They may keep
/// any private state they like (for example an entity → logic-object side
/// table); the ECS only manages their membership set. Systems never touch
/// the membership index directly; it changes only through component
/// add/remove and entity destruction on the [`World`](crate::World).
pub trait System {
    /// Human-readable name, used in logs and errors.
    fn name(&self) -> &str;

    /// The target component types and match policy.
    ///
    /// Read once at registration. Later return values are ignored, so the
    /// query is effectively fixed for the system's lifetime.
    fn query(&self) -> SystemQuery;

    /// Run one tick over `ctx.entities()`.
    ///
    /// # Errors
    ///
    /// Any error aborts the rest of the tick's system loop and is reported
    /// by [`Ecs::update`](crate::Ecs::update) once the destruction queue has
    /// been drained.
    fn update(&mut self, ctx: &mut SystemContext<'_>) -> anyhow::Result<()>;
}

/// A [`System`] backed by a closure.
///
/// ```rust
/// use engine_component::{Component, SystemQuery};
/// use engine_ecs::{Ecs, FnSystem, SystemConfig};
///
/// struct Health(f32);
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
///
/// let mut ecs = Ecs::new();
/// let regen = FnSystem::new(
///     SystemConfig::new("regen", SystemQuery::any().with::<Health>()),
///     |ctx| {
///         for &entity in ctx.entities() {
///             if let Some(health) = ctx.world.component_mut::<Health>(entity) {
///                 health.0 += 1.0;
///             }
///         }
///         Ok(())
///     },
/// );
/// ecs.register_system(regen).unwrap();
/// ```
pub struct FnSystem<F> {
    config: SystemConfig,
    func: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut SystemContext<'_>) -> anyhow::Result<()>,
{
    /// Wrap `func` as a system described by `config`.
    #[must_use]
    pub fn new(config: SystemConfig, func: F) -> Self {
        Self { config, func }
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut SystemContext<'_>) -> anyhow::Result<()>,
{
    fn name(&self) -> &str {
        &self.config.name
    }

    fn query(&self) -> SystemQuery {
        self.config.query.clone()
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> anyhow::Result<()> {
        (self.func)(ctx)
    }
}

impl<F> std::fmt::Debug for FnSystem<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSystem")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
