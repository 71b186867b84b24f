//! Built-in systems of the demo scene.

use anyhow::Result;
use engine_component::{Component, SystemQuery};
use engine_ecs::{System, SystemContext};
use tracing::debug;

use crate::components::{Lifetime, Position, Sprite, Velocity};

/// Integrates `Velocity` into `Position`.
#[derive(Debug, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn query(&self) -> SystemQuery {
        SystemQuery::all().with::<Position>().with::<Velocity>()
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
        let dt = ctx.dt as f32;
        for &entity in ctx.entities() {
            let Some(velocity) = ctx.world.component::<Velocity>(entity).copied() else {
                continue;
            };
            if let Some(position) = ctx.world.component_mut::<Position>(entity) {
                position.0 += velocity.0 * dt;
            }
        }
        Ok(())
    }
}

/// Counts down `Lifetime` and queues expired entities for destruction.
#[derive(Debug, Default)]
pub struct LifetimeSystem;

impl System for LifetimeSystem {
    fn name(&self) -> &str {
        "lifetime"
    }

    fn query(&self) -> SystemQuery {
        SystemQuery::any().with::<Lifetime>()
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
        let dt = ctx.dt;
        for &entity in ctx.entities() {
            let expired = ctx
                .world
                .component_mut::<Lifetime>(entity)
                .is_some_and(|life| life.tick(dt));
            if expired {
                debug!(%entity, tick_id = ctx.tick_id, "lifetime expired");
                ctx.world.queue_destruction(entity);
            }
        }
        Ok(())
    }
}

/// Tracks drawable entities.
///
/// Its update does nothing: the renderer reads this system's membership set
/// between ticks instead.
#[derive(Debug, Default)]
pub struct RenderSystem;

impl System for RenderSystem {
    fn name(&self) -> &str {
        "render"
    }

    fn query(&self) -> SystemQuery {
        SystemQuery::all()
            .with_id(Position::component_type_id())
            .with_id(Sprite::component_type_id())
    }

    fn update(&mut self, _ctx: &mut SystemContext<'_>) -> Result<()> {
        Ok(())
    }
}
