//! Scene / actor layer on top of the ECS.
//!
//! An [`Actor`] is a logic object with a per-tick callback. Actors are not
//! components: they live in a side table keyed by entity, shared between the
//! [`Scene`] (which inserts them) and the [`ActorSystem`] (which calls them
//! for every entity carrying an [`ActorTag`]). The ECS knows nothing of the
//! table, so the actor system drops entries whose entity has been destroyed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Context, Result};
use engine_component::{Component, Entity, SystemQuery};
use engine_ecs::{Ecs, EcsError, System, SystemContext, SystemId, World};
use glam::Vec2;
use tracing::{debug, info};

use crate::components::{ActorTag, Lifetime, Position, Sprite, Velocity};
use crate::systems::{LifetimeSystem, MovementSystem, RenderSystem};

/// Per-entity logic driven once per tick by the [`ActorSystem`].
pub trait Actor {
    /// Called once per tick while the entity is alive and tagged.
    fn update(&mut self, entity: Entity, world: &mut World, dt: f64) -> Result<()>;
}

/// Entity → actor side table.
pub type ActorTable = Rc<RefCell<HashMap<Entity, Box<dyn Actor>>>>;

/// Calls each tagged entity's actor.
pub struct ActorSystem {
    actors: ActorTable,
}

impl ActorSystem {
    /// A system driving the actors in `actors`.
    #[must_use]
    pub fn new(actors: ActorTable) -> Self {
        Self { actors }
    }
}

impl System for ActorSystem {
    fn name(&self) -> &str {
        "actors"
    }

    fn query(&self) -> SystemQuery {
        SystemQuery::any().with::<ActorTag>()
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
        let mut actors = self.actors.borrow_mut();

        let before = actors.len();
        actors.retain(|entity, _| ctx.world.contains(*entity));
        let pruned = before - actors.len();
        if pruned > 0 {
            debug!(pruned, "dropped actors of destroyed entities");
        }

        for &entity in ctx.entities() {
            if let Some(actor) = actors.get_mut(&entity) {
                actor
                    .update(entity, ctx.world, ctx.dt)
                    .with_context(|| format!("actor of {entity} failed"))?;
            }
        }
        Ok(())
    }
}

/// The demo scene: actor table plus the handles of its systems.
pub struct Scene {
    actors: ActorTable,
    actor_system: SystemId,
    render_system: SystemId,
}

impl Scene {
    /// Register the scene's systems on `ecs`, in run order: actors,
    /// movement, lifetime, render.
    ///
    /// # Errors
    ///
    /// Propagates registration errors.
    pub fn install(ecs: &mut Ecs) -> Result<Self, EcsError> {
        let actors: ActorTable = Rc::default();
        let actor_system = ecs.register_system(ActorSystem::new(Rc::clone(&actors)))?;
        ecs.register_system(MovementSystem)?;
        ecs.register_system(LifetimeSystem)?;
        let render_system = ecs.register_system(RenderSystem)?;
        info!(%actor_system, %render_system, "scene installed");
        Ok(Self {
            actors,
            actor_system,
            render_system,
        })
    }

    /// Handle of the actor system.
    #[must_use]
    pub fn actor_system(&self) -> SystemId {
        self.actor_system
    }

    /// Handle of the render system, whose membership is what gets drawn.
    #[must_use]
    pub fn render_system(&self) -> SystemId {
        self.render_system
    }

    /// Number of actors currently in the side table.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.borrow().len()
    }

    /// Create an entity driven by `actor`.
    pub fn spawn_actor(&self, world: &mut World, actor: impl Actor + 'static) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, ActorTag);
        self.actors.borrow_mut().insert(entity, Box::new(actor));
        entity
    }
}

/// Turns its velocity by a fixed angular rate, tracing a circle.
#[derive(Debug)]
pub struct Wanderer {
    /// Radians per second.
    pub turn_rate: f32,
}

impl Actor for Wanderer {
    fn update(&mut self, entity: Entity, world: &mut World, dt: f64) -> Result<()> {
        if let Some(velocity) = world.component_mut::<Velocity>(entity) {
            let rotation = Vec2::from_angle(self.turn_rate * dt as f32);
            velocity.0 = rotation.rotate(velocity.0);
        }
        Ok(())
    }
}

/// Toggles its [`Sprite`] every `period` ticks, entering and leaving the
/// render set.
#[derive(Debug)]
pub struct Blinker {
    /// Ticks between toggles.
    pub period: u32,
    /// The glyph shown while visible.
    pub glyph: char,
    counter: u32,
}

impl Blinker {
    /// A blinker that starts visible.
    #[must_use]
    pub fn new(period: u32, glyph: char) -> Self {
        Self {
            period: period.max(1),
            glyph,
            counter: 0,
        }
    }
}

impl Actor for Blinker {
    fn update(&mut self, entity: Entity, world: &mut World, _dt: f64) -> Result<()> {
        self.counter += 1;
        if self.counter < self.period {
            return Ok(());
        }
        self.counter = 0;
        if world.has_component::<Sprite>(entity) {
            world.remove_component_by_id(entity, Sprite::component_type_id());
        } else {
            world.add_component(entity, Sprite { glyph: self.glyph });
        }
        Ok(())
    }
}

/// Populate `scene` with `count` actors laid out on a ring.
///
/// Every third actor blinks, every fourth is short-lived, the rest wander.
pub fn populate(scene: &Scene, world: &mut World, count: usize, bounds: Vec2) {
    let center = bounds * 0.5;
    let radius = bounds.min_element() * 0.35;
    for i in 0..count {
        let angle = i as f32 / count.max(1) as f32 * std::f32::consts::TAU;
        let offset = Vec2::from_angle(angle) * radius;
        let mut glyph = char::from(b'a' + (i % 26) as u8);

        let entity = if i % 3 == 2 {
            glyph = glyph.to_ascii_uppercase();
            scene.spawn_actor(world, Blinker::new(10, glyph))
        } else {
            scene.spawn_actor(world, Wanderer { turn_rate: 1.5 })
        };
        world.add_component(entity, Position(center + offset));
        world.add_component(entity, Velocity(offset.perp().normalize_or_zero() * 4.0));
        world.add_component(entity, Sprite { glyph });
        if i % 4 == 3 {
            world.add_component(entity, Lifetime::new(1.0 + i as f64 * 0.25));
        }
    }
}
