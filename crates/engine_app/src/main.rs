//! # engine_app: ECS demo
//!
//! Builds a scene of actors on top of the ECS and drives it with the
//! fixed-timestep tick loop, printing a text frame of the render system's
//! entities every few ticks.
//!
//! ## Startup Sequence
//!
//! 1. Parse CLI flags and the optional JSON config file.
//! 2. Install the scene systems (actors, movement, lifetime, render).
//! 3. Spawn the actors.
//! 4. Run the tick loop until the configured tick count is reached.

mod components;
mod config;
mod render;
mod scene;
mod systems;

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_ecs::{Ecs, TickLoop};

use config::{AppConfig, Args};
use scene::Scene;

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let args = Args::parse();
    let config = AppConfig::from_args(&args)?;
    info!(?config, "engine demo starting");

    let mut ecs = Ecs::new();
    let scene = Scene::install(&mut ecs)?;
    let viewport = config.viewport();
    scene::populate(
        &scene,
        ecs.world_mut(),
        config.actors,
        Vec2::new(viewport.width as f32, viewport.height as f32),
    );
    info!(
        actors = scene.actor_count(),
        tagged = ecs.matching_entities(scene.actor_system()).map_or(0, |s| s.len()),
        "scene populated"
    );

    let mut tick_loop = TickLoop::new(config.tick_config(), ecs)?;
    let render_system = scene.render_system();
    tick_loop.run_with(|ecs| {
        if config.render_every == 0 || ecs.tick_id() % config.render_every != 0 {
            return;
        }
        let frame = render::render_frame(ecs, render_system, viewport);
        info!(
            tick_id = ecs.tick_id(),
            visible = ecs.matching_entities(render_system).map_or(0, |s| s.len()),
            "frame\n{frame}"
        );
    })?;

    info!(
        entities = tick_loop.ecs().world().entity_count(),
        actors = scene.actor_count(),
        "engine demo shut down"
    );
    Ok(())
}
