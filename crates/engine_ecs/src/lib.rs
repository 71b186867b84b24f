//! # engine_ecs
//!
//! The registry half of the ECS: world storage, systems, and the tick.
//!
//! This crate provides:
//!
//! - [`World`]: entity containers, the incrementally maintained membership
//!   index, and the pending-destruction queue.
//! - [`System`] trait, [`SystemContext`], and the closure-backed [`FnSystem`].
//! - [`SystemRegistry`]: registered systems in run order.
//! - [`Ecs`]: registration, membership queries, and [`Ecs::update`].
//! - [`TickLoop`]: fixed-timestep driver for an [`Ecs`].
//!
//! ## Usage
//!
//! ```rust
//! use engine_component::{Component, SystemQuery};
//! use engine_ecs::{Ecs, FnSystem, SystemConfig};
//!
//! struct Lifetime(f64);
//! impl Component for Lifetime {
//!     fn type_name() -> &'static str { "Lifetime" }
//! }
//!
//! let mut ecs = Ecs::new();
//! let expire = ecs
//!     .register_system(FnSystem::new(
//!         SystemConfig::new("expire", SystemQuery::any().with::<Lifetime>()),
//!         |ctx| {
//!             for &entity in ctx.entities() {
//!                 let Some(life) = ctx.world.component_mut::<Lifetime>(entity) else {
//!                     continue;
//!                 };
//!                 life.0 -= ctx.dt;
//!                 if life.0 <= 0.0 {
//!                     ctx.world.queue_destruction(entity);
//!                 }
//!             }
//!             Ok(())
//!         },
//!     ))
//!     .unwrap();
//!
//! let e = ecs.world_mut().create_entity();
//! ecs.world_mut().add_component(e, Lifetime(0.5));
//! assert!(ecs.matching_entities(expire).unwrap().contains(&e));
//!
//! ecs.update(1.0).unwrap();
//! assert!(!ecs.world().contains(e));
//! ```

pub mod config;
pub mod context;
pub mod ecs;
pub mod error;
pub mod registry;
pub mod system;
pub mod tick;
pub mod world;

pub use config::SystemConfig;
pub use context::SystemContext;
pub use ecs::Ecs;
pub use error::EcsError;
pub use registry::{RegisteredSystem, SystemId, SystemRegistry};
pub use system::{FnSystem, System};
pub use tick::{TickConfig, TickLoop};
pub use world::World;
