//! # engine_component
//!
//! The "E" and "C" in ECS: what an entity is, what a component is, and how
//! one entity's components are stored.
//!
//! This crate provides:
//!
//! - [`Entity`]: lightweight `u64` entity identifiers.
//! - [`EntityAllocator`]: monotonically increasing, never-recycled ID allocator.
//! - [`Component`] trait and [`ComponentTypeId`]: the storage key of a component.
//! - [`ComponentContainer`]: at most one component per type, per entity.
//! - [`SystemQuery`] / [`MatchPolicy`]: the ANY/ALL target declaration of a system.

pub mod component;
pub mod container;
pub mod entity;
pub mod query;

pub use component::{Component, ComponentTypeId};
pub use container::{BoxedComponent, ComponentContainer};
pub use entity::{Entity, EntityAllocator};
pub use query::{MatchPolicy, SystemQuery};
