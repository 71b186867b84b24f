//! Per-entity component storage.
//!
//! A [`ComponentContainer`] maps each [`ComponentTypeId`] to exactly one
//! type-erased component value. Adding a component whose type is already
//! present replaces the old value (last write wins).

use std::any::Any;
use std::collections::HashMap;

use crate::component::{Component, ComponentTypeId};

/// Type-erased component value as stored in a container.
pub type BoxedComponent = Box<dyn Any + Send + Sync>;

/// The components owned by a single entity, keyed by component type.
#[derive(Default)]
pub struct ComponentContainer {
    components: HashMap<ComponentTypeId, BoxedComponent>,
}

impl ComponentContainer {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
        }
    }

    /// Store `component` under its type, overwriting any existing value of
    /// the same type.
    ///
    /// Returns `true` if a previous value was replaced.
    pub fn add<T: Component>(&mut self, component: T) -> bool {
        self.components
            .insert(T::component_type_id(), Box::new(component))
            .is_some()
    }

    /// Typed read access.
    ///
    /// Returns `None` if the type is absent, or if the stored value under the
    /// same [`ComponentTypeId`] is of a different Rust type.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components
            .get(&T::component_type_id())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Typed mutable access.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&T::component_type_id())
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// Untyped read access by identifier.
    #[must_use]
    pub fn get_by_id(&self, type_id: ComponentTypeId) -> Option<&(dyn Any + Send + Sync)> {
        self.components.get(&type_id).map(|boxed| &**boxed)
    }

    /// Returns `true` if a component of type `T` is present.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.has_id(T::component_type_id())
    }

    /// Returns `true` if a component with the given type identifier is present.
    #[must_use]
    pub fn has_id(&self, type_id: ComponentTypeId) -> bool {
        self.components.contains_key(&type_id)
    }

    /// Returns `true` iff every type in `type_ids` is present.
    ///
    /// Stops at the first missing type. An empty slice is trivially satisfied.
    #[must_use]
    pub fn has_all(&self, type_ids: &[ComponentTypeId]) -> bool {
        type_ids.iter().all(|ty| self.has_id(*ty))
    }

    /// Returns `true` iff at least one type in `type_ids` is present.
    ///
    /// Stops at the first hit.
    #[must_use]
    pub fn has_any(&self, type_ids: &[ComponentTypeId]) -> bool {
        type_ids.iter().any(|ty| self.has_id(*ty))
    }

    /// Remove and return the component of type `T`, if present.
    ///
    /// If a value of another Rust type occupies the slot, it is left in place
    /// and `None` is returned.
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        let type_id = T::component_type_id();
        if !self
            .components
            .get(&type_id)
            .is_some_and(|boxed| boxed.is::<T>())
        {
            return None;
        }
        self.components
            .remove(&type_id)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Remove the component with the given type identifier.
    ///
    /// Returns `true` if something was removed; a missing type is a no-op.
    pub fn remove_by_id(&mut self, type_id: ComponentTypeId) -> bool {
        self.components.remove(&type_id).is_some()
    }

    /// Iterate over the type identifiers currently present.
    pub fn component_types(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.components.keys().copied()
    }

    /// Returns the number of components held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the container holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl std::fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.components.keys().collect();
        types.sort();
        f.debug_struct("ComponentContainer")
            .field("types", &types)
            .finish()
    }
}
