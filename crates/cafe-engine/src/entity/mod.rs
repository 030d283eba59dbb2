//! Entities and their components.
//!
//! An [`Entity`] is an id, a name, a [`Transform`] and at most one component
//! of each Rust type. [`EntityManager`] owns the entities of one scene and
//! defers destruction until [`EntityManager::process_pending_destroys`], so
//! game code can destroy while iterating.

mod components;
mod entity;
mod manager;

pub use components::{BoxCollider, Tag, Transform};
pub use entity::{Entity, EntityId};
pub use manager::EntityManager;
