use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;

use crate::coords::Rect;

use super::components::{BoxCollider, Transform};

/// Stable entity identifier, unique within one [`EntityManager`](super::EntityManager).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(NonZeroU32);

impl EntityId {
    pub(super) fn new(raw: NonZeroU32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Slot {
    enabled: bool,
    value: Box<dyn Any>,
}

/// Game object: identity, a transform and a type-keyed component set.
pub struct Entity {
    id: EntityId,
    name: String,
    active: bool,
    pub transform: Transform,
    components: HashMap<TypeId, Slot>,
}

impl Entity {
    pub(super) fn new(id: EntityId, name: String) -> Self {
        Self {
            id,
            name,
            active: true,
            transform: Transform::default(),
            components: HashMap::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Inactive entities are skipped by [`EntityManager::each_mut`](super::EntityManager::each_mut).
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Attaches `component` unless one of the same type is already attached.
    ///
    /// An existing component is kept as is.
    pub fn add<T: 'static>(&mut self, component: T) -> &mut Self {
        self.components.entry(TypeId::of::<T>()).or_insert_with(|| Slot {
            enabled: true,
            value: Box::new(component),
        });
        self
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_mut::<T>())
    }

    pub fn has<T: 'static>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<T>())
    }

    /// Detaches and returns the component of type `T`.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        let slot = self.components.remove(&TypeId::of::<T>())?;
        slot.value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Disabled components stay attached but are skipped by iteration.
    pub fn set_enabled<T: 'static>(&mut self, enabled: bool) {
        if let Some(slot) = self.components.get_mut(&TypeId::of::<T>()) {
            slot.enabled = enabled;
        }
    }

    pub fn is_enabled<T: 'static>(&self) -> bool {
        self.components
            .get(&TypeId::of::<T>())
            .is_some_and(|slot| slot.enabled)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// World bounds of the attached [`BoxCollider`], if any.
    pub fn collider_bounds(&self) -> Option<Rect> {
        self.get::<BoxCollider>().map(|c| c.bounds(&self.transform))
    }

    /// Transform and an enabled `T` borrowed together.
    pub(super) fn split_mut<T: 'static>(&mut self) -> Option<(&mut Transform, &mut T)> {
        let slot = self.components.get_mut(&TypeId::of::<T>())?;
        if !slot.enabled {
            return None;
        }
        let component = slot.value.downcast_mut::<T>()?;
        Some((&mut self.transform, component))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.active)
            .field("transform", &self.transform)
            .field("components", &self.components.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::entity::Tag;

    #[derive(Debug, PartialEq)]
    struct Health(i32);

    fn entity() -> Entity {
        Entity::new(EntityId::new(NonZeroU32::MIN), "hero".into())
    }

    #[test]
    fn add_keeps_the_first_component_of_a_type() {
        let mut e = entity();
        e.add(Health(10)).add(Health(99)).add(Tag::new("player"));

        assert_eq!(e.get::<Health>(), Some(&Health(10)));
        assert_eq!(e.component_count(), 2);
    }

    #[test]
    fn remove_hands_the_component_back() {
        let mut e = entity();
        e.add(Health(3));
        e.get_mut::<Health>().unwrap().0 -= 1;

        assert_eq!(e.remove::<Health>(), Some(Health(2)));
        assert!(!e.has::<Health>());
        assert_eq!(e.remove::<Health>(), None);
    }

    #[test]
    fn disabled_components_are_not_split_out() {
        let mut e = entity();
        e.add(Health(1));
        e.set_enabled::<Health>(false);

        assert!(!e.is_enabled::<Health>());
        assert!(e.split_mut::<Health>().is_none());
        assert!(e.get::<Health>().is_some());
    }

    #[test]
    fn collider_bounds_need_a_collider() {
        let mut e = entity();
        assert_eq!(e.collider_bounds(), None);

        e.transform.position = Vec2::new(16.0, 16.0);
        e.add(BoxCollider::default());
        assert_eq!(e.collider_bounds(), Some(Rect::new(0.0, 0.0, 32.0, 32.0)));
    }
}
