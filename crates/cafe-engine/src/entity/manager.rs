use std::collections::BTreeMap;
use std::num::NonZeroU32;

use super::components::{Tag, Transform};
use super::entity::{Entity, EntityId};

/// Owns entities; iteration follows creation order.
#[derive(Debug)]
pub struct EntityManager {
    next_id: NonZeroU32,
    entities: BTreeMap<EntityId, Entity>,
    pending_destroy: Vec<EntityId>,
}

impl Default for EntityManager {
    fn default() -> Self {
        Self {
            next_id: NonZeroU32::MIN,
            entities: BTreeMap::new(),
            pending_destroy: Vec::new(),
        }
    }
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entity. An empty name becomes `entity_<id>`.
    pub fn create(&mut self, name: &str) -> &mut Entity {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let name = if name.is_empty() {
            format!("entity_{}", id.get())
        } else {
            name.to_string()
        };
        self.entities.entry(id).or_insert_with(|| Entity::new(id, name))
    }

    /// Queues `id` for removal at the next [`process_pending_destroys`](Self::process_pending_destroys).
    ///
    /// The entity stays reachable until then.
    pub fn destroy(&mut self, id: EntityId) {
        if !self.pending_destroy.contains(&id) {
            self.pending_destroy.push(id);
        }
    }

    pub fn is_pending_destroy(&self, id: EntityId) -> bool {
        self.pending_destroy.contains(&id)
    }

    /// Removes every queued entity. Returns how many were removed.
    pub fn process_pending_destroys(&mut self) -> usize {
        let mut removed = 0;
        for id in self.pending_destroy.drain(..) {
            if self.entities.remove(&id).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            log::debug!("destroyed {removed} entities");
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// First entity with `name`, in creation order.
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.values_mut().find(|e| e.name() == name)
    }

    /// Entities carrying a component of type `T`, active or not.
    pub fn with<T: 'static>(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.has::<T>())
    }

    /// Ids of entities whose [`Tag`] equals `tag`.
    pub fn with_tag(&self, tag: &str) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.get::<Tag>().is_some_and(|t| t.0 == tag))
            .map(Entity::id)
            .collect()
    }

    /// Calls `f` for every active entity with an enabled `T`.
    pub fn each_mut<T: 'static>(&mut self, mut f: impl FnMut(EntityId, &mut Transform, &mut T)) {
        for (id, entity) in self.entities.iter_mut() {
            if !entity.is_active() {
                continue;
            }
            if let Some((transform, component)) = entity.split_mut::<T>() {
                f(*id, transform, component);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Removes every entity immediately, including queued ones.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_destroy.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    struct Velocity(Vec2);

    #[test]
    fn ids_are_unique_and_names_default() {
        let mut em = EntityManager::new();
        let a = em.create("player").id();
        let b = em.create("").id();

        assert_ne!(a, b);
        assert_eq!(em.get(b).unwrap().name(), format!("entity_{}", b.get()));
        assert_eq!(em.find("player").map(Entity::id), Some(a));
        assert_eq!(em.len(), 2);
    }

    #[test]
    fn destroy_is_deferred_until_processed() {
        let mut em = EntityManager::new();
        let id = em.create("crate").id();

        em.destroy(id);
        em.destroy(id);
        assert!(em.get(id).is_some());
        assert!(em.is_pending_destroy(id));

        assert_eq!(em.process_pending_destroys(), 1);
        assert!(em.get(id).is_none());
        assert_eq!(em.process_pending_destroys(), 0);
    }

    #[test]
    fn each_mut_skips_inactive_entities_and_disabled_components() {
        let mut em = EntityManager::new();
        for name in ["a", "b", "c", "d"] {
            em.create(name).add(Velocity(Vec2::new(1.0, 2.0)));
        }
        em.find_mut("b").unwrap().set_active(false);
        em.find_mut("c").unwrap().set_enabled::<Velocity>(false);
        em.create("static");

        let mut moved = Vec::new();
        em.each_mut::<Velocity>(|id, transform, velocity| {
            transform.translate(velocity.0);
            moved.push(id);
        });

        assert_eq!(moved.len(), 2);
        assert_eq!(em.find("a").unwrap().transform.position, Vec2::new(1.0, 2.0));
        assert_eq!(em.find("b").unwrap().transform.position, Vec2::zero());
        assert_eq!(em.with::<Velocity>().count(), 4);
    }

    #[test]
    fn tags_select_entities() {
        let mut em = EntityManager::new();
        let goblin = em.create("goblin").add(Tag::new("enemy")).id();
        em.create("chest").add(Tag::new("loot"));
        let orc = em.create("orc").add(Tag::new("enemy")).id();

        assert_eq!(em.with_tag("enemy"), vec![goblin, orc]);
        assert!(em.with_tag("npc").is_empty());
    }
}
