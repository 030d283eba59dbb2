use crate::coords::{Rect, Vec2};

/// Position, scale and rotation. Every entity has one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    /// Radians.
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.position = self.position + delta;
    }
}

/// Free-form label used by [`EntityManager::with_tag`](super::EntityManager::with_tag).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag(pub String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

/// Axis-aligned collision box centered on the transform position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxCollider {
    /// Offset from the transform position.
    pub offset: Vec2,
    pub size: Vec2,
    /// Triggers report overlap but do not block movement.
    pub is_trigger: bool,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self {
            offset: Vec2::zero(),
            size: Vec2::new(32.0, 32.0),
            is_trigger: false,
        }
    }
}

impl BoxCollider {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// World-space bounds for an entity at `transform`.
    pub fn bounds(&self, transform: &Transform) -> Rect {
        Rect::centered(transform.position + self.offset, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collider_bounds_follow_the_transform() {
        let mut t = Transform::at(Vec2::new(100.0, 50.0));
        let c = BoxCollider {
            offset: Vec2::new(0.0, 8.0),
            ..BoxCollider::new(Vec2::new(20.0, 10.0))
        };
        assert_eq!(c.bounds(&t), Rect::new(90.0, 53.0, 20.0, 10.0));

        t.translate(Vec2::new(-10.0, 0.0));
        assert_eq!(c.bounds(&t).origin, Vec2::new(80.0, 53.0));
    }
}
