use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::tag::Tag;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsBody;

/// Fat Entity: one struct per game object, no component storage.
/// Every entity carries a gameplay `Tag`; the body handle is a non-owning
/// reference into the physics world, which owns the body's lifetime.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Gameplay kind used for contact classification.
    pub tag: Tag,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in world space (Y up), synced from the body each step.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Linear velocity, synced from the body each step.
    pub vel: Vec2,
    /// Half-extents of the entity's box in world units.
    pub half_extents: Vec2,
    /// Physics body (requires the "physics" feature).
    #[cfg(feature = "physics")]
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID and tag at the origin.
    pub fn new(id: EntityId, tag: Tag) -> Self {
        Self {
            id,
            tag,
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            vel: Vec2::ZERO,
            half_extents: Vec2::splat(0.5),
            #[cfg(feature = "physics")]
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_half_extents(mut self, half_extents: Vec2) -> Self {
        self.half_extents = half_extents;
        self
    }

    #[cfg(feature = "physics")]
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
