use crate::core::scene::Scene;
use crate::api::types::{EntityId, SoundEvent, GameEvent};
use crate::input::queue::InputQueue;
use crate::bridge::protocol::STATE_FLOATS;
#[cfg(feature = "physics")]
use crate::api::types::TouchingPair;
#[cfg(feature = "physics")]
use crate::core::physics::{PhysicsWorld, BodyDesc, ColliderMaterial};
#[cfg(feature = "physics")]
use crate::components::entity::Entity;
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Gravity vector for physics simulation. Y is up, so the default
    /// (0, -9.81) pulls downward.
    pub gravity: Vec2,
    /// Solver velocity iterations per step (default: 6).
    pub velocity_iterations: usize,
    /// Solver position (stabilization) iterations per step (default: 2).
    pub position_iterations: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            gravity: Vec2::new(0.0, -9.81),
            velocity_iterations: 6,
            position_iterations: 2,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed-step tick. Step physics, react to contacts, apply input.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Fill the player state block read by the host. Called once per frame
    /// after the last update.
    fn write_state(&self, _ctx: &EngineContext, _out: &mut [f32; STATE_FLOATS]) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    touching: Vec<TouchingPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Create an EngineContext whose physics world follows the given config.
    pub fn from_config(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let physics = {
            let mut world = PhysicsWorld::new(config.gravity);
            world.set_dt(config.fixed_dt);
            world.set_iterations(config.velocity_iterations, config.position_iterations);
            world
        };
        #[cfg(not(feature = "physics"))]
        let _ = config;

        Self {
            scene: Scene::new(),
            sounds: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            #[cfg(feature = "physics")]
            physics,
            #[cfg(feature = "physics")]
            touching: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a sound event to be forwarded to the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position and rotation are taken from the BodyDesc.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_half_extents(desc.half_extents)
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Tear down the level: every entity and every body goes.
    /// Entity IDs restart from 1.
    #[cfg(feature = "physics")]
    pub fn clear_world(&mut self) {
        self.scene.clear();
        self.physics.clear();
        self.touching.clear();
        self.next_id = 1;
    }

    /// Apply an instantaneous impulse to an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) {
        if let Some(entity) = self.scene.get(id) {
            if let Some(body) = &entity.body {
                self.physics.apply_impulse(body, impulse);
            }
        }
    }

    /// Set the linear velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(entity) = self.scene.get(id) {
            if let Some(body) = &entity.body {
                self.physics.set_velocity(body, vel);
            }
        }
    }

    /// Get the linear velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Teleport an entity's body. Velocity is kept.
    #[cfg(feature = "physics")]
    pub fn teleport(&mut self, id: EntityId, pos: Vec2) {
        if let Some(entity) = self.scene.get_mut(id) {
            if let Some(body) = &entity.body {
                self.physics.set_position(body, pos);
            }
            entity.pos = pos;
        }
    }

    /// Change the friction of an entity's collider.
    #[cfg(feature = "physics")]
    pub fn set_friction(&mut self, id: EntityId, friction: f32) {
        if let Some(entity) = self.scene.get(id) {
            if let Some(body) = &entity.body {
                self.physics.set_friction(body, friction);
            }
        }
    }

    /// Enable or disable an entity and its body. Disabled entities are
    /// skipped by gameplay and their bodies stop reporting contacts.
    #[cfg(feature = "physics")]
    pub fn set_enabled(&mut self, id: EntityId, enabled: bool) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.active = enabled;
            if let Some(body) = &entity.body {
                self.physics.set_enabled(body, enabled);
            }
        }
    }

    /// Pairs touching after the most recent physics step.
    #[cfg(feature = "physics")]
    pub fn touching_pairs(&self) -> &[TouchingPair] {
        &self.touching
    }

    /// Step the physics simulation, sync positions and velocities back to
    /// entities and refresh the touching-pair list.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.physics.step();

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
                entity.vel = self.physics.velocity(body);
            }
        }

        self.touching.clear();
        self.physics.touching_pairs_into(&mut self.touching);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
