use crate::api::game::EngineContext;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::components::tag::{Ability, Tag};
use crate::core::physics::{BodyDesc, ColliderMaterial};
use crate::gameplay::patrol::PatrolController;
use crate::level::config::LevelConfig;

/// IDs of the entities the session drives or inspects every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelHandles {
    pub player: EntityId,
    pub enemies: Vec<(EntityId, PatrolController)>,
    pub platforms: Vec<(EntityId, PatrolController)>,
    pub sticky_walls: Vec<EntityId>,
    pub pickups: Vec<(EntityId, Ability)>,
}

/// Spawn every body described by `level` into `ctx`.
///
/// The player is spawned first so it always receives the first ID after
/// a [`EngineContext::clear_world`].
pub fn build_level(ctx: &mut EngineContext, level: &LevelConfig) -> LevelHandles {
    let spawn = &level.player;
    let id = ctx.next_id();
    let player = ctx.spawn_with_body(
        Entity::new(id, Tag::Player),
        BodyDesc::dynamic(spawn.half_extents)
            .with_position(spawn.spawn)
            .with_fixed_rotation(true),
        ColliderMaterial::default(),
    );

    let mut sticky_walls = Vec::new();
    let mut pickups = Vec::new();

    for group in &level.statics {
        let mut material = ColliderMaterial::default();
        if let Some(friction) = group.friction {
            material = material.with_friction(friction);
        }
        if let Some(restitution) = group.restitution {
            material = material.with_restitution(restitution);
        }

        for placement in &group.placements {
            let id = ctx.next_id();
            let desc = BodyDesc::fixed(group.half_extents)
                .with_position(placement.position)
                .with_rotation(placement.angle_deg.to_radians())
                .with_sensor(group.sensor);
            ctx.spawn_with_body(Entity::new(id, group.tag), desc, material);

            match group.tag {
                Tag::StickyWall => sticky_walls.push(id),
                tag => {
                    if let Some(ability) = tag.ability() {
                        pickups.push((id, ability));
                    }
                }
            }
        }
    }

    let enemy_material = ColliderMaterial::default().with_density(level.enemies.density);
    let enemies = level
        .enemies
        .patrols
        .iter()
        .map(|patrol| {
            let id = ctx.next_id();
            ctx.spawn_with_body(
                Entity::new(id, Tag::GroundEnemy),
                BodyDesc::dynamic(level.enemies.half_extents)
                    .with_position(patrol.position)
                    .with_fixed_rotation(true),
                enemy_material,
            );
            let controller = PatrolController::enemy(patrol.start, patrol.end, patrol.speed);
            (id, controller)
        })
        .collect();

    let mut platform_material = ColliderMaterial::default();
    if let Some(friction) = level.moving_platforms.friction {
        platform_material = platform_material.with_friction(friction);
    }
    let platforms = level
        .moving_platforms
        .patrols
        .iter()
        .map(|patrol| {
            let id = ctx.next_id();
            ctx.spawn_with_body(
                Entity::new(id, Tag::MovingPlatform),
                BodyDesc::kinematic(level.moving_platforms.half_extents).with_position(patrol.position),
                platform_material,
            );
            let controller =
                PatrolController::platform(patrol.axis, patrol.start, patrol.end, patrol.speed);
            (id, controller)
        })
        .collect();

    log::info!(
        "Built level '{}': {} entities, {} bodies",
        level.name,
        ctx.scene.len(),
        ctx.physics.body_count()
    );

    LevelHandles {
        player,
        enemies,
        platforms,
        sticky_walls,
        pickups,
    }
}
