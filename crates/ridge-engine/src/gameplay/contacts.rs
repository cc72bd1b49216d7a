//! Per-tick contact dispatch: classify each touching pair by tag and apply
//! the matching gameplay reaction to the player.
//!
//! Damage is gated only by the player's invulnerability window. There is no
//! "contact began" edge, so a body that stays in contact deals one point of
//! damage every time the window lapses (every 2 s), while the hit cue fires
//! on every touching tick.

use glam::Vec2;

use crate::api::types::{EntityId, GameEvent, SoundEvent, TouchingPair};
use crate::components::entity::Entity;
use crate::components::tag::Tag;
use crate::core::scene::Scene;
use crate::gameplay::patrol::knockback_impulse;
use crate::gameplay::player::{Player, PlayerState};

/// Everything a dispatch pass produced besides mutating the player.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContactResolution {
    pub events: Vec<GameEvent>,
    pub sounds: Vec<SoundEvent>,
    /// Impulses to apply to entity bodies (enemy knockback on the player).
    pub impulses: Vec<(EntityId, Vec2)>,
    /// The collectable was touched.
    pub level_completed: bool,
}

/// Resolve every touching pair in backend order.
///
/// Pairs naming an entity missing from `scene`, an inactive entity, or not
/// involving the player are skipped.
pub fn resolve_contacts(
    pairs: &[TouchingPair],
    scene: &Scene,
    player: &mut Player,
    now: f64,
) -> ContactResolution {
    let mut out = ContactResolution::default();

    for pair in pairs {
        let (Some(a), Some(b)) = (scene.get(pair.a), scene.get(pair.b)) else {
            continue;
        };
        if !a.active || !b.active {
            continue;
        }
        let (me, other) = if a.tag == Tag::Player {
            (a, b)
        } else if b.tag == Tag::Player {
            (b, a)
        } else {
            continue;
        };
        react(me, other, player, now, &mut out);
    }

    out
}

fn react(me: &Entity, other: &Entity, player: &mut Player, now: f64, out: &mut ContactResolution) {
    match other.tag {
        Tag::StickyWall => {
            if player.state() != PlayerState::OnWall
                && player.history().prev() != PlayerState::OnWall
                && player.abilities().wall_reset
            {
                player.enter_state(PlayerState::OnWall);
            }
        }
        Tag::MovingPlatform => {
            if player.state() != PlayerState::OnMovingPlatform
                && player.history().prev() != PlayerState::OnMovingPlatform
            {
                player.enter_state(PlayerState::OnMovingPlatform);
            }
        }
        tag if tag.is_damaging() => {
            if tag == Tag::GroundEnemy {
                if let Some(push) = knockback_impulse(other.pos, other.vel, me.pos) {
                    out.impulses.push((me.id, push));
                }
                out.events.push(GameEvent::EnemyHitPlayer);
            }
            damage(player, now, out);
            out.sounds.push(SoundEvent::HIT);
        }
        Tag::AbilityDash | Tag::AbilityDoubleJump | Tag::AbilityWallReset => {
            if let Some(ability) = other.tag.ability() {
                if player.unlock(ability) {
                    out.events.push(GameEvent::AbilityUnlocked(ability));
                    out.sounds.push(SoundEvent::PICKUP);
                }
            }
        }
        Tag::Collectable => out.level_completed = true,
        _ => {}
    }
}

fn damage(player: &mut Player, now: f64, out: &mut ContactResolution) {
    if player.decrement_health(now) {
        out.events.push(GameEvent::DamageTaken {
            health: player.health(),
        });
    }
}
