//! Back-and-forth motion between two endpoints on one axis.
//!
//! Ground enemies accelerate with impulses and are clamped to their speed;
//! moving platforms have their velocity assigned outright. Both share the
//! same endpoint latch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Multiplier on the enemy's horizontal velocity for the push it gives the player.
pub const KNOCKBACK_SCALE: f32 = 5.0;
/// The vertical component of a knockback is vx divided by this, sign kept.
pub const KNOCKBACK_LIFT_DIVISOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    X,
    Y,
}

impl Axis {
    /// Component of `v` along this axis.
    pub fn component(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// A vector with `value` on this axis and zero on the other.
    pub fn vector(self, value: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(value, 0.0),
            Axis::Y => Vec2::new(0.0, value),
        }
    }

    /// Clamp the component of `v` on this axis to `[-cap, cap]`; the other
    /// component is left untouched.
    pub fn clamp(self, v: Vec2, cap: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(v.x.clamp(-cap, cap), v.y),
            Axis::Y => Vec2::new(v.x, v.y.clamp(-cap, cap)),
        }
    }
}

/// How a controller turns a direction into motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drive {
    /// Push with an impulse equal to the speed each tick, then clamp to speed.
    Impulse,
    /// Assign the velocity directly.
    Velocity,
}

/// What the executor should do to the body this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    /// Apply `impulse`, then clamp the velocity on `axis` to `±cap`.
    Impulse { impulse: Vec2, axis: Axis, cap: f32 },
    /// Replace the body's velocity.
    SetVelocity(Vec2),
    /// Degenerate patrol (both endpoints equal): leave the body alone.
    Hold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatrolController {
    axis: Axis,
    start: f32,
    end: f32,
    speed: f32,
    drive: Drive,
    reached_far_end: bool,
}

impl PatrolController {
    pub fn new(axis: Axis, start: f32, end: f32, speed: f32, drive: Drive) -> Self {
        Self {
            axis,
            start,
            end,
            speed: speed.abs(),
            drive,
            reached_far_end: false,
        }
    }

    /// Ground-enemy controller: horizontal, impulse driven.
    pub fn enemy(start: f32, end: f32, speed: f32) -> Self {
        Self::new(Axis::X, start, end, speed, Drive::Impulse)
    }

    /// Moving-platform controller: velocity driven on either axis.
    pub fn platform(axis: Axis, start: f32, end: f32, speed: f32) -> Self {
        Self::new(axis, start, end, speed, Drive::Velocity)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn reached_far_end(&self) -> bool {
        self.reached_far_end
    }

    /// Update the latch from `position` (on the controller's axis) and return
    /// the direction to travel: +1 or -1, or 0 when both endpoints coincide.
    pub fn advance(&mut self, position: f32) -> f32 {
        if self.end > self.start {
            if position >= self.end {
                self.reached_far_end = true;
            }
            if position <= self.start {
                self.reached_far_end = false;
            }
            if self.reached_far_end { -1.0 } else { 1.0 }
        } else if self.start > self.end {
            if position <= self.end {
                self.reached_far_end = true;
            }
            if position >= self.start {
                self.reached_far_end = false;
            }
            if self.reached_far_end { 1.0 } else { -1.0 }
        } else {
            0.0
        }
    }

    /// Advance from the body's position and produce this tick's command.
    pub fn command(&mut self, position: Vec2) -> MotionCommand {
        let dir = self.advance(self.axis.component(position));
        if dir == 0.0 {
            return MotionCommand::Hold;
        }
        match self.drive {
            Drive::Impulse => MotionCommand::Impulse {
                impulse: self.axis.vector(dir * self.speed),
                axis: self.axis,
                cap: self.speed,
            },
            Drive::Velocity => MotionCommand::SetVelocity(self.axis.vector(dir * self.speed)),
        }
    }
}

/// Push a ground enemy gives the player on contact, if the player is ahead
/// of the enemy in the enemy's direction of travel. Scales with the enemy's
/// speed rather than being a fixed knockback; a left-moving enemy also
/// pushes downward.
pub fn knockback_impulse(enemy_pos: Vec2, enemy_vel: Vec2, player_pos: Vec2) -> Option<Vec2> {
    let vx = enemy_vel.x;
    let ahead = (vx > 0.0 && player_pos.x > enemy_pos.x) || (vx < 0.0 && player_pos.x < enemy_pos.x);
    if !ahead {
        return None;
    }
    Some(Vec2::new(KNOCKBACK_SCALE * vx, vx / KNOCKBACK_LIFT_DIVISOR))
}
