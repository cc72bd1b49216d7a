//! Input-driven transitions of the player state machine.
//!
//! `handle_input` reads only the player's own history and abilities, the
//! body velocity sampled after the physics step, and the tick's key snapshot.
//! It returns the impulse to feed back into the body instead of applying it,
//! so the whole table can be exercised without a physics world.

use glam::Vec2;

use super::{Player, PlayerState};
use crate::input::keys::{Key, KeyInput};

pub const JUMP_IMPULSE: f32 = 11.0;
pub const DOUBLE_JUMP_IMPULSE: f32 = 11.0;
/// |vy| at or below this counts as resting on something.
pub const GROUNDED_TOLERANCE: f32 = 0.05;
pub const WALK_IMPULSE: f32 = 1.0;
pub const WALK_SPEED_CAP: f32 = 6.0;
pub const DASH_IMPULSE: f32 = 8.0;
pub const DASH_SPEED_CAP: f32 = 16.0;
/// A double jump out of a fall is refused once vy drops to this.
pub const DOUBLE_JUMP_FALL_LIMIT: f32 = -25.0;

/// Result of one input evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputOutcome {
    pub state: PlayerState,
    /// Sum of every impulse issued this tick, if any.
    pub impulse: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    fn key(self) -> Key {
        match self {
            Side::Left => Key::Left,
            Side::Right => Key::Right,
        }
    }

    fn moving(self) -> PlayerState {
        match self {
            Side::Left => PlayerState::MovingLeft,
            Side::Right => PlayerState::MovingRight,
        }
    }

    fn dashing(self) -> PlayerState {
        match self {
            Side::Left => PlayerState::DashingLeft,
            Side::Right => PlayerState::DashingRight,
        }
    }
}

/// Impulse accumulator for one tick.
#[derive(Default)]
struct Impulse(Option<Vec2>);

impl Impulse {
    fn add(&mut self, v: Vec2) {
        self.0 = Some(self.0.unwrap_or(Vec2::ZERO) + v);
    }
}

fn up(magnitude: f32) -> Vec2 {
    Vec2::new(0.0, magnitude)
}

impl Player {
    /// Evaluate one tick of input against the current state.
    ///
    /// Simultaneous left and right resolve in favour of right. Wall and
    /// platform attachment are never entered here; see [`Player::enter_state`].
    pub fn handle_input(&mut self, velocity: Vec2, keys: &KeyInput, now: f64) -> InputOutcome {
        let mut impulse = Impulse::default();
        let grounded = velocity.y.abs() <= GROUNDED_TOLERANCE;
        let jump = keys.pressed(Key::Jump);
        let right = keys.held(Key::Right);
        let left = keys.held(Key::Left);
        let double_jump = self.abilities.double_jump;

        match self.state() {
            PlayerState::Standing => {
                let prev = self.history.prev();
                if jump && grounded {
                    self.enter_state(PlayerState::Jumping);
                    impulse.add(up(JUMP_IMPULSE));
                } else if jump && prev == PlayerState::OnWall {
                    self.enter_state(PlayerState::Jumping);
                    impulse.add(up(JUMP_IMPULSE));
                } else if jump
                    && velocity.y > DOUBLE_JUMP_FALL_LIMIT
                    && self.history.second_prev() == PlayerState::Jumping
                    && prev.is_lateral()
                    && double_jump
                {
                    self.enter_state(PlayerState::DoubleJumping);
                    impulse.add(up(DOUBLE_JUMP_IMPULSE));
                } else if right {
                    self.enter_state(PlayerState::MovingRight);
                } else if left {
                    self.enter_state(PlayerState::MovingLeft);
                }
            }
            PlayerState::MovingRight => self.moving(Side::Right, velocity, keys, &mut impulse),
            PlayerState::MovingLeft => self.moving(Side::Left, velocity, keys, &mut impulse),
            PlayerState::DashingRight | PlayerState::DashingLeft => {
                if right {
                    self.enter_state(PlayerState::MovingRight);
                } else if left {
                    self.enter_state(PlayerState::MovingLeft);
                }
            }
            PlayerState::Jumping => {
                if jump && double_jump {
                    self.enter_state(PlayerState::DoubleJumping);
                    impulse.add(up(DOUBLE_JUMP_IMPULSE));
                } else if grounded {
                    self.enter_state(PlayerState::Standing);
                } else if right {
                    self.enter_state(PlayerState::MovingRight);
                } else if left {
                    self.enter_state(PlayerState::MovingLeft);
                }
            }
            PlayerState::DoubleJumping => {
                if grounded {
                    self.enter_state(PlayerState::Standing);
                } else if right {
                    self.enter_state(PlayerState::MovingRight);
                } else if left {
                    self.enter_state(PlayerState::MovingLeft);
                }
            }
            PlayerState::OnWall => {
                if right {
                    self.enter_state(PlayerState::MovingRight);
                } else if left {
                    self.enter_state(PlayerState::MovingLeft);
                }
            }
            PlayerState::OnMovingPlatform => {
                if jump && self.history.prev() != PlayerState::OnMovingPlatform {
                    self.enter_state(PlayerState::Jumping);
                    impulse.add(up(JUMP_IMPULSE));
                } else if right {
                    self.enter_state(PlayerState::MovingRight);
                } else if left {
                    self.enter_state(PlayerState::MovingLeft);
                }
            }
        }

        self.refresh_invulnerability(now);

        InputOutcome {
            state: self.state(),
            impulse: impulse.0,
        }
    }

    /// Lateral movement runs two chains back to back: speed/dash/turn, then
    /// jumps and release. The second chain sees the history the first left.
    fn moving(&mut self, side: Side, velocity: Vec2, keys: &KeyInput, impulse: &mut Impulse) {
        let sign = side.sign();
        // Speed in the direction of travel.
        let forward = velocity.x * sign;
        let side_held = keys.held(side.key());
        let turn = match side {
            Side::Right => keys.held(Key::Left) && !keys.held(Key::Right),
            Side::Left => keys.held(Key::Right),
        };

        if forward <= WALK_SPEED_CAP {
            impulse.add(Vec2::new(sign * WALK_IMPULSE, 0.0));
        } else if side_held && keys.pressed(Key::Dash) && self.abilities.dash {
            self.enter_state(side.dashing());
            if forward <= DASH_SPEED_CAP {
                impulse.add(Vec2::new(sign * DASH_IMPULSE, 0.0));
            }
        } else if turn {
            let other = match side {
                Side::Right => Side::Left,
                Side::Left => Side::Right,
            };
            self.enter_state(other.moving());
        }

        let jump = keys.pressed(Key::Jump);
        let grounded = velocity.y.abs() <= GROUNDED_TOLERANCE;
        let double_jump = self.abilities.double_jump;
        let prev = self.history.prev();
        let second_prev = self.history.second_prev();
        let side_jump = side_held && jump;

        if jump && grounded {
            self.enter_state(PlayerState::Jumping);
            impulse.add(up(JUMP_IMPULSE));
        } else if side_jump
            && prev == PlayerState::OnMovingPlatform
            && second_prev != PlayerState::Jumping
        {
            self.enter_state(PlayerState::Jumping);
            impulse.add(up(JUMP_IMPULSE));
        } else if side_jump
            && prev == PlayerState::OnMovingPlatform
            && second_prev == PlayerState::Jumping
            && double_jump
        {
            self.enter_state(PlayerState::DoubleJumping);
            impulse.add(up(DOUBLE_JUMP_IMPULSE));
        } else if side_jump && prev == PlayerState::Jumping && double_jump {
            self.enter_state(PlayerState::DoubleJumping);
            impulse.add(up(DOUBLE_JUMP_IMPULSE));
        } else if side_jump && prev == PlayerState::OnWall {
            self.enter_state(PlayerState::Jumping);
            impulse.add(up(JUMP_IMPULSE));
        } else if keys.released(side.key()) {
            self.enter_state(PlayerState::Standing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::tag::Ability;
    use crate::input::keys::KeySet;

    const ALL_STATES: [PlayerState; 9] = [
        PlayerState::Standing,
        PlayerState::MovingLeft,
        PlayerState::MovingRight,
        PlayerState::DashingLeft,
        PlayerState::DashingRight,
        PlayerState::Jumping,
        PlayerState::DoubleJumping,
        PlayerState::OnWall,
        PlayerState::OnMovingPlatform,
    ];

    const AIRBORNE: Vec2 = Vec2::new(0.0, -3.0);
    const AT_REST: Vec2 = Vec2::ZERO;

    fn keys(pressed: &[Key], held: &[Key]) -> KeyInput {
        KeyInput {
            pressed: KeySet::of(pressed),
            held: KeySet::of(held),
            released: KeySet::EMPTY,
        }
    }

    fn released(keys_up: &[Key]) -> KeyInput {
        KeyInput {
            pressed: KeySet::EMPTY,
            held: KeySet::EMPTY,
            released: KeySet::of(keys_up),
        }
    }

    /// Player whose history is `[second_prev, prev, current]`.
    fn player_with(history: [PlayerState; 3]) -> Player {
        let mut p = Player::new(5);
        for s in history {
            p.enter_state(s);
        }
        p
    }

    fn player_in(state: PlayerState) -> Player {
        player_with([PlayerState::Standing, PlayerState::Standing, state])
    }

    #[test]
    fn no_keys_in_the_air_changes_nothing() {
        for state in ALL_STATES {
            let mut p = player_in(state);
            let out = p.handle_input(AIRBORNE, &KeyInput::default(), 0.0);
            assert_eq!(out.state, state, "spurious transition from {:?}", state);
        }
    }

    #[test]
    fn irrelevant_keys_change_nothing() {
        // Dash and Reset alone match no row of the table.
        let k = keys(&[Key::Dash, Key::Reset], &[Key::Dash, Key::Reset]);
        for state in ALL_STATES {
            let mut p = player_in(state);
            p.unlock(Ability::Dash);
            let out = p.handle_input(AIRBORNE, &k, 0.0);
            assert_eq!(out.state, state, "spurious transition from {:?}", state);
        }
    }

    #[test]
    fn standing_jump_needs_ground() {
        let mut p = player_in(PlayerState::Standing);
        let out = p.handle_input(AT_REST, &keys(&[Key::Jump], &[Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::Jumping);
        assert_eq!(out.impulse, Some(Vec2::new(0.0, JUMP_IMPULSE)));

        let mut p = player_in(PlayerState::Standing);
        let out = p.handle_input(AIRBORNE, &keys(&[Key::Jump], &[Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::Standing);
        assert_eq!(out.impulse, None);
    }

    #[test]
    fn standing_jump_off_wall_in_the_air() {
        let mut p = player_with([PlayerState::Standing, PlayerState::OnWall, PlayerState::Standing]);
        let out = p.handle_input(AIRBORNE, &keys(&[Key::Jump], &[Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::Jumping);
        assert_eq!(out.impulse, Some(Vec2::new(0.0, JUMP_IMPULSE)));
    }

    #[test]
    fn standing_right_wins_tie() {
        let mut p = player_in(PlayerState::Standing);
        let out = p.handle_input(AT_REST, &keys(&[], &[Key::Left, Key::Right]), 0.0);
        assert_eq!(out.state, PlayerState::MovingRight);
        assert_eq!(out.impulse, None);
    }

    #[test]
    fn walking_accelerates_below_cap() {
        let mut p = player_in(PlayerState::MovingRight);
        let out = p.handle_input(Vec2::new(2.0, -3.0), &keys(&[], &[Key::Right]), 0.0);
        assert_eq!(out.state, PlayerState::MovingRight);
        assert_eq!(out.impulse, Some(Vec2::new(WALK_IMPULSE, 0.0)));

        let mut p = player_in(PlayerState::MovingLeft);
        let out = p.handle_input(Vec2::new(-6.0, -3.0), &keys(&[], &[Key::Left]), 0.0);
        assert_eq!(out.impulse, Some(Vec2::new(-WALK_IMPULSE, 0.0)));
    }

    #[test]
    fn walking_stops_pushing_above_cap() {
        let mut p = player_in(PlayerState::MovingRight);
        let out = p.handle_input(Vec2::new(6.5, -3.0), &keys(&[], &[Key::Right]), 0.0);
        assert_eq!(out.state, PlayerState::MovingRight);
        assert_eq!(out.impulse, None);
    }

    #[test]
    fn dash_needs_unlock_and_speed() {
        let dash = keys(&[Key::Dash], &[Key::Right, Key::Dash]);

        let mut p = player_in(PlayerState::MovingRight);
        let out = p.handle_input(Vec2::new(7.0, 0.0), &dash, 0.0);
        assert_eq!(out.state, PlayerState::MovingRight, "locked dash");

        let mut p = player_in(PlayerState::MovingRight);
        p.unlock(Ability::Dash);
        let out = p.handle_input(Vec2::new(3.0, 0.0), &dash, 0.0);
        assert_eq!(out.state, PlayerState::MovingRight, "below walk cap");
        assert_eq!(out.impulse, Some(Vec2::new(WALK_IMPULSE, 0.0)));

        let mut p = player_in(PlayerState::MovingRight);
        p.unlock(Ability::Dash);
        let out = p.handle_input(Vec2::new(7.0, 0.0), &dash, 0.0);
        assert_eq!(out.state, PlayerState::DashingRight);
        assert_eq!(out.impulse, Some(Vec2::new(DASH_IMPULSE, 0.0)));
    }

    #[test]
    fn dash_impulse_capped() {
        let mut p = player_in(PlayerState::MovingLeft);
        p.unlock(Ability::Dash);
        let out = p.handle_input(Vec2::new(-17.0, 0.0), &keys(&[Key::Dash], &[Key::Left, Key::Dash]), 0.0);
        assert_eq!(out.state, PlayerState::DashingLeft);
        assert_eq!(out.impulse, None);
    }

    #[test]
    fn moving_right_holds_when_both_sides_held() {
        let mut p = player_in(PlayerState::MovingRight);
        let out = p.handle_input(Vec2::new(7.0, -3.0), &keys(&[], &[Key::Left, Key::Right]), 0.0);
        assert_eq!(out.state, PlayerState::MovingRight);

        let mut p = player_in(PlayerState::MovingLeft);
        let out = p.handle_input(Vec2::new(-7.0, -3.0), &keys(&[], &[Key::Left, Key::Right]), 0.0);
        assert_eq!(out.state, PlayerState::MovingRight);
    }

    #[test]
    fn moving_turns_when_only_other_side_held() {
        let mut p = player_in(PlayerState::MovingRight);
        let out = p.handle_input(Vec2::new(7.0, -3.0), &keys(&[], &[Key::Left]), 0.0);
        assert_eq!(out.state, PlayerState::MovingLeft);
    }

    #[test]
    fn release_returns_to_standing() {
        let mut p = player_in(PlayerState::MovingRight);
        let out = p.handle_input(Vec2::new(3.0, 0.0), &released(&[Key::Right]), 0.0);
        assert_eq!(out.state, PlayerState::Standing);
        // The walk impulse of the first chain still applies.
        assert_eq!(out.impulse, Some(Vec2::new(WALK_IMPULSE, 0.0)));
    }

    #[test]
    fn running_jump_sums_impulses() {
        let mut p = player_in(PlayerState::MovingRight);
        let out = p.handle_input(Vec2::new(3.0, 0.0), &keys(&[Key::Jump], &[Key::Right, Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::Jumping);
        assert_eq!(out.impulse, Some(Vec2::new(WALK_IMPULSE, JUMP_IMPULSE)));
    }

    #[test]
    fn jump_off_platform_while_moving() {
        let mut p = player_with([
            PlayerState::Standing,
            PlayerState::OnMovingPlatform,
            PlayerState::MovingLeft,
        ]);
        let out = p.handle_input(Vec2::new(-3.0, -1.0), &keys(&[Key::Jump], &[Key::Left, Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::Jumping);
    }

    #[test]
    fn jump_off_wall_while_moving() {
        let mut p = player_with([PlayerState::Standing, PlayerState::OnWall, PlayerState::MovingRight]);
        let out = p.handle_input(Vec2::new(3.0, -1.0), &keys(&[Key::Jump], &[Key::Right, Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::Jumping);
    }

    #[test]
    fn jumping_lands_or_steers() {
        let mut p = player_in(PlayerState::Jumping);
        assert_eq!(p.handle_input(AT_REST, &KeyInput::default(), 0.0).state, PlayerState::Standing);

        let mut p = player_in(PlayerState::Jumping);
        let out = p.handle_input(AIRBORNE, &keys(&[], &[Key::Left]), 0.0);
        assert_eq!(out.state, PlayerState::MovingLeft);
    }

    #[test]
    fn dashing_resolves_to_movement() {
        let mut p = player_in(PlayerState::DashingLeft);
        let out = p.handle_input(AIRBORNE, &keys(&[], &[Key::Left, Key::Right]), 0.0);
        assert_eq!(out.state, PlayerState::MovingRight);

        let mut p = player_in(PlayerState::DashingRight);
        let out = p.handle_input(AIRBORNE, &keys(&[], &[Key::Left]), 0.0);
        assert_eq!(out.state, PlayerState::MovingLeft);
    }

    #[test]
    fn platform_jump() {
        let mut p = player_in(PlayerState::OnMovingPlatform);
        let out = p.handle_input(Vec2::new(2.0, 0.0), &keys(&[Key::Jump], &[Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::Jumping);
        assert_eq!(out.impulse, Some(Vec2::new(0.0, JUMP_IMPULSE)));
    }

    #[test]
    fn double_jump_unreachable_while_locked() {
        let velocities = [
            AT_REST,
            AIRBORNE,
            Vec2::new(3.0, -3.0),
            Vec2::new(-3.0, -3.0),
            Vec2::new(7.0, -3.0),
            Vec2::new(-7.0, -3.0),
        ];
        let held_sets: [&[Key]; 4] = [
            &[Key::Jump],
            &[Key::Jump, Key::Left],
            &[Key::Jump, Key::Right],
            &[Key::Jump, Key::Left, Key::Right],
        ];
        for second in ALL_STATES {
            for prev in ALL_STATES {
                for current in ALL_STATES {
                    if current == PlayerState::DoubleJumping {
                        continue;
                    }
                    for held in held_sets {
                        for v in velocities {
                            let mut p = player_with([second, prev, current]);
                            let out = p.handle_input(v, &keys(&[Key::Jump], held), 0.0);
                            assert_ne!(
                                out.state,
                                PlayerState::DoubleJumping,
                                "history {:?}/{:?}/{:?} held {:?} v {:?}",
                                second,
                                prev,
                                current,
                                held,
                                v
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn double_jump_from_jumping_when_unlocked() {
        let mut p = player_in(PlayerState::Jumping);
        p.unlock(Ability::DoubleJump);
        let out = p.handle_input(AIRBORNE, &keys(&[Key::Jump], &[Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::DoubleJumping);
        assert_eq!(out.impulse, Some(Vec2::new(0.0, DOUBLE_JUMP_IMPULSE)));
    }

    #[test]
    fn double_jump_from_lateral_after_jump() {
        let mut p = player_with([PlayerState::Standing, PlayerState::Jumping, PlayerState::MovingRight]);
        p.unlock(Ability::DoubleJump);
        let out = p.handle_input(Vec2::new(7.0, -3.0), &keys(&[Key::Jump], &[Key::Right, Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::DoubleJumping);
        assert_eq!(out.impulse, Some(Vec2::new(0.0, DOUBLE_JUMP_IMPULSE)));
    }

    #[test]
    fn double_jump_from_standing_after_jump_then_move() {
        let mut p = player_with([PlayerState::Jumping, PlayerState::MovingLeft, PlayerState::Standing]);
        p.unlock(Ability::DoubleJump);
        let out = p.handle_input(AIRBORNE, &keys(&[Key::Jump], &[Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::DoubleJumping);

        // Falling too fast refuses it.
        let mut p = player_with([PlayerState::Jumping, PlayerState::MovingLeft, PlayerState::Standing]);
        p.unlock(Ability::DoubleJump);
        let out = p.handle_input(Vec2::new(0.0, -25.0), &keys(&[Key::Jump], &[Key::Jump]), 0.0);
        assert_eq!(out.state, PlayerState::Standing);
    }

    #[test]
    fn handle_input_closes_expired_invulnerability() {
        let mut p = player_in(PlayerState::Standing);
        p.decrement_health(0.0);
        p.handle_input(AIRBORNE, &KeyInput::default(), 1.0);
        assert!(p.is_invulnerable());
        p.handle_input(AIRBORNE, &KeyInput::default(), 2.5);
        assert!(!p.is_invulnerable());
    }
}
