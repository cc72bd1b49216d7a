//! One level attempt wired into the engine's `Game` contract.
//!
//! Tick order: UI commands, physics step, contact dispatch, patrols, ability
//! side effects, reset key, player input, entry cues, outcome.

use glam::Vec2;

use crate::api::game::{EngineContext, Game, GameConfig};
use crate::api::types::{GameEvent, SoundEvent};
use crate::bridge::protocol::{
    STATE_ABILITIES, STATE_CURRENT, STATE_FLOATS, STATE_HEALTH, STATE_INVULNERABLE,
    STATE_LEVEL_TIME, STATE_OUTCOME, STATE_POS_X, STATE_POS_Y, STATE_PREVIOUS,
    STATE_SECOND_PREVIOUS, STATE_VEL_X, STATE_VEL_Y,
};
use crate::components::tag::Ability;
use crate::core::time::{SimClock, Timer};
use crate::gameplay::contacts::resolve_contacts;
use crate::gameplay::difficulty::Difficulty;
use crate::gameplay::patrol::MotionCommand;
use crate::gameplay::player::{Abilities, Player, PlayerState};
use crate::input::keys::{Key, KeyboardState};
use crate::input::queue::{InputEvent, InputQueue};
use crate::level::builder::{build_level, LevelHandles};
use crate::level::config::LevelConfig;

/// `Custom` event kind: rebuild the level from scratch.
pub const CMD_RESTART: u32 = 1;
/// `Custom` event kind: pick a difficulty (`a` = index into
/// [`Difficulty::ALL`]) and restart with it.
pub const CMD_SET_DIFFICULTY: u32 = 2;

/// Sticky-wall friction once wall reset is unlocked; 0 before.
pub const STICKY_WALL_FRICTION: f32 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Playing
    }

    pub fn code(self) -> u32 {
        match self {
            Outcome::Playing => 0,
            Outcome::Won => 1,
            Outcome::Lost => 2,
        }
    }
}

/// Read-only view of the session for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSnapshot {
    pub state: PlayerState,
    pub previous: PlayerState,
    pub second_previous: PlayerState,
    pub health: i32,
    pub invulnerable: bool,
    pub abilities: Abilities,
    pub position: Vec2,
    pub velocity: Vec2,
    pub outcome: Outcome,
    pub level_time: f64,
}

impl StateSnapshot {
    /// Pack into the player state block of the shared buffer.
    pub fn to_floats(&self) -> [f32; STATE_FLOATS] {
        let mut out = [0.0; STATE_FLOATS];
        out[STATE_CURRENT] = self.state.code() as f32;
        out[STATE_PREVIOUS] = self.previous.code() as f32;
        out[STATE_SECOND_PREVIOUS] = self.second_previous.code() as f32;
        out[STATE_HEALTH] = self.health as f32;
        out[STATE_INVULNERABLE] = if self.invulnerable { 1.0 } else { 0.0 };
        out[STATE_ABILITIES] = Ability::ALL
            .iter()
            .filter(|a| self.abilities.has(**a))
            .map(|a| 1u32 << a.code())
            .sum::<u32>() as f32;
        out[STATE_POS_X] = self.position.x;
        out[STATE_POS_Y] = self.position.y;
        out[STATE_VEL_X] = self.velocity.x;
        out[STATE_VEL_Y] = self.velocity.y;
        out[STATE_OUTCOME] = self.outcome.code() as f32;
        out[STATE_LEVEL_TIME] = self.level_time as f32;
        out
    }
}

pub struct GameSession {
    config: GameConfig,
    level: LevelConfig,
    difficulty: Difficulty,
    player: Player,
    handles: Option<LevelHandles>,
    keyboard: KeyboardState,
    clock: SimClock,
    level_timer: Timer,
    outcome: Outcome,
}

impl GameSession {
    /// Session over the embedded level. A level that fails to parse is
    /// logged and replaced by an empty one.
    pub fn new() -> Self {
        let level = LevelConfig::builtin().unwrap_or_else(|err| {
            log::error!("Failed to parse built-in level: {}", err);
            LevelConfig::default()
        });
        Self::with_level(level)
    }

    pub fn with_level(level: LevelConfig) -> Self {
        let difficulty = Difficulty::default();
        Self {
            config: GameConfig::default(),
            level,
            difficulty,
            player: Player::new(difficulty.starting_health()),
            handles: None,
            keyboard: KeyboardState::new(),
            clock: SimClock::new(),
            level_timer: Timer::new(),
            outcome: Outcome::Playing,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.set_difficulty(difficulty);
        self
    }

    /// Takes effect at the next [`GameSession::restart`].
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn handles(&self) -> Option<&LevelHandles> {
        self.handles.as_ref()
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// Current simulation time in seconds.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Tear down the world and start a fresh attempt at the current difficulty.
    pub fn restart(&mut self, ctx: &mut EngineContext) {
        ctx.clear_world();
        self.handles = Some(build_level(ctx, &self.level));
        self.player = Player::new(self.difficulty.starting_health());
        self.keyboard.reset();
        self.clock.reset();
        self.level_timer = Timer::new();
        self.level_timer.start(self.clock.now());
        self.outcome = Outcome::Playing;
        log::info!(
            "Level '{}' started on {:?} ({} hp)",
            self.level.name,
            self.difficulty,
            self.player.health()
        );
    }

    pub fn snapshot(&self, ctx: &EngineContext) -> StateSnapshot {
        let history = self.player.history();
        let body = self
            .handles
            .as_ref()
            .and_then(|h| ctx.scene.get(h.player));
        StateSnapshot {
            state: history.current(),
            previous: history.prev(),
            second_previous: history.second_prev(),
            health: self.player.health(),
            invulnerable: self.player.is_invulnerable(),
            abilities: self.player.abilities(),
            position: body.map(|e| e.pos).unwrap_or(Vec2::ZERO),
            velocity: body.map(|e| e.vel).unwrap_or(Vec2::ZERO),
            outcome: self.outcome,
            level_time: self.level_timer.elapsed_seconds(self.clock.now()),
        }
    }

    fn apply_commands(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            let InputEvent::Custom { kind, a, .. } = *event else {
                continue;
            };
            match kind {
                CMD_RESTART => self.restart(ctx),
                CMD_SET_DIFFICULTY => match Difficulty::from_index(a.max(0.0) as usize) {
                    Some(difficulty) => {
                        self.set_difficulty(difficulty);
                        self.restart(ctx);
                    }
                    None => log::warn!("Unknown difficulty index {}", a),
                },
                other => log::warn!("Unknown UI command {}", other),
            }
        }
    }

    fn run_patrols(ctx: &mut EngineContext, handles: &mut LevelHandles) {
        let patrols = handles.enemies.iter_mut().chain(handles.platforms.iter_mut());
        for (id, controller) in patrols {
            let Some(pos) = ctx.scene.get(*id).map(|e| e.pos) else {
                continue;
            };
            match controller.command(pos) {
                MotionCommand::Impulse { impulse, axis, cap } => {
                    ctx.apply_impulse(*id, impulse);
                    let vel = ctx.velocity(*id);
                    ctx.set_velocity(*id, axis.clamp(vel, cap));
                }
                MotionCommand::SetVelocity(vel) => ctx.set_velocity(*id, vel),
                MotionCommand::Hold => {}
            }
        }
    }

    fn apply_ability_effects(&self, ctx: &mut EngineContext, handles: &LevelHandles) {
        let abilities = self.player.abilities();
        let friction = if abilities.wall_reset {
            STICKY_WALL_FRICTION
        } else {
            0.0
        };
        for id in &handles.sticky_walls {
            ctx.set_friction(*id, friction);
        }
        for (id, ability) in &handles.pickups {
            let active = ctx.scene.get(*id).is_some_and(|e| e.active);
            if active && abilities.has(*ability) {
                ctx.set_enabled(*id, false);
            }
        }
    }

    fn simulate(&mut self, ctx: &mut EngineContext, handles: &mut LevelHandles) {
        ctx.step_physics();
        let now = self.clock.now();

        let resolution = resolve_contacts(ctx.touching_pairs(), &ctx.scene, &mut self.player, now);
        for (id, impulse) in &resolution.impulses {
            ctx.apply_impulse(*id, *impulse);
        }
        for event in resolution.events {
            ctx.emit_event(event);
        }
        for sound in resolution.sounds {
            ctx.emit_sound(sound);
        }

        Self::run_patrols(ctx, handles);
        self.apply_ability_effects(ctx, handles);

        let keys = self.keyboard.snapshot();
        if keys.pressed(Key::Reset) {
            ctx.teleport(handles.player, self.level.player.reset_point);
        }

        let before = self.player.state();
        let outcome = self.player.handle_input(ctx.velocity(handles.player), &keys, now);
        if let Some(impulse) = outcome.impulse {
            ctx.apply_impulse(handles.player, impulse);
        }
        if outcome.state != before {
            if outcome.state == PlayerState::DoubleJumping {
                ctx.emit_sound(SoundEvent::DOUBLE_JUMP);
            } else if outcome.state.is_dashing() {
                ctx.emit_sound(SoundEvent::DASH);
            }
        }

        if resolution.level_completed {
            let time = self.level_timer.get_time_stop(now);
            self.outcome = Outcome::Won;
            ctx.emit_event(GameEvent::LevelCompleted { time: time as f32 });
            ctx.emit_sound(SoundEvent::WIN);
            log::info!("Level '{}' completed in {:.2}s", self.level.name, time);
        } else if self.player.health() < 1 {
            let time = self.level_timer.get_time_stop(now);
            self.outcome = Outcome::Lost;
            ctx.emit_event(GameEvent::PlayerDefeated);
            ctx.emit_sound(SoundEvent::LOSE);
            log::info!("Player defeated after {:.2}s", time);
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for GameSession {
    fn config(&self) -> GameConfig {
        self.config.clone()
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.restart(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.apply_commands(ctx, input);
        self.keyboard.apply_events(input.iter());

        if !self.outcome.is_terminal() {
            if let Some(mut handles) = self.handles.take() {
                self.simulate(ctx, &mut handles);
                self.handles = Some(handles);
            }
        }

        self.keyboard.end_tick();
        self.clock.advance(self.config.fixed_dt);
    }

    fn write_state(&self, ctx: &EngineContext, out: &mut [f32; STATE_FLOATS]) {
        *out = self.snapshot(ctx).to_floats();
    }
}
