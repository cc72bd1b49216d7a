use ridge_engine::bridge::protocol::STATE_FLOATS;
use ridge_engine::{
    EngineContext, EventRecord, FixedTimestep, Game, GameConfig, InputEvent, InputQueue,
    ProtocolLayout,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game (e.g., `ridge-level`) creates a `thread_local!` GameRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    /// Handed to every step after the first in a frame, so edges and UI
    /// commands are seen exactly once.
    idle_input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    tick_count: u64,
    /// Flat buffer of sound event IDs for SharedArrayBuffer reads.
    sound_buffer: Vec<u8>,
    /// Game events packed as `kind, a, b, c` records.
    event_buffer: Vec<EventRecord>,
    state: [f32; STATE_FLOATS],
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);

        let sound_buffer = Vec::with_capacity(config.max_sounds);
        let event_buffer = Vec::with_capacity(config.max_events);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            idle_input: InputQueue::new(),
            timestep,
            layout,
            config,
            initialized: false,
            tick_count: 0,
            sound_buffer,
            event_buffer,
            state: [0.0; STATE_FLOATS],
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.ctx = EngineContext::from_config(&self.config);
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.game.init(&mut self.ctx);
        self.game.write_state(&self.ctx, &mut self.state);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame tick: zero or more fixed updates, then pack the
    /// per-frame output for the host.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            let input = if step == 0 { &self.input } else { &self.idle_input };
            self.game.update(&mut self.ctx, input);
            self.tick_count += 1;
        }

        // Input waits for a frame that actually steps.
        if steps > 0 {
            self.input.drain();
        }

        self.sound_buffer.clear();
        if self.ctx.sounds.len() > self.layout.max_sounds {
            log::warn!(
                "Dropping {} sound events over capacity",
                self.ctx.sounds.len() - self.layout.max_sounds
            );
        }
        for sound in self.ctx.sounds.iter().take(self.layout.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.event_buffer.clear();
        if self.ctx.events.len() > self.layout.max_events {
            log::warn!(
                "Dropping {} game events over capacity",
                self.ctx.events.len() - self.layout.max_events
            );
        }
        for event in self.ctx.events.iter().take(self.layout.max_events) {
            self.event_buffer.push(event.to_record());
        }

        self.game.write_state(&self.ctx, &mut self.state);
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    /// Fixed steps run since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn sound_events(&self) -> &[u8] {
        &self.sound_buffer
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    pub fn game_events(&self) -> &[EventRecord] {
        &self.event_buffer
    }

    pub fn state_ptr(&self) -> *const f32 {
        self.state.as_ptr()
    }

    pub fn state(&self) -> &[f32; STATE_FLOATS] {
        &self.state
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
