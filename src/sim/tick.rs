//! Per-frame simulation tick
//!
//! One tick: pause toggle, jump/fire input, camera, advance every entity,
//! enemy fire, collisions, sweep, stat propagation and outcome check.

use serde::{Deserialize, Serialize};

use super::camera;
use super::collision;
use super::entity::{AdvanceCtx, Entity};
use super::lifecycle;
use super::physics;
use super::state::{GameEvent, GamePhase, GameState};

/// Logical input keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Jump,
    Fire,
    Pause,
}

impl Key {
    pub const ALL: [Key; 6] = [Key::Left, Key::Right, Key::Up, Key::Jump, Key::Fire, Key::Pause];
}

/// Keyboard state provided by the host
pub trait KeyQuery {
    /// Key is currently held down
    fn is_held(&self, key: Key) -> bool;

    /// Key went down since the previous tick
    fn was_pressed(&self, key: Key) -> bool;
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Wall-clock timestamp of this tick (ms)
    pub now_ms: u64,
    pub left: bool,
    pub right: bool,
    /// Held Up (opens the door)
    pub up: bool,
    pub jump: bool,
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Sample the host's keyboard for this tick
    pub fn poll(now_ms: u64, keys: &impl KeyQuery) -> Self {
        Self {
            now_ms,
            left: keys.is_held(Key::Left),
            right: keys.is_held(Key::Right),
            up: keys.is_held(Key::Up),
            jump: keys.was_pressed(Key::Jump),
            fire: keys.was_pressed(Key::Fire),
            pause: keys.was_pressed(Key::Pause),
        }
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Cleared | GamePhase::Died => return,
        _ => {}
    }

    if input.pause {
        if state.clock.is_paused() {
            let paused_for = state.clock.resume(input.now_ms);
            log::info!("Resumed after {} ms", paused_for);
            state.phase = GamePhase::Playing;
            state.push_event(GameEvent::Resumed);
        } else {
            state.clock.pause(input.now_ms);
            log::info!("Paused");
            state.phase = GamePhase::Paused;
            state.push_event(GameEvent::Paused);
            return;
        }
    }

    if state.clock.is_paused() {
        return;
    }

    let now_ms = state.clock.sim_time(input.now_ms);
    state.time_ticks += 1;

    if input.jump && physics::try_jump(&mut state.player) {
        state.push_event(GameEvent::Jump);
    }
    if input.fire {
        state.try_spawn_fireball(now_ms);
    }

    let scroll = camera::scroll(&mut state.player, state.world_size);
    let ctx = AdvanceCtx {
        scroll,
        now_ms,
        left_held: input.left,
        right_held: input.right,
    };
    for entity in state.entities_mut() {
        entity.advance(&ctx);
    }

    let mut shooters = Vec::new();
    for enemy in &mut state.enemies {
        if !enemy.is_killed() && enemy.is_active() && enemy.ready_to_fire(now_ms) {
            shooters.push(enemy.rect.center());
        }
    }
    for center in shooters {
        state.spawn_enemy_fire(center, now_ms);
    }

    collision::resolve(state, input.up, now_ms);
    lifecycle::sweep(state);
    state.propagate_stats();

    if state.player.is_dead() {
        log::info!("Player died in world {}", state.world_number);
        state.phase = GamePhase::Died;
    } else if state.door.opened {
        log::info!("World {} cleared", state.world_number);
        state.phase = GamePhase::Cleared;
    }
}
