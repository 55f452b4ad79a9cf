//! Deferred removal of killed entities
//!
//! Entities are only flagged during a tick. The sweep at the end of the tick
//! drops them, so nothing is removed from a collection while it is iterated.

use super::entity::Entity;
use super::state::GameState;

fn sweep_vec<T: Entity>(items: &mut Vec<T>) -> usize {
    let before = items.len();
    items.retain(|e| !e.is_killed());
    before - items.len()
}

/// Remove every killed entity. Returns the number removed.
pub fn sweep(state: &mut GameState) -> usize {
    let removed = sweep_vec(&mut state.platforms)
        + sweep_vec(&mut state.coins)
        + sweep_vec(&mut state.enemies)
        + sweep_vec(&mut state.fireballs)
        + sweep_vec(&mut state.enemy_fire)
        + sweep_vec(&mut state.effects);
    if removed > 0 {
        log::trace!("Swept {} entities", removed);
    }
    removed
}
