//! Campaign progression
//!
//! Tracks which world is being played, the lives left and the coins banked
//! from cleared worlds. The level itself lives in a `GameState` that the
//! session builds and inspects after each tick.

use serde::{Deserialize, Serialize};

use crate::consts::INITIAL_PLAYER_LIVES;
use crate::sim::{GameState, LevelOutcome};
use crate::world::WorldConfig;

/// Where the campaign stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// A world is being played
    InProgress,
    /// Lives ran out
    GameOver,
    /// Last world cleared
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    worlds: Vec<WorldConfig>,
    /// Index into `worlds` of the world being played
    pub world_index: usize,
    pub lives: i32,
    /// Coins banked from cleared worlds
    pub coins: u32,
    pub status: SessionStatus,
    pub show_outlines: bool,
}

impl Session {
    pub fn new(worlds: Vec<WorldConfig>) -> Self {
        let status = if worlds.is_empty() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        };
        Self {
            worlds,
            world_index: 0,
            lives: INITIAL_PLAYER_LIVES,
            coins: 0,
            status,
            show_outlines: false,
        }
    }

    /// 1-based number of the current world
    pub fn world_number(&self) -> u32 {
        self.world_index as u32 + 1
    }

    pub fn current_world(&self) -> Option<&WorldConfig> {
        self.worlds.get(self.world_index)
    }

    /// Build the current world, or None once the session is over
    pub fn start_level(&self, now_ms: u64) -> Option<GameState> {
        if self.status != SessionStatus::InProgress {
            return None;
        }
        let config = self.current_world()?;
        Some(GameState::load(
            config,
            self.world_number(),
            self.coins,
            self.lives,
            self.show_outlines,
            now_ms,
        ))
    }

    /// Apply a finished level's outcome. Running levels are ignored.
    pub fn finish_level(&mut self, state: &GameState) -> SessionStatus {
        match state.outcome() {
            LevelOutcome::Running => {}
            LevelOutcome::Cleared => {
                self.coins = state.player.coins_collected;
                self.world_index += 1;
                if self.world_index >= self.worlds.len() {
                    log::info!("Campaign completed with {} coins", self.coins);
                    self.status = SessionStatus::Completed;
                } else {
                    log::info!("Advancing to world {}", self.world_number());
                }
            }
            LevelOutcome::Died => {
                self.lives -= 1;
                if self.lives < 0 {
                    log::info!("Game over in world {}", self.world_number());
                    self.status = SessionStatus::GameOver;
                } else {
                    log::info!("Lost a life, {} left", self.lives);
                }
            }
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn two_worlds() -> Session {
        Session::new(vec![WorldConfig::test_world(), WorldConfig::test_world()])
    }

    #[test]
    fn test_death_costs_a_life_and_keeps_banked_coins() {
        let mut session = two_worlds();
        let mut state = session.start_level(0).unwrap();
        state.player.coins_collected = 5;
        state.phase = GamePhase::Died;
        assert_eq!(session.finish_level(&state), SessionStatus::InProgress);
        assert_eq!(session.lives, INITIAL_PLAYER_LIVES - 1);
        assert_eq!(session.coins, 0);
        assert_eq!(session.world_number(), 1);
    }

    #[test]
    fn test_game_over_when_lives_go_negative() {
        let mut session = two_worlds();
        for _ in 0..INITIAL_PLAYER_LIVES {
            let mut state = session.start_level(0).unwrap();
            state.phase = GamePhase::Died;
            assert_eq!(session.finish_level(&state), SessionStatus::InProgress);
        }
        let mut state = session.start_level(0).unwrap();
        assert_eq!(state.player.lives, 0);
        state.phase = GamePhase::Died;
        assert_eq!(session.finish_level(&state), SessionStatus::GameOver);
        assert!(session.start_level(0).is_none());
    }

    #[test]
    fn test_clearing_carries_coins_and_completes() {
        let mut session = two_worlds();
        let mut state = session.start_level(0).unwrap();
        state.player.coins_collected = 3;
        state.phase = GamePhase::Cleared;
        assert_eq!(session.finish_level(&state), SessionStatus::InProgress);
        assert_eq!(session.world_number(), 2);

        let mut state = session.start_level(0).unwrap();
        assert_eq!(state.player.coins_collected, 3);
        assert_eq!(state.world_number, 2);
        state.player.coins_collected = 4;
        state.phase = GamePhase::Cleared;
        assert_eq!(session.finish_level(&state), SessionStatus::Completed);
        assert_eq!(session.coins, 4);
    }

    #[test]
    fn test_running_level_changes_nothing() {
        let mut session = two_worlds();
        let state = session.start_level(0).unwrap();
        assert_eq!(session.finish_level(&state), SessionStatus::InProgress);
        assert_eq!(session.lives, INITIAL_PLAYER_LIVES);
    }
}
