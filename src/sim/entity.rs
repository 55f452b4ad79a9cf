//! Entity capability contract
//!
//! Every simulated object exposes the same small surface: an id, a box, a
//! write-once kill flag, a per-tick `advance` and a `render`. The game state
//! keeps one collection per kind and walks them all through this trait.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::render::Surface;

/// Stable handle of an entity for the lifetime of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Tag of every entity variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Background,
    WorldTiles,
    Platform,
    Door,
    Player,
    Hud,
    Coin,
    Enemy,
    Fireball,
    EnemyFireball,
    Explosion,
    Splash,
}

/// Write-once deferred-deletion marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KillFlag(bool);

impl KillFlag {
    #[inline]
    pub fn set(&mut self) {
        self.0 = true;
    }

    #[inline]
    pub fn is_set(self) -> bool {
        self.0
    }
}

/// Per-tick context handed to every entity
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvanceCtx {
    /// Camera delta for this tick; the world moves by its negation
    pub scroll: IVec2,
    /// Pause-adjusted simulation time (ms)
    pub now_ms: u64,
    pub left_held: bool,
    pub right_held: bool,
}

impl AdvanceCtx {
    /// Translation to apply to a world-fixed box this tick
    #[inline]
    pub fn world_shift(&self) -> IVec2 {
        -self.scroll
    }
}

pub trait Entity {
    fn id(&self) -> EntityId;

    fn kind(&self) -> EntityKind;

    fn rect(&self) -> Rect;

    fn is_killed(&self) -> bool;

    /// Flag for removal at the end of the tick. Never reset.
    fn kill(&mut self);

    /// Apply the camera shift and run this entity's own per-tick step
    fn advance(&mut self, ctx: &AdvanceCtx);

    fn render(&self, surface: &mut dyn Surface);
}
