//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module reads a clock,
//! touches pixels or plays sounds:
//! - Time comes in through `TickInput` and the pause-adjusted `SimClock`
//! - Drawing goes out through the `Surface` trait
//! - Sounds go out as `GameEvent`s

pub mod animation;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod lifecycle;
pub mod physics;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod tick;

pub use animation::{Animator, Facing, PlayerPose, Sprite};
pub use clock::SimClock;
pub use collision::{PlatformContact, classify_platform_contact};
pub use enemy::Enemy;
pub use entity::{AdvanceCtx, Entity, EntityId, EntityKind};
pub use projectile::{EnemyFireball, Fireball, aim_angle};
pub use rect::Rect;
pub use state::{
    Backdrop, Coin, Door, Effect, EffectKind, GameEvent, GamePhase, GameState, Hud, LevelOutcome,
    Platform, Player,
};
pub use tick::{Key, KeyQuery, TickInput, tick};
