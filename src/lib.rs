//! Ember Run - simulation core of a side-scrolling fireball platformer
//!
//! Core modules:
//! - `sim`: Per-tick simulation (physics, animation, collisions, lifecycle)
//! - `render`: Frame table and draw-command surface contract
//! - `audio`: Fire-and-forget sound triggers
//! - `world`: Per-level configuration data
//! - `session`: Campaign progression (lives, coins, world index)
//! - `settings`: User preferences

pub mod audio;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod world;

pub use session::{Session, SessionStatus};
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Viewport dimensions (pixels)
    pub const SCREEN_WIDTH: i32 = 1280;
    pub const SCREEN_HEIGHT: i32 = 720;

    /// Distance from the viewport edge at which the camera starts scrolling
    pub const CAMERA_SCROLL_GAP_X: i32 = 400;
    pub const CAMERA_SCROLL_GAP_Y: i32 = 150;

    /// Player box
    pub const PLAYER_WIDTH: i32 = 48;
    pub const PLAYER_HEIGHT: i32 = 64;
    pub const PLAYER_MAX_LIFE: i32 = 100;
    pub const INITIAL_PLAYER_LIVES: i32 = 3;

    /// Player body mass (arbitrary units)
    pub const MASS: f32 = 1.0;
    /// Gravity (pixels/s²)
    pub const GRAVITY: f32 = 1500.0;
    pub const FRICTION_COEFFICIENT: f32 = 0.3;
    /// Drive force applied while a direction key is held
    pub const DRIVE_FORCE: f32 = 900.0;
    /// Maximum horizontal speed (pixels/s)
    pub const UMAX: f32 = 300.0;
    /// Deadband speed below which the player stops / counts as not walking
    pub const UMIN: f32 = 20.0;
    /// Vertical speed floor so free-fall never reads as exactly zero
    pub const VY_EPSILON: f32 = 0.1;
    /// Jump launch speed (negative = up)
    pub const JUMP_INITIAL_VELOCITY: f32 = -750.0;

    /// Horizontal trim applied to overlap width when classifying platform hits
    pub const COLLISION_GAP: i32 = 8;
    /// Extra probe depth below the player's feet so a resting player keeps contact
    pub const GROUND_PROBE: i32 = 1;
    /// Push-back distance when the player touches an enemy
    pub const PLAYER_ENEMY_PUSHBACK: i32 = 20;
    /// Damage taken from an enemy body or an enemy fireball
    pub const PLAYER_HIT_DAMAGE: i32 = 5;

    /// Enemy
    pub const ENEMY_WIDTH: i32 = 64;
    pub const ENEMY_HEIGHT: i32 = 64;
    pub const ENEMY_INITIAL_LIFE: i32 = 30;
    pub const ENEMY_DAMAGE_PER_FIREBALL: i32 = 10;
    pub const ENEMY_FIRE_INTERVAL_MS: u64 = 2500;

    /// Player fireball (velocities in pixels/ms)
    pub const FIREBALL_WIDTH: i32 = 24;
    pub const FIREBALL_HEIGHT: i32 = 24;
    pub const FIREBALL_VELOCITY_X: f32 = 0.5;
    pub const FIREBALL_Y_INITIAL_VELOCITY: f32 = 0.05;
    pub const FIREBALL_Y_GRAVITY_FACTOR: f32 = 0.002;
    pub const FIREBALL_RIGHT_OFFSET_X: i32 = 40;
    pub const FIREBALL_LEFT_OFFSET_X: i32 = -16;
    pub const FIREBALL_OFFSET_Y: i32 = 20;
    pub const FIREBALL_COOLDOWN_MS: u64 = 350;

    /// Enemy fireball (velocity in pixels/ms)
    pub const ENEMY_FIRE_WIDTH: i32 = 32;
    pub const ENEMY_FIRE_HEIGHT: i32 = 16;
    pub const ENEMY_FIRE_VELOCITY: f32 = 0.3;
    pub const ENEMY_FIRE_RIGHT_OFFSET_X: i32 = 16;
    pub const ENEMY_FIRE_LEFT_OFFSET_X: i32 = -48;
    pub const ENEMY_FIRE_OFFSET_Y: i32 = -8;

    /// Pickups and effects
    pub const COIN_WIDTH: i32 = 24;
    pub const COIN_HEIGHT: i32 = 24;
    pub const SPLASH_WIDTH: i32 = 64;
    pub const SPLASH_HEIGHT: i32 = 24;
    pub const SPLASH_OFFSET_X: i32 = -8;
    pub const SPLASH_OFFSET_Y: i32 = 44;
    pub const EXPLOSION_WIDTH: i32 = 64;
    pub const EXPLOSION_HEIGHT: i32 = 64;
    pub const EXPLOSION_OFFSET_X: i32 = -20;
    pub const EXPLOSION_OFFSET_Y: i32 = -20;
}

/// Convert an angle in radians to the counter-clockwise degrees a blitter rotates by
#[inline]
pub fn rotation_degrees(angle: f32) -> f32 {
    angle.to_degrees()
}

/// Round a continuous displacement to whole pixels
#[inline]
pub fn to_pixels(v: f32) -> i32 {
    v.round() as i32
}

/// Component-wise rounding of a displacement vector
#[inline]
pub fn to_pixels_vec(x: f32, y: f32) -> IVec2 {
    IVec2::new(to_pixels(x), to_pixels(y))
}
