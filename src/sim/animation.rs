//! Animation state machine
//!
//! Frame stepping is time based: a frame advances once its per-sprite duration
//! has elapsed on the pause-adjusted clock. States are never stored as such;
//! they are derived each tick from velocity and flags, and a state change
//! restarts the sequence at frame 0.

use serde::{Deserialize, Serialize};

use crate::consts::UMIN;

/// Which mirrored frame set to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn from_right(right: bool) -> Self {
        if right { Facing::Right } else { Facing::Left }
    }

    pub fn is_right(self) -> bool {
        self == Facing::Right
    }

    /// Horizontal sign of the facing direction
    pub fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Facing::Left => 0,
            Facing::Right => 1,
        }
    }
}

/// Every animated image sequence the core can ask a renderer to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    PlayerStanding,
    PlayerWalking,
    PlayerJumpUp,
    PlayerJumpDown,
    Enemy,
    EnemyHit,
    Coin,
    Fireball,
    EnemyFire,
    Explosion,
    Splash,
    Background,
    WorldTiles,
    HudHead,
    HudCoin,
}

impl Sprite {
    pub const ALL: [Sprite; 15] = [
        Sprite::PlayerStanding,
        Sprite::PlayerWalking,
        Sprite::PlayerJumpUp,
        Sprite::PlayerJumpDown,
        Sprite::Enemy,
        Sprite::EnemyHit,
        Sprite::Coin,
        Sprite::Fireball,
        Sprite::EnemyFire,
        Sprite::Explosion,
        Sprite::Splash,
        Sprite::Background,
        Sprite::WorldTiles,
        Sprite::HudHead,
        Sprite::HudCoin,
    ];

    /// Number of frames in one facing of the sequence
    pub fn frame_count(self) -> usize {
        match self {
            Sprite::PlayerStanding => 4,
            Sprite::PlayerWalking => 8,
            Sprite::PlayerJumpUp => 2,
            Sprite::PlayerJumpDown => 2,
            Sprite::Enemy => 6,
            Sprite::EnemyHit => 1,
            Sprite::Coin => 6,
            Sprite::Fireball => 4,
            Sprite::EnemyFire => 4,
            Sprite::Explosion => 8,
            Sprite::Splash => 5,
            Sprite::HudCoin => 6,
            Sprite::Background | Sprite::WorldTiles | Sprite::HudHead => 1,
        }
    }

    /// Time each frame stays on screen (ms)
    pub fn frame_time_ms(self) -> u64 {
        match self {
            Sprite::PlayerStanding => 200,
            Sprite::PlayerWalking => 80,
            Sprite::PlayerJumpUp | Sprite::PlayerJumpDown => 100,
            Sprite::Enemy | Sprite::EnemyHit => 120,
            Sprite::Coin | Sprite::HudCoin => 100,
            Sprite::Fireball => 60,
            Sprite::EnemyFire => 80,
            Sprite::Explosion | Sprite::Splash => 50,
            Sprite::Background | Sprite::WorldTiles | Sprite::HudHead => u64::MAX,
        }
    }

    /// Whether the sequence has a mirrored left-facing set
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            Sprite::PlayerStanding
                | Sprite::PlayerWalking
                | Sprite::PlayerJumpUp
                | Sprite::PlayerJumpDown
                | Sprite::Enemy
                | Sprite::EnemyHit
                | Sprite::Fireball
                | Sprite::EnemyFire
        )
    }
}

/// Frame cursor plus the time of the last frame change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Animator {
    frame: usize,
    last_update_ms: u64,
}

impl Animator {
    pub fn new(now_ms: u64) -> Self {
        Self {
            frame: 0,
            last_update_ms: now_ms,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    /// Back to the first frame without touching the frame timer
    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Back to the first frame and restart the frame timer at `now_ms`
    pub fn restart(&mut self, now_ms: u64) {
        self.frame = 0;
        self.last_update_ms = now_ms;
    }

    fn frame_due(&self, now_ms: u64, sprite: Sprite) -> bool {
        now_ms.saturating_sub(self.last_update_ms) > sprite.frame_time_ms()
    }

    /// Advance one frame if due, wrapping to 0 at the end. Returns true if advanced.
    pub fn step_looping(&mut self, now_ms: u64, sprite: Sprite) -> bool {
        // Out of range after a sequence switch
        if self.frame >= sprite.frame_count() {
            self.frame = 0;
        }
        if !self.frame_due(now_ms, sprite) {
            return false;
        }
        self.last_update_ms = now_ms;
        self.frame = (self.frame + 1) % sprite.frame_count();
        true
    }

    /// Advance one frame if due without wrapping.
    ///
    /// Returns true once the last frame has been shown for its full duration.
    pub fn step_once(&mut self, now_ms: u64, sprite: Sprite) -> bool {
        if !self.frame_due(now_ms, sprite) {
            return false;
        }
        self.last_update_ms = now_ms;
        if self.frame + 1 >= sprite.frame_count() {
            return true;
        }
        self.frame += 1;
        false
    }

    /// True if a full frame duration has passed since the last frame change
    pub fn elapsed(&self, now_ms: u64, sprite: Sprite) -> bool {
        self.frame_due(now_ms, sprite)
    }
}

/// Player animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerPose {
    #[default]
    Standing,
    Walking,
    JumpingUp,
    JumpingDown,
}

impl PlayerPose {
    /// Derive the pose from the current velocity.
    ///
    /// Any vertical motion is a jump (the integrator never lets a falling
    /// player read vy == 0); otherwise the player walks once |vx| reaches UMIN.
    pub fn derive(vx: f32, vy: f32) -> Self {
        if vy < 0.0 {
            PlayerPose::JumpingUp
        } else if vy > 0.0 {
            PlayerPose::JumpingDown
        } else if vx.abs() >= UMIN {
            PlayerPose::Walking
        } else {
            PlayerPose::Standing
        }
    }

    pub fn is_airborne(self) -> bool {
        matches!(self, PlayerPose::JumpingUp | PlayerPose::JumpingDown)
    }

    pub fn sprite(self) -> Sprite {
        match self {
            PlayerPose::Standing => Sprite::PlayerStanding,
            PlayerPose::Walking => Sprite::PlayerWalking,
            PlayerPose::JumpingUp => Sprite::PlayerJumpUp,
            PlayerPose::JumpingDown => Sprite::PlayerJumpDown,
        }
    }
}

/// Resolve the player's facing from velocity and held keys.
///
/// Moving or pushing left wins over moving or pushing right.
pub fn resolve_player_facing(current: Facing, vx: f32, left_held: bool, right_held: bool) -> Facing {
    let mut facing = current;
    if vx > 0.0 || right_held {
        facing = Facing::Right;
    }
    if vx < 0.0 || left_held {
        facing = Facing::Left;
    }
    facing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_wraps() {
        let sprite = Sprite::Coin;
        let step = sprite.frame_time_ms() + 1;
        let mut anim = Animator::new(0);
        let mut now = 0;
        for expected in [1, 2, 3, 4, 5, 0, 1] {
            now += step;
            assert!(anim.step_looping(now, sprite));
            assert_eq!(anim.frame(), expected);
        }
    }

    #[test]
    fn test_looping_waits_full_duration() {
        let sprite = Sprite::Fireball;
        let mut anim = Animator::new(1000);
        assert!(!anim.step_looping(1000 + sprite.frame_time_ms(), sprite));
        assert_eq!(anim.frame(), 0);
        assert!(anim.step_looping(1001 + sprite.frame_time_ms(), sprite));
        assert_eq!(anim.frame(), 1);
    }

    #[test]
    fn test_step_once_finishes_after_last_frame() {
        let sprite = Sprite::Splash;
        let step = sprite.frame_time_ms() + 1;
        let mut anim = Animator::new(0);
        let mut now = 0;
        for expected in 1..sprite.frame_count() {
            now += step;
            assert!(!anim.step_once(now, sprite));
            assert_eq!(anim.frame(), expected);
        }
        now += step;
        assert!(anim.step_once(now, sprite));
        assert_eq!(anim.frame(), sprite.frame_count() - 1);
    }

    #[test]
    fn test_out_of_range_frame_clamped_on_switch() {
        let mut anim = Animator::new(0);
        let walk = Sprite::PlayerWalking;
        for i in 1..=6 {
            anim.step_looping(i * 100, walk);
        }
        assert_eq!(anim.frame(), 6);
        anim.step_looping(601, Sprite::PlayerJumpUp);
        assert!(anim.frame() < Sprite::PlayerJumpUp.frame_count());
    }

    #[test]
    fn test_pose_derivation() {
        assert_eq!(PlayerPose::derive(0.0, 0.0), PlayerPose::Standing);
        assert_eq!(PlayerPose::derive(UMIN - 1.0, 0.0), PlayerPose::Standing);
        assert_eq!(PlayerPose::derive(UMIN, 0.0), PlayerPose::Walking);
        assert_eq!(PlayerPose::derive(-200.0, 0.0), PlayerPose::Walking);
        assert_eq!(PlayerPose::derive(200.0, -10.0), PlayerPose::JumpingUp);
        assert_eq!(PlayerPose::derive(0.0, 0.1), PlayerPose::JumpingDown);
    }

    #[test]
    fn test_facing_left_wins() {
        assert_eq!(resolve_player_facing(Facing::Left, 5.0, false, false), Facing::Right);
        assert_eq!(resolve_player_facing(Facing::Right, 5.0, true, false), Facing::Left);
        assert_eq!(resolve_player_facing(Facing::Right, 0.0, false, false), Facing::Right);
        assert_eq!(resolve_player_facing(Facing::Right, -1.0, false, true), Facing::Left);
    }

    #[test]
    fn test_sprite_table_consistency() {
        for sprite in Sprite::ALL {
            assert!(sprite.frame_count() > 0, "{sprite:?}");
        }
    }
}
