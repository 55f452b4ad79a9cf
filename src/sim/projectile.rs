//! Projectile motion for player fireballs and enemy fire
//!
//! Both projectiles integrate over the tick duration in milliseconds on the
//! pause-adjusted clock. Neither carries any state about its launch time.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::animation::{Animator, Facing, Sprite};
use super::entity::{AdvanceCtx, Entity, EntityId, EntityKind, KillFlag};
use super::rect::Rect;
use crate::consts::*;
use crate::render::{DrawCommand, FrameKey, Surface};
use crate::{rotation_degrees, to_pixels};

/// Player fireball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fireball {
    pub id: EntityId,
    pub rect: Rect,
    pub facing: Facing,
    pub anim: Animator,
    last_motion_ms: u64,
    killed: KillFlag,
}

impl Fireball {
    /// Spawn next to the player's box on the side it faces
    pub fn spawn(id: EntityId, player_rect: Rect, facing: Facing, now_ms: u64) -> Self {
        let offset_x = match facing {
            Facing::Right => FIREBALL_RIGHT_OFFSET_X,
            Facing::Left => FIREBALL_LEFT_OFFSET_X,
        };
        Self {
            id,
            rect: Rect::new(
                player_rect.x + offset_x,
                player_rect.y + FIREBALL_OFFSET_Y,
                FIREBALL_WIDTH,
                FIREBALL_HEIGHT,
            ),
            facing,
            anim: Animator::new(now_ms),
            last_motion_ms: now_ms,
            killed: KillFlag::default(),
        }
    }

    /// Displacement for one tick lasting `dt_ms`.
    ///
    /// The vertical term is `vy0·dt + g·dt²` with the tick's own dt, not the
    /// time since launch, so the drop per tick stays constant at a steady
    /// frame rate.
    pub fn step_displacement(facing: Facing, dt_ms: f32) -> IVec2 {
        let dx = to_pixels(dt_ms * FIREBALL_VELOCITY_X) * facing.sign();
        let dy = to_pixels(
            FIREBALL_Y_INITIAL_VELOCITY * dt_ms + FIREBALL_Y_GRAVITY_FACTOR * dt_ms * dt_ms,
        );
        IVec2::new(dx, dy)
    }

    fn step_motion(&mut self, now_ms: u64) {
        let dt = now_ms.saturating_sub(self.last_motion_ms) as f32;
        self.last_motion_ms = now_ms;
        self.rect.translate(Self::step_displacement(self.facing, dt));
    }
}

impl Entity for Fireball {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Fireball
    }

    fn rect(&self) -> Rect {
        self.rect
    }

    fn is_killed(&self) -> bool {
        self.killed.is_set()
    }

    fn kill(&mut self) {
        self.killed.set();
    }

    fn advance(&mut self, ctx: &AdvanceCtx) {
        self.rect.translate(ctx.world_shift());
        self.step_motion(ctx.now_ms);
        self.anim.step_looping(ctx.now_ms, Sprite::Fireball);
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::new(Sprite::Fireball, self.facing, self.anim.frame()),
            dest: self.rect,
            rotation_deg: 0.0,
        });
    }
}

/// Aim angle from `from` toward `to` in screen coordinates.
///
/// The angle is the arctangent of the vertical over the horizontal offset,
/// measured so that positive means "up" along the travel direction. When
/// either offset is zero the ratio is degenerate and `previous` is returned
/// unchanged; a fresh projectile passes 0 and so flies level.
pub fn aim_angle(from: IVec2, to: IVec2, previous: f32) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0 || dy == 0 {
        return previous;
    }
    if dx > 0 {
        (-(dy as f32) / dx as f32).atan()
    } else {
        (dy as f32 / -(dx as f32)).atan()
    }
}

/// Enemy fire aimed at the player's position at spawn time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyFireball {
    pub id: EntityId,
    pub rect: Rect,
    pub facing: Facing,
    /// Fixed launch angle (radians), baked into the frame rotation
    pub angle: f32,
    pub anim: Animator,
    last_motion_ms: u64,
    killed: KillFlag,
}

impl EnemyFireball {
    /// Spawn at the enemy's center, aimed at the player's center
    pub fn spawn(id: EntityId, enemy_center: IVec2, player_center: IVec2, now_ms: u64) -> Self {
        let facing = Facing::from_right(player_center.x >= enemy_center.x);
        let angle = aim_angle(enemy_center, player_center, 0.0);
        let offset_x = match facing {
            Facing::Right => ENEMY_FIRE_RIGHT_OFFSET_X,
            Facing::Left => ENEMY_FIRE_LEFT_OFFSET_X,
        };
        Self {
            id,
            rect: Rect::new(
                enemy_center.x + offset_x,
                enemy_center.y + ENEMY_FIRE_OFFSET_Y,
                ENEMY_FIRE_WIDTH,
                ENEMY_FIRE_HEIGHT,
            ),
            facing,
            angle,
            anim: Animator::new(now_ms),
            last_motion_ms: now_ms,
            killed: KillFlag::default(),
        }
    }

    /// Displacement for one tick lasting `dt_ms` along the fixed angle
    pub fn step_displacement(facing: Facing, angle: f32, dt_ms: f32) -> IVec2 {
        let along_x = to_pixels(dt_ms * ENEMY_FIRE_VELOCITY * angle.cos());
        let along_y = to_pixels(dt_ms * ENEMY_FIRE_VELOCITY * angle.sin());
        match facing {
            Facing::Right => IVec2::new(along_x, -along_y),
            Facing::Left => IVec2::new(-along_x, along_y),
        }
    }

    fn step_motion(&mut self, now_ms: u64) {
        let dt = now_ms.saturating_sub(self.last_motion_ms) as f32;
        self.last_motion_ms = now_ms;
        self.rect
            .translate(Self::step_displacement(self.facing, self.angle, dt));
    }
}

impl Entity for EnemyFireball {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::EnemyFireball
    }

    fn rect(&self) -> Rect {
        self.rect
    }

    fn is_killed(&self) -> bool {
        self.killed.is_set()
    }

    fn kill(&mut self) {
        self.killed.set();
    }

    fn advance(&mut self, ctx: &AdvanceCtx) {
        self.rect.translate(ctx.world_shift());
        self.step_motion(ctx.now_ms);
        self.anim.step_looping(ctx.now_ms, Sprite::EnemyFire);
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::new(Sprite::EnemyFire, self.facing, self.anim.frame()),
            dest: self.rect,
            rotation_deg: rotation_degrees(self.angle),
        });
    }
}
