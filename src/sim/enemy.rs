//! Enemy behaviour: activation, facing, fire timer and hit animation

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::animation::{Animator, Facing, Sprite};
use super::entity::{AdvanceCtx, Entity, EntityId, EntityKind, KillFlag};
use super::rect::Rect;
use crate::consts::*;
use crate::render::{DrawCommand, FrameKey, Surface};

/// The fixed on-screen window the world scrolls under
pub fn viewport() -> Rect {
    Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub rect: Rect,
    pub life: i32,
    pub facing: Facing,
    /// Playing the one-shot hit frame instead of the idle cycle
    pub is_hit: bool,
    /// Player position as of the end of the previous tick
    pub player_snapshot: IVec2,
    pub anim: Animator,
    last_fire_ms: u64,
    killed: KillFlag,
}

impl Enemy {
    pub fn new(id: EntityId, pos: IVec2, now_ms: u64) -> Self {
        Self {
            id,
            rect: Rect::new(pos.x, pos.y, ENEMY_WIDTH, ENEMY_HEIGHT),
            life: ENEMY_INITIAL_LIFE,
            facing: Facing::Left,
            is_hit: false,
            player_snapshot: IVec2::ZERO,
            anim: Animator::new(now_ms),
            last_fire_ms: now_ms,
            killed: KillFlag::default(),
        }
    }

    /// True while the enemy's box is at least partly inside the viewport
    pub fn is_active(&self) -> bool {
        self.rect.intersects(&viewport())
    }

    /// Take a fireball hit and start the hit animation
    pub fn damage(&mut self, now_ms: u64) {
        self.life -= ENEMY_DAMAGE_PER_FIREBALL;
        self.is_hit = true;
        self.anim.restart(now_ms);
    }

    /// Record the player's position for next tick's facing decision
    pub fn track_player(&mut self, player_pos: IVec2) {
        self.player_snapshot = player_pos;
    }

    /// Fire timer: returns true (and rearms) once the interval has elapsed
    pub fn ready_to_fire(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_fire_ms) > ENEMY_FIRE_INTERVAL_MS {
            self.last_fire_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Turn toward the player once they pass the enemy's back edge
    fn update_facing(&mut self) {
        match self.facing {
            Facing::Right if self.player_snapshot.x < self.rect.left() => {
                self.facing = Facing::Left;
            }
            Facing::Left if self.player_snapshot.x > self.rect.right() => {
                self.facing = Facing::Right;
            }
            _ => {}
        }
    }

    fn animate(&mut self, now_ms: u64) {
        if self.is_hit {
            if self.anim.elapsed(now_ms, Sprite::EnemyHit) {
                self.anim.restart(now_ms);
                self.is_hit = false;
            }
        } else {
            self.anim.step_looping(now_ms, Sprite::Enemy);
        }
    }

    pub fn sprite(&self) -> Sprite {
        if self.is_hit { Sprite::EnemyHit } else { Sprite::Enemy }
    }
}

impl Entity for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
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
        self.update_facing();
        self.animate(ctx.now_ms);
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::new(self.sprite(), self.facing, self.anim.frame()),
            dest: self.rect,
            rotation_deg: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: i32, y: i32) -> Enemy {
        Enemy::new(EntityId(1), IVec2::new(x, y), 0)
    }

    #[test]
    fn test_activation_follows_viewport() {
        assert!(enemy_at(100, 100).is_active());
        assert!(enemy_at(-ENEMY_WIDTH + 1, 100).is_active());
        assert!(!enemy_at(-ENEMY_WIDTH, 100).is_active());
        assert!(enemy_at(SCREEN_WIDTH - 1, 100).is_active());
        assert!(!enemy_at(SCREEN_WIDTH, 100).is_active());
        assert!(!enemy_at(100, SCREEN_HEIGHT).is_active());
        assert!(!enemy_at(100, -ENEMY_HEIGHT).is_active());
    }

    #[test]
    fn test_fire_timer_interval() {
        let mut enemy = enemy_at(0, 0);
        assert!(!enemy.ready_to_fire(ENEMY_FIRE_INTERVAL_MS));
        assert!(enemy.ready_to_fire(ENEMY_FIRE_INTERVAL_MS + 1));
        assert!(!enemy.ready_to_fire(ENEMY_FIRE_INTERVAL_MS + 2));
        assert!(enemy.ready_to_fire(2 * ENEMY_FIRE_INTERVAL_MS + 2));
    }

    #[test]
    fn test_facing_flips_on_blind_side() {
        let mut enemy = enemy_at(500, 100);
        assert_eq!(enemy.facing, Facing::Left);
        // Player in front (left) keeps facing
        enemy.track_player(IVec2::new(200, 100));
        enemy.advance(&AdvanceCtx::default());
        assert_eq!(enemy.facing, Facing::Left);
        // Player passes the right edge
        enemy.track_player(IVec2::new(500 + ENEMY_WIDTH + 1, 100));
        enemy.advance(&AdvanceCtx::default());
        assert_eq!(enemy.facing, Facing::Right);
        // Player inside the box does not flip back
        enemy.track_player(IVec2::new(510, 100));
        enemy.advance(&AdvanceCtx::default());
        assert_eq!(enemy.facing, Facing::Right);
        enemy.track_player(IVec2::new(499, 100));
        enemy.advance(&AdvanceCtx::default());
        assert_eq!(enemy.facing, Facing::Left);
    }

    #[test]
    fn test_hit_animation_plays_once() {
        let mut enemy = enemy_at(0, 0);
        enemy.damage(1000);
        assert_eq!(enemy.life, ENEMY_INITIAL_LIFE - ENEMY_DAMAGE_PER_FIREBALL);
        assert!(enemy.is_hit);
        assert_eq!(enemy.sprite(), Sprite::EnemyHit);
        assert_eq!(enemy.anim.frame(), 0);

        let hold = Sprite::EnemyHit.frame_time_ms();
        enemy.advance(&AdvanceCtx {
            now_ms: 1000 + hold,
            ..Default::default()
        });
        assert!(enemy.is_hit);
        enemy.advance(&AdvanceCtx {
            now_ms: 1001 + hold,
            ..Default::default()
        });
        assert!(!enemy.is_hit);
        assert_eq!(enemy.sprite(), Sprite::Enemy);
        assert_eq!(enemy.anim.frame(), 0);
    }

    #[test]
    fn test_camera_shift_moves_enemy() {
        let mut enemy = enemy_at(300, 200);
        enemy.advance(&AdvanceCtx {
            scroll: IVec2::new(5, -2),
            ..Default::default()
        });
        assert_eq!(enemy.rect.position(), IVec2::new(295, 202));
    }
}
