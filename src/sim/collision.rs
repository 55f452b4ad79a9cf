//! Collision detection and response
//!
//! Runs once per tick after every entity has advanced, in a fixed order:
//! platforms, coins, door, fireball/platform, fireball/enemy, player/enemy,
//! player/enemy fire, enemy fire/fireball, projectiles that left the world
//! and finally the player's fall out of the world.
//! Removals are only flagged here; the lifecycle sweep drops them afterward.

use glam::IVec2;

use super::entity::Entity;
use super::rect::Rect;
use super::state::{EffectKind, GameEvent, GameState, Player};
use crate::consts::*;

/// How a player/platform overlap is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformContact {
    /// Landing on top or bumping the underside
    Vertical,
    /// Side contact
    Horizontal,
}

/// Pick the resolution axis from the overlap width, trimmed by the gap
/// margin on both sides
pub fn classify_platform_contact(player: &Rect, platform: &Rect) -> PlatformContact {
    if player.trimmed_overlap_width(platform, COLLISION_GAP) > 0 {
        PlatformContact::Vertical
    } else {
        PlatformContact::Horizontal
    }
}

/// True if the player box touches or overlaps the platform.
///
/// The probe reaches one pixel below the player so a player snapped onto a
/// platform top keeps contact on the next tick.
pub fn touches_platform(player: &Rect, platform: &Rect) -> bool {
    player.extended_down(GROUND_PROBE).intersects(platform)
}

/// Resolve a single player/platform contact.
///
/// The ground probe only feeds landing; bumps and side stops need a real
/// overlap. Returns true if the player landed from the air (a splash should
/// spawn).
fn resolve_platform(player: &mut Player, platform: &Rect) -> bool {
    let overlapping = player.rect.intersects(platform);
    match classify_platform_contact(&player.rect, platform) {
        PlatformContact::Vertical => {
            if player.vel.y > 0.0 {
                player.vel.y = 0.0;
                player.snap_y(platform.top() - PLAYER_HEIGHT);
                let landed = player.airborne;
                player.airborne = false;
                player.can_jump = true;
                landed
            } else {
                if player.vel.y < 0.0 && overlapping {
                    player.vel.y = 0.0;
                    player.snap_y(platform.bottom());
                }
                false
            }
        }
        PlatformContact::Horizontal => {
            if player.vel.x != 0.0 && overlapping {
                player.vel.x = 0.0;
                if player.rect.right() > platform.right() {
                    player.snap_x(platform.right());
                } else {
                    player.snap_x(platform.left() - PLAYER_WIDTH);
                }
            }
            false
        }
    }
}

/// Run every collision check for this tick
pub fn resolve(state: &mut GameState, up_held: bool, now_ms: u64) {
    let mut effects: Vec<(EffectKind, Rect)> = Vec::new();

    // Player against platforms; grounding is recomputed from scratch
    state.player.can_jump = false;
    for platform in &state.platforms {
        if touches_platform(&state.player.rect, &platform.rect)
            && resolve_platform(&mut state.player, &platform.rect)
        {
            effects.push((EffectKind::Splash, state.player.rect));
        }
    }

    for coin in &mut state.coins {
        if !coin.is_killed() && coin.rect.intersects(&state.player.rect) {
            coin.kill();
            state.player.coins_collected += 1;
            state.events.push(GameEvent::CoinCollected);
        }
    }

    if state.door.rect.intersects(&state.player.rect) && state.door.try_open(up_held) {
        log::info!("Door opened in world {}", state.world_number);
        state.events.push(GameEvent::DoorOpened);
    }

    for fireball in &mut state.fireballs {
        if state
            .platforms
            .iter()
            .any(|p| p.rect.intersects(&fireball.rect))
        {
            fireball.kill();
        }
    }

    for fireball in &mut state.fireballs {
        for enemy in &mut state.enemies {
            if enemy.is_killed() || !enemy.is_active() || !enemy.rect.intersects(&fireball.rect) {
                continue;
            }
            fireball.kill();
            enemy.damage(now_ms);
            state.events.push(GameEvent::EnemyHit);
            if enemy.life <= 0 {
                enemy.kill();
                log::debug!("Enemy {:?} killed", enemy.id);
                state.events.push(GameEvent::EnemyKilled);
            }
        }
    }

    for enemy in &state.enemies {
        if enemy.is_killed() || !enemy.rect.intersects(&state.player.rect) {
            continue;
        }
        let push = if state.player.rect.x <= enemy.rect.center_x() {
            -PLAYER_ENEMY_PUSHBACK
        } else {
            PLAYER_ENEMY_PUSHBACK
        };
        state.player.move_by(IVec2::new(push, 0));
        state.player.damage(PLAYER_HIT_DAMAGE);
        state.events.push(GameEvent::PlayerHit);
    }

    for fire in &mut state.enemy_fire {
        if fire.rect.intersects(&state.player.rect) {
            fire.kill();
            state.player.damage(PLAYER_HIT_DAMAGE);
            state.events.push(GameEvent::PlayerHit);
        }
    }

    for fire in &mut state.enemy_fire {
        for fireball in &mut state.fireballs {
            if fire.rect.intersects(&fireball.rect) {
                fire.kill();
                fireball.kill();
                effects.push((EffectKind::Explosion, fireball.rect));
                state.events.push(GameEvent::Explosion);
            }
        }
    }

    let world = state.world_view_rect();
    for fireball in &mut state.fireballs {
        if !fireball.rect.intersects(&world) {
            fireball.kill();
        }
    }
    for fire in &mut state.enemy_fire {
        if !fire.rect.intersects(&world) {
            fire.kill();
        }
    }

    if state.player.world_pos.y > state.world_size.y {
        if state.player.life > 0 {
            log::info!("Player fell out of world {}", state.world_number);
            state.events.push(GameEvent::FellOutOfWorld);
        }
        state.player.set_life(0);
    }

    for (kind, anchor) in effects {
        if kind == EffectKind::Splash {
            state.events.push(GameEvent::Splash);
        }
        state.spawn_effect(kind, anchor, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::Facing;
    use crate::sim::enemy::Enemy;
    use crate::sim::entity::EntityId;
    use crate::sim::projectile::{EnemyFireball, Fireball};
    use crate::sim::state::Platform;
    use crate::sim::state::tests::test_state;
    use glam::Vec2;
    use proptest::prelude::*;

    /// Empty level with the player at (400, 300)
    fn bare_state() -> GameState {
        let mut state = test_state();
        state.platforms.clear();
        state.coins.clear();
        state.enemies.clear();
        state.door.rect = Rect::new(-5000, -5000, 10, 10);
        state.player.rect = Rect::new(400, 300, PLAYER_WIDTH, PLAYER_HEIGHT);
        state.player.world_pos = IVec2::new(1400, 900);
        state
    }

    fn add_platform(state: &mut GameState, rect: Rect) {
        let id = state.next_entity_id();
        state.platforms.push(Platform::new(id, rect, false));
    }

    #[test]
    fn test_landing_snaps_to_top_and_grounds() {
        let mut state = bare_state();
        add_platform(&mut state, Rect::new(300, 360, 400, 40));
        state.player.vel = Vec2::new(0.0, 200.0);
        state.player.airborne = true;
        let world_before = state.player.world_pos;

        resolve(&mut state, false, 0);

        assert_eq!(state.player.rect.bottom(), 360);
        assert_eq!(state.player.vel.y, 0.0);
        assert!(state.player.can_jump);
        assert!(!state.player.airborne);
        assert_eq!(state.player.world_pos.y, world_before.y - 4);
        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.effects[0].kind, EffectKind::Splash);
        assert!(state.events.contains(&GameEvent::Splash));
    }

    #[test]
    fn test_resting_player_stays_grounded() {
        let mut state = bare_state();
        add_platform(&mut state, Rect::new(300, 364, 400, 40));
        state.player.vel = Vec2::new(0.0, VY_EPSILON);

        resolve(&mut state, false, 0);
        assert!(state.player.can_jump);
        assert_eq!(state.player.rect.bottom(), 364);
        // No splash without having been airborne
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_rising_player_bumps_underside() {
        let mut state = bare_state();
        add_platform(&mut state, Rect::new(300, 260, 400, 50));
        state.player.vel = Vec2::new(0.0, -300.0);

        resolve(&mut state, false, 0);
        assert_eq!(state.player.rect.top(), 310);
        assert_eq!(state.player.vel.y, 0.0);
        assert!(!state.player.can_jump);
    }

    #[test]
    fn test_jump_without_movement_stays_on_top() {
        let mut state = bare_state();
        add_platform(&mut state, Rect::new(300, 364, 400, 40));
        state.player.vel = Vec2::new(0.0, JUMP_INITIAL_VELOCITY);

        resolve(&mut state, false, 0);
        assert_eq!(state.player.rect.bottom(), 364);
        assert_eq!(state.player.vel.y, JUMP_INITIAL_VELOCITY);
        assert!(!state.player.can_jump);
    }

    #[test]
    fn test_walking_off_an_edge_is_not_a_side_hit() {
        let mut state = bare_state();
        // Only 4px of the platform under the player, resting on its top
        add_platform(&mut state, Rect::new(200, 364, 204, 40));
        state.player.vel = Vec2::new(150.0, VY_EPSILON);

        resolve(&mut state, false, 0);
        assert_eq!(state.player.vel.x, 150.0);
        assert_eq!(state.player.rect.x, 400);
    }

    #[test]
    fn test_side_contact_stops_horizontal_motion() {
        let mut state = bare_state();
        // Overlap of 6px, below twice the gap
        add_platform(&mut state, Rect::new(442, 200, 100, 300));
        state.player.vel = Vec2::new(150.0, 0.0);

        resolve(&mut state, false, 0);
        assert_eq!(state.player.vel.x, 0.0);
        assert_eq!(state.player.rect.right(), 442);
        assert_eq!(state.player.world_pos.x, 1400 - 6);
    }

    #[test]
    fn test_side_contact_from_right_snaps_to_right_edge() {
        let mut state = bare_state();
        add_platform(&mut state, Rect::new(305, 200, 100, 300));
        state.player.vel = Vec2::new(-150.0, 0.0);

        resolve(&mut state, false, 0);
        assert_eq!(state.player.rect.left(), 405);
        assert_eq!(state.player.world_pos.x, 1405);
    }

    #[test]
    fn test_coin_collected_once() {
        let mut state = bare_state();
        let id = state.next_entity_id();
        state
            .coins
            .push(crate::sim::state::Coin::new(id, IVec2::new(410, 310), 0));
        resolve(&mut state, false, 0);
        resolve(&mut state, false, 0);
        assert_eq!(state.player.coins_collected, 1);
        assert!(state.coins[0].is_killed());
    }

    #[test]
    fn test_door_needs_up() {
        let mut state = bare_state();
        state.door.rect = Rect::new(400, 300, 80, 100);
        resolve(&mut state, false, 0);
        assert!(!state.door.opened);
        resolve(&mut state, true, 0);
        assert!(state.door.opened);
    }

    #[test]
    fn test_fireball_hits_active_enemy_only() {
        let mut state = bare_state();
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, IVec2::new(800, 300), 0));
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, IVec2::new(SCREEN_WIDTH + 100, 300), 0));

        for x in [810, SCREEN_WIDTH + 110] {
            let id = state.next_entity_id();
            let mut fb = Fireball::spawn(id, Rect::new(0, 0, 1, 1), Facing::Right, 0);
            fb.rect = Rect::new(x, 310, FIREBALL_WIDTH, FIREBALL_HEIGHT);
            state.fireballs.push(fb);
        }

        resolve(&mut state, false, 500);
        assert_eq!(state.enemies[0].life, ENEMY_INITIAL_LIFE - ENEMY_DAMAGE_PER_FIREBALL);
        assert!(state.enemies[0].is_hit);
        assert_eq!(state.enemies[1].life, ENEMY_INITIAL_LIFE);
        assert!(state.fireballs[0].is_killed());
        assert!(!state.fireballs[1].is_killed());
    }

    #[test]
    fn test_fireball_kills_weak_enemy() {
        let mut state = bare_state();
        let id = state.next_entity_id();
        let mut enemy = Enemy::new(id, IVec2::new(800, 300), 0);
        enemy.life = ENEMY_DAMAGE_PER_FIREBALL;
        state.enemies.push(enemy);
        let id = state.next_entity_id();
        let mut fb = Fireball::spawn(id, Rect::new(0, 0, 1, 1), Facing::Right, 0);
        fb.rect = Rect::new(810, 310, FIREBALL_WIDTH, FIREBALL_HEIGHT);
        state.fireballs.push(fb);

        resolve(&mut state, false, 0);
        assert!(state.enemies[0].is_killed());
        assert!(state.events.contains(&GameEvent::EnemyKilled));
    }

    #[test]
    fn test_fireball_dies_on_platform() {
        let mut state = bare_state();
        add_platform(&mut state, Rect::new(900, 0, 50, 700));
        let id = state.next_entity_id();
        let mut fb = Fireball::spawn(id, Rect::new(0, 0, 1, 1), Facing::Right, 0);
        fb.rect = Rect::new(890, 100, FIREBALL_WIDTH, FIREBALL_HEIGHT);
        state.fireballs.push(fb);
        resolve(&mut state, false, 0);
        assert!(state.fireballs[0].is_killed());
    }

    #[test]
    fn test_enemy_contact_pushes_and_damages_every_tick() {
        let mut state = bare_state();
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, IVec2::new(420, 300), 0));

        resolve(&mut state, false, 0);
        assert_eq!(state.player.rect.x, 400 - PLAYER_ENEMY_PUSHBACK);
        assert_eq!(state.player.world_pos.x, 1400 - PLAYER_ENEMY_PUSHBACK);
        assert_eq!(state.player.life, PLAYER_MAX_LIFE - PLAYER_HIT_DAMAGE);

        resolve(&mut state, false, 0);
        assert_eq!(state.player.life, PLAYER_MAX_LIFE - 2 * PLAYER_HIT_DAMAGE);
    }

    #[test]
    fn test_enemy_contact_from_right_pushes_right() {
        let mut state = bare_state();
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, IVec2::new(350, 300), 0));
        resolve(&mut state, false, 0);
        assert_eq!(state.player.rect.x, 400 + PLAYER_ENEMY_PUSHBACK);
    }

    #[test]
    fn test_enemy_fire_hits_player() {
        let mut state = bare_state();
        let id = state.next_entity_id();
        let mut fire = EnemyFireball::spawn(id, IVec2::ZERO, IVec2::new(10, 10), 0);
        fire.rect = Rect::new(410, 320, ENEMY_FIRE_WIDTH, ENEMY_FIRE_HEIGHT);
        state.enemy_fire.push(fire);
        resolve(&mut state, false, 0);
        assert!(state.enemy_fire[0].is_killed());
        assert_eq!(state.player.life, PLAYER_MAX_LIFE - PLAYER_HIT_DAMAGE);
    }

    #[test]
    fn test_fireballs_collide_into_explosion() {
        let mut state = bare_state();
        let id = state.next_entity_id();
        let mut fire = EnemyFireball::spawn(id, IVec2::ZERO, IVec2::new(10, 10), 0);
        fire.rect = Rect::new(900, 100, ENEMY_FIRE_WIDTH, ENEMY_FIRE_HEIGHT);
        state.enemy_fire.push(fire);
        let id = state.next_entity_id();
        let mut fb = Fireball::spawn(id, Rect::new(0, 0, 1, 1), Facing::Right, 0);
        fb.rect = Rect::new(910, 95, FIREBALL_WIDTH, FIREBALL_HEIGHT);
        state.fireballs.push(fb);

        resolve(&mut state, false, 0);
        assert!(state.enemy_fire[0].is_killed());
        assert!(state.fireballs[0].is_killed());
        assert_eq!(state.effects.len(), 1);
        let explosion = &state.effects[0];
        assert_eq!(explosion.kind, EffectKind::Explosion);
        assert_eq!(
            explosion.rect.position(),
            IVec2::new(910 + EXPLOSION_OFFSET_X, 95 + EXPLOSION_OFFSET_Y)
        );
    }

    #[test]
    fn test_projectiles_outside_world_are_killed() {
        let mut state = bare_state();
        // World spans x -1000..3000 and y -600..840 in view space
        for rect in [
            Rect::new(-1000 - FIREBALL_WIDTH, 100, FIREBALL_WIDTH, FIREBALL_HEIGHT),
            Rect::new(500, 840, FIREBALL_WIDTH, FIREBALL_HEIGHT),
            Rect::new(-1000 - FIREBALL_WIDTH + 1, 100, FIREBALL_WIDTH, FIREBALL_HEIGHT),
        ] {
            let id = state.next_entity_id();
            let mut fb = Fireball::spawn(id, Rect::new(0, 0, 1, 1), Facing::Right, 0);
            fb.rect = rect;
            state.fireballs.push(fb);
        }
        let id = state.next_entity_id();
        let mut fire = EnemyFireball::spawn(id, IVec2::ZERO, IVec2::new(10, 10), 0);
        fire.rect = Rect::new(3000, 100, ENEMY_FIRE_WIDTH, ENEMY_FIRE_HEIGHT);
        state.enemy_fire.push(fire);

        resolve(&mut state, false, 0);
        assert!(state.fireballs[0].is_killed());
        assert!(state.fireballs[1].is_killed());
        assert!(!state.fireballs[2].is_killed());
        assert!(state.enemy_fire[0].is_killed());
    }

    #[test]
    fn test_out_of_bounds_is_strict() {
        let mut state = bare_state();
        state.player.world_pos.y = state.world_size.y;
        resolve(&mut state, false, 0);
        assert_eq!(state.player.life, PLAYER_MAX_LIFE);

        state.player.world_pos.y = state.world_size.y + 1;
        resolve(&mut state, false, 0);
        assert_eq!(state.player.life, 0);
        assert!(state.events.contains(&GameEvent::FellOutOfWorld));
    }

    #[test]
    fn test_touch_probe_reaches_one_pixel() {
        let player = Rect::new(0, 0, 48, 64);
        assert!(touches_platform(&player, &Rect::new(0, 64, 100, 10)));
        assert!(!touches_platform(&player, &Rect::new(0, 65, 100, 10)));
    }

    proptest! {
        #[test]
        fn prop_contact_axis_follows_trimmed_overlap(
            px in -200i32..200,
            qx in -200i32..200,
            qw in 1i32..300,
        ) {
            let player = Rect::new(px, 0, PLAYER_WIDTH, PLAYER_HEIGHT);
            let platform = Rect::new(qx, 10, qw, 40);
            let overlap = (player.right().min(platform.right()) - player.left().max(platform.left())).max(0);
            let expected = if overlap - 2 * COLLISION_GAP > 0 {
                PlatformContact::Vertical
            } else {
                PlatformContact::Horizontal
            };
            prop_assert_eq!(classify_platform_contact(&player, &platform), expected);
        }

        #[test]
        fn prop_out_of_bounds_always_kills(extra in 1i32..5000, life in 1i32..=PLAYER_MAX_LIFE) {
            let mut state = bare_state();
            state.player.set_life(life);
            state.player.world_pos.y = state.world_size.y + extra;
            resolve(&mut state, false, 0);
            prop_assert_eq!(state.player.life, 0);
        }

        #[test]
        fn prop_snaps_keep_world_offset(vy in 1.0f32..800.0, top in 330i32..364) {
            let mut state = bare_state();
            add_platform(&mut state, Rect::new(300, top, 400, 40));
            state.player.vel = Vec2::new(0.0, vy);
            let offset = state.player.world_pos - state.player.rect.position();
            resolve(&mut state, false, 0);
            prop_assert_eq!(state.player.world_pos - state.player.rect.position(), offset);
            prop_assert_eq!(state.player.rect.bottom(), top);
        }
    }

    #[test]
    fn test_entity_ids_follow_spawn_order() {
        let mut state = bare_state();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
        assert_ne!(a, EntityId(0));
    }
}
