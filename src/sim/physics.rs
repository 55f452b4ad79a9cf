//! Player physics integrator
//!
//! Horizontal motion is driven by a net force built from the drive force and
//! the kinetic friction `mu·m·g`, chosen from the sign of the current velocity
//! and the held direction keys. Velocity is advanced with explicit Euler steps
//! using the measured tick duration.

use glam::Vec2;

use super::state::Player;
use crate::consts::*;
use crate::to_pixels_vec;

/// Kinetic friction magnitude opposing horizontal motion
#[inline]
pub fn friction_force() -> f32 {
    FRICTION_COEFFICIENT * MASS * GRAVITY
}

/// Net horizontal force for the current velocity and held keys.
///
/// | motion   | pushing forward        | pushing backward   | no key   |
/// |----------|------------------------|--------------------|----------|
/// | moving   | drive - friction (0 at cap) | -2·drive - friction | -friction |
/// | at rest  | drive                  |                    | 0        |
///
/// When both keys are held, right takes precedence.
pub fn horizontal_force(vx: f32, left: bool, right: bool) -> f32 {
    let friction = friction_force();
    if vx > 0.0 {
        if right {
            if vx >= UMAX { 0.0 } else { DRIVE_FORCE - friction }
        } else if left {
            -2.0 * DRIVE_FORCE - friction
        } else {
            -friction
        }
    } else if vx < 0.0 {
        if right {
            2.0 * DRIVE_FORCE + friction
        } else if left {
            if vx <= -UMAX { 0.0 } else { -DRIVE_FORCE + friction }
        } else {
            friction
        }
    } else if right {
        DRIVE_FORCE
    } else if left {
        -DRIVE_FORCE
    } else {
        0.0
    }
}

/// Advance the player's velocity and position by `dt` seconds
pub fn integrate(player: &mut Player, left: bool, right: bool, dt: f32) {
    let vx_before = player.vel.x;
    player.acc = Vec2::new(horizontal_force(vx_before, left, right) / MASS, GRAVITY);
    player.vel += player.acc * dt;

    if right && player.vel.x > UMAX {
        player.vel.x = UMAX;
    }
    if left && !right && player.vel.x < -UMAX {
        player.vel.x = -UMAX;
    }

    // Friction stops a coasting player, it never reverses them
    if !(left || right) && (player.vel.x.abs() <= UMIN || player.vel.x * vx_before < 0.0) {
        player.vel.x = 0.0;
    }
    if player.vel.y.abs() <= UMIN {
        player.vel.y = VY_EPSILON;
    }

    player.move_by(to_pixels_vec(player.vel.x * dt, player.vel.y * dt));
}

/// Launch a jump if the player was grounded on the previous tick
pub fn try_jump(player: &mut Player) -> bool {
    if player.can_jump {
        player.vel.y = JUMP_INITIAL_VELOCITY;
        true
    } else {
        false
    }
}
