//! Scrolling camera
//!
//! The viewport is fixed; the world moves under it. When the player's view box
//! enters a margin band near a screen edge, the camera computes a scroll delta
//! that every entity then subtracts from its box during advance. At the world
//! edges scrolling stops and the player is clamped instead.

use glam::IVec2;

use super::state::Player;
use crate::consts::*;

/// Scroll delta for this tick.
///
/// May clamp the player at the world's left or right edge (view box and world
/// position together); otherwise leaves the player untouched.
pub fn scroll(player: &mut Player, world_size: IVec2) -> IVec2 {
    let mut delta = IVec2::ZERO;
    let right_band = SCREEN_WIDTH - CAMERA_SCROLL_GAP_X;
    let bottom_band = SCREEN_HEIGHT - CAMERA_SCROLL_GAP_Y;

    if player.rect.right() > right_band {
        if player.world_pos.x + PLAYER_WIDTH < world_size.x - CAMERA_SCROLL_GAP_X {
            delta.x = player.rect.right() - right_band;
        } else if player.world_pos.x + PLAYER_WIDTH >= world_size.x {
            player.rect.x = SCREEN_WIDTH - PLAYER_WIDTH;
            player.world_pos.x = world_size.x - PLAYER_WIDTH;
        }
    }

    if player.rect.left() < CAMERA_SCROLL_GAP_X {
        if player.world_pos.x > CAMERA_SCROLL_GAP_X {
            delta.x = player.rect.left() - CAMERA_SCROLL_GAP_X;
        } else if player.rect.left() < 0 {
            player.rect.x = 0;
            player.world_pos.x = 0;
        }
    }

    if player.rect.top() < CAMERA_SCROLL_GAP_Y {
        delta.y = player.rect.top() - CAMERA_SCROLL_GAP_Y;
    }

    if player.rect.bottom() > bottom_band
        && player.world_pos.y + PLAYER_HEIGHT < world_size.y - CAMERA_SCROLL_GAP_Y
    {
        delta.y = player.rect.bottom() - bottom_band;
    }

    delta
}
