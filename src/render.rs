//! Render collaborator contract
//!
//! The core never touches pixels. Each entity emits `DrawCommand`s into a
//! `Surface`; the host resolves `FrameKey`s through a `FrameTable` built once
//! at asset-load time and blits whatever images it loaded for them.

use crate::sim::animation::{Facing, Sprite};
use crate::sim::rect::Rect;

/// One image of one sequence in one facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub sprite: Sprite,
    pub facing: Facing,
    pub frame: usize,
}

impl FrameKey {
    pub fn new(sprite: Sprite, facing: Facing, frame: usize) -> Self {
        Self {
            sprite,
            facing,
            frame,
        }
    }

    /// Key for sprites without a mirrored set
    pub fn plain(sprite: Sprite, frame: usize) -> Self {
        Self::new(sprite, Facing::Right, frame)
    }
}

/// Flat index of every frame the host must preload.
///
/// Mirrored sequences occupy `2 * frame_count` slots (left set first).
#[derive(Debug, Clone)]
pub struct FrameTable {
    offsets: [usize; Sprite::ALL.len()],
    len: usize,
}

impl Default for FrameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTable {
    pub fn new() -> Self {
        let mut offsets = [0; Sprite::ALL.len()];
        let mut len = 0;
        for (slot, sprite) in Sprite::ALL.iter().enumerate() {
            offsets[slot] = len;
            let sets = if sprite.is_mirrored() { 2 } else { 1 };
            len += sprite.frame_count() * sets;
        }
        Self { offsets, len }
    }

    /// Total number of frame slots
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot for a key, or None if the frame index is out of range
    pub fn index(&self, key: FrameKey) -> Option<usize> {
        let count = key.sprite.frame_count();
        if key.frame >= count {
            return None;
        }
        let slot = Sprite::ALL.iter().position(|s| *s == key.sprite)?;
        let set = if key.sprite.is_mirrored() {
            key.facing.index()
        } else {
            0
        };
        Some(self.offsets[slot] + set * count + key.frame)
    }

    /// Iterate every key in slot order
    pub fn keys(&self) -> impl Iterator<Item = FrameKey> + '_ {
        Sprite::ALL.iter().flat_map(|&sprite| {
            let facings: &[Facing] = if sprite.is_mirrored() {
                &[Facing::Left, Facing::Right]
            } else {
                &[Facing::Right]
            };
            facings.iter().flat_map(move |&facing| {
                (0..sprite.frame_count()).map(move |frame| FrameKey::new(sprite, facing, frame))
            })
        })
    }
}

/// HUD counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Coins,
    Lives,
    World,
}

/// A single draw request
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        key: FrameKey,
        dest: Rect,
        /// Counter-clockwise rotation in degrees (enemy fire only)
        rotation_deg: f32,
    },
    /// Debug outline of a collision box
    Outline { dest: Rect },
    LifeBar { fraction: f32, color: [u8; 3] },
    Counter { kind: CounterKind, value: i32 },
}

/// Anything that accepts draw commands
pub trait Surface {
    fn draw(&mut self, command: DrawCommand);
}

/// Surface that just records commands (headless runs and tests)
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn sprites(&self) -> impl Iterator<Item = (&FrameKey, &Rect)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite { key, dest, .. } => Some((key, dest)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Life bar colour: red when empty, mint green when full
pub fn life_bar_color(fraction: f32) -> [u8; 3] {
    let f = fraction.clamp(0.0, 1.0);
    let red = (237.0 * (1.0 - f)) as u8;
    let green = (41.0 + (255.0 - 41.0) * f) as u8;
    let blue = (56.0 + (127.0 - 56.0) * f) as u8;
    [red, green, blue]
}
