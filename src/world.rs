//! Level data
//!
//! A world is its size, the view-space origin of its top-left corner at load
//! time, the player's start box and the static spawn lists. Spawn positions
//! are world-relative and get offset by the origin when a level is built.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Rect;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("malformed world data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read world file: {0}")]
    Io(#[from] std::io::Error),
    #[error("world size must be positive, got {0}x{1}")]
    NonPositiveSize(i32, i32),
    #[error("world has no platforms")]
    NoPlatforms,
    #[error("{what} at ({x}, {y}) lies outside the world")]
    OutsideWorld { what: &'static str, x: i32, y: i32 },
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub name: String,
    pub width: i32,
    pub height: i32,
    /// View-space position of the world's top-left corner at load
    pub origin: IVec2,
    /// Player's view-space start position
    pub player_start: IVec2,
    /// Background parallax factor (0 = fixed, 1 = moves with the world)
    #[serde(default = "default_depth")]
    pub background_depth: f32,
    #[serde(default)]
    pub background_image: String,
    #[serde(default)]
    pub tiles_image: String,
    #[serde(default)]
    pub music: String,
    pub platforms: Vec<Rect>,
    #[serde(default)]
    pub coins: Vec<IVec2>,
    #[serde(default)]
    pub enemies: Vec<IVec2>,
    pub door: Rect,
}

fn default_depth() -> f32 {
    0.3
}

/// Origin that puts the world's bottom edge on the screen's bottom edge
pub fn bottom_aligned_origin(height: i32) -> IVec2 {
    IVec2::new(0, SCREEN_HEIGHT - height)
}

impl WorldConfig {
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, WorldError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, WorldError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Player start in world coordinates
    pub fn player_world_start(&self) -> IVec2 {
        IVec2::new(
            self.player_start.x - self.origin.x,
            self.height - (SCREEN_HEIGHT - self.player_start.y),
        )
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn check_inside(&self, what: &'static str, rect: Rect) -> Result<(), WorldError> {
        let world = self.bounds();
        let inside = rect.left() >= world.left()
            && rect.right() <= world.right()
            && rect.top() >= world.top()
            && rect.bottom() <= world.bottom();
        if inside {
            Ok(())
        } else {
            Err(WorldError::OutsideWorld {
                what,
                x: rect.x,
                y: rect.y,
            })
        }
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(WorldError::NonPositiveSize(self.width, self.height));
        }
        if self.platforms.is_empty() {
            return Err(WorldError::NoPlatforms);
        }
        let start = self.player_world_start();
        self.check_inside(
            "player start",
            Rect::new(start.x, start.y, PLAYER_WIDTH, PLAYER_HEIGHT),
        )?;
        self.check_inside("door", self.door)?;
        for coin in &self.coins {
            self.check_inside("coin", Rect::new(coin.x, coin.y, COIN_WIDTH, COIN_HEIGHT))?;
        }
        for enemy in &self.enemies {
            self.check_inside("enemy", Rect::new(enemy.x, enemy.y, ENEMY_WIDTH, ENEMY_HEIGHT))?;
        }
        if self.origin != bottom_aligned_origin(self.height) {
            log::warn!(
                "World '{}' origin {:?} is not bottom aligned; player world position will drift",
                self.name,
                self.origin
            );
        }
        Ok(())
    }

    /// Small fixed layout used by unit tests
    #[cfg(test)]
    pub(crate) fn test_world() -> Self {
        let height = 1440;
        Self {
            name: "Test".into(),
            width: 4000,
            height,
            origin: bottom_aligned_origin(height),
            player_start: IVec2::new(100, 500),
            background_depth: 0.5,
            background_image: String::new(),
            tiles_image: String::new(),
            music: String::new(),
            platforms: vec![
                Rect::new(0, 1300, 1400, 140),
                Rect::new(1600, 1300, 2400, 140),
                Rect::new(700, 1100, 300, 40),
            ],
            coins: vec![IVec2::new(760, 1040), IVec2::new(820, 1040), IVec2::new(1200, 1240)],
            enemies: vec![IVec2::new(2200, 1236)],
            door: Rect::new(3800, 1180, 80, 120),
        }
    }
}

/// Built-in campaign, in play order
pub fn campaign() -> Vec<WorldConfig> {
    vec![
        WorldConfig {
            name: "Ember Plains".into(),
            width: 5000,
            height: 1440,
            origin: bottom_aligned_origin(1440),
            player_start: IVec2::new(100, 500),
            background_depth: 0.3,
            background_image: "world1/background.png".into(),
            tiles_image: "world1/tiles.png".into(),
            music: "world1/theme.ogg".into(),
            platforms: vec![
                Rect::new(0, 1300, 1500, 140),
                Rect::new(1700, 1300, 1300, 140),
                Rect::new(3200, 1300, 1800, 140),
                Rect::new(700, 1100, 300, 40),
                Rect::new(1150, 950, 250, 40),
                Rect::new(2300, 1120, 400, 40),
                Rect::new(3500, 1080, 300, 40),
            ],
            coins: vec![
                IVec2::new(760, 1040),
                IVec2::new(820, 1040),
                IVec2::new(880, 1040),
                IVec2::new(1220, 890),
                IVec2::new(1280, 890),
                IVec2::new(2400, 1060),
                IVec2::new(2460, 1060),
                IVec2::new(3600, 1020),
            ],
            enemies: vec![IVec2::new(2000, 1236), IVec2::new(2800, 1236), IVec2::new(4000, 1236)],
            door: Rect::new(4800, 1180, 80, 120),
        },
        WorldConfig {
            name: "Cinder Heights".into(),
            width: 6000,
            height: 2160,
            origin: bottom_aligned_origin(2160),
            player_start: IVec2::new(100, 500),
            background_depth: 0.5,
            background_image: "world2/background.png".into(),
            tiles_image: "world2/tiles.png".into(),
            music: "world2/theme.ogg".into(),
            platforms: vec![
                Rect::new(0, 2020, 1200, 140),
                Rect::new(1400, 1900, 600, 40),
                Rect::new(2200, 1750, 500, 40),
                Rect::new(2900, 1600, 800, 40),
                Rect::new(3900, 1800, 900, 40),
                Rect::new(5000, 2020, 1000, 140),
                Rect::new(2400, 1450, 200, 40),
            ],
            coins: vec![
                IVec2::new(1500, 1840),
                IVec2::new(2300, 1690),
                IVec2::new(2450, 1390),
                IVec2::new(2500, 1390),
                IVec2::new(3100, 1540),
                IVec2::new(4200, 1740),
            ],
            enemies: vec![
                IVec2::new(3300, 1536),
                IVec2::new(4400, 1736),
                IVec2::new(5400, 1956),
            ],
            door: Rect::new(5850, 1900, 80, 120),
        },
    ]
}

/// Build a random but valid world from a seed.
///
/// The same seed always yields the same world.
pub fn generate(seed: u64) -> WorldConfig {
    let mut rng = Pcg32::seed_from_u64(seed);
    let height = 1440;
    let floor_y = 1300;
    let floor_h = height - floor_y;

    let mut platforms = Vec::new();
    let mut coins = Vec::new();
    let mut enemies = Vec::new();

    // Start pad under the player
    let mut x = 0;
    let first_len = rng.random_range(900..1400);
    platforms.push(Rect::new(x, floor_y, first_len, floor_h));
    x += first_len;

    let segments: u32 = rng.random_range(3..7);
    for _ in 0..segments {
        x += rng.random_range(120..220);
        let len = rng.random_range(600..1400);
        platforms.push(Rect::new(x, floor_y, len, floor_h));

        if rng.random_bool(0.7) {
            let ex = x + rng.random_range(100..len - ENEMY_WIDTH);
            enemies.push(IVec2::new(ex, floor_y - ENEMY_HEIGHT));
        }

        if rng.random_bool(0.6) {
            let pw = rng.random_range(200..400);
            let px = x + rng.random_range(0..len - pw);
            let py = floor_y - rng.random_range(150..260);
            platforms.push(Rect::new(px, py, pw, 40));
            let count = rng.random_range(1..4);
            for i in 0..count {
                coins.push(IVec2::new(px + 20 + i * 50, py - 60));
            }
        }
        x += len;
    }

    let width = x;
    let door = Rect::new(width - 200, floor_y - 120, 80, 120);

    let config = WorldConfig {
        name: format!("Generated {seed}"),
        width,
        height,
        origin: bottom_aligned_origin(height),
        player_start: IVec2::new(100, 500),
        background_depth: 0.3,
        background_image: String::new(),
        tiles_image: String::new(),
        music: String::new(),
        platforms,
        coins,
        enemies,
        door,
    };
    log::debug!(
        "Generated world from seed {}: {} wide, {} platforms",
        seed,
        config.width,
        config.platforms.len()
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_is_valid() {
        for world in campaign() {
            world.validate().unwrap();
        }
    }

    #[test]
    fn test_generate_is_deterministic_and_valid() {
        for seed in [0, 1, 42, 12345, u64::MAX] {
            let a = generate(seed);
            let b = generate(seed);
            assert_eq!(a, b);
            a.validate().unwrap();
        }
        assert_ne!(generate(1), generate(2));
    }

    #[test]
    fn test_json_round_trip_keeps_layout() {
        let world = WorldConfig::test_world();
        let json = world.to_json().unwrap();
        assert_eq!(WorldConfig::from_json(&json).unwrap(), world);
    }

    #[test]
    fn test_player_start_maps_to_world_bottom() {
        let world = WorldConfig::test_world();
        // 500 px from the top of a 720 px screen is 220 px above the world bottom
        assert_eq!(world.player_world_start(), IVec2::new(100, 1440 - 220));
    }

    #[test]
    fn test_rejects_bad_worlds() {
        let mut world = WorldConfig::test_world();
        world.width = 0;
        assert!(matches!(world.validate(), Err(WorldError::NonPositiveSize(0, _))));

        let mut world = WorldConfig::test_world();
        world.platforms.clear();
        assert!(matches!(world.validate(), Err(WorldError::NoPlatforms)));

        let mut world = WorldConfig::test_world();
        world.door = Rect::new(world.width - 10, 0, 80, 120);
        assert!(matches!(
            world.validate(),
            Err(WorldError::OutsideWorld { what: "door", .. })
        ));

        let mut world = WorldConfig::test_world();
        world.player_start = IVec2::new(100, SCREEN_HEIGHT + 100);
        assert!(matches!(
            world.validate(),
            Err(WorldError::OutsideWorld { what: "player start", .. })
        ));
    }

    #[test]
    fn test_from_json_defaults_optional_fields() {
        let json = r#"{
            "name": "Tiny",
            "width": 2000,
            "height": 720,
            "origin": [0, 0],
            "player_start": [100, 500],
            "platforms": [{"x": 0, "y": 600, "w": 2000, "h": 120}],
            "door": {"x": 1800, "y": 480, "w": 80, "h": 120}
        }"#;
        let world = WorldConfig::from_json(json).unwrap();
        assert!(world.coins.is_empty());
        assert_eq!(world.background_depth, 0.3);
    }
}
