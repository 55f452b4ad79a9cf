//! Game state and core simulation types
//!
//! One collection per entity kind; every collection is walked through the
//! `Entity` trait for advance and render, in draw order.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::animation::{Animator, Facing, PlayerPose, Sprite, resolve_player_facing};
use super::clock::SimClock;
use super::enemy::Enemy;
use super::entity::{AdvanceCtx, Entity, EntityId, EntityKind, KillFlag};
use super::physics;
use super::projectile::{EnemyFireball, Fireball};
use super::rect::Rect;
use crate::consts::*;
use crate::render::{CounterKind, DrawCommand, FrameKey, Surface, life_bar_color};
use crate::world::WorldConfig;

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Loop suspended, clock frozen
    Paused,
    /// Player went through the door
    Cleared,
    /// Player life reached zero
    Died,
}

/// Result of a level as seen by the session after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Running,
    Cleared,
    Died,
}

/// Discrete things that happened during a tick (drained by the host for audio)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    Fire,
    EnemyFire,
    CoinCollected,
    EnemyHit,
    EnemyKilled,
    PlayerHit,
    Explosion,
    Splash,
    Paused,
    Resumed,
    DoorOpened,
    FellOutOfWorld,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    /// Camera-relative box
    pub rect: Rect,
    /// Top-left corner in world coordinates (ignores camera shift)
    pub world_pos: IVec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub facing: Facing,
    pub life: i32,
    pub coins_collected: u32,
    pub lives: i32,
    /// Standing on a platform as of the last collision pass
    pub can_jump: bool,
    /// Had vertical motion when last animated
    pub airborne: bool,
    pub pose: PlayerPose,
    pub anim: Animator,
    last_physics_ms: u64,
    killed: KillFlag,
}

impl Player {
    pub fn new(id: EntityId, rect: Rect, world_pos: IVec2, now_ms: u64) -> Self {
        Self {
            id,
            rect,
            world_pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            facing: Facing::Right,
            life: PLAYER_MAX_LIFE,
            coins_collected: 0,
            lives: 0,
            can_jump: false,
            airborne: false,
            pose: PlayerPose::Standing,
            anim: Animator::new(now_ms),
            last_physics_ms: now_ms,
            killed: KillFlag::default(),
        }
    }

    /// Move both the view box and the world position
    pub fn move_by(&mut self, delta: IVec2) {
        self.rect.translate(delta);
        self.world_pos += delta;
    }

    /// Place the view box at `x`, keeping the world position in step
    pub fn snap_x(&mut self, x: i32) {
        self.move_by(IVec2::new(x - self.rect.x, 0));
    }

    /// Place the view box at `y`, keeping the world position in step
    pub fn snap_y(&mut self, y: i32) {
        self.move_by(IVec2::new(0, y - self.rect.y));
    }

    pub fn set_life(&mut self, life: i32) {
        self.life = life.clamp(0, PLAYER_MAX_LIFE);
    }

    pub fn damage(&mut self, amount: i32) {
        self.set_life(self.life - amount);
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }

    fn animate(&mut self, ctx: &AdvanceCtx) {
        self.facing = resolve_player_facing(self.facing, self.vel.x, ctx.left_held, ctx.right_held);
        let pose = PlayerPose::derive(self.vel.x, self.vel.y);
        self.airborne = pose.is_airborne();
        if pose != self.pose {
            self.pose = pose;
            self.anim.reset();
        }
        self.anim.step_looping(ctx.now_ms, pose.sprite());
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Player
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
        self.animate(ctx);
        let dt = ctx.now_ms.saturating_sub(self.last_physics_ms) as f32 * 0.001;
        self.last_physics_ms = ctx.now_ms;
        physics::integrate(self, ctx.left_held, ctx.right_held, dt);
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::new(self.pose.sprite(), self.facing, self.anim.frame()),
            dest: self.rect,
            rotation_deg: 0.0,
        });
    }
}

/// Background image or world tile layer.
///
/// Moves by `depth · shift` (truncated): 0 is fixed to the screen, 1 moves
/// with the platforms, anything between gives parallax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backdrop {
    pub id: EntityId,
    pub kind: EntityKind,
    pub rect: Rect,
    pub depth: f32,
    killed: KillFlag,
}

impl Backdrop {
    pub fn new(id: EntityId, kind: EntityKind, rect: Rect, depth: f32) -> Self {
        Self {
            id,
            kind,
            rect,
            depth,
            killed: KillFlag::default(),
        }
    }

    fn sprite(&self) -> Sprite {
        if self.kind == EntityKind::Background {
            Sprite::Background
        } else {
            Sprite::WorldTiles
        }
    }
}

impl Entity for Backdrop {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        self.kind
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
        let shift = ctx.world_shift();
        self.rect.translate(IVec2::new(
            (self.depth * shift.x as f32) as i32,
            (self.depth * shift.y as f32) as i32,
        ));
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::plain(self.sprite(), 0),
            dest: self.rect,
            rotation_deg: 0.0,
        });
    }
}

/// Solid box the player stands on or bumps into (invisible unless outlined)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub rect: Rect,
    pub show_outline: bool,
    killed: KillFlag,
}

impl Platform {
    pub fn new(id: EntityId, rect: Rect, show_outline: bool) -> Self {
        Self {
            id,
            rect,
            show_outline,
            killed: KillFlag::default(),
        }
    }
}

impl Entity for Platform {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Platform
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
    }

    fn render(&self, surface: &mut dyn Surface) {
        if self.show_outline {
            surface.draw(DrawCommand::Outline { dest: self.rect });
        }
    }
}

/// Level exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub id: EntityId,
    pub rect: Rect,
    pub opened: bool,
    pub show_outline: bool,
    killed: KillFlag,
}

impl Door {
    pub fn new(id: EntityId, rect: Rect, show_outline: bool) -> Self {
        Self {
            id,
            rect,
            opened: false,
            show_outline,
            killed: KillFlag::default(),
        }
    }

    /// Open if the player is pressing Up. Returns true if this call opened it.
    pub fn try_open(&mut self, up_held: bool) -> bool {
        if up_held && !self.opened {
            self.opened = true;
            return true;
        }
        false
    }
}

impl Entity for Door {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Door
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
    }

    fn render(&self, surface: &mut dyn Surface) {
        if self.show_outline {
            surface.draw(DrawCommand::Outline { dest: self.rect });
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: EntityId,
    pub rect: Rect,
    pub anim: Animator,
    killed: KillFlag,
}

impl Coin {
    pub fn new(id: EntityId, pos: IVec2, now_ms: u64) -> Self {
        Self {
            id,
            rect: Rect::new(pos.x, pos.y, COIN_WIDTH, COIN_HEIGHT),
            anim: Animator::new(now_ms),
            killed: KillFlag::default(),
        }
    }
}

impl Entity for Coin {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Coin
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
        self.anim.step_looping(ctx.now_ms, Sprite::Coin);
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::plain(Sprite::Coin, self.anim.frame()),
            dest: self.rect,
            rotation_deg: 0.0,
        });
    }
}

/// One-shot visual effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Dust under the player's feet on landing
    Splash,
    /// Player fireball meeting enemy fire
    Explosion,
}

impl EffectKind {
    fn sprite(self) -> Sprite {
        match self {
            EffectKind::Splash => Sprite::Splash,
            EffectKind::Explosion => Sprite::Explosion,
        }
    }

    /// Box of the effect spawned relative to `anchor`'s top-left corner
    pub fn placed_at(self, anchor: Rect) -> Rect {
        match self {
            EffectKind::Splash => Rect::new(
                anchor.x + SPLASH_OFFSET_X,
                anchor.y + SPLASH_OFFSET_Y,
                SPLASH_WIDTH,
                SPLASH_HEIGHT,
            ),
            EffectKind::Explosion => Rect::new(
                anchor.x + EXPLOSION_OFFSET_X,
                anchor.y + EXPLOSION_OFFSET_Y,
                EXPLOSION_WIDTH,
                EXPLOSION_HEIGHT,
            ),
        }
    }
}

/// A splash or explosion; removes itself after one pass of its frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub id: EntityId,
    pub kind: EffectKind,
    pub rect: Rect,
    pub anim: Animator,
    killed: KillFlag,
}

impl Effect {
    pub fn new(id: EntityId, kind: EffectKind, anchor: Rect, now_ms: u64) -> Self {
        Self {
            id,
            kind,
            rect: kind.placed_at(anchor),
            anim: Animator::new(now_ms),
            killed: KillFlag::default(),
        }
    }
}

impl Entity for Effect {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        match self.kind {
            EffectKind::Splash => EntityKind::Splash,
            EffectKind::Explosion => EntityKind::Explosion,
        }
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
        if self.anim.step_once(ctx.now_ms, self.kind.sprite()) {
            self.killed.set();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::plain(self.kind.sprite(), self.anim.frame()),
            dest: self.rect,
            rotation_deg: 0.0,
        });
    }
}

const HUD_HEAD_RECT: Rect = Rect::new(20, 16, 48, 48);
const HUD_COIN_RECT: Rect = Rect::new(20, 76, 32, 32);

/// Screen-fixed status bar fed from player stats once per tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hud {
    pub id: EntityId,
    pub life: i32,
    pub coins: u32,
    pub lives: i32,
    pub world: u32,
    pub coin_anim: Animator,
    killed: KillFlag,
}

impl Hud {
    pub fn new(id: EntityId, now_ms: u64) -> Self {
        Self {
            id,
            life: PLAYER_MAX_LIFE,
            coins: 0,
            lives: 0,
            world: 0,
            coin_anim: Animator::new(now_ms),
            killed: KillFlag::default(),
        }
    }

    pub fn sync(&mut self, player: &Player, world: u32) {
        self.life = player.life;
        self.coins = player.coins_collected;
        self.lives = player.lives;
        self.world = world;
    }

    pub fn life_fraction(&self) -> f32 {
        self.life as f32 / PLAYER_MAX_LIFE as f32
    }
}

impl Entity for Hud {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Hud
    }

    fn rect(&self) -> Rect {
        HUD_HEAD_RECT
    }

    fn is_killed(&self) -> bool {
        self.killed.is_set()
    }

    fn kill(&mut self) {
        self.killed.set();
    }

    fn advance(&mut self, ctx: &AdvanceCtx) {
        // Screen-fixed: ignores the camera
        self.coin_anim.step_looping(ctx.now_ms, Sprite::HudCoin);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let fraction = self.life_fraction();
        surface.draw(DrawCommand::LifeBar {
            fraction,
            color: life_bar_color(fraction),
        });
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::plain(Sprite::HudHead, 0),
            dest: HUD_HEAD_RECT,
            rotation_deg: 0.0,
        });
        surface.draw(DrawCommand::Sprite {
            key: FrameKey::plain(Sprite::HudCoin, self.coin_anim.frame()),
            dest: HUD_COIN_RECT,
            rotation_deg: 0.0,
        });
        surface.draw(DrawCommand::Counter {
            kind: CounterKind::Coins,
            value: self.coins as i32,
        });
        surface.draw(DrawCommand::Counter {
            kind: CounterKind::Lives,
            value: self.lives,
        });
        surface.draw(DrawCommand::Counter {
            kind: CounterKind::World,
            value: self.world as i32,
        });
    }
}

/// Complete state of one level in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// 1-based world number shown on the HUD
    pub world_number: u32,
    /// World extent in pixels
    pub world_size: IVec2,
    pub phase: GamePhase,
    pub clock: SimClock,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub background: Backdrop,
    pub tiles: Backdrop,
    pub door: Door,
    pub player: Player,
    pub hud: Hud,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub fireballs: Vec<Fireball>,
    pub enemy_fire: Vec<EnemyFireball>,
    pub effects: Vec<Effect>,
    /// Events raised since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Pause-adjusted time of the last player fireball
    last_fireball_ms: Option<u64>,
    /// Next entity ID
    next_id: u32,
}

/// Size the background image is stretched to
const BACKGROUND_SIZE: IVec2 = IVec2::new(1920, 1080);
const BACKGROUND_TOP: i32 = -300;

impl GameState {
    /// Build a level from its configuration.
    ///
    /// `coins` and `lives` carry the session totals into the new player.
    pub fn load(
        config: &WorldConfig,
        world_number: u32,
        coins: u32,
        lives: i32,
        show_outlines: bool,
        now_ms: u64,
    ) -> Self {
        let mut next_id = 1;
        let mut alloc = || {
            let id = EntityId(next_id);
            next_id += 1;
            id
        };

        let origin = config.origin;
        let background = Backdrop::new(
            alloc(),
            EntityKind::Background,
            Rect::new(0, BACKGROUND_TOP, BACKGROUND_SIZE.x, BACKGROUND_SIZE.y),
            config.background_depth,
        );
        let tiles = Backdrop::new(
            alloc(),
            EntityKind::WorldTiles,
            Rect::new(origin.x, origin.y, config.width, config.height),
            1.0,
        );
        let door = Door::new(alloc(), config.door.translated(origin), show_outlines);

        let start = config.player_start;
        let mut player = Player::new(
            alloc(),
            Rect::new(start.x, start.y, PLAYER_WIDTH, PLAYER_HEIGHT),
            config.player_world_start(),
            now_ms,
        );
        player.coins_collected = coins;
        player.lives = lives;

        let mut hud = Hud::new(alloc(), now_ms);
        hud.sync(&player, world_number);

        let platforms = config
            .platforms
            .iter()
            .map(|r| Platform::new(alloc(), r.translated(origin), show_outlines))
            .collect();
        let coins = config
            .coins
            .iter()
            .map(|p| Coin::new(alloc(), origin + *p, now_ms))
            .collect();
        let enemies = config
            .enemies
            .iter()
            .map(|p| Enemy::new(alloc(), origin + *p, now_ms))
            .collect();

        log::info!(
            "World {} loaded: {}x{}, {} platforms, {} coins, {} enemies",
            world_number,
            config.width,
            config.height,
            config.platforms.len(),
            config.coins.len(),
            config.enemies.len()
        );

        Self {
            world_number,
            world_size: IVec2::new(config.width, config.height),
            phase: GamePhase::Playing,
            clock: SimClock::new(),
            time_ticks: 0,
            background,
            tiles,
            door,
            player,
            hud,
            platforms,
            coins,
            enemies,
            fireballs: Vec::new(),
            enemy_fire: Vec::new(),
            effects: Vec::new(),
            events: Vec::new(),
            last_fireball_ms: None,
            next_id,
        }
    }

    /// World extent in view coordinates, taken from the player's view/world offset
    pub fn world_view_rect(&self) -> Rect {
        let origin = self.player.rect.position() - self.player.world_pos;
        Rect::new(origin.x, origin.y, self.world_size.x, self.world_size.y)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand all pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fire a player fireball if the cooldown has elapsed
    pub fn try_spawn_fireball(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_fireball_ms
            && now_ms.saturating_sub(last) <= FIREBALL_COOLDOWN_MS
        {
            return false;
        }
        self.last_fireball_ms = Some(now_ms);
        let id = self.next_entity_id();
        let fireball = Fireball::spawn(id, self.player.rect, self.player.facing, now_ms);
        log::debug!("Fireball {:?} spawned at {:?}", id, fireball.rect);
        self.fireballs.push(fireball);
        self.push_event(GameEvent::Fire);
        true
    }

    pub fn spawn_enemy_fire(&mut self, enemy_center: IVec2, now_ms: u64) {
        let id = self.next_entity_id();
        let fire = EnemyFireball::spawn(id, enemy_center, self.player.rect.center(), now_ms);
        log::debug!("Enemy fire {:?} spawned, angle {:.3}", id, fire.angle);
        self.enemy_fire.push(fire);
        self.push_event(GameEvent::EnemyFire);
    }

    pub fn spawn_effect(&mut self, kind: EffectKind, anchor: Rect, now_ms: u64) {
        let id = self.next_entity_id();
        log::debug!("{:?} {:?} spawned", kind, id);
        self.effects.push(Effect::new(id, kind, anchor, now_ms));
    }

    /// Every entity in draw order
    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        let fixed: [&dyn Entity; 4] = [&self.background, &self.tiles, &self.door, &self.player];
        fixed
            .into_iter()
            .chain(self.platforms.iter().map(|e| e as &dyn Entity))
            .chain(self.coins.iter().map(|e| e as &dyn Entity))
            .chain(self.enemies.iter().map(|e| e as &dyn Entity))
            .chain(self.fireballs.iter().map(|e| e as &dyn Entity))
            .chain(self.enemy_fire.iter().map(|e| e as &dyn Entity))
            .chain(self.effects.iter().map(|e| e as &dyn Entity))
            .chain(std::iter::once(&self.hud as &dyn Entity))
    }

    /// Every entity in draw order, mutably
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut dyn Entity> + '_ {
        let fixed: [&mut dyn Entity; 4] = [
            &mut self.background,
            &mut self.tiles,
            &mut self.door,
            &mut self.player,
        ];
        fixed
            .into_iter()
            .chain(self.platforms.iter_mut().map(|e| e as &mut dyn Entity))
            .chain(self.coins.iter_mut().map(|e| e as &mut dyn Entity))
            .chain(self.enemies.iter_mut().map(|e| e as &mut dyn Entity))
            .chain(self.fireballs.iter_mut().map(|e| e as &mut dyn Entity))
            .chain(self.enemy_fire.iter_mut().map(|e| e as &mut dyn Entity))
            .chain(self.effects.iter_mut().map(|e| e as &mut dyn Entity))
            .chain(std::iter::once(&mut self.hud as &mut dyn Entity))
    }

    pub fn outcome(&self) -> LevelOutcome {
        match self.phase {
            GamePhase::Cleared => LevelOutcome::Cleared,
            GamePhase::Died => LevelOutcome::Died,
            GamePhase::Playing | GamePhase::Paused => LevelOutcome::Running,
        }
    }

    /// Hand every entity to the render collaborator
    pub fn render(&self, surface: &mut dyn Surface) {
        for entity in self.entities() {
            entity.render(surface);
        }
    }

    /// Push player stats to the HUD and the player snapshot to every enemy
    pub fn propagate_stats(&mut self) {
        self.hud.sync(&self.player, self.world_number);
        let player_pos = self.player.rect.position();
        for enemy in &mut self.enemies {
            enemy.track_player(player_pos);
        }
    }
}
