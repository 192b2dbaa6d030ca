//! Tunable gameplay constants.
//!
//! Defaults live in code. A partial RON file can override any field; missing
//! fields keep their default thanks to `#[serde(default)]`.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

/// Where the full app looks for overrides.
pub const TUNABLES_PATH: &str = "assets/tunables.ron";

#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub gravity: f32,
    /// Length of the downward ground probe below a collider's lower bound.
    pub ground_probe_distance: f32,
    /// Fixed RNG seed for reproducible runs. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub spawn: SpawnTuning,
    pub game_over: GameOverTuning,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 64.0,
            gravity: 1600.0,
            ground_probe_distance: 6.0,
            seed: None,
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            spawn: SpawnTuning::default(),
            game_over: GameOverTuning::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub lives: u32,
    pub block_duration: f32,
    /// Attack hitbox offset for a right-facing player. Mirrored when facing left.
    pub attack_offset_x: f32,
    pub attack_offset_y: f32,
    pub attack_radius: f32,
    /// Minimum time between attacks. Zero leaves attacks limited by input only.
    pub attack_cooldown: f32,
    pub kill_reward: u32,
    /// How long the reported state stays `Attacking` after a swing.
    pub attack_anim_time: f32,
    /// How long the reported state stays `Hit` after losing a life.
    pub hit_react_time: f32,
    pub size_x: f32,
    pub size_y: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 320.0,
            jump_velocity: 640.0,
            lives: 3,
            block_duration: 1.0,
            attack_offset_x: 40.0,
            attack_offset_y: 0.0,
            attack_radius: 32.0,
            attack_cooldown: 0.0,
            kill_reward: 100,
            attack_anim_time: 0.35,
            hit_react_time: 0.3,
            size_x: 32.0,
            size_y: 56.0,
            spawn_x: 0.0,
            spawn_y: -200.0,
        }
    }
}

impl PlayerTuning {
    pub fn attack_offset(&self) -> Vec2 {
        Vec2::new(self.attack_offset_x, self.attack_offset_y)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub run_speed: f32,
    pub jump_velocity: f32,
    pub jump_interval_min: f32,
    pub jump_interval_max: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Delay between starting an attack and resolving its hit.
    pub attack_windup: f32,
    pub health: i32,
    /// Delay between death and removal.
    pub despawn_delay: f32,
    pub size_x: f32,
    pub size_y: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            run_speed: 192.0,
            jump_velocity: 320.0,
            jump_interval_min: 2.0,
            jump_interval_max: 5.0,
            attack_range: 40.0,
            attack_cooldown: 1.0,
            attack_windup: 0.7,
            health: 100,
            despawn_delay: 1.0,
            size_x: 32.0,
            size_y: 48.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub spawn_y: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_spawn_interval: f32,
    pub max_spawn_interval: f32,
    /// Seconds removed from both interval bounds per second of level time.
    pub acceleration: f32,
    pub min_allowed_interval: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            spawn_y: 320.0,
            min_x: -640.0,
            max_x: 640.0,
            min_spawn_interval: 5.0,
            max_spawn_interval: 10.0,
            acceleration: 0.1,
            min_allowed_interval: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameOverTuning {
    pub zoom_duration: f32,
    /// Target orthographic scale as a fraction of the starting one.
    pub zoom_factor: f32,
    pub fade_duration: f32,
}

impl Default for GameOverTuning {
    fn default() -> Self {
        Self { zoom_duration: 3.0, zoom_factor: 0.5, fade_duration: 3.0 }
    }
}

/// Error type for tunables loading failures.
#[derive(Debug)]
pub struct TunablesError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for TunablesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for TunablesError {}

impl Tunables {
    /// Parse tunables from RON text and normalize them.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<Tunables>(text).map(Tunables::validated)
    }

    /// Load tunables from a RON file.
    pub fn load(path: &Path) -> Result<Self, TunablesError> {
        let file = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| TunablesError {
            file: file.clone(),
            message: format!("IO error: {e}"),
        })?;

        Self::from_ron(&text).map_err(|e| TunablesError {
            file,
            message: format!("Parse error: {e}"),
        })
    }

    /// Load overrides if the file exists, otherwise use defaults.
    ///
    /// A file that exists but fails to parse is a configuration mistake: it is
    /// reported and the defaults are used.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No tunables file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(t) => {
                info!("Loaded tunables from {}", path.display());
                t
            }
            Err(e) => {
                warn!("{e}; using default tunables");
                Self::default()
            }
        }
    }

    /// Fix up inverted ranges and negative durations.
    pub fn validated(mut self) -> Self {
        let spawn = &mut self.spawn;
        if spawn.min_spawn_interval > spawn.max_spawn_interval {
            warn!(
                "min_spawn_interval {} > max_spawn_interval {}; swapping",
                spawn.min_spawn_interval, spawn.max_spawn_interval
            );
            std::mem::swap(&mut spawn.min_spawn_interval, &mut spawn.max_spawn_interval);
        }
        if spawn.min_x > spawn.max_x {
            warn!("spawn min_x {} > max_x {}; swapping", spawn.min_x, spawn.max_x);
            std::mem::swap(&mut spawn.min_x, &mut spawn.max_x);
        }
        spawn.min_allowed_interval = spawn.min_allowed_interval.max(0.0);
        spawn.acceleration = spawn.acceleration.max(0.0);

        let enemy = &mut self.enemy;
        if enemy.jump_interval_min > enemy.jump_interval_max {
            warn!(
                "jump_interval_min {} > jump_interval_max {}; swapping",
                enemy.jump_interval_min, enemy.jump_interval_max
            );
            std::mem::swap(&mut enemy.jump_interval_min, &mut enemy.jump_interval_max);
        }
        enemy.attack_windup = enemy.attack_windup.max(0.0);
        enemy.attack_cooldown = enemy.attack_cooldown.max(0.0);
        enemy.despawn_delay = enemy.despawn_delay.max(0.0);

        let player = &mut self.player;
        player.block_duration = player.block_duration.max(0.0);
        player.attack_cooldown = player.attack_cooldown.max(0.0);
        player.attack_radius = player.attack_radius.max(0.0);

        self.game_over.zoom_duration = self.game_over.zoom_duration.max(0.0);
        self.game_over.fade_duration = self.game_over.fade_duration.max(0.0);

        self
    }
}
