//! Tuning: все числовые константы игры в одном месте
//!
//! Default значения совпадают с константами `combat` модуля.
//! Можно переопределить из RON файла (отсутствующие поля → default):
//!
//! ```ron
//! (
//!     player_speed: 6.0,
//!     map_width: 2000.0,
//! )
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::combat::{
    ATTACK_COOLDOWN, ATTACK_DAMAGE, ATTACK_RANGE, DODGE_COOLDOWN, DODGE_DISTANCE, DODGE_DURATION,
};

/// Выше этого FixedUpdate timestep округляется до нуля
pub const MAX_TICK_RATE: f64 = 1000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tuning data: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid tuning value: {0}")]
    Invalid(&'static str),
}

/// Игровые константы (размеры, скорости, cooldowns, карта)
///
/// Все таймеры: в тиках (60 тиков = 1 секунда при TICK_RATE 60).
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Частота симуляции (ticks/sec)
    pub tick_rate: f64,

    pub map_width: f32,
    pub map_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,

    pub player_size: f32,
    pub player_max_health: u32,
    pub player_speed: f32,
    /// Скорость пока зажат блок
    pub player_blocking_speed: f32,
    /// Стартовая позиция игрока (top-left), None → центр карты
    pub player_start: Option<(f32, f32)>,

    pub attack_range: f32,
    pub attack_damage: u32,
    pub attack_cooldown: u32,

    pub dodge_duration: u32,
    pub dodge_distance: f32,
    pub dodge_cooldown: u32,

    pub enemy_size: f32,
    pub enemy_max_health: u32,
    pub enemy_speed: f32,
    pub enemy_attack_range: f32,
    pub enemy_attack_damage: u32,
    pub enemy_attack_cooldown: u32,
    /// Точка спавна врага для `EnemySpawn::Fixed` пресетов
    pub enemy_spawn: (f32, f32),

    /// Шаг сетки фона (только для рендера)
    pub grid_spacing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,

            map_width: 1600.0,
            map_height: 1200.0,
            viewport_width: 800.0,
            viewport_height: 600.0,

            player_size: 50.0,
            player_max_health: 100,
            player_speed: 5.0,
            player_blocking_speed: 2.0,
            player_start: None,

            attack_range: ATTACK_RANGE,
            attack_damage: ATTACK_DAMAGE,
            attack_cooldown: ATTACK_COOLDOWN,

            dodge_duration: DODGE_DURATION,
            dodge_distance: DODGE_DISTANCE,
            dodge_cooldown: DODGE_COOLDOWN,

            enemy_size: 50.0,
            enemy_max_health: 100,
            enemy_speed: 4.0, // медленнее игрока (5)
            enemy_attack_range: ATTACK_RANGE,
            enemy_attack_damage: ATTACK_DAMAGE,
            enemy_attack_cooldown: ATTACK_COOLDOWN,
            enemy_spawn: (300.0, 300.0),

            grid_spacing: 100.0,
        }
    }
}

impl Tuning {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = ron::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Значения, при которых clamp/нормализация теряют смысл
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0 && self.tick_rate <= MAX_TICK_RATE) {
            return Err(ConfigError::Invalid("tick_rate must be in (0, 1000]"));
        }

        let positive = [
            self.map_width,
            self.map_height,
            self.viewport_width,
            self.viewport_height,
            self.player_size,
            self.enemy_size,
            self.grid_spacing,
        ];
        if !positive.iter().all(|value| value.is_finite() && *value > 0.0) {
            return Err(ConfigError::Invalid("map, viewport, sizes and grid_spacing must be positive"));
        }

        let non_negative = [
            self.player_speed,
            self.player_blocking_speed,
            self.attack_range,
            self.dodge_distance,
            self.enemy_speed,
            self.enemy_attack_range,
        ];
        if !non_negative.iter().all(|value| value.is_finite() && *value >= 0.0) {
            return Err(ConfigError::Invalid("speeds, ranges and dodge_distance must be non-negative"));
        }

        let (spawn_x, spawn_y) = self.enemy_spawn;
        let start_is_finite = self
            .player_start
            .is_none_or(|(x, y)| x.is_finite() && y.is_finite());
        if !(spawn_x.is_finite() && spawn_y.is_finite() && start_is_finite) {
            return Err(ConfigError::Invalid("spawn positions must be finite"));
        }

        if self.player_max_health == 0 || self.enemy_max_health == 0 {
            return Err(ConfigError::Invalid("max health must be positive"));
        }
        if self.dodge_duration == 0 {
            return Err(ConfigError::Invalid("dodge_duration must be at least one tick"));
        }
        if self.player_size > self.map_width
            || self.player_size > self.map_height
            || self.enemy_size > self.map_width
            || self.enemy_size > self.map_height
        {
            return Err(ConfigError::Invalid("combatant does not fit on the map"));
        }
        if self.viewport_width > self.map_width || self.viewport_height > self.map_height {
            return Err(ConfigError::Invalid("viewport is larger than the map"));
        }
        Ok(())
    }

    /// Стартовая позиция игрока: явная или центр карты
    pub fn player_start_position(&self) -> Vec2 {
        match self.player_start {
            Some((x, y)) => Vec2::new(x, y),
            None => Vec2::new(self.map_width / 2.0, self.map_height / 2.0),
        }
    }
}
