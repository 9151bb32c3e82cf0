//! EncounterConfig: то, чем exploration и fighting отличаются друг от друга
//!
//! Один EncounterLoop на оба режима, различия только здесь:
//! - backdrop (как рисовать фон, для client'а)
//! - spawn policy врага
//! - win condition (что делать, когда враг повержен)

use bevy::prelude::*;
use rand::Rng;

use crate::components::MapBounds;
use crate::config::Tuning;

/// Игровой режим
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum GameMode {
    Exploration,
    Fighting,
}

impl GameMode {
    /// Режим, в который ведёт SwitchMode
    pub fn other(self) -> Self {
        match self {
            GameMode::Exploration => GameMode::Fighting,
            GameMode::Fighting => GameMode::Exploration,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameMode::Exploration => "Exploration Mode",
            GameMode::Fighting => "Fighting Mode",
        }
    }
}

/// Фон карты (только для рендера)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum Backdrop {
    /// Белая карта с линиями сетки каждые `spacing` units
    Grid { spacing: f32 },
    /// Открытая белая карта без сетки
    Plain,
}

/// Где появляется враг в начале сессии
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum EnemySpawn {
    /// Фиксированная точка (top-left), clamp в карту
    Fixed { x: f32, y: f32 },
    /// Случайная точка (DeterministicRng) с отступом от краёв
    Random { margin: f32 },
}

impl EnemySpawn {
    /// Top-left позиция врага размера `size` внутри `bounds`
    pub fn resolve(&self, size: f32, bounds: &MapBounds, rng: &mut impl Rng) -> Vec2 {
        match *self {
            EnemySpawn::Fixed { x, y } => bounds.clamp_box(Vec2::new(x, y), size),
            EnemySpawn::Random { margin } => {
                let max_x = (bounds.width - size - margin).max(margin);
                let max_y = (bounds.height - size - margin).max(margin);
                let x = rng.gen_range(margin..=max_x);
                let y = rng.gen_range(margin..=max_y);
                bounds.clamp_box(Vec2::new(x, y), size)
            }
        }
    }
}

/// Что происходит, когда враг повержен
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum WinCondition {
    /// Ничего: сессия продолжается, пока игрок не выйдет/не переключит режим
    #[default]
    None,
    /// Победа → SwitchMode (переход к следующему encounter)
    SwitchModeOnEnemyDefeat,
}

#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
pub struct EncounterConfig {
    pub mode: GameMode,
    pub backdrop: Backdrop,
    pub spawn: EnemySpawn,
    pub win: WinCondition,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::fighting(&Tuning::default())
    }
}

impl EncounterConfig {
    /// Exploration: победа над врагом ведёт в fighting
    pub fn exploration(tuning: &Tuning) -> Self {
        Self {
            mode: GameMode::Exploration,
            backdrop: Backdrop::Plain,
            spawn: EnemySpawn::Fixed {
                x: tuning.enemy_spawn.0,
                y: tuning.enemy_spawn.1,
            },
            win: WinCondition::SwitchModeOnEnemyDefeat,
        }
    }

    /// Fighting: арена, после победы остаёмся до выхода/переключения
    pub fn fighting(tuning: &Tuning) -> Self {
        Self {
            mode: GameMode::Fighting,
            backdrop: Backdrop::Grid {
                spacing: tuning.grid_spacing,
            },
            spawn: EnemySpawn::Fixed {
                x: tuning.enemy_spawn.0,
                y: tuning.enemy_spawn.1,
            },
            win: WinCondition::None,
        }
    }

    pub fn for_mode(mode: GameMode, tuning: &Tuning) -> Self {
        match mode {
            GameMode::Exploration => Self::exploration(tuning),
            GameMode::Fighting => Self::fighting(tuning),
        }
    }

    pub fn with_spawn(mut self, spawn: EnemySpawn) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn with_win(mut self, win: WinCondition) -> Self {
        self.win = win;
        self
    }
}
