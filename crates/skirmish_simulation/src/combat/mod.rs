//! Combat rules module
//!
//! - Константы атаки и dodge (тики при 60 Hz)
//! - `melee::swing`: единое разрешение удара для игрока и врага
//!
//! Игрок и враг используют один и тот же swing, отличается только Guard:
//! враг бьёт по игроку с учётом блока и неуязвимости, игрок по врагу: без.

pub mod melee;

pub use melee::{swing, Guard, MeleeOutcome};

/// Максимальная дистанция удара (между центрами)
pub const ATTACK_RANGE: f32 = 100.0;
/// Урон одного удара
pub const ATTACK_DAMAGE: u32 = 10;
/// Cooldown после удара: 1 секунда при 60 FPS
pub const ATTACK_COOLDOWN: u32 = 60;

/// Длительность dodge: 0.3 секунды (18 тиков)
pub const DODGE_DURATION: u32 = 18;
/// Дистанция dodge: одна клетка сетки
pub const DODGE_DISTANCE: f32 = 100.0;
/// Cooldown после окончания dodge: 1 секунда
pub const DODGE_COOLDOWN: u32 = 60;
