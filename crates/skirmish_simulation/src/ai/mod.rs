//! Enemy AI module
//!
//! Простой pursue-and-strike: идти к игроку до радиуса атаки, затем бить по cooldown.

pub mod enemy;

// Re-export основных типов
pub use enemy::{EnemyMode, EnemyState};
