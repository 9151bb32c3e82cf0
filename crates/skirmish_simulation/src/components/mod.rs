//! Общие компоненты и ресурсы
//!
//! Организация по доменам:
//! - actor: Combatant (здоровье, позиция, cooldown), AttackProfile
//! - movement: Direction, MoveKeys, MapBounds, MovementReport
//! - camera: Viewport, CameraView (follow + clamp)

pub mod actor;
pub mod camera;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use camera::*;
pub use movement::*;
