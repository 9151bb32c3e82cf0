//! Camera follow: только числовой контракт
//!
//! Viewport центрируется на игроке и clamp'ится в прямоугольник карты.
//! Как именно рисовать: забота client'а.

use bevy::prelude::*;

use super::movement::MapBounds;

/// Размер видимой области (world units)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Смещение камеры (top-left видимой области в координатах карты)
///
/// Инвариант: 0 ≤ offset.x ≤ map.width − viewport.width (аналогично по y)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct CameraView {
    pub offset: Vec2,
}

impl CameraView {
    /// Центрировать на квадрате `target_position`/`target_size` и clamp'нуть в карту
    pub fn follow(
        target_position: Vec2,
        target_size: f32,
        viewport: &Viewport,
        bounds: &MapBounds,
    ) -> Self {
        let centered = target_position + Vec2::splat(target_size / 2.0)
            - Vec2::new(viewport.width / 2.0, viewport.height / 2.0);

        let offset = Vec2::new(
            centered.x.clamp(0.0, (bounds.width - viewport.width).max(0.0)),
            centered.y.clamp(0.0, (bounds.height - viewport.height).max(0.0)),
        );

        Self { offset }
    }

    /// Координаты карты → координаты экрана
    pub fn to_screen(&self, world_position: Vec2) -> Vec2 {
        world_position - self.offset
    }
}
