//! Movement primitives: направления, зажатые клавиши, границы карты
//!
//! Экранные координаты: x вправо, y ВНИЗ (Up = -Y).

use bevy::prelude::*;

/// Одно из четырёх направлений (facing, dodge direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Фиксированный порядок сканирования клавиш
    pub const SCAN_ORDER: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Клавиша WASD (для диагностики)
    pub fn key_label(self) -> &'static str {
        match self {
            Direction::Up => "W",
            Direction::Down => "S",
            Direction::Left => "A",
            Direction::Right => "D",
        }
    }
}

/// Набор зажатых клавиш движения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct MoveKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    pub const NONE: MoveKeys = MoveKeys {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub fn from_directions(directions: &[Direction]) -> Self {
        let mut keys = Self::NONE;
        for direction in directions {
            keys.press(*direction);
        }
        keys
    }

    pub fn press(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Зажатые направления в порядке up, down, left, right
    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::SCAN_ORDER
            .into_iter()
            .filter(move |direction| self.is_held(*direction))
    }

    pub fn is_empty(&self) -> bool {
        self.held().next().is_none()
    }

    /// Сумма единичных векторов (не нормализована)
    pub fn combined(&self) -> Vec2 {
        self.held().map(Direction::unit).sum()
    }
}

/// Прямоугольник карты [0,0] × [width,height]
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::new(1600.0, 1200.0)
    }
}

impl MapBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp top-left угла квадрата `size` внутрь карты
    pub fn clamp_box(&self, position: Vec2, size: f32) -> Vec2 {
        Vec2::new(
            position.x.clamp(0.0, (self.width - size).max(0.0)),
            position.y.clamp(0.0, (self.height - size).max(0.0)),
        )
    }

    pub fn contains_box(&self, position: Vec2, size: f32) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x <= self.width - size
            && position.y <= self.height - size
    }
}

/// Результат `resolve_movement` (для диагностики и тестов)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovementReport {
    pub moved: bool,
    /// Зажатые клавиши в порядке сканирования
    pub active: Vec<Direction>,
    /// Фактическое смещение до clamp
    pub displacement: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_in_scan_order() {
        let keys = MoveKeys::from_directions(&[Direction::Right, Direction::Up]);
        let held: Vec<_> = keys.held().collect();
        assert_eq!(held, vec![Direction::Up, Direction::Right]);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let keys = MoveKeys::from_directions(&[Direction::Up, Direction::Down]);
        assert!(!keys.is_empty());
        assert_eq!(keys.combined(), Vec2::ZERO);
    }

    #[test]
    fn test_clamp_box() {
        let bounds = MapBounds::new(100.0, 80.0);
        assert_eq!(bounds.clamp_box(Vec2::new(90.0, -5.0), 20.0), Vec2::new(80.0, 0.0));
        assert!(bounds.contains_box(Vec2::new(80.0, 60.0), 20.0));
        assert!(!bounds.contains_box(Vec2::new(80.1, 60.0), 20.0));
    }
}
