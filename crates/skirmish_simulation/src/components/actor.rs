//! Базовые боевые данные: Combatant + AttackProfile

use bevy::prelude::*;

use super::movement::MapBounds;

/// Любая сущность, которая может драться (игрок, враг)
///
/// Позиция: top-left угол квадрата `size × size`.
///
/// Инварианты:
/// - 0 ≤ health ≤ max_health
/// - attack_cooldown уменьшается на 1 за тик до 0, сбрасывается только успешной атакой
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Combatant {
    pub position: Vec2,
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    /// Тиков до следующей возможной атаки
    pub attack_cooldown: u32,
}

impl Combatant {
    /// Новый combatant с полным здоровьем
    pub fn new(position: Vec2, size: f32, max_health: u32) -> Self {
        Self {
            position,
            size,
            health: max_health,
            max_health,
            attack_cooldown: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Применить урон. Возвращает реально нанесённый урон.
    ///
    /// Мёртвый combatant урон не получает (no-op, 0).
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }

        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Один тик cooldown (вызывается ровно раз за тик)
    pub fn tick_cooldown(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size / 2.0)
    }

    /// Евклидово расстояние между центрами
    pub fn distance_to(&self, other: &Combatant) -> f32 {
        self.center().distance(other.center())
    }

    pub fn clamp_to(&mut self, bounds: &MapBounds) {
        self.position = bounds.clamp_box(self.position, self.size);
    }

    pub fn health_ratio(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }
}

/// Параметры атаки: урон, дальность, cooldown (тики)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AttackProfile {
    pub damage: u32,
    /// Максимальная дистанция между центрами
    pub range: f32,
    pub cooldown: u32,
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self {
            damage: crate::combat::ATTACK_DAMAGE,
            range: crate::combat::ATTACK_RANGE,
            cooldown: crate::combat::ATTACK_COOLDOWN,
        }
    }
}

impl AttackProfile {
    pub fn in_range(&self, distance: f32) -> bool {
        distance <= self.range
    }
}
