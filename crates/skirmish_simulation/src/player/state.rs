//! PlayerState: единственный долгоживущий combatant
//!
//! Переживает переключение режимов (exploration ↔ fighting),
//! пересоздаётся только после поражения.

use bevy::prelude::*;

use super::dodge::{DodgeProfile, DodgeState, DodgeStep};
use crate::combat::{swing, Guard, MeleeOutcome};
use crate::components::{AttackProfile, Combatant, Direction, MapBounds, MoveKeys, MovementReport};
use crate::config::Tuning;

/// Состояние игрока: Combatant + скорость, блок, facing, dodge
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerState {
    pub combatant: Combatant,
    pub base_speed: f32,
    /// Скорость пока зажат блок
    pub blocking_speed: f32,
    /// true ⇔ кнопка блока зажата в этом тике
    pub is_blocking: bool,
    /// Последнее ненулевое направление движения (sticky)
    pub facing: Direction,
    pub attack: AttackProfile,
    pub dodge: DodgeState,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

impl PlayerState {
    /// Свежий игрок: полное здоровье, стартовая позиция из Tuning
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            combatant: Combatant::new(
                tuning.player_start_position(),
                tuning.player_size,
                tuning.player_max_health,
            ),
            base_speed: tuning.player_speed,
            blocking_speed: tuning.player_blocking_speed,
            is_blocking: false,
            facing: Direction::Right,
            attack: AttackProfile {
                damage: tuning.attack_damage,
                range: tuning.attack_range,
                cooldown: tuning.attack_cooldown,
            },
            dodge: DodgeState::new(DodgeProfile {
                duration: tuning.dodge_duration,
                distance: tuning.dodge_distance,
                cooldown: tuning.dodge_cooldown,
            }),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }

    pub fn is_invincible(&self) -> bool {
        self.dodge.is_invincible()
    }

    pub fn current_speed(&self) -> f32 {
        if self.is_blocking {
            self.blocking_speed
        } else {
            self.base_speed
        }
    }

    /// Движение от зажатых клавиш.
    ///
    /// Суммарный вектор нормализуется к `current_speed` (диагональ не быстрее оси).
    /// Facing = ПОСЛЕДНЯЯ зажатая клавиша в порядке up, down, left, right,
    /// обновляется только если было движение.
    pub fn resolve_movement(&mut self, keys: MoveKeys, bounds: &MapBounds) -> MovementReport {
        let active: Vec<Direction> = keys.held().collect();
        let combined = keys.combined();

        let mut report = MovementReport {
            moved: false,
            active,
            displacement: Vec2::ZERO,
        };

        if combined != Vec2::ZERO {
            let displacement = combined.normalize() * self.current_speed();
            self.combatant.position += displacement;
            report.moved = true;
            report.displacement = displacement;

            if let Some(last) = report.active.last() {
                self.facing = *last;
            }
        }

        self.combatant.clamp_to(bounds);
        report
    }

    /// Начать dodge в направлении facing (если разрешено)
    pub fn resolve_dodge_start(&mut self, requested: bool) -> bool {
        requested && self.dodge.start(self.facing)
    }

    /// Тик dodge: смещение вдоль зафиксированного направления + clamp
    pub fn tick_dodge(&mut self, bounds: &MapBounds) -> DodgeStep {
        let step = self.dodge.advance();
        if step != DodgeStep::Idle {
            self.combatant.position += step.displacement();
        }
        self.combatant.clamp_to(bounds);
        step
    }

    /// Удар по цели (левая кнопка). true: удар достиг цели.
    pub fn resolve_attack(&mut self, target: &mut Combatant, requested: bool) -> bool {
        self.strike(target, requested).is_some_and(|outcome| outcome.landed())
    }

    /// Как `resolve_attack`, но с подробным исходом (None: атака не запрошена)
    pub fn strike(&mut self, target: &mut Combatant, requested: bool) -> Option<MeleeOutcome> {
        if !requested {
            return None;
        }
        Some(swing(&mut self.combatant, &self.attack, target, Guard::NONE))
    }

    /// Блок (правая кнопка): действует сразу, без задержки
    pub fn resolve_block(&mut self, requested: bool) -> bool {
        self.is_blocking = requested;
        self.is_blocking
    }

    /// Guard, с которым враг бьёт по игроку в этом тике
    pub fn guard(&self) -> Guard {
        Guard {
            blocking: self.is_blocking,
            invincible: self.is_invincible(),
        }
    }

    pub fn tick_cooldown(&mut self) {
        self.combatant.tick_cooldown();
    }
}
