//! Pursue-and-strike AI
//!
//! Конечный автомат из двух рабочих состояний:
//! Pursuing (дистанция > attack_range) ⇄ Holding (в радиусе, бьём по cooldown)
//! + терминальное Defeated.
//!
//! Состояние пересчитывается в `pursue` каждый тик, attack читает только дистанцию.

use bevy::prelude::*;

use crate::combat::{swing, Guard, MeleeOutcome};
use crate::components::{AttackProfile, Combatant, MapBounds};
use crate::config::Tuning;
use crate::player::PlayerState;

/// Фаза поведения врага (для диагностики)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum EnemyMode {
    /// Идём к игроку
    #[default]
    Pursuing,
    /// В радиусе атаки, стоим на месте
    Holding,
    /// health == 0
    Defeated,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyState {
    pub combatant: Combatant,
    /// Скорость (не зависит от скорости игрока)
    pub speed: f32,
    pub attack: AttackProfile,
    /// true только в тике, когда удар был разыгран в радиусе
    pub is_attacking: bool,
    pub mode: EnemyMode,
}

impl EnemyState {
    pub fn from_tuning(position: Vec2, tuning: &Tuning) -> Self {
        Self {
            combatant: Combatant::new(position, tuning.enemy_size, tuning.enemy_max_health),
            speed: tuning.enemy_speed,
            attack: AttackProfile {
                damage: tuning.enemy_attack_damage,
                range: tuning.enemy_attack_range,
                cooldown: tuning.enemy_attack_cooldown,
            },
            is_attacking: false,
            mode: EnemyMode::Pursuing,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }

    /// Шаг к центру цели со скоростью `speed`; в радиусе атаки: стоим.
    pub fn pursue(&mut self, target_center: Vec2, bounds: &MapBounds) {
        if !self.is_alive() {
            self.mode = EnemyMode::Defeated;
            return;
        }

        let to_target = target_center - self.combatant.center();
        let distance = to_target.length();

        if !self.attack.in_range(distance) && distance > 0.0 {
            self.combatant.position += to_target / distance * self.speed;
            self.combatant.clamp_to(bounds);
            self.mode = EnemyMode::Pursuing;
        } else {
            self.mode = EnemyMode::Holding;
        }
    }

    /// Удар по игроку. true: урон прошёл.
    ///
    /// Блок или неуязвимость гасят урон, но cooldown всё равно тратится.
    pub fn attempt_attack(&mut self, player: &mut PlayerState, target_is_invincible: bool) -> bool {
        self.strike(player, target_is_invincible).landed()
    }

    /// Как `attempt_attack`, но с подробным исходом
    pub fn strike(&mut self, player: &mut PlayerState, target_is_invincible: bool) -> MeleeOutcome {
        let guard = Guard {
            blocking: player.is_blocking,
            invincible: target_is_invincible,
        };

        let outcome = swing(&mut self.combatant, &self.attack, &mut player.combatant, guard);
        self.is_attacking = outcome.swung();
        outcome
    }

    pub fn tick(&mut self) {
        self.combatant.tick_cooldown();
    }
}
