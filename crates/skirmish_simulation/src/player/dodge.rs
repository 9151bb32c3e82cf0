//! Dodge state machine
//!
//! Idle ──start──▶ Dodging (timer = duration, неуязвим) ──timer == 0──▶ Cooldown ──0──▶ Idle
//!
//! Инварианты:
//! - is_invincible ⇔ is_dodging (неуязвимость не хранится отдельно)
//! - timer и cooldown беззнаковые, уменьшаются только когда > 0
//! - новый dodge только при cooldown == 0 && !is_dodging

use bevy::prelude::*;

use crate::combat::{DODGE_COOLDOWN, DODGE_DISTANCE, DODGE_DURATION};
use crate::components::Direction;

/// Параметры dodge (тики / world units)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DodgeProfile {
    pub duration: u32,
    pub distance: f32,
    pub cooldown: u32,
}

impl Default for DodgeProfile {
    fn default() -> Self {
        Self {
            duration: DODGE_DURATION,
            distance: DODGE_DISTANCE,
            cooldown: DODGE_COOLDOWN,
        }
    }
}

impl DodgeProfile {
    /// Смещение за один тик (линейная интерполяция)
    pub fn step(&self) -> f32 {
        self.distance / self.duration as f32
    }
}

/// Что произошло с dodge за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DodgeStep {
    /// Не в dodge (cooldown мог уменьшиться)
    Idle,
    /// В dodge, смещение за этот тик
    Moving(Vec2),
    /// Последний тик dodge: смещение + dodge закончился, cooldown взведён
    Finished(Vec2),
}

impl DodgeStep {
    pub fn displacement(&self) -> Vec2 {
        match self {
            DodgeStep::Idle => Vec2::ZERO,
            DodgeStep::Moving(delta) | DodgeStep::Finished(delta) => *delta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct DodgeState {
    pub profile: DodgeProfile,
    pub is_dodging: bool,
    /// Тиков dodge осталось
    pub timer: u32,
    /// Зафиксирован на всю длительность dodge
    pub direction: Direction,
    /// Тиков до следующего возможного dodge
    pub cooldown: u32,
    /// Пройдено в текущем dodge (последний тик добирает остаток)
    pub travelled: f32,
}

impl Default for DodgeState {
    fn default() -> Self {
        Self::new(DodgeProfile::default())
    }
}

impl DodgeState {
    pub fn new(profile: DodgeProfile) -> Self {
        Self {
            profile,
            is_dodging: false,
            timer: 0,
            direction: Direction::default(),
            cooldown: 0,
            travelled: 0.0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.is_dodging
    }

    pub fn can_start(&self) -> bool {
        !self.is_dodging && self.cooldown == 0
    }

    /// Начать dodge в `direction`. Запрос во время dodge/cooldown: no-op (false).
    pub fn start(&mut self, direction: Direction) -> bool {
        if !self.can_start() || self.profile.duration == 0 {
            return false;
        }

        self.is_dodging = true;
        self.timer = self.profile.duration;
        self.direction = direction;
        self.travelled = 0.0;
        true
    }

    /// Один тик: движение dodge либо уменьшение cooldown
    pub fn advance(&mut self) -> DodgeStep {
        if !self.is_dodging {
            self.cooldown = self.cooldown.saturating_sub(1);
            return DodgeStep::Idle;
        }

        self.timer = self.timer.saturating_sub(1);

        let distance = if self.timer == 0 {
            self.profile.distance - self.travelled
        } else {
            self.profile.step()
        };
        self.travelled += distance;
        let delta = self.direction.unit() * distance;

        if self.timer > 0 {
            return DodgeStep::Moving(delta);
        }

        self.is_dodging = false;
        self.cooldown = self.profile.cooldown;
        self.travelled = 0.0;
        DodgeStep::Finished(delta)
    }
}
