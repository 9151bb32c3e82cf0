//! Melee swing resolution.

use crate::components::{AttackProfile, Combatant};

/// Защита цели в момент удара.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Guard {
    /// Цель держит блок (правая кнопка мыши)
    pub blocking: bool,
    /// Цель неуязвима (активный dodge)
    pub invincible: bool,
}

impl Guard {
    pub const NONE: Guard = Guard {
        blocking: false,
        invincible: false,
    };
}

/// Результат одного swing.
///
/// Cooldown атакующего сбрасывается для `Hit`, `Blocked` и `Evaded`:
/// заблокированный или пропущенный через dodge удар всё равно тратит атаку.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeleeOutcome {
    /// Урон прошёл (реально нанесённый, после clamp к 0)
    Hit(u32),
    /// Цель блокировала
    Blocked,
    /// Цель была неуязвима (dodge)
    Evaded,
    /// Цель дальше `AttackProfile::range`
    OutOfRange,
    /// Атакующий ещё на cooldown
    OnCooldown,
    /// Цель уже мертва
    TargetDown,
    /// Атакующий мёртв
    AttackerDown,
}

impl MeleeOutcome {
    /// Удар был нанесён (cooldown потрачен), независимо от урона
    pub fn swung(&self) -> bool {
        matches!(
            self,
            MeleeOutcome::Hit(_) | MeleeOutcome::Blocked | MeleeOutcome::Evaded
        )
    }

    pub fn landed(&self) -> bool {
        matches!(self, MeleeOutcome::Hit(_))
    }
}

/// Разрешает удар `attacker` → `target`.
///
/// Порядок проверок:
/// 1. attacker жив, cooldown == 0
/// 2. target жив
/// 3. дистанция между центрами ≤ range
/// 4. cooldown := profile.cooldown
/// 5. неуязвимость / блок → 0 урона, иначе урон
pub fn swing(
    attacker: &mut Combatant,
    profile: &AttackProfile,
    target: &mut Combatant,
    guard: Guard,
) -> MeleeOutcome {
    if !attacker.is_alive() {
        return MeleeOutcome::AttackerDown;
    }
    if attacker.attack_cooldown > 0 {
        return MeleeOutcome::OnCooldown;
    }
    if !target.is_alive() {
        return MeleeOutcome::TargetDown;
    }
    if !profile.in_range(attacker.distance_to(target)) {
        return MeleeOutcome::OutOfRange;
    }

    attacker.attack_cooldown = profile.cooldown;

    if guard.invincible {
        return MeleeOutcome::Evaded;
    }
    if guard.blocking {
        return MeleeOutcome::Blocked;
    }

    MeleeOutcome::Hit(target.apply_damage(profile.damage))
}
