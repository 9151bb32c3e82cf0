//! EncounterTick systems (порядок задаётся в EncounterPlugin через `.chain()`)
//!
//! Системы тонкие: вся логика: методы PlayerState / EnemyState,
//! здесь только порядок вызова, логирование переходов и диагностика.

use bevy::prelude::*;

use super::{
    EncounterConfig, InputSnapshot, PlayerActions, SessionOutcome, SessionStatus, SessionTick, TickDiagnostics,
    WinCondition,
};
use crate::ai::{EnemyMode, EnemyState};
use crate::combat::MeleeOutcome;
use crate::components::{CameraView, MapBounds, Viewport};
use crate::player::{DodgeStep, PlayerState};

/// Шаг 1: input → terminal outcome (quit/escape/switch)
///
/// Единственная точка отмены сессии. Terminal исход пропускает остальные шаги тика.
pub fn read_session_input(
    input: Res<InputSnapshot>,
    mut status: ResMut<SessionStatus>,
    mut tick: ResMut<SessionTick>,
) {
    if status.outcome.is_terminal() {
        return;
    }

    tick.tick += 1;

    if input.quit || input.escape {
        crate::log_info(&format!("Tick {}: exit to menu requested", tick.tick));
        status.outcome = SessionOutcome::ExitToMenu;
    } else if input.switch_mode {
        crate::log_info(&format!("Tick {}: mode switch requested", tick.tick));
        status.outcome = SessionOutcome::SwitchMode;
    }
}

/// Run condition: сессия ещё идёт
pub fn session_running(status: Res<SessionStatus>) -> bool {
    !status.outcome.is_terminal()
}

/// Шаг 2: движение игрока от зажатых клавиш
pub fn move_player(
    input: Res<InputSnapshot>,
    bounds: Res<MapBounds>,
    mut players: Query<&mut PlayerState>,
) {
    let Ok(mut player) = players.single_mut() else {
        return;
    };

    player.resolve_movement(input.keys, &bounds);
}

/// Шаг 3: старт dodge (Space) + продвижение активного dodge
///
/// Dodge, начатый в этом тике, уже даёт неуязвимость против атаки врага в этом же тике.
pub fn dodge_player(
    input: Res<InputSnapshot>,
    bounds: Res<MapBounds>,
    tick: Res<SessionTick>,
    mut players: Query<&mut PlayerState>,
) {
    let Ok(mut player) = players.single_mut() else {
        return;
    };

    if player.resolve_dodge_start(input.dodge) {
        crate::log(&format!(
            "Tick {}: dodge started ({:?})",
            tick.tick, player.dodge.direction
        ));
    }

    if let DodgeStep::Finished(_) = player.tick_dodge(&bounds) {
        crate::log(&format!(
            "Tick {}: dodge finished at ({:.1}, {:.1}), cooldown {}",
            tick.tick, player.combatant.position.x, player.combatant.position.y, player.dodge.cooldown
        ));
    }
}

/// Шаг 4: враг идёт к игроку, бьёт (если может), тикает cooldown
pub fn enemy_turn(
    bounds: Res<MapBounds>,
    tick: Res<SessionTick>,
    mut players: Query<&mut PlayerState>,
    mut enemies: Query<&mut EnemyState>,
) {
    let Ok(mut player) = players.single_mut() else {
        return;
    };
    let Ok(mut enemy) = enemies.single_mut() else {
        return;
    };

    enemy.pursue(player.combatant.center(), &bounds);

    let invincible = player.is_invincible();
    match enemy.strike(&mut player, invincible) {
        MeleeOutcome::Hit(damage) => crate::log(&format!(
            "Tick {}: enemy hit player for {} (hp {})",
            tick.tick, damage, player.combatant.health
        )),
        MeleeOutcome::Blocked => crate::log(&format!("Tick {}: enemy attack blocked", tick.tick)),
        MeleeOutcome::Evaded => crate::log(&format!("Tick {}: enemy attack dodged", tick.tick)),
        _ => {}
    }

    enemy.tick();
}

/// Шаг 5: атака игрока (ЛКМ), блок (ПКМ), cooldown игрока
pub fn player_combat(
    input: Res<InputSnapshot>,
    tick: Res<SessionTick>,
    mut actions: ResMut<PlayerActions>,
    mut players: Query<&mut PlayerState>,
    mut enemies: Query<&mut EnemyState>,
) {
    *actions = PlayerActions::default();

    let Ok(mut player) = players.single_mut() else {
        return;
    };
    let Ok(mut enemy) = enemies.single_mut() else {
        return;
    };

    let outcome = player.strike(&mut enemy.combatant, input.attack);
    actions.attack_landed = outcome.is_some_and(|outcome| outcome.landed());

    if let Some(MeleeOutcome::Hit(damage)) = outcome {
        crate::log(&format!(
            "Tick {}: player hit enemy for {} (hp {})",
            tick.tick, damage, enemy.combatant.health
        ));

        if !enemy.is_alive() {
            enemy.mode = EnemyMode::Defeated;
            enemy.is_attacking = false;
            crate::log_info(&format!("Tick {}: enemy defeated", tick.tick));
        }
    }

    player.resolve_block(input.block);
    player.tick_cooldown();
}

/// Шаг 6: поражение игрока / победа (по WinCondition)
pub fn check_session_end(
    config: Res<EncounterConfig>,
    tick: Res<SessionTick>,
    players: Query<&PlayerState>,
    enemies: Query<&EnemyState>,
    mut status: ResMut<SessionStatus>,
) {
    let Ok(player) = players.single() else {
        return;
    };

    if !player.is_alive() {
        crate::log_info(&format!("Tick {}: player defeated", tick.tick));
        status.outcome = SessionOutcome::PlayerDefeated;
        return;
    }

    let enemy_down = enemies.single().map(|enemy| !enemy.is_alive()).unwrap_or(false);
    if config.win == WinCondition::SwitchModeOnEnemyDefeat && enemy_down {
        crate::log_info(&format!(
            "Tick {}: {} cleared, switching mode",
            tick.tick,
            config.mode.title()
        ));
        status.outcome = SessionOutcome::SwitchMode;
    }
}

/// Шаг 7: камера центрируется на игроке, clamp в карту
pub fn follow_camera(
    viewport: Res<Viewport>,
    bounds: Res<MapBounds>,
    players: Query<&PlayerState>,
    mut camera: ResMut<CameraView>,
) {
    let Ok(player) = players.single() else {
        return;
    };

    *camera = CameraView::follow(
        player.combatant.position,
        player.combatant.size,
        &viewport,
        &bounds,
    );
}

/// Диагностика тика (после всех шагов)
pub fn record_diagnostics(
    input: Res<InputSnapshot>,
    tick: Res<SessionTick>,
    actions: Res<PlayerActions>,
    players: Query<&PlayerState>,
    enemies: Query<&EnemyState>,
    mut diagnostics: ResMut<TickDiagnostics>,
) {
    let Ok(player) = players.single() else {
        return;
    };

    let (enemy_attacking, enemy_health) = enemies
        .single()
        .map(|enemy| (enemy.is_attacking, enemy.combatant.health))
        .unwrap_or((false, 0));

    *diagnostics = TickDiagnostics {
        tick: tick.tick,
        player_position: player.combatant.position,
        active_keys: input.keys.held().collect(),
        attack: actions.attack_landed,
        block: player.is_blocking,
        dodging: player.dodge.is_dodging,
        dodge_cooldown: player.dodge.cooldown,
        enemy_attacking,
        invincible: player.is_invincible(),
        player_health: player.combatant.health,
        enemy_health,
    };
}
