//! Combat integration test
//!
//! Полный EncounterTick (input → movement → dodge → enemy → player combat → end check → camera)
//! на headless EncounterLoop.
//!
//! Проверяем:
//! - Порядок шагов внутри тика (dodge до атаки врага, блок после)
//! - Terminal исходы (Esc, F, поражение, победа по WinCondition)
//! - Игрок возвращается владельцу со всеми изменениями

use bevy::prelude::*;
use skirmish_simulation::encounter::{
    FrameView, NullSink, RenderError, ScriptedInput, SessionIo, Unpaced,
};
use skirmish_simulation::*;

/// Helper: сессия с игроком в (x, y) и врагом в точке спавна по умолчанию (300, 300)
fn encounter_with_player_at(x: f32, y: f32, config: EncounterConfig) -> EncounterLoop {
    let tuning = Tuning::default();
    let mut player = PlayerState::from_tuning(&tuning);
    player.combatant.position = Vec2::new(x, y);

    EncounterLoop::new(player, config, &tuning, 42)
}

fn fighting() -> EncounterConfig {
    EncounterConfig::fighting(&Tuning::default())
}

fn exploration() -> EncounterConfig {
    EncounterConfig::exploration(&Tuning::default())
}

/// Test: игрок в 50 units от врага бьёт → 100 → 90, cooldown взведён
#[test]
fn test_player_attack_at_distance_50() {
    let mut encounter = encounter_with_player_at(300.0, 250.0, fighting());

    let outcome = encounter.tick(InputSnapshot::idle().with_attack());
    assert_eq!(outcome, SessionOutcome::Continue);

    let enemy = encounter.enemy().unwrap();
    assert_eq!(enemy.combatant.health, 90);
    assert_eq!(enemy.combatant.position, Vec2::new(300.0, 300.0), "в радиусе враг стоит");

    // 60 после удара, затем tick_cooldown в том же тике
    assert_eq!(encounter.player().unwrap().combatant.attack_cooldown, 59);

    // Следующий тик: cooldown 59 → атака no-op
    encounter.tick(InputSnapshot::idle().with_attack());
    assert_eq!(encounter.enemy().unwrap().combatant.health, 90);
    assert_eq!(encounter.player().unwrap().combatant.attack_cooldown, 58);
}

/// Test: Attack в диагностике: удар достиг врага, а не просто зажата кнопка
#[test]
fn test_diagnostics_attack_reports_landed_hit() {
    let mut encounter = encounter_with_player_at(300.0, 250.0, fighting());

    encounter.tick(InputSnapshot::idle().with_attack());
    assert!(encounter.diagnostics().unwrap().attack);

    // Кнопка зажата, но cooldown: удара нет
    encounter.tick(InputSnapshot::idle().with_attack());
    assert!(!encounter.diagnostics().unwrap().attack);

    // Вне радиуса: тоже нет
    let mut far = encounter_with_player_at(1000.0, 1000.0, fighting());
    far.tick(InputSnapshot::idle().with_attack());
    assert!(!far.diagnostics().unwrap().attack);
}

/// Test: враг в центре игрока с отрицательным радиусом атаки остаётся на карте
#[test]
fn test_enemy_on_player_center_stays_on_map() {
    let tuning = Tuning {
        enemy_attack_range: -1.0,
        player_start: Some((300.0, 300.0)),
        ..Tuning::default()
    };
    let player = PlayerState::from_tuning(&tuning);
    let mut encounter = EncounterLoop::new(player, EncounterConfig::fighting(&tuning), &tuning, 42);

    encounter.tick(InputSnapshot::idle());

    let enemy = encounter.enemy().unwrap();
    assert!(enemy.combatant.position.is_finite());
    assert!(MapBounds::default().contains_box(enemy.combatant.position, enemy.combatant.size));
}

/// Test: игрок с 5 hp под неблокированным ударом → health 0 (не отрицательное), PlayerDefeated
#[test]
fn test_lethal_hit_clamps_and_defeats_player() {
    let mut encounter = encounter_with_player_at(300.0, 350.0, fighting());
    encounter.player_mut().unwrap().combatant.health = 5;

    let outcome = encounter.tick(InputSnapshot::idle());

    assert_eq!(outcome, SessionOutcome::PlayerDefeated);
    let player = encounter.player().unwrap();
    assert_eq!(player.combatant.health, 0);
    assert!(!player.is_alive());

    // После terminal исхода тики не идут
    let ticks = encounter.tick_count();
    assert_eq!(encounter.tick(InputSnapshot::idle()), SessionOutcome::PlayerDefeated);
    assert_eq!(encounter.tick_count(), ticks);
}

/// Test: dodge, начатый в тике атаки врага, уже защищает
#[test]
fn test_dodge_same_tick_as_enemy_attack() {
    let mut encounter = encounter_with_player_at(300.0, 250.0, fighting());

    encounter.tick(InputSnapshot::idle().with_dodge());

    let player = encounter.player().unwrap();
    let enemy = encounter.enemy().unwrap();

    assert_eq!(player.combatant.health, 100);
    assert!(player.is_invincible());
    assert!(enemy.is_attacking);
    // 60 после удара, затем tick() врага в том же тике
    assert_eq!(enemy.combatant.attack_cooldown, 59);

    let diagnostics = encounter.diagnostics().unwrap();
    assert!(diagnostics.dodging);
    assert!(diagnostics.invincible);
    assert!(diagnostics.enemy_attacking);
}

/// Test: блок читается врагом в тике ПОСЛЕ нажатия (resolve_block идёт после атаки врага)
#[test]
fn test_block_applies_from_next_enemy_attack() {
    let mut encounter = encounter_with_player_at(300.0, 250.0, fighting());

    // Тик 1: блок ещё не поднят к моменту удара врага
    encounter.tick(InputSnapshot::idle().with_block());
    assert_eq!(encounter.player().unwrap().combatant.health, 90);
    assert!(encounter.player().unwrap().is_blocking);

    // Следующий удар врага (тик 61): в блок
    for _ in 0..69 {
        encounter.tick(InputSnapshot::idle().with_block());
    }

    let player = encounter.player().unwrap();
    assert_eq!(player.combatant.health, 90);
    assert_eq!(player.combatant.position, Vec2::new(300.0, 250.0));

    // Cooldown врага тратится и на заблокированный удар
    assert_eq!(encounter.enemy().unwrap().combatant.attack_cooldown, 50);
}

/// Test: Esc завершает сессию до любых изменений в этом тике
#[test]
fn test_escape_skips_rest_of_tick() {
    let mut encounter = encounter_with_player_at(500.0, 500.0, fighting());
    let before = encounter.player().unwrap().clone();

    let mut input = InputSnapshot::moving(&[Direction::Up]).with_attack();
    input.escape = true;

    assert_eq!(encounter.tick(input), SessionOutcome::ExitToMenu);
    assert_eq!(encounter.player().unwrap(), &before);
    assert_eq!(encounter.enemy().unwrap().combatant.position, Vec2::new(300.0, 300.0));
}

#[test]
fn test_quit_and_switch_mode() {
    let mut encounter = encounter_with_player_at(500.0, 500.0, fighting());
    assert_eq!(encounter.tick(InputSnapshot::quit()), SessionOutcome::ExitToMenu);

    let mut encounter = encounter_with_player_at(500.0, 500.0, exploration());
    let before = encounter.player().unwrap().clone();
    assert_eq!(encounter.tick(InputSnapshot::switch_mode()), SessionOutcome::SwitchMode);
    assert_eq!(encounter.player().unwrap(), &before);
}

/// Test: exploration: победа над врагом → SwitchMode в том же тике
#[test]
fn test_exploration_win_switches_mode() {
    let mut encounter = encounter_with_player_at(300.0, 250.0, exploration());
    encounter.enemy_mut().unwrap().combatant.health = 10;

    let outcome = encounter.tick(InputSnapshot::idle().with_attack());

    assert_eq!(outcome, SessionOutcome::SwitchMode);
    assert!(!encounter.enemy().unwrap().is_alive());
}

/// Test: fighting: победа ничего не завершает, мёртвый враг не двигается и не бьёт
#[test]
fn test_fighting_win_keeps_session_running() {
    let mut encounter = encounter_with_player_at(300.0, 250.0, fighting());
    encounter.enemy_mut().unwrap().combatant.health = 10;

    assert_eq!(
        encounter.tick(InputSnapshot::idle().with_attack()),
        SessionOutcome::Continue
    );
    let health_after_first_tick = encounter.player().unwrap().combatant.health;

    for _ in 0..120 {
        let outcome = encounter.tick(InputSnapshot::moving(&[Direction::Right]));
        assert_eq!(outcome, SessionOutcome::Continue);
    }

    let enemy = encounter.enemy().unwrap();
    assert_eq!(enemy.mode, EnemyMode::Defeated);
    assert!(!enemy.is_attacking);
    assert_eq!(enemy.combatant.position, Vec2::new(300.0, 300.0));
    assert_eq!(encounter.player().unwrap().combatant.health, health_after_first_tick);
    assert!(encounter.frame_view().unwrap().enemy.is_none());
}

/// Test: враг идёт к игроку со своей скоростью (4), не со скоростью игрока
#[test]
fn test_enemy_pursues_at_own_speed() {
    // Игрок строго справа от врага, далеко
    let mut encounter = encounter_with_player_at(1000.0, 300.0, fighting());

    encounter.tick(InputSnapshot::idle());

    assert_eq!(
        encounter.enemy().unwrap().combatant.position,
        Vec2::new(304.0, 300.0)
    );
    assert!(!encounter.enemy().unwrap().is_attacking);
}

/// Test: камера центрируется на игроке и упирается в края карты
#[test]
fn test_camera_follows_and_clamps() {
    let mut encounter = encounter_with_player_at(0.0, 0.0, fighting());
    encounter.tick(InputSnapshot::idle());
    assert_eq!(encounter.camera().offset, Vec2::ZERO);

    let mut encounter = encounter_with_player_at(1550.0, 1150.0, fighting());
    encounter.tick(InputSnapshot::idle());
    assert_eq!(encounter.camera().offset, Vec2::new(800.0, 600.0));

    let mut encounter = encounter_with_player_at(775.0, 575.0, fighting());
    encounter.tick(InputSnapshot::idle());
    assert_eq!(encounter.camera().offset, Vec2::new(400.0, 300.0));
}

/// Test: run_session возвращает игрока со всеми изменениями
#[test]
fn test_run_session_lends_player_back() {
    let tuning = Tuning::default();
    let mut player = PlayerState::from_tuning(&tuning);

    let mut input = ScriptedInput::default()
        .hold(InputSnapshot::moving(&[Direction::Down]), 10)
        .then(InputSnapshot::moving(&[Direction::Down]).with_dodge())
        .then(InputSnapshot::escape());

    let outcome = run_session(
        &mut player,
        fighting(),
        &tuning,
        42,
        &mut SessionIo::new(&mut input, &mut NullSink, &mut Unpaced),
    );

    assert_eq!(outcome, SessionOutcome::ExitToMenu);
    assert_eq!(player.facing, Direction::Down);
    assert!(player.dodge.is_dodging, "dodge переживает выход в меню");
    // 11 шагов по 5 + первый шаг dodge
    let expected_y = 600.0 + 11.0 * 5.0 + 100.0 / 18.0;
    assert!((player.combatant.position.y - expected_y).abs() < 1e-3);
    assert_eq!(input.remaining(), 0);
}

/// Test: кончился input → ExitToMenu
#[test]
fn test_exhausted_input_exits_to_menu() {
    let tuning = Tuning::default();
    let mut player = PlayerState::from_tuning(&tuning);
    let mut input = ScriptedInput::default().hold(InputSnapshot::idle(), 3);
    let mut frames = Vec::new();
    let mut sink = |view: &FrameView| -> Result<(), RenderError> {
        frames.push(view.tick);
        Ok(())
    };

    let outcome = run_session(
        &mut player,
        exploration(),
        &tuning,
        42,
        &mut SessionIo::new(&mut input, &mut sink, &mut Unpaced),
    );

    assert_eq!(outcome, SessionOutcome::ExitToMenu);
    assert_eq!(frames, vec![1, 2, 3]);
}

/// Test: GameFlow: exploration до победы, затем fighting с тем же игроком
#[test]
fn test_flow_exploration_win_leads_to_fighting() {
    let mut flow = GameFlow::new(Tuning::default(), 42);
    flow.select(MenuChoice::Continue);
    flow.player_mut().combatant.position = Vec2::new(300.0, 250.0);

    // 10 ударов по 10 урона, удар раз в 60 тиков; блок гасит ответку
    let strike = InputSnapshot::idle().with_attack().with_block();
    let mut input = ScriptedInput::default().hold(strike, 700);

    let outcome = flow.play(&mut SessionIo::new(&mut input, &mut NullSink, &mut Unpaced));

    assert_eq!(outcome, Some(SessionOutcome::SwitchMode));
    assert_eq!(flow.state(), FlowState::Playing(GameMode::Fighting));
    // Первый удар врага прошёл до поднятия блока
    assert_eq!(flow.player().combatant.health, 90);
    assert_eq!(flow.sessions_played(), 1);
    assert!(input.remaining() > 0);
}

/// Test: GameFlow: поражение → меню со свежим игроком
#[test]
fn test_flow_defeat_resets_player() {
    let mut flow = GameFlow::new(Tuning::default(), 42);
    flow.select(MenuChoice::NewGame);
    flow.player_mut().combatant.position = Vec2::new(300.0, 350.0);
    flow.player_mut().combatant.health = 10;

    let mut input = ScriptedInput::default().hold(InputSnapshot::idle(), 10);
    let outcome = flow.play(&mut SessionIo::new(&mut input, &mut NullSink, &mut Unpaced));

    assert_eq!(outcome, Some(SessionOutcome::PlayerDefeated));
    assert_eq!(flow.state(), FlowState::Menu);
    assert_eq!(flow.player().combatant.health, 100);
    assert_eq!(flow.player().combatant.position, Vec2::new(800.0, 600.0));
}
