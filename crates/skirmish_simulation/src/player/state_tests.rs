//! Tests for PlayerState operations.

use bevy::prelude::*;

use super::{DodgeStep, PlayerState};
use crate::components::{Combatant, Direction, MapBounds, MoveKeys};

fn player_at(x: f32, y: f32) -> PlayerState {
    let mut player = PlayerState::default();
    player.combatant.position = Vec2::new(x, y);
    player
}

fn keys(directions: &[Direction]) -> MoveKeys {
    MoveKeys::from_directions(directions)
}

#[test]
fn test_axial_movement_uses_base_speed() {
    let mut player = player_at(500.0, 500.0);
    let report = player.resolve_movement(keys(&[Direction::Up]), &MapBounds::default());

    assert!(report.moved);
    assert_eq!(report.active, vec![Direction::Up]);
    assert_eq!(player.combatant.position, Vec2::new(500.0, 495.0));
}

#[test]
fn test_diagonal_movement_is_normalized() {
    let mut player = player_at(500.0, 500.0);
    let report = player.resolve_movement(
        keys(&[Direction::Up, Direction::Right]),
        &MapBounds::default(),
    );

    assert!((report.displacement.length() - 5.0).abs() < 1e-4);
    assert!(report.displacement.x > 0.0 && report.displacement.y < 0.0);
}

#[test]
fn test_blocking_slows_movement() {
    let mut player = player_at(500.0, 500.0);
    player.resolve_block(true);
    assert_eq!(player.current_speed(), 2.0);

    let report = player.resolve_movement(keys(&[Direction::Left]), &MapBounds::default());
    assert_eq!(report.displacement, Vec2::new(-2.0, 0.0));

    player.resolve_block(false);
    assert_eq!(player.current_speed(), 5.0);
}

#[test]
fn test_facing_is_last_held_in_scan_order() {
    let mut player = player_at(500.0, 500.0);

    player.resolve_movement(keys(&[Direction::Right, Direction::Up]), &MapBounds::default());
    assert_eq!(player.facing, Direction::Right);

    player.resolve_movement(keys(&[Direction::Down, Direction::Left]), &MapBounds::default());
    assert_eq!(player.facing, Direction::Left);

    player.resolve_movement(keys(&[Direction::Up]), &MapBounds::default());
    assert_eq!(player.facing, Direction::Up);
}

#[test]
fn test_facing_is_sticky_without_movement() {
    let mut player = player_at(500.0, 500.0);
    player.resolve_movement(keys(&[Direction::Down]), &MapBounds::default());
    assert_eq!(player.facing, Direction::Down);

    let report = player.resolve_movement(MoveKeys::NONE, &MapBounds::default());
    assert!(!report.moved);
    assert_eq!(player.facing, Direction::Down);

    // Противоположные клавиши гасят друг друга
    let before = player.combatant.position;
    let report = player.resolve_movement(keys(&[Direction::Left, Direction::Right]), &MapBounds::default());
    assert!(!report.moved);
    assert_eq!(report.active, vec![Direction::Left, Direction::Right]);
    assert_eq!(player.combatant.position, before);
    assert_eq!(player.facing, Direction::Down);
}

#[test]
fn test_movement_clamped_to_map() {
    let mut player = player_at(2.0, 1148.0);
    player.resolve_movement(keys(&[Direction::Left, Direction::Down]), &MapBounds::default());

    assert_eq!(player.combatant.position, Vec2::new(0.0, 1150.0));
}

#[test]
fn test_dodge_uses_facing_and_grants_invincibility() {
    let mut player = player_at(500.0, 500.0);
    player.facing = Direction::Up;

    assert!(player.resolve_dodge_start(true));
    assert!(player.is_invincible());
    assert_eq!(player.dodge.direction, Direction::Up);
    assert_eq!(player.dodge.timer, 18);

    let mut ticks = 0;
    while player.dodge.is_dodging {
        player.tick_dodge(&MapBounds::default());
        ticks += 1;
        assert_eq!(player.is_invincible(), player.dodge.is_dodging);
    }

    assert_eq!(ticks, 18);
    assert!((player.combatant.position.y - 400.0).abs() < 1e-3);
    assert_eq!(player.combatant.position.x, 500.0);
    assert_eq!(player.dodge.cooldown, 60);
}

#[test]
fn test_dodge_not_requested_is_noop() {
    let mut player = player_at(500.0, 500.0);
    let before = player.clone();

    assert!(!player.resolve_dodge_start(false));
    assert_eq!(player, before);
}

#[test]
fn test_dodge_on_cooldown_is_noop() {
    let mut player = player_at(500.0, 500.0);
    player.dodge.cooldown = 10;
    let before = player.clone();

    assert!(!player.resolve_dodge_start(true));
    assert_eq!(player, before);
}

#[test]
fn test_dodge_into_wall_is_clamped() {
    let mut player = player_at(20.0, 500.0);
    player.facing = Direction::Left;
    player.resolve_dodge_start(true);

    let mut last = DodgeStep::Idle;
    while player.dodge.is_dodging {
        last = player.tick_dodge(&MapBounds::default());
        assert!(player.combatant.position.x >= 0.0);
    }

    assert!(matches!(last, DodgeStep::Finished(_)));
    assert_eq!(player.combatant.position.x, 0.0);
}

#[test]
fn test_attack_in_range_hits() {
    // Игрок на расстоянии 50 от врага, cooldown 0
    let mut player = player_at(300.0, 250.0);
    let mut enemy = Combatant::new(Vec2::new(300.0, 300.0), 50.0, 100);

    assert!(player.resolve_attack(&mut enemy, true));
    assert_eq!(enemy.health, 90);
    assert_eq!(player.combatant.attack_cooldown, 60);

    // Следующий тик: cooldown 59 → no-op
    player.tick_cooldown();
    assert_eq!(player.combatant.attack_cooldown, 59);
    assert!(!player.resolve_attack(&mut enemy, true));
    assert_eq!(enemy.health, 90);
}

#[test]
fn test_attack_out_of_range_never_damages() {
    let mut player = player_at(0.0, 0.0);
    let mut enemy = Combatant::new(Vec2::new(101.0, 0.0), 50.0, 100);

    assert!(!player.resolve_attack(&mut enemy, true));
    assert_eq!(enemy.health, 100);
    assert_eq!(player.combatant.attack_cooldown, 0);
}

#[test]
fn test_attack_not_requested() {
    let mut player = player_at(300.0, 250.0);
    let mut enemy = Combatant::new(Vec2::new(300.0, 300.0), 50.0, 100);

    assert!(!player.resolve_attack(&mut enemy, false));
    assert_eq!(player.strike(&mut enemy, false), None);
    assert_eq!(enemy.health, 100);
}

#[test]
fn test_attack_on_dead_target_is_noop() {
    let mut player = player_at(300.0, 250.0);
    let mut enemy = Combatant::new(Vec2::new(300.0, 300.0), 50.0, 100);
    enemy.apply_damage(100);

    assert!(!player.resolve_attack(&mut enemy, true));
    assert_eq!(player.combatant.attack_cooldown, 0);
}

#[test]
fn test_fresh_player_from_defaults() {
    let player = PlayerState::default();
    assert_eq!(player.combatant.position, Vec2::new(800.0, 600.0));
    assert_eq!(player.combatant.health, 100);
    assert_eq!(player.facing, Direction::Right);
    assert!(!player.is_blocking);
    assert!(!player.is_invincible());
}
