use bevy::color::Luminance;
use bevy::prelude::*;
use skirmish_simulation::{
    Backdrop, Combatant, EncounterConfig, EnemyState, GameMode, MapBounds, PlayerState,
};

use crate::session::ActiveSession;

pub struct RenderingSyncPlugin;

impl Plugin for RenderingSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_visuals_for_new_entities,
                sync_player_visual,
                sync_enemy_visual,
                despawn_orphaned_visuals,
                draw_backdrop,
                draw_health_bars,
            )
                .chain(),
        );
    }
}

const FIGHTING_PLAYER_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
const EXPLORATION_PLAYER_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);
const ENEMY_COLOR: Color = Color::srgb(0.0, 0.0, 1.0);
const GRID_COLOR: Color = Color::srgb(0.78, 0.78, 0.78);
const CELL_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);
const HEALTH_BAR_BG_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
const HEALTH_BAR_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);

const HEALTH_BAR_WIDTH: f32 = 50.0;
const HEALTH_BAR_HEIGHT: f32 = 5.0;
/// Зазор между верхом квадрата и полоской здоровья
const HEALTH_BAR_OFFSET: f32 = 30.0;

/// Link: visual entity → simulation entity
#[derive(Component)]
pub struct VisualOf(pub Entity);

/// Link: simulation entity → visual entity
#[derive(Component)]
pub struct HasVisual(pub Entity);

/// Карта (top-left, y вниз) → мир Bevy (центр, y вверх)
pub fn to_world(position: Vec2, size: f32) -> Vec2 {
    Vec2::new(position.x + size / 2.0, -(position.y + size / 2.0))
}

/// Игрок красный в fighting, зелёный в exploration
pub fn player_color(mode: GameMode) -> Color {
    match mode {
        GameMode::Fighting => FIGHTING_PLAYER_COLOR,
        GameMode::Exploration => EXPLORATION_PLAYER_COLOR,
    }
}

/// Spawn квадрата-спрайта для новых PlayerState / EnemyState
fn spawn_visuals_for_new_entities(
    mut commands: Commands,
    config: Res<EncounterConfig>,
    players: Query<(Entity, &PlayerState), Without<HasVisual>>,
    enemies: Query<(Entity, &EnemyState), Without<HasVisual>>,
) {
    for (sim_entity, player) in players.iter() {
        spawn_square(&mut commands, sim_entity, &player.combatant, player_color(config.mode));
    }
    for (sim_entity, enemy) in enemies.iter() {
        spawn_square(&mut commands, sim_entity, &enemy.combatant, ENEMY_COLOR);
    }
}

fn spawn_square(commands: &mut Commands, sim_entity: Entity, combatant: &Combatant, color: Color) {
    let visual_entity = commands
        .spawn((
            Sprite::from_color(color, Vec2::splat(combatant.size)),
            Transform::from_translation(to_world(combatant.position, combatant.size).extend(1.0)),
            VisualOf(sim_entity),
        ))
        .id();

    // Link simulation ↔ visual
    commands.entity(sim_entity).insert(HasVisual(visual_entity));
}

/// Позиция + подсветка состояния (dodge светлее, блок темнее)
fn sync_player_visual(
    config: Res<EncounterConfig>,
    players: Query<(&PlayerState, &HasVisual)>,
    mut visuals: Query<(&mut Transform, &mut Sprite), With<VisualOf>>,
) {
    for (player, has_visual) in players.iter() {
        let Ok((mut transform, mut sprite)) = visuals.get_mut(has_visual.0) else {
            continue;
        };

        let position = to_world(player.combatant.position, player.combatant.size);
        transform.translation = position.extend(1.0);

        let base = player_color(config.mode);
        sprite.color = if player.is_invincible() {
            base.with_alpha(0.4)
        } else if player.is_blocking {
            base.darker(0.25)
        } else {
            base
        };
    }
}

/// Мёртвый враг не рисуется
fn sync_enemy_visual(
    enemies: Query<(&EnemyState, &HasVisual)>,
    mut visuals: Query<(&mut Transform, &mut Visibility, &mut Sprite), With<VisualOf>>,
) {
    for (enemy, has_visual) in enemies.iter() {
        let Ok((mut transform, mut visibility, mut sprite)) = visuals.get_mut(has_visual.0) else {
            continue;
        };

        if !enemy.is_alive() {
            *visibility = Visibility::Hidden;
            continue;
        }

        *visibility = Visibility::Visible;
        let position = to_world(enemy.combatant.position, enemy.combatant.size);
        transform.translation = position.extend(1.0);
        sprite.color = if enemy.is_attacking {
            ENEMY_COLOR.darker(0.2)
        } else {
            ENEMY_COLOR
        };
    }
}

/// Сессия закончилась (сущности despawn'ены) → убрать визуалы
fn despawn_orphaned_visuals(
    mut commands: Commands,
    visuals: Query<(Entity, &VisualOf)>,
    combatants: Query<(), Or<(With<PlayerState>, With<EnemyState>)>>,
) {
    for (visual_entity, visual_of) in visuals.iter() {
        if combatants.get(visual_of.0).is_err() {
            commands.entity(visual_entity).despawn();
        }
    }
}

/// Сетка карты + клетка, в которой стоит игрок
fn draw_backdrop(
    mut gizmos: Gizmos,
    session: Option<Res<ActiveSession>>,
    config: Res<EncounterConfig>,
    bounds: Res<MapBounds>,
    players: Query<&PlayerState>,
) {
    if session.is_none() {
        return;
    }

    // Граница карты
    gizmos.rect_2d(
        Vec2::new(bounds.width / 2.0, -bounds.height / 2.0),
        Vec2::new(bounds.width, bounds.height),
        Color::BLACK,
    );

    let Backdrop::Grid { spacing } = config.backdrop else {
        return;
    };
    if spacing <= 0.0 {
        return;
    }

    let mut x = 0.0;
    while x <= bounds.width {
        gizmos.line_2d(Vec2::new(x, 0.0), Vec2::new(x, -bounds.height), GRID_COLOR);
        x += spacing;
    }
    let mut y = 0.0;
    while y <= bounds.height {
        gizmos.line_2d(Vec2::new(0.0, -y), Vec2::new(bounds.width, -y), GRID_COLOR);
        y += spacing;
    }

    for player in players.iter() {
        let cell = (player.combatant.position / spacing).floor() * spacing;
        gizmos.rect_2d(to_world(cell, spacing), Vec2::splat(spacing), CELL_COLOR);
    }
}

/// Полоски здоровья над живыми combatant'ами
fn draw_health_bars(
    mut gizmos: Gizmos,
    players: Query<&PlayerState>,
    enemies: Query<&EnemyState>,
) {
    let combatants = players
        .iter()
        .map(|player| &player.combatant)
        .chain(enemies.iter().map(|enemy| &enemy.combatant));

    for combatant in combatants.filter(|combatant| combatant.is_alive()) {
        // Левый край полоски = левый край квадрата
        let top_left = combatant.position - Vec2::new(0.0, HEALTH_BAR_OFFSET);
        let background = Vec2::new(HEALTH_BAR_WIDTH, HEALTH_BAR_HEIGHT);
        let filled = Vec2::new(HEALTH_BAR_WIDTH * combatant.health_ratio(), HEALTH_BAR_HEIGHT);

        gizmos.rect_2d(bar_center(top_left, background), background, HEALTH_BAR_BG_COLOR);
        gizmos.rect_2d(bar_center(top_left, filled), filled, HEALTH_BAR_COLOR);
    }
}

fn bar_center(top_left: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(top_left.x + size.x / 2.0, -(top_left.y + size.y / 2.0))
}
