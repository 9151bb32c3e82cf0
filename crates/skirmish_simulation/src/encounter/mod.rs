//! Encounter: один session loop на оба режима (exploration / fighting)
//!
//! # Архитектура
//!
//! **EncounterTick** (custom schedule, single-threaded, `.chain()`):
//!   read_session_input → [move_player → dodge_player → enemy_turn
//!   → player_combat → check_session_end → follow_camera → record_diagnostics]
//!   (run_if session_running)
//!
//! Headless: `EncounterLoop` вызывает `world.run_schedule(EncounterTick)` раз в тик.
//! Client: тот же schedule из FixedUpdate (60 Hz).
//!
//! Различия режимов: только в `EncounterConfig` (backdrop, spawn, win condition).

use bevy::ecs::schedule::{ExecutorKind, ScheduleLabel};
use bevy::prelude::*;

use crate::ai::EnemyState;
use crate::components::{CameraView, Direction, MapBounds, Viewport};
use crate::config::Tuning;
use crate::logger::log_info;
use crate::player::PlayerState;
use crate::DeterministicRng;

pub mod config;
pub mod input;
pub mod session;
pub mod systems;

pub use config::{Backdrop, EncounterConfig, EnemySpawn, GameMode, WinCondition};
pub use input::{InputError, InputSnapshot, InputSource, ScriptedInput};
pub use session::{
    run_session, ActorView, EncounterLoop, FixedRatePacer, FramePacer, FrameSink, FrameView, NullSink,
    RenderError, SessionIo, Unpaced,
};
pub use systems::*;

/// Custom schedule: один тик encounter'а
///
/// Запускается вручную (`World::run_schedule`), не привязан к Main/FixedUpdate.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncounterTick;

/// Результат тика / сессии
///
/// `Continue`: только внутреннее состояние, наружу из `run_session` не выходит.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum SessionOutcome {
    #[default]
    Continue,
    /// Esc / закрытие окна / ошибка input или рендера
    ExitToMenu,
    PlayerDefeated,
    /// F или победа под `WinCondition::SwitchModeOnEnemyDefeat`
    SwitchMode,
}

impl SessionOutcome {
    pub fn is_terminal(self) -> bool {
        self != SessionOutcome::Continue
    }
}

/// Текущий исход сессии (пишут read_session_input и check_session_end)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub outcome: SessionOutcome,
}

/// Номер тика внутри сессии (детерминистичный, с 1)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SessionTick {
    pub tick: u64,
}

/// Чем закончились действия игрока в текущем тике (пишет player_combat)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerActions {
    pub attack_landed: bool,
}

/// Диагностика последнего тика (HUD client'а, headless вывод)
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TickDiagnostics {
    pub tick: u64,
    pub player_position: Vec2,
    /// Зажатые клавиши движения (порядок up, down, left, right)
    pub active_keys: Vec<Direction>,
    /// Удар игрока достиг врага в этом тике (не просто зажатая кнопка)
    pub attack: bool,
    pub block: bool,
    pub dodging: bool,
    pub dodge_cooldown: u32,
    pub enemy_attacking: bool,
    pub invincible: bool,
    pub player_health: u32,
    pub enemy_health: u32,
}

impl TickDiagnostics {
    /// Одна строка для HUD / консоли
    pub fn summary(&self) -> String {
        let keys = if self.active_keys.is_empty() {
            "None".to_string()
        } else {
            self.active_keys
                .iter()
                .map(|direction| direction.key_label())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "tick {} | Keys: {}, Attack: {}, Block: {}, Dodge: {}, CD: {}, Enemy Attack: {}, Invincible: {} | Pos: ({:.0}, {:.0}) | HP {} vs {}",
            self.tick,
            keys,
            self.attack,
            self.block,
            self.dodging,
            self.dodge_cooldown,
            self.enemy_attacking,
            self.invincible,
            self.player_position.x,
            self.player_position.y,
            self.player_health,
            self.enemy_health,
        )
    }
}

/// Сущности текущей сессии
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEntities {
    pub player: Entity,
    pub enemy: Entity,
}

/// Encounter plugin: ресурсы + EncounterTick schedule
pub struct EncounterPlugin {
    pub tuning: Tuning,
}

impl EncounterPlugin {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Default for EncounterPlugin {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        let tuning = self.tuning.clone();

        app.insert_resource(MapBounds::new(tuning.map_width, tuning.map_height))
            .insert_resource(Viewport {
                width: tuning.viewport_width,
                height: tuning.viewport_height,
            })
            .insert_resource(EncounterConfig::fighting(&tuning))
            .insert_resource(tuning)
            .init_resource::<InputSnapshot>()
            .init_resource::<SessionStatus>()
            .init_resource::<SessionTick>()
            .init_resource::<PlayerActions>()
            .init_resource::<TickDiagnostics>()
            .init_resource::<CameraView>()
            .register_type::<PlayerState>()
            .register_type::<EnemyState>();

        // Seed по умолчанию, если хост не задал свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        // Один writer на тик, строгий порядок шагов
        app.edit_schedule(EncounterTick, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        });

        app.add_systems(
            EncounterTick,
            (
                read_session_input,
                (
                    move_player,
                    dodge_player,
                    enemy_turn,
                    player_combat,
                    check_session_end,
                    follow_camera,
                    record_diagnostics,
                )
                    .chain()
                    .run_if(session_running),
            )
                .chain(),
        );
    }
}

/// Начать сессию: spawn игрока (одолженного у GameFlow) и врага, сброс ресурсов
pub fn begin_session(world: &mut World, player: PlayerState, config: EncounterConfig) -> SessionEntities {
    let tuning = world.get_resource::<Tuning>().cloned().unwrap_or_default();
    let bounds = world.get_resource::<MapBounds>().copied().unwrap_or_default();
    let viewport = world.get_resource::<Viewport>().copied().unwrap_or_default();

    let enemy_position = match world.get_resource_mut::<DeterministicRng>() {
        Some(mut rng) => config.spawn.resolve(tuning.enemy_size, &bounds, &mut rng.rng),
        None => config
            .spawn
            .resolve(tuning.enemy_size, &bounds, &mut DeterministicRng::new(42).rng),
    };
    let enemy = EnemyState::from_tuning(enemy_position, &tuning);

    log_info(&format!(
        "{} started: player at ({:.0}, {:.0}) hp {}, enemy at ({:.0}, {:.0})",
        config.mode.title(),
        player.combatant.position.x,
        player.combatant.position.y,
        player.combatant.health,
        enemy_position.x,
        enemy_position.y,
    ));

    let camera = CameraView::follow(
        player.combatant.position,
        player.combatant.size,
        &viewport,
        &bounds,
    );

    world.insert_resource(config);
    world.insert_resource(SessionStatus::default());
    world.insert_resource(SessionTick::default());
    world.insert_resource(PlayerActions::default());
    world.insert_resource(TickDiagnostics::default());
    world.insert_resource(InputSnapshot::default());
    world.insert_resource(camera);

    SessionEntities {
        player: world.spawn((player, Name::new("Player"))).id(),
        enemy: world.spawn((enemy, Name::new("Enemy"))).id(),
    }
}

/// Завершить сессию: despawn обоих, игрок возвращается владельцу
pub fn end_session(world: &mut World, entities: SessionEntities) -> Option<PlayerState> {
    let player = world.get::<PlayerState>(entities.player).cloned();

    for entity in [entities.player, entities.enemy] {
        if world.get_entity(entity).is_ok() {
            world.despawn(entity);
        }
    }

    let outcome = world
        .get_resource::<SessionStatus>()
        .map(|status| status.outcome)
        .unwrap_or_default();
    let ticks = world.get_resource::<SessionTick>().map(|t| t.tick).unwrap_or(0);
    log_info(&format!("Session ended after {} ticks: {:?}", ticks, outcome));

    player
}
