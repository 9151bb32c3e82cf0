//! SKIRMISH Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: real-time 2D бой игрока с одним врагом.
//!
//! Слои:
//! - components / player / ai / combat: чистые правила (методы на компонентах)
//! - encounter: EncounterTick schedule (порядок шагов тика) + headless EncounterLoop
//! - flow: меню и переходы между режимами (exploration ↔ fighting)
//!
//! Рендер, окно, звук: в skirmish_client.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod encounter;
pub mod flow;
pub mod logger;
pub mod player;

// Re-export базовых типов для удобства
pub use ai::{EnemyMode, EnemyState};
pub use combat::{swing, Guard, MeleeOutcome};
pub use components::*;
pub use config::{ConfigError, Tuning};
pub use encounter::{
    begin_session, end_session, run_session, Backdrop, EncounterConfig, EncounterLoop, EncounterPlugin,
    EncounterTick, EnemySpawn, GameMode, InputError, InputSnapshot, InputSource, SessionEntities, SessionIo,
    SessionOutcome, SessionStatus, TickDiagnostics, WinCondition,
};
pub use flow::{FlowState, GameFlow, MenuChoice};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter, LOGGER_LEVEL,
};
pub use player::{DodgeState, PlayerState};

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
