//! EncounterLoop: headless driver одной сессии
//!
//! Свой `App` на сессию: EncounterPlugin + игрок + враг.
//! Каждый тик: poll input → run_schedule(EncounterTick) → present(FrameView) → pacer.
//!
//! Игрок одалживается у вызывающего (`run_session(&mut PlayerState, ..)`)
//! и возвращается со всеми изменениями после terminal исхода.

use std::time::{Duration, Instant};

use bevy::prelude::*;
use thiserror::Error;

use super::{
    begin_session, end_session, Backdrop, EncounterConfig, EncounterPlugin, EncounterTick,
    GameMode, InputSnapshot, InputSource, SessionEntities, SessionOutcome, SessionStatus,
    SessionTick, TickDiagnostics,
};
use crate::ai::EnemyState;
use crate::components::{CameraView, Direction, Viewport};
use crate::config::Tuning;
use crate::create_headless_app;
use crate::player::PlayerState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("render surface lost")]
    SurfaceLost,

    #[error("renderer failure: {0}")]
    Backend(String),
}

/// Ограничитель частоты тиков (единственная точка yield между кадрами)
pub trait FramePacer {
    fn wait_for_next_tick(&mut self);
}

/// Спит до следующей границы кадра (target rate, обычно 60 Hz)
#[derive(Debug, Clone)]
pub struct FixedRatePacer {
    period: Duration,
    next: Option<Instant>,
}

impl FixedRatePacer {
    pub fn new(ticks_per_second: f64) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / ticks_per_second.max(1.0)),
            next: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FramePacer for FixedRatePacer {
    fn wait_for_next_tick(&mut self) {
        let now = Instant::now();
        let next = self.next.unwrap_or(now) + self.period;

        if next > now {
            std::thread::sleep(next - now);
            self.next = Some(next);
        } else {
            // Отстали больше чем на кадр: не догоняем, начинаем отсчёт заново
            self.next = Some(now);
        }
    }
}

/// Без ожидания (тесты, batch прогоны)
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl FramePacer for Unpaced {
    fn wait_for_next_tick(&mut self) {}
}

/// Потребитель кадров (renderer, HUD, логгер)
pub trait FrameSink {
    fn present(&mut self, view: &FrameView) -> Result<(), RenderError>;
}

impl<F> FrameSink for F
where
    F: FnMut(&FrameView) -> Result<(), RenderError>,
{
    fn present(&mut self, view: &FrameView) -> Result<(), RenderError> {
        self(view)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _view: &FrameView) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Внешние коллабораторы сессии
pub struct SessionIo<'a> {
    pub input: &'a mut dyn InputSource,
    pub sink: &'a mut dyn FrameSink,
    pub pacer: &'a mut dyn FramePacer,
}

impl<'a> SessionIo<'a> {
    pub fn new(
        input: &'a mut dyn InputSource,
        sink: &'a mut dyn FrameSink,
        pacer: &'a mut dyn FramePacer,
    ) -> Self {
        Self { input, sink, pacer }
    }
}

/// Квадрат на экране
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorView {
    /// Top-left в координатах карты
    pub position: Vec2,
    /// Top-left в координатах экрана (position - camera offset)
    pub screen_position: Vec2,
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    pub health_ratio: f32,
}

impl ActorView {
    fn capture(combatant: &crate::components::Combatant, camera: &CameraView) -> Self {
        Self {
            position: combatant.position,
            screen_position: camera.to_screen(combatant.position),
            size: combatant.size,
            health: combatant.health,
            max_health: combatant.max_health,
            health_ratio: combatant.health_ratio(),
        }
    }
}

/// Всё, что нужно renderer'у для одного кадра
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub mode: GameMode,
    pub backdrop: Backdrop,
    pub tick: u64,
    pub camera_offset: Vec2,
    pub viewport: Viewport,
    pub player: ActorView,
    pub player_facing: Direction,
    pub player_invincible: bool,
    /// None: враг повержен (не рисуется)
    pub enemy: Option<ActorView>,
    /// Top-left клетки сетки, в которой стоит игрок (только для Grid backdrop)
    pub grid_cell: Option<Vec2>,
}

impl FrameView {
    pub fn capture(world: &World, entities: SessionEntities) -> Option<Self> {
        let player = world.get::<PlayerState>(entities.player)?;
        let enemy = world.get::<EnemyState>(entities.enemy);
        let config = world.get_resource::<EncounterConfig>()?;
        let camera = world.get_resource::<CameraView>().copied().unwrap_or_default();
        let viewport = world.get_resource::<Viewport>().copied().unwrap_or_default();
        let tick = world.get_resource::<SessionTick>().map(|t| t.tick).unwrap_or(0);

        let grid_cell = match config.backdrop {
            Backdrop::Grid { spacing } if spacing > 0.0 => {
                Some((player.combatant.position / spacing).floor() * spacing)
            }
            _ => None,
        };

        Some(Self {
            mode: config.mode,
            backdrop: config.backdrop,
            tick,
            camera_offset: camera.offset,
            viewport,
            player: ActorView::capture(&player.combatant, &camera),
            player_facing: player.facing,
            player_invincible: player.is_invincible(),
            enemy: enemy
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| ActorView::capture(&enemy.combatant, &camera)),
            grid_cell,
        })
    }

    /// Клетка сетки в координатах экрана
    pub fn grid_cell_on_screen(&self) -> Option<Vec2> {
        self.grid_cell.map(|cell| cell - self.camera_offset)
    }
}

/// Одна сессия (exploration или fighting) в собственном headless App
pub struct EncounterLoop {
    app: App,
    entities: SessionEntities,
}

impl EncounterLoop {
    pub fn new(player: PlayerState, config: EncounterConfig, tuning: &Tuning, seed: u64) -> Self {
        let mut app = create_headless_app(seed);
        app.add_plugins(EncounterPlugin::new(tuning.clone()));

        let entities = begin_session(app.world_mut(), player, config);
        Self { app, entities }
    }

    /// Один тик. После terminal исхода: no-op, возвращает тот же исход.
    pub fn tick(&mut self, input: InputSnapshot) -> SessionOutcome {
        let outcome = self.outcome();
        if outcome.is_terminal() {
            return outcome;
        }

        let world = self.app.world_mut();
        world.insert_resource(input);
        world.run_schedule(EncounterTick);

        self.outcome()
    }

    /// Ошибка внешнего коллаборатора → ExitToMenu (без retry)
    pub fn abort(&mut self, reason: &str) -> SessionOutcome {
        crate::log_warning(&format!("Session aborted: {}", reason));

        if let Some(mut status) = self.app.world_mut().get_resource_mut::<SessionStatus>() {
            if !status.outcome.is_terminal() {
                status.outcome = SessionOutcome::ExitToMenu;
            }
        }

        self.outcome()
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.app
            .world()
            .get_resource::<SessionStatus>()
            .map(|status| status.outcome)
            .unwrap_or_default()
    }

    pub fn tick_count(&self) -> u64 {
        self.app.world().get_resource::<SessionTick>().map(|t| t.tick).unwrap_or(0)
    }

    pub fn entities(&self) -> SessionEntities {
        self.entities
    }

    pub fn player(&self) -> Option<&PlayerState> {
        self.app.world().get::<PlayerState>(self.entities.player)
    }

    pub fn player_mut(&mut self) -> Option<Mut<'_, PlayerState>> {
        self.app.world_mut().get_mut::<PlayerState>(self.entities.player)
    }

    pub fn enemy(&self) -> Option<&EnemyState> {
        self.app.world().get::<EnemyState>(self.entities.enemy)
    }

    pub fn enemy_mut(&mut self) -> Option<Mut<'_, EnemyState>> {
        self.app.world_mut().get_mut::<EnemyState>(self.entities.enemy)
    }

    pub fn config(&self) -> Option<&EncounterConfig> {
        self.app.world().get_resource::<EncounterConfig>()
    }

    pub fn diagnostics(&self) -> Option<&TickDiagnostics> {
        self.app.world().get_resource::<TickDiagnostics>()
    }

    pub fn camera(&self) -> CameraView {
        self.app.world().get_resource::<CameraView>().copied().unwrap_or_default()
    }

    pub fn frame_view(&self) -> Option<FrameView> {
        FrameView::capture(self.app.world(), self.entities)
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Крутить тики до terminal исхода
    pub fn run(&mut self, io: &mut SessionIo<'_>) -> SessionOutcome {
        loop {
            let input = match io.input.poll() {
                Ok(input) => input,
                Err(err) => return self.abort(&format!("input error: {}", err)),
            };

            let outcome = self.tick(input);
            if outcome.is_terminal() {
                return outcome;
            }

            if let Some(view) = self.frame_view() {
                if let Err(err) = io.sink.present(&view) {
                    return self.abort(&format!("render error: {}", err));
                }
            }

            io.pacer.wait_for_next_tick();
        }
    }

    /// Закрыть сессию, вернуть игрока владельцу
    pub fn into_player(mut self) -> Option<PlayerState> {
        end_session(self.app.world_mut(), self.entities)
    }
}

/// Прогнать сессию до terminal исхода.
///
/// `player`: долгоживущий игрок GameFlow; после возврата содержит все изменения
/// (позиция, здоровье, cooldowns).
pub fn run_session(
    player: &mut PlayerState,
    config: EncounterConfig,
    tuning: &Tuning,
    seed: u64,
    io: &mut SessionIo<'_>,
) -> SessionOutcome {
    let mut encounter = EncounterLoop::new(player.clone(), config, tuning, seed);
    let outcome = encounter.run(io);

    if let Some(state) = encounter.into_player() {
        *player = state;
    }

    outcome
}
