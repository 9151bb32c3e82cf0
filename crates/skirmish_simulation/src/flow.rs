//! GameFlow: меню и переходы между режимами
//!
//! Явный FSM вместо глобального "game_state":
//!
//! ```text
//! Menu ──NewGame──▶ Playing(Fighting) ◀──SwitchMode──▶ Playing(Exploration) ◀──Continue── Menu
//!   │                       │  ExitToMenu / PlayerDefeated (новый игрок)
//!   │◀──────────────────────┘
//!   ├──Settings──▶ Settings ──Back──▶ Menu
//!   └──Exit──▶ Quit
//! ```
//!
//! GameFlow владеет единственным PlayerState и одалживает его каждой сессии.

use bevy::prelude::*;

use crate::config::Tuning;
use crate::encounter::{run_session, EncounterConfig, GameMode, SessionIo, SessionOutcome};
use crate::player::PlayerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowState {
    #[default]
    Menu,
    Playing(GameMode),
    Settings,
    Quit,
}

/// Кнопки главного меню
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    NewGame,
    Continue,
    Settings,
    Exit,
}

/// Параметры следующей сессии
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub mode: GameMode,
    pub config: EncounterConfig,
    pub seed: u64,
}

#[derive(Resource, Debug, Clone)]
pub struct GameFlow {
    state: FlowState,
    player: PlayerState,
    tuning: Tuning,
    base_seed: u64,
    sessions: u64,
}

impl GameFlow {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            state: FlowState::Menu,
            player: PlayerState::from_tuning(&tuning),
            tuning,
            base_seed: seed,
            sessions: 0,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == FlowState::Quit
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn sessions_played(&self) -> u64 {
        self.sessions
    }

    /// Выбор в меню. Вне меню: no-op.
    pub fn select(&mut self, choice: MenuChoice) -> FlowState {
        if self.state != FlowState::Menu {
            crate::log(&format!("Menu choice {:?} ignored in {:?}", choice, self.state));
            return self.state;
        }

        self.state = match choice {
            MenuChoice::NewGame => FlowState::Playing(GameMode::Fighting),
            MenuChoice::Continue => FlowState::Playing(GameMode::Exploration),
            MenuChoice::Settings => FlowState::Settings,
            MenuChoice::Exit => FlowState::Quit,
        };

        crate::log_info(&format!("Menu: {:?} → {:?}", choice, self.state));
        self.state
    }

    /// Назад из настроек
    pub fn back(&mut self) -> FlowState {
        if self.state == FlowState::Settings {
            self.state = FlowState::Menu;
        }
        self.state
    }

    /// Переход по исходу сессии
    pub fn apply_outcome(&mut self, outcome: SessionOutcome) -> FlowState {
        let FlowState::Playing(mode) = self.state else {
            return self.state;
        };

        self.state = match outcome {
            SessionOutcome::Continue => FlowState::Playing(mode),
            SessionOutcome::SwitchMode => FlowState::Playing(mode.other()),
            SessionOutcome::ExitToMenu => FlowState::Menu,
            SessionOutcome::PlayerDefeated => {
                crate::log_info("Player defeated, resetting player");
                self.player = PlayerState::from_tuning(&self.tuning);
                FlowState::Menu
            }
        };

        self.state
    }

    /// Параметры сессии для текущего режима (None: не в игре)
    pub fn plan_session(&self) -> Option<SessionPlan> {
        let FlowState::Playing(mode) = self.state else {
            return None;
        };

        Some(SessionPlan {
            mode,
            config: EncounterConfig::for_mode(mode, &self.tuning),
            seed: self.base_seed.wrapping_add(self.sessions),
        })
    }

    /// Вернуть игрока после сессии (client гоняет тики сам) и применить исход
    pub fn finish_session(&mut self, player: PlayerState, outcome: SessionOutcome) -> FlowState {
        self.player = player;
        self.sessions += 1;
        self.apply_outcome(outcome)
    }

    /// Прогнать одну сессию текущего режима до terminal исхода
    pub fn play(&mut self, io: &mut SessionIo<'_>) -> Option<SessionOutcome> {
        let plan = self.plan_session()?;

        let outcome = run_session(&mut self.player, plan.config, &self.tuning, plan.seed, io);
        self.sessions += 1;
        self.apply_outcome(outcome);

        Some(outcome)
    }
}

impl Default for GameFlow {
    fn default() -> Self {
        Self::new(Tuning::default(), 42)
    }
}
