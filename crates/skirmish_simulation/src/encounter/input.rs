//! Player input snapshot + источник input
//!
//! # Архитектура
//! - Input source (client / script) отдаёт InputSnapshot раз в тик
//! - EncounterLoop кладёт его в ресурс и прогоняет EncounterTick
//! - Ошибка чтения input = конец сессии (ExitToMenu), без retry

use std::collections::VecDeque;

use bevy::prelude::*;
use thiserror::Error;

use crate::components::{Direction, MoveKeys};

/// Input одного тика
///
/// # Fields
/// - `keys`: зажатые WASD
/// - `dodge`: Space (just_pressed: edge, не hold)
/// - `switch_mode`: F (just_pressed)
/// - `quit`: закрытие окна
/// - `escape`: Esc (just_pressed)
/// - `attack` / `block` / `middle`: левая / правая / средняя кнопки мыши (hold)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub keys: MoveKeys,
    pub dodge: bool,
    pub switch_mode: bool,
    pub quit: bool,
    pub escape: bool,
    pub attack: bool,
    pub block: bool,
    pub middle: bool,
}

impl InputSnapshot {
    /// Пустой тик (ничего не зажато)
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(directions: &[Direction]) -> Self {
        Self {
            keys: MoveKeys::from_directions(directions),
            ..default()
        }
    }

    pub fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }

    pub fn with_block(mut self) -> Self {
        self.block = true;
        self
    }

    pub fn with_dodge(mut self) -> Self {
        self.dodge = true;
        self
    }

    pub fn escape() -> Self {
        Self {
            escape: true,
            ..default()
        }
    }

    pub fn switch_mode() -> Self {
        Self {
            switch_mode: true,
            ..default()
        }
    }

    pub fn quit() -> Self {
        Self {
            quit: true,
            ..default()
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("input device disconnected")]
    Disconnected,

    #[error("scripted input exhausted after {0} ticks")]
    Exhausted(u64),

    #[error("input backend failure: {0}")]
    Backend(String),
}

/// Источник input (poll раз в тик)
pub trait InputSource {
    fn poll(&mut self) -> Result<InputSnapshot, InputError>;
}

impl<F> InputSource for F
where
    F: FnMut() -> Result<InputSnapshot, InputError>,
{
    fn poll(&mut self) -> Result<InputSnapshot, InputError> {
        self()
    }
}

/// Заранее записанный input (headless прогоны, тесты)
///
/// Когда кадры кончились: `InputError::Exhausted`, сессия завершается.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputSnapshot>,
    polled: u64,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            polled: 0,
        }
    }

    /// Добавить `count` одинаковых кадров
    pub fn hold(mut self, snapshot: InputSnapshot, count: usize) -> Self {
        self.frames.extend(std::iter::repeat(snapshot).take(count));
        self
    }

    pub fn then(mut self, snapshot: InputSnapshot) -> Self {
        self.frames.push_back(snapshot);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<InputSnapshot, InputError> {
        match self.frames.pop_front() {
            Some(snapshot) => {
                self.polled += 1;
                Ok(snapshot)
            }
            None => Err(InputError::Exhausted(self.polled)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_plays_in_order() {
        let mut input = ScriptedInput::default()
            .hold(InputSnapshot::moving(&[Direction::Up]), 2)
            .then(InputSnapshot::escape());

        assert_eq!(input.remaining(), 3);
        assert_eq!(input.poll().unwrap().keys.up, true);
        assert_eq!(input.poll().unwrap().keys.up, true);
        assert!(input.poll().unwrap().escape);
        assert_eq!(input.poll(), Err(InputError::Exhausted(3)));
    }

    #[test]
    fn test_closure_input_source() {
        let mut failing = || -> Result<InputSnapshot, InputError> { Err(InputError::Disconnected) };
        assert_eq!(failing.poll(), Err(InputError::Disconnected));
    }

    #[test]
    fn test_builders() {
        let snapshot = InputSnapshot::moving(&[Direction::Left])
            .with_attack()
            .with_block()
            .with_dodge();

        assert!(snapshot.keys.left && snapshot.attack && snapshot.block && snapshot.dodge);
        assert!(!snapshot.escape && !snapshot.quit && !snapshot.switch_mode);
    }
}
