//! Player domain: PlayerState (movement, block, attack) + dodge state machine
//!
//! Все операции: методы на PlayerState, системы encounter только вызывают их
//! в фиксированном порядке.

pub mod dodge;
pub mod state;

#[cfg(test)]
mod state_tests;

pub use dodge::{DodgeProfile, DodgeState, DodgeStep};
pub use state::PlayerState;
