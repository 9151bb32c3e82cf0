//! Меню + жизненный цикл сессии в оконном client'е
//!
//! Update: menu_input → start_session → capture_input
//! FixedUpdate: drive_encounter (PendingInput → EncounterTick → end check)

use bevy::prelude::*;
use skirmish_simulation::{
    begin_session, end_session, DeterministicRng, EncounterTick, FlowState, GameFlow, MenuChoice,
    SessionEntities, SessionStatus,
};

use crate::input::{capture_input, PendingInput};

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (menu_input, start_session, capture_input).chain())
            .add_systems(FixedUpdate, drive_encounter);
    }
}

/// Сущности идущей сессии (нет ресурса: мы в меню)
#[derive(Resource, Debug, Clone, Copy)]
pub struct ActiveSession(pub SessionEntities);

/// Enter / C / S / Esc в меню, Backspace / Esc в настройках
fn menu_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut flow: ResMut<GameFlow>,
    mut exit: EventWriter<AppExit>,
) {
    match flow.state() {
        FlowState::Menu => {
            let choice = if keys.just_pressed(KeyCode::Enter) {
                Some(MenuChoice::NewGame)
            } else if keys.just_pressed(KeyCode::KeyC) {
                Some(MenuChoice::Continue)
            } else if keys.just_pressed(KeyCode::KeyS) {
                Some(MenuChoice::Settings)
            } else if keys.just_pressed(KeyCode::Escape) {
                Some(MenuChoice::Exit)
            } else {
                None
            };

            if let Some(choice) = choice {
                flow.select(choice);
            }
        }
        FlowState::Settings => {
            if keys.just_pressed(KeyCode::Backspace) || keys.just_pressed(KeyCode::Escape) {
                flow.back();
            }
        }
        FlowState::Quit => {
            exit.write(AppExit::Success);
        }
        FlowState::Playing(_) => {}
    }
}

/// Exclusive system: spawn игрока/врага, когда GameFlow перешёл в Playing
fn start_session(world: &mut World) {
    if world.contains_resource::<ActiveSession>() {
        return;
    }

    let Some((plan, player)) = world.get_resource::<GameFlow>().and_then(|flow| {
        flow.plan_session()
            .map(|plan| (plan, flow.player().clone()))
    }) else {
        return;
    };

    world.insert_resource(DeterministicRng::new(plan.seed));
    let entities = begin_session(world, player, plan.config);
    world.insert_resource(ActiveSession(entities));

    // Esc/F из меню не должны сразу закрыть новую сессию
    if let Some(mut pending) = world.get_resource_mut::<PendingInput>() {
        pending.clear();
    }
}

/// Exclusive system (требует &mut World для run_schedule).
///
/// Один тик симуляции на FixedUpdate; terminal исход возвращает игрока в GameFlow.
fn drive_encounter(world: &mut World) {
    let Some(ActiveSession(entities)) = world.get_resource::<ActiveSession>().copied() else {
        return;
    };

    let input = world
        .get_resource_mut::<PendingInput>()
        .map(|mut pending| pending.take())
        .unwrap_or_default();
    world.insert_resource(input);
    world.run_schedule(EncounterTick);

    let outcome = world
        .get_resource::<SessionStatus>()
        .map(|status| status.outcome)
        .unwrap_or_default();
    if !outcome.is_terminal() {
        return;
    }

    let player = end_session(world, entities);
    world.remove_resource::<ActiveSession>();

    if let (Some(player), Some(mut flow)) = (player, world.get_resource_mut::<GameFlow>()) {
        flow.finish_session(player, outcome);
    }
}
