use bevy::prelude::*;
use skirmish_simulation::{log_warning, EncounterPlugin, GameFlow, Tuning};

mod camera;
mod hud;
mod input;
mod rendering;
mod session;

use camera::CameraPlugin;
use hud::HudPlugin;
use input::InputCapturePlugin;
use rendering::RenderingSyncPlugin;
use session::SessionPlugin;

fn main() {
    skirmish_simulation::init_logger();
    let tuning = load_tuning();

    App::new()
        // Bevy defaults (rendering, input, time, etc.)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "SKIRMISH".to_string(),
                resolution: (tuning.viewport_width, tuning.viewport_height).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::WHITE))
        // Simulation tick = FixedUpdate
        .insert_resource(Time::<Fixed>::from_hz(tuning.tick_rate))
        .insert_resource(GameFlow::new(tuning.clone(), 42))
        // Simulation (headless ECS logic, EncounterTick schedule)
        .add_plugins(EncounterPlugin::new(tuning))
        // Keyboard/mouse → InputSnapshot
        .add_plugins(InputCapturePlugin)
        // Menu flow + FixedUpdate → EncounterTick
        .add_plugins(SessionPlugin)
        // Rendering sync (simulation → visuals)
        .add_plugins(RenderingSyncPlugin)
        .add_plugins(CameraPlugin)
        .add_plugins(HudPlugin)
        .run();
}

/// `SKIRMISH_TUNING=path.ron`: переопределить константы
fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("SKIRMISH_TUNING") else {
        return Tuning::default();
    };

    Tuning::load(&path).unwrap_or_else(|err| {
        log_warning(&format!("{}; falling back to default tuning", err));
        Tuning::default()
    })
}
