//! Текстовый HUD: меню / настройки / диагностика тика

use bevy::prelude::*;
use skirmish_simulation::{FlowState, GameFlow, TickDiagnostics};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, update_hud);
    }
}

#[derive(Component)]
struct HudText;

const CONTROLS: &str =
    "WASD to move, Left Click to attack, Right Click to block, Space to dodge, F to switch, ESC to menu";

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::BLACK),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

fn update_hud(
    flow: Res<GameFlow>,
    diagnostics: Res<TickDiagnostics>,
    mut texts: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = texts.single_mut() else {
        return;
    };

    text.0 = hud_text(flow.state(), &diagnostics);
}

fn hud_text(state: FlowState, diagnostics: &TickDiagnostics) -> String {
    match state {
        FlowState::Menu => {
            "SKIRMISH\n\n[Enter] New Game\n[C] Continue\n[S] Settings\n[Esc] Exit".to_string()
        }
        FlowState::Settings => "Settings\n\n[Backspace] Back".to_string(),
        FlowState::Playing(mode) => {
            format!("{}\n{}\n{}", mode.title(), CONTROLS, diagnostics.summary())
        }
        FlowState::Quit => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_simulation::GameMode;

    #[test]
    fn test_hud_text_per_state() {
        let diagnostics = TickDiagnostics::default();

        assert!(hud_text(FlowState::Menu, &diagnostics).contains("New Game"));
        assert!(hud_text(FlowState::Settings, &diagnostics).contains("Back"));

        let playing = hud_text(FlowState::Playing(GameMode::Exploration), &diagnostics);
        assert!(playing.starts_with("Exploration Mode"));
        assert!(playing.contains("Keys: None"));
    }
}
