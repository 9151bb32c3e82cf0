use bevy::prelude::*;
use bevy::window::WindowCloseRequested;
use skirmish_simulation::{InputSnapshot, MoveKeys};

pub struct InputCapturePlugin;

impl Plugin for InputCapturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingInput>();
    }
}

/// Input между кадрами рендера и тиками FixedUpdate
///
/// Hold-состояния (WASD, кнопки мыши) перезаписываются каждый кадр,
/// edge-триггеры (Space, F, Esc, закрытие окна) копятся до ближайшего тика.
#[derive(Resource, Debug, Default)]
pub struct PendingInput {
    snapshot: InputSnapshot,
}

impl PendingInput {
    /// Снимок для тика; edge-триггеры сбрасываются
    pub fn take(&mut self) -> InputSnapshot {
        let snapshot = self.snapshot;
        self.snapshot.dodge = false;
        self.snapshot.switch_mode = false;
        self.snapshot.escape = false;
        self.snapshot.quit = false;
        snapshot
    }

    pub fn clear(&mut self) {
        self.snapshot = InputSnapshot::default();
    }
}

/// WASD / Space / F / Esc + ЛКМ (атака) / ПКМ (блок)
pub fn capture_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut close_requests: EventReader<WindowCloseRequested>,
    mut pending: ResMut<PendingInput>,
) {
    let snapshot = &mut pending.snapshot;

    snapshot.keys = MoveKeys {
        up: keys.pressed(KeyCode::KeyW),
        down: keys.pressed(KeyCode::KeyS),
        left: keys.pressed(KeyCode::KeyA),
        right: keys.pressed(KeyCode::KeyD),
    };
    snapshot.attack = mouse.pressed(MouseButton::Left);
    snapshot.block = mouse.pressed(MouseButton::Right);
    snapshot.middle = mouse.pressed(MouseButton::Middle);

    snapshot.dodge |= keys.just_pressed(KeyCode::Space);
    snapshot.switch_mode |= keys.just_pressed(KeyCode::KeyF);
    snapshot.escape |= keys.just_pressed(KeyCode::Escape);
    snapshot.quit |= close_requests.read().count() > 0;
}
