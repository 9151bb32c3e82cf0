use bevy::prelude::*;
use skirmish_simulation::{CameraView, Viewport};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(
                PostUpdate,
                follow_simulation_camera.before(bevy::transform::TransformSystem::TransformPropagate),
            );
    }
}

fn spawn_camera(mut commands: Commands, viewport: Res<Viewport>) {
    commands.spawn((
        Camera2d,
        Transform::from_translation(viewport_center(&CameraView::default(), &viewport).extend(0.0)),
    ));
}

/// Центр видимой области в мире Bevy (y вверх)
fn viewport_center(view: &CameraView, viewport: &Viewport) -> Vec2 {
    Vec2::new(
        view.offset.x + viewport.width / 2.0,
        -(view.offset.y + viewport.height / 2.0),
    )
}

/// Камера стоит там, куда её поставила симуляция (offset уже clamp'нут в карту)
fn follow_simulation_camera(
    view: Res<CameraView>,
    viewport: Res<Viewport>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };

    let center = viewport_center(&view, &viewport);
    transform.translation.x = center.x;
    transform.translation.y = center.y;
}
