//! Camera shake effect. The runner camera is fixed at the origin, so the only camera work is a
//! short decaying jitter used as hit/landing feedback. All transformations go through Bevy's
//! ECS—no raw pointers or manual memory management required.

use bevy::prelude::*;

/// Registers the shake system. It runs unconditionally so the game-over shake still animates
/// after the simulation freezes.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShakeState>()
            .add_event::<ShakeCamera>()
            .add_systems(Update, apply_camera_shake);
    }
}

/// Marker component so the shake system can locate the camera entity without relying on names.
#[derive(Component)]
pub struct MainCamera;

/// Request a camera shake. Overlapping requests keep whichever shake is stronger.
#[derive(Event, Debug, Clone, Copy)]
pub struct ShakeCamera {
    /// Seconds the shake lasts.
    pub duration: f32,
    /// Peak offset in world pixels.
    pub intensity: f32,
}

#[derive(Resource, Default)]
struct ShakeState {
    remaining: f32,
    duration: f32,
    intensity: f32,
    elapsed: f32,
}

/// Offsets the camera by a rapidly oscillating, linearly decaying displacement. Deterministic
/// (sinusoid-based) so it needs no RNG and settles back to the exact origin when finished.
fn apply_camera_shake(
    time: Res<Time>,
    mut events: EventReader<ShakeCamera>,
    mut state: ResMut<ShakeState>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    for event in events.read() {
        if event.intensity >= state.intensity || state.remaining <= 0.0 {
            state.remaining = event.duration;
            state.duration = event.duration.max(f32::EPSILON);
            state.intensity = event.intensity;
            state.elapsed = 0.0;
        }
    }

    let Ok(mut transform) = camera_query.get_single_mut() else {
        return;
    };

    if state.remaining <= 0.0 {
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
        return;
    }

    let dt = time.delta_seconds();
    state.remaining -= dt;
    state.elapsed += dt;

    if state.remaining <= 0.0 {
        state.intensity = 0.0;
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
        return;
    }

    let falloff = state.remaining / state.duration;
    let t = state.elapsed;
    transform.translation.x = (t * 95.0).sin() * state.intensity * falloff;
    transform.translation.y = (t * 123.0).cos() * state.intensity * falloff;
}
