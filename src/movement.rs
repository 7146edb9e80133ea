use bevy::input::keyboard::KeyCode;
use bevy::input::mouse::MouseButton;
use bevy::input::touch::Touches;
use bevy::prelude::*;

use crate::camera::ShakeCamera;
use crate::config::GameConfig;
use crate::player::Player;
use crate::spawn::Obstacle;
use crate::state::{GameSet, GameState};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementSettings>()
            .add_event::<Jumped>()
            .add_systems(
                Update,
                (
                    read_jump_input.in_set(GameSet::Input),
                    apply_player_kinematics.in_set(GameSet::Movement),
                    move_obstacles.in_set(GameSet::Movement),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Fired on the frame the player actually leaves the ground (not on every input press).
#[derive(Event)]
pub struct Jumped;

#[derive(Resource)]
pub struct MovementSettings {
    pub gravity: f32,
    pub jump_strength: f32,
    /// Spin applied to the sprite while airborne, degrees per second.
    pub spin_rate: f32,
    pub terminal_velocity: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            jump_strength: 650.0,
            spin_rate: 280.0,
            terminal_velocity: -1800.0,
        }
    }
}

#[derive(Component, Default, Deref, DerefMut)]
pub struct Velocity(pub Vec2);

#[derive(Component)]
pub struct MovementState {
    pub on_ground: bool,
    pub wants_jump: bool,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            on_ground: true,
            wants_jump: false,
        }
    }
}

#[derive(Component, Copy, Clone)]
pub struct Collider {
    pub half_extents: Vec2,
}

impl Collider {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            half_extents: size * 0.5,
        }
    }
}

fn read_jump_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut query: Query<&mut MovementState, With<Player>>,
) {
    let pressed = keyboard.just_pressed(KeyCode::Space)
        || mouse.just_pressed(MouseButton::Left)
        || touches.any_just_pressed();

    if !pressed {
        return;
    }

    for mut state in &mut query {
        state.wants_jump = true;
    }
}

/// Integrates gravity and jump impulses against the flat platform surface. There is no tile
/// world here: the walkable ground is a single horizontal line at `config.platform_top()`.
pub(crate) fn apply_player_kinematics(
    time: Res<Time>,
    settings: Res<MovementSettings>,
    config: Res<GameConfig>,
    mut jumped: EventWriter<Jumped>,
    mut shake: EventWriter<ShakeCamera>,
    mut query: Query<(&mut Transform, &mut Velocity, &mut MovementState, &Collider), With<Player>>,
) {
    let dt = time.delta_seconds();
    let ground = config.platform_top();

    for (mut transform, mut velocity, mut state, collider) in &mut query {
        if state.wants_jump && state.on_ground {
            velocity.y = settings.jump_strength;
            state.on_ground = false;
            jumped.send(Jumped);
        }
        state.wants_jump = false;

        if !state.on_ground {
            velocity.y -= settings.gravity * dt;
            if velocity.y < settings.terminal_velocity {
                velocity.y = settings.terminal_velocity;
            }

            transform.translation.y += velocity.y * dt;
            // Somersault while airborne, original-game style.
            transform.rotate_z((settings.spin_rate * dt).to_radians());

            let rest_y = ground + collider.half_extents.y;
            if transform.translation.y <= rest_y && velocity.y < 0.0 {
                transform.translation.y = rest_y;
                transform.rotation = Quat::IDENTITY;
                velocity.y = 0.0;
                state.on_ground = true;
                // Landing stomp: a tiny camera dip sells the impact.
                shake.send(ShakeCamera {
                    duration: 0.05,
                    intensity: 5.0,
                });
            }
        }
    }
}

/// Moves live obstacles by their assigned horizontal velocity. Dead (pooled) obstacles are
/// skipped so they stay parked off-screen until recycled.
pub(crate) fn move_obstacles(time: Res<Time>, mut query: Query<(&mut Transform, &Velocity, &Obstacle)>) {
    let dt = time.delta_seconds();
    for (mut transform, velocity, obstacle) in &mut query {
        if !obstacle.alive {
            continue;
        }
        transform.translation.x += velocity.x * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<MovementSettings>()
            .insert_resource(GameConfig::default())
            .add_event::<Jumped>()
            .add_event::<ShakeCamera>()
            .add_systems(Update, (apply_player_kinematics, move_obstacles));
        app
    }

    fn advance(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
        app.update();
    }

    fn spawn_grounded_player(app: &mut App) -> Entity {
        let ground = app.world().resource::<GameConfig>().platform_top();
        let collider = Collider::from_size(Vec2::splat(64.0));
        app.world_mut()
            .spawn((
                Player,
                Transform::from_xyz(-384.0, ground + collider.half_extents.y, 1.0),
                Velocity::default(),
                MovementState::default(),
                collider,
            ))
            .id()
    }

    #[test]
    fn jump_leaves_ground_and_lands_back_on_platform() {
        let mut app = test_app();
        let player = spawn_grounded_player(&mut app);
        let rest_y = app.world().entity(player).get::<Transform>().unwrap().translation.y;

        app.world_mut()
            .entity_mut(player)
            .get_mut::<MovementState>()
            .unwrap()
            .wants_jump = true;
        advance(&mut app, 16);

        let state = app.world().entity(player).get::<MovementState>().unwrap();
        assert!(!state.on_ground);
        let jumped = app.world().resource::<Events<Jumped>>();
        assert_eq!(jumped.len(), 1);

        // Simulate until the arc completes; with a 650 px/s impulse and 1000 px/s^2 gravity
        // the flight lasts about 1.3 s.
        for _ in 0..120 {
            advance(&mut app, 16);
        }

        let transform = app.world().entity(player).get::<Transform>().unwrap();
        let state = app.world().entity(player).get::<MovementState>().unwrap();
        assert!(state.on_ground);
        assert_eq!(transform.translation.y, rest_y);
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn jump_request_is_ignored_while_airborne() {
        let mut app = test_app();
        let player = spawn_grounded_player(&mut app);

        app.world_mut()
            .entity_mut(player)
            .get_mut::<MovementState>()
            .unwrap()
            .wants_jump = true;
        advance(&mut app, 16);

        // Second request mid-air must neither re-impulse nor emit another event.
        app.world_mut()
            .entity_mut(player)
            .get_mut::<MovementState>()
            .unwrap()
            .wants_jump = true;
        advance(&mut app, 16);

        let jumped = app.world().resource::<Events<Jumped>>();
        assert_eq!(jumped.len(), 1);
    }

    #[test]
    fn dead_obstacles_do_not_move() {
        let mut app = test_app();
        let live = app
            .world_mut()
            .spawn((
                Obstacle { alive: true },
                Transform::from_xyz(500.0, 0.0, 0.0),
                Velocity(Vec2::new(-300.0, 0.0)),
            ))
            .id();
        let dead = app
            .world_mut()
            .spawn((
                Obstacle { alive: false },
                Transform::from_xyz(500.0, 0.0, 0.0),
                Velocity(Vec2::new(-300.0, 0.0)),
            ))
            .id();

        advance(&mut app, 1000);

        let live_x = app.world().entity(live).get::<Transform>().unwrap().translation.x;
        let dead_x = app.world().entity(dead).get::<Transform>().unwrap().translation.x;
        assert!(live_x < 500.0);
        assert_eq!(dead_x, 500.0);
    }
}
