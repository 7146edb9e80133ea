//! Player entity lifecycle. Spawns the avatar once loading finishes and applies the defeated
//! tint when the run ends.
//!
//! All component memory is owned by Bevy's ECS tables; this module only issues spawn commands
//! and lets the components drop with the app.

use bevy::prelude::*;

use crate::assets::GameAssets;
use crate::config::GameConfig;
use crate::lives::Defeated;
use crate::movement::{Collider, MovementState, Velocity};
use crate::state::GameState;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnExit(GameState::Loading), spawn_player)
            .add_systems(Update, tint_player_on_defeat);
    }
}

/// Marker component used by many systems (input, overlap resolution) to identify the player
/// entity. Stores no data, so it adds zero heap overhead.
#[derive(Component)]
pub struct Player;

/// Rendered player sprite size; the hitbox is slightly smaller to forgive near misses.
const PLAYER_SIZE: f32 = 64.0;
const PLAYER_HITBOX_SCALE: f32 = 0.8;

fn spawn_player(mut commands: Commands, config: Res<GameConfig>, assets: Res<GameAssets>) {
    let size = Vec2::splat(PLAYER_SIZE);
    // Start a little above the platform; gravity settles the avatar onto it.
    let spawn = Vec3::new(
        config.left_edge() + config.resolution().x * 0.2,
        config.platform_top() + size.y,
        1.0,
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        SpriteBundle {
            texture: assets.player.clone(),
            sprite: Sprite {
                custom_size: Some(size),
                ..default()
            },
            transform: Transform::from_translation(spawn),
            ..default()
        },
        Velocity::default(),
        MovementState {
            on_ground: false,
            wants_jump: false,
        },
        Collider::from_size(size * PLAYER_HITBOX_SCALE),
    ));
}

/// Turns the avatar red on defeat, the original game's failure feedback.
fn tint_player_on_defeat(
    mut defeated: EventReader<Defeated>,
    mut query: Query<&mut Sprite, With<Player>>,
) {
    if defeated.is_empty() {
        return;
    }
    defeated.clear();

    for mut sprite in &mut query {
        sprite.color = Color::srgb(1.0, 0.0, 0.0);
    }
}
