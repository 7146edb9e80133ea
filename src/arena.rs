//! Play-field construction: the full-screen backdrop and the scrolling platform strip.
//!
//! The platform is a ring of tiled segments. Each frame they slide left at a constant visual
//! scroll rate; a segment that leaves the left edge wraps around to the right end of the ring,
//! so the strip never runs out and never allocates after setup.

use bevy::prelude::*;

use crate::assets::GameAssets;
use crate::config::GameConfig;
use crate::state::{GameSet, GameState};

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScrollSettings>()
            .add_systems(OnExit(GameState::Loading), spawn_arena)
            .add_systems(
                Update,
                scroll_platform
                    .in_set(GameSet::Movement)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Visual scroll tuning. The platform scroll is purely cosmetic; obstacles carry their own
/// (slower) ramp-derived velocity.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ScrollSettings {
    /// Leftward platform speed in px/s.
    pub rate: f32,
    /// Number of platform segments in the ring.
    pub segments: u32,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            rate: 120.0,
            segments: 5,
        }
    }
}

impl ScrollSettings {
    /// Width of one segment for a given play-field width. The ring covers a bit more than one
    /// screen so a wrap never leaves a gap.
    pub fn segment_width(&self, config: &GameConfig) -> f32 {
        config.resolution().x / (self.segments - 1) as f32
    }
}

#[derive(Component)]
pub struct PlatformSegment;

fn spawn_arena(
    mut commands: Commands,
    config: Res<GameConfig>,
    settings: Res<ScrollSettings>,
    assets: Res<GameAssets>,
) {
    // Backdrop, stretched over the whole play field behind everything else.
    commands.spawn((
        Name::new("Background"),
        SpriteBundle {
            texture: assets.background.clone(),
            sprite: Sprite {
                custom_size: Some(config.resolution()),
                ..default()
            },
            transform: Transform::from_xyz(0.0, 0.0, -1.0),
            ..default()
        },
    ));

    let segment_size = Vec2::new(settings.segment_width(&config), config.platform_height);
    let y = config.bottom_edge() + config.platform_height * 0.5;
    for i in 0..settings.segments {
        let x = config.left_edge() + (i as f32 + 0.5) * segment_size.x;
        commands.spawn((
            Name::new("PlatformSegment"),
            PlatformSegment,
            SpriteBundle {
                texture: assets.platform.clone(),
                sprite: Sprite {
                    custom_size: Some(segment_size),
                    ..default()
                },
                transform: Transform::from_xyz(x, y, 0.0),
                ..default()
            },
        ));
    }
}

fn scroll_platform(
    time: Res<Time>,
    config: Res<GameConfig>,
    settings: Res<ScrollSettings>,
    mut segments: Query<&mut Transform, With<PlatformSegment>>,
) {
    let dt = time.delta_seconds();
    let segment_width = settings.segment_width(&config);
    let ring_width = segment_width * settings.segments as f32;
    let wrap_x = config.left_edge() - segment_width * 0.5;

    for mut transform in &mut segments {
        transform.translation.x -= settings.rate * dt;
        if transform.translation.x < wrap_x {
            transform.translation.x += ring_width;
        }
    }
}
