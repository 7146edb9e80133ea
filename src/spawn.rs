//! Obstacle spawner: one timer drives the spawn cycle, the difficulty ramp tightens the timer
//! after every cycle, and a burst of zero to two crates appears off-screen right as a vertical
//! stack the player has to clear in a single jump arc.
//!
//! Obstacle entities are pooled. A crate that leaves the left world bound is marked dead and
//! hidden, not despawned; the next burst reuses dead entities before allocating new ones, so
//! entity churn stays bounded no matter how long the run lasts.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::assets::GameAssets;
use crate::config::GameConfig;
use crate::difficulty::DifficultySettings;
use crate::movement::{Collider, Velocity};
use crate::state::{GameSet, GameState};

pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DifficultySettings>()
            .init_resource::<SpawnSettings>()
            .init_resource::<SpawnRng>()
            .add_event::<SpawnBurst>()
            .add_systems(OnExit(GameState::Loading), arm_spawn_cycle)
            .add_systems(
                Update,
                (run_spawn_cycle, spawn_obstacles, cull_escaped_obstacles)
                    .chain()
                    .in_set(GameSet::Movement)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Tuning for obstacle placement. Like the ramp constants, these are parameters, not contracts.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnSettings {
    /// Vertical spacing between stacked crates in one burst.
    pub stack_gap: f32,
    /// How far past the right edge a crate first appears.
    pub spawn_margin: f32,
    /// Rendered crate size (square).
    pub obstacle_size: f32,
    /// Hitboxes are shrunk to this fraction of the sprite, forgiving near-misses.
    pub collider_scale: f32,
    /// Burst size is drawn uniformly from `0..max_per_cycle`.
    pub max_per_cycle: u32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            stack_gap: 80.0,
            spawn_margin: 100.0,
            obstacle_size: 48.0,
            collider_scale: 0.8,
            max_per_cycle: 3,
        }
    }
}

impl SpawnSettings {
    /// Where crate `index` (0-based) of a burst is placed: just off-screen right, stacked
    /// upward from the platform surface.
    pub fn stack_position(&self, index: u32, config: &GameConfig) -> Vec2 {
        Vec2::new(
            config.right_edge() + self.spawn_margin,
            config.platform_top() + (index + 1) as f32 * self.stack_gap,
        )
    }
}

/// The spawn-cycle clock plus the current ramped interval. The timer duration always mirrors
/// `interval_ms`; both shrink together after every completed cycle.
#[derive(Resource)]
pub struct SpawnCycle {
    pub interval_ms: f32,
    pub timer: Timer,
}

impl SpawnCycle {
    pub fn new(settings: &DifficultySettings) -> Self {
        Self {
            interval_ms: settings.start_interval_ms,
            timer: Timer::from_seconds(
                settings.start_interval_ms / 1000.0,
                TimerMode::Repeating,
            ),
        }
    }
}

/// Seeded generator for the per-cycle burst draw. A fixed seed makes a whole run's spawn
/// schedule reproducible, which the tests lean on.
#[derive(Resource)]
pub struct SpawnRng(pub Pcg32);

impl SpawnRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }
}

impl Default for SpawnRng {
    fn default() -> Self {
        Self::seeded(rand::random())
    }
}

/// A crate entity. Dead crates are invisible, parked, and waiting to be recycled.
#[derive(Component)]
pub struct Obstacle {
    pub alive: bool,
}

/// One spawn cycle's output, handed to the pooling system.
#[derive(Event, Debug, Clone, Copy)]
pub struct SpawnBurst {
    pub count: u32,
    pub velocity: f32,
}

fn arm_spawn_cycle(mut commands: Commands, difficulty: Res<DifficultySettings>) {
    commands.insert_resource(SpawnCycle::new(&difficulty));
}

/// Ticks the spawn clock. On each completion: advance the ramp, re-arm the timer with the new
/// interval, and draw this cycle's burst size. A zero draw is a legitimate breather cycle and
/// still tightens the ramp.
fn run_spawn_cycle(
    time: Res<Time>,
    difficulty: Res<DifficultySettings>,
    settings: Res<SpawnSettings>,
    mut cycle: ResMut<SpawnCycle>,
    mut rng: ResMut<SpawnRng>,
    mut bursts: EventWriter<SpawnBurst>,
) {
    cycle.timer.tick(time.delta());
    if !cycle.timer.just_finished() {
        return;
    }

    cycle.interval_ms = difficulty.ramp(cycle.interval_ms);
    let next = std::time::Duration::from_secs_f32(cycle.interval_ms / 1000.0);
    cycle.timer.set_duration(next);
    cycle.timer.reset();

    bursts.send(SpawnBurst {
        count: rng.0.random_range(0..settings.max_per_cycle),
        velocity: difficulty.obstacle_velocity(cycle.interval_ms),
    });
}

/// Materialises a burst, recycling dead pool entities before allocating fresh ones.
fn spawn_obstacles(
    mut commands: Commands,
    mut bursts: EventReader<SpawnBurst>,
    settings: Res<SpawnSettings>,
    config: Res<GameConfig>,
    assets: Res<GameAssets>,
    mut pool: Query<(
        &mut Obstacle,
        &mut Transform,
        &mut Velocity,
        &mut Visibility,
    )>,
) {
    for burst in bursts.read() {
        let mut dead: Vec<_> = pool
            .iter_mut()
            .filter(|(obstacle, ..)| !obstacle.alive)
            .collect();

        for index in 0..burst.count {
            let position = settings.stack_position(index, &config);

            if let Some((mut obstacle, mut transform, mut velocity, mut visibility)) = dead.pop()
            {
                obstacle.alive = true;
                transform.translation = position.extend(1.0);
                velocity.0 = Vec2::new(burst.velocity, 0.0);
                *visibility = Visibility::Inherited;
                continue;
            }

            let size = Vec2::splat(settings.obstacle_size);
            commands.spawn((
                Name::new("Obstacle"),
                Obstacle { alive: true },
                SpriteBundle {
                    texture: assets.obstacle.clone(),
                    sprite: Sprite {
                        custom_size: Some(size),
                        ..default()
                    },
                    transform: Transform::from_translation(position.extend(1.0)),
                    ..default()
                },
                Velocity(Vec2::new(burst.velocity, 0.0)),
                Collider::from_size(size * settings.collider_scale),
            ));
        }
    }
}

/// Marks crates dead once they exit the visible world on the left, returning them to the pool.
fn cull_escaped_obstacles(
    settings: Res<SpawnSettings>,
    config: Res<GameConfig>,
    mut pool: Query<(&mut Obstacle, &Transform, &mut Visibility)>,
) {
    let cull_x = config.left_edge() - settings.spawn_margin;
    for (mut obstacle, transform, mut visibility) in &mut pool {
        if obstacle.alive && transform.translation.x < cull_x {
            obstacle.alive = false;
            *visibility = Visibility::Hidden;
        }
    }
}
