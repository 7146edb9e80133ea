//! Collision and life state. Tracks remaining lives, resolves player/obstacle overlaps, owns the
//! heart indicators, and drives the terminal game-over handoff.
//!
//! The life count only ever decreases, by exactly one per qualifying overlap. Once it reaches
//! zero every further overlap is ignored, so a pile of crates landing on the player in the
//! terminal frame cannot double-count. The final score is handed downstream exactly once, a
//! fixed grace period after the fatal hit, giving the failure feedback time to play out.

use bevy::prelude::*;

use crate::assets::GameAssets;
use crate::camera::ShakeCamera;
use crate::movement::Collider;
use crate::player::Player;
use crate::score::Score;
use crate::spawn::Obstacle;
use crate::state::{GameSet, GameState};

pub struct LivesPlugin;

impl Plugin for LivesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Lives>()
            .add_event::<LifeLost>()
            .add_event::<LastLifeReached>()
            .add_event::<Defeated>()
            .add_event::<RunEnded>()
            .add_systems(OnExit(GameState::Loading), spawn_life_indicators)
            .add_systems(
                Update,
                resolve_player_overlaps
                    .in_set(GameSet::Movement)
                    .after(crate::movement::apply_player_kinematics)
                    .after(crate::movement::move_obstacles)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                remove_life_indicator
                    .in_set(GameSet::Effects)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::GameOver), arm_terminal_grace)
            .add_systems(
                Update,
                emit_run_ended.run_if(in_state(GameState::GameOver)),
            );
    }
}

/// Remaining lives for the current run.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Lives {
    pub remaining: u8,
    pub max: u8,
}

impl Default for Lives {
    fn default() -> Self {
        Self {
            remaining: 3,
            max: 3,
        }
    }
}

/// What a single qualifying overlap did to the life count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The run was already over; nothing changed.
    Ignored,
    /// One life lost, more remain.
    Damaged { remaining: u8 },
    /// The last life is gone; the run ends.
    Fatal,
}

impl Lives {
    /// Applies one overlap. Decrements by exactly one, never below zero; a hit after the count
    /// reaches zero is reported as `Ignored` and leaves everything untouched.
    pub fn record_hit(&mut self) -> HitOutcome {
        if self.remaining == 0 {
            return HitOutcome::Ignored;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            HitOutcome::Fatal
        } else {
            HitOutcome::Damaged {
                remaining: self.remaining,
            }
        }
    }
}

/// A life was lost; `remaining` is the count after the decrement. The matching heart indicator
/// is removed in response.
#[derive(Event, Debug, Clone, Copy)]
pub struct LifeLost {
    pub remaining: u8,
}

/// Exactly one life remains. Fired once per run, when the count first reaches one.
#[derive(Event, Debug, Clone, Copy)]
pub struct LastLifeReached;

/// The last life is gone. Simulation freezes on the state change this event accompanies.
#[derive(Event, Debug, Clone, Copy)]
pub struct Defeated;

/// Terminal handoff to the downstream session collaborator, fired exactly once, a fixed grace
/// period after defeat.
#[derive(Event, Debug, Clone, Copy)]
pub struct RunEnded {
    pub final_score: u32,
}

/// One heart sprite per life, drawn along the top-left HUD row.
#[derive(Component)]
pub struct LifeIndicator {
    pub index: u8,
}

/// Axis-aligned overlap test between two centered boxes.
pub fn aabb_overlap(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    (a_pos.x - b_pos.x).abs() < a_half.x + b_half.x
        && (a_pos.y - b_pos.y).abs() < a_half.y + b_half.y
}

fn spawn_life_indicators(mut commands: Commands, lives: Res<Lives>, assets: Res<GameAssets>) {
    for index in 0..lives.max {
        commands.spawn((
            Name::new("LifeIndicator"),
            LifeIndicator { index },
            ImageBundle {
                image: UiImage::new(assets.heart.clone()),
                style: Style {
                    position_type: PositionType::Absolute,
                    left: Val::Px(50.0 + index as f32 * 35.0),
                    top: Val::Px(90.0),
                    width: Val::Px(28.0),
                    height: Val::Px(28.0),
                    ..default()
                },
                ..default()
            },
        ));
    }
}

/// Resolves this frame's player/obstacle overlaps. Runs after all kinematics so it sees final
/// positions; effects systems later in the frame see its events.
///
/// Each overlapping live crate costs one life, in deterministic query order. A non-fatal hit
/// kills the crate (back to the pool); the fatal hit leaves it in place, matching the original
/// presentation where the killing crate stays on screen. After the fatal hit the terminal guard
/// in `Lives::record_hit` turns any remaining same-frame overlaps into no-ops.
fn resolve_player_overlaps(
    mut lives: ResMut<Lives>,
    mut next_state: ResMut<NextState<GameState>>,
    mut life_lost: EventWriter<LifeLost>,
    mut last_life: EventWriter<LastLifeReached>,
    mut defeated: EventWriter<Defeated>,
    mut shake: EventWriter<ShakeCamera>,
    player: Query<(&Transform, &Collider), With<Player>>,
    mut obstacles: Query<(&mut Obstacle, &Transform, &Collider, &mut Visibility)>,
) {
    let Ok((player_transform, player_collider)) = player.get_single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (mut obstacle, transform, collider, mut visibility) in &mut obstacles {
        if !obstacle.alive {
            continue;
        }
        if !aabb_overlap(
            player_pos,
            player_collider.half_extents,
            transform.translation.truncate(),
            collider.half_extents,
        ) {
            continue;
        }

        match lives.record_hit() {
            HitOutcome::Ignored => {}
            HitOutcome::Damaged { remaining } => {
                life_lost.send(LifeLost { remaining });
                obstacle.alive = false;
                *visibility = Visibility::Hidden;
                shake.send(ShakeCamera {
                    duration: 0.2,
                    intensity: 10.0,
                });
                if remaining == 1 {
                    last_life.send(LastLifeReached);
                }
            }
            HitOutcome::Fatal => {
                life_lost.send(LifeLost { remaining: 0 });
                defeated.send(Defeated);
                shake.send(ShakeCamera {
                    duration: 0.3,
                    intensity: 40.0,
                });
                next_state.set(GameState::GameOver);
            }
        }
    }
}

/// Despawns the heart matching each lost life. Guarded: a heart that is already gone (or was
/// never spawned, as in logic tests) is skipped rather than double-despawned.
fn remove_life_indicator(
    mut commands: Commands,
    mut events: EventReader<LifeLost>,
    hearts: Query<(Entity, &LifeIndicator)>,
) {
    for event in events.read() {
        let Some((entity, _)) = hearts
            .iter()
            .find(|(_, heart)| heart.index == event.remaining)
        else {
            continue;
        };
        commands.entity(entity).despawn_recursive();
    }
}

/// Grace period between defeat and the terminal handoff, left running while the rest of the
/// simulation is frozen. Not cancellable: no input can leave `GameOver`.
#[derive(Resource)]
pub struct TerminalGrace {
    pub timer: Timer,
}

/// Fixed delay before the final score is handed downstream, giving the failure feedback
/// (lose cue, shake, tint) time to play.
pub const TERMINAL_GRACE_SECS: f32 = 1.0;

fn arm_terminal_grace(mut commands: Commands) {
    commands.insert_resource(TerminalGrace {
        timer: Timer::from_seconds(TERMINAL_GRACE_SECS, TimerMode::Once),
    });
}

fn emit_run_ended(
    time: Res<Time>,
    grace: Option<ResMut<TerminalGrace>>,
    score: Res<Score>,
    mut run_ended: EventWriter<RunEnded>,
) {
    let Some(mut grace) = grace else {
        return;
    };
    grace.timer.tick(time.delta());
    if grace.timer.just_finished() {
        run_ended.send(RunEnded {
            final_score: score.0,
        });
        info!("Run ended with final score {}", score.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Velocity;
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    #[test]
    fn record_hit_walks_down_and_saturates() {
        let mut lives = Lives::default();
        assert_eq!(lives.record_hit(), HitOutcome::Damaged { remaining: 2 });
        assert_eq!(lives.record_hit(), HitOutcome::Damaged { remaining: 1 });
        assert_eq!(lives.record_hit(), HitOutcome::Fatal);
        assert_eq!(lives.record_hit(), HitOutcome::Ignored);
        assert_eq!(lives.remaining, 0);
    }

    #[test]
    fn aabb_overlap_requires_both_axes() {
        let half = Vec2::splat(10.0);
        assert!(aabb_overlap(Vec2::ZERO, half, Vec2::new(15.0, 0.0), half));
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(25.0, 0.0), half));
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(15.0, 25.0), half));
        // Touching edges do not count as overlap.
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(20.0, 0.0), half));
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<GameState>()
            .init_resource::<Time>()
            .init_resource::<Lives>()
            .init_resource::<Score>()
            .add_event::<LifeLost>()
            .add_event::<LastLifeReached>()
            .add_event::<Defeated>()
            .add_event::<RunEnded>()
            .add_event::<ShakeCamera>()
            .add_systems(
                Update,
                (
                    resolve_player_overlaps.run_if(in_state(GameState::Playing)),
                    remove_life_indicator.run_if(in_state(GameState::Playing)),
                )
                    .chain(),
            )
            .add_systems(OnEnter(GameState::GameOver), arm_terminal_grace)
            .add_systems(
                Update,
                emit_run_ended.run_if(in_state(GameState::GameOver)),
            );
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Playing);
        app.update();
        app
    }

    fn advance(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
        app.update();
    }

    fn spawn_player_at_origin(app: &mut App) {
        app.world_mut().spawn((
            Player,
            Transform::default(),
            Collider::from_size(Vec2::splat(50.0)),
        ));
    }

    fn spawn_overlapping_obstacle(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Obstacle { alive: true },
                Transform::default(),
                Collider::from_size(Vec2::splat(40.0)),
                Velocity::default(),
                Visibility::Inherited,
            ))
            .id()
    }

    fn revive(app: &mut App, obstacle: Entity) {
        app.world_mut()
            .entity_mut(obstacle)
            .get_mut::<Obstacle>()
            .unwrap()
            .alive = true;
    }

    fn drain<E: Event + Clone>(app: &mut App) -> Vec<E> {
        let mut events = app.world_mut().resource_mut::<Events<E>>();
        events.drain().collect()
    }

    #[test]
    fn sequential_hits_walk_lives_down_with_one_last_life_warning() {
        let mut app = test_app();
        spawn_player_at_origin(&mut app);
        let obstacle = spawn_overlapping_obstacle(&mut app);

        advance(&mut app, 16);
        assert_eq!(app.world().resource::<Lives>().remaining, 2);
        // Non-fatal hits kill the crate.
        assert!(!app.world().entity(obstacle).get::<Obstacle>().unwrap().alive);
        assert!(drain::<LastLifeReached>(&mut app).is_empty());

        revive(&mut app, obstacle);
        advance(&mut app, 16);
        assert_eq!(app.world().resource::<Lives>().remaining, 1);
        assert_eq!(drain::<LastLifeReached>(&mut app).len(), 1);
    }

    #[test]
    fn fatal_hit_freezes_into_game_over_and_later_hits_are_noops() {
        let mut app = test_app();
        spawn_player_at_origin(&mut app);
        let obstacle = spawn_overlapping_obstacle(&mut app);

        // Burn down to the last life.
        advance(&mut app, 16);
        revive(&mut app, obstacle);
        advance(&mut app, 16);
        drain::<Defeated>(&mut app);

        // Fatal hit. The state write lands at the next frame's transition point.
        revive(&mut app, obstacle);
        advance(&mut app, 16);
        assert_eq!(app.world().resource::<Lives>().remaining, 0);
        assert_eq!(drain::<Defeated>(&mut app).len(), 1);
        // The killing crate stays on screen.
        assert!(app.world().entity(obstacle).get::<Obstacle>().unwrap().alive);

        // A fourth overlap changes nothing: the resolver no longer runs once GameOver applies,
        // and even a direct hit record would be ignored.
        advance(&mut app, 16);
        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::GameOver
        );
        assert_eq!(app.world().resource::<Lives>().remaining, 0);
        assert!(drain::<Defeated>(&mut app).is_empty());
    }

    #[test]
    fn simultaneous_overlaps_stop_at_zero() {
        let mut app = test_app();
        spawn_player_at_origin(&mut app);
        spawn_overlapping_obstacle(&mut app);
        spawn_overlapping_obstacle(&mut app);
        spawn_overlapping_obstacle(&mut app);
        spawn_overlapping_obstacle(&mut app);

        // Four overlapping crates in one frame: three hits land, the fourth is a no-op.
        advance(&mut app, 16);
        assert_eq!(app.world().resource::<Lives>().remaining, 0);
        assert_eq!(drain::<Defeated>(&mut app).len(), 1);
        assert_eq!(drain::<LifeLost>(&mut app).len(), 3);
    }

    #[test]
    fn run_ended_fires_exactly_once_after_the_grace_period() {
        let mut app = test_app();
        spawn_player_at_origin(&mut app);
        let obstacle = spawn_overlapping_obstacle(&mut app);
        app.world_mut().resource_mut::<Score>().0 = 42;

        for _ in 0..3 {
            revive(&mut app, obstacle);
            advance(&mut app, 16);
        }
        // Let the GameOver transition apply (and the grace timer arm) without passing time.
        advance(&mut app, 0);
        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::GameOver
        );

        advance(&mut app, 999);
        assert!(drain::<RunEnded>(&mut app).is_empty());

        advance(&mut app, 1);
        let ended = drain::<RunEnded>(&mut app);
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].final_score, 42);

        advance(&mut app, 2000);
        assert!(drain::<RunEnded>(&mut app).is_empty());
    }

    #[test]
    fn hearts_are_removed_once_per_life_and_absent_hearts_are_skipped() {
        let mut app = test_app();
        for index in 0..3u8 {
            app.world_mut().spawn((LifeIndicator { index }, Transform::default()));
        }

        app.world_mut().send_event(LifeLost { remaining: 2 });
        advance(&mut app, 16);
        let mut hearts = app.world_mut().query::<&LifeIndicator>();
        assert_eq!(hearts.iter(app.world()).count(), 2);

        // Replaying the same event must not remove a second heart.
        app.world_mut().send_event(LifeLost { remaining: 2 });
        advance(&mut app, 16);
        let mut hearts = app.world_mut().query::<&LifeIndicator>();
        assert_eq!(hearts.iter(app.world()).count(), 2);
    }
}
