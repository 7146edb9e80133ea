//! HUD and overlays: score readout, instruction prompt, last-life warning, pause button and
//! overlay, and the terminal game-over screen.
//!
//! UI entities live in Bevy's ECS; once despawned, all associated style/text components are
//! dropped automatically.

use bevy::prelude::*;

use crate::assets::GameAssets;
use crate::config::GameConfig;
use crate::lives::{LastLifeReached, RunEnded};
use crate::movement::Jumped;
use crate::score::Score;
use crate::state::{GameSet, GameState};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), spawn_loading_text)
            .add_systems(OnExit(GameState::Loading), (despawn_loading_text, spawn_hud))
            .add_systems(
                Update,
                (
                    update_score_text.run_if(resource_changed::<Score>),
                    spawn_game_over_overlay.run_if(in_state(GameState::GameOver)),
                ),
            )
            .add_systems(
                Update,
                (
                    hide_instruction_on_jump,
                    start_last_life_blink,
                    animate_last_life_blink,
                    pause_button_pressed,
                )
                    .in_set(GameSet::Effects)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::Paused), spawn_pause_overlay)
            .add_systems(OnExit(GameState::Paused), despawn_pause_overlay);
    }
}

#[derive(Component)]
struct LoadingText;

#[derive(Component)]
pub struct ScoreText;

#[derive(Component)]
struct InstructionText;

#[derive(Component)]
struct LastLifeText;

#[derive(Component)]
struct PauseButton;

#[derive(Component)]
struct PauseOverlay;

#[derive(Component)]
struct GameOverOverlay;

/// Blink bookkeeping for the last-life warning: a fixed number of visibility flips at a fixed
/// cadence. Pausing stops the ticking system, so the blink freezes with the rest of the run.
#[derive(Component)]
struct Blink {
    timer: Timer,
    flips_left: u8,
}

const BLINK_PERIOD_SECS: f32 = 0.4;
const BLINK_FLIPS: u8 = 6;

/// Placeholder shown while assets stream in. Uses the default font only, since nothing else is
/// guaranteed to be loaded yet.
fn spawn_loading_text(mut commands: Commands) {
    commands.spawn((
        Name::new("LoadingText"),
        LoadingText,
        TextBundle::from_section(
            "Loading...",
            TextStyle {
                font_size: 40.0,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Percent(42.0),
            top: Val::Percent(45.0),
            ..default()
        }),
    ));
}

fn despawn_loading_text(mut commands: Commands, query: Query<Entity, With<LoadingText>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

fn spawn_hud(mut commands: Commands, config: Res<GameConfig>, assets: Res<GameAssets>) {
    commands.spawn((
        Name::new("ScoreText"),
        ScoreText,
        TextBundle::from_section(
            "Score: 0",
            TextStyle {
                font_size: 25.0,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(30.0),
            top: Val::Px(15.0),
            ..default()
        }),
    ));

    commands.spawn((
        Name::new("InstructionText"),
        InstructionText,
        TextBundle::from_section(
            config.instructions.clone(),
            TextStyle {
                font_size: 50.0,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Percent(40.0),
            top: Val::Percent(33.0),
            ..default()
        }),
    ));

    let mut warning = TextBundle::from_section(
        config.last_life_text.clone(),
        TextStyle {
            font_size: 50.0,
            color: Color::srgb(1.0, 0.18, 0.18),
            ..default()
        },
    )
    .with_style(Style {
        position_type: PositionType::Absolute,
        left: Val::Percent(40.0),
        top: Val::Percent(33.0),
        ..default()
    });
    warning.visibility = Visibility::Hidden;
    commands.spawn((Name::new("LastLifeText"), LastLifeText, warning));

    commands.spawn((
        Name::new("PauseButton"),
        PauseButton,
        ButtonBundle {
            image: UiImage::new(assets.pause_button.clone()),
            style: Style {
                position_type: PositionType::Absolute,
                right: Val::Px(30.0),
                top: Val::Px(30.0),
                width: Val::Px(56.0),
                height: Val::Px(56.0),
                ..default()
            },
            ..default()
        },
    ));
}

fn update_score_text(score: Res<Score>, mut query: Query<&mut Text, With<ScoreText>>) {
    for mut text in &mut query {
        text.sections[0].value = format!("Score: {}", score.0);
    }
}

fn hide_instruction_on_jump(
    mut jumped: EventReader<Jumped>,
    mut query: Query<&mut Visibility, With<InstructionText>>,
) {
    if jumped.is_empty() {
        return;
    }
    jumped.clear();
    for mut visibility in &mut query {
        *visibility = Visibility::Hidden;
    }
}

fn start_last_life_blink(
    mut commands: Commands,
    mut events: EventReader<LastLifeReached>,
    mut query: Query<(Entity, &mut Visibility), With<LastLifeText>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    for (entity, mut visibility) in &mut query {
        *visibility = Visibility::Inherited;
        commands.entity(entity).insert(Blink {
            timer: Timer::from_seconds(BLINK_PERIOD_SECS, TimerMode::Repeating),
            flips_left: BLINK_FLIPS,
        });
    }
}

fn animate_last_life_blink(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Blink, &mut Visibility), With<LastLifeText>>,
) {
    for (entity, mut blink, mut visibility) in &mut query {
        blink.timer.tick(time.delta());
        if !blink.timer.just_finished() {
            continue;
        }

        blink.flips_left = blink.flips_left.saturating_sub(1);
        if blink.flips_left == 0 {
            *visibility = Visibility::Hidden;
            commands.entity(entity).remove::<Blink>();
            continue;
        }

        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Inherited,
            _ => Visibility::Hidden,
        };
    }
}

fn pause_button_pressed(
    interactions: Query<&Interaction, (Changed<Interaction>, With<PauseButton>)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for interaction in &interactions {
        if *interaction == Interaction::Pressed {
            next_state.set(GameState::Paused);
        }
    }
}

/// Spawns a full-screen dimmed node with centered text. Nodes live in the UI world and are
/// rendered by the UI camera automatically.
fn spawn_pause_overlay(mut commands: Commands) {
    commands
        .spawn((
            PauseOverlay,
            Name::new("PauseOverlay"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "Paused\nPress ESC to resume",
                TextStyle {
                    font_size: 36.0,
                    color: Color::srgba(0.9, 0.9, 0.9, 1.0),
                    ..default()
                },
            ));
        });
}

fn despawn_pause_overlay(mut commands: Commands, query: Query<Entity, With<PauseOverlay>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

/// Shows the terminal screen once the downstream handoff fires. `RunEnded` arrives exactly once,
/// so the overlay is spawned exactly once.
fn spawn_game_over_overlay(
    mut commands: Commands,
    mut events: EventReader<RunEnded>,
    existing: Query<(), With<GameOverOverlay>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    if !existing.is_empty() {
        return;
    }

    commands
        .spawn((
            GameOverOverlay,
            Name::new("GameOverOverlay"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    row_gap: Val::Px(12.0),
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "Game Over",
                TextStyle {
                    font_size: 64.0,
                    color: Color::srgb(1.0, 0.3, 0.3),
                    ..default()
                },
            ));
            parent.spawn(TextBundle::from_section(
                format!("Final score: {}", event.final_score),
                TextStyle {
                    font_size: 36.0,
                    color: Color::WHITE,
                    ..default()
                },
            ));
        });
}
