//! High-level plugin composition.
//!
//! The `ObstacleRushPlugin` glues together all domain-specific plugins (arena, spawner, lives,
//! score, etc.) and sets up system ordering. Each subsystem is responsible for its own state;
//! this orchestrator merely registers them with the Bevy application.

use bevy::prelude::*;

use crate::arena::ArenaPlugin;
use crate::assets::GameAssetsPlugin;
use crate::audio::GameAudioPlugin;
use crate::camera::{CameraPlugin, MainCamera};
use crate::config::GameConfig;
use crate::lives::LivesPlugin;
use crate::movement::MovementPlugin;
use crate::player::PlayerPlugin;
use crate::score::ScorePlugin;
use crate::spawn::SpawnPlugin;
use crate::state::{toggle_pause, GameSet, GameState};
use crate::ui::UiPlugin;

/// Bundles every gameplay-centric plugin into a single unit that can be added to the Bevy
/// `App`. Memory for each plugin is managed by Bevy; once the app shuts down, all resources
/// owned by these plugins are dropped automatically.
pub struct ObstacleRushPlugin;

impl Plugin for ObstacleRushPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(GameConfig::default());
        }

        app.init_state::<GameState>() // Allocates the state machine in the ECS world.
            .add_plugins((
                GameAssetsPlugin, // Image + audio handle preloading.
                ArenaPlugin,      // Backdrop and scrolling platform.
                PlayerPlugin,     // Player entity lifecycle.
                MovementPlugin,   // Input + jump kinematics + obstacle motion.
                SpawnPlugin,      // Spawn cycle, difficulty ramp, obstacle pool.
                LivesPlugin,      // Overlap resolution and life state.
                ScorePlugin,      // Score accumulator.
                GameAudioPlugin,  // Event-driven playback.
                CameraPlugin,     // Camera shake feedback.
                UiPlugin,         // HUD, pause and game-over overlays.
            ))
            // Systems inside these sets execute sequentially while the game is in the
            // `Playing` state. `chain()` enforces Input → Movement → Effects ordering so the
            // frame's overlap resolution is finished before any effect system reacts to it.
            .configure_sets(
                Update,
                (GameSet::Input, GameSet::Movement, GameSet::Effects)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Startup, setup_camera) // Creates the primary camera entity once.
            .add_systems(Update, toggle_pause); // Hot-swaps GameState based on keyboard input.
    }
}

/// Spawns the 2D camera tagged with `MainCamera` so the shake system can locate it. The ECS
/// stores this entity in an archetype table; it stays alive until the app exits.
fn setup_camera(mut commands: Commands) {
    commands.spawn((Name::new("MainCamera"), Camera2dBundle::default(), MainCamera));
}
