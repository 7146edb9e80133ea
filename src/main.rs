//! Application entry point: composes the Bevy runtime, core plugins, and window configuration.
//!
//! Bevy keeps long-lived singletons (plugins, resources) alive for the duration of the app.
//! This file builds the immutable `GameConfig`, wires the window to it, and defers everything
//! else to the `ObstacleRushPlugin` defined in `app.rs`.

mod app;
mod arena;
mod assets;
mod audio;
mod camera;
mod config;
mod difficulty;
mod lives;
mod movement;
mod player;
mod score;
mod spawn;
mod state;
mod ui;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod wasm;

use app::ObstacleRushPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::render::texture::ImagePlugin;
use bevy::window::{Window, WindowResizeConstraints, WindowResolution};
use config::GameConfig;

fn main() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    wasm::set_panic_hook();

    // The configuration value is built once here and handed into the game as an immutable
    // resource; the window's logical resolution mirrors it so world pixels map 1:1.
    let config = GameConfig::default();
    let resolution = config.resolution();

    let primary_window = Window {
        title: config.title.clone(),
        resolution: WindowResolution::new(resolution.x, resolution.y),
        resizable: true,
        resize_constraints: WindowResizeConstraints {
            min_width: 640.0,
            min_height: 360.0,
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
        },
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#bevy-canvas".to_owned()),
        ..default()
    };

    // `DefaultPlugins` spins up rendering, input, audio, etc. We override pieces that matter for
    // this project: nearest-neighbor sampling for crisp pixels, and asset settings for desktop vs
    // web. Bevy keeps plugin instances in an internal registry, so we simply compose and hand
    // them to the App builder.
    let mut default_plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        })
        .set(ImagePlugin::default_nearest());

    #[cfg(not(target_arch = "wasm32"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(true),
            ..default()
        });
    }

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(false),
            ..default()
        });
    }

    // `App::new()` allocates the ECS world and schedule. Plugins + the clear color describe
    // startup state; once `run()` is called, Bevy drives the main loop until the process exits.
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.93, 0.93, 0.93)))
        .insert_resource(config)
        .add_plugins(default_plugins)
        .add_plugins(ObstacleRushPlugin)
        .run();
}
