//! Static run description: display text, asset keys, and play-field sizing.
//!
//! `GameConfig` is built once before the app starts and never mutated afterwards; systems share
//! it immutably through `Res<GameConfig>`. It is deserialisable so a hosting shell can hand in a
//! different skin (other sprites, other copy) without touching game logic.

use bevy::prelude::*;
use serde::Deserialize;

/// Which way the play field is laid out. `width`/`height` describe the landscape layout;
/// `Portrait` swaps them when the resolution is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Image asset paths, keyed by role. Paths are relative to the Bevy asset root.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagePaths {
    pub background: String,
    pub platform: String,
    pub player: String,
    pub obstacle: String,
    pub heart: String,
    pub pause_button: String,
}

/// Sound asset paths, keyed by role.
#[derive(Debug, Clone, Deserialize)]
pub struct SoundPaths {
    pub background: String,
    pub jump: String,
    pub damage: String,
    pub countdown: String,
    pub lose: String,
}

/// Immutable configuration value passed into the game at startup. Cloning is cheap (a handful of
/// small strings) and only happens at load time.
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub title: String,
    pub instructions: String,
    pub last_life_text: String,
    pub orientation: Orientation,
    pub width: f32,
    pub height: f32,
    /// Height of the scrolling platform strip along the bottom edge.
    pub platform_height: f32,
    pub images: ImagePaths,
    pub sounds: SoundPaths,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Obstacle Rush".to_owned(),
            instructions: "Tap to Jump".to_owned(),
            last_life_text: "Last life!".to_owned(),
            orientation: Orientation::Landscape,
            width: 1280.0,
            height: 720.0,
            platform_height: 80.0,
            images: ImagePaths {
                background: "textures/background.png".to_owned(),
                platform: "textures/platform.png".to_owned(),
                player: "textures/player.png".to_owned(),
                obstacle: "textures/crate.png".to_owned(),
                heart: "textures/heart.png".to_owned(),
                pause_button: "textures/pause.png".to_owned(),
            },
            sounds: SoundPaths {
                background: "audio/background.ogg".to_owned(),
                jump: "audio/jump.ogg".to_owned(),
                damage: "audio/damage.ogg".to_owned(),
                countdown: "audio/countdown.ogg".to_owned(),
                lose: "audio/lose.ogg".to_owned(),
            },
        }
    }
}

impl GameConfig {
    /// Logical resolution of the play field, honoring the configured orientation.
    pub fn resolution(&self) -> Vec2 {
        match self.orientation {
            Orientation::Landscape => Vec2::new(self.width, self.height),
            Orientation::Portrait => Vec2::new(self.height, self.width),
        }
    }

    /// World-space x of the left edge of the play field (the camera sits at the origin).
    pub fn left_edge(&self) -> f32 {
        -self.resolution().x * 0.5
    }

    /// World-space x of the right edge of the play field.
    pub fn right_edge(&self) -> f32 {
        self.resolution().x * 0.5
    }

    /// World-space y of the bottom of the play field.
    pub fn bottom_edge(&self) -> f32 {
        -self.resolution().y * 0.5
    }

    /// World-space y of the platform's walkable surface.
    pub fn platform_top(&self) -> f32 {
        self.bottom_edge() + self.platform_height
    }
}
