//! Asset preloading. Stashes Bevy `Handle`s for every image and sound named in `GameConfig` so
//! they are kept alive in memory for the whole run.
//!
//! Bevy's asset system reference-counts handles; when the last handle is dropped, the underlying
//! buffer is released. `GameAssets` keeps the handles alive until the app exits. Handles default
//! to `Handle::default()` so game-logic tests can run without an asset server.

use bevy::asset::{AssetId, LoadState};
use bevy::prelude::*;

use crate::config::GameConfig;
use crate::state::GameState;

/// Registers the loading systems and allocates the persistent handle cache.
pub struct GameAssetsPlugin;

impl Plugin for GameAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameAssets>()
            .add_systems(OnEnter(GameState::Loading), queue_asset_loads)
            .add_systems(
                Update,
                monitor_asset_loading.run_if(in_state(GameState::Loading)),
            );
    }
}

/// Resource that stores handles to game-wide assets. Each `Handle` is just a cloneable pointer
/// into Bevy's asset storage, so this struct is cheap to clone around.
#[derive(Resource, Default)]
pub struct GameAssets {
    pub background: Handle<Image>,
    pub platform: Handle<Image>,
    pub player: Handle<Image>,
    pub obstacle: Handle<Image>,
    pub heart: Handle<Image>,
    pub pause_button: Handle<Image>,
    pub music: Handle<AudioSource>,
    pub jump_sound: Handle<AudioSource>,
    pub damage_sound: Handle<AudioSource>,
    pub countdown_sound: Handle<AudioSource>,
    pub lose_sound: Handle<AudioSource>,
}

impl GameAssets {
    fn image_ids(&self) -> [AssetId<Image>; 6] {
        [
            self.background.id(),
            self.platform.id(),
            self.player.id(),
            self.obstacle.id(),
            self.heart.id(),
            self.pause_button.id(),
        ]
    }
}

/// Queues asynchronous loads for everything `GameConfig` names. The server caches decoded data;
/// the handles stored here reference that cache.
fn queue_asset_loads(
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
    mut assets: ResMut<GameAssets>,
) {
    assets.background = asset_server.load(config.images.background.clone());
    assets.platform = asset_server.load(config.images.platform.clone());
    assets.player = asset_server.load(config.images.player.clone());
    assets.obstacle = asset_server.load(config.images.obstacle.clone());
    assets.heart = asset_server.load(config.images.heart.clone());
    assets.pause_button = asset_server.load(config.images.pause_button.clone());

    assets.music = asset_server.load(config.sounds.background.clone());
    assets.jump_sound = asset_server.load(config.sounds.jump.clone());
    assets.damage_sound = asset_server.load(config.sounds.damage.clone());
    assets.countdown_sound = asset_server.load(config.sounds.countdown.clone());
    assets.lose_sound = asset_server.load(config.sounds.lose.clone());

    info!("Queued image and audio asset loads");
}

/// Watches the queued image loads and flips into gameplay once they settle. Sounds stream in
/// whenever they finish; only the sprites gate the run start. A failed load is logged and the
/// run starts anyway with placeholder handles rather than stalling forever.
fn monitor_asset_loading(
    asset_server: Res<AssetServer>,
    assets: Res<GameAssets>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut all_settled = true;
    for id in assets.image_ids() {
        match asset_server.get_load_state(id) {
            Some(LoadState::Loaded) => {}
            Some(LoadState::Failed(_)) => {
                warn!("An image asset failed to load; starting with placeholders.");
            }
            _ => {
                all_settled = false;
            }
        }
    }

    if all_settled {
        next_state.set(GameState::Playing);
    }
}
