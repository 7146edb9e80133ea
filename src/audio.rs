//! Sound playback wired to gameplay events: looping background music, one-shot jump/damage
//! cues, the last-life countdown (force-stopped after a fixed timeout), and the lose sting.
//!
//! Bevy's audio runs through entities: spawning an `AudioBundle` starts playback and attaches
//! an `AudioSink` once the device picks it up; despawning the entity stops the sound.

use bevy::audio::Volume;
use bevy::prelude::*;

use crate::assets::GameAssets;
use crate::lives::{Defeated, LastLifeReached, LifeLost};
use crate::movement::Jumped;
use crate::state::{GameSet, GameState};

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnExit(GameState::Loading), start_background_music)
            .add_systems(
                Update,
                (
                    play_jump_sound,
                    play_damage_sound,
                    start_countdown_cue,
                    tick_countdown_timeout,
                    handle_defeat,
                )
                    .in_set(GameSet::Effects)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::Paused), pause_all_sinks)
            .add_systems(OnExit(GameState::Paused), resume_all_sinks);
    }
}

#[derive(Component)]
struct BackgroundMusic;

/// The transient last-life cue entity. Kept findable so the timeout (or defeat) can cut it off.
#[derive(Component)]
struct CountdownCue;

/// How long the countdown cue is allowed to play before being force-stopped.
const COUNTDOWN_CUE_SECS: f32 = 3.0;

/// Remaining playtime for the countdown cue. Ticked only while `Playing`, so a pause suspends
/// the cutoff along with everything else.
#[derive(Resource)]
struct CueTimeout {
    timer: Timer,
}

fn start_background_music(mut commands: Commands, assets: Res<GameAssets>) {
    commands.spawn((
        Name::new("BackgroundMusic"),
        BackgroundMusic,
        AudioBundle {
            source: assets.music.clone(),
            settings: PlaybackSettings::LOOP.with_volume(Volume::new(1.0)),
        },
    ));
}

fn play_jump_sound(
    mut commands: Commands,
    mut jumped: EventReader<Jumped>,
    assets: Res<GameAssets>,
) {
    for _ in jumped.read() {
        commands.spawn(AudioBundle {
            source: assets.jump_sound.clone(),
            settings: PlaybackSettings::DESPAWN.with_volume(Volume::new(0.5)),
        });
    }
}

/// Damage feedback for non-fatal hits only; the fatal hit gets the lose sting instead.
fn play_damage_sound(
    mut commands: Commands,
    mut events: EventReader<LifeLost>,
    assets: Res<GameAssets>,
) {
    for event in events.read() {
        if event.remaining == 0 {
            continue;
        }
        commands.spawn(AudioBundle {
            source: assets.damage_sound.clone(),
            settings: PlaybackSettings::DESPAWN.with_volume(Volume::new(0.5)),
        });
    }
}

fn start_countdown_cue(
    mut commands: Commands,
    mut events: EventReader<LastLifeReached>,
    assets: Res<GameAssets>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    commands.spawn((
        Name::new("CountdownCue"),
        CountdownCue,
        AudioBundle {
            source: assets.countdown_sound.clone(),
            settings: PlaybackSettings::ONCE.with_volume(Volume::new(0.6)),
        },
    ));
    commands.insert_resource(CueTimeout {
        timer: Timer::from_seconds(COUNTDOWN_CUE_SECS, TimerMode::Once),
    });
}

fn tick_countdown_timeout(
    mut commands: Commands,
    time: Res<Time>,
    timeout: Option<ResMut<CueTimeout>>,
    cues: Query<Entity, With<CountdownCue>>,
) {
    let Some(mut timeout) = timeout else {
        return;
    };
    timeout.timer.tick(time.delta());
    if !timeout.timer.just_finished() {
        return;
    }

    for entity in &cues {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<CueTimeout>();
}

/// Defeat silences everything that is still playing, then fires the lose sting. This runs on
/// the fatal frame itself (the state flip lands a frame later), so nothing lingers into the
/// frozen game-over screen except the sting.
fn handle_defeat(
    mut commands: Commands,
    mut defeated: EventReader<Defeated>,
    assets: Res<GameAssets>,
    playing: Query<Entity, With<AudioSink>>,
) {
    if defeated.is_empty() {
        return;
    }
    defeated.clear();

    for entity in &playing {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<CueTimeout>();

    commands.spawn(AudioBundle {
        source: assets.lose_sound.clone(),
        settings: PlaybackSettings::DESPAWN.with_volume(Volume::new(0.7)),
    });
}

fn pause_all_sinks(sinks: Query<&AudioSink>) {
    for sink in &sinks {
        sink.pause();
    }
}

fn resume_all_sinks(sinks: Query<&AudioSink>) {
    for sink in &sinks {
        sink.play();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn countdown_cue_is_cut_off_after_its_timeout() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_systems(Update, tick_countdown_timeout);
        app.insert_resource(CueTimeout {
            timer: Timer::from_seconds(COUNTDOWN_CUE_SECS, TimerMode::Once),
        });
        let cue = app.world_mut().spawn(CountdownCue).id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(2999));
        app.update();
        assert!(app.world().get_entity(cue).is_some());

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(1));
        app.update();
        assert!(app.world().get_entity(cue).is_none());
        assert!(app.world().get_resource::<CueTimeout>().is_none());
    }
}
