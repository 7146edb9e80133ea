//! Global game state definitions. States are stored by Bevy in a stack; switching states simply
//! updates an enum value and triggers on-enter/on-exit schedules. No heap allocations occur when
//! toggling states.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

/// High-level state machine for the run. `GameOver` is terminal: nothing transitions out of it.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
    GameOver,
}

/// Named system sets to structure the Update schedule. Overlap resolution runs at the end of
/// `Movement`, so every `Effects` system observes this frame's hits before anything renders.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Movement,
    Effects,
}

/// Toggles between Playing and Paused when `ESC` is pressed. The `State` resource is a read-only
/// snapshot; `NextState` writes the pending transition which Bevy applies at the end of the frame.
/// Every timer-ticking system runs only in `Playing`, so a pause leaves each timer's remaining
/// countdown untouched and resuming picks it back up without drift.
pub fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }

    match state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
        GameState::Loading | GameState::GameOver => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn pause_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<GameState>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, toggle_pause);
        app
    }

    fn press_escape(app: &mut App) {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.reset_all();
        keyboard.press(KeyCode::Escape);
        app.update();
        // The toggle writes `NextState` during Update, after this frame's transition point
        // has already run; release the key and run one more frame so the switch lands.
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .reset_all();
        app.update();
    }

    fn current_state(app: &App) -> GameState {
        *app.world().resource::<State<GameState>>().get()
    }

    #[test]
    fn escape_toggles_between_playing_and_paused() {
        let mut app = pause_app();
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Playing);
        app.update();

        press_escape(&mut app);
        assert_eq!(current_state(&app), GameState::Paused);

        press_escape(&mut app);
        assert_eq!(current_state(&app), GameState::Playing);
    }

    #[test]
    fn pause_switch_lands_on_the_frame_after_the_press() {
        let mut app = pause_app();
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Playing);
        app.update();

        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.reset_all();
        keyboard.press(KeyCode::Escape);
        app.update();
        // The write happens during Update, so this frame still reads Playing.
        assert_eq!(current_state(&app), GameState::Playing);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .reset_all();
        app.update();
        assert_eq!(current_state(&app), GameState::Paused);
    }

    #[test]
    fn escape_cannot_leave_game_over() {
        let mut app = pause_app();
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::GameOver);
        app.update();

        press_escape(&mut app);
        assert_eq!(current_state(&app), GameState::GameOver);
    }
}
