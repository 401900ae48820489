//! The game's main screen states and transitions between them.

mod gameplay;
mod title;

use bevy::prelude::*;

use crate::{AppSystems, game::SessionEvent, menus::Menu};

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Screen>();

    app.add_plugins((gameplay::plugin, title::plugin));
    app.add_systems(Update, enter_started_game.in_set(AppSystems::Update));
}

/// The game's main screen states.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Screen {
    #[default]
    Title,
    Gameplay,
}

/// Whatever started the game (a menu button, play again, a granted weapon
/// trial), show the field.
fn enter_started_game(
    mut events: MessageReader<SessionEvent>,
    mut next_screen: ResMut<NextState<Screen>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    let started = events
        .read()
        .filter(|event| **event == SessionEvent::SessionStarted)
        .count();
    if started > 0 {
        next_screen.set(Screen::Gameplay);
        next_menu.set(Menu::None);
    }
}
