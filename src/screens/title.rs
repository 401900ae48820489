//! The title screen, where the main menu lives.

use bevy::prelude::*;

use crate::{game::Session, menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Title), open_main_menu);
    app.add_systems(OnExit(Screen::Title), close_menus);
}

fn open_main_menu(mut next_menu: ResMut<NextState<Menu>>, mut session: ResMut<Session>) {
    session.enter_menu();
    next_menu.set(Menu::Main);
}

fn close_menus(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::None);
}
