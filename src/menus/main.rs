//! The main menu (seen on the title screen).

use bevy::prelude::*;

use crate::{
    game::{Session, levels::GameMode},
    menus::Menu,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Main), spawn_main_menu);
}

fn spawn_main_menu(mut commands: Commands, session: Res<Session>) {
    let high_score = format!("High score: {}", session.profile().high_score);

    commands.spawn((
        widget::ui_root("Main Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Main),
        #[cfg(not(target_family = "wasm"))]
        children![
            widget::header("SpinShot Fury"),
            widget::label(high_score),
            widget::button("Play", start_normal_game),
            widget::button("Random mode", start_random_game),
            widget::button("Armory", open_armory_menu),
            widget::button("Achievements", open_achievements_menu),
            widget::button("Settings", open_settings_menu),
            widget::button("Exit", exit_app),
        ],
        #[cfg(target_family = "wasm")]
        children![
            widget::header("SpinShot Fury"),
            widget::label(high_score),
            widget::button("Play", start_normal_game),
            widget::button("Random mode", start_random_game),
            widget::button("Armory", open_armory_menu),
            widget::button("Achievements", open_achievements_menu),
            widget::button("Settings", open_settings_menu),
        ],
    ));
}

fn start_normal_game(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    session.start_game(GameMode::Normal);
}

fn start_random_game(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    session.start_game(GameMode::Random);
}

fn open_armory_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Armory);
}

fn open_achievements_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Achievements);
}

fn open_settings_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Settings);
}

#[cfg(not(target_family = "wasm"))]
fn exit_app(_: On<Pointer<Click>>, mut app_exit: MessageWriter<AppExit>) {
    app_exit.write(AppExit::Success);
}
