//! The screen state for the main gameplay.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{AppSystems, game::Session, menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            fire_on_input,
            abandon_game.run_if(input_just_pressed(KeyCode::Escape)),
        )
            .in_set(AppSystems::RecordInput)
            .run_if(in_state(Screen::Gameplay).and(in_state(Menu::None))),
    );
}

fn fire_on_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut session: ResMut<Session>,
) {
    let pressed = keyboard.just_pressed(KeyCode::Space) || mouse.just_pressed(MouseButton::Left);
    if pressed && !session.fire() {
        debug!("Fire ignored: gun not ready");
    }
}

fn abandon_game(mut session: ResMut<Session>, mut next_screen: ResMut<NextState<Screen>>) {
    session.exit_to_menu();
    next_screen.set(Screen::Title);
}
