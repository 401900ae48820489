//! The game's menus and transitions between them.

mod achievements;
mod armory;
mod main;
mod reward_offer;
mod session_end;
mod settings;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Menu>();

    app.add_plugins((
        achievements::plugin,
        armory::plugin,
        main::plugin,
        reward_offer::plugin,
        session_end::plugin,
        settings::plugin,
    ));
}

#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Menu {
    #[default]
    None,
    Main,
    Armory,
    Achievements,
    Settings,
    RewardOffer,
    SessionEnd,
}
