//! The achievements list. Hidden ones stay secret until earned.

use bevy::{ecs::spawn::SpawnWith, input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    game::{Session, achievements::ACHIEVEMENTS},
    menus::Menu,
    theme::{palette, widget},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Achievements), spawn_achievements_menu);
    app.add_systems(
        Update,
        go_back.run_if(in_state(Menu::Achievements).and(input_just_pressed(KeyCode::Escape))),
    );
}

fn spawn_achievements_menu(mut commands: Commands, session: Res<Session>) {
    let rows: Vec<(String, Color)> = ACHIEVEMENTS
        .iter()
        .map(|achievement| {
            let unlocked = session.profile().has_achievement(achievement.id);
            if unlocked {
                (
                    format!("{}: {}", achievement.name, achievement.description),
                    palette::GOOD_TEXT,
                )
            } else if achievement.hidden {
                ("???".to_string(), palette::LABEL_TEXT)
            } else {
                (
                    format!("{}: {}", achievement.name, achievement.description),
                    palette::LABEL_TEXT,
                )
            }
        })
        .collect();
    let earned = format!(
        "{}/{} earned",
        session.profile().unlocked_achievements.len(),
        ACHIEVEMENTS.len()
    );

    commands.spawn((
        widget::overlay_root("Achievements Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Achievements),
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            parent.spawn(widget::header("Achievements"));
            parent.spawn(widget::label(earned));
            for (text, color) in rows {
                parent.spawn((
                    Name::new("Achievement"),
                    Text(text),
                    TextFont::from_font_size(18.0),
                    TextColor(color),
                ));
            }
            parent.spawn(widget::button("Back", go_back_on_click));
        })),
    ));
}

fn go_back_on_click(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}

fn go_back(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}
