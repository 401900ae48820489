//! The end of a game: won or lost, with the score and a way back in.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    AppSystems,
    game::{Session, SessionEvent, events::SessionOutcome},
    menus::Menu,
    screens::Screen,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, open_on_session_end.in_set(AppSystems::Update));

    app.add_systems(OnEnter(Menu::SessionEnd), spawn_session_end_menu);
    app.add_systems(
        Update,
        (
            play_again.run_if(input_just_pressed(KeyCode::Enter)),
            quit_to_title.run_if(input_just_pressed(KeyCode::Escape)),
        )
            .in_set(AppSystems::RecordInput)
            .run_if(in_state(Menu::SessionEnd)),
    );
}

/// How the last game ended.
#[derive(Resource, Debug, Clone, PartialEq)]
struct LastOutcome(SessionOutcome);

fn open_on_session_end(
    mut commands: Commands,
    mut events: MessageReader<SessionEvent>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    let ended = events
        .read()
        .filter_map(|event| match event {
            SessionEvent::SessionEnded(outcome) => Some(outcome.clone()),
            _ => None,
        })
        .last();
    if let Some(outcome) = ended {
        commands.insert_resource(LastOutcome(outcome));
        next_menu.set(Menu::SessionEnd);
    }
}

fn spawn_session_end_menu(
    mut commands: Commands,
    session: Res<Session>,
    outcome: Option<Res<LastOutcome>>,
) {
    let Some(outcome) = outcome else {
        warn!("Session end menu opened without an outcome");
        return;
    };

    let (title, details) = match &outcome.0 {
        SessionOutcome::Won {
            final_score,
            time_bonus,
        } => (
            "You win!".to_string(),
            format!("Final score {} (time bonus {})", final_score, time_bonus),
        ),
        SessionOutcome::Over { reason, score } => (
            reason.title().to_string(),
            format!("{}\nScore {}", reason.description(), score),
        ),
    };
    let high_score = session.profile().high_score;
    let best = if outcome.0.score() > 0 && outcome.0.score() == high_score {
        "New high score!".to_string()
    } else {
        format!("High score {}", high_score)
    };

    commands.spawn((
        widget::overlay_root("Session End Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::SessionEnd),
        children![
            widget::header(title),
            widget::label(details),
            widget::label(best),
            widget::button("Play again", play_again_on_click),
            widget::button("Quit to title", quit_to_title_on_click),
        ],
    ));
}

fn play_again_on_click(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    session.play_again();
}

fn quit_to_title_on_click(
    _: On<Pointer<Click>>,
    mut session: ResMut<Session>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    session.exit_to_menu();
    next_screen.set(Screen::Title);
}

fn play_again(mut session: ResMut<Session>) {
    session.play_again();
}

fn quit_to_title(mut session: ResMut<Session>, mut next_screen: ResMut<NextState<Screen>>) {
    session.exit_to_menu();
    next_screen.set(Screen::Title);
}
