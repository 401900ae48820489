//! Asks the player whether to watch a rewarded ad, then waits for it.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    AppSystems,
    game::{Session, SessionEvent},
    menus::Menu,
    screens::Screen,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, open_on_offer.in_set(AppSystems::Update));

    app.add_systems(OnEnter(Menu::RewardOffer), spawn_reward_offer_menu);
    app.add_systems(
        Update,
        (
            accept.run_if(input_just_pressed(KeyCode::KeyY)),
            decline.run_if(input_just_pressed(KeyCode::KeyN)),
            update_offer_status,
            close_when_answered,
        )
            .chain()
            .in_set(AppSystems::Update)
            .run_if(in_state(Menu::RewardOffer)),
    );
}

#[derive(Component)]
struct OfferStatus;

fn open_on_offer(mut events: MessageReader<SessionEvent>, mut next_menu: ResMut<NextState<Menu>>) {
    let offered = events
        .read()
        .filter(|event| matches!(event, SessionEvent::OfferReward(_)))
        .count();
    if offered > 0 {
        next_menu.set(Menu::RewardOffer);
    }
}

fn spawn_reward_offer_menu(mut commands: Commands, session: Res<Session>) {
    let prompt = session
        .pending_offer()
        .map(|offer| offer.kind.prompt())
        .unwrap_or_default();

    commands.spawn((
        widget::overlay_root("Reward Offer Menu"),
        GlobalZIndex(3),
        DespawnOnExit(Menu::RewardOffer),
        children![
            widget::header("Watch an ad?"),
            widget::label(prompt),
            (widget::label(""), OfferStatus),
            widget::button("Yes (Y)", accept_on_click),
            widget::button("No (N)", decline_on_click),
        ],
    ));
}

/// Answer only once: after accepting, the ad is already on its way.
fn answer(session: &mut Session, accepted: bool) {
    match session.pending_offer() {
        Some(offer) if offer.ticket.is_none() => session.answer_offer(accepted),
        _ => {}
    }
}

fn accept_on_click(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    answer(&mut session, true);
}

fn decline_on_click(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    answer(&mut session, false);
}

fn accept(mut session: ResMut<Session>) {
    answer(&mut session, true);
}

fn decline(mut session: ResMut<Session>) {
    answer(&mut session, false);
}

fn update_offer_status(session: Res<Session>, mut status: Single<&mut Text, With<OfferStatus>>) {
    let waiting = session
        .pending_offer()
        .is_some_and(|offer| offer.ticket.is_some());
    let value = if waiting { "Loading ad..." } else { "" };
    if status.0 != value {
        status.0 = value.to_string();
    }
}

/// Leave once the offer is settled. A lost game is handled by the session
/// end menu, a started game by the screen change.
fn close_when_answered(
    session: Res<Session>,
    screen: Res<State<Screen>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    if session.pending_offer().is_some() {
        return;
    }
    if session.is_playing() {
        next_menu.set(Menu::None);
    } else if *screen.get() == Screen::Title {
        next_menu.set(Menu::Armory);
    }
}
