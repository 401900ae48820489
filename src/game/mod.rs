//! The game core for SpinShot Fury.
//!
//! This module contains the gameplay rules:
//! - Weapon and achievement catalogs, level layouts
//! - The session resource and its rotation/fire control loop
//! - Collision and scoring
//! - Level progression and the end of a game
//! - The rewarded-ad economy and the armory
//!
//! Everything here is driven through [`Session`]. The systems below feed it
//! frame time and publish what it reports.

pub mod achievements;
pub mod armory;
mod collision;
pub mod config;
mod control;
pub mod economy;
pub mod events;
pub mod levels;
pub mod profile;
mod progression;
pub mod schedule;
pub mod session;
pub mod view;
pub mod weapons;

#[cfg(test)]
mod test_utils;

use bevy::prelude::*;

pub use self::{
    events::SessionEvent,
    session::{EndReason, Session, SessionStatus},
};
use crate::AppSystems;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<config::Tunables>();
    app.init_resource::<Session>();
    app.add_message::<SessionEvent>();

    app.add_systems(Update, advance_session.in_set(AppSystems::TickTimers));
    app.add_systems(Update, publish_session_events.in_set(AppSystems::Publish));
}

/// Run the session for one display frame.
fn advance_session(time: Res<Time>, mut session: ResMut<Session>) {
    session.advance(time.delta());
}

/// Forward everything the session queued this frame as messages.
fn publish_session_events(mut session: ResMut<Session>, mut events: MessageWriter<SessionEvent>) {
    let drained = session.drain_events();
    if !drained.is_empty() {
        events.write_batch(drained);
    }
}
