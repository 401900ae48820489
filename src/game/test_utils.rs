//! Helpers for driving a session frame by frame in tests.

use std::time::Duration;

use super::{
    economy::AdTicket,
    levels::GameMode,
    session::Session,
};

/// One display frame at roughly 60 Hz.
pub const FRAME: Duration = Duration::from_millis(16);

/// Frames after which a helper gives up waiting.
const WAIT_LIMIT: usize = 600;

/// A session that has started a normal-mode game, with its start-up events
/// already drained.
pub fn started_session() -> Session {
    let mut session = Session::with_seed(7);
    session.start_game(GameMode::Normal);
    session.drain_events();
    session
}

pub fn step_frames(session: &mut Session, frames: usize) {
    for _ in 0..frames {
        session.advance(FRAME);
    }
}

/// Advance whole frames until at least `duration` has passed.
pub fn step_for(session: &mut Session, duration: Duration) {
    let frames = duration.as_millis().div_ceil(FRAME.as_millis()) as usize;
    step_frames(session, frames);
}

/// Step until `done` holds, panicking if it never does.
pub fn step_until(session: &mut Session, mut done: impl FnMut(&Session) -> bool) {
    for _ in 0..WAIT_LIMIT {
        if done(session) {
            return;
        }
        session.advance(FRAME);
    }
    panic!("condition not reached within {WAIT_LIMIT} frames");
}

/// Point the gun so a shot travels through the centre of target `index`.
pub fn aim_at(session: &mut Session, index: usize) {
    let offset = session.targets()[index].center() - session.tunables().field_center();
    aim_along(session, offset.y.atan2(offset.x).to_degrees());
}

/// Point the gun so a shot travels along placement angle `degrees`.
pub fn aim_along(session: &mut Session, degrees: f32) {
    session.state.rotation = (degrees + 90.0).rem_euclid(360.0);
}

pub fn wait_until_ready(session: &mut Session) {
    step_until(session, |s| s.state().can_fire && !s.state().spinning);
}

/// Shoot target `index` and let the bullet land.
pub fn shoot_target(session: &mut Session, index: usize) {
    wait_until_ready(session);
    aim_at(session, index);
    assert!(session.fire(), "gun should be ready");
    step_until(session, |s| s.projectiles().is_empty());
}

/// Fire along an empty direction of level 1 and let the bullet leave the field.
pub fn miss_shot(session: &mut Session) {
    wait_until_ready(session);
    aim_along(session, 0.0);
    assert!(session.fire(), "gun should be ready");
    step_until(session, |s| s.projectiles().is_empty());
}

/// Accept the pending offer and return the ticket of the requested ad.
pub fn accept_offer(session: &mut Session) -> AdTicket {
    session.answer_offer(true);
    session
        .pending_offer()
        .and_then(|offer| offer.ticket)
        .expect("accepting should request an ad")
}

/// Jump straight to `level` with fresh targets.
pub fn jump_to_level(session: &mut Session, level: u32) {
    session.state.level = level;
    session.spawn_level_targets();
    session.apply_weapon_stats();
    session.drain_events();
}
