//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime and the task pools.
//! - we then call `spin_shot::configure_headless` to install the game core,
//!   persistence and the platform adapter.
//! - every frame advances the clock by exactly [`FRAME`].

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use bevy::{prelude::*, time::TimeUpdateStrategy};
use spin_shot::{
    game::{Session, economy::RewardedOutcome},
    persistence::ProgressStore,
    platform::{
        AdProvider, InterstitialOutcome, Leaderboard, Platform, PlatformError, PlatformFuture,
    },
};

pub const FRAME: Duration = Duration::from_millis(16);

/// Frames to wait for anything before giving up.
pub const WAIT_LIMIT: usize = 2_000;

pub fn app_headless(store: ProgressStore, platform: Platform) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    // Inserted first so the plugins keep them instead of the defaults.
    app.insert_resource(store);
    app.insert_resource(platform);

    spin_shot::configure_headless(&mut app);
    app
}

pub fn offline_app() -> App {
    app_headless(ProgressStore::in_memory(), Platform::offline())
}

pub fn session(app: &App) -> &Session {
    app.world().resource::<Session>()
}

pub fn session_mut(app: &mut App) -> Mut<'_, Session> {
    app.world_mut().resource_mut::<Session>()
}

/// Run frames until `done` holds. Platform calls finish on other threads, so
/// give them a moment between frames.
pub fn update_until(app: &mut App, mut done: impl FnMut(&Session) -> bool) {
    for _ in 0..WAIT_LIMIT {
        if done(session(app)) {
            return;
        }
        app.update();
        std::thread::sleep(Duration::from_micros(200));
    }
    panic!("condition not reached within {WAIT_LIMIT} frames");
}

/// Angle in degrees the barrel points at, measured like target placement.
pub fn barrel_angle(session: &Session) -> f32 {
    (session.state().rotation - 90.0).rem_euclid(360.0)
}

fn placement_angle(session: &Session, index: usize) -> f32 {
    let offset = session.targets()[index].center() - session.tunables().field_center();
    offset.y.atan2(offset.x).to_degrees().rem_euclid(360.0)
}

fn angle_between(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

fn ready(session: &Session) -> bool {
    session.state().can_fire && !session.state().spinning
}

/// Wait for the gun to line up with target `index`, fire, and let the bullet land.
pub fn fire_at_target(app: &mut App, index: usize) {
    update_until(app, |s| {
        ready(s) && angle_between(barrel_angle(s), placement_angle(s, index)) < 1.0
    });
    assert!(session_mut(app).fire(), "gun should be ready");
    update_until(app, |s| s.projectiles().is_empty());
}

/// Wait for the gun to point well clear of every bottle, fire, and let the
/// bullet leave the field.
pub fn fire_into_gap(app: &mut App) {
    update_until(app, |s| {
        ready(s)
            && (0..s.targets().len())
                .all(|i| angle_between(barrel_angle(s), placement_angle(s, i)) > 20.0)
    });
    assert!(session_mut(app).fire(), "gun should be ready");
    update_until(app, |s| s.projectiles().is_empty());
}

/// Ads that play out a fixed script, then report the platform as unavailable.
#[derive(Clone, Default)]
pub struct ScriptedAds {
    rewarded: Arc<Mutex<VecDeque<Result<RewardedOutcome, PlatformError>>>>,
    rewarded_calls: Arc<AtomicUsize>,
    interstitial_calls: Arc<AtomicUsize>,
}

impl ScriptedAds {
    pub fn with_rewarded(outcomes: impl IntoIterator<Item = Result<RewardedOutcome, PlatformError>>) -> Self {
        let ads = Self::default();
        if let Ok(mut script) = ads.rewarded.lock() {
            script.extend(outcomes);
        }
        ads
    }

    pub fn rewarded_calls(&self) -> usize {
        self.rewarded_calls.load(Ordering::SeqCst)
    }

    pub fn interstitial_calls(&self) -> usize {
        self.interstitial_calls.load(Ordering::SeqCst)
    }
}

impl AdProvider for ScriptedAds {
    fn show_rewarded(&self) -> PlatformFuture<Result<RewardedOutcome, PlatformError>> {
        self.rewarded_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .rewarded
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(Err(PlatformError::Unavailable));
        Box::pin(std::future::ready(next))
    }

    fn show_interstitial(&self) -> PlatformFuture<Result<InterstitialOutcome, PlatformError>> {
        self.interstitial_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(std::future::ready(Ok(InterstitialOutcome { was_shown: true })))
    }
}

/// Keeps every submitted score.
#[derive(Clone, Default)]
pub struct RecordingLeaderboard {
    scores: Arc<Mutex<Vec<u32>>>,
}

impl RecordingLeaderboard {
    pub fn scores(&self) -> Vec<u32> {
        self.scores.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Leaderboard for RecordingLeaderboard {
    fn submit_score(&self, score: u32) -> PlatformFuture<Result<(), PlatformError>> {
        if let Ok(mut scores) = self.scores.lock() {
            scores.push(score);
        }
        Box::pin(std::future::ready(Ok(())))
    }
}
