//! The ad and leaderboard platform the game is published on.
//!
//! Calls are asynchronous and run on Bevy's IO task pool. Whatever happens
//! on the platform side (no SDK, no ad to show, a failing call) comes back
//! to the session as an ordinary outcome, never as a panic.

use std::{future::Future, pin::Pin, sync::Arc};

use bevy::{
    prelude::*,
    tasks::{IoTaskPool, Task, block_on, futures_lite::future},
};
use thiserror::Error;

use crate::{
    AppSystems,
    game::{
        Session, SessionEvent,
        economy::{AdTicket, RewardedOutcome},
    },
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Platform>();
    app.init_resource::<PendingCalls>();

    app.add_systems(Update, collect_ad_outcomes.in_set(AppSystems::RecordInput));
    app.add_systems(
        Update,
        (dispatch_platform_calls, reap_background_calls).in_set(AppSystems::Update),
    );
}

pub type PlatformFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("platform SDK is not available")]
    Unavailable,
    #[error("platform call failed: {0}")]
    Failed(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterstitialOutcome {
    pub was_shown: bool,
}

/// Shows video ads.
pub trait AdProvider: Send + Sync + 'static {
    fn show_rewarded(&self) -> PlatformFuture<Result<RewardedOutcome, PlatformError>>;

    fn show_interstitial(&self) -> PlatformFuture<Result<InterstitialOutcome, PlatformError>>;
}

/// Records high scores on a shared leaderboard.
pub trait Leaderboard: Send + Sync + 'static {
    fn submit_score(&self, score: u32) -> PlatformFuture<Result<(), PlatformError>>;
}

/// No SDK at all: every call reports the platform as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflinePlatform;

impl AdProvider for OfflinePlatform {
    fn show_rewarded(&self) -> PlatformFuture<Result<RewardedOutcome, PlatformError>> {
        Box::pin(std::future::ready(Err(PlatformError::Unavailable)))
    }

    fn show_interstitial(&self) -> PlatformFuture<Result<InterstitialOutcome, PlatformError>> {
        Box::pin(std::future::ready(Err(PlatformError::Unavailable)))
    }
}

impl Leaderboard for OfflinePlatform {
    fn submit_score(&self, _score: u32) -> PlatformFuture<Result<(), PlatformError>> {
        Box::pin(std::future::ready(Err(PlatformError::Unavailable)))
    }
}

#[derive(Resource, Clone)]
pub struct Platform {
    pub ads: Arc<dyn AdProvider>,
    pub leaderboard: Arc<dyn Leaderboard>,
}

impl Default for Platform {
    fn default() -> Self {
        Self::offline()
    }
}

impl Platform {
    pub fn new(ads: impl AdProvider, leaderboard: impl Leaderboard) -> Self {
        Self {
            ads: Arc::new(ads),
            leaderboard: Arc::new(leaderboard),
        }
    }

    pub fn offline() -> Self {
        Self::new(OfflinePlatform, OfflinePlatform)
    }
}

/// Resolve a platform result into what the session understands. An
/// unavailable platform is simply an ad that was not shown.
pub fn rewarded_outcome(result: Result<RewardedOutcome, PlatformError>) -> RewardedOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(PlatformError::Unavailable) => RewardedOutcome::unavailable(),
        Err(e) => RewardedOutcome::failed(e.to_string()),
    }
}

/// Platform calls still in flight.
#[derive(Resource, Default)]
pub struct PendingCalls {
    rewarded: Vec<(AdTicket, Task<RewardedOutcome>)>,
    interstitials: Vec<(AdTicket, Task<()>)>,
    background: Vec<Task<()>>,
}

impl PendingCalls {
    pub fn is_empty(&self) -> bool {
        self.rewarded.is_empty() && self.interstitials.is_empty() && self.background.is_empty()
    }
}

fn dispatch_platform_calls(
    mut events: MessageReader<SessionEvent>,
    platform: Res<Platform>,
    mut pending: ResMut<PendingCalls>,
) {
    let pool = IoTaskPool::get();
    for event in events.read() {
        match event {
            SessionEvent::RequestRewardedAd { ticket, kind } => {
                debug!("Showing rewarded ad {:?} for {:?}", ticket, kind);
                let call = platform.ads.show_rewarded();
                let task = pool.spawn(async move { rewarded_outcome(call.await) });
                pending.rewarded.push((*ticket, task));
            }
            SessionEvent::RequestInterstitial { ticket } => {
                let call = platform.ads.show_interstitial();
                let task = pool.spawn(async move {
                    match call.await {
                        Ok(outcome) => debug!("Interstitial closed, shown: {}", outcome.was_shown),
                        Err(PlatformError::Unavailable) => debug!("Interstitial skipped: no platform"),
                        Err(e) => warn!("Interstitial failed: {}", e),
                    }
                });
                pending.interstitials.push((*ticket, task));
            }
            SessionEvent::HighScoreBeaten(score) => {
                let score = *score;
                let call = platform.leaderboard.submit_score(score);
                pending.background.push(pool.spawn(async move {
                    match call.await {
                        Ok(()) => info!("Submitted score {} to the leaderboard", score),
                        Err(PlatformError::Unavailable) => {
                            debug!("Leaderboard unavailable, score {} kept locally", score)
                        }
                        Err(e) => warn!("Failed to submit score {}: {}", score, e),
                    }
                }));
            }
            _ => {}
        }
    }
}

/// Hand finished ads back to the session. An interstitial that failed or
/// never showed is as finished as one the player closed.
fn collect_ad_outcomes(mut pending: ResMut<PendingCalls>, mut session: ResMut<Session>) {
    let pending = &mut *pending;
    pending.rewarded.retain_mut(|(ticket, task)| {
        match block_on(future::poll_once(task)) {
            Some(outcome) => {
                session.complete_ad(*ticket, outcome);
                false
            }
            None => true,
        }
    });
    pending.interstitials.retain_mut(|(ticket, task)| {
        match block_on(future::poll_once(task)) {
            Some(()) => {
                session.complete_interstitial(*ticket);
                false
            }
            None => true,
        }
    });
}

fn reap_background_calls(mut pending: ResMut<PendingCalls>) {
    pending
        .background
        .retain_mut(|task| block_on(future::poll_once(task)).is_none());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_platform_means_not_shown() {
        let outcome = rewarded_outcome(Err(PlatformError::Unavailable));
        assert!(!outcome.was_shown);
        assert!(!outcome.reward_granted());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn failed_call_is_reported_as_an_error() {
        let outcome = rewarded_outcome(Err(PlatformError::Failed("timeout".into())));
        assert!(!outcome.reward_granted());
        assert_eq!(outcome.error.as_deref(), Some("platform call failed: timeout"));
    }

    #[test]
    fn offline_platform_reports_unavailable() {
        let result = block_on(OfflinePlatform.show_rewarded());
        assert_eq!(result, Err(PlatformError::Unavailable));
    }
}
