//! Rewarded-ad gates: ammo refills, second chances and weapon trials.
//!
//! An offer pauses the game and waits for the player. Accepting hands out an
//! [`AdTicket`]; the platform shows the ad and reports back with that ticket.
//! Outcomes for tickets the session no longer waits on are ignored, so a
//! late or duplicated callback can never touch a game that has moved on.

use bevy::prelude::*;

use super::{
    events::{MusicContext, SessionEvent},
    session::{EndReason, Session, TrialWeapon},
    weapons::WeaponId,
};

/// What a watched ad pays out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RewardKind {
    /// A few extra bullets when the gun runs dry.
    AmmoRefill,
    /// Survive a penalty bottle.
    SecondChance,
    /// Play one game with a locked weapon.
    WeaponTrial(WeaponId),
}

impl RewardKind {
    /// How the game ends if this reward is not granted.
    pub fn gating_reason(self) -> Option<EndReason> {
        match self {
            RewardKind::AmmoRefill => Some(EndReason::NoAmmo),
            RewardKind::SecondChance => Some(EndReason::PenaltyHit),
            RewardKind::WeaponTrial(_) => None,
        }
    }

    pub fn prompt(self) -> String {
        match self {
            RewardKind::AmmoRefill => "Out of ammo! Watch an ad for 3 more bullets?".into(),
            RewardKind::SecondChance => "Wrong bottle! Watch an ad to keep playing?".into(),
            RewardKind::WeaponTrial(weapon) => {
                format!("Watch an ad to try the {} for one game?", weapon.weapon().name)
            }
        }
    }
}

/// Identifies one rewarded-ad request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AdTicket(pub u64);

/// An offer shown to the player, and the ad request if they accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingOffer {
    pub kind: RewardKind,
    pub ticket: Option<AdTicket>,
}

/// How a rewarded video went.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RewardedOutcome {
    pub rewarded: bool,
    pub was_shown: bool,
    pub error: Option<String>,
}

impl RewardedOutcome {
    /// No ad could be shown, e.g. the SDK is missing.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn granted() -> Self {
        Self {
            rewarded: true,
            was_shown: true,
            error: None,
        }
    }

    /// Shown but closed before the reward.
    pub fn closed() -> Self {
        Self {
            rewarded: false,
            was_shown: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            rewarded: false,
            was_shown: false,
            error: Some(error.into()),
        }
    }

    pub fn reward_granted(&self) -> bool {
        self.rewarded && self.error.is_none()
    }
}

impl Session {
    /// Pause the game and ask the player whether to watch an ad for `kind`.
    pub(crate) fn offer_reward(&mut self, kind: RewardKind) {
        self.pause_for_ad();
        self.offer = Some(PendingOffer { kind, ticket: None });
        info!("Offering rewarded ad for {:?}", kind);
        self.emit(SessionEvent::OfferReward(kind));
    }

    /// Stop the clock and every frame loop while an offer or ad is up.
    pub(crate) fn pause_for_ad(&mut self) {
        self.stop_timer();
        self.state.rotating = false;
        self.state.can_fire = false;
        self.state.spinning = false;
        self.loops.cancel_animation();
        self.loops.cooldown = None;
        self.emit(SessionEvent::RotationChanged(self.state.rotation));
    }

    /// A ticket no earlier ad request has used.
    pub(crate) fn issue_ticket(&mut self) -> AdTicket {
        let ticket = AdTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    /// The player's answer to the pending offer.
    pub fn answer_offer(&mut self, accepted: bool) {
        let Some(offer) = self.offer else {
            debug!("No reward offer to answer");
            return;
        };
        if offer.ticket.is_some() {
            debug!("Offer already accepted, waiting for the ad");
            return;
        }

        if accepted {
            let ticket = self.issue_ticket();
            self.offer = Some(PendingOffer {
                kind: offer.kind,
                ticket: Some(ticket),
            });
            info!("Reward offer {:?} accepted, requesting ad {:?}", offer.kind, ticket);
            self.emit(SessionEvent::Music(MusicContext::Stopped));
            self.emit(SessionEvent::RequestRewardedAd {
                ticket,
                kind: offer.kind,
            });
            return;
        }

        self.offer = None;
        info!("Reward offer {:?} declined", offer.kind);
        if let Some(reason) = offer.kind.gating_reason() {
            self.game_over(reason);
        }
    }

    /// Apply the result of the rewarded ad requested with `ticket`.
    pub fn complete_ad(&mut self, ticket: AdTicket, outcome: RewardedOutcome) {
        let Some(offer) = self.offer.filter(|offer| offer.ticket == Some(ticket)) else {
            debug!("Ignoring outcome for stale ad {:?}", ticket);
            return;
        };
        self.offer = None;

        if let Some(error) = &outcome.error {
            warn!("Rewarded ad {:?} failed: {}", ticket, error);
        }
        let granted = outcome.reward_granted();
        info!(
            "Ad {:?} for {:?} finished: shown {}, rewarded {}",
            ticket, offer.kind, outcome.was_shown, granted
        );

        if let RewardKind::WeaponTrial(weapon) = offer.kind {
            self.emit(SessionEvent::Music(MusicContext::Menu));
            if granted {
                self.apply_reward(offer.kind);
                self.start_trial(weapon);
            }
            return;
        }

        self.emit(SessionEvent::Music(MusicContext::Game));
        if granted {
            self.apply_reward(offer.kind);
        }
        match offer.kind.gating_reason() {
            Some(reason) if !granted && self.gate_holds(offer.kind) => self.game_over(reason),
            _ => self.resume_game_after_ad(granted),
        }
    }

    /// Pay out a reward. Paying twice has no further effect.
    pub(crate) fn apply_reward(&mut self, kind: RewardKind) {
        match kind {
            RewardKind::AmmoRefill => {
                if self.state.used_ammo_reward {
                    return;
                }
                self.state.used_ammo_reward = true;
                let max = self.active_weapon().max_ammo;
                self.state.ammo = (self.state.ammo + self.tunables.ammo_reward).min(max);
                self.emit(SessionEvent::AmmoChanged {
                    count: self.state.ammo,
                    max,
                });
            }
            RewardKind::SecondChance => {
                self.state.used_penalty_reward = true;
            }
            RewardKind::WeaponTrial(weapon) => {
                self.state.trial = Some(TrialWeapon {
                    weapon,
                    active: true,
                });
            }
        }
    }

    fn gate_holds(&self, kind: RewardKind) -> bool {
        match kind {
            RewardKind::AmmoRefill => self.state.ammo == 0 && self.has_unhit_neutrals(),
            RewardKind::SecondChance => true,
            RewardKind::WeaponTrial(_) => false,
        }
    }

    /// Pick the game back up from whatever the session looks like now.
    pub(crate) fn resume_game_after_ad(&mut self, reward_granted: bool) {
        if self.state.status.is_terminal() {
            return;
        }

        let targets_left = self.has_unhit_neutrals();
        let shots_left = self.state.ammo > 0 || !self.projectiles.is_empty();

        if targets_left && shots_left {
            self.state.rotating = true;
            self.state.can_fire = self.state.ammo > 0;
            self.start_timer();
            self.ensure_rotation_loop();
            debug!("Game resumed after ad (reward granted: {})", reward_granted);
        } else if targets_left {
            if reward_granted {
                self.check_out_of_ammo();
            } else {
                self.game_over(EndReason::NoAmmo);
            }
        } else {
            self.check_level_complete();
        }
    }
}
