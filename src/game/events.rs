//! Notifications the session sends to presentation, audio, persistence and
//! the platform adapter.

use bevy::prelude::*;

use super::{
    achievements::AchievementId,
    economy::{AdTicket, RewardKind},
    levels::Target,
    session::EndReason,
    weapons::WeaponId,
};

/// Colour hint for a round message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageTone {
    Neutral,
    Good,
    Bad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Gunshot,
    Break,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicContext {
    Menu,
    Game,
    Stopped,
}

/// Part of the saved profile that changed and needs writing back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressField {
    HighScore,
    Wins,
    UnlockedWeapons,
    SelectedWeapon,
    Achievements,
    PerfectStreak,
    Audio,
    Language,
}

/// How a session ended, for the end screen.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    Over { reason: EndReason, score: u32 },
    Won { final_score: u32, time_bonus: u32 },
}

impl SessionOutcome {
    pub fn score(&self) -> u32 {
        match self {
            SessionOutcome::Over { score, .. } => *score,
            SessionOutcome::Won { final_score, .. } => *final_score,
        }
    }
}

/// Everything the session reports to the outside world, in emission order.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SessionStarted,
    /// Gun angle to draw. May be outside `[0, 360)` while spinning.
    RotationChanged(f32),
    TargetsSpawned(Vec<Target>),
    TargetBroken { index: usize, center: Vec2 },
    ProjectileSpawned { id: u32, position: Vec2 },
    ProjectileMoved { id: u32, position: Vec2 },
    ProjectileRemoved { id: u32 },
    RoundMessage { text: String, tone: MessageTone },
    AmmoChanged { count: u32, max: u32 },
    ComboChanged { multiplier: u32 },
    ScoreAndTimer { score: u32, time_left: u32 },
    PlayEffect(EffectKind),
    Music(MusicContext),
    /// The session is paused waiting for the player to accept or decline.
    OfferReward(RewardKind),
    /// The player accepted; show a rewarded video and report back with the ticket.
    RequestRewardedAd { ticket: AdTicket, kind: RewardKind },
    /// Show an interstitial between games and report back with the ticket.
    RequestInterstitial { ticket: AdTicket },
    ProgressChanged(ProgressField),
    AchievementUnlocked(AchievementId),
    WeaponUnlocked(WeaponId),
    /// A new personal best worth submitting to the leaderboard.
    HighScoreBeaten(u32),
    SessionEnded(SessionOutcome),
}
