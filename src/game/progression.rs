//! Round clearing, level changes, the countdown and the two ways a game ends.

use std::time::Duration;

use bevy::prelude::*;

use super::{
    achievements::AchievementId,
    config::{FAST_CLEAR_SECONDS, HIDDEN_SCORE_THRESHOLD, PERFECT_STREAK_MILESTONE, SCORE_ACHIEVEMENT_THRESHOLD},
    events::{MessageTone, MusicContext, ProgressField, SessionEvent, SessionOutcome},
    schedule::TransitionKind,
    session::{EndReason, Session, SessionStatus},
    weapons::WeaponId,
};

impl Session {
    /// Start the clearing transition once every green bottle is broken.
    pub(crate) fn check_level_complete(&mut self) {
        if self.state.status.is_terminal() || self.loops.transition.is_some() {
            return;
        }

        let cleared =
            self.neutral_targets().next().is_some() && self.neutral_targets().all(|t| t.hit);
        if !cleared {
            return;
        }

        // No shot may land on a cleared round.
        self.state.can_fire = false;
        self.state.rotating = false;
        self.state.spinning = false;
        self.loops.cancel_animation();
        self.loops.cooldown = None;
        self.clear_projectiles();

        let level = self.state.level;
        info!("Level {} cleared with {} points", level, self.state.score);
        if level == 5 {
            self.unlock_achievement(AchievementId::Level5Clear);
        }

        if level >= self.tunables.max_level {
            // The bonus is counted from the clock as it stood at the clear.
            self.stop_timer();
            self.loops
                .start_transition(TransitionKind::Victory, self.tunables.victory_delay);
            self.emit(SessionEvent::RoundMessage {
                text: "All bottles down!".into(),
                tone: MessageTone::Good,
            });
        } else {
            self.loops.start_transition(
                TransitionKind::NextLevel,
                self.tunables.level_transition_delay,
            );
            self.emit(SessionEvent::RoundMessage {
                text: format!("Level {} starting...", level + 1),
                tone: MessageTone::Good,
            });
        }
    }

    pub(crate) fn tick_transition(&mut self, dt: Duration) {
        let Some(transition) = self.loops.transition.as_mut() else {
            return;
        };
        transition.timer.tick(dt);
        if !transition.timer.just_finished() {
            return;
        }

        let kind = transition.kind;
        self.loops.transition = None;
        // The game may have ended while the delay ran.
        if self.state.status.is_terminal() {
            return;
        }

        match kind {
            TransitionKind::NextLevel => self.start_next_level(),
            TransitionKind::Victory => self.game_won(),
        }
    }

    fn start_next_level(&mut self) {
        self.state.level += 1;
        info!("Level {} started", self.state.level);

        self.emit(SessionEvent::RoundMessage {
            text: "SpinShot Fury".into(),
            tone: MessageTone::Neutral,
        });
        self.apply_weapon_stats();
        self.emit_score_and_timer();
        self.spawn_level_targets();
        self.state.can_fire = true;
        self.state.rotating = true;
        self.ensure_rotation_loop();
    }

    /// Restart the one-second countdown. Unlike the web game, resuming after
    /// an ad keeps the time left instead of resetting it to the full limit.
    pub(crate) fn start_timer(&mut self) {
        self.loops.start_countdown();
        self.emit_score_and_timer();
    }

    pub(crate) fn stop_timer(&mut self) {
        self.loops.countdown = None;
    }

    pub(crate) fn tick_countdown(&mut self, dt: Duration) {
        if self.loops.countdown.is_none() {
            return;
        }
        if self.state.menu_active || self.state.status.is_terminal() {
            self.stop_timer();
            return;
        }

        let seconds = match self.loops.countdown.as_mut() {
            Some(countdown) => {
                countdown.tick(dt);
                countdown.times_finished_this_tick()
            }
            None => 0,
        };

        for _ in 0..seconds {
            self.state.time_left = self.state.time_left.saturating_sub(1);
            self.emit_score_and_timer();
            if self.state.time_left == 0 {
                self.game_over(EndReason::Timeout);
                return;
            }
        }
    }

    /// End the game. Does nothing if it already ended.
    pub(crate) fn game_over(&mut self, reason: EndReason) {
        if self.state.status.is_terminal() {
            return;
        }
        self.state.status = SessionStatus::Over(reason);
        self.break_streak_after_miss();

        self.halt();
        let score = self.state.score;
        self.record_high_score(score);
        self.state.trial = None;

        info!("Game over ({:?}) at level {} with {} points", reason, self.state.level, score);
        self.emit(SessionEvent::Music(MusicContext::Stopped));
        self.emit(SessionEvent::SessionEnded(SessionOutcome::Over { reason, score }));
    }

    /// Finish a won game: bonus, wins, achievements. Does nothing if the game
    /// already ended.
    pub(crate) fn game_won(&mut self) {
        if self.state.status.is_terminal() {
            return;
        }
        self.state.status = SessionStatus::Won;
        self.halt();

        let weapon = self.active_weapon();
        *self.profile.wins_per_weapon.entry(weapon.id).or_default() += 1;
        self.emit(SessionEvent::ProgressChanged(ProgressField::Wins));

        let time_left = self.state.time_left;
        let time_bonus = time_left * self.tunables.points_per_second;
        let final_score = weapon.apply_score_multiplier(self.state.score + time_bonus);
        self.record_high_score(final_score);

        self.unlock_achievement(AchievementId::GameCompleted);
        if self.tunables.time_limit_seconds.saturating_sub(time_left) < FAST_CLEAR_SECONDS {
            self.unlock_achievement(AchievementId::FastClear);
        }
        if final_score >= HIDDEN_SCORE_THRESHOLD {
            self.unlock_achievement(AchievementId::ScoreBreaker);
        }
        if final_score >= SCORE_ACHIEVEMENT_THRESHOLD {
            self.unlock_achievement(AchievementId::PointHoarder);
        }

        if !self.state.missed_shot {
            self.unlock_achievement(AchievementId::FlawlessVictory);
            match weapon.id {
                WeaponId::Glock17 => {
                    self.unlock_achievement(AchievementId::Glock17Ace);
                }
                WeaponId::Ump45 => {
                    self.unlock_achievement(AchievementId::Ump45Dominator);
                }
                _ => {}
            }

            self.profile.perfect_streak += 1;
            self.emit(SessionEvent::ProgressChanged(ProgressField::PerfectStreak));
            if self.profile.perfect_streak >= PERFECT_STREAK_MILESTONE {
                self.unlock_achievement(AchievementId::TenPerfectGames);
            }
        } else if self.profile.perfect_streak > 0 {
            self.profile.perfect_streak = 0;
            self.emit(SessionEvent::ProgressChanged(ProgressField::PerfectStreak));
        }

        self.check_master();
        self.state.trial = None;

        info!(
            "Game won with {}: {} points ({} time bonus)",
            weapon.name, final_score, time_bonus
        );
        self.emit(SessionEvent::Music(MusicContext::Stopped));
        self.emit(SessionEvent::SessionEnded(SessionOutcome::Won {
            final_score,
            time_bonus,
        }));
    }

    /// A game with a miss in it ends any perfect streak.
    pub(crate) fn break_streak_after_miss(&mut self) {
        if self.state.missed_shot && self.profile.perfect_streak > 0 {
            info!("Perfect streak of {} broken", self.profile.perfect_streak);
            self.profile.perfect_streak = 0;
            self.emit(SessionEvent::ProgressChanged(ProgressField::PerfectStreak));
        }
    }

    fn record_high_score(&mut self, score: u32) {
        if score <= self.profile.high_score {
            return;
        }
        info!("New high score: {} (was {})", score, self.profile.high_score);
        self.profile.high_score = score;
        self.emit(SessionEvent::ProgressChanged(ProgressField::HighScore));
        self.emit(SessionEvent::HighScoreBeaten(score));
    }
}
