//! Rules of the game and tunable session parameters.
//!
//! Play-field coordinates follow the web screen layout: origin at the
//! top-left corner, x grows right, y grows down. Angles are in degrees and
//! grow clockwise. Target placement angles start at the positive x axis; the
//! gun's rotation starts straight up, so a shot fired at rotation `r` travels
//! along placement angle `r - 90`.

use std::time::Duration;

use bevy::prelude::*;

/// Number of rounds in a full game.
pub const MAX_LEVEL: u32 = 10;

/// Seconds on the clock at the start of a game.
pub const TIME_LIMIT_SECONDS: u32 = 120;

/// Bonus points per second left on the clock when the game is won.
pub const POINTS_PER_SECOND: u32 = 100;

/// Highest combo multiplier a streak of hits can reach.
pub const MAX_COMBO_MULTIPLIER: u32 = 5;

/// Bullets granted by a watched ammo-refill ad.
pub const AMMO_REWARD: u32 = 3;

/// Final score that unlocks the "Point Hoarder" achievement.
pub const SCORE_ACHIEVEMENT_THRESHOLD: u32 = 10_000;

/// Final score that unlocks the hidden "broke the game" achievement.
pub const HIDDEN_SCORE_THRESHOLD: u32 = 30_000;

/// A win faster than this (clock time used, bonus excluded) is a fast clear.
pub const FAST_CLEAR_SECONDS: u32 = 60;

/// Consecutive flawless wins needed for the "Perfectionist" achievement.
pub const PERFECT_STREAK_MILESTONE: u32 = 10;

/// Points for a single neutral hit before the combo multiplier.
pub fn base_points_for_level(level: u32) -> u32 {
    level * 5 + 5
}

/// Combo multiplier for a run of consecutive hits.
pub fn combo_multiplier(combo: u32) -> u32 {
    (combo / 2 + 1).min(MAX_COMBO_MULTIPLIER)
}

/// `mm:ss` clock text.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Tunable gameplay parameters.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Tunables {
    /// Size of the play field in field units.
    pub field_size: Vec2,
    /// Distance from the gun to the centre of every target.
    pub placement_radius: f32,
    /// Rendered size of a target.
    pub target_size: Vec2,
    /// Inset applied to each side of a target's box when hit testing.
    pub hitbox_padding: f32,
    /// Width and height of a projectile.
    pub projectile_size: f32,
    /// Projectile travel per display frame, not per second. Flight time
    /// therefore follows the frame rate.
    pub projectile_speed: f32,
    pub fire_cooldown: Duration,
    pub spin_duration: Duration,
    /// Pause between clearing a round and the next round starting.
    pub level_transition_delay: Duration,
    /// Pause between clearing the last round and the victory screen.
    pub victory_delay: Duration,
    pub time_limit_seconds: u32,
    pub max_level: u32,
    pub points_per_second: u32,
    pub ammo_reward: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            field_size: Vec2::new(900.0, 1273.0),
            placement_radius: 375.0,
            target_size: Vec2::new(45.0, 90.0),
            hitbox_padding: 5.0,
            projectile_size: 12.0,
            projectile_speed: 12.0,
            fire_cooldown: Duration::from_millis(500),
            spin_duration: Duration::from_millis(300),
            level_transition_delay: Duration::from_millis(1500),
            victory_delay: Duration::from_millis(500),
            time_limit_seconds: TIME_LIMIT_SECONDS,
            max_level: MAX_LEVEL,
            points_per_second: POINTS_PER_SECOND,
            ammo_reward: AMMO_REWARD,
        }
    }
}

impl Tunables {
    /// Where the gun sits and every projectile starts.
    pub fn field_center(&self) -> Vec2 {
        self.field_size / 2.0
    }
}
