//! Achievement catalog and unlocking.

use bevy::prelude::*;

use super::{
    events::{ProgressField, SessionEvent},
    session::Session,
    weapons::WeaponId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum AchievementId {
    GameCompleted,
    UnlockWeapon2,
    UnlockWeapon3,
    FlawlessVictory,
    FastClear,
    ComboMaster,
    Glock17Ace,
    FirstPenaltyHit,
    Level5Clear,
    Ump45Dominator,
    PointHoarder,
    TenPerfectGames,
    AchievementMaster,
    /// Hidden: a final score nobody is expected to reach.
    ScoreBreaker,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    /// Key used in save data.
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub hidden: bool,
}

const fn achievement(
    id: AchievementId,
    key: &'static str,
    name: &'static str,
    description: &'static str,
) -> Achievement {
    Achievement {
        id,
        key,
        name,
        description,
        hidden: false,
    }
}

pub const ACHIEVEMENTS: [Achievement; 14] = [
    achievement(
        AchievementId::GameCompleted,
        "game_completed",
        "Game Clear!",
        "Successfully complete all levels.",
    ),
    achievement(
        AchievementId::UnlockWeapon2,
        "unlock_weapon_2",
        "New Firepower",
        "Unlock the second weapon.",
    ),
    achievement(
        AchievementId::UnlockWeapon3,
        "unlock_weapon_3",
        "Fully Armed",
        "Unlock the third weapon.",
    ),
    achievement(
        AchievementId::FlawlessVictory,
        "perfect_game_no_miss",
        "Flawless Victory",
        "Complete all levels without missing a single shot.",
    ),
    achievement(
        AchievementId::FastClear,
        "fast_clear_1_min",
        "Speed Runner",
        "Complete all levels in under 1 minute (excluding time bonus).",
    ),
    achievement(
        AchievementId::ComboMaster,
        "combo_master_x5",
        "Combo Master",
        "Achieve a x5 combo multiplier.",
    ),
    achievement(
        AchievementId::Glock17Ace,
        "perfect_game_weapon_2",
        "Glock17 Ace",
        "Complete all levels with the Glock17 without missing a shot.",
    ),
    achievement(
        AchievementId::FirstPenaltyHit,
        "first_red_bottle",
        "Oops!",
        "Hit a red bottle for the first time.",
    ),
    achievement(
        AchievementId::Level5Clear,
        "level_5_clear",
        "Halfway There",
        "Complete level 5.",
    ),
    achievement(
        AchievementId::Ump45Dominator,
        "perfect_game_weapon_3",
        "UMP45 Dominator",
        "Complete all levels with the UMP45 without missing a shot.",
    ),
    achievement(
        AchievementId::PointHoarder,
        "score_10000_points",
        "Point Hoarder",
        "Achieve a score of 10,000 points in a single game.",
    ),
    achievement(
        AchievementId::TenPerfectGames,
        "ten_perfect_games",
        "Perfectionist x10",
        "Complete the game 10 times flawlessly (no misses).",
    ),
    achievement(
        AchievementId::AchievementMaster,
        "achievement_master",
        "Achievement Master",
        "Unlock all other achievements.",
    ),
    Achievement {
        id: AchievementId::ScoreBreaker,
        key: "game_over_score_30k",
        name: "Game Over!",
        description: "Reach a score of 30,000 points. You broke the game!",
        hidden: true,
    },
];

impl AchievementId {
    pub fn info(self) -> &'static Achievement {
        // Catalog order matches declaration order.
        &ACHIEVEMENTS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ACHIEVEMENTS
            .iter()
            .find(|achievement| achievement.key == key)
            .map(|achievement| achievement.id)
    }
}

impl Session {
    /// Unlock an achievement. Returns `false` if it was already unlocked.
    pub(crate) fn unlock_achievement(&mut self, id: AchievementId) -> bool {
        if !self.profile.unlocked_achievements.insert(id) {
            return false;
        }

        info!("Achievement unlocked: {}", id.info().name);
        self.emit(SessionEvent::ProgressChanged(ProgressField::Achievements));
        self.emit(SessionEvent::AchievementUnlocked(id));

        if id != AchievementId::AchievementMaster {
            self.check_master();
        }
        true
    }

    /// Grant the master achievement, and with it the AWM, once every other
    /// visible achievement is unlocked.
    pub(crate) fn check_master(&mut self) {
        if self.profile.has_achievement(AchievementId::AchievementMaster) {
            return;
        }
        let all_others = ACHIEVEMENTS
            .iter()
            .filter(|a| a.id != AchievementId::AchievementMaster && !a.hidden)
            .all(|a| self.profile.has_achievement(a.id));
        if !all_others {
            return;
        }

        if self.unlock_achievement(AchievementId::AchievementMaster)
            && self.profile.unlocked_weapons.insert(WeaponId::Awm)
        {
            info!("AWM unlocked for mastering every achievement");
            self.emit(SessionEvent::ProgressChanged(ProgressField::UnlockedWeapons));
            self.emit(SessionEvent::WeaponUnlocked(WeaponId::Awm));
        }
    }
}
