//! The armory: unlocking, selecting and trying weapons.

use bevy::prelude::*;

use super::{
    achievements::AchievementId,
    economy::{PendingOffer, RewardKind},
    events::{ProgressField, SessionEvent},
    session::{Session, TrialWeapon},
    weapons::WeaponId,
};

/// What the armory shows for a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponStatus {
    Unlocked { selected: bool },
    /// Lent for the current game by a watched ad.
    Trial,
    /// Enough wins to unlock it now.
    Unlockable,
    Locked {
        required: WeaponId,
        wins: u32,
        wins_needed: u32,
    },
    /// Only the master achievement unlocks it.
    MasterReward,
}

impl Session {
    pub fn weapon_status(&self, id: WeaponId) -> WeaponStatus {
        if self.profile.is_unlocked(id) {
            return WeaponStatus::Unlocked {
                selected: self.profile.selected_weapon == id,
            };
        }
        if self.state.trial == Some(TrialWeapon { weapon: id, active: true }) {
            return WeaponStatus::Trial;
        }
        match id.weapon().unlock {
            Some(requirement) => {
                let wins = self.profile.wins_for(requirement.required);
                if wins >= requirement.wins_needed {
                    WeaponStatus::Unlockable
                } else {
                    WeaponStatus::Locked {
                        required: requirement.required,
                        wins,
                        wins_needed: requirement.wins_needed,
                    }
                }
            }
            None => WeaponStatus::MasterReward,
        }
    }

    /// Permanently unlock a weapon whose win requirement is met.
    pub fn unlock_weapon(&mut self, id: WeaponId) -> bool {
        if self.weapon_status(id) != WeaponStatus::Unlockable {
            return false;
        }

        self.profile.unlocked_weapons.insert(id);
        info!("Weapon unlocked: {}", id.weapon().name);
        self.emit(SessionEvent::ProgressChanged(ProgressField::UnlockedWeapons));
        self.emit(SessionEvent::WeaponUnlocked(id));

        match id {
            WeaponId::Glock17 => {
                self.unlock_achievement(AchievementId::UnlockWeapon2);
            }
            WeaponId::Ump45 => {
                self.unlock_achievement(AchievementId::UnlockWeapon3);
            }
            _ => {}
        }
        true
    }

    /// Make an unlocked weapon the one carried into every game.
    pub fn select_weapon(&mut self, id: WeaponId) -> bool {
        match self.weapon_status(id) {
            WeaponStatus::Unlocked { selected: true } | WeaponStatus::Trial => true,
            WeaponStatus::Unlocked { selected: false } => {
                self.profile.selected_weapon = id;
                info!("Selected weapon: {}", id.weapon().name);
                self.emit(SessionEvent::ProgressChanged(ProgressField::SelectedWeapon));
                if !self.is_playing() {
                    self.apply_weapon_stats();
                }
                true
            }
            _ => false,
        }
    }

    /// Offer one game with a locked weapon in exchange for an ad. Only
    /// possible outside a running game.
    pub fn offer_weapon_trial(&mut self, id: WeaponId) -> bool {
        if self.is_playing() || self.offer.is_some() {
            return false;
        }
        if !matches!(
            self.weapon_status(id),
            WeaponStatus::Locked { .. } | WeaponStatus::Unlockable | WeaponStatus::MasterReward
        ) {
            return false;
        }

        let kind = RewardKind::WeaponTrial(id);
        self.offer = Some(PendingOffer { kind, ticket: None });
        info!("Offering trial of {}", id.weapon().name);
        self.emit(SessionEvent::OfferReward(kind));
        true
    }

    /// Start a game with a trial weapon that was just granted.
    pub(crate) fn start_trial(&mut self, id: WeaponId) {
        info!("Trial granted for {}", id.weapon().name);
        self.state.trial = Some(TrialWeapon {
            weapon: id,
            active: true,
        });
        self.start_game(self.mode);
    }
}
