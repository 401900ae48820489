//! Weapon catalog - the guns the player can carry into a session.
//!
//! Weapons are unlocked by winning games with the previous weapon in the
//! chain. The AWM is never unlocked by wins; it is the reward for the
//! master achievement.

use bevy::prelude::*;

/// Identifier of a catalog weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum WeaponId {
    Revolver,
    Glock17,
    Ump45,
    Awm,
}

impl WeaponId {
    /// Every weapon in armory order.
    pub const ALL: [WeaponId; 4] = [
        WeaponId::Revolver,
        WeaponId::Glock17,
        WeaponId::Ump45,
        WeaponId::Awm,
    ];

    /// Key used for this weapon in save data.
    pub fn key(self) -> &'static str {
        match self {
            WeaponId::Revolver => "revolver",
            WeaponId::Glock17 => "glock17",
            WeaponId::Ump45 => "UMP45",
            WeaponId::Awm => "awm",
        }
    }

    /// Parse a save-data key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    /// Catalog entry for this weapon.
    pub fn weapon(self) -> &'static Weapon {
        match self {
            WeaponId::Revolver => &WEAPONS[0],
            WeaponId::Glock17 => &WEAPONS[1],
            WeaponId::Ump45 => &WEAPONS[2],
            WeaponId::Awm => &WEAPONS[3],
        }
    }
}

impl Default for WeaponId {
    fn default() -> Self {
        WEAPONS[0].id
    }
}

/// Wins needed with another weapon before this one can be unlocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnlockRequirement {
    pub required: WeaponId,
    pub wins_needed: u32,
}

/// A catalog weapon. Immutable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weapon {
    pub id: WeaponId,
    pub name: &'static str,
    pub description: &'static str,
    /// Idle rotation speed of the gun in degrees per frame.
    pub rotation_speed: f32,
    pub max_ammo: u32,
    pub unlock: Option<UnlockRequirement>,
    /// Applied to the final score of a won game.
    pub score_multiplier: Option<f32>,
}

/// The weapon catalog. The first entry is the default weapon.
pub const WEAPONS: [Weapon; 4] = [
    Weapon {
        id: WeaponId::Revolver,
        name: "Revolver",
        description: "Balanced and reliable.",
        rotation_speed: 1.2,
        max_ammo: 8,
        unlock: None,
        score_multiplier: None,
    },
    Weapon {
        id: WeaponId::Glock17,
        name: "Glock 17",
        description: "Spins fast, shoots fast!",
        rotation_speed: 1.75,
        max_ammo: 10,
        unlock: Some(UnlockRequirement {
            required: WeaponId::Revolver,
            wins_needed: 10,
        }),
        score_multiplier: None,
    },
    Weapon {
        id: WeaponId::Ump45,
        name: "UMP45",
        description: "Slow but packs more ammo.",
        rotation_speed: 0.7,
        max_ammo: 12,
        unlock: Some(UnlockRequirement {
            required: WeaponId::Glock17,
            wins_needed: 10,
        }),
        score_multiplier: None,
    },
    Weapon {
        id: WeaponId::Awm,
        name: "AWM",
        description: "Ultimate precision. Unlocked by mastering all achievements.",
        rotation_speed: 0.5,
        max_ammo: 8,
        unlock: None,
        score_multiplier: Some(2.0),
    },
];

/// The weapon every new profile starts with.
pub fn default_weapon() -> &'static Weapon {
    &WEAPONS[0]
}

/// Look up a weapon by save-data key, falling back to the default weapon.
pub fn weapon_by_key(key: &str) -> &'static Weapon {
    match WeaponId::from_key(key) {
        Some(id) => id.weapon(),
        None => {
            warn!(
                "Weapon \"{}\" not found, using {}",
                key,
                default_weapon().name
            );
            default_weapon()
        }
    }
}

impl Weapon {
    /// Whether this weapon can only be obtained through the master achievement.
    pub fn is_master_reward(&self) -> bool {
        self.unlock.is_none() && self.id != default_weapon().id
    }

    /// Apply this weapon's score multiplier, if any.
    pub fn apply_score_multiplier(&self, score: u32) -> u32 {
        match self.score_multiplier {
            Some(multiplier) => (score as f32 * multiplier).round() as u32,
            None => score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_catalog() {
        for id in WeaponId::ALL {
            assert_eq!(WeaponId::from_key(id.key()), Some(id));
            assert_eq!(id.weapon().id, id);
        }
    }

    #[test]
    fn unknown_key_falls_back_to_default() {
        assert_eq!(WeaponId::from_key("bazooka"), None);
        assert_eq!(weapon_by_key("bazooka").id, WeaponId::Revolver);
        assert_eq!(weapon_by_key("UMP45").id, WeaponId::Ump45);
    }

    #[test]
    fn only_awm_is_a_master_reward() {
        let rewards: Vec<WeaponId> = WEAPONS
            .iter()
            .filter(|w| w.is_master_reward())
            .map(|w| w.id)
            .collect();
        assert_eq!(rewards, vec![WeaponId::Awm]);
    }

    #[test]
    fn multiplier_only_scales_multiplied_weapons() {
        assert_eq!(WeaponId::Revolver.weapon().apply_score_multiplier(3500), 3500);
        assert_eq!(WeaponId::Awm.weapon().apply_score_multiplier(3500), 7000);
    }
}
