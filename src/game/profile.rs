//! Player progress that survives between sessions.

use std::collections::{BTreeMap, BTreeSet};

use bevy::prelude::*;

use super::{
    achievements::AchievementId,
    events::{ProgressField, SessionEvent},
    session::Session,
    weapons::WeaponId,
};

/// Audio mixer settings, each volume in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            music_volume: 0.5,
            sfx_volume: 0.5,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Build settings, clamping every volume into `[0, 1]`.
    pub fn new(master_volume: f32, music_volume: f32, sfx_volume: f32, muted: bool) -> Self {
        Self {
            master_volume: clamp_volume(master_volume),
            music_volume: clamp_volume(music_volume),
            sfx_volume: clamp_volume(sfx_volume),
            muted,
        }
    }

    /// Effective music gain.
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Effective sound-effect gain.
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Interface language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum Language {
    #[default]
    En,
    Tr,
    Ru,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
            Language::Ru => "ru",
        }
    }

    /// Parse a language code, falling back to English.
    pub fn from_code(code: &str) -> Self {
        match code {
            "en" => Language::En,
            "tr" => Language::Tr,
            "ru" => Language::Ru,
            other => {
                warn!("Unsupported language: {}. Using 'en'.", other);
                Language::En
            }
        }
    }
}

/// Persistent player progress.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub high_score: u32,
    pub wins_per_weapon: BTreeMap<WeaponId, u32>,
    pub unlocked_weapons: BTreeSet<WeaponId>,
    /// The permanently selected weapon. Always unlocked.
    pub selected_weapon: WeaponId,
    pub unlocked_achievements: BTreeSet<AchievementId>,
    pub perfect_streak: u32,
    pub audio: AudioSettings,
    pub language: Language,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            high_score: 0,
            wins_per_weapon: BTreeMap::new(),
            unlocked_weapons: BTreeSet::from([WeaponId::default()]),
            selected_weapon: WeaponId::default(),
            unlocked_achievements: BTreeSet::new(),
            perfect_streak: 0,
            audio: AudioSettings::default(),
            language: Language::default(),
        }
    }
}

impl Profile {
    pub fn wins_for(&self, weapon: WeaponId) -> u32 {
        self.wins_per_weapon.get(&weapon).copied().unwrap_or(0)
    }

    pub fn is_unlocked(&self, weapon: WeaponId) -> bool {
        self.unlocked_weapons.contains(&weapon)
    }

    pub fn has_achievement(&self, achievement: AchievementId) -> bool {
        self.unlocked_achievements.contains(&achievement)
    }

    /// Restore the invariants a loaded profile must hold: the default weapon
    /// is always unlocked and the selected weapon is one of the unlocked ones.
    pub fn normalized(mut self) -> Self {
        self.unlocked_weapons.insert(WeaponId::default());
        if !self.unlocked_weapons.contains(&self.selected_weapon) {
            warn!(
                "Selected weapon {:?} is not unlocked, using {:?}",
                self.selected_weapon,
                WeaponId::default()
            );
            self.selected_weapon = WeaponId::default();
        }
        self
    }
}

impl Session {
    pub fn set_audio_settings(&mut self, audio: AudioSettings) {
        let audio = AudioSettings::new(
            audio.master_volume,
            audio.music_volume,
            audio.sfx_volume,
            audio.muted,
        );
        if self.profile.audio == audio {
            return;
        }
        self.profile.audio = audio;
        self.emit(SessionEvent::ProgressChanged(ProgressField::Audio));
    }

    pub fn set_language(&mut self, language: Language) {
        if self.profile.language == language {
            return;
        }
        info!("Language set to {}", language.code());
        self.profile.language = language;
        self.emit(SessionEvent::ProgressChanged(ProgressField::Language));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volumes_are_clamped() {
        let audio = AudioSettings::new(1.5, -0.2, f32::NAN, false);
        assert_eq!(audio.master_volume, 1.0);
        assert_eq!(audio.music_volume, 0.0);
        assert_eq!(audio.sfx_volume, 0.0);
    }

    #[test]
    fn muted_audio_has_no_gain() {
        let audio = AudioSettings::new(1.0, 1.0, 1.0, true);
        assert_eq!(audio.music_gain(), 0.0);
        assert_eq!(audio.sfx_gain(), 0.0);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(Language::from_code("ru"), Language::Ru);
        assert_eq!(Language::from_code("de"), Language::En);
    }

    #[test]
    fn normalizing_restores_default_weapon() {
        let profile = Profile {
            unlocked_weapons: BTreeSet::from([WeaponId::Glock17]),
            selected_weapon: WeaponId::Ump45,
            ..default()
        }
        .normalized();
        assert!(profile.is_unlocked(WeaponId::Revolver));
        assert_eq!(profile.selected_weapon, WeaponId::Revolver);
    }
}
