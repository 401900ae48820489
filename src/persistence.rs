//! Player progress persistence.
//!
//! Progress is saved to a local JSON file in the user's data directory.
//! Failures never reach gameplay: they are logged and the game carries on
//! with what it has in memory.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    AppSystems,
    game::{
        Session, SessionEvent,
        achievements::AchievementId,
        profile::{AudioSettings, Language, Profile},
        weapons::{WeaponId, weapon_by_key},
    },
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ProgressStore>();

    // Load progress on startup
    app.add_systems(Startup, load_progress);
    app.add_systems(Update, save_progress.in_set(AppSystems::Update));
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine the user data directory")]
    NoDataDir,
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed progress data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The saved form of a [`Profile`]. Every field falls back to its default
/// when missing from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub wins_per_weapon: BTreeMap<String, u32>,
    pub unlocked_weapon_ids: Vec<String>,
    pub selected_weapon_id: String,
    pub unlocked_achievement_ids: Vec<String>,
    pub high_score: u32,
    pub perfect_game_streak_count: u32,
    pub master_volume: f32,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub is_muted: bool,
    pub current_language: String,
}

impl Default for SaveData {
    fn default() -> Self {
        Self::from_profile(&Profile::default())
    }
}

impl SaveData {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            wins_per_weapon: profile
                .wins_per_weapon
                .iter()
                .map(|(id, wins)| (id.key().to_string(), *wins))
                .collect(),
            unlocked_weapon_ids: profile
                .unlocked_weapons
                .iter()
                .map(|id| id.key().to_string())
                .collect(),
            selected_weapon_id: profile.selected_weapon.key().to_string(),
            unlocked_achievement_ids: profile
                .unlocked_achievements
                .iter()
                .map(|id| id.key().to_string())
                .collect(),
            high_score: profile.high_score,
            perfect_game_streak_count: profile.perfect_streak,
            master_volume: profile.audio.master_volume,
            music_volume: profile.audio.music_volume,
            sfx_volume: profile.audio.sfx_volume,
            is_muted: profile.audio.muted,
            current_language: profile.language.code().to_string(),
        }
    }

    /// Rebuild a profile, dropping ids this version of the game does not know.
    pub fn into_profile(self) -> Profile {
        let wins_per_weapon = self
            .wins_per_weapon
            .into_iter()
            .filter_map(|(key, wins)| known_weapon(&key).map(|id| (id, wins)))
            .collect();
        let unlocked_weapons = self
            .unlocked_weapon_ids
            .iter()
            .filter_map(|key| known_weapon(key))
            .collect();
        let unlocked_achievements = self
            .unlocked_achievement_ids
            .iter()
            .filter_map(|key| {
                let id = AchievementId::from_key(key);
                if id.is_none() {
                    warn!("Dropping unknown achievement \"{}\" from save data", key);
                }
                id
            })
            .collect();

        Profile {
            high_score: self.high_score,
            wins_per_weapon,
            unlocked_weapons,
            selected_weapon: weapon_by_key(&self.selected_weapon_id).id,
            unlocked_achievements,
            perfect_streak: self.perfect_game_streak_count,
            audio: AudioSettings::new(
                self.master_volume,
                self.music_volume,
                self.sfx_volume,
                self.is_muted,
            ),
            language: Language::from_code(&self.current_language),
        }
        .normalized()
    }
}

fn known_weapon(key: &str) -> Option<WeaponId> {
    let id = WeaponId::from_key(key);
    if id.is_none() {
        warn!("Dropping unknown weapon \"{}\" from save data", key);
    }
    id
}

/// Where progress is kept. Without a path it lives only in memory.
#[derive(Resource, Debug)]
pub struct ProgressStore {
    path: Option<PathBuf>,
    last_saved: Option<SaveData>,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::user_data_dir()
    }
}

impl ProgressStore {
    /// The progress file in the user's data directory, or memory if the
    /// platform has none (e.g. the web build).
    pub fn user_data_dir() -> Self {
        match Self::default_path() {
            Ok(path) => Self::at(path),
            Err(e) => {
                warn!("{}; progress will not be saved", e);
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            last_saved: None,
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            last_saved: None,
        }
    }

    fn default_path() -> Result<PathBuf, StorageError> {
        dirs::data_local_dir()
            .map(|dir| dir.join("spin_shot").join("progress.json"))
            .ok_or(StorageError::NoDataDir)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The data most recently written through this store.
    pub fn last_saved(&self) -> Option<&SaveData> {
        self.last_saved.as_ref()
    }

    pub fn load(&self) -> Result<SaveData, StorageError> {
        let Some(path) = &self.path else {
            return Ok(self.last_saved.clone().unwrap_or_default());
        };

        if !path.exists() {
            info!("No progress file found at {:?}, starting fresh", path);
            return Ok(SaveData::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        let data = serde_json::from_str(&contents)?;
        info!("Loaded progress from {:?}", path);
        Ok(data)
    }

    pub fn save(&mut self, data: &SaveData) -> Result<(), StorageError> {
        self.last_saved = Some(data.clone());
        let Some(path) = &self.path else {
            return Ok(());
        };

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Saved progress to {:?}", path);
        Ok(())
    }
}

fn load_progress(store: Res<ProgressStore>, mut session: ResMut<Session>) {
    match store.load() {
        Ok(data) => session.load_profile(data.into_profile()),
        Err(e) => warn!("Failed to load progress, using defaults: {}", e),
    }
}

/// Write the profile back whenever part of it changed this frame.
fn save_progress(
    mut events: MessageReader<SessionEvent>,
    mut store: ResMut<ProgressStore>,
    session: Res<Session>,
) {
    let changed = events
        .read()
        .filter(|event| matches!(event, SessionEvent::ProgressChanged(_)))
        .count();
    if changed == 0 {
        return;
    }

    if let Err(e) = store.save(&SaveData::from_profile(session.profile())) {
        warn!("Failed to save progress: {}", e);
    }
}
