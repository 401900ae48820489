//! Level layouts - where the bottles stand in each round.
//!
//! Every level places its targets on a circle around the gun. Most targets
//! are neutral; some levels mix in penalty targets, either at fixed slots
//! (normal mode) or at random slots (random mode).

use bevy::prelude::*;
use rand::{Rng, seq::index};

use super::config::Tunables;

/// How penalty targets are placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum GameMode {
    #[default]
    Normal,
    Random,
}

/// What happens when a target is hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum TargetKind {
    /// Scores, builds combo and counts towards clearing the level.
    Neutral,
    /// Ends the session unless a second chance is granted.
    Penalty,
}

/// A bottle on the play field.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct Target {
    pub bounds: Rect,
    pub kind: TargetKind,
    pub hit: bool,
}

impl Target {
    pub fn new(center: Vec2, size: Vec2, kind: TargetKind) -> Self {
        Self {
            bounds: Rect::from_center_size(center, size),
            kind,
            hit: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// The region a projectile must overlap to break this target.
    pub fn hitbox(&self, padding: f32) -> Rect {
        self.bounds.inflate(-padding)
    }

    pub fn is_unhit_neutral(&self) -> bool {
        self.kind == TargetKind::Neutral && !self.hit
    }
}

/// Target angles (degrees, clockwise from the right) for each level.
const LEVEL_ANGLES: [&[f32]; 10] = [
    &[45.0, 135.0, 270.0],
    &[45.0, 135.0, 225.0, 315.0],
    &[0.0, 180.0, 270.0, 135.0, 45.0],
    &[0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0],
    &[0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0],
    &[0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0],
    &[
        0.0, 25.0, 50.0, 90.0, 130.0, 155.0, 180.0, 205.0, 230.0, 270.0, 310.0, 335.0,
    ],
    &[
        35.0, 55.0, 75.0, 105.0, 125.0, 145.0, 215.0, 235.0, 255.0, 285.0, 305.0, 325.0,
    ],
    &[
        0.0, 22.5, 45.0, 67.5, 90.0, 112.5, 157.5, 180.0, 202.5, 225.0, 247.5, 270.0, 292.5,
        337.5,
    ],
    &[
        0.0, 22.0, 44.0, 66.0, 88.0, 110.0, 132.0, 154.0, 176.0, 198.0, 220.0, 242.0, 264.0,
        286.0, 308.0, 330.0,
    ],
];

/// Fixed penalty slots in normal mode, keyed by zero-based level index.
const PENALTY_SLOTS: [(usize, &[usize]); 6] = [
    (3, &[1, 3, 5, 7]),
    (4, &[0, 2, 4, 6]),
    (6, &[1, 3, 5, 7, 9, 11]),
    (7, &[0, 2, 3, 5, 6, 8, 9, 11]),
    (8, &[1, 3, 5, 6, 8, 10, 12, 13]),
    (9, &[1, 3, 5, 7, 9, 11, 13, 15]),
];

/// Number of penalty targets in random mode, keyed by zero-based level index.
const RANDOM_PENALTY_COUNTS: [(usize, usize); 6] = [(3, 4), (4, 4), (6, 6), (7, 8), (8, 8), (9, 8)];

/// Target angles for a one-based level, if the level has a layout.
pub fn layout_for_level(level: u32) -> Option<&'static [f32]> {
    let index = (level as usize).checked_sub(1)?;
    LEVEL_ANGLES.get(index).copied()
}

/// Slots that hold penalty targets for the given zero-based level index.
pub fn penalty_slots(
    mode: GameMode,
    level_index: usize,
    slot_count: usize,
    rng: &mut impl Rng,
) -> Vec<usize> {
    match mode {
        GameMode::Normal => PENALTY_SLOTS
            .iter()
            .find(|(index, _)| *index == level_index)
            .map(|(_, slots)| slots.iter().copied().filter(|&s| s < slot_count).collect())
            .unwrap_or_default(),
        GameMode::Random => {
            let count = RANDOM_PENALTY_COUNTS
                .iter()
                .find(|(index, _)| *index == level_index)
                .map(|(_, count)| (*count).min(slot_count))
                .unwrap_or(0);
            index::sample(rng, slot_count, count).into_vec()
        }
    }
}

/// Build the targets for a level, or `None` if the level has no layout.
pub fn build_targets(
    level: u32,
    mode: GameMode,
    tunables: &Tunables,
    rng: &mut impl Rng,
) -> Option<Vec<Target>> {
    let angles = layout_for_level(level)?;
    let penalties = penalty_slots(mode, level as usize - 1, angles.len(), rng);
    let center = tunables.field_center();

    let targets = angles
        .iter()
        .enumerate()
        .map(|(slot, angle)| {
            let radians = angle.to_radians();
            let position = center + Vec2::new(radians.cos(), radians.sin()) * tunables.placement_radius;
            let kind = if penalties.contains(&slot) {
                TargetKind::Penalty
            } else {
                TargetKind::Neutral
            };
            Target::new(position, tunables.target_size, kind)
        })
        .collect();

    Some(targets)
}
