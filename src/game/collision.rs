//! Bullet flight, hit testing and scoring.

use bevy::prelude::*;

use super::{
    achievements::AchievementId,
    config::{MAX_COMBO_MULTIPLIER, base_points_for_level, combo_multiplier},
    economy::RewardKind,
    events::{EffectKind, SessionEvent},
    levels::TargetKind,
    session::{EndReason, Session},
};

impl Session {
    /// Move every bullet one frame and resolve the ones that hit or leave
    /// the field. Bullets hold still while an offer is waiting for the player.
    pub(crate) fn step_projectiles(&mut self) {
        let mut index = 0;
        while index < self.projectiles.len() {
            if self.state.status.is_terminal() {
                self.clear_projectiles();
                return;
            }
            if self.offer.is_some() {
                return;
            }

            let projectile = &mut self.projectiles[index];
            projectile.position += projectile.velocity;
            let (id, position) = (projectile.id, projectile.position);

            let hit = self.hit_test(position);
            if hit.is_none() && !self.is_out_of_bounds(position) {
                self.emit(SessionEvent::ProjectileMoved { id, position });
                index += 1;
                continue;
            }

            self.projectiles.remove(index);
            self.emit(SessionEvent::ProjectileRemoved { id });
            match hit {
                Some(target) => self.resolve_hit(target),
                None => self.resolve_miss(),
            }
            self.check_out_of_ammo();
        }
    }

    /// Index of the first live target whose padded box overlaps a bullet at
    /// `position`.
    pub(crate) fn hit_test(&self, position: Vec2) -> Option<usize> {
        let bullet = Rect::from_center_size(position, Vec2::splat(self.tunables.projectile_size));
        let padding = self.tunables.hitbox_padding;
        self.targets
            .iter()
            .position(|target| !target.hit && !bullet.intersect(target.hitbox(padding)).is_empty())
    }

    fn is_out_of_bounds(&self, position: Vec2) -> bool {
        let margin = self.tunables.projectile_size;
        let size = self.tunables.field_size;
        position.x < -margin
            || position.x > size.x + margin
            || position.y < -margin
            || position.y > size.y + margin
    }

    pub(crate) fn resolve_hit(&mut self, index: usize) {
        let Some(target) = self.targets.get_mut(index) else {
            return;
        };
        if target.hit {
            return;
        }
        target.hit = true;
        let (kind, center) = (target.kind, target.center());

        self.emit(SessionEvent::PlayEffect(EffectKind::Break));
        self.emit(SessionEvent::TargetBroken { index, center });

        match kind {
            TargetKind::Neutral => {
                self.state.combo += 1;
                let multiplier = combo_multiplier(self.state.combo);
                self.state.combo_multiplier = multiplier;
                let points = base_points_for_level(self.state.level) * multiplier;
                self.state.score += points;
                debug!(
                    "Bottle broken: +{} points (combo {}, x{})",
                    points, self.state.combo, multiplier
                );

                self.emit(SessionEvent::ComboChanged { multiplier });
                self.emit_score_and_timer();
                if multiplier >= MAX_COMBO_MULTIPLIER {
                    self.unlock_achievement(AchievementId::ComboMaster);
                }
                self.check_level_complete();
            }
            TargetKind::Penalty => {
                info!("Penalty bottle hit at level {}", self.state.level);
                self.reset_combo();
                self.unlock_achievement(AchievementId::FirstPenaltyHit);
                if self.state.used_penalty_reward {
                    self.game_over(EndReason::PenaltyHit);
                } else {
                    self.offer_reward(RewardKind::SecondChance);
                }
            }
        }
    }

    pub(crate) fn resolve_miss(&mut self) {
        debug!("Shot missed");
        self.reset_combo();
        self.state.missed_shot = true;
    }

    /// Offer a refill or end the game once the last bullet has landed with
    /// green bottles still standing.
    pub(crate) fn check_out_of_ammo(&mut self) {
        if self.state.status.is_terminal()
            || self.offer.is_some()
            || self.loops.transition.is_some()
        {
            return;
        }
        if self.state.ammo > 0 || !self.projectiles.is_empty() || !self.has_unhit_neutrals() {
            return;
        }

        if self.state.used_ammo_reward {
            self.game_over(EndReason::NoAmmo);
        } else {
            self.offer_reward(RewardKind::AmmoRefill);
        }
    }
}
