//! Gun rotation, the spin flourish and firing.

use std::time::Duration;

use bevy::prelude::*;

use super::{
    events::{EffectKind, SessionEvent},
    schedule::{FrameLoop, SpinLoop},
    session::{Projectile, Session},
};

impl Session {
    /// Run one display frame of `dt` wall-clock time.
    pub fn advance(&mut self, dt: Duration) {
        self.tick_cooldown(dt);
        self.tick_countdown(dt);
        self.tick_transition(dt);
        self.tick_rotation();
        self.tick_spin(dt);
        self.step_projectiles();
    }

    /// One frame of the idle rotation loop. While rotation is suspended the
    /// loop stays alive without moving the gun.
    pub(crate) fn tick_rotation(&mut self) {
        if self.loops.rotation.is_none() {
            return;
        }
        if !self.state.rotating || self.state.spinning || self.state.status.is_terminal() {
            return;
        }

        let speed = self.active_weapon().rotation_speed;
        self.state.rotation = (self.state.rotation + speed).rem_euclid(360.0);
        self.emit(SessionEvent::RotationChanged(self.state.rotation));
    }

    /// Start the rotation loop unless one is already running.
    pub(crate) fn ensure_rotation_loop(&mut self) {
        if self.loops.rotation.is_none() {
            self.loops.rotation = Some(FrameLoop);
        }
    }

    /// Fire a bullet along the current gun angle. Returns `false` when the
    /// gun is not ready.
    pub fn fire(&mut self) -> bool {
        let state = &self.state;
        if state.ammo == 0 || !state.can_fire || state.status.is_terminal() || state.spinning {
            return false;
        }

        let fire_angle = self.state.rotation;
        self.emit(SessionEvent::PlayEffect(EffectKind::Gunshot));
        self.spawn_projectile(fire_angle);
        self.perform_spin();

        self.state.ammo -= 1;
        self.state.can_fire = false;
        self.emit(SessionEvent::AmmoChanged {
            count: self.state.ammo,
            max: self.active_weapon().max_ammo,
        });

        // Replaces any cooldown still pending.
        self.loops.start_cooldown(self.tunables.fire_cooldown);

        debug!(
            "Fired at {:.1} degrees, {} rounds left",
            fire_angle, self.state.ammo
        );
        true
    }

    fn spawn_projectile(&mut self, fire_angle: f32) {
        let radians = (fire_angle - 90.0).to_radians();
        let velocity = Vec2::new(radians.cos(), radians.sin()) * self.tunables.projectile_speed;
        let position = self.tunables.field_center();
        let id = self.next_projectile_id();

        self.projectiles.push(Projectile {
            id,
            position,
            velocity,
        });
        self.emit(SessionEvent::ProjectileSpawned { id, position });
    }

    /// Begin a full turn of the gun, suspending idle rotation until it ends.
    pub(crate) fn perform_spin(&mut self) {
        if self.state.spinning || self.state.status.is_terminal() {
            return;
        }

        self.state.spinning = true;
        self.state.rotating = false;
        self.loops.spin = Some(SpinLoop {
            start_angle: self.state.rotation,
            elapsed: Duration::ZERO,
        });
    }

    /// Advance the spin by elapsed time, so its length does not depend on
    /// the frame rate.
    fn tick_spin(&mut self, dt: Duration) {
        let Some(spin) = self.loops.spin.as_mut() else {
            return;
        };

        if self.state.status.is_terminal() {
            self.loops.spin = None;
            self.state.spinning = false;
            return;
        }

        spin.elapsed += dt;
        let start_angle = spin.start_angle;
        let duration = self.tunables.spin_duration;
        let progress = if duration.is_zero() {
            1.0
        } else {
            (spin.elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
        };

        if progress < 1.0 {
            self.emit(SessionEvent::RotationChanged(start_angle + progress * 360.0));
            return;
        }

        self.loops.spin = None;
        self.state.rotation = (start_angle + 360.0).rem_euclid(360.0);
        self.emit(SessionEvent::RotationChanged(self.state.rotation));
        self.state.spinning = false;
        self.state.rotating = !self.state.status.is_terminal();
    }

    fn tick_cooldown(&mut self, dt: Duration) {
        let Some(cooldown) = self.loops.cooldown.as_mut() else {
            return;
        };
        cooldown.tick(dt);
        if !cooldown.just_finished() {
            return;
        }

        self.loops.cooldown = None;
        if !self.state.status.is_terminal() && self.offer.is_none() {
            self.state.can_fire = true;
        }
    }
}
