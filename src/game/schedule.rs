//! Scheduled work owned by a session.
//!
//! Each callback chain is an `Option`: `Some` means the handle is live,
//! cancelling drops it.

use std::time::Duration;

use bevy::prelude::*;

/// The idle rotation loop. Runs once per display frame while alive.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameLoop;

/// An in-flight spin flourish.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinLoop {
    pub start_angle: f32,
    pub elapsed: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    NextLevel,
    Victory,
}

/// A pending level change after a round has been cleared.
#[derive(Debug, Clone)]
pub struct Transition {
    pub kind: TransitionKind,
    pub timer: Timer,
}

#[derive(Debug, Default, Clone)]
pub struct Loops {
    pub rotation: Option<FrameLoop>,
    pub spin: Option<SpinLoop>,
    pub countdown: Option<Timer>,
    pub cooldown: Option<Timer>,
    pub transition: Option<Transition>,
}

impl Loops {
    pub fn start_countdown(&mut self) {
        self.countdown = Some(Timer::new(Duration::from_secs(1), TimerMode::Repeating));
    }

    pub fn start_cooldown(&mut self, duration: Duration) {
        self.cooldown = Some(Timer::new(duration, TimerMode::Once));
    }

    pub fn start_transition(&mut self, kind: TransitionKind, delay: Duration) {
        self.transition = Some(Transition {
            kind,
            timer: Timer::new(delay, TimerMode::Once),
        });
    }

    /// Stop the rotation and spin frame loops.
    pub fn cancel_animation(&mut self) {
        self.rotation = None;
        self.spin = None;
    }

    /// Drop every handle.
    pub fn cancel_all(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        self.rotation.is_none()
            && self.spin.is_none()
            && self.countdown.is_none()
            && self.cooldown.is_none()
            && self.transition.is_none()
    }
}
