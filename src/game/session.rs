//! The game session - the single owner of everything that changes while a
//! game is played.
//!
//! `Session` is a plain resource. Its operations never touch the ECS: they
//! mutate the session and queue [`SessionEvent`]s, which a system later
//! publishes as Bevy messages. Time only moves when [`Session::advance`] is
//! called, once per display frame.

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use super::{
    config::Tunables,
    economy::{AdTicket, PendingOffer},
    events::{MessageTone, MusicContext, SessionEvent},
    levels::{GameMode, Target, TargetKind, build_targets},
    profile::Profile,
    schedule::Loops,
    weapons::{Weapon, WeaponId},
};

#[cfg(test)]
mod tests;

/// Why a session ended without a win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    Timeout,
    PenaltyHit,
    NoAmmo,
    /// The player left for the title screen mid-game.
    Abandoned,
}

impl EndReason {
    pub fn title(self) -> &'static str {
        match self {
            EndReason::Timeout => "Time's up!",
            EndReason::PenaltyHit => "Wrong bottle!",
            EndReason::NoAmmo => "Out of ammo!",
            EndReason::Abandoned => "Game over",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EndReason::Timeout => "The clock ran out before every bottle was broken.",
            EndReason::PenaltyHit => "You shot a red bottle.",
            EndReason::NoAmmo => "No bullets left and green bottles still standing.",
            EndReason::Abandoned => "",
        }
    }
}

/// Exactly one of these holds at any time. Terminal states are never left
/// within a session; only starting a new game resets to `Playing`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Playing,
    Over(EndReason),
    Won,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionStatus::Playing)
    }
}

/// A locked weapon lent to the player for one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialWeapon {
    pub weapon: WeaponId,
    pub active: bool,
}

/// A bullet in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Per-session counters and flags.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub level: u32,
    pub score: u32,
    pub ammo: u32,
    pub time_left: u32,
    pub combo: u32,
    pub combo_multiplier: u32,
    pub status: SessionStatus,
    pub rotating: bool,
    pub spinning: bool,
    pub can_fire: bool,
    pub menu_active: bool,
    /// Current gun angle in `[0, 360)`.
    pub rotation: f32,
    pub trial: Option<TrialWeapon>,
    pub used_ammo_reward: bool,
    pub used_penalty_reward: bool,
    pub missed_shot: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            level: 1,
            score: 0,
            ammo: 0,
            time_left: 0,
            combo: 0,
            combo_multiplier: 1,
            status: SessionStatus::Playing,
            rotating: false,
            spinning: false,
            can_fire: false,
            menu_active: true,
            rotation: 0.0,
            trial: None,
            used_ammo_reward: false,
            used_penalty_reward: false,
            missed_shot: false,
        }
    }
}

impl SessionState {
    pub fn is_game_over(&self) -> bool {
        matches!(self.status, SessionStatus::Over(_))
    }

    pub fn is_game_won(&self) -> bool {
        self.status == SessionStatus::Won
    }
}

#[derive(Resource)]
pub struct Session {
    pub(crate) state: SessionState,
    pub(crate) profile: Profile,
    pub(crate) tunables: Tunables,
    pub(crate) mode: GameMode,
    pub(crate) targets: Vec<Target>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) loops: Loops,
    pub(crate) offer: Option<PendingOffer>,
    /// Interstitial shown before the next game starts.
    pub(crate) interstitial: Option<AdTicket>,
    pub(crate) next_ticket: u64,
    next_projectile_id: u32,
    rng: StdRng,
    events: Vec<SessionEvent>,
}

impl FromWorld for Session {
    fn from_world(world: &mut World) -> Self {
        let tunables = world.get_resource::<Tunables>().cloned().unwrap_or_default();
        Self::new(Profile::default(), tunables, StdRng::from_rng(&mut rand::rng()))
    }
}

impl Session {
    pub fn new(profile: Profile, tunables: Tunables, rng: StdRng) -> Self {
        let state = SessionState {
            time_left: tunables.time_limit_seconds,
            ..default()
        };
        Self {
            state,
            profile: profile.normalized(),
            tunables,
            mode: GameMode::default(),
            targets: Vec::new(),
            projectiles: Vec::new(),
            loops: Loops::default(),
            offer: None,
            interstitial: None,
            next_ticket: 0,
            next_projectile_id: 0,
            rng,
            events: Vec::new(),
        }
    }

    /// A session with default rules whose random layouts are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(
            Profile::default(),
            Tunables::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn pending_offer(&self) -> Option<PendingOffer> {
        self.offer
    }

    pub fn pending_interstitial(&self) -> Option<AdTicket> {
        self.interstitial
    }

    pub fn loops(&self) -> &Loops {
        &self.loops
    }

    /// A game is running: started, not ended, not back in the menu.
    pub fn is_playing(&self) -> bool {
        !self.state.menu_active && !self.state.status.is_terminal()
    }

    /// The weapon in hand: the trial weapon while a trial runs, otherwise
    /// the player's selection.
    pub fn active_weapon(&self) -> &'static Weapon {
        match self.state.trial {
            Some(TrialWeapon {
                weapon,
                active: true,
            }) => weapon.weapon(),
            _ => self.profile.selected_weapon.weapon(),
        }
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Replace the player's progress, typically with what was loaded from disk.
    pub fn load_profile(&mut self, profile: Profile) {
        self.profile = profile.normalized();
        if !self.is_playing() {
            self.apply_weapon_stats();
        }
        info!(
            "Profile loaded: high score {}, weapon {}",
            self.profile.high_score,
            self.active_weapon().name
        );
    }

    /// Leave the menu and begin a fresh game.
    pub fn start_game(&mut self, mode: GameMode) {
        self.state.menu_active = false;
        self.mode = mode;
        self.reset_game();
        self.start_timer();
        if self.state.rotating {
            self.ensure_rotation_loop();
        }
        info!(
            "Game started ({:?} mode) with {}",
            mode,
            self.active_weapon().name
        );
        self.emit(SessionEvent::SessionStarted);
        self.emit(SessionEvent::Music(MusicContext::Game));
    }

    /// Start another game from the end screen. After a finished game an
    /// interstitial plays first and the game starts once it is done.
    pub fn play_again(&mut self) {
        if self.interstitial.is_some() {
            debug!("Interstitial already showing");
            return;
        }
        if !self.state.status.is_terminal() {
            self.start_game(self.mode);
            return;
        }

        let ticket = self.issue_ticket();
        self.interstitial = Some(ticket);
        info!("Requesting interstitial {:?} before the next game", ticket);
        self.emit(SessionEvent::RequestInterstitial { ticket });
    }

    /// The interstitial requested with `ticket` closed, was skipped or failed.
    /// Either way the next game starts.
    pub fn complete_interstitial(&mut self, ticket: AdTicket) {
        if self.interstitial != Some(ticket) {
            debug!("Ignoring outcome for stale interstitial {:?}", ticket);
            return;
        }
        self.interstitial = None;
        self.start_game(self.mode);
    }

    /// Put everything back to the first round, dropping any scheduled work.
    pub(crate) fn reset_game(&mut self) {
        self.loops.cancel_all();
        self.offer = None;
        self.interstitial = None;
        self.clear_projectiles();
        self.targets.clear();

        let trial = self.state.trial.filter(|trial| trial.active);
        self.state = SessionState {
            time_left: self.tunables.time_limit_seconds,
            menu_active: self.state.menu_active,
            trial,
            ..default()
        };

        self.emit(SessionEvent::RoundMessage {
            text: "SpinShot Fury".into(),
            tone: MessageTone::Neutral,
        });
        self.emit(SessionEvent::RotationChanged(0.0));
        self.apply_weapon_stats();
        self.state.rotating = true;
        self.emit(SessionEvent::ComboChanged { multiplier: 1 });
        self.emit_score_and_timer();
        self.spawn_level_targets();
        self.state.spinning = false;
        self.state.can_fire = true;
    }

    /// Abandon the running game, if any, and return to the menu. Nothing is
    /// scored, but a miss still breaks the perfect streak.
    pub fn exit_to_menu(&mut self) {
        if !self.state.status.is_terminal() && !self.state.menu_active {
            info!("Game abandoned at level {}", self.state.level);
            self.state.status = SessionStatus::Over(EndReason::Abandoned);
            self.break_streak_after_miss();
        }
        self.halt();
        self.targets.clear();
        self.state.trial = None;
        self.enter_menu();
    }

    /// Mark the menu as shown. The countdown stops on its next tick.
    pub fn enter_menu(&mut self) {
        self.state.menu_active = true;
        self.emit(SessionEvent::Music(MusicContext::Menu));
    }

    /// Refill ammo for the weapon in hand.
    pub(crate) fn apply_weapon_stats(&mut self) {
        let weapon = self.active_weapon();
        self.state.ammo = weapon.max_ammo;
        self.emit(SessionEvent::AmmoChanged {
            count: weapon.max_ammo,
            max: weapon.max_ammo,
        });
    }

    pub(crate) fn reset_combo(&mut self) {
        self.state.combo = 0;
        self.state.combo_multiplier = 1;
        self.emit(SessionEvent::ComboChanged { multiplier: 1 });
    }

    /// Replace the targets with the current level's layout.
    pub(crate) fn spawn_level_targets(&mut self) {
        self.clear_projectiles();
        let level = self.state.level;
        match build_targets(level, self.mode, &self.tunables, &mut self.rng) {
            Some(targets) => {
                debug!("Level {} spawned {} targets", level, targets.len());
                self.targets = targets;
                self.emit(SessionEvent::TargetsSpawned(self.targets.clone()));
            }
            None => {
                error!("Level {} has no target layout", level);
                self.targets.clear();
                self.emit(SessionEvent::TargetsSpawned(Vec::new()));
                self.emit(SessionEvent::RoundMessage {
                    text: format!("Level: {level} (No Layout!)"),
                    tone: MessageTone::Bad,
                });
            }
        }
    }

    pub(crate) fn has_unhit_neutrals(&self) -> bool {
        self.targets.iter().any(Target::is_unhit_neutral)
    }

    pub(crate) fn neutral_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets
            .iter()
            .filter(|target| target.kind == TargetKind::Neutral)
    }

    pub(crate) fn emit_score_and_timer(&mut self) {
        self.emit(SessionEvent::ScoreAndTimer {
            score: self.state.score,
            time_left: self.state.time_left,
        });
    }

    pub(crate) fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        id
    }

    pub(crate) fn clear_projectiles(&mut self) {
        for projectile in std::mem::take(&mut self.projectiles) {
            self.emit(SessionEvent::ProjectileRemoved { id: projectile.id });
        }
    }

    /// Stop the countdown, every loop and every pending offer.
    pub(crate) fn halt(&mut self) {
        self.loops.cancel_all();
        self.offer = None;
        self.interstitial = None;
        self.state.rotating = false;
        self.state.spinning = false;
        self.state.can_fire = false;
        self.clear_projectiles();
    }
}
