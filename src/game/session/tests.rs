use std::time::Duration;

use super::*;
use crate::game::{
    achievements::AchievementId,
    economy::{AdTicket, RewardKind, RewardedOutcome},
    events::{ProgressField, SessionEvent, SessionOutcome},
    levels::{Target, TargetKind},
    test_utils::*,
};

fn ended_outcomes(events: &[SessionEvent]) -> Vec<SessionOutcome> {
    events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::SessionEnded(outcome) => Some(outcome.clone()),
            _ => None,
        })
        .collect()
}

fn neutral(hit: bool) -> Target {
    let mut target = Target::new(Vec2::new(100.0, 100.0), Vec2::new(45.0, 90.0), TargetKind::Neutral);
    target.hit = hit;
    target
}

#[test]
fn starting_a_game_arms_the_gun() {
    let session = started_session();
    let state = session.state();
    assert_eq!(state.level, 1);
    assert_eq!(state.ammo, 8);
    assert_eq!(state.time_left, 120);
    assert!(state.can_fire && state.rotating && !state.spinning);
    assert_eq!(session.targets().len(), 3);
    assert!(session.loops().rotation.is_some());
    assert!(session.loops().countdown.is_some());
}

#[test]
fn each_shot_uses_one_round_until_empty() {
    let mut session = started_session();
    for fired in 1..=8 {
        wait_until_ready(&mut session);
        aim_along(&mut session, 0.0);
        assert!(session.fire());
        assert_eq!(session.state().ammo, 8 - fired);
    }

    step_until(&mut session, |s| !s.state().spinning);
    session.state.can_fire = true;
    assert!(!session.fire());
    assert_eq!(session.state().ammo, 0);
}

#[test]
fn rotation_advances_by_weapon_speed_and_wraps() {
    let mut session = started_session();
    step_frames(&mut session, 1);
    assert!((session.state().rotation - 1.2).abs() < 1e-4);

    session.state.rotation = 359.5;
    step_frames(&mut session, 1);
    assert!((session.state().rotation - 0.7).abs() < 1e-3);
}

#[test]
fn idle_rotation_loop_stays_alive_while_suspended() {
    let mut session = started_session();
    session.state.rotating = false;
    step_frames(&mut session, 10);
    assert_eq!(session.state().rotation, 0.0);
    assert!(session.loops().rotation.is_some());

    session.state.rotating = true;
    step_frames(&mut session, 1);
    assert!(session.state().rotation > 0.0);
}

#[test]
fn spin_suspends_rotation_for_its_wall_clock_duration() {
    for frame_ms in [10, 100] {
        let mut session = started_session();
        aim_along(&mut session, 0.0);
        let start = session.state().rotation;
        assert!(session.fire());
        assert!(session.state().spinning && !session.state().rotating);

        let frames = (300 / frame_ms) as usize;
        for _ in 0..frames - 1 {
            session.advance(Duration::from_millis(frame_ms));
        }
        assert!(session.state().spinning, "{frame_ms} ms frames");

        session.advance(Duration::from_millis(frame_ms));
        assert!(!session.state().spinning);
        assert!(session.state().rotating);
        assert!((session.state().rotation - start).abs() < 1e-3);
    }
}

#[test]
fn cooldown_blocks_the_next_shot() {
    let mut session = started_session();
    aim_along(&mut session, 0.0);
    assert!(session.fire());

    step_for(&mut session, Duration::from_millis(400));
    assert!(!session.state().spinning);
    assert!(!session.state().can_fire);
    assert!(!session.fire());

    step_for(&mut session, Duration::from_millis(120));
    assert!(session.state().can_fire);
}

#[test]
fn neutral_hit_scores_with_the_combo_multiplier() {
    let mut session = started_session();
    jump_to_level(&mut session, 3);
    session.state.combo = 4;

    shoot_target(&mut session, 0);

    assert!(session.targets()[0].hit);
    assert_eq!(session.state().combo, 5);
    assert_eq!(session.state().combo_multiplier, 3);
    assert_eq!(session.state().score, 60);
}

#[test]
fn reaching_the_top_multiplier_unlocks_combo_master() {
    let mut session = started_session();
    jump_to_level(&mut session, 3);
    session.state.combo = 7;
    shoot_target(&mut session, 0);
    assert_eq!(session.state().combo_multiplier, 5);
    assert!(session.profile().has_achievement(AchievementId::ComboMaster));
}

#[test]
fn a_miss_resets_the_combo() {
    let mut session = started_session();
    session.state.combo = 3;
    session.state.combo_multiplier = 2;
    miss_shot(&mut session);
    assert_eq!(session.state().combo, 0);
    assert_eq!(session.state().combo_multiplier, 1);
    assert!(session.state().missed_shot);
}

#[test]
fn penalty_hit_resets_combo_and_offers_a_second_chance() {
    let mut session = started_session();
    jump_to_level(&mut session, 4);
    assert_eq!(session.targets()[1].kind, TargetKind::Penalty);
    session.state.combo = 6;

    shoot_target(&mut session, 1);

    assert_eq!(session.state().combo, 0);
    assert_eq!(session.state().combo_multiplier, 1);
    assert!(session.profile().has_achievement(AchievementId::FirstPenaltyHit));
    assert_eq!(
        session.pending_offer().map(|offer| offer.kind),
        Some(RewardKind::SecondChance)
    );
    assert!(!session.state().can_fire && !session.state().rotating);
}

#[test]
fn declining_the_second_chance_ends_with_penalty_hit() {
    let mut session = started_session();
    jump_to_level(&mut session, 4);
    shoot_target(&mut session, 1);
    session.drain_events();

    session.answer_offer(false);

    assert_eq!(session.state().status, SessionStatus::Over(EndReason::PenaltyHit));
    let outcomes = ended_outcomes(&session.drain_events());
    assert!(matches!(
        outcomes.as_slice(),
        [SessionOutcome::Over {
            reason: EndReason::PenaltyHit,
            ..
        }]
    ));
}

#[test]
fn granted_second_chance_resumes_once_per_game() {
    let mut session = started_session();
    jump_to_level(&mut session, 4);
    shoot_target(&mut session, 1);
    let ticket = accept_offer(&mut session);

    session.complete_ad(ticket, RewardedOutcome::granted());

    assert!(session.is_playing());
    assert!(session.state().can_fire && session.state().rotating);
    assert!(session.state().used_penalty_reward);
    assert!(session.loops().countdown.is_some());

    shoot_target(&mut session, 3);
    assert_eq!(session.state().status, SessionStatus::Over(EndReason::PenaltyHit));
    assert!(session.pending_offer().is_none());
}

#[test]
fn empty_gun_offers_a_refill_that_resumes_play() {
    let mut session = started_session();
    session.state.ammo = 1;

    miss_shot(&mut session);
    assert_eq!(
        session.pending_offer().map(|offer| offer.kind),
        Some(RewardKind::AmmoRefill)
    );

    let ticket = accept_offer(&mut session);
    session.complete_ad(ticket, RewardedOutcome::granted());

    assert!(session.is_playing());
    assert_eq!(session.state().ammo, 3);
    assert!(session.state().can_fire);
    assert!(session.state().used_ammo_reward);
}

#[test]
fn resuming_after_an_ad_keeps_the_time_left() {
    let mut session = started_session();
    session.state.time_left = 47;
    session.state.ammo = 1;

    miss_shot(&mut session);
    let frozen = session.state().time_left;
    assert!(frozen <= 47);
    let ticket = accept_offer(&mut session);
    session.complete_ad(ticket, RewardedOutcome::granted());

    assert!(session.is_playing());
    assert_eq!(session.state().time_left, frozen);
    step_for(&mut session, Duration::from_millis(1010));
    assert_eq!(session.state().time_left, frozen - 1);
}

#[test]
fn bullets_move_one_step_per_frame_whatever_its_length() {
    let mut session = started_session();
    wait_until_ready(&mut session);
    aim_along(&mut session, 0.0);
    assert!(session.fire());
    let speed = session.tunables().projectile_speed;

    let start = session.projectiles()[0].position;
    session.advance(Duration::from_millis(8));
    let short = session.projectiles()[0].position;
    session.advance(Duration::from_millis(40));
    let long = session.projectiles()[0].position;

    assert!((short.distance(start) - speed).abs() < 1e-3);
    assert!((long.distance(short) - speed).abs() < 1e-3);
}

#[test]
fn last_round_hitting_a_bottle_still_checks_for_ammo() {
    let mut session = started_session();
    session.state.ammo = 1;
    shoot_target(&mut session, 0);
    assert_eq!(
        session.pending_offer().map(|offer| offer.kind),
        Some(RewardKind::AmmoRefill)
    );
}

#[test]
fn refill_not_granted_ends_with_no_ammo() {
    let outcomes = [
        None,
        Some(RewardedOutcome::closed()),
        Some(RewardedOutcome::unavailable()),
        Some(RewardedOutcome::failed("sdk error")),
    ];
    for outcome in outcomes {
        let mut session = started_session();
        session.state.ammo = 1;
        miss_shot(&mut session);
        match outcome.clone() {
            None => session.answer_offer(false),
            Some(outcome) => {
                let ticket = accept_offer(&mut session);
                session.complete_ad(ticket, outcome);
            }
        }
        assert_eq!(
            session.state().status,
            SessionStatus::Over(EndReason::NoAmmo),
            "{outcome:?}"
        );
    }
}

#[test]
fn second_refill_is_never_offered() {
    let mut session = started_session();
    session.state.ammo = 1;
    session.state.used_ammo_reward = true;
    miss_shot(&mut session);
    assert!(session.pending_offer().is_none());
    assert_eq!(session.state().status, SessionStatus::Over(EndReason::NoAmmo));
}

#[test]
fn resume_without_reward_and_without_ammo_ends_the_game() {
    let mut session = started_session();
    session.pause_for_ad();
    session.state.ammo = 0;
    session.resume_game_after_ad(false);
    assert_eq!(session.state().status, SessionStatus::Over(EndReason::NoAmmo));
}

#[test]
fn resume_with_nothing_left_to_hit_clears_the_level() {
    let mut session = started_session();
    session.pause_for_ad();
    for target in &mut session.targets {
        target.hit = true;
    }
    session.resume_game_after_ad(true);
    assert!(session.loops().transition.is_some());
    assert!(!session.state().can_fire);
}

#[test]
fn duplicate_and_stale_ad_outcomes_are_ignored() {
    let mut session = started_session();
    session.state.ammo = 1;
    miss_shot(&mut session);
    let ticket = accept_offer(&mut session);

    session.complete_ad(ticket, RewardedOutcome::granted());
    session.complete_ad(ticket, RewardedOutcome::granted());
    assert_eq!(session.state().ammo, 3);

    session.apply_reward(RewardKind::AmmoRefill);
    assert_eq!(session.state().ammo, 3);
}

#[test]
fn ad_outcome_after_leaving_the_game_is_ignored() {
    let mut session = started_session();
    session.state.ammo = 1;
    miss_shot(&mut session);
    let ticket = accept_offer(&mut session);

    session.exit_to_menu();
    session.complete_ad(ticket, RewardedOutcome::granted());

    assert_eq!(session.state().ammo, 0);
    assert_eq!(session.state().status, SessionStatus::Over(EndReason::Abandoned));
}

#[test]
fn pending_offer_freezes_the_clock_and_the_gun() {
    let mut session = started_session();
    session.state.ammo = 1;
    miss_shot(&mut session);
    let (time_left, rotation) = (session.state().time_left, session.state().rotation);

    step_for(&mut session, Duration::from_secs(10));

    assert_eq!(session.state().time_left, time_left);
    assert_eq!(session.state().rotation, rotation);
    assert!(session.loops().is_idle());
    assert!(session.is_playing());
}

#[test]
fn level_with_all_greens_down_is_complete() {
    let mut session = started_session();
    session.targets = vec![neutral(true), neutral(true)];
    session.check_level_complete();
    assert!(session.loops().transition.is_some());
    assert!(!session.state().can_fire && !session.state().rotating);
    assert!(session.loops().cooldown.is_none() && session.loops().rotation.is_none());

    let mut session = started_session();
    session.targets = vec![neutral(true), neutral(false)];
    session.check_level_complete();
    assert!(session.loops().transition.is_none());

    let mut session = started_session();
    let mut penalty = neutral(true);
    penalty.kind = TargetKind::Penalty;
    session.targets = vec![penalty];
    session.check_level_complete();
    assert!(session.loops().transition.is_none());
}

#[test]
fn clearing_level_one_moves_on_after_the_delay() {
    let mut session = started_session();
    for index in 0..3 {
        shoot_target(&mut session, index);
    }
    assert_eq!(session.state().score, 50);
    assert_eq!(session.state().level, 1);
    assert!(!session.state().can_fire);

    step_for(&mut session, Duration::from_millis(1400));
    assert_eq!(session.state().level, 1);

    step_for(&mut session, Duration::from_millis(120));
    assert_eq!(session.state().level, 2);
    assert_eq!(session.state().ammo, 8);
    assert_eq!(session.targets().len(), 4);
    assert!(session.targets().iter().all(|target| !target.hit));
    assert!(session.state().can_fire && session.state().rotating);
    assert!(session.loops().rotation.is_some());
}

#[test]
fn game_ending_during_the_delay_keeps_the_level() {
    let mut session = started_session();
    for index in 0..3 {
        shoot_target(&mut session, index);
    }
    session.state.time_left = 1;

    step_for(&mut session, Duration::from_millis(1600));

    assert_eq!(session.state().status, SessionStatus::Over(EndReason::Timeout));
    assert_eq!(session.state().level, 1);
    assert!(session.loops().is_idle());
}

#[test]
fn clearing_the_last_level_wins_after_a_short_delay() {
    let mut session = started_session();
    jump_to_level(&mut session, 10);
    for target in session.targets.iter_mut().skip(1) {
        if target.kind == TargetKind::Neutral {
            target.hit = true;
        }
    }
    session.state.time_left = 90;

    shoot_target(&mut session, 0);
    assert_eq!(session.state().status, SessionStatus::Playing);
    session.drain_events();

    step_for(&mut session, Duration::from_millis(520));

    assert_eq!(session.state().status, SessionStatus::Won);
    let score = session.state().score;
    assert_eq!(
        ended_outcomes(&session.drain_events()),
        vec![SessionOutcome::Won {
            final_score: score + 9000,
            time_bonus: 9000
        }]
    );
    assert_eq!(session.profile().wins_for(WeaponId::Revolver), 1);
}

#[test]
fn win_bonus_counts_remaining_seconds() {
    let mut session = started_session();
    session.state.score = 500;
    session.state.time_left = 30;
    session.game_won();
    assert_eq!(
        ended_outcomes(&session.drain_events()),
        vec![SessionOutcome::Won {
            final_score: 3500,
            time_bonus: 3000
        }]
    );
    assert_eq!(session.profile().high_score, 3500);
}

#[test]
fn awm_doubles_the_final_score() {
    let mut session = Session::with_seed(3);
    session.profile.unlocked_weapons.insert(WeaponId::Awm);
    assert!(session.select_weapon(WeaponId::Awm));
    session.start_game(GameMode::Normal);
    session.state.score = 500;
    session.state.time_left = 30;
    session.drain_events();

    session.game_won();

    assert_eq!(
        ended_outcomes(&session.drain_events()),
        vec![SessionOutcome::Won {
            final_score: 7000,
            time_bonus: 3000
        }]
    );
}

#[test]
fn ending_twice_has_the_effect_of_ending_once() {
    let mut session = started_session();
    session.state.score = 400;

    session.game_over(EndReason::NoAmmo);
    session.game_over(EndReason::Timeout);
    session.game_won();

    let events = session.drain_events();
    assert_eq!(ended_outcomes(&events).len(), 1);
    let beaten = events
        .iter()
        .filter(|event| matches!(event, SessionEvent::HighScoreBeaten(400)))
        .count();
    assert_eq!(beaten, 1);
    assert_eq!(session.state().status, SessionStatus::Over(EndReason::NoAmmo));
    assert_eq!(session.profile().wins_for(WeaponId::Revolver), 0);
}

#[test]
fn ended_game_stops_every_loop() {
    let mut session = started_session();
    aim_along(&mut session, 0.0);
    assert!(session.fire());
    session.game_over(EndReason::Timeout);

    let rotation = session.state().rotation;
    step_frames(&mut session, 30);

    assert!(session.loops().is_idle());
    assert!(session.projectiles().is_empty());
    assert_eq!(session.state().rotation, rotation);
    assert!(!session.state().rotating && !session.state().spinning);
    assert!(!session.fire());
}

#[test]
fn flawless_win_extends_the_streak_and_a_miss_breaks_it() {
    let mut session = started_session();
    session.game_won();
    assert_eq!(session.profile().perfect_streak, 1);
    assert!(session.profile().has_achievement(AchievementId::FlawlessVictory));

    session.start_game(GameMode::Normal);
    session.game_over(EndReason::Timeout);
    assert_eq!(session.profile().perfect_streak, 1);

    session.start_game(GameMode::Normal);
    miss_shot(&mut session);
    session.game_over(EndReason::Timeout);
    assert_eq!(session.profile().perfect_streak, 0);
}

#[test]
fn tenth_flawless_win_unlocks_the_streak_achievement() {
    let mut session = started_session();
    session.profile.perfect_streak = 9;
    session.game_won();
    assert!(session.profile().has_achievement(AchievementId::TenPerfectGames));
}

#[test]
fn quick_high_scoring_win_unlocks_score_achievements() {
    let mut session = started_session();
    session.state.time_left = 100;
    session.state.score = 25_000;
    session.game_won();

    let profile = session.profile();
    assert!(profile.has_achievement(AchievementId::GameCompleted));
    assert!(profile.has_achievement(AchievementId::FastClear));
    assert!(profile.has_achievement(AchievementId::PointHoarder));
    assert!(profile.has_achievement(AchievementId::ScoreBreaker));
}

#[test]
fn countdown_runs_out_into_a_timeout() {
    let mut session = started_session();
    for _ in 0..119 {
        session.advance(Duration::from_secs(1));
    }
    assert_eq!(session.state().time_left, 1);
    assert!(session.is_playing());

    session.advance(Duration::from_secs(1));
    assert_eq!(session.state().time_left, 0);
    assert_eq!(session.state().status, SessionStatus::Over(EndReason::Timeout));
}

#[test]
fn menu_halts_the_countdown() {
    let mut session = started_session();
    session.enter_menu();
    step_for(&mut session, Duration::from_secs(5));
    assert_eq!(session.state().time_left, 120);
    assert!(session.loops().countdown.is_none());
}

#[test]
fn leaving_mid_game_scores_nothing() {
    let mut session = started_session();
    session.state.score = 999;
    session.exit_to_menu();

    assert_eq!(session.profile().high_score, 0);
    assert!(ended_outcomes(&session.drain_events()).is_empty());
    assert!(session.loops().is_idle());
    assert!(session.state().menu_active);
}

#[test]
fn leaving_after_a_miss_breaks_the_streak() {
    let mut session = started_session();
    session.profile.perfect_streak = 3;
    miss_shot(&mut session);
    session.drain_events();

    session.exit_to_menu();

    assert_eq!(session.profile().perfect_streak, 0);
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::ProgressChanged(ProgressField::PerfectStreak)));
    assert!(ended_outcomes(&events).is_empty());
}

#[test]
fn leaving_without_a_miss_keeps_the_streak() {
    let mut session = started_session();
    session.profile.perfect_streak = 3;
    shoot_target(&mut session, 0);

    session.exit_to_menu();

    assert_eq!(session.profile().perfect_streak, 3);
}

#[test]
fn level_without_layout_spawns_nothing() {
    let mut session = started_session();
    jump_to_level(&mut session, 11);
    assert!(session.targets().is_empty());
    session.spawn_level_targets();
    assert!(session.drain_events().iter().any(|event| matches!(
        event,
        SessionEvent::RoundMessage { text, .. } if text.contains("No Layout")
    )));
}

#[test]
fn playing_again_waits_for_the_interstitial() {
    let mut session = started_session();
    session.game_over(EndReason::Timeout);
    session.drain_events();

    session.play_again();
    let ticket = session.pending_interstitial().unwrap();
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::RequestInterstitial { ticket }));
    assert!(!events.contains(&SessionEvent::SessionStarted));

    // Nothing runs while the interstitial is up.
    session.play_again();
    step_for(&mut session, Duration::from_secs(5));
    assert!(!session.is_playing());
    assert!(session.loops().is_idle());
    assert!(session.drain_events().is_empty());

    session.complete_interstitial(AdTicket(ticket.0 + 1));
    assert!(!session.is_playing());

    session.complete_interstitial(ticket);
    assert!(session.is_playing());
    assert!(session.pending_interstitial().is_none());
    assert!(session.drain_events().contains(&SessionEvent::SessionStarted));

    step_for(&mut session, Duration::from_millis(1_010));
    assert_eq!(session.state().time_left, 119);
}

#[test]
fn interstitial_finishing_after_leaving_is_ignored() {
    let mut session = started_session();
    session.game_over(EndReason::Timeout);
    session.play_again();
    let ticket = session.pending_interstitial().unwrap();

    session.exit_to_menu();
    session.complete_interstitial(ticket);

    assert!(!session.is_playing());
    assert!(session.state().menu_active);
}
