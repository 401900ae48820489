//! Draws the session: the field, the gun, bottles, bullets and the HUD.
//!
//! The session works in field units with y pointing down. Everything here
//! converts to world space around the origin and never writes back.

use bevy::prelude::*;
use rand::Rng;

use super::{
    Session, SessionEvent,
    achievements::AchievementId,
    config::{Tunables, format_time},
    events::MessageTone,
    levels::{Target, TargetKind},
};
use crate::{
    AppSystems,
    screens::Screen,
    theme::{palette, widget},
};

pub(crate) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), (spawn_field, spawn_hud));
    app.add_systems(
        Update,
        (
            rebuild_bottles,
            break_bottles,
            rotate_gun,
            sync_bullets,
            update_hud,
            show_round_messages,
            spawn_floating_text,
            animate_shards,
            animate_floating_text,
        )
            .in_set(AppSystems::Update)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// World units per field unit.
pub const VIEW_SCALE: f32 = 0.5;

const NEUTRAL_COLOR: Color = Color::srgb(0.30, 0.70, 0.35);
const PENALTY_COLOR: Color = Color::srgb(0.85, 0.25, 0.20);
const FIELD_COLOR: Color = Color::srgb(0.16, 0.12, 0.10);
const GUN_COLOR: Color = Color::srgb(0.55, 0.55, 0.60);
const BULLET_COLOR: Color = Color::srgb(1.0, 0.85, 0.3);

const SHARDS_PER_BOTTLE: usize = 8;

/// Convert a field position to world space.
pub fn field_to_world(position: Vec2, tunables: &Tunables) -> Vec2 {
    let center = tunables.field_center();
    Vec2::new(position.x - center.x, center.y - position.y) * VIEW_SCALE
}

/// The session measures gun angles clockwise from straight up.
pub fn gun_rotation(degrees: f32) -> Quat {
    Quat::from_rotation_z(-degrees.to_radians())
}

#[derive(Component)]
struct Gun;

#[derive(Component)]
struct Bottle {
    index: usize,
}

#[derive(Component)]
struct Bullet {
    id: u32,
}

#[derive(Component)]
struct Shard {
    velocity: Vec2,
    timer: Timer,
}

/// Text that floats up and fades out.
#[derive(Component)]
struct FloatingText {
    timer: Timer,
    start_y: f32,
    float_distance: f32,
    color: Color,
}

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum HudText {
    Level,
    Score,
    Timer,
    Ammo,
    Combo,
    Weapon,
    Message,
}

fn spawn_field(mut commands: Commands, session: Res<Session>) {
    let tunables = session.tunables();
    commands.spawn((
        Name::new("Field"),
        Sprite::from_color(FIELD_COLOR, tunables.field_size * VIEW_SCALE),
        Transform::from_xyz(0.0, 0.0, -1.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    commands.spawn((
        Name::new("Gun"),
        Gun,
        Transform::from_rotation(gun_rotation(session.state().rotation)),
        Visibility::default(),
        DespawnOnExit(Screen::Gameplay),
        children![
            (
                Name::new("Gun Body"),
                Sprite::from_color(GUN_COLOR, Vec2::new(28.0, 28.0)),
            ),
            (
                Name::new("Gun Barrel"),
                Sprite::from_color(GUN_COLOR, Vec2::new(8.0, 40.0)),
                Transform::from_xyz(0.0, 30.0, 0.0),
            ),
        ],
    ));

    spawn_bottles(&mut commands, session.targets(), tunables);
}

fn spawn_bottles(commands: &mut Commands, targets: &[Target], tunables: &Tunables) {
    for (index, target) in targets.iter().enumerate() {
        let color = match target.kind {
            TargetKind::Neutral => NEUTRAL_COLOR,
            TargetKind::Penalty => PENALTY_COLOR,
        };
        let visibility = if target.hit {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
        commands.spawn((
            Name::new("Bottle"),
            Bottle { index },
            Sprite::from_color(color, target.bounds.size() * VIEW_SCALE),
            Transform::from_translation(field_to_world(target.center(), tunables).extend(1.0)),
            visibility,
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

fn rebuild_bottles(
    mut commands: Commands,
    mut events: MessageReader<SessionEvent>,
    session: Res<Session>,
    bottles: Query<Entity, With<Bottle>>,
) {
    let Some(targets) = events
        .read()
        .filter_map(|event| match event {
            SessionEvent::TargetsSpawned(targets) => Some(targets),
            _ => None,
        })
        .last()
    else {
        return;
    };

    for entity in &bottles {
        commands.entity(entity).despawn();
    }
    spawn_bottles(&mut commands, targets, session.tunables());
}

fn break_bottles(
    mut commands: Commands,
    mut events: MessageReader<SessionEvent>,
    session: Res<Session>,
    mut bottles: Query<(&Bottle, &mut Visibility)>,
) {
    let mut rng = rand::rng();
    for event in events.read() {
        let SessionEvent::TargetBroken { index, center } = event else {
            continue;
        };

        for (bottle, mut visibility) in &mut bottles {
            if bottle.index == *index {
                *visibility = Visibility::Hidden;
            }
        }

        let color = match session.targets().get(*index).map(|target| target.kind) {
            Some(TargetKind::Penalty) => PENALTY_COLOR,
            _ => NEUTRAL_COLOR,
        };
        let origin = field_to_world(*center, session.tunables());
        for _ in 0..SHARDS_PER_BOTTLE {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(60.0..180.0);
            commands.spawn((
                Name::new("Shard"),
                Shard {
                    velocity: Vec2::from_angle(angle) * speed,
                    timer: Timer::from_seconds(0.5, TimerMode::Once),
                },
                Sprite::from_color(color, Vec2::splat(6.0)),
                Transform::from_translation(origin.extend(2.0)),
                DespawnOnExit(Screen::Gameplay),
            ));
        }
    }
}

fn rotate_gun(mut events: MessageReader<SessionEvent>, mut gun: Single<&mut Transform, With<Gun>>) {
    let latest = events
        .read()
        .filter_map(|event| match event {
            SessionEvent::RotationChanged(degrees) => Some(*degrees),
            _ => None,
        })
        .last();
    if let Some(degrees) = latest {
        gun.rotation = gun_rotation(degrees);
    }
}

/// Keep one sprite per projectile still in flight.
fn sync_bullets(
    mut commands: Commands,
    session: Res<Session>,
    mut bullets: Query<(Entity, &Bullet, &mut Transform)>,
) {
    let tunables = session.tunables();
    let projectiles = session.projectiles();

    for (entity, bullet, mut transform) in &mut bullets {
        match projectiles.iter().find(|p| p.id == bullet.id) {
            Some(projectile) => {
                transform.translation = field_to_world(projectile.position, tunables).extend(3.0);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for projectile in projectiles {
        if bullets.iter().any(|(_, bullet, _)| bullet.id == projectile.id) {
            continue;
        }
        commands.spawn((
            Name::new("Bullet"),
            Bullet { id: projectile.id },
            Sprite::from_color(BULLET_COLOR, Vec2::splat(tunables.projectile_size * VIEW_SCALE)),
            Transform::from_translation(field_to_world(projectile.position, tunables).extend(3.0)),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HUD"),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            top: Val::Px(16.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Gameplay),
        children![
            (widget::label(""), HudText::Level),
            (widget::label(""), HudText::Score),
            (widget::label(""), HudText::Timer),
            (widget::label(""), HudText::Ammo),
            (widget::label(""), HudText::Combo),
            (widget::label(""), HudText::Weapon),
        ],
    ));

    commands.spawn((
        Name::new("Round Message"),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            bottom: Val::Px(24.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Gameplay),
        children![(widget::header(""), HudText::Message)],
    ));
}

fn update_hud(session: Res<Session>, mut texts: Query<(&HudText, &mut Text)>) {
    let state = session.state();
    let weapon = session.active_weapon();
    for (kind, mut text) in &mut texts {
        let value = match kind {
            HudText::Level => format!("Level {}/{}", state.level, session.tunables().max_level),
            HudText::Score => format!("Score {}", state.score),
            HudText::Timer => format_time(state.time_left),
            HudText::Ammo => format!("Ammo {}/{}", state.ammo, weapon.max_ammo),
            HudText::Combo => format!("Combo x{}", state.combo_multiplier),
            HudText::Weapon => match state.trial {
                Some(trial) if trial.active => format!("{} (trial)", weapon.name),
                _ => weapon.name.to_string(),
            },
            HudText::Message => continue,
        };
        if text.0 != value {
            text.0 = value;
        }
    }
}

fn show_round_messages(
    mut events: MessageReader<SessionEvent>,
    mut message: Query<(&HudText, &mut Text, &mut TextColor)>,
) {
    for event in events.read() {
        let SessionEvent::RoundMessage { text, tone } = event else {
            continue;
        };
        for (kind, mut shown, mut color) in &mut message {
            if *kind != HudText::Message {
                continue;
            }
            shown.0.clone_from(text);
            color.0 = match tone {
                MessageTone::Neutral => palette::HEADER_TEXT,
                MessageTone::Good => palette::GOOD_TEXT,
                MessageTone::Bad => palette::BAD_TEXT,
            };
        }
    }
}

/// Pop up combo multipliers and unlocked achievements over the gun.
fn spawn_floating_text(mut commands: Commands, mut events: MessageReader<SessionEvent>) {
    for event in events.read() {
        let (text, color) = match event {
            SessionEvent::ComboChanged { multiplier } if *multiplier > 1 => {
                (format!("x{}!", multiplier), palette::HEADER_TEXT)
            }
            SessionEvent::AchievementUnlocked(id) => (achievement_toast(*id), palette::GOOD_TEXT),
            _ => continue,
        };
        commands.spawn((
            Name::new("Floating Text"),
            FloatingText {
                timer: Timer::from_seconds(1.2, TimerMode::Once),
                start_y: 40.0,
                float_distance: 60.0,
                color,
            },
            Text2d::new(text),
            TextFont::from_font_size(28.0),
            TextColor(color),
            Transform::from_xyz(0.0, 40.0, 10.0),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

fn achievement_toast(id: AchievementId) -> String {
    format!("Achievement: {}", id.info().name)
}

fn animate_shards(
    mut commands: Commands,
    time: Res<Time>,
    mut shards: Query<(Entity, &mut Shard, &mut Transform, &mut Sprite)>,
) {
    for (entity, mut shard, mut transform, mut sprite) in &mut shards {
        shard.timer.tick(time.delta());
        transform.translation += (shard.velocity * time.delta_secs()).extend(0.0);
        sprite.color.set_alpha(1.0 - shard.timer.fraction());
        if shard.timer.just_finished() {
            commands.entity(entity).despawn();
        }
    }
}

/// Float upward and fade out over the last 30%.
fn animate_floating_text(
    mut commands: Commands,
    time: Res<Time>,
    mut texts: Query<(Entity, &mut FloatingText, &mut Transform, &mut TextColor)>,
) {
    for (entity, mut floating, mut transform, mut color) in &mut texts {
        floating.timer.tick(time.delta());
        let progress = floating.timer.fraction();

        transform.translation.y = floating.start_y + floating.float_distance * progress;

        let alpha = if progress > 0.7 {
            1.0 - (progress - 0.7) / 0.3
        } else {
            1.0
        };
        color.0 = floating.color.with_alpha(alpha);

        if floating.timer.just_finished() {
            commands.entity(entity).despawn();
        }
    }
}
