//! The settings menu: volume, mute and language.

use bevy::{
    ecs::{spawn::SpawnWith, system::IntoObserverSystem},
    input::common_conditions::input_just_pressed,
    prelude::*,
};

use crate::{
    game::{
        Session,
        profile::{AudioSettings, Language},
    },
    menus::Menu,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<SettingsLabel>();

    app.add_systems(OnEnter(Menu::Settings), spawn_settings_menu);
    app.add_systems(
        Update,
        (
            go_back.run_if(input_just_pressed(KeyCode::Escape)),
            update_settings_labels,
        )
            .run_if(in_state(Menu::Settings)),
    );
}

const VOLUME_STEP: f32 = 0.1;

#[derive(Component, Reflect, Clone, Copy, PartialEq, Eq, Debug)]
#[reflect(Component)]
enum SettingsLabel {
    Master,
    Music,
    Sfx,
    Sound,
    Language,
}

fn spawn_settings_menu(mut commands: Commands) {
    commands.spawn((
        widget::overlay_root("Settings Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Settings),
        Children::spawn(SpawnWith(|parent: &mut ChildSpawner| {
            parent.spawn(widget::header("Settings"));
            volume_row(parent, SettingsLabel::Master, lower_master, raise_master);
            volume_row(parent, SettingsLabel::Music, lower_music, raise_music);
            volume_row(parent, SettingsLabel::Sfx, lower_sfx, raise_sfx);
            parent.spawn((widget::label(""), SettingsLabel::Sound));
            parent.spawn(widget::button("Toggle sound", toggle_mute));
            parent.spawn((widget::label(""), SettingsLabel::Language));
            parent.spawn(widget::button("Change language", cycle_language));
            parent.spawn(widget::button("Back", go_back_on_click));
        })),
    ));
}

fn volume_row<M1, M2>(
    parent: &mut ChildSpawner,
    label: SettingsLabel,
    lower: impl IntoObserverSystem<Pointer<Click>, (), M1>,
    raise: impl IntoObserverSystem<Pointer<Click>, (), M2>,
) {
    parent.spawn((
        Name::new("Volume Row"),
        Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: Val::Px(15.0),
            ..default()
        },
        children![
            widget::button_small("-", lower),
            (
                widget::label(""),
                label,
                Node {
                    width: Val::Px(200.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
            ),
            widget::button_small("+", raise),
        ],
    ));
}

fn step(volume: f32, delta: f32) -> f32 {
    ((volume + delta) * 10.0).round() / 10.0
}

fn change_audio(session: &mut Session, change: impl FnOnce(&mut AudioSettings)) {
    let mut audio = session.profile().audio;
    change(&mut audio);
    session.set_audio_settings(AudioSettings::new(
        audio.master_volume,
        audio.music_volume,
        audio.sfx_volume,
        audio.muted,
    ));
}

fn lower_master(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    change_audio(&mut session, |audio| audio.master_volume = step(audio.master_volume, -VOLUME_STEP));
}

fn raise_master(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    change_audio(&mut session, |audio| audio.master_volume = step(audio.master_volume, VOLUME_STEP));
}

fn lower_music(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    change_audio(&mut session, |audio| audio.music_volume = step(audio.music_volume, -VOLUME_STEP));
}

fn raise_music(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    change_audio(&mut session, |audio| audio.music_volume = step(audio.music_volume, VOLUME_STEP));
}

fn lower_sfx(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    change_audio(&mut session, |audio| audio.sfx_volume = step(audio.sfx_volume, -VOLUME_STEP));
}

fn raise_sfx(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    change_audio(&mut session, |audio| audio.sfx_volume = step(audio.sfx_volume, VOLUME_STEP));
}

fn toggle_mute(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    change_audio(&mut session, |audio| audio.muted = !audio.muted);
}

fn cycle_language(_: On<Pointer<Click>>, mut session: ResMut<Session>) {
    let next = match session.profile().language {
        Language::En => Language::Tr,
        Language::Tr => Language::Ru,
        Language::Ru => Language::En,
    };
    session.set_language(next);
}

fn update_settings_labels(session: Res<Session>, mut labels: Query<(&SettingsLabel, &mut Text)>) {
    let profile = session.profile();
    let audio = profile.audio;
    for (label, mut text) in &mut labels {
        let value = match label {
            SettingsLabel::Master => format!("Master {:3.0}%", audio.master_volume * 100.0),
            SettingsLabel::Music => format!("Music {:3.0}%", audio.music_volume * 100.0),
            SettingsLabel::Sfx => format!("Effects {:3.0}%", audio.sfx_volume * 100.0),
            SettingsLabel::Sound => {
                format!("Sound: {}", if audio.muted { "off" } else { "on" })
            }
            SettingsLabel::Language => {
                format!("Language: {}", profile.language.code().to_uppercase())
            }
        };
        if text.0 != value {
            text.0 = value;
        }
    }
}

fn go_back_on_click(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}

fn go_back(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}
