use bevy::{audio::Volume, prelude::*};

use crate::{
    AppSystems,
    game::{
        Session, SessionEvent,
        events::{EffectKind, MusicContext, ProgressField},
    },
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Music>();
    app.register_type::<SoundEffect>();

    app.add_systems(Startup, load_audio_assets);
    app.add_systems(
        Update,
        (play_session_audio, apply_volume_settings).in_set(AppSystems::Update),
    );
}

/// An organizational marker component that should be added to a spawned [`AudioPlayer`] if it's in the
/// general "music" category (e.g. global background music, soundtrack).
///
/// This can then be used to query for and operate on sounds in that category.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct Music;

/// A music audio instance.
pub fn music(handle: Handle<AudioSource>, gain: f32) -> impl Bundle {
    (
        AudioPlayer(handle),
        PlaybackSettings::LOOP.with_volume(Volume::Linear(gain)),
        Music,
    )
}

/// An organizational marker component that should be added to a spawned [`AudioPlayer`] if it's in the
/// general "sound effect" category (e.g. footsteps, the sound of a magic spell, a door opening).
///
/// This can then be used to query for and operate on sounds in that category.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct SoundEffect;

/// A sound effect audio instance.
pub fn sound_effect(handle: Handle<AudioSource>, gain: f32) -> impl Bundle {
    (
        AudioPlayer(handle),
        PlaybackSettings::DESPAWN.with_volume(Volume::Linear(gain)),
        SoundEffect,
    )
}

#[derive(Resource)]
struct AudioAssets {
    gunshot: Handle<AudioSource>,
    bottle_break: Handle<AudioSource>,
    menu_music: Handle<AudioSource>,
    game_music: Handle<AudioSource>,
}

fn load_audio_assets(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(AudioAssets {
        gunshot: asset_server.load("audio/sound_effects/gunshot.ogg"),
        bottle_break: asset_server.load("audio/sound_effects/bottle_break.ogg"),
        menu_music: asset_server.load("audio/music/menu.ogg"),
        game_music: asset_server.load("audio/music/game.ogg"),
    });
}

fn play_session_audio(
    mut commands: Commands,
    mut events: MessageReader<SessionEvent>,
    session: Res<Session>,
    assets: Res<AudioAssets>,
    playing_music: Query<Entity, With<Music>>,
    mut current_music: Local<Option<MusicContext>>,
) {
    let audio = session.profile().audio;
    let mut next_music = None;
    for event in events.read() {
        match event {
            SessionEvent::PlayEffect(effect) => {
                let handle = match effect {
                    EffectKind::Gunshot => assets.gunshot.clone(),
                    EffectKind::Break => assets.bottle_break.clone(),
                };
                commands.spawn((Name::new("Sound Effect"), sound_effect(handle, audio.sfx_gain())));
            }
            SessionEvent::Music(context) => next_music = Some(*context),
            _ => {}
        }
    }

    // Only the last music change of the frame matters.
    let Some(context) = next_music else {
        return;
    };
    if *current_music == Some(context) {
        return;
    }
    *current_music = Some(context);
    for entity in &playing_music {
        commands.entity(entity).despawn();
    }
    let handle = match context {
        MusicContext::Menu => assets.menu_music.clone(),
        MusicContext::Game => assets.game_music.clone(),
        MusicContext::Stopped => return,
    };
    commands.spawn((Name::new("Music"), music(handle, audio.music_gain())));
}

/// Re-apply the player's volume to everything already playing.
fn apply_volume_settings(
    mut events: MessageReader<SessionEvent>,
    session: Res<Session>,
    mut sinks: Query<(&mut AudioSink, Has<Music>)>,
) {
    let changed = events
        .read()
        .filter(|event| **event == SessionEvent::ProgressChanged(ProgressField::Audio))
        .count();
    if changed == 0 {
        return;
    }

    let audio = session.profile().audio;
    for (mut sink, is_music) in &mut sinks {
        let gain = if is_music {
            audio.music_gain()
        } else {
            audio.sfx_gain()
        };
        sink.set_volume(Volume::Linear(gain));
    }
}
