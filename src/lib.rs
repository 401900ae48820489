//! SpinShot Fury: a rotating gun, a ring of bottles and a ticking clock.
//!
//! [`AppPlugin`] builds the full windowed game. [`configure_headless`]
//! installs only the game core and its adapters, which is what the
//! integration tests in `tests/` run against.

mod audio;
pub mod game;
mod menus;
pub mod persistence;
pub mod platform;
mod screens;
mod theme;

use bevy::{asset::AssetMetaCheck, prelude::*};

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        // Add Bevy plugins.
        app.add_plugins(
            DefaultPlugins
                .set(AssetPlugin {
                    // Wasm builds will check for meta files (that don't exist) if this isn't set.
                    // This causes errors and even panics on web build on itch.
                    // See https://github.com/bevyengine/bevy_github_ci_template/issues/48.
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "SpinShot Fury".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }
                    .into(),
                    ..default()
                }),
        );

        configure_headless(app);

        // Add presentation plugins.
        app.add_plugins((
            audio::plugin,
            game::view::plugin,
            menus::plugin,
            screens::plugin,
            theme::plugin,
        ));

        // Spawn the main camera.
        app.add_systems(Startup, spawn_camera);
    }
}

/// Install the game core, persistence and the platform adapter without any
/// window, renderer or audio.
pub fn configure_headless(app: &mut App) {
    // Order new `AppSystems` variants by adding them here:
    app.configure_sets(
        Update,
        (
            AppSystems::TickTimers,
            AppSystems::RecordInput,
            AppSystems::Publish,
            AppSystems::Update,
        )
            .chain(),
    );

    app.add_plugins((game::plugin, persistence::plugin, platform::plugin));
}

/// High-level groupings of systems for the app in the `Update` schedule.
/// When adding a new variant, make sure to order it in the `configure_sets`
/// call above.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AppSystems {
    /// Advance the session clock and frame loops.
    TickTimers,
    /// Record player input.
    RecordInput,
    /// Publish what the session reported this frame.
    Publish,
    /// Do everything else (consider splitting this into further variants).
    Update,
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Camera"), Camera2d));
}
