//! The armory: browse weapons, unlock them with wins, equip one or try a
//! locked one for a single game.

use bevy::{ecs::spawn::SpawnWith, input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    game::{Session, armory::WeaponStatus, weapons::WeaponId},
    menus::Menu,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ArmoryCursor>();

    app.add_systems(OnEnter(Menu::Armory), spawn_armory_menu);
    app.add_systems(
        Update,
        (
            go_back.run_if(input_just_pressed(KeyCode::Escape)),
            browse_previous.run_if(input_just_pressed(KeyCode::ArrowLeft)),
            browse_next.run_if(input_just_pressed(KeyCode::ArrowRight)),
            update_armory_text,
        )
            .chain()
            .run_if(in_state(Menu::Armory)),
    );
}

/// Index into [`WeaponId::ALL`] of the weapon on display.
#[derive(Resource, Default)]
struct ArmoryCursor(usize);

impl ArmoryCursor {
    fn weapon(&self) -> WeaponId {
        WeaponId::ALL[self.0 % WeaponId::ALL.len()]
    }

    fn step(&mut self, forward: bool) {
        let count = WeaponId::ALL.len();
        self.0 = if forward {
            (self.0 + 1) % count
        } else {
            (self.0 + count - 1) % count
        };
    }
}

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum ArmoryText {
    Name,
    Details,
    Status,
}

fn spawn_armory_menu(mut commands: Commands) {
    commands.spawn((
        widget::overlay_root("Armory Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Armory),
        Children::spawn(SpawnWith(|parent: &mut ChildSpawner| {
            parent.spawn(widget::header("Armory"));
            parent.spawn((
                Name::new("Weapon Row"),
                Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    column_gap: Val::Px(20.0),
                    ..default()
                },
                children![
                    widget::button_small("<", browse_previous_on_click),
                    (
                        widget::header(""),
                        ArmoryText::Name,
                        Node {
                            width: Val::Px(260.0),
                            justify_content: JustifyContent::Center,
                            ..default()
                        },
                    ),
                    widget::button_small(">", browse_next_on_click),
                ],
            ));
            parent.spawn((widget::label(""), ArmoryText::Details));
            parent.spawn((widget::label(""), ArmoryText::Status));
            parent.spawn(widget::button("Equip", equip_weapon));
            parent.spawn(widget::button("Unlock", unlock_weapon));
            parent.spawn(widget::button("Try with an ad", try_weapon));
            parent.spawn(widget::button("Back", go_back_on_click));
        })),
    ));
}

fn status_text(status: WeaponStatus) -> String {
    match status {
        WeaponStatus::Unlocked { selected: true } => "Equipped".into(),
        WeaponStatus::Unlocked { selected: false } => "Owned".into(),
        WeaponStatus::Trial => "On trial for the next game".into(),
        WeaponStatus::Unlockable => "Ready to unlock!".into(),
        WeaponStatus::Locked {
            required,
            wins,
            wins_needed,
        } => format!(
            "Locked: win {}/{} games with the {}",
            wins,
            wins_needed,
            required.weapon().name
        ),
        WeaponStatus::MasterReward => "Locked: earn every other achievement".into(),
    }
}

fn update_armory_text(
    session: Res<Session>,
    cursor: Res<ArmoryCursor>,
    mut texts: Query<(&ArmoryText, &mut Text)>,
) {
    let id = cursor.weapon();
    let weapon = id.weapon();
    for (kind, mut text) in &mut texts {
        let value = match kind {
            ArmoryText::Name => weapon.name.to_string(),
            ArmoryText::Details => {
                let mut details = format!(
                    "{}\nAmmo {}, spins {:.1} deg per frame",
                    weapon.description, weapon.max_ammo, weapon.rotation_speed
                );
                if let Some(multiplier) = weapon.score_multiplier {
                    details.push_str(&format!(", score x{}", multiplier));
                }
                details
            }
            ArmoryText::Status => status_text(session.weapon_status(id)),
        };
        if text.0 != value {
            text.0 = value;
        }
    }
}

fn browse_previous_on_click(_: On<Pointer<Click>>, mut cursor: ResMut<ArmoryCursor>) {
    cursor.step(false);
}

fn browse_next_on_click(_: On<Pointer<Click>>, mut cursor: ResMut<ArmoryCursor>) {
    cursor.step(true);
}

fn browse_previous(mut cursor: ResMut<ArmoryCursor>) {
    cursor.step(false);
}

fn browse_next(mut cursor: ResMut<ArmoryCursor>) {
    cursor.step(true);
}

fn equip_weapon(_: On<Pointer<Click>>, cursor: Res<ArmoryCursor>, mut session: ResMut<Session>) {
    let id = cursor.weapon();
    if !session.select_weapon(id) {
        debug!("Cannot equip {:?}: not unlocked", id);
    }
}

fn unlock_weapon(_: On<Pointer<Click>>, cursor: Res<ArmoryCursor>, mut session: ResMut<Session>) {
    let id = cursor.weapon();
    if !session.unlock_weapon(id) {
        debug!("Cannot unlock {:?} yet", id);
    }
}

/// The offer itself opens the reward menu.
fn try_weapon(_: On<Pointer<Click>>, cursor: Res<ArmoryCursor>, mut session: ResMut<Session>) {
    let id = cursor.weapon();
    if !session.offer_weapon_trial(id) {
        debug!("No trial available for {:?}", id);
    }
}

fn go_back_on_click(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}

fn go_back(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}
