use bevy::prelude::*;

/// Off-white text for the dark field
pub const LABEL_TEXT: Color = Color::srgb(0.92, 0.90, 0.85);

/// Warm yellow for headers
pub const HEADER_TEXT: Color = Color::srgb(1.0, 0.85, 0.3);

/// Off-white text for buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.96, 0.95, 0.92);
/// #8c3b2e
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.549, 0.231, 0.180);
/// #b04e3c
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.690, 0.306, 0.235);
/// #5e271f
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.369, 0.153, 0.122);

/// Dimmed backdrop behind overlay menus
pub const OVERLAY_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.75);

/// Round message tones
pub const GOOD_TEXT: Color = Color::srgb(0.4, 0.9, 0.4);
pub const BAD_TEXT: Color = Color::srgb(0.95, 0.35, 0.3);
