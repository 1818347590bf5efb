//! Keyboard-layout-group color table.

use crate::error::{KbdError, Result};
use crate::protocol::Rgb;

/// Fixed color per XKB locked group: amber for the first layout, purple
/// for the second, navy for the third.
pub const GROUP_COLORS: [Rgb; 3] = [
    Rgb::new(32, 16, 0),
    Rgb::new(127, 0, 127),
    Rgb::new(0, 0, 128),
];

/// Look up the color for a locked layout group.
///
/// # Errors
/// Returns `UnknownLayoutGroup` for a group outside the table; the server
/// can report more groups than the table covers.
pub fn group_color(group: u8) -> Result<Rgb> {
    GROUP_COLORS
        .get(group as usize)
        .copied()
        .ok_or(KbdError::UnknownLayoutGroup(group))
}
