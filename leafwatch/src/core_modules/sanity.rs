// THEORY:
// The sanity filter is a cheap gate in front of everything else. A frame with
// almost no variance (a lens cap, an all-white export, a decoding accident) has
// nothing to say about vegetation, and every downstream ratio on it is either
// meaningless or degenerate. Rejecting it here means the vegetation scorer never
// has to handle uniform input.

use crate::core_modules::frame::frame::Frame;
use crate::error::{LeafwatchError, Result};

/// Frames whose pooled channel std-dev is below this are treated as blank.
pub const BLANK_STD_DEV_THRESHOLD: f64 = 5.0;

fn is_blank_std_dev(std_dev: f64) -> bool {
    std_dev < BLANK_STD_DEV_THRESHOLD
}

pub fn is_blank(frame: &Frame) -> bool {
    is_blank_std_dev(frame.std_dev())
}

/// Passes the frame through, or fails with `BlankImage`.
pub fn check_frame(frame: &Frame) -> Result<()> {
    let std_dev = frame.std_dev();
    if is_blank_std_dev(std_dev) {
        return Err(LeafwatchError::BlankImage { std_dev });
    }
    Ok(())
}
