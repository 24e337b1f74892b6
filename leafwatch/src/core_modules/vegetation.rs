// THEORY:
// The vegetation scorer turns a normalized frame into two numbers:
//
// 1.  **RGVI**: the mean red-green vegetation index over the *enhanced* frame.
//     Enhancement (see `Pixel::enhanced`) boosts green and damps red and blue,
//     so the index is computed on an image where foliage dominates. The result
//     lies in [-1, 1]; healthy leaves sit near the top.
// 2.  **Confidence**: how much green contrast the enhanced frame has. A frame
//     with real leaf structure has a wide spread of green values; a washed-out
//     or nearly uniform one does not. The green std-dev is scaled by 50 and
//     capped at 1.0.
//
// The scorer has no failure modes. Degenerate input has already been rejected
// by the sanity filter, and every formula here is total on bytes.

use crate::core_modules::frame::frame::{ChannelKind, Frame};
use crate::core_modules::pixel::pixel::VegetationIndex;
use serde::Serialize;

/// Green std-dev at which confidence saturates.
pub const CONFIDENCE_STD_DEV_SCALE: f64 = 50.0;

/// The vegetation half of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VegetationReading {
    /// Mean red-green vegetation index of the enhanced frame, in [-1, 1].
    pub rgvi: VegetationIndex,
    /// Contrast-based reliability of `rgvi`, in [0, 1].
    pub confidence: f64,
}

/// Applies the vegetation channel gains to every pixel.
pub fn enhance_vegetation(frame: &Frame) -> Frame {
    frame.map_pixels(|pixel| pixel.enhanced())
}

/// Mean red-green vegetation index of `frame`.
pub fn rgvi(frame: &Frame) -> VegetationIndex {
    if frame.is_empty() {
        return 0.0;
    }
    let total: f64 = frame.pixels.iter().map(|p| p.red_green_index()).sum();
    total / frame.len() as f64
}

/// Green-contrast confidence of `frame`.
pub fn confidence(frame: &Frame) -> f64 {
    (frame.channel_std_dev(ChannelKind::Green) / CONFIDENCE_STD_DEV_SCALE).min(1.0)
}

/// Enhances the frame once and computes both readings from the enhanced copy.
pub fn score(frame: &Frame) -> VegetationReading {
    let enhanced = enhance_vegetation(frame);
    VegetationReading {
        rgvi: rgvi(&enhanced),
        confidence: confidence(&enhanced),
    }
}
