// Shared landmark math for the pointer filter and shape predicates

use crate::models::sample::Keypoint;

/// A fingertip must be this much farther from the wrist than its pip
/// joint to count as extended. Tuned against real detector output.
const EXTENSION_RATIO: f32 = 1.08;

pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Normalize `v` into [0, 1] over the span `[lo, hi]`, clamped
pub fn remap(v: f32, lo: f32, hi: f32) -> f32 {
    clamp01((v - lo) / (hi - lo))
}

pub fn dist(a: Keypoint, b: Keypoint) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// A finger counts as extended when its tip sits meaningfully farther
/// from the wrist than its pip joint does.
pub fn finger_extended(wrist: Keypoint, pip: Keypoint, tip: Keypoint) -> bool {
    dist(wrist, tip) > dist(wrist, pip) * EXTENSION_RATIO
}
