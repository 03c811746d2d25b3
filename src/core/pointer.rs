// Pointer mapping and smoothing

use crate::core::config::TrackerConfig;
use crate::core::geometry::{clamp01, remap};

/// Maps a raw normalized keypoint into the gain-adjusted active region and
/// smooths it with an exponential moving average plus a deadzone.
///
/// Owns the filter memory; persists across samples and is reset only at
/// construction. Not invoked for samples without a detected hand.
#[derive(Debug, Clone)]
pub struct PointerFilter {
    box_left: f32,
    box_right: f32,
    box_top: f32,
    box_bottom: f32,
    gain: f32,
    alpha: f32,
    deadzone: f32,
    ema_x: f32,
    ema_y: f32,
}

impl PointerFilter {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            box_left: config.box_left,
            box_right: config.box_right,
            box_top: config.box_top,
            box_bottom: config.box_bottom,
            gain: config.gain,
            alpha: config.ema_alpha,
            deadzone: config.deadzone,
            ema_x: 0.5,
            ema_y: 0.5,
        }
    }

    /// Map one raw keypoint position to the filtered pointer position.
    /// Output is always in [0, 1].
    pub fn apply(&mut self, raw_x: f32, raw_y: f32) -> (f32, f32) {
        let (mapped_x, mapped_y) = self.map_to_active_box(clamp01(raw_x), clamp01(raw_y));

        // EMA per axis; deltas inside the deadzone keep the prior value
        let next_x = self.ema_x + (mapped_x - self.ema_x) * self.alpha;
        let next_y = self.ema_y + (mapped_y - self.ema_y) * self.alpha;
        if (next_x - self.ema_x).abs() >= self.deadzone {
            self.ema_x = next_x;
        }
        if (next_y - self.ema_y).abs() >= self.deadzone {
            self.ema_y = next_y;
        }

        (clamp01(self.ema_x), clamp01(self.ema_y))
    }

    /// Remap through the active sub-rectangle, then amplify around center
    fn map_to_active_box(&self, x: f32, y: f32) -> (f32, f32) {
        let x = remap(x, self.box_left, self.box_right);
        let y = remap(y, self.box_top, self.box_bottom);
        let x = clamp01(0.5 + (x - 0.5) * self.gain);
        let y = clamp01(0.5 + (y - 0.5) * self.gain);
        (x, y)
    }
}
