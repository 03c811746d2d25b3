use serde::{Deserialize, Serialize};

/// Tracker tuning parameters.
///
/// Every value here is a hand-tuned calibration constant; they were dialed
/// in against one camera/detector pairing and may need retuning for a
/// different sensor setup. None of them are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Active sub-rectangle of the camera frame the hand moves in
    pub box_left: f32,
    pub box_right: f32,
    pub box_top: f32,
    pub box_bottom: f32,

    /// Motion gain applied around the frame center
    pub gain: f32,
    /// Exponential smoothing factor for the pointer
    pub ema_alpha: f32,
    /// Filtered deltas below this are discarded as keypoint jitter
    pub deadzone: f32,

    /// Minimum interval between heartbeat messages
    pub heartbeat_interval_ms: i64,

    /// Thumb-index pinch enter/exit distances (hysteresis pair)
    pub drag_pinch_on: f32,
    pub drag_pinch_off: f32,
    /// Pinch must be held this long before it becomes a drag
    pub drag_hold_ms: i64,

    /// Thumb-middle pinch enter/exit distances (hysteresis pair)
    pub tap_pinch_on: f32,
    pub tap_pinch_off: f32,
    /// Releases slower than this are not taps
    pub tap_max_ms: i64,

    /// V-sign must be held this long to latch the secondary action
    pub v_sign_hold_ms: i64,

    /// Debounce windows per action class
    pub left_cooldown_ms: i64,
    pub right_cooldown_ms: i64,

    /// Consecutive open-palm samples before pointer movement unlocks
    pub open_stable_frames: u32,

    /// Demuxer frame bound; growth past this is a fatal stream error
    pub max_frame_bytes: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            box_left: 0.18,
            box_right: 0.82,
            box_top: 0.12,
            box_bottom: 0.88,

            gain: 1.05,
            ema_alpha: 0.22,
            deadzone: 0.0035,

            heartbeat_interval_ms: 33,

            drag_pinch_on: 0.052,
            drag_pinch_off: 0.070,
            drag_hold_ms: 260,

            tap_pinch_on: 0.050,
            tap_pinch_off: 0.068,
            tap_max_ms: 190,

            v_sign_hold_ms: 320,

            left_cooldown_ms: 60,
            right_cooldown_ms: 350,

            open_stable_frames: 3,

            max_frame_bytes: 8 * 1024 * 1024,
        }
    }
}

impl TrackerConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.box_left) || !(0.0..=1.0).contains(&self.box_right) {
            return Err(format!(
                "Invalid active box x range: {}..{}. Must lie within 0.0..=1.0",
                self.box_left, self.box_right
            ));
        }
        if self.box_left >= self.box_right {
            return Err(format!(
                "Invalid active box: left {} must be below right {}",
                self.box_left, self.box_right
            ));
        }
        if !(0.0..1.0).contains(&self.box_top) || !(0.0..=1.0).contains(&self.box_bottom) {
            return Err(format!(
                "Invalid active box y range: {}..{}. Must lie within 0.0..=1.0",
                self.box_top, self.box_bottom
            ));
        }
        if self.box_top >= self.box_bottom {
            return Err(format!(
                "Invalid active box: top {} must be above bottom {}",
                self.box_top, self.box_bottom
            ));
        }

        if !(0.0..=1.0).contains(&self.ema_alpha) {
            return Err(format!(
                "Invalid EMA alpha: {}. Must be between 0.0 and 1.0",
                self.ema_alpha
            ));
        }
        if self.gain <= 0.0 {
            return Err(format!("Invalid gain: {}. Must be positive", self.gain));
        }
        if self.deadzone < 0.0 {
            return Err(format!(
                "Invalid deadzone: {}. Must be non-negative",
                self.deadzone
            ));
        }

        // Hysteresis pairs: exit threshold must sit above entry
        if self.drag_pinch_on >= self.drag_pinch_off {
            return Err(format!(
                "Invalid drag pinch thresholds: on {} must be below off {}",
                self.drag_pinch_on, self.drag_pinch_off
            ));
        }
        if self.tap_pinch_on >= self.tap_pinch_off {
            return Err(format!(
                "Invalid tap pinch thresholds: on {} must be below off {}",
                self.tap_pinch_on, self.tap_pinch_off
            ));
        }

        for (name, ms) in [
            ("heartbeat interval", self.heartbeat_interval_ms),
            ("drag hold", self.drag_hold_ms),
            ("tap max", self.tap_max_ms),
            ("v-sign hold", self.v_sign_hold_ms),
        ] {
            if ms <= 0 {
                return Err(format!(
                    "Invalid {} duration: {}ms. Must be positive",
                    name, ms
                ));
            }
        }
        if self.left_cooldown_ms < 0 || self.right_cooldown_ms < 0 {
            return Err("Cooldowns must be non-negative".to_string());
        }

        if self.open_stable_frames == 0 {
            return Err("open_stable_frames must be at least 1".to_string());
        }
        if self.max_frame_bytes == 0 {
            return Err("max_frame_bytes must be positive".to_string());
        }

        Ok(())
    }
}
