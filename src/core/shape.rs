// Hand-shape classification: per-sample finger-extension predicates

use crate::core::geometry::finger_extended;
use crate::models::sample::{HandLandmark, Keypoint};

/// Boolean shape predicates for one sample. Recomputed fresh every sample;
/// nothing here persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeFlags {
    pub index_extended: bool,
    pub middle_extended: bool,
    pub ring_extended: bool,
    pub pinky_extended: bool,
}

impl ShapeFlags {
    pub fn open_palm(&self) -> bool {
        self.index_extended && self.middle_extended && self.ring_extended && self.pinky_extended
    }

    pub fn v_sign(&self) -> bool {
        self.index_extended && self.middle_extended && !self.ring_extended && !self.pinky_extended
    }
}

/// Derive shape flags from a complete landmark set.
///
/// `keypoints` must hold at least [`KEYPOINT_COUNT`] points, as
/// guaranteed by [`Sample::hand`]; shorter slices panic.
///
/// [`KEYPOINT_COUNT`]: crate::models::sample::KEYPOINT_COUNT
/// [`Sample::hand`]: crate::models::sample::Sample::hand
pub fn classify(keypoints: &[Keypoint]) -> ShapeFlags {
    let wrist = keypoints[HandLandmark::Wrist.index()];

    let test = |pip: HandLandmark, tip: HandLandmark| {
        finger_extended(wrist, keypoints[pip.index()], keypoints[tip.index()])
    };

    ShapeFlags {
        index_extended: test(HandLandmark::IndexFingerPip, HandLandmark::IndexFingerTip),
        middle_extended: test(HandLandmark::MiddleFingerPip, HandLandmark::MiddleFingerTip),
        ring_extended: test(HandLandmark::RingFingerPip, HandLandmark::RingFingerTip),
        pinky_extended: test(HandLandmark::PinkyPip, HandLandmark::PinkyTip),
    }
}

/// Rolling open-palm run counter. A single spurious open-palm frame must
/// not unlock pointer movement; the palm counts as stable only after the
/// configured number of consecutive samples.
#[derive(Debug, Clone)]
pub struct PalmStabilizer {
    required: u32,
    run: u32,
}

impl PalmStabilizer {
    pub fn new(required_frames: u32) -> Self {
        Self {
            required: required_frames,
            run: 0,
        }
    }

    /// Feed one sample's open-palm flag; returns whether the palm is stable
    pub fn update(&mut self, open_palm: bool) -> bool {
        if open_palm {
            self.run = self.run.saturating_add(1);
        } else {
            self.run = 0;
        }
        self.run >= self.required
    }
}
