// Data models for hand-keypoint samples

use serde::{Deserialize, Serialize};

/// Number of landmarks in the fixed hand topology
pub const KEYPOINT_COUNT: usize = 21;

/// A normalized 2D landmark position on the tracked hand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32, // Normalized [0, 1] image coordinates
    pub y: f32, // Normalized [0, 1] image coordinates
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Hand landmark indices (21 total, fixed topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One detector output: a monotonic timestamp plus zero-or-one hand's
/// keypoints. `None` (or fewer than 21 points) means "hand not detected".
#[derive(Debug, Clone)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub keypoints: Option<Vec<Keypoint>>,
}

impl Sample {
    pub fn new(timestamp_ms: i64, keypoints: Option<Vec<Keypoint>>) -> Self {
        Self {
            timestamp_ms,
            keypoints,
        }
    }

    /// Timestamp-only sample with no detection
    pub fn empty(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            keypoints: None,
        }
    }

    /// Keypoints if the sample carries a complete hand, otherwise None
    pub fn hand(&self) -> Option<&[Keypoint]> {
        match &self.keypoints {
            Some(points) if points.len() >= KEYPOINT_COUNT => Some(points.as_slice()),
            _ => None,
        }
    }
}

/// Which landmark drives the pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerSource {
    IndexTip,
    PalmCenter,
}

impl PointerSource {
    /// Pick the raw pointer coordinate from a complete landmark set.
    ///
    /// `keypoints` must hold at least [`KEYPOINT_COUNT`] points, as
    /// guaranteed by [`Sample::hand`]; shorter slices panic.
    pub fn pick(&self, keypoints: &[Keypoint]) -> (f32, f32) {
        match self {
            PointerSource::IndexTip => {
                let tip = keypoints[HandLandmark::IndexFingerTip.index()];
                (tip.x, tip.y)
            }
            PointerSource::PalmCenter => {
                // Wrist plus the four finger MCP joints
                let ids = [
                    HandLandmark::Wrist,
                    HandLandmark::IndexFingerMcp,
                    HandLandmark::MiddleFingerMcp,
                    HandLandmark::RingFingerMcp,
                    HandLandmark::PinkyMcp,
                ];
                let mut sx = 0.0;
                let mut sy = 0.0;
                for id in ids {
                    sx += keypoints[id.index()].x;
                    sy += keypoints[id.index()].y;
                }
                (sx / ids.len() as f32, sy / ids.len() as f32)
            }
        }
    }
}
