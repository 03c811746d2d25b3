// Output events and the UDP wire message

use serde::{Deserialize, Serialize};

/// Discrete gesture classification carried by an output event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    /// Heartbeat: position only, no gesture
    None,
    /// Quick thumb-middle pinch (left click)
    PinchTap,
    /// Thumb-index pinch held past the drag threshold (button down)
    PinchHold,
    /// Drag pinch released (button up)
    PinchRelease,
    /// V-sign held past the latch threshold (right click)
    RightClick,
}

impl GestureKind {
    /// Stable wire name, matching the remote consumer's protocol
    pub fn wire_name(&self) -> &'static str {
        match self {
            GestureKind::None => "NONE",
            GestureKind::PinchTap => "PINCH_TAP",
            GestureKind::PinchHold => "PINCH_HOLD",
            GestureKind::PinchRelease => "PINCH_RELEASE",
            GestureKind::RightClick => "RIGHT_CLICK",
        }
    }
}

/// Per-sample pointer report for the display overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub tracking: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            tracking: false,
        }
    }
}

/// One event handed to the transport boundary. Transient: constructed,
/// serialized, and dropped; never retained by the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputEvent {
    pub x: f32,
    pub y: f32,
    pub kind: GestureKind,
    pub tracking: bool,
    pub timestamp_ms: i64,
}

/// Wire message sent as one self-contained JSON datagram per event or
/// heartbeat. Field names are fixed by the remote consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub ts: i64,
    #[serde(rename = "pointerX")]
    pub pointer_x: f64,
    #[serde(rename = "pointerY")]
    pub pointer_y: f64,
    pub gesture: String,
    pub tracking: bool,
}

impl InputMessage {
    /// Build the wire record for one event, stamped with wall-clock millis
    pub fn from_event(event: &OutputEvent) -> Self {
        Self {
            message_type: "XR_INPUT".to_string(),
            ts: chrono::Utc::now().timestamp_millis(),
            pointer_x: event.x as f64,
            pointer_y: event.y as f64,
            gesture: event.kind.wire_name().to_string(),
            tracking: event.tracking,
        }
    }
}
