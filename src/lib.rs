//! handpad: hand-gesture pointer core.
//!
//! Converts a noisy per-frame stream of 2D hand-keypoint samples into a
//! stable pointer position plus debounced interaction events (tap,
//! hold/drag, release, secondary action), serialized as JSON datagrams
//! for a remote consumer. A companion demuxer extracts still frames from
//! a live MJPEG byte stream so the same pointer can be drawn over the
//! same video on screen.
//!
//! Camera acquisition, the keypoint model, and rendering are external:
//! they feed the pipeline through the [`core::pipeline::SampleSource`]
//! trait and consume its output through [`core::transport::EventSink`]
//! and the frame/pointer watch channels.

pub mod core;
pub mod models;

pub use crate::core::config::TrackerConfig;
pub use crate::core::demux::{DemuxError, FrameDemuxer};
pub use crate::core::gesture::{GestureTracker, StepOutput};
pub use crate::core::pipeline::{PointerPipeline, SampleSource};
pub use crate::core::stream::MjpegStream;
pub use crate::core::transport::{EventSink, UdpEventSink};
pub use crate::models::event::{GestureKind, OutputEvent, PointerState};
pub use crate::models::pairing::{parse_pairing, PairingConfig};
pub use crate::models::sample::{Keypoint, PointerSource, Sample};
