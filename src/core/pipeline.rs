// Pointer pipeline: drives the gesture tracker from a sample source and
// hands events to the transport sink

use crate::core::config::TrackerConfig;
use crate::core::gesture::GestureTracker;
use crate::core::transport::EventSink;
use crate::models::event::PointerState;
use crate::models::sample::{PointerSource, Sample};
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

/// Capability interface for the upstream keypoint detector. `None` means
/// the source closed (camera unbound, detector shut down); samples must
/// be delivered in timestamp order.
#[async_trait]
pub trait SampleSource: Send {
    async fn next_sample(&mut self) -> Option<Sample>;
}

/// Sequentially feeds samples through the tracker. One logical writer:
/// the tracker state is owned here and never shared, so no locking is
/// needed around it. The overlay watches pointer updates; the sink gets
/// the events.
pub struct PointerPipeline {
    tracker: GestureTracker,
    pointer_tx: watch::Sender<PointerState>,
}

impl PointerPipeline {
    pub fn new(config: TrackerConfig, source: PointerSource) -> Self {
        let (pointer_tx, _) = watch::channel(PointerState::default());
        Self {
            tracker: GestureTracker::new(config, source),
            pointer_tx,
        }
    }

    /// Receiver for the always-current pointer position (display overlay)
    pub fn pointer(&self) -> watch::Receiver<PointerState> {
        self.pointer_tx.subscribe()
    }

    /// Run until the sample source closes. Cancellation is the source's
    /// concern: closing it unblocks the pending read and ends the loop.
    pub async fn run<S: SampleSource>(mut self, mut source: S, sink: &dyn EventSink) {
        while let Some(sample) = source.next_sample().await {
            let output = self.tracker.step(&sample);

            // Overlay update is best-effort; no receiver is fine
            let _ = self.pointer_tx.send(output.pointer);

            if let Some(event) = output.event {
                sink.send(&event).await;
            }
        }
        debug!("sample source closed, pipeline stopped");
    }
}
