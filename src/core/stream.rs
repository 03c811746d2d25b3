// Live MJPEG stream: connects to the paired PC and publishes decoded
// frames to the display sink

use crate::core::demux::{DemuxError, FrameDemuxer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// One complete encoded image, ownership handed to the display sink
pub type Frame = Arc<Vec<u8>>;

/// Error types for the stream connection
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("stream returned HTTP {0}")]
    BadStatus(u16),

    #[error("stream task terminated before connecting")]
    TaskFailed,
}

pub type StreamResult<T> = Result<T, StreamError>;

/// Handle to a running MJPEG read loop.
///
/// The blocking HTTP read runs on a dedicated blocking task; completed
/// frames go into a `watch` channel, so a slow consumer only ever sees
/// the most recently completed frame and older frames are dropped.
/// Stream errors and end-of-stream both terminate the loop; the caller
/// owns any reconnect policy.
pub struct MjpegStream {
    frame_rx: watch::Receiver<Option<Frame>>,
    stop: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<()>,
}

impl MjpegStream {
    /// Connect to `url` and start demuxing frames
    pub async fn connect(url: String, max_frame_bytes: usize) -> StreamResult<Self> {
        let (frame_tx, frame_rx) = watch::channel(None);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        // Connection setup is also blocking; do the whole lifecycle on the
        // blocking pool and report the connect result back once.
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let task = tokio::task::spawn_blocking(move || {
            let connected = connect_blocking(&url);
            let response = match connected {
                Ok(response) => {
                    let _ = ready_tx.send(Ok(()));
                    response
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            read_loop(response, frame_tx, stop_flag, max_frame_bytes, &url);
        });

        match ready_rx.await {
            Ok(Ok(())) => Ok(Self {
                frame_rx,
                stop,
                task,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(StreamError::TaskFailed),
        }
    }

    /// Receiver for the most recent frame; `None` until the first frame
    /// arrives
    pub fn frames(&self) -> watch::Receiver<Option<Frame>> {
        self.frame_rx.clone()
    }

    /// Request shutdown. Idempotent; the loop exits at the next frame
    /// boundary (or when the connection closes underneath it).
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stop and wait for the read loop to finish
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }
}

fn connect_blocking(url: &str) -> StreamResult<reqwest::blocking::Response> {
    // The stream is continuous; only the connect phase gets a timeout
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(None)
        .build()
        .map_err(|source| StreamError::Connect {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|source| StreamError::Connect {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(StreamError::BadStatus(response.status().as_u16()));
    }
    Ok(response)
}

fn read_loop(
    response: reqwest::blocking::Response,
    frame_tx: watch::Sender<Option<Frame>>,
    stop: Arc<AtomicBool>,
    max_frame_bytes: usize,
    url: &str,
) {
    let mut demuxer = FrameDemuxer::new(response, max_frame_bytes);
    debug!(url, "mjpeg stream connected");

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        match demuxer.next_frame() {
            Ok(Some(frame)) => {
                // watch keeps only the latest value: built-in frame drop
                if frame_tx.send(Some(Arc::new(frame))).is_err() {
                    break; // every receiver is gone
                }
            }
            Ok(None) => {
                debug!(url, "mjpeg stream ended");
                break;
            }
            Err(DemuxError::FrameTooLarge { limit }) => {
                warn!(url, limit, "mjpeg frame exceeded bound, closing stream");
                break;
            }
            Err(DemuxError::Io(e)) => {
                debug!(url, error = %e, "mjpeg stream read failed");
                break;
            }
        }
    }
}
