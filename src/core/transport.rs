// UDP transport boundary: fire-and-forget event delivery

use crate::models::event::{InputMessage, OutputEvent};
use crate::models::pairing::PairingConfig;
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::RwLock;
use tracing::debug;

/// Where the tracker hands off its events. Best-effort: implementations
/// never block on delivery and never surface transport failures to the
/// state machine.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, event: &OutputEvent);
}

/// Error types for transport setup
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to bind UDP socket: {0}")]
    Bind(#[from] std::io::Error),

    #[error("invalid pairing endpoint {0}")]
    InvalidEndpoint(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Sends each event as one self-contained JSON datagram to the paired PC.
/// The target is swappable at runtime (re-pairing); send failures are
/// logged and swallowed, and a dropped heartbeat self-corrects at the
/// next tick.
pub struct UdpEventSink {
    socket: UdpSocket,
    target: RwLock<SocketAddr>,
}

impl UdpEventSink {
    pub async fn new(pairing: &PairingConfig) -> TransportResult<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let target = Self::resolve(pairing).await?;
        Ok(Self {
            socket,
            target: RwLock::new(target),
        })
    }

    /// Point the sink at a new pairing (validity is the caller's
    /// precondition)
    pub async fn set_target(&self, pairing: &PairingConfig) -> TransportResult<()> {
        let target = Self::resolve(pairing).await?;
        *self.target.write().await = target;
        Ok(())
    }

    async fn resolve(pairing: &PairingConfig) -> TransportResult<SocketAddr> {
        let endpoint = format!("{}:{}", pairing.host, pairing.control_port);
        let first = tokio::net::lookup_host(&endpoint)
            .await
            .map_err(|_| TransportError::InvalidEndpoint(endpoint.clone()))?
            .next();
        first.ok_or(TransportError::InvalidEndpoint(endpoint))
    }
}

#[async_trait]
impl EventSink for UdpEventSink {
    async fn send(&self, event: &OutputEvent) {
        let message = InputMessage::from_event(event);
        let payload = match serde_json::to_vec(&message) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "failed to encode event, dropping");
                return;
            }
        };

        let target = *self.target.read().await;
        if let Err(e) = self.socket.send_to(&payload, target).await {
            debug!(error = %e, %target, "event send failed, dropping");
        }
    }
}
