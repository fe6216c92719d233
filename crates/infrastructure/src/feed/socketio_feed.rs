use async_trait::async_trait;
use domain::{FeedError, FeedEvent, StateFeed, StateSubscription};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{Instant, sleep_until};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use super::engineio::{EngineIoVersion, EnginePacket, OpenInfo, SocketPacket, encode_event};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Event carrying the player state
pub const PUSH_STATE_EVENT: &str = "pushState";
/// Event asking the server to push the current state
pub const GET_STATE_EVENT: &str = "getState";

/// Socket.IO push-state feed over the websocket transport
#[derive(Debug, Clone)]
pub struct SocketIoFeed {
    endpoint: String,
    ws_url: String,
    version: EngineIoVersion,
    request_state: bool,
}

impl SocketIoFeed {
    pub fn new(endpoint: &str, version: EngineIoVersion, request_state: bool) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ws_url: websocket_url(endpoint, version),
            version,
            request_state,
        }
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    async fn handshake(&self, ws: &mut WsStream) -> Result<OpenInfo, FeedError> {
        let open = loop {
            match read_packet(ws).await? {
                EnginePacket::Open(open) => break open,
                EnginePacket::Noop => continue,
                other => {
                    return Err(FeedError::Protocol(format!(
                        "expected open packet, got {other:?}"
                    )));
                }
            }
        };
        debug!(sid = %open.sid, ping_interval = open.ping_interval, "Engine.IO session opened");

        if self.version == EngineIoVersion::V4 {
            send_text(ws, EnginePacket::Message(SocketPacket::Connect(None)).encode()).await?;
            loop {
                match read_packet(ws).await? {
                    EnginePacket::Message(SocketPacket::Connect(_)) => break,
                    EnginePacket::Message(SocketPacket::ConnectError(data)) => {
                        return Err(FeedError::Connect(format!("namespace refused: {data}")));
                    }
                    EnginePacket::Ping(data) => {
                        send_text(ws, EnginePacket::Pong(data).encode()).await?
                    }
                    EnginePacket::Close => {
                        return Err(FeedError::Closed("server closed during handshake".into()));
                    }
                    _ => {}
                }
            }
        }

        if self.request_state {
            send_text(ws, encode_event(GET_STATE_EVENT, vec![])).await?;
        }

        Ok(open)
    }
}

#[async_trait]
impl StateFeed for SocketIoFeed {
    async fn subscribe(&self) -> Result<Box<dyn StateSubscription>, FeedError> {
        let (mut ws, _response) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| FeedError::Connect(e.to_string()))?;

        let open = match self.handshake(&mut ws).await {
            Ok(open) => open,
            Err(e) => {
                let _ = ws.close(None).await;
                return Err(e);
            }
        };

        info!(endpoint = %self.endpoint, sid = %open.sid, "Socket.IO session established");
        Ok(Box::new(SocketIoSubscription::new(ws, self.version, &open)))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// One live Socket.IO session
pub struct SocketIoSubscription {
    ws: WsStream,
    version: EngineIoVersion,
    ping_interval: Duration,
    liveness_window: Duration,
    next_ping: Instant,
    deadline: Instant,
    closed: bool,
}

impl SocketIoSubscription {
    fn new(ws: WsStream, version: EngineIoVersion, open: &OpenInfo) -> Self {
        let ping_interval = Duration::from_millis(open.ping_interval);
        let liveness_window = ping_interval + Duration::from_millis(open.ping_timeout);
        let now = Instant::now();
        Self {
            ws,
            version,
            ping_interval,
            liveness_window,
            next_ping: now + ping_interval,
            deadline: now + liveness_window,
            closed: false,
        }
    }

    fn drop_with(&mut self, reason: &str) -> FeedEvent {
        self.closed = true;
        FeedEvent::Disconnected(reason.to_string())
    }

    /// Handle one text frame; returns an event when the caller should see one
    async fn handle_text(&mut self, text: &str) -> Option<FeedEvent> {
        let packet = match EnginePacket::parse(text) {
            Ok(packet) => packet,
            Err(e) => {
                debug!(error = %e, "Ignoring malformed Socket.IO frame");
                return None;
            }
        };

        match packet {
            EnginePacket::Ping(data) => {
                if let Err(e) = send_text(&mut self.ws, EnginePacket::Pong(data).encode()).await {
                    warn!(error = %e, "Failed to answer heartbeat");
                    return Some(self.drop_with("transport error"));
                }
                None
            }
            EnginePacket::Message(SocketPacket::Event { name, args }) if name == PUSH_STATE_EVENT => {
                args.into_iter().next().map(FeedEvent::Snapshot)
            }
            EnginePacket::Message(SocketPacket::Disconnect) => {
                Some(self.drop_with("io server disconnect"))
            }
            EnginePacket::Close => Some(self.drop_with("transport close")),
            _ => None,
        }
    }
}

#[async_trait]
impl StateSubscription for SocketIoSubscription {
    async fn next_event(&mut self) -> FeedEvent {
        loop {
            if self.closed {
                return FeedEvent::Disconnected("io client disconnect".to_string());
            }

            let client_heartbeat = self.version == EngineIoVersion::V3;

            tokio::select! {
                frame = self.ws.next() => {
                    self.deadline = Instant::now() + self.liveness_window;
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(event) = self.handle_text(text.as_str()).await {
                                return event;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            return self.drop_with("transport close");
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            debug!(error = %e, "Websocket read failed");
                            return self.drop_with("transport error");
                        }
                    }
                }
                _ = sleep_until(self.next_ping), if client_heartbeat => {
                    self.next_ping += self.ping_interval;
                    if let Err(e) = send_text(&mut self.ws, EnginePacket::Ping(String::new()).encode()).await {
                        debug!(error = %e, "Heartbeat send failed");
                        return self.drop_with("transport error");
                    }
                }
                _ = sleep_until(self.deadline) => {
                    return self.drop_with("ping timeout");
                }
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = send_text(
            &mut self.ws,
            EnginePacket::Message(SocketPacket::Disconnect).encode(),
        )
        .await;
        let _ = self.ws.close(None).await;
    }
}

async fn read_packet(ws: &mut WsStream) -> Result<EnginePacket, FeedError> {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return EnginePacket::parse(text.as_str()),
            Some(Ok(Message::Close(_))) | None => {
                return Err(FeedError::Closed("transport close".to_string()));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(FeedError::Connect(e.to_string())),
        }
    }
}

async fn send_text(ws: &mut WsStream, text: String) -> Result<(), FeedError> {
    ws.send(Message::text(text))
        .await
        .map_err(|e| FeedError::Closed(e.to_string()))
}

/// Derive the websocket transport URL from an HTTP(S) or WS(S) endpoint
pub fn websocket_url(endpoint: &str, version: EngineIoVersion) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    let base = if let Some(rest) = trimmed.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if trimmed.starts_with("ws://") || trimmed.starts_with("wss://") {
        trimmed.to_string()
    } else {
        format!("ws://{trimmed}")
    };

    format!(
        "{base}/socket.io/?EIO={}&transport=websocket",
        version.as_number()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url() {
        assert_eq!(
            websocket_url("http://localhost:3000", EngineIoVersion::V3),
            "ws://localhost:3000/socket.io/?EIO=3&transport=websocket"
        );
        assert_eq!(
            websocket_url("https://volumio.local/", EngineIoVersion::V4),
            "wss://volumio.local/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            websocket_url("ws://10.0.0.5:3000", EngineIoVersion::V4),
            "ws://10.0.0.5:3000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            websocket_url("volumio.local:3000", EngineIoVersion::V3),
            "ws://volumio.local:3000/socket.io/?EIO=3&transport=websocket"
        );
    }
}
