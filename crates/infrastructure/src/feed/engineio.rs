//! Engine.IO / Socket.IO text packet codec
//!
//! Only the subset needed by a websocket-only client of the root namespace
//! is implemented: no binary attachments, no polling transport.

use domain::FeedError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineIoVersion {
    /// Socket.IO 2.x servers. The client drives the heartbeat.
    V3,
    /// Socket.IO 3.x/4.x servers. The server drives the heartbeat and the
    /// client must connect to the namespace explicitly.
    V4,
}

impl EngineIoVersion {
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            3 => Some(Self::V3),
            4 => Some(Self::V4),
            _ => None,
        }
    }

    pub fn as_number(&self) -> u8 {
        match self {
            Self::V3 => 3,
            Self::V4 => 4,
        }
    }
}

/// Payload of the Engine.IO `open` packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    pub sid: String,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 {
    25_000
}
fn default_ping_timeout() -> u64 {
    20_000
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenInfo),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect(Option<Value>),
    Disconnect,
    Event { name: String, args: Vec<Value> },
    Ack,
    ConnectError(Value),
    Binary,
}

impl EnginePacket {
    pub fn parse(text: &str) -> Result<Self, FeedError> {
        let mut chars = text.chars();
        let kind = chars
            .next()
            .ok_or_else(|| FeedError::Protocol("empty packet".to_string()))?;
        let body = chars.as_str();

        match kind {
            '0' => serde_json::from_str(body)
                .map(Self::Open)
                .map_err(|e| FeedError::Protocol(format!("invalid open packet: {e}"))),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(body.to_string())),
            '3' => Ok(Self::Pong(body.to_string())),
            '4' => SocketPacket::parse(body).map(Self::Message),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            other => Err(FeedError::Protocol(format!(
                "unknown engine packet type '{other}'"
            ))),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(_) => "0".to_string(),
            Self::Close => "1".to_string(),
            Self::Ping(data) => format!("2{data}"),
            Self::Pong(data) => format!("3{data}"),
            Self::Message(packet) => format!("4{}", packet.encode()),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
        }
    }
}

impl SocketPacket {
    fn parse(text: &str) -> Result<Self, FeedError> {
        let mut chars = text.chars();
        let kind = chars
            .next()
            .ok_or_else(|| FeedError::Protocol("empty socket packet".to_string()))?;
        let payload = skip_ack_id(skip_namespace(chars.as_str()));

        match kind {
            '0' => Ok(Self::Connect(parse_optional_json(payload)?)),
            '1' => Ok(Self::Disconnect),
            '2' => {
                let value: Value = serde_json::from_str(payload)
                    .map_err(|e| FeedError::Protocol(format!("invalid event payload: {e}")))?;
                let Value::Array(mut items) = value else {
                    return Err(FeedError::Protocol("event payload is not an array".to_string()));
                };
                if items.is_empty() {
                    return Err(FeedError::Protocol("event without a name".to_string()));
                }
                let Value::String(name) = items.remove(0) else {
                    return Err(FeedError::Protocol("event name is not a string".to_string()));
                };
                Ok(Self::Event { name, args: items })
            }
            '3' => Ok(Self::Ack),
            '4' => Ok(Self::ConnectError(
                parse_optional_json(payload)?.unwrap_or(Value::Null),
            )),
            '5' | '6' => Ok(Self::Binary),
            other => Err(FeedError::Protocol(format!(
                "unknown socket packet type '{other}'"
            ))),
        }
    }

    fn encode(&self) -> String {
        match self {
            Self::Connect(None) => "0".to_string(),
            Self::Connect(Some(auth)) => format!("0{auth}"),
            Self::Disconnect => "1".to_string(),
            Self::Event { name, args } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                format!("2{}", Value::Array(items))
            }
            Self::Ack => "3".to_string(),
            Self::ConnectError(data) => format!("4{data}"),
            Self::Binary => "5".to_string(),
        }
    }
}

/// Build the text frame for emitting `name` with `args` on the root namespace
pub fn encode_event(name: &str, args: Vec<Value>) -> String {
    EnginePacket::Message(SocketPacket::Event {
        name: name.to_string(),
        args,
    })
    .encode()
}

fn skip_namespace(text: &str) -> &str {
    if text.starts_with('/') {
        match text.find(',') {
            Some(idx) => &text[idx + 1..],
            None => "",
        }
    } else {
        text
    }
}

fn skip_ack_id(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn parse_optional_json(text: &str) -> Result<Option<Value>, FeedError> {
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| FeedError::Protocol(format!("invalid packet data: {e}")))
}
