//! View channel message shapes.
//!
//! Everything crossing the channel is a JSON envelope `{type, requestId?, body}`.
//! Outbound messages are built from typed variants; inbound values are
//! validated here, before anything reaches the broker or the controller.
//!
//! Delivery is best-effort and at-most-once, with no ordering guarantee
//! between messages of different types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub type RequestId = u64;

pub mod kind {
    pub const READY: &str = "ready";
    pub const INIT: &str = "init";
    pub const GET_FILE_DATA: &str = "getFileData";
    pub const OPEN_ANYWAYS: &str = "open-anyways";
    pub const EDIT: &str = "edit";
}

/// Envelope written to a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outbound {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    #[serde(default)]
    pub body: Value,
}

impl Outbound {
    pub fn is_request(&self) -> bool {
        self.request_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitBody {
    pub file_size: u64,
    pub value: Vec<u8>,
    /// Absent when only part of the file is loaded; the view then asks the
    /// user whether to open it anyway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewNotification {
    Init(InitBody),
}

impl ViewNotification {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Init(_) => kind::INIT,
        }
    }

    pub fn into_outbound(self) -> Result<Outbound, serde_json::Error> {
        let kind = self.kind().to_string();
        let body = match self {
            Self::Init(body) => serde_json::to_value(body)?,
        };
        Ok(Outbound {
            kind,
            request_id: None,
            body,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    GetFileData,
}

impl ViewRequest {
    pub fn kind(self) -> &'static str {
        match self {
            Self::GetFileData => kind::GET_FILE_DATA,
        }
    }

    pub fn body(self) -> Value {
        match self {
            Self::GetFileData => json!({}),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDataResponse {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Ready,
    OpenAnyways,
    Edit(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Response { request_id: RequestId, body: Value },
    Event(ViewEvent),
}

#[derive(Deserialize)]
struct RawInbound {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(rename = "requestId", default)]
    request_id: Option<RequestId>,
    #[serde(default)]
    body: Value,
}

impl Inbound {
    /// A message carrying `requestId` is always a response, whatever its `type`.
    pub fn parse(value: Value) -> Result<Self, ProtocolError> {
        let raw: RawInbound =
            serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

        if let Some(request_id) = raw.request_id {
            return Ok(Inbound::Response {
                request_id,
                body: raw.body,
            });
        }

        let Some(kind) = raw.kind else {
            return Err(ProtocolError::Malformed(
                "message has neither `type` nor `requestId`".to_string(),
            ));
        };

        let event = match kind.as_str() {
            kind::READY => ViewEvent::Ready,
            kind::OPEN_ANYWAYS => ViewEvent::OpenAnyways,
            kind::EDIT => ViewEvent::Edit(raw.body),
            _ => return Err(ProtocolError::UnknownType(kind)),
        };
        Ok(Inbound::Event(event))
    }

    pub fn parse_str(text: &str) -> Result<Self, ProtocolError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Malformed(String),
    UnknownType(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Malformed(msg) => write!(f, "Malformed view message: {}", msg),
            ProtocolError::UnknownType(kind) => write!(f, "Unknown view message type: {}", kind),
        }
    }
}

impl std::error::Error for ProtocolError {}

#[cfg(test)]
#[path = "../../tests/unit/kernel/protocol.rs"]
mod tests;
