//! Message shapes exchanged with the popup collaborator.
//!
//! Two in-process message kinds, tagged by an `action` field:
//! - `openPopup`: outbound, sent when a `#`-prefixed trigger matches; asks
//!   the host to present the snippet in an expanded popup view
//! - `finalString`: inbound, delivers the snippet the user chose in the
//!   popup back to the engine for insertion at the caret
//!
//! Delivery is fire-and-forget in both directions: `openPopup` awaits no
//! response, and the later `finalString` is a structurally separate request
//! with no correlation id linking the two.

use std::sync::mpsc::{channel, Receiver, Sender};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A message to or from the popup collaborator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RuntimeMessage {
    /// Ask the host to open the expanded popup view for `text`.
    OpenPopup { text: String },
    /// A snippet chosen asynchronously in the popup, to be inserted at the
    /// active surface's caret.
    FinalString { text: String },
}

impl RuntimeMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Outbound port to the popup collaborator. One-way: implementations must
/// not block and no response is awaited.
pub trait PopupPort {
    fn open_popup(&self, text: &str);
}

/// Drops outbound requests. Useful when no popup host is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPopupPort;

impl PopupPort for NullPopupPort {
    fn open_popup(&self, text: &str) {
        debug!(
            text_len = text.len(),
            "No popup host attached, dropping openPopup request"
        );
    }
}

/// Sends `openPopup` requests over an mpsc channel for the host's event loop
/// to drain.
#[derive(Debug)]
pub struct ChannelPopupPort {
    tx: Sender<RuntimeMessage>,
}

impl ChannelPopupPort {
    pub fn new() -> (Self, Receiver<RuntimeMessage>) {
        let (tx, rx) = channel();
        (Self { tx }, rx)
    }
}

impl PopupPort for ChannelPopupPort {
    fn open_popup(&self, text: &str) {
        let message = RuntimeMessage::OpenPopup {
            text: text.to_string(),
        };
        if self.tx.send(message).is_err() {
            // Fire-and-forget: a departed host is not an error.
            warn!("Popup host receiver dropped, discarding openPopup request");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_popup_wire_shape() {
        let message = RuntimeMessage::OpenPopup {
            text: "Best regards".to_string(),
        };
        let json = message.to_json().unwrap();
        assert_eq!(json, r#"{"action":"openPopup","text":"Best regards"}"#);
    }

    #[test]
    fn test_final_string_wire_shape() {
        let raw = r#"{"action":"finalString","text":"123 Main St"}"#;
        let message = RuntimeMessage::from_json(raw).unwrap();
        assert_eq!(
            message,
            RuntimeMessage::FinalString {
                text: "123 Main St".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_action_fails_to_decode() {
        assert!(RuntimeMessage::from_json(r#"{"action":"sync","text":"x"}"#).is_err());
    }

    #[test]
    fn test_channel_port_delivers_open_popup() {
        let (port, rx) = ChannelPopupPort::new();
        port.open_popup("snippet body");
        assert_eq!(
            rx.recv().unwrap(),
            RuntimeMessage::OpenPopup {
                text: "snippet body".to_string()
            }
        );
    }

    #[test]
    fn test_channel_port_survives_dropped_receiver() {
        let (port, rx) = ChannelPopupPort::new();
        drop(rx);
        // Must not panic; fire-and-forget.
        port.open_popup("snippet body");
    }
}
