//! Dispatch glue tying scanner, store, and surfaces together.
//!
//! One [`ExpandEngine`] instance lives for the hosting session and is passed
//! explicitly into the host's event wiring; there are no ambient globals.
//! Three handlers correspond to the three signals a host can deliver:
//!
//! - [`handle_text_changed`]: a text-changed signal on the focused surface
//! - [`handle_message`] / [`handle_final_string`]: an inbound `finalString`
//!   delivery following a popup interaction
//! - [`handle_store_changed`]: a new snapshot from the persistence layer
//!
//! All handlers run to completion synchronously; every anomaly degrades to
//! "no expansion this invocation".
//!
//! [`handle_text_changed`]: ExpandEngine::handle_text_changed
//! [`handle_message`]: ExpandEngine::handle_message
//! [`handle_final_string`]: ExpandEngine::handle_final_string
//! [`handle_store_changed`]: ExpandEngine::handle_store_changed

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::ResultExt;
use crate::protocol::{PopupPort, RuntimeMessage};
use crate::scanner;
use crate::source::TriggerSource;
use crate::store::{TriggerMap, TriggerStore};
use crate::surface::{self, EditableSurface};

/// Coordinates trigger recognition and in-place substitution for one hosting
/// session.
pub struct ExpandEngine {
    config: EngineConfig,
    store: TriggerStore,
    popup: Box<dyn PopupPort>,
}

impl ExpandEngine {
    /// An engine with default configuration and an empty store.
    pub fn new(popup: Box<dyn PopupPort>) -> Self {
        Self::with_config(EngineConfig::default(), popup)
    }

    pub fn with_config(config: EngineConfig, popup: Box<dyn PopupPort>) -> Self {
        Self {
            config,
            store: TriggerStore::new(),
            popup,
        }
    }

    pub fn store(&self) -> &TriggerStore {
        &self.store
    }

    /// Loads the initial snapshot from the persistence collaborator. A load
    /// failure leaves the store empty rather than failing startup.
    pub fn load_from(&mut self, source: &dyn TriggerSource) {
        self.store.refresh(source.load().warn_on_err());
        debug!(triggers = self.store.len(), "Initial trigger snapshot loaded");
    }

    /// Handles a text-changed signal on the focused surface.
    ///
    /// Scans backward from the caret for a trailing trigger token and looks
    /// it up in the current snapshot. A `/`-prefixed match is replaced in
    /// place; a `#`-prefixed match is handed to the popup collaborator
    /// (fire-and-forget, the surface stays untouched); a miss does nothing.
    pub fn handle_text_changed(&self, surface: &mut dyn EditableSurface) {
        let token = {
            let Some(before) = surface.text_before_cursor() else {
                return;
            };
            scanner::scan_within(before, self.config.max_scan_len).to_owned()
        };
        let Some(snippet) = self.store.get(&token) else {
            return;
        };

        if self.config.popup_triggers && token.starts_with('#') {
            debug!(token = %token, "Forwarding matched trigger to popup");
            self.popup.open_popup(snippet);
            return;
        }

        debug!(token = %token, snippet_len = snippet.len(), "Replacing matched trigger");
        surface::replace(surface, &token, snippet);
    }

    /// Handles an inbound `finalString` delivery: inserts `text` at the
    /// active surface's caret, first removing a trailing trigger token if
    /// one is present.
    ///
    /// The delivery is uncorrelated with the `openPopup` request that may
    /// have preceded it and is not gated on a trigger match.
    pub fn handle_final_string(&self, surface: &mut dyn EditableSurface, text: &str) {
        let token = {
            let Some(before) = surface.text_before_cursor() else {
                return;
            };
            scanner::scan_within(before, self.config.max_scan_len).to_owned()
        };

        if token.is_empty() {
            surface::insert_at_cursor(surface, text);
        } else {
            surface::replace(surface, &token, text);
        }
    }

    /// Decodes and routes an inbound message. Only `finalString` carries
    /// work for the engine; everything else is ignored.
    pub fn handle_message(&self, surface: &mut dyn EditableSurface, message: &RuntimeMessage) {
        match message {
            RuntimeMessage::FinalString { text } => self.handle_final_string(surface, text),
            RuntimeMessage::OpenPopup { .. } => {}
        }
    }

    /// Applies a store-changed notification from the persistence layer.
    /// An absent payload clears the store.
    pub fn handle_store_changed(&mut self, new_map: Option<TriggerMap>) {
        self.store.refresh(new_map);
    }
}
