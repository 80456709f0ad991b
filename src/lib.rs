//! Snipkit - trigger-based text expansion for editable text surfaces
//!
//! Watches editable surfaces for short trigger tokens typed by the user
//! (`/sig`, `#addr`) and replaces them in place with stored snippets. The
//! engine is host-agnostic: the embedding application feeds it text-changed
//! signals and a handle to the focused surface, and wires the popup
//! collaborator and the snapshot persistence layer at the boundaries defined
//! in [`protocol`] and [`source`].
//!
//! Core pieces:
//! - [`scanner`]: pure backward scan for the trailing trigger token
//! - [`store`]: in-memory snapshot of the trigger -> snippet mapping
//! - [`surface`]: the editable-surface capability trait and the in-place
//!   replace operation, covering flat-buffer fields and node-structured
//!   rich regions
//! - [`engine`]: dispatch glue tying the three together

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod scanner;
pub mod source;
pub mod store;
pub mod surface;

pub use config::EngineConfig;
pub use engine::ExpandEngine;
pub use error::{Result, SnipkitError};
pub use protocol::{ChannelPopupPort, NullPopupPort, PopupPort, RuntimeMessage};
pub use scanner::scan;
pub use source::{JsonFileSource, StoreChangedEvent, TriggerSource, TriggerWatcher};
pub use store::{TriggerMap, TriggerStore};
pub use surface::{Caret, EditableSurface, FieldSurface, RichRegionSurface};
