//! Persistence boundary: snapshot loading and change notifications.
//!
//! The engine never touches storage itself; it consumes a [`TriggerSource`]
//! once at startup and [`StoreChangedEvent`]s afterwards. The shipped
//! implementation is a JSON snapshot file (an object of trigger -> snippet
//! pairs) plus a [`TriggerWatcher`] that re-reads it whenever the file
//! changes and emits events over an mpsc channel for the host's event loop
//! to drain.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use notify::{recommended_watcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use crate::error::{Result, ResultExt, SnipkitError};
use crate::store::TriggerMap;

/// Provider of trigger snapshots. Called once at startup; later updates
/// arrive through change notifications.
pub trait TriggerSource {
    fn load(&self) -> Result<TriggerMap>;
}

/// Emitted when the persistence layer reports a new snapshot. `None` means
/// the snapshot was cleared or unreadable; downstream this is normalized to
/// the empty map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChangedEvent(pub Option<TriggerMap>);

/// A JSON file holding the trigger map as a flat object:
///
/// ```json
/// { "/sig": "Best regards,\nAna", "#addr": "123 Main St" }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TriggerSource for JsonFileSource {
    fn load(&self) -> Result<TriggerMap> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Snapshot file not found, no triggers defined");
            return Ok(TriggerMap::new());
        }
        let raw =
            std::fs::read_to_string(&self.path).map_err(|source| SnipkitError::SnapshotIo {
                path: self.path.display().to_string(),
                source,
            })?;
        if raw.trim().is_empty() {
            return Ok(TriggerMap::new());
        }
        let map: TriggerMap = serde_json::from_str(raw.trim())?;
        Ok(map)
    }
}

/// Watches the snapshot file and emits [`StoreChangedEvent`]s when it
/// changes.
///
/// The watcher thread never touches a [`crate::store::TriggerStore`]
/// directly; the host drains the receiver on its event loop and applies
/// events between handler invocations, so a handler always observes one
/// consistent snapshot.
pub struct TriggerWatcher {
    source: JsonFileSource,
    tx: Option<Sender<StoreChangedEvent>>,
    /// Held so the background thread outlives `start`; never joined, the
    /// thread exits when the event receiver is dropped.
    #[allow(dead_code)]
    watcher_thread: Option<thread::JoinHandle<()>>,
}

impl TriggerWatcher {
    /// Creates a watcher for `source`'s file. Returns the watcher and the
    /// receiver that will carry change events once [`start`] is called.
    ///
    /// [`start`]: TriggerWatcher::start
    pub fn new(source: JsonFileSource) -> (Self, Receiver<StoreChangedEvent>) {
        let (tx, rx) = channel();
        let watcher = TriggerWatcher {
            source,
            tx: Some(tx),
            watcher_thread: None,
        };
        (watcher, rx)
    }

    /// Spawns the background thread that watches the snapshot file.
    pub fn start(&mut self) -> anyhow::Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| anyhow::anyhow!("watcher already started"))?;
        let source = self.source.clone();

        let thread_handle = thread::spawn(move || {
            if let Err(e) = Self::watch_loop(source, tx) {
                warn!(error = %e, watcher = "triggers", "Trigger watcher error");
            }
        });

        self.watcher_thread = Some(thread_handle);
        Ok(())
    }

    fn watch_loop(
        source: JsonFileSource,
        tx: Sender<StoreChangedEvent>,
    ) -> notify::Result<()> {
        let snapshot_name = source
            .path()
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        let watch_path = source
            .path()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let (watch_tx, watch_rx) = channel();
        let mut watcher = recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = watch_tx.send(res);
        })?;
        watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;

        info!(
            path = %watch_path.display(),
            target = %snapshot_name.to_string_lossy(),
            "Trigger watcher started"
        );

        loop {
            match watch_rx.recv() {
                Ok(Ok(event)) => {
                    let is_snapshot_change = event
                        .paths
                        .iter()
                        .any(|path| path.file_name() == Some(snapshot_name.as_os_str()));
                    let is_relevant_event = matches!(
                        event.kind,
                        notify::EventKind::Create(_)
                            | notify::EventKind::Modify(_)
                            | notify::EventKind::Remove(_)
                    );
                    if !is_snapshot_change || !is_relevant_event {
                        continue;
                    }

                    // A deleted or unreadable snapshot is a clear, not an
                    // error: the event carries None and the store ends up
                    // empty.
                    let payload = if matches!(event.kind, notify::EventKind::Remove(_)) {
                        None
                    } else {
                        source.load().warn_on_err()
                    };

                    if tx.send(StoreChangedEvent(payload)).is_err() {
                        info!("Change event receiver dropped, stopping trigger watcher");
                        break;
                    }
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "Trigger watcher event error");
                }
                Err(_) => {
                    // Watcher channel closed; nothing more to do.
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file_yields_empty_map() {
        let source = JsonFileSource::new("/nonexistent/snipkit-triggers.json");
        let map = source.load().unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_load_empty_file_yields_empty_map() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = JsonFileSource::new(file.path());
        assert!(source.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_parses_trigger_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{ "/sig": "Best regards,\nAna", "#addr": "123 Main St" }}"##
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let map = source.load().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("/sig").map(String::as_str), Some("Best regards,\nAna"));
        assert_eq!(map.get("#addr").map(String::as_str), Some("123 Main St"));
    }

    #[test]
    fn test_load_malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let source = JsonFileSource::new(file.path());
        let err = source.load().unwrap_err();
        assert!(matches!(err, SnipkitError::SnapshotParse(_)));
    }

    #[test]
    fn test_watcher_start_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("triggers.json"));
        let (mut watcher, _rx) = TriggerWatcher::new(source);
        watcher.start().unwrap();
        assert!(watcher.start().is_err());
    }

    #[test]
    fn test_watcher_normalizes_malformed_snapshot_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triggers.json");
        let source = JsonFileSource::new(&path);
        let (mut watcher, rx) = TriggerWatcher::new(source);
        watcher.start().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(300));
        std::fs::write(&path, "{ not json").unwrap();

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            let event = rx.recv_timeout(remaining).expect("expected a change event");
            if event.0.is_none() {
                break;
            }
        }
    }

    #[test]
    fn test_watcher_emits_event_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triggers.json");
        let source = JsonFileSource::new(&path);
        let (mut watcher, rx) = TriggerWatcher::new(source);
        watcher.start().unwrap();

        // Give the watcher thread time to register before writing.
        std::thread::sleep(std::time::Duration::from_millis(300));
        std::fs::write(&path, r#"{ "/hi": "hello" }"#).unwrap();

        // A single write may surface as several filesystem events; accept
        // the first one carrying the written snapshot.
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            let event = rx.recv_timeout(remaining).expect("expected a change event");
            if let Some(map) = event.0 {
                if map.get("/hi").map(String::as_str) == Some("hello") {
                    break;
                }
            }
        }
    }
}
