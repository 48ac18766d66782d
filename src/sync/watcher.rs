use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::sync::ChangeEvent;

/// Filesystem watcher over a durable store directory.
///
/// Sibling contexts write slots as `<key>.json` files; this converts those
/// writes into [`ChangeEvent`]s. Poll-based: call `poll()` once per event
/// loop tick. Note that the underlying watcher also reports writes made by
/// the local context — [`crate::Context::pump`] filters those out before
/// dispatching.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<Vec<PathBuf>>,
}

impl StoreWatcher {
    /// Start watching the given store directory.
    pub fn start(dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir_owned = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| is_slot_file(&dir_owned, p))
                    .collect();

                if !relevant.is_empty() {
                    let _ = tx.send(relevant);
                }
            },
            Config::default(),
        )?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending slot changes.
    ///
    /// Each touched slot is re-read: a readable file yields its current raw
    /// text, a missing file yields a removal event.
    pub fn poll(&self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        while let Ok(paths) = self.rx.try_recv() {
            for path in paths {
                let Some(key) = slot_key(&path) else {
                    continue;
                };
                events.push(ChangeEvent {
                    key,
                    new_raw: fs::read_to_string(&path).ok(),
                });
            }
        }
        events
    }
}

/// True for `<dir>/<key>.json`. Atomic-write temp files carry no `.json`
/// extension, so they never show up as slot changes.
fn is_slot_file(dir: &Path, path: &Path) -> bool {
    path.starts_with(dir) && path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn slot_key(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
