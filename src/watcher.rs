//! File system watcher for watch mode

use crate::config::DEFAULT_SESSION_SUFFIX;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches a directory for session file changes and emits paths on a channel
pub struct SessionWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    suffixes: Vec<String>,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

impl SessionWatcher {
    /// Start watching the given path (file or directory) for default session files
    pub fn watch(path: &Path) -> notify::Result<Self> {
        Self::watch_with_suffixes(path, vec![DEFAULT_SESSION_SUFFIX.to_string()])
    }

    pub fn watch_with_suffixes(path: &Path, suffixes: Vec<String>) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;

        if path.is_dir() {
            watcher.watch(path, RecursiveMode::Recursive)?;
        } else if let Some(parent) = path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            suffixes,
        })
    }

    pub fn is_session_file(p: &Path, suffixes: &[String]) -> bool {
        let Some(name) = p.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    fn paths_from_event(&self, event: &notify::Event) -> Vec<PathBuf> {
        if !is_create_or_modify(&event.kind) {
            return vec![];
        }
        event
            .paths
            .iter()
            .filter(|p| Self::is_session_file(p, &self.suffixes))
            .cloned()
            .collect()
    }

    /// Wait for the next batch of changes. Blocks until at least one change, then drains for DEBOUNCE_MS.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut all = HashSet::new();

        match self.receiver.recv_timeout(Duration::from_secs(3600)) {
            Ok(Ok(event)) => all.extend(self.paths_from_event(&event)),
            Ok(Err(_)) | Err(_) => return vec![],
        }

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                all.extend(self.paths_from_event(&event));
            }
        }

        let mut paths: Vec<PathBuf> = all.into_iter().collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};

    fn default_suffixes() -> Vec<String> {
        vec![DEFAULT_SESSION_SUFFIX.to_string()]
    }

    #[test]
    fn test_is_session_file() {
        let suffixes = default_suffixes();
        assert!(SessionWatcher::is_session_file(Path::new("alice.session.json"), &suffixes));
        assert!(SessionWatcher::is_session_file(
            Path::new("data/2026/bob.session.json"),
            &suffixes
        ));
        assert!(!SessionWatcher::is_session_file(Path::new("alice.json"), &suffixes));
        assert!(!SessionWatcher::is_session_file(Path::new(".skinagerc.json"), &suffixes));
        assert!(!SessionWatcher::is_session_file(Path::new(""), &suffixes));
    }

    #[test]
    fn test_custom_suffixes() {
        let suffixes = vec![".capture.json".to_string()];
        assert!(SessionWatcher::is_session_file(Path::new("a.capture.json"), &suffixes));
        assert!(!SessionWatcher::is_session_file(Path::new("a.session.json"), &suffixes));
    }

    #[test]
    fn test_is_create_or_modify() {
        assert!(is_create_or_modify(&EventKind::Create(CreateKind::File)));
        assert!(is_create_or_modify(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        ))));
        assert!(!is_create_or_modify(&EventKind::Remove(RemoveKind::File)));
    }

    #[test]
    fn test_paths_from_event_filters_session_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let watcher = SessionWatcher::watch(dir.path()).unwrap();

        let event = notify::Event {
            kind: EventKind::Create(CreateKind::File),
            paths: vec![
                PathBuf::from("a.session.json"),
                PathBuf::from("notes.txt"),
                PathBuf::from("b.session.json"),
            ],
            attrs: Default::default(),
        };
        let paths = watcher.paths_from_event(&event);
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&PathBuf::from("b.session.json")));

        let remove_event = notify::Event {
            kind: EventKind::Remove(RemoveKind::File),
            paths: vec![PathBuf::from("a.session.json")],
            attrs: Default::default(),
        };
        assert!(watcher.paths_from_event(&remove_event).is_empty());
    }

    #[test]
    fn test_watch_single_file_parent() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("a.session.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(SessionWatcher::watch(&file).is_ok());
    }
}
