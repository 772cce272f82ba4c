//! Push on change
//!
//! [`PushWatcher`] turns filesystem events under the root directory into
//! [`PushTrigger`]s; [`run_watch`] consumes them. Pushes never overlap:
//! triggers that arrive while a push is running are coalesced into the next
//! one.

use std::path::{Path, PathBuf};

use clasp_fs::NormalizedPath;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::Result;
use crate::ignore::IgnoreMatcher;
use crate::scanner::ELIGIBLE_EXTENSIONS;
use crate::sync::{PushReport, SyncEngine};

/// A local change that should be pushed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTrigger {
    pub path: PathBuf,
}

/// Run pushes until the trigger channel closes
///
/// Each push result, success or failure, goes to `on_report` and the loop
/// keeps going. Returns the number of pushes performed.
pub async fn run_watch<F>(
    engine: &SyncEngine,
    mut triggers: mpsc::UnboundedReceiver<PushTrigger>,
    mut on_report: F,
) -> usize
where
    F: FnMut(Result<PushReport>),
{
    let mut pushes = 0;

    while let Some(first) = triggers.recv().await {
        let mut coalesced = 1;
        while triggers.try_recv().is_ok() {
            coalesced += 1;
        }
        tracing::debug!(path = %first.path.display(), coalesced, "change detected");

        let result = engine.push_files().await;
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "push failed, still watching");
        }
        pushes += 1;
        on_report(result);
    }

    pushes
}

/// Filesystem watcher feeding [`run_watch`]
pub struct PushWatcher {
    _watcher: RecommendedWatcher,
}

impl PushWatcher {
    /// Watch `engine`'s root directory recursively
    ///
    /// Only changes to files the scanner would consider produce triggers.
    /// Dropping the watcher closes the returned channel.
    pub fn start(engine: &SyncEngine) -> Result<(Self, mpsc::UnboundedReceiver<PushTrigger>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let matcher = engine.matcher()?;
        let root = engine.root().to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "watch error");
                    return;
                }
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }
            for path in event.paths {
                if is_push_relevant(&matcher, &root, &path) {
                    let _ = tx.send(PushTrigger { path });
                }
            }
        })?;
        watcher.watch(engine.root(), RecursiveMode::Recursive)?;
        tracing::info!(root = %engine.root().display(), "watching for changes");

        Ok((Self { _watcher: watcher }, rx))
    }
}

impl std::fmt::Debug for PushWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushWatcher").finish_non_exhaustive()
    }
}

/// Whether a change to `path` could alter what gets pushed
pub fn is_push_relevant(matcher: &IgnoreMatcher, root: &Path, path: &Path) -> bool {
    let Ok(rel) = NormalizedPath::relative_to(path, root) else {
        return false;
    };
    if !rel
        .extension()
        .is_some_and(|ext| ELIGIBLE_EXTENSIONS.contains(&ext))
    {
        return false;
    }
    !matcher.is_ignored(&rel, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MemoryServices, ProjectState, RemoteError};
    use crate::settings::{Project, ProjectSettings};
    use chrono::Utc;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn engine(temp: &TempDir) -> (Arc<MemoryServices>, SyncEngine) {
        let services = Arc::new(MemoryServices::new());
        services.insert_project(ProjectState::new("s1", "Test", None, Utc::now()));
        let project = Project::init(temp.path(), ProjectSettings::new("s1")).unwrap();
        fs::write(temp.path().join("appsscript.json"), "{}").unwrap();
        fs::write(temp.path().join("Code.gs"), "").unwrap();
        let engine = SyncEngine::new(&project, services.clone());
        (services, engine)
    }

    fn trigger(path: &str) -> PushTrigger {
        PushTrigger {
            path: PathBuf::from(path),
        }
    }

    #[tokio::test]
    async fn test_queued_triggers_coalesce() {
        let temp = TempDir::new().unwrap();
        let (services, engine) = engine(&temp);
        let (tx, rx) = mpsc::unbounded_channel();
        for path in ["a.gs", "b.gs", "c.gs"] {
            tx.send(trigger(path)).unwrap();
        }
        drop(tx);

        let mut reports = Vec::new();
        let pushes = run_watch(&engine, rx, |r| reports.push(r.map(|r| r.count()))).await;

        assert_eq!(pushes, 1);
        assert_eq!(services.content_updates(), 1);
        assert!(matches!(reports.as_slice(), [Ok(2)]));
    }

    #[tokio::test]
    async fn test_failed_push_keeps_watching() {
        let temp = TempDir::new().unwrap();
        let (services, engine) = engine(&temp);
        services.fail_content_updates(RemoteError::Unavailable {
            message: "offline".to_string(),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(trigger("Code.gs")).unwrap();
        let mut retrigger = Some(tx);

        let mut failures = 0;
        let pushes = run_watch(&engine, rx, |r| {
            if r.is_err() {
                failures += 1;
            }
            if let Some(tx) = retrigger.take() {
                tx.send(trigger("Code.gs")).unwrap();
            }
        })
        .await;

        assert_eq!(pushes, 2);
        assert_eq!(failures, 2);
    }

    #[test]
    fn test_relevance_follows_scanner_rules() {
        let root = Path::new("/project");
        let matcher = IgnoreMatcher::new(root, &["*.tmp.js", "build/"]).unwrap();

        assert!(is_push_relevant(&matcher, root, Path::new("/project/Code.gs")));
        assert!(is_push_relevant(&matcher, root, Path::new("/project/appsscript.json")));
        assert!(!is_push_relevant(&matcher, root, Path::new("/project/notes.md")));
        assert!(!is_push_relevant(&matcher, root, Path::new("/project/x.tmp.js")));
        assert!(!is_push_relevant(&matcher, root, Path::new("/project/build/a.js")));
        assert!(!is_push_relevant(&matcher, root, Path::new("/elsewhere/a.gs")));
    }
}
