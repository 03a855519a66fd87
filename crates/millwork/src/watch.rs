//! Change-triggered rebuilds for module builds.
//!
//! A [`WatchSession`] owns a `notify` watcher over the parent directories of
//! the resolved input set plus a rebuild task draining change events. Events
//! are filtered to the files that were resolved when the session started -
//! the original glob is *not* re-resolved, so files added afterwards are not
//! picked up. Rebuild failures are logged and the session keeps watching.
//!
//! Dropping the session (or calling [`WatchSession::close`]) stops the
//! watcher and the rebuild task; nothing outlives the handle.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::build::BuildReport;
use crate::mode::OutputMode;
use crate::pipeline::{self, ScriptFlavor};
use crate::source::ResolvedFile;
use crate::Result;

/// Editors tend to fire several events per save; changes to the same file
/// inside this window collapse into one rebuild.
const DEBOUNCE: Duration = Duration::from_millis(250);

/// An active change subscription rebuilding a fixed set of module entries.
///
/// Returned by [`watch_modules`](crate::watch_modules) after the first
/// successful build. Keep it alive for as long as rebuilds are wanted.
pub struct WatchSession {
    first_build: BuildReport,
    _watcher: RecommendedWatcher,
    rebuilds: JoinHandle<()>,
}

impl WatchSession {
    pub(crate) fn start(
        files: Vec<ResolvedFile>,
        mode: OutputMode,
        first_build: BuildReport,
    ) -> Result<Self> {
        let watched: HashSet<PathBuf> = files
            .iter()
            .filter_map(|file| file.path.canonicalize().ok())
            .collect();
        let dirs: HashSet<PathBuf> = watched
            .iter()
            .filter_map(|path| path.parent().map(Path::to_path_buf))
            .collect();

        let (tx, mut rx) = mpsc::channel::<()>(64);
        let mut last_event: Option<(PathBuf, Instant)> = None;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else { return };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            for path in &event.paths {
                let Ok(canonical) = path.canonicalize() else { continue };
                if !watched.contains(&canonical) {
                    continue;
                }
                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if *last_path == canonical && now.duration_since(*last_time) < DEBOUNCE {
                        continue;
                    }
                }
                last_event = Some((canonical, now));
                let _ = tx.blocking_send(());
            }
        })?;

        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        let rebuilds = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                tracing::info!("rebuilding scripts");
                if let Err(error) =
                    pipeline::run_scripts(ScriptFlavor::Modules, files.clone(), &mode).await
                {
                    tracing::error!("watch rebuild failed: {error}");
                }
            }
        });

        Ok(Self {
            first_build,
            _watcher: watcher,
            rebuilds,
        })
    }

    /// The report from the build that ran before watching began.
    pub fn first_build(&self) -> &BuildReport {
        &self.first_build
    }

    /// Tear the subscription down. Equivalent to dropping the session.
    pub fn close(self) {}
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.rebuilds.abort();
    }
}
