//! Modification-time staleness checks for the pass-through and stylesheet
//! pipelines. The module pipeline never consults these; its bundler owns
//! change detection during watch mode.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// An artifact is fresh when it exists and is at least as new as every
/// contributing input. Unreadable metadata counts as stale.
pub(crate) fn is_fresh<'a>(artifact: &Path, inputs: impl IntoIterator<Item = &'a Path>) -> bool {
    let Some(built) = mtime(artifact) else {
        return false;
    };
    inputs
        .into_iter()
        .all(|input| mtime(input).is_some_and(|changed| built >= changed))
}
