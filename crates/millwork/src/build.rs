//! The four public build operations.
//!
//! Every operation resolves its [`SourceSpec`], prunes or processes the
//! matched files per its pipeline, and resolves once all artifacts for the
//! invocation are on disk - or fails with the first pipeline error. Zero
//! matches is a no-op, not an error.

use std::path::PathBuf;

use crate::mode::OutputMode;
use crate::pipeline::{self, ScriptFlavor};
use crate::source::{self, SourceSpec};
use crate::watch::WatchSession;
use crate::{Error, Result};

/// What one build invocation produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Artifacts written, in completion order. Source maps are not listed;
    /// each JS artifact has its `.map` sibling.
    pub artifacts: Vec<PathBuf>,
    /// Inputs skipped because their artifact was already up to date.
    pub skipped: usize,
}

/// Bundle and minify ECMAScript-next module entries.
///
/// Each matched file is treated as a bundle entry: its import graph is
/// inlined, the result minified, and the artifact written with a source map.
/// Mirror artifacts land alongside their sources as `<stem>.min.js`; a
/// directed mirror destination is rejected for module builds.
///
/// ```no_run
/// use millwork::{build_modules, OutputMode};
///
/// # #[tokio::main]
/// # async fn main() -> millwork::Result<()> {
/// build_modules("app/**/*.js", OutputMode::mirror()).await?;
/// build_modules("app/**/*.js", OutputMode::concat("dist", "app.min.js")).await?;
/// # Ok(()) }
/// ```
pub async fn build_modules(
    spec: impl Into<SourceSpec>,
    mode: OutputMode,
) -> Result<BuildReport> {
    let mode = undirected_only(mode)?;
    let files = source::resolve(&spec.into())?;
    if files.is_empty() {
        tracing::debug!("no module sources matched");
        return Ok(BuildReport::default());
    }
    pipeline::run_scripts(ScriptFlavor::Modules, files, &mode).await
}

/// [`build_modules`], then keep rebuilding whenever a matched source changes.
///
/// The returned [`WatchSession`] carries the first build's report and owns
/// the subscription; drop it (or call [`WatchSession::close`]) to stop.
/// Files added after the watch starts are not picked up.
pub async fn watch_modules(
    spec: impl Into<SourceSpec>,
    mode: OutputMode,
) -> Result<WatchSession> {
    let mode = undirected_only(mode)?;
    let files = source::resolve(&spec.into())?;
    let first_build = if files.is_empty() {
        tracing::debug!("no module sources matched");
        BuildReport::default()
    } else {
        pipeline::run_scripts(ScriptFlavor::Modules, files.clone(), &mode).await?
    };
    WatchSession::start(files, mode, first_build)
}

/// Minify already-compiled scripts without bundling.
///
/// Inputs pass straight to the minifier; artifacts that are already newer
/// than their source are skipped. In concat mode any newer input rebuilds
/// the combined artifact from every input.
///
/// ```no_run
/// use millwork::{build_scripts, OutputMode};
///
/// # #[tokio::main]
/// # async fn main() -> millwork::Result<()> {
/// build_scripts("vendor/**/*.js", OutputMode::mirror_into("dist/vendor")).await?;
/// # Ok(()) }
/// ```
pub async fn build_scripts(
    spec: impl Into<SourceSpec>,
    mode: OutputMode,
) -> Result<BuildReport> {
    let files = source::resolve(&spec.into())?;
    if files.is_empty() {
        tracing::debug!("no script sources matched");
        return Ok(BuildReport::default());
    }
    pipeline::run_scripts(ScriptFlavor::Plain, files, &mode).await
}

/// Compile and minify stylesheets.
///
/// Mirror artifacts are `<stem>.min.css`; concat mode compiles each input
/// and joins the results into one artifact. Stylesheet artifacts carry no
/// source maps. The same mtime pruning as [`build_scripts`] applies.
pub async fn build_styles(
    spec: impl Into<SourceSpec>,
    mode: OutputMode,
) -> Result<BuildReport> {
    let files = source::resolve(&spec.into())?;
    if files.is_empty() {
        tracing::debug!("no stylesheet sources matched");
        return Ok(BuildReport::default());
    }
    pipeline::run_styles(files, &mode).await
}

/// Module artifacts always land alongside their sources in mirror mode.
fn undirected_only(mode: OutputMode) -> Result<OutputMode> {
    if matches!(&mode, OutputMode::Mirror { dest: Some(_) }) {
        return Err(Error::InvalidConfig(
            "module builds write alongside their sources; use OutputMode::concat for a directed output"
                .to_string(),
        ));
    }
    Ok(mode)
}
