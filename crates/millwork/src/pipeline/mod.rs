//! Artifact pipeline orchestration.
//!
//! Mirror mode fans one job per input onto a `JoinSet` bounded by a
//! semaphore; the first failing job aborts its in-flight siblings before the
//! error propagates. Concat mode processes inputs in resolver order and
//! emits exactly one artifact. Staleness pruning applies only to the
//! pass-through and stylesheet flavors - the bundler handles its own change
//! detection in watch mode.

pub(crate) mod bundle;
pub(crate) mod minify;
pub(crate) mod styles;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::build::BuildReport;
use crate::mode::{self, OutputMode};
use crate::source::ResolvedFile;
use crate::writer;
use crate::{stale, Error, Result};

/// Which JS toolchain a script invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScriptFlavor {
    /// ES-next module entries: bundle with Rolldown, then minify.
    Modules,
    /// Already-compiled scripts: minify as-is, no bundling, mtime-pruned.
    Plain,
}

pub(crate) async fn run_scripts(
    flavor: ScriptFlavor,
    files: Vec<ResolvedFile>,
    mode: &OutputMode,
) -> Result<BuildReport> {
    match mode {
        OutputMode::Mirror { dest } => {
            let mut report = BuildReport::default();
            let mut jobs = Vec::with_capacity(files.len());
            for file in &files {
                let artifact = mode::mirror_artifact(file, dest.as_deref(), "min.js");
                if flavor == ScriptFlavor::Plain
                    && stale::is_fresh(&artifact, [file.path.as_path()])
                {
                    tracing::debug!("'{}' is up to date", artifact.display());
                    report.skipped += 1;
                    continue;
                }
                jobs.push((file.path.clone(), artifact));
            }
            report.artifacts = fan_out(jobs, move |(input, artifact)| {
                script_artifact(flavor, input, artifact)
            })
            .await?;
            Ok(report)
        }
        OutputMode::Concat { dest, filename } => {
            let target = writer::locate_concat_target(dest, filename)?;
            if flavor == ScriptFlavor::Plain
                && stale::is_fresh(&target, files.iter().map(|f| f.path.as_path()))
            {
                tracing::debug!("'{}' is up to date", target.display());
                return Ok(BuildReport {
                    artifacts: Vec::new(),
                    skipped: files.len(),
                });
            }

            tracing::info!("building '{}'", target.display());
            let mut pieces = Vec::with_capacity(files.len());
            for file in &files {
                pieces.push(match flavor {
                    ScriptFlavor::Modules => bundle::bundle_entry(&file.path).await?,
                    ScriptFlavor::Plain => read_source(&file.path).await?,
                });
            }

            let minified = minify::minify(&target, &pieces.join("\n"))?;
            writer::write_artifact(&target, &minified.code, minified.map.as_deref())?;
            tracing::info!("successfully built '{}'", target.display());

            Ok(BuildReport {
                artifacts: vec![target],
                skipped: 0,
            })
        }
    }
}

pub(crate) async fn run_styles(files: Vec<ResolvedFile>, mode: &OutputMode) -> Result<BuildReport> {
    match mode {
        OutputMode::Mirror { dest } => {
            let mut report = BuildReport::default();
            let mut jobs = Vec::with_capacity(files.len());
            for file in &files {
                let artifact = mode::mirror_artifact(file, dest.as_deref(), "min.css");
                if stale::is_fresh(&artifact, [file.path.as_path()]) {
                    tracing::debug!("'{}' is up to date", artifact.display());
                    report.skipped += 1;
                    continue;
                }
                jobs.push((file.path.clone(), artifact));
            }
            report.artifacts = fan_out(jobs, |(input, artifact)| style_artifact(input, artifact)).await?;
            Ok(report)
        }
        OutputMode::Concat { dest, filename } => {
            let target = writer::locate_concat_target(dest, filename)?;
            if stale::is_fresh(&target, files.iter().map(|f| f.path.as_path())) {
                tracing::debug!("'{}' is up to date", target.display());
                return Ok(BuildReport {
                    artifacts: Vec::new(),
                    skipped: files.len(),
                });
            }

            tracing::info!("building '{}'", target.display());
            let mut pieces = Vec::with_capacity(files.len());
            for file in &files {
                let source = read_source(&file.path).await?;
                pieces.push(styles::compile(&file.path, &source)?);
            }
            writer::write_artifact(&target, &pieces.join("\n"), None)?;
            tracing::info!("successfully built '{}'", target.display());

            Ok(BuildReport {
                artifacts: vec![target],
                skipped: 0,
            })
        }
    }
}

async fn script_artifact(flavor: ScriptFlavor, input: PathBuf, artifact: PathBuf) -> Result<PathBuf> {
    tracing::info!("building '{}'", artifact.display());
    let code = match flavor {
        ScriptFlavor::Modules => bundle::bundle_entry(&input).await?,
        ScriptFlavor::Plain => read_source(&input).await?,
    };
    let minified = minify::minify(&input, &code)?;
    writer::write_artifact(&artifact, &minified.code, minified.map.as_deref())?;
    tracing::info!("successfully built '{}'", artifact.display());
    Ok(artifact)
}

async fn style_artifact(input: PathBuf, artifact: PathBuf) -> Result<PathBuf> {
    tracing::info!("building '{}'", artifact.display());
    let source = read_source(&input).await?;
    let compiled = styles::compile(&input, &source)?;
    writer::write_artifact(&artifact, &compiled, None)?;
    tracing::info!("successfully built '{}'", artifact.display());
    Ok(artifact)
}

async fn read_source(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(Error::from)
}

/// Run every job concurrently, bounded by a cpu-count semaphore, and join.
/// The first failure aborts all in-flight siblings before it is returned;
/// artifacts already written by completed siblings stay on disk.
async fn fan_out<T, F, Fut>(items: Vec<T>, job: F) -> Result<Vec<PathBuf>>
where
    T: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<PathBuf>> + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(num_cpus::get().min(8)));
    let mut set = JoinSet::new();
    for item in items {
        let work = job(item);
        let permits = Arc::clone(&permits);
        set.spawn(async move {
            let _permit = permits.acquire().await.expect("semaphore closed unexpectedly");
            work.await
        });
    }

    let mut written = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok(artifact)) => written.push(artifact),
            Ok(Err(error)) => {
                set.abort_all();
                while set.join_next().await.is_some() {}
                return Err(error);
            }
            Err(join_error) if join_error.is_cancelled() => {}
            Err(join_error) => {
                set.abort_all();
                while set.join_next().await.is_some() {}
                return Err(Error::Task(join_error.to_string()));
            }
        }
    }
    Ok(written)
}
