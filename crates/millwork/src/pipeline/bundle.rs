//! Module bundling stage, delegated to Rolldown.
//!
//! Each entry is bundled on its own: browser platform, IIFE output, every
//! import inlined. The chunk comes back in memory and is minified by the
//! shared [`minify`](super::minify) stage, so Rolldown's own minifier and
//! source-map emission stay off here.

use std::path::{Path, PathBuf};

use rolldown::{BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform};
use rolldown_common::Output;

use crate::{Error, Result};

/// Bundle one entry and return the chunk's code.
pub(crate) async fn bundle_entry(entry: &Path) -> Result<String> {
    let import = absolutize(entry)?;

    let options = BundlerOptions {
        input: Some(vec![InputItem {
            name: None,
            import: import.to_string_lossy().into_owned(),
        }]),
        format: Some(OutputFormat::Iife),
        platform: Some(Platform::Browser),
        ..Default::default()
    };

    let mut bundler = BundlerBuilder::default()
        .with_options(options)
        .build()
        .map_err(|e| bundle_failure(entry, &e))?;

    let output = bundler
        .generate()
        .await
        .map_err(|e| bundle_failure(entry, &e))?;

    for item in &output.assets {
        if let Output::Chunk(chunk) = item {
            return Ok(chunk.code.clone());
        }
    }

    Err(Error::Bundle {
        entry: entry.display().to_string(),
        message: "bundler produced no chunk".to_string(),
    })
}

/// Rolldown treats bare relative inputs as module specifiers; hand it an
/// absolute path instead.
fn absolutize(entry: &Path) -> Result<PathBuf> {
    if entry.is_absolute() {
        return Ok(entry.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(entry))
}

fn bundle_failure(entry: &Path, error: &dyn std::fmt::Debug) -> Error {
    Error::Bundle {
        entry: entry.display().to_string(),
        message: format!("{error:?}"),
    }
}
