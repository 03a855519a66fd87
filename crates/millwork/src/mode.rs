//! Output mode selection and artifact path derivation.
//!
//! The original interface convention here is "destination and filename both
//! given means one combined artifact, anything else means one artifact per
//! input". That decision is made exactly once, at the API boundary, by
//! materializing an [`OutputMode`]; nothing downstream re-derives it from
//! argument presence.

use std::path::{Path, PathBuf};

use crate::source::ResolvedFile;
use crate::{Error, Result};

/// Where artifacts go, decided once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Many-to-many: one artifact per input, mirroring the source's layout
    /// relative to its glob root under `dest` - or written alongside the
    /// source when `dest` is `None`.
    Mirror { dest: Option<PathBuf> },

    /// Many-to-one: every input combined into `dest/filename`. The filename
    /// is used verbatim; no extension substitution is applied.
    Concat { dest: PathBuf, filename: String },
}

impl OutputMode {
    /// Mirror mode writing alongside each source.
    pub fn mirror() -> Self {
        Self::Mirror { dest: None }
    }

    /// Mirror mode rooted at a destination directory.
    pub fn mirror_into(dest: impl Into<PathBuf>) -> Self {
        Self::Mirror {
            dest: Some(dest.into()),
        }
    }

    /// Concat mode: one combined artifact at `dest/filename`.
    pub fn concat(dest: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self::Concat {
            dest: dest.into(),
            filename: filename.into(),
        }
    }

    /// Map the original optional-argument convention onto a mode:
    /// both present means [`Concat`](Self::Concat), a missing filename means
    /// [`Mirror`](Self::Mirror), and a filename without a destination is a
    /// configuration error.
    pub fn infer(
        dest: Option<impl Into<PathBuf>>,
        filename: Option<impl Into<String>>,
    ) -> Result<Self> {
        match (dest, filename) {
            (Some(dest), Some(filename)) => Ok(Self::concat(dest, filename)),
            (dest, None) => Ok(Self::Mirror {
                dest: dest.map(Into::into),
            }),
            (None, Some(_)) => Err(Error::InvalidConfig(
                "an output filename requires a destination directory".to_string(),
            )),
        }
    }
}

/// Derive the mirror-mode artifact path for one source file: the source's
/// path relative to its glob root, re-rooted under `dest` (or left in place),
/// with the final extension replaced by `min_ext`.
pub(crate) fn mirror_artifact(file: &ResolvedFile, dest: Option<&Path>, min_ext: &str) -> PathBuf {
    let located = match dest {
        Some(dir) => {
            let relative = file.path.strip_prefix(&file.base).unwrap_or(&file.path);
            dir.join(relative)
        }
        None => file.path.clone(),
    };
    let stem = located
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index".to_string());
    located.with_file_name(format!("{stem}.{min_ext}"))
}
