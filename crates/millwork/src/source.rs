//! Source selection: glob patterns in, ordered file lists out.
//!
//! A [`SourceSpec`] is one or more glob patterns or explicit paths; entries
//! with a leading `!` exclude matches from the rest of the set. Resolution
//! walks from each pattern's literal prefix directory and records that prefix
//! as the file's *base*, which mirror-mode output placement later strips to
//! recover the source's relative layout.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::{Error, Result};

/// One or more glob patterns or explicit paths selecting source files.
///
/// Entries prefixed with `!` are exclusions layered over the inclusions:
///
/// ```
/// use millwork::SourceSpec;
///
/// let spec = SourceSpec::new(["src/**/*.js", "!src/**/*.test.js"]);
/// assert_eq!(spec.patterns().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    patterns: Vec<String>,
}

impl SourceSpec {
    /// Create a spec from any collection of pattern strings.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// The patterns in caller order, exclusions included.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl From<&str> for SourceSpec {
    fn from(pattern: &str) -> Self {
        Self::new([pattern])
    }
}

impl From<String> for SourceSpec {
    fn from(pattern: String) -> Self {
        Self::new([pattern])
    }
}

impl From<Vec<String>> for SourceSpec {
    fn from(patterns: Vec<String>) -> Self {
        Self::new(patterns)
    }
}

impl From<Vec<&str>> for SourceSpec {
    fn from(patterns: Vec<&str>) -> Self {
        Self::new(patterns)
    }
}

impl<const N: usize> From<[&str; N]> for SourceSpec {
    fn from(patterns: [&str; N]) -> Self {
        Self::new(patterns)
    }
}

/// A resolved source file together with the literal prefix it was matched
/// under. `path.strip_prefix(&base)` yields the layout mirror mode preserves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedFile {
    pub path: PathBuf,
    pub base: PathBuf,
}

/// Expand a spec into a concrete, order-stable, deduplicated file list.
///
/// Zero matches is a legal outcome, not an error; only pattern syntax errors
/// fail. Explicit paths that do not exist on disk resolve to nothing.
pub(crate) fn resolve(spec: &SourceSpec) -> Result<Vec<ResolvedFile>> {
    let excludes = compile_excludes(spec)?;

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();

    for pattern in spec.patterns() {
        if pattern.starts_with('!') {
            continue;
        }

        if !has_glob_meta(pattern) {
            let path = PathBuf::from(pattern);
            if !path.is_file() {
                tracing::debug!("'{}' does not exist, skipping", path.display());
                continue;
            }
            if excluded(&excludes, &path) || !seen.insert(path.clone()) {
                continue;
            }
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            files.push(ResolvedFile { path, base });
            continue;
        }

        let base = glob_root(pattern);
        let matcher = compile(pattern)?.compile_matcher();
        for entry in WalkDir::new(&base)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            let path = normalize_walked(entry.into_path());
            if !matcher.is_match(&path) || excluded(&excludes, &path) {
                continue;
            }
            if seen.insert(path.clone()) {
                files.push(ResolvedFile {
                    path,
                    base: base.clone(),
                });
            }
        }
    }

    Ok(files)
}

fn compile(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_excludes(spec: &SourceSpec) -> Result<Option<GlobSet>> {
    let mut builder = GlobSetBuilder::new();
    let mut any = false;
    for pattern in spec.patterns() {
        if let Some(negated) = pattern.strip_prefix('!') {
            builder.add(compile(negated)?);
            any = true;
        }
    }
    if !any {
        return Ok(None);
    }
    let set = builder.build().map_err(|source| Error::Pattern {
        pattern: "<exclusions>".to_string(),
        source,
    })?;
    Ok(Some(set))
}

fn excluded(excludes: &Option<GlobSet>, path: &Path) -> bool {
    excludes.as_ref().is_some_and(|set| set.is_match(path))
}

fn has_glob_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// Longest literal prefix directory of a glob pattern; `"."` when the very
/// first component carries glob syntax.
fn glob_root(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in Path::new(pattern).components() {
        match component {
            Component::Normal(part) if !has_glob_meta(&part.to_string_lossy()) => root.push(part),
            Component::Normal(_) => break,
            other => root.push(other),
        }
    }
    // The final literal component is the filename, not a directory, when the
    // whole pattern is meta-free; resolve() never calls us for that case.
    if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root
    }
}

/// WalkDir prefixes entries with the root as given, so walking `"."` yields
/// `./foo.js` which a pattern like `*.js` will not match. Strip it.
fn normalize_walked(path: PathBuf) -> PathBuf {
    path.strip_prefix(".").map(Path::to_path_buf).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "x").unwrap();
        path
    }

    #[test]
    fn test_glob_root() {
        assert_eq!(glob_root("src/**/*.js"), PathBuf::from("src"));
        assert_eq!(glob_root("src/deep/dir/*.css"), PathBuf::from("src/deep/dir"));
        assert_eq!(glob_root("**/*.js"), PathBuf::from("."));
        assert_eq!(glob_root("*.js"), PathBuf::from("."));
    }

    #[test]
    fn test_has_glob_meta() {
        assert!(has_glob_meta("src/**/*.js"));
        assert!(has_glob_meta("a?.js"));
        assert!(!has_glob_meta("src/app.js"));
    }

    #[test]
    fn test_resolve_preserves_structure_info() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "src/outer.js");
        touch(tmp.path(), "src/deep/inner.js");

        let pattern = format!("{}/src/**/*.js", tmp.path().display());
        let files = resolve(&SourceSpec::from(pattern)).unwrap();

        assert_eq!(files.len(), 2);
        let rels: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(&f.base).unwrap().to_path_buf())
            .collect();
        assert!(rels.contains(&PathBuf::from("outer.js")));
        assert!(rels.contains(&PathBuf::from("deep/inner.js")));
    }

    #[test]
    fn test_resolve_exclusions() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "src/app.js");
        touch(tmp.path(), "src/app.test.js");

        let spec = SourceSpec::new([
            format!("{}/src/**/*.js", tmp.path().display()),
            format!("!{}/src/**/*.test.js", tmp.path().display()),
        ]);
        let files = resolve(&spec).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("app.js"));
    }

    #[test]
    fn test_resolve_explicit_paths_keep_caller_order() {
        let tmp = TempDir::new().unwrap();
        let b = touch(tmp.path(), "b.js");
        let a = touch(tmp.path(), "a.js");

        let spec = SourceSpec::new([b.display().to_string(), a.display().to_string()]);
        let files = resolve(&spec).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, b);
        assert_eq!(files[1].path, a);
    }

    #[test]
    fn test_resolve_missing_and_duplicate_entries() {
        let tmp = TempDir::new().unwrap();
        let a = touch(tmp.path(), "a.js");

        let spec = SourceSpec::new([
            a.display().to_string(),
            a.display().to_string(),
            tmp.path().join("missing.js").display().to_string(),
        ]);
        let files = resolve(&spec).unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_resolve_zero_matches_is_empty_not_error() {
        let tmp = TempDir::new().unwrap();
        let pattern = format!("{}/nothing/**/*.js", tmp.path().display());
        assert!(resolve(&SourceSpec::from(pattern)).unwrap().is_empty());
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        assert!(matches!(
            resolve(&SourceSpec::from("src/[unclosed")),
            Err(Error::Pattern { .. })
        ));
    }
}
