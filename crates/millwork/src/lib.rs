#![cfg_attr(docsrs, feature(doc_cfg))]

//! # millwork
//!
//! Build orchestration for web asset trees.
//!
//! This crate is glue: it selects source files with glob patterns, decides
//! where the finished artifacts go, and drives external toolchains - Rolldown
//! for bundling, the OXC minifier for JavaScript, and lightningcss for
//! stylesheets - to produce them. There is no compiler in here.
//!
//! Four operations cover the whole surface. Each takes a [`SourceSpec`] and an
//! [`OutputMode`]:
//!
//! - [`build_modules`] bundles and minifies ECMAScript-next module entries.
//! - [`watch_modules`] does the same, then keeps rebuilding on file changes
//!   until the returned [`WatchSession`] is dropped.
//! - [`build_scripts`] minifies already-compiled scripts without bundling.
//! - [`build_styles`] compiles and minifies stylesheets.
//!
//! ## Quick Start
//!
//! ### One artifact per source
//!
//! ```no_run
//! use millwork::{build_scripts, OutputMode};
//!
//! # #[tokio::main]
//! # async fn main() -> millwork::Result<()> {
//! // src/a.js -> dist/a.min.js (+ .map), src/deep/b.js -> dist/deep/b.min.js
//! let report = build_scripts("src/**/*.js", OutputMode::mirror_into("dist")).await?;
//! println!("wrote {} artifacts", report.artifacts.len());
//! # Ok(()) }
//! ```
//!
//! ### Everything combined into one artifact
//!
//! ```no_run
//! use millwork::{build_modules, OutputMode};
//!
//! # #[tokio::main]
//! # async fn main() -> millwork::Result<()> {
//! // out/app.min.js and out/app.min.js.map
//! build_modules(
//!     vec!["src/pages/**/*.js".to_string(), "!src/pages/**/*.test.js".to_string()],
//!     OutputMode::concat("out", "app.min.js"),
//! )
//! .await?;
//! # Ok(()) }
//! ```
//!
//! ### Rebuild on change
//!
//! ```no_run
//! use millwork::{watch_modules, OutputMode};
//!
//! # #[tokio::main]
//! # async fn main() -> millwork::Result<()> {
//! let session = watch_modules("src/main.js", OutputMode::mirror()).await?;
//! // ... edits to src/main.js now rebuild src/main.min.js automatically ...
//! session.close();
//! # Ok(()) }
//! ```

pub mod build;
pub mod mode;
pub mod source;
pub mod watch;

pub(crate) mod pipeline;
pub(crate) mod stale;
pub(crate) mod writer;

pub use build::{BuildReport, build_modules, build_scripts, build_styles, watch_modules};
pub use mode::OutputMode;
pub use source::SourceSpec;
pub use watch::WatchSession;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{init_logging, init_logging_from_env};

/// Error types for millwork operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A source pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Error from the Rolldown bundler.
    #[error("Bundling failed for '{entry}': {message}")]
    Bundle { entry: String, message: String },

    /// Error from the OXC parse/minify chain.
    #[error("Minification failed for '{file}': {message}")]
    Minify { file: String, message: String },

    /// Error from the lightningcss compiler.
    #[error("Stylesheet compilation failed for '{file}': {message}")]
    Stylesheet { file: String, message: String },

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// A fanned-out build task died without returning.
    #[error("Build task failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the file watcher.
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type alias for millwork operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Pattern { .. } => "INVALID_PATTERN",
            Error::Bundle { .. } => "BUNDLE_ERROR",
            Error::Minify { .. } => "MINIFY_ERROR",
            Error::Stylesheet { .. } => "STYLESHEET_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::Task(_) => "TASK_FAILURE",
            Error::Io(_) => "IO_ERROR",
            Error::Watch(_) => "WATCH_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Pattern { pattern, .. } => Some(Box::new(format!(
                "Check the glob syntax of '{}'. Exclusions take a leading '!'.",
                pattern
            ))),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' escapes the destination directory. Output filenames must stay inside it.",
                path
            ))),
            Error::WriteFailure(_) => Some(Box::new(
                "Failed to write an artifact. Check disk space and permissions.".to_string(),
            )),
            Error::InvalidConfig(msg) => Some(Box::new(msg.clone())),
            _ => None,
        }
    }
}
