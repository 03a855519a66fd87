//! Stylesheet compilation stage, delegated to lightningcss.

use std::path::Path;

use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};

use crate::{Error, Result};

/// Compile and minify one stylesheet. No source maps are emitted for
/// stylesheet artifacts.
pub(crate) fn compile(path: &Path, source: &str) -> Result<String> {
    let filename = path.display().to_string();

    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.clone(),
            ..Default::default()
        },
    )
    .map_err(|e| Error::Stylesheet {
        file: filename.clone(),
        message: format!("{e:?}"),
    })?;

    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| Error::Stylesheet {
            file: filename.clone(),
            message: format!("{e:?}"),
        })?;

    let output = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| Error::Stylesheet {
            file: filename,
            message: format!("{e:?}"),
        })?;

    Ok(output.code)
}
