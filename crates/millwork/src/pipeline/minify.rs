//! Standalone JavaScript minification stage.
//!
//! Every JS artifact - bundled module output, pass-through script, or
//! concatenated combination - funnels through this one OXC
//! parse -> minify -> codegen pass, which also produces the source map.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::{Error, Result};

pub(crate) struct Minified {
    pub code: String,
    pub map: Option<String>,
}

/// Minify one script. `source_path` names the code in diagnostics and in the
/// emitted source map's `sources` array.
pub(crate) fn minify(source_path: &Path, source: &str) -> Result<Minified> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(source_path).unwrap_or_default();

    let parsed = Parser::new(&allocator, source, source_type).parse();
    if !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Minify {
            file: source_path.display().to_string(),
            message,
        });
    }

    let mut program = parsed.program;
    let minified = Minifier::new(MinifierOptions::default()).minify(&allocator, &mut program);

    let output = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            source_map_path: Some(source_path.to_path_buf()),
            ..CodegenOptions::default()
        })
        .with_scoping(minified.scoping)
        .build(&program);

    Ok(Minified {
        code: output.code,
        map: output.map.map(|map| map.to_json_string()),
    })
}
