//! Pipeline run configuration.
//!
//! Defaults reproduce the fixed file layout of the generator checkout:
//! inputs under `./data`, table written to the working directory.

use crate::render::{GeneratorInfo, RenderOptions, TableLayout};
use std::path::PathBuf;

pub const DEFAULT_UNICODE_DATA_FILE: &str = "./data/emoji-12.1/emoji-test.txt";
pub const DEFAULT_ALIAS_DATA_FILE: &str = "./data/github/emoji.json";
pub const DEFAULT_OUTPUT_FILE: &str = "emoji-table.def";

/// Inputs, output and rendering options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Standard-body list (`emoji-test.txt`).
    pub unicode_data: PathBuf,
    /// Alias dataset (gemoji `emoji.json`).
    pub alias_data: PathBuf,
    pub output: PathBuf,
    pub layout: TableLayout,
    pub info: GeneratorInfo,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            unicode_data: PathBuf::from(DEFAULT_UNICODE_DATA_FILE),
            alias_data: PathBuf::from(DEFAULT_ALIAS_DATA_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            layout: TableLayout::default(),
            info: GeneratorInfo::default(),
        }
    }
}

impl PipelineConfig {
    /// File name written into the provenance and end-of-file lines.
    ///
    /// Falls back to the full output path when it has no file name component.
    pub fn output_file_name(&self) -> String {
        self.output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.display().to_string())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            file_name: self.output_file_name(),
            info: self.info.clone(),
            layout: self.layout,
        }
    }
}
