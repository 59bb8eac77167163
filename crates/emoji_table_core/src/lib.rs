//! Emoji table generator core.
//!
//! Merges the standard-body emoji list with the community alias dataset and
//! renders one deduplicated definition table for the typesetting layer.

pub mod alias;
pub mod config;
pub mod dedup;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod source;

pub use alias::{glyph_key, AliasError, AliasIndex, AliasRecord};
pub use config::PipelineConfig;
pub use dedup::{dedup_aliases, AliasLedger, DedupReport};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::entry::{Entry, RawEntry, Version};
pub use model::tree::{GroupTree, TreeError};
pub use normalize::{canonical_name, normalize_entry, texify, NormalizeError};
pub use pipeline::{
    build_table, check, run, BuiltTable, CheckOutcome, PipelineError, PipelineReport,
    PipelineResult,
};
pub use render::{parse_def_line, render_table, DefLine, GeneratorInfo, RenderOptions, TableLayout};
pub use source::{parse_emoji_test, ParsedSource, SourceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
