//! End-to-end table generation.
//!
//! # Responsibility
//! - Read both datasets to completion before transforming anything.
//! - Run parse → alias join → normalize → dedup → render.
//! - Replace the output file atomically, or not at all.
//!
//! # Invariants
//! - Any fatal error leaves a previously written output file untouched.
//! - Identical inputs produce byte-identical output.

use crate::alias::{AliasError, AliasIndex};
use crate::config::PipelineConfig;
use crate::dedup::dedup_aliases;
use crate::model::entry::Entry;
use crate::model::tree::GroupTree;
use crate::normalize::{normalize_entry, NormalizeError};
use crate::render::render_table;
use crate::source::{parse_emoji_test, SourceError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[cfg(unix)]
const NEW_OUTPUT_MODE: u32 = 0o644;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal pipeline failure; no output is written when one is returned.
#[derive(Debug)]
pub enum PipelineError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Source(SourceError),
    Alias(AliasError),
    Normalize(NormalizeError),
}

impl PipelineError {
    /// True for structurally malformed standard-body input.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::Source(_) | Self::Normalize(_))
    }

    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_failed",
            Self::Source(_) => "malformed_source",
            Self::Alias(_) => "malformed_aliases",
            Self::Normalize(_) => "malformed_code_point",
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Source(err) => write!(f, "malformed emoji list: {err}"),
            Self::Alias(err) => write!(f, "{err}"),
            Self::Normalize(err) => write!(f, "malformed emoji list: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Source(err) => Some(err),
            Self::Alias(err) => Some(err),
            Self::Normalize(err) => Some(err),
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<AliasError> for PipelineError {
    fn from(value: AliasError) -> Self {
        Self::Alias(value)
    }
}

impl From<NormalizeError> for PipelineError {
    fn from(value: NormalizeError) -> Self {
        Self::Normalize(value)
    }
}

/// Counters describing one generated table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub groups: usize,
    pub subgroups: usize,
    pub entries: usize,
    pub skipped_lines: usize,
    pub kept_aliases: usize,
    pub dropped_aliases: usize,
}

/// Normalized, deduplicated table plus its counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTable {
    pub tree: GroupTree<Entry>,
    pub report: PipelineReport,
}

/// Result of comparing a freshly rendered table with the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    UpToDate,
    Stale,
    Missing,
}

/// Builds the table from in-memory dataset contents.
///
/// # Errors
/// - `Source` for entries outside group/subgroup sections.
/// - `Alias` for an alias dataset that is not a JSON record array.
/// - `Normalize` for unsupported code point widths or invalid scalars.
pub fn build_table(unicode_text: &str, alias_json: &str) -> PipelineResult<BuiltTable> {
    let parsed = parse_emoji_test(unicode_text)?;
    let aliases = AliasIndex::from_json(alias_json)?;
    let mut tree = parsed
        .tree
        .try_map(|raw| normalize_entry(raw, &aliases))?;
    let dedup = dedup_aliases(&mut tree);

    let report = PipelineReport {
        groups: tree.group_count(),
        subgroups: tree.subgroup_count(),
        entries: tree.entry_count(),
        skipped_lines: parsed.skipped_lines,
        kept_aliases: dedup.kept_aliases,
        dropped_aliases: dedup.dropped_aliases,
    };
    Ok(BuiltTable { tree, report })
}

/// Reads both inputs and renders the output text without writing it.
pub fn render_from_config(config: &PipelineConfig) -> PipelineResult<(String, PipelineReport)> {
    let unicode_text = read_input(&config.unicode_data)?;
    let alias_json = read_input(&config.alias_data)?;
    let built = build_table(&unicode_text, &alias_json)?;
    let rendered = render_table(&built.tree, &config.render_options());
    Ok((rendered, built.report))
}

/// Generates the table and atomically replaces `config.output`.
///
/// # Side effects
/// - Emits `pipeline_run` logging events with duration and status.
pub fn run(config: &PipelineConfig) -> PipelineResult<PipelineReport> {
    let started_at = Instant::now();
    info!(
        "event=pipeline_run module=pipeline status=start unicode_data={} alias_data={} output={}",
        config.unicode_data.display(),
        config.alias_data.display(),
        config.output.display()
    );

    let result = render_from_config(config)
        .and_then(|(rendered, report)| write_atomically(&config.output, &rendered).map(|()| report));

    match &result {
        Ok(report) => info!(
            "event=pipeline_run module=pipeline status=ok duration_ms={} groups={} subgroups={} entries={} skipped_lines={} kept_aliases={} dropped_aliases={}",
            started_at.elapsed().as_millis(),
            report.groups,
            report.subgroups,
            report.entries,
            report.skipped_lines,
            report.kept_aliases,
            report.dropped_aliases
        ),
        Err(err) => error!(
            "event=pipeline_run module=pipeline status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

/// Renders the table and compares it with the existing output file.
pub fn check(config: &PipelineConfig) -> PipelineResult<CheckOutcome> {
    let (rendered, _) = render_from_config(config)?;
    let outcome = match std::fs::read(&config.output) {
        Ok(existing) if existing == rendered.as_bytes() => CheckOutcome::UpToDate,
        Ok(_) => CheckOutcome::Stale,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => CheckOutcome::Missing,
        Err(err) => return Err(PipelineError::io(&config.output)(err)),
    };
    info!(
        "event=pipeline_check module=pipeline status=ok output={} outcome={:?}",
        config.output.display(),
        outcome
    );
    Ok(outcome)
}

fn read_input(path: &Path) -> PipelineResult<String> {
    std::fs::read_to_string(path).map_err(PipelineError::io(path))
}

fn write_atomically(path: &Path, contents: &str) -> PipelineResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(PipelineError::io(dir))?;
    let staged_path = staged.path().to_path_buf();
    staged
        .write_all(contents.as_bytes())
        .and_then(|()| staged.flush())
        .map_err(PipelineError::io(&staged_path))?;
    let permissions = output_permissions(path, &staged)?;
    staged
        .as_file()
        .set_permissions(permissions)
        .map_err(PipelineError::io(&staged_path))?;
    staged
        .persist(path)
        .map_err(|err| PipelineError::io(path)(err.error))?;
    Ok(())
}

/// Permissions for the replacement file: those of the file being replaced,
/// otherwise `0644` (the staged file itself is created `0600`).
fn output_permissions(
    path: &Path,
    staged: &tempfile::NamedTempFile,
) -> PipelineResult<std::fs::Permissions> {
    match std::fs::metadata(path) {
        Ok(existing) => Ok(existing.permissions()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => new_file_permissions(staged),
        Err(err) => Err(PipelineError::io(path)(err)),
    }
}

#[cfg(unix)]
fn new_file_permissions(_staged: &tempfile::NamedTempFile) -> PipelineResult<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(std::fs::Permissions::from_mode(NEW_OUTPUT_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions(staged: &tempfile::NamedTempFile) -> PipelineResult<std::fs::Permissions> {
    staged
        .as_file()
        .metadata()
        .map(|metadata| metadata.permissions())
        .map_err(PipelineError::io(staged.path()))
}
