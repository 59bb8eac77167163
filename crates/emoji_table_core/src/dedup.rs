//! Table-wide alias deduplication.
//!
//! # Responsibility
//! - Strip aliases that collide with any canonical name.
//! - Strip aliases already claimed by an earlier entry in traversal order.
//!
//! # Invariants
//! - The ledger is seeded with every canonical name before the walk starts.
//! - Traversal order is (group, subgroup, entry) declaration order; the
//!   earlier entry keeps a contested alias.
//! - Each entry's aliases are rewritten exactly once, sorted.

use crate::model::entry::Entry;
use crate::model::tree::GroupTree;
use log::debug;
use std::collections::BTreeSet;

/// Names and aliases already claimed during one deduplication run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasLedger {
    claimed: BTreeSet<String>,
}

impl AliasLedger {
    /// Seeds the ledger with every canonical name in the table.
    pub fn seeded_from(tree: &GroupTree<Entry>) -> Self {
        Self {
            claimed: tree
                .iter_entries()
                .map(|entry| entry.canonical_name.clone())
                .collect(),
        }
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    /// Filters `raw` down to unclaimed aliases and claims them.
    ///
    /// Aliases are hyphenated (`_` → `-`), deduplicated and sorted first.
    pub fn claim(&mut self, raw: &[String]) -> Vec<String> {
        let candidates: BTreeSet<String> =
            raw.iter().map(|alias| alias.replace('_', "-")).collect();
        let surviving: Vec<String> = candidates
            .into_iter()
            .filter(|alias| !self.claimed.contains(alias))
            .collect();
        self.claimed.extend(surviving.iter().cloned());
        surviving
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Summary of one deduplication run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub kept_aliases: usize,
    pub dropped_aliases: usize,
}

/// Rewrites every entry's aliases in traversal order.
pub fn dedup_aliases(tree: &mut GroupTree<Entry>) -> DedupReport {
    let mut ledger = AliasLedger::seeded_from(tree);
    let mut report = DedupReport::default();

    for entry in tree.iter_entries_mut() {
        let distinct = entry
            .aliases
            .iter()
            .map(|alias| alias.replace('_', "-"))
            .collect::<BTreeSet<_>>()
            .len();
        entry.aliases = ledger.claim(&entry.aliases);
        report.kept_aliases += entry.aliases.len();
        report.dropped_aliases += distinct - entry.aliases.len();
    }

    debug!(
        "event=alias_dedup module=dedup status=ok kept={} dropped={}",
        report.kept_aliases, report.dropped_aliases
    );
    report
}
