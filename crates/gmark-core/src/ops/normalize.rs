//! Canonical forms of a marking set
//!
//! *Expanded* form has one entry per (ref, selector) pair and is used for
//! exact set arithmetic. *Compressed* form has one entry per non-empty ref with
//! its selectors sorted and deduplicated, ordered by ref; it is the only form
//! ever persisted on an object.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::model::{GranularMarking, MarkingRef, Selector};

/// Split every entry into one atomic entry per selector
///
/// Output order is entry order, then selector order within the entry. Blank
/// refs are carried through; `compress` drops them.
pub fn expand(entries: &[GranularMarking]) -> Vec<GranularMarking> {
    entries
        .iter()
        .flat_map(|entry| {
            entry
                .selectors
                .iter()
                .map(move |selector| GranularMarking::atomic(entry.marking_ref.clone(), selector.clone()))
        })
        .collect()
}

/// Merge entries sharing a ref into one entry holding the sorted union of selectors
///
/// Entries with a blank ref are dropped. An empty result means "no markings";
/// the caller persists that as an absent field.
pub fn compress<I>(entries: I) -> Vec<GranularMarking>
where
    I: IntoIterator<Item = GranularMarking>,
{
    let mut by_ref: BTreeMap<MarkingRef, BTreeSet<Selector>> = BTreeMap::new();

    for entry in entries {
        if entry.marking_ref.is_blank() {
            continue;
        }
        by_ref
            .entry(entry.marking_ref)
            .or_default()
            .extend(entry.selectors);
    }

    by_ref
        .into_iter()
        .filter(|(_, selectors)| !selectors.is_empty())
        .map(|(marking_ref, selectors)| GranularMarking {
            marking_ref,
            selectors: selectors.into_iter().collect(),
        })
        .collect()
}

/// Whether `entries` already satisfies every compressed-form invariant
pub fn is_compressed(entries: &[GranularMarking]) -> bool {
    let mut seen = HashSet::new();
    entries.iter().all(|entry| {
        !entry.marking_ref.is_blank()
            && !entry.selectors.is_empty()
            && entry.selectors.windows(2).all(|w| w[0] < w[1])
            && seen.insert(&entry.marking_ref)
    })
}
