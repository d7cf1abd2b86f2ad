use std::collections::{BTreeSet, HashSet};

use super::matcher::MatchOptions;
use super::normalize::{compress, expand};
use super::versioning::Versioner;
use crate::errors::{MarkingError, Result};
use crate::model::{
    normalize_markings, normalize_selectors, GranularMarking, MarkedObject, MarkingList,
    MarkingRef, Selector, SelectorList,
};
use crate::rules::SelectorValidator;

/// Marking refs that apply to the selectors
///
/// Matching runs over the stored (compressed) entries; see
/// [`MatchOptions`] for inherited and descendant matching.
///
/// # Returns
/// Duplicate-free refs in sorted order; empty when the object has no markings.
/// Stored entries with a blank ref never contribute.
///
/// # Errors
/// * `InvalidSelector` - a selector fails validation
pub fn get_markings(
    validator: &dyn SelectorValidator,
    object: &MarkedObject,
    selectors: impl Into<SelectorList>,
    options: MatchOptions,
) -> Result<Vec<MarkingRef>> {
    let selectors = normalize_selectors(selectors);
    validator.validate(object, &selectors)?;

    let mut results = BTreeSet::new();
    for entry in stored_markings(object) {
        if matches_any(entry, &selectors, options) {
            results.insert(entry.marking_ref.clone());
        }
    }

    Ok(results.into_iter().collect())
}

/// Whether the selectors are marked at all, or by every requested marking
///
/// With no markings requested (none or an empty list) the answer is "does any
/// marking apply". Otherwise every requested ref must be among the refs that
/// apply; one missing ref makes the answer `false`.
///
/// # Errors
/// * `MissingArgument` - `selectors` was not supplied
/// * `InvalidSelector` - a selector fails validation
pub fn is_marked(
    validator: &dyn SelectorValidator,
    object: &MarkedObject,
    marking: impl Into<MarkingList>,
    selectors: Option<SelectorList>,
    options: MatchOptions,
) -> Result<bool> {
    let selectors = selectors.ok_or(MarkingError::MissingArgument {
        argument: "selectors",
    })?;
    let selectors = normalize_selectors(selectors);
    let requested: HashSet<MarkingRef> = normalize_markings(marking).into_iter().collect();
    validator.validate(object, &selectors)?;

    let mut marked = false;
    let mut found = HashSet::new();

    for entry in stored_markings(object) {
        if matches_any(entry, &selectors, options) {
            marked = true;
            if requested.contains(&entry.marking_ref) {
                found.insert(&entry.marking_ref);
            }
        }
    }

    if requested.is_empty() {
        return Ok(marked);
    }
    Ok(requested.iter().all(|m| found.contains(m)))
}

/// Apply each marking to all of the selectors
///
/// New entries are combined with the existing set and recompressed, so a ref
/// already present simply gains the new selectors.
///
/// # Errors
/// * `InvalidSelector` - a selector fails validation
/// * any error raised by the versioner
pub fn add_markings(
    validator: &dyn SelectorValidator,
    versioner: &dyn Versioner,
    object: &MarkedObject,
    marking: impl Into<MarkingList>,
    selectors: impl Into<SelectorList>,
) -> Result<MarkedObject> {
    let mut selectors = normalize_selectors(selectors);
    let marking = normalize_markings(marking);
    validator.validate(object, &selectors)?;

    selectors.sort();
    let mut combined: Vec<GranularMarking> = marking
        .into_iter()
        .map(|m| GranularMarking::new(m, selectors.clone()))
        .collect();
    combined.extend_from_slice(object.granular_markings());

    let compressed = compress(expand(&combined));
    tracing::debug!(
        object_id = ?object.id(),
        entry_count = compressed.len(),
        "markings added"
    );

    versioner.with_markings(object, non_empty(compressed))
}

/// Remove exactly the (marking, selector) pairs requested
///
/// Every combination of requested marking and selector is one pair. At least
/// one of those pairs must currently exist; pairs that do not exist are
/// ignored. An object without any markings is returned unchanged.
///
/// # Errors
/// * `InvalidSelector` - a selector fails validation
/// * `MarkingNotFound` - none of the requested pairs exist on the object
/// * any error raised by the versioner
pub fn remove_markings(
    validator: &dyn SelectorValidator,
    versioner: &dyn Versioner,
    object: &MarkedObject,
    marking: impl Into<MarkingList>,
    selectors: impl Into<SelectorList>,
) -> Result<MarkedObject> {
    let selectors = normalize_selectors(selectors);
    let marking = normalize_markings(marking);
    validator.validate(object, &selectors)?;

    if !object.has_granular_markings() {
        tracing::debug!(object_id = ?object.id(), "no markings to remove");
        return Ok(object.clone());
    }

    let current = expand(object.granular_markings());
    let requested: Vec<GranularMarking> = marking
        .iter()
        .map(|m| GranularMarking::new(m.clone(), selectors.clone()))
        .collect();
    let to_remove: HashSet<GranularMarking> = expand(&requested).into_iter().collect();

    // Precondition first: nothing below runs unless at least one pair exists
    if !current.iter().any(|entry| to_remove.contains(entry)) {
        return Err(not_found(object, to_remove.iter()));
    }

    let remaining = current
        .into_iter()
        .filter(|entry| !to_remove.contains(entry));
    let compressed = compress(remaining);
    tracing::debug!(
        object_id = ?object.id(),
        entry_count = compressed.len(),
        "markings removed"
    );

    versioner.with_markings(object, non_empty(compressed))
}

/// Remove every marking stored on exactly these selectors
///
/// Stored selectors are compared by equality; a marking on `a.b` is not
/// cleared by clearing `a`. An object without any markings is returned
/// unchanged.
///
/// # Errors
/// * `InvalidSelector` - a selector fails validation
/// * `MarkingNotFound` - no stored entry carries any of the selectors
/// * any error raised by the versioner
pub fn clear_markings(
    validator: &dyn SelectorValidator,
    versioner: &dyn Versioner,
    object: &MarkedObject,
    selectors: impl Into<SelectorList>,
) -> Result<MarkedObject> {
    let selectors = normalize_selectors(selectors);
    validator.validate(object, &selectors)?;

    if !object.has_granular_markings() {
        tracing::debug!(object_id = ?object.id(), "no markings to clear");
        return Ok(object.clone());
    }

    let targets: HashSet<&Selector> = selectors.iter().collect();
    let mut current = expand(object.granular_markings());

    if !current
        .iter()
        .any(|entry| entry.selectors.iter().any(|s| targets.contains(s)))
    {
        let wanted: Vec<GranularMarking> = selectors
            .iter()
            .map(|s| GranularMarking::atomic(MarkingRef::blank(), s.clone()))
            .collect();
        return Err(not_found(object, wanted.iter()));
    }

    for entry in current.iter_mut() {
        if entry.selectors.iter().any(|s| targets.contains(s)) {
            entry.marking_ref = MarkingRef::blank();
        }
    }

    let compressed = compress(current);
    tracing::debug!(
        object_id = ?object.id(),
        entry_count = compressed.len(),
        "markings cleared"
    );

    versioner.with_markings(object, non_empty(compressed))
}

/// Replace whatever marks the selectors with exactly the given markings
///
/// `clear_markings` followed by `add_markings`; inherits the clear's
/// `MarkingNotFound` when the object has markings but none on these selectors.
///
/// # Errors
/// * `InvalidSelector` - a selector fails validation
/// * `MarkingNotFound` - see above
/// * any error raised by the versioner
pub fn set_markings(
    validator: &dyn SelectorValidator,
    versioner: &dyn Versioner,
    object: &MarkedObject,
    marking: impl Into<MarkingList>,
    selectors: impl Into<SelectorList>,
) -> Result<MarkedObject> {
    let selectors: SelectorList = selectors.into();
    let cleared = clear_markings(validator, versioner, object, selectors.clone())?;
    add_markings(validator, versioner, &cleared, marking, selectors)
}

/// Stored entries that carry a marking; a blank ref marks nothing
fn stored_markings(object: &MarkedObject) -> impl Iterator<Item = &GranularMarking> {
    object
        .granular_markings()
        .iter()
        .filter(|entry| !entry.marking_ref.is_blank())
}

fn matches_any(entry: &GranularMarking, selectors: &[Selector], options: MatchOptions) -> bool {
    selectors.iter().any(|query| {
        entry
            .selectors
            .iter()
            .any(|stored| options.matches(query, stored))
    })
}

fn non_empty(markings: Vec<GranularMarking>) -> Option<Vec<GranularMarking>> {
    if markings.is_empty() {
        None
    } else {
        Some(markings)
    }
}

fn not_found<'a>(
    object: &MarkedObject,
    requested: impl Iterator<Item = &'a GranularMarking>,
) -> MarkingError {
    let mut requested: Vec<String> = requested.map(GranularMarking::describe).collect();
    requested.sort();
    MarkingError::MarkingNotFound {
        object_id: object.id().map(str::to_string),
        requested,
    }
}
