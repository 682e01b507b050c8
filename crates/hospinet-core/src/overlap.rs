//! # Overlap Resolver
//!
//! Repairs overlapping stays of the same subject.
//!
//! A subject cannot be in two facilities at once, so overlapping stay
//! intervals are data errors. Resolution is iterative: each pass walks every
//! subject's stays in chronological order and pairs each unresolved stay with
//! the first later stay it overlaps; passes repeat until no overlaps remain
//! or the iteration cap is hit.
//!
//! ## Pair Resolution
//!
//! For an overlapping pair where `a` starts no later than `b`:
//!
//! | Case | Result |
//! |------|--------|
//! | same facility | merged into `[a.adm, max(a.dis, b.dis)]` |
//! | `b` nested inside `a` | `a` split around `b` |
//! | otherwise | `a` trimmed to end at `b.adm` |
//!
//! Pieces of `a` reduced to zero length are dropped: `b` covers them.
//! Non-convergence is not an error; callers probe with [`num_overlaps`].

use crate::{HospinetError, StayRecord, SubjectId};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Count same-subject pairs of stays whose intervals overlap.
///
/// Every unordered pair is counted once, so three mutually overlapping stays
/// count as three overlaps.
#[must_use]
pub fn num_overlaps(records: &[StayRecord]) -> usize {
    let mut count = 0;
    for stays in group_by_subject(records).values_mut() {
        stays.sort_by(|a, b| a.admission.total_cmp(&b.admission));
        for (i, earlier) in stays.iter().enumerate() {
            for later in &stays[i + 1..] {
                // Sorted by admission: nothing further can start before `earlier` ends.
                if later.admission >= earlier.discharge {
                    break;
                }
                if earlier.overlaps(later) {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Resolve overlapping stays, running at most `n_iters` passes.
///
/// Returns the records sorted by (subject, admission, discharge, facility).
/// If the cap is reached with overlaps remaining, the best-effort table is
/// returned and a warning is logged.
///
/// # Errors
///
/// Returns `HospinetError::UnorderedInterval` if any record has a
/// non-finite bound or is discharged before admission.
pub fn fix_overlaps(records: &[StayRecord], n_iters: usize) -> Result<Vec<StayRecord>, HospinetError> {
    for record in records {
        validate_interval(record)?;
    }

    let mut current = records.to_vec();
    let mut remaining = num_overlaps(&current);
    let mut passes = 0;

    while remaining > 0 && passes < n_iters {
        current = resolve_pass(current);
        passes += 1;
        remaining = num_overlaps(&current);
        tracing::debug!(pass = passes, remaining, "overlap resolution pass");
    }

    if remaining > 0 {
        tracing::warn!(
            remaining,
            n_iters,
            "overlaps remain after exhausting the iteration cap"
        );
    } else {
        tracing::debug!(passes, "all overlaps resolved");
    }

    current.sort_by(|a, b| a.subject.cmp(&b.subject).then_with(|| chronological(a, b)));
    Ok(current)
}

/// Reject records whose interval cannot take part in an overlap decision.
fn validate_interval(record: &StayRecord) -> Result<(), HospinetError> {
    let ordered = record.admission.is_finite()
        && record.discharge.is_finite()
        && record.admission <= record.discharge;
    if ordered {
        Ok(())
    } else {
        Err(HospinetError::UnorderedInterval {
            subject: record.subject.clone(),
            admission: record.admission,
            discharge: record.discharge,
        })
    }
}

fn group_by_subject(records: &[StayRecord]) -> BTreeMap<&SubjectId, Vec<&StayRecord>> {
    let mut groups: BTreeMap<&SubjectId, Vec<&StayRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(&record.subject).or_default().push(record);
    }
    groups
}

/// Order by admission, then discharge, then facility.
fn chronological(a: &StayRecord, b: &StayRecord) -> Ordering {
    a.admission
        .total_cmp(&b.admission)
        .then_with(|| a.discharge.total_cmp(&b.discharge))
        .then_with(|| a.facility.cmp(&b.facility))
}

/// One pass over all subjects.
fn resolve_pass(records: Vec<StayRecord>) -> Vec<StayRecord> {
    let mut by_subject: BTreeMap<SubjectId, Vec<StayRecord>> = BTreeMap::new();
    for record in records {
        by_subject.entry(record.subject.clone()).or_default().push(record);
    }

    let mut resolved = Vec::new();
    for mut stays in by_subject.into_values() {
        stays.sort_by(chronological);

        let mut taken = vec![false; stays.len()];
        for i in 0..stays.len() {
            if taken[i] {
                continue;
            }
            taken[i] = true;
            let earlier = &stays[i];
            // Scan past zero-length stays that sit between two overlapping ones.
            let partner = (i + 1..stays.len())
                .take_while(|&j| stays[j].admission < earlier.discharge)
                .find(|&j| !taken[j] && earlier.overlaps(&stays[j]));
            match partner {
                Some(j) => {
                    taken[j] = true;
                    resolved.extend(resolve_pair(earlier.clone(), stays[j].clone()));
                }
                None => resolved.push(earlier.clone()),
            }
        }
    }
    resolved
}

/// Resolve one overlapping pair where `earlier` starts no later than `later`.
fn resolve_pair(earlier: StayRecord, later: StayRecord) -> Vec<StayRecord> {
    if earlier.facility == later.facility {
        let discharge = earlier.discharge.max(later.discharge);
        return vec![StayRecord {
            discharge,
            ..earlier
        }];
    }

    let head = StayRecord {
        discharge: later.admission,
        ..earlier.clone()
    };

    let mut pieces = Vec::with_capacity(3);
    if head.duration() > 0.0 {
        pieces.push(head);
    }

    if later.discharge < earlier.discharge {
        let tail = StayRecord {
            admission: later.discharge,
            ..earlier
        };
        pieces.push(later);
        pieces.push(tail);
    } else {
        pieces.push(later);
    }
    pieces
}

// =============================================================================
// TESTS
// =============================================================================
