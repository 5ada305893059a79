//! The two-cursor sequence merge.
//!
//! One algorithm serves all three nesting levels. Both inputs are canonical
//! sibling sequences (strictly ordered by [`Ord`]); level-specific behavior
//! lives entirely in the [`Entity`] implementation.
//!
//! Walking both sequences in step:
//!
//! 1. Equal entities are a silent match.
//! 2. Otherwise the entity whose name sorts first is an add (new side) or a
//!    remove (old side).
//! 3. Same-named entities that differ are either part of a run of repeated
//!    siblings or a genuine change. A forward scan over the same-named run
//!    on each side looks for an exact match; finding one turns the skipped
//!    elements into removes or adds. Failing that (or when both cursors are
//!    on their last element) the pair is a change.
//! 4. A change is only emitted for a pair that is the same real-world
//!    entity. Any other pair is split by total order into an add or a
//!    remove, so an edit never re-targets an unrelated entity.
//! 5. Whatever remains on either side is added or removed.

use std::cmp::Ordering;

use caldelta_types::QName;
use tracing::trace;

use crate::error::DiffResult;
use crate::selection::SiblingSelection;

/// A canonical node the merge can work on.
pub trait Entity: Ord {
    /// What an add or remove carries: the whole entity.
    type Reference;
    /// What a change carries.
    type Change;

    /// The real name, for logs.
    fn name(&self) -> &QName;

    /// Ordering of the names used for matching.
    fn compare_names(&self, other: &Self) -> Ordering;

    /// Whether `self` and `other` are the same real-world entity.
    fn same_entity(&self, other: &Self) -> bool;

    /// The whole entity, for add and remove lists.
    fn reference(&self) -> Self::Reference;

    /// Changes from `old` to `self`, or `None` if nothing reportable differs.
    fn diff(&self, old: &Self) -> DiffResult<Option<Self::Change>>;
}

/// One merge emission.
#[derive(Debug, PartialEq, Eq)]
pub enum MergeOp<'a, E> {
    Add(&'a E),
    Remove(&'a E),
    Changed { new: &'a E, old: &'a E },
}

/// Index of the first element after `start` in the same-named run that is
/// equal to `target`.
fn find_in_run<E: Entity>(seq: &[E], start: usize, target: &E) -> Option<usize> {
    seq.iter()
        .enumerate()
        .skip(start + 1)
        .take_while(|(_, e)| e.compare_names(target) == Ordering::Equal)
        .find(|(_, e)| *e == target)
        .map(|(k, _)| k)
}

/// Compute the edit operations turning `old` into `new`.
pub fn merge<'a, E: Entity>(new: &'a [E], old: &'a [E]) -> Vec<MergeOp<'a, E>> {
    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < new.len() && j < old.len() {
        let (a, b) = (&new[i], &old[j]);

        if a == b {
            i += 1;
            j += 1;
            continue;
        }

        match a.compare_names(b) {
            Ordering::Less => {
                ops.push(MergeOp::Add(a));
                i += 1;
            }
            Ordering::Greater => {
                ops.push(MergeOp::Remove(b));
                j += 1;
            }
            Ordering::Equal => {
                let both_last = i + 1 == new.len() && j + 1 == old.len();

                if !both_last {
                    if let Some(k) = find_in_run(old, j, a) {
                        ops.extend(old[j..k].iter().map(MergeOp::Remove));
                        j = k;
                        continue;
                    }
                    if let Some(k) = find_in_run(new, i, b) {
                        ops.extend(new[i..k].iter().map(MergeOp::Add));
                        i = k;
                        continue;
                    }
                }

                if a.same_entity(b) {
                    ops.push(MergeOp::Changed { new: a, old: b });
                    i += 1;
                    j += 1;
                } else if a < b {
                    ops.push(MergeOp::Add(a));
                    i += 1;
                } else {
                    ops.push(MergeOp::Remove(b));
                    j += 1;
                }
            }
        }
    }

    ops.extend(new[i..].iter().map(MergeOp::Add));
    ops.extend(old[j..].iter().map(MergeOp::Remove));
    ops
}

/// Merge two sibling sequences and build the selection for their parent.
///
/// Returns `None` when the sequences are equivalent.
pub fn select<E: Entity>(
    new: &[E],
    old: &[E],
) -> DiffResult<Option<SiblingSelection<E::Reference, E::Change>>> {
    let mut selection = SiblingSelection::new();

    for op in merge(new, old) {
        match op {
            MergeOp::Add(e) => {
                trace!(name = %e.name(), "add");
                selection.add.push(e.reference());
            }
            MergeOp::Remove(e) => {
                trace!(name = %e.name(), "remove");
                selection.remove.push(e.reference());
            }
            MergeOp::Changed { new, old } => {
                if let Some(change) = new.diff(old)? {
                    trace!(name = %new.name(), "change");
                    selection.changed.push(change);
                }
            }
        }
    }

    Ok(selection.into_option())
}
