//! Distinct changes of a cell.
//!
//! `changes` turns a cell into a stream that fires only when an update moves
//! the cell to a value that differs from the one it held immediately before.
//! The prior value is sampled in the same transaction as the update, before
//! the cell commits, so each update is compared against its own predecessor
//! and never against anything older.

use crate::Cell;
use crate::Operational;
use crate::Stream;

/// Outcome of comparing one update against the value it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change<A> {
    Changed(A),
    Unchanged
}

impl<A> Change<A> {
    pub fn between<EQ:FnOnce(&A,&A)->bool>(old: &A, new: A, equals: EQ) -> Change<A> {
        if equals(old, &new) {
            Change::Unchanged
        } else {
            Change::Changed(new)
        }
    }

    pub fn is_changed(&self) -> bool {
        match self {
            Change::Changed(_) => true,
            Change::Unchanged => false
        }
    }

    pub fn into_option(self) -> Option<A> {
        match self {
            Change::Changed(a) => Some(a),
            Change::Unchanged => None
        }
    }
}

impl<A> From<Change<A>> for Option<A> {
    fn from(change: Change<A>) -> Option<A> {
        change.into_option()
    }
}

/// Same as [`Cell::changes`].
pub fn changes_of<A:Clone+Send+PartialEq+'static>(ca: &Cell<A>) -> Stream<A> {
    ca.changes_by(|old: &A, new: &A| old == new)
}

impl<A:Clone+Send+'static> Cell<A> {
    /// Fires the new value whenever an update makes the cell differ from its
    /// immediately preceding value, using `PartialEq`.
    ///
    /// Sends collapsed into one transaction count as a single update, compared
    /// against the value from before that transaction.
    pub fn changes(&self) -> Stream<A> where A: PartialEq {
        changes_of(self)
    }

    /// Like [`Cell::changes`], with `equals(old, new)` deciding when an update
    /// is a no-op. A panic inside `equals` propagates to whoever sent the
    /// update.
    pub fn changes_by<EQ:FnMut(&A,&A)->bool+Send+'static>(&self, mut equals: EQ) -> Stream<A> {
        Operational::updates(self)
            .snapshot(self, move |new: &A, old: &A| -> Option<A> {
                let change = Change::between(old, new.clone(), &mut equals);
                if !change.is_changed() {
                    log::trace!("update equal to prior value suppressed");
                }
                change.into_option()
            })
            .filter_option()
    }
}
