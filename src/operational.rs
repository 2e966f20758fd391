use crate::Cell;
use crate::Stream;

pub struct Operational {}

impl Operational {

    /// Fires once per committed update of `ca`, even when the new value
    /// equals the old one.
    pub fn updates<A:Clone+Send+'static>(ca: &Cell<A>) -> Stream<A> {
        Stream { impl_: ca.impl_.updates() }
    }

    /// Fires the current value in the current transaction, then every update.
    /// The first firing is only seen by listeners attached in that same
    /// transaction, see `SodiumCtx::transaction`.
    pub fn value<A:Clone+Send+'static>(ca: &Cell<A>) -> Stream<A> {
        Stream { impl_: ca.impl_.value() }
    }

    /// Re-fires each event of `sa` in a new transaction after the current one
    /// has committed.
    pub fn defer<A:Clone+Send+'static>(sa: &Stream<A>) -> Stream<A> {
        Stream { impl_: sa.impl_.defer() }
    }
}
