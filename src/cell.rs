use crate::Listener;
use crate::SodiumCtx;

use crate::impl_::cell::Cell as CellImpl;

/// A value that changes over time. It has exactly one value at any
/// transactional instant, and a new value becomes visible to `sample` only
/// after the transaction that set it has committed.
pub struct Cell<A> {
    pub(crate) impl_: CellImpl<A>
}

impl<A> Clone for Cell<A> {
    fn clone(&self) -> Self {
        Cell {
            impl_: self.impl_.clone()
        }
    }
}

impl<A:Clone+Send+'static> Cell<A> {
    /// A cell that always holds `value`.
    pub fn new(sodium_ctx: &SodiumCtx, value: A) -> Cell<A> {
        Cell {
            impl_: CellImpl::new(&sodium_ctx.impl_, value)
        }
    }

    pub fn sample(&self) -> A {
        self.impl_.sample()
    }

    pub fn map<B:Clone+Send+'static,FN:FnMut(&A)->B+Send+'static>(&self, f: FN) -> Cell<B> {
        Cell {
            impl_: self.impl_.map(f)
        }
    }

    pub fn lift2<B:Clone+Send+'static,C:Clone+Send+'static,FN:FnMut(&A,&B)->C+Send+'static>(&self, cb: &Cell<B>, f: FN) -> Cell<C> {
        Cell {
            impl_: self.impl_.lift2(&cb.impl_, f)
        }
    }

    /// Delivers the current value, then every update.
    pub fn listen_weak<K:FnMut(&A)+Send+'static>(&self, k: K) -> Listener {
        Listener {
            impl_: self.impl_.listen_weak(k)
        }
    }

    pub fn listen<K:FnMut(&A)+Send+'static>(&self, k: K) -> Listener {
        Listener {
            impl_: self.impl_.listen(k)
        }
    }
}
