use crate::Cell;
use crate::Listener;
use crate::SodiumCtx;

use crate::impl_::stream::Stream as StreamImpl;

/// A sequence of discrete events, at most one per transaction.
pub struct Stream<A> {
    pub(crate) impl_: StreamImpl<A>
}

impl<A> Clone for Stream<A> {
    fn clone(&self) -> Self {
        Stream {
            impl_: self.impl_.clone()
        }
    }
}

impl<A:Clone+Send+'static> Stream<A> {
    /// A stream that never fires.
    pub fn new(sodium_ctx: &SodiumCtx) -> Stream<A> {
        Stream {
            impl_: StreamImpl::new(&sodium_ctx.impl_)
        }
    }

    pub fn map<B:Clone+Send+'static,FN:FnMut(&A)->B+Send+'static>(&self, f: FN) -> Stream<B> {
        Stream {
            impl_: self.impl_.map(f)
        }
    }

    pub fn map_to<B:Clone+Send+'static>(&self, b: B) -> Stream<B> {
        self.map(move |_: &A| b.clone())
    }

    pub fn filter<PRED:FnMut(&A)->bool+Send+'static>(&self, pred: PRED) -> Stream<A> {
        Stream {
            impl_: self.impl_.filter(pred)
        }
    }

    /// Fires `f(a, b)` where `b` is the value `cb` held before the current
    /// transaction started.
    pub fn snapshot<B:Clone+Send+'static,C:Clone+Send+'static,FN:FnMut(&A,&B)->C+Send+'static>(&self, cb: &Cell<B>, f: FN) -> Stream<C> {
        Stream {
            impl_: self.impl_.snapshot(&cb.impl_, f)
        }
    }

    pub fn snapshot1<B:Clone+Send+'static>(&self, cb: &Cell<B>) -> Stream<B> {
        self.snapshot(cb, |_a: &A, b: &B| b.clone())
    }

    /// Left-biased merge: when both fire in the same transaction, `self` wins.
    pub fn or_else(&self, s2: &Stream<A>) -> Stream<A> {
        Stream {
            impl_: self.impl_.or_else(&s2.impl_)
        }
    }

    pub fn merge<FN:FnMut(&A,&A)->A+Send+'static>(&self, s2: &Stream<A>, f: FN) -> Stream<A> {
        Stream {
            impl_: self.impl_.merge(&s2.impl_, f)
        }
    }

    pub fn hold(&self, a: A) -> Cell<A> {
        Cell {
            impl_: self.impl_.hold(a)
        }
    }

    pub fn listen_weak<K:FnMut(&A)+Send+'static>(&self, k: K) -> Listener {
        Listener {
            impl_: self.impl_.listen_weak(k)
        }
    }

    /// The context keeps this listener alive until `unlisten` is called.
    pub fn listen<K:FnMut(&A)+Send+'static>(&self, k: K) -> Listener {
        Listener {
            impl_: self.impl_.listen(k)
        }
    }
}

impl<A:Clone+Send+'static> Stream<Option<A>> {
    /// Drops `None` events and unwraps `Some`.
    pub fn filter_option(&self) -> Stream<A> {
        Stream {
            impl_: StreamImpl::filter_option(&self.impl_)
        }
    }
}
