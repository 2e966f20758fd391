use crate::impl_::listener::Listener;
use crate::impl_::node::Node;
use crate::impl_::sodium_ctx::SodiumCtx;
use crate::impl_::stream::Stream;
use crate::impl_::stream_sink::StreamSink;

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::Weak;

pub struct Cell<A> {
    pub data: Arc<Mutex<CellData<A>>>
}

pub struct WeakCell<A> {
    pub data: Weak<Mutex<CellData<A>>>
}

impl<A> Clone for Cell<A> {
    fn clone(&self) -> Self {
        Cell {
            data: self.data.clone()
        }
    }
}

pub struct CellData<A> {
    pub value: A,
    pub stream: Stream<A>,
    // stages commits of `stream` firings, owned here so it lives exactly as long as the cell
    pub _node: Node
}

impl<A:Clone+Send+'static> Cell<A> {
    pub fn new(sodium_ctx: &SodiumCtx, value: A) -> Cell<A> {
        Cell::_new(sodium_ctx, Stream::new(sodium_ctx), value)
    }

    /// A cell holding `value` until `stream` fires. The new value is staged
    /// while the transaction propagates and committed in its last phase, so
    /// `sample` keeps answering the old value for the whole transaction and a
    /// transaction that panics commits nothing.
    pub fn _new(sodium_ctx: &SodiumCtx, stream: Stream<A>, value: A) -> Cell<A> {
        let node = Node::new(sodium_ctx, || {}, vec![stream.node()]);
        let c = Cell {
            data: Arc::new(Mutex::new(CellData {
                value,
                stream: stream.clone(),
                _node: node.clone()
            }))
        };
        let c_ = Cell::downgrade(&c);
        let sodium_ctx = sodium_ctx.clone();
        node.set_update(move || {
            let firing_op = stream.firing_op();
            if let Some(firing) = firing_op {
                if let Some(c) = c_.upgrade() {
                    sodium_ctx.last(move || {
                        c.with_data(|data: &mut CellData<A>| data.value = firing);
                    });
                }
            }
        });
        c
    }

    pub fn sodium_ctx(&self) -> SodiumCtx {
        self.with_data(|data: &mut CellData<A>| data.stream.sodium_ctx())
    }

    pub fn sample(&self) -> A {
        self.with_data(|data: &mut CellData<A>| data.value.clone())
    }

    pub fn updates(&self) -> Stream<A> {
        self.with_data(|data: &mut CellData<A>| data.stream.clone())
    }

    pub fn value(&self) -> Stream<A> {
        let sodium_ctx = self.sodium_ctx();
        sodium_ctx.transaction(|| {
            let spark: StreamSink<A> = StreamSink::new(&sodium_ctx);
            spark.send(self.sample());
            self.updates().or_else(&spark.stream())
        })
    }

    pub fn map<B:Clone+Send+'static,FN:FnMut(&A)->B+Send+'static>(&self, mut f: FN) -> Cell<B> {
        let sodium_ctx = self.sodium_ctx();
        sodium_ctx.transaction(|| {
            let init = f(&self.sample());
            self.updates().map(f).hold(init)
        })
    }

    pub fn lift2<B:Clone+Send+'static,C:Clone+Send+'static,FN:FnMut(&A,&B)->C+Send+'static>(&self, cb: &Cell<B>, mut f: FN) -> Cell<C> {
        let sodium_ctx = self.sodium_ctx();
        sodium_ctx.transaction(|| {
            let lhs = self.sample();
            let rhs = cb.sample();
            let init = f(&lhs, &rhs);
            let state: Arc<Mutex<(A,B)>> = Arc::new(Mutex::new((lhs, rhs)));
            let s1: Stream<()>;
            let s2: Stream<()>;
            {
                let state = state.clone();
                s1 = self.updates().map(move |a: &A| {
                    state.lock().0 = a.clone();
                });
            }
            {
                let state = state.clone();
                s2 = cb.updates().map(move |b: &B| {
                    state.lock().1 = b.clone();
                });
            }
            s1.or_else(&s2)
                .map(move |_: &()| {
                    let (a, b) = state.lock().clone();
                    f(&a, &b)
                })
                .hold(init)
        })
    }

    pub fn listen_weak<K:FnMut(&A)+Send+'static>(&self, k: K) -> Listener {
        self.sodium_ctx().transaction(|| {
            self.value().listen_weak(k)
        })
    }

    pub fn listen<K:FnMut(&A)+Send+'static>(&self, k: K) -> Listener {
        self.sodium_ctx().transaction(|| {
            self.value().listen(k)
        })
    }

    pub fn with_data<R,K:FnOnce(&mut CellData<A>)->R>(&self, k: K) -> R {
        let mut l = self.data.lock();
        let data: &mut CellData<A> = &mut l;
        k(data)
    }

    pub fn downgrade(this: &Self) -> WeakCell<A> {
        WeakCell {
            data: Arc::downgrade(&this.data)
        }
    }
}

impl<A> WeakCell<A> {
    pub fn upgrade(&self) -> Option<Cell<A>> {
        self.data.upgrade().map(|data| Cell { data })
    }
}
