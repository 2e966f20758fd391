use crate::impl_::cell::Cell;
use crate::impl_::listener::Listener;
use crate::impl_::node::{Node, NodeData, WeakNode};
use crate::impl_::sodium_ctx::SodiumCtx;
use crate::impl_::stream_sink::StreamSink;

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::Weak;

pub struct Stream<A> {
    pub node: Node,
    pub data: Arc<Mutex<StreamData<A>>>
}

pub struct WeakStream<A> {
    pub node: WeakNode,
    pub data: Weak<Mutex<StreamData<A>>>
}

impl<A> Clone for Stream<A> {
    fn clone(&self) -> Self {
        Stream {
            node: self.node.clone(),
            data: self.data.clone()
        }
    }
}

impl<A> Clone for WeakStream<A> {
    fn clone(&self) -> Self {
        WeakStream {
            node: self.node.clone(),
            data: self.data.clone()
        }
    }
}

pub struct StreamData<A> {
    pub firing_op: Option<A>,
    pub sodium_ctx: SodiumCtx,
    pub coalescer_op: Option<Box<dyn FnMut(&A,&A)->A+Send>>
}

impl<A:Clone+Send+'static> Stream<A> {
    pub fn new(sodium_ctx: &SodiumCtx) -> Stream<A> {
        Stream::_new(sodium_ctx, Vec::new(), None)
    }

    pub fn _new_with_coalescer<COALESCER:FnMut(&A,&A)->A+Send+'static>(sodium_ctx: &SodiumCtx, coalescer: COALESCER) -> Stream<A> {
        Stream::_new(sodium_ctx, Vec::new(), Some(Box::new(coalescer)))
    }

    fn _new(sodium_ctx: &SodiumCtx, dependencies: Vec<Node>, coalescer_op: Option<Box<dyn FnMut(&A,&A)->A+Send>>) -> Stream<A> {
        Stream {
            node: Node::new(sodium_ctx, || {}, dependencies),
            data: Arc::new(Mutex::new(StreamData {
                firing_op: None,
                sodium_ctx: sodium_ctx.clone(),
                coalescer_op
            }))
        }
    }

    pub fn with_firing_op<R,K:FnOnce(&mut Option<A>)->R>(&self, k: K) -> R {
        self.with_data(|data: &mut StreamData<A>| k(&mut data.firing_op))
    }

    pub fn firing_op(&self) -> Option<A> {
        self.with_firing_op(|firing_op: &mut Option<A>| firing_op.clone())
    }

    pub fn node(&self) -> Node {
        self.node.clone()
    }

    pub fn sodium_ctx(&self) -> SodiumCtx {
        self.with_data(|data: &mut StreamData<A>| data.sodium_ctx.clone())
    }

    /// Derives a stream that fires `f(a)` whenever `self` fires `a` and `f`
    /// returns `Some`. The derived node holds its source strongly and itself
    /// weakly, so a chain is kept alive from its downstream end.
    fn _map_option<B:Clone+Send+'static,FN:FnMut(&A)->Option<B>+Send+'static>(&self, mut f: FN) -> Stream<B> {
        let sodium_ctx = self.sodium_ctx();
        let s: Stream<B> = Stream::_new(&sodium_ctx, vec![self.node()], None);
        let self_ = self.clone();
        let s_ = Stream::downgrade(&s);
        s.node.set_update(move || {
            let firing_op = self_.firing_op();
            if let Some(firing) = firing_op {
                if let Some(b) = f(&firing) {
                    if let Some(s_) = s_.upgrade() {
                        s_._send(b);
                    }
                }
            }
        });
        s
    }

    pub fn map<B:Clone+Send+'static,FN:FnMut(&A)->B+Send+'static>(&self, mut f: FN) -> Stream<B> {
        self._map_option(move |a: &A| Some(f(a)))
    }

    pub fn filter<PRED:FnMut(&A)->bool+Send+'static>(&self, mut pred: PRED) -> Stream<A> {
        self._map_option(move |a: &A| {
            if pred(a) {
                Some(a.clone())
            } else {
                None
            }
        })
    }

    pub fn filter_option(sa: &Stream<Option<A>>) -> Stream<A> {
        sa._map_option(|a: &Option<A>| a.clone())
    }

    pub fn snapshot<B:Clone+Send+'static,C:Clone+Send+'static,FN:FnMut(&A,&B)->C+Send+'static>(&self, cb: &Cell<B>, mut f: FN) -> Stream<C> {
        let cb = cb.clone();
        self.map(move |a: &A| f(a, &cb.sample()))
    }

    pub fn or_else(&self, s2: &Stream<A>) -> Stream<A> {
        self.merge(s2, |lhs: &A, _rhs: &A| lhs.clone())
    }

    pub fn merge<FN:FnMut(&A,&A)->A+Send+'static>(&self, s2: &Stream<A>, mut f: FN) -> Stream<A> {
        let sodium_ctx = self.sodium_ctx();
        let s: Stream<A> = Stream::_new(&sodium_ctx, vec![self.node(), s2.node()], None);
        let self_ = self.clone();
        let s2 = s2.clone();
        let s_ = Stream::downgrade(&s);
        s.node.set_update(move || {
            let firing_op =
                match (self_.firing_op(), s2.firing_op()) {
                    (Some(firing1), Some(firing2)) => Some(f(&firing1, &firing2)),
                    (Some(firing1), None) => Some(firing1),
                    (None, Some(firing2)) => Some(firing2),
                    (None, None) => None
                };
            if let Some(firing) = firing_op {
                if let Some(s_) = s_.upgrade() {
                    s_._send(firing);
                }
            }
        });
        s
    }

    pub fn hold(&self, a: A) -> Cell<A> {
        let sodium_ctx = self.sodium_ctx();
        sodium_ctx.transaction(|| {
            Cell::_new(&sodium_ctx, self.clone(), a)
        })
    }

    pub fn defer(&self) -> Stream<A> {
        let sodium_ctx = self.sodium_ctx();
        sodium_ctx.transaction(|| {
            let ss = StreamSink::new(&sodium_ctx);
            let s = ss.stream();
            let sodium_ctx2 = sodium_ctx.clone();
            let ss = StreamSink::downgrade(&ss);
            let listener = self.listen_weak(move |a: &A| {
                let ss = ss.clone();
                let a = a.clone();
                sodium_ctx2.post(move || {
                    if let Some(ss) = ss.upgrade() {
                        ss.send(a);
                    }
                });
            });
            s.node().add_keep_alive(&listener);
            s
        })
    }

    pub fn _listen<K:FnMut(&A)+Send+'static>(&self, mut k: K, weak: bool) -> Listener {
        let sodium_ctx = self.sodium_ctx();
        let self_ = self.clone();
        let node =
            Node::new(
                &sodium_ctx,
                move || {
                    let firing_op = self_.firing_op();
                    if let Some(firing) = firing_op {
                        k(&firing);
                    }
                },
                vec![self.node()]
            );
        Listener::new(&sodium_ctx, weak, node)
    }

    pub fn listen_weak<K:FnMut(&A)+Send+'static>(&self, k: K) -> Listener {
        self._listen(k, true)
    }

    pub fn listen<K:FnMut(&A)+Send+'static>(&self, k: K) -> Listener {
        self._listen(k, false)
    }

    pub fn with_data<R,K:FnOnce(&mut StreamData<A>)->R>(&self, k: K) -> R {
        let mut l = self.data.lock();
        let data: &mut StreamData<A> = &mut l;
        k(data)
    }

    /// Sets this stream's firing for the current transaction, combining with an
    /// earlier firing through the coalescer when there is one (otherwise the
    /// later value replaces the earlier one).
    pub fn _send(&self, a: A) {
        let sodium_ctx = self.sodium_ctx();
        let sodium_ctx = &sodium_ctx;
        sodium_ctx.transaction(|| {
            let is_first = self.with_data(|data: &mut StreamData<A>| {
                let is_first = data.firing_op.is_none();
                let firing =
                    match (data.firing_op.take(), data.coalescer_op.as_mut()) {
                        (Some(previous), Some(coalescer)) => coalescer(&previous, &a),
                        _ => a
                    };
                data.firing_op = Some(firing);
                is_first
            });
            self.node.with_data(|data: &mut NodeData| data.changed = true);
            if is_first {
                let _self = self.clone();
                sodium_ctx.pre_post(move || {
                    _self.with_data(|data: &mut StreamData<A>| data.firing_op = None);
                    _self.node.with_data(|data: &mut NodeData| data.changed = false);
                });
            }
        });
    }

    pub fn downgrade(this: &Self) -> WeakStream<A> {
        WeakStream {
            node: Node::downgrade(&this.node),
            data: Arc::downgrade(&this.data)
        }
    }
}

impl<A> WeakStream<A> {
    pub fn upgrade(&self) -> Option<Stream<A>> {
        let node_op = self.node.upgrade();
        let data_op = self.data.upgrade();
        if let Some(node) = node_op {
            if let Some(data) = data_op {
                return Some(Stream { node, data })
            }
        }
        None
    }
}
