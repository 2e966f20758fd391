use crate::Cell;
use crate::CellSink;
use crate::Stream;
use crate::StreamSink;

use crate::impl_::sodium_ctx::SodiumCtx as SodiumCtxImpl;

/// Owns the dependency graph and the transaction in which every send,
/// propagation and cell commit happens. Clones share the same context.
#[derive(Clone)]
pub struct SodiumCtx {
    pub(crate) impl_: SodiumCtxImpl
}

impl Default for SodiumCtx {
    fn default() -> SodiumCtx {
        SodiumCtx::new()
    }
}

impl SodiumCtx {
    pub fn new() -> SodiumCtx {
        SodiumCtx {
            impl_: SodiumCtxImpl::new()
        }
    }

    pub fn new_cell<A:Clone+Send+'static>(&self, a: A) -> Cell<A> {
        Cell::new(self, a)
    }

    pub fn new_stream<A:Clone+Send+'static>(&self) -> Stream<A> {
        Stream::new(self)
    }

    pub fn new_cell_sink<A:Clone+Send+'static>(&self, a: A) -> CellSink<A> {
        CellSink::new(self, a)
    }

    pub fn new_stream_sink<A:Clone+Send+'static>(&self) -> StreamSink<A> {
        StreamSink::new(self)
    }

    pub fn new_stream_sink_with_coalescer<A:Clone+Send+'static,COALESCER:FnMut(&A,&A)->A+Send+'static>(&self, coalescer: COALESCER) -> StreamSink<A> {
        StreamSink::new_with_coalescer(self, coalescer)
    }

    /// Runs `k` as one atomic instant. Nested calls on the same thread join
    /// the outer transaction; other threads wait until it has committed.
    pub fn transaction<R,K:FnOnce()->R>(&self, k: K) -> R {
        self.impl_.transaction(k)
    }

    /// Runs `k` once the current transaction has propagated and its cells
    /// have committed. Outside a transaction, `k` runs before `post` returns.
    pub fn post<K:FnOnce()+Send+'static>(&self, k: K) {
        self.impl_.transaction(|| self.impl_.post(k));
    }

    /// Number of live nodes in the dependency graph.
    pub fn node_count(&self) -> usize {
        self.impl_.node_count()
    }
}
