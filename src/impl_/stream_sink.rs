use crate::impl_::sodium_ctx::SodiumCtx;
use crate::impl_::stream::{Stream, WeakStream};

pub struct StreamSink<A> {
    stream: Stream<A>,
    sodium_ctx: SodiumCtx
}

pub struct WeakStreamSink<A> {
    stream: WeakStream<A>,
    sodium_ctx: SodiumCtx
}

impl<A> Clone for StreamSink<A> {
    fn clone(&self) -> Self {
        StreamSink {
            stream: self.stream.clone(),
            sodium_ctx: self.sodium_ctx.clone()
        }
    }
}

impl<A> Clone for WeakStreamSink<A> {
    fn clone(&self) -> Self {
        WeakStreamSink {
            stream: self.stream.clone(),
            sodium_ctx: self.sodium_ctx.clone()
        }
    }
}

impl<A:Clone+Send+'static> StreamSink<A> {
    pub fn new(sodium_ctx: &SodiumCtx) -> StreamSink<A> {
        StreamSink {
            stream: Stream::new(sodium_ctx),
            sodium_ctx: sodium_ctx.clone()
        }
    }

    pub fn new_with_coalescer<COALESCER:FnMut(&A,&A)->A+Send+'static>(sodium_ctx: &SodiumCtx, coalescer: COALESCER) -> StreamSink<A> {
        StreamSink {
            stream: Stream::_new_with_coalescer(sodium_ctx, coalescer),
            sodium_ctx: sodium_ctx.clone()
        }
    }

    pub fn stream(&self) -> Stream<A> {
        self.stream.clone()
    }

    pub fn sodium_ctx(&self) -> SodiumCtx {
        self.sodium_ctx.clone()
    }

    pub fn send(&self, a: A) {
        self.sodium_ctx.transaction(|| {
            self.sodium_ctx.add_changed_node(self.stream.node());
            self.stream._send(a);
        });
    }

    pub fn downgrade(this: &Self) -> WeakStreamSink<A> {
        WeakStreamSink {
            stream: Stream::downgrade(&this.stream),
            sodium_ctx: this.sodium_ctx.clone()
        }
    }
}

impl<A> WeakStreamSink<A> {
    pub fn upgrade(&self) -> Option<StreamSink<A>> {
        self.stream.upgrade().map(|stream| StreamSink {
            stream,
            sodium_ctx: self.sodium_ctx.clone()
        })
    }
}
