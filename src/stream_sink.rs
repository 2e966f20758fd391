use crate::SodiumCtx;
use crate::SodiumError;
use crate::Stream;

use crate::impl_::stream_sink::StreamSink as StreamSinkImpl;

pub struct StreamSink<A> {
    pub(crate) impl_: StreamSinkImpl<A>
}

impl<A> Clone for StreamSink<A> {
    fn clone(&self) -> Self {
        StreamSink {
            impl_: self.impl_.clone()
        }
    }
}

impl<A:Clone+Send+'static> StreamSink<A> {
    /// A sink whose last send in a transaction wins.
    pub fn new(sodium_ctx: &SodiumCtx) -> StreamSink<A> {
        StreamSink {
            impl_: StreamSinkImpl::new(&sodium_ctx.impl_)
        }
    }

    /// A sink that folds sends within one transaction through `coalescer`.
    pub fn new_with_coalescer<COALESCER:FnMut(&A,&A)->A+Send+'static>(sodium_ctx: &SodiumCtx, coalescer: COALESCER) -> StreamSink<A> {
        StreamSink {
            impl_: StreamSinkImpl::new_with_coalescer(&sodium_ctx.impl_, coalescer)
        }
    }

    pub fn stream(&self) -> Stream<A> {
        Stream {
            impl_: self.impl_.stream()
        }
    }

    pub fn try_send(&self, a: A) -> Result<(), SodiumError> {
        let sodium_ctx = self.impl_.sodium_ctx();
        sodium_ctx.transaction(|| {
            if sodium_ctx.is_propagating() {
                return Err(SodiumError::SendDuringPropagation);
            }
            self.impl_.send(a);
            Ok(())
        })
    }

    /// # Panics
    ///
    /// When called from inside a listener or a mapping function, see
    /// [`SodiumError::SendDuringPropagation`].
    pub fn send(&self, a: A) {
        if let Err(err) = self.try_send(a) {
            panic!("{}", err);
        }
    }
}
