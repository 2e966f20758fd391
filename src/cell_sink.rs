use crate::Cell;
use crate::SodiumCtx;
use crate::SodiumError;

use crate::impl_::cell_sink::CellSink as CellSinkImpl;

pub struct CellSink<A> {
    pub(crate) impl_: CellSinkImpl<A>
}

impl<A> Clone for CellSink<A> {
    fn clone(&self) -> Self {
        CellSink {
            impl_: self.impl_.clone()
        }
    }
}

impl<A:Clone+Send+'static> CellSink<A> {
    pub fn new(sodium_ctx: &SodiumCtx, a: A) -> CellSink<A> {
        CellSink {
            impl_: CellSinkImpl::new(&sodium_ctx.impl_, a)
        }
    }

    pub fn cell(&self) -> Cell<A> {
        Cell {
            impl_: self.impl_.cell()
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
