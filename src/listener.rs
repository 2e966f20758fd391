use crate::impl_::listener::Listener as ListenerImpl;

use std::fmt;

#[derive(Clone)]
pub struct Listener {
    pub(crate) impl_: ListenerImpl
}

impl Listener {
    /// Stops delivery. Calling it again is a no-op.
    pub fn unlisten(&self) {
        self.impl_.unlisten();
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.impl_, f)
    }
}
