use crate::impl_::node::Node;
use crate::impl_::sodium_ctx::SodiumCtx;

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Listener {
    pub data: Arc<Mutex<ListenerData>>
}

pub struct ListenerData {
    pub sodium_ctx: SodiumCtx,
    pub is_weak: bool,
    pub node_op: Option<Node>
}

impl Listener {
    pub fn new(sodium_ctx: &SodiumCtx, is_weak: bool, node: Node) -> Listener {
        let listener = Listener {
            data: Arc::new(Mutex::new(ListenerData {
                sodium_ctx: sodium_ctx.clone(),
                is_weak,
                node_op: Some(node)
            }))
        };
        if !is_weak {
            sodium_ctx.keep_alive(listener.clone());
        }
        log::debug!("listener registered (weak: {})", is_weak);
        listener
    }

    pub fn unlisten(&self) {
        let (is_weak, sodium_ctx, node_op) =
            self.with_data(|data: &mut ListenerData| {
                (data.is_weak, data.sodium_ctx.clone(), data.node_op.take())
            });
        if node_op.is_none() {
            return;
        }
        if !is_weak {
            sodium_ctx.release(self);
        }
        log::debug!("listener removed (weak: {})", is_weak);
    }

    pub fn node_op(&self) -> Option<Node> {
        self.with_data(|data: &mut ListenerData| data.node_op.clone())
    }

    pub fn with_data<R,K:FnOnce(&mut ListenerData)->R>(&self, k: K) -> R {
        let mut l = self.data.lock();
        let data: &mut ListenerData = &mut l;
        k(data)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let node_op = self.node_op();
        write!(f, "(Listener")?;
        match node_op {
            Some(node) => {
                writeln!(f)?;
                write!(f, "{:?})", node)
            }
            None => {
                write!(f, ")")
            }
        }
    }
}
