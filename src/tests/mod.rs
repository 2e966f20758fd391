mod node_test;

use crate::Listener;
use crate::SodiumCtx;
use crate::Stream;

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn collect<A:Clone+Send+'static>(s: &Stream<A>) -> (Listener, Arc<Mutex<Vec<A>>>) {
    let out: Arc<Mutex<Vec<A>>> = Arc::new(Mutex::new(Vec::new()));
    let listener;
    {
        let out = out.clone();
        listener = s.listen_weak(move |a: &A| out.lock().push(a.clone()));
    }
    (listener, out)
}

pub fn assert_memory_freed(sodium_ctx: &SodiumCtx) {
    let node_count = sodium_ctx.node_count();
    log::debug!("node_count {}", node_count);
    assert_eq!(node_count, 0);
}
