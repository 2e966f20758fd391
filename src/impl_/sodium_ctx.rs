use crate::impl_::listener::Listener;
use crate::impl_::node::{Node, NodeData, WeakNode};

use parking_lot::Mutex;
use parking_lot::ReentrantMutex;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Clone)]
pub struct SodiumCtx {
    data: Arc<Mutex<SodiumCtxData>>,
    node_count: Arc<Mutex<usize>>,
    transaction_lock: Arc<ReentrantMutex<()>>
}

pub struct SodiumCtxData {
    pub changed_nodes: Vec<Node>,
    pub transaction_depth: u32,
    pub propagating: bool,
    pub pre_post: Vec<Box<dyn FnOnce()+Send>>,
    pub last: Vec<Box<dyn FnOnce()+Send>>,
    pub post: Vec<Box<dyn FnOnce()+Send>>,
    pub keep_alive: Vec<Listener>
}

impl SodiumCtx {
    pub fn new() -> SodiumCtx {
        SodiumCtx {
            data:
                Arc::new(Mutex::new(
                    SodiumCtxData {
                        changed_nodes: Vec::new(),
                        transaction_depth: 0,
                        propagating: false,
                        pre_post: Vec::new(),
                        last: Vec::new(),
                        post: Vec::new(),
                        keep_alive: Vec::new()
                    }
                )),
            node_count: Arc::new(Mutex::new(0)),
            transaction_lock: Arc::new(ReentrantMutex::new(()))
        }
    }

    /// Runs `k` inside a transaction. Transactions nest on the calling thread
    /// and exclude every other thread until the outermost one has committed.
    ///
    /// A panic in `k` or during propagation rolls the outermost transaction
    /// back (no cell commits, no `post` work) before it is resumed.
    pub fn transaction<R,K:FnOnce()->R>(&self, k: K) -> R {
        let _guard = self.transaction_lock.lock();
        self.with_data(|data: &mut SodiumCtxData| {
            data.transaction_depth = data.transaction_depth + 1;
        });
        let result = panic::catch_unwind(AssertUnwindSafe(k));
        let is_end_of_transaction =
            self.with_data(|data: &mut SodiumCtxData| {
                data.transaction_depth = data.transaction_depth - 1;
                data.transaction_depth == 0
            });
        let result =
            match result {
                Ok(result) => result,
                Err(payload) => {
                    if is_end_of_transaction {
                        self.rollback();
                    }
                    panic::resume_unwind(payload)
                }
            };
        if is_end_of_transaction {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.end_of_transaction())) {
                self.rollback();
                panic::resume_unwind(payload);
            }
        }
        result
    }

    pub fn is_propagating(&self) -> bool {
        self.with_data(|data: &mut SodiumCtxData| data.propagating)
    }

    pub fn add_changed_node(&self, node: Node) {
        self.with_data(|data: &mut SodiumCtxData| {
            data.changed_nodes.push(node);
        });
    }

    pub fn pre_post<K:FnOnce()+Send+'static>(&self, k: K) {
        self.with_data(|data: &mut SodiumCtxData| {
            data.pre_post.push(Box::new(k));
        });
    }

    /// Runs `k` once propagation has finished, only if the transaction
    /// completes. Used for cell commits.
    pub fn last<K:FnOnce()+Send+'static>(&self, k: K) {
        self.with_data(|data: &mut SodiumCtxData| {
            data.last.push(Box::new(k));
        });
    }

    pub fn post<K:FnOnce()+Send+'static>(&self, k: K) {
        self.with_data(|data: &mut SodiumCtxData| {
            data.post.push(Box::new(k));
        });
    }

    pub fn keep_alive(&self, listener: Listener) {
        self.with_data(|data: &mut SodiumCtxData| {
            data.keep_alive.push(listener);
        });
    }

    pub fn release(&self, listener: &Listener) {
        let released: Option<Listener> =
            self.with_data(|data: &mut SodiumCtxData| {
                let index_op =
                    data.keep_alive
                        .iter()
                        .position(|l: &Listener| Arc::ptr_eq(&l.data, &listener.data));
                index_op.map(|index| data.keep_alive.remove(index))
            });
        // dropped outside the lock, the listener may own the last reference to its graph
        drop(released);
    }

    pub fn with_data<R,K:FnOnce(&mut SodiumCtxData)->R>(&self, k: K) -> R {
        let mut l = self.data.lock();
        let data: &mut SodiumCtxData = &mut l;
        k(data)
    }

    pub fn node_count(&self) -> usize {
        self.with_node_count(|node_count: &mut usize| *node_count)
    }

    pub fn inc_node_count(&self) {
        self.with_node_count(|node_count: &mut usize| *node_count = *node_count + 1);
    }

    pub fn dec_node_count(&self) {
        self.with_node_count(|node_count: &mut usize| *node_count = *node_count - 1);
    }

    pub fn with_node_count<R,K:FnOnce(&mut usize)->R>(&self, k: K) -> R {
        let mut l = self.node_count.lock();
        let node_count: &mut usize = &mut l;
        k(node_count)
    }

    fn end_of_transaction(&self) {
        self.with_data(|data: &mut SodiumCtxData| {
            data.transaction_depth = data.transaction_depth + 1;
            data.propagating = true;
        });
        loop {
            let changed_nodes: Vec<Node> =
                self.with_data(|data: &mut SodiumCtxData| mem::take(&mut data.changed_nodes));
            if changed_nodes.is_empty() {
                break;
            }
            log::trace!("propagating from {} changed node(s)", changed_nodes.len());
            for node in changed_nodes {
                self.update_node(&node);
            }
        }
        self.with_data(|data: &mut SodiumCtxData| {
            data.transaction_depth = data.transaction_depth - 1;
            data.propagating = false;
        });
        // last
        let last =
            self.with_data(|data: &mut SodiumCtxData| mem::take(&mut data.last));
        for k in last {
            k();
        }
        // pre_post
        let pre_post =
            self.with_data(|data: &mut SodiumCtxData| mem::take(&mut data.pre_post));
        for k in pre_post {
            k();
        }
        // post
        loop {
            let post =
                self.with_data(|data: &mut SodiumCtxData| mem::take(&mut data.post));
            if post.is_empty() {
                break;
            }
            for k in post {
                k();
            }
        }
        log::trace!("transaction committed");
    }

    /// Discards the staged commits and queued work of the outermost
    /// transaction, then clears firings and visited flags so the next
    /// transaction starts clean.
    fn rollback(&self) {
        let (changed_nodes, pre_post, last, post) =
            self.with_data(|data: &mut SodiumCtxData| {
                data.transaction_depth = 0;
                data.propagating = false;
                (
                    mem::take(&mut data.changed_nodes),
                    mem::take(&mut data.pre_post),
                    mem::take(&mut data.last),
                    mem::take(&mut data.post)
                )
            });
        log::warn!(
            "transaction rolled back by a panic ({} commit(s) and {} post action(s) discarded)",
            last.len(),
            post.len()
        );
        drop((changed_nodes, last, post));
        for k in pre_post {
            k();
        }
    }

    fn update_node(&self, node: &Node) {
        let bail = node.with_data(|data: &mut NodeData| data.visited);
        if bail {
            return;
        }
        let dependencies: Vec<Node> =
            node.with_data(|data: &mut NodeData| {
                data.visited = true;
                data.dependencies.clone()
            });
        {
            let node = node.clone();
            self.pre_post(move || {
                node.with_data(|data: &mut NodeData| data.visited = false);
            });
        }
        // visit dependencies
        for dependency in &dependencies {
            self.update_node(dependency);
        }
        // any dependencies changed?
        let any_changed =
            dependencies
                .iter()
                .any(|node: &Node| node.with_data(|data: &mut NodeData| data.changed));
        // if dependencies changed, then execute update on current node
        if any_changed {
            node.run_update();
        }
        // if self changed then update dependents
        let dependents: Vec<WeakNode> =
            node.with_data(|data: &mut NodeData| {
                data.prune_dependents();
                if data.changed {
                    data.dependents.clone()
                } else {
                    Vec::new()
                }
            });
        for dependent in dependents {
            if let Some(dependent) = dependent.upgrade() {
                self.update_node(&dependent);
            }
        }
    }
}
