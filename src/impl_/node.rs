use crate::impl_::listener::Listener;
use crate::impl_::sodium_ctx::SodiumCtx;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::Weak;

pub struct Node {
    pub data: Arc<Mutex<NodeData>>
}

#[derive(Clone)]
pub struct WeakNode {
    pub data: Weak<Mutex<NodeData>>
}

pub struct NodeData {
    pub visited: bool,
    pub changed: bool,
    pub update: Box<dyn FnMut()+Send>,
    pub dependencies: Vec<Node>,
    pub dependents: Vec<WeakNode>,
    pub keep_alive: Vec<Listener>,
    pub sodium_ctx: SodiumCtx
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Node {
            data: self.data.clone()
        }
    }
}

impl Drop for NodeData {
    fn drop(&mut self) {
        self.sodium_ctx.dec_node_count();
    }
}

impl NodeData {
    /// Forgets dependents that have been dropped.
    pub fn prune_dependents(&mut self) {
        self.dependents.retain(|node: &WeakNode| node.data.strong_count() != 0);
    }
}

struct RestoreUpdate<'a> {
    node: &'a Node,
    update_op: Option<Box<dyn FnMut()+Send>>
}

impl<'a> Drop for RestoreUpdate<'a> {
    fn drop(&mut self) {
        if let Some(update) = self.update_op.take() {
            self.node.with_data(|data: &mut NodeData| data.update = update);
        }
    }
}

impl Node {
    pub fn new<UPDATE:FnMut()+Send+'static>(sodium_ctx: &SodiumCtx, update: UPDATE, dependencies: Vec<Node>) -> Self {
        let result =
            Node {
                data:
                    Arc::new(Mutex::new(
                        NodeData {
                            visited: false,
                            changed: false,
                            update: Box::new(update),
                            dependencies: dependencies.clone(),
                            dependents: Vec::new(),
                            keep_alive: Vec::new(),
                            sodium_ctx: sodium_ctx.clone()
                        }
                    ))
            };
        for dependency in &dependencies {
            dependency.add_dependent(&result);
        }
        sodium_ctx.inc_node_count();
        result
    }

    pub fn downgrade(this: &Self) -> WeakNode {
        WeakNode {
            data: Arc::downgrade(&this.data)
        }
    }

    pub fn set_update<UPDATE:FnMut()+Send+'static>(&self, update: UPDATE) {
        self.with_data(|data: &mut NodeData| data.update = Box::new(update));
    }

    fn add_dependent(&self, dependent: &Node) {
        let dependent = Node::downgrade(dependent);
        self.with_data(|data: &mut NodeData| {
            data.prune_dependents();
            data.dependents.push(dependent);
        });
    }

    pub fn add_keep_alive(&self, listener: &Listener) {
        self.with_data(|data: &mut NodeData| {
            data.keep_alive.push(listener.clone());
        });
    }

    /// Runs the node's update function without holding the node's lock, so the
    /// update may freely touch this node (or create new nodes depending on it).
    /// The function is put back even if it panics.
    pub fn run_update(&self) {
        let update: Box<dyn FnMut()+Send> =
            self.with_data(|data: &mut NodeData| std::mem::replace(&mut data.update, Box::new(|| {})));
        let mut restore = RestoreUpdate { node: self, update_op: Some(update) };
        if let Some(update) = restore.update_op.as_mut() {
            update();
        }
    }

    pub fn with_data<R,K:FnOnce(&mut NodeData)->R>(&self, k: K) -> R {
        let mut l = self.data.lock();
        let data: &mut NodeData = &mut l;
        k(data)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut next_id: usize = 1;
        let mut node_id_map: HashMap<*const Mutex<NodeData>,usize> = HashMap::new();
        let mut node_to_id = |node: &Node| {
            let key = Arc::as_ptr(&node.data);
            let node_id = *node_id_map.entry(key).or_insert_with(|| {
                let id = next_id;
                next_id = next_id + 1;
                id
            });
            format!("N{}", node_id)
        };
        let mut visited: HashSet<*const Mutex<NodeData>> = HashSet::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            if !visited.insert(Arc::as_ptr(&node.data)) {
                continue;
            }
            let (dependencies, dependents, keep_alive_count) =
                node.with_data(|data: &mut NodeData| {
                    let dependents: Vec<Node> =
                        data
                            .dependents
                            .iter()
                            .flat_map(|dependent| dependent.upgrade())
                            .collect();
                    (data.dependencies.clone(), dependents, data.keep_alive.len())
                });
            let node_id = node_to_id(&node);
            let dependency_ids: Vec<String> = dependencies.iter().map(&mut node_to_id).collect();
            let dependent_ids: Vec<String> = dependents.iter().map(&mut node_to_id).collect();
            writeln!(
                f,
                "(Node {} (dependencies [{}]) (dependents [{}]) (keep_alive {}))",
                node_id,
                dependency_ids.join(", "),
                dependent_ids.join(", "),
                keep_alive_count
            )?;
            stack.extend(dependencies);
        }
        Ok(())
    }
}

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.data.upgrade().map(|data| Node { data })
    }
}
