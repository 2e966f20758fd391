use crate::impl_::node::{Node, NodeData};
use crate::impl_::sodium_ctx::SodiumCtx as SodiumCtxImpl;
use crate::tests::{collect, init};
use crate::SodiumCtx;
use crate::StreamSink;

use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[test]
fn node_count() {
    init();
    let sodium_ctx = SodiumCtxImpl::new();
    {
        let node1 = Node::new(&sodium_ctx, || {}, vec![]);
        let node2 = Node::new(&sodium_ctx, || {}, vec![node1.clone()]);
        let _node3 = Node::new(&sodium_ctx, || {}, vec![node1, node2]);
        assert_eq!(sodium_ctx.node_count(), 3);
    }
    assert_eq!(sodium_ctx.node_count(), 0);
}

#[test]
fn dropped_dependents_are_pruned() {
    init();
    let sodium_ctx = SodiumCtxImpl::new();
    let node1 = Node::new(&sodium_ctx, || {}, vec![]);
    {
        let _node2 = Node::new(&sodium_ctx, || {}, vec![node1.clone()]);
    }
    let _node3 = Node::new(&sodium_ctx, || {}, vec![node1.clone()]);
    let dependents = node1.with_data(|data: &mut NodeData| data.dependents.len());
    assert_eq!(dependents, 1);
}

#[test]
fn dropped_dependents_are_pruned_on_propagation() {
    init();
    let sodium_ctx = SodiumCtxImpl::new();
    let source = Node::new(&sodium_ctx, || {}, vec![]);
    for _ in 0..3 {
        let _dependent = Node::new(&sodium_ctx, || {}, vec![source.clone()]);
    }
    sodium_ctx.transaction(|| {
        source.with_data(|data: &mut NodeData| data.changed = true);
        sodium_ctx.add_changed_node(source.clone());
    });
    let dependents = source.with_data(|data: &mut NodeData| data.dependents.len());
    assert_eq!(dependents, 0);
}

#[test]
fn update_survives_a_panic() {
    init();
    let sodium_ctx = SodiumCtxImpl::new();
    let runs = Arc::new(Mutex::new(0));
    let node;
    {
        let runs = runs.clone();
        node = Node::new(
            &sodium_ctx,
            move || {
                *runs.lock() += 1;
                if *runs.lock() == 1 {
                    panic!("first update fails");
                }
            },
            vec![]
        );
    }
    let result = panic::catch_unwind(AssertUnwindSafe(|| node.run_update()));
    assert!(result.is_err());
    node.run_update();
    assert_eq!(*runs.lock(), 2);
}

#[test]
fn update_runs_once_per_transaction() {
    init();
    let sodium_ctx = SodiumCtxImpl::new();
    let updates = Arc::new(Mutex::new(0));
    let source = Node::new(&sodium_ctx, || {}, vec![]);
    let _dependent;
    {
        let updates = updates.clone();
        _dependent = Node::new(&sodium_ctx, move || *updates.lock() += 1, vec![source.clone()]);
    }
    sodium_ctx.transaction(|| {
        source.with_data(|data: &mut NodeData| data.changed = true);
        sodium_ctx.add_changed_node(source.clone());
        sodium_ctx.add_changed_node(source.clone());
    });
    assert_eq!(*updates.lock(), 1);
    let visited = source.with_data(|data: &mut NodeData| data.visited);
    assert!(!visited);
}

#[test]
fn diamond_fires_once_with_both_branches() {
    init();
    /*
          s
         / \
      a=+1  b=*10
         \ /
        merge
    */
    let sodium_ctx = SodiumCtx::new();
    let s: StreamSink<i32> = sodium_ctx.new_stream_sink();
    let a = s.stream().map(|x: &i32| x + 1);
    let b = s.stream().map(|x: &i32| x * 10);
    let (_l, out) = collect(&a.merge(&b, |x: &i32, y: &i32| x + y));
    s.send(1);
    s.send(2);
    assert_eq!(*out.lock(), vec![12, 23]);
}

#[test]
fn listener_debug_dumps_graph() {
    init();
    let sodium_ctx = SodiumCtx::new();
    let s: StreamSink<i32> = sodium_ctx.new_stream_sink();
    let l = s.stream().map(|x: &i32| x + 1).listen_weak(|_: &i32| {});
    let dump = format!("{:?}", l);
    assert!(dump.starts_with("(Listener"));
    assert!(dump.contains("(Node N1 (dependencies [N2])"));
    assert!(dump.contains("(Node N3 (dependencies [])"));
    l.unlisten();
    assert_eq!(format!("{:?}", l), "(Listener)");
}
